use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Fatal faults of the client process. Per-request failures are
/// [`crate::client::ClientError`] values and surface as toasts instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid base_url: {0}")]
    BaseUrl(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("local state error: {0}")]
    State(#[from] serde_json::Error),
    #[error("terminal error: {0}")]
    Terminal(String),
}
