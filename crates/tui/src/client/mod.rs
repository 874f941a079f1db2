//! HTTP client for the fleet API.
//!
//! Thin by design: shapes requests, attaches the bearer credential, maps
//! response statuses onto [`ClientError`] and flattens the inconsistent list
//! envelopes. All interpretation of the data happens in `engine`.

use api_types::{
    auth::{LoginRequest, LoginResponse, SignupRequest, Token, UserView},
    envelope::ListEnvelope,
    error::ErrorBody,
    filter::CollectionFilters,
    record::{Driver, RawAutoExpense, RawEarning, RawExpense, Vehicle},
};
use engine::TransactionKind;
use reqwest::{StatusCode, Url};
use uuid::Uuid;

use crate::error::{AppError, Result};

#[derive(Debug)]
pub enum ClientError {
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict(String),
    Validation(String),
    Server(String),
    Transport(reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|err| AppError::BaseUrl(err.to_string()))?;
        Ok(Self {
            base_url,
            http: reqwest::Client::new(),
        })
    }

    fn endpoint(&self, path: &str) -> std::result::Result<Url, ClientError> {
        self.base_url
            .join(path)
            .map_err(|err| ClientError::Server(format!("invalid base_url: {err}")))
    }

    fn error_for(status: StatusCode, body: String) -> ClientError {
        match status.as_u16() {
            401 => ClientError::Unauthorized,
            403 => ClientError::Forbidden,
            404 => ClientError::NotFound,
            409 => ClientError::Conflict(body),
            400 | 422 => ClientError::Validation(body),
            _ => ClientError::Server(body),
        }
    }

    async fn read_error(res: reqwest::Response) -> ClientError {
        let status = res.status();
        let body = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.error)
            .unwrap_or_else(|_| "unknown error".to_string());
        Self::error_for(status, body)
    }

    async fn decode<T: for<'de> serde::Deserialize<'de>>(
        res: reqwest::Response,
    ) -> std::result::Result<T, ClientError> {
        if res.status().is_success() {
            // A 2xx with a malformed payload is a server fault, not transport.
            return match res.json::<T>().await {
                Ok(decoded) => Ok(decoded),
                Err(err) => Err(ClientError::Server(format!("malformed payload: {err}"))),
            };
        }
        Err(Self::read_error(res).await)
    }

    pub async fn login(
        &self,
        payload: &LoginRequest,
    ) -> std::result::Result<LoginResponse, ClientError> {
        let res = self
            .http
            .post(self.endpoint("auth/login")?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    pub async fn signup(&self, payload: &SignupRequest) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .post(self.endpoint("auth/signup")?)
            .json(payload)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::read_error(res).await)
    }

    /// Fetches the profile behind a credential; used by session restore to
    /// validate a persisted token before trusting it.
    pub async fn me(&self, token: &Token) -> std::result::Result<UserView, ClientError> {
        let res = self
            .http
            .get(self.endpoint("auth/me")?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(ClientError::Transport)?;
        Self::decode(res).await
    }

    /// Remote session invalidation. Best-effort: logout stays local-first
    /// and the caller ignores a failure here.
    pub async fn logout(&self, token: &Token) -> std::result::Result<(), ClientError> {
        let res = self
            .http
            .post(self.endpoint("auth/logout")?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::read_error(res).await)
    }

    async fn get_list<T: for<'de> serde::Deserialize<'de>>(
        &self,
        path: &str,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<T>, ClientError> {
        let res = self
            .http
            .get(self.endpoint(path)?)
            .query(filters)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let envelope: ListEnvelope<T> = Self::decode(res).await?;
        Ok(envelope.into_items())
    }

    pub async fn earnings(
        &self,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<RawEarning>, ClientError> {
        self.get_list("earnings", filters, token).await
    }

    pub async fn expenses(
        &self,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<RawExpense>, ClientError> {
        self.get_list("expenses", filters, token).await
    }

    pub async fn auto_expenses(
        &self,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<RawAutoExpense>, ClientError> {
        self.get_list("autoExpenses", filters, token).await
    }

    pub async fn vehicles(
        &self,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<Vehicle>, ClientError> {
        self.get_list("vehicles", filters, token).await
    }

    pub async fn drivers(
        &self,
        filters: &CollectionFilters,
        token: &Token,
    ) -> std::result::Result<Vec<Driver>, ClientError> {
        self.get_list("drivers", filters, token).await
    }

    /// Deletes one record. Idempotent server-side; the contract is the HTTP
    /// status only, no body.
    pub async fn delete_record(
        &self,
        kind: TransactionKind,
        id: Uuid,
        token: &Token,
    ) -> std::result::Result<(), ClientError> {
        let collection = match kind {
            TransactionKind::Earning => "earnings",
            TransactionKind::Expense => "expenses",
            TransactionKind::AutoExpense => "autoExpenses",
        };
        let res = self
            .http
            .delete(self.endpoint(&format!("{collection}/{id}"))?)
            .bearer_auth(token.as_str())
            .send()
            .await
            .map_err(ClientError::Transport)?;
        if res.status().is_success() {
            return Ok(());
        }
        Err(Self::read_error(res).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_base_url() {
        let err = match ApiClient::new("not a url") {
            Err(err) => err,
            Ok(_) => panic!("expected a parse failure"),
        };
        assert!(matches!(err, AppError::BaseUrl(_)));
    }

    #[test]
    fn accepts_http_base_url() {
        assert!(ApiClient::new("http://127.0.0.1:3000").is_ok());
    }

    #[test]
    fn maps_statuses_onto_client_errors() {
        let body = || String::from("boom");
        assert!(matches!(
            ApiClient::error_for(StatusCode::UNAUTHORIZED, body()),
            ClientError::Unauthorized
        ));
        assert!(matches!(
            ApiClient::error_for(StatusCode::FORBIDDEN, body()),
            ClientError::Forbidden
        ));
        assert!(matches!(
            ApiClient::error_for(StatusCode::NOT_FOUND, body()),
            ClientError::NotFound
        ));
        assert!(matches!(
            ApiClient::error_for(StatusCode::CONFLICT, body()),
            ClientError::Conflict(_)
        ));
        assert!(matches!(
            ApiClient::error_for(StatusCode::UNPROCESSABLE_ENTITY, body()),
            ClientError::Validation(_)
        ));
        assert!(matches!(
            ApiClient::error_for(StatusCode::INTERNAL_SERVER_ERROR, body()),
            ClientError::Server(_)
        ));
    }
}
