//! Durable client-side state.
//!
//! Exactly two things survive a restart: the session credential and the
//! first-run welcome flag. Nothing else is cached locally; collections are
//! refetched on every mount.

use std::{fs, path::Path};

use api_types::auth::Token;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LocalState {
    pub credential: Option<Token>,
    pub email: Option<String>,
    pub seen_welcome: bool,
}

impl LocalState {
    pub fn load(path: &str) -> Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Atomic save: write a sibling tmp file, then rename over the target.
    pub fn save(&self, path: &str) -> Result<()> {
        let target = Path::new(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(self)?;
        let tmp = target.with_extension("tmp");
        fs::write(&tmp, payload)?;
        match fs::rename(&tmp, target) {
            Ok(()) => Ok(()),
            Err(_) => {
                fs::copy(&tmp, target)?;
                let _ = fs::remove_file(&tmp);
                Ok(())
            }
        }
    }
}
