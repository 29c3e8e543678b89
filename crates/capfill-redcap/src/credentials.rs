//! API credentials for a REDCap project.

use std::path::Path;

use serde::Deserialize;

use crate::RedcapError;

/// Contents of the local secrets file.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiCredentials {
    pub api_key: String,
    pub url: String,
}

impl ApiCredentials {
    /// Load and validate credentials from a JSON secrets file.
    pub fn from_file(path: &Path) -> Result<Self, RedcapError> {
        let raw = std::fs::read_to_string(path).map_err(|source| RedcapError::SecretsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let credentials: ApiCredentials = serde_json::from_str(&raw)?;
        credentials.validate()?;
        Ok(credentials)
    }

    /// Both values must be filled in before any network call is attempted.
    pub fn validate(&self) -> Result<(), RedcapError> {
        if self.api_key.is_empty() || self.url.is_empty() {
            return Err(RedcapError::IncompleteSecrets);
        }
        Ok(())
    }
}
