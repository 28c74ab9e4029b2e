use serde::{Deserialize, Serialize};

/// Connection settings for the hosted backend project.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BackendConfig {
    /// Web API key; required for sign-in and sign-up.
    pub api_key: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub database_url: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            project_id: "agrisense-24467".into(),
            storage_bucket: "agrisense-24467.appspot.com".into(),
            database_url: "https://agrisense-24467-default-rtdb.firebaseio.com".into(),
            request_timeout_secs: 30,
        }
    }
}
