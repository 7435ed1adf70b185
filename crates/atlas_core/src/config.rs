//! Global SDK configuration and per-call common parameters
//!
//! [`GlobalConfig`] is an explicit, immutable value handed to the executor at
//! call time; it is never stored in a process-wide singleton. Its fields are
//! shallow-merged *under* each call's parameters before validation, so caller
//! values always win.

use serde::{Deserialize, Serialize};
use url::Url;

/// Process-wide default configuration for all services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// API key appended to every request as the `key` query parameter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL shared by all services
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_base_url: Option<String>,

    /// Per-service base URL override (takes precedence over the common one)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_service_base_url: Option<String>,

    /// Preferred response language (IETF tag, e.g. "en-GB")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// Connection timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

const fn default_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "atlas-sdk/0.1".to_string()
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            common_base_url: None,
            custom_service_base_url: None,
            language: None,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl GlobalConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some("test-key".to_string()),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be greater than 0".to_string());
        }

        if self.user_agent.is_empty() {
            return Err("user_agent must not be empty".to_string());
        }

        Ok(())
    }
}

/// Per-call parameters shared by every service
///
/// Serialized with the wire-level field names so the declarative schemas can
/// address them directly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonParams {
    /// API key for this call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL shared by all services
    #[serde(rename = "commonBaseURL", skip_serializing_if = "Option::is_none")]
    pub common_base_url: Option<String>,

    /// Per-service base URL override
    #[serde(rename = "customServiceBaseURL", skip_serializing_if = "Option::is_none")]
    pub custom_service_base_url: Option<String>,

    /// Preferred response language
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl CommonParams {
    /// Fill unset fields from the global configuration (caller values win)
    pub fn merge(&mut self, config: &GlobalConfig) {
        if self.api_key.is_none() {
            self.api_key = config.api_key.clone();
        }
        if self.common_base_url.is_none() {
            self.common_base_url = config.common_base_url.clone();
        }
        if self.custom_service_base_url.is_none() {
            self.custom_service_base_url = config.custom_service_base_url.clone();
        }
        if self.language.is_none() {
            self.language = config.language.clone();
        }
    }

    /// The base URL this call resolves to, trailing slash stripped
    ///
    /// The per-service override wins over the common base URL. Returns `None`
    /// when neither is set; validation rejects that before any request is
    /// built.
    #[must_use]
    pub fn resolved_base_url(&self) -> Option<&str> {
        self.custom_service_base_url
            .as_deref()
            .or(self.common_base_url.as_deref())
            .map(|base| base.trim_end_matches('/'))
    }

    /// Append the `key` and `language` query parameters
    pub fn append_query(&self, url: &mut Url) {
        let mut query = url.query_pairs_mut();
        if let Some(key) = &self.api_key {
            query.append_pair("key", key);
        }
        if let Some(language) = &self.language {
            query.append_pair("language", language);
        }
    }
}

/// Shallow merge of global defaults under a call's parameters
///
/// Implemented by every service's parameter struct; the executor invokes it
/// before validation.
pub trait MergeGlobalDefaults {
    /// Fill unset common fields from `config`; caller-supplied values win
    fn merge_defaults(&mut self, config: &GlobalConfig);
}
