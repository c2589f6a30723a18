use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::identity::Identity;

/// Configuration for a [`Session`](crate::Session).
///
/// Replaces the scattered host/password globals of ad hoc test scripts with
/// one explicit struct. Deserializable so a CLI config file can carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Server root, e.g. `http://localhost:8080`.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// When set, identity switches log in once through the form-login
    /// endpoint and authenticate via the trusted cookie instead of sending
    /// Basic credentials on every request.
    #[serde(default)]
    pub trusted_auth: bool,

    /// Identity a fresh session starts with, before any `switch_user`.
    /// Defaults to admin: the administrative scripts assume it, and scenario
    /// code that cares always switches explicitly.
    #[serde(default = "Identity::admin")]
    pub default_identity: Identity,

    /// Connect/read timeout applied to every exchange.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            trusted_auth: false,
            default_identity: Identity::admin(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl SessionConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_trusted_auth(mut self, trusted_auth: bool) -> Self {
        self.trusted_auth = trusted_auth;
        self
    }

    pub fn with_default_identity(mut self, identity: Identity) -> Self {
        self.default_identity = identity;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
