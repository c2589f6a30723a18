use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known administrative account on a default deployment.
pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin";

/// A principal under which requests are issued.
///
/// `Anonymous` is a real sentinel, not an absent value: switching a session
/// to it drops all credentials and cookies so subsequent requests hit the
/// server unauthenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    Anonymous,
    User { name: String, password: String },
}

impl Identity {
    pub fn user(name: impl Into<String>, password: impl Into<String>) -> Self {
        Identity::User {
            name: name.into(),
            password: password.into(),
        }
    }

    /// The out-of-the-box admin account.
    pub fn admin() -> Self {
        Identity::user(ADMIN_USER, ADMIN_PASSWORD)
    }

    pub fn anonymous() -> Self {
        Identity::Anonymous
    }

    pub fn name(&self) -> &str {
        match self {
            Identity::Anonymous => "anonymous",
            Identity::User { name, .. } => name,
        }
    }

    pub fn password(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User { password, .. } => Some(password),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::User { name, .. } if name == ADMIN_USER)
    }

    /// Home folder of this principal on the server (`/~name`).
    pub fn home_path(&self) -> String {
        format!("/~{}", self.name())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_identity() {
        let admin = Identity::admin();
        assert!(admin.is_admin());
        assert!(!admin.is_anonymous());
        assert_eq!(admin.name(), "admin");
        assert_eq!(admin.password(), Some("admin"));
    }

    #[test]
    fn test_anonymous_has_no_credentials() {
        let anon = Identity::anonymous();
        assert!(anon.is_anonymous());
        assert_eq!(anon.name(), "anonymous");
        assert_eq!(anon.password(), None);
    }

    #[test]
    fn test_home_path() {
        let alice = Identity::user("alice", "hunter2");
        assert_eq!(alice.home_path(), "/~alice");
        assert_eq!(alice.to_string(), "alice");
    }
}
