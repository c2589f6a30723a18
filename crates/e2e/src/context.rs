use anyhow::{Context, Result, ensure};
use uuid::Uuid;

use shakedown_client::{Identity, Session, SessionConfig};

use crate::ops::{groups, users};

/// Password given to every provisioned test account.
pub const TEST_PASSWORD: &str = "testuser";

/// Holds connection info for a test run and provisions per-actor sessions.
///
/// Each simulated actor gets its own [`Session`]; the context itself carries
/// no transport state, so it can be shared freely across parallel specs.
pub struct TestContext {
    config: SessionConfig,
}

impl TestContext {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            config: SessionConfig::new(base_url),
        }
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Fresh session in Basic-auth mode, starting as the configured default
    /// identity (admin unless overridden).
    pub fn session(&self) -> Result<Session> {
        Session::new(self.config.clone()).context("failed to build session")
    }

    /// Fresh session in trusted-auth mode against the same server.
    pub fn trusted_session(&self) -> Result<Session> {
        Session::new(self.config.clone().with_trusted_auth(true))
            .context("failed to build trusted session")
    }

    /// Collision-free resource name, in place of the timestamp suffixes ad
    /// hoc scripts tend to use.
    pub fn unique(&self, prefix: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        format!("{prefix}-{}", &id[..8])
    }

    /// Provision a user account through `s` (which must currently be an
    /// identity allowed to create users, normally admin) and hand back the
    /// identity to switch to.
    pub async fn create_user(&self, s: &Session, prefix: &str) -> Result<Identity> {
        let name = self.unique(prefix);
        let res = users::create(s, &name, TEST_PASSWORD).await?;
        ensure!(
            res.is_success(),
            "user create for {name} failed ({}): {}",
            res.status(),
            res.body()
        );
        Ok(Identity::user(name, TEST_PASSWORD))
    }

    /// Provision a group, returning its name (`g-` prefixed).
    pub async fn create_group(&self, s: &Session, prefix: &str) -> Result<String> {
        let name = format!("g-{}", self.unique(prefix));
        let res = groups::create(s, &name, &[]).await?;
        ensure!(
            res.is_success(),
            "group create for {name} failed ({}): {}",
            res.status(),
            res.body()
        );
        Ok(name)
    }
}
