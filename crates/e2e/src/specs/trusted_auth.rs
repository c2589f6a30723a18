use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::ops::users;

/// Trusted-mode switch logs in once and the issued cookie carries
/// authentication from then on.
pub async fn login_issues_trusted_cookie(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let user = ctx.create_user(&s, "trusted").await?;

    let mut t = ctx.trusted_session()?;
    t.switch_user(user.clone()).await?;
    ensure!(
        t.trusted_cookie().is_some(),
        "expected a trusted cookie after login"
    );

    let me = users::me(&t).await?;
    ensure!(
        me.principal() == user.name(),
        "trusted cookie should authenticate as {}, got {}",
        user.name(),
        me.principal()
    );
    Ok(())
}

/// Switching identities rotates the trusted cookie — the previous identity's
/// token is never reused — while the underlying jar (and with it any
/// server-side session continuity) survives the switch.
pub async fn cookie_rotates_but_session_continues(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let alice = ctx.create_user(&s, "trust-a").await?;
    let bob = ctx.create_user(&s, "trust-b").await?;

    let mut t = ctx.trusted_session()?;
    t.switch_user(alice.clone()).await?;
    let alice_cookie = t
        .trusted_cookie()
        .context("no trusted cookie after first login")?
        .to_string();

    t.switch_user(bob.clone()).await?;
    let bob_cookie = t
        .trusted_cookie()
        .context("no trusted cookie after second login")?
        .to_string();

    ensure!(
        alice_cookie != bob_cookie,
        "trusted cookie must rotate on identity switch"
    );

    let me = users::me(&t).await?;
    ensure!(
        me.principal() == bob.name(),
        "requests after the switch must authenticate as {} only, got {}",
        bob.name(),
        me.principal()
    );
    Ok(())
}
