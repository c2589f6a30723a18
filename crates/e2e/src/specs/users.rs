use anyhow::{Result, ensure};

use crate::context::TestContext;
use crate::ops::{search, users};
use shakedown_client::{Identity, Session, SessionConfig};

/// A provisioned account authenticates, and the server agrees on who it is.
pub async fn create_user_and_whoami(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let user = ctx.create_user(&s, "whoami").await?;

    let me = users::me(&s).await?;
    ensure!(me.principal() == "admin", "setup session should be admin, got {}", me.principal());

    s.switch_user(user.clone()).await?;
    let me = users::me(&s).await?;
    ensure!(
        me.principal() == user.name(),
        "expected {} after switch, got {}",
        user.name(),
        me.principal()
    );
    ensure!(!me.user.anon, "named user must not be anonymous");
    Ok(())
}

/// Switching identities back and forth is always attributed correctly.
pub async fn switching_identity_changes_whoami(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let alice = ctx.create_user(&s, "switch-a").await?;
    let bob = ctx.create_user(&s, "switch-b").await?;

    s.switch_user(alice.clone()).await?;
    ensure!(users::me(&s).await?.principal() == alice.name());

    s.switch_user(bob.clone()).await?;
    let me = users::me(&s).await?;
    ensure!(
        me.principal() == bob.name(),
        "requests after the switch must authenticate as {} only, got {}",
        bob.name(),
        me.principal()
    );

    s.switch_user(Identity::anonymous()).await?;
    let me = users::me(&s).await?;
    ensure!(me.user.anon, "expected anonymous attribution, got {me:?}");
    Ok(())
}

/// Users can update their own profile properties and read them back.
pub async fn update_own_profile_property(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let user = ctx.create_user(&s, "profiled").await?;

    s.switch_user(user.clone()).await?;
    let display_name = format!("Display {}", user.name());
    let res = users::update(
        &s,
        user.name(),
        &shakedown_client::Params::new().add("displayName", &display_name),
    )
    .await?;
    ensure!(
        res.is_success(),
        "profile update failed ({}): {}",
        res.status(),
        res.body()
    );

    let res = users::get(&s, user.name()).await?;
    ensure!(res.status() == 200, "user read failed ({})", res.status());
    ensure!(
        res.body().contains(&display_name),
        "expected updated property in {}",
        res.body()
    );
    Ok(())
}

/// A freshly provisioned account is visible to the user search.
pub async fn user_search_finds_new_account(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let user = ctx.create_user(&s, "findable").await?;

    let listing = search::users(&s, user.name()).await?;
    ensure!(
        listing.results.iter().any(|r| {
            r["rep:userId"] == user.name() || r["userid"] == user.name()
        }),
        "expected {} in user search results: {:?}",
        user.name(),
        listing.results
    );
    Ok(())
}

/// Password change takes effect: new password works, old one no longer
/// authenticates as the user.
pub async fn change_password(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let user = ctx.create_user(&s, "repass").await?;
    let old_password = user.password().unwrap_or_default().to_string();
    let new_password = "changed-pass-1";

    s.switch_user(user.clone()).await?;
    let res = users::change_password(&s, user.name(), &old_password, new_password).await?;
    ensure!(
        res.is_success(),
        "password change failed ({}): {}",
        res.status(),
        res.body()
    );

    let mut fresh = Session::new(SessionConfig::new(ctx.base_url()))?;
    fresh
        .switch_user(Identity::user(user.name(), new_password))
        .await?;
    let me = users::me(&fresh).await?;
    ensure!(me.principal() == user.name(), "new password should authenticate");

    fresh
        .switch_user(Identity::user(user.name(), &old_password))
        .await?;
    let res = fresh
        .execute_get(&fresh.url_for("/system/me"), &shakedown_client::Params::new())
        .await?;
    if res.is_success() {
        // Some deployments fall back to anonymous instead of rejecting.
        let me = res
            .json_as::<crate::types::MeInfo>()
            .map(|m| m.principal().to_string())
            .unwrap_or_default();
        ensure!(
            me != user.name(),
            "old password must not authenticate as {} anymore",
            user.name()
        );
    }
    Ok(())
}
