use anyhow::{Context, Result, ensure};

use tokio::task::JoinSet;

use crate::context::TestContext;
use crate::ops::contacts;
use crate::types::Listing;
use shakedown_client::Session;

fn state_of(entry: &serde_json::Value) -> &str {
    entry["details"]["sakai:state"].as_str().unwrap_or("")
}

/// Invitation lifecycle: pending on the inviter, invited on the invitee,
/// accepted on both after acceptance.
pub async fn invite_and_accept(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let alice = ctx.create_user(&s, "inviter").await?;
    let nico = ctx.create_user(&s, "invitee").await?;

    s.switch_user(alice.clone()).await?;
    let res = contacts::invite(&s, alice.name(), nico.name()).await?;
    ensure!(
        res.is_success(),
        "invite failed ({}): {}",
        res.status(),
        res.body()
    );

    let pending: Listing = contacts::list(&s, "pending")
        .await?
        .json_as()
        .context("pending listing is not JSON")?;
    ensure!(pending.results.len() == 1, "expected a single pending request");
    ensure!(
        pending.results[0]["target"] == nico.name(),
        "expected {} as pending target: {:?}",
        nico.name(),
        pending.results[0]
    );
    ensure!(state_of(&pending.results[0]) == "PENDING");

    s.switch_user(nico.clone()).await?;
    let invited: Listing = contacts::list(&s, "invited")
        .await?
        .json_as()
        .context("invited listing is not JSON")?;
    ensure!(invited.results.len() == 1, "expected a single invitation");
    ensure!(state_of(&invited.results[0]) == "INVITED");

    let res = contacts::accept(&s, nico.name(), alice.name()).await?;
    ensure!(res.is_success(), "accept failed ({})", res.status());

    let accepted: Listing = contacts::list(&s, "accepted")
        .await?
        .json_as()
        .context("accepted listing is not JSON")?;
    ensure!(accepted.results.len() == 1);
    ensure!(state_of(&accepted.results[0]) == "ACCEPTED");

    s.switch_user(alice).await?;
    let accepted: Listing = contacts::list(&s, "accepted")
        .await?
        .json_as()
        .context("accepted listing is not JSON")?;
    ensure!(accepted.results.len() == 1);
    ensure!(state_of(&accepted.results[0]) == "ACCEPTED");
    Ok(())
}

/// A rejected invitation leaves the invitee's invited list empty.
pub async fn reject_invitation(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let alice = ctx.create_user(&s, "rejected").await?;
    let nico = ctx.create_user(&s, "rejector").await?;

    s.switch_user(alice.clone()).await?;
    let res = contacts::invite(&s, alice.name(), nico.name()).await?;
    ensure!(res.is_success(), "invite failed ({})", res.status());

    s.switch_user(nico.clone()).await?;
    let res = contacts::reject(&s, nico.name(), alice.name()).await?;
    ensure!(res.is_success(), "reject failed ({})", res.status());

    let invited: Listing = contacts::list(&s, "invited")
        .await?
        .json_as()
        .context("invited listing is not JSON")?;
    ensure!(
        invited.results.is_empty(),
        "expected no open invitations after reject: {:?}",
        invited.results
    );
    Ok(())
}

/// Distinct actors inviting the same user from parallel sessions all land;
/// one session per actor, joined before asserting.
pub async fn concurrent_invitations(ctx: &TestContext) -> Result<()> {
    const INVITERS: usize = 4;

    let mut s = ctx.session()?;
    let target = ctx.create_user(&s, "popular").await?;
    let mut inviters = Vec::new();
    for _ in 0..INVITERS {
        inviters.push(ctx.create_user(&s, "rival").await?);
    }

    let mut set = JoinSet::new();
    for inviter in inviters {
        let config = ctx.config().clone();
        let target_name = target.name().to_string();
        set.spawn(async move {
            let mut actor = Session::new(config)?;
            actor.switch_user(inviter.clone()).await?;
            let res = contacts::invite(&actor, inviter.name(), &target_name).await?;
            ensure!(
                res.is_success(),
                "invite from {} failed ({}): {}",
                inviter.name(),
                res.status(),
                res.body()
            );
            Ok::<(), anyhow::Error>(())
        });
    }
    while let Some(joined) = set.join_next().await {
        joined.context("inviter task panicked")??;
    }

    s.switch_user(target).await?;
    let invited: Listing = contacts::list(&s, "invited")
        .await?
        .json_as()
        .context("invited listing is not JSON")?;
    ensure!(
        invited.results.len() == INVITERS,
        "expected {INVITERS} invitations, got {}",
        invited.results.len()
    );
    Ok(())
}
