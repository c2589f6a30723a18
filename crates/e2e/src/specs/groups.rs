use anyhow::{Result, ensure};

use crate::context::TestContext;
use crate::ops::groups;

/// Group created with an initial member lists that member.
pub async fn create_group_with_member(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let user = ctx.create_user(&s, "member").await?;

    let group = format!("g-{}", ctx.unique("with-member"));
    let res = groups::create(&s, &group, &[user.name()]).await?;
    ensure!(
        res.is_success(),
        "group create failed ({}): {}",
        res.status(),
        res.body()
    );

    let res = groups::get(&s, &group).await?;
    ensure!(res.status() == 200, "group read failed ({})", res.status());
    ensure!(
        res.body().contains(user.name()),
        "expected {} in group listing: {}",
        user.name(),
        res.body()
    );
    Ok(())
}

/// Membership updates are visible immediately, and removal sticks.
pub async fn add_and_remove_member(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let group = ctx.create_group(&s, "membership").await?;
    let user = ctx.create_user(&s, "joiner").await?;

    let res = groups::add_member(&s, &group, user.name()).await?;
    ensure!(res.is_success(), "member add failed ({})", res.status());

    let res = groups::get(&s, &group).await?;
    ensure!(
        res.body().contains(user.name()),
        "expected {} after add: {}",
        user.name(),
        res.body()
    );

    let res = groups::remove_member(&s, &group, user.name()).await?;
    ensure!(res.is_success(), "member remove failed ({})", res.status());

    let res = groups::get(&s, &group).await?;
    ensure!(
        !res.body().contains(user.name()),
        "expected {} gone after remove: {}",
        user.name(),
        res.body()
    );
    Ok(())
}
