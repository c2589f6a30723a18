use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::fixtures;
use crate::ops::{authz, files, groups};
use shakedown_client::Params;

/// Pooled content round-trips bytes and declared content type.
pub async fn pooled_content_roundtrip(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let marker = ctx.unique("pool");
    let payload = fixtures::text_payload(&marker);

    let res = files::upload(&s, &marker, &marker, payload.clone(), "text/plain").await?;
    ensure!(
        res.status() == 201,
        "pool upload failed ({}): {}",
        res.status(),
        res.body()
    );
    let id = files::content_id(&res, &marker)?;

    let res = s
        .execute_get(&s.url_for(&files::content_path(&id)), &Params::new())
        .await?;
    ensure!(res.status() == 200, "pool read failed ({})", res.status());
    ensure!(res.bytes() == payload.as_slice(), "expected identical bytes back");
    let content_type = res.content_type().context("missing content type")?;
    ensure!(
        content_type.starts_with("text/plain"),
        "expected text/plain back, got {content_type}"
    );
    Ok(())
}

/// Members of a manager group reach private pooled content and its
/// membership listing.
pub async fn manager_group_reaches_members(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let member = ctx.create_user(&s, "pool-manager").await?;
    let group = ctx.create_group(&s, "pool-managers").await?;
    let res = groups::add_member(&s, &group, member.name()).await?;
    ensure!(res.is_success(), "member add failed ({})", res.status());

    let marker = ctx.unique("managed");
    let res = files::upload(
        &s,
        &marker,
        &marker,
        fixtures::text_payload(&marker),
        "text/plain",
    )
    .await?;
    ensure!(res.status() == 201, "pool upload failed ({})", res.status());
    let id = files::content_id(&res, &marker)?;
    let content_json = format!("{}.json", files::content_path(&id));

    // Initial assumption: a group member cannot reach the private item.
    s.switch_user(member.clone()).await?;
    let res = s.execute_get(&s.url_for(&content_json), &Params::new()).await?;
    ensure!(
        !res.is_success(),
        "non-viewer should not reach pooled content, got {}",
        res.status()
    );
    let res = files::members(&s, &id).await?;
    ensure!(
        !res.is_success(),
        "non-viewer should not reach the members listing, got {}",
        res.status()
    );

    s.switch_user(shakedown_client::Identity::admin()).await?;
    let res = files::set_members(&s, &id, &[(":manager", &group)]).await?;
    ensure!(res.is_success(), "manager add failed ({})", res.status());

    s.switch_user(member).await?;
    let res = s.execute_get(&s.url_for(&content_json), &Params::new()).await?;
    ensure!(
        res.status() == 200,
        "manager-group member should reach the content, got {}",
        res.status()
    );
    let res = files::members(&s, &id).await?;
    ensure!(
        res.status() == 200,
        "manager-group member should list members, got {}",
        res.status()
    );
    let body = res.json().context("members listing is not JSON")?;
    let managers = body["managers"].as_array().cloned().unwrap_or_default();
    ensure!(
        managers.iter().any(|m| m["groupid"] == group.as_str()),
        "expected {group} among managers: {body}"
    );
    Ok(())
}

/// Opening content to everyone does not expose its membership listing, and
/// non-managers cannot add themselves as viewers.
pub async fn nonmember_cannot_list_members(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let nonmember = ctx.create_user(&s, "pool-outsider").await?;

    let marker = ctx.unique("locked");
    let res = files::upload(
        &s,
        &marker,
        &marker,
        fixtures::text_payload(&marker),
        "text/plain",
    )
    .await?;
    ensure!(res.status() == 201, "pool upload failed ({})", res.status());
    let id = files::content_id(&res, &marker)?;
    let content_json = format!("{}.json", files::content_path(&id));

    s.switch_user(nonmember.clone()).await?;
    let res = s.execute_get(&s.url_for(&content_json), &Params::new()).await?;
    ensure!(!res.is_success(), "private content must be unreachable");

    // Make the content itself publicly viewable.
    s.switch_user(shakedown_client::Identity::admin()).await?;
    let res = authz::grant(&s, &files::content_path(&id), "everyone", &["jcr:read"]).await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    s.switch_user(nonmember.clone()).await?;
    let res = s.execute_get(&s.url_for(&content_json), &Params::new()).await?;
    ensure!(
        res.status() == 200,
        "public content should be readable, got {}",
        res.status()
    );
    let res = files::members(&s, &id).await?;
    ensure!(
        !res.is_success(),
        "members listing must stay private, got {}",
        res.status()
    );
    let res = files::set_members(&s, &id, &[(":viewer", nonmember.name())]).await?;
    ensure!(
        !res.is_success(),
        "outsider must not add viewers, got {}",
        res.status()
    );

    s.switch_user(shakedown_client::Identity::admin()).await?;
    let res = files::members(&s, &id).await?;
    let body = res.json().context("members listing is not JSON")?;
    let viewers = body["viewers"].as_array().cloned().unwrap_or_default();
    ensure!(
        !viewers.iter().any(|v| v["userid"] == nonmember.name()),
        "outsider must not have added itself: {body}"
    );
    Ok(())
}
