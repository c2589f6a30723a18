use anyhow::{Result, ensure};

use crate::context::TestContext;
use crate::ops::{authz, nodes};
use shakedown_client::{Identity, Params};

async fn private_node(ctx: &TestContext, s: &shakedown_client::Session) -> Result<String> {
    let path = format!("test/authz/{}", ctx.unique("node"));
    let res = nodes::write(s, &path, &Params::new().add("secret", "fish")).await?;
    ensure!(res.status() == 201, "node create failed ({})", res.status());
    Ok(path)
}

/// A user with `jcr:read` denied gets 404 for the node's `.json`.
pub async fn read_denied_user_gets_not_found(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let path = private_node(ctx, &s).await?;
    let user = ctx.create_user(&s, "denied-reader").await?;

    let res = authz::deny(&s, &path, user.name(), &["jcr:read"]).await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    s.switch_user(user).await?;
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(
        res.status() == 404,
        "expected read denial to surface as 404, got {}",
        res.status()
    );
    Ok(())
}

/// A user with read granted but write denied can GET but not POST;
/// the write rejection is a 500 carrying the access exception.
pub async fn write_denied_user_gets_server_error(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let path = private_node(ctx, &s).await?;
    let user = ctx.create_user(&s, "denied-writer").await?;

    let res = authz::modify_ace(
        &s,
        &path,
        user.name(),
        &[("jcr:read", "granted"), ("jcr:write", "denied")],
    )
    .await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    s.switch_user(user.clone()).await?;
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(res.status() == 200, "expected read grant to allow GET, got {}", res.status());

    let res = s
        .execute_post(
            &s.url_for(&format!("{path}.html")),
            &Params::new().add(user.name(), "testset"),
        )
        .await?;
    ensure!(
        res.status() == 500,
        "expected write denial to surface as 500, got {}",
        res.status()
    );
    ensure!(
        res.body().contains("AccessDeniedException"),
        "expected an access denial in the error body: {}",
        res.body()
    );
    Ok(())
}

/// Identity switching measurably changes authorization: anonymous is locked
/// out of a node until `everyone` is granted read.
pub async fn everyone_grant_opens_node_to_anonymous(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let path = private_node(ctx, &s).await?;

    let res = authz::deny(&s, &path, "everyone", &["jcr:read"]).await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    // Admin still reads it; anonymous must not.
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(res.status() == 200, "admin read failed ({})", res.status());

    s.switch_user(Identity::anonymous()).await?;
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(
        !res.is_success(),
        "anonymous should not read a denied node, got {}",
        res.status()
    );

    s.switch_user(Identity::admin()).await?;
    let res = authz::grant(&s, &path, "everyone", &["jcr:read"]).await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    s.switch_user(Identity::anonymous()).await?;
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(
        res.status() == 200,
        "everyone grant should open the node, got {}",
        res.status()
    );
    Ok(())
}

/// `.acl.json` reflects a modified ACE, privilege by privilege.
pub async fn acl_reflects_modified_ace(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = private_node(ctx, &s).await?;
    let user = ctx.create_user(&s, "acl-subject").await?;

    let res = authz::modify_ace(
        &s,
        &path,
        user.name(),
        &[("jcr:read", "granted"), ("jcr:write", "denied")],
    )
    .await?;
    ensure!(res.is_success(), "ace update failed ({})", res.status());

    let acl = authz::acl(&s, &path).await?;
    let entry = acl
        .get(user.name())
        .ok_or_else(|| anyhow::anyhow!("no ACE for {} in {acl:?}", user.name()))?;
    ensure!(
        entry.granted.iter().any(|p| p == "jcr:read"),
        "expected jcr:read granted: {entry:?}"
    );
    ensure!(
        entry.denied.iter().any(|p| p == "jcr:write"),
        "expected jcr:write denied: {entry:?}"
    );
    ensure!(
        !entry.denied.iter().any(|p| p == "jcr:read"),
        "jcr:read must not also be denied: {entry:?}"
    );

    let res = authz::delete_ace(&s, &path, user.name()).await?;
    ensure!(res.is_success(), "ace delete failed ({})", res.status());
    let acl = authz::acl(&s, &path).await?;
    ensure!(
        !acl.contains_key(user.name()),
        "expected ACE for {} gone after delete: {acl:?}",
        user.name()
    );
    Ok(())
}
