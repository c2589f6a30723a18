use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::ops::{groups, nodes, search, sites};
use shakedown_client::Params;

/// Site creation marks the node with the site resource type; its HTML view
/// is reachable (possibly through a redirect to the site template).
pub async fn create_site_and_read(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let name = ctx.unique("site");
    let site_path = format!("sites/{name}");

    let res = sites::create(&s, "sites", &name, &format!("Site {name}")).await?;
    ensure!(
        res.is_success(),
        "site create failed ({}): {}",
        res.status(),
        res.body()
    );

    let props = nodes::props(&s, &site_path).await?;
    ensure!(
        props["sling:resourceType"] == "sakai/site",
        "expected site resource type: {props}"
    );

    let res = s
        .execute_get_with_follow(&s.url_for(&format!("{site_path}.html")))
        .await?;
    ensure!(
        res.status() == 200,
        "site html view unreachable ({}): {}",
        res.status(),
        res.body()
    );
    Ok(())
}

/// A property written onto a site turns up in the site search.
pub async fn site_search_finds_updated_site(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let name = ctx.unique("searchable");
    let site_path = format!("sites/{name}");
    let res = sites::create(&s, "sites", &name, &format!("Site {name}")).await?;
    ensure!(res.is_success(), "site create failed ({})", res.status());

    let marker = ctx.unique("needle");
    let res = nodes::write(&s, &site_path, &Params::new().add("fish", &marker)).await?;
    ensure!(res.status() == 200, "site update failed ({})", res.status());

    let listing = search::sites(&s, &marker).await?;
    ensure!(
        listing
            .results
            .iter()
            .any(|r| r["jcr:path"].as_str().is_some_and(|p| p.ends_with(&name))),
        "expected /{site_path} in site search results: {:?}",
        listing.results
    );
    Ok(())
}

/// Joining through a joinable site group makes the user a site member.
pub async fn joinable_site_membership(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let group = ctx.create_group(&s, "site-join").await?;
    let res = groups::set_joinable(&s, &group, "yes").await?;
    ensure!(res.is_success(), "group joinable update failed ({})", res.status());
    let user = ctx.create_user(&s, "site-member").await?;

    let name = ctx.unique("joinable");
    let site_path = format!("sites/{name}");
    let res = sites::create(&s, "sites", &name, &format!("Site {name}")).await?;
    ensure!(res.is_success(), "site create failed ({})", res.status());
    let res = sites::set_groups(&s, &site_path, &[&group]).await?;
    ensure!(res.is_success(), "site group update failed ({})", res.status());
    let res = sites::set_joinable(&s, &site_path, "yes").await?;
    ensure!(res.is_success(), "site joinable update failed ({})", res.status());

    s.switch_user(user.clone()).await?;
    let res = sites::join(&s, &site_path, &group).await?;
    ensure!(
        res.is_success(),
        "join failed ({}): {}",
        res.status(),
        res.body()
    );

    let res = sites::members(&s, &site_path).await?;
    ensure!(res.status() == 200, "members listing failed ({})", res.status());
    let body = res.json().context("members listing is not JSON")?;
    ensure!(
        body["total"].as_u64().unwrap_or(0) >= 1,
        "expected at least one member: {body}"
    );
    let results = body["results"].as_array().cloned().unwrap_or_default();
    ensure!(
        results.iter().any(|r| r["rep:userId"] == user.name()),
        "expected {} among members: {body}",
        user.name()
    );
    Ok(())
}
