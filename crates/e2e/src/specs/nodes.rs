use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::fixtures;
use crate::ops::nodes;
use shakedown_client::Params;

/// POST a new node with properties → 201; its `.json` echoes them back.
pub async fn create_node_with_properties(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/nodes/{}", ctx.unique("create"));

    let res = nodes::write(&s, &path, &fixtures::node_properties("create")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());

    let props = nodes::props(&s, &path).await?;
    ensure!(
        props["title"].as_str().is_some_and(|t| t.contains("create")),
        "expected posted title in {props}"
    );
    ensure!(
        props["description"] == "fixture content",
        "expected posted description in {props}"
    );
    Ok(())
}

/// A fresh user can create a node in their own space and read it back.
pub async fn user_creates_node_in_own_space(ctx: &TestContext) -> Result<()> {
    let mut s = ctx.session()?;
    let user = ctx.create_user(&s, "homeowner").await?;

    s.switch_user(user.clone()).await?;
    let path = format!("{}/private/testnode", user.home_path());
    let res = nodes::write(&s, &path, &Params::new().add("foo", "bar")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());

    let props = nodes::props(&s, &path).await?;
    ensure!(props["foo"] == "bar", "expected posted property back: {props}");
    Ok(())
}

/// A second POST to the same path updates (200) and merges properties.
pub async fn update_node_keeps_existing_properties(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/nodes/{}", ctx.unique("update"));

    let res = nodes::write(&s, &path, &Params::new().add("a", "foo")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());

    let res = nodes::write(&s, &path, &Params::new().add("b", "bar")).await?;
    ensure!(res.status() == 200, "expected 200 on update, got {}", res.status());

    let props = nodes::props(&s, &path).await?;
    ensure!(props["a"] == "foo", "expected property a to survive: {props}");
    ensure!(props["b"] == "bar", "expected property b to be set: {props}");
    Ok(())
}

/// Uploaded file child comes back byte-identical with its declared type.
pub async fn file_node_body_roundtrip(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let marker = ctx.unique("file");
    let path = format!("test/files/{marker}");
    let document = fixtures::html_document(&marker);

    let res = nodes::upload_file(
        &s,
        &path,
        "file",
        "file",
        document.clone().into_bytes(),
        "text/html",
    )
    .await?;
    ensure!(res.is_success(), "upload failed ({}): {}", res.status(), res.body());

    let res = s
        .execute_get(&s.url_for(&format!("{path}/file")), &Params::new())
        .await?;
    ensure!(res.status() == 200, "expected 200, got {}", res.status());
    ensure!(res.body() == document, "expected body back unmodified");
    let content_type = res.content_type().context("missing content type")?;
    ensure!(
        content_type.starts_with("text/html"),
        "expected text/html, got {content_type}"
    );
    Ok(())
}

/// The delete operation removes the node for good.
pub async fn delete_removes_node(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/nodes/{}", ctx.unique("delete"));

    let res = nodes::write(&s, &path, &Params::new().add("doomed", "yes")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());

    let res = nodes::delete(&s, &path).await?;
    ensure!(res.is_success(), "delete failed ({}): {}", res.status(), res.body());

    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(
        res.status() == 404,
        "expected 404 after delete, got {}",
        res.status()
    );
    Ok(())
}

/// Reading a node that was never created is not a success.
pub async fn missing_node_is_not_found(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/nodes/{}", ctx.unique("missing"));
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    ensure!(
        res.status() == 404,
        "expected 404 for {path}, got {}",
        res.status()
    );
    Ok(())
}
