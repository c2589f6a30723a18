use anyhow::{Context, Result, ensure};

use crate::context::TestContext;
use crate::ops::nodes;
use shakedown_client::Params;

/// `.save.html` snapshots a node and `.versions.json` lists the history.
pub async fn save_creates_version(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/versions/{}", ctx.unique("save"));

    let res = nodes::write(&s, &path, &Params::new().add("testproperty", "one")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());

    let res = nodes::save_version(&s, &path).await?;
    ensure!(
        res.status() == 200,
        "version save failed ({}): {}",
        res.status(),
        res.body()
    );

    let res = nodes::versions(&s, &path).await?;
    ensure!(
        res.status() == 200,
        "version listing failed ({}): {}",
        res.status(),
        res.body()
    );
    Ok(())
}

/// Saved versions freeze the node content they captured.
pub async fn version_history_freezes_content(ctx: &TestContext) -> Result<()> {
    let s = ctx.session()?;
    let path = format!("test/versions/{}", ctx.unique("history"));

    let res = nodes::write(&s, &path, &Params::new().add("testproperty", "version1")).await?;
    ensure!(res.status() == 201, "expected 201, got {}", res.status());
    let first = saved_version_name(&s, &path).await?;

    let res = nodes::write(&s, &path, &Params::new().add("testproperty", "version2")).await?;
    ensure!(res.status() == 200, "expected 200, got {}", res.status());
    let second = saved_version_name(&s, &path).await?;

    let res = nodes::write(&s, &path, &Params::new().add("testproperty", "version3")).await?;
    ensure!(res.status() == 200, "expected 200, got {}", res.status());

    let res = nodes::versions(&s, &path).await?;
    let history = res
        .json()
        .with_context(|| format!("version history is not JSON: {}", res.body()))?;
    ensure!(
        history["total"].as_u64().unwrap_or(0) >= 2,
        "expected at least the two saved versions in {history}"
    );

    for (version, expected) in [(first, "version1"), (second, "version2")] {
        let res = nodes::version_content(&s, &path, &version).await?;
        ensure!(
            res.status() == 200,
            "reading version {version} failed ({})",
            res.status()
        );
        let frozen = res
            .json()
            .with_context(|| format!("version {version} content is not JSON"))?;
        ensure!(
            frozen["testproperty"] == expected,
            "version {version} should be frozen at {expected:?}: {frozen}"
        );
    }
    Ok(())
}

async fn saved_version_name(
    s: &shakedown_client::Session,
    path: &str,
) -> Result<String> {
    let res = nodes::save_version(s, path).await?;
    ensure!(
        res.status() == 200,
        "version save failed ({}): {}",
        res.status(),
        res.body()
    );
    let body = res
        .json()
        .with_context(|| format!("version save response is not JSON: {}", res.body()))?;
    body["versionName"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("save response has no versionName: {body}"))
}
