use anyhow::{Context, Result, bail};

use shakedown_client::{Params, Session};
use shakedown_e2e::ops::{nodes, search};

use crate::config;

pub async fn run_get(server: Option<&str>, path: &str) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let props = nodes::props(&s, path).await?;
    println!("{}", serde_json::to_string_pretty(&props)?);
    Ok(())
}

pub async fn run_set(server: Option<&str>, path: &str, props: &[String]) -> Result<()> {
    if props.is_empty() {
        bail!("no properties given; expected key=value arguments");
    }
    let mut params = Params::new();
    for prop in props {
        let (key, value) = prop
            .split_once('=')
            .with_context(|| format!("malformed property {prop:?}; expected key=value"))?;
        params.push(key, value);
    }

    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let res = nodes::write(&s, path, &params).await?;
    if !res.is_success() {
        bail!("node write failed ({}): {}", res.status(), res.body());
    }
    println!("Wrote {} propert{} to {path}", params.len(), plural_y(params.len()));
    Ok(())
}

fn plural_y(n: usize) -> &'static str {
    if n == 1 { "y" } else { "ies" }
}

pub async fn run_search(server: Option<&str>, query: &str) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let listing = search::content(&s, query).await?;
    for result in &listing.results {
        if let Some(path) = result["jcr:path"].as_str() {
            println!("{path}");
        }
    }
    eprintln!("{} result(s)", listing.total);
    Ok(())
}
