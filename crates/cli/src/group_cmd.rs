use anyhow::{Result, bail};

use shakedown_client::Session;
use shakedown_e2e::ops::groups;

use crate::config;

pub async fn run_create_group(server: Option<&str>, name: &str, members: &[String]) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let members: Vec<&str> = members.iter().map(String::as_str).collect();
    let res = groups::create(&s, name, &members).await?;
    if !res.is_success() {
        bail!("group create failed ({}): {}", res.status(), res.body());
    }
    println!("Created group {name}");
    Ok(())
}

pub async fn run_add_member(server: Option<&str>, group: &str, member: &str) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let res = groups::add_member(&s, group, member).await?;
    if !res.is_success() {
        bail!("member add failed ({}): {}", res.status(), res.body());
    }
    println!("Added {member} to {group}");
    Ok(())
}
