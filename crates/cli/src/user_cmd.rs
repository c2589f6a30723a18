use anyhow::{Result, bail};

use shakedown_client::Session;
use shakedown_e2e::ops::users;

use crate::config;

pub async fn run_create_user(server: Option<&str>, name: &str, password: &str) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let res = users::create(&s, name, password).await?;
    if !res.is_success() {
        bail!("user create failed ({}): {}", res.status(), res.body());
    }
    println!("Created user {name}");
    Ok(())
}

pub async fn run_delete_user(server: Option<&str>, name: &str) -> Result<()> {
    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let res = users::delete(&s, name).await?;
    if !res.is_success() {
        bail!("user delete failed ({}): {}", res.status(), res.body());
    }
    println!("Deleted user {name}");
    Ok(())
}
