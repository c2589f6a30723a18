use std::path::Path;

use anyhow::{Context, Result, bail};

use shakedown_client::Session;
use shakedown_e2e::ops::files;

use crate::config;

pub async fn run_upload(server: Option<&str>, file: &Path, content_type: &str) -> Result<()> {
    let data =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let filename = file
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("no usable file name in {}", file.display()))?;

    let cfg = config::load()?;
    let s = Session::new(cfg.session_config(server))?;

    let res = files::upload(&s, filename, filename, data, content_type).await?;
    if !res.is_success() {
        bail!("upload failed ({}): {}", res.status(), res.body());
    }
    let id = files::content_id(&res, filename)?;
    println!("{}", files::content_path(&id));
    Ok(())
}
