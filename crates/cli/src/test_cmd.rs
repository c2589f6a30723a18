use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Args;

use shakedown_e2e::{context::TestContext, runner};

use crate::config;

#[derive(Args)]
pub struct TestArgs {
    /// Filter specs by substring
    #[arg(long)]
    pub filter: Option<String>,
}

pub async fn run_test(server: Option<&str>, args: TestArgs) -> Result<()> {
    let cfg = config::load()?;
    let session_config = cfg.session_config(server);
    eprintln!("Running E2E specs against {}", session_config.base_url);

    let ctx = Arc::new(TestContext::with_config(session_config));
    let suite = runner::run_all(ctx, args.filter.as_deref()).await;

    for r in &suite.results {
        let icon = if r.passed { "PASS" } else { "FAIL" };
        let dur = format!("{:.0}ms", r.duration.as_secs_f64() * 1000.0);
        eprintln!("  {icon} {name} ({dur})", name = r.name);
        if let Some(ref err) = r.error {
            eprintln!("       {err}");
        }
    }
    eprintln!("{} passed, {} failed, {} total", suite.passed(), suite.failed(), suite.total());

    if suite.failed() > 0 {
        bail!("{} of {} specs failed", suite.failed(), suite.total());
    }
    Ok(())
}
