use anyhow::{Context, Result};

use shakedown_client::{Params, Session};

use crate::types::Listing;

/// `GET /var/search/content.json?q=…`
pub async fn content(s: &Session, query: &str) -> Result<Listing> {
    run(s, "/var/search/content.json", Params::new().add("q", query)).await
}

/// `GET /var/search/users.json?username=…`
pub async fn users(s: &Session, username: &str) -> Result<Listing> {
    run(
        s,
        "/var/search/users.json",
        Params::new().add("username", username),
    )
    .await
}

/// `GET /var/search/sites.json?q=…`
pub async fn sites(s: &Session, query: &str) -> Result<Listing> {
    run(s, "/var/search/sites.json", Params::new().add("q", query)).await
}

async fn run(s: &Session, path: &str, params: Params) -> Result<Listing> {
    let res = s.execute_get(&s.url_for(path), &params).await?;
    res.json_as::<Listing>().with_context(|| {
        format!(
            "search at {path} returned non-JSON ({}): {}",
            res.status(),
            res.body()
        )
    })
}
