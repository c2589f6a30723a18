use anyhow::Result;

use shakedown_client::{Params, Response, Session};

/// `POST /~{me}/contacts/{other}.invite.html` — ask `other` to connect.
/// `me` must match the current identity; the server derives the inviter
/// from the authenticated principal.
pub async fn invite(s: &Session, me: &str, other: &str) -> Result<Response> {
    let params = Params::new()
        .add("sakai:types", "friend")
        .add("_charset_", "UTF-8");
    let url = s.url_for(&format!("/~{me}/contacts/{other}.invite.html"));
    Ok(s.execute_post(&url, &params).await?)
}

/// `POST /~{me}/contacts/{other}.accept.html`
pub async fn accept(s: &Session, me: &str, other: &str) -> Result<Response> {
    let url = s.url_for(&format!("/~{me}/contacts/{other}.accept.html"));
    Ok(s.execute_post(&url, &Params::new()).await?)
}

/// `POST /~{me}/contacts/{other}.reject.html`
pub async fn reject(s: &Session, me: &str, other: &str) -> Result<Response> {
    let url = s.url_for(&format!("/~{me}/contacts/{other}.reject.html"));
    Ok(s.execute_post(&url, &Params::new()).await?)
}

/// `GET /var/contacts/{state}.json` — listings for the current identity;
/// state is `pending`, `invited`, `accepted`, or `all`.
pub async fn list(s: &Session, state: &str) -> Result<Response> {
    let url = s.url_for(&format!("/var/contacts/{state}.json"));
    Ok(s.execute_get(&url, &Params::new().add("page", "0").add("items", "25"))
        .await?)
}
