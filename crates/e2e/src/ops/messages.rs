use anyhow::Result;

use shakedown_client::{Params, Response, Session};

/// Per-user message store path.
pub fn store_path(user: &str) -> String {
    format!("/~{user}/message")
}

/// `POST {store}.create.html` — draft a message to `to`. The response JSON
/// carries the generated message id under `"id"`.
pub async fn create(s: &Session, from: &str, to: &str, message_type: &str) -> Result<Response> {
    let params = Params::new()
        .add("sakai:type", message_type)
        .add("sakai:to", to)
        .add("sakai:messagebox", "drafts")
        .add("sakai:sendstate", "pending")
        .add("_charset_", "UTF-8");
    let url = s.url_for(&format!("{}.create.html", store_path(from)));
    Ok(s.execute_post(&url, &params).await?)
}

/// `POST {store}/{id}.html` moving the draft to the outbox, which queues it
/// for delivery.
pub async fn send(s: &Session, from: &str, id: &str) -> Result<Response> {
    let params = Params::new()
        .add("sakai:messagebox", "outbox")
        .add("sakai:sendstate", "pending");
    let url = s.url_for(&format!("{}/{id}.html", store_path(from)));
    Ok(s.execute_post(&url, &params).await?)
}

/// `GET {store}/{id}.json` — one message's state.
pub async fn get(s: &Session, user: &str, id: &str) -> Result<Response> {
    let url = s.url_for(&format!("{}/{id}.json", store_path(user)));
    Ok(s.execute_get(&url, &Params::new()).await?)
}

/// `GET /var/message/box.json?box={box}` — list one message box of the
/// current identity.
pub async fn list_box(s: &Session, message_box: &str) -> Result<Response> {
    let params = Params::new()
        .add("box", message_box)
        .add("items", "25")
        .add("page", "0");
    Ok(s
        .execute_get(&s.url_for("/var/message/box.json"), &params)
        .await?)
}

/// `GET /var/message/box.json?box=all`
pub async fn list_all(s: &Session) -> Result<Response> {
    list_box(s, "all").await
}
