use anyhow::{Context, Result};

use shakedown_client::{Params, Response, Session};

/// `POST {path}` — Sling-style node write: 201 creates, 200 updates.
pub async fn write(s: &Session, path: &str, props: &Params) -> Result<Response> {
    Ok(s.execute_post(&s.url_for(path), props).await?)
}

/// `GET {path}.json`, parsed. Errors when the node is unreadable or the body
/// is not JSON, since callers asking for properties expect both.
pub async fn props(s: &Session, path: &str) -> Result<serde_json::Value> {
    let res = s
        .execute_get(&s.url_for(&format!("{path}.json")), &Params::new())
        .await?;
    res.json().with_context(|| {
        format!(
            "no JSON properties at {path} ({}): {}",
            res.status(),
            res.body()
        )
    })
}

/// `POST {path}` with `:operation=delete`.
pub async fn delete(s: &Session, path: &str) -> Result<Response> {
    Ok(s
        .execute_post(&s.url_for(path), &Params::new().add(":operation", "delete"))
        .await?)
}

/// Multipart upload of a file child node under `path`; the field name
/// becomes the child node name.
pub async fn upload_file(
    s: &Session,
    path: &str,
    field_name: &str,
    filename: &str,
    data: Vec<u8>,
    content_type: &str,
) -> Result<Response> {
    Ok(s
        .execute_file_post(&s.url_for(path), field_name, filename, data, content_type)
        .await?)
}

/// `POST {path}.save.html` — snapshot the node into its version history.
pub async fn save_version(s: &Session, path: &str) -> Result<Response> {
    Ok(s
        .execute_post(&s.url_for(&format!("{path}.save.html")), &Params::new())
        .await?)
}

/// `GET {path}.versions.json` — the version history listing.
pub async fn versions(s: &Session, path: &str) -> Result<Response> {
    Ok(s
        .execute_get(&s.url_for(&format!("{path}.versions.json")), &Params::new())
        .await?)
}

/// `GET {path}.version.,{name},.json` — one frozen version's content.
pub async fn version_content(s: &Session, path: &str, version: &str) -> Result<Response> {
    let url = s.url_for(&format!("{path}.version.,{version},.json"));
    Ok(s.execute_get(&url, &Params::new()).await?)
}
