use anyhow::{Context, Result};

use shakedown_client::{Params, Response, Session};

/// `POST /system/pool/createfile` — multipart upload into the content pool.
/// The response maps the upload label to the generated content id.
pub async fn upload(
    s: &Session,
    label: &str,
    filename: &str,
    data: Vec<u8>,
    content_type: &str,
) -> Result<Response> {
    Ok(s
        .execute_file_post(
            &s.url_for("/system/pool/createfile"),
            label,
            filename,
            data,
            content_type,
        )
        .await?)
}

/// Pull the generated content id for `label` out of an upload response.
pub fn content_id(res: &Response, label: &str) -> Result<String> {
    let body = res
        .json()
        .with_context(|| format!("upload response is not JSON: {}", res.body()))?;
    body[label]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("upload response has no id under {label:?}: {body}"))
}

/// Server path of a pooled content item.
pub fn content_path(id: &str) -> String {
    format!("/p/{id}")
}

/// `POST /p/{id}.members.html` — adjust viewer/manager membership, e.g.
/// `[(":viewer", "alice")]` or `[(":manager", "g-reviewers")]`.
pub async fn set_members(s: &Session, id: &str, changes: &[(&str, &str)]) -> Result<Response> {
    let mut params = Params::new();
    for (role, principal) in changes {
        params.push(*role, *principal);
    }
    let url = s.url_for(&format!("/p/{id}.members.html"));
    Ok(s.execute_post(&url, &params).await?)
}

/// `GET /p/{id}.members.json`
pub async fn members(s: &Session, id: &str) -> Result<Response> {
    let url = s.url_for(&format!("/p/{id}.members.json"));
    Ok(s.execute_get(&url, &Params::new()).await?)
}
