use anyhow::Result;

use shakedown_client::{Params, Response, Session};

/// `POST /system/userManager/group.create.json` with optional initial
/// members. Group names carry the `g-` prefix by convention.
pub async fn create(s: &Session, name: &str, members: &[&str]) -> Result<Response> {
    let params = Params::new()
        .add(":name", name)
        .add_each(":member", members.iter().map(|m| m.to_string()))
        .add("_charset_", "UTF-8");
    Ok(s
        .execute_post(&s.url_for("/system/userManager/group.create.json"), &params)
        .await?)
}

/// `POST /system/userManager/group/{name}.update.html` adding a member.
pub async fn add_member(s: &Session, name: &str, member: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/group/{name}.update.html"));
    Ok(s.execute_post(&url, &Params::new().add(":member", member))
        .await?)
}

/// `POST /system/userManager/group/{name}.update.html` removing a member.
pub async fn remove_member(s: &Session, name: &str, member: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/group/{name}.update.html"));
    Ok(s.execute_post(&url, &Params::new().add(":member@Delete", member))
        .await?)
}

/// `GET /system/userManager/group/{name}.json`
pub async fn get(s: &Session, name: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/group/{name}.json"));
    Ok(s.execute_get(&url, &Params::new()).await?)
}

/// `POST /system/userManager/group/{name}.update.html` setting joinability.
pub async fn set_joinable(s: &Session, name: &str, joinable: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/group/{name}.update.html"));
    Ok(s.execute_post(&url, &Params::new().add("sakai:joinable", joinable))
        .await?)
}
