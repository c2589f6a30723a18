use anyhow::{Context, Result};

use shakedown_client::{Params, Response, Session};

use crate::types::MeInfo;

/// `POST /system/userManager/user.create.html`
pub async fn create(s: &Session, name: &str, password: &str) -> Result<Response> {
    let params = Params::new()
        .add(":name", name)
        .add("pwd", password)
        .add("pwdConfirm", password)
        .add("_charset_", "UTF-8");
    Ok(s
        .execute_post(&s.url_for("/system/userManager/user.create.html"), &params)
        .await?)
}

/// `POST /system/userManager/user/{name}.update.html` with arbitrary props.
pub async fn update(s: &Session, name: &str, props: &Params) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/user/{name}.update.html"));
    Ok(s.execute_post(&url, props).await?)
}

/// `POST /system/userManager/user/{name}.changePassword.html`
pub async fn change_password(
    s: &Session,
    name: &str,
    old_password: &str,
    new_password: &str,
) -> Result<Response> {
    let params = Params::new()
        .add("oldPwd", old_password)
        .add("newPwd", new_password)
        .add("newPwdConfirm", new_password);
    let url = s.url_for(&format!(
        "/system/userManager/user/{name}.changePassword.html"
    ));
    Ok(s.execute_post(&url, &params).await?)
}

/// `POST /system/userManager/user/{name}.delete.html`
pub async fn delete(s: &Session, name: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/user/{name}.delete.html"));
    Ok(s.execute_post(&url, &Params::new().add(":applyTo", name))
        .await?)
}

/// `GET /system/userManager/user/{name}.json`
pub async fn get(s: &Session, name: &str) -> Result<Response> {
    let url = s.url_for(&format!("/system/userManager/user/{name}.json"));
    Ok(s.execute_get(&url, &Params::new()).await?)
}

/// `GET /system/me` — who the server believes the current identity is.
pub async fn me(s: &Session) -> Result<MeInfo> {
    let res = s
        .execute_get(&s.url_for("/system/me"), &Params::new())
        .await?;
    res.json_as::<MeInfo>()
        .with_context(|| format!("me endpoint returned non-JSON ({}): {}", res.status(), res.body()))
}
