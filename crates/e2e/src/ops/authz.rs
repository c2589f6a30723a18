use std::collections::HashMap;

use anyhow::{Context, Result};

use shakedown_client::{Params, Response, Session};

use crate::types::AclEntry;

/// `POST {path}.modifyAce.html` with explicit per-privilege settings,
/// e.g. `[("jcr:read", "granted"), ("jcr:write", "denied")]`.
pub async fn modify_ace(
    s: &Session,
    path: &str,
    principal: &str,
    settings: &[(&str, &str)],
) -> Result<Response> {
    let mut params = Params::new().add("principalId", principal);
    for (privilege, setting) in settings {
        params.push(format!("privilege@{privilege}"), *setting);
    }
    let url = s.url_for(&format!("{path}.modifyAce.html"));
    Ok(s.execute_post(&url, &params).await?)
}

/// Grant the listed privileges to `principal` on `path`.
pub async fn grant(
    s: &Session,
    path: &str,
    principal: &str,
    privileges: &[&str],
) -> Result<Response> {
    let settings: Vec<(&str, &str)> = privileges.iter().map(|p| (*p, "granted")).collect();
    modify_ace(s, path, principal, &settings).await
}

/// Deny the listed privileges to `principal` on `path`.
pub async fn deny(
    s: &Session,
    path: &str,
    principal: &str,
    privileges: &[&str],
) -> Result<Response> {
    let settings: Vec<(&str, &str)> = privileges.iter().map(|p| (*p, "denied")).collect();
    modify_ace(s, path, principal, &settings).await
}

/// `GET {path}.acl.json`, parsed into per-principal entries.
pub async fn acl(s: &Session, path: &str) -> Result<HashMap<String, AclEntry>> {
    let res = s
        .execute_get(&s.url_for(&format!("{path}.acl.json")), &Params::new())
        .await?;
    res.json_as::<HashMap<String, AclEntry>>()
        .with_context(|| format!("no ACL JSON at {path} ({}): {}", res.status(), res.body()))
}

/// `POST {path}.deleteAce.html` removing `principal`'s entry.
pub async fn delete_ace(s: &Session, path: &str, principal: &str) -> Result<Response> {
    let url = s.url_for(&format!("{path}.deleteAce.html"));
    Ok(s.execute_post(&url, &Params::new().add(":applyTo", principal))
        .await?)
}
