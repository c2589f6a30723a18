//! Typed views of recurring server payloads. Everything else is poked at
//! through `serde_json::Value`.

use serde::Deserialize;

/// `GET /system/me` — who the server thinks we are.
#[derive(Debug, Clone, Deserialize)]
pub struct MeInfo {
    pub user: MeUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MeUser {
    #[serde(default)]
    pub userid: Option<String>,
    #[serde(default)]
    pub anon: bool,
    #[serde(default, rename = "superUser")]
    pub super_user: bool,
}

impl MeInfo {
    /// Effective principal name; the anonymous user has no `userid`.
    pub fn principal(&self) -> &str {
        self.user.userid.as_deref().unwrap_or("anonymous")
    }
}

/// Search-style listing envelope: `{"total": N, "results": [...]}`.
/// Message box and contact listings use the same shape.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub results: Vec<serde_json::Value>,
}

/// One entry of `{path}.acl.json`: per-principal granted/denied privileges.
#[derive(Debug, Clone, Deserialize)]
pub struct AclEntry {
    #[serde(default)]
    pub granted: Vec<String>,
    #[serde(default)]
    pub denied: Vec<String>,
}
