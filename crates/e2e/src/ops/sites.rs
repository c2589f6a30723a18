use anyhow::Result;

use shakedown_client::{Params, Response, Session};

/// `POST {container}/{name}` — create a site node. Sites are ordinary nodes
/// marked with the site resource type; the server attaches its site
/// behaviors to that type.
pub async fn create(s: &Session, container: &str, name: &str, title: &str) -> Result<Response> {
    let params = Params::new()
        .add("sling:resourceType", "sakai/site")
        .add("sakai:joinable", "no")
        .add("name", title)
        .add("_charset_", "UTF-8");
    let path = format!("{}/{}", container.trim_end_matches('/'), name);
    Ok(s.execute_post(&s.url_for(&path), &params).await?)
}

/// `POST {site}` updating the authorizable groups associated to the site.
pub async fn set_groups(s: &Session, site_path: &str, groups: &[&str]) -> Result<Response> {
    let params = Params::new().add_each("sakai:authorizables", groups.iter().map(|g| g.to_string()));
    Ok(s.execute_post(&s.url_for(site_path), &params).await?)
}

/// `POST {site}` toggling joinability (`yes`, `no`, `withauth`).
pub async fn set_joinable(s: &Session, site_path: &str, joinable: &str) -> Result<Response> {
    let params = Params::new().add("sakai:joinable", joinable);
    Ok(s.execute_post(&s.url_for(site_path), &params).await?)
}

/// `POST {site}.join.html` — join through one of the site's groups.
pub async fn join(s: &Session, site_path: &str, group: &str) -> Result<Response> {
    let params = Params::new().add("targetGroup", group);
    let url = s.url_for(&format!("{site_path}.join.html"));
    Ok(s.execute_post(&url, &params).await?)
}

/// `GET {site}.members.json`
pub async fn members(s: &Session, site_path: &str) -> Result<Response> {
    let url = s.url_for(&format!("{site_path}.members.json"));
    Ok(s.execute_get(&url, &Params::new()).await?)
}
