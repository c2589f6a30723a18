use std::sync::Arc;

use reqwest::cookie::Jar;
use reqwest::multipart;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::ClientError;
use crate::identity::Identity;
use crate::params::Params;
use crate::response::Response;

/// Form-login endpoint used in trusted-auth mode.
pub const FORM_LOGIN_PATH: &str = "/system/sling/formlogin";

/// Cookie the server issues on a successful form login. Once present, it
/// stands in for Basic credentials on every subsequent request.
pub const TRUSTED_AUTH_COOKIE: &str = "sakai-trusted-authn";

const REDIRECT_LIMIT: usize = 10;

/// Stateful HTTP session against one server.
///
/// Owns the current [`Identity`] and the transport cookie jar. One instance
/// serves one simulated actor; calls on a single instance must not be
/// interleaved (spawn one session per concurrent actor instead — sessions are
/// cheap and fully independent).
///
/// Two auth modes:
/// - **Basic** (default): every request carries the current identity's
///   credentials. `switch_user` swaps the whole transport, so no cookie or
///   connection state leaks between identities.
/// - **Trusted** (`SessionConfig::trusted_auth`): `switch_user` performs one
///   form login and the issued trusted cookie authenticates subsequent
///   requests. The jar deliberately survives switches, so server tracking
///   cookies keep their continuity across identities; only the trusted
///   cookie itself rotates.
#[derive(Debug)]
pub struct Session {
    http: reqwest::Client,
    jar: Arc<Jar>,
    base: reqwest::Url,
    config: SessionConfig,
    identity: Identity,
    trusted_cookie: Option<String>,
}

impl Session {
    /// Pure local setup: validates the base URL and builds the transport.
    /// No network traffic happens until the first request.
    pub fn new(config: SessionConfig) -> Result<Self, ClientError> {
        let base =
            reqwest::Url::parse(&config.base_url).map_err(|e| ClientError::InvalidBaseUrl {
                url: config.base_url.clone(),
                reason: e.to_string(),
            })?;
        let jar = Arc::new(Jar::default());
        let http = build_transport(&config, jar.clone())?;
        let identity = config.default_identity.clone();
        Ok(Self {
            http,
            jar,
            base,
            config,
            identity,
            trusted_cookie: None,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Identity the next request will authenticate as.
    pub fn current_identity(&self) -> &Identity {
        &self.identity
    }

    /// Trusted cookie captured by the last trusted-mode login, if any.
    pub fn trusted_cookie(&self) -> Option<&str> {
        self.trusted_cookie.as_deref()
    }

    /// Absolute URL for a server-relative path. Pure: depends only on the
    /// configured base URL and the path, never on identity state.
    /// Already-absolute inputs pass through unchanged.
    pub fn url_for(&self, path: &str) -> String {
        if is_absolute(path) {
            return path.to_string();
        }
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make subsequent requests authenticate as `identity`.
    ///
    /// Basic mode is purely local: the transport (and its cookie jar) is
    /// replaced, then requests carry the new credentials. Trusted mode keeps
    /// the jar and performs one form login; a rejected login is not an error
    /// here — it surfaces as non-2xx on the next request, matching Basic
    /// mode, where a bogus password is also only discovered on use.
    pub async fn switch_user(&mut self, identity: Identity) -> Result<(), ClientError> {
        if !self.config.trusted_auth || identity.is_anonymous() {
            self.jar = Arc::new(Jar::default());
            self.http = build_transport(&self.config, self.jar.clone())?;
            self.trusted_cookie = None;
            self.identity = identity;
            debug!(identity = %self.identity, "switched user");
            return Ok(());
        }

        self.identity = identity;
        let login_url = self.url_for(FORM_LOGIN_PATH);
        let params = Params::new()
            .add("sakaiauth:login", "1")
            .add("sakaiauth:un", self.identity.name())
            .add("sakaiauth:pw", self.identity.password().unwrap_or_default());
        let res = self.execute_post(&login_url, &params).await?;

        if res.is_success() {
            self.trusted_cookie = res
                .set_cookies()
                .iter()
                .find(|c| c.starts_with(TRUSTED_AUTH_COOKIE))
                .map(|c| cookie_pair(c).to_string());
            debug!(identity = %self.identity, "trusted login ok");
        } else {
            warn!(identity = %self.identity, status = res.status().as_u16(), "trusted login rejected");
            // Expire the previous identity's trusted cookie so the rejection
            // is visible on the next request. Tracking cookies stay.
            self.jar.add_cookie_str(
                &format!("{TRUSTED_AUTH_COOKIE}=; Max-Age=0; Path=/"),
                &self.base,
            );
            self.trusted_cookie = None;
        }
        Ok(())
    }

    /// One GET exchange. `params` encode into the query string.
    pub async fn execute_get(&self, url: &str, params: &Params) -> Result<Response, ClientError> {
        let mut full = self.resolve(url);
        if !params.is_empty() {
            let sep = if full.contains('?') { '&' } else { '?' };
            full = format!("{full}{sep}{}", params.to_query_string());
        }
        let req = self.apply_auth(self.http.get(&full));
        self.dispatch("GET", &full, req).await
    }

    /// GET that follows redirects (up to a fixed limit) and returns the
    /// final response. The plain `execute_get` never follows, so tests can
    /// assert on 3xx statuses directly.
    pub async fn execute_get_with_follow(&self, url: &str) -> Result<Response, ClientError> {
        let mut current = self.resolve(url);
        for _ in 0..REDIRECT_LIMIT {
            let res = self.execute_get(&current, &Params::new()).await?;
            if !res.status().is_redirection() {
                return Ok(res);
            }
            let Some(next) = res.header("location").and_then(|l| absolutize(&current, l)) else {
                return Ok(res);
            };
            current = next;
        }
        Err(ClientError::RedirectLimit {
            url: current,
            limit: REDIRECT_LIMIT,
        })
    }

    /// One POST exchange with a form-encoded body.
    pub async fn execute_post(&self, url: &str, params: &Params) -> Result<Response, ClientError> {
        let full = self.resolve(url);
        let req = self.apply_auth(self.http.post(&full)).form(params.pairs());
        self.dispatch("POST", &full, req).await
    }

    /// One HEAD exchange with optional extra headers.
    pub async fn execute_head(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<Response, ClientError> {
        let full = self.resolve(url);
        let mut req = self.apply_auth(self.http.head(&full));
        for (name, value) in headers {
            req = req.header(*name, *value);
        }
        self.dispatch("HEAD", &full, req).await
    }

    /// One multipart POST uploading `data` as a file field with the declared
    /// content type.
    pub async fn execute_file_post(
        &self,
        url: &str,
        field_name: &str,
        filename: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<Response, ClientError> {
        let full = self.resolve(url);
        let part = multipart::Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str(content_type)
            .map_err(|_| ClientError::InvalidContentType(content_type.to_string()))?;
        let form = multipart::Form::new().part(field_name.to_string(), part);
        let req = self.apply_auth(self.http.post(&full)).multipart(form);
        self.dispatch("POST", &full, req).await
    }

    fn resolve(&self, url: &str) -> String {
        if is_absolute(url) {
            url.to_string()
        } else {
            self.url_for(url)
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.identity {
            Identity::User { name, password } if !self.config.trusted_auth => {
                req.basic_auth(name, Some(password))
            }
            _ => req,
        }
    }

    async fn dispatch(
        &self,
        method: &'static str,
        url: &str,
        req: reqwest::RequestBuilder,
    ) -> Result<Response, ClientError> {
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::transport(method, url, e))?;
        let res = Response::read(method, url, resp).await?;
        debug!(method, url, status = res.status().as_u16(), "http exchange");
        Ok(res)
    }
}

fn build_transport(config: &SessionConfig, jar: Arc<Jar>) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .redirect(reqwest::redirect::Policy::none())
        .cookie_provider(jar)
        .build()
        .map_err(ClientError::BuildTransport)
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

/// `name=value` prefix of a raw `Set-Cookie` header.
fn cookie_pair(raw: &str) -> &str {
    raw.split(';').next().unwrap_or(raw)
}

/// Resolve a `Location` header against the URL it came from. `None` when the
/// location is unusable, in which case the caller hands back the redirect
/// response as-is.
fn absolutize(current: &str, location: &str) -> Option<String> {
    if is_absolute(location) {
        return Some(location.to_string());
    }
    let cur = reqwest::Url::parse(current).ok()?;
    cur.join(location).ok().map(|u| u.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_at(base_url: &str) -> Session {
        Session::new(SessionConfig::new(base_url)).expect("session should build")
    }

    #[test]
    fn test_url_for_normalizes_slashes() {
        let s = session_at("http://localhost:8080");
        assert_eq!(s.url_for("a/b"), "http://localhost:8080/a/b");
        assert_eq!(s.url_for("/a/b"), "http://localhost:8080/a/b");

        let s = session_at("http://localhost:8080/");
        assert_eq!(s.url_for("a/b.json"), "http://localhost:8080/a/b.json");
    }

    #[test]
    fn test_url_for_passes_absolute_urls_through() {
        let s = session_at("http://localhost:8080");
        assert_eq!(
            s.url_for("http://elsewhere:9090/x.json"),
            "http://elsewhere:9090/x.json"
        );
    }

    #[tokio::test]
    async fn test_url_for_is_pure_across_switches() {
        let mut s = session_at("http://localhost:8080");
        let before = s.url_for("some/node.json");
        s.switch_user(Identity::user("alice", "pw"))
            .await
            .expect("basic-mode switch is local");
        s.switch_user(Identity::anonymous())
            .await
            .expect("basic-mode switch is local");
        assert_eq!(s.url_for("some/node.json"), before);
    }

    #[test]
    fn test_equal_configs_yield_equal_urls() {
        let a = session_at("http://localhost:8080");
        let b = session_at("http://localhost:8080");
        assert_eq!(a.url_for("/p/abc"), b.url_for("/p/abc"));
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = Session::new(SessionConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_configured_default_identity_applies() {
        let config =
            SessionConfig::new("http://localhost:8080").with_default_identity(Identity::anonymous());
        let s = Session::new(config).expect("session should build");
        assert!(s.current_identity().is_anonymous());
        assert_eq!(s.trusted_cookie(), None);
    }

    #[tokio::test]
    async fn test_switch_user_updates_current_identity() {
        let mut s = session_at("http://localhost:8080");
        assert!(s.current_identity().is_admin());
        s.switch_user(Identity::user("alice", "pw")).await.unwrap();
        assert_eq!(s.current_identity().name(), "alice");
        s.switch_user(Identity::anonymous()).await.unwrap();
        assert!(s.current_identity().is_anonymous());
    }

    #[test]
    fn test_absolutize_location() {
        assert_eq!(
            absolutize("http://h:1/a/b", "/c").as_deref(),
            Some("http://h:1/c")
        );
        assert_eq!(
            absolutize("http://h:1/a/b", "http://other/x").as_deref(),
            Some("http://other/x")
        );
        assert_eq!(absolutize("not-a-url", "/c"), None);
    }

    #[test]
    fn test_cookie_pair() {
        assert_eq!(cookie_pair("a=1; Path=/; HttpOnly"), "a=1");
        assert_eq!(cookie_pair("bare=2"), "bare=2");
    }
}
