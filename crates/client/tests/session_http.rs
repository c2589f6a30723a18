//! Wire-level tests for `Session` against an in-process TCP listener, so the
//! exact bytes of each exchange can be asserted without a real server.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use shakedown_client::{ClientError, Identity, Params, Session, SessionConfig};

struct MockServer {
    addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl MockServer {
    /// Accept connections one at a time, record each raw request, and answer
    /// with whatever `responder` builds from it.
    async fn spawn<F>(responder: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        tokio::spawn(async move {
            loop {
                let Ok((mut sock, _)) = listener.accept().await else {
                    break;
                };
                let Some(raw) = read_request(&mut sock).await else {
                    continue;
                };
                let reply = responder(&raw);
                seen.lock().expect("requests lock").push(raw);
                let _ = sock.write_all(reply.as_bytes()).await;
                let _ = sock.shutdown().await;
            }
        });
        Self { addr, requests }
    }

    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("requests lock").clone()
    }
}

async fn read_request(sock: &mut TcpStream) -> Option<String> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            let head = String::from_utf8_lossy(&buf[..pos]).to_string();
            let content_length = head
                .lines()
                .find_map(|l| {
                    let (name, value) = l.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let total = pos + 4 + content_length;
            while buf.len() < total {
                let n = sock.read(&mut chunk).await.ok()?;
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            return Some(String::from_utf8_lossy(&buf).to_string());
        }
        let n = sock.read(&mut chunk).await.ok()?;
        if n == 0 {
            return (!buf.is_empty()).then(|| String::from_utf8_lossy(&buf).to_string());
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reply(status: &str, extra_headers: &[(&str, &str)], content_type: &str, body: &str) -> String {
    let mut out = format!("HTTP/1.1 {status}\r\n");
    for (name, value) in extra_headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str(&format!(
        "Content-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    ));
    out
}

fn ok(body: &str) -> String {
    reply("200 OK", &[], "text/plain", body)
}

fn request_path(raw: &str) -> &str {
    raw.lines()
        .next()
        .and_then(|l| l.split_whitespace().nth(1))
        .unwrap_or("")
}

fn header_value<'a>(raw: &'a str, name: &str) -> Option<&'a str> {
    raw.lines().find_map(|l| {
        let (n, v) = l.split_once(':')?;
        n.eq_ignore_ascii_case(name).then(|| v.trim())
    })
}

fn basic_credentials(raw: &str) -> Option<String> {
    let value = header_value(raw, "authorization")?;
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    Some(String::from_utf8_lossy(&decoded).to_string())
}

fn request_body(raw: &str) -> &str {
    raw.split_once("\r\n\r\n").map(|(_, b)| b).unwrap_or("")
}

fn session_at(base_url: &str) -> Session {
    Session::new(SessionConfig::new(base_url)).expect("session should build")
}

#[tokio::test]
async fn test_switch_user_replaces_basic_credentials() {
    let server = MockServer::spawn(|_| ok("ok")).await;
    let mut s = session_at(&server.base_url());

    s.switch_user(Identity::user("alice", "secret-a"))
        .await
        .unwrap();
    s.execute_get("/system/me", &Params::new()).await.unwrap();

    s.switch_user(Identity::user("bob", "secret-b"))
        .await
        .unwrap();
    s.execute_get("/system/me", &Params::new()).await.unwrap();

    s.switch_user(Identity::anonymous()).await.unwrap();
    s.execute_get("/system/me", &Params::new()).await.unwrap();

    let reqs = server.requests();
    assert_eq!(reqs.len(), 3);
    assert_eq!(basic_credentials(&reqs[0]).as_deref(), Some("alice:secret-a"));
    assert_eq!(basic_credentials(&reqs[1]).as_deref(), Some("bob:secret-b"));
    assert_eq!(
        basic_credentials(&reqs[2]),
        None,
        "anonymous request must carry no credentials"
    );
}

#[tokio::test]
async fn test_error_status_is_data_not_error() {
    let server = MockServer::spawn(|_| reply("404 Not Found", &[], "text/html", "gone")).await;
    let s = session_at(&server.base_url());

    let res = s.execute_get("/missing.json", &Params::new()).await.unwrap();
    assert_eq!(res.status(), 404);
    assert_eq!(res.body(), "gone");
    assert!(res.json().is_none());
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    // Bind then drop to get a port that refuses connections.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let s = session_at(&format!("http://{addr}"));
    let err = s.execute_get("/x", &Params::new()).await.unwrap_err();
    assert!(err.is_transport());
    assert!(matches!(err, ClientError::Transport { method: "GET", .. }));
}

#[tokio::test]
async fn test_get_params_encode_into_query_string() {
    let server = MockServer::spawn(|_| ok("[]")).await;
    let s = session_at(&server.base_url());

    let params = Params::new()
        .add_each("tag", ["a", "b"])
        .add("q", "two words");
    s.execute_get("/var/search/content.json", &params)
        .await
        .unwrap();

    let reqs = server.requests();
    assert_eq!(
        request_path(&reqs[0]),
        "/var/search/content.json?tag=a&tag=b&q=two%20words"
    );
}

#[tokio::test]
async fn test_post_sends_form_encoded_body() {
    let server = MockServer::spawn(|_| ok("created")).await;
    let s = session_at(&server.base_url());

    let params = Params::new().add("a", "1").add("b", "two words");
    s.execute_post("/some/node", &params).await.unwrap();

    let reqs = server.requests();
    assert_eq!(
        header_value(&reqs[0], "content-type"),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(request_body(&reqs[0]), "a=1&b=two+words");
}

#[tokio::test]
async fn test_file_post_is_multipart_with_declared_type() {
    let server = MockServer::spawn(|_| reply("201 Created", &[], "application/json", "{}")).await;
    let s = session_at(&server.base_url());

    s.execute_file_post(
        "/system/pool/createfile",
        "notes",
        "notes.txt",
        b"purr purr".to_vec(),
        "text/plain",
    )
    .await
    .unwrap();

    let reqs = server.requests();
    let content_type = header_value(&reqs[0], "content-type").unwrap_or("");
    assert!(content_type.starts_with("multipart/form-data; boundary="));
    let body = request_body(&reqs[0]);
    assert!(body.contains(r#"Content-Disposition: form-data; name="notes"; filename="notes.txt""#));
    assert!(body.contains("Content-Type: text/plain"));
    assert!(body.contains("purr purr"));
}

#[tokio::test]
async fn test_head_sends_extra_headers_only() {
    let server = MockServer::spawn(|_| reply("200 OK", &[], "text/plain", "")).await;
    let s = session_at(&server.base_url());

    let res = s
        .execute_head("/p/abc123", &[("x-probe", "shallow")])
        .await
        .unwrap();
    assert!(res.is_success());

    let reqs = server.requests();
    assert!(reqs[0].starts_with("HEAD /p/abc123 HTTP/1.1"));
    assert_eq!(header_value(&reqs[0], "x-probe"), Some("shallow"));
}

#[tokio::test]
async fn test_plain_get_does_not_follow_redirects() {
    let server = MockServer::spawn(|req| {
        if request_path(req) == "/old" {
            reply("302 Found", &[("Location", "/new")], "text/plain", "")
        } else {
            ok("final")
        }
    })
    .await;
    let s = session_at(&server.base_url());

    let res = s.execute_get("/old", &Params::new()).await.unwrap();
    assert_eq!(res.status(), 302);
    assert_eq!(res.header("location"), Some("/new"));
}

#[tokio::test]
async fn test_get_with_follow_returns_final_response() {
    let server = MockServer::spawn(|req| {
        if request_path(req) == "/old" {
            reply("302 Found", &[("Location", "/new")], "text/plain", "")
        } else {
            ok("final")
        }
    })
    .await;
    let s = session_at(&server.base_url());

    let res = s.execute_get_with_follow("/old").await.unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.body(), "final");

    let reqs = server.requests();
    assert_eq!(reqs.len(), 2);
    assert_eq!(request_path(&reqs[1]), "/new");
}

/// Form-login responder for the trusted-auth tests. Issues a per-user trusted
/// cookie, a tracking cookie on the first login only, and rejects `intruder`.
fn trusted_responder(logins: Arc<AtomicUsize>) -> impl Fn(&str) -> String + Send + Sync {
    move |req: &str| {
        if request_path(req) == "/system/sling/formlogin" {
            let body = request_body(req);
            let user = body
                .split('&')
                .find_map(|kv| kv.strip_prefix("sakaiauth%3Aun="))
                .unwrap_or("");
            if user == "intruder" {
                return reply("403 Forbidden", &[], "text/plain", "no");
            }
            let trusted = format!("sakai-trusted-authn=token-{user}; Path=/; HttpOnly");
            if logins.fetch_add(1, Ordering::SeqCst) == 0 {
                return reply(
                    "200 OK",
                    &[
                        ("Set-Cookie", trusted.as_str()),
                        ("Set-Cookie", "server-tracking=keep; Path=/"),
                    ],
                    "text/plain",
                    "welcome",
                );
            }
            return reply(
                "200 OK",
                &[("Set-Cookie", trusted.as_str())],
                "text/plain",
                "welcome",
            );
        }
        ok("ok")
    }
}

#[tokio::test]
async fn test_trusted_switch_rotates_cookie_but_keeps_jar() {
    let server = MockServer::spawn(trusted_responder(Arc::new(AtomicUsize::new(0)))).await;
    let config = SessionConfig::new(server.base_url()).with_trusted_auth(true);
    let mut s = Session::new(config).unwrap();

    s.switch_user(Identity::user("alice", "pw-a")).await.unwrap();
    assert_eq!(s.trusted_cookie(), Some("sakai-trusted-authn=token-alice"));
    s.execute_get("/content.json", &Params::new()).await.unwrap();

    s.switch_user(Identity::user("bob", "pw-b")).await.unwrap();
    assert_eq!(s.trusted_cookie(), Some("sakai-trusted-authn=token-bob"));
    s.execute_get("/content.json", &Params::new()).await.unwrap();

    let reqs = server.requests();
    // 0: alice login, 1: alice GET, 2: bob login, 3: bob GET
    assert_eq!(reqs.len(), 4);

    let alice_cookies = header_value(&reqs[1], "cookie").unwrap_or("");
    assert!(alice_cookies.contains("sakai-trusted-authn=token-alice"));
    assert!(alice_cookies.contains("server-tracking=keep"));
    assert_eq!(
        basic_credentials(&reqs[1]),
        None,
        "trusted mode must not also send Basic credentials"
    );

    let bob_cookies = header_value(&reqs[3], "cookie").unwrap_or("");
    assert!(bob_cookies.contains("sakai-trusted-authn=token-bob"));
    assert!(
        !bob_cookies.contains("token-alice"),
        "previous identity's trusted cookie must not survive the switch"
    );
    // The deliberate asymmetry: the tracking cookie is still there.
    assert!(bob_cookies.contains("server-tracking=keep"));
}

#[tokio::test]
async fn test_trusted_login_rejection_is_not_an_error() {
    let server = MockServer::spawn(trusted_responder(Arc::new(AtomicUsize::new(0)))).await;
    let config = SessionConfig::new(server.base_url()).with_trusted_auth(true);
    let mut s = Session::new(config).unwrap();

    s.switch_user(Identity::user("alice", "pw-a")).await.unwrap();

    // Switching to an unprovisioned identity succeeds locally; the failure
    // only shows on later requests.
    s.switch_user(Identity::user("intruder", "nope"))
        .await
        .unwrap();
    assert_eq!(s.trusted_cookie(), None);
    assert_eq!(s.current_identity().name(), "intruder");

    s.execute_get("/content.json", &Params::new()).await.unwrap();
    let reqs = server.requests();
    let cookies = header_value(&reqs[2], "cookie").unwrap_or("");
    assert!(
        !cookies.contains("sakai-trusted-authn"),
        "stale trusted cookie must not authenticate the new identity"
    );
    assert!(cookies.contains("server-tracking=keep"));
}

#[tokio::test]
async fn test_anonymous_switch_resets_jar_in_trusted_mode() {
    let server = MockServer::spawn(trusted_responder(Arc::new(AtomicUsize::new(0)))).await;
    let config = SessionConfig::new(server.base_url()).with_trusted_auth(true);
    let mut s = Session::new(config).unwrap();

    s.switch_user(Identity::user("alice", "pw-a")).await.unwrap();
    s.switch_user(Identity::anonymous()).await.unwrap();
    assert_eq!(s.trusted_cookie(), None);

    s.execute_get("/content.json", &Params::new()).await.unwrap();
    let reqs = server.requests();
    assert_eq!(header_value(&reqs[1], "cookie"), None);
}
