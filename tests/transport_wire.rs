// Wire-level checks of HttpTransport against a local mock server.

use shadowc::upstream::transport::{HttpTransport, Request, Response, Transport, TransportError};
use shadowc::upstream::ShadowdHost;
use shadowc::Error;
use std::rc::Rc;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// The mock server speaks plain HTTP; hosts always build https URLs.
struct PlainHttp(HttpTransport);

impl Transport for PlainHttp {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let mut request = request.clone();
        request.url = request.url.replacen("https://", "http://", 1);
        self.0.send(&request)
    }
}

fn setup(rt: &Runtime) -> (MockServer, ShadowdHost) {
    let server = rt.block_on(MockServer::start());
    let transport = PlainHttp(HttpTransport::new(reqwest::blocking::Client::new()));
    let host = ShadowdHost::new(server.address().to_string(), Rc::new(transport)).unwrap();
    (server, host)
}

fn mount(rt: &Runtime, server: &MockServer, verb: &str, route: &str, status: u16, body: &str) {
    rt.block_on(
        Mock::given(method(verb))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(server),
    );
}

// ── Form encoding ───────────────────────────────────────────────────

#[test]
fn test_password_change_form_body() {
    let rt = Runtime::new().unwrap();
    let (server, host) = setup(&rt);
    mount(&rt, &server, "PUT", "/t/alice", 200, "");

    host.submit_password_change("alice", &["p1".to_string(), "p2".to_string()], "new")
        .unwrap();

    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method.as_str(), "PUT");
    assert_eq!(request.url.path(), "/t/alice");
    assert_eq!(
        String::from_utf8_lossy(&request.body),
        "shadow%5B%5D=p1&shadow%5B%5D=p2&password=new"
    );
    let content_type = request
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("application/x-www-form-urlencoded"));
}

#[test]
fn test_change_salts_request_has_empty_body() {
    let rt = Runtime::new().unwrap();
    let (server, host) = setup(&rt);
    mount(&rt, &server, "PUT", "/t/team1/bob", 200, "$6$aaa$\n$6$bbb$\n");

    let salts = host.fetch_change_salts("team1/bob").unwrap();
    assert_eq!(salts, vec!["$6$aaa$", "$6$bbb$"]);

    let requests = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].body.is_empty());
}

// ── Status mapping ──────────────────────────────────────────────────

#[test]
fn test_hash_body_trailing_newline_trimmed() {
    let rt = Runtime::new().unwrap();
    let (server, host) = setup(&rt);
    mount(&rt, &server, "GET", "/t/team1/carol", 200, "$6$salt$hash\n");

    assert_eq!(host.fetch_hash("team1/carol").unwrap(), "$6$salt$hash");
}

#[test]
fn test_no_content_and_not_found_are_not_found() {
    let rt = Runtime::new().unwrap();
    let (server, host) = setup(&rt);
    mount(&rt, &server, "GET", "/t/empty", 204, "");
    mount(&rt, &server, "GET", "/t/gone", 404, "not found");

    assert!(host.fetch_hash("empty").unwrap_err().is_not_found());
    assert!(host.fetch_hash("gone").unwrap_err().is_not_found());
    assert!(host.is_alive());
}

#[test]
fn test_server_error_is_host_failure() {
    let rt = Runtime::new().unwrap();
    let (server, host) = setup(&rt);
    mount(&rt, &server, "GET", "/ssh/alice", 500, "boom");

    let err = host.fetch_keys("alice").unwrap_err();
    assert!(err.is_host_failure());
    assert!(matches!(err, Error::HostFailure { reason, .. } if reason.contains("500")));
}
