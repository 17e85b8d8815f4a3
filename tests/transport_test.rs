// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use std::sync::Arc;
use std::time::Duration;

use curlwrap::http::{error_codes, DEFAULT_USER_AGENT};
use curlwrap::{Curl, Request, ReqwestTransport, Response, TransportConfig};
use wiremock::matchers::{body_string, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn execute(request: Request) -> curlwrap::Result<Response> {
    tokio::task::spawn_blocking(move || request.execute())
        .await
        .expect("blocking task panicked")
}

#[tokio::test]
async fn test_get_with_query_and_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "x y"))
        .and(header("x-custom", "yes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("found")
                .insert_header("content-type", "text/plain")
                .insert_header("set-cookie", "sid=42; Path=/; HttpOnly"),
        )
        .mount(&server)
        .await;

    let request = Curl::get(&format!("{}/search", server.uri()), &[("q", "x y")])
        .unwrap()
        .add_header("X-Custom", "yes");
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_http_code(), 200);
    assert_eq!(response.get_output(), Some("found"));
    assert_eq!(response.get_content_type(), Some("text/plain"));
    assert_eq!(response.get_size_download(), 5);
    assert_eq!(response.get_primary_ip(), Some("127.0.0.1"));
    assert!(response.get_total_time() > 0.0);
    assert!(response.headers()[0].starts_with("HTTP/1.1 200"));
    assert_eq!(response.cookies().get("sid").map(|c| c.value.as_str()), Some("42"));
    assert!(response
        .get_request_header()
        .unwrap()
        .starts_with("GET /search?q=x+y HTTP/1.1"));
}

#[tokio::test]
async fn test_post_form_with_auth_and_cookies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string("user=ada&remember=on"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header("authorization", "Basic dXNlcjpwYXNz"))
        .and(header("cookie", "csrf=t0k3n"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let request = Curl::post(
        &format!("{}/login", server.uri()),
        &[("user", "ada"), ("remember", "on")],
    )
    .unwrap()
    .set_basic_auth("user", "pass")
    .add_cookie(curlwrap::Cookie::new("csrf", "t0k3n"));
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_http_code(), 204);
    assert_eq!(response.get_output(), Some(""));
    assert_eq!(response.get_size_upload(), 20);
}

#[tokio::test]
async fn test_custom_verb_and_json() {
    let server = MockServer::start().await;
    Mock::given(method("PROPFIND"))
        .and(path("/dav"))
        .respond_with(ResponseTemplate::new(207).set_body_string("{\"entries\":3}"))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/dav", server.uri()))
        .set_method("propfind");
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_http_code(), 207);
    assert_eq!(response.get_json().unwrap()["entries"], 3);
}

#[tokio::test]
async fn test_follows_redirects_when_enabled() {
    let server = MockServer::start().await;
    Mock::given(path("/old"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/new"))
        .mount(&server)
        .await;
    Mock::given(path("/new"))
        .respond_with(ResponseTemplate::new(200).set_body_string("moved"))
        .mount(&server)
        .await;

    let followed = Request::new()
        .unwrap()
        .set_url(format!("{}/old", server.uri()))
        .set_follow_redirects(true);
    let response = execute(followed).await.unwrap();

    assert_eq!(response.get_http_code(), 200);
    assert_eq!(response.get_output(), Some("moved"));
    assert_eq!(response.get_redirect_count(), 1);
    assert_eq!(response.get_url(), Some(format!("{}/new", server.uri()).as_str()));

    let stopped = Request::new().unwrap().set_url(format!("{}/old", server.uri()));
    let response = execute(stopped).await.unwrap();

    assert_eq!(response.get_http_code(), 302);
    assert_eq!(response.get_redirect_count(), 0);
    assert_eq!(
        response.get_redirect_url(),
        Some(format!("{}/new", server.uri()).as_str())
    );
}

#[tokio::test]
async fn test_redirect_limit() {
    let server = MockServer::start().await;
    Mock::given(path("/loop"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/loop"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::with_config(TransportConfig::new().max_redirects(2));
    let request = Request::with_transport(Arc::new(transport))
        .unwrap()
        .set_url(format!("{}/loop", server.uri()))
        .set_follow_redirects(true);
    let err = execute(request).await.unwrap_err();

    assert_eq!(err.error_number(), Some(error_codes::TOO_MANY_REDIRECTS));
    assert_eq!(err.response().unwrap().get_redirect_count(), 2);
}

#[tokio::test]
async fn test_timeout_reports_partial_response() {
    let server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/slow", server.uri()))
        .set_timeout(1);
    let err = execute(request).await.unwrap_err();

    assert!(err.is_transport_failure());
    assert_eq!(err.error_number(), Some(error_codes::OPERATION_TIMEDOUT));
    let partial = err.response().unwrap();
    assert!(partial.get_output().is_none());
    assert!(partial.get_total_time() >= 1.0);
}

#[tokio::test]
async fn test_connection_refused() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let request = Request::new().unwrap().set_url(format!("http://{}/", addr));
    let err = execute(request).await.unwrap_err();

    assert_eq!(err.error_number(), Some(error_codes::COULDNT_CONNECT));
    assert!(!err.response().unwrap().get_error_message().is_empty());
}

#[tokio::test]
async fn test_headers_in_prefixes_body() {
    let server = MockServer::start().await;
    Mock::given(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_string("payload"))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/raw", server.uri()))
        .set_headers_in(true);
    let response = execute(request).await.unwrap();
    let output = response.get_output().unwrap();

    assert!(output.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(output.ends_with("\r\n\r\npayload"));
}

#[tokio::test]
async fn test_identity_headers_reach_server() {
    let server = MockServer::start().await;
    Mock::given(path("/whoami"))
        .and(header("user-agent", DEFAULT_USER_AGENT))
        .and(header("referer", "https://example.com/start"))
        .respond_with(ResponseTemplate::new(200).set_body_string("seen"))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/whoami", server.uri()))
        .set_referer("https://example.com/start");
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_http_code(), 200);
    assert_eq!(response.get_output(), Some("seen"));
}

#[tokio::test]
async fn test_explicit_user_agent_replaces_default() {
    let server = MockServer::start().await;
    Mock::given(path("/ua"))
        .and(header("user-agent", "custom-agent/1.0"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/ua", server.uri()))
        .add_header("User-Agent", "custom-agent/1.0");
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_http_code(), 200);
}

#[tokio::test]
async fn test_body_goes_to_stdout_without_return_transfer() {
    let server = MockServer::start().await;
    Mock::given(path("/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_string("streamed"))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/stream", server.uri()))
        .set_return_transfer(false);
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_output(), Some(""));
    assert_eq!(response.get_size_download(), 8);
}

#[tokio::test]
async fn test_no_timeout_by_default() {
    let server = MockServer::start().await;
    Mock::given(path("/patient"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("done")
                .set_delay(Duration::from_secs(31)),
        )
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/patient", server.uri()));
    let response = execute(request).await.unwrap();

    assert_eq!(response.get_output(), Some("done"));
    assert!(response.get_total_time() >= 31.0);
}

#[tokio::test]
async fn test_invalid_verb_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(path("/verb"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let request = Request::new()
        .unwrap()
        .set_url(format!("{}/verb", server.uri()))
        .set_method("bad verb");
    let err = execute(request).await.unwrap_err();

    assert_eq!(err.error_number(), Some(error_codes::BAD_FUNCTION_ARGUMENT));
    assert!(err.response().unwrap().get_output().is_none());
    assert_eq!(server.received_requests().await.map(|r| r.len()), Some(0));
}
