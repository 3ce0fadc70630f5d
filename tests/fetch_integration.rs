//! Integration tests for the fetch module.
//!
//! These tests drive the full request/redirect/retry loop against mock HTTP
//! servers.

use std::time::{Duration, Instant};

use filestage::fetch::{FetchError, FetchOptions, RemoteFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Options tuned so timeout tests finish quickly.
fn fast_options() -> FetchOptions {
    FetchOptions {
        recv_timeout_ms: 200,
        backoff_factor_ms: 10,
        backoff_max_ms: 40,
        ..FetchOptions::default()
    }
}

#[tokio::test]
async fn test_fetch_terminal_200_buffers_body() {
    let mock_server = MockServer::start().await;
    let content = b"JPEG bytes here";

    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/photo.jpg", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.body, content);
    assert_eq!(outcome.mime_type, "image/jpeg");
    assert_eq!(outcome.final_url.path(), "/photo.jpg");
}

#[tokio::test]
async fn test_fetch_follows_302_location_without_consuming_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/final.jpg", mock_server.uri()).as_str()),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/final.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image".to_vec()))
        .mount(&mock_server)
        .await;

    // A large backoff factor makes any accidental retry sleep obvious.
    let options = FetchOptions {
        backoff_factor_ms: 5_000,
        ..FetchOptions::default()
    };
    let fetcher = RemoteFetcher::new(options);
    let url = format!("{}/start", mock_server.uri());

    let started = Instant::now();
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");
    let elapsed = started.elapsed();

    let basename = outcome
        .final_url
        .path_segments()
        .and_then(|mut segments| segments.next_back().map(str::to_string))
        .unwrap_or_default();
    assert_eq!(basename, "final.jpg");
    assert!(
        elapsed < Duration::from_secs(2),
        "redirects must not sleep through retry backoff (took {elapsed:?})"
    );
}

#[tokio::test]
async fn test_fetch_follows_relative_location() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/files/final.jpg"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/files/final.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"image".to_vec()))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/start", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.final_url.path(), "/files/final.jpg");
}

#[tokio::test]
async fn test_fetch_follows_refresh_header_on_200() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/gateway"))
        .respond_with(ResponseTemplate::new(200).insert_header(
            "Refresh",
            format!("0; url={}/target.pdf", mock_server.uri()).as_str(),
        ))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/target.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.4".to_vec()))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/gateway", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.final_url.path(), "/target.pdf");
    assert_eq!(outcome.mime_type, "application/pdf");
    assert_eq!(outcome.body, b"%PDF-1.4");
}

#[tokio::test]
async fn test_fetch_redirect_loop_fails_with_too_many_redirects() {
    let mock_server = MockServer::start().await;

    // /a and /b point at each other forever.
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/b"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(ResponseTemplate::new(302).insert_header("Location", "/a"))
        .mount(&mock_server)
        .await;

    let options = FetchOptions {
        max_redirects: 5,
        ..FetchOptions::default()
    };
    let fetcher = RemoteFetcher::new(options);
    let url = format!("{}/a", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    match result {
        Err(FetchError::TooManyRedirects { limit, .. }) => assert_eq!(limit, 5),
        other => panic!("Expected TooManyRedirects, got: {other:?}"),
    }

    // Initial request plus one per allowed hop.
    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 6);
}

#[tokio::test]
async fn test_fetch_retry_exhaustion_issues_exactly_four_requests() {
    let mock_server = MockServer::start().await;

    // Response delay far beyond the receive timeout: every attempt times out.
    Mock::given(method("GET"))
        .and(path("/slow.bin"))
        .respond_with(
            ResponseTemplate::new(200).set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(fast_options());
    let url = format!("{}/slow.bin", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    match result {
        Err(FetchError::Timeout { attempts, .. }) => assert_eq!(attempts, 4),
        other => panic!("Expected Timeout, got: {other:?}"),
    }

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 4, "1 initial attempt + 3 retries");
}

#[tokio::test]
async fn test_fetch_non_200_status_fails_without_retries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(fast_options());
    let url = format!("{}/missing.pdf", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    match result {
        Err(FetchError::HttpStatus { status, .. }) => assert_eq!(status, 404),
        other => panic!("Expected HttpStatus, got: {other:?}"),
    }

    let requests = mock_server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 1, "non-timeout failures must not retry");
}

#[tokio::test]
async fn test_fetch_302_without_location_is_a_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dangling"))
        .respond_with(ResponseTemplate::new(302))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(fast_options());
    let url = format!("{}/dangling", mock_server.uri());
    let result = fetcher.fetch(&url).await;

    assert!(
        matches!(result, Err(FetchError::HttpStatus { status: 302, .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_mime_prefers_final_url_extension_over_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/photo.jpg"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/octet-stream")
                .set_body_bytes(b"image".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/photo.jpg", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.mime_type, "image/jpeg");
}

#[tokio::test]
async fn test_fetch_mime_falls_back_to_header_for_unknown_extension() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/export.dat9"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json; charset=utf-8")
                .set_body_bytes(b"{}".to_vec()),
        )
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/export.dat9", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.mime_type, "application/json");
}

#[tokio::test]
async fn test_fetch_mime_defaults_to_octet_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/download"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"bytes".to_vec()))
        .mount(&mock_server)
        .await;

    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let url = format!("{}/download", mock_server.uri());
    let outcome = fetcher.fetch(&url).await.expect("fetch should succeed");

    assert_eq!(outcome.mime_type, "application/octet-stream");
}

#[tokio::test]
async fn test_fetch_rejects_invalid_url() {
    let fetcher = RemoteFetcher::new(FetchOptions::default());
    let result = fetcher.fetch("definitely-not-a-url").await;

    assert!(
        matches!(result, Err(FetchError::InvalidUrl { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_fetch_connection_refused_is_a_network_error() {
    // Nothing listens on this port; the OS refuses the connection outright.
    let fetcher = RemoteFetcher::new(fast_options());
    let result = fetcher.fetch("http://127.0.0.1:9/unreachable.bin").await;

    assert!(
        matches!(result, Err(FetchError::Network { .. })),
        "got: {result:?}"
    );
}
