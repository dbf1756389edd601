//! Integration tests for error mapping at the proxy boundary

use crate::mock_server::{MockServerFixture, UNREACHABLE_URL};
use senvoice::{ApiErrorKind, ClientConfig, EndpointConfig, ErrorKind, SenVoice, ServiceId};
use serde_json::json;
use std::time::Duration;
use tokio::net::TcpListener;

#[tokio::test]
async fn test_rejected_credentials() {
    for status in [401usize, 403] {
        let mut fixture = MockServerFixture::new().await;
        let _mock = fixture
            .mock_error_response("/abc123/runsync", status, r#"{"error":"Unauthorized"}"#)
            .await;

        let client = fixture.managed_client(ServiceId::TTS, "abc123", "bad-token");
        let err = client.tts().synthesize("Bonjour").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(err.status(), Some(status as u16));
        assert_eq!(err.service(), Some("tts"));
    }
}

#[tokio::test]
async fn test_upstream_error_carries_status_and_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_error_response("/runsync", 500, r#"{"error":"model failed to load"}"#)
        .await;

    let client = fixture.local_client(&[ServiceId::ASR]);
    let err = client.asr().transcribe("UklGRg==").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.api_kind(), Some(ApiErrorKind::Upstream));
    assert_eq!(err.status(), Some(500));
    let msg = err.to_string();
    assert!(msg.contains("model failed to load"), "{}", msg);
    assert!(msg.contains("[asr]"), "{}", msg);
}

#[tokio::test]
async fn test_success_without_expected_shape_is_api_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .server
        .mock("POST", "/runsync")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html>gateway ok</html>")
        .create_async()
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::MalformedResponse));
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn test_wrong_shape_keeps_upstream_status() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("/runsync", 200, json!({"text": "not audio"}))
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::MalformedResponse));
    assert_eq!(err.status(), Some(200));
    let msg = err.to_string();
    assert!(!msg.contains("no response"), "{}", msg);
    assert!(msg.contains("HTTP 200"), "{}", msg);
}

#[tokio::test]
async fn test_failed_job_is_api_error() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response(
            "/runsync",
            200,
            json!({"id": "sync-1", "status": "FAILED", "error": "CUDA out of memory"}),
        )
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert_eq!(err.status(), Some(200));
    assert!(err.to_string().contains("CUDA out of memory"));
}

#[tokio::test]
async fn test_empty_audio_is_not_a_success() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("/runsync", 200, json!({"audio": ""}))
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.api_kind(), Some(ApiErrorKind::MalformedResponse));
}

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let client = SenVoice::new(
        ClientConfig::new().with_endpoint(ServiceId::TTS, EndpointConfig::local(UNREACHABLE_URL)),
    )
    .unwrap();
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Api);
    assert!(err.is_transport());
    assert_eq!(err.status(), None);
    assert!(err.to_string().contains("no response"));
}

/// Accepts connections and never answers.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_configured_timeout_is_transport_error() {
    let url = silent_server().await;
    let client = SenVoice::new(
        ClientConfig::new()
            .with_endpoint(ServiceId::TTS, EndpointConfig::local(url))
            .with_timeout(Duration::from_millis(100)),
    )
    .unwrap();
    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert!(err.is_transport(), "{}", err);
}

#[tokio::test]
async fn test_caller_deadline_cancels_cleanly() {
    let url = silent_server().await;
    let client = SenVoice::new(
        ClientConfig::new().with_endpoint(ServiceId::TTS, EndpointConfig::local(url)),
    )
    .unwrap();

    let tts = client.tts();
    let raced = tokio::time::timeout(Duration::from_millis(100), tts.synthesize("Bonjour")).await;
    assert!(raced.is_err(), "call should still be pending at the deadline");

    // The session survives the cancelled call and is released on close.
    assert_eq!(client.session_stats().open, 1);
    assert_eq!(client.close(), 1);
    assert_eq!(client.session_stats().open, 0);
}
