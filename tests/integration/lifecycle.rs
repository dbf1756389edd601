//! Reconfiguration and shutdown.

use crate::mock_server::MockServerFixture;
use senvoice::{ClientConfig, EndpointConfig, ErrorKind, SenVoice, ServiceId};
use serde_json::json;

const AUDIO: &str = "UklGRiQAAABXQVZFZm10IBAAAAABAAEAgD4AAAB9AAACABAAZGF0YQAAAAA=";

#[tokio::test]
async fn test_reconfigure_targets_new_endpoint() {
    let mut first = MockServerFixture::new().await;
    let mut second = MockServerFixture::new().await;
    let first_mock = first
        .mock_run_sync("/runsync", json!({"text": "un"}), json!({"audio": AUDIO}), 1)
        .await;
    let second_mock = second
        .mock_run_sync("/runsync", json!({"text": "deux"}), json!({"audio": AUDIO}), 1)
        .await;

    let client = first.local_client(&[ServiceId::TTS]);
    client.tts().synthesize("un").await.unwrap();

    client.configure_local(ServiceId::TTS, &second.base_url).unwrap();
    client.tts().synthesize("deux").await.unwrap();

    let stats = client.session_stats();
    assert_eq!(stats.created, 2);
    assert_eq!(stats.released, 1);
    assert_eq!(stats.open, 1);
    first_mock.assert_async().await;
    second_mock.assert_async().await;
}

#[tokio::test]
async fn test_invalid_reconfiguration_keeps_previous_endpoint() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_json_response("/runsync", 200, json!({"audio": AUDIO}))
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let err = client
        .configure_local(ServiceId::TTS, "ftp://example.com")
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    client.tts().synthesize("Bonjour").await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_removed_endpoint_fails_without_io() {
    let mut fixture = MockServerFixture::new().await;
    let guards = fixture.mock_no_traffic().await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    client.remove_endpoint(ServiceId::TTS).unwrap();
    assert!(!client.is_configured(ServiceId::TTS));

    let err = client.tts().synthesize("Bonjour").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    for mock in guards {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_calls_after_close_perform_no_io() {
    let mut fixture = MockServerFixture::new().await;
    let ok = fixture
        .mock_run_sync("/runsync", json!({"text": "avant"}), json!({"audio": AUDIO}), 1)
        .await;

    let client = fixture.local_client(&[ServiceId::TTS, ServiceId::ASR]);
    client.tts().synthesize("avant").await.unwrap();

    assert_eq!(client.close(), 1);
    assert_eq!(client.close(), 0);
    assert!(client.is_closed());

    let err = client.tts().synthesize("après").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = client.asr().transcribe(AUDIO).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    let err = client
        .configure_local(ServiceId::TTS, &fixture.base_url)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    // Exactly the one call made before close reached the server.
    ok.assert_async().await;
    let stats = client.session_stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.open, 0);
}

#[tokio::test]
async fn test_closed_client_reports_configuration_before_validation() {
    let mut fixture = MockServerFixture::new().await;
    let guards = fixture.mock_no_traffic().await;

    let client = fixture.local_client(&[ServiceId::TTS, ServiceId::ASR]);
    client.close();

    let err = client.tts().synthesize("").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    let err = client.asr().transcribe("%%%").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);

    for mock in guards {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_scope_releases_sessions() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_run_sync(
            "/runsync",
            json!({"audio_base64": AUDIO}),
            json!({"transcription": "Bonjour"}),
            1,
        )
        .await;

    let config = ClientConfig::new()
        .with_endpoint(ServiceId::ASR, EndpointConfig::local(&fixture.base_url));
    let (text, client) = SenVoice::scope(config, |client| async move {
        let text = client.asr().transcribe(AUDIO).await.map(|r| r.transcription);
        (text, client)
    })
    .await
    .unwrap();

    assert_eq!(text.unwrap(), "Bonjour");
    assert!(client.is_closed());
    assert_eq!(client.session_stats().released, 1);
}

#[tokio::test]
async fn test_drop_releases_sessions() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json_response("/runsync", 200, json!({"audio": AUDIO}))
        .await;

    {
        let client = fixture.local_client(&[ServiceId::TTS]);
        client.tts().synthesize("Bonjour").await.unwrap();
        assert_eq!(client.session_stats().open, 1);
    }
    // The server outlives the client; a new client opens its own session.
    let client = fixture.local_client(&[ServiceId::TTS]);
    assert_eq!(client.session_stats().created, 0);
}
