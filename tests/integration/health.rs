//! Health probe aggregation.

use crate::mock_server::{MockServerFixture, UNREACHABLE_URL};
use mockito::Matcher;
use senvoice::{ClientConfig, EndpointConfig, Language, SenVoice, ServiceId};

#[tokio::test]
async fn test_one_unreachable_service_reports_one_error() {
    let mut fixture = MockServerFixture::new().await;
    let probe = fixture
        .server
        .mock("GET", "/ping")
        .with_status(200)
        .with_body(r#"{"status":"ok"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = SenVoice::new(
        ClientConfig::new()
            .with_endpoint(ServiceId::TTS, EndpointConfig::local(&fixture.base_url))
            .with_endpoint(
                ServiceId::stt(Language::Wolof),
                EndpointConfig::local(&fixture.base_url),
            )
            .with_endpoint(ServiceId::ASR, EndpointConfig::local(UNREACHABLE_URL)),
    )
    .unwrap();

    let report = client.ping_all().await;
    assert_eq!(report.len(), 3);
    assert_eq!(report.values().filter(|r| !r.is_ok()).count(), 1);

    let down = &report[&ServiceId::ASR];
    assert!(down.error_message().is_some());
    assert!(down.latency().is_none());

    let up = &report[&ServiceId::TTS];
    assert!(up.latency().is_some());
    probe.assert_async().await;
}

#[tokio::test]
async fn test_managed_probe_uses_health_path_and_bearer() {
    let mut fixture = MockServerFixture::new().await;
    let probe = fixture
        .server
        .mock("GET", "/abc123/health")
        .match_header("authorization", "Bearer tok")
        .match_header("x-request-id", Matcher::Any)
        .with_status(200)
        .with_body(r#"{"workers":{"idle":1,"running":0}}"#)
        .create_async()
        .await;

    let client = fixture.managed_client(ServiceId::TTS, "abc123", "tok");
    let report = client.ping_all().await;
    assert!(report[&ServiceId::TTS].is_ok());
    probe.assert_async().await;
}

#[tokio::test]
async fn test_rejected_probe_is_an_error_entry() {
    let mut fixture = MockServerFixture::new().await;
    let _probe = fixture.mock_probe("/abc123/health", 401).await;

    let client = fixture.managed_client(ServiceId::ASR, "abc123", "stale");
    let report = client.ping_all().await;
    assert_eq!(report.len(), 1);
    assert!(!report[&ServiceId::ASR].is_ok());
}

#[tokio::test]
async fn test_single_proxy_ping() {
    let mut fixture = MockServerFixture::new().await;
    let _probe = fixture.mock_probe("/ping", 200).await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let body = client.tts().ping().await.unwrap();
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_ping_after_close_reports_every_service() {
    let mut fixture = MockServerFixture::new().await;
    let guards = fixture.mock_no_traffic().await;

    let client = fixture.local_client(&[ServiceId::TTS, ServiceId::ASR]);
    client.close();
    let report = client.ping_all().await;
    assert_eq!(report.len(), 2);
    assert!(report.values().all(|r| !r.is_ok()));

    for mock in guards {
        mock.assert_async().await;
    }
}

#[tokio::test]
async fn test_empty_configuration_gives_empty_report() {
    let client = SenVoice::new(ClientConfig::new()).unwrap();
    assert!(client.ping_all().await.is_empty());
}
