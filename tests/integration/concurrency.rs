//! Concurrent calls share one session per service.

use crate::mock_server::MockServerFixture;
use senvoice::batch::{join_settled, try_join, BatchExecutor, BatchExecutorConfig, BatchStrategy};
use senvoice::{ErrorKind, SenVoice, ServiceId};
use serde_json::json;
use std::sync::Arc;

const AUDIO: &str = "UklGRiQAAABXQVZFZm10IBAAAAABAAEAgD4AAAB9AAACABAAZGF0YQAAAAA=";

#[tokio::test]
async fn test_concurrent_first_calls_open_one_session() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_run_sync(
            "/runsync",
            json!({"audio_base64": AUDIO}),
            json!({"transcription": "bonjour"}),
            2,
        )
        .await;

    let client = fixture.local_client(&[ServiceId::ASR]);
    let asr = client.asr();
    let (a, b) = tokio::join!(asr.transcribe(AUDIO), asr.transcribe(AUDIO));
    assert_eq!(a.unwrap().transcription, "bonjour");
    assert_eq!(b.unwrap().transcription, "bonjour");

    let stats = client.session_stats();
    assert_eq!(stats.created, 1);
    assert_eq!(stats.open, 1);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_settled_batch_keeps_order_and_failures() {
    let mut fixture = MockServerFixture::new().await;
    let _ok = fixture
        .mock_run_sync("/runsync", json!({"text": "Bonjour"}), json!({"audio": AUDIO}), 1)
        .await;
    let _fail = fixture
        .server
        .mock("POST", "/runsync")
        .match_body(mockito::Matcher::PartialJson(json!({"input": {"text": "Salam"}})))
        .with_status(500)
        .with_body(r#"{"error":"voice not loaded"}"#)
        .create_async()
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let tts = client.tts();
    let texts = ["Bonjour", "Salam", ""];
    let outcomes = join_settled(texts.iter().map(|t| tts.synthesize(t))).await;

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().audio, AUDIO);
    assert_eq!(outcomes[1].as_ref().unwrap_err().status(), Some(500));
    assert_eq!(
        outcomes[2].as_ref().unwrap_err().kind(),
        ErrorKind::Validation
    );
}

#[tokio::test]
async fn test_try_join_returns_first_error() {
    let mut fixture = MockServerFixture::new().await;
    let _ok = fixture
        .mock_json_response("/runsync", 200, json!({"audio": AUDIO}))
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let tts = client.tts();

    let all = try_join(["Bonjour", "Merci"].iter().map(|t| tts.synthesize(t)))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);

    let err = try_join(["Bonjour", "  "].iter().map(|t| tts.synthesize(t)))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[tokio::test]
async fn test_mixed_services_in_one_batch() {
    let mut fixture = MockServerFixture::new().await;
    let _tts = fixture
        .mock_run_sync("/runsync", json!({"text": "Bonjour"}), json!({"audio": AUDIO}), 1)
        .await;
    let _asr = fixture
        .mock_run_sync(
            "/runsync",
            json!({"audio_base64": AUDIO}),
            json!({"transcription": "Bonjour"}),
            1,
        )
        .await;

    let client = fixture.local_client(&[ServiceId::TTS, ServiceId::ASR]);
    let tts = client.tts();
    let asr = client.asr();
    let (spoken, heard) = tokio::join!(tts.synthesize("Bonjour"), asr.transcribe(AUDIO));
    assert_eq!(spoken.unwrap().audio, AUDIO);
    assert_eq!(heard.unwrap().transcription, "Bonjour");
    assert_eq!(client.session_stats().created, 2);
}

#[tokio::test]
async fn test_bounded_executor_runs_every_item() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_run_sync("/runsync", json!({}), json!({"audio": AUDIO}), 6)
        .await;

    let client = fixture.local_client(&[ServiceId::TTS]);
    let executor = BatchExecutor::with_config(
        BatchExecutorConfig::new().with_strategy(BatchStrategy::Concurrent { max_concurrency: 2 }),
    );
    let texts: Vec<String> = (0..6).map(|i| format!("phrase {}", i)).collect();
    let tts = client.tts();
    let report = executor
        .execute(texts, |text| async move { tts.synthesize(&text).await })
        .await;

    assert!(report.all_succeeded());
    assert_eq!(report.total_processed, 6);
    assert_eq!(client.session_stats().created, 1);
    mock.assert_async().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_shared_client_across_tasks() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_run_sync(
            "/runsync",
            json!({"audio_base64": AUDIO}),
            json!({"transcription": "ok"}),
            8,
        )
        .await;

    let client: Arc<SenVoice> = Arc::new(fixture.local_client(&[ServiceId::ASR]));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let client = Arc::clone(&client);
            tokio::spawn(async move { client.asr().transcribe(AUDIO).await })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap().transcription, "ok");
    }
    assert_eq!(client.session_stats().created, 1);
    mock.assert_async().await;
}
