//! Concurrent Batch Example
//!
//! Synthesizes several phrases at once, first collecting every outcome, then
//! through a bounded executor.
//!
//! Usage:
//!   SENVOICE_TTS_ENDPOINT=http://localhost:8001 cargo run --example concurrent_batch

use senvoice::batch::{join_settled, BatchExecutor, BatchExecutorConfig, BatchMode, BatchStrategy};
use senvoice::{Language, SenVoice, ServiceId};

const PHRASES: &[&str] = &[
    "Bonjour, comment allez-vous ?",
    "Merci beaucoup.",
    "Salam naka nga def ?",
    "",
    "À bientôt.",
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let client = SenVoice::from_env()?;
    if !client.is_configured(ServiceId::TTS) {
        println!("Set SENVOICE_TTS_ENDPOINT or SENVOICE_TTS_ENDPOINT_ID to run this demo.");
        return Ok(());
    }

    println!("--- Settled: every outcome kept ---\n");
    let tts = client.tts();
    let outcomes = join_settled(PHRASES.iter().map(|p| tts.synthesize(p))).await;
    for (phrase, outcome) in PHRASES.iter().zip(&outcomes) {
        match outcome {
            Ok(res) => println!("  ok   {:?}: {} base64 chars", phrase, res.audio.len()),
            Err(e) => println!("  fail {:?}: {}", phrase, e),
        }
    }

    println!("\n--- Bounded executor, fail fast ---\n");
    let executor = BatchExecutor::with_config(
        BatchExecutorConfig::new()
            .with_strategy(BatchStrategy::Concurrent { max_concurrency: 2 })
            .with_mode(BatchMode::FailFast),
    );
    let report = executor
        .execute(PHRASES.to_vec(), |phrase| async move { tts.synthesize(phrase).await })
        .await;
    println!(
        "  processed {} in {:?}: {} ok, {} failed ({:.0}% success)",
        report.total_processed,
        report.execution_time,
        report.success_count(),
        report.failure_count(),
        report.success_rate() * 100.0
    );
    for (index, err) in &report.failures {
        println!("  #{}: {}", index, err);
    }

    if client.is_configured(ServiceId::tts(Language::Wolof)) {
        println!("\n--- Wolof voice ---\n");
        let res = client.tts_for(Language::Wolof).synthesize("Jërëjëf").await?;
        println!("  {} base64 chars", res.audio.len());
    }

    println!("\n{:?}", client.session_stats());
    Ok(())
}
