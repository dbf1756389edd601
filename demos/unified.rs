//! Unified Services Example
//!
//! Probes every configured service, then synthesizes a French sentence and
//! feeds the audio back through speech recognition.
//!
//! Managed endpoints:
//!   SENVOICE_API_KEY=... SENVOICE_TTS_ENDPOINT_ID=... SENVOICE_ASR_ENDPOINT_ID=... \
//!     cargo run --example unified
//!
//! Self-hosted servers:
//!   SENVOICE_TTS_ENDPOINT=http://localhost:8001 SENVOICE_ASR_ENDPOINT=http://localhost:8002 \
//!     cargo run --example unified

use senvoice::{SenVoice, SynthesisRequest};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive("senvoice=info".parse()?),
        )
        .with_target(false)
        .try_init();

    let client = SenVoice::from_env()?;
    if client.configured_services().is_empty() {
        println!("No endpoints configured. Set env vars such as:");
        println!("  SENVOICE_API_KEY + SENVOICE_TTS_ENDPOINT_ID / SENVOICE_ASR_ENDPOINT_ID");
        println!("  SENVOICE_TTS_ENDPOINT / SENVOICE_ASR_ENDPOINT for self-hosted servers");
        return Ok(());
    }

    println!("=== Health ===\n");
    let report = client.ping_all().await;
    println!("{}\n", serde_json::to_string_pretty(&report)?);

    println!("=== TTS -> ASR round trip ===\n");
    let request = SynthesisRequest::new("Bonjour, comment allez-vous ?").format("wav");
    let spoken = client.tts().synthesize_with(request).await?;
    println!(
        "synthesized {} bytes of audio (job {})",
        spoken.decode_audio()?.len(),
        spoken.job_id.as_deref().unwrap_or("-")
    );

    let heard = client.asr().transcribe(&spoken.audio).await?;
    println!("transcription: {}", heard.transcription);
    if !heard.metadata.is_empty() {
        println!("metadata: {}", serde_json::Value::Object(heard.metadata.clone()));
    }

    let released = client.close();
    println!("\nreleased {} session(s)", released);
    Ok(())
}
