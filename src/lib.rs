//! # senvoice
//!
//! 面向无服务器 GPU 平台与自托管服务的语音合成（TTS）与语音识别（ASR）异步客户端。
//!
//! Async client for speech synthesis (TTS) and speech recognition (ASR)
//! endpoints hosted on a serverless GPU platform or on self-hosted servers.
//!
//! ## Overview
//!
//! One [`SenVoice`] client multiplexes any number of concurrent
//! text-to-audio and audio-to-text calls across independently configured
//! endpoints. Each logical service gets one pooled HTTP session, opened on
//! first use and released when the client is closed or dropped.
//!
//! - **Managed** endpoints are addressed by id through the platform gateway
//!   and authenticated with a bearer token.
//! - **Local** endpoints are addressed by URL and need no auth.
//!
//! Every failure surfaces as one of four [`ErrorKind`]s: configuration,
//! validation, authentication, or API (with a `transport` sub-kind when no
//! response was received). The client never retries on its own.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use senvoice::SenVoice;
//!
//! #[tokio::main]
//! async fn main() -> senvoice::Result<()> {
//!     let client = SenVoice::builder()
//!         .tts_endpoint("http://localhost:8001")
//!         .asr_endpoint("http://localhost:8002")
//!         .build()?;
//!
//!     for (service, result) in client.ping_all().await {
//!         println!("{}: {:?}", service, result);
//!     }
//!
//!     let speech = client.tts().synthesize("Salam naka nga def ?").await?;
//!     let text = client.asr().transcribe(&speech.audio).await?;
//!     println!("{}", text.transcription);
//!
//!     client.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Service keys, endpoint and client configuration |
//! | [`client`] | The client, its builder, and endpoint resolution |
//! | [`tts`] | Speech synthesis proxy and types |
//! | [`stt`] | Speech recognition proxy and types |
//! | [`transport`] | Pooled sessions and run-sync response decoding |
//! | [`batch`] | Concurrent dispatch with positional results |
//! | [`health`] | Concurrent health probes |

pub mod batch;
pub mod client;
pub mod config;
pub mod health;
pub mod stt;
pub mod transport;
pub mod tts;

// Re-export main types for convenience
pub use client::{SenVoice, SenVoiceBuilder};
pub use config::{ClientConfig, EndpointConfig, EndpointMode, Language, ServiceId};
pub use health::{HealthReport, PingResult};
pub use stt::{SttClient, TranscriptionRequest, TranscriptionResult};
pub use transport::SessionStats;
pub use tts::{SynthesisRequest, SynthesisResult, TtsClient};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{ApiErrorKind, Error, ErrorContext, ErrorKind};
