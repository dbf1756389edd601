//! TTS（文字转语音）模块：通过同步运行接口将文本合成为 base64 音频。

mod client;
mod types;

pub use client::TtsClient;
pub use types::{SynthesisRequest, SynthesisResult};
