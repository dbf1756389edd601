//! STT（语音转文字）模块：通过同步运行接口将 base64 音频转录为文本。

mod client;
mod types;

pub use client::SttClient;
pub use types::{TranscriptionRequest, TranscriptionResult};
