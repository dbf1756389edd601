//! Client entry point.
//!
//! Developer-friendly goal: keep the public surface small and predictable.
//! Implementation details are split into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod endpoint;
pub(crate) mod validation;

pub use builder::SenVoiceBuilder;
pub use self::core::SenVoice;
pub use endpoint::{resolve, ResolvedEndpoint};
