//! 并发调度模块：把多个独立的代理调用并发执行，并按提交顺序收集结果。
//!
//! # Concurrent Dispatch
//!
//! Any number of proxy calls, to the same or different services, can be in
//! flight at once. The only shared state is each service's pooled session,
//! which supports concurrent requests.
//!
//! Two explicit collection modes are offered instead of a hidden flag:
//!
//! | Function / Mode | On failure |
//! |-----------------|------------|
//! | [`join_settled`] / [`BatchMode::Settled`] | every outcome is kept, value or error |
//! | [`try_join`] / [`BatchMode::FailFast`] | first error returned, remaining calls dropped |
//!
//! Results are always positional: index `i` is the `i`-th submitted call,
//! whatever order the calls completed in.
//!
//! ## Example
//!
//! ```rust,no_run
//! use senvoice::batch::join_settled;
//! use senvoice::SenVoice;
//!
//! # async fn run(client: &SenVoice) {
//! let tts = client.tts();
//! let texts = ["Bonjour", "Salam naka nga def ?"];
//! let outcomes = join_settled(texts.iter().map(|t| tts.synthesize(t))).await;
//! for (text, outcome) in texts.iter().zip(outcomes) {
//!     match outcome {
//!         Ok(res) => println!("{}: {} base64 chars", text, res.audio.len()),
//!         Err(e) => eprintln!("{}: {}", text, e),
//!     }
//! }
//! # }
//! ```
//!
//! ## Strategies
//!
//! - **Sequential**: one call at a time
//! - **Parallel**: all calls at once
//! - **Concurrent**: up to N calls at once (useful against rate-limited endpoints)

mod executor;

pub use executor::{
    join_settled, try_join, BatchExecutor, BatchExecutorConfig, BatchMode, BatchReport,
    BatchStrategy,
};
