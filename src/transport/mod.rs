//! 传输层：每个服务一个连接池会话，负责发送请求并把 HTTP 结果映射为统一错误。
//!
//! Transport layer: one pooled session per service, request dispatch, and the
//! mapping of HTTP outcomes into the crate's error taxonomy.

mod http;
pub mod runsync;
mod session;

pub use http::{Session, REQUEST_ID_HEADER};
pub use runsync::JobOutput;
pub use session::{SessionManager, SessionStats};
