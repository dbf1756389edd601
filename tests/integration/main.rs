//! Integration tests with mock HTTP servers

mod concurrency;
mod error_handling;
mod health;
mod lifecycle;
