//! Batch executor.

use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use std::future::Future;
use std::time::{Duration, Instant};

/// Run every future concurrently and keep each outcome, in submission order.
///
/// One failure never cancels or hides its siblings.
pub async fn join_settled<I, Fut, T>(calls: I) -> Vec<Result<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    futures::future::join_all(calls).await
}

/// Run every future concurrently; return all values in submission order, or
/// the first error to occur. Calls still in flight at that point are dropped.
pub async fn try_join<I, Fut, T>(calls: I) -> Result<Vec<T>>
where
    I: IntoIterator<Item = Fut>,
    Fut: Future<Output = Result<T>>,
{
    futures::future::try_join_all(calls).await
}

#[derive(Debug)]
pub struct BatchReport<T> {
    pub successes: Vec<(usize, T)>,
    pub failures: Vec<(usize, Error)>,
    pub execution_time: Duration,
    pub total_processed: usize,
}

impl<T> BatchReport<T> {
    pub fn new() -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            execution_time: Duration::ZERO,
            total_processed: 0,
        }
    }

    /// Split positional outcomes into indexed successes and failures.
    pub fn from_outcomes(outcomes: Vec<Result<T>>, execution_time: Duration) -> Self {
        let mut report = Self::new();
        report.total_processed = outcomes.len();
        report.execution_time = execution_time;
        for (i, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(v) => report.successes.push((i, v)),
                Err(e) => report.failures.push((i, e)),
            }
        }
        report
    }

    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }
    pub fn success_count(&self) -> usize {
        self.successes.len()
    }
    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }
    pub fn success_rate(&self) -> f64 {
        if self.total_processed == 0 {
            0.0
        } else {
            self.successes.len() as f64 / self.total_processed as f64
        }
    }
}

impl<T> Default for BatchReport<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStrategy {
    /// One call at a time.
    Sequential,
    /// Every call at once.
    Parallel,
    /// Up to `max_concurrency` calls at once.
    Concurrent { max_concurrency: usize },
}

impl Default for BatchStrategy {
    fn default() -> Self {
        BatchStrategy::Parallel
    }
}

/// How a failed call affects the rest of the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchMode {
    /// Collect every outcome.
    #[default]
    Settled,
    /// Stop at the first error; unfinished calls are dropped and left out of the report.
    FailFast,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchExecutorConfig {
    pub strategy: BatchStrategy,
    pub mode: BatchMode,
}

impl BatchExecutorConfig {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn with_strategy(mut self, s: BatchStrategy) -> Self {
        self.strategy = s;
        self
    }
    pub fn with_mode(mut self, m: BatchMode) -> Self {
        self.mode = m;
        self
    }
}

pub struct BatchExecutor {
    config: BatchExecutorConfig,
}

impl BatchExecutor {
    pub fn new() -> Self {
        Self {
            config: BatchExecutorConfig::default(),
        }
    }
    pub fn with_config(config: BatchExecutorConfig) -> Self {
        Self { config }
    }
    pub fn config(&self) -> &BatchExecutorConfig {
        &self.config
    }

    /// Apply `executor_fn` to every item under the configured strategy and mode.
    pub async fn execute<T, R, F, Fut>(&self, items: Vec<T>, executor_fn: F) -> BatchReport<R>
    where
        F: Fn(T) -> Fut,
        Fut: Future<Output = Result<R>>,
    {
        let start = Instant::now();
        let total = items.len();
        let limit = match self.config.strategy {
            BatchStrategy::Sequential => 1,
            BatchStrategy::Parallel => total.max(1),
            BatchStrategy::Concurrent { max_concurrency } => max_concurrency.max(1),
        };

        // `buffered` keeps submission order regardless of completion order.
        let outcomes = stream::iter(items.into_iter().map(executor_fn)).buffered(limit);
        futures::pin_mut!(outcomes);
        let mut collected = Vec::with_capacity(total);
        while let Some(outcome) = outcomes.next().await {
            let failed = outcome.is_err();
            collected.push(outcome);
            if failed && self.config.mode == BatchMode::FailFast {
                break;
            }
        }

        BatchReport::from_outcomes(collected, start.elapsed())
    }
}

impl Default for BatchExecutor {
    fn default() -> Self {
        Self::new()
    }
}
