// src/system/pool.rs

use crate::{
    core::{dispatcher::{self, FeedbackSink}, registry::CommandRegistry},
    models::MessageEvent,
};
use std::{fmt, sync::Arc};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoolError {
    #[error("Could not build the dispatch worker pool: {0}")]
    Build(#[from] rayon::ThreadPoolBuildError),
}

/// Runs dispatches on a fixed-size worker pool.
///
/// Each submitted message becomes one synchronous dispatch task: the walk
/// never suspends or blocks on I/O, so a worker is free again as soon as the
/// terminal action (or error report) finishes. No ordering is guaranteed
/// between different messages.
pub struct DispatchPool {
    pool: rayon::ThreadPool,
    registry: Arc<CommandRegistry>,
    sink: Arc<dyn FeedbackSink>,
}

impl DispatchPool {
    /// Builds a pool with `workers` threads serving the given registry.
    pub fn new(
        registry: Arc<CommandRegistry>,
        sink: Arc<dyn FeedbackSink>,
        workers: usize,
    ) -> Result<Self, PoolError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("dispatch-{}", i))
            .build()?;
        log::debug!("Dispatch pool started with {} workers", workers);
        Ok(Self {
            pool,
            registry,
            sink,
        })
    }

    /// Submits one incoming message for dispatch. Returns immediately; the
    /// walk runs to completion on a worker thread.
    pub fn submit(&self, event: MessageEvent) {
        let registry = Arc::clone(&self.registry);
        let sink = Arc::clone(&self.sink);
        self.pool.spawn(move || {
            dispatcher::dispatch(&registry, event, sink.as_ref());
        });
    }
}

impl fmt::Debug for DispatchPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPool")
            .field("workers", &self.pool.current_num_threads())
            .field("registry", &self.registry)
            .finish()
    }
}
