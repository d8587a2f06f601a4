//! Execution session: the worker pool and run clock for one process

use std::time::{Duration, Instant};

use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::info;

use super::error::{PipelineError, Result};

/// Resources acquired once at process start and released once at the end.
///
/// Stages that evaluate work in parallel borrow the session's pool; nothing
/// else is shared between stages.
pub struct Session {
    app_name: String,
    parallelism: usize,
    pool: ThreadPool,
    started: Instant,
}

impl Session {
    /// Start a session whose pool runs at most `parallelism` tasks at once.
    pub fn start(app_name: &str, parallelism: usize) -> Result<Self> {
        if parallelism == 0 {
            return Err(PipelineError::InvalidConfig(
                "parallelism must be at least 1".to_string(),
            ));
        }

        let name = app_name.to_string();
        let pool = ThreadPoolBuilder::new()
            .num_threads(parallelism)
            .thread_name(move |i| format!("{}-worker-{}", name, i))
            .build()
            .map_err(|e| {
                PipelineError::InvalidConfig(format!("failed to start worker pool: {}", e))
            })?;

        info!(app = app_name, parallelism, "session started");
        Ok(Self {
            app_name: app_name.to_string(),
            parallelism,
            pool,
            started: Instant::now(),
        })
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn pool(&self) -> &ThreadPool {
        &self.pool
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Release the worker pool and return the session's lifetime.
    pub fn close(self) -> Duration {
        let elapsed = self.started.elapsed();
        info!(app = %self.app_name, elapsed_ms = elapsed.as_millis() as u64, "session closed");
        drop(self.pool);
        elapsed
    }
}
