//! Worker pool sized to the batch.
//!
//! Tasks are self-contained, so execution is a plain fan-out: a dedicated
//! rayon pool of min(hardware threads, task count) workers maps the task
//! function over the items and joins before returning.

use rayon::prelude::*;
use tracing::warn;

/// Number of worker threads the host can usefully run
pub fn available_parallelism() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// Worker count policy: never more workers than tasks
pub fn bounded_worker_count(task_count: usize) -> usize {
    available_parallelism().min(task_count)
}

/// Run every task on a dedicated pool and join.
///
/// Returns only after the last task function has returned; results arrive
/// in input order. If the pool cannot be built, the items run sequentially
/// on the calling thread instead of failing the batch.
pub fn run_tasks<T, R, F>(items: &[T], workers: usize, task: F) -> Vec<R>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> R + Send + Sync,
{
    if items.is_empty() {
        return Vec::new();
    }

    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            warn!("worker pool unavailable ({}), running sequentially", e);
            return items.iter().map(task).collect();
        }
    };

    pool.install(|| items.par_iter().map(&task).collect())
}
