//! Explicit executor handle for parallel subtree evaluation
//!
//! The chunker never touches rayon's global pool. Every recursive call receives a
//! [`Scheduler`] and fans its quadrants out through it, so callers decide where the work
//! runs (a dedicated pool, or inline on the calling thread for deterministic debugging).

use crate::Result;
use rayon::prelude::*;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub enum Scheduler {
    /// Run every task on the calling thread, in order
    #[default]
    Inline,
    /// Run tasks on a dedicated rayon thread pool
    Pool(Arc<rayon::ThreadPool>),
}

impl Scheduler {
    pub fn inline() -> Self {
        Scheduler::Inline
    }

    /// Build a dedicated pool with `num_threads` workers (0 = one per logical CPU)
    pub fn pool(num_threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("chunker-{index}"))
            .build()?;
        tracing::debug!("Chunker pool started with {} threads", pool.current_num_threads());
        Ok(Scheduler::Pool(Arc::new(pool)))
    }

    /// Number of tasks that can run at once
    pub fn parallelism(&self) -> usize {
        match self {
            Scheduler::Inline => 1,
            Scheduler::Pool(pool) => pool.current_num_threads(),
        }
    }

    /// Run four tasks and return their results in argument order
    pub fn join4<F, T>(&self, tasks: [F; 4]) -> [T; 4]
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match self {
            Scheduler::Inline => tasks.map(|task| task()),
            Scheduler::Pool(pool) => {
                let [a, b, c, d] = tasks;
                let ((ra, rb), (rc, rd)) =
                    pool.install(|| rayon::join(|| rayon::join(a, b), || rayon::join(c, d)));
                [ra, rb, rc, rd]
            }
        }
    }

    /// Run all tasks and return their results in submission order
    pub fn join_all<F, T>(&self, tasks: Vec<F>) -> Vec<T>
    where
        F: FnOnce() -> T + Send,
        T: Send,
    {
        match self {
            Scheduler::Inline => tasks.into_iter().map(|task| task()).collect(),
            Scheduler::Pool(pool) => {
                pool.install(|| tasks.into_par_iter().map(|task| task()).collect())
            }
        }
    }
}
