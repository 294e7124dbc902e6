//! Cooperative progress callback (§5, §9 Design Notes): the core never
//! assumes an async runtime. A `ProgressReporter` is invoked synchronously at
//! the three suspension points a generation run passes through: once before
//! the first attempt, once at the top of every attempt, and once just before
//! each attempt invokes the solver.

pub trait ProgressReporter {
    fn on_init(&mut self, _total_attempts: usize) {}
    fn on_attempt(&mut self, _attempt: usize, _total_attempts: usize, _message: &str) {}
    fn on_before_search(&mut self) {}
}

/// Used by library callers and tests that don't care about progress.
#[derive(Debug, Default)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {}
