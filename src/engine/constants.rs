//! Compile-time grid constants (§9 Design Notes: "never mutate").

pub use crate::types::{Block, Day, BLOCKS_PER_DAY, DAYS_PER_WEEK, GRID_SIZE};

/// Fixed day axis, Monday through Friday.
pub const DAY_NAMES: [&str; 5] = Day::NAMES;

/// Fixed block axis, 1 through 5.
pub const BLOCK_NUMBERS: [u8; 5] = [1, 2, 3, 4, 5];

/// The backtracking solver's node budget before it gives up and reports `Timeout` (§4.4).
pub const MAX_SEARCH_ITERATIONS: u64 = 100_000;

/// Default per-attempt wall-clock budget (§5, §6).
pub const DEFAULT_TIMEOUT_MS: u64 = 5_000;

/// Outer cap on redistributor swap iterations (§4.7).
pub const MAX_REDISTRIBUTE_ITERATIONS: u32 = 2_000;

pub const OPEN_SUBJECT: &str = "OPEN";
pub const STUDY_HALL_SUBJECT: &str = "Study Hall";
