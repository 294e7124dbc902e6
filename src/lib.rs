//! Timetable Engine - weekly K-11 class timetable generation engine
//!
//! Turns a roster of teachers, classes, grading rules, and a grade vocabulary
//! into a small number of diverse, constraint-satisfying weekly timetables.
//!
//! # Pipeline
//!
//! Generation runs one seeded attempt at a time through a fixed pipeline:
//! 1. **Session Builder**: expand classes into individual weekly sessions,
//!    linking co-taught groups.
//! 2. **Backtracking Solver**: place every session into a slot, honoring
//!    fixed slots, availability, and one-entry-per-grade-per-slot.
//! 3. **Schedule Builder**: project the solved assignment into per-teacher
//!    and per-grade grids.
//! 4. **Study-Hall Placer**: fill configured study-hall groups into free
//!    slots shared by all their grades.
//! 5. **Open-Block Redistributor**: swap sessions to break up avoidable
//!    back-to-back open blocks.
//! 6. **Scorer & Diversity Filter**: rank surviving attempts and keep a
//!    handful of genuinely different options.
//!
//! # Example
//!
//! ```no_run
//! use timetable_engine::engine::{generate, NoOpProgress};
//! use timetable_engine::parser::load_input_from_dir;
//! use std::path::Path;
//!
//! let input = load_input_from_dir(Path::new("./data/demo")).unwrap();
//! let mut progress = NoOpProgress;
//! let result = generate(&input, &mut progress);
//! println!("status: {:?}, options: {}", result.status, result.options.len());
//! ```

pub mod engine;
pub mod error;
pub mod parser;
pub mod reporter;
pub mod types;
pub mod validator;

pub use error::{EngineError, Result};
