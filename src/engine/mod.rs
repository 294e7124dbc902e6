//! The schedule generation engine (spec §2): everything needed to turn a
//! roster of teachers, classes, rules, and a grade vocabulary into a small
//! number of diverse, constraint-satisfying weekly timetables.

pub mod constants;
pub mod driver;
pub mod grade_parser;
pub mod grid;
pub mod interner;
pub mod output;
pub mod progress;
pub mod redistributor;
pub mod rng;
pub mod rules;
pub mod schedule_builder;
pub mod scorer;
pub mod session;
pub mod solver;
pub mod stats;
pub mod study_hall;

pub use driver::generate;
pub use output::{GenerationResult, GenerationStatus, ScheduleOption};
pub use progress::{NoOpProgress, ProgressReporter};
