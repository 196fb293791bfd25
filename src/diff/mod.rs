//! Diff planner - classification and change-set generation

mod compare;
mod engine;
mod plan;

pub use compare::{classify_file, MTIME_TOLERANCE_SECS};
pub use engine::{ChangeSet, ChangeStats};
pub use plan::{plan_deletes, plan_uploads, PlanProgressCallback};
