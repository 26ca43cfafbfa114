//! Weekly assignment, batch orchestration and rotation KPIs.
//!
//! # Algorithm
//!
//! `AssignmentEngine` is a greedy, priority-driven heuristic: roles are
//! filled most critical first, each by the lowest-scoring eligible
//! candidate, followed by a displacement pass that seats guaranteed
//! participants. It is not optimal; it makes no claim of minimal
//! unfairness or of finding a feasible fill when one exists.
//!
//! `BatchDriver` runs weeks one after another over a single ledger and
//! validates each result.
//!
//! # KPI
//!
//! `RotationKpi` measures how evenly a ledger spreads roles across the
//! active roster.

mod assign;
mod batch;
mod kpi;

pub use assign::{AssignmentEngine, WeekRequest};
pub use batch::{BatchDriver, BatchReport, ValidationPolicy, WeekOutcome};
pub use kpi::RotationKpi;
