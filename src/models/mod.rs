//! Rotation domain models.
//!
//! Reference data (people, roles), per-week inputs (week context, part
//! assignments) and per-week outputs (the weekly role map).
//!
//! # Lifecycles
//!
//! | Type | Lifecycle |
//! |------|-----------|
//! | Person / Roster | Loaded once per run, never mutated |
//! | Role / RoleClass | Static |
//! | WeekContext | Built once per week, read-only afterwards |
//! | WeekAssignment | Produced fresh per week, immutable once returned |

mod assignment;
mod person;
mod role;
mod week;

pub use assignment::{Displacement, WeekAssignment};
pub use person::{Person, PrivilegeTier, Roster, SpecialRole};
pub use role::{Role, RoleClass};
pub use week::{parse_date, PartAssignment, PartConstraint, WeekContext};
