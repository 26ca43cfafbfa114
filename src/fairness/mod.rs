//! Fairness ledger and scoring rules.
//!
//! The ledger holds the rotation history; fairness rules turn that
//! history plus the week's context into a score per (person, role).
//! Candidates are ranked by ascending score.
//!
//! # Usage
//!
//! ```
//! use av_rota::fairness::{FairnessLedger, ScoringContext};
//! use av_rota::models::{Person, Role};
//! use chrono::NaiveDate;
//!
//! let anchor = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
//! let mut ledger = FairnessLedger::new();
//! ledger.add("ann", Role::Audio, anchor - chrono::Duration::days(7));
//!
//! let ann = Person::new("ann", "Ann Cole");
//! let ctx = ScoringContext::at_date(anchor);
//! // 10 (role repeat) + 5 (30-day) + 20 (7-day) - 15 (general tier)
//! assert_eq!(ledger.score(&ann, Role::Audio, &ctx), 20);
//! ```

mod context;
mod engine;
mod ledger;
pub mod rules;

pub use context::ScoringContext;
pub use engine::ScoringEngine;
pub use ledger::{AssignmentRecord, FairnessLedger, YearMonth};

use crate::models::{Person, Role};
use std::fmt::Debug;

/// Score returned by a fairness rule.
///
/// Lower scores = more deserving of the role this week.
pub type FairnessScore = i64;

/// A fairness rule contributing one additive term to a candidate's score.
///
/// # Score Convention
/// **Lower score = more deserving.** Penalties are positive, bonuses
/// negative.
pub trait FairnessRule: Send + Sync + Debug {
    /// Rule name (e.g., "DUTY_LOAD").
    fn name(&self) -> &'static str;

    /// Evaluates the term for `person` taking `role` in the context's week.
    fn evaluate(
        &self,
        person: &Person,
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
