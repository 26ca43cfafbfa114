//! Rotating AV support-role assignment.
//!
//! Assigns the nine weekly audio/video support roles to a volunteer roster,
//! honoring per-person restrictions, per-week part constraints and a
//! rotation history, so nobody is systematically over- or under-used.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Person`, `Roster`, `Role`, `WeekContext`,
//!   `WeekAssignment`
//! - **`config`**: Static rotation tables, loaded from JSON
//! - **`matching`**: Name matching against weekly unavailability sets
//! - **`eligibility`**: Whether a person may hold a role this week
//! - **`fairness`**: The assignment ledger and the fairness score
//! - **`scheduler`**: Greedy weekly assignment, batch runs, KPIs
//! - **`validation`**: Configuration checks and the weekly invariant checker
//!
//! # Example
//!
//! ```
//! use av_rota::config::RotaConfig;
//! use av_rota::fairness::FairnessLedger;
//! use av_rota::models::{Person, Roster, WeekContext};
//! use av_rota::scheduler::{BatchDriver, AssignmentEngine, WeekRequest};
//!
//! let roster = Roster::new(
//!     (0..12).map(|i| Person::new(format!("p{i}"), format!("Person {i}"))).collect(),
//! );
//! let driver = BatchDriver::new(AssignmentEngine::new(RotaConfig::new(roster)));
//! let weeks: Vec<WeekRequest> = ["2024-03-03", "2024-03-10"]
//!     .iter()
//!     .map(|d| WeekRequest::new(WeekContext::new(d).unwrap()))
//!     .collect();
//!
//! let mut ledger = FairnessLedger::new();
//! let report = driver.run(&weeks, &mut ledger);
//! assert_eq!(report.valid_count(), 2);
//! assert_eq!(ledger.len(), 18);
//! ```
//!
//! # Logging
//!
//! Decisions are reported through `tracing`. The crate installs no
//! subscriber.

pub mod config;
pub mod eligibility;
pub mod error;
pub mod fairness;
pub mod matching;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::RotaError;
