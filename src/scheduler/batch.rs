//! Sequential multi-week driver.
//!
//! Weeks run strictly in order over one ledger, so each week's picks feed
//! the next week's scores. Every week is validated after assignment.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{AssignmentEngine, WeekRequest};
use crate::fairness::FairnessLedger;
use crate::models::WeekAssignment;
use crate::validation::messages;

/// What to do with a week that fails validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationPolicy {
    /// Keep the week and report its violations.
    #[default]
    Accept,
    /// Drop the week's ledger records and mark it withheld.
    Withhold,
}

/// Result of one week in a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekOutcome {
    /// The produced role map.
    pub assignment: WeekAssignment,
    /// Validator messages (empty = valid).
    pub violations: Vec<String>,
    /// Whether the week's records were rolled back out of the ledger.
    pub withheld: bool,
}

impl WeekOutcome {
    /// True if the validator found nothing.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Results of a batch run, in week order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub weeks: Vec<WeekOutcome>,
}

impl BatchReport {
    /// Number of weeks that passed validation.
    pub fn valid_count(&self) -> usize {
        self.weeks.iter().filter(|w| w.is_valid()).count()
    }

    /// Weeks whose records were rolled back.
    pub fn withheld(&self) -> impl Iterator<Item = &WeekOutcome> {
        self.weeks.iter().filter(|w| w.withheld)
    }

    /// Total unresolved roles across the batch.
    pub fn conflict_count(&self) -> usize {
        self.weeks.iter().map(|w| w.assignment.conflicts.len()).sum()
    }

    /// Accepted assignments, skipping withheld weeks.
    pub fn accepted(&self) -> impl Iterator<Item = &WeekAssignment> {
        self.weeks
            .iter()
            .filter(|w| !w.withheld)
            .map(|w| &w.assignment)
    }
}

/// Runs an engine over a sequence of weeks.
#[derive(Debug)]
pub struct BatchDriver {
    engine: AssignmentEngine,
    policy: ValidationPolicy,
}

impl BatchDriver {
    /// Creates a driver that accepts every week.
    pub fn new(engine: AssignmentEngine) -> Self {
        Self {
            engine,
            policy: ValidationPolicy::default(),
        }
    }

    /// Sets the validation policy.
    pub fn with_policy(mut self, policy: ValidationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The wrapped engine.
    pub fn engine(&self) -> &AssignmentEngine {
        &self.engine
    }

    /// Assigns every week in order, threading `ledger` through all of them.
    pub fn run(&self, weeks: &[WeekRequest], ledger: &mut FairnessLedger) -> BatchReport {
        let mut report = BatchReport::default();

        for request in weeks {
            let checkpoint = (self.policy == ValidationPolicy::Withhold).then(|| ledger.clone());
            let assignment = self.engine.assign_week(request, ledger);
            let violations = match self.engine.validate(&assignment, &request.context) {
                Ok(()) => Vec::new(),
                Err(errors) => messages(&errors),
            };

            let withheld = match checkpoint {
                Some(before) if !violations.is_empty() => {
                    *ledger = before;
                    warn!(
                        week = %request.anchor(),
                        violations = violations.len(),
                        "week withheld, ledger rolled back"
                    );
                    true
                }
                _ => false,
            };

            report.weeks.push(WeekOutcome {
                assignment,
                violations,
                withheld,
            });
        }

        info!(
            weeks = report.weeks.len(),
            valid = report.valid_count(),
            conflicts = report.conflict_count(),
            "batch complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RotaConfig;
    use crate::models::{Person, Role, Roster, WeekContext};

    fn engine(n: usize) -> AssignmentEngine {
        let roster = Roster::new(
            (0..n)
                .map(|i| Person::new(format!("p{i}"), format!("Person {i}")))
                .collect(),
        );
        AssignmentEngine::new(RotaConfig::new(roster))
    }

    fn weeks(anchors: &[&str]) -> Vec<WeekRequest> {
        anchors
            .iter()
            .map(|a| WeekRequest::new(WeekContext::new(a).unwrap()))
            .collect()
    }

    #[test]
    fn test_batch_threads_ledger() {
        let driver = BatchDriver::new(engine(18));
        let mut ledger = FairnessLedger::new();
        let report = driver.run(&weeks(&["2024-03-03", "2024-03-10"]), &mut ledger);

        assert_eq!(report.weeks.len(), 2);
        assert_eq!(report.valid_count(), 2);
        assert_eq!(ledger.len(), 18);
        let first = &report.weeks[0].assignment;
        let second = &report.weeks[1].assignment;
        assert!(second.roles.values().all(|id| !first.contains_person(id)));
    }

    #[test]
    fn test_invalid_week_is_withheld_and_rolled_back() {
        let driver = BatchDriver::new(engine(12)).with_policy(ValidationPolicy::Withhold);
        let mut ledger = FairnessLedger::new();
        let mut bad = WeekRequest::new(
            WeekContext::new("2024-03-10")
                .unwrap()
                .with_blocked_all("p3"),
        )
        .with_override(Role::Audio, "p3");
        bad.skip_roles.insert(Role::Entrance2);
        let good = WeekRequest::new(WeekContext::new("2024-03-17").unwrap());

        let report = driver.run(&[bad, good], &mut ledger);

        assert!(report.weeks[0].withheld);
        assert!(!report.weeks[0].violations.is_empty());
        assert!(!report.weeks[1].withheld);
        assert_eq!(report.withheld().count(), 1);
        assert_eq!(report.accepted().count(), 1);
        assert_eq!(ledger.len(), 9);
        assert!(ledger
            .records()
            .iter()
            .all(|r| r.date.to_string() == "2024-03-17"));
    }

    #[test]
    fn test_accept_policy_keeps_invalid_week() {
        let driver = BatchDriver::new(engine(12));
        let mut ledger = FairnessLedger::new();
        let bad = WeekRequest::new(
            WeekContext::new("2024-03-10")
                .unwrap()
                .with_blocked_all("p3"),
        )
        .with_override(Role::Audio, "p3");

        let report = driver.run(&[bad], &mut ledger);
        assert!(!report.weeks[0].withheld);
        assert!(!report.weeks[0].is_valid());
        assert_eq!(ledger.len(), 9);
    }
}
