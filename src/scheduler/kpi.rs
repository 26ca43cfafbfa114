//! Rotation fairness metrics (KPIs).
//!
//! Summarizes how evenly a ledger spreads roles across the active roster
//! over a date range.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Total | Records dated in `[from, to]` |
//! | Per person | Records per active person (zero included) |
//! | Per person and role | Records per (active person, role) |
//! | Max / Min | Largest and smallest per-person count |
//! | Spread | Max − Min |
//! | Average | Mean per-person count |
//! | Never assigned | Active people with no record in range |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::fairness::FairnessLedger;
use crate::models::{Role, Roster};

/// Rotation performance indicators over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationKpi {
    /// Records in range held by active people.
    pub total_assignments: u32,
    /// Per active person.
    pub by_person: BTreeMap<String, u32>,
    /// Per active person, per role. People with no records are absent.
    pub by_person_role: BTreeMap<String, BTreeMap<Role, u32>>,
    /// Largest per-person count.
    pub max_per_person: u32,
    /// Smallest per-person count.
    pub min_per_person: u32,
    /// `max_per_person - min_per_person`.
    pub spread: u32,
    /// Mean per-person count (0.0 for an empty roster).
    pub avg_per_person: f64,
    /// Active people with no record in range, in roster order.
    pub never_assigned: Vec<String>,
}

impl RotationKpi {
    /// Computes KPIs for records dated `from..=to`.
    ///
    /// Inactive people and ids missing from the roster are ignored.
    pub fn calculate(
        ledger: &FairnessLedger,
        roster: &Roster,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Self {
        let mut by_person: BTreeMap<String, u32> =
            roster.active().map(|p| (p.id.clone(), 0)).collect();
        let mut by_person_role: BTreeMap<String, BTreeMap<Role, u32>> = BTreeMap::new();

        for record in ledger.records() {
            if record.date < from || record.date > to {
                continue;
            }
            let Some(count) = by_person.get_mut(&record.person_id) else {
                continue;
            };
            *count += 1;
            *by_person_role
                .entry(record.person_id.clone())
                .or_default()
                .entry(record.role)
                .or_insert(0) += 1;
        }

        let total_assignments: u32 = by_person.values().sum();
        let max_per_person = by_person.values().copied().max().unwrap_or(0);
        let min_per_person = by_person.values().copied().min().unwrap_or(0);
        let avg_per_person = if by_person.is_empty() {
            0.0
        } else {
            f64::from(total_assignments) / by_person.len() as f64
        };
        let never_assigned = roster
            .active()
            .filter(|p| by_person.get(&p.id) == Some(&0))
            .map(|p| p.id.clone())
            .collect();

        Self {
            total_assignments,
            by_person,
            by_person_role,
            max_per_person,
            min_per_person,
            spread: max_per_person - min_per_person,
            avg_per_person,
            never_assigned,
        }
    }

    /// Whether no active person is more than `max_spread` assignments
    /// ahead of another.
    pub fn is_balanced(&self, max_spread: u32) -> bool {
        self.spread <= max_spread
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Person;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn roster() -> Roster {
        Roster::new(vec![
            Person::new("ann", "Ann"),
            Person::new("ben", "Ben"),
            Person::new("cal", "Cal"),
            Person::new("dee", "Dee").inactive(),
        ])
    }

    #[test]
    fn test_kpi_counts_and_spread() {
        let mut l = FairnessLedger::new();
        l.add("ann", Role::Audio, d("2024-03-03"));
        l.add("ann", Role::Audio, d("2024-03-10"));
        l.add("ann", Role::Video, d("2024-03-17"));
        l.add("ben", Role::LeftMic, d("2024-03-10"));

        let kpi = RotationKpi::calculate(&l, &roster(), d("2024-03-01"), d("2024-03-31"));
        assert_eq!(kpi.total_assignments, 4);
        assert_eq!(kpi.by_person["ann"], 3);
        assert_eq!(kpi.by_person["cal"], 0);
        assert_eq!(kpi.by_person_role["ann"][&Role::Audio], 2);
        assert_eq!(kpi.max_per_person, 3);
        assert_eq!(kpi.min_per_person, 0);
        assert_eq!(kpi.spread, 3);
        assert!((kpi.avg_per_person - 4.0 / 3.0).abs() < 1e-10);
        assert_eq!(kpi.never_assigned, vec!["cal".to_string()]);
        assert!(!kpi.is_balanced(2));
        assert!(kpi.is_balanced(3));
    }

    #[test]
    fn test_kpi_range_is_inclusive() {
        let mut l = FairnessLedger::new();
        l.add("ann", Role::Audio, d("2024-02-29"));
        l.add("ann", Role::Audio, d("2024-03-01"));
        l.add("ben", Role::Audio, d("2024-03-31"));
        l.add("cal", Role::Audio, d("2024-04-01"));

        let kpi = RotationKpi::calculate(&l, &roster(), d("2024-03-01"), d("2024-03-31"));
        assert_eq!(kpi.total_assignments, 2);
        assert_eq!(kpi.never_assigned, vec!["cal".to_string()]);
    }

    #[test]
    fn test_kpi_ignores_inactive_and_unknown() {
        let mut l = FairnessLedger::new();
        l.add("dee", Role::Audio, d("2024-03-03"));
        l.add("zed", Role::Audio, d("2024-03-03"));

        let kpi = RotationKpi::calculate(&l, &roster(), d("2024-03-01"), d("2024-03-31"));
        assert_eq!(kpi.total_assignments, 0);
        assert!(!kpi.by_person.contains_key("dee"));
        assert_eq!(kpi.never_assigned.len(), 3);
        assert!(kpi.is_balanced(0));
    }

    #[test]
    fn test_kpi_empty_roster() {
        let kpi = RotationKpi::calculate(
            &FairnessLedger::new(),
            &Roster::default(),
            d("2024-03-01"),
            d("2024-03-31"),
        );
        assert_eq!(kpi.total_assignments, 0);
        assert_eq!(kpi.spread, 0);
        assert!((kpi.avg_per_person - 0.0).abs() < 1e-10);
    }
}
