//! Fairness ledger: the assignment history.
//!
//! An ordered list of `(person, role, date)` records. Scoring and quota
//! checks read it; the assignment engine is its only writer, through
//! [`FairnessLedger::add`] and [`FairnessLedger::remove`]. One ledger is
//! threaded through a whole batch so each week sees the weeks before it.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{FairnessScore, ScoringContext, ScoringEngine};
use crate::error::RotaError;
use crate::models::{Person, Role, RoleClass};

/// One historical assignment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssignmentRecord {
    /// Assigned person.
    pub person_id: String,
    /// Role held.
    pub role: Role,
    /// Week anchor the role was held on.
    pub date: NaiveDate,
}

impl AssignmentRecord {
    /// Creates a record.
    pub fn new(person_id: impl Into<String>, role: Role, date: NaiveDate) -> Self {
        Self {
            person_id: person_id.into(),
            role,
            date,
        }
    }
}

/// A calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Whether `date` falls in this month.
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

/// Ordered assignment history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FairnessLedger {
    records: Vec<AssignmentRecord>,
}

impl FairnessLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a ledger from a snapshot of prior records.
    pub fn from_records(records: Vec<AssignmentRecord>) -> Self {
        Self { records }
    }

    /// Decodes a JSON snapshot (an array of records).
    pub fn from_json(json: &str) -> Result<Self, RotaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encodes the ledger as a JSON snapshot.
    pub fn to_json(&self) -> Result<String, RotaError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[AssignmentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Appends a record.
    pub fn add(&mut self, person_id: &str, role: Role, date: NaiveDate) {
        self.records.push(AssignmentRecord::new(person_id, role, date));
    }

    /// Deletes the first exact match. Returns whether one was found.
    pub fn remove(&mut self, person_id: &str, role: Role, date: NaiveDate) -> bool {
        match self
            .records
            .iter()
            .position(|r| r.person_id == person_id && r.role == role && r.date == date)
        {
            Some(index) => {
                self.records.remove(index);
                true
            }
            None => false,
        }
    }

    /// Records for a person, oldest first.
    pub fn records_for<'a>(
        &'a self,
        person_id: &'a str,
    ) -> impl Iterator<Item = &'a AssignmentRecord> {
        self.records.iter().filter(move |r| r.person_id == person_id)
    }

    /// Records dated exactly `date`.
    pub fn records_on(&self, date: NaiveDate) -> impl Iterator<Item = &AssignmentRecord> {
        self.records.iter().filter(move |r| r.date == date)
    }

    /// Times `person_id` held `role` on or before `reference`.
    pub fn role_count(&self, person_id: &str, role: Role, reference: NaiveDate) -> u32 {
        self.records_for(person_id)
            .filter(|r| r.role == role && r.date <= reference)
            .count() as u32
    }

    /// Records for `person_id` within the trailing `days` of `reference`,
    /// both ends inclusive. Future-dated records are ignored.
    pub fn window_count(&self, person_id: &str, reference: NaiveDate, days: i64) -> u32 {
        let start = reference - Duration::days(days);
        self.records_for(person_id)
            .filter(|r| r.date >= start && r.date <= reference)
            .count() as u32
    }

    /// Records for `person_id` in `month` for any role of `class`.
    pub fn monthly_class_count(&self, person_id: &str, class: RoleClass, month: YearMonth) -> u32 {
        self.records_for(person_id)
            .filter(|r| class.contains(r.role) && month.contains(r.date))
            .count() as u32
    }

    /// Whether `person_id` has no `class` assignment yet in `month`.
    pub fn monthly_quota_remaining(
        &self,
        person_id: &str,
        class: RoleClass,
        month: YearMonth,
    ) -> bool {
        self.monthly_class_count(person_id, class, month) == 0
    }

    /// Fairness score under the standard rule set. Lower is more deserving.
    pub fn score(&self, person: &Person, role: Role, ctx: &ScoringContext) -> FairnessScore {
        ScoringEngine::standard().score(person, role, self, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> FairnessLedger {
        FairnessLedger::from_records(vec![
            AssignmentRecord::new("ann", Role::Audio, d("2024-01-07")),
            AssignmentRecord::new("ann", Role::Audio, d("2024-02-25")),
            AssignmentRecord::new("ann", Role::RightMic, d("2024-03-03")),
            AssignmentRecord::new("ben", Role::LeftMic, d("2024-03-03")),
            AssignmentRecord::new("ann", Role::Video, d("2024-03-17")),
        ])
    }

    #[test]
    fn test_add_and_remove_first_match() {
        let mut l = FairnessLedger::new();
        let date = d("2024-03-10");
        l.add("ann", Role::Audio, date);
        l.add("ben", Role::Audio, date);
        l.add("ann", Role::Audio, date);
        assert_eq!(l.len(), 3);

        assert!(l.remove("ann", Role::Audio, date));
        assert_eq!(l.len(), 2);
        assert_eq!(l.records()[0].person_id, "ben");
        assert_eq!(l.records()[1].person_id, "ann");

        assert!(!l.remove("ann", Role::Video, date));
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn test_role_count_ignores_future() {
        let l = sample();
        assert_eq!(l.role_count("ann", Role::Audio, d("2024-03-10")), 2);
        assert_eq!(l.role_count("ann", Role::Audio, d("2024-01-31")), 1);
        assert_eq!(l.role_count("ann", Role::Video, d("2024-03-10")), 0);
        assert_eq!(l.role_count("zed", Role::Audio, d("2024-03-10")), 0);
    }

    #[test]
    fn test_window_bounds_inclusive() {
        let l = sample();
        let reference = d("2024-03-10");
        // 30 days back = 2024-02-09: includes 02-25 and 03-03, excludes the future 03-17.
        assert_eq!(l.window_count("ann", reference, 30), 2);
        // 7 days back = 2024-03-03, inclusive.
        assert_eq!(l.window_count("ann", reference, 7), 1);
        assert_eq!(l.window_count("ann", d("2024-03-11"), 7), 0);
    }

    #[test]
    fn test_monthly_quota() {
        let l = sample();
        let march = YearMonth::of(d("2024-03-24"));
        assert_eq!(l.monthly_class_count("ben", RoleClass::Mic, march), 1);
        assert!(!l.monthly_quota_remaining("ben", RoleClass::Mic, march));
        assert!(l.monthly_quota_remaining("ben", RoleClass::Technical, march));
        let april = YearMonth::of(d("2024-04-07"));
        assert!(l.monthly_quota_remaining("ben", RoleClass::Mic, april));
    }

    #[test]
    fn test_records_on() {
        let l = sample();
        assert_eq!(l.records_on(d("2024-03-03")).count(), 2);
        assert_eq!(l.records_on(d("2024-03-04")).count(), 0);
    }

    #[test]
    fn test_json_snapshot() {
        let l = sample();
        let json = l.to_json().unwrap();
        assert!(json.contains("\"right_mic\""));
        let back = FairnessLedger::from_json(&json).unwrap();
        assert_eq!(back, l);
        assert!(FairnessLedger::from_json("[{\"person_id\": 1}]").is_err());
    }
}
