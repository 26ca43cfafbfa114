//! Scoring context for fairness rule evaluation.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::models::WeekContext;

/// Per-week state passed to fairness rules.
///
/// Holds the reference date (the week anchor), each person's
/// speaking/reading duty count for the week, and the guaranteed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringContext {
    /// Date windows are measured back from.
    pub reference_date: NaiveDate,
    /// Duties this week (person id → count).
    pub duty_counts: BTreeMap<String, u32>,
    /// Guaranteed participants.
    pub guaranteed: BTreeSet<String>,
}

impl ScoringContext {
    /// Creates a context at the given date with no duties and no guarantees.
    pub fn at_date(reference_date: NaiveDate) -> Self {
        Self {
            reference_date,
            duty_counts: BTreeMap::new(),
            guaranteed: BTreeSet::new(),
        }
    }

    /// Builds the context for a week.
    pub fn for_week(week: &WeekContext, guaranteed: &[String]) -> Self {
        Self {
            reference_date: week.anchor,
            duty_counts: week.duty_counts.clone(),
            guaranteed: guaranteed.iter().cloned().collect(),
        }
    }

    /// Sets the duty count for a person.
    pub fn with_duty_count(mut self, person_id: impl Into<String>, count: u32) -> Self {
        self.duty_counts.insert(person_id.into(), count);
        self
    }

    /// Marks a person as guaranteed.
    pub fn with_guaranteed(mut self, person_id: impl Into<String>) -> Self {
        self.guaranteed.insert(person_id.into());
        self
    }

    /// Duties held by a person (0 if none).
    pub fn duty_count(&self, person_id: &str) -> u32 {
        self.duty_counts.get(person_id).copied().unwrap_or(0)
    }

    /// Whether a person is guaranteed.
    pub fn is_guaranteed(&self, person_id: &str) -> bool {
        self.guaranteed.contains(person_id)
    }
}
