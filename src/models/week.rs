//! Weekly context model.
//!
//! A week is identified by its anchor date. The context records who is
//! already busy with speaking or reading duties that week and the two
//! unavailability sets derived from those duties. Once built, a context
//! is read-only.
//!
//! Entries in the unavailability sets are roster ids when the part was
//! resolved, free-text names otherwise; either way they are matched
//! against the roster through a [`crate::matching::NameMatcher`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::RotaError;

/// AV restriction implied by holding a particular part in a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartConstraint {
    /// Blocks every role.
    NoAv,
    /// Blocks only the two mic roles.
    NoMic,
    #[default]
    None,
}

/// A speaking or reading part held by someone during the week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartAssignment {
    /// Name as written in the source program.
    pub name: String,
    /// Roster id, when the extractor resolved one.
    #[serde(default)]
    pub person_id: Option<String>,
    /// Constraint the part places on AV duties.
    #[serde(default)]
    pub constraint: PartConstraint,
    /// Whether the part counts toward the person's duty load.
    #[serde(default = "default_counts_as_duty")]
    pub counts_as_duty: bool,
}

fn default_counts_as_duty() -> bool {
    true
}

impl PartAssignment {
    /// Creates a duty-bearing part with no AV constraint.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            person_id: None,
            constraint: PartConstraint::None,
            counts_as_duty: true,
        }
    }

    /// Sets the resolved roster id.
    pub fn with_person_id(mut self, id: impl Into<String>) -> Self {
        self.person_id = Some(id.into());
        self
    }

    /// Sets the AV constraint.
    pub fn with_constraint(mut self, constraint: PartConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    /// Marks the part as not counting toward duty load.
    pub fn not_a_duty(mut self) -> Self {
        self.counts_as_duty = false;
        self
    }
}

/// Per-week facts consumed by the assignment engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekContext {
    /// Week anchor date.
    pub anchor: NaiveDate,
    /// People blocked from every role this week.
    #[serde(default)]
    pub blocked_for_all_av: BTreeSet<String>,
    /// People blocked from the mic roles this week.
    #[serde(default)]
    pub blocked_for_mic_only: BTreeSet<String>,
    /// Speaking/reading duties this week (person id → count).
    #[serde(default)]
    pub duty_counts: BTreeMap<String, u32>,
}

impl WeekContext {
    /// Creates an empty context for the given `YYYY-MM-DD` anchor.
    pub fn new(anchor: &str) -> Result<Self, RotaError> {
        Ok(Self::at(parse_date(anchor)?))
    }

    /// Creates an empty context for an already-parsed anchor.
    pub fn at(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            blocked_for_all_av: BTreeSet::new(),
            blocked_for_mic_only: BTreeSet::new(),
            duty_counts: BTreeMap::new(),
        }
    }

    /// Derives a context from the week's part assignments.
    ///
    /// `no_av` parts go to `blocked_for_all_av`, `no_mic` parts to
    /// `blocked_for_mic_only`, keyed by the resolved roster id, or by the
    /// written name when the part is unresolved. Duty-bearing parts with a
    /// resolved id are counted per person.
    pub fn from_parts(anchor: &str, parts: &[PartAssignment]) -> Result<Self, RotaError> {
        let mut ctx = Self::new(anchor)?;
        for part in parts {
            let who = part.person_id.as_ref().unwrap_or(&part.name).clone();
            match part.constraint {
                PartConstraint::NoAv => {
                    ctx.blocked_for_all_av.insert(who);
                }
                PartConstraint::NoMic => {
                    ctx.blocked_for_mic_only.insert(who);
                }
                PartConstraint::None => {}
            }
            if part.counts_as_duty {
                if let Some(id) = &part.person_id {
                    *ctx.duty_counts.entry(id.clone()).or_insert(0) += 1;
                }
            }
        }
        Ok(ctx)
    }

    /// Adds a name to the all-roles block set.
    pub fn with_blocked_all(mut self, name: impl Into<String>) -> Self {
        self.blocked_for_all_av.insert(name.into());
        self
    }

    /// Adds a name to the mic-only block set.
    pub fn with_blocked_mic(mut self, name: impl Into<String>) -> Self {
        self.blocked_for_mic_only.insert(name.into());
        self
    }

    /// Sets the duty count for a person.
    pub fn with_duty_count(mut self, person_id: impl Into<String>, count: u32) -> Self {
        self.duty_counts.insert(person_id.into(), count);
        self
    }

    /// Duties held by a person this week (0 if none).
    pub fn duty_count(&self, person_id: &str) -> u32 {
        self.duty_counts.get(person_id).copied().unwrap_or(0)
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, RotaError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| RotaError::InvalidDate(raw.to_string()))
}
