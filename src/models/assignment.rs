//! Weekly role map (solution) model.
//!
//! The result of assigning one week: which person holds each role, plus
//! the unresolved-role conflicts, quota warnings and guarantee-pass
//! displacements accumulated along the way. A week may be returned with
//! gaps; nothing in it is an error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Role;

/// A completed week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekAssignment {
    /// Week anchor date.
    pub anchor: NaiveDate,
    /// Role → person id. Roles left empty are absent.
    pub roles: BTreeMap<Role, String>,
    /// Roles no eligible candidate could fill.
    pub conflicts: Vec<String>,
    /// Non-fatal notes, e.g. quota exclusions.
    pub warnings: Vec<String>,
    /// Guarantee-pass displacements, in the order they happened.
    pub displacements: Vec<Displacement>,
}

/// One guarantee-pass displacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Displacement {
    /// Role that changed hands.
    pub role: Role,
    /// Previous holder.
    pub displaced: String,
    /// Guaranteed person who took the role.
    pub guaranteed: String,
    /// Where the displaced person ended up, if anywhere.
    pub rehoused_to: Option<Role>,
}

impl WeekAssignment {
    /// Creates an empty role map for a week.
    pub fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            roles: BTreeMap::new(),
            conflicts: Vec::new(),
            warnings: Vec::new(),
            displacements: Vec::new(),
        }
    }

    /// Person holding `role`, if filled.
    pub fn holder(&self, role: Role) -> Option<&str> {
        self.roles.get(&role).map(String::as_str)
    }

    /// First role (in declaration order) held by a person.
    pub fn role_of(&self, person_id: &str) -> Option<Role> {
        self.roles
            .iter()
            .find(|(_, id)| id.as_str() == person_id)
            .map(|(role, _)| *role)
    }

    /// Whether `role` is filled.
    pub fn is_filled(&self, role: Role) -> bool {
        self.roles.contains_key(&role)
    }

    /// Whether a person holds any role.
    pub fn contains_person(&self, person_id: &str) -> bool {
        self.roles.values().any(|id| id == person_id)
    }

    /// Number of filled roles.
    pub fn filled_count(&self) -> usize {
        self.roles.len()
    }

    /// Roles left empty, in declaration order.
    pub fn open_roles(&self) -> Vec<Role> {
        Role::ALL
            .iter()
            .copied()
            .filter(|r| !self.is_filled(*r))
            .collect()
    }

    /// Whether the week has no unresolved-role conflicts.
    pub fn is_conflict_free(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub(crate) fn set(&mut self, role: Role, person_id: impl Into<String>) {
        self.roles.insert(role, person_id.into());
    }

    pub(crate) fn clear(&mut self, role: Role) -> Option<String> {
        self.roles.remove(&role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_week() -> WeekAssignment {
        let mut w = WeekAssignment::new(NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
        w.set(Role::Audio, "ann");
        w.set(Role::RightMic, "ben");
        w
    }

    #[test]
    fn test_holder_and_role_of() {
        let w = sample_week();
        assert_eq!(w.holder(Role::Audio), Some("ann"));
        assert_eq!(w.holder(Role::Video), None);
        assert_eq!(w.role_of("ben"), Some(Role::RightMic));
        assert_eq!(w.role_of("zed"), None);
        assert!(w.contains_person("ann"));
        assert!(!w.contains_person("zed"));
    }

    #[test]
    fn test_open_roles() {
        let w = sample_week();
        assert_eq!(w.filled_count(), 2);
        let open = w.open_roles();
        assert_eq!(open.len(), 7);
        assert!(!open.contains(&Role::Audio));
        assert_eq!(open[0], Role::Video);
    }

    #[test]
    fn test_clear() {
        let mut w = sample_week();
        assert_eq!(w.clear(Role::Audio), Some("ann".to_string()));
        assert_eq!(w.clear(Role::Audio), None);
        assert!(!w.is_filled(Role::Audio));
    }

    #[test]
    fn test_serializes_role_keys() {
        let w = sample_week();
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["roles"]["right_mic"], "ben");
        assert_eq!(json["anchor"], "2024-03-10");
        assert!(w.is_conflict_free());
    }
}
