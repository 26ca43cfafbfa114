//! Person and roster models.
//!
//! People are immutable reference data: loaded once per run, never
//! mutated by the engine. Each carries a privilege tier, a set of
//! restriction tags and an optional special role.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Privilege tier, most to least privileged.
///
/// Ordering follows declaration order, so `Senior < Assistant < General < Trainee`
/// in `Ord` terms; use [`PrivilegeTier::qualifies_for`] for gate checks.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegeTier {
    /// Cleared for every gated role.
    Senior,
    /// Cleared for roles gated at assistant or general.
    Assistant,
    /// Default tier for new people.
    #[default]
    General,
    /// Not yet cleared for any gated duty.
    Trainee,
}

/// Named special role a person may hold outside the AV rotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRole {
    PrimaryConductor,
    BackupConductor,
}

impl PrivilegeTier {
    /// Whether this tier meets a gate requiring at least `minimum`.
    #[inline]
    pub fn qualifies_for(&self, minimum: PrivilegeTier) -> bool {
        *self <= minimum
    }
}

/// A roster member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique identifier.
    pub id: String,
    /// Display name, as it appears in part assignments.
    pub name: String,
    /// Privilege tier.
    #[serde(default)]
    pub tier: PrivilegeTier,
    /// Restriction tags (see `RotaConfig::restrictions`).
    #[serde(default)]
    pub restrictions: BTreeSet<String>,
    /// Inactive people are never assigned.
    #[serde(default = "default_active")]
    pub active: bool,
    #[serde(default)]
    pub special_role: Option<SpecialRole>,
}

fn default_active() -> bool {
    true
}

impl Person {
    /// Creates an active general-tier person.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tier: PrivilegeTier::General,
            restrictions: BTreeSet::new(),
            active: true,
            special_role: None,
        }
    }

    /// Sets the privilege tier.
    pub fn with_tier(mut self, tier: PrivilegeTier) -> Self {
        self.tier = tier;
        self
    }

    /// Adds a restriction tag.
    pub fn with_restriction(mut self, tag: impl Into<String>) -> Self {
        self.restrictions.insert(tag.into());
        self
    }

    /// Marks the person inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Sets the special role.
    pub fn with_special_role(mut self, role: SpecialRole) -> Self {
        self.special_role = Some(role);
        self
    }

    /// Whether the person carries a restriction tag.
    pub fn has_restriction(&self, tag: &str) -> bool {
        self.restrictions.contains(tag)
    }
}

/// The full roster, in definition order.
///
/// Definition order is significant: candidate pools are built by walking
/// the roster, and equal fairness scores resolve to the earlier person.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Roster {
    people: Vec<Person>,
}

impl Roster {
    /// Creates a roster from people in definition order.
    pub fn new(people: Vec<Person>) -> Self {
        Self { people }
    }

    /// Adds a person at the end of the roster.
    pub fn with_person(mut self, person: Person) -> Self {
        self.people.push(person);
        self
    }

    /// Looks a person up by id.
    pub fn get(&self, id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Whether a person with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// All people in definition order.
    pub fn iter(&self) -> impl Iterator<Item = &Person> {
        self.people.iter()
    }

    /// Active people in definition order.
    pub fn active(&self) -> impl Iterator<Item = &Person> {
        self.people.iter().filter(|p| p.active)
    }

    /// The person holding a special role, if any.
    pub fn with_special(&self, role: SpecialRole) -> Option<&Person> {
        self.people.iter().find(|p| p.special_role == Some(role))
    }

    /// Number of people.
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }
}
