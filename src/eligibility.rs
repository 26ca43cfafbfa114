//! Eligibility evaluation.
//!
//! Decides whether a person may hold a role in a given week. Stateless:
//! the answer depends only on the person, the role, the week context and
//! the static configuration. Occupancy and fairness are not considered.
//!
//! Checks run in a fixed order and the first failure supplies the reason:
//!
//! 1. Inactive
//! 2. Named in the week's no-AV set
//! 3. Mic role and named in the week's no-mic set
//! 4. A restriction tag (other than the quota tag) blocks the role
//! 5. Tier below the role's privilege gate
//! 6. Outside the role's fixed eligible subset

use std::fmt;

use crate::config::{RotaConfig, MIC_QUOTA_TAG};
use crate::matching::NameMatcher;
use crate::models::{Person, PrivilegeTier, Role, WeekContext};

/// Why a person cannot hold a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ineligibility {
    /// Person is not active.
    Inactive,
    /// Person holds a no-AV part this week.
    NoAv,
    /// Person holds a no-mic part this week and the role is a mic.
    NoMic,
    /// A restriction tag blocks the role.
    Restricted(String),
    /// Tier does not meet the role's gate.
    InsufficientTier {
        required: PrivilegeTier,
        actual: PrivilegeTier,
    },
    /// Role is limited to a fixed set that excludes the person.
    OutsideRoleSubset,
}

impl fmt::Display for Ineligibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ineligibility::Inactive => f.write_str("inactive"),
            Ineligibility::NoAv => f.write_str("no-AV constraint"),
            Ineligibility::NoMic => f.write_str("no-mic constraint"),
            Ineligibility::Restricted(tag) => write!(f, "restricted by tag '{tag}'"),
            Ineligibility::InsufficientTier { required, actual } => {
                write!(f, "requires tier {required:?} or above, has {actual:?}")
            }
            Ineligibility::OutsideRoleSubset => f.write_str("not in the role's eligible set"),
        }
    }
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Eligibility {
    /// The person may hold the role.
    Eligible,
    /// The first check that failed.
    Ineligible(Ineligibility),
}

impl Eligibility {
    /// Whether the person may hold the role.
    #[inline]
    pub fn is_eligible(&self) -> bool {
        matches!(self, Eligibility::Eligible)
    }

    /// Human-readable reason, if ineligible.
    pub fn reason(&self) -> Option<String> {
        match self {
            Eligibility::Eligible => None,
            Eligibility::Ineligible(why) => Some(why.to_string()),
        }
    }
}

/// Evaluates eligibility against a configuration and a name matcher.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityEvaluator<'a> {
    config: &'a RotaConfig,
    matcher: &'a dyn NameMatcher,
}

impl<'a> EligibilityEvaluator<'a> {
    /// Creates an evaluator.
    pub fn new(config: &'a RotaConfig, matcher: &'a dyn NameMatcher) -> Self {
        Self { config, matcher }
    }

    /// Checks whether `person` may hold `role` in `week`.
    pub fn check(&self, person: &Person, role: Role, week: &WeekContext) -> Eligibility {
        match self.first_failure(person, role, week) {
            None => Eligibility::Eligible,
            Some(why) => Eligibility::Ineligible(why),
        }
    }

    /// Shorthand for `check(..).is_eligible()`.
    pub fn is_eligible(&self, person: &Person, role: Role, week: &WeekContext) -> bool {
        self.first_failure(person, role, week).is_none()
    }

    /// Roles the person may hold this week, in configured priority order.
    pub fn eligible_roles(&self, person: &Person, week: &WeekContext) -> Vec<Role> {
        self.config
            .priority_order
            .iter()
            .copied()
            .filter(|&role| self.is_eligible(person, role, week))
            .collect()
    }

    fn first_failure(
        &self,
        person: &Person,
        role: Role,
        week: &WeekContext,
    ) -> Option<Ineligibility> {
        if !person.active {
            return Some(Ineligibility::Inactive);
        }
        if self.matcher.matches(person, &week.blocked_for_all_av) {
            return Some(Ineligibility::NoAv);
        }
        if role.is_mic() && self.matcher.matches(person, &week.blocked_for_mic_only) {
            return Some(Ineligibility::NoMic);
        }
        if let Some(tag) = person
            .restrictions
            .iter()
            .filter(|tag| tag.as_str() != MIC_QUOTA_TAG)
            .find(|tag| self.config.blocked_roles(tag).contains(&role))
        {
            return Some(Ineligibility::Restricted(tag.clone()));
        }
        if let Some(required) = self.config.required_tier(role) {
            if !person.tier.qualifies_for(required) {
                return Some(Ineligibility::InsufficientTier {
                    required,
                    actual: person.tier,
                });
            }
        }
        if let Some(subset) = self.config.role_subsets.get(&role) {
            if !subset.contains(&person.id) {
                return Some(Ineligibility::OutsideRoleSubset);
            }
        }
        None
    }
}
