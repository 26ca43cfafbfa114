//! Configuration and schedule validation.
//!
//! Two checks live here:
//!
//! - [`validate_config`]: structural integrity of the static tables,
//!   run at load time. Any error is fatal.
//! - [`validate_week`]: post-hoc invariant check over a produced weekly
//!   role map. Errors are reported, never raised; the caller decides
//!   whether to persist the week.
//!
//! Week invariants checked:
//! 1. A person occupies at most one role
//! 2. Nobody blocked for all AV holds a role
//! 3. Nobody blocked for mics holds a mic role
//! 4. Gated roles are held by a qualifying tier
//! 5. Subset-restricted roles are held by a subset member
//!
//! A holder who is not on the roster is reported as well.

use std::collections::{BTreeMap, HashSet};

use crate::config::{RotaConfig, MIC_QUOTA_TAG};
use crate::matching::NameMatcher;
use crate::models::{Role, WeekAssignment, WeekContext};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two people share the same ID, or an ID is listed twice.
    DuplicateId,
    /// A person carries a restriction tag with no table entry.
    UnknownRestriction,
    /// A table references a person who is not on the roster.
    UnknownPerson,
    /// The priority order is not a permutation of all roles.
    InvalidPriorityOrder,
    /// A person holds more than one role in a week.
    MultipleRoles,
    /// A person blocked for all AV holds a role.
    NoAvViolation,
    /// A person blocked for mics holds a mic role.
    NoMicViolation,
    /// A gated role is held by a non-qualifying tier.
    PrivilegeViolation,
    /// A subset-restricted role is held by a non-member.
    RoleSubsetViolation,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Human-readable messages, in order.
pub fn messages(errors: &[ValidationError]) -> Vec<String> {
    errors.iter().map(|e| e.message.clone()).collect()
}

/// Validates the static configuration tables.
///
/// Checks:
/// 1. No duplicate person IDs
/// 2. Every restriction tag a person carries is in the restriction table
/// 3. Guaranteed, quota, preference and subset entries name roster people
/// 4. No person is listed as guaranteed twice
/// 5. The priority order lists every role exactly once
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_config(config: &RotaConfig) -> ValidationResult {
    let mut errors = Vec::new();

    let mut person_ids = HashSet::new();
    for p in config.roster.iter() {
        if !person_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate person ID: {}", p.id),
            ));
        }
        for tag in &p.restrictions {
            if tag != MIC_QUOTA_TAG && !config.restrictions.contains_key(tag) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownRestriction,
                    format!("Person '{}' carries unknown restriction tag '{}'", p.id, tag),
                ));
            }
        }
    }

    let mut unknown = |table: &str, id: &str| {
        if !person_ids.contains(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPerson,
                format!("{table} references unknown person '{id}'"),
            ));
        }
    };
    for id in &config.guaranteed {
        unknown("Guaranteed list", id);
    }
    for rule in &config.quota_rules {
        unknown("Quota rule", &rule.person_id);
    }
    for (role, ids) in &config.preferences {
        for id in ids {
            unknown(&format!("Preference list for {role}"), id);
        }
    }
    for (role, ids) in &config.role_subsets {
        for id in ids {
            unknown(&format!("Eligible set for {role}"), id);
        }
    }

    let mut seen = HashSet::new();
    for id in &config.guaranteed {
        if !seen.insert(id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Person '{id}' is listed as guaranteed more than once"),
            ));
        }
    }

    let ordered: HashSet<Role> = config.priority_order.iter().copied().collect();
    if config.priority_order.len() != Role::ALL.len() || ordered.len() != Role::ALL.len() {
        errors.push(ValidationError::new(
            ValidationErrorKind::InvalidPriorityOrder,
            format!(
                "Priority order must list each of the {} roles exactly once (got {})",
                Role::ALL.len(),
                config.priority_order.len()
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Checks a produced weekly role map against the week invariants.
///
/// Does not mutate the map or the ledger. A holder missing from the roster
/// is reported as [`ValidationErrorKind::UnknownPerson`].
pub fn validate_week(
    week: &WeekAssignment,
    context: &WeekContext,
    config: &RotaConfig,
    matcher: &dyn NameMatcher,
) -> ValidationResult {
    let mut errors = Vec::new();

    let mut held: BTreeMap<&str, Vec<Role>> = BTreeMap::new();
    for (role, id) in &week.roles {
        held.entry(id.as_str()).or_default().push(*role);
    }
    for (id, roles) in &held {
        if roles.len() > 1 {
            let list = roles
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(ValidationError::new(
                ValidationErrorKind::MultipleRoles,
                format!("{}: '{id}' holds multiple roles: {list}", week.anchor),
            ));
        }
    }

    for (&role, id) in &week.roles {
        let Some(person) = config.person(id) else {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownPerson,
                format!("{}: {role} is held by unknown person '{id}'", week.anchor),
            ));
            continue;
        };
        if matcher.matches(person, &context.blocked_for_all_av) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoAvViolation,
                format!("{}: '{id}' holds {role} despite a no-AV constraint", week.anchor),
            ));
        }
        if role.is_mic() && matcher.matches(person, &context.blocked_for_mic_only) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NoMicViolation,
                format!("{}: '{id}' holds {role} despite a no-mic constraint", week.anchor),
            ));
        }
        if let Some(required) = config.required_tier(role) {
            if !person.tier.qualifies_for(required) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::PrivilegeViolation,
                    format!(
                        "{}: '{id}' ({:?}) holds {role}, which requires {:?}",
                        week.anchor, person.tier, required
                    ),
                ));
            }
        }
        if let Some(subset) = config.role_subsets.get(&role) {
            if !subset.contains(&person.id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::RoleSubsetViolation,
                    format!("{}: '{id}' is not in the eligible set for {role}", week.anchor),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
