//! Static rotation configuration.
//!
//! Loaded once per run: the roster, the restriction-tag table, gated
//! roles, the role priority order, fixed role subsets (video), quota
//! rules, guaranteed participants and per-role preference lists.
//!
//! Loading validates the tables; malformed configuration is fatal and
//! never reaches the per-week flow.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use crate::error::RotaError;
use crate::models::{Person, PrivilegeTier, Role, RoleClass, Roster};
use crate::validation::validate_config;

/// Reserved restriction tag: caps the holder at one mic-class role per month.
///
/// Blocks no role directly.
pub const MIC_QUOTA_TAG: &str = "mic_quota";

/// A monthly cap on roles of one class for one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotaRule {
    /// Restricted person.
    pub person_id: String,
    /// Role class the cap applies to.
    pub class: RoleClass,
    /// Maximum assignments per calendar month.
    #[serde(default = "default_monthly_limit")]
    pub monthly_limit: u32,
}

fn default_monthly_limit() -> u32 {
    1
}

impl QuotaRule {
    /// One assignment per month in `class`.
    pub fn monthly(person_id: impl Into<String>, class: RoleClass) -> Self {
        Self {
            person_id: person_id.into(),
            class,
            monthly_limit: 1,
        }
    }
}

/// Rotation configuration tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotaConfig {
    /// All people, in definition order.
    pub roster: Roster,
    /// Restriction tag → roles it blocks.
    #[serde(default)]
    pub restrictions: BTreeMap<String, Vec<Role>>,
    /// Gated role → minimum tier.
    #[serde(default)]
    pub privileged_roles: BTreeMap<Role, PrivilegeTier>,
    /// Roles, most operationally critical first.
    #[serde(default = "default_priority_order")]
    pub priority_order: Vec<Role>,
    /// Roles only a fixed set of people may hold (e.g. video).
    #[serde(default)]
    pub role_subsets: BTreeMap<Role, BTreeSet<String>>,
    /// Explicit monthly quotas.
    #[serde(default)]
    pub quota_rules: Vec<QuotaRule>,
    /// People who must receive some role every week eligibility allows.
    #[serde(default)]
    pub guaranteed: Vec<String>,
    /// Per-role preferred candidates; narrows the pool when any are available.
    #[serde(default)]
    pub preferences: BTreeMap<Role, Vec<String>>,
}

fn default_priority_order() -> Vec<Role> {
    Role::ALL.to_vec()
}

impl RotaConfig {
    /// Creates a configuration with default priority order and empty tables.
    pub fn new(roster: Roster) -> Self {
        Self {
            roster,
            restrictions: BTreeMap::new(),
            privileged_roles: BTreeMap::new(),
            priority_order: default_priority_order(),
            role_subsets: BTreeMap::new(),
            quota_rules: Vec::new(),
            guaranteed: Vec::new(),
            preferences: BTreeMap::new(),
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self, RotaError> {
        let config: Self = serde_json::from_str(json)?;
        config.validated()
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RotaError> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Runs configuration validation, returning `self` if clean.
    pub fn validated(self) -> Result<Self, RotaError> {
        validate_config(&self).map_err(RotaError::InvalidConfig)?;
        Ok(self)
    }

    /// Adds a restriction tag.
    pub fn with_restriction(mut self, tag: impl Into<String>, roles: Vec<Role>) -> Self {
        self.restrictions.insert(tag.into(), roles);
        self
    }

    /// Gates a role behind a minimum tier.
    pub fn with_privileged_role(mut self, role: Role, minimum: PrivilegeTier) -> Self {
        self.privileged_roles.insert(role, minimum);
        self
    }

    /// Sets the role priority order.
    pub fn with_priority_order(mut self, order: Vec<Role>) -> Self {
        self.priority_order = order;
        self
    }

    /// Restricts a role to a fixed set of people.
    pub fn with_role_subset<I, S>(mut self, role: Role, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.role_subsets
            .insert(role, ids.into_iter().map(Into::into).collect());
        self
    }

    /// Adds a quota rule.
    pub fn with_quota(mut self, rule: QuotaRule) -> Self {
        self.quota_rules.push(rule);
        self
    }

    /// Appends a guaranteed participant.
    pub fn with_guaranteed(mut self, id: impl Into<String>) -> Self {
        self.guaranteed.push(id.into());
        self
    }

    /// Sets the preference list for a role.
    pub fn with_preference<I, S>(mut self, role: Role, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.preferences
            .insert(role, ids.into_iter().map(Into::into).collect());
        self
    }

    /// Roles blocked by a restriction tag (empty for unknown or quota tags).
    pub fn blocked_roles(&self, tag: &str) -> &[Role] {
        self.restrictions.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Minimum tier for a gated role.
    pub fn required_tier(&self, role: Role) -> Option<PrivilegeTier> {
        self.privileged_roles.get(&role).copied()
    }

    /// Whether a person is a guaranteed participant.
    pub fn is_guaranteed(&self, person_id: &str) -> bool {
        self.guaranteed.iter().any(|id| id == person_id)
    }

    /// Quota rules in force: the explicit ones, then a mic quota for every
    /// person tagged [`MIC_QUOTA_TAG`] who has no explicit mic rule.
    pub fn effective_quota_rules(&self) -> Vec<QuotaRule> {
        let mut rules = self.quota_rules.clone();
        for person in self.roster.iter() {
            let covered = rules
                .iter()
                .any(|r| r.person_id == person.id && r.class == RoleClass::Mic);
            if person.has_restriction(MIC_QUOTA_TAG) && !covered {
                rules.push(QuotaRule::monthly(person.id.clone(), RoleClass::Mic));
            }
        }
        rules
    }

    /// Looks up a person.
    pub fn person(&self, id: &str) -> Option<&Person> {
        self.roster.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::ValidationErrorKind;

    const SAMPLE: &str = r#"{
        "roster": [
            {"id": "ann", "name": "Ann Cole", "tier": "senior"},
            {"id": "ben", "name": "Ben Ruiz", "restrictions": ["no_video", "mic_quota"]},
            {"id": "cy", "name": "Cy Park", "tier": "assistant", "active": false}
        ],
        "restrictions": {"no_video": ["video"], "mic_quota": []},
        "privileged_roles": {"audio": "assistant"},
        "role_subsets": {"video": ["ann"]},
        "guaranteed": ["ben"],
        "preferences": {"entrance_1": ["cy", "ann"]}
    }"#;

    #[test]
    fn test_from_json_str() {
        let cfg = RotaConfig::from_json_str(SAMPLE).unwrap();
        assert_eq!(cfg.roster.len(), 3);
        assert_eq!(cfg.priority_order, Role::ALL.to_vec());
        assert_eq!(cfg.blocked_roles("no_video"), &[Role::Video]);
        assert!(cfg.blocked_roles("mic_quota").is_empty());
        assert!(cfg.blocked_roles("nonexistent").is_empty());
        assert_eq!(cfg.required_tier(Role::Audio), Some(PrivilegeTier::Assistant));
        assert_eq!(cfg.required_tier(Role::Video), None);
        assert!(cfg.is_guaranteed("ben"));
        assert!(!cfg.is_guaranteed("ann"));
        assert_eq!(cfg.preferences[&Role::Entrance1], vec!["cy", "ann"]);
        assert!(!cfg.person("cy").unwrap().active);
    }

    #[test]
    fn test_tagged_person_gets_mic_quota() {
        let cfg = RotaConfig::from_json_str(SAMPLE).unwrap();
        let rules = cfg.effective_quota_rules();
        assert_eq!(rules, vec![QuotaRule::monthly("ben", RoleClass::Mic)]);
    }

    #[test]
    fn test_explicit_quota_not_duplicated() {
        let roster = Roster::default()
            .with_person(Person::new("a", "A").with_restriction(MIC_QUOTA_TAG));
        let cfg = RotaConfig::new(roster)
            .with_restriction(MIC_QUOTA_TAG, vec![])
            .with_quota(QuotaRule {
                person_id: "a".into(),
                class: RoleClass::Mic,
                monthly_limit: 2,
            });
        let rules = cfg.effective_quota_rules();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].monthly_limit, 2);
    }

    #[test]
    fn test_unknown_tag_is_fatal() {
        let json = r#"{"roster": [{"id": "a", "name": "A", "restrictions": ["no_ladders"]}]}"#;
        match RotaConfig::from_json_str(json) {
            Err(RotaError::InvalidConfig(errors)) => {
                assert!(errors
                    .iter()
                    .any(|e| e.kind == ValidationErrorKind::UnknownRestriction));
            }
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RotaConfig::from_json_str("{not json"),
            Err(RotaError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            RotaConfig::from_path("/nonexistent/rota.json"),
            Err(RotaError::Io(_))
        ));
    }
}
