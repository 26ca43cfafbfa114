//! Greedy weekly assignment with a guarantee pass.
//!
//! # Algorithm
//!
//! 1. **Seed.** Apply manual overrides verbatim and mark their holders used.
//! 2. **Greedy pass.** Visit roles in priority order. For each open role,
//!    build the pool of active, unused, eligible people; drop anyone whose
//!    monthly quota for the role's class is spent; narrow to the role's
//!    preference list if that leaves anyone; pick the lowest fairness
//!    score. Each pick is written to the ledger immediately, so later
//!    roles see it.
//! 3. **Guarantee pass.** Each guaranteed person still unused takes the
//!    eligible role whose non-guaranteed holder scores highest, or an open
//!    eligible role if none is held. The displaced holder is re-housed in
//!    the first open role they are eligible for, scanning least critical
//!    first; failing that they sit the week out.
//! 4. **Emit** the role map with conflicts, warnings and displacements.
//!
//! Unfilled roles are recorded as conflicts, never raised. Each role is
//! decided once by the greedy pass, plus at most one change of hands in
//! the guarantee pass.
//!
//! # Complexity
//! O(r · p · s) where r = roles, p = roster size, s = scoring cost per
//! candidate (linear in that person's history).

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, info, warn};

use crate::config::{QuotaRule, RotaConfig};
use crate::eligibility::EligibilityEvaluator;
use crate::fairness::{FairnessLedger, FairnessScore, ScoringContext, ScoringEngine, YearMonth};
use crate::matching::{ExactMatcher, NameMatcher};
use crate::models::{Displacement, Person, Role, WeekAssignment, WeekContext};
use crate::validation::{validate_week, ValidationResult};

/// Input for one week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekRequest {
    /// The week's context.
    pub context: WeekContext,
    /// Manual role → person overrides, applied before the greedy pass.
    pub overrides: BTreeMap<Role, String>,
    /// Roles to leave empty this week.
    pub skip_roles: BTreeSet<Role>,
}

impl WeekRequest {
    /// Creates a request with no overrides or skips.
    pub fn new(context: WeekContext) -> Self {
        Self {
            context,
            overrides: BTreeMap::new(),
            skip_roles: BTreeSet::new(),
        }
    }

    /// Pins a person to a role.
    pub fn with_override(mut self, role: Role, person_id: impl Into<String>) -> Self {
        self.overrides.insert(role, person_id.into());
        self
    }

    /// Leaves a role empty.
    pub fn with_skip(mut self, role: Role) -> Self {
        self.skip_roles.insert(role);
        self
    }

    /// Week anchor date.
    pub fn anchor(&self) -> NaiveDate {
        self.context.anchor
    }
}

/// Assigns weekly roles from a configuration.
///
/// # Example
///
/// ```
/// use av_rota::config::RotaConfig;
/// use av_rota::fairness::FairnessLedger;
/// use av_rota::models::{Person, Role, Roster, WeekContext};
/// use av_rota::scheduler::{AssignmentEngine, WeekRequest};
///
/// let roster = Roster::new(
///     (0..9).map(|i| Person::new(format!("p{i}"), format!("Person {i}"))).collect(),
/// );
/// let engine = AssignmentEngine::new(RotaConfig::new(roster));
/// let mut ledger = FairnessLedger::new();
///
/// let request = WeekRequest::new(WeekContext::new("2024-03-10").unwrap());
/// let week = engine.assign_week(&request, &mut ledger);
/// assert_eq!(week.filled_count(), 9);
/// assert!(week.is_conflict_free());
/// assert_eq!(ledger.len(), 9);
/// ```
#[derive(Debug)]
pub struct AssignmentEngine {
    config: RotaConfig,
    matcher: Box<dyn NameMatcher>,
    scoring: ScoringEngine,
    quota_rules: Vec<QuotaRule>,
}

impl AssignmentEngine {
    /// Creates an engine with exact name matching and the standard scoring rules.
    pub fn new(config: RotaConfig) -> Self {
        let quota_rules = config.effective_quota_rules();
        Self {
            config,
            matcher: Box::new(ExactMatcher),
            scoring: ScoringEngine::standard().clone(),
            quota_rules,
        }
    }

    /// Sets the name matcher used against weekly unavailability sets.
    pub fn with_matcher<M: NameMatcher + 'static>(mut self, matcher: M) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    /// Replaces the scoring rules.
    pub fn with_scoring(mut self, scoring: ScoringEngine) -> Self {
        self.scoring = scoring;
        self
    }

    /// The configuration.
    pub fn config(&self) -> &RotaConfig {
        &self.config
    }

    /// The name matcher.
    pub fn matcher(&self) -> &dyn NameMatcher {
        self.matcher.as_ref()
    }

    /// An eligibility evaluator over this engine's configuration.
    pub fn evaluator(&self) -> EligibilityEvaluator<'_> {
        EligibilityEvaluator::new(&self.config, self.matcher.as_ref())
    }

    /// Checks a produced week against the schedule invariants.
    pub fn validate(&self, week: &WeekAssignment, context: &WeekContext) -> ValidationResult {
        validate_week(week, context, &self.config, self.matcher.as_ref())
    }

    /// Assigns one week, recording every pick in `ledger`.
    pub fn assign_week(
        &self,
        request: &WeekRequest,
        ledger: &mut FairnessLedger,
    ) -> WeekAssignment {
        let anchor = request.anchor();
        let scoring_ctx = ScoringContext::for_week(&request.context, &self.config.guaranteed);
        let mut state = WeekState::new(anchor);

        self.seed(request, &mut state, ledger);
        self.greedy_pass(request, &scoring_ctx, &mut state, ledger);
        self.guarantee_pass(request, &scoring_ctx, &mut state, ledger);

        let week = state.finish();
        info!(
            week = %anchor,
            filled = week.filled_count(),
            conflicts = week.conflicts.len(),
            warnings = week.warnings.len(),
            displacements = week.displacements.len(),
            "week assigned"
        );
        week
    }

    fn seed(&self, request: &WeekRequest, state: &mut WeekState, ledger: &mut FairnessLedger) {
        for (&role, id) in &request.overrides {
            if state.used.contains(id) {
                state.week.conflicts.push(format!(
                    "{role}: override for '{id}' rejected, already assigned this week"
                ));
                warn!(week = %state.anchor, role = %role, person = %id, "duplicate override");
                continue;
            }
            state.assign(role, id, ledger);
            state.pinned.insert(role);
            debug!(week = %state.anchor, role = %role, person = %id, "override applied");
        }
    }

    fn greedy_pass(
        &self,
        request: &WeekRequest,
        scoring_ctx: &ScoringContext,
        state: &mut WeekState,
        ledger: &mut FairnessLedger,
    ) {
        let evaluator = self.evaluator();
        let anchor = state.anchor;
        for &role in &self.config.priority_order {
            if state.week.is_filled(role) || request.skip_roles.contains(&role) {
                continue;
            }

            let mut pool: Vec<&Person> = self
                .config
                .roster
                .active()
                .filter(|p| !state.used.contains(&p.id))
                .filter(|p| evaluator.is_eligible(p, role, &request.context))
                .collect();

            let warnings = &mut state.week.warnings;
            pool.retain(|p| match self.quota_exclusion(&p.id, role, ledger, anchor) {
                Some(reason) => {
                    warn!(week = %anchor, role = %role, person = %p.id, "{reason}");
                    warnings.push(format!("{role}: '{}' excluded, {reason}", p.id));
                    false
                }
                None => true,
            });

            if let Some(preferred) = self.config.preferences.get(&role) {
                let narrowed: Vec<&Person> = pool
                    .iter()
                    .copied()
                    .filter(|p| preferred.contains(&p.id))
                    .collect();
                if !narrowed.is_empty() {
                    pool = narrowed;
                }
            }

            match self.scoring.select_best(&pool, role, ledger, scoring_ctx) {
                Some(best) => {
                    let person = pool[best];
                    debug!(
                        week = %anchor,
                        role = %role,
                        person = %person.id,
                        score = self.scoring.score(person, role, ledger, scoring_ctx),
                        pool = pool.len(),
                        "role assigned"
                    );
                    state.assign(role, &person.id, ledger);
                }
                None => {
                    warn!(week = %anchor, role = %role, "no eligible candidate");
                    state
                        .week
                        .conflicts
                        .push(format!("{role}: no eligible candidate"));
                }
            }
        }
    }

    fn guarantee_pass(
        &self,
        request: &WeekRequest,
        scoring_ctx: &ScoringContext,
        state: &mut WeekState,
        ledger: &mut FairnessLedger,
    ) {
        for guaranteed_id in &self.config.guaranteed {
            if state.used.contains(guaranteed_id) {
                continue;
            }
            let Some(person) = self.config.person(guaranteed_id) else {
                continue;
            };
            let eligible = self.assignable_roles(person, request, ledger, state.anchor);
            if eligible.is_empty() {
                debug!(
                    week = %state.anchor,
                    person = %guaranteed_id,
                    "guaranteed person has no eligible role"
                );
                continue;
            }

            match self.displacement_target(&eligible, scoring_ctx, state, ledger) {
                Some((role, incumbent)) => {
                    state.vacate(role, ledger);
                    state.assign(role, guaranteed_id, ledger);
                    let rehoused_to = self.rehouse(&incumbent, request, state, ledger);
                    info!(
                        week = %state.anchor,
                        role = %role,
                        guaranteed = %guaranteed_id,
                        displaced = %incumbent,
                        rehoused = ?rehoused_to,
                        "displaced for guaranteed participant"
                    );
                    state.week.displacements.push(Displacement {
                        role,
                        displaced: incumbent,
                        guaranteed: guaranteed_id.clone(),
                        rehoused_to,
                    });
                }
                None => match eligible.iter().copied().find(|r| !state.week.is_filled(*r)) {
                    Some(open) => {
                        state.assign(open, guaranteed_id, ledger);
                        debug!(
                            week = %state.anchor,
                            role = %open,
                            person = %guaranteed_id,
                            "guaranteed person placed in open role"
                        );
                    }
                    None => {
                        debug!(
                            week = %state.anchor,
                            person = %guaranteed_id,
                            "no displaceable role"
                        );
                    }
                },
            }
        }
    }

    /// Among eligible roles held by non-guaranteed, non-pinned people, the
    /// one whose holder scores highest. Ties go to the more critical role.
    fn displacement_target(
        &self,
        eligible: &[Role],
        scoring_ctx: &ScoringContext,
        state: &WeekState,
        ledger: &FairnessLedger,
    ) -> Option<(Role, String)> {
        let mut best: Option<(Role, &str, FairnessScore)> = None;
        for &role in eligible {
            if state.pinned.contains(&role) {
                continue;
            }
            let Some(holder_id) = state.week.holder(role) else {
                continue;
            };
            if self.config.is_guaranteed(holder_id) {
                continue;
            }
            let Some(holder) = self.config.person(holder_id) else {
                continue;
            };
            let score = self.scoring.score(holder, role, ledger, scoring_ctx);
            if best.map_or(true, |(_, _, top)| score > top) {
                best = Some((role, holder_id, score));
            }
        }
        best.map(|(role, id, _)| (role, id.to_string()))
    }

    /// Puts a displaced person in the least critical open role they can take.
    fn rehouse(
        &self,
        person_id: &str,
        request: &WeekRequest,
        state: &mut WeekState,
        ledger: &mut FairnessLedger,
    ) -> Option<Role> {
        let person = self.config.person(person_id)?;
        let evaluator = self.evaluator();
        let role = self.config.priority_order.iter().rev().copied().find(|&role| {
            !state.week.is_filled(role)
                && !request.skip_roles.contains(&role)
                && evaluator.is_eligible(person, role, &request.context)
                && self
                    .quota_exclusion(person_id, role, ledger, state.anchor)
                    .is_none()
        })?;
        state.assign(role, person_id, ledger);
        Some(role)
    }

    /// Roles a person could take this week regardless of occupancy:
    /// eligible, not skipped, and within quota.
    fn assignable_roles(
        &self,
        person: &Person,
        request: &WeekRequest,
        ledger: &FairnessLedger,
        anchor: NaiveDate,
    ) -> Vec<Role> {
        self.evaluator()
            .eligible_roles(person, &request.context)
            .into_iter()
            .filter(|r| !request.skip_roles.contains(r))
            .filter(|&r| self.quota_exclusion(&person.id, r, ledger, anchor).is_none())
            .collect()
    }

    /// Why a quota bars `person_id` from `role` this month, if it does.
    fn quota_exclusion(
        &self,
        person_id: &str,
        role: Role,
        ledger: &FairnessLedger,
        anchor: NaiveDate,
    ) -> Option<String> {
        let month = YearMonth::of(anchor);
        self.quota_rules
            .iter()
            .filter(|rule| rule.person_id == person_id && rule.class.contains(role))
            .find_map(|rule| {
                let used = ledger.monthly_class_count(person_id, rule.class, month);
                (used >= rule.monthly_limit).then(|| {
                    format!(
                        "monthly {:?} quota reached ({used}/{}) for {}-{:02}",
                        rule.class, rule.monthly_limit, month.year, month.month
                    )
                })
            })
    }
}

/// Mutable state for the week being assigned.
///
/// `assign` and `vacate` are the only ways the role map and the ledger
/// change, so the two stay in step.
struct WeekState {
    anchor: NaiveDate,
    week: WeekAssignment,
    used: HashSet<String>,
    pinned: HashSet<Role>,
}

impl WeekState {
    fn new(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            week: WeekAssignment::new(anchor),
            used: HashSet::new(),
            pinned: HashSet::new(),
        }
    }

    fn assign(&mut self, role: Role, person_id: &str, ledger: &mut FairnessLedger) {
        self.week.set(role, person_id);
        self.used.insert(person_id.to_string());
        ledger.add(person_id, role, self.anchor);
    }

    fn vacate(&mut self, role: Role, ledger: &mut FairnessLedger) -> Option<String> {
        let person_id = self.week.clear(role)?;
        self.used.remove(&person_id);
        ledger.remove(&person_id, role, self.anchor);
        Some(person_id)
    }

    fn finish(self) -> WeekAssignment {
        self.week
    }
}
