//! Scoring engine for fairness ranking.
//!
//! Sums weighted fairness rules into one score per candidate and ranks
//! candidate pools. Ranking is a stable ascending sort: candidates with
//! equal scores keep their input order.

use std::sync::{Arc, OnceLock};

use super::rules::{
    DutyLoad, GuaranteeBonus, MonthlyRecency, RoleRepetition, TierAdjustment, WeeklyRecency,
};
use super::{FairnessLedger, FairnessRule, FairnessScore, ScoringContext};
use crate::models::{Person, Role};

#[derive(Clone)]
struct WeightedRule {
    rule: Arc<dyn FairnessRule>,
    weight: FairnessScore,
}

/// A composable engine for candidate ranking.
///
/// # Example
/// ```
/// use av_rota::fairness::{rules, ScoringEngine};
///
/// let engine = ScoringEngine::new()
///     .with_rule(rules::RoleRepetition)
///     .with_weighted_rule(rules::DutyLoad, 2);
/// assert_eq!(engine.rule_names(), vec!["ROLE_REPETITION", "DUTY_LOAD"]);
/// ```
#[derive(Clone)]
pub struct ScoringEngine {
    rules: Vec<WeightedRule>,
}

impl ScoringEngine {
    /// Creates an empty engine (every candidate scores 0).
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The standard rotation rule set, all weights 1.
    pub fn standard() -> &'static ScoringEngine {
        static STANDARD: OnceLock<ScoringEngine> = OnceLock::new();
        STANDARD.get_or_init(|| {
            ScoringEngine::new()
                .with_rule(RoleRepetition)
                .with_rule(MonthlyRecency)
                .with_rule(WeeklyRecency)
                .with_rule(DutyLoad)
                .with_rule(TierAdjustment)
                .with_rule(GuaranteeBonus)
        })
    }

    /// Adds a rule with weight 1.
    pub fn with_rule<R: FairnessRule + 'static>(self, rule: R) -> Self {
        self.with_weighted_rule(rule, 1)
    }

    /// Adds a weighted rule.
    pub fn with_weighted_rule<R: FairnessRule + 'static>(
        mut self,
        rule: R,
        weight: FairnessScore,
    ) -> Self {
        self.rules.push(WeightedRule {
            rule: Arc::new(rule),
            weight,
        });
        self
    }

    /// Rule names, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|wr| wr.rule.name()).collect()
    }

    /// Total score for `person` in `role`.
    pub fn score(
        &self,
        person: &Person,
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        self.rules
            .iter()
            .map(|wr| wr.rule.evaluate(person, role, ledger, ctx) * wr.weight)
            .sum()
    }

    /// Weighted per-rule terms, for explaining a pick.
    pub fn breakdown(
        &self,
        person: &Person,
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> Vec<(&'static str, FairnessScore)> {
        self.rules
            .iter()
            .map(|wr| {
                (
                    wr.rule.name(),
                    wr.rule.evaluate(person, role, ledger, ctx) * wr.weight,
                )
            })
            .collect()
    }

    /// Indices into `candidates`, most deserving first.
    ///
    /// Stable: equal scores keep input order.
    pub fn sort_indices(
        &self,
        candidates: &[&Person],
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> Vec<usize> {
        let scores: Vec<FairnessScore> = candidates
            .iter()
            .map(|p| self.score(p, role, ledger, ctx))
            .collect();
        let mut indices: Vec<usize> = (0..candidates.len()).collect();
        indices.sort_by_key(|&i| scores[i]);
        indices
    }

    /// Index of the most deserving candidate.
    pub fn select_best(
        &self,
        candidates: &[&Person],
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> Option<usize> {
        self.sort_indices(candidates, role, ledger, ctx)
            .first()
            .copied()
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        ScoringEngine::standard().clone()
    }
}

impl std::fmt::Debug for ScoringEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringEngine")
            .field(
                "rules",
                &self
                    .rules
                    .iter()
                    .map(|r| format!("{}(w={})", r.rule.name(), r.weight))
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
