//! Built-in fairness rules.
//!
//! Each rule contributes one additive term to a candidate's score. The
//! standard set, summed, is the rotation's fairness score:
//!
//! | Rule | Term |
//! |------|------|
//! | `RoleRepetition` | `10 × prior (person, role) records` |
//! | `MonthlyRecency` | `5 × records in trailing 30 days` |
//! | `WeeklyRecency` | `20 × records in trailing 7 days` |
//! | `DutyLoad` | `200 + 50 × duties` when duties > 0 |
//! | `TierAdjustment` | senior +25, assistant −25, general −15 |
//! | `GuaranteeBonus` | `−max(15, 50 − 15 × prior role records)` for guaranteed people |
//!
//! The 7-day window lies inside the 30-day window, so a recent record
//! counts toward both terms.
//!
//! # Score Convention
//! Lower score = more deserving of the role.

use super::{FairnessLedger, FairnessRule, FairnessScore, ScoringContext};
use crate::models::{Person, PrivilegeTier, Role};

pub const ROLE_REPETITION_WEIGHT: FairnessScore = 10;
pub const MONTHLY_WINDOW_DAYS: i64 = 30;
pub const MONTHLY_RECENCY_WEIGHT: FairnessScore = 5;
pub const WEEKLY_WINDOW_DAYS: i64 = 7;
pub const WEEKLY_RECENCY_WEIGHT: FairnessScore = 20;
pub const DUTY_BASE_PENALTY: FairnessScore = 200;
pub const DUTY_PER_PART_PENALTY: FairnessScore = 50;
pub const GUARANTEE_BONUS_START: FairnessScore = 50;
pub const GUARANTEE_BONUS_STEP: FairnessScore = 15;
pub const GUARANTEE_BONUS_FLOOR: FairnessScore = 15;

/// Penalizes repeat specialization in one role.
#[derive(Debug, Clone, Copy)]
pub struct RoleRepetition;

impl FairnessRule for RoleRepetition {
    fn name(&self) -> &'static str {
        "ROLE_REPETITION"
    }

    fn evaluate(
        &self,
        person: &Person,
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        ROLE_REPETITION_WEIGHT
            * FairnessScore::from(ledger.role_count(&person.id, role, ctx.reference_date))
    }

    fn description(&self) -> &'static str {
        "Prior assignments to the same role"
    }
}

/// Damps anyone used in the last month.
#[derive(Debug, Clone, Copy)]
pub struct MonthlyRecency;

impl FairnessRule for MonthlyRecency {
    fn name(&self) -> &'static str {
        "MONTHLY_RECENCY"
    }

    fn evaluate(
        &self,
        person: &Person,
        _role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        let n = ledger.window_count(&person.id, ctx.reference_date, MONTHLY_WINDOW_DAYS);
        MONTHLY_RECENCY_WEIGHT * FairnessScore::from(n)
    }

    fn description(&self) -> &'static str {
        "Assignments in the trailing 30 days"
    }
}

/// Strongly damps anyone used this week or last week.
#[derive(Debug, Clone, Copy)]
pub struct WeeklyRecency;

impl FairnessRule for WeeklyRecency {
    fn name(&self) -> &'static str {
        "WEEKLY_RECENCY"
    }

    fn evaluate(
        &self,
        person: &Person,
        _role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        let n = ledger.window_count(&person.id, ctx.reference_date, WEEKLY_WINDOW_DAYS);
        WEEKLY_RECENCY_WEIGHT * FairnessScore::from(n)
    }

    fn description(&self) -> &'static str {
        "Assignments in the trailing 7 days"
    }
}

/// Pushes people with speaking/reading duties this week to the back.
#[derive(Debug, Clone, Copy)]
pub struct DutyLoad;

impl FairnessRule for DutyLoad {
    fn name(&self) -> &'static str {
        "DUTY_LOAD"
    }

    fn evaluate(
        &self,
        person: &Person,
        _role: Role,
        _ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        match ctx.duty_count(&person.id) {
            0 => 0,
            n => DUTY_BASE_PENALTY + DUTY_PER_PART_PENALTY * FairnessScore::from(n),
        }
    }

    fn description(&self) -> &'static str {
        "Speaking or reading duties this week"
    }
}

/// Shifts load toward the assistant and general tiers.
#[derive(Debug, Clone, Copy)]
pub struct TierAdjustment;

impl TierAdjustment {
    /// Adjustment for a tier.
    pub fn for_tier(tier: PrivilegeTier) -> FairnessScore {
        match tier {
            PrivilegeTier::Senior => 25,
            PrivilegeTier::Assistant => -25,
            PrivilegeTier::General => -15,
            PrivilegeTier::Trainee => 0,
        }
    }
}

impl FairnessRule for TierAdjustment {
    fn name(&self) -> &'static str {
        "TIER"
    }

    fn evaluate(
        &self,
        person: &Person,
        _role: Role,
        _ledger: &FairnessLedger,
        _ctx: &ScoringContext,
    ) -> FairnessScore {
        Self::for_tier(person.tier)
    }

    fn description(&self) -> &'static str {
        "Privilege tier adjustment"
    }
}

/// Front-loads guaranteed people into roles they have not done yet.
///
/// The bonus shrinks by 15 per prior record in the role, floored at 15.
#[derive(Debug, Clone, Copy)]
pub struct GuaranteeBonus;

impl FairnessRule for GuaranteeBonus {
    fn name(&self) -> &'static str {
        "GUARANTEE_BONUS"
    }

    fn evaluate(
        &self,
        person: &Person,
        role: Role,
        ledger: &FairnessLedger,
        ctx: &ScoringContext,
    ) -> FairnessScore {
        if !ctx.is_guaranteed(&person.id) {
            return 0;
        }
        let prior = FairnessScore::from(ledger.role_count(&person.id, role, ctx.reference_date));
        -(GUARANTEE_BONUS_START - GUARANTEE_BONUS_STEP * prior).max(GUARANTEE_BONUS_FLOOR)
    }

    fn description(&self) -> &'static str {
        "Bonus for guaranteed participants"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn ledger_with(records: &[(&str, Role, &str)]) -> FairnessLedger {
        let mut l = FairnessLedger::new();
        for (id, role, date) in records {
            l.add(id, *role, d(date));
        }
        l
    }

    #[test]
    fn test_role_repetition() {
        let l = ledger_with(&[
            ("ann", Role::Audio, "2023-01-01"),
            ("ann", Role::Audio, "2023-06-01"),
            ("ann", Role::Video, "2023-06-08"),
        ]);
        let ann = Person::new("ann", "Ann");
        let ctx = ScoringContext::at_date(d("2024-03-10"));
        assert_eq!(RoleRepetition.evaluate(&ann, Role::Audio, &l, &ctx), 20);
        assert_eq!(RoleRepetition.evaluate(&ann, Role::Video, &l, &ctx), 10);
        assert_eq!(RoleRepetition.evaluate(&ann, Role::LeftMic, &l, &ctx), 0);
    }

    #[test]
    fn test_recency_terms_overlap() {
        // 3 days ago sits in both windows; 20 days ago only in the 30-day one.
        let l = ledger_with(&[
            ("ann", Role::Audio, "2024-03-07"),
            ("ann", Role::Video, "2024-02-19"),
        ]);
        let ann = Person::new("ann", "Ann");
        let ctx = ScoringContext::at_date(d("2024-03-10"));
        assert_eq!(MonthlyRecency.evaluate(&ann, Role::Audio, &l, &ctx), 10);
        assert_eq!(WeeklyRecency.evaluate(&ann, Role::Audio, &l, &ctx), 20);
    }

    #[test]
    fn test_duty_load() {
        let l = FairnessLedger::new();
        let ann = Person::new("ann", "Ann");
        let base = ScoringContext::at_date(d("2024-03-10"));
        assert_eq!(DutyLoad.evaluate(&ann, Role::Audio, &l, &base), 0);
        let one = base.clone().with_duty_count("ann", 1);
        assert_eq!(DutyLoad.evaluate(&ann, Role::Audio, &l, &one), 250);
        let two = base.with_duty_count("ann", 2);
        assert_eq!(DutyLoad.evaluate(&ann, Role::Audio, &l, &two), 300);
    }

    #[test]
    fn test_tier_adjustment() {
        assert_eq!(TierAdjustment::for_tier(PrivilegeTier::Senior), 25);
        assert_eq!(TierAdjustment::for_tier(PrivilegeTier::Assistant), -25);
        assert_eq!(TierAdjustment::for_tier(PrivilegeTier::General), -15);
        assert_eq!(TierAdjustment::for_tier(PrivilegeTier::Trainee), 0);
    }

    #[test]
    fn test_guarantee_bonus_shrinks_to_floor() {
        let ann = Person::new("ann", "Ann");
        let ctx = ScoringContext::at_date(d("2024-03-10")).with_guaranteed("ann");
        let mut l = FairnessLedger::new();

        assert_eq!(GuaranteeBonus.evaluate(&ann, Role::Audio, &l, &ctx), -50);
        l.add("ann", Role::Audio, d("2023-01-01"));
        assert_eq!(GuaranteeBonus.evaluate(&ann, Role::Audio, &l, &ctx), -35);
        l.add("ann", Role::Audio, d("2023-02-01"));
        assert_eq!(GuaranteeBonus.evaluate(&ann, Role::Audio, &l, &ctx), -20);
        l.add("ann", Role::Audio, d("2023-03-01"));
        assert_eq!(GuaranteeBonus.evaluate(&ann, Role::Audio, &l, &ctx), -15);
        l.add("ann", Role::Audio, d("2023-04-01"));
        assert_eq!(GuaranteeBonus.evaluate(&ann, Role::Audio, &l, &ctx), -15);
    }

    #[test]
    fn test_guarantee_bonus_only_for_guaranteed() {
        let ben = Person::new("ben", "Ben");
        let ctx = ScoringContext::at_date(d("2024-03-10")).with_guaranteed("ann");
        assert_eq!(
            GuaranteeBonus.evaluate(&ben, Role::Audio, &FairnessLedger::new(), &ctx),
            0
        );
    }
}
