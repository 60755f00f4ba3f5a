//! Read-only parameter tables and policy values consumed by the generators.
//!
//! These are deserialized from the `workforce`, `compensation`,
//! `plan_design` and `parameters` sections of `workforce-config.yaml`.
//! Every field has a default so a partial file is valid; [`GeneratorParameters::validate`]
//! rejects combinations that cannot produce a meaningful year.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use workforce_types::{AgeBand, TenureBand};

use crate::error::GeneratorError;

// ---------------------------------------------------------------------------
// Hazards
// ---------------------------------------------------------------------------

/// Rate for one (age band, tenure band, level) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardEntry {
    /// Age band the entry applies to.
    pub age_band: AgeBand,
    /// Tenure band the entry applies to.
    pub tenure_band: TenureBand,
    /// Level the entry applies to; `None` matches every level.
    #[serde(default)]
    pub level: Option<u8>,
    /// Annual probability.
    pub rate: Decimal,
}

/// Annual hazard probabilities by band, with optional per-year overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HazardTable {
    /// Rate for cells no entry covers.
    pub base_rate: Decimal,
    /// Default entries.
    #[serde(default)]
    pub entries: Vec<HazardEntry>,
    /// Entries that replace `entries` for specific years.
    #[serde(default)]
    pub year_overrides: BTreeMap<i32, Vec<HazardEntry>>,
}

impl HazardTable {
    /// Probability for an employee of the given age, tenure and level.
    ///
    /// A level-specific entry wins over a level-agnostic one; with no
    /// matching entry the base rate applies.
    pub fn rate_for(&self, simulation_year: i32, age: u32, tenure: u32, level: u8) -> Decimal {
        let entries = self
            .year_overrides
            .get(&simulation_year)
            .unwrap_or(&self.entries);
        let age_band = AgeBand::from_age(age);
        let tenure_band = TenureBand::from_tenure(tenure);
        let in_cell = |e: &&HazardEntry| e.age_band == age_band && e.tenure_band == tenure_band;
        entries
            .iter()
            .filter(in_cell)
            .find(|e| e.level == Some(level))
            .or_else(|| entries.iter().filter(in_cell).find(|e| e.level.is_none()))
            .map_or(self.base_rate, |e| e.rate)
    }

    fn all_rates(&self) -> impl Iterator<Item = Decimal> + '_ {
        std::iter::once(self.base_rate)
            .chain(self.entries.iter().map(|e| e.rate))
            .chain(self.year_overrides.values().flatten().map(|e| e.rate))
    }
}

fn entry(age_band: AgeBand, tenure_band: TenureBand, rate: Decimal) -> HazardEntry {
    HazardEntry {
        age_band,
        tenure_band,
        level: None,
        rate,
    }
}

fn default_termination_hazards() -> HazardTable {
    HazardTable {
        base_rate: Decimal::new(12, 2),
        entries: vec![
            entry(AgeBand::Under25, TenureBand::Under2, Decimal::new(28, 2)),
            entry(AgeBand::From25To34, TenureBand::Under2, Decimal::new(22, 2)),
            entry(AgeBand::From25To34, TenureBand::From2To4, Decimal::new(15, 2)),
            entry(AgeBand::From35To44, TenureBand::From5To9, Decimal::new(8, 2)),
            entry(AgeBand::From45To54, TenureBand::From10To19, Decimal::new(6, 2)),
            entry(AgeBand::From55To64, TenureBand::Over20, Decimal::new(10, 2)),
            entry(AgeBand::Over65, TenureBand::Over20, Decimal::new(25, 2)),
        ],
        year_overrides: BTreeMap::new(),
    }
}

fn default_promotion_hazards() -> HazardTable {
    HazardTable {
        base_rate: Decimal::new(5, 2),
        entries: vec![
            entry(AgeBand::From25To34, TenureBand::From2To4, Decimal::new(14, 2)),
            entry(AgeBand::From25To34, TenureBand::From5To9, Decimal::new(12, 2)),
            entry(AgeBand::From35To44, TenureBand::From5To9, Decimal::new(9, 2)),
            entry(AgeBand::From55To64, TenureBand::Over20, Decimal::new(1, 2)),
        ],
        year_overrides: BTreeMap::new(),
    }
}

// ---------------------------------------------------------------------------
// Workforce and compensation policy
// ---------------------------------------------------------------------------

/// Headcount policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforcePolicy {
    /// Net annual headcount growth.
    #[serde(default = "default_growth_rate")]
    pub target_growth_rate: Decimal,
    /// Share of a year's hires who leave in the same year.
    #[serde(default = "default_nh_termination_rate")]
    pub new_hire_termination_rate: Decimal,
    /// Experienced termination rate used for planning figures.
    #[serde(default = "default_planning_termination_rate")]
    pub planning_termination_rate: Decimal,
    /// Highest job level.
    #[serde(default = "default_max_level")]
    pub max_level: u8,
    /// Youngest age at hire.
    #[serde(default = "default_nh_min_age")]
    pub new_hire_min_age: u32,
    /// Oldest age at hire.
    #[serde(default = "default_nh_max_age")]
    pub new_hire_max_age: u32,
}

impl Default for WorkforcePolicy {
    fn default() -> Self {
        Self {
            target_growth_rate: default_growth_rate(),
            new_hire_termination_rate: default_nh_termination_rate(),
            planning_termination_rate: default_planning_termination_rate(),
            max_level: default_max_level(),
            new_hire_min_age: default_nh_min_age(),
            new_hire_max_age: default_nh_max_age(),
        }
    }
}

fn default_growth_rate() -> Decimal {
    Decimal::new(3, 2)
}

fn default_nh_termination_rate() -> Decimal {
    Decimal::new(25, 2)
}

fn default_planning_termination_rate() -> Decimal {
    Decimal::new(12, 2)
}

const fn default_max_level() -> u8 {
    5
}

const fn default_nh_min_age() -> u32 {
    22
}

const fn default_nh_max_age() -> u32 {
    45
}

/// Pay range, merit rate and hiring mix for one job level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelPolicy {
    /// Job level.
    pub level: u8,
    /// Lowest starting salary.
    pub min_compensation: Decimal,
    /// Highest starting salary.
    pub max_compensation: Decimal,
    /// Annual merit increase.
    pub merit_rate: Decimal,
    /// Relative weight of this level among new hires.
    pub new_hire_weight: u32,
}

fn level(
    level: u8,
    min_compensation: i64,
    max_compensation: i64,
    merit_bps: i64,
    new_hire_weight: u32,
) -> LevelPolicy {
    LevelPolicy {
        level,
        min_compensation: Decimal::from(min_compensation),
        max_compensation: Decimal::from(max_compensation),
        merit_rate: Decimal::new(merit_bps, 4),
        new_hire_weight,
    }
}

/// Pay policy: merit, COLA, promotions and level ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompensationPolicy {
    /// Cost-of-living adjustment applied with the merit raise.
    #[serde(default = "default_cola_rate")]
    pub cola_rate: Decimal,
    /// Month the annual raise takes effect.
    #[serde(default = "default_raise_month")]
    pub raise_month: u32,
    /// Day of month the annual raise takes effect.
    #[serde(default = "default_day")]
    pub raise_day: u32,
    /// Month promotions take effect. Must not fall after the raise date.
    #[serde(default = "default_promotion_month")]
    pub promotion_month: u32,
    /// Day of month promotions take effect.
    #[serde(default = "default_day")]
    pub promotion_day: u32,
    /// Salary increase that comes with a promotion.
    #[serde(default = "default_promotion_increase")]
    pub promotion_increase: Decimal,
    /// Per-level policy, one entry per level from 1 to `max_level`.
    #[serde(default = "default_levels")]
    pub levels: Vec<LevelPolicy>,
}

impl Default for CompensationPolicy {
    fn default() -> Self {
        Self {
            cola_rate: default_cola_rate(),
            raise_month: default_raise_month(),
            raise_day: default_day(),
            promotion_month: default_promotion_month(),
            promotion_day: default_day(),
            promotion_increase: default_promotion_increase(),
            levels: default_levels(),
        }
    }
}

impl CompensationPolicy {
    /// Policy for a level, if configured.
    pub fn level(&self, level: u8) -> Option<&LevelPolicy> {
        self.levels.iter().find(|l| l.level == level)
    }

    /// Date the annual raise takes effect in `year`.
    pub fn raise_date(&self, year: i32) -> Result<NaiveDate, GeneratorError> {
        NaiveDate::from_ymd_opt(year, self.raise_month, self.raise_day).ok_or_else(|| {
            GeneratorError::InvalidParameters {
                reason: format!("invalid raise date {}-{}", self.raise_month, self.raise_day),
            }
        })
    }

    /// Date promotions take effect in `year`.
    pub fn promotion_date(&self, year: i32) -> Result<NaiveDate, GeneratorError> {
        NaiveDate::from_ymd_opt(year, self.promotion_month, self.promotion_day).ok_or_else(|| {
            GeneratorError::InvalidParameters {
                reason: format!(
                    "invalid promotion date {}-{}",
                    self.promotion_month, self.promotion_day
                ),
            }
        })
    }
}

fn default_cola_rate() -> Decimal {
    Decimal::new(2, 2)
}

const fn default_raise_month() -> u32 {
    7
}

const fn default_promotion_month() -> u32 {
    4
}

const fn default_day() -> u32 {
    1
}

fn default_promotion_increase() -> Decimal {
    Decimal::new(10, 2)
}

fn default_levels() -> Vec<LevelPolicy> {
    vec![
        level(1, 45_000, 60_000, 300, 50),
        level(2, 60_000, 85_000, 350, 30),
        level(3, 85_000, 120_000, 400, 15),
        level(4, 120_000, 170_000, 400, 4),
        level(5, 170_000, 250_000, 450, 1),
    ]
}

// ---------------------------------------------------------------------------
// Plan design
// ---------------------------------------------------------------------------

/// Automatic deferral escalation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationPolicy {
    /// Whether escalation runs at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Increase applied on each hire anniversary.
    #[serde(default = "default_escalation_increment")]
    pub increment: Decimal,
    /// Rate escalation never exceeds.
    #[serde(default = "default_escalation_cap")]
    pub cap: Decimal,
}

impl Default for EscalationPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            increment: default_escalation_increment(),
            cap: default_escalation_cap(),
        }
    }
}

fn default_escalation_increment() -> Decimal {
    Decimal::new(1, 2)
}

fn default_escalation_cap() -> Decimal {
    Decimal::new(10, 2)
}

const fn default_true() -> bool {
    true
}

/// One tier of the employer match formula.
///
/// The employer matches `match_rate` of each dollar deferred between the
/// previous tier's `up_to` and this tier's `up_to` (both fractions of pay).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTier {
    /// Upper bound of the tier as a fraction of pay.
    pub up_to: Decimal,
    /// Match per dollar deferred within the tier.
    pub match_rate: Decimal,
}

/// Plan rules: eligibility, enrollment, escalation and employer money.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanDesign {
    /// Days of service before eligibility.
    #[serde(default = "default_waiting_days")]
    pub eligibility_waiting_days: u32,
    /// Minimum age for eligibility.
    #[serde(default = "default_minimum_age")]
    pub minimum_age: u32,
    /// Whether newly eligible employees are enrolled automatically.
    #[serde(default = "default_true")]
    pub auto_enrollment: bool,
    /// Deferral rate for automatic enrollment.
    #[serde(default = "default_deferral_rate")]
    pub default_deferral_rate: Decimal,
    /// Share of auto-enrolled employees who opt out.
    #[serde(default = "default_opt_out_rate")]
    pub opt_out_rate: Decimal,
    /// Days after auto-enrollment during which an opt-out lands.
    #[serde(default = "default_opt_out_window")]
    pub opt_out_window_days: u32,
    /// Annual probability that an eligible non-participant enrolls.
    #[serde(default = "default_voluntary_rate")]
    pub voluntary_enrollment_rate: Decimal,
    /// Deferral rate elected on voluntary enrollment.
    #[serde(default = "default_voluntary_deferral")]
    pub voluntary_deferral_rate: Decimal,
    /// Automatic escalation.
    #[serde(default)]
    pub escalation: EscalationPolicy,
    /// Employer match tiers, ascending by `up_to`.
    #[serde(default = "default_match_tiers")]
    pub match_tiers: Vec<MatchTier>,
    /// Employer non-elective contribution for eligible employees.
    #[serde(default = "default_core_rate")]
    pub core_contribution_rate: Decimal,
}

impl Default for PlanDesign {
    fn default() -> Self {
        Self {
            eligibility_waiting_days: default_waiting_days(),
            minimum_age: default_minimum_age(),
            auto_enrollment: true,
            default_deferral_rate: default_deferral_rate(),
            opt_out_rate: default_opt_out_rate(),
            opt_out_window_days: default_opt_out_window(),
            voluntary_enrollment_rate: default_voluntary_rate(),
            voluntary_deferral_rate: default_voluntary_deferral(),
            escalation: EscalationPolicy::default(),
            match_tiers: default_match_tiers(),
            core_contribution_rate: default_core_rate(),
        }
    }
}

const fn default_waiting_days() -> u32 {
    90
}

const fn default_minimum_age() -> u32 {
    21
}

fn default_deferral_rate() -> Decimal {
    Decimal::new(3, 2)
}

fn default_opt_out_rate() -> Decimal {
    Decimal::new(10, 2)
}

const fn default_opt_out_window() -> u32 {
    60
}

fn default_voluntary_rate() -> Decimal {
    Decimal::new(20, 2)
}

fn default_voluntary_deferral() -> Decimal {
    Decimal::new(6, 2)
}

fn default_match_tiers() -> Vec<MatchTier> {
    vec![
        MatchTier {
            up_to: Decimal::new(3, 2),
            match_rate: Decimal::ONE,
        },
        MatchTier {
            up_to: Decimal::new(5, 2),
            match_rate: Decimal::new(5, 1),
        },
    ]
}

fn default_core_rate() -> Decimal {
    Decimal::new(2, 2)
}

// ---------------------------------------------------------------------------
// Statutory limits
// ---------------------------------------------------------------------------

/// Deferral limit for employees at or above an age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeLimit {
    /// Youngest age (at year end) the limit applies to.
    pub min_age: u32,
    /// Oldest age the limit applies to, if bounded.
    #[serde(default)]
    pub max_age: Option<u32>,
    /// Annual employee deferral limit.
    pub limit: Decimal,
}

/// All age thresholds in force for one plan year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LimitTable {
    /// Year the table takes effect.
    pub year: i32,
    /// Thresholds; the applicable one with the highest `min_age` wins.
    pub thresholds: Vec<AgeLimit>,
}

/// Statutory deferral limits by year and age.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatutoryLimits {
    /// Tables in any order; the latest table not after the year applies.
    pub tables: Vec<LimitTable>,
}

impl Default for StatutoryLimits {
    fn default() -> Self {
        let table = |year, base, catch_up, super_catch_up| LimitTable {
            year,
            thresholds: vec![
                AgeLimit {
                    min_age: 0,
                    max_age: None,
                    limit: Decimal::from(base),
                },
                AgeLimit {
                    min_age: 50,
                    max_age: None,
                    limit: Decimal::from(catch_up),
                },
                AgeLimit {
                    min_age: 60,
                    max_age: Some(63),
                    limit: Decimal::from(super_catch_up),
                },
            ],
        };
        Self {
            tables: vec![
                table(2024, 23_000, 30_500, 30_500),
                table(2025, 23_500, 31_000, 34_750),
                table(2026, 24_500, 32_500, 35_750),
            ],
        }
    }
}

impl StatutoryLimits {
    /// Employee deferral limit for an age (at year end) in a year.
    pub fn limit_for(&self, simulation_year: i32, age: u32) -> Result<Decimal, GeneratorError> {
        let table = self
            .tables
            .iter()
            .filter(|t| t.year <= simulation_year)
            .max_by_key(|t| t.year)
            .ok_or(GeneratorError::MissingLimitTable { simulation_year })?;
        table
            .thresholds
            .iter()
            .filter(|t| t.min_age <= age && t.max_age.is_none_or(|max| age <= max))
            .max_by_key(|t| t.min_age)
            .map(|t| t.limit)
            .ok_or(GeneratorError::MissingLimitTable { simulation_year })
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

/// Everything the generators and the contribution calculator read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorParameters {
    /// Headcount policy.
    #[serde(default)]
    pub workforce: WorkforcePolicy,
    /// Pay policy.
    #[serde(default)]
    pub compensation: CompensationPolicy,
    /// Plan rules.
    #[serde(default)]
    pub plan_design: PlanDesign,
    /// Experienced termination hazards.
    #[serde(default = "default_termination_hazards")]
    pub termination_hazards: HazardTable,
    /// Promotion hazards.
    #[serde(default = "default_promotion_hazards")]
    pub promotion_hazards: HazardTable,
    /// Statutory deferral limits.
    #[serde(default)]
    pub statutory_limits: StatutoryLimits,
}

impl Default for GeneratorParameters {
    fn default() -> Self {
        Self {
            workforce: WorkforcePolicy::default(),
            compensation: CompensationPolicy::default(),
            plan_design: PlanDesign::default(),
            termination_hazards: default_termination_hazards(),
            promotion_hazards: default_promotion_hazards(),
            statutory_limits: StatutoryLimits::default(),
        }
    }
}

impl GeneratorParameters {

    /// Check that the parameters can drive a simulation.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        let w = &self.workforce;
        unit("workforce.target_growth_rate", w.target_growth_rate)?;
        unit("workforce.planning_termination_rate", w.planning_termination_rate)?;
        if w.new_hire_termination_rate < Decimal::ZERO
            || w.new_hire_termination_rate >= Decimal::ONE
        {
            return invalid(format!(
                "workforce.new_hire_termination_rate must be within [0, 1), got {}",
                w.new_hire_termination_rate
            ));
        }
        if w.max_level == 0 {
            return invalid("workforce.max_level must be at least 1".to_owned());
        }
        if w.new_hire_min_age > w.new_hire_max_age {
            return invalid("workforce.new_hire_min_age exceeds new_hire_max_age".to_owned());
        }

        let c = &self.compensation;
        unit("compensation.cola_rate", c.cola_rate)?;
        unit("compensation.promotion_increase", c.promotion_increase)?;
        // Any year works for checking month/day validity except Feb 29.
        let raise = c.raise_date(2001)?;
        if c.promotion_date(2001)? > raise {
            return invalid("compensation promotion date falls after the raise date".to_owned());
        }
        for lvl in 1..=w.max_level {
            let Some(policy) = c.level(lvl) else {
                return invalid(format!("compensation.levels has no entry for level {lvl}"));
            };
            if policy.min_compensation <= Decimal::ZERO
                || policy.min_compensation > policy.max_compensation
            {
                return invalid(format!("compensation range for level {lvl} is empty"));
            }
            unit("compensation.levels.merit_rate", policy.merit_rate)?;
        }
        if c.levels.iter().map(|l| l.new_hire_weight).sum::<u32>() == 0 {
            return invalid("compensation.levels new_hire_weight sums to zero".to_owned());
        }

        let p = &self.plan_design;
        unit("plan_design.default_deferral_rate", p.default_deferral_rate)?;
        unit("plan_design.opt_out_rate", p.opt_out_rate)?;
        unit("plan_design.voluntary_enrollment_rate", p.voluntary_enrollment_rate)?;
        unit("plan_design.voluntary_deferral_rate", p.voluntary_deferral_rate)?;
        unit("plan_design.escalation.increment", p.escalation.increment)?;
        unit("plan_design.escalation.cap", p.escalation.cap)?;
        unit("plan_design.core_contribution_rate", p.core_contribution_rate)?;
        let mut previous = Decimal::ZERO;
        for tier in &p.match_tiers {
            unit("plan_design.match_tiers.match_rate", tier.match_rate)?;
            if tier.up_to <= previous || tier.up_to > Decimal::ONE {
                return invalid("plan_design.match_tiers must ascend within (0, 1]".to_owned());
            }
            previous = tier.up_to;
        }

        for (name, table) in [
            ("termination_hazards", &self.termination_hazards),
            ("promotion_hazards", &self.promotion_hazards),
        ] {
            for rate in table.all_rates() {
                unit(name, rate)?;
            }
        }
        if self.statutory_limits.tables.is_empty() {
            return invalid("statutory_limits.tables is empty".to_owned());
        }
        Ok(())
    }
}

fn unit(field: &str, value: Decimal) -> Result<(), GeneratorError> {
    if (Decimal::ZERO..=Decimal::ONE).contains(&value) {
        Ok(())
    } else {
        invalid(format!("{field} must be within [0, 1], got {value}"))
    }
}

const fn invalid(reason: String) -> Result<(), GeneratorError> {
    Err(GeneratorError::InvalidParameters { reason })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_tables_validate() {
        assert!(GeneratorParameters::default().validate().is_ok());
    }

    #[test]
    fn level_specific_hazard_wins() {
        let mut table = default_termination_hazards();
        table.entries.push(HazardEntry {
            age_band: AgeBand::From25To34,
            tenure_band: TenureBand::Under2,
            level: Some(3),
            rate: dec!(0.05),
        });
        assert_eq!(table.rate_for(2025, 30, 1, 3), dec!(0.05));
        assert_eq!(table.rate_for(2025, 30, 1, 1), dec!(0.22));
        assert_eq!(table.rate_for(2025, 40, 30, 1), dec!(0.12));
    }

    #[test]
    fn year_override_replaces_entries() {
        let mut table = default_termination_hazards();
        table.year_overrides.insert(
            2027,
            vec![entry(AgeBand::From25To34, TenureBand::Under2, dec!(0.40))],
        );
        assert_eq!(table.rate_for(2027, 30, 1, 1), dec!(0.40));
        assert_eq!(table.rate_for(2027, 22, 1, 1), dec!(0.12));
        assert_eq!(table.rate_for(2026, 22, 1, 1), dec!(0.28));
    }

    #[test]
    fn limits_use_latest_table_and_age_threshold() {
        let limits = StatutoryLimits::default();
        assert_eq!(limits.limit_for(2025, 30).unwrap(), dec!(23500));
        assert_eq!(limits.limit_for(2025, 50).unwrap(), dec!(31000));
        assert_eq!(limits.limit_for(2025, 61).unwrap(), dec!(34750));
        assert_eq!(limits.limit_for(2025, 64).unwrap(), dec!(31000));
        assert_eq!(limits.limit_for(2029, 30).unwrap(), dec!(24500));
        assert!(matches!(
            limits.limit_for(2020, 30),
            Err(GeneratorError::MissingLimitTable { simulation_year: 2020 })
        ));
    }

    #[test]
    fn promotion_after_raise_is_rejected() {
        let mut params = GeneratorParameters::default();
        params.compensation.promotion_month = 9;
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let yaml =
            "workforce:\n  target_growth_rate: 0.05\nplan_design:\n  auto_enrollment: false\n";
        let params: GeneratorParameters = serde_yml::from_str(yaml).unwrap();
        assert_eq!(params.workforce.target_growth_rate, dec!(0.05));
        assert_eq!(params.workforce.new_hire_termination_rate, dec!(0.25));
        assert!(!params.plan_design.auto_enrollment);
        assert_eq!(params.termination_hazards.base_rate, dec!(0.12));
    }
}
