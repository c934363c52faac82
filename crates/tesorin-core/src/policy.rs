//! Planning policy: the rule-of-thumb tables behind the planner
//!
//! Holds the savings-rate brackets per country, the allocation splits and
//! the emergency-fund multipliers.
//!
//! ## Configuration Resolution
//!
//! Policy is loaded with a two-layer resolution:
//! 1. Check for override in data dir (~/.local/share/tesorin/config/policy.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their default values.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::Country;

/// Embedded default policy (compiled into binary)
pub const DEFAULT_POLICY: &str = include_str!("../../../config/policy.toml");

/// Tolerance when checking that a split adds up to 1
const SHARE_SUM_TOLERANCE: f64 = 1e-9;

/// One row of a savings-rate table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsBracket {
    /// Applies when income is strictly below this; `None` for the top bracket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f64>,
    /// Low end of the target band, percent
    pub low: f64,
    /// High end of the target band, percent
    pub high: f64,
}

impl SavingsBracket {
    const fn new(below: Option<f64>, low: f64, high: f64) -> Self {
        Self { below, low, high }
    }
}

/// Fractions of the recommended saving sent to each bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShareSplit {
    pub emergency: f64,
    pub investing: f64,
    pub debt: f64,
}

impl ShareSplit {
    pub fn total(&self) -> f64 {
        self.emergency + self.investing + self.debt
    }

    /// Fold the debt share into investing (used when there is no debt)
    pub fn without_debt(&self) -> Self {
        Self {
            emergency: self.emergency,
            investing: self.investing + self.debt,
            debt: 0.0,
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        for (bucket, share) in [
            ("emergency", self.emergency),
            ("investing", self.investing),
            ("debt", self.debt),
        ] {
            if !share.is_finite() || share < 0.0 {
                return Err(Error::Config(format!(
                    "split.{}.{} must be a non-negative number",
                    name, bucket
                )));
            }
        }
        if (self.total() - 1.0).abs() > SHARE_SUM_TOLERANCE {
            return Err(Error::Config(format!(
                "split.{} must add up to 1.0 (got {})",
                name,
                self.total()
            )));
        }
        Ok(())
    }
}

/// Policy values used by the planner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningPolicy {
    pub india_brackets: Vec<SavingsBracket>,
    pub canada_brackets: Vec<SavingsBracket>,
    pub base_split: ShareSplit,
    pub high_interest_split: ShareSplit,
    pub emergency_months_without_debt: f64,
    pub emergency_months_with_debt: f64,
    pub legacy_debt_share_high_interest: f64,
    pub legacy_debt_share_normal: f64,
}

impl Default for PlanningPolicy {
    fn default() -> Self {
        Self {
            india_brackets: vec![
                SavingsBracket::new(Some(30000.0), 10.0, 15.0),
                SavingsBracket::new(Some(60000.0), 15.0, 25.0),
                SavingsBracket::new(None, 25.0, 40.0),
            ],
            canada_brackets: vec![
                SavingsBracket::new(Some(3000.0), 10.0, 15.0),
                SavingsBracket::new(Some(6000.0), 15.0, 25.0),
                SavingsBracket::new(None, 25.0, 35.0),
            ],
            base_split: ShareSplit {
                emergency: 0.4,
                investing: 0.3,
                debt: 0.3,
            },
            high_interest_split: ShareSplit {
                emergency: 0.3,
                investing: 0.3,
                debt: 0.4,
            },
            emergency_months_without_debt: 3.0,
            emergency_months_with_debt: 1.0,
            legacy_debt_share_high_interest: 0.4,
            legacy_debt_share_normal: 0.2,
        }
    }
}

impl PlanningPolicy {
    /// Load the policy from the override location or the embedded default
    pub fn load() -> Result<Self> {
        load_policy(None)
    }

    /// Load with a custom override path
    pub fn from_path(path: &Path) -> Result<Self> {
        load_policy(Some(path))
    }

    /// Parse policy from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        parse_policy(content)
    }

    /// Savings-rate table for a country
    pub fn brackets(&self, country: Country) -> &[SavingsBracket] {
        match country {
            Country::India => &self.india_brackets,
            Country::Canada => &self.canada_brackets,
        }
    }

    /// Target band for a positive income
    pub fn band_for(&self, country: Country, income: f64) -> (f64, f64) {
        let brackets = self.brackets(country);
        brackets
            .iter()
            .find(|b| b.below.map_or(true, |limit| income < limit))
            .or_else(|| brackets.last())
            .map(|b| (b.low, b.high))
            .unwrap_or((0.0, 0.0))
    }

    /// Check the tables are usable
    pub fn validate(&self) -> Result<()> {
        validate_brackets("IN", &self.india_brackets)?;
        validate_brackets("CA", &self.canada_brackets)?;
        self.base_split.validate("base")?;
        self.high_interest_split.validate("high_interest")?;

        for (name, months) in [
            ("months_without_debt", self.emergency_months_without_debt),
            ("months_with_debt", self.emergency_months_with_debt),
        ] {
            if !months.is_finite() || months < 0.0 {
                return Err(Error::Config(format!(
                    "emergency_fund.{} must be a non-negative number",
                    name
                )));
            }
        }
        Ok(())
    }
}

fn validate_brackets(country: &str, brackets: &[SavingsBracket]) -> Result<()> {
    if brackets.is_empty() {
        return Err(Error::Config(format!(
            "savings_rate.{} needs at least one bracket",
            country
        )));
    }

    let last = brackets.len() - 1;
    let mut previous: Option<f64> = None;
    for (i, bracket) in brackets.iter().enumerate() {
        if !bracket.low.is_finite()
            || !bracket.high.is_finite()
            || bracket.low < 0.0
            || bracket.high < bracket.low
        {
            return Err(Error::Config(format!(
                "savings_rate.{} bracket {} needs 0 <= low <= high",
                country, i
            )));
        }
        match bracket.below {
            Some(_) if i == last => {
                return Err(Error::Config(format!(
                    "savings_rate.{} last bracket must not set `below`",
                    country
                )));
            }
            None if i != last => {
                return Err(Error::Config(format!(
                    "savings_rate.{} bracket {} is missing `below`",
                    country, i
                )));
            }
            Some(limit) => {
                if !limit.is_finite() {
                    return Err(Error::Config(format!(
                        "savings_rate.{} bracket {} needs a finite `below`",
                        country, i
                    )));
                }
                if previous.is_some_and(|p| limit <= p) {
                    return Err(Error::Config(format!(
                        "savings_rate.{} thresholds must be strictly ascending",
                        country
                    )));
                }
                previous = Some(limit);
            }
            None => {}
        }
    }
    Ok(())
}

/// Default policy override path
pub fn default_policy_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("tesorin").join("config").join("policy.toml"))
}

/// Load policy (override first, then default)
fn load_policy(override_path: Option<&Path>) -> Result<PlanningPolicy> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_policy_path)
        .filter(|p| p.exists());

    let content = match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading planning policy override");
            fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read policy: {}", e)))?
        }
        None => DEFAULT_POLICY.to_string(),
    };

    parse_policy(&content)
}

/// Raw policy structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawPolicy {
    savings_rate: Option<HashMap<String, RawCountryTable>>,
    split: Option<RawSplits>,
    emergency_fund: Option<RawEmergencyFund>,
    legacy: Option<RawLegacy>,
}

#[derive(Debug, Deserialize)]
struct RawCountryTable {
    brackets: Vec<SavingsBracket>,
}

#[derive(Debug, Deserialize)]
struct RawSplits {
    base: Option<ShareSplit>,
    high_interest: Option<ShareSplit>,
}

#[derive(Debug, Deserialize)]
struct RawEmergencyFund {
    months_without_debt: Option<f64>,
    months_with_debt: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawLegacy {
    debt_share_high_interest: Option<f64>,
    debt_share_normal: Option<f64>,
}

/// Parse policy from TOML content
fn parse_policy(content: &str) -> Result<PlanningPolicy> {
    let raw: RawPolicy = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid policy TOML: {}", e)))?;

    let mut policy = PlanningPolicy::default();

    if let Some(tables) = raw.savings_rate {
        for (country, table) in tables {
            match country.parse::<Country>() {
                Ok(Country::India) => policy.india_brackets = table.brackets,
                Ok(Country::Canada) => policy.canada_brackets = table.brackets,
                Err(_) => {
                    return Err(Error::Config(format!(
                        "Unknown country in savings_rate: {}",
                        country
                    )))
                }
            }
        }
    }

    if let Some(split) = raw.split {
        if let Some(base) = split.base {
            policy.base_split = base;
        }
        if let Some(high_interest) = split.high_interest {
            policy.high_interest_split = high_interest;
        }
    }

    if let Some(fund) = raw.emergency_fund {
        if let Some(months) = fund.months_without_debt {
            policy.emergency_months_without_debt = months;
        }
        if let Some(months) = fund.months_with_debt {
            policy.emergency_months_with_debt = months;
        }
    }

    if let Some(legacy) = raw.legacy {
        if let Some(share) = legacy.debt_share_high_interest {
            policy.legacy_debt_share_high_interest = share;
        }
        if let Some(share) = legacy.debt_share_normal {
            policy.legacy_debt_share_normal = share;
        }
    }

    policy.validate()?;
    Ok(policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_embedded_policy_matches_default() {
        let parsed = PlanningPolicy::from_toml(DEFAULT_POLICY).unwrap();
        assert_eq!(parsed, PlanningPolicy::default());
    }

    #[test]
    fn test_default_policy_is_valid() {
        assert!(PlanningPolicy::default().validate().is_ok());
    }

    #[test]
    fn test_band_lookup_boundaries() {
        let policy = PlanningPolicy::default();
        assert_eq!(policy.band_for(Country::India, 29999.0), (10.0, 15.0));
        assert_eq!(policy.band_for(Country::India, 30000.0), (15.0, 25.0));
        assert_eq!(policy.band_for(Country::India, 60000.0), (25.0, 40.0));
        assert_eq!(policy.band_for(Country::Canada, 2999.99), (10.0, 15.0));
        assert_eq!(policy.band_for(Country::Canada, 6000.0), (25.0, 35.0));
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let policy = PlanningPolicy::from_toml(
            r#"
            [emergency_fund]
            months_without_debt = 6.0
            "#,
        )
        .unwrap();

        assert_eq!(policy.emergency_months_without_debt, 6.0);
        assert_eq!(policy.emergency_months_with_debt, 1.0);
        assert_eq!(policy.base_split, PlanningPolicy::default().base_split);
    }

    #[test]
    fn test_split_must_sum_to_one() {
        let result = PlanningPolicy::from_toml(
            r#"
            [split.base]
            emergency = 0.5
            investing = 0.3
            debt = 0.3
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_brackets_must_ascend() {
        let result = PlanningPolicy::from_toml(
            r#"
            [savings_rate.CA]
            brackets = [
                { below = 6000.0, low = 10.0, high = 15.0 },
                { below = 3000.0, low = 15.0, high = 25.0 },
                { low = 25.0, high = 35.0 },
            ]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_brackets_must_be_finite() {
        for brackets in [
            "[{ below = 3000.0, low = nan, high = 15.0 }, { low = 25.0, high = 35.0 }]",
            "[{ below = 3000.0, low = 10.0, high = inf }, { low = 25.0, high = 35.0 }]",
            "[{ below = nan, low = 10.0, high = 15.0 }, { low = 25.0, high = 35.0 }]",
            "[{ low = nan, high = nan }]",
        ] {
            let result = PlanningPolicy::from_toml(&format!(
                "[savings_rate.CA]\nbrackets = {}\n",
                brackets
            ));
            assert!(
                matches!(result, Err(Error::Config(_))),
                "accepted {}",
                brackets
            );
        }
    }

    #[test]
    fn test_top_bracket_cannot_have_limit() {
        let result = PlanningPolicy::from_toml(
            r#"
            [savings_rate.IN]
            brackets = [{ below = 1000.0, low = 10.0, high = 15.0 }]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_country_rejected() {
        let result = PlanningPolicy::from_toml(
            r#"
            [savings_rate.US]
            brackets = [{ low = 10.0, high = 15.0 }]
            "#,
        );
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_toml() {
        let result = PlanningPolicy::from_toml("split = [");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_override_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[split.high_interest]\nemergency = 0.2\ninvesting = 0.2\ndebt = 0.6"
        )
        .unwrap();

        let policy = PlanningPolicy::from_path(file.path()).unwrap();
        assert_eq!(policy.high_interest_split.debt, 0.6);
    }

    #[test]
    fn test_missing_override_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let policy = PlanningPolicy::from_path(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(policy, PlanningPolicy::default());
    }
}
