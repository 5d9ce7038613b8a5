use super::grading::GradeTier;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum composite required for each gradable tier. A threshold of
/// zero or below disables its tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutoffTable {
    pub level2: f64,
    pub level3: f64,
    pub level4: f64,
    pub level5: f64,
    pub level6: f64,
    pub level7: f64,
}

impl Default for CutoffTable {
    fn default() -> Self {
        Self {
            level2: 47.0,
            level3: 53.0,
            level4: 58.0,
            level5: 63.0,
            level6: 66.0,
            level7: 70.0,
        }
    }
}

impl CutoffTable {
    /// Tier/threshold pairs in ascending severity order, the order the
    /// grader processes them in.
    pub fn ascending(&self) -> [(GradeTier, f64); 6] {
        [
            (GradeTier::Level2, self.level2),
            (GradeTier::Level3, self.level3),
            (GradeTier::Level4, self.level4),
            (GradeTier::Level5, self.level5),
            (GradeTier::Level6, self.level6),
            (GradeTier::Level7, self.level7),
        ]
    }

    /// Rejects tables whose enabled thresholds do not strictly
    /// increase with tier severity. Disabled tiers are skipped. The
    /// grader itself accepts any table; this check belongs at the
    /// configuration boundary.
    pub fn ensure_ascending(&self) -> Result<(), CutoffError> {
        let mut previous: Option<(GradeTier, f64)> = None;
        for (tier, threshold) in self.ascending() {
            if threshold <= 0.0 {
                continue;
            }
            if let Some((lower_tier, lower_threshold)) = previous {
                if threshold <= lower_threshold {
                    return Err(CutoffError::NotAscending {
                        lower: lower_tier,
                        upper: tier,
                    });
                }
            }
            previous = Some((tier, threshold));
        }
        Ok(())
    }
}

/// How raw cutoff text from a configuration surface is interpreted.
/// The two modes deliberately diverge: interactive integer entry is
/// stricter than what the grader accepts programmatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutoffEntryMode {
    /// Base-10 integers in 0..=100 only.
    StrictInteger,
    /// Any decimal in 0.0..=100.0.
    Decimal,
}

#[derive(Debug, Error, PartialEq)]
pub enum CutoffError {
    #[error("{field}: '{value}' is not a number")]
    NotANumber { field: String, value: String },
    #[error("{field}: '{value}' must be a whole number")]
    FractionNotAllowed { field: String, value: String },
    #[error("{field}: '{value}' is outside 0..=100")]
    OutOfRange { field: String, value: String },
    #[error("{upper} cutoff must be greater than {lower} cutoff")]
    NotAscending { lower: GradeTier, upper: GradeTier },
}

/// Validates one raw cutoff entry. `field` names the tier in error
/// messages so the caller can surface which input was rejected.
pub fn parse_cutoff(field: &str, raw: &str, mode: CutoffEntryMode) -> Result<f64, CutoffError> {
    let trimmed = raw.trim();
    match mode {
        CutoffEntryMode::StrictInteger => match trimmed.parse::<i64>() {
            Ok(value) if (0..=100).contains(&value) => Ok(value as f64),
            Ok(_) => Err(CutoffError::OutOfRange {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
            Err(_) if trimmed.parse::<f64>().is_ok() => Err(CutoffError::FractionNotAllowed {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
            Err(_) => Err(CutoffError::NotANumber {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
        },
        CutoffEntryMode::Decimal => match trimmed.parse::<f64>() {
            Ok(value) if (0.0..=100.0).contains(&value) => Ok(value),
            Ok(_) => Err(CutoffError::OutOfRange {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
            Err(_) => Err(CutoffError::NotANumber {
                field: field.to_string(),
                value: trimmed.to_string(),
            }),
        },
    }
}
