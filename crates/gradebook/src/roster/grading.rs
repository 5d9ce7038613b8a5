use super::cutoffs::CutoffTable;
use super::domain::{GradedRecord, RankedRecord};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered grade tiers. `Ungraded` marks a record that met no enabled
/// cutoff.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GradeTier {
    Ungraded,
    Level2,
    Level3,
    Level4,
    Level5,
    Level6,
    Level7,
}

impl GradeTier {
    pub fn label(self) -> &'static str {
        match self {
            GradeTier::Ungraded => "Ungraded",
            GradeTier::Level2 => "Level2",
            GradeTier::Level3 => "Level3",
            GradeTier::Level4 => "Level4",
            GradeTier::Level5 => "Level5",
            GradeTier::Level6 => "Level6",
            GradeTier::Level7 => "Level7",
        }
    }

    /// Gradable tiers in ascending severity order.
    pub fn ascending() -> [GradeTier; 6] {
        [
            GradeTier::Level2,
            GradeTier::Level3,
            GradeTier::Level4,
            GradeTier::Level5,
            GradeTier::Level6,
            GradeTier::Level7,
        ]
    }
}

impl fmt::Display for GradeTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assigns each record the highest tier whose cutoff its composite
/// meets. Tiers are processed Level2 -> Level7 and each enabled tier
/// overwrites the grade, so the last qualifying tier wins; disabled
/// tiers (cutoff <= 0) never assign. Non-monotonic tables produce the
/// literal overwrite result.
pub fn assign_grades(records: Vec<RankedRecord>, cutoffs: &CutoffTable) -> Vec<GradedRecord> {
    records
        .into_iter()
        .map(|record| {
            let mut grade = GradeTier::Ungraded;
            for (tier, cutoff) in cutoffs.ascending() {
                if cutoff > 0.0 && record.composite as f64 >= cutoff {
                    grade = tier;
                }
            }
            GradedRecord {
                student: record.student,
                composite: record.composite,
                rank: record.rank,
                grade,
            }
        })
        .collect()
}
