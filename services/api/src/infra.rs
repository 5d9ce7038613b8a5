use clap::Args;
use gradebook::roster::{
    parse_cutoff, CutoffEntryMode, CutoffError, CutoffTable, ScorePolicy,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

/// Shared service state. The cutoff table is the only value that
/// outlives a request; handlers take a cloned snapshot before running
/// the pipeline so an apply can never be observed mid-run.
#[derive(Clone)]
pub struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) cutoffs: Arc<RwLock<CutoffTable>>,
    pub(crate) score_policy: ScorePolicy,
}

impl AppState {
    pub fn new(metrics: PrometheusHandle, score_policy: ScorePolicy) -> Self {
        Self {
            readiness: Arc::new(AtomicBool::new(false)),
            metrics: Arc::new(metrics),
            cutoffs: Arc::new(RwLock::new(CutoffTable::default())),
            score_policy,
        }
    }

    pub fn mark_ready(&self) {
        self.readiness.store(true, Ordering::Release);
    }

    pub(crate) fn cutoff_snapshot(&self) -> CutoffTable {
        self.cutoffs.read().expect("cutoff lock poisoned").clone()
    }

    pub(crate) fn replace_cutoffs(&self, table: CutoffTable) {
        *self.cutoffs.write().expect("cutoff lock poisoned") = table;
    }
}

/// Raw cutoff entries as typed on a configuration surface. Shared by
/// the CLI flags and the HTTP update body; an absent field keeps the
/// base table's value.
#[derive(Args, Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct CutoffEntries {
    /// Level2 minimum composite
    #[arg(long)]
    pub level2: Option<String>,
    /// Level3 minimum composite
    #[arg(long)]
    pub level3: Option<String>,
    /// Level4 minimum composite
    #[arg(long)]
    pub level4: Option<String>,
    /// Level5 minimum composite
    #[arg(long)]
    pub level5: Option<String>,
    /// Level6 minimum composite
    #[arg(long)]
    pub level6: Option<String>,
    /// Level7 minimum composite
    #[arg(long)]
    pub level7: Option<String>,
}

/// Validates the provided entries against `mode`, layers them over
/// `base`, and rejects the result unless enabled thresholds ascend.
/// Fails without touching `base`, so an invalid update retains the
/// prior table.
pub fn apply_entries(
    base: &CutoffTable,
    entries: &CutoffEntries,
    mode: CutoffEntryMode,
) -> Result<CutoffTable, CutoffError> {
    let mut table = base.clone();
    if let Some(raw) = &entries.level2 {
        table.level2 = parse_cutoff("Level2", raw, mode)?;
    }
    if let Some(raw) = &entries.level3 {
        table.level3 = parse_cutoff("Level3", raw, mode)?;
    }
    if let Some(raw) = &entries.level4 {
        table.level4 = parse_cutoff("Level4", raw, mode)?;
    }
    if let Some(raw) = &entries.level5 {
        table.level5 = parse_cutoff("Level5", raw, mode)?;
    }
    if let Some(raw) = &entries.level6 {
        table.level6 = parse_cutoff("Level6", raw, mode)?;
    }
    if let Some(raw) = &entries.level7 {
        table.level7 = parse_cutoff("Level7", raw, mode)?;
    }
    table.ensure_ascending()?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_entries_keep_base_values() {
        let base = CutoffTable::default();
        let entries = CutoffEntries {
            level7: Some("80".to_string()),
            ..CutoffEntries::default()
        };

        let table = apply_entries(&base, &entries, CutoffEntryMode::StrictInteger)
            .expect("single override applies");
        assert_eq!(table.level7, 80.0);
        assert_eq!(table.level2, base.level2);
    }

    #[test]
    fn invalid_entry_surfaces_the_field() {
        let entries = CutoffEntries {
            level4: Some("sixty".to_string()),
            ..CutoffEntries::default()
        };

        let err = apply_entries(
            &CutoffTable::default(),
            &entries,
            CutoffEntryMode::StrictInteger,
        )
        .expect_err("non-numeric entry rejected");
        assert!(err.to_string().contains("Level4"));
    }

    #[test]
    fn non_ascending_result_is_rejected() {
        let entries = CutoffEntries {
            level7: Some("60".to_string()),
            ..CutoffEntries::default()
        };

        let err = apply_entries(
            &CutoffTable::default(),
            &entries,
            CutoffEntryMode::StrictInteger,
        )
        .expect_err("level7 below level6 rejected");
        assert!(matches!(err, CutoffError::NotAscending { .. }));
    }

    #[test]
    fn decimal_mode_admits_fractional_entries() {
        let entries = CutoffEntries {
            level2: Some("46.5".to_string()),
            ..CutoffEntries::default()
        };

        let table = apply_entries(&CutoffTable::default(), &entries, CutoffEntryMode::Decimal)
            .expect("fractional entry applies in decimal mode");
        assert_eq!(table.level2, 46.5);
    }
}
