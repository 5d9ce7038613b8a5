pub mod cutoffs;
pub mod domain;
pub mod export;
pub mod grading;
pub mod import;
pub mod ranking;
pub mod sample;
pub mod scoring;
pub mod summary;

pub use cutoffs::{parse_cutoff, CutoffEntryMode, CutoffError, CutoffTable};
pub use domain::{GradedRecord, RankedRecord, ScoredRecord, StudentRecord};
pub use export::ExportError;
pub use grading::{assign_grades, GradeTier};
pub use import::RosterImportError;
pub use ranking::rank_records;
pub use scoring::{composite_score, score_records, ScoreError, ScorePolicy};
pub use summary::CohortSummary;

/// Runs the full pipeline over one imported roster: score, rank, then
/// grade against an immutable cutoff snapshot. Output is ordered by
/// rank ascending.
pub fn process_roster(
    records: Vec<StudentRecord>,
    cutoffs: &CutoffTable,
    policy: ScorePolicy,
) -> Result<Vec<GradedRecord>, ScoreError> {
    let scored = scoring::score_records(records, policy)?;
    let ranked = ranking::rank_records(scored);
    Ok(grading::assign_grades(ranked, cutoffs))
}
