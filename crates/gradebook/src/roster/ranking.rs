use super::domain::{RankedRecord, ScoredRecord};

/// Sorts descending by composite and assigns competition ("min")
/// ranks: tied composites share the best rank, and the next distinct
/// composite ranks 1 + the number of records strictly above it. The
/// sort is stable, so ties keep their input order.
pub fn rank_records(records: Vec<ScoredRecord>) -> Vec<RankedRecord> {
    let mut records = records;
    records.sort_by(|a, b| b.composite.cmp(&a.composite));

    let mut ranked = Vec::with_capacity(records.len());
    let mut current_rank = 0;
    let mut previous = None;
    for (position, record) in records.into_iter().enumerate() {
        if previous != Some(record.composite) {
            current_rank = position + 1;
            previous = Some(record.composite);
        }
        ranked.push(RankedRecord {
            student: record.student,
            composite: record.composite,
            rank: current_rank,
        });
    }
    ranked
}
