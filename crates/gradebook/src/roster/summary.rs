use super::domain::GradedRecord;
use super::grading::GradeTier;
use serde::Serialize;
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeBandEntry {
    pub tier: GradeTier,
    pub tier_label: &'static str,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassAverageEntry {
    pub class_name: String,
    pub mean_composite: f64,
}

/// Descriptive statistics over one graded roster, for CLI output and
/// the HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortSummary {
    pub total: usize,
    pub mean_composite: f64,
    pub highest_composite: i64,
    pub lowest_composite: i64,
    pub grade_distribution: Vec<GradeBandEntry>,
    pub class_averages: Vec<ClassAverageEntry>,
}

impl CohortSummary {
    pub fn from_records(records: &[GradedRecord]) -> Self {
        let total = records.len();
        let mean_composite = if total == 0 {
            0.0
        } else {
            records.iter().map(|record| record.composite as f64).sum::<f64>() / total as f64
        };
        let highest_composite = records.iter().map(|record| record.composite).max().unwrap_or(0);
        let lowest_composite = records.iter().map(|record| record.composite).min().unwrap_or(0);

        Self {
            total,
            mean_composite,
            highest_composite,
            lowest_composite,
            grade_distribution: grade_distribution(records),
            class_averages: class_averages(records),
        }
    }
}

fn grade_distribution(records: &[GradedRecord]) -> Vec<GradeBandEntry> {
    let mut bands = Vec::new();
    let tiers = GradeTier::ascending()
        .into_iter()
        .chain(std::iter::once(GradeTier::Ungraded));

    for tier in tiers {
        let count = records.iter().filter(|record| record.grade == tier).count();
        if count == 0 {
            continue;
        }
        bands.push(GradeBandEntry {
            tier,
            tier_label: tier.label(),
            count,
            percentage: count as f64 / records.len() as f64 * 100.0,
        });
    }
    bands
}

fn class_averages(records: &[GradedRecord]) -> Vec<ClassAverageEntry> {
    // First-seen order keeps the aggregation deterministic before the
    // sort; ties then stay in roster order.
    let mut totals: Vec<(String, i64, usize)> = Vec::new();
    for record in records {
        match totals
            .iter_mut()
            .find(|(class_name, _, _)| *class_name == record.student.class_name)
        {
            Some((_, sum, count)) => {
                *sum += record.composite;
                *count += 1;
            }
            None => totals.push((record.student.class_name.clone(), record.composite, 1)),
        }
    }

    let mut averages: Vec<ClassAverageEntry> = totals
        .into_iter()
        .map(|(class_name, sum, count)| ClassAverageEntry {
            class_name,
            mean_composite: sum as f64 / count as f64,
        })
        .collect();
    averages.sort_by(|a, b| {
        b.mean_composite
            .partial_cmp(&a.mean_composite)
            .unwrap_or(Ordering::Equal)
    });
    averages
}
