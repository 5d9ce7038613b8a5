use super::domain::{ScoredRecord, StudentRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub const PART_A_FULL_MARKS: f64 = 50.0;
pub const PART_B_FULL_MARKS: f64 = 103.0;
pub const PART_A_WEIGHT: f64 = 0.3;
pub const PART_B_WEIGHT: f64 = 0.7;

/// How a part score that fails numeric coercion is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorePolicy {
    /// Abort the batch, naming the offending row and field.
    Strict,
    /// Keep the record and default its composite to zero.
    ZeroOnError,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScoreError {
    #[error("row {row}: {field} value '{value}' is not numeric")]
    Conversion {
        row: usize,
        field: &'static str,
        value: String,
    },
}

/// Weighted composite on a 100-point scale: part B carries 70% scaled
/// from its 103-point domain, part A carries 30% scaled from its
/// 50-point domain, rounded to the nearest integer. No clamping, so
/// out-of-domain inputs produce out-of-range composites.
pub fn composite_score(part_a: f64, part_b: f64) -> i64 {
    let weighted_a = part_a / PART_A_FULL_MARKS * PART_A_WEIGHT * 100.0;
    let weighted_b = part_b / PART_B_FULL_MARKS * PART_B_WEIGHT * 100.0;
    (weighted_a + weighted_b).round() as i64
}

/// Scores a batch, leaving the input order untouched. Rows are
/// numbered from 1 in conversion errors to match the roster file.
pub fn score_records(
    records: Vec<StudentRecord>,
    policy: ScorePolicy,
) -> Result<Vec<ScoredRecord>, ScoreError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, student)| {
            let composite = match (parse_score(&student.part_a), parse_score(&student.part_b)) {
                (Some(part_a), Some(part_b)) => composite_score(part_a, part_b),
                (part_a, _) => match policy {
                    ScorePolicy::Strict => {
                        let (field, value) = if part_a.is_none() {
                            ("part A", student.part_a.clone())
                        } else {
                            ("part B", student.part_b.clone())
                        };
                        return Err(ScoreError::Conversion {
                            row: index + 1,
                            field,
                            value,
                        });
                    }
                    ScorePolicy::ZeroOnError => {
                        warn!(
                            row = index + 1,
                            student = %student.name,
                            "non-numeric part score, composite defaulted to 0"
                        );
                        0
                    }
                },
            };
            Ok(ScoredRecord { student, composite })
        })
        .collect()
}

fn parse_score(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(part_a: &str, part_b: &str) -> StudentRecord {
        StudentRecord {
            name: "Chan Tai Man".to_string(),
            student_id: "20240001".to_string(),
            class_name: "Class 1".to_string(),
            part_a: part_a.to_string(),
            part_b: part_b.to_string(),
        }
    }

    #[test]
    fn composite_follows_weighted_formula() {
        // 95/103*70 + 45/50*30 = 64.56 + 27.0 -> 92
        assert_eq!(composite_score(45.0, 95.0), 92);
        // 88/103*70 + 42/50*30 = 59.81 + 25.2 -> 85
        assert_eq!(composite_score(42.0, 88.0), 85);
    }

    #[test]
    fn composite_saturates_at_domain_bounds() {
        assert_eq!(composite_score(0.0, 0.0), 0);
        assert_eq!(composite_score(50.0, 103.0), 100);
    }

    #[test]
    fn composite_is_not_clamped() {
        assert!(composite_score(60.0, 110.0) > 100);
        assert!(composite_score(-10.0, 0.0) < 0);
    }

    #[test]
    fn scores_batch_in_input_order() {
        let scored = score_records(
            vec![record("45", "95"), record("42", "88")],
            ScorePolicy::Strict,
        )
        .expect("numeric batch scores");

        assert_eq!(scored[0].composite, 92);
        assert_eq!(scored[1].composite, 85);
    }

    #[test]
    fn accepts_decimal_score_text() {
        let scored = score_records(vec![record("45.5", "95.0")], ScorePolicy::Strict)
            .expect("decimal text coerces");
        assert_eq!(scored[0].composite, composite_score(45.5, 95.0));
    }

    #[test]
    fn strict_policy_names_row_and_field() {
        let err = score_records(
            vec![record("45", "95"), record("absent", "88")],
            ScorePolicy::Strict,
        )
        .expect_err("non-numeric part A fails");

        assert_eq!(
            err,
            ScoreError::Conversion {
                row: 2,
                field: "part A",
                value: "absent".to_string(),
            }
        );
    }

    #[test]
    fn strict_policy_reports_part_b() {
        let err = score_records(vec![record("45", "n/a")], ScorePolicy::Strict)
            .expect_err("non-numeric part B fails");

        assert_eq!(
            err,
            ScoreError::Conversion {
                row: 1,
                field: "part B",
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn zero_policy_defaults_composite() {
        let scored = score_records(
            vec![record("abc", "95"), record("42", "88")],
            ScorePolicy::ZeroOnError,
        )
        .expect("lenient batch never fails on conversion");

        assert_eq!(scored[0].composite, 0);
        assert_eq!(scored[1].composite, 85);
    }
}
