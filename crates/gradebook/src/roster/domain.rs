use super::grading::GradeTier;
use serde::{Deserialize, Serialize};

/// One roster row as imported. Identity fields are opaque strings the
/// pipeline never interprets; the two part scores keep their original
/// text so an export reproduces the upload verbatim (missing cells are
/// normalized to "0" at import time).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: String,
    pub student_id: String,
    pub class_name: String,
    pub part_a: String,
    pub part_b: String,
}

/// A student record plus its weighted composite on the 100-point scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredRecord {
    #[serde(flatten)]
    pub student: StudentRecord,
    pub composite: i64,
}

/// A scored record plus its competition rank (1-based; ties share the
/// best rank).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedRecord {
    #[serde(flatten)]
    pub student: StudentRecord,
    pub composite: i64,
    pub rank: usize,
}

/// A ranked record plus its assigned grade tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradedRecord {
    #[serde(flatten)]
    pub student: StudentRecord,
    pub composite: i64,
    pub rank: usize,
    pub grade: GradeTier,
}
