use super::domain::GradedRecord;
use super::grading::GradeTier;
use super::import::{
    CLASS_COLUMN, NAME_COLUMN, PART_A_COLUMN, PART_B_COLUMN, STUDENT_ID_COLUMN,
};
use chrono::Utc;
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub const COMPOSITE_COLUMN: &str = "Composite";
pub const RANK_COLUMN: &str = "Rank";
pub const GRADE_COLUMN: &str = "Grade";

const SHEET_NAME: &str = "Results";

const EXPORT_COLUMNS: [&str; 8] = [
    NAME_COLUMN,
    STUDENT_ID_COLUMN,
    CLASS_COLUMN,
    PART_A_COLUMN,
    PART_B_COLUMN,
    COMPOSITE_COLUMN,
    RANK_COLUMN,
    GRADE_COLUMN,
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to build result workbook: {0}")]
    Workbook(#[from] XlsxError),
}

fn tier_fill(tier: GradeTier) -> Color {
    match tier {
        GradeTier::Level2 => Color::RGB(0xFFE6E6),
        GradeTier::Level3 => Color::RGB(0xFFF2E6),
        GradeTier::Level4 => Color::RGB(0xFFFFE6),
        GradeTier::Level5 => Color::RGB(0xE6FFE6),
        GradeTier::Level6 => Color::RGB(0xE6F3FF),
        GradeTier::Level7 => Color::RGB(0xF0E6FF),
        GradeTier::Ungraded => Color::RGB(0xF5F5F5),
    }
}

/// Builds the result workbook in memory: all input columns plus
/// composite, rank, and grade; every data cell filled with its tier's
/// color; column widths sized to content. Records are written in the
/// order given, which the pipeline guarantees is rank ascending.
pub fn write_workbook(records: &[GradedRecord]) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    for (column, label) in EXPORT_COLUMNS.iter().enumerate() {
        worksheet.write_string_with_format(0, column as u16, *label, &header_format)?;
    }

    let mut widths: Vec<usize> = EXPORT_COLUMNS
        .iter()
        .map(|label| label.chars().count())
        .collect();

    for (index, record) in records.iter().enumerate() {
        let row = index as u32 + 1;
        let fill = Format::new().set_background_color(tier_fill(record.grade));

        let texts = [
            record.student.name.as_str(),
            record.student.student_id.as_str(),
            record.student.class_name.as_str(),
            record.student.part_a.as_str(),
            record.student.part_b.as_str(),
        ];
        for (column, value) in texts.iter().enumerate() {
            worksheet.write_string_with_format(row, column as u16, *value, &fill)?;
            widths[column] = widths[column].max(value.chars().count());
        }

        worksheet.write_number_with_format(row, 5, record.composite as f64, &fill)?;
        worksheet.write_number_with_format(row, 6, record.rank as f64, &fill)?;
        worksheet.write_string_with_format(row, 7, record.grade.label(), &fill)?;

        widths[5] = widths[5].max(record.composite.to_string().len());
        widths[6] = widths[6].max(record.rank.to_string().len());
        widths[7] = widths[7].max(record.grade.label().len());
    }

    for (column, width) in widths.iter().enumerate() {
        worksheet.set_column_width(column as u16, (*width + 2) as f64)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Export name carrying a short content hash and a timestamp so a
/// result file can be traced back to the upload that produced it. The
/// hash is a traceability id, not a security measure.
pub fn export_filename(source: &[u8]) -> String {
    export_filename_at(source, Utc::now().timestamp())
}

pub fn export_filename_at(source: &[u8], timestamp: i64) -> String {
    let digest = Sha256::digest(source);
    let short_id: String = digest
        .iter()
        .take(4)
        .map(|byte| format!("{byte:02x}"))
        .collect();
    format!("score_results_{short_id}_{timestamp}.xlsx")
}
