use super::domain::StudentRecord;
use calamine::{open_workbook_auto, Data, Range, Reader, Xlsx};
use std::io::{Read, Seek};
use std::path::Path;
use thiserror::Error;

pub const NAME_COLUMN: &str = "Name";
pub const STUDENT_ID_COLUMN: &str = "Student ID";
pub const CLASS_COLUMN: &str = "Class";
pub const PART_A_COLUMN: &str = "Part A";
pub const PART_B_COLUMN: &str = "Part B";

pub const REQUIRED_COLUMNS: [&str; 5] = [
    NAME_COLUMN,
    STUDENT_ID_COLUMN,
    CLASS_COLUMN,
    PART_A_COLUMN,
    PART_B_COLUMN,
];

#[derive(Debug, Error)]
pub enum RosterImportError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid spreadsheet data: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("spreadsheet has no worksheets")]
    EmptyWorkbook,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("unsupported roster format '{0}', expected .csv, .xlsx, or .xls")]
    UnsupportedExtension(String),
}

/// Loads a roster file, dispatching on extension: `.csv` through the
/// CSV reader, `.xlsx`/`.xls` through the spreadsheet reader.
pub fn from_path(path: impl AsRef<Path>) -> Result<Vec<StudentRecord>, RosterImportError> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => from_csv_reader(std::fs::File::open(path)?),
        "xlsx" | "xls" => {
            let mut workbook = open_workbook_auto(path)?;
            let range = workbook
                .worksheet_range_at(0)
                .ok_or(RosterImportError::EmptyWorkbook)??;
            records_from_range(&range)
        }
        other => Err(RosterImportError::UnsupportedExtension(other.to_string())),
    }
}

/// Parses roster CSV. Required columns may appear in any order; extra
/// columns are ignored; empty score cells are normalized to "0".
pub fn from_csv_reader<R: Read>(reader: R) -> Result<Vec<StudentRecord>, RosterImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader.headers()?.iter().map(str::to_string).collect();
    let columns = ColumnIndex::resolve(&headers)?;

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(columns.record_from(|index| row.get(index).map(str::to_string)));
    }
    Ok(records)
}

/// Parses the first worksheet of an in-memory xlsx workbook. Used for
/// uploads that never touch the filesystem.
pub fn from_xlsx_reader<R: Read + Seek>(reader: R) -> Result<Vec<StudentRecord>, RosterImportError> {
    let mut workbook = Xlsx::new(reader).map_err(calamine::Error::Xlsx)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(RosterImportError::EmptyWorkbook)?
        .map_err(calamine::Error::Xlsx)?;
    records_from_range(&range)
}

fn records_from_range(range: &Range<Data>) -> Result<Vec<StudentRecord>, RosterImportError> {
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => {
            return Err(RosterImportError::MissingColumns(
                REQUIRED_COLUMNS.iter().map(|label| label.to_string()).collect(),
            ))
        }
    };
    let columns = ColumnIndex::resolve(&headers)?;

    Ok(rows
        .map(|row| columns.record_from(|index| row.get(index).map(cell_text)))
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(value) => value.trim().to_string(),
        // Integral floats print without a trailing ".0" so numeric
        // student ids survive a spreadsheet round trip. Magnitudes the
        // cast would saturate fall through to float formatting.
        Data::Float(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Int(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string(),
    }
}

struct ColumnIndex {
    name: usize,
    student_id: usize,
    class_name: usize,
    part_a: usize,
    part_b: usize,
}

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self, RosterImportError> {
        let find = |label: &str| headers.iter().position(|header| header.trim() == label);
        let positions = [
            find(NAME_COLUMN),
            find(STUDENT_ID_COLUMN),
            find(CLASS_COLUMN),
            find(PART_A_COLUMN),
            find(PART_B_COLUMN),
        ];

        match positions {
            [Some(name), Some(student_id), Some(class_name), Some(part_a), Some(part_b)] => {
                Ok(Self {
                    name,
                    student_id,
                    class_name,
                    part_a,
                    part_b,
                })
            }
            _ => {
                let missing = REQUIRED_COLUMNS
                    .iter()
                    .zip(positions)
                    .filter(|(_, position)| position.is_none())
                    .map(|(label, _)| label.to_string())
                    .collect();
                Err(RosterImportError::MissingColumns(missing))
            }
        }
    }

    fn record_from(&self, cell: impl Fn(usize) -> Option<String>) -> StudentRecord {
        let text = |index: usize| cell(index).unwrap_or_default();
        let score = |index: usize| {
            let value = text(index);
            if value.is_empty() {
                "0".to_string()
            } else {
                value
            }
        };

        StudentRecord {
            name: text(self.name),
            student_id: text(self.student_id),
            class_name: text(self.class_name),
            part_a: score(self.part_a),
            part_b: score(self.part_b),
        }
    }
}
