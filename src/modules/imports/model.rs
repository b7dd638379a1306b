//! Header-level validation of admin CSV uploads. Rows are counted, not
//! imported.

use serde::Serialize;
use std::str::FromStr;

/// Hard ceiling regardless of the configured upload size.
pub const MAX_IMPORT_BYTES: usize = 5 * 1024 * 1024;

const SME_COLUMNS: &[&str] = &[
    "name",
    "owner_name",
    "owner_email",
    "municipality",
    "category",
    "address",
    "latitude",
    "longitude",
];

const USER_COLUMNS: &[&str] = &["username", "email", "first_name", "last_name", "role"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportKind {
    Smes,
    Users,
}

impl ImportKind {
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            Self::Smes => SME_COLUMNS,
            Self::Users => USER_COLUMNS,
        }
    }
}

impl FromStr for ImportKind {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smes" => Ok(Self::Smes),
            "users" => Ok(Self::Users),
            other => Err(ImportError::UnknownKind(other.to_string())),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ImportError {
    #[error("Unknown import type '{0}'. Expected 'smes' or 'users'")]
    UnknownKind(String),

    #[error("No file uploaded. Send the CSV in a multipart field named 'file'")]
    MissingFile,

    #[error("Only .csv files are accepted")]
    InvalidExtension,

    #[error("File exceeds the {limit_mb} MB upload limit")]
    TooLarge { limit_mb: usize },

    #[error("File is empty")]
    Empty,

    #[error("File is not valid UTF-8 text")]
    InvalidEncoding,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub kind: ImportKind,
    pub file_name: String,
    pub size_bytes: usize,
    pub row_count: usize,
    pub columns: Vec<String>,
    pub missing_columns: Vec<String>,
    pub valid: bool,
}

pub fn validate_file_name(file_name: &str) -> Result<(), ImportError> {
    if file_name.to_ascii_lowercase().ends_with(".csv") {
        Ok(())
    } else {
        Err(ImportError::InvalidExtension)
    }
}

pub fn validate_size(size: usize, limit_bytes: usize) -> Result<(), ImportError> {
    let limit_bytes = limit_bytes.min(MAX_IMPORT_BYTES);
    if size > limit_bytes {
        return Err(ImportError::TooLarge {
            limit_mb: limit_bytes / (1024 * 1024),
        });
    }
    Ok(())
}

/// Checks name, size and header row of an uploaded CSV.
pub fn inspect(kind: ImportKind, file_name: &str, bytes: &[u8], limit_bytes: usize) -> Result<ImportReport, ImportError> {
    validate_file_name(file_name)?;
    validate_size(bytes.len(), limit_bytes)?;

    let text = std::str::from_utf8(bytes).map_err(|_| ImportError::InvalidEncoding)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut records = split_records(text)
        .into_iter()
        .filter(|record| record.iter().any(|field| !field.trim().is_empty()));
    let header = records.next().ok_or(ImportError::Empty)?;
    let columns = normalize_header(header);
    let row_count = records.count();

    let missing_columns: Vec<String> = kind
        .required_columns()
        .iter()
        .filter(|required| !columns.iter().any(|c| c == *required))
        .map(|c| c.to_string())
        .collect();

    Ok(ImportReport {
        kind,
        file_name: file_name.to_string(),
        size_bytes: bytes.len(),
        row_count,
        valid: missing_columns.is_empty(),
        columns,
        missing_columns,
    })
}

fn normalize_header(fields: Vec<String>) -> Vec<String> {
    fields
        .into_iter()
        .map(|column| column.trim().to_ascii_lowercase().replace(' ', "_"))
        .filter(|column| !column.is_empty())
        .collect()
}

/// Splits CSV text into records of fields. Quoted fields may contain commas,
/// line breaks and `""` escapes.
fn split_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(ch),
        }
    }

    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    records
}
