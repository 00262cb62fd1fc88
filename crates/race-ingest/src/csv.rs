//! Participant list (CSV export) reading.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, DataType, SerReader};

use crate::error::{IngestError, Result};
use crate::raw::RawParticipant;

/// Column holding the participant identity.
pub const USERNAME_COLUMN: &str = "Username";
/// Column holding the participant display name.
pub const FULL_NAME_COLUMN: &str = "Full Name";

/// Reads the participant list export.
///
/// Every column is read as text; blank cells become `None`. Column names are matched
/// case-insensitively; `Username` is required, `Full Name` is optional.
pub fn read_participant_list(path: &Path) -> Result<Vec<RawParticipant>> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let username_column =
        find_column(&df, USERNAME_COLUMN).ok_or_else(|| IngestError::MissingColumn {
            column: USERNAME_COLUMN.to_string(),
            path: path.to_path_buf(),
        })?;
    let usernames = text_values(&df, &username_column)?;

    let full_names = match find_column(&df, FULL_NAME_COLUMN) {
        Some(column) => text_values(&df, &column)?,
        None => {
            tracing::debug!(
                path = %path.display(),
                "Participant list has no '{FULL_NAME_COLUMN}' column"
            );
            vec![None; df.height()]
        }
    };

    let participants = usernames
        .into_iter()
        .zip(full_names)
        .enumerate()
        .map(|(idx, (username, full_name))| RawParticipant {
            row: idx + 1,
            username,
            full_name,
        })
        .collect();

    Ok(participants)
}

/// Finds a column by name, ignoring case, surrounding whitespace and a BOM.
fn find_column(df: &DataFrame, wanted: &str) -> Option<String> {
    df.get_column_names()
        .into_iter()
        .find(|name| {
            name.as_str()
                .trim_start_matches('\u{feff}')
                .trim()
                .eq_ignore_ascii_case(wanted)
        })
        .map(ToString::to_string)
}

fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?.cast(&DataType::String)?;
    let values = column
        .as_materialized_series()
        .str()?
        .into_iter()
        .map(|value| {
            value
                .filter(|text| !text.trim().is_empty())
                .map(str::to_string)
        })
        .collect();
    Ok(values)
}
