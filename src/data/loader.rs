//! Reading persisted (date, value) tables into a [`Series`].
//!
//! This is the only place the crate touches files for data. Everything it
//! produces is an owned, validated `Series`; the numeric core never sees a
//! path.

use std::path::Path;

use thiserror::Error;

use crate::data::parser;
use crate::state::series::Series;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read spreadsheet: {0}")]
    Spreadsheet(String),

    #[error("No data found after header detection")]
    NoData,

    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    #[error("Column '{0}' is neither numeric nor dates")]
    NotNumeric(String),

    #[error("No rows with finite values in both columns")]
    NoNumericRows,
}

/// Column names and column-major cell text of a loaded table.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub columns: Vec<String>,
    pub column_data: Vec<Vec<String>>,
    pub row_count: usize,
}

impl LoadedData {
    /// Build from row-major cells, using the detected header row for names.
    fn from_rows(all_rows: Vec<Vec<String>>) -> Result<Self, LoadError> {
        let header_row = parser::detect_header_row(&all_rows);
        let Some(header) = all_rows.get(header_row) else {
            return Err(LoadError::NoData);
        };

        let columns: Vec<String> = header.iter().map(|s| s.trim().to_string()).collect();
        let data_rows = &all_rows[header_row + 1..];
        if data_rows.is_empty() {
            return Err(LoadError::NoData);
        }

        let mut column_data: Vec<Vec<String>> = vec![Vec::with_capacity(data_rows.len()); columns.len()];
        for row in data_rows {
            for (col_idx, col) in column_data.iter_mut().enumerate() {
                col.push(row.get(col_idx).cloned().unwrap_or_default());
            }
        }

        Ok(Self {
            columns,
            column_data,
            row_count: data_rows.len(),
        })
    }

    pub fn column(&self, name: &str) -> Option<&[String]> {
        self.columns
            .iter()
            .position(|c| c.eq_ignore_ascii_case(name))
            .map(|idx| self.column_data[idx].as_slice())
    }
}

/// Load a CSV or Excel file by extension.
pub fn load_file(path: &Path) -> Result<LoadedData, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    let data = match ext.as_str() {
        "csv" | "txt" => load_csv(path)?,
        "xls" | "xlsx" => load_excel(path)?,
        _ => return Err(LoadError::UnsupportedFormat(ext)),
    };
    tracing::info!(
        "Loaded {} rows x {} columns from {:?}",
        data.row_count,
        data.columns.len(),
        path
    );
    Ok(data)
}

fn load_csv(path: &Path) -> Result<LoadedData, LoadError> {
    let content = std::fs::read(path)?;
    // Latin-1 fallback: each byte maps to the same code point.
    let text = String::from_utf8(content)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect());

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(text.as_bytes());

    let mut all_rows = Vec::new();
    let mut skipped = 0usize;
    for result in reader.records() {
        match result {
            Ok(record) => all_rows.push(record.iter().map(|s| s.to_string()).collect()),
            Err(e) => {
                skipped += 1;
                tracing::debug!("Skipping unreadable CSV record: {e}");
            }
        }
    }
    if skipped > 0 {
        tracing::warn!("Skipped {skipped} unreadable records in {:?}", path);
    }

    LoadedData::from_rows(all_rows)
}

fn load_excel(path: &Path) -> Result<LoadedData, LoadError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| LoadError::Spreadsheet(e.to_string()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| LoadError::Spreadsheet("No sheets found".to_string()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| LoadError::Spreadsheet(e.to_string()))?;

    let all_rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    Data::Empty => String::new(),
                    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
                    Data::Float(f) => f.to_string(),
                    Data::Int(i) => i.to_string(),
                    Data::Bool(b) => b.to_string(),
                    Data::DateTime(dt) => dt
                        .as_datetime()
                        .map(|d| d.format("%Y-%m-%dT%H:%M:%S").to_string())
                        .unwrap_or_default(),
                    Data::Error(e) => format!("{e:?}"),
                })
                .collect()
        })
        .collect();

    LoadedData::from_rows(all_rows)
}

/// Pair two columns into a series.
///
/// The x column may hold numbers or dates (converted to decimal years).
/// Rows where either side is not finite are dropped, as are rows whose y is
/// below `y_floor` when given (records mark gaps with fill values such as
/// -99.99).
pub fn series_from_columns(
    data: &LoadedData,
    x_col: &str,
    y_col: &str,
    y_floor: Option<f64>,
) -> Result<Series, LoadError> {
    let x_raw = data
        .column(x_col)
        .ok_or_else(|| LoadError::ColumnNotFound(x_col.to_string()))?;
    let y_raw = data
        .column(y_col)
        .ok_or_else(|| LoadError::ColumnNotFound(y_col.to_string()))?;

    let (xs, x_frac) = parser::column_to_f64(x_raw);
    let xs = if x_frac > 0.5 {
        xs
    } else {
        parser::column_to_decimal_years(x_raw)
            .map(|(years, _)| years)
            .ok_or_else(|| LoadError::NotNumeric(x_col.to_string()))?
    };
    let (ys, _) = parser::column_to_f64(y_raw);

    let series = Series::from_pairs(xs.into_iter().zip(ys).filter(|&(x, y)| {
        x.is_finite() && y.is_finite() && y_floor.map_or(true, |floor| y >= floor)
    }));

    let dropped = data.row_count - series.len();
    if dropped > 0 {
        tracing::info!("Dropped {dropped} rows with missing or fill values");
    }
    if series.is_empty() {
        return Err(LoadError::NoNumericRows);
    }
    Ok(series)
}
