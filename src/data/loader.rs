use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};

use super::model::{CellValue, Dataset};

/// Extension of the only supported spreadsheet format.
pub const SUPPORTED_EXTENSION: &str = "xlsx";

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unsupported file format: {0:?} (expected .xlsx)")]
    UnsupportedExtension(String),
    #[error("cannot decode workbook: {0}")]
    Decode(String),
    #[error("workbook contains no sheets")]
    NoSheet,
}

/// An uploaded file: raw bytes plus the filename the user picked.
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            bytes,
        }
    }

    /// Read a file from disk as if it had been uploaded.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();
        Ok(Self { filename, bytes })
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the dataset for one interaction.
///
/// * With an upload, decode it; a bad extension or an undecodable workbook
///   is an error.
/// * Without one, load `default_source` if it exists, otherwise return an
///   empty dataset (zero rows, zero columns).
pub fn load_table(upload: Option<&Upload>, default_source: &Path) -> Result<Dataset, LoadError> {
    match upload {
        Some(upload) => decode_upload(upload),
        None if default_source.is_file() => decode_upload(&Upload::from_path(default_source)?),
        None => {
            log::warn!(
                "Default source {} not found, starting with an empty dataset",
                default_source.display()
            );
            Ok(Dataset::empty())
        }
    }
}

/// Decode uploaded bytes after checking the filename's extension.
pub fn decode_upload(upload: &Upload) -> Result<Dataset, LoadError> {
    let ext = Path::new(&upload.filename)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    if ext != SUPPORTED_EXTENSION {
        return Err(LoadError::UnsupportedExtension(upload.filename.clone()));
    }
    decode_xlsx(&upload.bytes)
}

/// Parse the first sheet of an xlsx workbook. The first row is the header.
///
/// The used range starts at the first non-empty cell; blank leading
/// columns are restored so column positions match the sheet.
pub fn decode_xlsx(bytes: &[u8]) -> Result<Dataset, LoadError> {
    let mut workbook = open_workbook_from_rs::<Xlsx<_>, _>(Cursor::new(bytes))
        .map_err(|e| LoadError::Decode(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(LoadError::NoSheet)?
        .map_err(|e| LoadError::Decode(e.to_string()))?;

    let lead = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Dataset::empty());
    };

    let header: Vec<Data> = std::iter::repeat(Data::Empty)
        .take(lead)
        .chain(header.iter().cloned())
        .collect();
    let names = header_names(&header);
    let data: Vec<Vec<CellValue>> = rows
        .map(|row| {
            std::iter::repeat(CellValue::Null)
                .take(lead)
                .chain(row.iter().map(cell_value))
                .collect()
        })
        .collect();

    let dataset = Dataset::new(names, data);
    log::info!(
        "Loaded {} rows with columns {:?}",
        dataset.len(),
        dataset.column_names()
    );
    Ok(dataset)
}

// -- helpers --

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Null,
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) => CellValue::Text(s.clone()),
        // Date-formatted serials become timestamps; durations stay numeric.
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) if !dt.is_duration() => {
                CellValue::Text(ts.format("%Y-%m-%d %H:%M:%S").to_string())
            }
            _ => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => {
            log::debug!("Cell error {e:?} read as null");
            CellValue::Null
        }
    }
}

/// Header cells become column names. Blank headers are `Unnamed: <i>` and
/// repeated names get `.1`, `.2`, ... suffixes.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let base = match cell_value(cell) {
                CellValue::Null => format!("Unnamed: {i}"),
                other => {
                    let name = other.to_string();
                    if name.trim().is_empty() {
                        format!("Unnamed: {i}")
                    } else {
                        name
                    }
                }
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}
