use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{CellValue, Dataset};

/// Name of the long-form column holding the source column name.
pub const RUN_COLUMN: &str = "Run";
/// Name of the long-form column holding the cell value.
pub const VALUE_COLUMN: &str = "Value";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ReshapeError {
    #[error("no columns end with {suffix:?}")]
    NoMatch { suffix: String },
    #[error("index column {0:?} not found")]
    MissingIndexColumn(String),
}

// ---------------------------------------------------------------------------
// Measurement vocabulary and column filter
// ---------------------------------------------------------------------------

/// Measurement names offered to the user: the last whitespace-delimited
/// token of every column except the index column, deduplicated and sorted.
pub fn measurement_options(dataset: &Dataset, index_column: &str) -> Vec<String> {
    dataset
        .schema()
        .names()
        .filter(|name| *name != index_column)
        .filter_map(|name| name.split_whitespace().last())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Columns whose name ends with `suffix` (case-sensitive), in sheet order.
/// The index column is never a match.
pub fn matching_columns(dataset: &Dataset, index_column: &str, suffix: &str) -> Vec<String> {
    dataset
        .schema()
        .names()
        .filter(|name| *name != index_column && name.ends_with(suffix))
        .map(str::to_string)
        .collect()
}

// ---------------------------------------------------------------------------
// Long-form table
// ---------------------------------------------------------------------------

/// One (index, source column, value) triple.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongRow {
    pub index: CellValue,
    pub run: String,
    pub value: CellValue,
}

/// A wide table melted into one row per (index, source column, value).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LongTable {
    pub index_column: String,
    /// Source columns in the order their rows appear.
    pub runs: Vec<String>,
    pub rows: Vec<LongRow>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Long-form column names: index, `Run`, `Value`.
    pub fn column_names(&self) -> [&str; 3] {
        [self.index_column.as_str(), RUN_COLUMN, VALUE_COLUMN]
    }

    /// Rows belonging to one source column, in original row order.
    pub fn run_rows<'a>(&'a self, run: &'a str) -> impl Iterator<Item = &'a LongRow> + 'a {
        self.rows.iter().filter(move |r| r.run == run)
    }

    pub fn records(&self) -> Vec<BTreeMap<String, CellValue>> {
        self.rows
            .iter()
            .map(|r| {
                BTreeMap::from([
                    (self.index_column.clone(), r.index.clone()),
                    (RUN_COLUMN.to_string(), CellValue::Text(r.run.clone())),
                    (VALUE_COLUMN.to_string(), r.value.clone()),
                ])
            })
            .collect()
    }
}

/// Melt every column ending with `suffix` against `index_column`.
///
/// Rows are grouped by source column (sheet order), each group in original
/// row order. Zero matching columns is [`ReshapeError::NoMatch`], never an
/// empty table.
pub fn reshape_long(
    dataset: &Dataset,
    index_column: &str,
    suffix: &str,
) -> Result<LongTable, ReshapeError> {
    let runs = matching_columns(dataset, index_column, suffix);
    if runs.is_empty() {
        return Err(ReshapeError::NoMatch {
            suffix: suffix.to_string(),
        });
    }

    let index: Vec<&CellValue> = dataset
        .column(index_column)
        .ok_or_else(|| ReshapeError::MissingIndexColumn(index_column.to_string()))?
        .collect();

    let mut rows = Vec::with_capacity(runs.len() * dataset.len());
    for run in &runs {
        let Some(values) = dataset.column(run) else {
            continue;
        };
        rows.extend(index.iter().zip(values).map(|(idx, value)| LongRow {
            index: (*idx).clone(),
            run: run.clone(),
            value: value.clone(),
        }));
    }

    log::debug!(
        "Reshaped {} column(s) matching {suffix:?} into {} rows",
        runs.len(),
        rows.len()
    );
    Ok(LongTable {
        index_column: index_column.to_string(),
        runs,
        rows,
    })
}
