use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as read from the sheet.
///
/// Numbers are kept as `f64` regardless of whether the sheet stored them as
/// integers; the integer/float distinction lives in the [`Schema`].
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Bool(bool),
    Null,
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Number(v) if is_whole(*v) => serializer.serialize_i64(*v as i64),
            CellValue::Number(v) if v.is_finite() => serializer.serialize_f64(*v),
            CellValue::Number(_) | CellValue::Null => serializer.serialize_none(),
            CellValue::Text(s) => serializer.serialize_str(s),
            CellValue::Bool(b) => serializer.serialize_bool(*b),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(v) if is_whole(*v) => write!(f, "{}", *v as i64),
            CellValue::Number(v) => write!(f, "{v}"),
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl CellValue {
    /// Numeric view of the cell, used for plot coordinates.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

/// Whole numbers in `i64` range print and serialise without a fraction.
pub(crate) fn is_whole(v: f64) -> bool {
    v.is_finite() && v.fract() == 0.0 && v.abs() < 9.0e15
}

// ---------------------------------------------------------------------------
// Schema – discovered once at load time
// ---------------------------------------------------------------------------

/// Column type inferred from the cells of one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Integer,
    Float,
    Bool,
    Text,
    /// Every cell is null.
    Empty,
}

impl ColumnType {
    /// Infer a column type the way a dataframe reader would: whole numbers
    /// stay integers until a fractional value shows up, anything mixed with
    /// text becomes text.
    pub fn infer<'a>(cells: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let mut kind = ColumnType::Empty;
        for cell in cells {
            let cell_kind = match cell {
                CellValue::Null => continue,
                CellValue::Number(v) if is_whole(*v) => ColumnType::Integer,
                CellValue::Number(_) => ColumnType::Float,
                CellValue::Bool(_) => ColumnType::Bool,
                CellValue::Text(_) => ColumnType::Text,
            };
            kind = match (kind, cell_kind) {
                (ColumnType::Empty, k) => k,
                (a, b) if a == b => a,
                (ColumnType::Integer, ColumnType::Float) | (ColumnType::Float, ColumnType::Integer) => {
                    ColumnType::Float
                }
                _ => ColumnType::Text,
            };
        }
        kind
    }
}

/// One named, typed column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub name: String,
    pub dtype: ColumnType,
}

/// Ordered list of columns; position 0 is the X axis by convention.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    pub columns: Vec<Column>,
}

impl Schema {
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// A rectangular table. Row order is the canonical index space: row `i`
/// refers to the same record until the dataset is replaced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    schema: Schema,
    /// Row-major cells; every row has `schema.len()` entries.
    rows: Vec<Vec<CellValue>>,
}

impl Dataset {
    /// Build a dataset from column names and rows, inferring the schema.
    ///
    /// Short rows are padded with nulls, long rows are truncated.
    pub fn new(names: Vec<String>, mut rows: Vec<Vec<CellValue>>) -> Self {
        let width = names.len();
        for row in &mut rows {
            row.resize(width, CellValue::Null);
        }
        let columns = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Column {
                dtype: ColumnType::infer(rows.iter().map(|r| &r[i])),
                name,
            })
            .collect();
        Dataset {
            schema: Schema { columns },
            rows,
        }
    }

    /// Zero rows, zero columns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.names().map(str::to_string).collect()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.schema.len()
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[CellValue]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Cells of one column in row order.
    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &CellValue> + '_> {
        let idx = self.schema.position(name)?;
        Some(self.rows.iter().map(move |r| &r[idx]))
    }

    /// Row `index` as a record keyed by column name.
    pub fn record(&self, index: usize) -> Option<BTreeMap<String, CellValue>> {
        let row = self.rows.get(index)?;
        Some(
            self.schema
                .names()
                .zip(row.iter())
                .map(|(name, cell)| (name.to_string(), cell.clone()))
                .collect(),
        )
    }

    /// All rows as records, in row order.
    pub fn records(&self) -> Vec<BTreeMap<String, CellValue>> {
        (0..self.len()).filter_map(|i| self.record(i)).collect()
    }

    /// Materialise the rows at `indices` as a standalone table.
    ///
    /// Out-of-range indices are skipped. The schema is re-inferred from the
    /// kept rows so the result describes itself.
    pub fn take(&self, indices: impl IntoIterator<Item = usize>) -> Dataset {
        let rows = indices
            .into_iter()
            .filter_map(|i| self.rows.get(i).cloned())
            .collect();
        Dataset::new(self.column_names(), rows)
    }
}
