use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::data::model::{CellValue, Dataset};
use crate::data::reshape::LongTable;

// ---------------------------------------------------------------------------
// Table preview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableColumn {
    pub name: String,
    pub id: String,
}

impl TableColumn {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: name.to_string(),
        }
    }
}

/// Columns plus row records, the shape the table renderer consumes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TableView {
    pub columns: Vec<TableColumn>,
    pub data: Vec<BTreeMap<String, CellValue>>,
}

impl TableView {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            columns: dataset.schema().names().map(TableColumn::named).collect(),
            data: dataset.records(),
        }
    }

    pub fn from_long(long: &LongTable) -> Self {
        Self {
            columns: long.column_names().into_iter().map(TableColumn::named).collect(),
            data: long.records(),
        }
    }
}

// ---------------------------------------------------------------------------
// Export control visibility
// ---------------------------------------------------------------------------

/// Whether the download button is shown. Hidden, not merely disabled, when
/// the dataset is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportControl {
    Visible,
    Hidden,
}

impl Serialize for ExportControl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ExportControl::Visible => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("display", "block")?;
                map.serialize_entry("margin", "10px auto")?;
                map.end()
            }
            ExportControl::Hidden => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("display", "none")?;
                map.end()
            }
        }
    }
}
