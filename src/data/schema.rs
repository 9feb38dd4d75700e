use super::model::Dataset;

/// Minimum number of columns needed to plot: one X column plus one series.
pub const MIN_COLUMNS: usize = 2;

/// Why a dataset cannot be plotted.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("no dataset loaded")]
    Missing,
    #[error("dataset has no rows")]
    NoRows,
    #[error("dataset has {0} column(s), at least {MIN_COLUMNS} are required")]
    TooFewColumns(usize),
}

/// Check the shape contract required by the plotting pipeline.
pub fn validate(dataset: Option<&Dataset>) -> Result<&Dataset, SchemaError> {
    let dataset = dataset.ok_or(SchemaError::Missing)?;
    if dataset.is_empty() {
        return Err(SchemaError::NoRows);
    }
    if dataset.width() < MIN_COLUMNS {
        return Err(SchemaError::TooFewColumns(dataset.width()));
    }
    Ok(dataset)
}
