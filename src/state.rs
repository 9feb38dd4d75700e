use std::path::PathBuf;

use serde::Serialize;

use crate::config::{RangesConfig, SelectionConfig};
use crate::data::loader::{load_table, Upload};
use crate::data::model::Dataset;
use crate::data::reshape::{measurement_options, reshape_long, ReshapeError};
use crate::data::schema::validate;
use crate::export::{export_selection, ExportFile};
use crate::selection::{map_selection, project_highlights, HighlightDirective, RowIndexSet, SelectionEvent};
use crate::view::plot::{scatter, trend_plot, HistoricalRange, PlotSpec};
use crate::view::table::{ExportControl, TableView};

// ---------------------------------------------------------------------------
// Selection / export session
// ---------------------------------------------------------------------------

/// What the plot, preview table and download button show after a load.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadView {
    pub plot: PlotSpec,
    pub table: TableView,
    pub export_control: ExportControl,
}

impl LoadView {
    fn invalid() -> Self {
        Self {
            plot: PlotSpec::invalid_placeholder(),
            table: TableView::empty(),
            export_control: ExportControl::Hidden,
        }
    }
}

/// State of one user's selection tool. Every handler takes `&mut self`, so
/// one interaction finishes before the next starts.
#[derive(Debug)]
pub struct SelectionSession {
    default_source: PathBuf,

    /// Validated dataset (None when nothing valid is loaded).
    dataset: Option<Dataset>,

    /// Rows implied by the latest selection.
    selected_rows: RowIndexSet,

    /// Rows at `selected_rows`, materialised for export.
    selected: Option<Dataset>,

    /// Last load error, for display.
    pub status_message: Option<String>,
}

impl SelectionSession {
    pub fn new(config: &SelectionConfig) -> Self {
        Self {
            default_source: config.default_source.clone(),
            dataset: None,
            selected_rows: RowIndexSet::default(),
            selected: None,
            status_message: None,
        }
    }

    /// Replace the dataset with an upload, or the default source when there
    /// is none. Any previous selection is discarded.
    pub fn load(&mut self, upload: Option<&Upload>) -> LoadView {
        self.selected_rows = RowIndexSet::default();
        self.selected = None;
        self.dataset = None;
        self.status_message = None;

        let loaded = match load_table(upload, &self.default_source) {
            Ok(dataset) => Some(dataset),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        };

        if let Err(e) = validate(loaded.as_ref()) {
            log::warn!("Not plotting dataset: {e}");
            return LoadView::invalid();
        }
        let Some(dataset) = loaded else {
            return LoadView::invalid();
        };

        let view = LoadView {
            plot: scatter(&dataset),
            table: TableView::from_dataset(&dataset),
            export_control: ExportControl::Visible,
        };
        self.dataset = Some(dataset);
        view
    }

    /// Apply a new selection, superseding the previous one, and return the
    /// table highlights for it.
    pub fn select(&mut self, event: Option<&SelectionEvent>) -> Vec<HighlightDirective> {
        self.selected_rows = map_selection(event, self.dataset.as_ref());
        self.selected = match &self.dataset {
            Some(ds) if !self.selected_rows.is_empty() => Some(ds.take(self.selected_rows.iter())),
            _ => None,
        };
        project_highlights(&self.selected_rows)
    }

    /// Serialise the current selection. `None` when nothing is selected or
    /// the workbook could not be written.
    pub fn export(&self) -> Option<ExportFile> {
        match export_selection(self.selected.as_ref()) {
            Ok(file) => file,
            Err(e) => {
                log::error!("Export failed: {e}");
                None
            }
        }
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    pub fn selected_rows(&self) -> &RowIndexSet {
        &self.selected_rows
    }

    pub fn selected_subset(&self) -> Option<&Dataset> {
        self.selected.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Historical-ranges session
// ---------------------------------------------------------------------------

/// Status line shown next to the measurement dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RangesMessage {
    NoSelection,
    NoMatch,
    MissingIndexColumn(String),
    Columns(Vec<String>),
}

impl RangesMessage {
    pub fn text(&self) -> String {
        match self {
            RangesMessage::NoSelection => "No selection.".to_string(),
            RangesMessage::NoMatch => "No matching columns found.".to_string(),
            RangesMessage::MissingIndexColumn(col) => format!("Index column {col:?} not found."),
            RangesMessage::Columns(cols) => cols.join("\n"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangesView {
    pub message: RangesMessage,
    pub plot: PlotSpec,
    pub table: TableView,
}

impl RangesView {
    fn blank(message: RangesMessage) -> Self {
        Self {
            message,
            plot: PlotSpec::empty(),
            table: TableView::empty(),
        }
    }
}

/// State of one user's historical-ranges tool.
#[derive(Debug)]
pub struct RangesSession {
    default_source: PathBuf,
    index_column: String,
    dataset: Option<Dataset>,
    /// Measurement vocabulary, fixed from the default source at start-up.
    options: Vec<String>,
}

impl RangesSession {
    /// Load the default source and derive the measurement vocabulary from it.
    pub fn new(config: &RangesConfig) -> Self {
        let mut session = Self {
            default_source: config.default_source.clone(),
            index_column: config.index_column.clone(),
            dataset: None,
            options: Vec::new(),
        };
        session.load(None);
        session.options = session
            .dataset
            .as_ref()
            .map(|ds| measurement_options(ds, &session.index_column))
            .unwrap_or_default();
        session
    }

    /// Swap in another dataset. The vocabulary is left as it was.
    pub fn load(&mut self, upload: Option<&Upload>) {
        self.dataset = match load_table(upload, &self.default_source) {
            Ok(ds) => Some(ds),
            Err(e) => {
                log::error!("Failed to load file: {e}");
                None
            }
        };
    }

    pub fn measurement_options(&self) -> &[String] {
        &self.options
    }

    pub fn range_options(&self) -> Vec<&'static str> {
        HistoricalRange::ALL.iter().map(HistoricalRange::label).collect()
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        self.dataset.as_ref()
    }

    /// Recompute the view for the current dropdown values.
    pub fn update(&self, measurement: Option<&str>, range: Option<&str>) -> RangesView {
        let Some(measurement) = measurement else {
            return RangesView::blank(RangesMessage::NoSelection);
        };
        let range = range.and_then(|r| {
            let parsed = HistoricalRange::parse(r);
            if parsed.is_none() {
                log::warn!("Ignoring unknown historical range {r:?}");
            }
            parsed
        });

        let empty = Dataset::empty();
        let dataset = self.dataset.as_ref().unwrap_or(&empty);
        match reshape_long(dataset, &self.index_column, measurement) {
            Ok(long) => RangesView {
                message: RangesMessage::Columns(long.runs.clone()),
                plot: trend_plot(&long, measurement, range),
                table: TableView::from_long(&long),
            },
            Err(ReshapeError::NoMatch { .. }) => RangesView::blank(RangesMessage::NoMatch),
            Err(ReshapeError::MissingIndexColumn(col)) => {
                log::warn!("Cannot reshape {measurement:?}: index column {col:?} missing");
                RangesView::blank(RangesMessage::MissingIndexColumn(col))
            }
        }
    }
}
