use serde::Serialize;

use crate::color::ColorMap;
use crate::data::model::{CellValue, Dataset};
use crate::data::reshape::{LongTable, VALUE_COLUMN};

pub const SELECT_TITLE: &str = "Select data by dragging a box";
pub const INVALID_TITLE: &str = "Invalid or empty Excel file.";
pub const SERIES_LEGEND_TITLE: &str = "trend";

// ---------------------------------------------------------------------------
// Plot specification handed to the rendering layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    #[default]
    Zoom,
    Select,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

/// One rendered point. `row` is the dataset row ordinal it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlotPoint {
    pub x: CellValue,
    pub y: CellValue,
    pub row: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub color: String,
    pub mode: TraceMode,
    pub points: Vec<PlotPoint>,
    /// Set on overlays that stand in for a calculation not yet implemented.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub placeholder: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlotSpec {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub legend_title: Option<String>,
    pub drag_mode: DragMode,
    pub series: Vec<Series>,
}

impl PlotSpec {
    /// Blank figure: nothing to show yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Figure shown instead of a scatter when the dataset fails validation.
    pub fn invalid_placeholder() -> Self {
        Self {
            title: Some(INVALID_TITLE.to_string()),
            ..Self::default()
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.series.is_empty()
    }
}

/// Scatter every column after the first against the first.
///
/// Each series has exactly one point per dataset row, in row order, so a
/// point's position in any series equals its row ordinal. Cells that are
/// not numeric keep their slot.
pub fn scatter(dataset: &Dataset) -> PlotSpec {
    let names = dataset.column_names();
    let Some((x_name, series_names)) = names.split_first() else {
        return PlotSpec::invalid_placeholder();
    };
    let colors = ColorMap::new(series_names.iter().map(String::as_str));

    let series = series_names
        .iter()
        .enumerate()
        .map(|(offset, label)| {
            let col = offset + 1;
            let points = dataset
                .rows()
                .iter()
                .enumerate()
                .map(|(row, cells)| PlotPoint {
                    x: cells[0].clone(),
                    y: cells[col].clone(),
                    row,
                })
                .collect();
            Series {
                label: label.clone(),
                color: colors.color_for(label).to_string(),
                mode: TraceMode::Markers,
                points,
                placeholder: false,
            }
        })
        .collect();

    PlotSpec {
        title: Some(SELECT_TITLE.to_string()),
        x_label: Some(x_name.clone()),
        y_label: Some("value".to_string()),
        legend_title: Some(SERIES_LEGEND_TITLE.to_string()),
        drag_mode: DragMode::Select,
        series,
    }
}

// ---------------------------------------------------------------------------
// Historical-range overlay
// ---------------------------------------------------------------------------

/// Calculations offered for the historical-range overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HistoricalRange {
    #[serde(rename = "Standard Deviation")]
    StandardDeviation,
}

impl HistoricalRange {
    pub const ALL: [HistoricalRange; 1] = [HistoricalRange::StandardDeviation];

    pub fn label(&self) -> &'static str {
        match self {
            HistoricalRange::StandardDeviation => "Standard Deviation",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.label() == value)
    }

    fn overlay_name(&self) -> String {
        format!("Historical Range: {}", self.label())
    }
}

/// Scatter of a long-form table, one colour per source column, with an
/// optional historical-range line.
///
/// The overlay does no statistics yet: it traces the first matched
/// column's raw values and is flagged as a placeholder.
pub fn trend_plot(long: &LongTable, measurement: &str, range: Option<HistoricalRange>) -> PlotSpec {
    let colors = ColorMap::new(long.runs.iter().map(String::as_str));

    let mut series: Vec<Series> = long
        .runs
        .iter()
        .map(|run| Series {
            label: run.clone(),
            color: colors.color_for(run).to_string(),
            mode: TraceMode::Markers,
            points: run_points(long, run),
            placeholder: false,
        })
        .collect();

    if let (Some(range), Some(reference)) = (range, long.runs.first()) {
        series.push(Series {
            label: range.overlay_name(),
            color: "#000000".to_string(),
            mode: TraceMode::Lines,
            points: run_points(long, reference),
            placeholder: true,
        });
    }

    PlotSpec {
        title: Some(format!("{measurement} Trends")),
        x_label: Some(long.index_column.clone()),
        y_label: Some(VALUE_COLUMN.to_string()),
        legend_title: Some("Run".to_string()),
        drag_mode: DragMode::Zoom,
        series,
    }
}

fn run_points(long: &LongTable, run: &str) -> Vec<PlotPoint> {
    long.run_rows(run)
        .enumerate()
        .map(|(row, r)| PlotPoint {
            x: r.index.clone(),
            y: r.value.clone(),
            row,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::reshape::reshape_long;

    fn wide() -> Dataset {
        Dataset::new(
            vec!["time".into(), "Run A Titer".into(), "Run B Titer".into()],
            vec![
                vec![CellValue::Number(0.0), CellValue::Number(1.0), CellValue::Number(2.0)],
                vec![CellValue::Number(1.0), CellValue::Text("n/a".into()), CellValue::Number(4.0)],
                vec![CellValue::Number(2.0), CellValue::Number(5.0), CellValue::Null],
            ],
        )
    }

    #[test]
    fn point_index_equals_row_ordinal_in_every_series() {
        let ds = wide();
        let plot = scatter(&ds);
        assert_eq!(plot.series.len(), 2);
        for series in &plot.series {
            assert_eq!(series.points.len(), ds.len());
            for (i, p) in series.points.iter().enumerate() {
                assert_eq!(p.row, i);
                assert_eq!(p.x, ds.rows()[i][0]);
            }
        }
    }

    #[test]
    fn scatter_uses_select_drag_and_first_column_as_x() {
        let plot = scatter(&wide());
        assert_eq!(plot.drag_mode, DragMode::Select);
        assert_eq!(plot.x_label.as_deref(), Some("time"));
        assert_eq!(plot.title.as_deref(), Some(SELECT_TITLE));
        assert_eq!(plot.legend_title.as_deref(), Some("trend"));
    }

    #[test]
    fn placeholder_has_no_series() {
        let plot = PlotSpec::invalid_placeholder();
        assert!(plot.is_placeholder());
        assert_eq!(plot.title.as_deref(), Some(INVALID_TITLE));
    }

    #[test]
    fn trend_overlay_is_a_labelled_placeholder() {
        let long = reshape_long(&wide(), "time", "Titer").unwrap();
        let plot = trend_plot(&long, "Titer", Some(HistoricalRange::StandardDeviation));
        assert_eq!(plot.title.as_deref(), Some("Titer Trends"));
        assert_eq!(plot.series.len(), 3);

        let overlay = plot.series.last().unwrap();
        assert_eq!(overlay.label, "Historical Range: Standard Deviation");
        assert_eq!(overlay.mode, TraceMode::Lines);
        assert!(overlay.placeholder);
        assert_eq!(overlay.points, plot.series[0].points);
    }

    #[test]
    fn trend_without_range_has_one_series_per_run() {
        let long = reshape_long(&wide(), "time", "Titer").unwrap();
        let plot = trend_plot(&long, "Titer", None);
        let labels: Vec<_> = plot.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Run A Titer", "Run B Titer"]);
        assert!(plot.series.iter().all(|s| !s.placeholder));
    }

    #[test]
    fn range_options_parse_by_label() {
        assert_eq!(
            HistoricalRange::parse("Standard Deviation"),
            Some(HistoricalRange::StandardDeviation)
        );
        assert_eq!(HistoricalRange::parse("Percentile"), None);
    }
}
