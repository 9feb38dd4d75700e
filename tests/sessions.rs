use std::path::PathBuf;

use sheet_select::config::{RangesConfig, SelectionConfig};
use sheet_select::data::loader::{load_table, Upload};
use sheet_select::data::model::{CellValue, Dataset};
use sheet_select::export::{write_workbook, EXPORT_FILENAME, EXPORT_SHEET_NAME};
use sheet_select::selection::{HighlightDirective, PointRef, SelectionEvent};
use sheet_select::state::{RangesMessage, RangesSession, SelectionSession};
use sheet_select::view::plot::TraceMode;
use sheet_select::view::table::ExportControl;

fn num(v: f64) -> CellValue {
    CellValue::Number(v)
}

/// `[{t:0,A:1,B:2},{t:1,A:3,B:4},{t:2,A:5,B:6}]`
fn scenario_dataset() -> Dataset {
    Dataset::new(
        vec!["t".into(), "A".into(), "B".into()],
        vec![
            vec![num(0.0), num(1.0), num(2.0)],
            vec![num(1.0), num(3.0), num(4.0)],
            vec![num(2.0), num(5.0), num(6.0)],
        ],
    )
}

fn trendlines() -> Dataset {
    Dataset::new(
        ["time", "Run A Titer", "Run B Titer", "Run A pH"]
            .into_iter()
            .map(String::from)
            .collect(),
        (0..5)
            .map(|t| {
                let t = t as f64;
                vec![num(t), num(t * 1.5), num(t * 2.5), num(7.0 - 0.1 * t)]
            })
            .collect(),
    )
}

fn write_default(dir: &tempfile::TempDir, name: &str, dataset: &Dataset) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, write_workbook(dataset, "Sheet1").expect("write workbook"))
        .expect("write default source");
    path
}

#[test]
fn selecting_points_highlights_exactly_those_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_measurements.xlsx", &scenario_dataset());
    let mut session = SelectionSession::new(&SelectionConfig { default_source });

    let view = session.load(None);
    assert_eq!(view.export_control, ExportControl::Visible);
    assert_eq!(view.plot.series.len(), 2);
    assert_eq!(view.table.data.len(), 3);

    let event = SelectionEvent {
        points: vec![
            PointRef { point_index: 0, curve_number: 0 },
            PointRef { point_index: 2, curve_number: 0 },
        ],
    };
    let highlights = session.select(Some(&event));
    let rows: Vec<_> = highlights.iter().map(HighlightDirective::row).collect();
    assert_eq!(rows, vec![0, 2]);
    assert_eq!(session.selected_rows().as_slice(), &[0, 2]);
}

#[test]
fn no_upload_and_no_default_is_invalid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = dir.path().join("sample_measurements.xlsx");

    assert_eq!(load_table(None, &default_source).expect("empty dataset").len(), 0);

    let mut session = SelectionSession::new(&SelectionConfig { default_source });
    let view = session.load(None);
    assert!(view.plot.is_placeholder());
    assert_eq!(
        serde_json::to_value(view.export_control).unwrap(),
        serde_json::json!({"display": "none"})
    );
}

#[test]
fn exported_selection_reloads_row_equal() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut session = SelectionSession::new(&SelectionConfig {
        default_source: dir.path().join("missing.xlsx"),
    });
    let bytes = write_workbook(&scenario_dataset(), "Sheet1").expect("write workbook");
    session.load(Some(&Upload::new("measurements.xlsx", bytes)));
    session.select(Some(&SelectionEvent::from_indices([2, 1])));

    let file = session.export().expect("selection exported");
    assert_eq!(file.filename, EXPORT_FILENAME);
    assert_eq!(file.sheet_name, EXPORT_SHEET_NAME);

    let path = dir.path().join(file.filename);
    std::fs::write(&path, &file.bytes).expect("write export");
    let reloaded = load_table(Some(&Upload::from_path(&path).expect("read export")), &path)
        .expect("reload export");

    let subset = session.selected_subset().expect("subset");
    assert_eq!(reloaded.column_names(), subset.column_names());
    assert_eq!(reloaded.rows(), subset.rows());
    assert_eq!(reloaded.rows()[0], scenario_dataset().rows()[1]);
}

#[test]
fn export_without_selection_produces_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_measurements.xlsx", &scenario_dataset());
    let mut session = SelectionSession::new(&SelectionConfig { default_source });
    session.load(None);
    assert!(session.export().is_none());
}

#[test]
fn titer_reshape_doubles_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_trendlines.xlsx", &trendlines());
    let session = RangesSession::new(&RangesConfig {
        default_source,
        ..RangesConfig::default()
    });

    assert_eq!(session.measurement_options(), &["Titer".to_string(), "pH".to_string()]);

    let view = session.update(Some("Titer"), None);
    assert_eq!(
        view.message,
        RangesMessage::Columns(vec!["Run A Titer".into(), "Run B Titer".into()])
    );
    assert_eq!(view.table.data.len(), 2 * trendlines().len());
    assert_eq!(view.plot.title.as_deref(), Some("Titer Trends"));
}

#[test]
fn nonexistent_measurement_is_no_match() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_trendlines.xlsx", &trendlines());
    let session = RangesSession::new(&RangesConfig {
        default_source,
        ..RangesConfig::default()
    });

    let view = session.update(Some("Nonexistent"), None);
    assert_eq!(view.message, RangesMessage::NoMatch);
    assert!(view.plot.series.is_empty());
    assert!(view.table.data.is_empty());
}

#[test]
fn uploaded_dataset_keeps_default_vocabulary() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_trendlines.xlsx", &trendlines());
    let mut session = RangesSession::new(&RangesConfig {
        default_source,
        ..RangesConfig::default()
    });

    let one_off = Dataset::new(
        vec!["time".into(), "Run Z pH".into()],
        vec![vec![num(0.0), num(7.1)]],
    );
    let bytes = write_workbook(&one_off, "Sheet1").expect("write workbook");
    session.load(Some(&Upload::new("one_off.xlsx", bytes)));

    assert_eq!(session.measurement_options().len(), 2);
    assert_eq!(session.update(Some("Titer"), None).message, RangesMessage::NoMatch);
    assert_eq!(
        session.update(Some("pH"), None).message,
        RangesMessage::Columns(vec!["Run Z pH".into()])
    );
}

#[test]
fn standard_deviation_overlay_is_flagged() {
    let dir = tempfile::tempdir().expect("tempdir");
    let default_source = write_default(&dir, "sample_trendlines.xlsx", &trendlines());
    let session = RangesSession::new(&RangesConfig {
        default_source,
        ..RangesConfig::default()
    });

    assert_eq!(session.range_options(), vec!["Standard Deviation"]);
    let view = session.update(Some("Titer"), Some("Standard Deviation"));
    let overlay = view.plot.series.last().expect("overlay");
    assert_eq!(overlay.label, "Historical Range: Standard Deviation");
    assert_eq!(overlay.mode, TraceMode::Lines);
    assert!(overlay.placeholder);

    let unknown = session.update(Some("Titer"), Some("Percentile"));
    assert!(unknown.plot.series.iter().all(|s| !s.placeholder));
}
