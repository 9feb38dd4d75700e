use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::data::model::Dataset;

// ---------------------------------------------------------------------------
// Selection event – delivered by the rendering layer
// ---------------------------------------------------------------------------

/// One plotted point inside the dragged region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PointRef {
    /// Position of the point within its series.
    pub point_index: usize,
    /// Series the point belongs to.
    #[serde(default)]
    pub curve_number: usize,
}

/// The points bounded by one drag-selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SelectionEvent {
    #[serde(default)]
    pub points: Vec<PointRef>,
}

impl SelectionEvent {
    /// Points on series 0 at the given indices.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            points: indices
                .into_iter()
                .map(|point_index| PointRef {
                    point_index,
                    curve_number: 0,
                })
                .collect(),
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Row index set
// ---------------------------------------------------------------------------

/// Strictly ascending, duplicate-free row ordinals of the current dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RowIndexSet(Vec<usize>);

impl RowIndexSet {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, row: usize) -> bool {
        self.0.binary_search(&row).is_ok()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }
}

impl FromIterator<usize> for RowIndexSet {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        RowIndexSet(iter.into_iter().collect::<BTreeSet<_>>().into_iter().collect())
    }
}

/// Map a selection to dataset row ordinals.
///
/// Every series is plotted against the shared first column with one point
/// per row, so a point index is the row ordinal whatever series it came
/// from. Indices outside `[0, row_count)` are dropped. No event or no
/// dataset yields an empty set.
pub fn map_selection(event: Option<&SelectionEvent>, dataset: Option<&Dataset>) -> RowIndexSet {
    let (Some(event), Some(dataset)) = (event, dataset) else {
        return RowIndexSet::default();
    };

    let row_count = dataset.len();
    let rows: RowIndexSet = event
        .points
        .iter()
        .filter_map(|p| {
            if p.point_index < row_count {
                Some(p.point_index)
            } else {
                log::warn!(
                    "Dropping point {} on series {}: dataset has {row_count} rows",
                    p.point_index,
                    p.curve_number
                );
                None
            }
        })
        .collect();

    log::debug!("{} selected point(s) map to {} row(s)", event.points.len(), rows.len());
    rows
}

// ---------------------------------------------------------------------------
// Highlight projection
// ---------------------------------------------------------------------------

/// Style applied to every highlighted table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightStyle {
    pub background_color: &'static str,
    pub font_weight: &'static str,
}

pub const HIGHLIGHT_STYLE: HighlightStyle = HighlightStyle {
    background_color: "#D2F3FF",
    font_weight: "bold",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCondition {
    pub row_index: usize,
}

/// Conditional style for one table row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HighlightDirective {
    #[serde(rename = "if")]
    pub condition: RowCondition,
    #[serde(flatten)]
    pub style: HighlightStyle,
}

impl HighlightDirective {
    pub fn row(&self) -> usize {
        self.condition.row_index
    }
}

/// One directive per selected row, in ascending row order. Rows outside the
/// set get nothing.
pub fn project_highlights(rows: &RowIndexSet) -> Vec<HighlightDirective> {
    rows.iter()
        .map(|row_index| HighlightDirective {
            condition: RowCondition { row_index },
            style: HIGHLIGHT_STYLE,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::CellValue;

    fn scenario_dataset() -> Dataset {
        Dataset::new(
            vec!["t".into(), "A".into(), "B".into()],
            (0..3)
                .map(|i| {
                    let i = i as f64;
                    vec![
                        CellValue::Number(i),
                        CellValue::Number(2.0 * i + 1.0),
                        CellValue::Number(2.0 * i + 2.0),
                    ]
                })
                .collect(),
        )
    }

    #[test]
    fn picks_rows_on_series_a() {
        let ds = scenario_dataset();
        let rows = map_selection(Some(&SelectionEvent::from_indices([0, 2])), Some(&ds));
        assert_eq!(rows.as_slice(), &[0, 2]);

        let highlights = project_highlights(&rows);
        let marked: Vec<_> = highlights.iter().map(HighlightDirective::row).collect();
        assert_eq!(marked, vec![0, 2]);
    }

    #[test]
    fn sorts_and_dedupes_across_series() {
        let ds = scenario_dataset();
        let event = SelectionEvent {
            points: vec![
                PointRef { point_index: 2, curve_number: 1 },
                PointRef { point_index: 0, curve_number: 0 },
                PointRef { point_index: 2, curve_number: 0 },
                PointRef { point_index: 1, curve_number: 1 },
            ],
        };
        let rows = map_selection(Some(&event), Some(&ds));
        assert_eq!(rows.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn drops_out_of_range_points() {
        let ds = scenario_dataset();
        let rows = map_selection(Some(&SelectionEvent::from_indices([1, 3, 99])), Some(&ds));
        assert_eq!(rows.as_slice(), &[1]);
    }

    #[test]
    fn empty_or_absent_inputs_give_empty_set() {
        let ds = scenario_dataset();
        assert!(map_selection(None, Some(&ds)).is_empty());
        assert!(map_selection(Some(&SelectionEvent::default()), Some(&ds)).is_empty());
        assert!(map_selection(Some(&SelectionEvent::from_indices([0])), None).is_empty());
    }

    #[test]
    fn parses_rendering_layer_json() {
        let event = SelectionEvent::from_json(
            r#"{"points":[{"curveNumber":1,"pointNumber":2,"pointIndex":2,"x":2,"y":6}]}"#,
        )
        .unwrap();
        assert_eq!(
            event.points,
            vec![PointRef { point_index: 2, curve_number: 1 }]
        );
    }

    #[test]
    fn highlights_are_recomputed_not_merged() {
        let a: RowIndexSet = [0, 1, 2].into_iter().collect();
        let b: RowIndexSet = [2, 5].into_iter().collect();

        assert_eq!(project_highlights(&a), project_highlights(&a));

        let after_b = project_highlights(&b);
        assert!(after_b.iter().all(|d| b.contains(d.row())));
        assert_eq!(after_b.len(), 2);
    }

    #[test]
    fn directive_serialises_as_conditional_style() {
        let rows: RowIndexSet = [4].into_iter().collect();
        let json = serde_json::to_value(project_highlights(&rows)).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "if": {"row_index": 4},
                "backgroundColor": "#D2F3FF",
                "fontWeight": "bold"
            }])
        );
    }
}
