use std::io::Cursor;

use crate::data::model::{CellValue, Dataset};

/// Sheet holding the exported rows.
pub const EXPORT_SHEET_NAME: &str = "Selected Data";
/// Filename offered for the download.
pub const EXPORT_FILENAME: &str = "selected_data.xlsx";

#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("cannot create sheet {name:?}: {reason}")]
    Sheet { name: String, reason: String },
    #[error("cannot write workbook: {0}")]
    Write(String),
}

/// A finished spreadsheet ready to hand to the download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: &'static str,
    pub sheet_name: &'static str,
    pub bytes: Vec<u8>,
}

/// Serialise the selected subset. Nothing selected means no file.
pub fn export_selection(subset: Option<&Dataset>) -> Result<Option<ExportFile>, ExportError> {
    let Some(subset) = subset.filter(|s| !s.is_empty()) else {
        log::debug!("Export requested with nothing selected");
        return Ok(None);
    };

    let bytes = write_workbook(subset, EXPORT_SHEET_NAME)?;
    log::info!(
        "Exported {} row(s) to {EXPORT_FILENAME} ({} bytes)",
        subset.len(),
        bytes.len()
    );
    Ok(Some(ExportFile {
        filename: EXPORT_FILENAME,
        sheet_name: EXPORT_SHEET_NAME,
        bytes,
    }))
}

/// Write `dataset` as a single-sheet xlsx workbook: header row first, then
/// every row in order. Nulls are left as blank cells.
pub fn write_workbook(dataset: &Dataset, sheet_name: &str) -> Result<Vec<u8>, ExportError> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();
    let sheet = book
        .new_sheet(sheet_name)
        .map_err(|reason| ExportError::Sheet {
            name: sheet_name.to_string(),
            reason: reason.to_string(),
        })?;

    for (col, name) in dataset.schema().names().enumerate() {
        sheet
            .get_cell_mut((col as u32 + 1, 1u32))
            .set_value_string(name);
    }

    for (row_idx, row) in dataset.rows().iter().enumerate() {
        let excel_row = row_idx as u32 + 2;
        for (col, cell) in row.iter().enumerate() {
            let coord = (col as u32 + 1, excel_row);
            match cell {
                CellValue::Number(v) => {
                    sheet.get_cell_mut(coord).set_value_number(*v);
                }
                CellValue::Text(s) => {
                    sheet.get_cell_mut(coord).set_value_string(s.as_str());
                }
                CellValue::Bool(b) => {
                    sheet.get_cell_mut(coord).set_value_bool(*b);
                }
                CellValue::Null => {}
            }
        }
    }

    let mut out = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut out)
        .map_err(|e| ExportError::Write(e.to_string()))?;
    Ok(out.into_inner())
}
