use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use sheet_select::config::AppConfig;
use sheet_select::data::loader::Upload;
use sheet_select::selection::SelectionEvent;
use sheet_select::state::{RangesSession, SelectionSession};
use sheet_select::view::table::TableView;

use crate::{Cli, Command};

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

pub fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref()).context("loading config")?;

    match cli.command {
        Command::Plot { file } => {
            let upload = read_upload(file.as_deref())?;
            let mut session = SelectionSession::new(&config.selection);
            print_json(&session.load(upload.as_ref()))
        }
        Command::Select {
            file,
            points,
            selection,
            export,
        } => {
            let upload = read_upload(file.as_deref())?;
            let event = match selection {
                Some(path) => {
                    let text = std::fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    Some(SelectionEvent::from_json(&text).context("parsing selection event")?)
                }
                None if points.is_empty() => None,
                None => Some(SelectionEvent::from_indices(points)),
            };

            let mut session = SelectionSession::new(&config.selection);
            session.load(upload.as_ref());
            let highlights = session.select(event.as_ref());

            if let Some(dir) = export {
                match session.export() {
                    Some(file) => {
                        let path = dir.join(file.filename);
                        std::fs::write(&path, &file.bytes)
                            .with_context(|| format!("writing {}", path.display()))?;
                        log::info!("Wrote {}", path.display());
                    }
                    None => log::warn!("Nothing selected, no file written"),
                }
            }
            print_json(&highlights)
        }
        Command::Vocabulary => {
            let session = RangesSession::new(&config.ranges);
            print_json(&serde_json::json!({
                "measurements": session.measurement_options(),
                "historical_ranges": session.range_options(),
            }))
        }
        Command::Ranges {
            measurement,
            range,
            file,
            csv,
        } => {
            let mut session = RangesSession::new(&config.ranges);
            if let Some(upload) = read_upload(file.as_deref())? {
                session.load(Some(&upload));
            }
            let view = session.update(measurement.as_deref(), range.as_deref());
            if csv {
                log::info!("{}", view.message.text());
                write_table_csv(&view.table, io::stdout().lock())
            } else {
                print_json(&view)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_upload(path: Option<&Path>) -> Result<Option<Upload>> {
    path.map(|p| Upload::from_path(p).with_context(|| format!("reading {}", p.display())))
        .transpose()
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut out = io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value).context("serialising output")?;
    writeln!(out)?;
    Ok(())
}

/// Write a table view as CSV: header from the column list, then each
/// record's cells in column order.
fn write_table_csv<W: Write>(table: &TableView, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for record in &table.data {
        writer.write_record(
            table
                .columns
                .iter()
                .map(|c| record.get(&c.id).map(|v| v.to_string()).unwrap_or_default()),
        )?;
    }
    writer.flush()?;
    Ok(())
}
