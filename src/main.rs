mod app;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

#[derive(Parser, Debug)]
#[command(author, version, about = "Plot, select and export spreadsheet rows", long_about = None)]
pub struct Cli {
    /// JSON config file; built-in defaults when omitted.
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Load a sheet and print the plot, table and export-control view.
    Plot {
        /// Spreadsheet to load instead of the default source.
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
    },
    /// Apply a selection, print the highlights and optionally export it.
    Select {
        #[arg(value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Selected point indices, comma separated.
        #[arg(long, value_delimiter = ',', conflicts_with = "selection")]
        points: Vec<usize>,
        /// Selection event JSON as produced by the plot.
        #[arg(long, value_hint = ValueHint::FilePath)]
        selection: Option<PathBuf>,
        /// Directory to write the exported workbook into.
        #[arg(long, value_hint = ValueHint::DirPath)]
        export: Option<PathBuf>,
    },
    /// List the measurement and historical-range options.
    Vocabulary,
    /// Filter by measurement and print the trend view.
    Ranges {
        #[arg(long)]
        measurement: Option<String>,
        /// Historical range calculation, e.g. "Standard Deviation".
        #[arg(long)]
        range: Option<String>,
        #[arg(long, value_hint = ValueHint::FilePath)]
        file: Option<PathBuf>,
        /// Print the long-form table as CSV instead of the JSON view.
        #[arg(long)]
        csv: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    app::run(Cli::parse())
}
