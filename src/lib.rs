//! Selection-to-data engine for spreadsheet scatter plots.
//!
//! A sheet is loaded into a [`data::model::Dataset`], plotted with every
//! column against the first, and a drag-selection on that plot is mapped
//! back to row ordinals, table highlights and an xlsx export. A second
//! pipeline melts replicate columns of one measurement into long form for
//! trend plotting.

pub mod color;
pub mod config;
pub mod data;
pub mod export;
pub mod selection;
pub mod state;
pub mod view;
