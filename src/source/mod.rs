//! Upstream providers of raw records.

pub mod gbif;
pub mod spreadsheet;

pub use gbif::{fetch_occurrences, OccurrenceQuery};
pub use spreadsheet::read_rows;
