//! Spreadsheet import for debt records.
//!
//! Takes arbitrary tabular data (xlsx, xls, csv, or pre-extracted row
//! maps), resolves columns by fuzzy header matching, validates row by
//! row, and produces debts ready to upsert. Invalid rows are collected
//! as messages instead of aborting the batch; the batch as a whole only
//! fails when no row at all validates.

pub mod columns;
pub mod reader;
pub mod rows;

pub use columns::{resolve, Column};
pub use reader::{read_csv_rows, read_spreadsheet_rows, read_workbook_rows};
pub use rows::{parse_import_rows, ImportOutcome};
