//! Reads xlsx/xls/csv files into the loose row maps the normalizer takes.
//!
//! The first sheet's first row is the header; every following row becomes
//! a header -> cell map in column order. Blank rows are kept, so the row
//! numbers the normalizer reports match the spreadsheet lines; the
//! normalizer itself skips them silently.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Reader as _};
use serde_json::{Map, Number, Value};

fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Float(f) => Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Int(i) => Value::Number((*i).into()),
        Data::Bool(b) => Value::Bool(*b),
        // Dates, durations and cell errors only ever feed the lenient
        // numeric parser, so their display form is all we need.
        other => Value::String(other.to_string()),
    }
}

fn rows_from_grid<I>(mut grid: I) -> Vec<Map<String, Value>>
where
    I: Iterator<Item = Vec<(String, Value)>>,
{
    let headers: Vec<String> = match grid.next() {
        Some(first) => first
            .into_iter()
            .enumerate()
            .map(|(i, (header, _))| {
                if header.trim().is_empty() {
                    format!("Coluna {}", i + 1)
                } else {
                    header
                }
            })
            .collect(),
        None => return Vec::new(),
    };

    let mut rows = Vec::new();
    for cells in grid {
        let mut row = Map::new();
        for (index, (_, value)) in cells.into_iter().enumerate() {
            if index >= headers.len() {
                break;
            }
            row.insert(headers[index].clone(), value);
        }
        rows.push(row);
    }
    rows
}

/// Reads the first sheet of an Excel workbook into row maps.
pub fn read_workbook_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Map<String, Value>>> {
    let path = path.as_ref();
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("Failed to open workbook: {}", path.display()))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .with_context(|| format!("Workbook has no sheets: {}", path.display()))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Failed to read sheet \"{sheet_name}\""))?;

    let grid = range.rows().map(|cells| {
        cells
            .iter()
            .map(|cell| {
                let value = cell_to_value(cell);
                let header = match &value {
                    Value::String(s) => s.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                (header, value)
            })
            .collect::<Vec<_>>()
    });
    Ok(rows_from_grid(grid))
}

/// Reads a spreadsheet file into row maps, picking the reader by
/// extension: ".csv" goes through the CSV reader, everything else is
/// treated as an Excel workbook.
pub fn read_spreadsheet_rows<P: AsRef<Path>>(path: P) -> Result<Vec<Map<String, Value>>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open spreadsheet: {}", path.display()))?;
        read_csv_rows(file)
    } else {
        read_workbook_rows(path)
    }
}

/// Reads CSV data into row maps. Cells stay strings; the normalizer's
/// locale-aware parser handles the numeric ones.
pub fn read_csv_rows<R: Read>(reader: R) -> Result<Vec<Map<String, Value>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut grid = Vec::new();
    for record in rdr.records() {
        let record = record.context("Failed to read CSV record")?;
        grid.push(
            record
                .iter()
                .map(|field| (field.to_string(), Value::String(field.to_string())))
                .collect::<Vec<_>>(),
        );
    }
    Ok(rows_from_grid(grid.into_iter()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_rows_map_headers_to_cells() {
        let csv = "Credor,Valor total,Parcelas\nItau,\"1.055,80\",5\nSantander,200,2\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["Credor"], Value::String("Itau".to_string()));
        assert_eq!(rows[0]["Valor total"], Value::String("1.055,80".to_string()));
        assert_eq!(rows[1]["Parcelas"], Value::String("2".to_string()));
    }

    #[test]
    fn blank_rows_are_kept_so_line_numbers_stay_true() {
        let csv = "Credor,Valor total\nItau,100\n,\nSantander,200\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["Credor"], Value::String(String::new()));
        assert_eq!(rows[2]["Credor"], Value::String("Santander".to_string()));
    }

    #[test]
    fn extension_dispatch_reads_csv_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dividas.CSV");
        std::fs::write(&path, "Credor,Valor total,Parcelas\nItau,100,2\n").unwrap();
        let rows = read_spreadsheet_rows(&path).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Credor"], Value::String("Itau".to_string()));
    }

    #[test]
    fn unnamed_columns_get_placeholder_headers() {
        let csv = "Credor,,Parcelas\nItau,x,5\n";
        let rows = read_csv_rows(csv.as_bytes()).unwrap();
        assert_eq!(rows[0]["Coluna 2"], Value::String("x".to_string()));
    }

    #[test]
    fn empty_input_yields_no_rows() {
        let rows = read_csv_rows("".as_bytes()).unwrap();
        assert!(rows.is_empty());
    }
}
