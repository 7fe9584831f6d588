//! Unit tables (CSV, Excel) for batch formatting.
//!
//! The first row is the header. One column names the unit, another holds the
//! colindancias block (multi-line cells are fine).

use anyhow::{Context, Result};
use calamine::{open_workbook_from_rs, Data, Reader, Xlsb, Xlsx};
use std::io::Cursor;

const UNIT_HEADERS: &[&str] = &["unidad", "unit", "unit_name", "nombre", "nombre_unidad"];
const COLINDANCIAS_HEADERS: &[&str] = &[
    "colindancias",
    "linderos",
    "boundaries",
    "medidas_y_colindancias",
];

/// One row of a unit table.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitRow {
    /// 1-indexed data row (the header is row 0).
    pub row: usize,
    pub unit_name: String,
    pub colindancias: String,
}

/// Dispatch file parsing by extension.
pub fn parse_file(filename: &str, data: &[u8]) -> Result<Vec<UnitRow>> {
    let ext = filename
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();

    let rows = match ext.as_str() {
        "csv" => read_csv(data)?,
        "xlsx" | "xlsm" => {
            let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))
                .context("Failed to open Excel workbook")?;
            read_first_sheet(&mut workbook)?
        }
        "xlsb" => {
            let mut workbook: Xlsb<_> = open_workbook_from_rs(Cursor::new(data))
                .context("Failed to open Excel workbook")?;
            read_first_sheet(&mut workbook)?
        }
        _ => anyhow::bail!(
            "Unsupported file type: .{}. Supported: .csv, .xlsx, .xlsm, .xlsb",
            ext
        ),
    };

    let units = rows_to_units(rows)?;
    tracing::info!("Read {} unit(s) from {}", units.len(), filename);
    Ok(units)
}

fn read_csv(data: &[u8]) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(false)
        .from_reader(data);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Failed to read CSV record")?;
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok(rows)
}

/// Read the first worksheet that has any data.
fn read_first_sheet<RS, R>(workbook: &mut R) -> Result<Vec<Vec<String>>>
where
    RS: std::io::Read + std::io::Seek,
    R: Reader<RS>,
{
    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();

    for name in &sheet_names {
        let range = match workbook.worksheet_range(name) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping sheet '{}': {:?}", name, e);
                continue;
            }
        };

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect())
            .collect();
        if !rows.is_empty() {
            return Ok(rows);
        }
    }

    anyhow::bail!("No sheets with data found in workbook")
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
        Data::Error(e) => format!("#ERR:{:?}", e),
    }
}

/// Locate the unit and colindancias columns and collect the data rows.
fn rows_to_units(rows: Vec<Vec<String>>) -> Result<Vec<UnitRow>> {
    let mut iter = rows.into_iter();
    let headers = iter.next().context("Table has no header row")?;

    let unit_col = find_column(&headers, UNIT_HEADERS).with_context(|| {
        format!("No unit column found (expected one of {:?}) in {:?}", UNIT_HEADERS, headers)
    })?;
    let text_col = find_column(&headers, COLINDANCIAS_HEADERS).with_context(|| {
        format!(
            "No colindancias column found (expected one of {:?}) in {:?}",
            COLINDANCIAS_HEADERS, headers
        )
    })?;

    let units = iter
        .enumerate()
        .filter_map(|(idx, row)| {
            let unit_name = row.get(unit_col).map(|s| s.trim()).unwrap_or("");
            if unit_name.is_empty() {
                return None;
            }
            Some(UnitRow {
                row: idx + 1,
                unit_name: unit_name.to_string(),
                colindancias: row.get(text_col).cloned().unwrap_or_default(),
            })
        })
        .collect();

    Ok(units)
}

fn find_column(headers: &[String], candidates: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| candidates.contains(&fold_header(h).as_str()))
}

/// Lowercase, strip Spanish accents, join words with `_`.
fn fold_header(header: &str) -> String {
    header
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' => 'a',
            'é' => 'e',
            'í' => 'i',
            'ó' => 'o',
            'ú' | 'ü' => 'u',
            _ => c,
        })
        .collect()
}
