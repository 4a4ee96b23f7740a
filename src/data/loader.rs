use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};

use super::model::{CellValue, InputFile, NumericColumn, Sheet, TabularFormat, TabularGrid, Workbook};
use crate::error::{InputKind, ReportError, ReportResult};

/// Zero-based column holding the temperature in a logger export.
pub const DEFAULT_TEMPERATURE_COLUMN: usize = 3;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Parse an uploaded file into a [`Workbook`]. Dispatch by extension.
///
/// Supported formats:
/// * `.csv` – one sheet named `Sheet1`, no header handling
/// * anything else – sniffed by calamine (xlsx, xlsm, xlsb, xls, ods)
pub fn read_workbook(file: &InputFile, kind: InputKind) -> ReportResult<Workbook> {
    let workbook = match file.format() {
        TabularFormat::Csv => read_csv(&file.bytes, kind)?,
        TabularFormat::Spreadsheet => read_spreadsheet(&file.bytes, kind)?,
    };
    log::debug!(
        "Parsed {kind} '{}' with {} sheet(s)",
        file.name,
        workbook.sheets.len()
    );
    Ok(workbook)
}

/// Parse the first sheet of `file` and coerce column `column_index`.
///
/// Cells that are missing or not numeric become absent entries; only an
/// unreadable file is an error.
pub fn extract_column(file: &InputFile, column_index: usize) -> ReportResult<NumericColumn> {
    let workbook = read_workbook(file, InputKind::TemperatureLog)?;
    let grid = first_sheet_rows(&workbook, InputKind::TemperatureLog)?;
    Ok(column_from_grid(grid, column_index))
}

/// The rows of the first sheet, or a parse failure if there is none.
pub fn first_sheet_rows(workbook: &Workbook, kind: InputKind) -> ReportResult<&TabularGrid> {
    workbook
        .first_sheet()
        .map(|sheet| &sheet.rows)
        .ok_or_else(|| ReportError::parse(kind, "file contains no sheets"))
}

/// Coerce one column of an already parsed grid.
pub fn column_from_grid(grid: &TabularGrid, column_index: usize) -> NumericColumn {
    let column = NumericColumn::from_grid(grid, column_index);
    if !grid.is_empty() && grid.iter().all(|row| row.len() <= column_index) {
        log::warn!(
            "No row reaches column {}; every reading will be absent",
            column_index + 1
        );
    }
    log::info!(
        "Extracted {} rows from column {} ({} numeric)",
        column.len(),
        column_index + 1,
        column.present_count()
    );
    column
}

// ---------------------------------------------------------------------------
// Workbook loader
// ---------------------------------------------------------------------------

fn read_spreadsheet(bytes: &[u8], kind: InputKind) -> ReportResult<Workbook> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ReportError::parse(kind, e))?;

    let sheet_names = workbook.sheet_names();
    if sheet_names.is_empty() {
        return Err(ReportError::parse(kind, "file contains no sheets"));
    }

    let mut sheets = Vec::with_capacity(sheet_names.len());
    for name in sheet_names {
        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| ReportError::parse(kind, format!("sheet '{name}': {e}")))?;
        let mut rows = range_to_grid(&range);
        // xls and ods readers may not expose formulas; the values still stand.
        if let Ok(formulas) = workbook.worksheet_formula(&name) {
            let count = overlay_formulas(&mut rows, &formulas);
            if count > 0 {
                log::debug!("Sheet '{name}': kept {count} formula(s)");
            }
        }
        sheets.push(Sheet { rows, name });
    }

    Ok(Workbook { sheets })
}

/// Lay a calamine range out at its absolute position.
///
/// A used range starting at, say, `B3` yields two empty leading rows and
/// one empty leading cell per row, so grid indices match sheet rows.
fn range_to_grid(range: &Range<Data>) -> TabularGrid {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut grid: TabularGrid = vec![Vec::new(); start_row];
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(data_to_cell));
        // Trailing blanks come from the used range, not from this row.
        while cells.last().is_some_and(CellValue::is_empty) {
            cells.pop();
        }
        grid.push(cells);
    }
    grid
}

/// Wrap every formula cell's cached value in [`CellValue::Formula`].
fn overlay_formulas(grid: &mut TabularGrid, formulas: &Range<String>) -> usize {
    let Some((start_row, start_col)) = formulas.start() else {
        return 0;
    };

    let mut count = 0;
    for (r, c, formula) in formulas.used_cells() {
        let formula = formula.trim_start_matches('=');
        if formula.is_empty() {
            continue;
        }
        let (row, col) = (start_row as usize + r, start_col as usize + c);
        if grid.len() <= row {
            grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        let cached = std::mem::replace(&mut cells[col], CellValue::Empty);
        cells[col] = CellValue::Formula {
            formula: formula.to_string(),
            cached: Box::new(cached),
        };
        count += 1;
    }
    count
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Float(*f),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Error(e.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: no header row, ragged rows allowed. Blank lines stay in the
/// grid as empty rows so row `i` is always line `i + 1`.
fn read_csv(bytes: &[u8], kind: InputKind) -> ReportResult<Workbook> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut rows: TabularGrid = Vec::new();
    for result in reader.records() {
        let record =
            result.map_err(|e| ReportError::parse(kind, format!("CSV row {}: {e}", rows.len() + 1)))?;
        // The recorded position is taken before the reader skips blank lines.
        if let Some(position) = record.position() {
            let start = usize::try_from(position.byte()).unwrap_or(bytes.len());
            rows.extend((0..blank_lines_at(bytes, start)).map(|_| Vec::new()));
        }
        rows.push(record.iter().map(|field| guess_cell_type(field, kind)).collect());
    }

    Ok(Workbook {
        sheets: vec![Sheet {
            name: "Sheet1".to_string(),
            rows,
        }],
    })
}

/// Count the empty lines starting at `start`. `\r\n`, `\n` and `\r` each end
/// one line.
fn blank_lines_at(bytes: &[u8], start: usize) -> usize {
    let mut i = start;
    // The `\n` of a CRLF may still belong to the previous record.
    if i > 0 && bytes.get(i - 1) == Some(&b'\r') && bytes.get(i) == Some(&b'\n') {
        i += 1;
    }

    let mut lines = 0;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\n' => lines += 1,
            b'\r' if bytes.get(i + 1) != Some(&b'\n') => lines += 1,
            b'\r' => {}
            _ => break,
        }
        i += 1;
    }
    lines
}

/// Empty fields become [`CellValue::Empty`] and numbers become numbers.
///
/// A log takes any parseable number. A template only converts text that
/// reads back identically, so `007` or `1e3` stays text when re-encoded.
fn guess_cell_type(s: &str, kind: InputKind) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    let exact = |rendered: String| kind == InputKind::TemperatureLog || rendered == trimmed;

    if let Ok(i) = trimmed.parse::<i64>() {
        if exact(i.to_string()) {
            return CellValue::Integer(i);
        }
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && exact(f.to_string()) => CellValue::Float(f),
        _ => CellValue::Text(s.to_string()),
    }
}
