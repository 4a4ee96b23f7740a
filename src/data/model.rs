use std::path::Path;

use crate::error::ReportResult;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, covering what workbooks and CSV
/// files can hold.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Excel date serial (days since 1899-12-30).
    DateTime(f64),
    /// Error cell such as `#DIV/0!`, kept as its display text.
    Error(String),
    /// A formula (without the leading `=`) and the value last cached for it.
    Formula { formula: String, cached: Box<CellValue> },
    Empty,
}

impl CellValue {
    /// Coerce the cell to a temperature reading.
    ///
    /// Numbers pass through; text is trimmed and parsed with `.` as the
    /// decimal separator. Anything else, or a non-finite result, is `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Float(v) => *v,
            CellValue::Integer(i) => *i as f64,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Formula { cached, .. } => return cached.as_f64(),
            _ => return None,
        };
        value.is_finite().then_some(value)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

// ---------------------------------------------------------------------------
// TabularGrid / Sheet / Workbook
// ---------------------------------------------------------------------------

/// Rows of cells, 0-indexed. Rows may have different lengths.
pub type TabularGrid = Vec<Vec<CellValue>>;

/// One named sheet of a workbook.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub rows: TabularGrid,
}

/// All sheets of a parsed file, in their original order.
#[derive(Debug, Clone, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn first_sheet(&self) -> Option<&Sheet> {
        self.sheets.first()
    }

    pub fn first_sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.first_mut()
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – one coerced column of a grid
// ---------------------------------------------------------------------------

/// One entry per source row; `None` marks a missing or non-numeric cell.
///
/// Absent entries are never coerced to `0.0`: zero is a valid temperature.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NumericColumn {
    values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    /// Read column `index` of every row. Short rows yield `None`.
    pub fn from_grid(grid: &TabularGrid, index: usize) -> Self {
        let values = grid
            .iter()
            .map(|row| row.get(index).and_then(CellValue::as_f64))
            .collect();
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Iterate over `(row_index, value)` for present entries only.
    pub fn present(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    pub fn present_count(&self) -> usize {
        self.present().count()
    }
}

// ---------------------------------------------------------------------------
// Uploaded files
// ---------------------------------------------------------------------------

/// How the bytes of an uploaded file are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabularFormat {
    /// Any workbook calamine can open (xlsx, xlsm, xlsb, xls, ods).
    Spreadsheet,
    Csv,
}

impl TabularFormat {
    /// Dispatch by extension; unknown extensions are sniffed as workbooks.
    pub fn from_file_name(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "csv" => TabularFormat::Csv,
            _ => TabularFormat::Spreadsheet,
        }
    }
}

/// A file supplied by the operator, fully read into memory.
#[derive(Debug, Clone)]
pub struct InputFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a file from disk, keeping only its file name.
    pub fn read(path: &Path) -> ReportResult<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    pub fn format(&self) -> TabularFormat {
        TabularFormat::from_file_name(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_cells_are_trimmed_before_parsing() {
        assert_eq!(CellValue::from("  21.5 ").as_f64(), Some(21.5));
        assert_eq!(CellValue::from("-3").as_f64(), Some(-3.0));
    }

    #[test]
    fn non_numeric_cells_are_absent() {
        assert_eq!(CellValue::from("abc").as_f64(), None);
        assert_eq!(CellValue::from("").as_f64(), None);
        assert_eq!(CellValue::from("NaN").as_f64(), None);
        assert_eq!(CellValue::from("inf").as_f64(), None);
        assert_eq!(CellValue::Bool(true).as_f64(), None);
        assert_eq!(CellValue::Empty.as_f64(), None);
    }

    #[test]
    fn formula_cells_read_their_cached_value() {
        let cell = CellValue::Formula {
            formula: "A1*2".into(),
            cached: Box::new(CellValue::Float(42.0)),
        };
        assert_eq!(cell.as_f64(), Some(42.0));
        assert!(!cell.is_empty());
    }

    #[test]
    fn zero_is_a_present_value() {
        let grid: TabularGrid = vec![vec![CellValue::Float(0.0)], vec![CellValue::Empty]];
        let col = NumericColumn::from_grid(&grid, 0);
        assert_eq!(col.values(), &[Some(0.0), None]);
    }

    #[test]
    fn from_grid_keeps_one_entry_per_row() {
        let grid: TabularGrid = vec![
            vec![CellValue::from("t"), CellValue::from("temp")],
            vec![],
            vec![CellValue::Integer(1), CellValue::Float(20.5)],
        ];
        let col = NumericColumn::from_grid(&grid, 1);
        assert_eq!(col.len(), 3);
        assert_eq!(col.values(), &[None, None, Some(20.5)]);
        assert_eq!(col.present().collect::<Vec<_>>(), vec![(2, 20.5)]);
    }

    #[test]
    fn unreadable_path_is_an_io_failure() {
        let err = InputFile::read(Path::new("/nonexistent/rusty-thermo/log.xlsx")).unwrap_err();
        assert!(matches!(err, crate::error::ReportError::Io(_)));
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(TabularFormat::from_file_name("log.CSV"), TabularFormat::Csv);
        assert_eq!(
            TabularFormat::from_file_name("template.xlsx"),
            TabularFormat::Spreadsheet
        );
        assert_eq!(
            TabularFormat::from_file_name("no_extension"),
            TabularFormat::Spreadsheet
        );
    }
}
