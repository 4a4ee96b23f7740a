use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook, Worksheet, XlsxError};

use super::loader::read_workbook;
use super::model::{CellValue, InputFile, TabularGrid, Workbook};
use super::properties::{round2, CalculatedProperties, PhysicalInputs};
use super::thermal::ThermalMetrics;
use crate::error::{InputKind, ReportError, ReportResult};

/// Number of values appended to the template, one per row.
pub const REPORT_ROWS: usize = 16;

// ---------------------------------------------------------------------------
// Report column
// ---------------------------------------------------------------------------

/// The 16 values of one sample, top to bottom:
///
/// | row | value |
/// |-----|-------|
/// | 0 | evaluation date |
/// | 1 | sample name |
/// | 2 | areal weight (2 dp) |
/// | 3 | thickness |
/// | 4 | density (2 dp) |
/// | 5 | heat-source setting |
/// | 6 | pressure |
/// | 7..=10 | time to reach 100 / 150 / 180 / 200 °C |
/// | 11..=14 | temperature at 60 / 120 / 300 / 600 s |
/// | 15 | remarks |
///
/// Metrics that are not available are written as `not_available`.
pub fn report_column(
    inputs: &PhysicalInputs,
    props: &CalculatedProperties,
    metrics: &ThermalMetrics,
    not_available: &str,
) -> Vec<CellValue> {
    let missing = || CellValue::Text(not_available.to_string());

    let mut values = vec![
        CellValue::Text(inputs.evaluation_date.clone()),
        CellValue::Text(inputs.sample_name.clone()),
        CellValue::Float(round2(props.areal_weight)),
        CellValue::Float(inputs.thickness_mm),
        CellValue::Float(round2(props.density)),
        CellValue::Text(inputs.heat_setting.clone()),
        CellValue::Text(inputs.pressure.clone()),
    ];
    values.extend(
        metrics
            .time_to_reach
            .iter()
            .map(|t| t.map_or_else(missing, CellValue::Integer)),
    );
    values.extend(
        metrics
            .temperature_at
            .iter()
            .map(|v| v.map_or_else(missing, CellValue::Float)),
    );
    values.push(CellValue::Text(inputs.remarks.clone()));

    debug_assert_eq!(values.len(), REPORT_ROWS);
    values
}

/// Append `values` as a new column: `values[i]` becomes the last cell of
/// row `i`.
///
/// Rows `0..values.len()` are created if missing and padded with empty
/// cells to the widest of those rows first, so every value lands in the
/// same column even when the rows were ragged. Later rows are untouched.
pub fn append_column(grid: &mut TabularGrid, values: &[CellValue]) {
    let touched = values.len();
    let max_col_count = grid.iter().take(touched).map(Vec::len).max().unwrap_or(0);

    if grid.len() < touched {
        grid.resize_with(touched, Vec::new);
    }
    for (row, value) in grid.iter_mut().zip(values) {
        row.resize(max_col_count, CellValue::Empty);
        row.push(value.clone());
    }
    log::debug!("Appended {touched} values at column {}", max_col_count + 1);
}

/// Parse `template`, append the report column to its first sheet and
/// encode the whole workbook as `.xlsx`.
pub fn merge_into_template(template: &InputFile, values: &[CellValue]) -> ReportResult<Vec<u8>> {
    let mut workbook = read_workbook(template, InputKind::ReportTemplate)?;
    let sheet = workbook
        .first_sheet_mut()
        .ok_or_else(|| ReportError::parse(InputKind::ReportTemplate, "file contains no sheets"))?;
    append_column(&mut sheet.rows, values);
    log::info!(
        "Merged report column into sheet '{}' of '{}'",
        sheet.name,
        template.name
    );
    write_xlsx(&workbook)
}

// ---------------------------------------------------------------------------
// XLSX encoder
// ---------------------------------------------------------------------------

/// Number format for an Excel date serial: date only for whole days,
/// date and time otherwise.
pub fn date_num_format(serial: f64) -> &'static str {
    if serial.fract() == 0.0 {
        "yyyy-mm-dd"
    } else {
        "yyyy-mm-dd hh:mm:ss"
    }
}

/// Encode every sheet of `workbook`, in order, as an `.xlsx` file.
///
/// Formulas are written back as formulas with their cached result, so
/// they recalculate when the report is opened.
pub fn write_xlsx(workbook: &Workbook) -> ReportResult<Vec<u8>> {
    let mut xlsx = XlsxWorkbook::new();

    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        worksheet.set_name(&sheet.name)?;
        write_rows(worksheet, &sheet.rows)?;
    }

    Ok(xlsx.save_to_buffer()?)
}

fn write_rows(worksheet: &mut Worksheet, rows: &TabularGrid) -> ReportResult<()> {
    for (r, cells) in rows.iter().enumerate() {
        for (c, cell) in cells.iter().enumerate() {
            if cell.is_empty() || matches!(cell, CellValue::Text(s) if s.is_empty()) {
                continue;
            }
            let (Ok(row), Ok(col)) = (u32::try_from(r), u16::try_from(c)) else {
                return Err(XlsxError::RowColumnLimitError.into());
            };
            match cell {
                CellValue::Text(s) | CellValue::Error(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                CellValue::Integer(i) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                CellValue::Float(f) => {
                    worksheet.write_number(row, col, *f)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                CellValue::DateTime(serial) => {
                    let format = Format::new().set_num_format(date_num_format(*serial));
                    worksheet.write_number_with_format(row, col, *serial, &format)?;
                }
                CellValue::Formula { formula, cached } => {
                    worksheet.write_formula(row, col, formula_with_result(formula, cached))?;
                }
                CellValue::Empty => {}
            }
        }
    }
    Ok(())
}

/// Only numbers and text have a cached form `rust_xlsxwriter` can store.
fn formula_with_result(formula: &str, cached: &CellValue) -> Formula {
    let formula = Formula::new(formula);
    match cached {
        CellValue::Float(f) => formula.set_result(f.to_string()),
        CellValue::Integer(i) => formula.set_result(i.to_string()),
        CellValue::Text(s) if !s.is_empty() => formula.set_result(s.as_str()),
        _ => formula,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Sheet;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn ragged_rows_get_one_clean_column() {
        let mut grid: TabularGrid = vec![
            vec![text("a"), text("b"), text("c")],
            vec![text("d")],
            vec![],
            vec![text("untouched"), text("row")],
            vec![text("x"); 7],
            vec![text("beyond")],
        ];
        let values: Vec<CellValue> = (0..5).map(CellValue::Integer).collect();

        append_column(&mut grid, &values);

        // Widest of rows 0..5 is row 4, so the new column sits at index 7.
        for (i, row) in grid.iter().take(5).enumerate() {
            assert_eq!(row.len(), 8, "row {i}");
            assert_eq!(row[7], CellValue::Integer(i as i64));
        }
        assert_eq!(grid[1][1..7], vec![CellValue::Empty; 6][..]);
        assert_eq!(grid[5], vec![text("beyond")]);
    }

    #[test]
    fn widest_touched_row_sets_the_column() {
        let mut grid: TabularGrid = vec![
            vec![text("a"), text("b"), text("c")],
            vec![text("d")],
            vec![],
            vec![text("e"); 10],
        ];
        let values: Vec<CellValue> = (0..3).map(CellValue::Integer).collect();

        append_column(&mut grid, &values);

        assert_eq!(grid[0].len(), 4);
        assert_eq!(grid[1], vec![text("d"), CellValue::Empty, CellValue::Empty, CellValue::Integer(1)]);
        assert_eq!(grid[2], vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Integer(2)]);
        assert_eq!(grid[3].len(), 10);
    }

    #[test]
    fn short_grid_grows_to_hold_every_value() {
        let mut grid: TabularGrid = vec![vec![text("a"), text("b"), text("c")], vec![text("d")], vec![]];
        let values: Vec<CellValue> = (0..5).map(CellValue::Integer).collect();

        append_column(&mut grid, &values);

        assert_eq!(grid.len(), 5);
        for row in &grid {
            assert_eq!(row.len(), 4);
        }
        assert_eq!(grid[4], vec![CellValue::Empty, CellValue::Empty, CellValue::Empty, CellValue::Integer(4)]);
    }

    #[test]
    fn empty_template_starts_at_column_a() {
        let mut grid = TabularGrid::new();
        append_column(&mut grid, &[text("only")]);
        assert_eq!(grid, vec![vec![text("only")]]);
    }

    #[test]
    fn report_column_order_and_placeholders() {
        let inputs = PhysicalInputs {
            sample_name: "S-01".into(),
            thickness_mm: 1.5,
            weight_g: 3.0,
            width_mm: 100.0,
            length_mm: 100.0,
            heat_setting: "Level 4".into(),
            pressure: "0.2 MPa".into(),
            evaluation_date: "2026-10-16".into(),
            remarks: "edge curl".into(),
        };
        let props = CalculatedProperties {
            areal_weight: 300.004,
            density: 199.996,
        };
        let metrics = ThermalMetrics {
            anchor_index: 5,
            time_to_reach: [Some(90), Some(140), None, None],
            temperature_at: [Some(61.5), None, None, None],
        };

        let col = report_column(&inputs, &props, &metrics, "N/A");

        assert_eq!(col.len(), REPORT_ROWS);
        assert_eq!(col[0], text("2026-10-16"));
        assert_eq!(col[1], text("S-01"));
        assert_eq!(col[2], CellValue::Float(300.0));
        assert_eq!(col[3], CellValue::Float(1.5));
        assert_eq!(col[4], CellValue::Float(200.0));
        assert_eq!(col[5], text("Level 4"));
        assert_eq!(col[6], text("0.2 MPa"));
        assert_eq!(col[7], CellValue::Integer(90));
        assert_eq!(col[8], CellValue::Integer(140));
        assert_eq!(col[9], text("N/A"));
        assert_eq!(col[10], text("N/A"));
        assert_eq!(col[11], CellValue::Float(61.5));
        assert_eq!(col[12], text("N/A"));
        assert_eq!(col[15], text("edge curl"));
    }

    #[test]
    fn unreadable_template_is_a_parse_failure() {
        let template = InputFile::new("template.xlsx", vec![0x50, 0x4b, 0x03, 0x04]);
        let err = merge_into_template(&template, &[text("x")]).unwrap_err();
        assert!(matches!(
            err,
            ReportError::Parse {
                file: InputKind::ReportTemplate,
                ..
            }
        ));
    }

    #[test]
    fn time_of_day_picks_a_date_time_format() {
        assert_eq!(date_num_format(45000.0), "yyyy-mm-dd");
        assert_eq!(date_num_format(45000.5), "yyyy-mm-dd hh:mm:ss");
    }

    #[test]
    fn formulas_in_other_sheets_survive_the_merge() {
        let mut xlsx = XlsxWorkbook::new();
        let report = xlsx.add_worksheet();
        report.write_string(0, 0, "Date").unwrap();
        let notes = xlsx.add_worksheet();
        notes.set_name("Notes").unwrap();
        notes.write_number(0, 0, 7.5).unwrap();
        notes.write_formula(0, 1, Formula::new("=A1*2").set_result("15")).unwrap();
        let template = InputFile::new("template.xlsx", xlsx.save_to_buffer().unwrap());

        let bytes = merge_into_template(&template, &[text("2026-10-16")]).unwrap();

        let back = read_workbook(&InputFile::new("out.xlsx", bytes), InputKind::ReportTemplate)
            .unwrap();
        assert_eq!(back.sheets[0].rows[0], vec![text("Date"), text("2026-10-16")]);
        assert_eq!(
            back.sheets[1].rows[0],
            vec![
                CellValue::Float(7.5),
                CellValue::Formula {
                    formula: "A1*2".into(),
                    cached: Box::new(CellValue::Float(15.0)),
                },
            ]
        );
    }

    #[test]
    fn encoded_workbook_keeps_every_sheet() {
        let workbook = Workbook {
            sheets: vec![
                Sheet {
                    name: "Report".into(),
                    rows: vec![vec![text("a"), CellValue::Float(1.25)], vec![CellValue::Bool(true)]],
                },
                Sheet {
                    name: "Notes".into(),
                    rows: vec![
                        vec![CellValue::Empty, text("keep me")],
                        vec![CellValue::DateTime(45000.0), CellValue::DateTime(45000.5)],
                    ],
                },
            ],
        };
        let bytes = write_xlsx(&workbook).unwrap();
        let back = read_workbook(&InputFile::new("out.xlsx", bytes), InputKind::ReportTemplate)
            .unwrap();
        assert_eq!(back, workbook);
    }
}
