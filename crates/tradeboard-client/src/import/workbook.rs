use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};

use crate::import::failure::StructuralError;

/// A single cell value, detached from the spreadsheet library.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Self::Text(value.to_string())
    }

    /// Trimmed display text; empty for empty cells.
    pub fn as_text(&self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Text(value) => value.trim().to_string(),
            Self::Number(value) => format_number(*value),
            Self::Bool(value) => value.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(value) => value.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    pub name: String,
    /// Blank rows above the table. Row failures are reported as
    /// `leading_rows + table line` so they point at the real spreadsheet row.
    pub leading_rows: usize,
    /// The table itself: `rows[0][0]` is its top-left cell.
    pub rows: Vec<Vec<Cell>>,
}

impl Sheet {
    pub fn new(name: &str, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            name: name.to_string(),
            leading_rows: 0,
            rows,
        }
    }

    pub fn below_blank_rows(mut self, leading_rows: usize) -> Self {
        self.leading_rows = leading_rows;
        self
    }
}

/// Sheets in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet(&self, index: usize) -> Option<&Sheet> {
        self.sheets.get(index)
    }
}

/// Only the indicators and vendors sheets are decoded.
const IMPORTED_SHEETS: usize = 2;

/// Decodes workbook bytes. The container format (xlsx, xlsm, xlsb, xls, ods)
/// is sniffed from the content, not from a file extension. Sheets after the
/// second are never read, so a broken extra sheet cannot block an import.
pub fn parse_workbook(bytes: &[u8]) -> Result<Workbook, StructuralError> {
    let mut reader = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec())).map_err(|error| {
        StructuralError::Unreadable {
            detail: error.to_string(),
        }
    })?;

    let sheet_names = reader.sheet_names().to_vec();
    if sheet_names.len() < IMPORTED_SHEETS {
        return Err(StructuralError::TooFewSheets {
            found: sheet_names.len(),
        });
    }

    let mut sheets = Vec::with_capacity(IMPORTED_SHEETS);
    for name in sheet_names.into_iter().take(IMPORTED_SHEETS) {
        let range = reader
            .worksheet_range(&name)
            .map_err(|error| StructuralError::SheetUnreadable {
                sheet: name.clone(),
                detail: error.to_string(),
            })?;
        let (leading_rows, rows) = table_rows(&range);
        sheets.push(Sheet {
            name,
            leading_rows,
            rows,
        });
    }

    tracing::debug!(sheets = sheets.len(), "decoded workbook");
    Ok(Workbook { sheets })
}

/// The used range, starting at its first row and column, plus how many
/// spreadsheet rows sit above it.
fn table_rows(range: &Range<Data>) -> (usize, Vec<Vec<Cell>>) {
    let leading_rows = range.start().map_or(0, |(row, _)| row as usize);
    let rows = range
        .rows()
        .map(|row| {
            let mut cells = row.iter().map(convert_cell).collect::<Vec<Cell>>();
            while matches!(cells.last(), Some(Cell::Empty)) {
                cells.pop();
            }
            cells
        })
        .collect();
    (leading_rows, rows)
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(value) => Cell::Text(value.clone()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::Number(*value as f64),
        Data::Bool(value) => Cell::Bool(*value),
        Data::DateTime(value) => Cell::Number(value.as_f64()),
        Data::DateTimeIso(value) | Data::DurationIso(value) => Cell::Text(value.clone()),
    }
}

fn format_number(value: f64) -> String {
    if value == value.trunc() && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{Cell, parse_workbook};
    use crate::import::failure::StructuralError;

    #[test]
    fn cell_text_uses_integer_form_for_whole_numbers() {
        assert_eq!(Cell::Number(2024.0).as_text(), "2024");
        assert_eq!(Cell::Number(75.5).as_text(), "75.5");
        assert_eq!(Cell::text("  Janeiro ").as_text(), "Janeiro");
        assert_eq!(Cell::Empty.as_text(), "");
    }

    #[test]
    fn whitespace_only_text_counts_as_blank() {
        assert!(Cell::text("   ").is_blank());
        assert!(Cell::Empty.is_blank());
        assert!(!Cell::Number(0.0).is_blank());
        assert!(!Cell::Bool(false).is_blank());
    }

    fn workbook_bytes(sheet_names: &[&str], first_cell: (u32, u16)) -> Option<Vec<u8>> {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        for name in sheet_names {
            let worksheet = workbook.add_worksheet().set_name(*name).ok()?;
            worksheet.write_string(first_cell.0, first_cell.1, "MÊS").ok()?;
            worksheet
                .write_number(first_cell.0 + 1, first_cell.1, 1.0)
                .ok()?;
        }
        workbook.save_to_buffer().ok()
    }

    #[test]
    fn table_starts_at_its_first_used_cell() {
        let bytes = workbook_bytes(&["Indicadores", "Vendedores"], (2, 1));
        assert!(bytes.is_some());
        if let Some(bytes) = bytes {
            let result = parse_workbook(&bytes);
            assert!(result.is_ok());
            if let Ok(workbook) = result {
                let sheet = &workbook.sheets[0];
                assert_eq!(sheet.leading_rows, 2);
                assert_eq!(sheet.rows.len(), 2);
                assert_eq!(sheet.rows[0][0], Cell::text("MÊS"));
                assert_eq!(sheet.rows[1][0], Cell::Number(1.0));
            }
        }
    }

    #[test]
    fn only_the_first_two_sheets_are_decoded() {
        let bytes = workbook_bytes(&["Indicadores", "Vendedores", "Notas"], (0, 0));
        assert!(bytes.is_some());
        if let Some(bytes) = bytes {
            let result = parse_workbook(&bytes);
            assert!(result.is_ok());
            if let Ok(workbook) = result {
                let names = workbook
                    .sheets
                    .iter()
                    .map(|sheet| sheet.name.as_str())
                    .collect::<Vec<&str>>();
                assert_eq!(names, vec!["Indicadores", "Vendedores"]);
            }
        }
    }

    #[test]
    fn single_sheet_is_rejected_before_decoding() {
        let bytes = workbook_bytes(&["Indicadores"], (0, 0));
        assert!(bytes.is_some());
        if let Some(bytes) = bytes {
            let result = parse_workbook(&bytes);
            assert_eq!(result, Err(StructuralError::TooFewSheets { found: 1 }));
        }
    }

    #[test]
    fn garbage_bytes_are_a_structural_error() {
        let result = parse_workbook(b"definitely not a spreadsheet");
        assert!(matches!(result, Err(StructuralError::Unreadable { .. })));
    }
}
