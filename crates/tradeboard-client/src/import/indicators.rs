use crate::import::coerce;
use crate::import::failure::{RowIssue, SheetError};
use crate::import::headers::{header_labels, match_headers};
use crate::import::workbook::Cell;
use crate::model::{IndicatorRecord, IndicatorYears};

pub const INDICATOR_HEADERS: [&str; 10] = [
    "mes",
    "ano",
    "evolucao",
    "itb",
    "pdv",
    "fachada",
    "pitstop",
    "academia",
    "real",
    "performance",
];

const MES: usize = 0;
const ANO: usize = 1;
const EVOLUCAO: usize = 2;
const ITB: usize = 3;
const PDV: usize = 4;
const FACHADA: usize = 5;
const PITSTOP: usize = 6;
const ACADEMIA: usize = 7;
const REAL: usize = 8;
const PERFORMANCE: usize = 9;

const LOGGED_ROWS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedIndicators {
    pub data: IndicatorYears,
    pub rows_parsed: usize,
    pub blank_rows_skipped: usize,
}

/// Parses the indicators sheet. Columns are positional; the header row only
/// gates acceptance. The first invalid row rejects the whole sheet.
pub fn parse_indicator_rows(
    rows: &[Vec<Cell>],
    default_year: i32,
) -> Result<ParsedIndicators, SheetError> {
    if rows.len() < 2 {
        return Err(SheetError::MissingData);
    }

    let header_check = match_headers(&header_labels(&rows[0]), &INDICATOR_HEADERS);
    if !header_check.passed {
        return Err(SheetError::Schema {
            expected: INDICATOR_HEADERS.iter().map(|value| value.to_string()).collect(),
            matched: header_check.matched_count,
            required: header_check.required_count,
        });
    }

    let mut parsed = ParsedIndicators::default();
    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(Cell::is_blank) {
            parsed.blank_rows_skipped += 1;
            continue;
        }

        let line = index + 1;
        let Some(month) = coerce::month(row.get(MES)) else {
            return Err(SheetError::Row {
                line,
                issue: RowIssue::MonthOutOfRange,
            });
        };
        let year = coerce::year(row.get(ANO), default_year);

        let record = IndicatorRecord {
            itb: coerce::score(row.get(ITB)),
            pdv: coerce::score(row.get(PDV)),
            fachada: coerce::score(row.get(FACHADA)),
            pitstop: coerce::score(row.get(PITSTOP)),
            academia: coerce::score(row.get(ACADEMIA)),
            evolucao: row.get(EVOLUCAO).map(Cell::as_text).unwrap_or_default(),
            real: coerce::score(row.get(REAL)),
            performance: coerce::percentage(row.get(PERFORMANCE)),
        };

        if parsed.rows_parsed < LOGGED_ROWS {
            tracing::debug!(line, year, month, ?record, "parsed indicator row");
        }

        parsed
            .data
            .entry(year)
            .or_default()
            .insert(month - 1, record);
        parsed.rows_parsed += 1;
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::{INDICATOR_HEADERS, parse_indicator_rows};
    use crate::import::failure::{RowIssue, SheetError};
    use crate::import::workbook::Cell;
    use crate::model::IndicatorRecord;

    fn header_row() -> Vec<Cell> {
        INDICATOR_HEADERS.iter().map(|value| Cell::text(value)).collect()
    }

    fn numbers(values: &[f64]) -> Vec<Cell> {
        values.iter().map(|value| Cell::Number(*value)).collect()
    }

    #[test]
    fn parses_documented_example_row() {
        let row = vec![
            Cell::Number(1.0),
            Cell::Number(2024.0),
            Cell::text("Janeiro"),
            Cell::Number(10.0),
            Cell::Number(12.0),
            Cell::Number(5.0),
            Cell::Number(12.0),
            Cell::Number(15.0),
            Cell::Number(54.0),
            Cell::Number(75.5),
        ];
        let result = parse_indicator_rows(&[header_row(), row], 2026);
        assert!(result.is_ok());
        if let Ok(parsed) = result {
            assert_eq!(parsed.rows_parsed, 1);
            let record = parsed.data.get(&2024).and_then(|months| months.get(&0));
            assert_eq!(
                record,
                Some(&IndicatorRecord {
                    itb: 10,
                    pdv: 12,
                    fachada: 5,
                    pitstop: 12,
                    academia: 15,
                    evolucao: "Janeiro".to_string(),
                    real: 54,
                    performance: 75.5,
                })
            );
        }
    }

    #[test]
    fn month_thirteen_fails_citing_spreadsheet_line() {
        let rows = vec![
            header_row(),
            numbers(&[1.0, 2024.0]),
            Vec::new(),
            numbers(&[13.0, 2024.0]),
        ];
        let result = parse_indicator_rows(&rows, 2026);
        assert_eq!(
            result,
            Err(SheetError::Row {
                line: 4,
                issue: RowIssue::MonthOutOfRange,
            })
        );
    }

    #[test]
    fn non_numeric_scores_default_to_zero_and_year_defaults_to_current() {
        let row = vec![
            Cell::text("3"),
            Cell::Empty,
            Cell::Empty,
            Cell::text("abc"),
            Cell::Number(7.0),
        ];
        let result = parse_indicator_rows(&[header_row(), row], 2026);
        assert!(result.is_ok());
        if let Ok(parsed) = result {
            let record = parsed.data.get(&2026).and_then(|months| months.get(&2));
            assert!(record.is_some());
            if let Some(value) = record {
                assert_eq!(value.itb, 0);
                assert_eq!(value.pdv, 7);
                assert_eq!(value.real, 0);
                assert_eq!(value.performance, 0.0);
                assert_eq!(value.evolucao, "");
            }
        }
    }

    #[test]
    fn blank_rows_are_skipped_not_counted() {
        let rows = vec![
            header_row(),
            vec![Cell::Empty, Cell::text("  ")],
            numbers(&[2.0, 2024.0, 0.0, 1.0]),
            Vec::new(),
        ];
        let result = parse_indicator_rows(&rows, 2026);
        assert!(result.is_ok());
        if let Ok(parsed) = result {
            assert_eq!(parsed.rows_parsed, 1);
            assert_eq!(parsed.blank_rows_skipped, 2);
        }
    }

    #[test]
    fn later_rows_overwrite_the_same_month() {
        let rows = vec![
            header_row(),
            numbers(&[1.0, 2024.0, 0.0, 3.0]),
            numbers(&[1.0, 2024.0, 0.0, 9.0]),
        ];
        let result = parse_indicator_rows(&rows, 2026);
        assert!(result.is_ok());
        if let Ok(parsed) = result {
            let itb = parsed
                .data
                .get(&2024)
                .and_then(|months| months.get(&0))
                .map(|record| record.itb);
            assert_eq!(itb, Some(9));
        }
    }

    #[test]
    fn header_only_sheet_is_missing_data() {
        let result = parse_indicator_rows(&[header_row()], 2026);
        assert_eq!(result, Err(SheetError::MissingData));
    }

    #[test]
    fn unrecognized_headers_are_a_schema_error() {
        let rows = vec![
            vec![Cell::text("foo"), Cell::text("bar")],
            numbers(&[1.0, 2024.0]),
        ];
        let result = parse_indicator_rows(&rows, 2026);
        assert!(matches!(
            result,
            Err(SheetError::Schema {
                matched: 0,
                required: 10,
                ..
            })
        ));
    }

    #[test]
    fn legacy_eight_column_layout_is_rejected() {
        let rows = vec![
            ["mes", "ano", "notames", "itb", "pdv", "fachadas", "pitstop", "academia"]
                .iter()
                .map(|value| Cell::text(value))
                .collect::<Vec<Cell>>(),
            numbers(&[1.0, 2024.0]),
        ];
        let result = parse_indicator_rows(&rows, 2026);
        assert!(matches!(
            result,
            Err(SheetError::Schema {
                matched: 7,
                required: 10,
                ..
            })
        ));
    }
}
