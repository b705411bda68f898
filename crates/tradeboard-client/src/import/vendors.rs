use std::collections::HashSet;

use crate::identity::{TerritoryMap, normalize};
use crate::import::coerce;
use crate::import::failure::{RowIssue, SheetError};
use crate::import::headers::{header_labels, match_headers};
use crate::import::workbook::Cell;
use crate::model::{MetaReal, Team, VendorRecord};

pub const VENDOR_HEADERS: [&str; 12] = [
    "equipe",
    "vendedor",
    "mes",
    "ano",
    "pdv meta",
    "pdv real",
    "fachada meta",
    "fachada real",
    "pitstop meta",
    "pitstop real",
    "academia moura meta",
    "academia moura real",
];

const EQUIPE: usize = 0;
const VENDEDOR: usize = 1;
const MES: usize = 2;
const ANO: usize = 3;
const PDV_META: usize = 4;
const FACHADA_META: usize = 6;
const PITSTOP_META: usize = 8;
const ACADEMIA_META: usize = 10;

const LOGGED_ROWS: usize = 3;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedVendors {
    pub vendors: Vec<VendorRecord>,
    pub duplicates_dropped: usize,
    pub blank_rows_skipped: usize,
}

/// Parses the vendors sheet into deduplicated records with their territory
/// attached. Rows repeating (team, folded name, month, year) are dropped and
/// counted; the first occurrence wins.
pub fn parse_vendor_rows(
    rows: &[Vec<Cell>],
    territories: &TerritoryMap,
    default_year: i32,
) -> Result<ParsedVendors, SheetError> {
    if rows.len() < 2 {
        return Err(SheetError::MissingData);
    }

    let header_check = match_headers(&header_labels(&rows[0]), &VENDOR_HEADERS);
    if !header_check.passed {
        return Err(SheetError::Schema {
            expected: VENDOR_HEADERS.iter().map(|value| value.to_string()).collect(),
            matched: header_check.matched_count,
            required: header_check.required_count,
        });
    }

    let mut parsed = ParsedVendors::default();
    let mut seen: HashSet<(Team, String, u8, i32)> = HashSet::new();

    for (index, row) in rows.iter().enumerate().skip(1) {
        if row.iter().all(Cell::is_blank) {
            parsed.blank_rows_skipped += 1;
            continue;
        }

        let line = index + 1;
        let team_text = text_at(row, EQUIPE);
        let name = text_at(row, VENDEDOR);
        if team_text.is_empty() || name.is_empty() {
            return Err(SheetError::Row {
                line,
                issue: RowIssue::MissingTeamOrVendor,
            });
        }

        let Some(team) = Team::parse(&team_text) else {
            return Err(SheetError::Row {
                line,
                issue: RowIssue::UnknownTeam,
            });
        };

        let Some(month) = coerce::month(row.get(MES)) else {
            return Err(SheetError::Row {
                line,
                issue: RowIssue::MonthOutOfRange,
            });
        };
        let year = coerce::year(row.get(ANO), default_year);

        let folded = normalize(&name);
        if !seen.insert((team, folded.clone(), month, year)) {
            tracing::debug!(line, %team, vendor = %name, month, year, "dropped duplicate vendor row");
            parsed.duplicates_dropped += 1;
            continue;
        }

        let record = VendorRecord {
            area: territories.resolve(team, &folded),
            name,
            team,
            month,
            year,
            pdv: meta_real(row, PDV_META),
            fachadas: meta_real(row, FACHADA_META),
            pit_stop: meta_real(row, PITSTOP_META),
            academia: meta_real(row, ACADEMIA_META),
        };

        if parsed.vendors.len() < LOGGED_ROWS {
            tracing::debug!(line, ?record, "parsed vendor row");
        }
        parsed.vendors.push(record);
    }

    Ok(parsed)
}

fn text_at(row: &[Cell], column: usize) -> String {
    row.get(column).map(Cell::as_text).unwrap_or_default()
}

fn meta_real(row: &[Cell], meta_column: usize) -> MetaReal {
    MetaReal::new(
        coerce::score(row.get(meta_column)),
        coerce::score(row.get(meta_column + 1)),
    )
}
