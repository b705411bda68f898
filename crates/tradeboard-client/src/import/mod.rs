//! Two-sheet workbook import.
//!
//! The pipeline is stateless: [`input::read_source`] yields bytes,
//! [`workbook::parse_workbook`] decodes them, and [`import_workbook`] turns
//! the decoded sheets into an [`ImportResult`]. Nothing here touches the
//! state store; callers decide what to do with a successful result.

pub(crate) mod coerce;
pub mod failure;
pub mod headers;
pub mod indicators;
pub mod input;
pub mod vendors;
pub mod workbook;

use chrono::{Datelike, Local};
use serde::Serialize;

use crate::identity::TerritoryMap;
use crate::model::{IndicatorYears, VendorRecord};

pub use failure::{RowIssue, SheetError, SheetFailure, SheetKind, StructuralError};
pub use workbook::{Cell, Sheet, Workbook, parse_workbook};

pub const SUCCESS_MESSAGE: &str =
    "Dados importados com sucesso! Indicadores e Vendedores processados.";

const FAILURE_SEPARATOR: &str = "; ";

/// Inputs that are fixed for the duration of one import.
#[derive(Debug, Clone)]
pub struct ImportSettings {
    pub territories: TerritoryMap,
    /// Year assumed for rows whose `ano` is blank or zero.
    pub current_year: i32,
}

impl ImportSettings {
    pub fn new(territories: TerritoryMap, current_year: i32) -> Self {
        Self {
            territories,
            current_year,
        }
    }

    /// Program territories and the local calendar year.
    pub fn for_today() -> Self {
        Self::new(TerritoryMap::program_default(), Local::now().year())
    }
}

/// Typed detail behind [`ImportResult::message`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    pub structural: Option<StructuralError>,
    pub failures: Vec<SheetFailure>,
    pub indicator_rows: usize,
    pub vendor_rows: usize,
    pub duplicates_dropped: usize,
    pub blank_rows_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators_data: Option<IndicatorYears>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendors_data: Option<Vec<VendorRecord>>,
    #[serde(skip)]
    pub report: ImportReport,
}

impl ImportResult {
    fn rejected_structurally(error: StructuralError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            indicators_data: None,
            vendors_data: None,
            report: ImportReport {
                structural: Some(error),
                ..ImportReport::default()
            },
        }
    }
}

/// Validates and parses both sheets. Sheet 1 holds indicators and sheet 2
/// holds vendors; sheets beyond the second are ignored. Both sheets are
/// always evaluated so a rejection reports every failing sheet at once.
pub fn import_workbook(workbook: &Workbook, settings: &ImportSettings) -> ImportResult {
    let (Some(indicator_sheet), Some(vendor_sheet)) = (workbook.sheet(0), workbook.sheet(1)) else {
        let error = StructuralError::TooFewSheets {
            found: workbook.sheets.len(),
        };
        tracing::warn!(found = workbook.sheets.len(), "workbook rejected: too few sheets");
        return ImportResult::rejected_structurally(error);
    };

    let mut report = ImportReport::default();

    let parsed_indicators =
        match indicators::parse_indicator_rows(&indicator_sheet.rows, settings.current_year) {
            Ok(parsed) => {
                report.indicator_rows = parsed.rows_parsed;
                report.blank_rows_skipped += parsed.blank_rows_skipped;
                Some(parsed.data)
            }
            Err(error) => {
                report.failures.push(SheetFailure {
                    sheet: SheetKind::Indicators,
                    error: error.below_rows(indicator_sheet.leading_rows),
                });
                None
            }
        };

    let parsed_vendors = match vendors::parse_vendor_rows(
        &vendor_sheet.rows,
        &settings.territories,
        settings.current_year,
    ) {
        Ok(parsed) => {
            report.vendor_rows = parsed.vendors.len();
            report.duplicates_dropped = parsed.duplicates_dropped;
            report.blank_rows_skipped += parsed.blank_rows_skipped;
            Some(parsed.vendors)
        }
        Err(error) => {
            report.failures.push(SheetFailure {
                sheet: SheetKind::Vendors,
                error: error.below_rows(vendor_sheet.leading_rows),
            });
            None
        }
    };

    match (parsed_indicators, parsed_vendors) {
        (Some(indicators_data), Some(vendors_data)) => {
            tracing::info!(
                indicator_rows = report.indicator_rows,
                vendor_rows = report.vendor_rows,
                duplicates_dropped = report.duplicates_dropped,
                "workbook accepted"
            );
            ImportResult {
                success: true,
                message: SUCCESS_MESSAGE.to_string(),
                indicators_data: Some(indicators_data),
                vendors_data: Some(vendors_data),
                report,
            }
        }
        _ => {
            let message = report
                .failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<String>>()
                .join(FAILURE_SEPARATOR);
            tracing::warn!(failures = report.failures.len(), %message, "workbook rejected");
            ImportResult {
                success: false,
                message,
                indicators_data: None,
                vendors_data: None,
                report,
            }
        }
    }
}

/// Decodes and imports raw workbook bytes. Undecodable bytes produce a
/// failed result rather than an error.
pub fn import_bytes(bytes: &[u8], settings: &ImportSettings) -> ImportResult {
    match parse_workbook(bytes) {
        Ok(workbook) => import_workbook(&workbook, settings),
        Err(error) => {
            tracing::warn!(code = error.code(), %error, "workbook could not be decoded");
            ImportResult::rejected_structurally(error)
        }
    }
}
