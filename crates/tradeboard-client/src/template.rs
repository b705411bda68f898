//! Sample workbook in the layout the importer accepts.

use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use thiserror::Error;

use crate::import::indicators::INDICATOR_HEADERS;
use crate::import::vendors::VENDOR_HEADERS;
use crate::summary::MONTH_NAMES;

pub const INDICATOR_SHEET_NAME: &str = "Indicadores";
pub const VENDOR_SHEET_NAME: &str = "Vendedores";

const SAMPLE_YEAR: f64 = 2024.0;

/// itb, pdv, fachada, pitstop, academia per month.
const SAMPLE_INDICATORS: [[u32; 5]; 12] = [
    [10, 12, 5, 12, 15],
    [15, 18, 8, 14, 16],
    [12, 15, 6, 13, 17],
    [18, 20, 10, 15, 18],
    [16, 22, 12, 14, 19],
    [14, 19, 9, 15, 18],
    [20, 25, 15, 15, 20],
    [17, 21, 11, 14, 17],
    [13, 15, 8, 15, 18],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
    [0, 0, 0, 0, 0],
];

/// team, vendor, then meta/real pairs for pdv, fachada, pitstop, academia.
const SAMPLE_VENDORS: [(&str, &str, [u32; 8]); 9] = [
    ("Manoel", "Eduardo", [1, 2, 0, 1, 1, 1, 1, 0]),
    ("Manoel", "Joaquim B.", [2, 2, 0, 0, 0, 0, 1, 1]),
    ("Manoel", "Dorivan", [1, 1, 1, 0, 0, 0, 0, 0]),
    ("Manoel", "Marcia", [0, 0, 0, 0, 0, 0, 0, 0]),
    ("Manoel", "Joaquim Jr", [2, 2, 0, 0, 0, 0, 0, 0]),
    ("Wellington", "Jocimar", [1, 0, 0, 0, 0, 0, 1, 2]),
    ("Wellington", "José Neto", [1, 1, 0, 0, 0, 0, 0, 0]),
    ("Wellington", "Luis Felipe", [2, 2, 0, 0, 0, 0, 0, 0]),
    ("Wellington", "Thayna", [2, 3, 0, 0, 1, 1, 1, 1]),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Could not build sample workbook: {0}")]
    Xlsx(#[from] XlsxError),
}

/// Two-sheet `.xlsx` with twelve months of 2024 indicators and one month of
/// vendor rows.
pub fn sample_workbook() -> Result<Vec<u8>, TemplateError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let indicators = workbook.add_worksheet().set_name(INDICATOR_SHEET_NAME)?;
    write_headers(indicators, &INDICATOR_HEADERS, &header_format)?;
    for (index, scores) in SAMPLE_INDICATORS.iter().enumerate() {
        let row = index as u32 + 1;
        let total: u32 = scores.iter().sum();
        indicators.write_number(row, 0, (index + 1) as f64)?;
        indicators.write_number(row, 1, SAMPLE_YEAR)?;
        indicators.write_string(row, 2, MONTH_NAMES[index])?;
        for (offset, score) in scores.iter().enumerate() {
            indicators.write_number(row, 3 + offset as u16, f64::from(*score))?;
        }
        indicators.write_number(row, 8, f64::from(total))?;
        indicators.write_number(row, 9, f64::from(total))?;
    }

    let vendors = workbook.add_worksheet().set_name(VENDOR_SHEET_NAME)?;
    write_headers(vendors, &VENDOR_HEADERS, &header_format)?;
    for (index, (team, name, pairs)) in SAMPLE_VENDORS.iter().enumerate() {
        let row = index as u32 + 1;
        vendors.write_string(row, 0, *team)?;
        vendors.write_string(row, 1, *name)?;
        vendors.write_number(row, 2, 1.0)?;
        vendors.write_number(row, 3, SAMPLE_YEAR)?;
        for (offset, value) in pairs.iter().enumerate() {
            vendors.write_number(row, 4 + offset as u16, f64::from(*value))?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_headers(
    worksheet: &mut Worksheet,
    headers: &[&str],
    format: &Format,
) -> Result<(), XlsxError> {
    for (column, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, column as u16, *header, format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{INDICATOR_SHEET_NAME, VENDOR_SHEET_NAME, sample_workbook};
    use crate::import::{ImportSettings, import_bytes, parse_workbook};
    use crate::identity::{TerritoryMap, UNRESOLVED_AREA};

    #[test]
    fn sample_decodes_with_expected_sheets() {
        let bytes = sample_workbook();
        assert!(bytes.is_ok());
        if let Ok(buffer) = bytes {
            let workbook = parse_workbook(&buffer);
            assert!(workbook.is_ok());
            if let Ok(decoded) = workbook {
                let names = decoded
                    .sheets
                    .iter()
                    .map(|sheet| sheet.name.as_str())
                    .collect::<Vec<&str>>();
                assert_eq!(names, vec![INDICATOR_SHEET_NAME, VENDOR_SHEET_NAME]);
                assert_eq!(decoded.sheets[0].rows.len(), 13);
                assert_eq!(decoded.sheets[1].rows.len(), 10);
            }
        }
    }

    #[test]
    fn sample_passes_the_import_contract() {
        let bytes = sample_workbook();
        assert!(bytes.is_ok());
        if let Ok(buffer) = bytes {
            let settings = ImportSettings::new(TerritoryMap::program_default(), 2026);
            let result = import_bytes(&buffer, &settings);
            assert!(result.success, "{}", result.message);
            assert_eq!(result.report.indicator_rows, 12);
            assert_eq!(result.report.vendor_rows, 9);

            let unresolved = result
                .vendors_data
                .unwrap_or_default()
                .into_iter()
                .filter(|vendor| vendor.area == UNRESOLVED_AREA)
                .map(|vendor| vendor.name)
                .collect::<Vec<String>>();
            assert_eq!(unresolved, vec!["Luis Felipe".to_string()]);
        }
    }
}
