use serde::Serialize;

use crate::import::workbook::Cell;

/// Share of expected headers that must be recognized for a sheet to pass.
const REQUIRED_SHARE: f64 = 0.8;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct HeaderMatch {
    pub matched_count: usize,
    pub required_count: usize,
    pub passed: bool,
}

/// Counts expected headers that some actual header equals, contains, or is
/// contained by (case-insensitive). Blank actual headers never match.
pub fn match_headers(actual: &[Option<String>], expected: &[&str]) -> HeaderMatch {
    let folded_actual = actual
        .iter()
        .flatten()
        .map(|header| header.trim().to_lowercase())
        .filter(|header| !header.is_empty())
        .collect::<Vec<String>>();

    let matched_count = expected
        .iter()
        .filter(|expected_header| {
            let wanted = expected_header.trim().to_lowercase();
            folded_actual.iter().any(|header| {
                header == &wanted || header.contains(&wanted) || wanted.contains(header.as_str())
            })
        })
        .count();

    let required_count = expected.len();
    let threshold = (required_count as f64 * REQUIRED_SHARE).ceil() as usize;

    HeaderMatch {
        matched_count,
        required_count,
        passed: matched_count >= threshold,
    }
}

/// Header labels from a sheet's first row; blank cells become `None`.
pub(crate) fn header_labels(row: &[Cell]) -> Vec<Option<String>> {
    row.iter()
        .map(|cell| {
            if cell.is_blank() {
                None
            } else {
                Some(cell.as_text())
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{header_labels, match_headers};
    use crate::import::workbook::Cell;

    const INDICATOR_HEADERS: [&str; 10] = [
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

    fn labels(values: &[&str]) -> Vec<Option<String>> {
        values.iter().map(|value| Some(value.to_string())).collect()
    }

    #[test]
    fn exact_headers_pass() {
        let result = match_headers(&labels(&INDICATOR_HEADERS), &INDICATOR_HEADERS);
        assert_eq!(result.matched_count, 10);
        assert_eq!(result.required_count, 10);
        assert!(result.passed);
    }

    #[test]
    fn matching_ignores_case_and_tolerates_substrings() {
        let single = match_headers(&labels(&["Fachada"]), &["fachada"]);
        assert_eq!(single.matched_count, 1);

        let plural = match_headers(&labels(&["FACHADAS"]), &["fachada"]);
        assert_eq!(plural.matched_count, 1);

        let shorter = match_headers(&labels(&["academia"]), &["academia moura real"]);
        assert_eq!(shorter.matched_count, 1);

        let exact = match_headers(&labels(&["academia moura real"]), &["academia moura real"]);
        assert_eq!(exact.matched_count, 1);
    }

    #[test]
    fn eighty_percent_is_the_pass_line() {
        let eight = labels(&INDICATOR_HEADERS[..8]);
        assert!(match_headers(&eight, &INDICATOR_HEADERS).passed);

        let seven = labels(&INDICATOR_HEADERS[..7]);
        let result = match_headers(&seven, &INDICATOR_HEADERS);
        assert_eq!(result.matched_count, 7);
        assert!(!result.passed);
    }

    #[test]
    fn twelve_expected_headers_need_ten() {
        let expected = [
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
        let ten = labels(&expected[..10]);
        assert!(match_headers(&ten, &expected).passed);
        let nine = labels(&expected[..9]);
        assert!(!match_headers(&nine, &expected).passed);
    }

    #[test]
    fn blank_headers_do_not_match_everything() {
        let actual = vec![None, Some(String::new()), Some("   ".to_string())];
        let result = match_headers(&actual, &INDICATOR_HEADERS);
        assert_eq!(result.matched_count, 0);
        assert!(!result.passed);
    }

    #[test]
    fn header_labels_render_numbers_and_skip_blanks() {
        let row = vec![Cell::text("mes"), Cell::Empty, Cell::Number(2024.0)];
        assert_eq!(
            header_labels(&row),
            vec![Some("mes".to_string()), None, Some("2024".to_string())]
        );
    }
}
