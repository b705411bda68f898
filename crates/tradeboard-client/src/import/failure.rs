use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Problems with the workbook as a whole. Nothing is applied.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StructuralError {
    #[error("Erro ao processar o arquivo Excel. Verifique se o formato está correto.")]
    Unreadable { detail: String },

    #[error("Erro ao ler a planilha \"{sheet}\": {detail}")]
    SheetUnreadable { sheet: String, detail: String },

    #[error(
        "O arquivo deve conter pelo menos 2 planilhas: uma para indicadores e outra para vendedores."
    )]
    TooFewSheets { found: usize },
}

impl StructuralError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unreadable { .. } => "workbook_unreadable",
            Self::SheetUnreadable { .. } => "sheet_unreadable",
            Self::TooFewSheets { .. } => "too_few_sheets",
        }
    }
}

/// Row-level rejection reasons.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum RowIssue {
    MonthOutOfRange,
    MissingTeamOrVendor,
    UnknownTeam,
}

impl RowIssue {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MonthOutOfRange => "month_out_of_range",
            Self::MissingTeamOrVendor => "missing_team_or_vendor",
            Self::UnknownTeam => "unknown_team",
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MonthOutOfRange => f.write_str("Mês deve ser um número entre 1 e 12."),
            Self::MissingTeamOrVendor => f.write_str("Equipe e vendedor são obrigatórios."),
            Self::UnknownTeam => f.write_str("Equipe deve ser 'Manoel' ou 'Wellington'."),
        }
    }
}

/// Why one sheet was rejected. The other sheet is still evaluated.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SheetError {
    #[error("Deve conter pelo menos um cabeçalho e uma linha de dados.")]
    MissingData,

    #[error(
        "Cabeçalhos esperados: {}. Encontrados: {matched}/{required}",
        .expected.join(", ")
    )]
    Schema {
        expected: Vec<String>,
        matched: usize,
        required: usize,
    },

    /// `line` is the 1-based spreadsheet row once [`SheetError::below_rows`]
    /// has been applied; parsers number from the table's header row.
    #[error("Linha {line}: {issue}")]
    Row { line: usize, issue: RowIssue },
}

impl SheetError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingData => "missing_data",
            Self::Schema { .. } => "header_mismatch",
            Self::Row { issue, .. } => issue.code(),
        }
    }

    /// Shifts a row failure down past blank rows above the table.
    pub fn below_rows(self, leading_rows: usize) -> Self {
        match self {
            Self::Row { line, issue } => Self::Row {
                line: line + leading_rows,
                issue,
            },
            other => other,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Row { line, .. } => Some(*line),
            Self::MissingData | Self::Schema { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    Indicators,
    Vendors,
}

impl SheetKind {
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Indicators => 1,
            Self::Vendors => 2,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Indicators => "Indicadores",
            Self::Vendors => "Vendedores",
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Planilha {} ({}): {error}", .sheet.ordinal(), .sheet.label())]
pub struct SheetFailure {
    pub sheet: SheetKind,
    pub error: SheetError,
}

#[cfg(test)]
mod tests {
    use super::{RowIssue, SheetError, SheetFailure, SheetKind, StructuralError};

    #[test]
    fn row_errors_cite_the_line() {
        let error = SheetError::Row {
            line: 5,
            issue: RowIssue::MonthOutOfRange,
        };
        assert_eq!(
            error.to_string(),
            "Linha 5: Mês deve ser um número entre 1 e 12."
        );
        assert_eq!(error.line(), Some(5));
        assert_eq!(error.code(), "month_out_of_range");
    }

    #[test]
    fn blank_rows_above_the_table_shift_row_lines_only() {
        let row = SheetError::Row {
            line: 3,
            issue: RowIssue::UnknownTeam,
        };
        assert_eq!(row.below_rows(2).line(), Some(5));
        assert_eq!(SheetError::MissingData.below_rows(2), SheetError::MissingData);
    }

    #[test]
    fn schema_error_lists_expected_headers_and_count() {
        let error = SheetError::Schema {
            expected: vec!["mes".to_string(), "ano".to_string()],
            matched: 1,
            required: 2,
        };
        assert_eq!(
            error.to_string(),
            "Cabeçalhos esperados: mes, ano. Encontrados: 1/2"
        );
    }

    #[test]
    fn sheet_failure_prefixes_the_sheet_label() {
        let failure = SheetFailure {
            sheet: SheetKind::Vendors,
            error: SheetError::Row {
                line: 3,
                issue: RowIssue::UnknownTeam,
            },
        };
        assert_eq!(
            failure.to_string(),
            "Planilha 2 (Vendedores): Linha 3: Equipe deve ser 'Manoel' ou 'Wellington'."
        );
    }

    #[test]
    fn structural_codes_are_stable() {
        assert_eq!(
            StructuralError::TooFewSheets { found: 1 }.code(),
            "too_few_sheets"
        );
    }
}
