use std::path::Path;

use crate::commands::common::load_setup;
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{
    ImportCounts, ImportData, ImportIssue, ImportListData, ImportNextStep, ImportRejectionData,
};
use crate::error::IMPORT_HELP_COMMAND;
use crate::import::input::{ResolvedSource, read_source};
use crate::import::{ImportReport, ImportResult, ImportSettings, import_bytes};
use crate::merge::{MergeMode, merge_indicators};
use crate::store::{RunInput, Store};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct ImportRunOptions<'a> {
    pub path: String,
    pub dry_run: bool,
    pub merge_mode: MergeMode,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<Vec<u8>>,
    /// Defaults to [`ImportSettings::for_today`].
    pub settings: Option<ImportSettings>,
}

#[derive(Debug, Default)]
pub struct ImportListOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn run(path: &str, dry_run: bool, merge_mode: MergeMode) -> ClientResult<SuccessEnvelope> {
    run_with_options(ImportRunOptions {
        path: path.to_string(),
        dry_run,
        merge_mode,
        ..ImportRunOptions::default()
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ImportRunOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let source = read_source(&options.path, options.stdin_override)?;
    let settings = options.settings.unwrap_or_else(ImportSettings::for_today);
    let result = import_bytes(&source.bytes, &settings);

    if !result.success {
        return Err(rejection_error(
            result,
            &source,
            &options.path,
            options.dry_run,
            options.home_override,
        ));
    }

    let counts = counts_from_report(&result.report);
    let incoming = result.indicators_data.clone().unwrap_or_default();
    let vendors = result.vendors_data.clone().unwrap_or_default();

    let setup = load_setup(options.home_override)?;
    let mut store = Store::open(&setup)?;

    let (import_id, stored_years, message) = if options.dry_run {
        let existing = store.load_indicators()?;
        let preview = merge_indicators(&existing, &incoming, options.merge_mode);
        (
            None,
            preview.keys().copied().collect::<Vec<i32>>(),
            "Validation passed. Nothing was written.".to_string(),
        )
    } else {
        let committed = store.save_import(
            &incoming,
            vendors,
            options.merge_mode,
            &RunInput {
                message: &result.message,
                indicator_rows: counts.indicator_rows,
                vendor_rows: counts.vendor_rows,
                duplicates_dropped: counts.duplicates_dropped,
                source_kind: Some(source.kind.as_str()),
                source_ref: source.source_ref.as_deref(),
            },
        )?;
        (
            Some(committed.import_id),
            committed.indicators.keys().copied().collect::<Vec<i32>>(),
            result.message.clone(),
        )
    };

    let next_step = if options.dry_run {
        ImportNextStep {
            label: "Commit this import".to_string(),
            command: format!("tradeboard import create {}", options.path),
        }
    } else {
        ImportNextStep {
            label: "Review the month".to_string(),
            command: "tradeboard indicators show".to_string(),
        }
    };

    success(
        "import",
        ImportData {
            dry_run: options.dry_run,
            path: options.path,
            import_id,
            merge_mode: options.merge_mode,
            message,
            counts,
            stored_years,
            next_step,
            result,
        },
    )
}

pub fn list() -> ClientResult<SuccessEnvelope> {
    list_with_options(ImportListOptions::default())
}

#[doc(hidden)]
pub fn list_with_options(options: ImportListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let setup = load_setup(options.home_override)?;
    let store = Store::open(&setup)?;
    let rows = store.list_import_runs()?;
    success("import list", ImportListData { rows })
}

fn rejection_error(
    result: ImportResult,
    source: &ResolvedSource,
    path: &str,
    dry_run: bool,
    home_override: Option<&Path>,
) -> ClientError {
    let import_id = if dry_run {
        None
    } else {
        record_rejection(&result, source, home_override)
    };

    let structural = result.report.structural.is_some();
    let message = result.message.clone();
    let data = ImportRejectionData {
        dry_run,
        path: path.to_string(),
        import_id,
        issues: issues_from_report(&result.report),
        result,
        help_command: IMPORT_HELP_COMMAND.to_string(),
    };

    let value = match serde_json::to_value(data) {
        Ok(value) => value,
        Err(error) => return ClientError::internal_serialization(&error.to_string()),
    };

    if structural {
        ClientError::workbook_unreadable(&message, value)
    } else {
        ClientError::import_rejected(&message, value)
    }
}

/// A store failure here must not mask the rejection itself, so it is logged
/// and the run goes unrecorded.
fn record_rejection(
    result: &ImportResult,
    source: &ResolvedSource,
    home_override: Option<&Path>,
) -> Option<String> {
    let counts = counts_from_report(&result.report);
    let recorded = load_setup(home_override)
        .and_then(|setup| Store::open(&setup))
        .and_then(|mut store| {
            store.record_rejected_import(&RunInput {
                message: &result.message,
                indicator_rows: counts.indicator_rows,
                vendor_rows: counts.vendor_rows,
                duplicates_dropped: counts.duplicates_dropped,
                source_kind: Some(source.kind.as_str()),
                source_ref: source.source_ref.as_deref(),
            })
        });

    match recorded {
        Ok(import_id) => Some(import_id),
        Err(error) => {
            tracing::warn!(code = %error.code, %error, "could not record rejected import");
            None
        }
    }
}

fn counts_from_report(report: &ImportReport) -> ImportCounts {
    ImportCounts {
        indicator_rows: report.indicator_rows,
        vendor_rows: report.vendor_rows,
        duplicates_dropped: report.duplicates_dropped,
        blank_rows_skipped: report.blank_rows_skipped,
    }
}

pub(crate) fn issues_from_report(report: &ImportReport) -> Vec<ImportIssue> {
    if let Some(error) = &report.structural {
        return vec![ImportIssue {
            sheet: None,
            code: error.code().to_string(),
            line: None,
            message: error.to_string(),
        }];
    }

    report
        .failures
        .iter()
        .map(|failure| ImportIssue {
            sheet: Some(failure.sheet),
            code: failure.error.code().to_string(),
            line: failure.error.line(),
            message: failure.error.to_string(),
        })
        .collect()
}
