use serde::Serialize;

use crate::import::{ImportResult, SheetKind};
use crate::merge::MergeMode;
use crate::model::{MetaReal, Team, VendorMetric};
use crate::scorecard::{ChartTotal, MetricScore, TeamTotals};
use crate::store::ImportRun;
use crate::summary::{MonthSummary, MonthTotal};

/// One reason an import was rejected.
#[derive(Debug, Clone, Serialize)]
pub struct ImportIssue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<SheetKind>,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportCounts {
    pub indicator_rows: usize,
    pub vendor_rows: usize,
    pub duplicates_dropped: usize,
    pub blank_rows_skipped: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportNextStep {
    pub label: String,
    pub command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportData {
    pub dry_run: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub merge_mode: MergeMode,
    pub message: String,
    pub counts: ImportCounts,
    /// Years present in the stored indicators after this import (or, for a
    /// dry run, after it would be applied).
    pub stored_years: Vec<i32>,
    pub next_step: ImportNextStep,
    pub result: ImportResult,
}

/// Carried in the error data of a rejected import.
#[derive(Debug, Clone, Serialize)]
pub struct ImportRejectionData {
    pub dry_run: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_id: Option<String>,
    pub issues: Vec<ImportIssue>,
    pub result: ImportResult,
    pub help_command: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportListData {
    pub rows: Vec<ImportRun>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorsData {
    pub year: i32,
    /// 1-based.
    pub month: u8,
    pub summary: MonthSummary,
    pub monthly_totals: Vec<MonthTotal>,
    pub available_years: Vec<i32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndicatorUpdateData {
    pub year: i32,
    pub month: u8,
    pub updated: Vec<String>,
    pub summary: MonthSummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorMetricRow {
    pub metric: VendorMetric,
    pub label: String,
    pub score: MetricScore,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorScoreRow {
    pub name: String,
    pub team: Team,
    pub area: String,
    pub metrics: Vec<VendorMetricRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamScoreRow {
    pub totals: TeamTotals,
    pub metrics: Vec<VendorMetricRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct VendorsData {
    pub year: i32,
    pub month: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<Team>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    pub rows: Vec<VendorScoreRow>,
    pub teams: Vec<TeamScoreRow>,
    pub chart: Vec<ChartTotal>,
    pub overall: MetaReal,
    pub overall_percentage: u32,
    pub areas: Vec<String>,
    pub available_years: Vec<i32>,
    pub available_months: Vec<u8>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateData {
    pub path: String,
    pub bytes_written: usize,
    pub sheets: Vec<String>,
}
