//! Aggregate indicator views and inline edits over [`IndicatorYears`].

use serde::Serialize;

use crate::model::{IndicatorKey, IndicatorRecord, IndicatorYears};

pub const META_TOTAL: u32 = 100;

/// Performance at or above this share of the meta counts as on target.
pub const PASS_LINE_PCT: u32 = 80;

pub const MONTH_LABELS: [&str; 12] = [
    "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
];

pub const MONTH_NAMES: [&str; 12] = [
    "Janeiro",
    "Fevereiro",
    "Março",
    "Abril",
    "Maio",
    "Junho",
    "Julho",
    "Agosto",
    "Setembro",
    "Outubro",
    "Novembro",
    "Dezembro",
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorScore {
    pub key: IndicatorKey,
    pub name: String,
    pub value: u32,
    pub target: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthSummary {
    pub year: i32,
    /// Zero-based month index.
    pub month: u8,
    pub month_name: String,
    pub indicators: Vec<IndicatorScore>,
    pub total: u64,
    pub meta_total: u32,
    pub performance_pct: u32,
    pub on_target: bool,
    pub evolucao: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthTotal {
    pub month: String,
    pub value: u64,
}

fn month_record(years: &IndicatorYears, year: i32, month0: u8) -> IndicatorRecord {
    years
        .get(&year)
        .and_then(|months| months.get(&month0))
        .cloned()
        .unwrap_or_default()
}

/// Scores against targets for one month. A month without data reads as zeros.
pub fn month_summary(years: &IndicatorYears, year: i32, month0: u8) -> MonthSummary {
    let record = month_record(years, year, month0);
    let indicators = IndicatorKey::ALL
        .iter()
        .map(|key| IndicatorScore {
            key: *key,
            name: key.display_name().to_string(),
            value: record.score(*key),
            target: key.target(),
        })
        .collect::<Vec<IndicatorScore>>();

    let total = record.total();
    let performance_pct = (total as f64 / f64::from(META_TOTAL) * 100.0).round() as u32;

    MonthSummary {
        year,
        month: month0,
        month_name: MONTH_NAMES
            .get(usize::from(month0))
            .map(|name| name.to_string())
            .unwrap_or_default(),
        indicators,
        total,
        meta_total: META_TOTAL,
        performance_pct,
        on_target: performance_pct >= PASS_LINE_PCT,
        evolucao: record.evolucao,
    }
}

/// Five-score totals for each month of `year`, January first.
pub fn monthly_totals(years: &IndicatorYears, year: i32) -> Vec<MonthTotal> {
    MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(index, label)| MonthTotal {
            month: label.to_string(),
            value: month_record(years, year, index as u8).total(),
        })
        .collect()
}

pub fn set_indicator(
    years: &mut IndicatorYears,
    year: i32,
    month0: u8,
    key: IndicatorKey,
    value: u32,
) {
    years
        .entry(year)
        .or_default()
        .entry(month0)
        .or_default()
        .set_score(key, value);
}

/// Spreads `total` evenly over the five indicators; the remainder goes one
/// point at a time to the earliest keys.
pub fn set_month_total(years: &mut IndicatorYears, year: i32, month0: u8, total: u32) {
    let parts = IndicatorKey::ALL.len() as u32;
    let base = total / parts;
    let remainder = total % parts;

    let record = years.entry(year).or_default().entry(month0).or_default();
    for (index, key) in IndicatorKey::ALL.iter().enumerate() {
        let bonus = u32::from((index as u32) < remainder);
        record.set_score(*key, base + bonus);
    }
}
