use std::path::Path;

use crate::commands::common::{load_setup, today, validate_month};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{IndicatorUpdateData, IndicatorsData};
use crate::model::IndicatorKey;
use crate::store::Store;
use crate::summary::{month_summary, monthly_totals, set_indicator, set_month_total};
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct IndicatorsOptions<'a> {
    pub home_override: Option<&'a Path>,
}

pub fn show(year: Option<i32>, month: Option<u8>) -> ClientResult<SuccessEnvelope> {
    show_with_options(year, month, IndicatorsOptions::default())
}

/// Month summary plus the year's monthly totals. Missing year or month
/// default to today.
#[doc(hidden)]
pub fn show_with_options(
    year: Option<i32>,
    month: Option<u8>,
    options: IndicatorsOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let (current_year, current_month) = today();
    let year = year.unwrap_or(current_year);
    let month = validate_month(month.unwrap_or(current_month), "indicators show")?;

    let setup = load_setup(options.home_override)?;
    let store = Store::open(&setup)?;
    let indicators = store.load_indicators()?;

    let mut available_years = indicators.keys().copied().collect::<Vec<i32>>();
    available_years.reverse();

    success(
        "indicators show",
        IndicatorsData {
            year,
            month,
            summary: month_summary(&indicators, year, month - 1),
            monthly_totals: monthly_totals(&indicators, year),
            available_years,
        },
    )
}

pub fn set_value(key: &str, value: u32, year: i32, month: u8) -> ClientResult<SuccessEnvelope> {
    set_value_with_options(key, value, year, month, IndicatorsOptions::default())
}

#[doc(hidden)]
pub fn set_value_with_options(
    key: &str,
    value: u32,
    year: i32,
    month: u8,
    options: IndicatorsOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let Some(indicator) = IndicatorKey::parse(key) else {
        return Err(ClientError::invalid_argument_for_command(
            &format!("Unknown indicator `{key}`. Use one of: itb, pdv, fachada, pitstop, academia."),
            Some("indicators set"),
        ));
    };
    let month = validate_month(month, "indicators set")?;

    let setup = load_setup(options.home_override)?;
    let mut store = Store::open(&setup)?;
    let mut indicators = store.load_indicators()?;
    set_indicator(&mut indicators, year, month - 1, indicator, value);
    store.save_indicators(&indicators)?;
    tracing::info!(year, month, key = indicator.as_str(), value, "indicator updated");

    success(
        "indicators set",
        IndicatorUpdateData {
            year,
            month,
            updated: vec![indicator.as_str().to_string()],
            summary: month_summary(&indicators, year, month - 1),
        },
    )
}

pub fn set_total(total: u32, year: i32, month: u8) -> ClientResult<SuccessEnvelope> {
    set_total_with_options(total, year, month, IndicatorsOptions::default())
}

#[doc(hidden)]
pub fn set_total_with_options(
    total: u32,
    year: i32,
    month: u8,
    options: IndicatorsOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let month = validate_month(month, "indicators set-total")?;

    let setup = load_setup(options.home_override)?;
    let mut store = Store::open(&setup)?;
    let mut indicators = store.load_indicators()?;
    set_month_total(&mut indicators, year, month - 1, total);
    store.save_indicators(&indicators)?;
    tracing::info!(year, month, total, "month total distributed");

    success(
        "indicators set-total",
        IndicatorUpdateData {
            year,
            month,
            updated: IndicatorKey::ALL
                .iter()
                .map(|key| key.as_str().to_string())
                .collect(),
            summary: month_summary(&indicators, year, month - 1),
        },
    )
}
