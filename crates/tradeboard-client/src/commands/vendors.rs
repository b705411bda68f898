use std::path::Path;

use crate::commands::common::{load_setup, today, validate_month};
use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{TeamScoreRow, VendorMetricRow, VendorScoreRow, VendorsData};
use crate::model::{MetaReal, Team, VendorMetric, VendorRecord};
use crate::scorecard::{
    MetricScore, VendorFilter, available_months, available_years, chart_totals, filter_vendors,
    percentage, team_totals, unique_areas,
};
use crate::store::Store;
use crate::{ClientError, ClientResult};

#[derive(Debug, Default)]
pub struct VendorsShowOptions<'a> {
    pub year: Option<i32>,
    pub month: Option<u8>,
    pub team: Option<String>,
    pub area: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn show(
    year: Option<i32>,
    month: Option<u8>,
    team: Option<String>,
    area: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    show_with_options(VendorsShowOptions {
        year,
        month,
        team,
        area,
        home_override: None,
    })
}

/// Scorecard for one month. Without an explicit year or month the newest
/// period present in the stored vendors is shown.
#[doc(hidden)]
pub fn show_with_options(options: VendorsShowOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let team = match options.team.as_deref() {
        Some(raw) => Some(Team::parse(raw.trim()).ok_or_else(|| {
            ClientError::invalid_argument_for_command(
                &format!("Unknown team `{raw}`. Use Manoel or Wellington."),
                Some("vendors show"),
            )
        })?),
        None => None,
    };

    let setup = load_setup(options.home_override)?;
    let store = Store::open(&setup)?;
    let vendors = store.load_vendors()?;

    let (year, month) = default_period(&vendors, options.year, options.month);
    let month = validate_month(month, "vendors show")?;

    let filter = VendorFilter {
        team,
        area: options.area.clone(),
        month,
        year,
    };
    let selected = filter_vendors(&vendors, &filter);

    let rows = selected
        .iter()
        .map(|vendor| VendorScoreRow {
            name: vendor.name.clone(),
            team: vendor.team,
            area: vendor.area.clone(),
            metrics: metric_rows(|metric| vendor.metric(metric)),
        })
        .collect::<Vec<VendorScoreRow>>();

    let teams = Team::ALL
        .iter()
        .filter(|candidate| team.is_none_or(|wanted| wanted == **candidate))
        .map(|candidate| {
            let totals = team_totals(&selected, *candidate);
            TeamScoreRow {
                metrics: metric_rows(|metric| totals.metric(metric)),
                totals,
            }
        })
        .collect::<Vec<TeamScoreRow>>();

    let chart = chart_totals(&selected);
    let overall = chart.iter().fold(MetaReal::default(), |acc, total| {
        MetaReal::new(acc.meta + total.meta, acc.real + total.real)
    });

    success(
        "vendors show",
        VendorsData {
            year,
            month,
            team,
            area: options.area,
            rows,
            teams,
            overall_percentage: percentage(overall.real, overall.meta),
            overall,
            chart,
            areas: unique_areas(&vendors),
            available_years: available_years(&vendors),
            available_months: available_months(&vendors),
        },
    )
}

fn metric_rows<F>(pair_for: F) -> Vec<VendorMetricRow>
where
    F: Fn(VendorMetric) -> MetaReal,
{
    VendorMetric::ALL
        .iter()
        .map(|metric| VendorMetricRow {
            metric: *metric,
            label: metric.label().to_string(),
            score: MetricScore::from_pair(pair_for(*metric)),
        })
        .collect()
}

fn default_period(vendors: &[VendorRecord], year: Option<i32>, month: Option<u8>) -> (i32, u8) {
    let (current_year, current_month) = today();
    let year = year
        .or_else(|| available_years(vendors).first().copied())
        .unwrap_or(current_year);
    let month = month
        .or_else(|| {
            vendors
                .iter()
                .filter(|vendor| vendor.year == year)
                .map(|vendor| vendor.month)
                .max()
        })
        .unwrap_or(current_month);
    (year, month)
}

#[cfg(test)]
mod tests {
    use super::default_period;
    use crate::model::{MetaReal, Team, VendorRecord};

    fn vendor(month: u8, year: i32) -> VendorRecord {
        VendorRecord {
            name: "Jocimar".to_string(),
            team: Team::Wellington,
            area: "Área 1".to_string(),
            month,
            year,
            pdv: MetaReal::default(),
            fachadas: MetaReal::default(),
            pit_stop: MetaReal::default(),
            academia: MetaReal::default(),
        }
    }

    #[test]
    fn default_period_is_newest_data() {
        let vendors = vec![vendor(3, 2023), vendor(1, 2024), vendor(2, 2024)];
        assert_eq!(default_period(&vendors, None, None), (2024, 2));
        assert_eq!(default_period(&vendors, Some(2023), None), (2023, 3));
        assert_eq!(default_period(&vendors, None, Some(1)), (2024, 1));
    }
}
