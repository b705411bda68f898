//! Per-vendor scorecard math: attainment, deviation and the traffic light.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{MetaReal, Team, VendorMetric, VendorRecord};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrafficLight {
    Green,
    Yellow,
    Red,
}

impl TrafficLight {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
        }
    }
}

/// Attainment in whole percent. With no meta, any positive real counts as
/// full attainment.
pub fn percentage(real: u32, meta: u32) -> u32 {
    if meta == 0 {
        return if real > 0 { 100 } else { 0 };
    }
    (f64::from(real) / f64::from(meta) * 100.0).round() as u32
}

pub fn deviation(real: u32, meta: u32) -> i64 {
    i64::from(real) - i64::from(meta)
}

pub fn traffic_light(percentage: u32, deviation: i64) -> TrafficLight {
    if percentage >= 100 {
        TrafficLight::Green
    } else if percentage >= 80 || deviation >= 0 {
        TrafficLight::Yellow
    } else {
        TrafficLight::Red
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct MetricScore {
    pub meta: u32,
    pub real: u32,
    pub percentage: u32,
    pub deviation: i64,
    pub light: TrafficLight,
}

impl MetricScore {
    pub fn from_pair(pair: MetaReal) -> Self {
        let percentage = percentage(pair.real, pair.meta);
        let deviation = deviation(pair.real, pair.meta);
        Self {
            meta: pair.meta,
            real: pair.real,
            percentage,
            deviation,
            light: traffic_light(percentage, deviation),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamTotals {
    pub team: Team,
    pub pdv: MetaReal,
    pub fachadas: MetaReal,
    pub pit_stop: MetaReal,
    pub academia: MetaReal,
}

impl TeamTotals {
    pub fn metric(&self, metric: VendorMetric) -> MetaReal {
        match metric {
            VendorMetric::Pdv => self.pdv,
            VendorMetric::Fachadas => self.fachadas,
            VendorMetric::PitStop => self.pit_stop,
            VendorMetric::Academia => self.academia,
        }
    }
}

fn sum_metric<'a, I>(vendors: I, metric: VendorMetric) -> MetaReal
where
    I: IntoIterator<Item = &'a VendorRecord>,
{
    vendors
        .into_iter()
        .fold(MetaReal::default(), |acc, vendor| {
            let pair = vendor.metric(metric);
            MetaReal::new(acc.meta + pair.meta, acc.real + pair.real)
        })
}

pub fn team_totals(vendors: &[VendorRecord], team: Team) -> TeamTotals {
    let members = || vendors.iter().filter(move |vendor| vendor.team == team);
    TeamTotals {
        team,
        pdv: sum_metric(members(), VendorMetric::Pdv),
        fachadas: sum_metric(members(), VendorMetric::Fachadas),
        pit_stop: sum_metric(members(), VendorMetric::PitStop),
        academia: sum_metric(members(), VendorMetric::Academia),
    }
}

/// Selection over vendor rows. `None` on team or area means all.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct VendorFilter {
    pub team: Option<Team>,
    pub area: Option<String>,
    pub month: u8,
    pub year: i32,
}

pub fn filter_vendors(vendors: &[VendorRecord], filter: &VendorFilter) -> Vec<VendorRecord> {
    vendors
        .iter()
        .filter(|vendor| filter.team.is_none_or(|team| vendor.team == team))
        .filter(|vendor| {
            filter
                .area
                .as_deref()
                .is_none_or(|area| vendor.area == area)
        })
        .filter(|vendor| vendor.month == filter.month && vendor.year == filter.year)
        .cloned()
        .collect()
}

/// Distinct areas in first-seen order.
pub fn unique_areas(vendors: &[VendorRecord]) -> Vec<String> {
    let mut areas: Vec<String> = Vec::new();
    for vendor in vendors {
        if !areas.contains(&vendor.area) {
            areas.push(vendor.area.clone());
        }
    }
    areas
}

/// Years present in the data, newest first.
pub fn available_years(vendors: &[VendorRecord]) -> Vec<i32> {
    let years = vendors
        .iter()
        .map(|vendor| vendor.year)
        .collect::<BTreeSet<i32>>();
    years.into_iter().rev().collect()
}

pub fn available_months(vendors: &[VendorRecord]) -> Vec<u8> {
    let months = vendors
        .iter()
        .map(|vendor| vendor.month)
        .collect::<BTreeSet<u8>>();
    months.into_iter().collect()
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ChartTotal {
    pub metric: VendorMetric,
    pub name: String,
    pub meta: u32,
    pub real: u32,
}

/// Summed meta and real per sub-indicator, for the vendors given.
pub fn chart_totals(vendors: &[VendorRecord]) -> Vec<ChartTotal> {
    VendorMetric::ALL
        .iter()
        .map(|metric| {
            let pair = sum_metric(vendors, *metric);
            ChartTotal {
                metric: *metric,
                name: metric.label().to_string(),
                meta: pair.meta,
                real: pair.real,
            }
        })
        .collect()
}
