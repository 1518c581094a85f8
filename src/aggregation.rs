//! Aggregations over the case and vaccination tables.
//!
//! Each aggregation is a pure function of the [Dataset] and, for most, the selected year: filter,
//! group, sum and derive a display label. A year without data yields an empty result (or, for
//! indicators, zeros), never an error.

use crate::dataset::Dataset;
use crate::models::{CaseRecord, Measure};

use std::collections::BTreeMap;

/// Number of countries kept by [top_vaccinated].
pub const TOP_COUNT: usize = 10;

/// Returns the case records of the selected year.
pub fn filter_year(dataset: &Dataset, year: i32) -> impl Iterator<Item = &CaseRecord> {
    dataset
        .cases()
        .iter()
        .filter(move |record| record.year == year)
}

/// Formats a value in millions with one decimal, e.g. `1.3M`.
///
/// Ties round to even: 450 000 is `0.4M`, 350 000 is also `0.4M`.
pub fn millions_label(value: f64) -> String {
    format!("{:.1}M", round_one_decimal(value / 1_000_000.0))
}

// Scale then round half to even, so ties do not depend on the binary expansion of the value.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// New cases of a region, with deaths expressed as a delta reference.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionIndicator {
    pub region: String,
    /// Summed new cases
    pub value: f64,
    /// Summed new cases minus summed new deaths
    pub reference: f64,
}

/// Returns the indicator of one WHO region for the selected year.
///
/// A region without rows in that year yields zeros.
pub fn regional_indicator(dataset: &Dataset, year: i32, region: &str) -> RegionIndicator {
    let (cases, deaths) = filter_year(dataset, year)
        .filter(|record| record.who_region == region)
        .fold((0.0, 0.0), |(cases, deaths), record| {
            (cases + record.new_cases, deaths + record.new_deaths)
        });
    let value = round_one_decimal(cases);
    RegionIndicator {
        region: region.to_string(),
        value,
        reference: value - round_one_decimal(deaths),
    }
}

/// Returns the indicator of every WHO region for the selected year.
///
/// Regions are ordered by first appearance in the case table.
pub fn regional_indicators(dataset: &Dataset, year: i32) -> Vec<RegionIndicator> {
    dataset
        .regions()
        .iter()
        .map(|region| regional_indicator(dataset, year, region))
        .collect()
}

/// Fully vaccinated persons of a region.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionShare {
    pub region: String,
    pub fully_vaccinated: f64,
    pub label: String,
}

/// Returns fully vaccinated persons per WHO region for the selected year, ordered by region.
pub fn vaccination_share(dataset: &Dataset, year: i32) -> Vec<RegionShare> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in filter_year(dataset, year) {
        *totals.entry(record.who_region.as_str()).or_default() += record.persons_fully_vaccinated;
    }
    totals
        .into_iter()
        .map(|(region, fully_vaccinated)| RegionShare {
            region: region.to_string(),
            fully_vaccinated,
            label: millions_label(fully_vaccinated),
        })
        .collect()
}

/// New cases of a country, joined with its normalized code.
#[derive(Clone, Debug, PartialEq)]
pub struct CountryCases {
    pub country: String,
    /// `None` when no code is known for the country.
    pub code: Option<String>,
    pub new_cases: f64,
    pub label: String,
}

/// Returns new cases per country for the selected year, ordered by country name.
///
/// This is a left join against the country code lookup: countries without a code are kept.
pub fn case_map(dataset: &Dataset, year: i32) -> Vec<CountryCases> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for record in filter_year(dataset, year) {
        *totals.entry(record.country.as_str()).or_default() += record.new_cases;
    }
    totals
        .into_iter()
        .map(|(country, new_cases)| CountryCases {
            country: country.to_string(),
            code: dataset.country_code(country).map(str::to_string),
            new_cases,
            label: format!(
                "{} - Total New Cases : {}",
                country,
                millions_label(new_cases)
            ),
        })
        .collect()
}

/// A country of the vaccination ranking.
#[derive(Clone, Debug, PartialEq)]
pub struct RankedVaccination {
    /// 1-based rank by total vaccinations
    pub rank: usize,
    pub country: String,
    pub total_vaccinated: f64,
    pub fully_vaccinated: f64,
}

/// Returns the [TOP_COUNT] countries with the most vaccinations, best first.
///
/// Independent of the selected year. Ties keep file order.
pub fn top_vaccinated(dataset: &Dataset) -> Vec<RankedVaccination> {
    let mut rows: Vec<_> = dataset.vaccinations().iter().collect();
    rows.sort_by(|a, b| b.total_vaccinated.total_cmp(&a.total_vaccinated));
    rows.into_iter()
        .take(TOP_COUNT)
        .enumerate()
        .map(|(index, row)| RankedVaccination {
            rank: index + 1,
            country: row.country.clone(),
            total_vaccinated: row.total_vaccinated,
            fully_vaccinated: row.fully_vaccinated,
        })
        .collect()
}

/// A monthly total.
#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyPoint {
    pub month: u32,
    pub value: f64,
    pub label: String,
}

/// Returns the monthly totals of a measure for the selected year, ordered by month.
///
/// Only months with data are present; gaps are not filled.
pub fn monthly_totals(dataset: &Dataset, year: i32, measure: Measure) -> Vec<MonthlyPoint> {
    let mut totals: BTreeMap<u32, f64> = BTreeMap::new();
    for record in filter_year(dataset, year) {
        *totals.entry(record.month).or_default() += measure.of(record);
    }
    totals
        .into_iter()
        .map(|(month, value)| MonthlyPoint {
            month,
            value,
            label: millions_label(value),
        })
        .collect()
}
