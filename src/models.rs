//! Data types and associated functions and methods

use crate::chart::Figure;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use strum_macros::Display;
use validator::Validate;

/// A row of the primary case table
///
/// `(country, year, month)` is not unique in the source data; aggregations always sum.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseRecord {
    /// Raw country name as it appears in the source
    pub country: String,
    /// Normalized (ISO-3) country code used by the map, if known
    pub country_code: Option<String>,
    /// WHO region code, e.g. `AFRO`
    pub who_region: String,
    pub year: i32,
    /// Month of the year, 1 to 12
    pub month: u32,
    pub new_cases: f64,
    pub new_deaths: f64,
    pub persons_fully_vaccinated: f64,
}

/// A row of the static vaccination ranking table
#[derive(Clone, Debug, PartialEq)]
pub struct VaccinationRankRow {
    pub country: String,
    pub total_vaccinated: f64,
    pub fully_vaccinated: f64,
}

/// Measure summed by the monthly line charts
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
#[strum(serialize_all = "snake_case")]
pub enum Measure {
    NewCases,
    NewDeaths,
}

impl Measure {
    /// Returns the value of this measure for a record.
    pub fn of(self, record: &CaseRecord) -> f64 {
        match self {
            Self::NewCases => record.new_cases,
            Self::NewDeaths => record.new_deaths,
        }
    }
}

/// One chart region of the page
///
/// The serialised name doubles as URL path segment, JSON key and page element id.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize,
)]
pub enum FigureId {
    #[serde(rename = "idc_afro")]
    #[strum(serialize = "idc_afro")]
    IndicatorAfro,
    #[serde(rename = "idc_amro")]
    #[strum(serialize = "idc_amro")]
    IndicatorAmro,
    #[serde(rename = "idc_wpro")]
    #[strum(serialize = "idc_wpro")]
    IndicatorWpro,
    #[serde(rename = "idc_euro")]
    #[strum(serialize = "idc_euro")]
    IndicatorEuro,
    #[serde(rename = "idc_emro")]
    #[strum(serialize = "idc_emro")]
    IndicatorEmro,
    #[serde(rename = "vaccination")]
    #[strum(serialize = "vaccination")]
    VaccinationPie,
    #[serde(rename = "map")]
    #[strum(serialize = "map")]
    CaseMap,
    #[serde(rename = "bar_vacc")]
    #[strum(serialize = "bar_vacc")]
    TopVaccinatedBar,
    #[serde(rename = "line_case")]
    #[strum(serialize = "line_case")]
    MonthlyCases,
    #[serde(rename = "line_death")]
    #[strum(serialize = "line_death")]
    MonthlyDeaths,
}

impl FigureId {
    /// Every output recomputed when the selected year changes.
    pub const ALL: [FigureId; 10] = [
        Self::IndicatorAfro,
        Self::IndicatorAmro,
        Self::IndicatorWpro,
        Self::IndicatorEuro,
        Self::IndicatorEmro,
        Self::VaccinationPie,
        Self::CaseMap,
        Self::TopVaccinatedBar,
        Self::MonthlyCases,
        Self::MonthlyDeaths,
    ];

    /// Look up a figure by its serialised name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.to_string() == name)
    }

    /// Whether the figure changes with the selected year.
    pub fn is_year_dependent(self) -> bool {
        !matches!(self, Self::TopVaccinatedBar)
    }
}

/// Earliest selectable year. Case records outside the selectable range are rejected at load.
pub const MIN_YEAR: i32 = 1900;
/// Latest selectable year.
pub const MAX_YEAR: i32 = 2100;

/// Query parameters selecting a year
#[derive(Debug, Default, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct YearQuery {
    /// Selected year. Defaults to the latest year in the data.
    #[validate(range(min = 1900, max = 2100, message = "year must be between 1900 and 2100"))]
    pub year: Option<i32>,
}

/// Response listing the selectable years
#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct YearsResponse {
    pub years: Vec<i32>,
    pub default: i32,
}

/// Response carrying a single chart
#[derive(Debug, Deserialize, Serialize)]
pub struct FigureResponse {
    pub figure: FigureId,
    pub year: i32,
    /// The selection matched no rows; the chart is well-formed but empty.
    pub empty_selection: bool,
    pub chart: Figure,
}

/// Response carrying every chart of the page for one year
#[derive(Debug, Deserialize, Serialize)]
pub struct DashboardResponse {
    pub year: i32,
    pub empty_selection: bool,
    pub figures: BTreeMap<FigureId, Figure>,
}
