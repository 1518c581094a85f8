//! Loading of the case and vaccination datasets.
//!
//! Both tables are read once at startup and are immutable afterwards. A [Dataset] is shared by
//! reference with every figure computation.

use crate::error::DashboardError;
use crate::models::{CaseRecord, VaccinationRankRow, MAX_YEAR, MIN_YEAR};

use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{event, Level};

/// A row of the case CSV file, using the column names of the source file.
#[derive(Debug, Deserialize)]
struct CaseCsvRow {
    #[serde(rename = "country_x")]
    country: String,
    #[serde(rename = "country_clean")]
    country_code: Option<String>,
    #[serde(rename = "who_region_x")]
    who_region: String,
    year: i32,
    month: u32,
    new_cases: Option<f64>,
    new_deaths: Option<f64>,
    persons_fully_vaccinated: Option<f64>,
}

impl From<CaseCsvRow> for CaseRecord {
    fn from(row: CaseCsvRow) -> Self {
        Self {
            country: row.country,
            country_code: row.country_code.filter(|code| !code.is_empty()),
            who_region: row.who_region,
            year: row.year,
            month: row.month,
            new_cases: row.new_cases.unwrap_or_default(),
            new_deaths: row.new_deaths.unwrap_or_default(),
            persons_fully_vaccinated: row.persons_fully_vaccinated.unwrap_or_default(),
        }
    }
}

/// A row of the vaccination ranking CSV file.
///
/// The file carries other columns and trailing rows without a ranking entry.
#[derive(Debug, Deserialize)]
struct VaccinationCsvRow {
    #[serde(rename = "top10")]
    country: Option<String>,
    #[serde(rename = "total_10")]
    total_vaccinated: Option<f64>,
    #[serde(rename = "fullly_10")]
    fully_vaccinated: Option<f64>,
}

/// The loaded, immutable tables plus indexes derived from them.
#[derive(Debug)]
pub struct Dataset {
    cases: Vec<CaseRecord>,
    vaccinations: Vec<VaccinationRankRow>,
    /// Distinct years, ascending.
    years: Vec<i32>,
    /// Distinct WHO regions in order of first appearance.
    regions: Vec<String>,
    /// Raw country name to normalized country code.
    country_codes: HashMap<String, String>,
}

impl Dataset {
    /// Build a dataset from already parsed tables.
    ///
    /// [read_cases] never returns an empty case table, so a loaded dataset always has a year to
    /// select.
    pub fn new(cases: Vec<CaseRecord>, vaccinations: Vec<VaccinationRankRow>) -> Self {
        let years = cases
            .iter()
            .map(|record| record.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let mut regions: Vec<String> = vec![];
        let mut country_codes = HashMap::new();
        for record in &cases {
            if !regions.contains(&record.who_region) {
                regions.push(record.who_region.clone());
            }
            if let Some(code) = &record.country_code {
                country_codes
                    .entry(record.country.clone())
                    .or_insert_with(|| code.clone());
            }
        }
        Self {
            cases,
            vaccinations,
            years,
            regions,
            country_codes,
        }
    }

    /// All case records, in file order.
    pub fn cases(&self) -> &[CaseRecord] {
        &self.cases
    }

    /// All vaccination ranking rows, in file order.
    pub fn vaccinations(&self) -> &[VaccinationRankRow] {
        &self.vaccinations
    }

    /// Distinct years present in the case table, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// The year selected when none is given: the latest one.
    pub fn default_year(&self) -> i32 {
        self.years.last().copied().unwrap_or_default()
    }

    /// Whether any case record falls in `year`.
    pub fn contains_year(&self, year: i32) -> bool {
        self.years.binary_search(&year).is_ok()
    }

    /// Distinct WHO region codes in order of first appearance in the case table.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Normalized country code for a raw country name.
    pub fn country_code(&self, country: &str) -> Option<&str> {
        self.country_codes.get(country).map(String::as_str)
    }
}

/// Read case records from CSV data.
///
/// Returns an error for a table without records, and for a record that violates the data model,
/// naming the file line the record starts on.
///
/// # Arguments
///
/// * `reader`: Source of CSV data with a header row
/// * `path`: Name of the source, used in error messages
pub fn read_cases<R: Read>(reader: R, path: &str) -> Result<Vec<CaseRecord>, DashboardError> {
    let parse_error = |source: csv::Error| DashboardError::DataParse {
        path: path.to_string(),
        source,
    };
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers = csv_reader.headers().map_err(parse_error)?.clone();
    let mut records = vec![];
    for result in csv_reader.records() {
        let record = result.map_err(parse_error)?;
        // Quoted fields may span lines, so take the line from the reader.
        let line = record.position().map_or(0, |position| position.line());
        let row: CaseCsvRow = record.deserialize(Some(&headers)).map_err(parse_error)?;
        let invalid = |reason: String| DashboardError::InvalidRecord {
            path: path.to_string(),
            line,
            reason,
        };
        if !(MIN_YEAR..=MAX_YEAR).contains(&row.year) {
            return Err(invalid(format!(
                "year {} is not between {} and {}",
                row.year, MIN_YEAR, MAX_YEAR
            )));
        }
        if !(1..=12).contains(&row.month) {
            return Err(invalid(format!(
                "month {} is not between 1 and 12",
                row.month
            )));
        }
        if row.country.is_empty() {
            return Err(invalid("country is empty".to_string()));
        }
        if row.who_region.is_empty() {
            return Err(invalid("WHO region is empty".to_string()));
        }
        records.push(CaseRecord::from(row));
    }
    if records.is_empty() {
        return Err(DashboardError::EmptyDataset {
            path: path.to_string(),
        });
    }
    Ok(records)
}

/// Read vaccination ranking rows from CSV data.
///
/// Rows without a country are skipped. Missing numbers count as zero.
///
/// # Arguments
///
/// * `reader`: Source of CSV data with a header row
/// * `path`: Name of the source, used in error messages
pub fn read_vaccinations<R: Read>(
    reader: R,
    path: &str,
) -> Result<Vec<VaccinationRankRow>, DashboardError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut rows = vec![];
    for result in csv_reader.deserialize::<VaccinationCsvRow>() {
        let row = result.map_err(|source| DashboardError::DataParse {
            path: path.to_string(),
            source,
        })?;
        let Some(country) = row.country.filter(|country| !country.is_empty()) else {
            continue;
        };
        rows.push(VaccinationRankRow {
            country,
            total_vaccinated: row.total_vaccinated.unwrap_or_default(),
            fully_vaccinated: row.fully_vaccinated.unwrap_or_default(),
        });
    }
    Ok(rows)
}

fn open(path: &Path) -> Result<File, DashboardError> {
    File::open(path).map_err(|source| DashboardError::DataFileOpen {
        path: path.display().to_string(),
        source,
    })
}

/// Load both datasets from CSV files.
///
/// # Arguments
///
/// * `cases_path`: Path to the case, death and vaccination by country and month table
/// * `vaccinations_path`: Path to the vaccination ranking table
pub fn load(cases_path: &Path, vaccinations_path: &Path) -> Result<Dataset, DashboardError> {
    let cases_name = cases_path.display().to_string();
    let cases = read_cases(open(cases_path)?, &cases_name)?;
    let vaccinations_name = vaccinations_path.display().to_string();
    let vaccinations = read_vaccinations(open(vaccinations_path)?, &vaccinations_name)?;
    let dataset = Dataset::new(cases, vaccinations);
    event!(
        Level::INFO,
        cases = dataset.cases().len(),
        vaccinations = dataset.vaccinations().len(),
        years = ?dataset.years(),
        regions = ?dataset.regions(),
        "loaded datasets"
    );
    Ok(dataset)
}
