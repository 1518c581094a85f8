use crate::dataset::Dataset;
use crate::models::*;

/// Create a CaseRecord with the given fields and no vaccinations.
pub(crate) fn case(
    country: &str,
    code: Option<&str>,
    region: &str,
    year: i32,
    month: u32,
    new_cases: f64,
    new_deaths: f64,
) -> CaseRecord {
    CaseRecord {
        country: country.to_string(),
        country_code: code.map(str::to_string),
        who_region: region.to_string(),
        year,
        month,
        new_cases,
        new_deaths,
        persons_fully_vaccinated: 0.0,
    }
}

/// Create case records spanning 2020 and 2021 and six WHO regions.
///
/// Regions first appear in the order AFRO, AMRO, WPRO, EURO, EMRO, SEARO. EMRO has no 2021 rows.
/// Kosovo has no country code.
pub(crate) fn get_test_cases() -> Vec<CaseRecord> {
    let vaccinated = |mut record: CaseRecord, persons: f64| {
        record.persons_fully_vaccinated = persons;
        record
    };
    vec![
        vaccinated(
            case("Nigeria", Some("NGA"), "AFRO", 2021, 1, 100.0, 1.0),
            1_000_000.0,
        ),
        vaccinated(
            case("Nigeria", Some("NGA"), "AFRO", 2021, 1, 200.0, 2.0),
            500_000.0,
        ),
        case("Kenya", Some("KEN"), "AFRO", 2021, 3, 300.0, 3.0),
        vaccinated(
            case("Brazil", Some("BRA"), "AMRO", 2021, 1, 1_000_000.0, 10_000.0),
            2_000_000.0,
        ),
        vaccinated(
            case("Japan", Some("JPN"), "WPRO", 2021, 2, 50_000.0, 500.0),
            3_000_000.0,
        ),
        case("France", Some("FRA"), "EURO", 2020, 12, 400_000.0, 4_000.0),
        vaccinated(
            case("France", Some("FRA"), "EURO", 2021, 1, 250_000.0, 2_500.0),
            1_500_000.0,
        ),
        case("Kosovo", None, "EURO", 2021, 2, 1_000.0, 10.0),
        case("Egypt", Some("EGY"), "EMRO", 2020, 11, 5_000.0, 250.0),
        vaccinated(
            case("India", Some("IND"), "SEARO", 2021, 3, 2_000_000.0, 20_000.0),
            4_000_000.0,
        ),
    ]
}

/// Create twelve vaccination ranking rows, not in ranking order.
///
/// Country `C{n}` has `n * 100` total and `n * 50` fully vaccinated persons.
pub(crate) fn get_test_vaccinations() -> Vec<VaccinationRankRow> {
    [3, 11, 1, 7, 12, 5, 9, 2, 10, 4, 8, 6]
        .into_iter()
        .map(|n| VaccinationRankRow {
            country: format!("C{n}"),
            total_vaccinated: f64::from(n * 100),
            fully_vaccinated: f64::from(n * 50),
        })
        .collect()
}

/// Create a Dataset from the test cases and vaccinations.
pub(crate) fn get_test_dataset() -> Dataset {
    Dataset::new(get_test_cases(), get_test_vaccinations())
}
