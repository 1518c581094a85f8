//! Chart configuration builders.
//!
//! Each builder turns the output of an [aggregation](crate::aggregation) into a declarative
//! [Figure] and implements the [FigureBuilder] trait.

use crate::aggregation;
use crate::chart::*;
use crate::dataset::Dataset;
use crate::models::{FigureId, Measure};

/// Trait for chart configuration builders.
///
/// This forms the contract between the dashboard and the individual charts. Builders are pure:
/// the same dataset and year always produce the same figure.
pub trait FigureBuilder {
    /// Title of the figure, also used for its empty fallback.
    fn title(&self) -> String;

    /// Build the figure.
    ///
    /// # Arguments
    ///
    /// * `dataset`: The loaded tables
    /// * `year`: The selected year
    fn build(&self, dataset: &Dataset, year: i32) -> Figure;
}

impl FigureId {
    /// Returns the builder of this figure.
    ///
    /// Indicator slots are assigned explicitly by WHO region code.
    pub fn builder(self) -> Box<dyn FigureBuilder> {
        match self {
            Self::IndicatorAfro => Box::new(RegionIndicator::new("AFRO")),
            Self::IndicatorAmro => Box::new(RegionIndicator::new("AMRO")),
            Self::IndicatorWpro => Box::new(RegionIndicator::new("WPRO")),
            Self::IndicatorEuro => Box::new(RegionIndicator::new("EURO")),
            Self::IndicatorEmro => Box::new(RegionIndicator::new("EMRO")),
            Self::VaccinationPie => Box::new(VaccinationPie {}),
            Self::CaseMap => Box::new(CaseMap {}),
            Self::TopVaccinatedBar => Box::new(TopVaccinatedBar {}),
            Self::MonthlyCases => Box::new(MonthlyLine::new(Measure::NewCases)),
            Self::MonthlyDeaths => Box::new(MonthlyLine::new(Measure::NewDeaths)),
        }
    }
}

fn margin(l: u32, r: u32, b: Option<u32>, t: Option<u32>) -> Margin {
    Margin {
        l: Some(l),
        r: Some(r),
        b,
        t,
    }
}

/// New cases of one WHO region, with deaths as a "number with delta" indicator.
pub struct RegionIndicator {
    region: &'static str,
}

impl RegionIndicator {
    pub fn new(region: &'static str) -> Self {
        Self { region }
    }
}

impl FigureBuilder for RegionIndicator {
    fn title(&self) -> String {
        self.region.to_string()
    }

    fn build(&self, dataset: &Dataset, year: i32) -> Figure {
        let indicator = aggregation::regional_indicator(dataset, year, self.region);
        let delta_style = |color: &str| DeltaStyle {
            color: color.to_string(),
            symbol: "".to_string(),
        };
        let trace = Indicator {
            mode: "number+delta".to_string(),
            value: indicator.value,
            // Fixed font sizes; plotly.js would otherwise scale them with the region width.
            number: IndicatorNumber {
                font: Font { size: 30 },
            },
            delta: Delta {
                reference: indicator.reference,
                font: Font { size: 20 },
                relative: false,
                increasing: delta_style("#3078b4"),
                decreasing: delta_style("#d13b40"),
                position: "top".to_string(),
            },
            title: Title {
                text: indicator.region,
                font: Some(Font { size: 20 }),
                y: None,
            },
        };
        let layout = Layout {
            height: Some(310),
            ..Default::default()
        };
        Figure::new(vec![Trace::Indicator(trace)], layout)
    }
}

/// Share of fully vaccinated persons by WHO region.
pub struct VaccinationPie {}

impl FigureBuilder for VaccinationPie {
    fn title(&self) -> String {
        "Fully vaccinated".to_string()
    }

    fn build(&self, dataset: &Dataset, year: i32) -> Figure {
        let shares = aggregation::vaccination_share(dataset, year);
        let trace = Pie {
            labels: shares.iter().map(|s| s.region.clone()).collect(),
            values: shares.iter().map(|s| s.fully_vaccinated).collect(),
            name: "".to_string(),
            text: shares.into_iter().map(|s| s.label).collect(),
            textinfo: "label+percent".to_string(),
            hovertemplate: "[%{label}]<br> Vaccinated: %{text}<br> Rate: %{percent}".to_string(),
            insidetextorientation: "tangential".to_string(),
            hole: 0.4,
        };
        let layout = Layout {
            title: Some(Title::new(&self.title())),
            showlegend: Some(false),
            height: Some(330),
            margin: Some(margin(50, 50, Some(10), Some(50))),
            ..Default::default()
        };
        Figure::new(vec![Trace::Pie(trace)], layout)
    }
}

/// World map of new cases by country.
pub struct CaseMap {}

impl FigureBuilder for CaseMap {
    fn title(&self) -> String {
        "New Case Map".to_string()
    }

    fn build(&self, dataset: &Dataset, year: i32) -> Figure {
        let rows = aggregation::case_map(dataset, year);
        let trace = Choropleth {
            locations: rows.iter().map(|r| r.code.clone()).collect(),
            z: rows.iter().map(|r| r.new_cases).collect(),
            text: rows.into_iter().map(|r| r.label).collect(),
            hoverinfo: "text".to_string(),
            colorscale: "Reds".to_string(),
            autocolorscale: false,
            reversescale: false,
            marker: Marker {
                size: None,
                line: Some(Line {
                    color: "darkgray".to_string(),
                    width: 0.5,
                }),
            },
            colorbar: ColorBar {
                title: Title::new("new_cases (M)"),
                thickness: 15,
                len: 1.0,
                x: 1.01,
                ticklen: 10,
            },
        };
        let layout = Layout {
            title: Some(Title::new(&self.title())),
            geo: Some(Geo {
                showframe: false,
                showcoastlines: false,
                projection: Projection {
                    kind: "equirectangular".to_string(),
                },
            }),
            height: Some(800),
            margin: Some(margin(50, 50, Some(20), Some(50))),
            ..Default::default()
        };
        Figure::new(vec![Trace::Choropleth(trace)], layout)
    }
}

/// Grouped horizontal bars of the ten most vaccinated countries.
pub struct TopVaccinatedBar {}

impl FigureBuilder for TopVaccinatedBar {
    fn title(&self) -> String {
        format!("Country (Top {})", aggregation::TOP_COUNT)
    }

    fn build(&self, dataset: &Dataset, _year: i32) -> Figure {
        let ranking = aggregation::top_vaccinated(dataset);
        let countries: Vec<String> = ranking.iter().map(|r| r.country.clone()).collect();
        let total = Bar {
            x: ranking.iter().map(|r| r.total_vaccinated).collect(),
            y: countries.clone(),
            name: "Total Vaccination".to_string(),
            orientation: "h".to_string(),
        };
        let fully = Bar {
            x: ranking.iter().map(|r| r.fully_vaccinated).collect(),
            y: countries,
            name: "Person Fully Vaccinated".to_string(),
            orientation: "h".to_string(),
        };
        let layout = Layout {
            title: Some(Title {
                y: Some(0.8),
                ..Title::new(&self.title())
            }),
            height: Some(500),
            barmode: Some("group".to_string()),
            // Best ranked country at the top.
            yaxis: Some(Axis {
                autorange: Some("reversed".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        Figure::new(vec![Trace::Bar(total), Trace::Bar(fully)], layout)
    }
}

/// Monthly totals of a measure as a line with markers.
pub struct MonthlyLine {
    measure: Measure,
}

impl MonthlyLine {
    pub fn new(measure: Measure) -> Self {
        Self { measure }
    }
}

impl FigureBuilder for MonthlyLine {
    fn title(&self) -> String {
        match self.measure {
            Measure::NewCases => "Monthly Cases",
            Measure::NewDeaths => "Monthly Deaths",
        }
        .to_string()
    }

    fn build(&self, dataset: &Dataset, year: i32) -> Figure {
        let points = aggregation::monthly_totals(dataset, year, self.measure);
        let trace = Scatter {
            x: points.iter().map(|p| p.month).collect(),
            y: points.iter().map(|p| p.value).collect(),
            text: points.into_iter().map(|p| p.label).collect(),
            hovertemplate: "%{text}".to_string(),
            mode: "lines+markers".to_string(),
            marker: Marker {
                size: Some(10),
                line: None,
            },
            name: year.to_string(),
        };
        let layout = Layout {
            title: Some(Title::new(&self.title())),
            // One tick per month starting at January, whichever months have data.
            xaxis: Some(Axis {
                title: Some(Title::new("Month")),
                tickmode: Some("linear".to_string()),
                tick0: Some(1.0),
                dtick: Some(1.0),
                showgrid: Some(false),
                autorange: None,
            }),
            legend: Some(Legend {
                orientation: "h".to_string(),
                xanchor: "center".to_string(),
                x: 0.5,
                yanchor: "bottom".to_string(),
                y: -1.0,
            }),
            height: Some(300),
            margin: Some(margin(50, 10, None, None)),
            ..Default::default()
        };
        Figure::new(vec![Trace::Scatter(trace)], layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::test_utils;

    use serde_json::json;

    fn only_trace(figure: &Figure) -> &Trace {
        assert_eq!(1, figure.data.len());
        &figure.data[0]
    }

    #[test]
    fn indicator_slots_by_region_code() {
        let dataset = test_utils::get_test_dataset();
        let slots = [
            (FigureId::IndicatorAfro, "AFRO", 600.0, 594.0),
            (FigureId::IndicatorAmro, "AMRO", 1_000_000.0, 990_000.0),
            (FigureId::IndicatorWpro, "WPRO", 50_000.0, 49_500.0),
            (FigureId::IndicatorEuro, "EURO", 251_000.0, 248_490.0),
            (FigureId::IndicatorEmro, "EMRO", 0.0, 0.0),
        ];
        for (id, region, value, reference) in slots {
            let builder = id.builder();
            assert_eq!(region, builder.title());
            let figure = builder.build(&dataset, 2021);
            match only_trace(&figure) {
                Trace::Indicator(indicator) => {
                    assert_eq!(region, indicator.title.text);
                    assert_eq!(value, indicator.value);
                    assert_eq!(reference, indicator.delta.reference);
                    assert_eq!("number+delta", indicator.mode);
                }
                trace => panic!("unexpected trace {:?}", trace),
            }
            assert_eq!(Some(310), figure.layout.height);
        }
    }

    #[test]
    fn indicator_json() {
        let dataset = test_utils::get_test_dataset();
        let figure = RegionIndicator::new("AFRO").build(&dataset, 2021);
        let value = serde_json::to_value(&figure).unwrap();
        assert_eq!(
            json!({
                "type": "indicator",
                "mode": "number+delta",
                "value": 600.0,
                "number": {"font": {"size": 30}},
                "delta": {
                    "reference": 594.0,
                    "font": {"size": 20},
                    "relative": false,
                    "increasing": {"color": "#3078b4", "symbol": ""},
                    "decreasing": {"color": "#d13b40", "symbol": ""},
                    "position": "top"
                },
                "title": {"text": "AFRO", "font": {"size": 20}}
            }),
            value["data"][0]
        );
        assert_eq!(json!({"height": 310}), value["layout"]);
    }

    #[test]
    fn vaccination_pie() {
        let dataset = test_utils::get_test_dataset();
        let figure = VaccinationPie {}.build(&dataset, 2021);
        match only_trace(&figure) {
            Trace::Pie(pie) => {
                assert_eq!(vec!["AFRO", "AMRO", "EURO", "SEARO", "WPRO"], pie.labels);
                assert_eq!(
                    vec![1_500_000.0, 2_000_000.0, 1_500_000.0, 4_000_000.0, 3_000_000.0],
                    pie.values
                );
                assert_eq!(vec!["1.5M", "2.0M", "1.5M", "4.0M", "3.0M"], pie.text);
                assert_eq!(0.4, pie.hole);
            }
            trace => panic!("unexpected trace {:?}", trace),
        }
        assert_eq!("Fully vaccinated", figure.layout.title.unwrap().text);
    }

    #[test]
    fn case_map_keeps_countries_without_code() {
        let dataset = test_utils::get_test_dataset();
        let figure = CaseMap {}.build(&dataset, 2021);
        match only_trace(&figure) {
            Trace::Choropleth(choropleth) => {
                assert_eq!(7, choropleth.locations.len());
                assert_eq!(7, choropleth.z.len());
                assert_eq!(7, choropleth.text.len());
                assert_eq!(None, choropleth.locations[5]);
                assert_eq!("Kosovo - Total New Cases : 0.0M", choropleth.text[5]);
                assert_eq!(Some("BRA".to_string()), choropleth.locations[0]);
            }
            trace => panic!("unexpected trace {:?}", trace),
        }
        let geo = figure.layout.geo.unwrap();
        assert_eq!("equirectangular", geo.projection.kind);
    }

    #[test]
    fn top_vaccinated_bar_is_year_independent() {
        let dataset = test_utils::get_test_dataset();
        let figure = TopVaccinatedBar {}.build(&dataset, 2021);
        assert_eq!(figure, TopVaccinatedBar {}.build(&dataset, 1999));
        assert_eq!(2, figure.data.len());
        match (&figure.data[0], &figure.data[1]) {
            (Trace::Bar(total), Trace::Bar(fully)) => {
                assert_eq!(10, total.y.len());
                assert_eq!(total.y, fully.y);
                assert_eq!("C12", total.y[0]);
                assert_eq!(1_200.0, total.x[0]);
                assert_eq!(600.0, fully.x[0]);
                assert_eq!("Total Vaccination", total.name);
                assert_eq!("Person Fully Vaccinated", fully.name);
            }
            traces => panic!("unexpected traces {:?}", traces),
        }
        assert_eq!(Some("group".to_string()), figure.layout.barmode);
        assert_eq!(
            Some("reversed".to_string()),
            figure.layout.yaxis.unwrap().autorange
        );
        assert_eq!("Country (Top 10)", figure.layout.title.unwrap().text);
    }

    #[test]
    fn monthly_line_axis() {
        let dataset = test_utils::get_test_dataset();
        let figure = MonthlyLine::new(Measure::NewDeaths).build(&dataset, 2020);
        match only_trace(&figure) {
            Trace::Scatter(scatter) => {
                assert_eq!(vec![11, 12], scatter.x);
                assert_eq!(vec![250.0, 4_000.0], scatter.y);
                assert_eq!("2020", scatter.name);
                assert_eq!("lines+markers", scatter.mode);
            }
            trace => panic!("unexpected trace {:?}", trace),
        }
        let xaxis = figure.layout.xaxis.unwrap();
        assert_eq!(Some("linear".to_string()), xaxis.tickmode);
        assert_eq!(Some(1.0), xaxis.tick0);
        assert_eq!(Some(1.0), xaxis.dtick);
        assert_eq!("Monthly Deaths", figure.layout.title.unwrap().text);
    }

    #[test]
    fn empty_year_is_well_formed() {
        let dataset = test_utils::get_test_dataset();
        for id in FigureId::ALL {
            let figure = id.builder().build(&dataset, 1999);
            assert!(!figure.data.is_empty(), "{id} has no trace");
            if id.is_year_dependent() && !matches!(figure.data[0], Trace::Indicator(_)) {
                assert!(figure.is_empty(), "{id} is not empty");
            }
        }
    }
}
