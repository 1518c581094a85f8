//! Declarative chart specifications.
//!
//! These types serialise to the figure JSON understood by [plotly.js](https://plotly.com/javascript/):
//! a list of traces plus a layout. Only the attributes used by the dashboard are modelled; unset
//! attributes are omitted so that plotly.js applies its own defaults.

use serde::{Deserialize, Serialize};

/// A complete chart: traces and layout.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    /// Returns a figure with the given traces and layout.
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    /// Returns a figure without traces, keeping only its title.
    ///
    /// Rendered when a figure could not be computed.
    pub fn empty(title: &str) -> Self {
        Self {
            data: vec![],
            layout: Layout {
                title: Some(Title::new(title)),
                ..Default::default()
            },
        }
    }

    /// Whether no trace carries any data point.
    pub fn is_empty(&self) -> bool {
        self.data.iter().all(Trace::is_empty)
    }
}

/// A single trace, tagged by its plotly.js `type`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Pie(Pie),
    Indicator(Indicator),
    Choropleth(Choropleth),
    Bar(Bar),
    Scatter(Scatter),
}

impl Trace {
    /// Whether the trace carries no data point.
    ///
    /// Indicators always display a number, so they are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Pie(pie) => pie.values.is_empty(),
            Self::Indicator(_) => false,
            Self::Choropleth(choropleth) => choropleth.z.is_empty(),
            Self::Bar(bar) => bar.x.is_empty(),
            Self::Scatter(scatter) => scatter.x.is_empty(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Pie {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub name: String,
    pub text: Vec<String>,
    pub textinfo: String,
    pub hovertemplate: String,
    pub insidetextorientation: String,
    pub hole: f64,
}

/// A "number with delta" indicator.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Indicator {
    pub mode: String,
    pub value: f64,
    pub number: IndicatorNumber,
    pub delta: Delta,
    pub title: Title,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct IndicatorNumber {
    pub font: Font,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Delta {
    pub reference: f64,
    pub font: Font,
    pub relative: bool,
    pub increasing: DeltaStyle,
    pub decreasing: DeltaStyle,
    pub position: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct DeltaStyle {
    pub color: String,
    pub symbol: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Choropleth {
    /// Normalized country codes; `None` for countries without a known code.
    pub locations: Vec<Option<String>>,
    pub z: Vec<f64>,
    pub text: Vec<String>,
    pub hoverinfo: String,
    pub colorscale: String,
    pub autocolorscale: bool,
    pub reversescale: bool,
    pub marker: Marker,
    pub colorbar: ColorBar,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
    pub thickness: u32,
    pub len: f64,
    pub x: f64,
    pub ticklen: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Bar {
    pub x: Vec<f64>,
    pub y: Vec<String>,
    pub name: String,
    pub orientation: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Scatter {
    pub x: Vec<u32>,
    pub y: Vec<f64>,
    pub text: Vec<String>,
    pub hovertemplate: String,
    pub mode: String,
    pub marker: Marker,
    pub name: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
}

impl Title {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            font: None,
            y: None,
        }
    }
}

/// Figure layout. Unset fields fall back to plotly.js defaults.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Layout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo: Option<Geo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub yaxis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legend: Option<Legend>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Margin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub l: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub b: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<u32>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Geo {
    pub showframe: bool,
    pub showcoastlines: bool,
    pub projection: Projection,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Projection {
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick0: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autorange: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct Legend {
    pub orientation: String,
    pub xanchor: String,
    pub x: f64,
    pub yanchor: String,
    pub y: f64,
}
