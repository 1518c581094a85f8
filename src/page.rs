//! The dashboard page.
//!
//! A static two-column layout with one placeholder element per [FigureId](crate::models::FigureId)
//! and the year selector. The page fetches the figures from the API and renders them with
//! plotly.js whenever the selection changes.

const TEMPLATE: &str = include_str!("../static/index.html");

/// Render the page with a year selector over `years`, preselecting `selected`.
pub fn render(years: &[i32], selected: i32) -> String {
    let options = years
        .iter()
        .map(|year| {
            let attribute = if *year == selected { " selected" } else { "" };
            format!(r#"        <option value="{year}"{attribute}>{year}</option>"#)
        })
        .collect::<Vec<_>>()
        .join("\n");
    TEMPLATE.replace("{{year_options}}", &options)
}
