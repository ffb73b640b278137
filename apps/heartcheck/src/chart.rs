//! # Probability Chart
//!
//! Inline SVG grouped bar chart of the two class probabilities.
//!
//! One category ("Probability") with a "Healthy" and a "Disease" bar on a
//! 0..1 y axis. Rendered server side as inline SVG.

use heartcheck_core::ClassProbabilities;

/// Chart height in pixels.
pub const CHART_HEIGHT: u32 = 350;

/// Healthy bar color.
pub const HEALTHY_COLOR: &str = "#2ecc71";

/// Disease bar color.
pub const DISEASE_COLOR: &str = "#8010f7";

const WIDTH: f64 = 640.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 120.0;
const MARGIN_TOP: f64 = 48.0;
const MARGIN_BOTTOM: f64 = 40.0;
const BAR_WIDTH: f64 = 90.0;
const BAR_GAP: f64 = 12.0;

/// Render the probability chart as a standalone `<svg>` element.
#[must_use]
pub fn probability_chart(probabilities: &ClassProbabilities) -> String {
    let height = f64::from(CHART_HEIGHT);
    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = height - MARGIN_BOTTOM;
    let plot_height = plot_bottom - plot_top;
    let center = (plot_left + plot_right) / 2.0;

    let y_of = |p: f64| plot_bottom - p.clamp(0.0, 1.0) * plot_height;

    let mut svg = String::new();
    svg.push_str(&format!(
        r#"<svg class="chart" xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {height}" width="100%" height="{CHART_HEIGHT}" role="img" aria-label="Prediction Probabilities">"#
    ));
    svg.push_str(&format!(
        r#"<text x="{plot_left}" y="24" font-size="16" font-weight="bold">Prediction Probabilities</text>"#
    ));

    // Gridlines and y ticks at 0.0, 0.2, ..., 1.0.
    for tick in 0..=5 {
        let value = f64::from(tick) / 5.0;
        let y = y_of(value);
        svg.push_str(&format!(
            r##"<line x1="{plot_left}" y1="{y:.1}" x2="{plot_right}" y2="{y:.1}" stroke="#e6e6e6"/>"##
        ));
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-size="11" text-anchor="end">{value:.1}</text>"#,
            plot_left - 6.0,
            y + 4.0
        ));
    }

    svg.push_str(&format!(
        r#"<text transform="translate(16 {:.1}) rotate(-90)" font-size="12" text-anchor="middle">Probability</text>"#,
        (plot_top + plot_bottom) / 2.0
    ));

    let bars = [
        ("Healthy", probabilities.healthy, HEALTHY_COLOR, center - BAR_GAP / 2.0 - BAR_WIDTH),
        ("Disease", probabilities.disease, DISEASE_COLOR, center + BAR_GAP / 2.0),
    ];
    for (name, value, color, x) in bars {
        let y = y_of(value);
        svg.push_str(&format!(
            r#"<rect class="bar" data-series="{name}" x="{x:.1}" y="{y:.1}" width="{BAR_WIDTH}" height="{:.1}" fill="{color}"><title>{name}: {value:.3}</title></rect>"#,
            plot_bottom - y
        ));
    }

    svg.push_str(&format!(
        r##"<line x1="{plot_left}" y1="{plot_bottom}" x2="{plot_right}" y2="{plot_bottom}" stroke="#444"/>"##
    ));
    svg.push_str(&format!(
        r#"<text x="{center:.1}" y="{:.1}" font-size="12" text-anchor="middle">Probability</text>"#,
        plot_bottom + 20.0
    ));

    // Legend
    for (row, (name, color)) in [("Healthy", HEALTHY_COLOR), ("Disease", DISEASE_COLOR)]
        .into_iter()
        .enumerate()
    {
        let y = plot_top + 20.0 * row as f64;
        svg.push_str(&format!(
            r#"<rect x="{:.1}" y="{y:.1}" width="12" height="12" fill="{color}"/><text x="{:.1}" y="{:.1}" font-size="12">{name}</text>"#,
            plot_right + 20.0,
            plot_right + 38.0,
            y + 10.0
        ));
    }

    svg.push_str("</svg>");
    svg
}
