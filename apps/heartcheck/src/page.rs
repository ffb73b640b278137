//! # Page Rendering
//!
//! Server-side HTML for the single-page form.
//!
//! Layout:
//! - Sidebar: model info, key risk factors, disclaimer
//! - Two input columns: "Personal Information" and "Heart Metrics"
//! - Result section (after a prediction): banner, confidence, risk level,
//!   probability chart, recommendation, collapsible input summary
//!
//! Form controls post the training-data column names, so a submitted form
//! deserializes straight into a [`FeatureRecord`].

use crate::chart;
use heartcheck_core::record::ranges;
use heartcheck_core::{
    ChestPain, Diagnosis, FeatureName, FeatureRecord, ModelInfo, Prediction, RestingEcg, Sex,
    StSlope, Thalassemia,
};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; color: #262730; }
aside { width: 260px; min-height: 100vh; background: #f0f2f6; padding: 1.5rem; box-sizing: border-box; }
aside .info { background: #e8f0fe; border-radius: 8px; padding: 0.75rem; }
aside .caption { color: #6b6f76; font-size: 0.85rem; }
main { flex: 1; padding: 2rem 3rem; max-width: 1100px; }
.columns { display: flex; gap: 3rem; }
.columns > section { flex: 1; }
label { display: block; margin-top: 1rem; font-size: 0.9rem; }
input[type=range], select { width: 100%; }
button { width: 100%; margin-top: 1.5rem; background-color: #4CAF50; color: white; font-weight: bold;
         padding: 0.5rem; border-radius: 10px; border: none; font-size: 1rem; cursor: pointer; }
.results { display: flex; gap: 2rem; align-items: center; margin-top: 1rem; }
.results > div { flex: 1; }
.prediction-box { padding: 1.5rem; border-radius: 10px; text-align: center; font-size: 1.3rem; font-weight: bold; }
.disease { background-color: #FFEBEE; color: #C62828; }
.healthy { background-color: #E8F5E9; color: #2E7D32; }
.metric .name { font-size: 0.85rem; color: #6b6f76; }
.metric .value { font-size: 2rem; }
.alert { border-radius: 8px; padding: 1rem; margin: 1rem 0; }
.alert.error { background: #ffeded; color: #7d353b; }
.alert.success { background: #e7f6ec; color: #177233; }
table { border-collapse: collapse; }
td { padding: 0.2rem 1rem 0.2rem 0; }
"#;

/// Escape text for use in HTML content and attribute values.
#[must_use]
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Everything the page needs besides the current record.
#[derive(Debug, Clone)]
pub struct ModelPanel<'a> {
    /// Model family, e.g. "Logistic Regression".
    pub kind: &'a str,
    pub info: &'a ModelInfo,
}

/// What to show below the form.
#[derive(Debug, Clone, Copy)]
pub enum Outcome<'a> {
    /// Nothing submitted yet.
    Empty,
    /// A successful prediction.
    Predicted(&'a Prediction),
    /// The submission was rejected.
    Rejected(&'a str),
}

/// Render the full page.
#[must_use]
pub fn render(panel: &ModelPanel<'_>, record: &FeatureRecord, outcome: Outcome<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>Heart Disease Prediction</title>\n");
    html.push_str(&format!("<style>{STYLE}</style>\n</head>\n<body>\n"));

    html.push_str(&sidebar(panel));

    html.push_str("<main>\n<h1>Heart Disease Prediction App</h1>\n");
    html.push_str("<p>Predict heart disease risk using <strong>Machine Learning</strong></p>\n<hr>\n");
    html.push_str(&form(record));

    match outcome {
        Outcome::Empty => {}
        Outcome::Predicted(prediction) => html.push_str(&results(prediction, record)),
        Outcome::Rejected(message) => html.push_str(&format!(
            "<div class=\"alert error\" id=\"input-error\"><strong>Invalid input</strong>: {}</div>\n",
            escape(message)
        )),
    }

    html.push_str("</main>\n</body>\n</html>\n");
    html
}

// =============================================================================
// SIDEBAR
// =============================================================================

fn sidebar(panel: &ModelPanel<'_>) -> String {
    let name = panel.info.name.as_deref().unwrap_or(panel.kind);

    let mut html = String::from("<aside>\n<h2>Model Info</h2>\n<div class=\"info\">\n");
    html.push_str(&format!("<strong>{} Model</strong>\n<ul>\n", escape(name)));
    if let Some(samples) = panel.info.training_samples {
        html.push_str(&format!("<li>Training Data: {samples} patients</li>\n"));
    }
    html.push_str(&format!(
        "<li>Features: {} clinical attributes</li>\n</ul>\n</div>\n",
        FeatureName::ALL.len()
    ));

    if !panel.info.key_risk_factors.is_empty() {
        html.push_str("<h2>Key Risk Factors</h2>\n<ul>\n");
        for factor in &panel.info.key_risk_factors {
            html.push_str(&format!("<li>{}</li>\n", escape(factor)));
        }
        html.push_str("</ul>\n");
    }

    html.push_str("<hr>\n<p class=\"caption\">This app is for educational purposes only.</p>\n");
    html.push_str("<p class=\"caption\">Not a substitute for professional medical advice.</p>\n");
    html.push_str("</aside>\n");
    html
}

// =============================================================================
// FORM
// =============================================================================

fn slider(name: FeatureName, value: f64, (min, max): (f64, f64), step: f64) -> String {
    let field = name.as_str();
    let shown = if step < 1.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    };
    format!(
        "<label for=\"{field}\">{label}: <output id=\"{field}-value\">{shown}</output></label>\n\
         <input type=\"range\" id=\"{field}\" name=\"{field}\" min=\"{min}\" max=\"{max}\" step=\"{step}\" value=\"{shown}\" \
         oninput=\"document.getElementById('{field}-value').value = this.value\">\n",
        label = escape(name.label()),
    )
}

fn select(name: FeatureName, options: &[(u8, &str)], selected: u8) -> String {
    let field = name.as_str();
    let mut html = format!(
        "<label for=\"{field}\">{}</label>\n<select id=\"{field}\" name=\"{field}\">\n",
        escape(name.label())
    );
    for (code, label) in options {
        let mark = if *code == selected { " selected" } else { "" };
        html.push_str(&format!(
            "<option value=\"{code}\"{mark}>{}</option>\n",
            escape(label)
        ));
    }
    html.push_str("</select>\n");
    html
}

macro_rules! options {
    ($ty:ty) => {
        <$ty>::ALL
            .iter()
            .map(|c| (c.code(), c.label()))
            .collect::<Vec<_>>()
    };
}

fn form(record: &FeatureRecord) -> String {
    let yes_no: &[(u8, &str)] = &[(0, "No"), (1, "Yes")];
    let vessels: &[(u8, &str)] = &[(0, "0"), (1, "1"), (2, "2"), (3, "3")];

    let mut html = String::from("<form method=\"post\" action=\"/predict\">\n<div class=\"columns\">\n");

    html.push_str("<section>\n<h3>Personal Information</h3>\n");
    html.push_str(&slider(FeatureName::Age, f64::from(record.age), ranges::AGE, 1.0));
    html.push_str(&select(FeatureName::Sex, &options!(Sex), record.sex.code()));
    html.push_str("</section>\n");

    html.push_str("<section>\n<h3>Heart Metrics</h3>\n");
    html.push_str(&select(
        FeatureName::ChestPain,
        &options!(ChestPain),
        record.chest_pain.code(),
    ));
    html.push_str(&slider(
        FeatureName::RestingBloodPressure,
        f64::from(record.resting_bp),
        ranges::RESTING_BP,
        1.0,
    ));
    html.push_str(&slider(
        FeatureName::Cholesterol,
        f64::from(record.cholesterol),
        ranges::CHOLESTEROL,
        1.0,
    ));
    html.push_str(&select(
        FeatureName::FastingBloodSugar,
        yes_no,
        u8::from(record.fasting_blood_sugar),
    ));
    html.push_str(&select(
        FeatureName::RestingEcg,
        &options!(RestingEcg),
        record.resting_ecg.code(),
    ));
    html.push_str(&slider(
        FeatureName::MaxHeartRate,
        f64::from(record.max_heart_rate),
        ranges::MAX_HEART_RATE,
        1.0,
    ));
    html.push_str(&select(
        FeatureName::ExerciseAngina,
        yes_no,
        u8::from(record.exercise_angina),
    ));
    html.push_str(&slider(
        FeatureName::StDepression,
        record.st_depression,
        ranges::ST_DEPRESSION,
        0.1,
    ));
    html.push_str(&select(
        FeatureName::StSlope,
        &options!(StSlope),
        record.st_slope.code(),
    ));
    html.push_str(&select(FeatureName::MajorVessels, vessels, record.major_vessels));
    html.push_str(&select(
        FeatureName::Thalassemia,
        &options!(Thalassemia),
        record.thal.code(),
    ));
    html.push_str("</section>\n");

    html.push_str("</div>\n<button type=\"submit\">Predict Heart Disease</button>\n</form>\n");
    html
}

// =============================================================================
// RESULTS
// =============================================================================

fn results(prediction: &Prediction, record: &FeatureRecord) -> String {
    let (box_class, alert_class) = match prediction.diagnosis {
        Diagnosis::Disease => ("disease", "error"),
        Diagnosis::Healthy => ("healthy", "success"),
    };
    let recommendation = prediction.diagnosis.recommendation();

    let mut html = String::from("<hr>\n<section id=\"result\">\n<div class=\"results\">\n");
    html.push_str(&format!(
        "<div><div class=\"prediction-box {box_class}\">{}</div></div>\n",
        prediction.diagnosis.label()
    ));
    html.push_str(&format!(
        "<div class=\"metric\"><div class=\"name\">Confidence</div><div class=\"value\" id=\"confidence\">{}</div></div>\n",
        prediction.confidence_percent()
    ));
    html.push_str(&format!(
        "<div class=\"metric\"><div class=\"name\">Risk Level</div><div class=\"value\" id=\"risk-level\">{}</div></div>\n",
        prediction.risk
    ));
    html.push_str("</div>\n");

    html.push_str(&chart::probability_chart(&prediction.probabilities));
    html.push('\n');

    html.push_str(&format!(
        "<div class=\"alert {alert_class}\"><strong>{}</strong>: {}</div>\n",
        recommendation.headline, recommendation.advice
    ));

    html.push_str("<details>\n<summary>Input Summary</summary>\n<table>\n");
    for (column, value) in record.summary() {
        html.push_str(&format!(
            "<tr><td><code>{column}</code></td><td>{}</td></tr>\n",
            escape(&value)
        ));
    }
    html.push_str("</table>\n</details>\n</section>\n");
    html
}

// =============================================================================
// TESTS
// =============================================================================
