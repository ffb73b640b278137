//! # Feature Record
//!
//! One patient's thirteen clinical measurements.
//!
//! Categorical fields are enums so an impossible code never reaches the
//! model. On the wire (form posts, JSON bodies) a record travels as
//! [`RawRecord`], the plain numeric codes under their training-data column
//! names; conversion into [`FeatureRecord`] performs the range checks.

use crate::error::RecordError;
use crate::features::{FEATURE_COUNT, FeatureLayout, FeatureName};
use serde::{Deserialize, Serialize};

// =============================================================================
// CATEGORICAL FIELDS
// =============================================================================

/// Declares a categorical field: enum, numeric code, label, and parsing.
macro_rules! categorical {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($variant:ident = $code:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Every category, in form order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Numeric code the model was trained on.
            #[must_use]
            pub fn code(self) -> u8 {
                match self {
                    $(Self::$variant => $code),+
                }
            }

            /// Label shown on the form.
            #[must_use]
            pub fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label),+
                }
            }

            /// Parse a numeric code.
            pub fn from_code(code: i64) -> Result<Self, RecordError> {
                match code {
                    $($code => Ok(Self::$variant),)+
                    _ => Err(RecordError::UnknownCode { field: $field, code }),
                }
            }
        }
    };
}

categorical! {
    /// Biological sex as recorded in the training data.
    Sex, "sex" {
        Male = 1 => "Male",
        Female = 0 => "Female",
    }
}

categorical! {
    /// Chest pain type.
    ChestPain, "cp" {
        TypicalAngina = 0 => "Typical Angina",
        AtypicalAngina = 1 => "Atypical Angina",
        NonAnginalPain = 2 => "Non-anginal Pain",
        Asymptomatic = 3 => "Asymptomatic",
    }
}

categorical! {
    /// Resting electrocardiographic result.
    RestingEcg, "restecg" {
        Normal = 0 => "Normal",
        StTWaveAbnormality = 1 => "ST-T Wave Abnormality",
        LeftVentricularHypertrophy = 2 => "Left Ventricular Hypertrophy",
    }
}

categorical! {
    /// Slope of the peak exercise ST segment.
    StSlope, "slope" {
        Upsloping = 0 => "Upsloping",
        Flat = 1 => "Flat",
        Downsloping = 2 => "Downsloping",
    }
}

categorical! {
    /// Thalassemia result. Codes start at 1.
    Thalassemia, "thal" {
        Normal = 1 => "Normal",
        FixedDefect = 2 => "Fixed Defect",
        ReversibleDefect = 3 => "Reversible Defect",
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "Yes" } else { "No" }
}

fn flag_from_code(field: &'static str, code: i64) -> Result<bool, RecordError> {
    match code {
        0 => Ok(false),
        1 => Ok(true),
        _ => Err(RecordError::UnknownCode { field, code }),
    }
}

/// Check `value` against an inclusive range.
fn in_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<f64, RecordError> {
    if !value.is_finite() {
        return Err(RecordError::NotFinite { field });
    }
    if value < min || value > max {
        return Err(RecordError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Integer fields arrive as JSON numbers; reject fractions like `50.5`.
fn whole(field: &'static str, value: f64, min: f64, max: f64) -> Result<u16, RecordError> {
    let value = in_range(field, value, min, max)?;
    if value.fract() != 0.0 {
        return Err(RecordError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(value as u16)
}

/// Fractional fields move in fixed steps; `steps_per_unit` is 10 for 0.1.
fn on_step(field: &'static str, value: f64, steps_per_unit: f64) -> Result<f64, RecordError> {
    let scaled = value * steps_per_unit;
    if (scaled.round() - scaled).abs() > 1e-9 {
        return Err(RecordError::OffStep {
            field,
            value,
            step: 1.0 / steps_per_unit,
        });
    }
    Ok(value)
}

// =============================================================================
// RANGES
// =============================================================================

/// Inclusive bounds of the numeric fields, shared with the form sliders.
pub mod ranges {
    pub const AGE: (f64, f64) = (20.0, 100.0);
    pub const RESTING_BP: (f64, f64) = (90.0, 200.0);
    pub const CHOLESTEROL: (f64, f64) = (100.0, 600.0);
    pub const MAX_HEART_RATE: (f64, f64) = (60.0, 220.0);
    pub const ST_DEPRESSION: (f64, f64) = (0.0, 6.0);
    pub const MAJOR_VESSELS: (f64, f64) = (0.0, 3.0);
    /// ST depression moves in tenths.
    pub const ST_DEPRESSION_STEPS_PER_UNIT: f64 = 10.0;
}

// =============================================================================
// RAW RECORD (wire form)
// =============================================================================

/// A record as submitted: numeric codes under training-data column names.
///
/// Numbers are `f64` so both form posts and JSON bodies deserialize into
/// it; [`FeatureRecord::try_from`] does the checking.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub age: f64,
    pub sex: i64,
    pub cp: i64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: i64,
    pub restecg: i64,
    pub thalach: f64,
    pub exang: i64,
    pub oldpeak: f64,
    pub slope: i64,
    pub ca: f64,
    pub thal: i64,
}

impl RawRecord {
    fn age(&self) -> Result<u8, RecordError> {
        let (lo, hi) = ranges::AGE;
        Ok(whole("age", self.age, lo, hi)? as u8)
    }

    fn resting_bp(&self) -> Result<u16, RecordError> {
        let (lo, hi) = ranges::RESTING_BP;
        whole("trestbps", self.trestbps, lo, hi)
    }

    fn cholesterol(&self) -> Result<u16, RecordError> {
        let (lo, hi) = ranges::CHOLESTEROL;
        whole("chol", self.chol, lo, hi)
    }

    fn max_heart_rate(&self) -> Result<u16, RecordError> {
        let (lo, hi) = ranges::MAX_HEART_RATE;
        whole("thalach", self.thalach, lo, hi)
    }

    fn st_depression(&self) -> Result<f64, RecordError> {
        let (lo, hi) = ranges::ST_DEPRESSION;
        let value = in_range("oldpeak", self.oldpeak, lo, hi)?;
        on_step("oldpeak", value, ranges::ST_DEPRESSION_STEPS_PER_UNIT)
    }

    fn major_vessels(&self) -> Result<u8, RecordError> {
        let (lo, hi) = ranges::MAJOR_VESSELS;
        Ok(whole("ca", self.ca, lo, hi)? as u8)
    }
}

/// A validated record as written back out: integer fields stay integers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CodedRecord {
    pub age: u8,
    pub sex: u8,
    pub cp: u8,
    pub trestbps: u16,
    pub chol: u16,
    pub fbs: u8,
    pub restecg: u8,
    pub thalach: u16,
    pub exang: u8,
    pub oldpeak: f64,
    pub slope: u8,
    pub ca: u8,
    pub thal: u8,
}

impl From<FeatureRecord> for CodedRecord {
    fn from(record: FeatureRecord) -> Self {
        Self {
            age: record.age,
            sex: record.sex.code(),
            cp: record.chest_pain.code(),
            trestbps: record.resting_bp,
            chol: record.cholesterol,
            fbs: u8::from(record.fasting_blood_sugar),
            restecg: record.resting_ecg.code(),
            thalach: record.max_heart_rate,
            exang: u8::from(record.exercise_angina),
            oldpeak: record.st_depression,
            slope: record.st_slope.code(),
            ca: record.major_vessels,
            thal: record.thal.code(),
        }
    }
}

// =============================================================================
// FEATURE RECORD
// =============================================================================

/// A validated set of clinical measurements for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord", into = "CodedRecord")]
pub struct FeatureRecord {
    pub age: u8,
    pub sex: Sex,
    pub chest_pain: ChestPain,
    pub resting_bp: u16,
    pub cholesterol: u16,
    pub fasting_blood_sugar: bool,
    pub resting_ecg: RestingEcg,
    pub max_heart_rate: u16,
    pub exercise_angina: bool,
    pub st_depression: f64,
    pub st_slope: StSlope,
    pub major_vessels: u8,
    pub thal: Thalassemia,
}

impl Default for FeatureRecord {
    /// The values the form starts with.
    fn default() -> Self {
        Self {
            age: 50,
            sex: Sex::Male,
            chest_pain: ChestPain::TypicalAngina,
            resting_bp: 120,
            cholesterol: 200,
            fasting_blood_sugar: false,
            resting_ecg: RestingEcg::Normal,
            max_heart_rate: 150,
            exercise_angina: false,
            st_depression: 1.0,
            st_slope: StSlope::Upsloping,
            major_vessels: 0,
            thal: Thalassemia::Normal,
        }
    }
}

impl TryFrom<RawRecord> for FeatureRecord {
    type Error = RecordError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            age: raw.age()?,
            sex: Sex::from_code(raw.sex)?,
            chest_pain: ChestPain::from_code(raw.cp)?,
            resting_bp: raw.resting_bp()?,
            cholesterol: raw.cholesterol()?,
            fasting_blood_sugar: flag_from_code("fbs", raw.fbs)?,
            resting_ecg: RestingEcg::from_code(raw.restecg)?,
            max_heart_rate: raw.max_heart_rate()?,
            exercise_angina: flag_from_code("exang", raw.exang)?,
            st_depression: raw.st_depression()?,
            st_slope: StSlope::from_code(raw.slope)?,
            major_vessels: raw.major_vessels()?,
            thal: Thalassemia::from_code(raw.thal)?,
        })
    }
}

impl From<FeatureRecord> for RawRecord {
    fn from(record: FeatureRecord) -> Self {
        Self {
            age: f64::from(record.age),
            sex: i64::from(record.sex.code()),
            cp: i64::from(record.chest_pain.code()),
            trestbps: f64::from(record.resting_bp),
            chol: f64::from(record.cholesterol),
            fbs: i64::from(record.fasting_blood_sugar),
            restecg: i64::from(record.resting_ecg.code()),
            thalach: f64::from(record.max_heart_rate),
            exang: i64::from(record.exercise_angina),
            oldpeak: record.st_depression,
            slope: i64::from(record.st_slope.code()),
            ca: f64::from(record.major_vessels),
            thal: i64::from(record.thal.code()),
        }
    }
}

impl FeatureRecord {
    /// Keep every valid field of `raw`; invalid ones fall back to the form default.
    #[must_use]
    pub fn salvage(raw: &RawRecord) -> Self {
        let d = Self::default();
        Self {
            age: raw.age().unwrap_or(d.age),
            sex: Sex::from_code(raw.sex).unwrap_or(d.sex),
            chest_pain: ChestPain::from_code(raw.cp).unwrap_or(d.chest_pain),
            resting_bp: raw.resting_bp().unwrap_or(d.resting_bp),
            cholesterol: raw.cholesterol().unwrap_or(d.cholesterol),
            fasting_blood_sugar: flag_from_code("fbs", raw.fbs).unwrap_or(d.fasting_blood_sugar),
            resting_ecg: RestingEcg::from_code(raw.restecg).unwrap_or(d.resting_ecg),
            max_heart_rate: raw.max_heart_rate().unwrap_or(d.max_heart_rate),
            exercise_angina: flag_from_code("exang", raw.exang).unwrap_or(d.exercise_angina),
            st_depression: raw.st_depression().unwrap_or(d.st_depression),
            st_slope: StSlope::from_code(raw.slope).unwrap_or(d.st_slope),
            major_vessels: raw.major_vessels().unwrap_or(d.major_vessels),
            thal: Thalassemia::from_code(raw.thal).unwrap_or(d.thal),
        }
    }

    /// The value of one feature, as the model sees it.
    #[must_use]
    pub fn value(&self, name: FeatureName) -> f64 {
        match name {
            FeatureName::Age => f64::from(self.age),
            FeatureName::Sex => f64::from(self.sex.code()),
            FeatureName::ChestPain => f64::from(self.chest_pain.code()),
            FeatureName::RestingBloodPressure => f64::from(self.resting_bp),
            FeatureName::Cholesterol => f64::from(self.cholesterol),
            FeatureName::FastingBloodSugar => f64::from(u8::from(self.fasting_blood_sugar)),
            FeatureName::RestingEcg => f64::from(self.resting_ecg.code()),
            FeatureName::MaxHeartRate => f64::from(self.max_heart_rate),
            FeatureName::ExerciseAngina => f64::from(u8::from(self.exercise_angina)),
            FeatureName::StDepression => self.st_depression,
            FeatureName::StSlope => f64::from(self.st_slope.code()),
            FeatureName::MajorVessels => f64::from(self.major_vessels),
            FeatureName::Thalassemia => f64::from(self.thal.code()),
        }
    }

    /// The feature values in the column order of `layout`.
    #[must_use]
    pub fn reorder(&self, layout: &FeatureLayout) -> [f64; FEATURE_COUNT] {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, name) in values.iter_mut().zip(layout.names()) {
            *slot = self.value(*name);
        }
        values
    }

    /// Human readable value of one feature.
    #[must_use]
    pub fn display_value(&self, name: FeatureName) -> String {
        match name {
            FeatureName::Sex => self.sex.label().to_string(),
            FeatureName::ChestPain => self.chest_pain.label().to_string(),
            FeatureName::FastingBloodSugar => yes_no(self.fasting_blood_sugar).to_string(),
            FeatureName::RestingEcg => self.resting_ecg.label().to_string(),
            FeatureName::ExerciseAngina => yes_no(self.exercise_angina).to_string(),
            FeatureName::StDepression => format!("{:.1}", self.st_depression),
            FeatureName::StSlope => self.st_slope.label().to_string(),
            FeatureName::Thalassemia => self.thal.label().to_string(),
            other => format!("{}", self.value(other)),
        }
    }

    /// `(column name, human readable value)` pairs in canonical order.
    #[must_use]
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        FeatureName::ALL
            .iter()
            .map(|name| (name.as_str(), self.display_value(*name)))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
