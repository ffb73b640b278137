//! # Prediction Module
//!
//! The outcome of one prediction and how it is presented:
//! - Predicted class, with its banner text
//! - Class probabilities and confidence
//! - Risk tier bucketed from the disease probability
//! - Recommendation text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Disease probability above which the risk tier is High.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Disease probability above which the risk tier is Medium.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Predicted class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnosis {
    /// Class 0.
    Healthy,
    /// Class 1.
    Disease,
}

impl Diagnosis {
    /// Numeric class label.
    #[must_use]
    pub fn class(self) -> u8 {
        match self {
            Self::Healthy => 0,
            Self::Disease => 1,
        }
    }

    /// Banner text.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Healthy => "HEALTHY",
            Self::Disease => "DISEASE RISK",
        }
    }

    /// Follow-up advice for this outcome.
    #[must_use]
    pub fn recommendation(self) -> Recommendation {
        match self {
            Self::Disease => Recommendation {
                headline: "High Risk Detected",
                advice: "Consult a cardiologist promptly. \
                         Maintain a healthy lifestyle and monitor vital signs regularly.",
            },
            Self::Healthy => Recommendation {
                headline: "Low Risk",
                advice: "Continue healthy habits: regular exercise, \
                         balanced diet, and routine medical checkups.",
            },
        }
    }
}

/// Advice shown under the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recommendation {
    pub headline: &'static str,
    pub advice: &'static str,
}

/// Probability of each class. `healthy + disease == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub healthy: f64,
    pub disease: f64,
}

impl ClassProbabilities {
    /// Build from the positive-class probability.
    #[must_use]
    pub fn from_disease(disease: f64) -> Self {
        let disease = disease.clamp(0.0, 1.0);
        Self {
            healthy: 1.0 - disease,
            disease,
        }
    }

    /// Probability of the more likely class.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        self.healthy.max(self.disease)
    }
}

/// Risk bucket of the disease probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    /// Bucket a disease probability. Both thresholds are strict.
    #[must_use]
    pub fn from_disease_probability(p: f64) -> Self {
        if p > HIGH_RISK_THRESHOLD {
            Self::High
        } else if p > MEDIUM_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The full outcome of one prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub diagnosis: Diagnosis,
    pub probabilities: ClassProbabilities,
    pub confidence: f64,
    pub risk: RiskTier,
}

impl Prediction {
    /// Assemble a prediction from the classifier outputs.
    #[must_use]
    pub fn new(diagnosis: Diagnosis, probabilities: ClassProbabilities) -> Self {
        Self {
            diagnosis,
            probabilities,
            confidence: probabilities.confidence(),
            risk: RiskTier::from_disease_probability(probabilities.disease),
        }
    }

    /// Confidence as shown on the form, e.g. `"88.1%"`.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        format!("{:.1}%", self.confidence * 100.0)
    }

    /// Format as plain text for terminals.
    #[must_use]
    pub fn to_text(&self) -> String {
        let recommendation = self.diagnosis.recommendation();
        let mut output = String::new();

        output.push_str("┌─────────────────────────────────────┐\n");
        output.push_str(&format!("│ PREDICTION: {}\n", self.diagnosis.label()));
        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str(&format!("│ Confidence:  {}\n", self.confidence_percent()));
        output.push_str(&format!("│ Risk Level:  {}\n", self.risk));
        output.push_str(&format!(
            "│ P(healthy):  {:.3}\n",
            self.probabilities.healthy
        ));
        output.push_str(&format!(
            "│ P(disease):  {:.3}\n",
            self.probabilities.disease
        ));
        output.push_str("├─────────────────────────────────────┤\n");
        output.push_str(&format!("│ {}: {}\n", recommendation.headline, recommendation.advice));
        output.push_str("└─────────────────────────────────────┘\n");

        output
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn risk_thresholds_are_strict() {
        assert_eq!(RiskTier::from_disease_probability(0.71), RiskTier::High);
        assert_eq!(RiskTier::from_disease_probability(0.7), RiskTier::Medium);
        assert_eq!(RiskTier::from_disease_probability(0.41), RiskTier::Medium);
        assert_eq!(RiskTier::from_disease_probability(0.4), RiskTier::Low);
        assert_eq!(RiskTier::from_disease_probability(0.0), RiskTier::Low);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let p = ClassProbabilities::from_disease(0.3);
        assert!((p.healthy + p.disease - 1.0).abs() < 1e-12);
        assert!((p.confidence() - 0.7).abs() < 1e-12);
    }

    #[test]
    fn prediction_fields() {
        let prediction = Prediction::new(Diagnosis::Disease, ClassProbabilities::from_disease(0.8));
        assert_eq!(prediction.risk, RiskTier::High);
        assert_eq!(prediction.confidence_percent(), "80.0%");
        assert_eq!(prediction.diagnosis.class(), 1);
    }

    #[test]
    fn healthy_recommendation() {
        let rec = Diagnosis::Healthy.recommendation();
        assert_eq!(rec.headline, "Low Risk");
        assert!(rec.advice.contains("routine medical checkups"));
    }

    #[test]
    fn to_text_format() {
        let prediction = Prediction::new(Diagnosis::Healthy, ClassProbabilities::from_disease(0.25));
        let text = prediction.to_text();

        assert!(text.contains("PREDICTION: HEALTHY"));
        assert!(text.contains("Confidence:  75.0%"));
        assert!(text.contains("Risk Level:  Low"));
        assert!(text.contains("P(disease):  0.250"));
        assert!(text.contains("Low Risk:"));
    }

    #[test]
    fn json_shape() {
        let prediction = Prediction::new(Diagnosis::Disease, ClassProbabilities::from_disease(0.5));
        let json = serde_json::to_value(prediction).unwrap();
        assert_eq!(json["diagnosis"], "disease");
        assert_eq!(json["risk"], "Medium");
        assert_eq!(json["probabilities"]["disease"], 0.5);
    }
}
