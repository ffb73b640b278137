//! Property tests for the prediction pipeline.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use heartcheck_core::{
    ClassProbabilities, FEATURE_COUNT, FeatureLayout, FeatureName, FeatureRecord,
    LogisticRegression, Model, ModelArtifact, ModelInfo, Predictor, RawRecord, RiskTier,
    StandardScaler,
};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

fn raw_record() -> impl Strategy<Value = RawRecord> {
    (
        (20u8..=100, 0i64..=1, 0i64..=3, 90u16..=200, 100u16..=600),
        (0i64..=1, 0i64..=2, 60u16..=220, 0i64..=1),
        (0u8..=60, 0i64..=2, 0u8..=3, 1i64..=3),
    )
        .prop_map(
            |(
                (age, sex, cp, trestbps, chol),
                (fbs, restecg, thalach, exang),
                (oldpeak_tenths, slope, ca, thal),
            )| RawRecord {
                age: f64::from(age),
                sex,
                cp,
                trestbps: f64::from(trestbps),
                chol: f64::from(chol),
                fbs,
                restecg,
                thalach: f64::from(thalach),
                exang,
                oldpeak: f64::from(oldpeak_tenths) / 10.0,
                slope,
                ca: f64::from(ca),
                thal,
            },
        )
}

fn layout() -> impl Strategy<Value = FeatureLayout> {
    Just(FeatureLayout::canonical().to_strings())
        .prop_shuffle()
        .prop_map(|names| FeatureLayout::from_names(&names).unwrap())
}

fn weights() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-2.0f64..2.0, FEATURE_COUNT)
}

/// Build a predictor whose parameters are given in canonical order but
/// stored in `layout` order.
fn predictor(layout: &FeatureLayout, coef: &[f64], mean: &[f64], intercept: f64) -> Predictor {
    let permute = |canonical: &[f64]| -> Vec<f64> {
        layout
            .names()
            .iter()
            .map(|name| canonical[*name as usize])
            .collect()
    };
    let artifact = ModelArtifact {
        feature_names: layout.to_strings(),
        model: Model::LogisticRegression(LogisticRegression::new(permute(coef), intercept)),
        info: ModelInfo::default(),
    };
    let scaler = StandardScaler::new(permute(mean), vec![1.0; FEATURE_COUNT]);
    Predictor::new(artifact, scaler).unwrap()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn reorder_matches_layout(raw in raw_record(), layout in layout()) {
        let record = FeatureRecord::try_from(raw).unwrap();
        let values = record.reorder(&layout);

        for (value, name) in values.iter().zip(layout.names()) {
            prop_assert_eq!(*value, record.value(*name));
        }
    }

    #[test]
    fn probabilities_sum_to_one(
        raw in raw_record(),
        coef in weights(),
        intercept in -5.0f64..5.0,
    ) {
        let record = FeatureRecord::try_from(raw).unwrap();
        let predictor = predictor(&FeatureLayout::canonical(), &coef, &[0.0; FEATURE_COUNT], intercept);
        let prediction = predictor.predict(&record).unwrap();

        let p = prediction.probabilities;
        prop_assert!((p.healthy + p.disease - 1.0).abs() < 1e-9);
        prop_assert!((0.0..=1.0).contains(&p.disease));
        prop_assert!(prediction.confidence >= 0.5);
    }

    #[test]
    fn prediction_is_layout_independent(
        raw in raw_record(),
        layout in layout(),
        coef in weights(),
        intercept in -1.0f64..1.0,
    ) {
        let record = FeatureRecord::try_from(raw).unwrap();
        let mean: Vec<f64> = FeatureName::ALL
            .iter()
            .map(|name| FeatureRecord::default().value(*name))
            .collect();

        let canonical = predictor(&FeatureLayout::canonical(), &coef, &mean, intercept)
            .predict(&record)
            .unwrap();
        let permuted = predictor(&layout, &coef, &mean, intercept)
            .predict(&record)
            .unwrap();

        prop_assert!((canonical.probabilities.disease - permuted.probabilities.disease).abs() < 1e-9);
        prop_assert_eq!(canonical.risk, permuted.risk);
    }

    #[test]
    fn prediction_is_deterministic(raw in raw_record(), coef in weights()) {
        let record = FeatureRecord::try_from(raw).unwrap();
        let predictor = predictor(&FeatureLayout::canonical(), &coef, &[0.0; FEATURE_COUNT], 0.0);

        prop_assert_eq!(predictor.predict(&record).unwrap(), predictor.predict(&record).unwrap());
    }

    #[test]
    fn risk_tier_is_monotonic(a in 0.0f64..=1.0, b in 0.0f64..=1.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(RiskTier::from_disease_probability(lo) <= RiskTier::from_disease_probability(hi));
    }

    #[test]
    fn confidence_is_max_probability(p in 0.0f64..=1.0) {
        let probs = ClassProbabilities::from_disease(p);
        prop_assert!((probs.confidence() - p.max(1.0 - p)).abs() < 1e-12);
    }
}
