use super::common::{assert_close, engine, full_set};
use crate::indicators::{IndicatorKind, IndicatorSet, ReadingPair, TemperatureInput};
use crate::scoring::{display_score, DataSources, FactorWeights, RiskEngine, ScoringError};

#[test]
fn all_missing_indicators_score_exactly_neutral() {
    let assessment = engine()
        .aggregate(&IndicatorSet::default())
        .expect("empty set aggregates");

    assert_eq!(assessment.score, 5.0);
    assert_eq!(assessment.data_sources, DataSources::default());
    assert!(!assessment.is_data_driven());
    assert_eq!(
        assessment.explanation,
        "Historical fire data unavailable. Vegetation data unavailable. Temperature data unavailable."
    );
    assert!(assessment.factors.iter().all(|factor| !factor.available));
}

#[test]
fn saturated_indicators_reach_the_maximum() {
    let assessment = engine()
        .aggregate(&full_set(12, 1.0, 6.0, 100.0, 1500.0))
        .expect("aggregates");

    assert_eq!(assessment.score, 10.0);
    assert!(assessment.data_sources.available().len() == 5);
}

#[test]
fn minimum_composite_is_the_elevation_floor() {
    let assessment = engine()
        .aggregate(&full_set(0, 0.0, -5.0, 0.0, 50.0))
        .expect("aggregates");

    assert_eq!(assessment.score, 0.2);
}

#[test]
fn low_risk_site_matches_hand_computed_factors() {
    let assessment = engine()
        .aggregate(&full_set(0, 0.1, -6.0, -10.0, 50.0))
        .expect("aggregates");

    let scores: Vec<f64> = assessment.factors.iter().map(|factor| factor.score).collect();
    let expected = [0.0, 1.0, 0.0, 0.0, 2.0];
    for (actual, expected) in scores.iter().zip(expected) {
        assert_close(*actual, expected);
    }

    let weighted: f64 = assessment
        .factors
        .iter()
        .map(|factor| factor.contribution)
        .sum();
    assert_close(weighted, 0.45);
    assert_eq!(assessment.score, 0.5);
}

#[test]
fn moderate_fire_history_appears_in_explanation() {
    let indicators = IndicatorSet {
        fire_count: Some(3),
        ..IndicatorSet::default()
    };

    let assessment = engine().aggregate(&indicators).expect("aggregates");

    let fire = &assessment.factors[0];
    assert_eq!(fire.kind, IndicatorKind::Fire);
    assert_close(fire.score, 5.0);
    assert!(assessment
        .explanation
        .contains("3 historical fires indicate moderate risk"));
    assert!(assessment.data_sources.fire);
    assert!(!assessment.data_sources.vegetation);
}

#[test]
fn explanation_uses_first_three_factors_in_fixed_order() {
    let assessment = engine()
        .aggregate(&full_set(8, 0.9, 4.0, 80.0, 900.0))
        .expect("aggregates");

    assert_eq!(
        assessment.explanation,
        "8 historical fires indicate high risk. High vegetation density (high fuel load). Temperature 4.0°C above average."
    );
    assert!(!assessment.explanation.contains("precipitation"));
}

#[test]
fn composite_stays_within_bounds() {
    let engine = engine();
    for fire_count in [0, 1, 2, 4, 7, 25] {
        for vegetation in [-0.5, 0.0, 0.29, 0.5, 0.75, 1.6] {
            for anomaly in [-12.0, -5.0, -1.0, 0.0, 3.0, 11.0] {
                for deficit in [-40.0, 0.0, 35.0, 60.0, 300.0] {
                    for elevation in [-50.0, 99.0, 250.0, 700.0, 5000.0] {
                        let set = full_set(fire_count, vegetation, anomaly, deficit, elevation);
                        let score = engine.aggregate(&set).expect("aggregates").score;
                        assert!((0.0..=10.0).contains(&score), "score {score} for {set:?}");
                    }
                }
            }
        }
    }
}

#[test]
fn aggregation_is_idempotent() {
    let set = IndicatorSet {
        fire_count: Some(2),
        vegetation_index: Some(0.48),
        temperature: Some(TemperatureInput::Readings(ReadingPair::new(31.0, 29.2))),
        precipitation: None,
        elevation_m: Some(420.0),
    };
    let engine = engine();

    let first = engine.aggregate(&set).expect("aggregates");
    let second = engine.aggregate(&set).expect("aggregates");

    assert_eq!(first, second);
    assert_eq!(first.raw_data, set);
}

#[test]
fn malformed_indicator_values_fail_fast() {
    let set = IndicatorSet {
        vegetation_index: Some(f64::INFINITY),
        ..IndicatorSet::default()
    };

    let error = engine().aggregate(&set).expect_err("non-finite values rejected");
    assert!(matches!(
        error,
        ScoringError::InvalidIndicator {
            kind: IndicatorKind::Vegetation,
            ..
        }
    ));
}

#[test]
fn weights_must_sum_to_one() {
    let weights = FactorWeights {
        fire_frequency: 0.5,
        ..FactorWeights::default()
    };

    match RiskEngine::new(weights) {
        Err(ScoringError::InvalidWeights { detail }) => assert!(detail.contains("sum")),
        other => panic!("expected invalid weights, got {other:?}"),
    }

    let negative = FactorWeights {
        fire_frequency: 0.6,
        elevation: -0.2,
        ..FactorWeights::default()
    };
    assert!(RiskEngine::new(negative).is_err());
}

#[test]
fn custom_weights_shift_the_composite() {
    let weights = FactorWeights {
        fire_frequency: 1.0,
        vegetation: 0.0,
        temperature: 0.0,
        precipitation: 0.0,
        elevation: 0.0,
    };
    let engine = RiskEngine::new(weights).expect("valid weights");

    let assessment = engine
        .aggregate(&full_set(4, 0.9, 5.0, 90.0, 1200.0))
        .expect("aggregates");

    assert_eq!(assessment.score, 6.0);
}

#[test]
fn display_scale_maps_boundaries() {
    assert_eq!(display_score(10.0), 100.0);
    assert_eq!(display_score(0.0), 0.0);
    assert_eq!(display_score(5.0), 50.0);
    assert_eq!(display_score(4.56), 45.6);
    assert_eq!(display_score(12.0), 100.0);
    assert_eq!(display_score(-1.0), 0.0);
}
