//! Weighted aggregation of indicator sub-scores into a 0-10 wildfire score.

pub mod curves;
pub mod scale;
mod weights;

#[cfg(test)]
mod tests;

pub use curves::{CurveScore, NEUTRAL_SCORE};
pub use scale::display_score;
pub use weights::FactorWeights;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::indicators::{IndicatorKind, IndicatorSet};

/// Number of factor rationales surfaced in the explanation, taken in fixed
/// factor order.
const EXPLANATION_FACTORS: usize = 3;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("invalid {kind:?} indicator: {detail}")]
    InvalidIndicator { kind: IndicatorKind, detail: String },
    #[error("invalid factor weights: {detail}")]
    InvalidWeights { detail: String },
}

/// Stateless scorer applying the curves and weights to an indicator set.
/// Safe to share across requests without locking.
#[derive(Debug, Clone, Default)]
pub struct RiskEngine {
    weights: FactorWeights,
}

impl RiskEngine {
    pub fn new(weights: FactorWeights) -> Result<Self, ScoringError> {
        weights.validate()?;
        Ok(Self { weights })
    }

    /// Scores whatever subset of indicators is present. Missing indicators
    /// never fail; only malformed values do.
    pub fn aggregate(&self, indicators: &IndicatorSet) -> Result<RiskAssessment, ScoringError> {
        indicators.validate()?;

        let factors: Vec<FactorScore> = IndicatorKind::ordered()
            .into_iter()
            .map(|kind| {
                let CurveScore { score, rationale } = curves::score_slot(kind, indicators);
                let weight = self.weights.weight(kind);
                FactorScore {
                    kind,
                    score,
                    weight,
                    contribution: score * weight,
                    available: indicators.is_available(kind),
                    rationale,
                }
            })
            .collect();

        let total: f64 = factors.iter().map(|factor| factor.contribution).sum();
        let score = scale::round_to_tenth(total);
        let explanation = compose_explanation(&factors);
        let data_sources = DataSources::from_indicators(indicators);

        debug!(
            score,
            available = data_sources.available().len(),
            "wildfire risk aggregated"
        );

        Ok(RiskAssessment {
            score,
            explanation,
            data_sources,
            raw_data: indicators.clone(),
            factors,
        })
    }
}

// TODO: surface the factors with the largest weighted contribution instead
// of the first three once report consumers agree on the wording.
fn compose_explanation(factors: &[FactorScore]) -> String {
    let mut explanation = factors
        .iter()
        .take(EXPLANATION_FACTORS)
        .map(|factor| factor.rationale.as_str())
        .collect::<Vec<_>>()
        .join(". ");
    if factors.len() > EXPLANATION_FACTORS {
        explanation.push('.');
    }
    explanation
}

/// One factor's contribution, kept for audits and diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub kind: IndicatorKind,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
    pub available: bool,
    pub rationale: String,
}

/// Which indicators were backed by real data rather than the neutral default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSources {
    pub fire: bool,
    pub vegetation: bool,
    pub temperature: bool,
    pub precipitation: bool,
    pub elevation: bool,
}

impl DataSources {
    pub fn from_indicators(indicators: &IndicatorSet) -> Self {
        Self {
            fire: indicators.is_available(IndicatorKind::Fire),
            vegetation: indicators.is_available(IndicatorKind::Vegetation),
            temperature: indicators.is_available(IndicatorKind::Temperature),
            precipitation: indicators.is_available(IndicatorKind::Precipitation),
            elevation: indicators.is_available(IndicatorKind::Elevation),
        }
    }

    pub fn get(&self, kind: IndicatorKind) -> bool {
        match kind {
            IndicatorKind::Fire => self.fire,
            IndicatorKind::Vegetation => self.vegetation,
            IndicatorKind::Temperature => self.temperature,
            IndicatorKind::Precipitation => self.precipitation,
            IndicatorKind::Elevation => self.elevation,
        }
    }

    pub fn available(&self) -> Vec<IndicatorKind> {
        IndicatorKind::ordered()
            .into_iter()
            .filter(|kind| self.get(*kind))
            .collect()
    }
}

/// Composite wildfire score on the 0-10 scale with its rationale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub explanation: String,
    pub data_sources: DataSources,
    pub raw_data: IndicatorSet,
    pub factors: Vec<FactorScore>,
}

impl RiskAssessment {
    pub fn is_data_driven(&self) -> bool {
        !self.data_sources.available().is_empty()
    }
}
