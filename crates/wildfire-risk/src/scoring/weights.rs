use serde::{Deserialize, Serialize};

use super::ScoringError;
use crate::indicators::IndicatorKind;

const SUM_TOLERANCE: f64 = 1e-6;

/// Share of the composite score contributed by each factor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    pub fire_frequency: f64,
    pub vegetation: f64,
    pub temperature: f64,
    pub precipitation: f64,
    pub elevation: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            fire_frequency: 0.30,
            vegetation: 0.25,
            temperature: 0.20,
            precipitation: 0.15,
            elevation: 0.10,
        }
    }
}

impl FactorWeights {
    pub fn weight(&self, kind: IndicatorKind) -> f64 {
        match kind {
            IndicatorKind::Fire => self.fire_frequency,
            IndicatorKind::Vegetation => self.vegetation,
            IndicatorKind::Temperature => self.temperature,
            IndicatorKind::Precipitation => self.precipitation,
            IndicatorKind::Elevation => self.elevation,
        }
    }

    /// Each weight must be a fraction and together they must sum to one,
    /// which keeps the composite inside the 0-10 range.
    pub fn validate(&self) -> Result<(), ScoringError> {
        for kind in IndicatorKind::ordered() {
            let weight = self.weight(kind);
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(ScoringError::InvalidWeights {
                    detail: format!("{} weight {weight} is outside [0, 1]", kind.key()),
                });
            }
        }

        let total: f64 = IndicatorKind::ordered()
            .into_iter()
            .map(|kind| self.weight(kind))
            .sum();
        if (total - 1.0).abs() > SUM_TOLERANCE {
            return Err(ScoringError::InvalidWeights {
                detail: format!("weights sum to {total:.4}, expected 1.0"),
            });
        }

        Ok(())
    }
}
