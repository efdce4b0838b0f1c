//! Judging weight vectors

use crate::core::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::score::MetricScores;

const SUM_TOLERANCE: f64 = 1e-9;

/// Relative weight of each judging metric.
///
/// Always sums to 1: every constructor normalizes, and malformed input
/// (negative, non-finite, or all-zero components) falls back to
/// [`WeightVector::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightVector {
    pub accuracy: f64,
    pub completeness: f64,
    pub clarity: f64,
    pub insight: f64,
}

impl WeightVector {
    pub const DEFAULT: WeightVector = WeightVector {
        accuracy: 0.3,
        completeness: 0.3,
        clarity: 0.2,
        insight: 0.2,
    };

    /// Normalize raw components so they sum to 1.
    ///
    /// A vector that already sums to 1 is returned untouched.
    pub fn normalize(accuracy: f64, completeness: f64, clarity: f64, insight: f64) -> Self {
        let parts = [accuracy, completeness, clarity, insight];
        if parts.iter().any(|p| !p.is_finite() || *p < 0.0) {
            return Self::DEFAULT;
        }

        let sum: f64 = parts.iter().sum();
        if sum <= SUM_TOLERANCE {
            return Self::DEFAULT;
        }

        if (sum - 1.0).abs() <= SUM_TOLERANCE {
            return Self {
                accuracy,
                completeness,
                clarity,
                insight,
            };
        }

        Self {
            accuracy: accuracy / sum,
            completeness: completeness / sum,
            clarity: clarity / sum,
            insight: insight / sum,
        }
    }

    /// Re-normalize this vector (no-op for vectors built through `normalize`)
    pub fn normalized(&self) -> Self {
        Self::normalize(self.accuracy, self.completeness, self.clarity, self.insight)
    }

    pub fn sum(&self) -> f64 {
        self.accuracy + self.completeness + self.clarity + self.insight
    }

    pub fn as_array(&self) -> [f64; 4] {
        [self.accuracy, self.completeness, self.clarity, self.insight]
    }

    /// Weighted mean of the metrics, in [0,10]
    pub fn weighted(&self, metrics: &MetricScores) -> f64 {
        self.accuracy * metrics.accuracy
            + self.completeness * metrics.completeness
            + self.clarity * metrics.clarity
            + self.insight * metrics.insight
    }
}

impl Default for WeightVector {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for WeightVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.2},{:.2},{:.2},{:.2}",
            self.accuracy, self.completeness, self.clarity, self.insight
        )
    }
}

impl std::str::FromStr for WeightVector {
    type Err = DomainError;

    /// Parse `"acc,comp,clar,ins"`; the result is normalized
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = s
            .split(',')
            .map(|p| p.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .map_err(|e| DomainError::InvalidWeights(format!("{}: {}", s, e)))?;

        match parts.as_slice() {
            [a, b, c, d] => Ok(Self::normalize(*a, *b, *c, *d)),
            _ => Err(DomainError::InvalidWeights(format!(
                "expected 4 comma-separated values, got {}",
                parts.len()
            ))),
        }
    }
}
