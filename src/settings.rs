//! Settings
//!
//! Backend-side thresholds that decide which products count as overpriced and
//! how competitor matches are bucketed by confidence.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `GET /settings` and the body of `POST /settings`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lowest match score counted as high confidence
    #[serde(with = "rust_decimal::serde::float")]
    pub confidence_high: Decimal,

    /// Lowest match score counted as medium confidence
    #[serde(with = "rust_decimal::serde::float")]
    pub confidence_medium: Decimal,

    /// Price index from which a product is flagged as overpriced
    #[serde(with = "rust_decimal::serde::float")]
    pub overprice_threshold: Decimal,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            confidence_high: Decimal::new(85, 2),
            confidence_medium: Decimal::new(60, 2),
            overprice_threshold: Decimal::new(110, 2),
        }
    }
}

/// Confidence bucket of a match score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfidenceBand {
    /// Below the medium threshold.
    Low,

    /// From the medium threshold up to the high one.
    Medium,

    /// At or above the high threshold.
    High,
}

/// Settings the backend would not accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SettingsError {
    /// A confidence threshold is outside `0..=1`.
    #[error("confidence thresholds must be between 0 and 1, got {0}")]
    ConfidenceOutOfRange(Decimal),

    /// The medium threshold is above the high one.
    #[error("medium confidence {medium} is above high confidence {high}")]
    ConfidenceOrder {
        /// Medium threshold
        medium: Decimal,

        /// High threshold
        high: Decimal,
    },

    /// The overprice threshold is outside `1..=2`.
    #[error("overprice threshold must be between 1 and 2, got {0}")]
    ThresholdOutOfRange(Decimal),
}

impl Settings {
    /// Check the thresholds against the ranges the settings screen allows.
    ///
    /// # Errors
    ///
    /// Returns the first [`SettingsError`] found.
    pub fn validate(&self) -> Result<(), SettingsError> {
        for confidence in [self.confidence_medium, self.confidence_high] {
            if confidence < Decimal::ZERO || confidence > Decimal::ONE {
                return Err(SettingsError::ConfidenceOutOfRange(confidence));
            }
        }

        if self.confidence_medium > self.confidence_high {
            return Err(SettingsError::ConfidenceOrder {
                medium: self.confidence_medium,
                high: self.confidence_high,
            });
        }

        if self.overprice_threshold < Decimal::ONE || self.overprice_threshold > Decimal::TWO {
            return Err(SettingsError::ThresholdOutOfRange(self.overprice_threshold));
        }

        Ok(())
    }

    /// Bucket a match score.
    pub fn classify(&self, score: Decimal) -> ConfidenceBand {
        if score >= self.confidence_high {
            ConfidenceBand::High
        } else if score >= self.confidence_medium {
            ConfidenceBand::Medium
        } else {
            ConfidenceBand::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[test]
    fn classify_uses_inclusive_lower_bounds() {
        let settings = Settings::default();

        assert_eq!(settings.classify(Decimal::new(85, 2)), ConfidenceBand::High);
        assert_eq!(settings.classify(Decimal::new(84, 2)), ConfidenceBand::Medium);
        assert_eq!(settings.classify(Decimal::new(60, 2)), ConfidenceBand::Medium);
        assert_eq!(settings.classify(Decimal::new(59, 2)), ConfidenceBand::Low);
    }

    #[test]
    fn validate_rejects_crossed_confidence() {
        let settings = Settings {
            confidence_high: Decimal::new(5, 1),
            confidence_medium: Decimal::new(7, 1),
            ..Settings::default()
        };

        assert_eq!(
            settings.validate(),
            Err(SettingsError::ConfidenceOrder {
                medium: Decimal::new(7, 1),
                high: Decimal::new(5, 1),
            })
        );
    }

    #[test]
    fn validate_rejects_out_of_range_values() {
        let confidence = Settings {
            confidence_high: Decimal::new(12, 1),
            ..Settings::default()
        };
        let threshold = Settings {
            overprice_threshold: Decimal::new(9, 1),
            ..Settings::default()
        };

        assert_eq!(
            confidence.validate(),
            Err(SettingsError::ConfidenceOutOfRange(Decimal::new(12, 1)))
        );
        assert_eq!(
            threshold.validate(),
            Err(SettingsError::ThresholdOutOfRange(Decimal::new(9, 1)))
        );
    }

    #[test]
    fn reads_partial_response_with_defaults() -> TestResult {
        let settings: Settings = serde_json::from_str(r#"{ "overprice_threshold": 1.25 }"#)?;

        assert_eq!(settings.overprice_threshold, Decimal::new(125, 2));
        assert_eq!(settings.confidence_high, Decimal::new(85, 2));

        Ok(())
    }
}
