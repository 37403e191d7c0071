//! Pipeline configuration parameters
//!
//! All tunable parameters for the dimmer.  Values are fixed at startup;
//! the pipeline never re-reads them while running.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Depth of the filter's rolling history (compile-time, no heap).
pub const HISTORY_DEPTH: usize = 10;

/// What the sampler does when it finds its release instant already past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverrunPolicy {
    /// Release immediately without sleeping; the next release stays on the
    /// original grid (`previous + period`).
    #[default]
    CatchUp,
    /// Drop every missed release and sleep to the first grid instant after now.
    SkipMissed,
}

/// Core pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    // --- Sampler ---
    /// Sampling period (milliseconds)
    pub sample_period_ms: u32,
    /// Largest valid raw reading (10-bit ADC → 1023)
    pub adc_max: u16,
    /// Overrun handling for the periodic release
    pub overrun_policy: OverrunPolicy,

    // --- Filter ---
    /// Half-width of the Pass-2 acceptance band, percent of the Pass-1 average
    pub band_percent: u8,

    // --- Actuator ---
    /// PWM period (microseconds)
    pub pwm_period_us: u32,

    // --- Supervision ---
    /// How long a stage waits for upstream data before reporting a stall
    /// (`None` = wait forever without reporting)
    pub stall_timeout_ms: Option<u32>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            // Sampler
            sample_period_ms: 1000, // 1 Hz
            adc_max: 1023,
            overrun_policy: OverrunPolicy::CatchUp,

            // Filter
            band_percent: 10,

            // Actuator
            pwm_period_us: 1000, // 1 kHz

            // Supervision
            stall_timeout_ms: Some(3000), // three missed periods
        }
    }
}

impl PipelineConfig {
    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.sample_period_ms == 0 {
            return Err(Error::Config("sample_period_ms must be > 0"));
        }
        if self.adc_max == 0 {
            return Err(Error::Config("adc_max must be > 0"));
        }
        if self.band_percent > 100 {
            return Err(Error::Config("band_percent must be <= 100"));
        }
        if self.pwm_period_us == 0 {
            return Err(Error::Config("pwm_period_us must be > 0"));
        }
        if let Some(timeout) = self.stall_timeout_ms {
            if timeout <= self.sample_period_ms {
                return Err(Error::Config(
                    "stall_timeout_ms must exceed sample_period_ms",
                ));
            }
        }
        Ok(())
    }

    /// Parse a JSON document (missing fields take defaults) and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON"))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = PipelineConfig::default();
        assert!(c.validate().is_ok());
        assert_eq!(c.sample_period_ms, 1000);
        assert_eq!(c.adc_max, 1023);
        assert_eq!(c.band_percent, 10);
        assert_eq!(c.overrun_policy, OverrunPolicy::CatchUp);
    }

    #[test]
    fn stall_timeout_must_exceed_period() {
        let c = PipelineConfig {
            stall_timeout_ms: Some(1000),
            ..PipelineConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(Error::Config("stall_timeout_ms must exceed sample_period_ms"))
        );

        let c = PipelineConfig {
            stall_timeout_ms: None,
            ..PipelineConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn zero_period_rejected() {
        let c = PipelineConfig {
            sample_period_ms: 0,
            ..PipelineConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn band_above_hundred_percent_rejected() {
        let c = PipelineConfig {
            band_percent: 101,
            ..PipelineConfig::default()
        };
        assert!(c.validate().is_err());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let c = PipelineConfig::from_json(
            r#"{ "sample_period_ms": 250, "overrun_policy": "skip_missed" }"#,
        )
        .unwrap();
        assert_eq!(c.sample_period_ms, 250);
        assert_eq!(c.overrun_policy, OverrunPolicy::SkipMissed);
        assert_eq!(c.adc_max, 1023);
        assert_eq!(c.stall_timeout_ms, Some(3000));
    }

    #[test]
    fn malformed_or_invalid_json_rejected() {
        assert_eq!(
            PipelineConfig::from_json("{ not json"),
            Err(Error::Config("malformed JSON"))
        );
        assert!(PipelineConfig::from_json(r#"{ "adc_max": 0 }"#).is_err());
    }
}
