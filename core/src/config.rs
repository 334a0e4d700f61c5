//! Engine tuning constants, loadable from a JSON file.
//!
//! Defaults are the reference domain values (200 / 1500, one hour window).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Starting limit at or below which an amount is allowed.
    pub allowed: i64,
    /// Starting limit at or below which an amount goes to manual review.
    pub manual: i64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self { allowed: 200, manual: 1500 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// Length of the trailing window, in seconds.
    pub window_seconds: i64,
    /// Distinct other values at which review is required.
    pub manual_at: usize,
    /// Distinct other values above which the transaction is prohibited.
    pub prohibited_above: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            window_seconds:   3600,
            manual_at:        2,
            prohibited_above: 2,
        }
    }
}

impl CorrelationConfig {
    /// `None` when `window_seconds` is beyond what a duration can hold.
    pub fn window(&self) -> Option<chrono::Duration> {
        chrono::Duration::try_seconds(self.window_seconds)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub correlation: CorrelationConfig,
}

impl EngineConfig {
    /// Load from a JSON file. Missing sections fall back to defaults.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.thresholds.allowed > self.thresholds.manual {
            anyhow::bail!(
                "allowed threshold {} exceeds manual threshold {}",
                self.thresholds.allowed,
                self.thresholds.manual
            );
        }
        if self.correlation.window_seconds <= 0 {
            anyhow::bail!("correlation window must be positive");
        }
        if self.correlation.window().is_none() {
            anyhow::bail!(
                "correlation window of {}s is out of range",
                self.correlation.window_seconds
            );
        }
        if self.correlation.manual_at > self.correlation.prohibited_above + 1 {
            anyhow::bail!("correlation manual_at must not exceed prohibited_above + 1");
        }
        Ok(())
    }
}
