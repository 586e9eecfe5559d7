use crate::error::{EngineError, EngineResult};
use blockpress_locale::LocaleSettings;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the render pipeline.
///
/// ```toml
/// max_in_flight = 8
/// enrich_timeout_ms = 5000
///
/// [locales]
/// default_locale = "en"
///
/// [locales.fallbacks]
/// "de-AT" = "de"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum enrichment calls running at once per render.
    pub max_in_flight: usize,
    /// Per-node enrichment deadline.
    pub enrich_timeout_ms: u64,
    pub locales: LocaleSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_in_flight: 8,
            enrich_timeout_ms: 5_000,
            locales: LocaleSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Parses and validates a TOML document. Missing keys take defaults.
    pub fn from_toml_str(s: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| EngineError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.max_in_flight == 0 {
            return Err(EngineError::Config("max_in_flight must be at least 1".into()));
        }
        if self.enrich_timeout_ms == 0 {
            return Err(EngineError::Config("enrich_timeout_ms must be positive".into()));
        }
        if self.locales.default_locale.is_empty() {
            return Err(EngineError::Config("default_locale must not be empty".into()));
        }
        Ok(())
    }

    pub fn enrich_timeout(&self) -> Duration {
        Duration::from_millis(self.enrich_timeout_ms)
    }
}
