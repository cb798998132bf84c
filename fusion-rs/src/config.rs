use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use common::SourceFamily;
use elevation_rs::{ComplementaryElevation, EwmaElevation};

use crate::errors::{ConfigError, FusionError};

/// Smoothing factors of the two elevation filters of one source family.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub ewma_alpha: f32,
    pub complementary_alpha: f32,
}

impl FilterConfig {
    pub fn internal() -> Self {
        Self {
            ewma_alpha: 0.9,
            complementary_alpha: 0.98,
        }
    }

    /// The wearable link is noisier, so its EWMA leans on history.
    pub fn external() -> Self {
        Self {
            ewma_alpha: 0.2,
            complementary_alpha: 0.98,
        }
    }

    pub(crate) fn build(&self) -> Result<(EwmaElevation, ComplementaryElevation), FusionError> {
        Ok((
            EwmaElevation::new(self.ewma_alpha)?,
            ComplementaryElevation::new(self.complementary_alpha)?,
        ))
    }

    fn validate(&self, family: &str) -> Result<(), ConfigError> {
        for (name, alpha) in [
            ("ewma_alpha", self.ewma_alpha),
            ("complementary_alpha", self.complementary_alpha),
        ] {
            if !(alpha > 0.0 && alpha < 1.0) {
                return Err(ConfigError::Invalid(format!(
                    "{}.{} must lie in (0, 1), got {}",
                    family, name, alpha
                )));
            }
        }
        Ok(())
    }
}

/// Fields of a filter section present in a config document. Missing ones keep the
/// family's own defaults.
#[derive(Deserialize)]
struct FilterOverrides {
    ewma_alpha: Option<f32>,
    complementary_alpha: Option<f32>,
}

impl FilterOverrides {
    fn over(self, base: FilterConfig) -> FilterConfig {
        FilterConfig {
            ewma_alpha: self.ewma_alpha.unwrap_or(base.ewma_alpha),
            complementary_alpha: self.complementary_alpha.unwrap_or(base.complementary_alpha),
        }
    }
}

fn internal_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FilterConfig, D::Error> {
    FilterOverrides::deserialize(deserializer).map(|o| o.over(FilterConfig::internal()))
}

fn external_section<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FilterConfig, D::Error> {
    FilterOverrides::deserialize(deserializer).map(|o| o.over(FilterConfig::external()))
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordingConfig {
    pub default_duration_ms: i64,
    /// How often the recorder checks whether the session has elapsed.
    pub tick_ms: u64,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: 20_000,
            tick_ms: 100,
        }
    }
}

/// Runtime configuration of the fusion engine.
///
/// Every field has a default, so a JSON document only needs the values it overrides:
///
/// ```
/// use fusion_rs::config::FusionConfig;
///
/// let config = FusionConfig::from_json_str(r#"{"external": {"ewma_alpha": 0.3}}"#).unwrap();
/// assert_eq!(config.external.ewma_alpha, 0.3);
/// assert_eq!(config.external.complementary_alpha, 0.98);
/// assert_eq!(config.internal.ewma_alpha, 0.9);
/// assert_eq!(config.recording.default_duration_ms, 20_000);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    #[serde(default = "FilterConfig::internal", deserialize_with = "internal_section")]
    pub internal: FilterConfig,
    #[serde(default = "FilterConfig::external", deserialize_with = "external_section")]
    pub external: FilterConfig,
    pub recording: RecordingConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            internal: FilterConfig::internal(),
            external: FilterConfig::external(),
            recording: RecordingConfig::default(),
        }
    }
}

impl FusionConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: FusionConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.internal.validate("internal")?;
        self.external.validate("external")?;
        if self.recording.default_duration_ms <= 0 {
            return Err(ConfigError::Invalid(
                "recording.default_duration_ms must be positive".to_string(),
            ));
        }
        if self.recording.tick_ms == 0 {
            return Err(ConfigError::Invalid(
                "recording.tick_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn filters(&self, family: SourceFamily) -> &FilterConfig {
        match family {
            SourceFamily::External => &self.external,
            SourceFamily::Internal => &self.internal,
        }
    }
}
