use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    error::{ConfigError, Result},
    params::EffectParameters,
};

/// Main configuration for film-look
///
/// This is the Parameter Source side of the pipeline boundary: slider values
/// are clamped to their declared ranges here, before they ever reach the
/// engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Effect slider values
    pub params: EffectParameters,

    /// Session/runner settings
    pub session: SessionConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|_| ConfigError::ParseFailed {
            path: path.display().to_string(),
        })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidValue {
            key: "config".to_string(),
            value: e.to_string(),
        })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.session.validate()?;

        for (name, _, _) in EffectParameters::RANGES {
            let value = self.param_by_name(name);
            if !value.is_finite() {
                return Err(ConfigError::InvalidValue {
                    key: format!("params.{}", name),
                    value: value.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Slider values with every parameter clamped to its declared range
    pub fn effective_params(&self) -> EffectParameters {
        self.params.clamped()
    }

    fn param_by_name(&self, name: &str) -> f32 {
        let p = &self.params;
        match name {
            "brightness" => p.brightness,
            "contrast" => p.contrast,
            "saturation" => p.saturation,
            "temperature" => p.temperature,
            "tint" => p.tint,
            "grain" => p.grain,
            "vignette" => p.vignette,
            "sepia" => p.sepia,
            "chromatic_aberration" => p.chromatic_aberration,
            "blur" => p.blur,
            "sparkle" => p.sparkle,
            "mono_noise" => p.mono_noise,
            "color_noise" => p.color_noise,
            "dust_noise" => p.dust_noise,
            _ => unreachable!("unknown parameter name: {name}"),
        }
    }
}

/// Session/runner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of worker threads for per-row pixel loops
    pub processing_threads: usize,

    /// Seed override; when unset the seed sequence starts from entropy
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            processing_threads: num_cpus::get(),
            seed: None,
        }
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.processing_threads == 0 {
            return Err(ConfigError::InvalidValue {
                key: "session.processing_threads".to_string(),
                value: self.processing_threads.to_string(),
            }
            .into());
        }
        Ok(())
    }
}
