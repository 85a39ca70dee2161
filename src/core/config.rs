use std::str::FromStr;
use thiserror::Error;

use super::constants::{
    AUDIO_PATH, DRACO_DECODER_PATH, LOADING_DELAY_MS, MODEL_PATH, PARTICLE_COUNT,
};
use super::post::{PassChain, PassKind};

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("unknown composition {0:?} (expected \"full\" or \"particles\")")]
    Composition(String),
    #[error("invalid value {value:?} for {key}")]
    Value { key: &'static str, value: String },
    #[error("unknown setting {0:?}")]
    Key(String),
}

/// Which pieces the composition root wires together.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Composition {
    /// Audio-reactive brain, particles, scroll bindings and hero text.
    #[default]
    Full,
    /// Particle field, card reveals and hero text only.
    ParticlesOnly,
}

impl FromStr for Composition {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "brain" => Ok(Composition::Full),
            "particles" | "particles-only" => Ok(Composition::ParticlesOnly),
            other => Err(ConfigError::Composition(other.to_string())),
        }
    }
}

impl Composition {
    pub fn has_brain(self) -> bool {
        matches!(self, Composition::Full)
    }
}

/// Page-level settings; defaults come from the constants and `<body>` data
/// attributes may override them.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteConfig {
    pub composition: Composition,
    pub model_path: String,
    pub draco_path: String,
    pub audio_path: String,
    pub loading_delay_ms: i32,
    pub particle_count: usize,
    pub post_effects: PassChain,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            composition: Composition::default(),
            model_path: MODEL_PATH.to_string(),
            draco_path: DRACO_DECODER_PATH.to_string(),
            audio_path: AUDIO_PATH.to_string(),
            loading_delay_ms: LOADING_DELAY_MS,
            particle_count: PARTICLE_COUNT,
            post_effects: PassChain::default(),
        }
    }
}

impl SiteConfig {
    /// Data attribute names read from `<body>`, without the `data-` prefix.
    pub const KEYS: [&'static str; 7] = [
        "composition",
        "model-path",
        "draco-path",
        "audio-path",
        "loading-delay",
        "particle-count",
        "post-effects",
    ];

    pub fn apply(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "composition" => self.composition = value.parse()?,
            "model-path" => self.model_path = non_empty("model-path", value)?,
            "draco-path" => self.draco_path = directory("draco-path", value)?,
            "audio-path" => self.audio_path = non_empty("audio-path", value)?,
            "loading-delay" => {
                self.loading_delay_ms = value
                    .trim()
                    .parse::<i32>()
                    .ok()
                    .filter(|ms| *ms >= 0)
                    .ok_or_else(|| invalid("loading-delay", value))?
            }
            "particle-count" => {
                self.particle_count = value
                    .trim()
                    .parse::<usize>()
                    .map_err(|_| invalid("particle-count", value))?
            }
            "post-effects" => self.post_effects = parse_effects(value)?,
            other => return Err(ConfigError::Key(other.to_string())),
        }
        Ok(())
    }

    /// Apply every override, logging and skipping the invalid ones.
    pub fn with_overrides<'a>(overrides: impl IntoIterator<Item = (&'a str, String)>) -> Self {
        let mut config = Self::default();
        for (key, value) in overrides {
            if let Err(e) = config.apply(key, &value) {
                log::warn!("[app] ignoring setting: {}", e);
            }
        }
        config
    }
}

/// Comma-separated effect names, or `none` for the base render only.
fn parse_effects(value: &str) -> Result<PassChain, ConfigError> {
    let mut chain = PassChain::base_only();
    let list = value.trim();
    if list.eq_ignore_ascii_case("none") {
        return Ok(chain);
    }
    for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        let pass = PassKind::from_name(&name.to_ascii_lowercase())
            .ok_or_else(|| invalid("post-effects", value))?;
        chain.set_enabled(pass, true);
    }
    Ok(chain)
}

fn non_empty(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let v = value.trim();
    if v.is_empty() {
        Err(invalid(key, value))
    } else {
        Ok(v.to_string())
    }
}

/// Non-empty path with a trailing slash, so file names can be appended.
fn directory(key: &'static str, value: &str) -> Result<String, ConfigError> {
    let mut dir = non_empty(key, value)?;
    if !dir.ends_with('/') {
        dir.push('/');
    }
    Ok(dir)
}

fn invalid(key: &'static str, value: &str) -> ConfigError {
    ConfigError::Value {
        key,
        value: value.to_string(),
    }
}
