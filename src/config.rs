//! Configuration loading and clamping.
//!
//! Uses Figment to merge `briefrank.toml` (or the file named by
//! `BRIEFRANK_CONFIG`) with `BRIEFRANK_*` environment variables on top of
//! the built-in defaults. Invalid values never fail a request: they are
//! reset to defaults by [`SummaryConfig::sanitized`].

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::SummaryConfig;

/// Default config file, looked up in the working directory
pub const CONFIG_FILE: &str = "briefrank.toml";

/// Prefix for environment overrides (`BRIEFRANK_LAMBDA=0.75`)
pub const ENV_PREFIX: &str = "BRIEFRANK_";

/// Environment variable naming an alternative config file
pub const CONFIG_PATH_VAR: &str = "BRIEFRANK_CONFIG";

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).ignore(&["config"])
}

/// Load configuration from the default file and the environment.
///
/// A missing default file is not an error.
pub fn load() -> Result<SummaryConfig> {
    let file = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| CONFIG_FILE.to_string());
    let figment = Figment::new().merge(Toml::file(file)).merge(env_provider());
    from_figment(&figment)
}

/// Load configuration from an explicit TOML file plus the environment.
pub fn load_from(path: impl AsRef<Path>) -> Result<SummaryConfig> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(Error::Config(format!(
            "config file not found: {}",
            path.display()
        )));
    }
    let figment = Figment::new().merge(Toml::file(path)).merge(env_provider());
    from_figment(&figment)
}

/// Extract and sanitize a config from any figment.
pub fn from_figment(figment: &Figment) -> Result<SummaryConfig> {
    let config: SummaryConfig = figment.extract()?;
    Ok(config.sanitized())
}

impl SummaryConfig {
    /// Replace out-of-range values with defaults, logging each correction.
    pub fn sanitized(mut self) -> Self {
        let defaults = SummaryConfig::default();

        if let Some(ratio) = self.ratio {
            if !(ratio.is_finite() && ratio > 0.0 && ratio <= 1.0) {
                warn!(ratio, fallback = self.length.ratio(), "summary ratio out of range");
                self.ratio = None;
            }
        }
        if !self.lambda.is_finite() {
            warn!("lambda is not finite, using default");
            self.lambda = defaults.lambda;
        } else if !(0.0..=1.0).contains(&self.lambda) {
            warn!(lambda = self.lambda, "lambda clamped to [0, 1]");
            self.lambda = self.lambda.clamp(0.0, 1.0);
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            warn!(damping = self.damping, "damping out of range, using default");
            self.damping = defaults.damping;
        }
        if self.max_iterations == 0 {
            warn!("max_iterations is zero, using default");
            self.max_iterations = defaults.max_iterations;
        }
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            warn!(tolerance = self.tolerance, "tolerance out of range, using default");
            self.tolerance = defaults.tolerance;
        }
        if !(self.similarity_threshold.is_finite() && (0.0..1.0).contains(&self.similarity_threshold)) {
            warn!(
                threshold = self.similarity_threshold,
                "similarity threshold out of range, using default"
            );
            self.similarity_threshold = defaults.similarity_threshold;
        }
        if !(self.epsilon_weight.is_finite() && self.epsilon_weight > 0.0) {
            warn!(epsilon = self.epsilon_weight, "epsilon weight must be positive");
            self.epsilon_weight = defaults.epsilon_weight;
        }
        for (name, value, default) in [
            ("early_section_boost", &mut self.early_section_boost, defaults.early_section_boost),
            ("goal_section_boost", &mut self.goal_section_boost, defaults.goal_section_boost),
        ] {
            if !(value.is_finite() && *value >= 0.0) {
                warn!(field = name, value = *value, "boost must be non-negative");
                *value = default;
            }
        }
        if !(self.goal_title_weight.is_finite() && self.goal_title_weight > 0.0) {
            warn!(weight = self.goal_title_weight, "goal title weight must be positive");
            self.goal_title_weight = defaults.goal_title_weight;
        }
        if !(self.forced_goal_fraction.is_finite() && (0.0..=1.0).contains(&self.forced_goal_fraction)) {
            warn!(
                fraction = self.forced_goal_fraction,
                "forced goal fraction out of range, using default"
            );
            self.forced_goal_fraction = defaults.forced_goal_fraction;
        }
        if self.max_tokens == 0 {
            warn!("max_tokens is zero, using default");
            self.max_tokens = defaults.max_tokens;
        }

        self
    }
}
