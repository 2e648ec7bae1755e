//! Runtime configuration.
//!
//! Settings come from environment variables. A malformed value is a
//! [`ConfigError`]; [`Config::from_env`] logs it and keeps the default.


/// Enables or disables the expression-interning cache.
pub const EXPR_CACHING_VAR: &str = "CLASSAD_EXPR_CACHING";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Route assignments through the process-wide expression cache.
    pub expr_caching: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config { expr_caching: true }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a boolean (true/false, yes/no, on/off, 1/0), got `{value}`")]
    NotABoolean { var: &'static str, value: String },
}

impl Config {
    /// Read the configuration from the process environment.
    ///
    /// Invalid settings are logged and replaced by their defaults.
    pub fn from_env() -> Self {
        Self::from_vars(|var| std::env::var(var).ok()).unwrap_or_else(|err| {
            tracing::warn!(%err, "ignoring invalid configuration");
            Config::default()
        })
    }

    /// Build a configuration from a variable lookup. Unset variables keep
    /// their defaults.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();
        if let Some(value) = var(EXPR_CACHING_VAR) {
            config.expr_caching = parse_bool(EXPR_CACHING_VAR, &value)?;
        }
        Ok(config)
    }
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::NotABoolean {
            var,
            value: value.to_owned(),
        }),
    }
}
