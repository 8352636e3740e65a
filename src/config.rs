//! Runtime configuration for the version store and the renderer.
//!
//! # Examples
//!
//! ```rust
//! use deckforge::DeckConfig;
//!
//! // Defaults
//! let config = DeckConfig::default();
//! assert_eq!(config.subtitle_max_chars, 120);
//!
//! // Or customize
//! let config = DeckConfig::new()
//!     .with_default_theme("ocean")
//!     .with_body_font_range(18, 11);
//! ```
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::common::{Error, Result};
use crate::theme::DEFAULT_THEME;

/// Environment variable overriding [`DeckConfig::session_ttl_seconds`].
pub const ENV_SESSION_TTL: &str = "DECKFORGE_SESSION_TTL";
/// Environment variable overriding [`DeckConfig::default_theme`].
pub const ENV_DEFAULT_THEME: &str = "DECKFORGE_DEFAULT_THEME";

/// Store and renderer settings; every key is optional in TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Idle time after which a session expires
    pub session_ttl_seconds: u64,
    /// Period of the background expiry sweep
    pub sweep_interval_seconds: u64,
    /// Theme used when a session has none
    pub default_theme: String,
    /// Title-slide subtitle truncation bound, in characters
    pub subtitle_max_chars: usize,
    /// Auto-fit ceiling for body text, in points
    pub body_max_font_pt: u32,
    /// Auto-fit floor for body text, in points
    pub body_min_font_pt: u32,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            session_ttl_seconds: 3600,
            sweep_interval_seconds: 60,
            default_theme: DEFAULT_THEME.to_string(),
            subtitle_max_chars: 120,
            body_max_font_pt: 16,
            body_min_font_pt: 10,
        }
    }
}

impl DeckConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl_seconds = ttl.as_secs();
        self
    }

    #[inline]
    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval_seconds = interval.as_secs();
        self
    }

    #[inline]
    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    #[inline]
    pub fn with_subtitle_max_chars(mut self, chars: usize) -> Self {
        self.subtitle_max_chars = chars;
        self
    }

    /// Set the auto-fit ceiling and floor for body text.
    #[inline]
    pub fn with_body_font_range(mut self, max_pt: u32, min_pt: u32) -> Self {
        self.body_max_font_pt = max_pt;
        self.body_min_font_pt = min_pt;
        self
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|err| Error::Config(format!("failed to read {}: {err}", path.display())))?;
        Self::from_toml_str(&raw)
    }

    /// Defaults overridden by `DECKFORGE_SESSION_TTL` and
    /// `DECKFORGE_DEFAULT_THEME`.
    pub fn from_env() -> Result<Self> {
        Self::default().with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(raw) = lookup(ENV_SESSION_TTL) {
            self.session_ttl_seconds = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_SESSION_TTL} is not a number of seconds: {raw:?}")))?;
        }
        if let Some(theme) = lookup(ENV_DEFAULT_THEME) {
            let theme = theme.trim();
            if !theme.is_empty() {
                self.default_theme = theme.to_string();
            }
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.session_ttl_seconds == 0 {
            return Err(Error::Config("session_ttl_seconds must be greater than zero".into()));
        }
        if self.sweep_interval_seconds == 0 {
            return Err(Error::Config("sweep_interval_seconds must be greater than zero".into()));
        }
        if self.body_min_font_pt == 0 {
            return Err(Error::Config("body_min_font_pt must be greater than zero".into()));
        }
        if self.body_max_font_pt < self.body_min_font_pt {
            return Err(Error::Config(format!(
                "body_max_font_pt ({}) is below body_min_font_pt ({})",
                self.body_max_font_pt, self.body_min_font_pt
            )));
        }
        Ok(())
    }
}
