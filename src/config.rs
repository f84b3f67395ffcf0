//! Environment-driven configuration

use crate::catalog::{load_catalog, CatalogError, CatalogPreset, ResponseCatalog};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_REPLY_DELAY: Duration = Duration::from_millis(1000);
const DEFAULT_WELCOME_DURATION: Duration = Duration::from_millis(3500);

/// Runtime settings for the assistant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssistantConfig {
    /// Thinking delay before each bot reply
    pub reply_delay: Duration,
    /// How long the welcome banner stays up
    pub welcome_duration: Duration,
    /// JSON catalog; wins over `preset` when set
    pub catalog_path: Option<PathBuf>,
    pub preset: CatalogPreset,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_delay: DEFAULT_REPLY_DELAY,
            welcome_duration: DEFAULT_WELCOME_DURATION,
            catalog_path: None,
            preset: CatalogPreset::default(),
        }
    }
}

impl AssistantConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; malformed values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            reply_delay: millis(&lookup, "MUJ_REPLY_DELAY_MS").unwrap_or(defaults.reply_delay),
            welcome_duration: millis(&lookup, "MUJ_WELCOME_MS")
                .unwrap_or(defaults.welcome_duration),
            catalog_path: lookup("MUJ_CATALOG_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            preset: parsed(&lookup, "MUJ_CATALOG_PRESET").unwrap_or(defaults.preset),
        }
    }

    /// Load the configured catalog
    pub fn load_catalog(&self) -> Result<ResponseCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => load_catalog(path),
            None => self.preset.catalog(),
        }
    }
}

fn millis<F>(lookup: &F, key: &str) -> Option<Duration>
where
    F: Fn(&str) -> Option<String>,
{
    parsed::<u64, F>(lookup, key).map(Duration::from_millis)
}

fn parsed<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid setting");
            None
        }
    }
}
