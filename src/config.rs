//! Process configuration.
//!
//! Loaded once at startup from TOML and treated as read-only afterwards.
//! Every field has a default, so an empty file is a valid config.
//!
//! ```toml
//! layout = "deck-v1"
//! preference_order = [2, 1]
//!
//! [thresholds]
//! axis_threshold = 1000
//! trigger_threshold = 5
//!
//! [poll]
//! interval_ms = 10
//! read_timeout_ms = 200
//! max_consecutive_errors = 5
//! ```
//!
//! A custom table can replace the built-in layout:
//!
//! ```toml
//! [layout]
//! name = "bench-rig"
//! version = 1
//! min_len = 16
//! buttons = [{ offset = 0, mask = 1, button = "A" }]
//! sticks = { lx = 2, ly = 4, rx = 6, ry = 8 }
//! triggers = { lt = 10, rt = 11, encoding = "u8" }
//! ```

use crate::error::{ConfigError, ConfigResult};
use crate::filter::ChangeThresholds;
use crate::layout::{LayoutId, ReportLayout};
use crate::selection::DEFAULT_PREFERENCE_ORDER;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Which report layout to decode with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayoutSelection {
    /// A built-in table, by id (`"deck-v2"`, `"deck-v1"`, `"compact"`).
    Named(String),
    /// An inline table.
    Custom(ReportLayout),
}

impl Default for LayoutSelection {
    fn default() -> Self {
        LayoutSelection::Named(LayoutId::default().as_str().to_string())
    }
}

/// Settings for the polling driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    /// Sleep between polls.
    pub interval_ms: u64,
    /// How long one read may block before counting as "no data".
    pub read_timeout_ms: i32,
    /// Hard read errors in a row before the driver stops.
    pub max_consecutive_errors: u32,
    /// Re-send the mode-setting feature reports before every read.
    pub reassert_feature_reports: bool,
    /// Stop after this many polls. `None` runs until stopped.
    pub max_polls: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval_ms: 10,
            read_timeout_ms: 200,
            max_consecutive_errors: 5,
            reassert_feature_reports: true,
            max_polls: None,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutSelection,
    pub thresholds: ChangeThresholds,
    pub preference_order: Vec<i32>,
    pub poll: PollSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            layout: LayoutSelection::default(),
            thresholds: ChangeThresholds::default(),
            preference_order: DEFAULT_PREFERENCE_ORDER.to_vec(),
            poll: PollSettings::default(),
        }
    }
}

impl Config {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(path = %path.display(), layout = ?config.layout, "config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.thresholds.validate()?;
        if self.preference_order.is_empty() {
            return Err(ConfigError::EmptyPreferenceOrder);
        }
        self.resolve_layout().map(|_| ())
    }

    /// The active layout: a built-in table by id, or the validated inline table.
    pub fn resolve_layout(&self) -> ConfigResult<ReportLayout> {
        let layout = match &self.layout {
            LayoutSelection::Named(id) => id.parse::<LayoutId>()?.layout(),
            LayoutSelection::Custom(layout) => layout.clone(),
        };
        layout.validate()?;
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::TriggerEncoding;
    use crate::snapshot::Button;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_toml_str("").expect("parse empty");
        assert_eq!(config, Config::default());
        assert_eq!(config.preference_order, vec![2, 1]);
        assert_eq!(config.thresholds.axis_threshold, 1000);
        assert_eq!(config.thresholds.trigger_threshold, 5);
        assert_eq!(
            config.resolve_layout().expect("layout"),
            ReportLayout::deck_v2()
        );
    }

    #[test]
    fn test_named_layout_and_overrides() {
        let config = Config::from_toml_str(
            r#"
            layout = "compact"
            preference_order = [1]

            [thresholds]
            axis_threshold = 250

            [poll]
            interval_ms = 4
            max_polls = 5000
            "#,
        )
        .expect("parse");
        assert_eq!(config.preference_order, vec![1]);
        assert_eq!(config.thresholds.axis_threshold, 250);
        assert_eq!(config.thresholds.trigger_threshold, 5);
        assert_eq!(config.poll.interval_ms, 4);
        assert_eq!(config.poll.max_polls, Some(5000));
        assert_eq!(config.poll.read_timeout_ms, 200);
        assert_eq!(config.resolve_layout().expect("layout").min_len, 16);
    }

    #[test]
    fn test_custom_layout() {
        let config = Config::from_toml_str(
            r#"
            [layout]
            name = "bench-rig"
            version = 3
            min_len = 16
            buttons = [
                { offset = 0, mask = 1, button = "A" },
                { offset = 0, mask = 2, button = "DPad-Up" },
            ]
            sticks = { lx = 2, ly = 4, rx = 6, ry = 8 }
            triggers = { lt = 10, rt = 12, encoding = "u16-folded" }
            "#,
        )
        .expect("parse");
        let layout = config.resolve_layout().expect("layout");
        assert_eq!(layout.name, "bench-rig");
        assert_eq!(layout.version, 3);
        assert_eq!(
            layout.declared_buttons().collect::<Vec<_>>(),
            vec![Button::A, Button::DPadUp]
        );
        assert_eq!(layout.triggers.encoding, TriggerEncoding::U16Folded);
    }

    #[test]
    fn test_unknown_layout() {
        assert!(matches!(
            Config::from_toml_str(r#"layout = "deck-v9""#),
            Err(ConfigError::UnknownLayout(_))
        ));
    }

    #[test]
    fn test_invalid_custom_layout() {
        let result = Config::from_toml_str(
            r#"
            [layout]
            name = "broken"
            version = 1
            min_len = 16
            sticks = { lx = 2, ly = 4, rx = 6, ry = 15 }
            triggers = { lt = 10, rt = 11, encoding = "u8" }
            "#,
        );
        assert!(matches!(result, Err(ConfigError::InvalidLayout { .. })));
    }

    #[test]
    fn test_rejects_empty_preference_order() {
        assert!(matches!(
            Config::from_toml_str("preference_order = []"),
            Err(ConfigError::EmptyPreferenceOrder)
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            Config::from_toml_str("thresholds = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            Config::load("/nonexistent/deckreport.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
