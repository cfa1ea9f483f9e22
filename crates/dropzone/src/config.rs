//! Drop-target configuration.
//!
//! Deserializes from the same JSON a web frontend would pass as props (camelCase keys),
//! with snake_case aliases for hand-written config files.

use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::criteria::{CriteriaSpec, OverflowPolicy, parse_accept_list};
use crate::error::ConfigError;

/// Every option of a drop target, with its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropTargetConfig {
    /// Comma separated accept patterns; a JSON list is joined. Empty accepts anything.
    #[serde(default, deserialize_with = "deserialize_accept")]
    pub accept: String,
    #[serde(alias = "min_size", default)]
    pub min_size: u64,
    #[serde(alias = "max_size", default = "default_max_size")]
    pub max_size: u64,
    /// False limits drops to a single item
    #[serde(default = "default_true")]
    pub multiple: bool,
    /// Item limit when `multiple` is true; none means unbounded
    #[serde(alias = "max_items", default)]
    pub max_items: Option<u32>,
    #[serde(default)]
    pub overflow: OverflowPolicy,
    #[serde(alias = "disable_preview", default)]
    pub disable_preview: bool,
    #[serde(alias = "disable_click", default)]
    pub disable_click: bool,
    #[serde(default)]
    pub disabled: bool,
    /// Suppress the host's default handling of drops that miss every target
    #[serde(alias = "prevent_drop_on_document", default = "default_true")]
    pub prevent_drop_on_document: bool,
    /// Delay between window focus and the picker-cancel check
    #[serde(alias = "dialog_settle_ms", default = "default_dialog_settle_ms")]
    pub dialog_settle_ms: u64,
    /// Max sibling subtrees walked at once when expanding dropped directories
    #[serde(alias = "walk_concurrency", default = "default_walk_concurrency")]
    pub walk_concurrency: usize,
}

fn default_max_size() -> u64 {
    u64::MAX
}

fn default_true() -> bool {
    true
}

fn default_dialog_settle_ms() -> u64 {
    300
}

fn default_walk_concurrency() -> usize {
    4
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AcceptField {
    One(String),
    Many(Vec<String>),
}

fn deserialize_accept<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match AcceptField::deserialize(deserializer)? {
        AcceptField::One(accept) => accept,
        AcceptField::Many(patterns) => patterns.join(","),
    })
}

impl Default for DropTargetConfig {
    fn default() -> Self {
        Self {
            accept: String::new(),
            min_size: 0,
            max_size: default_max_size(),
            multiple: true,
            max_items: None,
            overflow: OverflowPolicy::default(),
            disable_preview: false,
            disable_click: false,
            disabled: false,
            prevent_drop_on_document: true,
            dialog_settle_ms: default_dialog_settle_ms(),
            walk_concurrency: default_walk_concurrency(),
        }
    }
}

impl DropTargetConfig {
    /// Parses and validates a JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_accept_list(&self.accept)?;
        if self.min_size > self.max_size {
            return Err(ConfigError::InvalidSizeRange {
                min: self.min_size,
                max: self.max_size,
            });
        }
        if self.multiple && self.max_items == Some(0) {
            return Err(ConfigError::ZeroMaxItems);
        }
        if self.walk_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        Ok(())
    }

    /// The acceptance criteria this config describes.
    pub fn criteria(&self) -> Result<CriteriaSpec, ConfigError> {
        let max_items = if self.multiple { self.max_items } else { Some(1) };
        Ok(CriteriaSpec {
            accept: parse_accept_list(&self.accept)?,
            min_size: self.min_size,
            max_size: self.max_size,
            max_items,
            overflow: self.overflow,
        })
    }

    pub fn dialog_settle(&self) -> Duration {
        Duration::from_millis(self.dialog_settle_ms)
    }

    pub fn with_accept(mut self, accept: impl Into<String>) -> Self {
        self.accept = accept.into();
        self
    }

    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.min_size = min_size;
        self
    }

    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    pub fn with_disable_preview(mut self, disable_preview: bool) -> Self {
        self.disable_preview = disable_preview;
        self
    }

    pub fn with_disable_click(mut self, disable_click: bool) -> Self {
        self.disable_click = disable_click;
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_prevent_drop_on_document(mut self, prevent: bool) -> Self {
        self.prevent_drop_on_document = prevent;
        self
    }
}

/// Loads a config file. Returns defaults if the file doesn't exist, can't be parsed,
/// or doesn't validate.
pub fn load_config(path: &Path) -> DropTargetConfig {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) => {
            log::warn!("Couldn't read drop target config {}: {}, using defaults", path.display(), e);
            return DropTargetConfig::default();
        }
    };
    match DropTargetConfig::from_json(&contents) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Invalid drop target config {}: {}, using defaults", path.display(), e);
            DropTargetConfig::default()
        }
    }
}
