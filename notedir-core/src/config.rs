//! File-backed settings provider.
//!
//! Shells that have no settings store of their own can point the resolver at
//! a TOML file instead:
//!
//! ```toml
//! [daily]
//! format = "YYYY-MM-DD"
//! folder = "journal"
//! template = "templates/daily.md"
//!
//! [weekly]
//! enabled = false
//! ```
//!
//! A section's presence is what makes the provider serve that granularity;
//! `enabled` defaults to true.

use std::path::{Path, PathBuf};

use config::{Config, File};
use serde::{Deserialize, Serialize};

use crate::error::{NotedirError, NotedirResult};
use crate::granularity::Granularity;
use crate::settings::{RawPeriodicSettings, SettingsProvider};

/// Per-granularity note settings loaded from a TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotedirConfig {
    pub daily: Option<PeriodicSection>,
    pub weekly: Option<PeriodicSection>,
    pub monthly: Option<PeriodicSection>,
    pub quarterly: Option<PeriodicSection>,
    pub yearly: Option<PeriodicSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodicSection {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub format: Option<String>,
    pub folder: Option<String>,
    pub template: Option<String>,
}

fn default_enabled() -> bool {
    true
}

impl NotedirConfig {
    /// Default location under the platform config directory.
    pub fn config_path() -> NotedirResult<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| NotedirError::Config("Could not determine config directory".to_string()))?;
        Ok(dir.join("notedir").join("config.toml"))
    }

    /// Load from `path`; a missing file yields the empty config.
    pub fn load(path: &Path) -> NotedirResult<Self> {
        Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .build()
            .map_err(|e| NotedirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| NotedirError::Config(e.to_string()))
    }

    pub fn save(&self, path: &Path) -> NotedirResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NotedirError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn section(&self, granularity: Granularity) -> Option<&PeriodicSection> {
        match granularity {
            Granularity::Day => self.daily.as_ref(),
            Granularity::Week => self.weekly.as_ref(),
            Granularity::Month => self.monthly.as_ref(),
            Granularity::Quarter => self.quarterly.as_ref(),
            Granularity::Year => self.yearly.as_ref(),
        }
    }
}

impl SettingsProvider for NotedirConfig {
    fn periodic_settings(
        &self,
        granularity: Granularity,
    ) -> NotedirResult<Option<RawPeriodicSettings>> {
        Ok(self.section(granularity).map(|section| RawPeriodicSettings {
            enabled: section.enabled,
            format: section.format.clone(),
            folder: section.folder.clone(),
            template: section.template.clone(),
        }))
    }
}
