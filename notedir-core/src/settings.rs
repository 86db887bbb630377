//! Per-granularity note settings resolution.
//!
//! Settings come from an optional external provider (all granularities, with
//! an enabled flag) with a legacy provider as the day/week fallback, and fixed
//! defaults behind both. Resolution is deliberately infallible: a broken or
//! absent provider degrades to the defaults, never to an error. Settings are
//! read fresh on every call since providers may mutate at any time.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::NotedirResult;
use crate::granularity::Granularity;

/// Resolved settings for one granularity. `folder` is store-relative (empty =
/// store root); `template` is a store-relative file path (empty = none).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicNoteSettings {
    pub format: String,
    pub folder: String,
    pub template: String,
}

impl PeriodicNoteSettings {
    pub fn defaults(granularity: Granularity) -> Self {
        PeriodicNoteSettings {
            format: granularity.default_format().to_string(),
            folder: String::new(),
            template: String::new(),
        }
    }

    fn from_raw(raw: RawPeriodicSettings, granularity: Granularity) -> Self {
        PeriodicNoteSettings {
            format: raw
                .format
                .filter(|format| !format.is_empty())
                .unwrap_or_else(|| granularity.default_format().to_string()),
            folder: raw.folder.as_deref().map(str::trim).unwrap_or("").to_string(),
            template: raw.template.as_deref().map(str::trim).unwrap_or("").to_string(),
        }
    }
}

/// Settings as reported by a provider, before defaulting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPeriodicSettings {
    pub enabled: bool,
    pub format: Option<String>,
    pub folder: Option<String>,
    pub template: Option<String>,
}

/// A source of per-granularity settings (an installed plugin, a config file).
pub trait SettingsProvider: Send + Sync {
    /// `Ok(None)` when the provider does not serve this granularity at all.
    fn periodic_settings(
        &self,
        granularity: Granularity,
    ) -> NotedirResult<Option<RawPeriodicSettings>>;
}

/// Resolves the active format/folder/template per granularity.
pub struct SettingsResolver {
    external: Option<Arc<dyn SettingsProvider>>,
    legacy: Option<Arc<dyn SettingsProvider>>,
}

impl SettingsResolver {
    pub fn new(
        external: Option<Arc<dyn SettingsProvider>>,
        legacy: Option<Arc<dyn SettingsProvider>>,
    ) -> Self {
        SettingsResolver { external, legacy }
    }

    /// A resolver that always answers with the fixed defaults.
    pub fn without_providers() -> Self {
        SettingsResolver { external: None, legacy: None }
    }

    /// The active settings for `granularity`. Never fails: provider errors are
    /// logged and downgraded to the defaults.
    pub fn resolve(&self, granularity: Granularity) -> PeriodicNoteSettings {
        match self.try_resolve(granularity) {
            Ok(settings) => settings,
            Err(err) => {
                log::info!("No custom {granularity} note settings found: {err}");
                PeriodicNoteSettings::defaults(granularity)
            }
        }
    }

    fn try_resolve(&self, granularity: Granularity) -> NotedirResult<PeriodicNoteSettings> {
        if let Some(external) = &self.external {
            if let Some(raw) = external.periodic_settings(granularity)? {
                if raw.enabled {
                    return Ok(PeriodicNoteSettings::from_raw(raw, granularity));
                }
            }
        }
        // Only day and week notes predate the external provider; the legacy
        // side has nothing to say about the other granularities.
        if matches!(granularity, Granularity::Day | Granularity::Week) {
            if let Some(legacy) = &self.legacy {
                if let Some(raw) = legacy.periodic_settings(granularity)? {
                    return Ok(PeriodicNoteSettings::from_raw(raw, granularity));
                }
            }
        }
        Ok(PeriodicNoteSettings::defaults(granularity))
    }

    /// Whether any provider serves `granularity`, gating whether the index
    /// scans for it at all. Errors degrade to `false`.
    pub fn has_support(&self, granularity: Granularity) -> bool {
        match granularity {
            Granularity::Day => {
                self.legacy_settings(granularity).is_some_and(|raw| raw.enabled)
                    || self.external_enabled(granularity)
            }
            Granularity::Week => {
                self.legacy_settings(granularity).is_some() || self.external_enabled(granularity)
            }
            _ => self.external_enabled(granularity),
        }
    }

    fn external_enabled(&self, granularity: Granularity) -> bool {
        self.external
            .as_ref()
            .and_then(|provider| provider.periodic_settings(granularity).ok().flatten())
            .is_some_and(|raw| raw.enabled)
    }

    fn legacy_settings(&self, granularity: Granularity) -> Option<RawPeriodicSettings> {
        self.legacy
            .as_ref()
            .and_then(|provider| provider.periodic_settings(granularity).ok().flatten())
    }
}
