//! Settings persistence
//!
//! The planner never reads stored state itself. Applications inject a
//! [`SettingsStore`] at the edge, load settings through it and pass the
//! values down explicitly.

use std::future::Future;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::presets::TemplatePreset;
use crate::settings::HandoutSettings;
use crate::types::*;

const SETTINGS_FILE: &str = "settings.json";
const PRESETS_FILE: &str = "presets.json";
const SELECTED_PRESET_FILE: &str = "selected-preset";

/// Storage for the current settings, custom presets and the selected preset
pub trait SettingsStore {
    /// Stored settings, or the defaults when nothing has been saved
    fn load_settings(&self) -> impl Future<Output = Result<HandoutSettings>> + Send;

    fn save_settings(&self, settings: &HandoutSettings) -> impl Future<Output = Result<()>> + Send;

    /// Stored custom presets, or an empty list
    fn load_presets(&self) -> impl Future<Output = Result<Vec<TemplatePreset>>> + Send;

    fn save_presets(&self, presets: &[TemplatePreset]) -> impl Future<Output = Result<()>> + Send;

    /// Id of the selected preset, if any
    fn selected_preset(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Select a preset, or clear the selection with `None`
    fn select_preset(&self, id: Option<&str>) -> impl Future<Output = Result<()>> + Send;
}

// =============================================================================
// JSON files
// =============================================================================

/// A store that keeps one JSON file per concern in a directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn read_optional(&self, name: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.dir.join(name)).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write(&self, name: &str, contents: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(name), contents).await?;
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    async fn load_settings(&self) -> Result<HandoutSettings> {
        match self.read_optional(SETTINGS_FILE).await? {
            Some(text) => HandoutSettings::from_json(&text),
            None => Ok(HandoutSettings::default()),
        }
    }

    async fn save_settings(&self, settings: &HandoutSettings) -> Result<()> {
        settings.validate()?;
        self.write(SETTINGS_FILE, settings.to_json()?).await
    }

    async fn load_presets(&self) -> Result<Vec<TemplatePreset>> {
        let Some(text) = self.read_optional(PRESETS_FILE).await? else {
            return Ok(Vec::new());
        };

        let raw: Vec<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| HandoutError::Config(format!("Failed to parse presets: {}", e)))?;

        // One damaged entry should not hide the others.
        let presets = raw
            .into_iter()
            .filter_map(|value| {
                match serde_json::from_value::<TemplatePreset>(value) {
                    Ok(preset) if preset.validate().is_ok() => Some(preset),
                    Ok(preset) => {
                        log::warn!("Skipping invalid preset '{}'", preset.id);
                        None
                    }
                    Err(e) => {
                        log::warn!("Skipping unreadable preset: {}", e);
                        None
                    }
                }
            })
            .collect();
        Ok(presets)
    }

    async fn save_presets(&self, presets: &[TemplatePreset]) -> Result<()> {
        for preset in presets {
            preset.validate()?;
        }
        let json = serde_json::to_string_pretty(presets)
            .map_err(|e| HandoutError::Config(format!("Failed to serialize presets: {}", e)))?;
        self.write(PRESETS_FILE, json).await
    }

    async fn selected_preset(&self) -> Result<Option<String>> {
        Ok(self
            .read_optional(SELECTED_PRESET_FILE)
            .await?
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty()))
    }

    async fn select_preset(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self.write(SELECTED_PRESET_FILE, id.to_string()).await,
            None => match tokio::fs::remove_file(self.dir.join(SELECTED_PRESET_FILE)).await {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            },
        }
    }
}

// =============================================================================
// In memory
// =============================================================================

#[derive(Debug, Default)]
struct MemoryState {
    settings: Option<HandoutSettings>,
    presets: Vec<TemplatePreset>,
    selected: Option<String>,
}

/// A store that keeps everything in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    async fn load_settings(&self) -> Result<HandoutSettings> {
        Ok(self.state.read().await.settings.unwrap_or_default())
    }

    async fn save_settings(&self, settings: &HandoutSettings) -> Result<()> {
        settings.validate()?;
        self.state.write().await.settings = Some(*settings);
        Ok(())
    }

    async fn load_presets(&self) -> Result<Vec<TemplatePreset>> {
        Ok(self.state.read().await.presets.clone())
    }

    async fn save_presets(&self, presets: &[TemplatePreset]) -> Result<()> {
        for preset in presets {
            preset.validate()?;
        }
        self.state.write().await.presets = presets.to_vec();
        Ok(())
    }

    async fn selected_preset(&self) -> Result<Option<String>> {
        Ok(self.state.read().await.selected.clone())
    }

    async fn select_preset(&self, id: Option<&str>) -> Result<()> {
        self.state.write().await.selected = id.map(str::to_string);
        Ok(())
    }
}
