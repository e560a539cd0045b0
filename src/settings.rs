//! Persisted user settings and named presets.
//!
//! Settings live in `settings.json` and presets in `presets.json`, both as
//! plain JSON documents inside a base directory the caller picks. Loading
//! is lenient: a missing file produces defaults (and writes them out), a
//! corrupt file is logged and falls back to defaults, and a persisted font
//! name that no longer matches an installed font is replaced by the
//! default. A preset is a named snapshot of the same field set.

use crate::fonts;
use crate::layout;
use crate::render::{OutputFormat, Quality, RenderConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

const SETTINGS_FILE: &str = "settings.json";
const PRESETS_FILE: &str = "presets.json";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Preset '{0}' not found")]
    UnknownPreset(String),
}

/// The flat field set the shell edits and the engine consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Free-form header text drawn at the top of every page.
    pub context_text: String,
    pub font_name: String,
    pub font_size: u32,
    pub export_format: OutputFormat,
    pub quality: u8,
    pub filename_pattern: String,
    pub include_metadata: bool,
    pub watermark_text: String,
    pub save_folder: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            context_text: String::new(),
            font_name: fonts::DEFAULT_FONT.to_string(),
            font_size: 20,
            export_format: OutputFormat::Jpeg,
            quality: 80,
            filename_pattern: "contact_sheet_{number}".to_string(),
            include_metadata: true,
            watermark_text: String::new(),
            save_folder: String::new(),
        }
    }
}

impl Settings {
    /// Build the engine's render configuration from these settings, using
    /// the default export page size and margin.
    pub fn to_render_config(&self) -> RenderConfig {
        RenderConfig {
            header_text: self.context_text.clone(),
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            watermark_text: self.watermark_text.clone(),
            page: layout::DEFAULT_PAGE,
            margin: layout::DEFAULT_MARGIN,
            quality: Quality::new(self.quality),
            format: self.export_format,
            filename_pattern: self.filename_pattern.clone(),
            include_metadata: self.include_metadata,
            save_folder: PathBuf::from(&self.save_folder),
        }
    }

    /// Replace a font name that is not installed with the default.
    fn validate_font(&mut self, available: &[String]) {
        if !available.iter().any(|f| f == &self.font_name) {
            self.font_name = fonts::DEFAULT_FONT.to_string();
        }
    }
}

/// Settings plus presets, bound to the directory the JSON files live in.
pub struct SettingsStore {
    base_dir: PathBuf,
    pub settings: Settings,
    presets: BTreeMap<String, Settings>,
}

impl SettingsStore {
    /// Open (or initialize) the store under `base_dir`.
    ///
    /// Missing files are created with defaults; unreadable or corrupt files
    /// are logged and replaced by defaults in memory.
    pub fn open(base_dir: &Path) -> Result<Self, SettingsError> {
        let mut store = Self {
            base_dir: base_dir.to_path_buf(),
            settings: Settings::default(),
            presets: BTreeMap::new(),
        };
        store.load_settings()?;
        store.load_presets()?;
        Ok(store)
    }

    fn settings_path(&self) -> PathBuf {
        self.base_dir.join(SETTINGS_FILE)
    }

    fn presets_path(&self) -> PathBuf {
        self.base_dir.join(PRESETS_FILE)
    }

    fn load_settings(&mut self) -> Result<(), SettingsError> {
        let path = self.settings_path();
        if !path.exists() {
            self.settings = Settings::default();
            return self.save_settings();
        }
        match std::fs::read_to_string(&path)
            .map_err(SettingsError::from)
            .and_then(|text| serde_json::from_str::<Settings>(&text).map_err(SettingsError::from))
        {
            Ok(mut settings) => {
                settings.validate_font(&fonts::available_fonts());
                self.settings = settings;
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "settings unreadable, using defaults");
                self.settings = Settings::default();
            }
        }
        Ok(())
    }

    pub fn save_settings(&self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.settings)?;
        std::fs::write(self.settings_path(), text)?;
        Ok(())
    }

    fn load_presets(&mut self) -> Result<(), SettingsError> {
        let path = self.presets_path();
        if !path.exists() {
            self.presets = BTreeMap::new();
            return self.save_presets();
        }
        match std::fs::read_to_string(&path)
            .map_err(SettingsError::from)
            .and_then(|text| {
                serde_json::from_str::<BTreeMap<String, Settings>>(&text)
                    .map_err(SettingsError::from)
            }) {
            Ok(presets) => self.presets = presets,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "presets unreadable, starting empty");
                self.presets = BTreeMap::new();
            }
        }
        Ok(())
    }

    fn save_presets(&self) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(&self.presets)?;
        std::fs::write(self.presets_path(), text)?;
        Ok(())
    }

    /// Snapshot the current settings under `name` and persist.
    pub fn save_preset(&mut self, name: &str) -> Result<(), SettingsError> {
        self.presets.insert(name.to_string(), self.settings.clone());
        self.save_presets()
    }

    /// Replace the current settings with the named preset. The preset's
    /// font name goes through the same installed-font validation as a
    /// loaded settings file.
    pub fn load_preset(&mut self, name: &str) -> Result<(), SettingsError> {
        let mut preset = self
            .presets
            .get(name)
            .cloned()
            .ok_or_else(|| SettingsError::UnknownPreset(name.to_string()))?;
        preset.validate_font(&fonts::available_fonts());
        self.settings = preset;
        Ok(())
    }

    pub fn delete_preset(&mut self, name: &str) -> Result<(), SettingsError> {
        if self.presets.remove(name).is_none() {
            return Err(SettingsError::UnknownPreset(name.to_string()));
        }
        self.save_presets()
    }

    pub fn preset_names(&self) -> Vec<&str> {
        self.presets.keys().map(|s| s.as_str()).collect()
    }
}
