//! Crop editor configuration.

use std::path::Path;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::GalleryResult;
use crate::rendering::crop::{DEFAULT_TOUCH_TARGET, MIN_CROP_PERCENT};

/// Crop editor settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "generated/")]
pub struct CropEditorConfig {
    /// Smallest crop edge in percent of the image (10-100).
    pub min_crop_percent: f64,

    /// Corner handle touch target in logical px.
    pub handle_touch_target: f64,

    /// Display density (physical px per logical px).
    pub density: f64,
}

impl Default for CropEditorConfig {
    fn default() -> Self {
        Self {
            min_crop_percent: MIN_CROP_PERCENT,
            handle_touch_target: DEFAULT_TOUCH_TARGET,
            density: 1.0,
        }
    }
}

impl CropEditorConfig {
    /// Validate and clamp settings to acceptable ranges.
    pub fn validate(&mut self) {
        if !self.min_crop_percent.is_finite() {
            self.min_crop_percent = MIN_CROP_PERCENT;
        }
        self.min_crop_percent = self.min_crop_percent.clamp(MIN_CROP_PERCENT, 100.0);
        if !self.handle_touch_target.is_finite() || self.handle_touch_target <= 0.0 {
            self.handle_touch_target = Self::default().handle_touch_target;
        }
        if !self.density.is_finite() || self.density <= 0.0 {
            self.density = 1.0;
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Touch target in physical pixels.
    pub fn effective_touch_target(&self) -> f64 {
        self.handle_touch_target * self.density
    }

    pub fn load_from_file(path: &Path) -> GalleryResult<Self> {
        let mut config: Self = super::read_config(path)?;
        config.validate();
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> GalleryResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

lazy_static! {
    /// Global crop editor configuration.
    pub static ref EDITOR_CONFIG: RwLock<CropEditorConfig> =
        RwLock::new(CropEditorConfig::default());
}

/// Get a copy of the current editor configuration.
pub fn get_editor_config() -> CropEditorConfig {
    EDITOR_CONFIG.read().clone()
}

/// Replace the editor configuration (batch update).
pub fn set_editor_config(config: CropEditorConfig) {
    let mut current = EDITOR_CONFIG.write();
    *current = config;
    current.validate();
    log::debug!("[CONFIG] Editor config updated: {:?}", *current);
}

/// Reset editor settings to defaults.
pub fn reset_editor_config() {
    EDITOR_CONFIG.write().reset();
    log::debug!("[CONFIG] Editor settings reset to defaults");
}
