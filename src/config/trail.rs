//! Trail reveal configuration.
//!
//! Settings the host passes to the trail engine plus the projection knobs
//! (display box, tail fade). A process-global copy lives behind a `RwLock`
//! so the web client can batch-update it in one call.

use std::path::Path;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::GalleryResult;

/// Smallest accepted reveal threshold in pixels.
pub const MIN_THRESHOLD: u32 = 1;

/// Largest accepted reveal threshold in pixels.
pub const MAX_THRESHOLD: u32 = 400;

/// Trail engine and projection configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "generated/")]
pub struct TrailConfig {
    /// Pointer travel (px) between two reveals.
    pub threshold: u32,

    /// Tap-to-edit mode: enables hit testing on revealed images.
    pub edit_mode: bool,

    /// Clear the trail when the pointer leaves the surface.
    pub clear_on_leave: bool,

    /// Hit radius (px) used by the host for tap-to-edit.
    pub hit_radius: f64,

    /// Longest edge of a revealed image (px).
    pub display_box: f64,

    /// Fade older trail entries.
    pub fade_tail: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            threshold: 80,
            edit_mode: false,
            clear_on_leave: false,
            hit_radius: 150.0,
            display_box: 300.0,
            fade_tail: false,
        }
    }
}

impl TrailConfig {
    /// Validate and clamp settings to acceptable ranges.
    pub fn validate(&mut self) {
        self.threshold = self.threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
        if !self.hit_radius.is_finite() || self.hit_radius < 0.0 {
            self.hit_radius = Self::default().hit_radius;
        }
        if !self.display_box.is_finite() || self.display_box <= 0.0 {
            self.display_box = Self::default().display_box;
        }
    }

    /// Reset all settings to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> GalleryResult<Self> {
        let mut config: Self = super::read_config(path)?;
        config.validate();
        Ok(config)
    }

    /// Save the config as pretty JSON.
    pub fn save_to_file(&self, path: &Path) -> GalleryResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

lazy_static! {
    /// Global trail configuration.
    ///
    /// # Example
    /// ```ignore
    /// {
    ///     let mut config = TRAIL_CONFIG.write();
    ///     config.threshold = 40;
    ///     config.edit_mode = true;
    /// }
    /// ```
    pub static ref TRAIL_CONFIG: RwLock<TrailConfig> = RwLock::new(TrailConfig::default());
}

/// Get a copy of the current trail configuration.
pub fn get_trail_config() -> TrailConfig {
    TRAIL_CONFIG.read().clone()
}

/// Replace the trail configuration (batch update).
pub fn set_trail_config(config: TrailConfig) {
    let mut current = TRAIL_CONFIG.write();
    *current = config;
    current.validate();
    log::debug!("[CONFIG] Trail config updated: {:?}", *current);
}

/// Set the reveal threshold, clamped to the accepted range.
pub fn set_threshold(threshold: u32) {
    let threshold = threshold.clamp(MIN_THRESHOLD, MAX_THRESHOLD);
    TRAIL_CONFIG.write().threshold = threshold;
    log::debug!("[CONFIG] Threshold set to {}px", threshold);
}

/// Set tap-to-edit mode.
pub fn set_edit_mode(enabled: bool) {
    TRAIL_CONFIG.write().edit_mode = enabled;
}

/// Reset trail settings to defaults.
pub fn reset_trail_config() {
    TRAIL_CONFIG.write().reset();
    log::debug!("[CONFIG] Trail settings reset to defaults");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GalleryError;

    #[test]
    fn test_defaults() {
        let config = TrailConfig::default();
        assert_eq!(config.threshold, 80);
        assert_eq!(config.hit_radius, 150.0);
        assert_eq!(config.display_box, 300.0);
        assert!(!config.edit_mode);
        assert!(!config.clear_on_leave);
        assert!(!config.fade_tail);
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = TrailConfig {
            threshold: 0,
            hit_radius: -5.0,
            display_box: f64::NAN,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.threshold, MIN_THRESHOLD);
        assert_eq!(config.hit_radius, 150.0);
        assert_eq!(config.display_box, 300.0);

        config.threshold = 10_000;
        config.validate();
        assert_eq!(config.threshold, MAX_THRESHOLD);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: TrailConfig =
            serde_json::from_str(r#"{"threshold":40,"editMode":true}"#).unwrap();
        assert_eq!(config.threshold, 40);
        assert!(config.edit_mode);
        assert_eq!(config.display_box, 300.0);
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trail.json");

        let config = TrailConfig {
            threshold: 20,
            clear_on_leave: true,
            fade_tail: true,
            ..Default::default()
        };
        config.save_to_file(&path).unwrap();

        let loaded = TrailConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    // Only test that touches TRAIL_CONFIG.
    #[test]
    fn test_global_config_lifecycle() {
        set_trail_config(TrailConfig {
            threshold: 0,
            display_box: -1.0,
            fade_tail: true,
            ..Default::default()
        });
        let current = get_trail_config();
        assert_eq!(current.threshold, MIN_THRESHOLD);
        assert_eq!(current.display_box, 300.0);
        assert!(current.fade_tail);

        set_threshold(900);
        set_edit_mode(true);
        let current = get_trail_config();
        assert_eq!(current.threshold, MAX_THRESHOLD);
        assert!(current.edit_mode);
        assert!(current.fade_tail);

        reset_trail_config();
        assert_eq!(get_trail_config(), TrailConfig::default());
    }

    #[test]
    fn test_load_wrong_shape_is_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trail.json");
        std::fs::write(&path, r#"{"threshold":"fast"}"#).unwrap();

        let err = TrailConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, GalleryError::InvalidConfig(_)));
        assert!(err.to_string().contains("trail.json"));

        std::fs::write(&path, "[1, 2]").unwrap();
        let err = TrailConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, GalleryError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrailConfig::load_from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, GalleryError::StorageError(_)));
    }
}
