//! Per-image display transform (crop, scale, rotation).
//!
//! Scale is stored as an integer percent so that repeated ±10% nudges from the
//! editor land on exact values. The float multiplier is only derived on read.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::crop::{CropRect, MIN_CROP_PERCENT};

/// Smallest allowed scale (0.5x).
pub const MIN_SCALE_PERCENT: u32 = 50;

/// Largest allowed scale (3.0x).
pub const MAX_SCALE_PERCENT: u32 = 300;

/// Scale change per editor step.
pub const SCALE_STEP_PERCENT: u32 = 10;

/// Crop, scale and rotation applied when an image is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct ImageTransform {
    /// Crop in percent of the source image.
    pub crop: CropRect,
    /// Scale in integer percent (100 = native display size).
    pub scale_percent: u32,
    /// Clockwise rotation in degrees, normalised to [0, 360).
    pub rotation: f32,
}

impl Default for ImageTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl ImageTransform {
    pub fn identity() -> Self {
        Self {
            crop: CropRect::full(),
            scale_percent: 100,
            rotation: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Scale as a multiplier (1.0 = native).
    pub fn scale(&self) -> f32 {
        self.scale_percent as f32 / 100.0
    }

    /// Set the scale from a multiplier, rounded to the nearest percent.
    pub fn set_scale(&mut self, scale: f32) {
        let percent = (scale * 100.0).round().max(0.0) as u32;
        self.scale_percent = percent.clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
    }

    /// Nudge the scale by `steps` editor steps (negative shrinks).
    pub fn step_scale(&mut self, steps: i32) {
        let next = self.scale_percent as i64 + steps as i64 * SCALE_STEP_PERCENT as i64;
        self.scale_percent =
            next.clamp(MIN_SCALE_PERCENT as i64, MAX_SCALE_PERCENT as i64) as u32;
    }

    pub fn set_rotation(&mut self, degrees: f32) {
        self.rotation = normalize_degrees(degrees);
    }

    pub fn rotate_by(&mut self, degrees: f32) {
        self.set_rotation(self.rotation + degrees);
    }

    /// Clamp every field into its valid range.
    pub fn validate(&mut self) {
        self.crop = self.crop.clamped(MIN_CROP_PERCENT);
        self.scale_percent = self
            .scale_percent
            .clamp(MIN_SCALE_PERCENT, MAX_SCALE_PERCENT);
        self.rotation = normalize_degrees(self.rotation);
    }
}

fn normalize_degrees(degrees: f32) -> f32 {
    if !degrees.is_finite() {
        return 0.0;
    }
    let r = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if r >= 360.0 {
        0.0
    } else {
        r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let t = ImageTransform::default();
        assert!(t.is_identity());
        assert_eq!(t.scale(), 1.0);
        assert!(t.crop.is_full());
    }

    #[test]
    fn test_scale_steps_do_not_drift() {
        let mut t = ImageTransform::identity();
        for _ in 0..7 {
            t.step_scale(1);
        }
        for _ in 0..7 {
            t.step_scale(-1);
        }
        assert_eq!(t.scale_percent, 100);
        assert_eq!(t.scale(), 1.0);

        t.step_scale(3);
        assert_eq!(t.scale_percent, 130);
    }

    #[test]
    fn test_scale_is_clamped() {
        let mut t = ImageTransform::identity();
        t.step_scale(-20);
        assert_eq!(t.scale_percent, MIN_SCALE_PERCENT);
        t.step_scale(100);
        assert_eq!(t.scale_percent, MAX_SCALE_PERCENT);

        t.set_scale(0.1);
        assert_eq!(t.scale_percent, MIN_SCALE_PERCENT);
        t.set_scale(1.234);
        assert_eq!(t.scale_percent, 123);
    }

    #[test]
    fn test_rotation_normalised() {
        let mut t = ImageTransform::identity();
        t.rotate_by(-90.0);
        assert_eq!(t.rotation, 270.0);
        t.rotate_by(180.0);
        assert_eq!(t.rotation, 90.0);
        t.set_rotation(720.0);
        assert_eq!(t.rotation, 0.0);
        t.set_rotation(f32::NAN);
        assert_eq!(t.rotation, 0.0);
    }

    #[test]
    fn test_validate() {
        let mut t = ImageTransform {
            crop: CropRect::new(-10.0, 95.0, 5.0, 30.0),
            scale_percent: 1000,
            rotation: 370.0,
        };
        t.validate();
        assert_eq!(t.crop, CropRect::new(0.0, 70.0, 10.0, 30.0));
        assert_eq!(t.scale_percent, MAX_SCALE_PERCENT);
        assert_eq!(t.rotation, 10.0);
    }

    #[test]
    fn test_serde_camel_case() {
        let json = serde_json::to_value(ImageTransform::identity()).unwrap();
        assert_eq!(json["scalePercent"], 100);
        assert_eq!(json["crop"]["width"], 100.0);
    }
}
