//! Crop rectangle math and interactive handle dragging.
//!
//! A crop is stored in percent of the source image so it survives resizing of
//! the editor container. Dragging a corner keeps the opposite corner anchored;
//! dragging the interior moves the whole rectangle. Every result is clamped to
//! the `[0, 100]` square and to a minimum edge length.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::coord::{ContainerSpace, Coord, ImageSpace, PercentSpace, Rect, Size};
use crate::config::editor::{get_editor_config, CropEditorConfig};

/// Smallest crop edge, in percent of the image dimension.
pub const MIN_CROP_PERCENT: f64 = 10.0;

/// Corner handle touch target in logical px.
pub const DEFAULT_TOUCH_TARGET: f64 = 48.0;

/// Crop rectangle in percent units (0-100) of the source image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for CropRect {
    fn default() -> Self {
        Self::full()
    }
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The uncropped image.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_full(&self) -> bool {
        *self == Self::full()
    }

    /// Clamp into `[0, 100]` with edges of at least `min_size` percent.
    pub fn clamped(&self, min_size: f64) -> Self {
        let width = self.width.clamp(min_size, 100.0);
        let height = self.height.clamp(min_size, 100.0);
        Self::new(
            self.x.clamp(0.0, 100.0 - width),
            self.y.clamp(0.0, 100.0 - height),
            width,
            height,
        )
    }

    pub fn as_rect(&self) -> Rect<PercentSpace> {
        Rect::from_coords(self.x, self.y, self.width, self.height)
    }

    /// Crop rectangle in container pixels, given the fitted image bounds.
    pub fn to_display_rect(&self, display_bounds: &Rect<ContainerSpace>) -> Rect<ContainerSpace> {
        self.as_rect().to_container_space(display_bounds)
    }

    /// Crop rectangle in source pixels, used for sampling.
    pub fn to_source_rect(&self, image_size: Size<ImageSpace>) -> Rect<ImageSpace> {
        self.as_rect().to_image_space(image_size)
    }
}

// ============================================================================
// Handles
// ============================================================================

/// Drag handle on the crop rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "generated/")]
pub enum CropHandle {
    #[default]
    None,
    #[serde(rename = "nw")]
    NorthWest,
    #[serde(rename = "ne")]
    NorthEast,
    #[serde(rename = "sw")]
    SouthWest,
    #[serde(rename = "se")]
    SouthEast,
    /// Interior of the crop (translate)
    Move,
}

impl CropHandle {
    /// Check if this is a valid handle (not None)
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The corner held fixed while this handle is dragged.
    pub fn opposite(&self) -> Self {
        match self {
            Self::NorthWest => Self::SouthEast,
            Self::NorthEast => Self::SouthWest,
            Self::SouthWest => Self::NorthEast,
            Self::SouthEast => Self::NorthWest,
            other => *other,
        }
    }
}

/// Pick the handle under `point`.
///
/// Corners win over the interior; a corner is hit when the point lies within
/// half of `touch_target` of it on both axes.
pub fn hit_test_handle(
    point: Coord<ContainerSpace>,
    crop_display: &Rect<ContainerSpace>,
    touch_target: f64,
) -> CropHandle {
    let half = touch_target / 2.0;
    let near = |corner: Coord<ContainerSpace>| {
        (point.x - corner.x).abs() <= half && (point.y - corner.y).abs() <= half
    };

    if near(crop_display.top_left()) {
        CropHandle::NorthWest
    } else if near(crop_display.top_right()) {
        CropHandle::NorthEast
    } else if near(crop_display.bottom_left()) {
        CropHandle::SouthWest
    } else if near(crop_display.bottom_right()) {
        CropHandle::SouthEast
    } else if crop_display.contains(point) {
        CropHandle::Move
    } else {
        CropHandle::None
    }
}

// ============================================================================
// Drag State
// ============================================================================

/// State for an in-progress crop adjustment.
#[derive(Debug, Clone)]
pub struct CropDrag {
    /// Handle being dragged
    pub handle: CropHandle,
    /// True while a pointer is down on a handle
    pub is_dragging: bool,
    /// Pointer position when the drag started
    pub drag_start: Coord<ContainerSpace>,
    /// Crop when the drag started (for delta calculation)
    pub original: CropRect,
    /// Current crop
    pub crop: CropRect,
    /// Fitted image bounds inside the container
    pub display_bounds: Rect<ContainerSpace>,
    /// Minimum crop edge in percent
    pub min_size: f64,
    /// Corner handle hit area in container px
    pub touch_target: f64,
}

impl CropDrag {
    pub fn new(crop: CropRect, display_bounds: Rect<ContainerSpace>, min_size: f64) -> Self {
        Self {
            handle: CropHandle::None,
            is_dragging: false,
            drag_start: Coord::origin(),
            original: crop,
            crop,
            display_bounds,
            min_size,
            touch_target: DEFAULT_TOUCH_TARGET,
        }
    }

    /// Drag state using the editor's minimum crop and density-scaled touch target.
    pub fn from_config(
        crop: CropRect,
        display_bounds: Rect<ContainerSpace>,
        config: &CropEditorConfig,
    ) -> Self {
        Self {
            touch_target: config.effective_touch_target(),
            ..Self::new(crop, display_bounds, config.min_crop_percent)
        }
    }

    /// Drag state using the global editor configuration.
    pub fn from_current_config(crop: CropRect, display_bounds: Rect<ContainerSpace>) -> Self {
        Self::from_config(crop, display_bounds, &get_editor_config())
    }

    /// Crop rectangle in container pixels.
    pub fn crop_display_rect(&self) -> Rect<ContainerSpace> {
        self.crop.to_display_rect(&self.display_bounds)
    }

    /// Handle under `pointer` for the current crop.
    pub fn handle_at(&self, pointer: Coord<ContainerSpace>) -> CropHandle {
        hit_test_handle(pointer, &self.crop_display_rect(), self.touch_target)
    }

    /// Start dragging `handle` from `pointer`.
    pub fn start_drag(&mut self, handle: CropHandle, pointer: Coord<ContainerSpace>) {
        if !handle.is_active() {
            return;
        }
        self.handle = handle;
        self.is_dragging = true;
        self.drag_start = pointer;
        self.original = self.crop;
    }

    /// Update the crop for the current pointer position.
    pub fn drag_to(&mut self, pointer: Coord<ContainerSpace>) -> CropRect {
        if self.is_dragging {
            let delta = (pointer - self.drag_start).to_percent_delta(&self.display_bounds);
            self.crop = apply_handle_delta(&self.original, self.handle, delta, self.min_size);
        }
        self.crop
    }

    /// End the current drag operation
    pub fn end_drag(&mut self) -> CropRect {
        self.is_dragging = false;
        self.handle = CropHandle::None;
        self.crop
    }
}

/// Apply a percent delta to `original` for the given handle.
///
/// Corner handles keep the opposite corner fixed. `Move` translates the
/// rectangle without changing its size.
pub fn apply_handle_delta(
    original: &CropRect,
    handle: CropHandle,
    delta: Coord<PercentSpace>,
    min_size: f64,
) -> CropRect {
    let o = original;
    match handle {
        CropHandle::NorthWest => {
            let (ax, ay) = (o.right(), o.bottom());
            let left = (o.x + delta.x).clamp(0.0, (ax - min_size).max(0.0));
            let top = (o.y + delta.y).clamp(0.0, (ay - min_size).max(0.0));
            CropRect::new(left, top, ax - left, ay - top)
        }
        CropHandle::NorthEast => {
            let (ax, ay) = (o.x, o.bottom());
            let right = (o.right() + delta.x).clamp((ax + min_size).min(100.0), 100.0);
            let top = (o.y + delta.y).clamp(0.0, (ay - min_size).max(0.0));
            CropRect::new(ax, top, right - ax, ay - top)
        }
        CropHandle::SouthWest => {
            let (ax, ay) = (o.right(), o.y);
            let left = (o.x + delta.x).clamp(0.0, (ax - min_size).max(0.0));
            let bottom = (o.bottom() + delta.y).clamp((ay + min_size).min(100.0), 100.0);
            CropRect::new(left, ay, ax - left, bottom - ay)
        }
        CropHandle::SouthEast => {
            let (ax, ay) = (o.x, o.y);
            let right = (o.right() + delta.x).clamp((ax + min_size).min(100.0), 100.0);
            let bottom = (o.bottom() + delta.y).clamp((ay + min_size).min(100.0), 100.0);
            CropRect::new(ax, ay, right - ax, bottom - ay)
        }
        CropHandle::Move => CropRect::new(
            (o.x + delta.x).clamp(0.0, (100.0 - o.width).max(0.0)),
            (o.y + delta.y).clamp(0.0, (100.0 - o.height).max(0.0)),
            o.width,
            o.height,
        ),
        CropHandle::None => *o,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn delta(x: f64, y: f64) -> Coord<PercentSpace> {
        Coord::new(x, y)
    }

    fn start() -> CropRect {
        CropRect::new(20.0, 20.0, 50.0, 40.0)
    }

    #[test]
    fn nw_drag_keeps_se_corner() {
        let o = start();
        for (dx, dy) in [(-5.0, -5.0), (10.0, 3.0), (-80.0, -80.0), (90.0, 90.0)] {
            let c = apply_handle_delta(&o, CropHandle::NorthWest, delta(dx, dy), MIN_CROP_PERCENT);
            assert!((c.right() - o.right()).abs() < EPS);
            assert!((c.bottom() - o.bottom()).abs() < EPS);
            assert!(c.width >= MIN_CROP_PERCENT - EPS);
            assert!(c.height >= MIN_CROP_PERCENT - EPS);
            assert!(c.x >= 0.0 && c.y >= 0.0);
        }
    }

    #[test]
    fn ne_drag_keeps_sw_corner() {
        let o = start();
        for (dx, dy) in [(5.0, -5.0), (-60.0, 50.0), (100.0, -100.0)] {
            let c = apply_handle_delta(&o, CropHandle::NorthEast, delta(dx, dy), MIN_CROP_PERCENT);
            assert!((c.x - o.x).abs() < EPS);
            assert!((c.bottom() - o.bottom()).abs() < EPS);
            assert!(c.right() <= 100.0 + EPS);
            assert!(c.width >= MIN_CROP_PERCENT - EPS);
        }
    }

    #[test]
    fn sw_drag_keeps_ne_corner() {
        let o = start();
        for (dx, dy) in [(-5.0, 5.0), (60.0, -50.0), (-100.0, 100.0)] {
            let c = apply_handle_delta(&o, CropHandle::SouthWest, delta(dx, dy), MIN_CROP_PERCENT);
            assert!((c.right() - o.right()).abs() < EPS);
            assert!((c.y - o.y).abs() < EPS);
            assert!(c.bottom() <= 100.0 + EPS);
            assert!(c.height >= MIN_CROP_PERCENT - EPS);
        }
    }

    #[test]
    fn se_drag_keeps_nw_corner() {
        let o = start();
        for (dx, dy) in [(5.0, 5.0), (-60.0, -50.0), (100.0, 100.0)] {
            let c = apply_handle_delta(&o, CropHandle::SouthEast, delta(dx, dy), MIN_CROP_PERCENT);
            assert!((c.x - o.x).abs() < EPS);
            assert!((c.y - o.y).abs() < EPS);
            assert!(c.right() <= 100.0 + EPS && c.bottom() <= 100.0 + EPS);
            assert!(c.width >= MIN_CROP_PERCENT - EPS);
            assert!(c.height >= MIN_CROP_PERCENT - EPS);
        }
    }

    #[test]
    fn se_drag_clamps_to_min_size() {
        let c = apply_handle_delta(
            &start(),
            CropHandle::SouthEast,
            delta(-200.0, -200.0),
            MIN_CROP_PERCENT,
        );
        assert!((c.width - MIN_CROP_PERCENT).abs() < EPS);
        assert!((c.height - MIN_CROP_PERCENT).abs() < EPS);
    }

    #[test]
    fn move_preserves_size_and_stays_inside() {
        let o = start();
        for (dx, dy) in [(10.0, 10.0), (-100.0, 0.0), (100.0, 100.0), (-3.0, 77.0)] {
            let c = apply_handle_delta(&o, CropHandle::Move, delta(dx, dy), MIN_CROP_PERCENT);
            assert_eq!(c.width, o.width);
            assert_eq!(c.height, o.height);
            assert!(c.x >= 0.0 && c.right() <= 100.0 + EPS);
            assert!(c.y >= 0.0 && c.bottom() <= 100.0 + EPS);
        }
    }

    #[test]
    fn none_handle_is_identity() {
        let o = start();
        assert_eq!(
            apply_handle_delta(&o, CropHandle::None, delta(30.0, 30.0), MIN_CROP_PERCENT),
            o
        );
    }

    #[test]
    fn opposite_corners() {
        assert_eq!(CropHandle::NorthWest.opposite(), CropHandle::SouthEast);
        assert_eq!(CropHandle::SouthEast.opposite(), CropHandle::NorthWest);
        assert_eq!(CropHandle::NorthEast.opposite(), CropHandle::SouthWest);
        assert_eq!(CropHandle::Move.opposite(), CropHandle::Move);
    }

    #[test]
    fn crop_drag_converts_container_pixels() {
        // Displayed image is 200x100 px, so 20 px == 10 percent horizontally
        let bounds = Rect::<ContainerSpace>::from_coords(0.0, 50.0, 200.0, 100.0);
        let mut drag = CropDrag::new(CropRect::full(), bounds, MIN_CROP_PERCENT);

        drag.start_drag(CropHandle::NorthWest, Coord::new(0.0, 50.0));
        let c = drag.drag_to(Coord::new(20.0, 60.0));
        assert!((c.x - 10.0).abs() < EPS);
        assert!((c.y - 10.0).abs() < EPS);
        assert!((c.right() - 100.0).abs() < EPS);
        assert!((c.bottom() - 100.0).abs() < EPS);

        let done = drag.end_drag();
        assert_eq!(done, c);
        assert!(!drag.is_dragging);
        assert_eq!(drag.handle, CropHandle::None);
    }

    #[test]
    fn crop_drag_handle_at_uses_display_rect() {
        // Image fills 400x200; crop covers its right half
        let bounds = Rect::<ContainerSpace>::from_coords(0.0, 0.0, 400.0, 200.0);
        let drag = CropDrag::new(CropRect::new(50.0, 0.0, 50.0, 100.0), bounds, MIN_CROP_PERCENT);
        assert_eq!(drag.handle_at(Coord::new(205.0, 5.0)), CropHandle::NorthWest);
        assert_eq!(drag.handle_at(Coord::new(300.0, 100.0)), CropHandle::Move);
        assert_eq!(drag.handle_at(Coord::new(100.0, 100.0)), CropHandle::None);
    }

    #[test]
    fn crop_drag_from_config_scales_touch_target() {
        let bounds = Rect::<ContainerSpace>::from_coords(0.0, 0.0, 400.0, 200.0);
        let config = CropEditorConfig {
            min_crop_percent: 30.0,
            handle_touch_target: 48.0,
            density: 2.0,
        };
        let mut drag = CropDrag::from_config(CropRect::full(), bounds, &config);
        assert_eq!(drag.touch_target, 96.0);
        assert_eq!(drag.min_size, 30.0);

        // 40 px from the corner: outside 48/2 but inside 96/2
        assert_eq!(drag.handle_at(Coord::new(40.0, 40.0)), CropHandle::NorthWest);
        let plain = CropDrag::new(CropRect::full(), bounds, MIN_CROP_PERCENT);
        assert_eq!(plain.handle_at(Coord::new(40.0, 40.0)), CropHandle::Move);

        // Minimum edge comes from the config
        drag.start_drag(CropHandle::NorthWest, Coord::new(0.0, 0.0));
        let c = drag.drag_to(Coord::new(400.0, 200.0));
        assert!((c.width - 30.0).abs() < EPS);
        assert!((c.height - 30.0).abs() < EPS);
    }

    #[test]
    fn crop_drag_ignores_inactive_handle() {
        let bounds = Rect::<ContainerSpace>::from_coords(0.0, 0.0, 100.0, 100.0);
        let mut drag = CropDrag::new(start(), bounds, MIN_CROP_PERCENT);
        drag.start_drag(CropHandle::None, Coord::new(0.0, 0.0));
        assert!(!drag.is_dragging);
        assert_eq!(drag.drag_to(Coord::new(50.0, 50.0)), start());
    }

    #[test]
    fn hit_test_prefers_corners() {
        let rect = Rect::<ContainerSpace>::from_coords(100.0, 100.0, 200.0, 100.0);
        assert_eq!(hit_test_handle(Coord::new(110.0, 95.0), &rect, 48.0), CropHandle::NorthWest);
        assert_eq!(hit_test_handle(Coord::new(290.0, 100.0), &rect, 48.0), CropHandle::NorthEast);
        assert_eq!(hit_test_handle(Coord::new(100.0, 200.0), &rect, 48.0), CropHandle::SouthWest);
        assert_eq!(hit_test_handle(Coord::new(310.0, 210.0), &rect, 48.0), CropHandle::SouthEast);
        assert_eq!(hit_test_handle(Coord::new(200.0, 150.0), &rect, 48.0), CropHandle::Move);
        assert_eq!(hit_test_handle(Coord::new(10.0, 10.0), &rect, 48.0), CropHandle::None);
    }

    #[test]
    fn hit_test_exact_bounds_with_zero_target() {
        let rect = Rect::<ContainerSpace>::from_coords(0.0, 0.0, 100.0, 100.0);
        assert_eq!(hit_test_handle(Coord::new(0.0, 0.0), &rect, 0.0), CropHandle::NorthWest);
        assert_eq!(hit_test_handle(Coord::new(1.0, 1.0), &rect, 0.0), CropHandle::Move);
    }

    #[test]
    fn clamped_pulls_crop_inside() {
        let c = CropRect::new(95.0, -5.0, 20.0, 2.0).clamped(MIN_CROP_PERCENT);
        assert_eq!(c, CropRect::new(80.0, 0.0, 20.0, 10.0));
    }

    #[test]
    fn handle_serializes_as_short_names() {
        assert_eq!(serde_json::to_string(&CropHandle::NorthWest).unwrap(), "\"nw\"");
        assert_eq!(serde_json::to_string(&CropHandle::Move).unwrap(), "\"move\"");
    }
}
