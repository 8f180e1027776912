//! Turn a revealed-trail snapshot into per-frame draw commands.
//!
//! The engine only knows image ids and positions. Pixel dimensions come from
//! the image cache at projection time; an entry whose image is not cached yet
//! is skipped for this frame and picked up again once it loads.

use super::coord::{ImageSpace, Size, SurfaceSpace};
use super::types::{DrawCommand, ImageId};
use crate::cache::ImageCache;
use crate::config::TrailConfig;
use crate::trail::RevealedImage;

/// Default bounding box edge for revealed images, in surface units.
pub const DEFAULT_DISPLAY_BOX: f64 = 300.0;

/// Options that shape a projected frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOptions {
    /// Longest edge of a revealed image, in surface units.
    pub display_box: f64,
    /// Fade older entries (oldest faintest).
    pub fade_tail: bool,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            display_box: DEFAULT_DISPLAY_BOX,
            fade_tail: false,
        }
    }
}

impl From<&TrailConfig> for ProjectionOptions {
    fn from(config: &TrailConfig) -> Self {
        Self {
            display_box: config.display_box,
            fade_tail: config.fade_tail,
        }
    }
}

/// Fit an image of the given aspect ratio into a square box.
///
/// Landscape images take the full box width, everything else the full height.
pub fn display_box_size(aspect: f64, box_size: f64) -> Size<SurfaceSpace> {
    if !aspect.is_finite() || aspect <= 0.0 {
        return Size::new(box_size, box_size);
    }
    if aspect > 1.0 {
        Size::new(box_size, box_size / aspect)
    } else {
        Size::new(box_size * aspect, box_size)
    }
}

/// Opacity of entry `index` out of `count` (oldest first).
pub fn entry_opacity(index: usize, count: usize, fade_tail: bool) -> f32 {
    if !fade_tail || count == 0 {
        return 1.0;
    }
    (index + 1) as f32 / count as f32
}

/// Project `revealed` (oldest first) into draw commands.
///
/// `dimensions` resolves an image id to its source pixel size; `None` means
/// the image is not available yet and the entry is skipped.
pub fn project_frame<F>(
    revealed: &[RevealedImage],
    dimensions: F,
    options: &ProjectionOptions,
) -> Vec<DrawCommand>
where
    F: Fn(&ImageId) -> Option<Size<ImageSpace>>,
{
    let count = revealed.len();
    let mut commands = Vec::with_capacity(count);

    for (index, entry) in revealed.iter().enumerate() {
        let image_id = &entry.image.id;
        let Some(image_size) = dimensions(image_id) else {
            log::trace!("[TRAIL] Skipping {} (not cached)", image_id);
            continue;
        };
        if image_size.is_empty() {
            log::trace!("[TRAIL] Skipping {} (empty image)", image_id);
            continue;
        }

        let transform = entry.image.effective_transform();
        let src = transform.crop.to_source_rect(image_size);
        let display = display_box_size(src.size.aspect_ratio(), options.display_box);

        commands.push(DrawCommand {
            entry_id: entry.id.value(),
            image_id: image_id.clone(),
            x: entry.position.x,
            y: entry.position.y,
            width: display.width,
            height: display.height,
            src_x: src.origin.x,
            src_y: src.origin.y,
            src_width: src.size.width,
            src_height: src.size.height,
            scale: transform.scale(),
            rotation: transform.rotation,
            opacity: entry_opacity(index, count, options.fade_tail),
        });
    }

    commands
}

/// Project `revealed` using dimensions from an image cache.
pub fn project_cached<C>(
    revealed: &[RevealedImage],
    cache: &C,
    options: &ProjectionOptions,
) -> Vec<DrawCommand>
where
    C: ImageCache + ?Sized,
{
    project_frame(revealed, |id| cache.get(id).map(|img| img.size()), options)
}
