//! Distance-gated reveal engine.
//!
//! Every time the pointer has travelled at least `threshold` pixels from the
//! last reveal, the next gallery image (round-robin) is stamped at the pointer
//! position. The revealed list is bounded by `max_revealed(threshold)` and
//! evicts oldest first.
//!
//! The engine is single-threaded and total: no operation fails. After every
//! change it publishes a fresh `Arc<[RevealedImage]>`, so a renderer can hold
//! the previous snapshot while the next event is applied.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::capacity::max_revealed;
use super::events::PointerEvent;
use crate::config::TrailConfig;
use crate::rendering::coord::{Coord, SurfaceSpace};
use crate::rendering::transform::ImageTransform;
use crate::rendering::types::{GalleryImage, ImageId};

/// Identity of a revealed entry. Increases with creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevealId(pub u64);

impl RevealId {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// An image stamped on the trail. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedImage {
    pub id: RevealId,
    pub image: GalleryImage,
    /// Surface-local position (image centre), fixed at creation.
    pub position: Coord<SurfaceSpace>,
}

/// Revealed entry under a tap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct HitResult {
    pub image_id: ImageId,
    #[ts(type = "number")]
    pub entry_id: u64,
}

/// Cursor trail reveal engine.
#[derive(Debug, Clone)]
pub struct TrailRevealEngine {
    images: Vec<GalleryImage>,
    threshold: u32,
    edit_mode: bool,
    clear_on_leave: bool,
    current_index: usize,
    last_reveal_point: Coord<SurfaceSpace>,
    /// Most recent last.
    revealed: Arc<[RevealedImage]>,
    next_id: u64,
}

impl Default for TrailRevealEngine {
    fn default() -> Self {
        Self::with_config(Vec::new(), &TrailConfig::default())
    }
}

impl TrailRevealEngine {
    pub fn new(images: Vec<GalleryImage>, threshold: u32) -> Self {
        let config = TrailConfig {
            threshold,
            ..TrailConfig::default()
        };
        Self::with_config(images, &config)
    }

    pub fn with_config(images: Vec<GalleryImage>, config: &TrailConfig) -> Self {
        Self {
            images,
            threshold: config.threshold.max(1),
            edit_mode: config.edit_mode,
            clear_on_leave: config.clear_on_leave,
            current_index: 0,
            last_reveal_point: Coord::origin(),
            revealed: Arc::from(Vec::new()),
            next_id: 0,
        }
    }

    // ========================================================================
    // Configuration
    // ========================================================================

    /// Replace images, threshold and edit mode in one call.
    pub fn configure(&mut self, images: Vec<GalleryImage>, threshold: u32, edit_mode: bool) {
        self.images = images;
        self.threshold = threshold.max(1);
        self.edit_mode = edit_mode;
        self.check_index();
        self.enforce_capacity();
        log::debug!(
            "[TRAIL] Configured: {} images, threshold {}px, edit_mode={}",
            self.images.len(),
            self.threshold,
            self.edit_mode
        );
    }

    /// Apply every engine-relevant field of `config`.
    pub fn apply_config(&mut self, config: &TrailConfig) {
        self.clear_on_leave = config.clear_on_leave;
        let images = std::mem::take(&mut self.images);
        self.configure(images, config.threshold, config.edit_mode);
    }

    pub fn set_images(&mut self, images: Vec<GalleryImage>) {
        self.images = images;
        self.check_index();
    }

    /// Change the threshold; the trail is truncated to the new capacity.
    pub fn set_threshold(&mut self, threshold: u32) {
        self.threshold = threshold.max(1);
        self.enforce_capacity();
    }

    pub fn set_edit_mode(&mut self, enabled: bool) {
        self.edit_mode = enabled;
    }

    pub fn set_clear_on_leave(&mut self, enabled: bool) {
        self.clear_on_leave = enabled;
    }

    pub fn images(&self) -> &[GalleryImage] {
        &self.images
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn clear_on_leave(&self) -> bool {
        self.clear_on_leave
    }

    /// Current capacity of the revealed list.
    pub fn capacity(&self) -> usize {
        max_revealed(self.threshold)
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    /// Start a new stroke at `point` without revealing.
    ///
    /// Non-finite samples are ignored.
    pub fn on_pointer_down(&mut self, point: Coord<SurfaceSpace>) {
        if point.is_finite() {
            self.last_reveal_point = point;
        }
    }

    /// Reveal the next image if the pointer moved far enough.
    ///
    /// Returns the new entry's id when a reveal happened. Non-finite samples
    /// are ignored.
    pub fn on_pointer_move(&mut self, point: Coord<SurfaceSpace>) -> Option<RevealId> {
        if !point.is_finite() {
            log::trace!("[TRAIL] Ignoring non-finite pointer sample");
            return None;
        }
        if point.distance(&self.last_reveal_point) < f64::from(self.threshold) {
            return None;
        }
        if self.images.is_empty() {
            return None;
        }
        self.check_index();

        let id = RevealId(self.next_id);
        self.next_id += 1;
        let entry = RevealedImage {
            id,
            image: self.images[self.current_index].clone(),
            position: point,
        };

        let keep = self.capacity();
        let mut next: Vec<RevealedImage> = Vec::with_capacity(keep);
        let skip = (self.revealed.len() + 1).saturating_sub(keep);
        next.extend(self.revealed.iter().skip(skip).cloned());
        next.push(entry);
        self.revealed = next.into();

        log::trace!(
            "[TRAIL] Revealed {} (#{}) at ({:.0}, {:.0})",
            self.images[self.current_index].id,
            id.0,
            point.x,
            point.y
        );

        self.current_index = (self.current_index + 1) % self.images.len();
        self.last_reveal_point = point;
        Some(id)
    }

    pub fn on_pointer_up(&mut self) {}

    /// Pointer left the surface.
    pub fn on_pointer_leave(&mut self) {
        if self.clear_on_leave {
            self.clear();
        }
    }

    /// Dispatch a pointer event. Returns the reveal id for a revealing move.
    pub fn handle(&mut self, event: &PointerEvent) -> Option<RevealId> {
        match *event {
            PointerEvent::Down { x, y } => {
                self.on_pointer_down(Coord::new(x, y));
                None
            }
            PointerEvent::Move { x, y } => self.on_pointer_move(Coord::new(x, y)),
            PointerEvent::Up => {
                self.on_pointer_up();
                None
            }
            PointerEvent::Leave => {
                self.on_pointer_leave();
                None
            }
        }
    }

    /// Remove every revealed image and restart the cycle at image 0.
    pub fn clear(&mut self) {
        self.revealed = Arc::from(Vec::new());
        self.current_index = 0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Most recent revealed entry within `radius` of `point` (edit mode only).
    pub fn hit_test(&self, point: Coord<SurfaceSpace>, radius: f64) -> Option<HitResult> {
        if !self.edit_mode {
            return None;
        }
        self.revealed
            .iter()
            .rev()
            .find(|entry| entry.position.distance(&point) <= radius)
            .map(|entry| HitResult {
                image_id: entry.image.id.clone(),
                entry_id: entry.id.0,
            })
    }

    /// Write an edited transform back for `image_id`.
    ///
    /// Updates the gallery entry and republishes the snapshot with the new
    /// transform on every revealed copy. Returns false if the image is unknown.
    pub fn apply_transform(&mut self, image_id: &ImageId, transform: ImageTransform) -> bool {
        let mut found = false;
        for image in self.images.iter_mut().filter(|img| &img.id == image_id) {
            image.transform = Some(transform);
            found = true;
        }

        if self.revealed.iter().any(|entry| &entry.image.id == image_id) {
            found = true;
            self.revealed = self
                .revealed
                .iter()
                .map(|entry| {
                    let mut entry = entry.clone();
                    if &entry.image.id == image_id {
                        entry.image.transform = Some(transform);
                    }
                    entry
                })
                .collect();
        }

        if found {
            log::debug!("[TRAIL] Transform updated for {}", image_id);
        }
        found
    }

    /// Immutable view of the revealed list, oldest first.
    pub fn snapshot(&self) -> Arc<[RevealedImage]> {
        Arc::clone(&self.revealed)
    }

    pub fn revealed_len(&self) -> usize {
        self.revealed.len()
    }

    /// Index of the image the next reveal will use.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn last_reveal_point(&self) -> Coord<SurfaceSpace> {
        self.last_reveal_point
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn check_index(&mut self) {
        if self.current_index >= self.images.len() {
            self.current_index = 0;
        }
    }

    fn enforce_capacity(&mut self) {
        let keep = self.capacity();
        if self.revealed.len() > keep {
            let drop = self.revealed.len() - keep;
            self.revealed = self.revealed[drop..].iter().cloned().collect();
            log::debug!("[TRAIL] Trimmed {} entries to fit capacity {}", drop, keep);
        }
    }
}
