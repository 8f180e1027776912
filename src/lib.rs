//! CursorGallery trail reveal engine.
//!
//! As a pointer moves across a surface, gallery images are stamped along its
//! path. This crate holds the toolkit-independent core:
//!
//! - `trail`: the distance-gated reveal engine and pointer events
//! - `rendering`: coordinate spaces, crop math, transforms and draw-command
//!   projection
//! - `cache`: decoded image cache (plus the async preloader on native builds)
//! - `config`: trail and crop editor settings
//! - `logging`: `env_logger` setup with rotating log files (native builds)
//!
//! # Example
//! ```ignore
//! use cursor_gallery_lib::prelude::*;
//!
//! let mut engine = TrailRevealEngine::new(vec![GalleryImage::new("a.jpg")], 80);
//! engine.on_pointer_move(Coord::new(0.0, 90.0));
//! let frame = project_cached(&engine.snapshot(), &cache, &ProjectionOptions::default());
//! ```

pub mod cache;
pub mod config;
pub mod error;
#[cfg(feature = "native")]
pub mod logging;
pub mod rendering;
pub mod trail;

pub use error::{GalleryError, GalleryResult};

/// Commonly used types.
pub mod prelude {
    pub use crate::cache::{ImageCache, LruImageCache};
    pub use crate::config::{CropEditorConfig, TrailConfig};
    pub use crate::error::{GalleryError, GalleryResult};
    pub use crate::rendering::{
        project_cached, project_frame, Coord, CropRect, DrawCommand, GalleryImage, ImageId,
        ImageTransform, ProjectionOptions, SurfaceSpace,
    };
    pub use crate::trail::{HitResult, PointerEvent, RevealId, RevealedImage, TrailRevealEngine};
}
