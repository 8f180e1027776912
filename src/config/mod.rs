//! Gallery configuration management.
//!
//! ## Architecture
//!
//! - `TrailConfig`: Trail engine and projection settings (threshold, edit mode, etc.)
//! - `CropEditorConfig`: Crop editor settings (minimum crop, touch target, density)
//!
//! Both configs use `parking_lot::RwLock` globals so the host can batch-update
//! them in a single call, and both round-trip through JSON files.

pub mod editor;
pub mod trail;

use std::fs::File;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{GalleryError, GalleryResult};

pub use editor::{CropEditorConfig, EDITOR_CONFIG};
pub use trail::{TrailConfig, TRAIL_CONFIG};

/// Read a JSON config file.
///
/// Malformed JSON is a `JsonError`; well-formed JSON with the wrong shape
/// (e.g. a string threshold) is an `InvalidConfig` naming the file.
fn read_config<T: DeserializeOwned>(path: &Path) -> GalleryResult<T> {
    let file = File::open(path)?;
    serde_json::from_reader(file).map_err(|e| {
        if e.is_data() {
            GalleryError::InvalidConfig(format!("{}: {}", path.display(), e))
        } else {
            e.into()
        }
    })
}
