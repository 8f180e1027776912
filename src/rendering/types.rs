//! Core types shared by the trail engine, the cache and the projection.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::coord::{ImageSpace, Size};
use super::transform::ImageTransform;
use crate::error::GalleryResult;

/// Opaque gallery image identifier (as issued by the backend).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export, export_to = "generated/")]
pub struct ImageId(pub String);

impl ImageId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// A gallery image reference. Pixels are resolved through the image cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct GalleryImage {
    pub id: ImageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub transform: Option<ImageTransform>,
}

impl GalleryImage {
    pub fn new(id: impl Into<ImageId>) -> Self {
        Self {
            id: id.into(),
            transform: None,
        }
    }

    pub fn with_transform(mut self, transform: ImageTransform) -> Self {
        self.transform = Some(transform);
        self
    }

    /// Transform to draw with (identity when none was set).
    pub fn effective_transform(&self) -> ImageTransform {
        self.transform.unwrap_or_default()
    }
}

/// A decoded image ready for drawing.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data (width * height * 4 bytes).
    pub data: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data,
        }
    }

    /// Decode an encoded image (PNG, JPEG, WebP) into RGBA.
    pub fn from_bytes(bytes: &[u8]) -> GalleryResult<Self> {
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            data: rgba.into_raw(),
        })
    }

    pub fn size(&self) -> Size<ImageSpace> {
        Size::from_u32(self.width, self.height)
    }
}

/// One image to draw on the trail surface this frame.
///
/// `x`/`y` is the centre of the image; the host rotates around it and draws
/// the `src_*` region of the source into a `width` x `height` box, multiplied
/// by `scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "generated/")]
pub struct DrawCommand {
    /// Revealed entry identity (stable key for the host).
    #[ts(type = "number")]
    pub entry_id: u64,
    pub image_id: ImageId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub src_x: f64,
    pub src_y: f64,
    pub src_width: f64,
    pub src_height: f64,
    pub scale: f32,
    pub rotation: f32,
    pub opacity: f32,
}
