//! Pointer events and recorded pointer traces.
//!
//! `PointerEvent` is the single wire shape shared by the web client and the
//! replay tool. A `PointerTrace` bundles the gallery with a sequence of events
//! so a session can be replayed deterministically.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::GalleryResult;
use crate::rendering::coord::{Coord, SurfaceSpace};
use crate::rendering::types::GalleryImage;

/// Pointer (mouse, pen or touch) event in surface-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "lowercase")]
#[ts(export, export_to = "generated/")]
pub enum PointerEvent {
    Down { x: f64, y: f64 },
    Move { x: f64, y: f64 },
    Up,
    Leave,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Coord<SurfaceSpace>> {
        match *self {
            Self::Down { x, y } | Self::Move { x, y } => Some(Coord::new(x, y)),
            Self::Up | Self::Leave => None,
        }
    }
}

/// A recorded gallery session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerTrace {
    /// Gallery images in reveal order.
    pub images: Vec<GalleryImage>,

    /// Events in arrival order.
    #[serde(default)]
    pub events: Vec<PointerEvent>,
}

impl PointerTrace {
    pub fn new(images: Vec<GalleryImage>) -> Self {
        Self {
            images,
            events: Vec::new(),
        }
    }

    pub fn push(&mut self, event: PointerEvent) {
        self.events.push(event);
    }

    /// Load a trace from a JSON file.
    pub fn load_from_file(path: &Path) -> GalleryResult<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Save the trace to a JSON file.
    pub fn save_to_file(&self, path: &Path) -> GalleryResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
