//! Geometry and draw-command projection for the trail surface and crop editor.
//!
//! ## Components
//! - `coord`: Phantom-typed coordinates and fit-to-container math
//! - `crop`: Percent crop rectangles, handle hit testing and drags
//! - `transform`: Per-image crop/scale/rotation
//! - `types`: Image ids, decoded images and draw commands
//! - `projection`: Snapshot to draw-command list

pub mod coord;
pub mod crop;
pub mod projection;
pub mod transform;
pub mod types;

pub use coord::{
    display_bounds, ContainerSpace, Coord, ImageSpace, PercentSpace, Rect, Size, SurfaceSpace,
};
pub use crop::{apply_handle_delta, hit_test_handle, CropDrag, CropHandle, CropRect};
pub use projection::{display_box_size, project_cached, project_frame, ProjectionOptions};
pub use transform::ImageTransform;
pub use types::*;
