//! Type-safe coordinate system for the trail and crop math.
//!
//! Each coordinate space is a phantom type so a trail position can never be
//! fed into crop math (or a percent value into a pixel rect) without an
//! explicit conversion:
//!
//! ```text
//! SurfaceSpace    pointer positions on the trail surface
//! ContainerSpace  crop editor container (image fitted inside it)
//! ImageSpace      source pixels of the decoded image
//! PercentSpace    crop rectangle units, 0-100 on both axes
//! ```

use std::ops::{Add, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Surface-local coordinates of the trail canvas.
/// `(0, 0)` is the top-left of the surface.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct SurfaceSpace;

/// Coordinates inside the crop editor container.
/// The fitted image occupies `display_bounds` within it.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ContainerSpace;

/// Source pixel coordinates of an image.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct ImageSpace;

/// Percent units relative to the image, 0-100 on each axis.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct PercentSpace;

/// A 2D coordinate with an associated coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coord<TSpace> {
    pub x: f64,
    pub y: f64,
    #[serde(skip)]
    _space: std::marker::PhantomData<TSpace>,
}

impl<TSpace: Default> Coord<TSpace> {
    /// Create a new coordinate in the specified space.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            _space: std::marker::PhantomData,
        }
    }

    /// The space's origin.
    pub fn origin() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Convert to a tuple.
    pub fn as_tuple(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Get the distance to another coordinate.
    pub fn distance(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl<T: Default> Add for Coord<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl<T: Default> Sub for Coord<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl<T: Default> Mul<f64> for Coord<T> {
    type Output = Self;
    fn mul(self, scalar: f64) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}

impl<T: Default> Div<f64> for Coord<T> {
    type Output = Self;
    fn div(self, scalar: f64) -> Self {
        Self::new(self.x / scalar, self.y / scalar)
    }
}

/// Size in a specific coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size<TSpace> {
    pub width: f64,
    pub height: f64,
    _space: std::marker::PhantomData<TSpace>,
}

impl<TSpace: Default> Size<TSpace> {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            _space: std::marker::PhantomData,
        }
    }

    pub fn from_u32(width: u32, height: u32) -> Self {
        Self::new(width as f64, height as f64)
    }

    pub fn aspect_ratio(&self) -> f64 {
        self.width / self.height
    }

    /// True when either dimension is zero, negative or NaN.
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// A rectangular region in a specific coordinate space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect<TSpace> {
    pub origin: Coord<TSpace>,
    pub size: Size<TSpace>,
}

impl<TSpace: Default + Copy> Rect<TSpace> {
    pub fn new(origin: Coord<TSpace>, size: Size<TSpace>) -> Self {
        Self { origin, size }
    }

    pub fn from_coords(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Coord::new(x, y), Size::new(width, height))
    }

    pub fn top_left(&self) -> Coord<TSpace> {
        self.origin
    }

    pub fn top_right(&self) -> Coord<TSpace> {
        Coord::new(self.origin.x + self.size.width, self.origin.y)
    }

    pub fn bottom_left(&self) -> Coord<TSpace> {
        Coord::new(self.origin.x, self.origin.y + self.size.height)
    }

    pub fn bottom_right(&self) -> Coord<TSpace> {
        Coord::new(
            self.origin.x + self.size.width,
            self.origin.y + self.size.height,
        )
    }

    pub fn center(&self) -> Coord<TSpace> {
        Coord::new(
            self.origin.x + self.size.width / 2.0,
            self.origin.y + self.size.height / 2.0,
        )
    }

    pub fn contains(&self, point: Coord<TSpace>) -> bool {
        point.x >= self.origin.x
            && point.x <= self.origin.x + self.size.width
            && point.y >= self.origin.y
            && point.y <= self.origin.y + self.size.height
    }
}

// ============================================================================
// Coordinate Space Conversions
// ============================================================================

/// Rectangle covered by an image fitted ("contain" scaling) and centred in a
/// container.
///
/// Wider-than-container images fit to the container width and are centred
/// vertically; otherwise they fit to the container height and are centred
/// horizontally. Degenerate sizes yield an empty rect at the container origin.
pub fn display_bounds(
    image_size: Size<ImageSpace>,
    container: Size<ContainerSpace>,
) -> Rect<ContainerSpace> {
    if image_size.is_empty() || container.is_empty() {
        return Rect::default();
    }

    let image_aspect = image_size.aspect_ratio();
    let container_aspect = container.aspect_ratio();

    if image_aspect > container_aspect {
        let height = container.width / image_aspect;
        Rect::from_coords(
            0.0,
            (container.height - height) / 2.0,
            container.width,
            height,
        )
    } else {
        let width = container.height * image_aspect;
        Rect::from_coords(
            (container.width - width) / 2.0,
            0.0,
            width,
            container.height,
        )
    }
}

impl Coord<ContainerSpace> {
    /// Express a container-space delta in percent of the displayed image.
    pub fn to_percent_delta(&self, bounds: &Rect<ContainerSpace>) -> Coord<PercentSpace> {
        if bounds.size.is_empty() {
            return Coord::origin();
        }
        Coord::new(
            self.x / bounds.size.width * 100.0,
            self.y / bounds.size.height * 100.0,
        )
    }
}

impl Rect<PercentSpace> {
    /// Map a percent rect onto the displayed image bounds.
    pub fn to_container_space(&self, bounds: &Rect<ContainerSpace>) -> Rect<ContainerSpace> {
        Rect::from_coords(
            bounds.origin.x + self.origin.x / 100.0 * bounds.size.width,
            bounds.origin.y + self.origin.y / 100.0 * bounds.size.height,
            self.size.width / 100.0 * bounds.size.width,
            self.size.height / 100.0 * bounds.size.height,
        )
    }

    /// Map a percent rect onto source pixels.
    pub fn to_image_space(&self, image_size: Size<ImageSpace>) -> Rect<ImageSpace> {
        Rect::from_coords(
            image_size.width * self.origin.x / 100.0,
            image_size.height * self.origin.y / 100.0,
            image_size.width * self.size.width / 100.0,
            image_size.height * self.size.height / 100.0,
        )
    }
}
