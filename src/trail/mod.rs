//! Cursor trail reveal.
//!
//! ## Components
//! - `engine`: `TrailRevealEngine`, the distance-gated reveal state machine
//! - `capacity`: Trail length per threshold
//! - `events`: Serialisable pointer events and recorded traces

pub mod capacity;
pub mod engine;
pub mod events;


pub use capacity::max_revealed;
pub use engine::{HitResult, RevealId, RevealedImage, TrailRevealEngine};
pub use events::{PointerEvent, PointerTrace};
