//! Pointer/touch routing against the ordered layer view.

mod router;

pub use router::{PointerHit, PointerKind, RouteOutcome, Viewport, route_pointer};
