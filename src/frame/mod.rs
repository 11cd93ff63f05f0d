//! Frame snapshots, the reusable pixel buffer, and the per-tick context.

mod model;

pub use model::{DeviceDescriptor, Frame, FrameContext, Orientation, PixelBuffer};
