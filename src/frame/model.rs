use std::time::Duration;

use crate::detect::DetectionBatch;
use crate::foundation::core::{CanvasSize, FrameSeq};

/// Reusable premultiplied-RGBA8 pixel buffer.
///
/// Exclusively owned by the pipeline and reused tick-to-tick to bound memory
/// churn; layers only ever see its contents as a read-only slice inside a
/// [`FrameContext`].
#[derive(Clone, Debug, Default)]
pub struct PixelBuffer {
    size: CanvasSize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resize to `size`, reallocating only when the dimensions change.
    pub fn resize(&mut self, size: CanvasSize) {
        if size != self.size {
            self.size = size;
            self.data.resize(size.pixel_bytes(), 0);
        }
    }

    /// Current dimensions.
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    /// Read-only pixel view.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel view for the capturing source.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Immutable per-tick frame snapshot (metadata only; pixels travel alongside
/// in the [`FrameContext`]).
///
/// A frame is superseded, never updated, by the next tick's frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frame {
    /// Monotonic sequence number; `FrameSeq(0)` only for [`Frame::empty`].
    pub seq: FrameSeq,
    /// Capture timestamp on the host's monotonic timeline.
    pub captured_at: Duration,
    /// Frame dimensions in pixels.
    pub size: CanvasSize,
}

impl Frame {
    /// Placeholder frame used before the first capture.
    pub fn empty() -> Self {
        Self {
            seq: FrameSeq(0),
            captured_at: Duration::ZERO,
            size: CanvasSize::default(),
        }
    }
}

/// Camera device orientation, as reported by the acquisition collaborator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Orientation {
    /// Sensor long edge horizontal.
    #[default]
    Landscape,
    /// Landscape rotated 180 degrees.
    LandscapeFlipped,
    /// Sensor long edge vertical.
    Portrait,
    /// Portrait rotated 180 degrees.
    PortraitFlipped,
}

/// Identity and metadata of the capture device. Opaque to the core; refreshed
/// whenever the camera collaborator reports a change.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceDescriptor {
    /// Stable device identity.
    pub id: String,
    /// Human-readable device label.
    pub label: String,
    /// Current orientation.
    pub orientation: Orientation,
}

/// Shared read-only context handed to every layer during one tick.
///
/// Constructed once per tick and not persisted past it; layers must copy
/// anything they want to retain beyond the tick boundary.
#[derive(Clone, Copy, Debug)]
pub struct FrameContext<'tick> {
    /// The current frame.
    pub frame: Frame,
    /// Read-only premultiplied-RGBA8 pixels of the current frame. Empty before
    /// the first capture.
    pub pixels: &'tick [u8],
    /// Latest available detection batch; may be older than the current frame
    /// when detection runs slower than the render cadence.
    pub detections: &'tick DetectionBatch,
    /// Current canvas dimensions.
    pub canvas: CanvasSize,
    /// Capture-device descriptor.
    pub device: &'tick DeviceDescriptor,
}

impl<'tick> FrameContext<'tick> {
    /// Zero context used when no frame has been captured yet (e.g. for mount
    /// callbacks of layers registered before the pipeline becomes active).
    pub fn empty(detections: &'tick DetectionBatch, device: &'tick DeviceDescriptor) -> Self {
        Self {
            frame: Frame::empty(),
            pixels: &[],
            detections,
            canvas: CanvasSize::default(),
            device,
        }
    }
}
