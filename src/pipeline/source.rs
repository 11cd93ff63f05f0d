use crate::foundation::core::CanvasSize;
use crate::foundation::error::LenslayerResult;
use crate::frame::{DeviceDescriptor, PixelBuffer};

/// Readiness of the external video source, polled once per opportunity.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// Acquisition in progress; dimensions not established yet.
    Pending,
    /// Live and ready at the given pixel dimensions.
    Ready(CanvasSize),
    /// Device lost or permission revoked; forces the session into `Error`.
    Lost(String),
}

/// Boundary with the camera-acquisition collaborator.
///
/// The core does not enumerate devices or negotiate constraints; it only
/// needs "is the source ready, and at what pixel dimensions", plus one pixel
/// read per tick. Layers never touch the source directly.
pub trait VideoSource {
    /// Current source status. Called once per scheduling opportunity.
    fn poll(&mut self) -> SourceStatus;

    /// Copy the current video frame into `buffer` (premultiplied RGBA8),
    /// resizing it to the source dimensions. The single source read per tick.
    fn capture_into(&mut self, buffer: &mut PixelBuffer) -> LenslayerResult<()>;

    /// Descriptor of the capture device behind this source.
    fn device(&self) -> DeviceDescriptor;
}
