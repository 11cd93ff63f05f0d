//! Lenslayer is a layer-composition engine for live video.
//!
//! Lenslayer turns a live video source plus a set of registered layers into a
//! paced stream of composited frames. Hosts own the event loop and the output
//! surface; the engine owns the cadence, the layer order, and the per-tick
//! composition round.
//!
//! # Tick overview
//!
//! 1. **Pace**: [`FrameClock`] decides per scheduling opportunity whether a
//!    tick fires (drift-correcting, at most one tick in flight).
//! 2. **Capture**: the [`VideoSource`] copies the current frame into the
//!    pipeline's reusable [`PixelBuffer`].
//! 3. **Refresh**: the detection channel is drained to the newest batch
//!    pushed by the asynchronous detector.
//! 4. **Compose**: each visible layer, bottom to top, receives its
//!    detection/frame callbacks and draws inside an isolated surface scope.
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Host-driven**: no internal timers or threads; the host offers
//!   opportunities and the whole tick runs synchronously inside the call.
//! - **Contained failures**: a failing layer callback is reported and skipped;
//!   it never aborts the tick or the session.
//! - **Premultiplied RGBA8** end-to-end: captured pixels and surface fills are
//!   premultiplied.
//!
//! The only concurrent collaborator is the detection producer: it pushes
//! [`DetectionBatch`]es through a [`DetectionSink`] from any thread, and the
//! pipeline consumes the latest batch at the start of each tick.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod clock;
mod detect;
mod foundation;
mod frame;
mod interact;
mod layer;
mod pipeline;
mod surface;

pub use clock::{ClockState, FrameClock, SkipReason, TickDecision};
pub use detect::{
    Detection, DetectionBatch, DetectionCategory, DetectionChannel, DetectionSink, DetectorConfig,
    Landmark, detection_channel,
};
pub use foundation::core::{
    Affine, CanvasSize, FrameSeq, Point, Rect, Rgba8Premul, TickRate, Vec2,
};
pub use foundation::error::{LenslayerError, LenslayerResult};
pub use frame::{DeviceDescriptor, Frame, FrameContext, Orientation, PixelBuffer};
pub use interact::{PointerHit, PointerKind, RouteOutcome, Viewport, route_pointer};
pub use layer::{
    DetectionsHook, DrawHook, FrameHook, HitClaim, HitTestHook, HookFailure, HookStage, Layer,
    LayerHooks, LayerId, LayerRegistry, LayerUpdate, MountHook, PointerHook, UnmountHook,
};
pub use pipeline::{
    EventSink, FrameObserver, Pipeline, PipelineEvent, PipelineStats, PointerObserver,
    SessionState, SourceStatus, VideoSource,
};
pub use surface::{DrawSurface, RasterSurface, with_scope};
