//! The tick orchestrator: session lifecycle, per-tick composition round,
//! and host-facing event reporting.

mod events;
mod session;
mod source;

pub use events::{EventSink, FrameObserver, PipelineEvent, PipelineStats, PointerObserver};
pub use session::{Pipeline, SessionState};
pub use source::{SourceStatus, VideoSource};
