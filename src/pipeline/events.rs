use crate::clock::SkipReason;
use crate::frame::Frame;
use crate::interact::PointerHit;
use crate::layer::{HookStage, LayerId};

/// Contained failures and notable conditions, reported to the host.
///
/// Events are delivered through the sink registered with
/// [`crate::Pipeline::set_event_sink`] and mirrored to `tracing`. None of them
/// abort the pipeline; terminal failures surface as
/// [`crate::SessionState::Error`] instead.
#[derive(Debug)]
pub enum PipelineEvent {
    /// A registration was refused because the id is already taken.
    DuplicateLayer {
        /// The contested id.
        id: LayerId,
    },
    /// An unregister/update targeted an id that is not registered.
    UnknownLayer {
        /// The missing id.
        id: LayerId,
    },
    /// A layer callback failed; the tick continued without it.
    LayerCallbackFailed {
        /// Offending layer.
        id: LayerId,
        /// Which callback failed.
        stage: HookStage,
        /// Error message from the callback.
        message: String,
    },
    /// The video source became unavailable; ticking halted.
    SourceUnavailable {
        /// Reason reported by the source.
        reason: String,
    },
    /// A scheduling opportunity was skipped while a tick was still in flight.
    TickSkipped {
        /// Why the opportunity was skipped.
        reason: SkipReason,
    },
}

/// Host callback receiving [`PipelineEvent`]s.
pub type EventSink = Box<dyn FnMut(&PipelineEvent)>;

/// Top-level per-frame observer, invoked after the layer round with the frame
/// and its pixels.
pub type FrameObserver = Box<dyn FnMut(&Frame, &[u8])>;

/// Top-level pointer observer, invoked when no layer claims a pointer event.
pub type PointerObserver = Box<dyn FnMut(&PointerHit)>;

/// Informational pipeline throughput counters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PipelineStats {
    /// Ticks accepted since the session became active.
    pub ticks: u64,
    /// Opportunities skipped (pacing and busy skips).
    pub skipped: u64,
    /// Observed ticks per wall-clock second.
    pub observed_rate: f64,
}
