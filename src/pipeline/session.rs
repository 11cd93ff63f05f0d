use std::time::Duration;

use crate::clock::{FrameClock, SkipReason, TickDecision};
use crate::detect::{DetectionChannel, DetectionSink, DetectorConfig, detection_channel};
use crate::foundation::core::{CanvasSize, FrameSeq, Point, TickRate};
use crate::foundation::error::{LenslayerError, LenslayerResult};
use crate::frame::{DeviceDescriptor, Frame, FrameContext, PixelBuffer};
use crate::interact::{PointerHit, PointerKind, route_pointer};
use crate::layer::{HookFailure, HookStage, Layer, LayerId, LayerRegistry, LayerUpdate};
use crate::pipeline::events::{EventSink, FrameObserver, PipelineEvent, PipelineStats, PointerObserver};
use crate::pipeline::source::{SourceStatus, VideoSource};
use crate::surface::{DrawSurface, with_scope};

/// Lifecycle of one camera session.
///
/// Ticks run only while `Active`. `Error` is recoverable via
/// [`Pipeline::retry`]; `Stopped` via [`Pipeline::start`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not started.
    Idle,
    /// Waiting for the video source to become ready.
    Requesting,
    /// Live; opportunities may fire ticks.
    Active,
    /// Source lost; halted until retry.
    Error,
    /// Explicitly stopped.
    Stopped,
}

/// The per-tick orchestrator: owns the frame clock, the layer registry, the
/// detection channel consumer, and the reusable capture buffer.
///
/// The pipeline is host-driven and single-threaded: the host offers it one
/// scheduling opportunity per redraw via
/// [`on_frame_opportunity`](Self::on_frame_opportunity), and every tick runs
/// to completion synchronously inside that call. The only parallel
/// collaborator is the detection producer on the far side of the
/// [`DetectionSink`].
pub struct Pipeline {
    source: Box<dyn VideoSource>,
    clock: FrameClock,
    registry: LayerRegistry,
    channel: DetectionChannel,
    buffer: PixelBuffer,
    device: DeviceDescriptor,
    canvas: CanvasSize,
    state: SessionState,
    next_seq: FrameSeq,
    last_frame: Option<Frame>,
    events: Option<EventSink>,
    frame_observer: Option<FrameObserver>,
    pointer_observer: Option<PointerObserver>,
}

impl Pipeline {
    /// Create a pipeline over a video source at the given target rate,
    /// returning the sink the detection collaborator pushes into.
    ///
    /// Invalid rates are rejected earlier, by [`TickRate::new`].
    pub fn new(source: Box<dyn VideoSource>, rate: TickRate) -> (Self, DetectionSink) {
        let (sink, channel) = detection_channel();
        let pipeline = Self {
            source,
            clock: FrameClock::new(rate),
            registry: LayerRegistry::new(),
            channel,
            buffer: PixelBuffer::new(),
            device: DeviceDescriptor::default(),
            canvas: CanvasSize::default(),
            state: SessionState::Idle,
            next_seq: FrameSeq(0),
            last_frame: None,
            events: None,
            frame_observer: None,
            pointer_observer: None,
        };
        (pipeline, sink)
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Read access to the owned layer registry.
    pub fn registry(&self) -> &LayerRegistry {
        &self.registry
    }

    /// Informational throughput counters.
    pub fn stats(&self, now: Duration) -> PipelineStats {
        PipelineStats {
            ticks: self.clock.accepted(),
            skipped: self.clock.skipped(),
            observed_rate: self.clock.observed_rate(now),
        }
    }

    /// Subscribe to contained-failure reports.
    pub fn set_event_sink(&mut self, sink: impl FnMut(&PipelineEvent) + 'static) {
        self.events = Some(Box::new(sink));
    }

    /// Set the top-level per-frame observer.
    pub fn set_frame_observer(&mut self, observer: impl FnMut(&Frame, &[u8]) + 'static) {
        self.frame_observer = Some(Box::new(observer));
    }

    /// Set the top-level pointer observer, fired when no layer claims a
    /// pointer event.
    pub fn set_pointer_observer(&mut self, observer: impl FnMut(&PointerHit) + 'static) {
        self.pointer_observer = Some(Box::new(observer));
    }

    /// Refresh the capture-device descriptor from the camera collaborator.
    pub fn set_device(&mut self, device: DeviceDescriptor) {
        self.device = device;
    }

    /// Begin a session: `Idle`/`Stopped` to `Requesting`. No-op otherwise.
    pub fn start(&mut self) {
        if matches!(self.state, SessionState::Idle | SessionState::Stopped) {
            self.state = SessionState::Requesting;
        }
    }

    /// Manual retry after source loss: `Error` to `Requesting`. No-op
    /// otherwise.
    pub fn retry(&mut self) {
        if self.state == SessionState::Error {
            self.state = SessionState::Requesting;
        }
    }

    /// Stop the session and cancel any pending tick. Idempotent.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.state = SessionState::Stopped;
    }

    /// Switch to a different video source (device switch).
    ///
    /// A live session goes back to `Requesting` and resumes ticking once the
    /// new source reports ready. Registered layers are untouched.
    pub fn switch_source(&mut self, source: Box<dyn VideoSource>) {
        self.source = source;
        if matches!(self.state, SessionState::Active) {
            self.clock.stop();
            self.state = SessionState::Requesting;
        }
    }

    /// Register a layer; its mount callback runs with the most recent frame
    /// context (a zero context before the first capture).
    ///
    /// A duplicate id is reported and returned as an error; the registry is
    /// unchanged and the pipeline continues.
    pub fn register_layer(&mut self, layer: Layer) -> LenslayerResult<()> {
        let ctx = if let Some(frame) = self.last_frame {
            FrameContext {
                frame,
                pixels: self.buffer.data(),
                detections: self.channel.latest(),
                canvas: self.canvas,
                device: &self.device,
            }
        } else {
            FrameContext::empty(self.channel.latest(), &self.device)
        };

        match self.registry.register(layer, &ctx) {
            Ok(None) => Ok(()),
            Ok(Some(failure)) => {
                self.report_hook_failure(failure);
                Ok(())
            }
            Err(err) => {
                if let LenslayerError::DuplicateLayer(id) = &err {
                    let id = LayerId::new(id.clone());
                    tracing::warn!(layer = %id, "duplicate layer registration refused");
                    self.emit(PipelineEvent::DuplicateLayer { id });
                }
                Err(err)
            }
        }
    }

    /// Unregister a layer, invoking its unmount callback. An unknown id is
    /// reported and returned as an error; the pipeline continues.
    pub fn unregister_layer(&mut self, id: &LayerId) -> LenslayerResult<()> {
        match self.registry.unregister(id) {
            Ok(None) => Ok(()),
            Ok(Some(failure)) => {
                self.report_hook_failure(failure);
                Ok(())
            }
            Err(err) => {
                self.emit(PipelineEvent::UnknownLayer { id: id.clone() });
                Err(err)
            }
        }
    }

    /// Merge partial changes into a registered layer. An unknown id is
    /// reported and returned as an error; the pipeline continues.
    pub fn update_layer(&mut self, id: &LayerId, changes: LayerUpdate) -> LenslayerResult<()> {
        match self.registry.update(id, changes) {
            Ok(()) => Ok(()),
            Err(err) => {
                self.emit(PipelineEvent::UnknownLayer { id: id.clone() });
                Err(err)
            }
        }
    }

    /// Toggle detection output. Immediate from the pipeline's perspective.
    pub fn set_detection_enabled(&mut self, enabled: bool) {
        self.channel.set_enabled(enabled);
    }

    /// Replace the detection production configuration; applies to the next
    /// produced batch.
    pub fn configure_detection(&mut self, config: DetectorConfig) {
        self.channel.set_config(config);
    }

    /// Route a canvas-local pointer event to the topmost matching layer, or
    /// to the top-level pointer observer when no layer claims it.
    pub fn dispatch_pointer(&mut self, point: Point, kind: PointerKind) {
        let outcome = route_pointer(
            &mut self.registry,
            self.channel.latest(),
            self.canvas,
            point,
            kind,
        );
        for failure in outcome.failures {
            self.report_hook_failure(failure);
        }
        if outcome.claimed.is_none()
            && let Some(observer) = self.pointer_observer.as_mut()
        {
            observer(&PointerHit {
                kind,
                point,
                layer: None,
                detection: None,
            });
        }
    }

    /// Offer one scheduling opportunity at monotonic time `now`.
    ///
    /// Returns `true` when a tick ran. The host calls this once per redraw
    /// opportunity; the clock decides whether the tick fires, and the entire
    /// tick runs synchronously before this returns.
    pub fn on_frame_opportunity(&mut self, now: Duration, surface: &mut dyn DrawSurface) -> bool {
        match self.state {
            SessionState::Idle | SessionState::Stopped | SessionState::Error => return false,
            SessionState::Requesting => {
                match self.source.poll() {
                    SourceStatus::Ready(size) => {
                        self.canvas = size;
                        self.device = self.source.device();
                        self.state = SessionState::Active;
                        self.clock.start();
                    }
                    SourceStatus::Pending => return false,
                    SourceStatus::Lost(reason) => {
                        self.fail_source(reason);
                        return false;
                    }
                }
            }
            SessionState::Active => {}
        }

        match self.source.poll() {
            SourceStatus::Ready(size) => self.canvas = size,
            // Dimensions not established: the tick is skipped entirely.
            SourceStatus::Pending => return false,
            SourceStatus::Lost(reason) => {
                self.fail_source(reason);
                return false;
            }
        }

        match self.clock.on_opportunity(now) {
            TickDecision::Fire => {}
            TickDecision::Skip(reason) => {
                if reason == SkipReason::Busy {
                    self.emit(PipelineEvent::TickSkipped { reason });
                }
                return false;
            }
            TickDecision::Halted => return false,
        }

        self.run_tick(now, surface);
        self.clock.complete();
        true
    }

    #[tracing::instrument(level = "debug", skip_all, fields(seq = self.next_seq.0 + 1))]
    fn run_tick(&mut self, now: Duration, surface: &mut dyn DrawSurface) {
        if let Err(err) = self.source.capture_into(&mut self.buffer) {
            self.fail_source(err.to_string());
            return;
        }

        let seq = self.next_seq.next();
        self.next_seq = seq;
        let frame = Frame {
            seq,
            captured_at: now,
            size: self.buffer.size(),
        };
        self.last_frame = Some(frame);

        let fresh_batch = self.channel.refresh();

        if let Err(err) = surface.blit_rgba8(self.buffer.size(), self.buffer.data()) {
            tracing::warn!(error = %err, "base frame blit failed");
        }

        // Stable snapshot: registry mutations between ticks cannot disturb
        // this round.
        let ids = self.registry.ordered_ids();
        let mut failures: Vec<HookFailure> = Vec::new();

        for id in &ids {
            let Some(layer) = self.registry.get_mut(id) else {
                continue;
            };
            if !layer.visible {
                continue;
            }

            let ctx = FrameContext {
                frame,
                pixels: self.buffer.data(),
                detections: self.channel.latest(),
                canvas: self.canvas,
                device: &self.device,
            };

            if fresh_batch
                && let Some(hook) = layer.hooks.on_detections.as_mut()
                && let Err(err) = hook(ctx.detections, &ctx)
            {
                failures.push(HookFailure::new(id, HookStage::Detections, err));
            }

            if let Some(hook) = layer.hooks.on_frame.as_mut()
                && let Err(err) = hook(&frame, &ctx)
            {
                failures.push(HookFailure::new(id, HookStage::Frame, err));
            }

            if let Some(hook) = layer.hooks.draw.as_mut()
                && let Err(err) = with_scope(surface, |s| hook(s, &ctx))
            {
                failures.push(HookFailure::new(id, HookStage::Draw, err));
            }
        }

        if let Some(observer) = self.frame_observer.as_mut() {
            observer(&frame, self.buffer.data());
        }

        for failure in failures {
            self.report_hook_failure(failure);
        }
    }

    fn fail_source(&mut self, reason: String) {
        tracing::warn!(%reason, "video source unavailable; halting ticks");
        self.clock.stop();
        self.state = SessionState::Error;
        self.emit(PipelineEvent::SourceUnavailable { reason });
    }

    fn report_hook_failure(&mut self, failure: HookFailure) {
        tracing::warn!(
            layer = %failure.layer,
            stage = ?failure.stage,
            error = %failure.error,
            "layer callback failed; tick continues"
        );
        self.emit(PipelineEvent::LayerCallbackFailed {
            id: failure.layer,
            stage: failure.stage,
            message: failure.error.to_string(),
        });
    }

    fn emit(&mut self, event: PipelineEvent) {
        if let Some(sink) = self.events.as_mut() {
            sink(&event);
        }
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        for failure in self.registry.teardown() {
            tracing::warn!(
                layer = %failure.layer,
                error = %failure.error,
                "unmount callback failed during teardown"
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/session.rs"]
mod tests;
