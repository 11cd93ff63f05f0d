use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};

use crate::detect::model::{DetectionBatch, DetectionCategory};

/// Production-side configuration for the external detection collaborator.
///
/// The core never filters batches itself; the producer reads this through
/// [`DetectionSink::config`] and applies it to the *next* batch it produces.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Minimum confidence a detection must reach to be emitted.
    pub min_confidence: f64,
    /// Categories to produce; empty means all categories.
    pub categories: Vec<DetectionCategory>,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.5,
            categories: Vec::new(),
        }
    }
}

#[derive(Debug)]
struct ChannelControl {
    enabled: AtomicBool,
    config: Mutex<DetectorConfig>,
}

impl ChannelControl {
    fn config(&self) -> DetectorConfig {
        match self.config.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set_config(&self, config: DetectorConfig) {
        match self.config.lock() {
            Ok(mut guard) => *guard = config,
            Err(poisoned) => *poisoned.into_inner() = config,
        }
    }
}

/// Producer handle pushed into by the detection collaborator.
///
/// Cloneable and sendable to a worker thread. Pushes never block; a push after
/// the consumer side is gone is dropped silently (an in-flight result arriving
/// after teardown must not crash anything).
#[derive(Clone, Debug)]
pub struct DetectionSink {
    tx: Sender<DetectionBatch>,
    control: Arc<ChannelControl>,
}

impl DetectionSink {
    /// Deliver one whole batch. Never blocks.
    pub fn push(&self, batch: DetectionBatch) {
        if self.tx.send(batch).is_err() {
            tracing::debug!("detection batch dropped: channel closed");
        }
    }

    /// Whether the consumer currently wants detection output.
    pub fn is_enabled(&self) -> bool {
        self.control.enabled.load(Ordering::Relaxed)
    }

    /// Current production configuration. Applies to the next produced batch;
    /// in-flight production is not retroactively filtered.
    pub fn config(&self) -> DetectorConfig {
        self.control.config()
    }
}

/// Consumer side of the detection boundary, owned by the pipeline.
///
/// Latest-wins: [`refresh`](Self::refresh) drains everything pending down to
/// the newest batch. A tick may observe the same batch as the previous tick,
/// and intermediate batches may be skipped when production outpaces
/// consumption, but a batch is always observed whole.
#[derive(Debug)]
pub struct DetectionChannel {
    rx: Receiver<DetectionBatch>,
    latest: DetectionBatch,
    empty: DetectionBatch,
    control: Arc<ChannelControl>,
}

/// Create a connected sink/channel pair.
pub fn detection_channel() -> (DetectionSink, DetectionChannel) {
    let (tx, rx) = unbounded();
    let control = Arc::new(ChannelControl {
        enabled: AtomicBool::new(true),
        config: Mutex::new(DetectorConfig::default()),
    });
    let sink = DetectionSink {
        tx,
        control: Arc::clone(&control),
    };
    let channel = DetectionChannel {
        rx,
        latest: DetectionBatch::empty(),
        empty: DetectionBatch::empty(),
        control,
    };
    (sink, channel)
}

impl DetectionChannel {
    /// Drain pending batches down to the newest. Returns `true` when the batch
    /// visible through [`latest`](Self::latest) advanced.
    pub fn refresh(&mut self) -> bool {
        let mut advanced = false;
        loop {
            match self.rx.try_recv() {
                Ok(batch) => {
                    self.latest = batch;
                    advanced = true;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        advanced && self.is_enabled()
    }

    /// The latest fully received batch, or the empty batch while detection is
    /// disabled.
    pub fn latest(&self) -> &DetectionBatch {
        if self.is_enabled() {
            &self.latest
        } else {
            &self.empty
        }
    }

    /// Toggle detection output. Immediate from the consumer's perspective;
    /// the last-known batch reappears on re-enable (stale-data policy).
    pub fn set_enabled(&self, enabled: bool) {
        self.control.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether detection output is enabled.
    pub fn is_enabled(&self) -> bool {
        self.control.enabled.load(Ordering::Relaxed)
    }

    /// Replace the production configuration observed by the sink.
    pub fn set_config(&self, config: DetectorConfig) {
        self.control.set_config(config);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/channel.rs"]
mod tests;
