//! Detection data model and the asynchronous detection channel.

mod channel;
mod model;

pub use channel::{DetectionChannel, DetectionSink, DetectorConfig, detection_channel};
pub use model::{Detection, DetectionBatch, DetectionCategory, Landmark};
