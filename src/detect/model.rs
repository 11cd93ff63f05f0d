use std::time::Duration;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{LenslayerError, LenslayerResult};

/// Closed set of detection categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionCategory {
    /// A detected face.
    Face,
    /// A detected generic object.
    Object,
    /// A producer-defined category; the label carries the meaning.
    Custom,
}

/// A named landmark point in frame-pixel coordinates.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Landmark {
    /// Landmark name (e.g. "left_eye").
    pub name: String,
    /// Position in frame-pixel coordinates.
    pub point: Point,
}

/// One detection result item.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Detection {
    /// Opaque producer-assigned identity.
    pub id: String,
    /// Category tag.
    pub category: DetectionCategory,
    /// Human-readable label.
    pub label: String,
    /// Confidence score in `[0, 1]`.
    pub confidence: f64,
    /// Axis-aligned bounding region in frame-pixel coordinates.
    pub bbox: Rect,
    /// Optional named landmark points.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub landmarks: Vec<Landmark>,
    /// Optional free-form producer metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

impl Detection {
    /// Construct a detection with no landmarks or metadata.
    pub fn new(
        id: impl Into<String>,
        category: DetectionCategory,
        label: impl Into<String>,
        confidence: f64,
        bbox: Rect,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            label: label.into(),
            confidence,
            bbox,
            landmarks: Vec::new(),
            metadata: None,
        }
    }

    /// Validate value invariants.
    pub fn validate(&self) -> LenslayerResult<()> {
        if !self.confidence.is_finite() || !(0.0..=1.0).contains(&self.confidence) {
            return Err(LenslayerError::detection(format!(
                "detection '{}' confidence must be in [0, 1]",
                self.id
            )));
        }
        for v in [self.bbox.x0, self.bbox.y0, self.bbox.x1, self.bbox.y1] {
            if !v.is_finite() {
                return Err(LenslayerError::detection(format!(
                    "detection '{}' bbox must be finite",
                    self.id
                )));
            }
        }
        if self.bbox.x1 < self.bbox.x0 || self.bbox.y1 < self.bbox.y0 {
            return Err(LenslayerError::detection(format!(
                "detection '{}' bbox must have non-negative extent",
                self.id
            )));
        }
        Ok(())
    }

    /// Point-in-bounding-region test in frame-pixel coordinates.
    pub fn contains(&self, point: Point) -> bool {
        self.bbox.contains(point)
    }
}

/// An atomic, timestamped set of detections sharing one producer tick.
///
/// Batches are delivered whole, never partially; `captured_at` is the frame
/// timestamp the batch was computed against, which lets consumers detect
/// staleness relative to the current frame.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DetectionBatch {
    /// Frame timestamp this batch was computed against.
    pub captured_at: Duration,
    /// Ordered detections.
    pub detections: Vec<Detection>,
}

impl DetectionBatch {
    /// Construct a batch.
    pub fn new(captured_at: Duration, detections: Vec<Detection>) -> Self {
        Self {
            captured_at,
            detections,
        }
    }

    /// The shared empty batch.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of detections.
    pub fn len(&self) -> usize {
        self.detections.len()
    }

    /// True when the batch carries no detections.
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Validate every detection in the batch.
    pub fn validate(&self) -> LenslayerResult<()> {
        for d in &self.detections {
            d.validate()?;
        }
        Ok(())
    }

    /// True when the batch is older than `frame_captured_at` by more than
    /// `threshold`.
    pub fn is_stale(&self, frame_captured_at: Duration, threshold: Duration) -> bool {
        frame_captured_at.saturating_sub(self.captured_at) > threshold
    }

    /// First detection (in batch order) whose bounding region contains `point`.
    pub fn hit(&self, point: Point) -> Option<&Detection> {
        self.detections.iter().find(|d| d.contains(point))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/detect/model.rs"]
mod tests;
