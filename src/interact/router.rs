use crate::detect::{Detection, DetectionBatch};
use crate::foundation::core::{CanvasSize, Point, Rect};
use crate::layer::{HitClaim, HookFailure, HookStage, LayerId, LayerRegistry};

/// Kind of pointer event being routed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerKind {
    /// A click or tap.
    Click,
    /// A hover / move.
    Hover,
}

/// Mapping from client (screen) coordinates to canvas-local coordinates.
///
/// `bounds` is the canvas's current on-screen rectangle; `backing` is the
/// backing-buffer resolution. The two differ under CSS-style scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// On-screen bounding rectangle of the canvas, in client coordinates.
    pub bounds: Rect,
    /// Backing-buffer resolution.
    pub backing: CanvasSize,
}

impl Viewport {
    /// Convert client coordinates to canvas-local coordinates.
    ///
    /// Returns `None` when the point lies outside the canvas's on-screen
    /// rectangle or the rectangle is degenerate.
    pub fn to_canvas(&self, client: Point) -> Option<Point> {
        if self.bounds.width() <= 0.0 || self.bounds.height() <= 0.0 {
            return None;
        }
        if !self.bounds.contains(client) {
            return None;
        }
        let sx = f64::from(self.backing.width) / self.bounds.width();
        let sy = f64::from(self.backing.height) / self.bounds.height();
        Some(Point::new(
            (client.x - self.bounds.x0) * sx,
            (client.y - self.bounds.y0) * sy,
        ))
    }
}

/// A resolved pointer event delivered to a layer handler or observer.
#[derive(Clone, Debug)]
pub struct PointerHit {
    /// Event kind.
    pub kind: PointerKind,
    /// Canvas-local point.
    pub point: Point,
    /// Claiming layer, when one claimed the point.
    pub layer: Option<LayerId>,
    /// Detection whose bounding region matched, for detection-aware claims.
    pub detection: Option<Detection>,
}

/// Result of routing one pointer event.
#[derive(Debug)]
pub struct RouteOutcome {
    /// Canvas-local point the event resolved to.
    pub point: Point,
    /// The layer that claimed the point, if any.
    pub claimed: Option<LayerId>,
    /// The detection attached to the claim, if any.
    pub detection: Option<Detection>,
    /// Contained handler failures to report.
    pub failures: Vec<HookFailure>,
}

/// Resolve a canvas-local pointer event against the topmost matching layer.
///
/// A pure, synchronous function of `(point, ordered layers, current
/// detections)`: walks the registry's ordered view from topmost (highest
/// order key) to bottommost and dispatches at most one layer's handler.
/// Hover dispatch is not rate-limited here; callers wanting throttling apply
/// it at the observer boundary.
///
/// Claim rules per visible, interactive layer:
///
/// 1. a custom `hit_test` hook decides when present;
/// 2. otherwise a detection-aware layer (one with an `on_detections` hook)
///    claims exactly the points inside a current detection's bounding region,
///    and that detection rides on the dispatched hit;
/// 3. otherwise the whole canvas claims the point.
///
/// A layer that would claim but has no handler for the event kind declines,
/// letting the layers below it respond. Handler errors are contained,
/// collected into the outcome, and still count as a claim.
pub fn route_pointer(
    registry: &mut LayerRegistry,
    detections: &DetectionBatch,
    canvas: CanvasSize,
    point: Point,
    kind: PointerKind,
) -> RouteOutcome {
    let mut outcome = RouteOutcome {
        point,
        claimed: None,
        detection: None,
        failures: Vec::new(),
    };

    let ids = registry.ordered_ids();
    for id in ids.iter().rev() {
        let Some(layer) = registry.get_mut(id) else {
            continue;
        };
        if !layer.visible || !layer.interactive {
            continue;
        }

        let matched: Option<Option<Detection>> = if let Some(test) = layer.hooks.hit_test.as_ref()
        {
            match test(point, detections) {
                HitClaim::Claim => Some(None),
                HitClaim::Decline => None,
            }
        } else if layer.hooks.on_detections.is_some() {
            detections.hit(point).map(|d| Some(d.clone()))
        } else if canvas.to_rect().contains(point) {
            Some(None)
        } else {
            None
        };

        let Some(detection) = matched else {
            continue;
        };

        let handler = match kind {
            PointerKind::Click => layer.hooks.on_click.as_mut(),
            PointerKind::Hover => layer.hooks.on_hover.as_mut(),
        };
        let Some(handler) = handler else {
            // Claim without a handler for this kind falls through.
            continue;
        };

        let hit = PointerHit {
            kind,
            point,
            layer: Some(id.clone()),
            detection: detection.clone(),
        };
        if let Err(err) = handler(&hit) {
            let stage = match kind {
                PointerKind::Click => HookStage::Click,
                PointerKind::Hover => HookStage::Hover,
            };
            outcome.failures.push(HookFailure::new(id, stage, err));
        }
        outcome.claimed = Some(id.clone());
        outcome.detection = detection;
        return outcome;
    }

    outcome
}

#[cfg(test)]
#[path = "../../tests/unit/interact/router.rs"]
mod tests;
