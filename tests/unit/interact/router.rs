use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::detect::DetectionCategory;
use crate::foundation::error::LenslayerError;
use crate::frame::{DeviceDescriptor, FrameContext};
use crate::layer::Layer;

fn registry(layers: Vec<Layer>) -> LayerRegistry {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);
    let mut reg = LayerRegistry::new();
    for layer in layers {
        reg.register(layer, &ctx).unwrap();
    }
    reg
}

fn face_batch() -> DetectionBatch {
    DetectionBatch::new(
        std::time::Duration::ZERO,
        vec![Detection::new(
            "f1",
            DetectionCategory::Face,
            "face",
            0.9,
            Rect::new(10.0, 10.0, 50.0, 50.0),
        )],
    )
}

const CANVAS: CanvasSize = CanvasSize {
    width: 100,
    height: 100,
};

#[test]
fn plain_interactive_layer_claims_the_whole_canvas() {
    let clicks: Rc<RefCell<Vec<Point>>> = Rc::default();
    let log = clicks.clone();
    let mut reg = registry(vec![Layer::new("a", 0).interactive(true).on_click(
        move |hit| {
            log.borrow_mut().push(hit.point);
            Ok(())
        },
    )]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(70.0, 70.0),
        PointerKind::Click,
    );
    assert_eq!(out.claimed, Some(LayerId::new("a")));
    assert_eq!(*clicks.borrow(), [Point::new(70.0, 70.0)]);

    // Outside the canvas nothing claims.
    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(150.0, 50.0),
        PointerKind::Click,
    );
    assert!(out.claimed.is_none());
}

#[test]
fn topmost_claiming_layer_wins() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let l1 = log.clone();
    let l2 = log.clone();
    let mut reg = registry(vec![
        Layer::new("bottom", 0).interactive(true).on_click(move |_| {
            l1.borrow_mut().push("bottom");
            Ok(())
        }),
        Layer::new("top", 10).interactive(true).on_click(move |_| {
            l2.borrow_mut().push("top");
            Ok(())
        }),
    ]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(50.0, 50.0),
        PointerKind::Click,
    );
    assert_eq!(out.claimed, Some(LayerId::new("top")));
    // Exactly one handler ran.
    assert_eq!(*log.borrow(), ["top"]);
}

#[test]
fn layer_without_a_handler_for_the_kind_falls_through() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let l1 = log.clone();
    let l2 = log.clone();
    let mut reg = registry(vec![
        Layer::new("bottom", 0).interactive(true).on_click(move |_| {
            l1.borrow_mut().push("bottom-click");
            Ok(())
        }),
        // Hover-only layer on top: claims hovers, passes clicks through.
        Layer::new("top", 10).interactive(true).on_hover(move |_| {
            l2.borrow_mut().push("top-hover");
            Ok(())
        }),
    ]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(50.0, 50.0),
        PointerKind::Click,
    );
    assert_eq!(out.claimed, Some(LayerId::new("bottom")));

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(50.0, 50.0),
        PointerKind::Hover,
    );
    assert_eq!(out.claimed, Some(LayerId::new("top")));
    assert_eq!(*log.borrow(), ["bottom-click", "top-hover"]);
}

#[test]
fn detection_aware_layer_claims_only_inside_bounding_regions() {
    let seen: Rc<RefCell<Vec<String>>> = Rc::default();
    let log = seen.clone();
    let mut reg = registry(vec![Layer::new("badges", 0)
        .interactive(true)
        .on_detections(|_, _| Ok(()))
        .on_click(move |hit| {
            log.borrow_mut()
                .push(hit.detection.as_ref().unwrap().id.clone());
            Ok(())
        })]);
    let batch = face_batch();

    // Inside the face box: claimed, and the matched detection rides along.
    let out = route_pointer(&mut reg, &batch, CANVAS, Point::new(30.0, 30.0), PointerKind::Click);
    assert_eq!(out.claimed, Some(LayerId::new("badges")));
    assert_eq!(out.detection.unwrap().id, "f1");
    assert_eq!(*seen.borrow(), ["f1"]);

    // Outside every box: the layer declines.
    let out = route_pointer(&mut reg, &batch, CANVAS, Point::new(70.0, 70.0), PointerKind::Click);
    assert!(out.claimed.is_none());
}

#[test]
fn custom_hit_test_overrides_default_claims() {
    let mut reg = registry(vec![Layer::new("half", 0)
        .interactive(true)
        .hit_test(|p, _| {
            if p.x < 50.0 {
                HitClaim::Claim
            } else {
                HitClaim::Decline
            }
        })
        .on_click(|_| Ok(()))]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(20.0, 50.0),
        PointerKind::Click,
    );
    assert_eq!(out.claimed, Some(LayerId::new("half")));

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(80.0, 50.0),
        PointerKind::Click,
    );
    assert!(out.claimed.is_none());
}

#[test]
fn invisible_and_non_interactive_layers_are_skipped() {
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();
    let l1 = log.clone();
    let l2 = log.clone();
    let mut reg = registry(vec![
        Layer::new("hidden", 10)
            .interactive(true)
            .visible(false)
            .on_click(move |_| {
                l1.borrow_mut().push("hidden");
                Ok(())
            }),
        Layer::new("inert", 5).on_click(move |_| {
            l2.borrow_mut().push("inert");
            Ok(())
        }),
    ]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(50.0, 50.0),
        PointerKind::Click,
    );
    assert!(out.claimed.is_none());
    assert!(log.borrow().is_empty());
}

#[test]
fn handler_error_is_contained_and_still_counts_as_a_claim() {
    let mut reg = registry(vec![Layer::new("a", 0)
        .interactive(true)
        .on_click(|_| Err(LenslayerError::callback("click exploded")))]);

    let out = route_pointer(
        &mut reg,
        &DetectionBatch::empty(),
        CANVAS,
        Point::new(50.0, 50.0),
        PointerKind::Click,
    );
    assert_eq!(out.claimed, Some(LayerId::new("a")));
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].stage, HookStage::Click);
}

#[test]
fn viewport_maps_client_to_canvas_coordinates() {
    let vp = Viewport {
        bounds: Rect::new(100.0, 50.0, 300.0, 150.0), // 200x100 on screen
        backing: CanvasSize::new(400, 200),            // 2x backing scale
    };

    let p = vp.to_canvas(Point::new(150.0, 100.0)).unwrap();
    assert_eq!(p, Point::new(100.0, 100.0));

    assert!(vp.to_canvas(Point::new(50.0, 100.0)).is_none());
    assert!(vp.to_canvas(Point::new(150.0, 200.0)).is_none());

    let degenerate = Viewport {
        bounds: Rect::new(0.0, 0.0, 0.0, 0.0),
        backing: CanvasSize::new(400, 200),
    };
    assert!(degenerate.to_canvas(Point::new(0.0, 0.0)).is_none());
}
