use super::*;

use std::cell::RefCell;
use std::rc::Rc;

use crate::detect::DetectionBatch;
use crate::foundation::core::FrameSeq;
use crate::frame::DeviceDescriptor;
use crate::layer::LayerHooks;

fn ids(registry: &LayerRegistry) -> Vec<String> {
    registry.ordered().map(|l| l.id().to_string()).collect()
}

#[test]
fn ordered_by_key_then_registration() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);

    let mut reg = LayerRegistry::new();
    reg.register(Layer::new("a", 0), &ctx).unwrap();
    reg.register(Layer::new("b", 0), &ctx).unwrap();
    reg.register(Layer::new("c", -1), &ctx).unwrap();

    // Equal keys keep registration order; lower keys draw first.
    assert_eq!(ids(&reg), ["c", "a", "b"]);
}

#[test]
fn duplicate_id_refused_and_original_kept() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);

    let mut reg = LayerRegistry::new();
    reg.register(Layer::new("a", 0).visible(false), &ctx).unwrap();

    let err = reg.register(Layer::new("a", 5), &ctx).unwrap_err();
    assert!(matches!(err, LenslayerError::DuplicateLayer(_)));
    assert_eq!(reg.len(), 1);
    let kept = reg.get(&LayerId::new("a")).unwrap();
    assert_eq!(kept.order, 0);
    assert!(!kept.visible);
}

#[test]
fn unknown_ids_are_rejected() {
    let mut reg = LayerRegistry::new();
    assert!(matches!(
        reg.unregister(&LayerId::new("ghost")),
        Err(LenslayerError::UnknownLayer(_))
    ));
    assert!(matches!(
        reg.update(&LayerId::new("ghost"), LayerUpdate::new().visible(false)),
        Err(LenslayerError::UnknownLayer(_))
    ));
}

#[test]
fn mount_and_unmount_callbacks_run() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let mut reg = LayerRegistry::new();
    let l1 = log.clone();
    let l2 = log.clone();
    let layer = Layer::new("a", 0)
        .on_mount(move |mount_ctx| {
            assert_eq!(mount_ctx.frame.seq, FrameSeq(0));
            l1.borrow_mut().push("mount");
            Ok(())
        })
        .on_unmount(move || {
            l2.borrow_mut().push("unmount");
            Ok(())
        });

    assert!(reg.register(layer, &ctx).unwrap().is_none());
    assert_eq!(*log.borrow(), ["mount"]);

    assert!(reg.unregister(&LayerId::new("a")).unwrap().is_none());
    assert_eq!(*log.borrow(), ["mount", "unmount"]);
    assert!(reg.is_empty());
}

#[test]
fn failing_mount_is_contained_but_layer_registers() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);

    let mut reg = LayerRegistry::new();
    let layer = Layer::new("a", 0).on_mount(|_| Err(LenslayerError::callback("mount exploded")));

    let failure = reg.register(layer, &ctx).unwrap().unwrap();
    assert_eq!(failure.layer, LayerId::new("a"));
    assert_eq!(failure.stage, HookStage::Mount);
    assert!(reg.contains(&LayerId::new("a")));
}

#[test]
fn update_merges_and_resorts() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);

    let mut reg = LayerRegistry::new();
    reg.register(Layer::new("a", 0), &ctx).unwrap();
    reg.register(Layer::new("b", 1), &ctx).unwrap();

    reg.update(
        &LayerId::new("a"),
        LayerUpdate::new().order(2).interactive(true),
    )
    .unwrap();

    assert_eq!(ids(&reg), ["b", "a"]);
    let a = reg.get(&LayerId::new("a")).unwrap();
    assert_eq!(a.order, 2);
    assert!(a.interactive);
    assert!(a.visible); // untouched fields preserved
}

#[test]
fn update_replaces_hooks_wholesale() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);

    let mut reg = LayerRegistry::new();
    reg.register(Layer::new("a", 0).on_unmount(|| Ok(())), &ctx)
        .unwrap();

    // An empty replacement set removes every hook.
    reg.update(&LayerId::new("a"), LayerUpdate::new().hooks(LayerHooks::default()))
        .unwrap();
    let a = reg.get(&LayerId::new("a")).unwrap();
    assert!(a.hooks.on_unmount.is_none());
}

#[test]
fn teardown_unmounts_ascending_and_collects_failures() {
    let batch = DetectionBatch::empty();
    let device = DeviceDescriptor::default();
    let ctx = FrameContext::empty(&batch, &device);
    let log: Rc<RefCell<Vec<&'static str>>> = Rc::default();

    let mut reg = LayerRegistry::new();
    let l1 = log.clone();
    reg.register(
        Layer::new("top", 5).on_unmount(move || {
            l1.borrow_mut().push("top");
            Ok(())
        }),
        &ctx,
    )
    .unwrap();
    let l2 = log.clone();
    reg.register(
        Layer::new("bottom", 1).on_unmount(move || {
            l2.borrow_mut().push("bottom");
            Err(LenslayerError::callback("unmount exploded"))
        }),
        &ctx,
    )
    .unwrap();

    let failures = reg.teardown();
    assert_eq!(*log.borrow(), ["bottom", "top"]);
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].layer, LayerId::new("bottom"));
    assert_eq!(failures[0].stage, HookStage::Unmount);
    assert!(reg.is_empty());
}
