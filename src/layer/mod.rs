//! Layer records, hook slots, and the ordered layer registry.

mod model;
mod registry;

pub use model::{
    DetectionsHook, DrawHook, FrameHook, HitClaim, HitTestHook, HookFailure, HookStage, Layer,
    LayerHooks, LayerId, LayerUpdate, MountHook, PointerHook, UnmountHook,
};
pub use registry::LayerRegistry;
