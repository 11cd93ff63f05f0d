use std::fmt;

use crate::detect::DetectionBatch;
use crate::foundation::core::Point;
use crate::foundation::error::{LenslayerError, LenslayerResult};
use crate::frame::{Frame, FrameContext};
use crate::interact::PointerHit;
use crate::surface::DrawSurface;

/// Unique layer identity, immutable after registration.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LayerId(String);

impl LayerId {
    /// Construct an id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LayerId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for LayerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Answer of a custom layer hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitClaim {
    /// The layer claims the point; routing stops here.
    Claim,
    /// The layer declines; routing continues below it.
    Decline,
}

/// Mount callback, invoked once at registration with the most recent context.
pub type MountHook = Box<dyn FnMut(&FrameContext<'_>) -> LenslayerResult<()>>;
/// Unmount callback, invoked at removal or registry teardown.
pub type UnmountHook = Box<dyn FnMut() -> LenslayerResult<()>>;
/// Per-frame callback, invoked each tick before the draw callback.
pub type FrameHook = Box<dyn FnMut(&Frame, &FrameContext<'_>) -> LenslayerResult<()>>;
/// Per-detection-batch callback, invoked when a tick observes a new batch.
pub type DetectionsHook = Box<dyn FnMut(&DetectionBatch, &FrameContext<'_>) -> LenslayerResult<()>>;
/// Draw callback, invoked each tick inside an isolated drawing scope.
pub type DrawHook = Box<dyn FnMut(&mut dyn DrawSurface, &FrameContext<'_>) -> LenslayerResult<()>>;
/// Custom hit test in canvas-local coordinates.
pub type HitTestHook = Box<dyn Fn(Point, &DetectionBatch) -> HitClaim>;
/// Pointer callback for click or hover dispatch.
pub type PointerHook = Box<dyn FnMut(&PointerHit) -> LenslayerResult<()>>;

/// Optional handler slots of a layer.
///
/// Dispatch is a plain presence check per slot; a layer implements exactly the
/// capabilities it fills in.
#[derive(Default)]
pub struct LayerHooks {
    /// Invoked once when the layer is registered.
    pub on_mount: Option<MountHook>,
    /// Invoked when the layer is removed or the registry is torn down.
    pub on_unmount: Option<UnmountHook>,
    /// Invoked every tick with the current frame and shared context.
    pub on_frame: Option<FrameHook>,
    /// Invoked when a tick observes a detection batch it has not seen before.
    pub on_detections: Option<DetectionsHook>,
    /// Invoked every tick to draw, inside a save/restore scope.
    pub draw: Option<DrawHook>,
    /// Custom pointer hit test; overrides the default claim behavior.
    pub hit_test: Option<HitTestHook>,
    /// Invoked when this layer claims a click.
    pub on_click: Option<PointerHook>,
    /// Invoked when this layer claims a hover.
    pub on_hover: Option<PointerHook>,
}

impl fmt::Debug for LayerHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set = f.debug_set();
        for (name, present) in [
            ("on_mount", self.on_mount.is_some()),
            ("on_unmount", self.on_unmount.is_some()),
            ("on_frame", self.on_frame.is_some()),
            ("on_detections", self.on_detections.is_some()),
            ("draw", self.draw.is_some()),
            ("hit_test", self.hit_test.is_some()),
            ("on_click", self.on_click.is_some()),
            ("on_hover", self.on_hover.is_some()),
        ] {
            if present {
                set.entry(&name);
            }
        }
        set.finish()
    }
}

/// Which hook a contained failure came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HookStage {
    /// Mount callback.
    Mount,
    /// Unmount callback.
    Unmount,
    /// Per-frame callback.
    Frame,
    /// Per-detection-batch callback.
    Detections,
    /// Draw callback.
    Draw,
    /// Click callback.
    Click,
    /// Hover callback.
    Hover,
}

/// A contained layer-callback failure, reported with the offending layer id.
#[derive(Debug)]
pub struct HookFailure {
    /// Layer whose callback failed.
    pub layer: LayerId,
    /// Which callback failed.
    pub stage: HookStage,
    /// The error the callback returned.
    pub error: LenslayerError,
}

/// A registered composition participant.
///
/// Layers with a lower order key draw first (underneath); ties are broken by
/// registration order. The id is immutable after registration; the remaining
/// fields are mutated through [`crate::LayerRegistry::update`].
#[derive(Debug)]
pub struct Layer {
    id: LayerId,
    /// Whether the layer participates in the tick round.
    pub visible: bool,
    /// Draw/hit-test order key; ascending draws first.
    pub order: i32,
    /// Whether the layer participates in pointer routing.
    pub interactive: bool,
    /// Optional handler slots.
    pub hooks: LayerHooks,
}

impl Layer {
    /// Create a visible, non-interactive layer with no hooks.
    pub fn new(id: impl Into<LayerId>, order: i32) -> Self {
        Self {
            id: id.into(),
            visible: true,
            order,
            interactive: false,
            hooks: LayerHooks::default(),
        }
    }

    /// Layer identity.
    pub fn id(&self) -> &LayerId {
        &self.id
    }

    /// Set visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set interactivity.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Attach a mount callback.
    pub fn on_mount(
        mut self,
        hook: impl FnMut(&FrameContext<'_>) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.on_mount = Some(Box::new(hook));
        self
    }

    /// Attach an unmount callback.
    pub fn on_unmount(mut self, hook: impl FnMut() -> LenslayerResult<()> + 'static) -> Self {
        self.hooks.on_unmount = Some(Box::new(hook));
        self
    }

    /// Attach a per-frame callback.
    pub fn on_frame(
        mut self,
        hook: impl FnMut(&Frame, &FrameContext<'_>) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.on_frame = Some(Box::new(hook));
        self
    }

    /// Attach a per-detection-batch callback. A layer with this hook is
    /// treated as detection-aware by the interaction router.
    pub fn on_detections(
        mut self,
        hook: impl FnMut(&DetectionBatch, &FrameContext<'_>) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.on_detections = Some(Box::new(hook));
        self
    }

    /// Attach a draw callback.
    pub fn draw(
        mut self,
        hook: impl FnMut(&mut dyn DrawSurface, &FrameContext<'_>) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.draw = Some(Box::new(hook));
        self
    }

    /// Attach a custom hit test.
    pub fn hit_test(
        mut self,
        hook: impl Fn(Point, &DetectionBatch) -> HitClaim + 'static,
    ) -> Self {
        self.hooks.hit_test = Some(Box::new(hook));
        self
    }

    /// Attach a click callback.
    pub fn on_click(
        mut self,
        hook: impl FnMut(&PointerHit) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.on_click = Some(Box::new(hook));
        self
    }

    /// Attach a hover callback.
    pub fn on_hover(
        mut self,
        hook: impl FnMut(&PointerHit) -> LenslayerResult<()> + 'static,
    ) -> Self {
        self.hooks.on_hover = Some(Box::new(hook));
        self
    }
}

/// Partial changes merged into a registered layer, preserving its id.
///
/// `hooks`, when present, replaces the whole hook set (a per-slot merge could
/// not express hook removal).
#[derive(Debug, Default)]
pub struct LayerUpdate {
    /// New visibility, if changing.
    pub visible: Option<bool>,
    /// New order key, if changing.
    pub order: Option<i32>,
    /// New interactivity, if changing.
    pub interactive: Option<bool>,
    /// Replacement hook set, if changing.
    pub hooks: Option<LayerHooks>,
}

impl LayerUpdate {
    /// An empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Change visibility.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Change the order key.
    pub fn order(mut self, order: i32) -> Self {
        self.order = Some(order);
        self
    }

    /// Change interactivity.
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }

    /// Replace the hook set.
    pub fn hooks(mut self, hooks: LayerHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }
}

impl HookFailure {
    pub(crate) fn new(layer: &LayerId, stage: HookStage, error: LenslayerError) -> Self {
        Self {
            layer: layer.clone(),
            stage,
            error,
        }
    }
}
