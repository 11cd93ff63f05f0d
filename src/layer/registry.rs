use crate::foundation::error::{LenslayerError, LenslayerResult};
use crate::frame::FrameContext;
use crate::layer::model::{HookFailure, HookStage, Layer, LayerId, LayerUpdate};

struct LayerEntry {
    layer: Layer,
    seq: u64,
}

/// Authoritative, order-stable set of layers.
///
/// Layers are kept in ascending `(order, registration sequence)` order; the
/// sorted view is cached and only rebuilt on mutation, so repeated queries are
/// stable and free of re-sort side effects.
///
/// The registry is a plain owned object (no ambient singleton); each pipeline
/// instance owns its own, so multiple pipelines coexist without interference.
#[derive(Default)]
pub struct LayerRegistry {
    entries: Vec<LayerEntry>,
    sorted: Vec<usize>,
    next_seq: u64,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered layers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no layers are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a layer with this id is registered.
    pub fn contains(&self, id: &LayerId) -> bool {
        self.entries.iter().any(|e| e.layer.id() == id)
    }

    /// Read access to a layer by id.
    pub fn get(&self, id: &LayerId) -> Option<&Layer> {
        self.entries
            .iter()
            .find(|e| e.layer.id() == id)
            .map(|e| &e.layer)
    }

    pub(crate) fn get_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.entries
            .iter_mut()
            .find(|e| e.layer.id() == id)
            .map(|e| &mut e.layer)
    }

    /// Register a layer and invoke its mount callback with the most recent
    /// frame context (a zero context before the first capture).
    ///
    /// Fails with [`LenslayerError::DuplicateLayer`] when the id is taken; the
    /// existing layer is never overwritten. A failing mount callback does not
    /// fail the registration; it is returned for reporting.
    pub fn register(
        &mut self,
        layer: Layer,
        ctx: &FrameContext<'_>,
    ) -> Result<Option<HookFailure>, LenslayerError> {
        if self.contains(layer.id()) {
            return Err(LenslayerError::DuplicateLayer(layer.id().to_string()));
        }

        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(LayerEntry { layer, seq });
        self.resort();

        let entry = match self.entries.last_mut() {
            Some(e) => e,
            None => return Ok(None),
        };
        let mut failure = None;
        if let Some(hook) = entry.layer.hooks.on_mount.as_mut()
            && let Err(err) = hook(ctx)
        {
            failure = Some(HookFailure::new(entry.layer.id(), HookStage::Mount, err));
        }
        Ok(failure)
    }

    /// Invoke the layer's unmount callback and remove it.
    ///
    /// Fails with [`LenslayerError::UnknownLayer`] when the id is absent.
    pub fn unregister(&mut self, id: &LayerId) -> Result<Option<HookFailure>, LenslayerError> {
        let Some(pos) = self.entries.iter().position(|e| e.layer.id() == id) else {
            return Err(LenslayerError::UnknownLayer(id.to_string()));
        };

        let mut entry = self.entries.remove(pos);
        self.resort();

        let mut failure = None;
        if let Some(hook) = entry.layer.hooks.on_unmount.as_mut()
            && let Err(err) = hook()
        {
            failure = Some(HookFailure::new(entry.layer.id(), HookStage::Unmount, err));
        }
        Ok(failure)
    }

    /// Merge partial changes into an existing layer, preserving its id.
    ///
    /// Fails with [`LenslayerError::UnknownLayer`] when the id is absent.
    pub fn update(&mut self, id: &LayerId, changes: LayerUpdate) -> LenslayerResult<()> {
        let Some(entry) = self.entries.iter_mut().find(|e| e.layer.id() == id) else {
            return Err(LenslayerError::UnknownLayer(id.to_string()));
        };

        let mut order_changed = false;
        if let Some(visible) = changes.visible {
            entry.layer.visible = visible;
        }
        if let Some(order) = changes.order {
            order_changed = entry.layer.order != order;
            entry.layer.order = order;
        }
        if let Some(interactive) = changes.interactive {
            entry.layer.interactive = interactive;
        }
        if let Some(hooks) = changes.hooks {
            entry.layer.hooks = hooks;
        }

        if order_changed {
            self.resort();
        }
        Ok(())
    }

    /// Layers in ascending `(order, registration sequence)` order.
    pub fn ordered(&self) -> impl Iterator<Item = &Layer> {
        self.sorted.iter().map(|&i| &self.entries[i].layer)
    }

    /// Snapshot of layer ids in ascending order. The pipeline takes this at
    /// the start of each tick so registry mutations between ticks cannot
    /// corrupt an in-progress round.
    pub fn ordered_ids(&self) -> Vec<LayerId> {
        self.ordered().map(|l| l.id().clone()).collect()
    }

    /// Invoke unmount for every remaining layer in ascending order, then
    /// clear. Contained callback failures are returned for reporting.
    pub fn teardown(&mut self) -> Vec<HookFailure> {
        let mut failures = Vec::new();
        let order: Vec<usize> = self.sorted.clone();
        for idx in order {
            let entry = &mut self.entries[idx];
            if let Some(hook) = entry.layer.hooks.on_unmount.as_mut()
                && let Err(err) = hook()
            {
                failures.push(HookFailure::new(entry.layer.id(), HookStage::Unmount, err));
            }
        }
        self.entries.clear();
        self.sorted.clear();
        failures
    }

    fn resort(&mut self) {
        self.sorted = (0..self.entries.len()).collect();
        self.sorted.sort_by_key(|&i| {
            let e = &self.entries[i];
            (e.layer.order, e.seq)
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layer/registry.rs"]
mod tests;
