//! Drawing-surface abstraction and the CPU reference implementation.

mod raster;

pub use raster::RasterSurface;

use crate::foundation::core::{Affine, CanvasSize, Rect, Rgba8Premul};
use crate::foundation::error::LenslayerResult;

/// A drawing surface the pipeline composites onto.
///
/// Hosts with a native canvas implement this over it; [`RasterSurface`] is the
/// always-available CPU implementation. Surfaces keep a save/restore state
/// stack covering at least the current transform, so that one layer's state
/// changes cannot leak into the next layer's draw call.
pub trait DrawSurface {
    /// Backing-buffer dimensions.
    fn size(&self) -> CanvasSize;

    /// Push the current drawing state.
    fn save(&mut self);

    /// Pop back to the most recently saved drawing state.
    fn restore(&mut self);

    /// Replace the current transform (canvas-local coordinates to device).
    fn set_transform(&mut self, transform: Affine);

    /// Fill a rectangle with a premultiplied color, source-over.
    fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul);

    /// Stroke a rectangle outline with the given edge width.
    fn stroke_rect(&mut self, rect: Rect, color: Rgba8Premul, width: f64);

    /// Paint a whole frame of tightly packed premultiplied RGBA8 pixels onto
    /// the surface. Used by the pipeline for the captured video frame.
    fn blit_rgba8(&mut self, size: CanvasSize, pixels: &[u8]) -> LenslayerResult<()>;
}

/// Run `f` inside an isolated drawing scope.
///
/// The surface state is saved before `f` and restored afterwards, including
/// when `f` returns an error, so a failing layer cannot leak transforms or
/// styles into the rest of the composition.
pub fn with_scope<F>(surface: &mut dyn DrawSurface, f: F) -> LenslayerResult<()>
where
    F: FnOnce(&mut dyn DrawSurface) -> LenslayerResult<()>,
{
    surface.save();
    let result = f(surface);
    surface.restore();
    result
}
