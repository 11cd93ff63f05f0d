use crate::foundation::core::{Affine, CanvasSize, Rect, Rgba8Premul};
use crate::foundation::error::{LenslayerError, LenslayerResult};
use crate::surface::DrawSurface;

/// CPU reference surface over a premultiplied-RGBA8 buffer.
///
/// Intended for tests and hosts without a native canvas. Rectangles are
/// transformed by the current transform's bounding box (no rotation-exact
/// rasterization; this surface exists to verify composition semantics, not to
/// be a renderer).
#[derive(Clone, Debug)]
pub struct RasterSurface {
    size: CanvasSize,
    data: Vec<u8>,
    transform: Affine,
    stack: Vec<Affine>,
}

impl RasterSurface {
    /// Create a transparent surface of the given size.
    pub fn new(size: CanvasSize) -> Self {
        Self {
            size,
            data: vec![0; size.pixel_bytes()],
            transform: Affine::IDENTITY,
            stack: Vec::new(),
        }
    }

    /// Read-only pixel view (premultiplied RGBA8, row-major).
    pub fn pixels(&self) -> &[u8] {
        &self.data
    }

    /// Premultiplied color at pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Rgba8Premul {
        let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
        Rgba8Premul {
            r: self.data[i],
            g: self.data[i + 1],
            b: self.data[i + 2],
            a: self.data[i + 3],
        }
    }

    /// Fill the whole surface, replacing existing content.
    pub fn clear(&mut self, color: Rgba8Premul) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&color.to_array());
        }
    }

    fn fill_device_rect(&mut self, rect: Rect, color: Rgba8Premul) {
        let x0 = rect.x0.max(0.0).floor() as u32;
        let y0 = rect.y0.max(0.0).floor() as u32;
        let x1 = (rect.x1.min(f64::from(self.size.width)).ceil() as u32).min(self.size.width);
        let y1 = (rect.y1.min(f64::from(self.size.height)).ceil() as u32).min(self.size.height);
        let src = color.to_array();
        for y in y0..y1 {
            for x in x0..x1 {
                let i = ((y as usize) * (self.size.width as usize) + (x as usize)) * 4;
                let dst = [
                    self.data[i],
                    self.data[i + 1],
                    self.data[i + 2],
                    self.data[i + 3],
                ];
                self.data[i..i + 4].copy_from_slice(&over(dst, src));
            }
        }
    }
}

impl DrawSurface for RasterSurface {
    fn size(&self) -> CanvasSize {
        self.size
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(t) = self.stack.pop() {
            self.transform = t;
        }
    }

    fn set_transform(&mut self, transform: Affine) {
        self.transform = transform;
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba8Premul) {
        let device = self.transform.transform_rect_bbox(rect);
        self.fill_device_rect(device, color);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Rgba8Premul, width: f64) {
        let w = width.max(0.0);
        if w == 0.0 {
            return;
        }
        let device = self.transform.transform_rect_bbox(rect);
        let top = Rect::new(device.x0 - w, device.y0 - w, device.x1 + w, device.y0);
        let bottom = Rect::new(device.x0 - w, device.y1, device.x1 + w, device.y1 + w);
        let left = Rect::new(device.x0 - w, device.y0, device.x0, device.y1);
        let right = Rect::new(device.x1, device.y0, device.x1 + w, device.y1);
        for edge in [top, bottom, left, right] {
            self.fill_device_rect(edge, color);
        }
    }

    fn blit_rgba8(&mut self, size: CanvasSize, pixels: &[u8]) -> LenslayerResult<()> {
        if size != self.size {
            return Err(LenslayerError::config(format!(
                "blit size {}x{} does not match surface {}x{}",
                size.width, size.height, self.size.width, self.size.height
            )));
        }
        if pixels.len() != size.pixel_bytes() {
            return Err(LenslayerError::config(
                "blit pixel buffer length does not match its size",
            ));
        }
        for (dst, src) in self.data.chunks_exact_mut(4).zip(pixels.chunks_exact(4)) {
            let d = [dst[0], dst[1], dst[2], dst[3]];
            let s = [src[0], src[1], src[2], src[3]];
            dst.copy_from_slice(&over(d, s));
        }
        Ok(())
    }
}

/// Source-over for premultiplied RGBA8.
fn over(dst: [u8; 4], src: [u8; 4]) -> [u8; 4] {
    if src[3] == 0 {
        return dst;
    }
    if src[3] == 255 {
        return src;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = src[i].saturating_add(mul_div255(u16::from(dst[i]), inv));
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/surface/raster.rs"]
mod tests;
