use std::time::Duration;

use crate::foundation::error::{LenslayerError, LenslayerResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Monotonically increasing frame sequence number.
///
/// `FrameSeq(0)` is reserved for the pre-capture placeholder frame; the first
/// captured frame is `FrameSeq(1)`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameSeq(pub u64);

impl FrameSeq {
    /// The next sequence number.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Target tick rate as a rational number of ticks per second.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TickRate {
    /// Numerator (ticks).
    pub num: u32,
    /// Denominator (seconds); must be > 0.
    pub den: u32,
}

impl TickRate {
    /// Validated constructor; both terms must be > 0.
    pub fn new(num: u32, den: u32) -> LenslayerResult<Self> {
        if num == 0 {
            return Err(LenslayerError::config("TickRate num must be > 0"));
        }
        if den == 0 {
            return Err(LenslayerError::config("TickRate den must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole ticks per second, e.g. `TickRate::per_second(20)` for a 50ms interval.
    pub fn per_second(ticks: u32) -> LenslayerResult<Self> {
        Self::new(ticks, 1)
    }

    /// Rate as ticks per second.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one tick interval.
    pub fn interval(self) -> Duration {
        Duration::from_secs_f64(f64::from(self.den) / f64::from(self.num))
    }
}

/// Backing-buffer dimensions of the drawing surface, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl CanvasSize {
    /// Construct a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// True when either dimension is zero (source not ready yet).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Canvas bounds as a rectangle anchored at the origin.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width), f64::from(self.height))
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn pixel_bytes(self) -> usize {
        (self.width as usize) * (self.height as usize) * 4
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red, premultiplied.
    pub r: u8,
    /// Green, premultiplied.
    pub g: u8,
    /// Blue, premultiplied.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Premultiply a straight-alpha color.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Color as a `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
