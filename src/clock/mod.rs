//! Frame-cadence clock.

mod frame_clock;

pub use frame_clock::{ClockState, FrameClock, SkipReason, TickDecision};
