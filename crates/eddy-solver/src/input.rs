//! Pointer input.
//!
//! Samples are in normalized `[0,1]²` grid coordinates with timestamps
//! in seconds. Velocity is the finite difference of two consecutive
//! samples.

use glam::Vec2;

/// One pointer position at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Vec2,
    pub time: f64,
}

impl PointerSample {
    pub fn new(x: f32, y: f32, time: f64) -> Self {
        Self {
            pos: Vec2::new(x, y),
            time,
        }
    }
}

/// Pointer state for one frame.
///
/// `prev` is absent on first touch, which implies no velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UserInput {
    pub prev: Option<PointerSample>,
    pub curr: PointerSample,
}

impl UserInput {
    /// A press without motion.
    pub fn touch(curr: PointerSample) -> Self {
        Self { prev: None, curr }
    }

    pub fn drag(prev: PointerSample, curr: PointerSample) -> Self {
        Self {
            prev: Some(prev),
            curr,
        }
    }

    /// `Δpos / Δt`, or `None` without a previous sample or a positive
    /// time step.
    pub fn velocity(&self) -> Option<Vec2> {
        let prev = self.prev?;
        let dt = self.curr.time - prev.time;
        if !(dt.is_finite() && dt > 0.0) {
            return None;
        }
        Some((self.curr.pos - prev.pos) / dt as f32)
    }
}

/// Turns press/move/release notifications into per-frame [`UserInput`].
#[derive(Debug, Default)]
pub struct DragTracker {
    last: Option<PointerSample>,
    pending: Option<UserInput>,
}

impl DragTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, sample: PointerSample) {
        self.last = Some(sample);
        self.pending = Some(UserInput::touch(sample));
    }

    /// Ignored unless the pointer is pressed.
    pub fn motion(&mut self, sample: PointerSample) {
        let Some(last) = self.last else {
            return;
        };
        let prev = self.pending.map_or(last, |p| p.prev.unwrap_or(p.curr));
        self.last = Some(sample);
        self.pending = Some(UserInput::drag(prev, sample));
    }

    pub fn release(&mut self) {
        self.last = None;
        self.pending = None;
    }

    pub fn is_pressed(&self) -> bool {
        self.last.is_some()
    }

    /// Input for the next step.
    ///
    /// Motion since the previous poll yields a drag spanning all of it;
    /// a held, motionless pointer yields a touch at its position.
    pub fn poll(&mut self) -> Option<UserInput> {
        match self.pending.take() {
            Some(input) => Some(input),
            None => self.last.map(UserInput::touch),
        }
    }
}
