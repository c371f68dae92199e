//! Benchmark scenarios — grid, parameters and scripted input per case.
//!
//! 1. **Center impulse** — a held density source in the middle of the box
//! 2. **Drag stroke** — the pointer sweeps left to right, then lets go
//! 3. **Quiescent** — no forcing at all; measures the bare step cost

use glam::Vec2;
use serde::{Deserialize, Serialize};

use eddy_solver::{FluidConfig, FluidParams, PointerSample, Seed, SourceFade, UserInput};

/// Which benchmark scenario to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenarioKind {
    CenterImpulse,
    DragStroke,
    Quiescent,
}

impl ScenarioKind {
    /// Returns all scenario kinds.
    pub fn all() -> &'static [ScenarioKind] {
        &[
            ScenarioKind::CenterImpulse,
            ScenarioKind::DragStroke,
            ScenarioKind::Quiescent,
        ]
    }

    /// Returns a snake_case name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioKind::CenterImpulse => "center_impulse",
            ScenarioKind::DragStroke => "drag_stroke",
            ScenarioKind::Quiescent => "quiescent",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|k| k.name() == name)
    }
}

/// A straight pointer drag held over a range of frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub from: Vec2,
    pub to: Vec2,
    /// Frame the pointer goes down on.
    pub start_frame: u32,
    /// Frame the pointer is released on (exclusive).
    pub end_frame: u32,
}

impl Stroke {
    /// Pointer position at `frame`, if pressed.
    pub fn position(&self, frame: u32) -> Option<Vec2> {
        if !(self.start_frame..self.end_frame).contains(&frame) {
            return None;
        }
        let span = (self.end_frame - self.start_frame).saturating_sub(1).max(1);
        let t = (frame - self.start_frame) as f32 / span as f32;
        Some(self.from.lerp(self.to, t))
    }
}

/// A fully specified benchmark scenario.
#[derive(Debug, Clone)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub config: FluidConfig,
    /// Number of frames to drive.
    pub frames: u32,
    /// Host frame interval (seconds).
    pub frame_interval: f64,
    pub stroke: Option<Stroke>,
}

impl Scenario {
    /// A 64×64 box with a held central density source, 2 seconds at 60fps.
    pub fn center_impulse() -> Self {
        Self {
            kind: ScenarioKind::CenterImpulse,
            config: FluidConfig {
                width: 64,
                height: 64,
                params: FluidParams {
                    idle_sources: SourceFade::Hold,
                    ..Default::default()
                },
                seed: Some(Seed::central_source(10.0)),
            },
            frames: 120,
            frame_interval: 1.0 / 60.0,
            stroke: None,
        }
    }

    /// A 64×64 box swept left to right across its middle for one second.
    pub fn drag_stroke() -> Self {
        Self {
            kind: ScenarioKind::DragStroke,
            config: FluidConfig::preview(),
            frames: 120,
            frame_interval: 1.0 / 60.0,
            stroke: Some(Stroke {
                from: Vec2::new(0.2, 0.5),
                to: Vec2::new(0.8, 0.5),
                start_frame: 0,
                end_frame: 60,
            }),
        }
    }

    /// A 64×64 box with nothing in it.
    pub fn quiescent() -> Self {
        Self {
            kind: ScenarioKind::Quiescent,
            config: FluidConfig::preview(),
            frames: 60,
            frame_interval: 1.0 / 60.0,
            stroke: None,
        }
    }

    /// Create a scenario by kind.
    pub fn from_kind(kind: ScenarioKind) -> Self {
        match kind {
            ScenarioKind::CenterImpulse => Self::center_impulse(),
            ScenarioKind::DragStroke => Self::drag_stroke(),
            ScenarioKind::Quiescent => Self::quiescent(),
        }
    }

    /// Host time of `frame`.
    pub fn frame_time(&self, frame: u32) -> f64 {
        frame as f64 * self.frame_interval
    }

    /// Scripted pointer input for `frame`.
    pub fn input_at(&self, frame: u32) -> Option<UserInput> {
        let stroke = self.stroke.as_ref()?;
        let pos = stroke.position(frame)?;
        let curr = PointerSample {
            pos,
            time: self.frame_time(frame),
        };
        let prev = frame
            .checked_sub(1)
            .and_then(|f| stroke.position(f))
            .map(|pos| PointerSample {
                pos,
                time: self.frame_time(frame - 1),
            });
        Some(UserInput { prev, curr })
    }
}
