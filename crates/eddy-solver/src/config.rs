//! Simulation configuration.
//!
//! Grid extent, starting parameters and an optional seeded impulse.
//! Loaded from TOML by the CLI; the solver itself never reads files.

use serde::{Deserialize, Serialize};

use eddy_types::{EddyError, EddyResult, Field, Grid};

use crate::params::FluidParams;

/// A soft-circle impulse written into one field at creation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seed {
    pub field: Field,
    /// Center in normalized `[0,1]²` coordinates.
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub magnitude: f32,
}

impl Seed {
    /// A density source at the center of the box.
    pub fn central_source(magnitude: f32) -> Self {
        Self {
            field: Field::DensitySource,
            x: 0.5,
            y: 0.5,
            radius: 0.1,
            magnitude,
        }
    }

    pub fn validate(&self) -> EddyResult<()> {
        let inside = |c: f32| (0.0..=1.0).contains(&c);
        if !(inside(self.x) && inside(self.y)) {
            return Err(EddyError::InvalidConfig(format!(
                "seed center ({}, {}) lies outside the unit square",
                self.x, self.y
            )));
        }
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(EddyError::InvalidConfig(format!(
                "seed radius must be positive, got {}",
                self.radius
            )));
        }
        if !self.magnitude.is_finite() {
            return Err(EddyError::InvalidConfig("seed magnitude must be finite".into()));
        }
        Ok(())
    }
}

/// Configuration for one simulation instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidConfig {
    /// Grid width in cells, boundary included.
    pub width: u32,
    /// Grid height in cells, boundary included.
    pub height: u32,
    #[serde(default)]
    pub params: FluidParams,
    #[serde(default)]
    pub seed: Option<Seed>,
}

impl Default for FluidConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            params: FluidParams::default(),
            seed: None,
        }
    }
}

impl FluidConfig {
    /// Small grid for interactive previews and tests.
    pub fn preview() -> Self {
        Self {
            width: 64,
            height: 64,
            ..Default::default()
        }
    }

    /// Large grid with thinner smoke.
    pub fn high_resolution() -> Self {
        Self {
            width: 512,
            height: 512,
            params: FluidParams::smoke(),
            ..Default::default()
        }
    }

    pub fn grid(&self) -> EddyResult<Grid> {
        Grid::new(self.width, self.height)
    }

    pub fn validate(&self) -> EddyResult<()> {
        self.grid()?;
        self.params.validate()?;
        if let Some(seed) = &self.seed {
            seed.validate()?;
        }
        Ok(())
    }
}
