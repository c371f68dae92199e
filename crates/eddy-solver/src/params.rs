//! Live simulation parameters.
//!
//! A [`FluidParams`] value is passed into every step, so UI controls can
//! change rates or the presented field between frames.

use serde::{Deserialize, Serialize};

use eddy_types::constants::{
    DEFAULT_DIFFUSION_RATE, DEFAULT_INJECTED_DENSITY, DEFAULT_INJECTION_RADIUS, DEFAULT_VISCOSITY,
};
use eddy_types::{EddyError, EddyResult, OutputSelector};

/// What happens to the source fields on frames without pointer input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SourceFade {
    /// Sources keep their last values and keep forcing the flow.
    Hold,
    /// Sources are zeroed.
    #[default]
    Clear,
    /// Sources are multiplied by `factor` each step.
    Decay { factor: f32 },
}

/// How pointer input is turned into forcing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectionParams {
    /// Splat radius in normalized grid units.
    pub radius: f32,
    /// Density written at the pointer.
    pub density: f32,
    /// Multiplier on the drag velocity (normalized units per second).
    pub velocity_scale: f32,
}

impl Default for InjectionParams {
    fn default() -> Self {
        Self {
            radius: DEFAULT_INJECTION_RADIUS,
            density: DEFAULT_INJECTED_DENSITY,
            velocity_scale: 1.0,
        }
    }
}

/// Per-step simulation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FluidParams {
    /// Density diffusion coefficient.
    pub diffusion_rate: f32,
    /// Velocity diffusion coefficient.
    pub viscosity: f32,
    /// Field handed to the presenter.
    pub output: OutputSelector,
    pub injection: InjectionParams,
    pub idle_sources: SourceFade,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            diffusion_rate: DEFAULT_DIFFUSION_RATE,
            viscosity: DEFAULT_VISCOSITY,
            output: OutputSelector::Density,
            injection: InjectionParams::default(),
            idle_sources: SourceFade::default(),
        }
    }
}

impl FluidParams {
    /// Thin, fast-mixing smoke.
    pub fn smoke() -> Self {
        Self {
            diffusion_rate: 0.00005,
            viscosity: 0.00001,
            ..Default::default()
        }
    }

    /// Heavily damped flow.
    pub fn syrup() -> Self {
        Self {
            diffusion_rate: 0.001,
            viscosity: 0.01,
            idle_sources: SourceFade::Decay { factor: 0.9 },
            ..Default::default()
        }
    }

    pub fn validate(&self) -> EddyResult<()> {
        non_negative("diffusion_rate", self.diffusion_rate)?;
        non_negative("viscosity", self.viscosity)?;
        let injection = &self.injection;
        if !(injection.radius.is_finite() && injection.radius > 0.0) {
            return Err(EddyError::InvalidConfig(format!(
                "injection.radius must be positive, got {}",
                injection.radius
            )));
        }
        finite("injection.density", injection.density)?;
        finite("injection.velocity_scale", injection.velocity_scale)?;
        if let SourceFade::Decay { factor } = self.idle_sources {
            if !(0.0..=1.0).contains(&factor) {
                return Err(EddyError::InvalidConfig(format!(
                    "idle_sources decay factor must lie in [0, 1], got {factor}"
                )));
            }
        }
        Ok(())
    }
}

fn finite(name: &str, value: f32) -> EddyResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(EddyError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> EddyResult<()> {
    finite(name, value)?;
    if value < 0.0 {
        return Err(EddyError::InvalidConfig(format!(
            "{name} must be non-negative, got {value}"
        )));
    }
    Ok(())
}
