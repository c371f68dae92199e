//! Boundary conditions for the closed simulation box.

use serde::{Deserialize, Serialize};

/// How edge cells are derived from their interior neighbours.
///
/// Scalars mirror (zero gradient). A velocity component is negated on
/// the walls it points into, so no flow crosses them, and mirrored on
/// the walls it runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoundaryMode {
    /// Density, pressure, divergence.
    Scalar,
    /// `u`: negated on the left/right walls.
    HorizontalVelocity,
    /// `v`: negated on the top/bottom walls.
    VerticalVelocity,
}

impl BoundaryMode {
    /// Sign applied on the left/right walls (columns `0` and `width-1`).
    #[inline]
    pub fn side_wall_sign(self) -> f32 {
        match self {
            BoundaryMode::HorizontalVelocity => -1.0,
            _ => 1.0,
        }
    }

    /// Sign applied on the top/bottom walls (rows `0` and `height-1`).
    #[inline]
    pub fn cap_wall_sign(self) -> f32 {
        match self {
            BoundaryMode::VerticalVelocity => -1.0,
            _ => 1.0,
        }
    }
}
