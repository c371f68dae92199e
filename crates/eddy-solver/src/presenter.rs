//! Presentation seam.
//!
//! The solver hands a read-back field to a [`Presenter`]; how it is
//! drawn (canvas, terminal, image file) is up to the implementation.

use eddy_types::{EddyResult, Field, Grid};

/// One field's samples, row-major.
#[derive(Debug, Clone, Copy)]
pub struct FieldView<'a> {
    pub field: Field,
    pub grid: Grid,
    pub values: &'a [f32],
}

impl FieldView<'_> {
    /// Sample at cell `(i, j)`.
    pub fn at(&self, i: usize, j: usize) -> f32 {
        self.values[self.grid.index(i, j)]
    }

    /// `(min, max)` over all cells.
    pub fn range(&self) -> (f32, f32) {
        self.values
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
    }
}

/// Draws a field.
pub trait Presenter {
    fn present_field(&mut self, view: FieldView<'_>) -> EddyResult<()>;
}
