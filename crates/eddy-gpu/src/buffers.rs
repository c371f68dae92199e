//! Grid buffer storage.
//!
//! A [`GridBuffer`] is the device-side backing of one scalar field:
//! a zero-initialized, row-major `f32` array sized to its grid.

use eddy_types::{EddyError, EddyResult, Grid};

/// Single-channel float storage for one grid.
///
/// Never resized; recreate to change dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct GridBuffer {
    grid: Grid,
    data: Vec<f32>,
}

impl GridBuffer {
    /// Creates a buffer filled with zeros.
    pub fn zeros(grid: Grid) -> Self {
        Self {
            grid,
            data: vec![0.0; grid.cell_count()],
        }
    }

    /// Creates a buffer from existing row-major data.
    pub fn from_data(grid: Grid, data: Vec<f32>) -> EddyResult<Self> {
        check_len(grid, data.len())?;
        Ok(Self { grid, data })
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the buffer holds no cells.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Sample at cell `(i, j)`.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.data[self.grid.index(i, j)]
    }

    /// Overwrites every cell with `value`.
    pub fn fill(&mut self, value: f32) {
        self.data.fill(value);
    }

    /// Overwrites the buffer with row-major `values`.
    pub fn set_values(&mut self, values: &[f32]) -> EddyResult<()> {
        check_len(self.grid, values.len())?;
        self.data.copy_from_slice(values);
        Ok(())
    }

    /// Moves the samples out, leaving the buffer empty until restored.
    pub(crate) fn take_data(&mut self) -> Vec<f32> {
        std::mem::take(&mut self.data)
    }

    pub(crate) fn restore_data(&mut self, data: Vec<f32>) {
        debug_assert_eq!(data.len(), self.grid.cell_count());
        self.data = data;
    }
}

/// Checks that `len` samples cover `grid` exactly.
pub fn check_len(grid: Grid, len: usize) -> EddyResult<()> {
    if len != grid.cell_count() {
        return Err(EddyError::LengthMismatch {
            expected: grid.cell_count(),
            actual: len,
        });
    }
    Ok(())
}
