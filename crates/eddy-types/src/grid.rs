//! Grid geometry shared by every buffer of one simulation.

use serde::{Deserialize, Serialize};

use crate::constants::MIN_GRID_EXTENT;
use crate::error::{EddyError, EddyResult};

/// Dimensions of a 2-D cell grid.
///
/// Cells are stored row-major: cell `(i, j)` lives at `j * width + i`,
/// with `i` the column (x) and `j` the row (y). The outer ring of cells
/// is the boundary; everything else is interior.
///
/// The interior spans one unit on each axis: `Nx = width - 2`
/// cells across and `Ny = height - 2` cells down, so the spacing is
/// `hx = 1/Nx` horizontally and `hy = 1/Ny` vertically. On a square grid
/// both reduce to the same `N` and `h`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawGrid {
    width: u32,
    height: u32,
}

impl TryFrom<RawGrid> for Grid {
    type Error = EddyError;

    fn try_from(raw: RawGrid) -> EddyResult<Self> {
        Grid::new(raw.width, raw.height)
    }
}

impl Grid {
    /// Creates a grid, rejecting extents without an interior cell.
    pub fn new(width: u32, height: u32) -> EddyResult<Self> {
        if width < MIN_GRID_EXTENT || height < MIN_GRID_EXTENT {
            return Err(EddyError::InvalidGrid(format!(
                "{width}x{height} is smaller than {MIN_GRID_EXTENT}x{MIN_GRID_EXTENT}"
            )));
        }
        width
            .checked_mul(height)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| EddyError::InvalidGrid(format!("{width}x{height} overflows")))?;
        Ok(Self { width, height })
    }

    /// Creates an `n x n` grid.
    pub fn square(n: u32) -> EddyResult<Self> {
        Self::new(n, n)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width as usize
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height as usize
    }

    /// Total number of cells, boundary included.
    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width() * self.height()
    }

    /// Row-major index of cell `(i, j)`.
    #[inline]
    pub fn index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < self.width() && j < self.height());
        j * self.width() + i
    }

    /// True unless `(i, j)` lies on the boundary ring.
    #[inline]
    pub fn is_interior(&self, i: usize, j: usize) -> bool {
        i > 0 && j > 0 && i + 1 < self.width() && j + 1 < self.height()
    }

    /// Interior cells per unit length, `[Nx, Ny]`.
    #[inline]
    pub fn interior_extents(&self) -> [f32; 2] {
        [(self.width - 2) as f32, (self.height - 2) as f32]
    }

    /// Cell spacing `[hx, hy] = [1/Nx, 1/Ny]`.
    #[inline]
    pub fn spacings(&self) -> [f32; 2] {
        let [nx, ny] = self.interior_extents();
        [1.0 / nx, 1.0 / ny]
    }

    /// Center of cell `(i, j)` in normalized `[0,1]²` coordinates.
    #[inline]
    pub fn cell_center(&self, i: usize, j: usize) -> [f32; 2] {
        [
            (i as f32 + 0.5) / self.width as f32,
            (j as f32 + 0.5) / self.height as f32,
        ]
    }

    /// Cell containing the normalized position, clamped onto the grid.
    pub fn cell_at(&self, x: f32, y: f32) -> (usize, usize) {
        let i = (x * self.width as f32).floor().clamp(0.0, (self.width - 1) as f32);
        let j = (y * self.height as f32).floor().clamp(0.0, (self.height - 1) as f32);
        (i as usize, j as usize)
    }
}
