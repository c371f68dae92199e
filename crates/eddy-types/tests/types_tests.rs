//! Integration tests for eddy-types.

use eddy_types::{BoundaryMode, BufferId, EddyError, Field, Grid, OutputSelector};

// ─── Grid Tests ───────────────────────────────────────────────

#[test]
fn grid_rejects_missing_interior() {
    assert!(Grid::new(2, 8).is_err());
    assert!(Grid::new(8, 2).is_err());
    assert!(Grid::new(3, 3).is_ok());
}

#[test]
fn grid_indexing_is_row_major() {
    let grid = Grid::new(5, 4).unwrap();
    assert_eq!(grid.cell_count(), 20);
    assert_eq!(grid.index(0, 0), 0);
    assert_eq!(grid.index(4, 0), 4);
    assert_eq!(grid.index(0, 1), 5);
    assert_eq!(grid.index(3, 2), 13);
}

#[test]
fn grid_interior_excludes_ring() {
    let grid = Grid::square(4).unwrap();
    assert!(!grid.is_interior(0, 1));
    assert!(!grid.is_interior(3, 1));
    assert!(!grid.is_interior(1, 3));
    assert!(grid.is_interior(1, 1));
    assert!(grid.is_interior(2, 2));
}

#[test]
fn grid_spacing_uses_interior_extent() {
    let grid = Grid::square(10).unwrap();
    assert_eq!(grid.interior_extents(), [8.0, 8.0]);
    let [hx, hy] = grid.spacings();
    assert!((hx - 0.125).abs() < 1e-7);
    assert_eq!(hx, hy);
}

#[test]
fn grid_spacing_is_per_axis() {
    let grid = Grid::new(42, 12).unwrap();
    assert_eq!(grid.interior_extents(), [40.0, 10.0]);
    let [hx, hy] = grid.spacings();
    assert!((hx - 0.025).abs() < 1e-7);
    assert!((hy - 0.1).abs() < 1e-7);
}

#[test]
fn grid_cell_lookup_round_trips_centers() {
    let grid = Grid::new(20, 10).unwrap();
    let [x, y] = grid.cell_center(6, 3);
    assert_eq!(grid.cell_at(x, y), (6, 3));
    // Out-of-range positions clamp onto the grid
    assert_eq!(grid.cell_at(-1.0, 2.0), (0, 9));
}

#[test]
fn grid_deserialization_validates() {
    let ok: Grid = serde_json::from_str(r#"{"width":8,"height":6}"#).unwrap();
    assert_eq!((ok.width(), ok.height()), (8, 6));
    assert!(serde_json::from_str::<Grid>(r#"{"width":1,"height":6}"#).is_err());
}

// ─── Field Tests ──────────────────────────────────────────────

#[test]
fn field_sources_pair_up() {
    assert_eq!(Field::Density.source(), Some(Field::DensitySource));
    assert_eq!(
        Field::VerticalVelocity.source(),
        Some(Field::VerticalVelocitySource)
    );
    assert_eq!(Field::DensitySource.source(), None);
    assert_eq!(Field::ALL.iter().filter(|f| f.is_persistent()).count(), 3);
}

#[test]
fn field_boundary_modes() {
    assert_eq!(Field::Density.boundary_mode(), BoundaryMode::Scalar);
    assert_eq!(
        Field::HorizontalVelocity.boundary_mode(),
        BoundaryMode::HorizontalVelocity
    );
    assert_eq!(
        Field::VerticalVelocity.boundary_mode(),
        BoundaryMode::VerticalVelocity
    );
}

#[test]
fn boundary_signs() {
    assert_eq!(BoundaryMode::Scalar.side_wall_sign(), 1.0);
    assert_eq!(BoundaryMode::HorizontalVelocity.side_wall_sign(), -1.0);
    assert_eq!(BoundaryMode::HorizontalVelocity.cap_wall_sign(), 1.0);
    assert_eq!(BoundaryMode::VerticalVelocity.cap_wall_sign(), -1.0);
}

#[test]
fn output_selector_names() {
    assert_eq!(OutputSelector::default().field(), Field::Density);
    assert_eq!(
        OutputSelector::from_name("vertical_velocity"),
        Some(OutputSelector::VerticalVelocity)
    );
    assert_eq!(OutputSelector::from_name("pressure"), None);
}

// ─── Error Tests ──────────────────────────────────────────────

#[test]
fn error_display() {
    let err = EddyError::LengthMismatch {
        expected: 16,
        actual: 15,
    };
    let msg = err.to_string();
    assert!(msg.contains("16"));
    assert!(msg.contains("15"));
}

#[test]
fn unknown_buffer_display() {
    let err = EddyError::UnknownBuffer(BufferId(7));
    assert!(err.to_string().contains("#7"));
}
