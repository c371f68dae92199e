//! # eddy-types
//!
//! Shared types, identifiers, error types, and numerical constants
//! for the Eddy stable-fluids solver.
//!
//! This crate has zero domain logic — it defines the vocabulary
//! that all other Eddy crates share.

pub mod boundary;
pub mod constants;
pub mod error;
pub mod field;
pub mod grid;
pub mod ids;

pub use boundary::BoundaryMode;
pub use error::{EddyError, EddyResult};
pub use field::{Field, OutputSelector};
pub use grid::Grid;
pub use ids::BufferId;
