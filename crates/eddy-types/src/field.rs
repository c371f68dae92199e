//! Named simulation fields and the presentable subset.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::BoundaryMode;

/// A logical quantity stored in one grid buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Field {
    Density,
    HorizontalVelocity,
    VerticalVelocity,
    DensitySource,
    HorizontalVelocitySource,
    VerticalVelocitySource,
}

impl Field {
    /// All fields, evolving ones first.
    pub const ALL: [Field; 6] = [
        Field::Density,
        Field::HorizontalVelocity,
        Field::VerticalVelocity,
        Field::DensitySource,
        Field::HorizontalVelocitySource,
        Field::VerticalVelocitySource,
    ];

    /// True for fields the solver evolves across steps.
    pub fn is_persistent(self) -> bool {
        matches!(
            self,
            Field::Density | Field::HorizontalVelocity | Field::VerticalVelocity
        )
    }

    /// True for the externally written forcing fields.
    pub fn is_source(self) -> bool {
        !self.is_persistent()
    }

    /// The forcing field feeding a persistent field.
    pub fn source(self) -> Option<Field> {
        match self {
            Field::Density => Some(Field::DensitySource),
            Field::HorizontalVelocity => Some(Field::HorizontalVelocitySource),
            Field::VerticalVelocity => Some(Field::VerticalVelocitySource),
            _ => None,
        }
    }

    /// Boundary condition matching the field's physical meaning.
    pub fn boundary_mode(self) -> BoundaryMode {
        match self {
            Field::HorizontalVelocity | Field::HorizontalVelocitySource => {
                BoundaryMode::HorizontalVelocity
            }
            Field::VerticalVelocity | Field::VerticalVelocitySource => {
                BoundaryMode::VerticalVelocity
            }
            _ => BoundaryMode::Scalar,
        }
    }

    /// Returns a snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Density => "density",
            Field::HorizontalVelocity => "horizontal_velocity",
            Field::VerticalVelocity => "vertical_velocity",
            Field::DensitySource => "density_source",
            Field::HorizontalVelocitySource => "horizontal_velocity_source",
            Field::VerticalVelocitySource => "vertical_velocity_source",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which field the presenter draws after a step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutputSelector {
    #[default]
    Density,
    DensitySource,
    HorizontalVelocity,
    VerticalVelocity,
}

impl OutputSelector {
    /// All selectable outputs.
    pub const ALL: [OutputSelector; 4] = [
        OutputSelector::Density,
        OutputSelector::DensitySource,
        OutputSelector::HorizontalVelocity,
        OutputSelector::VerticalVelocity,
    ];

    /// The field this selector names.
    pub fn field(self) -> Field {
        match self {
            OutputSelector::Density => Field::Density,
            OutputSelector::DensitySource => Field::DensitySource,
            OutputSelector::HorizontalVelocity => Field::HorizontalVelocity,
            OutputSelector::VerticalVelocity => Field::VerticalVelocity,
        }
    }

    /// Parses a field name as accepted on the command line.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.field().name() == name)
    }
}
