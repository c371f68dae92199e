//! Strongly-typed buffer handles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a device-resident grid buffer.
///
/// Handles are issued by a compute backend and stay valid until the
/// buffer is released. They carry no data themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BufferId(pub u32);

impl BufferId {
    /// Returns the raw slot as `usize` for arena indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for BufferId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
