//! Explicit double buffering.

use eddy_types::BufferId;

/// Two same-sized buffers alternating between read and write roles.
///
/// A pass reads [`input`](PingPong::input), writes
/// [`output`](PingPong::output), then calls [`swap`](PingPong::swap) so
/// the result becomes the next input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PingPong {
    slots: [BufferId; 2],
}

impl PingPong {
    /// # Panics
    /// If both slots name the same buffer.
    pub fn new(input: BufferId, output: BufferId) -> Self {
        assert_ne!(input, output, "ping-pong slots must be distinct buffers");
        Self {
            slots: [input, output],
        }
    }

    #[inline]
    pub fn input(&self) -> BufferId {
        self.slots[0]
    }

    #[inline]
    pub fn output(&self) -> BufferId {
        self.slots[1]
    }

    #[inline]
    pub fn swap(&mut self) {
        self.slots.swap(0, 1);
    }

    pub fn slots(&self) -> [BufferId; 2] {
        self.slots
    }

    pub fn contains(&self, id: BufferId) -> bool {
        self.slots.contains(&id)
    }
}
