//! Buffer bookkeeping shared by the backends.
//!
//! [`BufferRegistry`] is the host-side view: which handles are live and
//! their grids. [`BufferArena`] holds the storage and executes command
//! lists. The CPU fallback owns both; the threaded device keeps the
//! registry on the host and moves the arena onto its worker.

use eddy_types::{BufferId, EddyError, EddyResult, Grid};

use crate::buffers::{check_len, GridBuffer};
use crate::command::{Command, CommandList, Dispatch};

/// Handle allocation and validation.
///
/// Handles are never reused, so a stale handle fails with
/// [`EddyError::UnknownBuffer`] instead of naming a newer buffer.
#[derive(Debug, Default)]
pub struct BufferRegistry {
    grids: Vec<Option<Grid>>,
}

impl BufferRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, grid: Grid) -> EddyResult<BufferId> {
        let raw = u32::try_from(self.grids.len())
            .map_err(|_| EddyError::Device("buffer handles exhausted".into()))?;
        self.grids.push(Some(grid));
        Ok(BufferId(raw))
    }

    pub fn release(&mut self, id: BufferId) -> EddyResult<Grid> {
        self.grids
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(EddyError::UnknownBuffer(id))
    }

    pub fn grid_of(&self, id: BufferId) -> EddyResult<Grid> {
        self.grids
            .get(id.index())
            .copied()
            .flatten()
            .ok_or(EddyError::UnknownBuffer(id))
    }

    /// Number of live buffers.
    pub fn live_count(&self) -> usize {
        self.grids.iter().filter(|g| g.is_some()).count()
    }

    /// Checks a command list before it reaches the device.
    ///
    /// # Panics
    /// If a dispatch mixes buffers of different grids.
    pub fn validate(&self, commands: &CommandList) -> EddyResult<()> {
        for command in commands.commands() {
            match command {
                Command::Fill { target, .. } => {
                    self.grid_of(*target)?;
                }
                Command::Upload { target, data } => {
                    check_len(self.grid_of(*target)?, data.len())?;
                }
                Command::Dispatch(d) => {
                    let grid = self.grid_of(d.output)?;
                    for &input in &d.inputs {
                        let other = self.grid_of(input)?;
                        assert_eq!(
                            other,
                            grid,
                            "{} in '{}': input {input} is {}x{}, output {} is {}x{}",
                            d.kernel.name(),
                            commands.label(),
                            other.width(),
                            other.height(),
                            d.output,
                            grid.width(),
                            grid.height()
                        );
                    }
                }
            }
        }
        Ok(())
    }
}

/// Storage for live buffers, indexed by handle.
#[derive(Debug, Default)]
pub struct BufferArena {
    slots: Vec<Option<GridBuffer>>,
}

impl BufferArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: BufferId, buffer: GridBuffer) {
        if self.slots.len() <= id.index() {
            self.slots.resize_with(id.index() + 1, || None);
        }
        self.slots[id.index()] = Some(buffer);
    }

    pub fn remove(&mut self, id: BufferId) -> EddyResult<GridBuffer> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(EddyError::UnknownBuffer(id))
    }

    pub fn get(&self, id: BufferId) -> EddyResult<&GridBuffer> {
        self.slots
            .get(id.index())
            .and_then(Option::as_ref)
            .ok_or(EddyError::UnknownBuffer(id))
    }

    pub fn get_mut(&mut self, id: BufferId) -> EddyResult<&mut GridBuffer> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(EddyError::UnknownBuffer(id))
    }

    /// Runs every command in order, stopping at the first error.
    pub fn execute(&mut self, commands: &CommandList) -> EddyResult<()> {
        for command in commands.commands() {
            match command {
                Command::Fill { target, value } => self.get_mut(*target)?.fill(*value),
                Command::Upload { target, data } => self.get_mut(*target)?.set_values(data)?,
                Command::Dispatch(d) => self.dispatch(d)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, d: &Dispatch) -> EddyResult<()> {
        for &input in &d.inputs {
            self.get(input)?;
        }
        let output = self.get_mut(d.output)?;
        let grid = output.grid();
        let mut data = output.take_data();

        let inputs: Vec<&[f32]> = d
            .inputs
            .iter()
            .filter_map(|&id| self.get(id).ok())
            .map(GridBuffer::as_slice)
            .collect();
        d.kernel.run(grid, &inputs, &mut data);

        self.get_mut(d.output)?.restore_data(data);
        Ok(())
    }
}
