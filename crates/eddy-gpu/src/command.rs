//! Recorded device work.
//!
//! A [`CommandList`] is built on the host and handed to a backend in one
//! submission. Commands execute strictly in recording order.

use eddy_types::BufferId;

use crate::kernels::Kernel;

/// One kernel evaluation over a whole output buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub kernel: Kernel,
    pub inputs: Vec<BufferId>,
    pub output: BufferId,
}

/// A single recorded operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Overwrite every cell with a constant.
    Fill { target: BufferId, value: f32 },
    /// Overwrite a buffer with row-major host data.
    Upload { target: BufferId, data: Vec<f32> },
    Dispatch(Dispatch),
}

impl Command {
    /// Every buffer the command touches, output last.
    pub fn buffers(&self) -> Vec<BufferId> {
        match self {
            Command::Fill { target, .. } | Command::Upload { target, .. } => vec![*target],
            Command::Dispatch(d) => {
                let mut ids = d.inputs.clone();
                ids.push(d.output);
                ids
            }
        }
    }
}

/// Ordered batch of commands submitted together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandList {
    label: String,
    commands: Vec<Command>,
}

impl CommandList {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            commands: Vec::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn fill(&mut self, target: BufferId, value: f32) {
        self.commands.push(Command::Fill { target, value });
    }

    pub fn upload(&mut self, target: BufferId, data: Vec<f32>) {
        self.commands.push(Command::Upload { target, data });
    }

    /// Records a kernel dispatch.
    ///
    /// # Panics
    /// If the input count does not match the kernel's arity, or the
    /// output is also one of the inputs.
    pub fn dispatch(&mut self, kernel: Kernel, inputs: &[BufferId], output: BufferId) {
        assert_eq!(
            inputs.len(),
            kernel.arity(),
            "{} takes {} inputs, got {}",
            kernel.name(),
            kernel.arity(),
            inputs.len()
        );
        assert!(
            !inputs.contains(&output),
            "{} reads and writes buffer {output}",
            kernel.name()
        );
        self.commands.push(Command::Dispatch(Dispatch {
            kernel,
            inputs: inputs.to_vec(),
            output,
        }));
    }

    /// Appends every command of `other`.
    pub fn extend(&mut self, other: CommandList) {
        self.commands.extend(other.commands);
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of kernel dispatches.
    pub fn dispatch_count(&self) -> usize {
        self.dispatches().count()
    }

    pub fn dispatches(&self) -> impl Iterator<Item = &Dispatch> {
        self.commands.iter().filter_map(|c| match c {
            Command::Dispatch(d) => Some(d),
            _ => None,
        })
    }

    /// Kernel names in dispatch order.
    pub fn kernel_names(&self) -> Vec<&'static str> {
        self.dispatches().map(|d| d.kernel.name()).collect()
    }
}
