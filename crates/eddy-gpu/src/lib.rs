//! # eddy-gpu
//!
//! Compute abstraction layer for the Eddy fluid solver.
//!
//! Grid buffers live on a device and are addressed by [`BufferId`]
//! handles. Work is recorded into a [`CommandList`] of per-cell kernel
//! dispatches and submitted to a [`ComputeBackend`], which hands back
//! a [`Fence`] the host polls instead of blocking.
//!
//! Two backends ship:
//! - [`CpuFallback`] — executes on submit, reference for correctness
//! - [`ThreadedDevice`] — a worker thread owns the storage and runs
//!   submissions asynchronously, like a GPU queue
//!
//! [`BufferId`]: eddy_types::BufferId

pub mod arena;
pub mod backend;
pub mod buffers;
pub mod command;
pub mod fence;
pub mod kernels;
pub mod threaded;

pub use backend::{ComputeBackend, CpuFallback};
pub use buffers::GridBuffer;
pub use command::{Command, CommandList, Dispatch};
pub use fence::{Fence, FenceStatus};
pub use kernels::{Axis, Kernel};
pub use threaded::ThreadedDevice;
