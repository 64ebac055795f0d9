//! GUI toolkit bootstrap and dialog lifecycle.
//!
//! Commands running in a terminal session occasionally want to show a
//! dialog. This crate finds a toolkit binding the first time that happens,
//! remembers the answer, and manages the one event loop the process may
//! own.

pub mod controller;
pub mod native;
pub mod probe;
pub mod toolkit;

pub use controller::{DialogController, LoopState, ProbeState};
pub use native::NativeCandidate;
pub use probe::{ProbeError, ToolkitCandidate, probe_candidates};
pub use toolkit::{BindingKind, EventLoop, ToolkitBinding, ToolkitCore, ToolkitGui};
