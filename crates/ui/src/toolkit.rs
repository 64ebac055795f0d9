//! Canonical toolkit interface.
//!
//! Every supported binding is translated onto these traits. The controller
//! never sees binding-specific names.

use std::{fmt, rc::Rc};

use hostshell_types::{DialogError, DialogRequest, WidgetHandle};

/// The supported bindings, in probe preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BindingKind {
    Primary,
    Compat,
}

impl fmt::Display for BindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKind::Primary => f.write_str("primary"),
            BindingKind::Compat => f.write_str("compat"),
        }
    }
}

/// The toolkit's core namespace: owns application and event-loop creation.
pub trait ToolkitCore {
    /// Creates the application object driving the event loop. A toolkit
    /// supports one per process; the controller calls this at most once.
    fn create_event_loop(&self) -> Result<Rc<dyn EventLoop>, DialogError>;
}

/// The toolkit's widget namespace.
pub trait ToolkitGui {
    /// Constructs (but does not show) the widget described by `request`.
    fn construct(&self, request: &DialogRequest) -> Result<WidgetHandle, DialogError>;
}

/// A toolkit event loop.
pub trait EventLoop {
    /// Runs the loop until the toolkit decides to quit. Returns the exit code.
    fn exec(&self) -> i32;
}

/// A discovered toolkit binding.
#[derive(Clone)]
pub struct ToolkitBinding {
    pub kind: BindingKind,
    pub core: Rc<dyn ToolkitCore>,
    pub gui: Rc<dyn ToolkitGui>,
    /// Type every dialog widget must derive from.
    pub dialog_base_type: String,
}

impl fmt::Debug for ToolkitBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolkitBinding")
            .field("kind", &self.kind)
            .field("dialog_base_type", &self.dialog_base_type)
            .finish_non_exhaustive()
    }
}
