//! Dialog lifecycle.
//!
//! A [`DialogController`] discovers a toolkit the first time a dialog is
//! requested and owns the single event loop of the process. The first
//! dialog shown while no loop is running takes ownership of the loop and
//! blocks until the loop exits; dialogs requested from inside the running
//! loop (typically from another dialog's callback) are shown directly.
//!
//! All state is written once and read afterwards from the thread driving
//! the interactive session, so cells are enough and no locking happens.

use std::{
    cell::{Cell, OnceCell, RefCell},
    fmt,
    rc::Rc,
};

use hostshell_types::{DialogCode, DialogError, DialogRequest, WidgetHandle};
use tracing::debug;

use crate::{
    probe::{ToolkitCandidate, probe_candidates},
    toolkit::{BindingKind, EventLoop, ToolkitBinding},
};

/// Outcome of toolkit discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeState {
    Unprobed,
    NoToolkit,
    ToolkitFound(BindingKind),
}

/// Event-loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No application object exists yet.
    NoLoop,
    /// The application exists but its loop has never been entered, because
    /// the first dialog failed to construct.
    Created,
    /// The application exists and its loop is currently executing.
    Running,
    /// The application exists but its loop has returned.
    Exited,
}

/// Finds a toolkit on first use and owns the process's single event loop.
///
/// Pass one controller explicitly to whatever needs dialogs; there is no
/// global instance.
pub struct DialogController {
    candidates: RefCell<Vec<Box<dyn ToolkitCandidate>>>,
    toolkit: OnceCell<Option<ToolkitBinding>>,
    event_loop: OnceCell<Rc<dyn EventLoop>>,
    loop_running: Cell<bool>,
    loop_entered: Cell<bool>,
    // Non-blocking widgets shown inside the running loop, kept alive until
    // the loop exits even if the caller drops its handle.
    shown: RefCell<Vec<WidgetHandle>>,
}

impl DialogController {
    /// Creates a controller that will probe `candidates` on first use.
    ///
    /// Candidates are tried in binding preference order regardless of the
    /// order they are passed in.
    pub fn new(mut candidates: Vec<Box<dyn ToolkitCandidate>>) -> Self {
        candidates.sort_by_key(|candidate| candidate.kind());
        Self {
            candidates: RefCell::new(candidates),
            toolkit: OnceCell::new(),
            event_loop: OnceCell::new(),
            loop_running: Cell::new(false),
            loop_entered: Cell::new(false),
            shown: RefCell::new(Vec::new()),
        }
    }

    /// A controller that never finds a toolkit.
    pub fn headless() -> Self {
        Self::new(Vec::new())
    }

    /// Runs discovery once and returns the memoized binding.
    pub fn probe(&self) -> Option<&ToolkitBinding> {
        self.toolkit
            .get_or_init(|| {
                let candidates = std::mem::take(&mut *self.candidates.borrow_mut());
                probe_candidates(candidates)
            })
            .as_ref()
    }

    pub fn probe_state(&self) -> ProbeState {
        match self.toolkit.get() {
            None => ProbeState::Unprobed,
            Some(None) => ProbeState::NoToolkit,
            Some(Some(binding)) => ProbeState::ToolkitFound(binding.kind),
        }
    }

    pub fn loop_state(&self) -> LoopState {
        match (self.event_loop.get(), self.loop_running.get(), self.loop_entered.get()) {
            (None, _, _) => LoopState::NoLoop,
            (Some(_), true, _) => LoopState::Running,
            (Some(_), false, false) => LoopState::Created,
            (Some(_), false, true) => LoopState::Exited,
        }
    }

    /// Whether a toolkit is available, probing if needed.
    pub fn has_ui(&self) -> bool {
        self.probe().is_some()
    }

    /// Shows a non-blocking dialog.
    ///
    /// Without a running loop this creates the application on first use,
    /// shows the widget and runs the loop until it exits; the widget is gone
    /// by then, so `Ok(None)` is returned. A loop that already exited is
    /// re-entered rather than replaced. Inside a running loop the widget is
    /// shown and its handle returned immediately.
    pub fn show_non_blocking(&self, request: &DialogRequest) -> Result<Option<WidgetHandle>, DialogError> {
        let binding = self.require_toolkit(request)?;

        if self.loop_running.get() {
            let widget = binding.gui.construct(request)?;
            widget.show();
            self.shown.borrow_mut().push(Rc::clone(&widget));
            return Ok(Some(widget));
        }

        let event_loop = match self.event_loop.get() {
            Some(event_loop) => Rc::clone(event_loop),
            None => {
                let created = binding.core.create_event_loop()?;
                debug!(binding = %binding.kind, "event loop created");
                Rc::clone(self.event_loop.get_or_init(|| created))
            }
        };

        let widget = binding.gui.construct(request)?;
        widget.show();

        self.loop_entered.set(true);
        let exit_code = {
            let _running = RunningGuard::enter(&self.loop_running);
            event_loop.exec()
        };
        let released = std::mem::take(&mut *self.shown.borrow_mut());
        drop(released);
        debug!(exit_code, title = %request.title, "event loop exited");
        Ok(None)
    }

    /// Shows a modal dialog and blocks until the user closes it.
    ///
    /// Without a running loop a modal dialog has nothing to block against,
    /// so the request is handled exactly like [`Self::show_non_blocking`]
    /// and `Ok(None)` is returned.
    pub fn show_blocking(&self, request: &DialogRequest) -> Result<Option<(DialogCode, WidgetHandle)>, DialogError> {
        let binding = self.require_toolkit(request)?;

        if !self.loop_running.get() {
            return self.show_non_blocking(request).map(|_| None);
        }

        let widget = binding.gui.construct(request)?;
        let code = widget.exec();
        debug!(title = %request.title, code = i32::from(code), "modal dialog closed");
        Ok(Some((code, widget)))
    }

    // Probes if needed and refuses widget classes the toolkit cannot show
    // as dialogs, before anything is created.
    fn require_toolkit(&self, request: &DialogRequest) -> Result<&ToolkitBinding, DialogError> {
        let binding = self.probe().ok_or(DialogError::NoToolkit)?;
        if !request.widget_class.derives_from(&binding.dialog_base_type) {
            return Err(DialogError::NotADialog {
                class: request.widget_class.name.clone(),
                base: binding.dialog_base_type.clone(),
            });
        }
        Ok(binding)
    }
}

impl fmt::Debug for DialogController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialogController")
            .field("probe_state", &self.probe_state())
            .field("loop_state", &self.loop_state())
            .finish()
    }
}

// Clears the running flag even if the loop unwinds.
struct RunningGuard<'a>(&'a Cell<bool>);

impl<'a> RunningGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}
