use std::{cell::RefCell, fmt, rc::Rc};

use hostshell_registry::{CommandRegistry, ResolvedAliasMap, ShellConfig};
use hostshell_types::{
    CommandArgs, CommandContext, CommandHost, DialogCode, DialogError, DialogRequest, LogLevel, LogSink, WidgetHandle,
};
use hostshell_ui::DialogController;
use tracing::{debug, info};

use crate::session::{BANNER, InteractiveFrontend, SessionNamespace};

/// Exposes the host's commands to an interactive session and forwards
/// dialog requests from command callbacks to the [`DialogController`].
///
/// Callbacks never see the engine type directly; they receive it as the
/// [`CommandHost`] of their [`CommandContext`].
pub struct ShellEngine {
    registry: CommandRegistry,
    config: ShellConfig,
    dialogs: DialogController,
    sink: Box<dyn LogSink>,
    // Resolved names of the session in progress, if any.
    session: RefCell<Option<Rc<ResolvedAliasMap>>>,
}

impl ShellEngine {
    pub fn new(registry: CommandRegistry, config: ShellConfig, dialogs: DialogController, sink: Box<dyn LogSink>) -> Self {
        Self {
            registry,
            config,
            dialogs,
            sink,
            session: RefCell::new(None),
        }
    }

    pub fn dialogs(&self) -> &DialogController {
        &self.dialogs
    }

    /// Applies the configured aliases to the registered commands.
    ///
    /// Collisions are reported on the sink every time this runs.
    pub fn resolved_commands(&self) -> ResolvedAliasMap {
        ResolvedAliasMap::resolve(&self.registry, &self.config.command_aliases, self)
    }

    /// Runs the command exposed under `name`.
    ///
    /// Returns `false` only when no command is exposed under that name. A
    /// callback that fails is reported and still counts as run.
    pub fn run_command(&self, name: &str, args: &CommandArgs) -> bool {
        let commands = self.current_commands();
        let Some(entry) = commands.get(name) else {
            self.log_error(&format!("A command named {name} is not registered in this environment."));
            return false;
        };

        debug!(command = %name, short_name = %entry.short_name(), "running command");
        let context = CommandContext::new(args, self);
        if let Err(error) = (entry.callback)(&context) {
            self.log_error(&format!("Command {name} failed: {error:#}"));
        }
        true
    }

    /// Starts an interactive session on `frontend`.
    ///
    /// Aliases are resolved once for the session; [`Self::run_command`]
    /// uses the same names until the front-end returns.
    pub fn interact(&self, frontend: &mut dyn InteractiveFrontend, launch: CommandArgs) -> anyhow::Result<()> {
        let commands = Rc::new(self.resolved_commands());
        let namespace = SessionNamespace::new(commands, launch, self);
        info!(commands = namespace.command_names().count(), "starting interactive session");

        let _session = SessionGuard::enter(&self.session, namespace.resolved());
        frontend.interact(self, &namespace, BANNER)
    }

    /// Whether dialogs can be shown, probing for a toolkit if needed.
    pub fn has_ui(&self) -> bool {
        self.dialogs.has_ui()
    }

    pub fn log_debug(&self, message: &str) {
        self.write(LogLevel::Debug, message);
    }

    pub fn log_info(&self, message: &str) {
        self.write(LogLevel::Info, message);
    }

    pub fn log_warning(&self, message: &str) {
        self.write(LogLevel::Warning, message);
    }

    pub fn log_error(&self, message: &str) {
        self.write(LogLevel::Error, message);
    }

    fn current_commands(&self) -> Rc<ResolvedAliasMap> {
        if let Some(commands) = self.session.borrow().as_ref() {
            return Rc::clone(commands);
        }
        Rc::new(self.resolved_commands())
    }
}

impl LogSink for ShellEngine {
    fn write(&self, level: LogLevel, message: &str) {
        if level == LogLevel::Debug && !self.config.debug_logging {
            return;
        }
        self.sink.write(level, message);
    }
}

impl CommandHost for ShellEngine {
    fn sink(&self) -> &dyn LogSink {
        self
    }

    fn show_dialog(&self, request: &DialogRequest) -> Result<Option<WidgetHandle>, DialogError> {
        self.dialogs.show_non_blocking(request).inspect_err(|error| {
            self.log_error(&format!("Could not show dialog '{}': {error}", request.title));
        })
    }

    fn show_modal(&self, request: &DialogRequest) -> Result<Option<(DialogCode, WidgetHandle)>, DialogError> {
        self.dialogs.show_blocking(request).inspect_err(|error| {
            self.log_error(&format!("Could not show dialog '{}': {error}", request.title));
        })
    }
}

impl fmt::Debug for ShellEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellEngine")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .field("dialogs", &self.dialogs)
            .finish_non_exhaustive()
    }
}

// Drops the session's names when the front-end returns, even on error.
struct SessionGuard<'a>(&'a RefCell<Option<Rc<ResolvedAliasMap>>>);

impl<'a> SessionGuard<'a> {
    fn enter(slot: &'a RefCell<Option<Rc<ResolvedAliasMap>>>, commands: &Rc<ResolvedAliasMap>) -> Self {
        *slot.borrow_mut() = Some(Rc::clone(commands));
        Self(slot)
    }
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.0.borrow_mut().take();
    }
}
