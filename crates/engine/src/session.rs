//! What an interactive session gets to see.

use std::rc::Rc;

use hostshell_registry::{CommandEntry, ResolvedAliasMap};
use hostshell_types::{CommandArgs, LogSink};
use indexmap::IndexMap;

use crate::shell::ShellEngine;

pub const COMMAND_NAMES: &str = "command_names";
pub const ARGS: &str = "args";
pub const KWARGS: &str = "kwargs";

/// Printed when a session starts.
pub const BANNER: &str = "Welcome to the host shell.\n\
See `command_names` for the commands registered in this environment.\n\
Launch arguments are available as `args` and `kwargs`.";

/// A value bound to a name in the session namespace.
#[derive(Debug, Clone)]
pub enum SessionValue {
    Command(CommandEntry),
    CommandNames(Vec<String>),
    Args(Vec<String>),
    Kwargs(IndexMap<String, String>),
    /// A single launch keyword argument, bound under its own key.
    Value(String),
}

/// The top-level names of one interactive session.
///
/// Built fresh for every session from the resolved commands and the launch
/// arguments and handed to the front-end as one explicit mapping.
#[derive(Debug, Clone)]
pub struct SessionNamespace {
    commands: Rc<ResolvedAliasMap>,
    args: Vec<String>,
    kwargs: IndexMap<String, String>,
    bindings: IndexMap<String, SessionValue>,
}

impl SessionNamespace {
    /// Binds every exposed command, then `command_names`, `args` and
    /// `kwargs`, then each launch keyword argument under its own key.
    ///
    /// Exposed commands always keep their name. A builtin or keyword
    /// argument whose name is already bound stays reachable only through
    /// [`Self::command_names`], [`Self::args`] or [`Self::kwargs`]; every
    /// such collision is written to `sink`.
    pub fn new(commands: Rc<ResolvedAliasMap>, launch: CommandArgs, sink: &dyn LogSink) -> Self {
        let mut bindings: IndexMap<String, SessionValue> = commands
            .iter()
            .map(|(name, entry)| (name.to_string(), SessionValue::Command(entry.clone())))
            .collect();

        let builtins = [
            (COMMAND_NAMES, SessionValue::CommandNames(commands.names().map(str::to_string).collect())),
            (ARGS, SessionValue::Args(launch.positional.clone())),
            (KWARGS, SessionValue::Kwargs(launch.keyword.clone())),
        ];
        for (name, value) in builtins {
            if bindings.contains_key(name) {
                sink.warning(&format!("Command '{name}' hides the session builtin of the same name."));
                continue;
            }
            bindings.insert(name.to_string(), value);
        }

        for (key, value) in &launch.keyword {
            if bindings.contains_key(key) {
                sink.warning(&format!("Keyword argument '{key}' is hidden by an existing name; use kwargs['{key}']."));
                continue;
            }
            bindings.insert(key.clone(), SessionValue::Value(value.clone()));
        }

        Self {
            commands,
            args: launch.positional,
            kwargs: launch.keyword,
            bindings,
        }
    }

    pub fn get(&self, name: &str) -> Option<&SessionValue> {
        self.bindings.get(name)
    }

    /// The command exposed under `name`, if any.
    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn command_names(&self) -> impl Iterator<Item = &str> {
        self.commands.names()
    }

    /// Positional launch arguments, whether or not `args` is bound to them.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Keyword launch arguments, whether or not `kwargs` is bound to them.
    pub fn kwargs(&self) -> &IndexMap<String, String> {
        &self.kwargs
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    pub(crate) fn resolved(&self) -> &Rc<ResolvedAliasMap> {
        &self.commands
    }
}

/// Hands control to the operator.
///
/// The front-end decides how the namespace is surfaced; commands are run
/// through [`ShellEngine::run_command`] so unknown names and failing
/// callbacks are reported the same way everywhere.
pub trait InteractiveFrontend {
    fn interact(&mut self, engine: &ShellEngine, namespace: &SessionNamespace, banner: &str) -> anyhow::Result<()>;
}
