//! Command invocation contracts.

use std::rc::Rc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    dialog::{DialogCode, DialogError, DialogRequest, WidgetHandle},
    logging::LogSink,
};

/// Positional and keyword arguments handed to a command callback.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandArgs {
    #[serde(default)]
    pub positional: Vec<String>,
    #[serde(default)]
    pub keyword: IndexMap<String, String>,
}

impl CommandArgs {
    /// Splits already-lexed tokens into positional and keyword arguments.
    ///
    /// A token of the form `key=value` (with `key` made of alphanumerics,
    /// `_` or `-`, and not starting with `-`) becomes a keyword argument;
    /// everything else is positional and keeps its order.
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = CommandArgs::default();
        for token in tokens {
            let token = token.into();
            match split_keyword(&token) {
                Some((key, value)) => {
                    args.keyword.insert(key.to_string(), value.to_string());
                }
                None => args.positional.push(token),
            }
        }
        args
    }
}

fn split_keyword(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once('=')?;
    let valid_key = !key.is_empty()
        && !key.starts_with('-')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    valid_key.then_some((key, value))
}

/// Services a command callback may use while it runs.
///
/// The shell adapter implements this; callbacks receive it through
/// [`CommandContext`] instead of reaching for process-wide state.
pub trait CommandHost {
    /// Sink for one-line diagnostics.
    fn sink(&self) -> &dyn LogSink;

    /// Show a non-blocking dialog. `Ok(None)` means the call owned the event
    /// loop and the widget is gone by the time it returned. Errors have
    /// already been written to [`Self::sink`] when they are returned.
    fn show_dialog(&self, request: &DialogRequest) -> Result<Option<WidgetHandle>, DialogError>;

    /// Show a modal dialog. `Ok(None)` means no loop was running and the
    /// request degraded to a loop-owning non-blocking dialog.
    fn show_modal(&self, request: &DialogRequest) -> Result<Option<(DialogCode, WidgetHandle)>, DialogError>;
}

/// What a callback sees when invoked.
pub struct CommandContext<'a> {
    pub args: &'a CommandArgs,
    pub host: &'a dyn CommandHost,
}

impl<'a> CommandContext<'a> {
    pub fn new(args: &'a CommandArgs, host: &'a dyn CommandHost) -> Self {
        Self { args, host }
    }
}

/// Invocable body of a host-registered command.
pub type CommandCallback = Rc<dyn Fn(&CommandContext<'_>) -> anyhow::Result<()>>;

/// Wraps a closure as a [`CommandCallback`].
pub fn command_callback<F>(callback: F) -> CommandCallback
where
    F: Fn(&CommandContext<'_>) -> anyhow::Result<()> + 'static,
{
    Rc::new(callback)
}
