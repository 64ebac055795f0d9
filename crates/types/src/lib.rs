//! Shared type definitions for the hostshell crates.
//!
//! These contracts sit between the host's command table, the dialog
//! controller and the shell adapter so that none of those crates has to
//! depend on another just to talk about commands, log lines or dialogs.

pub mod command;
pub mod dialog;
pub mod logging;

pub use command::{CommandArgs, CommandCallback, CommandContext, CommandHost, command_callback};
pub use dialog::{DialogArgs, DialogCode, DialogError, DialogOwner, DialogRequest, Widget, WidgetClass, WidgetHandle};
pub use logging::{LogLevel, LogSink, TracingSink};
