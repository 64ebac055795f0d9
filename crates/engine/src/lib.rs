//! # Hostshell Engine
//!
//! The shell adapter between a plugin host and an interactive session.
//!
//! A [`ShellEngine`] holds the host's command table, the operator's
//! configuration and a [`hostshell_ui::DialogController`]. At the start of
//! every session it resolves the configured aliases into the names the
//! session exposes and hands them, together with the launch arguments, to an
//! [`InteractiveFrontend`] as one [`SessionNamespace`]. Dialog requests made
//! by command callbacks go through the engine's
//! [`hostshell_types::CommandHost`] implementation.
//!
//! ```rust
//! use hostshell_engine::{ShellEngine, StdioSink};
//! use hostshell_registry::{CommandEntry, CommandProperties, CommandRegistry, ShellConfig};
//! use hostshell_types::{CommandArgs, command_callback};
//! use hostshell_ui::DialogController;
//!
//! let mut registry = CommandRegistry::new();
//! registry.register(CommandEntry::new(
//!     "Katana 4.0.2",
//!     CommandProperties { short_name: "katana_4.0.2".into(), ..Default::default() },
//!     command_callback(|context| {
//!         context.host.sink().info("launching katana");
//!         Ok(())
//!     }),
//! ));
//! let mut config = ShellConfig::default();
//! config.command_aliases.insert("katana_4.0.2".into(), "katana".into());
//!
//! let engine = ShellEngine::new(registry, config, DialogController::headless(), Box::new(StdioSink::new(false)));
//! assert!(engine.run_command("katana", &CommandArgs::default()));
//! assert!(!engine.run_command("Katana 4.0.2", &CommandArgs::default()));
//! ```

pub mod session;
pub mod shell;
pub mod sink;

pub use session::{BANNER, InteractiveFrontend, SessionNamespace, SessionValue};
pub use shell::ShellEngine;
pub use sink::StdioSink;
