//! Host manifests.
//!
//! A manifest is a YAML or JSON file declaring the commands a host
//! contributes. Each declared action is turned into a [`CommandCallback`]
//! so the shell adapter can treat manifest commands exactly like commands
//! registered programmatically.

use std::{
    fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, bail};
use hostshell_types::{
    CommandCallback, CommandContext, DialogArgs, DialogOwner, DialogRequest, LogSink, WidgetClass, command_callback,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::is_json,
    models::{CommandEntry, CommandProperties, CommandRegistry},
};

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// What running a manifest command does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CommandAction {
    /// Spawn a program and wait for it.
    Process {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    /// Put a dialog on screen through the dialog controller.
    Dialog {
        title: String,
        widget_class: String,
        #[serde(default)]
        ancestors: Vec<String>,
        #[serde(default)]
        modal: bool,
        #[serde(default)]
        args: DialogArgs,
    },
    /// Write a line to the operator sink.
    Echo { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestCommand {
    pub display_name: String,
    pub short_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub app: Option<String>,
    pub action: CommandAction,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostManifest {
    #[serde(default)]
    pub commands: Vec<ManifestCommand>,
}

impl HostManifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parsed = if is_json(path) {
            serde_json::from_str(&content).map_err(|error| error.to_string())
        } else {
            serde_yaml::from_str(&content).map_err(|error| error.to_string())
        };
        parsed.map_err(|message| ManifestError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Registers every command of the manifest, skipping display names that
    /// are already taken. Returns how many commands were added.
    pub fn register_into(self, registry: &mut CommandRegistry, sink: &dyn LogSink) -> usize {
        let mut added = 0;
        for command in self.commands {
            let display_name = command.display_name.clone();
            if registry.register(command.into_entry()) {
                added += 1;
            } else {
                sink.warning(&format!("Command '{display_name}' is already registered; skipping duplicate."));
            }
        }
        added
    }
}

impl ManifestCommand {
    pub fn into_entry(self) -> CommandEntry {
        let owner = DialogOwner::new(self.app.clone().unwrap_or_else(|| self.display_name.clone()));
        let callback = action_callback(self.action, owner);
        CommandEntry::new(
            self.display_name,
            CommandProperties {
                short_name: self.short_name,
                description: self.description,
                app: self.app,
            },
            callback,
        )
    }
}

fn action_callback(action: CommandAction, owner: DialogOwner) -> CommandCallback {
    match action {
        CommandAction::Echo { message } => command_callback(move |ctx| {
            ctx.host.sink().info(&message);
            Ok(())
        }),
        CommandAction::Process { program, args } => command_callback(move |ctx| run_process(ctx, &program, &args)),
        CommandAction::Dialog {
            title,
            widget_class,
            ancestors,
            modal,
            args,
        } => {
            let request = DialogRequest::new(
                title,
                owner,
                WidgetClass {
                    name: widget_class,
                    ancestors,
                },
            )
            .with_args(args);
            command_callback(move |ctx| show_request(ctx, &request, modal))
        }
    }
}

fn run_process(ctx: &CommandContext<'_>, program: &str, base_args: &[String]) -> anyhow::Result<()> {
    let mut command = Command::new(program);
    command.args(base_args).args(&ctx.args.positional);
    for (key, value) in &ctx.args.keyword {
        command.arg(format!("--{key}={value}"));
    }
    ctx.host.sink().debug(&format!("Launching {program}"));
    let status = command.status().with_context(|| format!("failed to launch {program}"))?;
    if !status.success() {
        bail!("{program} exited with {status}");
    }
    Ok(())
}

// Dialog failures are reported by the host; the action itself still succeeds.
fn show_request(ctx: &CommandContext<'_>, request: &DialogRequest, modal: bool) -> anyhow::Result<()> {
    if !modal {
        let _ = ctx.host.show_dialog(request);
        return Ok(());
    }
    if let Ok(Some((code, widget))) = ctx.host.show_modal(request) {
        ctx.host
            .sink()
            .debug(&format!("{} closed with status {}", widget.class_name(), i32::from(code)));
    }
    Ok(())
}

impl CommandRegistry {
    /// Builds a registry from manifest files. Unreadable or malformed
    /// manifests are reported on `sink` and skipped.
    pub fn from_catalogs<P: AsRef<Path>>(paths: &[P], sink: &dyn LogSink) -> Self {
        let mut registry = CommandRegistry::new();
        for path in paths {
            match HostManifest::load(path.as_ref()) {
                Ok(manifest) => {
                    let added = manifest.register_into(&mut registry, sink);
                    tracing::debug!(path = %path.as_ref().display(), added, "catalog loaded");
                }
                Err(error) => sink.warning(&error.to_string()),
            }
        }
        registry
    }
}
