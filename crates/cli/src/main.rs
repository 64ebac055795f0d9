use std::{io, path::PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use hostshell_engine::{ShellEngine, StdioSink};
use hostshell_registry::{CommandRegistry, ShellConfig, default_config_path};
use hostshell_types::{CommandArgs, LogSink, TracingSink};
use hostshell_ui::{DialogController, NativeCandidate};
use hostshell_util::expand_tilde;
use tracing_subscriber::EnvFilter;

mod repl;

use repl::LineRepl;

#[derive(Debug, Parser)]
#[command(name = "hostshell", version, about = "Interactive shell for plugin host commands")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Configuration file (defaults to $HOSTSHELL_CONFIG_PATH or the user config directory).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit debug diagnostics.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    launch: LaunchArgs,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Start an interactive session (default).
    Interact(LaunchArgs),
    /// Run one command and exit.
    Run {
        /// Exposed command name.
        name: String,
        /// Positional and key=value arguments for the command.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// List the exposed command names.
    List,
}

#[derive(Debug, Default, Clone, Args)]
struct LaunchArgs {
    /// Positional arguments made available to the session as `args`.
    args: Vec<String>,

    /// Keyword argument made available to the session as `kwargs`.
    #[arg(long = "kw", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    kw: Vec<(String, String)>,
}

impl From<LaunchArgs> for CommandArgs {
    fn from(launch: LaunchArgs) -> Self {
        CommandArgs {
            positional: launch.args,
            keyword: launch.kw.into_iter().collect(),
        }
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;
    init_tracing(cli.debug || config.debug_logging);

    let engine = build_engine(config, cli.debug, matches!(cli.command, Some(Command::List)));
    match cli.command {
        Some(Command::Run { name, args }) => {
            if !engine.run_command(&name, &CommandArgs::from_tokens(args)) {
                std::process::exit(1);
            }
            Ok(())
        }
        Some(Command::List) => {
            list_commands(&engine);
            Ok(())
        }
        Some(Command::Interact(launch)) => interact(&engine, launch),
        None => interact(&engine, cli.launch),
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(path: Option<&PathBuf>) -> Result<ShellConfig> {
    match path {
        Some(path) => {
            let path = expand_tilde(&path.to_string_lossy());
            ShellConfig::load_from(&path).with_context(|| format!("failed to load configuration from {}", path.display()))
        }
        None => ShellConfig::load()
            .with_context(|| format!("failed to load configuration from {}", default_config_path().display())),
    }
}

// `list` sends diagnostics through tracing so stdout holds only the table.
fn build_engine(mut config: ShellConfig, debug: bool, listing: bool) -> ShellEngine {
    config.debug_logging |= debug;
    let sink: Box<dyn LogSink> = if listing {
        Box::new(TracingSink)
    } else {
        Box::new(StdioSink::new(config.debug_logging))
    };
    let registry = CommandRegistry::from_catalogs(&config.catalogs, sink.as_ref());
    if registry.is_empty() {
        sink.warning("No commands are registered; add catalogs to the configuration.");
    }

    let candidates = NativeCandidate::defaults(&config.toolkit.primary, &config.toolkit.compat);
    let dialogs = DialogController::new(candidates);
    ShellEngine::new(registry, config, dialogs, sink)
}

fn list_commands(engine: &ShellEngine) {
    for (name, entry) in engine.resolved_commands().iter() {
        let description = entry.properties.description.as_deref().unwrap_or("");
        println!("{name:<32} {:<24} {description}", entry.short_name());
    }
}

fn interact(engine: &ShellEngine, launch: LaunchArgs) -> Result<()> {
    let stdin = io::stdin();
    let mut frontend = LineRepl::new(stdin.lock(), io::stdout());
    engine.interact(&mut frontend, launch.into())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_arguments_start_a_session() {
        let cli = Cli::try_parse_from(["hostshell", "scene.katana", "--kw", "shot=010"]).expect("parse");
        assert!(cli.command.is_none());
        let launch = CommandArgs::from(cli.launch);
        assert_eq!(launch.positional, vec!["scene.katana"]);
        assert_eq!(launch.keyword.get("shot").map(String::as_str), Some("010"));
    }

    #[test]
    fn run_passes_trailing_tokens_through() {
        let cli = Cli::try_parse_from(["hostshell", "--debug", "run", "katana", "--batch", "frame=101"]).expect("parse");
        assert!(cli.debug);
        match cli.command {
            Some(Command::Run { name, args }) => {
                assert_eq!(name, "katana");
                assert_eq!(args, vec!["--batch", "frame=101"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn keyword_arguments_need_a_key() {
        assert!(parse_key_value("=value").is_err());
        assert_eq!(parse_key_value("a=b=c"), Ok(("a".to_string(), "b=c".to_string())));
    }
}
