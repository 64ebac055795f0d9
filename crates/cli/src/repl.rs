//! Line-oriented front-end for interactive sessions.
//!
//! Each line is split with the shell-like lexer. The first token names a
//! builtin, a launch keyword argument, or a command; remaining tokens are
//! the command's arguments (`key=value` tokens become keyword arguments).
//! Names containing spaces are quoted: `"Open Log Folder" shot=010`.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use hostshell_engine::{InteractiveFrontend, SessionNamespace, SessionValue, ShellEngine};
use hostshell_types::CommandArgs;
use hostshell_util::split_arguments;

const PROMPT: &str = "hostshell> ";

const HELP: &str = "\
Builtins:
  command_names    list the commands exposed in this session
  args             positional launch arguments
  kwargs           keyword launch arguments
  help             show this message
  exit, quit       leave the session
Anything else runs a command: NAME [ARG...] [KEY=VALUE...]";

pub struct LineRepl<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineRepl<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    fn into_output(self) -> W {
        self.output
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        write!(self.output, "{PROMPT}")?;
        self.output.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("failed to read from the terminal")?;
        Ok((read > 0).then_some(line))
    }

    fn print_value(&mut self, value: &SessionValue) -> Result<()> {
        match value {
            SessionValue::CommandNames(names) => {
                for name in names {
                    writeln!(self.output, "{name}")?;
                }
            }
            SessionValue::Args(args) => writeln!(self.output, "{args:?}")?,
            SessionValue::Kwargs(kwargs) => writeln!(self.output, "{kwargs:?}")?,
            SessionValue::Value(value) => writeln!(self.output, "{value}")?,
            SessionValue::Command(entry) => {
                let description = entry.properties.description.as_deref().unwrap_or("no description");
                writeln!(self.output, "{} ({}): {description}", entry.display_name, entry.short_name())?;
            }
        }
        Ok(())
    }
}

impl<R: BufRead, W: Write> InteractiveFrontend for LineRepl<R, W> {
    fn interact(&mut self, engine: &ShellEngine, namespace: &SessionNamespace, banner: &str) -> Result<()> {
        writeln!(self.output, "{banner}")?;

        while let Some(line) = self.read_line()? {
            let mut tokens = split_arguments(line.trim()).into_iter();
            let Some(name) = tokens.next() else {
                continue;
            };

            match name.as_str() {
                "exit" | "quit" => break,
                "help" => writeln!(self.output, "{HELP}")?,
                _ => match namespace.get(&name) {
                    Some(SessionValue::Command(_)) | None => {
                        self.output.flush()?;
                        engine.run_command(&name, &CommandArgs::from_tokens(tokens));
                    }
                    Some(value) if tokens.len() == 0 => self.print_value(value)?,
                    Some(_) => writeln!(self.output, "'{name}' is not a command")?,
                },
            }
        }

        writeln!(self.output)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, io::Cursor, rc::Rc};

    use hostshell_registry::{CommandEntry, CommandProperties, CommandRegistry, ShellConfig};
    use hostshell_types::{LogLevel, LogSink, command_callback};
    use hostshell_ui::DialogController;

    use super::*;

    type Shared<T> = Rc<RefCell<Vec<T>>>;

    struct SharedSink(Shared<(LogLevel, String)>);

    impl LogSink for SharedSink {
        fn write(&self, level: LogLevel, message: &str) {
            self.0.borrow_mut().push((level, message.to_string()));
        }
    }

    fn engine(calls: &Shared<String>, lines: &Shared<(LogLevel, String)>) -> ShellEngine {
        let recorded = Rc::clone(calls);
        let registry: CommandRegistry = [CommandEntry::new(
            "Katana 4.0.2",
            CommandProperties {
                short_name: "katana_4.0.2".to_string(),
                description: Some("Launch Katana".to_string()),
                app: None,
            },
            command_callback(move |context| {
                recorded
                    .borrow_mut()
                    .push(format!("{:?} {:?}", context.args.positional, context.args.keyword));
                Ok(())
            }),
        )]
        .into_iter()
        .collect();
        let mut config = ShellConfig::default();
        config
            .command_aliases
            .insert("katana_4.0.2".to_string(), "katana".to_string());
        ShellEngine::new(
            registry,
            config,
            DialogController::headless(),
            Box::new(SharedSink(Rc::clone(lines))),
        )
    }

    fn session(script: &str, launch: CommandArgs) -> (String, Vec<String>, Vec<(LogLevel, String)>) {
        let calls: Shared<String> = Rc::default();
        let lines: Shared<(LogLevel, String)> = Rc::default();
        let engine = engine(&calls, &lines);
        let mut repl = LineRepl::new(Cursor::new(script.to_string()), Vec::new());
        engine.interact(&mut repl, launch).expect("session");
        let output = String::from_utf8_lossy(&repl.into_output()).into_owned();
        let calls = calls.borrow().clone();
        let lines = lines.borrow().clone();
        (output, calls, lines)
    }

    #[test]
    fn commands_run_with_lexed_arguments() {
        let (_, calls, lines) = session("katana 'shot 010.katana' frame=101\n\nexit\nkatana\n", CommandArgs::default());
        assert_eq!(calls, vec![r#"["shot 010.katana"] {"frame": "101"}"#]);
        assert!(lines.is_empty());
    }

    #[test]
    fn builtins_print_the_namespace() {
        let launch = CommandArgs::from_tokens(["scene.katana", "shot=010"]);
        let (output, calls, _) = session("command_names\nargs\nshot\nkatana_4.0.2\n", launch);
        assert!(output.contains("> katana\n"));
        assert!(output.contains(r#"["scene.katana"]"#));
        assert!(output.contains("010\n"));
        assert!(calls.is_empty());
    }

    #[test]
    fn unknown_names_are_reported_by_the_engine() {
        let (_, calls, lines) = session("\"Katana 4.0.2\"\n", CommandArgs::default());
        assert!(calls.is_empty());
        assert_eq!(
            lines,
            vec![(
                LogLevel::Error,
                "A command named Katana 4.0.2 is not registered in this environment.".to_string()
            )]
        );
    }
}
