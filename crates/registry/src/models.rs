use std::fmt;

use hostshell_types::CommandCallback;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Host metadata attached to a registered command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandProperties {
    /// Stable machine identifier assigned by the host, e.g. `katana_4.0.2`.
    pub short_name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Name of the app that contributed the command.
    #[serde(default)]
    pub app: Option<String>,
}

/// One host-registered command.
#[derive(Clone)]
pub struct CommandEntry {
    /// Operator-facing name, e.g. `Katana 4.0.2`.
    pub display_name: String,
    pub properties: CommandProperties,
    pub callback: CommandCallback,
}

impl CommandEntry {
    pub fn new(display_name: impl Into<String>, properties: CommandProperties, callback: CommandCallback) -> Self {
        Self {
            display_name: display_name.into(),
            properties,
            callback,
        }
    }

    pub fn short_name(&self) -> &str {
        &self.properties.short_name
    }
}

impl fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandEntry")
            .field("display_name", &self.display_name)
            .field("properties", &self.properties)
            .finish_non_exhaustive()
    }
}

/// The host's command table keyed by display name, in registration order.
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, CommandEntry>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command. Returns `false` and keeps the existing entry when
    /// the display name is already taken.
    pub fn register(&mut self, entry: CommandEntry) -> bool {
        if self.commands.contains_key(&entry.display_name) {
            return false;
        }
        self.commands.insert(entry.display_name.clone(), entry);
        true
    }

    pub fn get(&self, display_name: &str) -> Option<&CommandEntry> {
        self.commands.get(display_name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandEntry> {
        self.commands.values()
    }

    pub fn display_names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl FromIterator<CommandEntry> for CommandRegistry {
    fn from_iter<T: IntoIterator<Item = CommandEntry>>(iter: T) -> Self {
        let mut registry = CommandRegistry::new();
        for entry in iter {
            registry.register(entry);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use hostshell_types::command_callback;

    use super::*;

    fn entry(display: &str, short: &str) -> CommandEntry {
        CommandEntry::new(
            display,
            CommandProperties {
                short_name: short.to_string(),
                ..Default::default()
            },
            command_callback(|_| Ok(())),
        )
    }

    #[test]
    fn duplicate_display_names_keep_first_registration() {
        let mut registry = CommandRegistry::new();
        assert!(registry.register(entry("mari", "mari")));
        assert!(!registry.register(entry("mari", "mari_4")));
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("mari").map(CommandEntry::short_name), Some("mari"));
    }

    #[test]
    fn iteration_follows_registration_order() {
        let registry: CommandRegistry = [entry("Katana 4.0.2", "katana_4.0.2"), entry("setup_folders", "setup_folders")]
            .into_iter()
            .collect();
        assert_eq!(
            registry.iter().map(CommandEntry::short_name).collect::<Vec<_>>(),
            vec!["katana_4.0.2", "setup_folders"]
        );
        assert_eq!(registry.display_names().collect::<Vec<_>>(), vec!["Katana 4.0.2", "setup_folders"]);
    }
}
