//! Operator-supplied command aliases.
//!
//! The host generates display names such as `Katana 4.0.2` which are awkward
//! to type in an interactive session. Operators configure rename rules keyed
//! by the host's short name (`katana_4.0.2: katana`). This module validates
//! those rules against the registered commands and builds the names the
//! session exposes.
//!
//! Conflicting aliases are never resolved by guessing: when two commands ask
//! for the same alias, every command involved keeps its display name and
//! the conflict is reported on the diagnostic sink.

use std::collections::HashSet;

use hostshell_types::LogSink;
use indexmap::IndexMap;

use crate::models::{CommandEntry, CommandRegistry};

/// Maps display names to the alias each command should be exposed under.
///
/// Only commands whose short name has a rule appear in the result. Rules for
/// short names that no registered command carries are ignored. When several
/// commands resolve to the same alias all of them are dropped from the
/// result and the collision is written to `sink` as a warning.
pub fn validated_name_replacements(
    commands: &CommandRegistry,
    rename_rules: &IndexMap<String, String>,
    sink: &dyn LogSink,
) -> IndexMap<String, String> {
    let provisional: Vec<(&str, &str)> = commands
        .iter()
        .filter_map(|entry| {
            rename_rules
                .get(entry.short_name())
                .map(|alias| (entry.display_name.as_str(), alias.as_str()))
        })
        .collect();

    let mut claimants: IndexMap<&str, Vec<&str>> = IndexMap::new();
    for &(display_name, alias) in &provisional {
        claimants.entry(alias).or_default().push(display_name);
    }

    for (alias, display_names) in claimants.iter().filter(|(_, names)| names.len() > 1) {
        tracing::warn!(alias = %alias, commands = ?display_names, "alias collision; keeping display names");
        sink.warning(&format!(
            "Alias '{}' is requested by several commands ({}); none of them will be renamed.",
            alias,
            display_names.join(", ")
        ));
    }

    provisional
        .into_iter()
        .filter(|(_, alias)| claimants.get(alias).is_some_and(|names| names.len() == 1))
        .map(|(display_name, alias)| (display_name.to_string(), alias.to_string()))
        .collect()
}

/// The names exposed to one interactive session.
///
/// Renamed commands appear under their alias, every other command under its
/// display name. Keys are unique.
#[derive(Debug, Clone, Default)]
pub struct ResolvedAliasMap {
    entries: IndexMap<String, CommandEntry>,
}

impl ResolvedAliasMap {
    /// Applies `rename_rules` to `commands`.
    ///
    /// On top of [`validated_name_replacements`], an alias that equals the
    /// display name of a command that is not renamed is dropped and its
    /// command falls back to its own display name. Dropping one alias can
    /// leave another shadowed, so this repeats until nothing changes.
    pub fn resolve(commands: &CommandRegistry, rename_rules: &IndexMap<String, String>, sink: &dyn LogSink) -> Self {
        let mut replacements = validated_name_replacements(commands, rename_rules, sink);

        loop {
            let kept: HashSet<&str> = commands
                .display_names()
                .filter(|display_name| !replacements.contains_key(*display_name))
                .collect();
            let shadowed: Vec<String> = replacements
                .iter()
                .filter(|(_, alias)| kept.contains(alias.as_str()))
                .map(|(display_name, _)| display_name.clone())
                .collect();
            if shadowed.is_empty() {
                break;
            }
            for display_name in shadowed {
                if let Some(alias) = replacements.shift_remove(&display_name) {
                    sink.warning(&format!(
                        "Alias '{alias}' for '{display_name}' would shadow an existing command; keeping '{display_name}'."
                    ));
                }
            }
        }

        let entries = commands
            .iter()
            .map(|entry| {
                let exposed = replacements
                    .get(&entry.display_name)
                    .cloned()
                    .unwrap_or_else(|| entry.display_name.clone());
                (exposed, entry.clone())
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, exposed_name: &str) -> Option<&CommandEntry> {
        self.entries.get(exposed_name)
    }

    pub fn contains(&self, exposed_name: &str) -> bool {
        self.entries.contains_key(exposed_name)
    }

    /// Exposed names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
