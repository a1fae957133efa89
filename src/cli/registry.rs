use std::collections::HashMap;

use crate::cli::core::{CommandResult, ShellContext};

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

/// A shell command. `group` orders the help overview.
pub struct CommandEntry {
    pub name: &'static str,
    pub group: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub aliases: &'static [&'static str],
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub fn new(
        name: &'static str,
        group: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            group,
            description,
            usage,
            aliases: &[],
            handler,
        }
    }

    pub fn with_aliases(self, aliases: &'static [&'static str]) -> Self {
        Self { aliases, ..self }
    }
}

/// Commands in registration order, addressable by name or alias.
#[derive(Default)]
pub struct CommandRegistry {
    entries: Vec<CommandEntry>,
    lookup: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registering a name twice replaces the earlier entry in place.
    pub fn register(&mut self, entry: CommandEntry) {
        let slot = match self.lookup.get(entry.name) {
            Some(&slot) if self.entries[slot].name == entry.name => {
                self.entries[slot] = entry;
                slot
            }
            _ => {
                self.entries.push(entry);
                self.entries.len() - 1
            }
        };
        let entry = &self.entries[slot];
        self.lookup.insert(entry.name, slot);
        for alias in entry.aliases {
            self.lookup.entry(*alias).or_insert(slot);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.lookup.get(name).map(|&slot| &self.entries[slot])
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.entries.iter().collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|entry| entry.name)
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.get(name).map(|entry| entry.handler)
    }
}
