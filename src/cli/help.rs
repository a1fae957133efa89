use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::{CommandEntry, CommandRegistry};

/// Lists every command under its group heading, in registration order.
pub fn print_overview(registry: &CommandRegistry) {
    let entries = registry.list();
    let width = entries.iter().map(|entry| entry.name.len()).max().unwrap_or(0);

    output_section("Available commands");
    let mut group = None;
    for entry in &entries {
        if group != Some(entry.group) {
            group = Some(entry.group);
            io::print_info(format!("{}:", entry.group));
        }
        io::print_info(format!(
            "  {:<width$}  {}",
            entry.name,
            entry.description,
            width = width
        ));
    }
    io::print_hint("Use `help <command>` for usage details.");
}

pub fn print_command(registry: &CommandRegistry, entry: &CommandEntry) {
    output_section(format!("Help: {}", entry.name));
    io::print_info(format!("  {}", entry.description));
    io::print_info(format!("  Usage: {}", entry.usage));
    if !entry.aliases.is_empty() {
        io::print_info(format!("  Aliases: {}", entry.aliases.join(", ")));
    }

    let related: Vec<&str> = registry
        .list()
        .into_iter()
        .filter(|other| other.group == entry.group && other.name != entry.name)
        .map(|other| other.name)
        .collect();
    if !related.is_empty() {
        io::print_info(format!("  See also: {}", related.join(", ")));
    }
}
