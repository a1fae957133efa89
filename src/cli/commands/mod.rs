pub mod address;
pub mod config;
pub mod contacts;
pub mod flow;
pub mod items;
pub mod session;
pub mod system;

use crate::cli::core::CommandError;
use crate::cli::registry::{CommandEntry, CommandRegistry};
use intake_domain::AddressSide;

pub(crate) fn all_definitions() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(system::definitions());
    commands.extend(config::definitions());
    commands.extend(session::definitions());
    commands.extend(flow::definitions());
    commands.extend(address::definitions());
    commands.extend(contacts::definitions());
    commands.extend(items::definitions());
    commands
}

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in all_definitions() {
        registry.register(entry);
    }
}

/// Reads the leading `pickup|drop` argument.
pub(crate) fn parse_side(args: &[&str], usage: &str) -> Result<AddressSide, CommandError> {
    args.first()
        .and_then(|raw| AddressSide::parse(raw))
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

/// Splits off `--yes`/`-y` and returns the remaining arguments.
pub(crate) fn take_yes_flag<'a>(args: &[&'a str]) -> (bool, Vec<&'a str>) {
    let mut approved = false;
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        if matches!(*arg, "--yes" | "-y") {
            approved = true;
        } else {
            rest.push(*arg);
        }
    }
    (approved, rest)
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "on" => Some(true),
        "no" | "n" | "false" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_is_registered_once() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        let mut unique = names.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(names.len(), unique.len());
        assert!(registry.get("submit").is_some());
    }

    #[test]
    fn yes_flag_is_split_from_arguments() {
        let (approved, rest) = take_yes_flag(&["items", "--yes"]);
        assert!(approved);
        assert_eq!(rest, vec!["items"]);

        let (approved, rest) = take_yes_flag(&["pickup"]);
        assert!(!approved);
        assert_eq!(rest, vec!["pickup"]);
    }
}
