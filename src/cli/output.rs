use colored::Colorize;
use once_cell::sync::Lazy;
use std::fmt;
use std::sync::RwLock;

/// Message categories used by the shell output helpers.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MessageKind {
    Info,
    Success,
    Warning,
    Error,
    Hint,
    Section,
}

impl MessageKind {
    /// Plain-text prefix, so meaning survives with colors off.
    fn prefix(self) -> &'static str {
        match self {
            MessageKind::Info => "INFO: [i]",
            MessageKind::Success => "SUCCESS: [✓]",
            MessageKind::Warning => "WARNING: [!]",
            MessageKind::Error => "ERROR: [x]",
            MessageKind::Hint => "HINT: [?]",
            MessageKind::Section => "",
        }
    }

    fn paint(self, text: String) -> String {
        match self {
            MessageKind::Success => text.bright_green().to_string(),
            MessageKind::Warning => text.bright_yellow().to_string(),
            MessageKind::Error => text.bright_red().to_string(),
            MessageKind::Hint => text.bright_cyan().to_string(),
            MessageKind::Section => text.bold().to_string(),
            MessageKind::Info => text,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct OutputPreferences {
    pub color_enabled: bool,
}

impl Default for OutputPreferences {
    fn default() -> Self {
        Self {
            color_enabled: true,
        }
    }
}

static PREFERENCES: Lazy<RwLock<OutputPreferences>> =
    Lazy::new(|| RwLock::new(OutputPreferences::default()));

pub fn set_preferences(prefs: OutputPreferences) {
    colored::control::set_override(prefs.color_enabled);
    if let Ok(mut guard) = PREFERENCES.write() {
        *guard = prefs;
    }
}

fn preferences() -> OutputPreferences {
    PREFERENCES
        .read()
        .map(|guard| *guard)
        .unwrap_or_default()
}

pub(crate) fn format_message(kind: MessageKind, message: impl fmt::Display) -> String {
    match kind {
        MessageKind::Section => format!("=== {} ===", message.to_string().trim()),
        _ => format!("{} {}", kind.prefix(), message),
    }
}

pub fn print(kind: MessageKind, message: impl fmt::Display) {
    let mut line = format_message(kind, message);
    if preferences().color_enabled {
        line = kind.paint(line);
    }
    if kind == MessageKind::Section {
        println!();
    }
    println!("{}", line);
}

pub fn info(message: impl fmt::Display) {
    print(MessageKind::Info, message);
}

pub fn success(message: impl fmt::Display) {
    print(MessageKind::Success, message);
}

pub fn warning(message: impl fmt::Display) {
    print(MessageKind::Warning, message);
}

pub fn error(message: impl fmt::Display) {
    print(MessageKind::Error, message);
}

pub fn hint(message: impl fmt::Display) {
    print(MessageKind::Hint, message);
}

pub fn section(title: impl fmt::Display) {
    print(MessageKind::Section, title);
}

/// Prints each line of a multi-line block as-is.
pub fn block(text: impl fmt::Display) {
    for line in text.to_string().lines() {
        println!("{}", line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_prefix_plain_messages() {
        assert_eq!(
            format_message(MessageKind::Warning, "Careful"),
            "WARNING: [!] Careful"
        );
        assert_eq!(format_message(MessageKind::Section, " Items "), "=== Items ===");
    }
}
