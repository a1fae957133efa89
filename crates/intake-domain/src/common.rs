//! Shared traits for intake entities.

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Returns `true` when the optional text is missing or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.map(|text| text.trim().is_empty()).unwrap_or(true)
}
