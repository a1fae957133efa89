//! People to reach at either end of the move.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::{Displayable, NamedEntity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ContactType {
    #[default]
    Primary,
    Secondary,
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ContactType::Primary => "primary",
            ContactType::Secondary => "secondary",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Contact {
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(rename = "type", default)]
    pub kind: ContactType,
}

impl Contact {
    pub fn new(
        name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        kind: ContactType,
    ) -> Self {
        Self {
            name: name.into(),
            phone: phone.into(),
            email: email.into(),
            kind,
        }
    }
}

impl NamedEntity for Contact {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Contact {
    fn display_label(&self) -> String {
        format!("{} <{}> {} ({})", self.name, self.email, self.phone, self.kind)
    }
}

/// Appends a contact. The first contact on a side is always the primary one.
pub fn with_contact_added(contacts: &[Contact], mut contact: Contact) -> Vec<Contact> {
    contact.kind = if contacts.is_empty() {
        ContactType::Primary
    } else {
        ContactType::Secondary
    };
    let mut next = contacts.to_vec();
    next.push(contact);
    next
}

/// Removes the contact at `index`; out-of-range indexes leave the list unchanged.
/// When the primary contact goes, the next remaining contact is promoted.
pub fn with_contact_removed(contacts: &[Contact], index: usize) -> Vec<Contact> {
    let mut next = contacts.to_vec();
    if index >= next.len() {
        return next;
    }
    let removed = next.remove(index);
    if removed.kind == ContactType::Primary
        && !next.iter().any(|c| c.kind == ContactType::Primary)
    {
        if let Some(first) = next.first_mut() {
            first.kind = ContactType::Primary;
        }
    }
    next
}
