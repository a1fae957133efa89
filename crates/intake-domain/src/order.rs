//! The order draft and the step/scope vocabulary used to edit it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressSide};
use crate::contact::Contact;
use crate::item::Item;

/// Everything the user has entered for one moving order.
///
/// `distance` is kilometres between pickup and drop.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    #[serde(default)]
    pub pickup_address: Address,
    #[serde(default, alias = "dropoffAddress")]
    pub drop_address: Address,
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(default)]
    pub pickup_contacts: Vec<Contact>,
    #[serde(default, alias = "dropoffContacts")]
    pub drop_contacts: Vec<Contact>,
    #[serde(default)]
    pub distance: f64,
}

impl OrderDraft {
    pub fn address(&self, side: AddressSide) -> &Address {
        match side {
            AddressSide::Pickup => &self.pickup_address,
            AddressSide::Drop => &self.drop_address,
        }
    }

    pub fn contacts(&self, side: AddressSide) -> &[Contact] {
        match side {
            AddressSide::Pickup => &self.pickup_contacts,
            AddressSide::Drop => &self.drop_contacts,
        }
    }

    /// Sum of quantities across all items.
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn item(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    pub fn is_empty(&self) -> bool {
        *self == OrderDraft::default()
    }
}

/// The three steps of the intake flow, in order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Shipper,
    Consignee,
    Items,
}

impl Step {
    pub const ALL: [Step; 3] = [Step::Shipper, Step::Consignee, Step::Items];

    pub fn next(self) -> Option<Step> {
        match self {
            Step::Shipper => Some(Step::Consignee),
            Step::Consignee => Some(Step::Items),
            Step::Items => None,
        }
    }

    pub fn previous(self) -> Option<Step> {
        match self {
            Step::Shipper => None,
            Step::Consignee => Some(Step::Shipper),
            Step::Items => Some(Step::Consignee),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Step::Shipper => "Shipper",
            Step::Consignee => "Consignee",
            Step::Items => "Items",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "shipper" | "pickup" | "1" => Some(Step::Shipper),
            "consignee" | "drop" | "2" => Some(Step::Consignee),
            "items" | "3" => Some(Step::Items),
            _ => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Part of the draft a reset clears.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResetScope {
    Pickup,
    Drop,
    Items,
}

impl ResetScope {
    /// Step re-opened after the scope is cleared.
    pub fn step(self) -> Step {
        match self {
            ResetScope::Pickup => Step::Shipper,
            ResetScope::Drop => Step::Consignee,
            ResetScope::Items => Step::Items,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pickup" | "shipper" => Some(ResetScope::Pickup),
            "drop" | "dropoff" | "consignee" => Some(ResetScope::Drop),
            "items" => Some(ResetScope::Items),
            _ => None,
        }
    }
}

impl fmt::Display for ResetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ResetScope::Pickup => "pickup",
            ResetScope::Drop => "drop",
            ResetScope::Items => "items",
        };
        f.write_str(label)
    }
}

/// Collapsible sections of the form. Which one is open is view state only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Panel {
    PickupAddress,
    PickupContacts,
    DropAddress,
    DropContacts,
    Items,
    CustomItem,
}
