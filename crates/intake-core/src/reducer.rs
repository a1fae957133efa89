//! Tagged actions over the order draft.
//!
//! [`reduce`] never mutates its input; every action yields a fresh draft.

use intake_domain::{Address, AddressSide, Contact, Item, OrderDraft, ResetScope};
use tracing::debug;

use crate::items::{with_item_added, with_item_removed, with_quantity_changed, without_empty};
use crate::summary::distance_km;

#[derive(Debug, Clone, PartialEq)]
pub enum OrderAction {
    SetAddress(AddressSide, Address),
    SetContacts(AddressSide, Vec<Contact>),
    SetItems(Vec<Item>),
    AddItem(Item),
    ChangeQuantity { name: String, delta: i64 },
    RemoveItem(String),
    SetDistance(f64),
    Reset(ResetScope),
    Clear,
}

impl OrderAction {
    pub fn label(&self) -> &'static str {
        match self {
            OrderAction::SetAddress(..) => "set_address",
            OrderAction::SetContacts(..) => "set_contacts",
            OrderAction::SetItems(_) => "set_items",
            OrderAction::AddItem(_) => "add_item",
            OrderAction::ChangeQuantity { .. } => "change_quantity",
            OrderAction::RemoveItem(_) => "remove_item",
            OrderAction::SetDistance(_) => "set_distance",
            OrderAction::Reset(_) => "reset",
            OrderAction::Clear => "clear",
        }
    }
}

/// Applies `action` to `draft`.
///
/// Address changes re-derive `distance` from coordinates when both ends have them.
pub fn reduce(draft: &OrderDraft, action: OrderAction) -> OrderDraft {
    debug!(action = action.label(), "reducing order draft");
    let mut next = draft.clone();
    match action {
        OrderAction::SetAddress(side, address) => {
            match side {
                AddressSide::Pickup => next.pickup_address = address,
                AddressSide::Drop => next.drop_address = address,
            }
            next.distance = derived_distance(&next).unwrap_or(0.0);
        }
        OrderAction::SetContacts(side, contacts) => match side {
            AddressSide::Pickup => next.pickup_contacts = contacts,
            AddressSide::Drop => next.drop_contacts = contacts,
        },
        OrderAction::SetItems(items) => next.items = without_empty(items),
        OrderAction::AddItem(item) => next.items = with_item_added(&draft.items, item),
        OrderAction::ChangeQuantity { name, delta } => {
            next.items = with_quantity_changed(&draft.items, &name, delta)
        }
        OrderAction::RemoveItem(name) => next.items = with_item_removed(&draft.items, &name),
        OrderAction::SetDistance(distance) => next.distance = distance.max(0.0),
        OrderAction::Reset(scope) => match scope {
            ResetScope::Pickup => {
                next.pickup_address = Address::default();
                next.pickup_contacts.clear();
                next.distance = 0.0;
            }
            ResetScope::Drop => {
                next.drop_address = Address::default();
                next.drop_contacts.clear();
                next.distance = 0.0;
            }
            ResetScope::Items => next.items.clear(),
        },
        OrderAction::Clear => next = OrderDraft::default(),
    }
    next
}

fn derived_distance(draft: &OrderDraft) -> Option<f64> {
    let from = draft.pickup_address.coordinates()?;
    let to = draft.drop_address.coordinates()?;
    Some(distance_km(from, to))
}
