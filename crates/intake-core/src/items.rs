//! Pure operations on the item list. Items are keyed by name.

use intake_domain::Item;

/// Adds `item`, merging into an existing entry with the same name.
///
/// A merge adds the incoming quantity and keeps the first entry's details.
pub fn with_item_added(items: &[Item], item: Item) -> Vec<Item> {
    let mut next = items.to_vec();
    match next.iter_mut().find(|existing| existing.name == item.name) {
        Some(existing) => existing.quantity = existing.quantity.saturating_add(item.quantity.max(1)),
        None => next.push(Item {
            quantity: item.quantity.max(1),
            ..item
        }),
    }
    next
}

/// Adjusts one item's quantity by `delta`, clamped to `u32::MAX`. Reaching
/// zero removes the item.
/// Unknown names leave the list unchanged.
pub fn with_quantity_changed(items: &[Item], name: &str, delta: i64) -> Vec<Item> {
    items
        .iter()
        .filter_map(|item| {
            if item.name != name {
                return Some(item.clone());
            }
            let quantity = i64::from(item.quantity).saturating_add(delta);
            if quantity <= 0 {
                None
            } else {
                Some(Item {
                    quantity: u32::try_from(quantity).unwrap_or(u32::MAX),
                    ..item.clone()
                })
            }
        })
        .collect()
}

/// Sets an absolute quantity. Zero removes the item.
pub fn with_quantity_set(items: &[Item], name: &str, quantity: u32) -> Vec<Item> {
    items
        .iter()
        .filter(|item| item.name != name || quantity > 0)
        .map(|item| {
            if item.name == name {
                Item {
                    quantity,
                    ..item.clone()
                }
            } else {
                item.clone()
            }
        })
        .collect()
}

pub fn with_item_removed(items: &[Item], name: &str) -> Vec<Item> {
    items.iter().filter(|item| item.name != name).cloned().collect()
}

/// Drops entries whose quantity is zero.
pub fn without_empty(items: Vec<Item>) -> Vec<Item> {
    items.into_iter().filter(|item| item.quantity > 0).collect()
}
