//! Row shapes of the `users` and `orders` tables.
//!
//! Nothing in this workspace writes these rows yet. They pin down what a
//! submitted draft has to turn into once order storage exists.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::address::{Address, PropertyType};
use crate::item::Item;
use crate::order::OrderDraft;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Bidding,
    Booked,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Bidding => "bidding",
            OrderStatus::Booked => "booked",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        };
        f.write_str(label)
    }
}

/// An `orders` row. `id` is assigned by the database, `reference` locally.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    #[serde(default)]
    pub id: Option<i64>,
    pub reference: Uuid,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub pickup_address: Address,
    pub drop_address: Address,
    pub property_type: PropertyType,
    pub items: Vec<Item>,
    pub status: OrderStatus,
    #[serde(default)]
    pub distance: Option<i64>,
}

impl OrderRecord {
    /// The row's `property_type` column mirrors the pickup address.
    pub fn from_draft(draft: &OrderDraft, user_id: Option<i64>) -> Self {
        let distance = if draft.distance > 0.0 {
            Some(draft.distance.round() as i64)
        } else {
            None
        };
        Self {
            id: None,
            reference: Uuid::new_v4(),
            user_id,
            pickup_address: draft.pickup_address.clone(),
            drop_address: draft.drop_address.clone(),
            property_type: draft.pickup_address.property_type,
            items: draft.items.clone(),
            status: OrderStatus::Pending,
            distance,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    #[test]
    fn record_copies_draft_and_starts_pending() {
        let mut draft = OrderDraft::default();
        draft.pickup_address = Address::new("1 Test St").with_property_type(PropertyType::Multi);
        draft.drop_address = Address::new("2 Elm Rd");
        draft.items.push(Item::new("Desk", Category::Office));
        draft.distance = 12.6;

        let record = OrderRecord::from_draft(&draft, Some(7));
        assert_eq!(record.status, OrderStatus::Pending);
        assert_eq!(record.property_type, PropertyType::Multi);
        assert_eq!(record.distance, Some(13));
        assert_eq!(record.user_id, Some(7));
        assert_eq!(record.items.len(), 1);
    }
}
