//! Draft snapshot layout in the key-value store.
//!
//! Every draft field lives under its own `orderForm_` key as JSON, so a partial
//! snapshot still loads with defaults for the missing parts. A value that no
//! longer decodes is dropped on its own; the other fields still load.

use intake_domain::{OrderDraft, Step};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::storage::KeyValueStore;

pub const STORAGE_PREFIX: &str = "orderForm_";
pub const KEY_PICKUP_ADDRESS: &str = "orderForm_pickupAddress";
pub const KEY_DROP_ADDRESS: &str = "orderForm_dropAddress";
pub const KEY_ITEMS: &str = "orderForm_items";
pub const KEY_PICKUP_CONTACTS: &str = "orderForm_pickupContacts";
pub const KEY_DROP_CONTACTS: &str = "orderForm_dropContacts";
pub const KEY_DISTANCE: &str = "orderForm_distance";
pub const KEY_ACTIVE_STEP: &str = "orderForm_activeTab";

const LEGACY_DROP_ADDRESS: &str = "orderForm_dropoffAddress";

/// What survives a restart: the draft and the step the user was on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DraftSnapshot {
    pub draft: OrderDraft,
    pub step: Step,
}

pub fn save_snapshot(store: &dyn KeyValueStore, snapshot: &DraftSnapshot) -> Result<(), CoreError> {
    let draft = &snapshot.draft;
    let entries = vec![
        encode(KEY_PICKUP_ADDRESS, &draft.pickup_address)?,
        encode(KEY_DROP_ADDRESS, &draft.drop_address)?,
        encode(KEY_ITEMS, &draft.items)?,
        encode(KEY_PICKUP_CONTACTS, &draft.pickup_contacts)?,
        encode(KEY_DROP_CONTACTS, &draft.drop_contacts)?,
        encode(KEY_DISTANCE, &draft.distance)?,
        encode(KEY_ACTIVE_STEP, &snapshot.step)?,
    ];
    store.set_many(&entries)?;
    debug!(items = draft.items.len(), step = %snapshot.step, "draft snapshot saved");
    Ok(())
}

/// Returns `Ok(None)` when nothing has been saved yet. Only store failures are
/// errors; undecodable values fall back to their defaults.
pub fn load_snapshot(store: &dyn KeyValueStore) -> Result<Option<DraftSnapshot>, CoreError> {
    let keys = store.keys()?;
    if !keys.iter().any(|key| key.starts_with(STORAGE_PREFIX)) {
        return Ok(None);
    }

    let drop_address = match take(store, KEY_DROP_ADDRESS)? {
        Some(address) => Some(address),
        None => take(store, LEGACY_DROP_ADDRESS)?,
    };

    let draft = OrderDraft {
        pickup_address: take(store, KEY_PICKUP_ADDRESS)?.unwrap_or_default(),
        drop_address: drop_address.unwrap_or_default(),
        items: take(store, KEY_ITEMS)?.unwrap_or_default(),
        pickup_contacts: take(store, KEY_PICKUP_CONTACTS)?.unwrap_or_default(),
        drop_contacts: take(store, KEY_DROP_CONTACTS)?.unwrap_or_default(),
        distance: take(store, KEY_DISTANCE)?.unwrap_or_default(),
    };
    let step = take(store, KEY_ACTIVE_STEP)?.unwrap_or_default();
    Ok(Some(DraftSnapshot { draft, step }))
}

/// Removes every key under [`STORAGE_PREFIX`], including ones this version
/// never writes.
pub fn clear_snapshot(store: &dyn KeyValueStore) -> Result<usize, CoreError> {
    let mut removed = 0;
    for key in store.keys()? {
        if key.starts_with(STORAGE_PREFIX) {
            store.remove(&key)?;
            removed += 1;
        }
    }
    debug!(removed, "draft snapshot cleared");
    Ok(removed)
}

fn encode<T: Serialize>(key: &'static str, value: &T) -> Result<(&'static str, String), CoreError> {
    Ok((key, serde_json::to_string(value)?))
}

/// Missing and undecodable values both read as `None`.
fn take<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>, CoreError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(err) => {
            warn!(key, %err, "saved draft field is unreadable, using its default");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_has_no_snapshot() {
        let store = MemoryStore::new();
        assert_eq!(load_snapshot(&store).unwrap(), None);
    }

    #[test]
    fn clear_sweeps_unknown_prefixed_keys_only() {
        let store = MemoryStore::new();
        save_snapshot(&store, &DraftSnapshot::default()).unwrap();
        store.set("orderForm_legacy", "1").unwrap();
        store.set("mockAuthUser", "{}").unwrap();

        let removed = clear_snapshot(&store).unwrap();
        assert_eq!(removed, 8);
        assert_eq!(store.keys().unwrap(), vec!["mockAuthUser".to_string()]);
    }

    #[test]
    fn legacy_dropoff_key_is_read() {
        let store = MemoryStore::new();
        store
            .set(LEGACY_DROP_ADDRESS, r#"{"formatted_address":"2 Elm Rd"}"#)
            .unwrap();
        let snapshot = load_snapshot(&store).unwrap().expect("snapshot");
        assert_eq!(snapshot.draft.drop_address.formatted_address, "2 Elm Rd");
    }

    #[test]
    fn corrupt_value_only_loses_its_own_field() {
        let store = MemoryStore::new();
        store.set(KEY_ITEMS, "not json").unwrap();
        store.set(KEY_DISTANCE, "12.0").unwrap();
        store.set(KEY_ACTIVE_STEP, "\"consignee\"").unwrap();

        let snapshot = load_snapshot(&store).unwrap().expect("snapshot");
        assert!(snapshot.draft.items.is_empty());
        assert_eq!(snapshot.draft.distance, 12.0);
        assert_eq!(snapshot.step, Step::Consignee);
    }

    #[test]
    fn corrupt_drop_key_falls_back_to_legacy_key() {
        let store = MemoryStore::new();
        store.set(KEY_DROP_ADDRESS, "{broken").unwrap();
        store
            .set(LEGACY_DROP_ADDRESS, r#"{"formatted_address":"2 Elm Rd"}"#)
            .unwrap();
        let snapshot = load_snapshot(&store).unwrap().expect("snapshot");
        assert_eq!(snapshot.draft.drop_address.formatted_address, "2 Elm Rd");
    }
}
