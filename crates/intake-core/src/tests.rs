use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;

use crate::{
    auth::{AuthService, GuestAuth},
    controller::{OrderFormController, SubmitOutcome, Transition},
    dashboard::Dashboard,
    persistence::{load_snapshot, KEY_ACTIVE_STEP},
    storage::{KeyValueStore, MemoryStore},
};
use intake_domain::{
    Address, AddressSide, Category, Contact, ContactType, OrderStatus, PropertyType, ResetScope,
    Step,
};

fn pickup_time() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 6, 2)
        .and_then(|date| date.and_hms_opt(8, 0, 0))
        .expect("valid timestamp")
}

fn contact(name: &str) -> Contact {
    Contact::new(name, "0412 345 678", "someone@example.com", ContactType::Primary)
}

fn controller_with_store() -> (OrderFormController, MemoryStore) {
    let store = MemoryStore::new();
    (OrderFormController::new(Arc::new(store.clone())), store)
}

fn fill_shipper(controller: &mut OrderFormController) {
    controller
        .update_address(AddressSide::Pickup, |address| {
            address
                .with_manual_text("1 Test St")
                .with_pickup_date_time(Some(pickup_time()))
        })
        .expect("set pickup");
    controller
        .add_contact(AddressSide::Pickup, contact("Ada Lovelace"))
        .expect("add pickup contact");
}

fn fill_consignee(controller: &mut OrderFormController) {
    controller
        .set_address(AddressSide::Drop, Address::new("2 Elm Rd").with_driveway(true))
        .expect("set drop");
    controller
        .add_contact(AddressSide::Drop, contact("Grace Hopper"))
        .expect("add drop contact");
}

#[test]
fn lift_answer_unblocks_multi_storey_pickup() {
    let (mut controller, _) = controller_with_store();
    fill_shipper(&mut controller);
    controller
        .update_address(AddressSide::Pickup, |address| {
            address
                .with_property_type(PropertyType::Multi)
                .with_unit_number(Some("7".into()))
                .with_level(Some(3))
        })
        .expect("multi details");

    let report = controller.validate_step(Step::Shipper);
    assert!(report
        .errors
        .iter()
        .any(|error| error.contains("Lift status is required")));

    controller
        .update_address(AddressSide::Pickup, |address| address.with_lift(Some(false)))
        .expect("answer lift");
    assert!(controller.validate_step(Step::Shipper).is_valid());
    assert_eq!(
        controller.next().expect("advance"),
        Transition::Moved {
            from: Step::Shipper,
            to: Step::Consignee
        }
    );
}

#[test]
fn property_type_switch_drops_stale_answers() {
    let (mut controller, _) = controller_with_store();
    controller
        .update_address(AddressSide::Drop, |address| {
            address
                .with_manual_text("2 Elm Rd")
                .with_property_type(PropertyType::Multi)
                .with_unit_number(Some("3".into()))
                .with_level(Some(4))
                .with_lift(Some(true))
        })
        .expect("multi drop");
    controller
        .update_address(AddressSide::Drop, |address| {
            address.with_property_type(PropertyType::Single)
        })
        .expect("switch back");

    let drop = &controller.draft().drop_address;
    assert_eq!((drop.unit_number.as_deref(), drop.level, drop.has_lift), (None, None, None));
}

#[test]
fn sofa_is_added_then_removed_by_decrement() {
    let (mut controller, _) = controller_with_store();
    let search = controller.search("sofa");
    assert_eq!(search.categories(), vec![Category::LivingRoom]);

    assert!(controller.select_catalog_item("3-Seater Sofa").expect("select"));
    assert!(controller.select_catalog_item("3-Seater Sofa").expect("select again"));
    assert_eq!(controller.draft().items.len(), 1);
    assert_eq!(controller.draft().items[0].quantity, 2);

    controller.decrement_item("3-Seater Sofa").expect("decrement");
    controller.decrement_item("3-Seater Sofa").expect("decrement");
    assert!(controller.draft().items.is_empty());
}

#[test]
fn full_flow_submits_normalized_record_and_clears() {
    let (mut controller, store) = controller_with_store();
    fill_shipper(&mut controller);
    assert!(matches!(controller.next().expect("next"), Transition::Moved { .. }));
    fill_consignee(&mut controller);
    assert!(matches!(controller.next().expect("next"), Transition::Moved { .. }));
    controller.select_catalog_item("Desk").expect("desk");
    assert_eq!(controller.next().expect("next"), Transition::Stayed(Step::Items));
    assert!(controller.can_submit());

    let record = match controller.submit(Some(42)).expect("submit") {
        SubmitOutcome::Submitted(record) => record,
        SubmitOutcome::Blocked(reports) => panic!("unexpected block: {:?}", reports),
    };
    assert_eq!(record.status, OrderStatus::Pending);
    assert_eq!(record.user_id, Some(42));
    assert_eq!(record.items.len(), 1);

    assert!(controller.draft().is_empty());
    assert_eq!(controller.step(), Step::Shipper);
    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn reset_twice_matches_reset_once() {
    let (mut controller, _) = controller_with_store();
    fill_shipper(&mut controller);
    fill_consignee(&mut controller);
    let mut approve = |_: &str| true;

    controller
        .reset(ResetScope::Drop, &mut approve)
        .expect("first reset");
    let once = controller.draft().clone();
    controller
        .reset(ResetScope::Drop, &mut approve)
        .expect("second reset");

    assert_eq!(controller.draft(), &once);
    assert_eq!(controller.step(), Step::Consignee);
    assert!(once.drop_contacts.is_empty());
    assert_eq!(once.pickup_contacts.len(), 1);
}

#[test]
fn snapshot_round_trip_restores_draft_and_step() {
    let (mut controller, store) = controller_with_store();
    fill_shipper(&mut controller);
    controller.go_to(Step::Items).expect("jump");
    controller.select_catalog_item("Bookcase").expect("bookcase");
    controller.begin_custom_item(Some("Piano".into()));

    let restored = OrderFormController::restore(Arc::new(store.clone()));
    assert_eq!(restored.draft(), controller.draft());
    assert_eq!(restored.step(), Step::Items);
    assert!(restored.custom_item().is_none());
    assert_eq!(
        store.get(KEY_ACTIVE_STEP).expect("get").as_deref(),
        Some("\"items\"")
    );
}

#[test]
fn unreadable_field_does_not_wipe_the_rest_of_the_draft() {
    let (mut controller, store) = controller_with_store();
    controller.select_catalog_item("Desk").expect("desk");
    controller.select_catalog_item("Wardrobe").expect("wardrobe");
    store
        .set("orderForm_pickupAddress", "{broken")
        .expect("corrupt pickup address");

    let snapshot = load_snapshot(&store).expect("load").expect("snapshot");
    assert_eq!(snapshot.draft.items.len(), 2);

    let mut restored = OrderFormController::restore(Arc::new(store.clone()));
    assert_eq!(restored.draft().items.len(), 2);
    assert!(restored.draft().pickup_address.formatted_address.is_empty());

    restored
        .add_contact(AddressSide::Pickup, contact("Alex Smith"))
        .expect("add contact");
    let persisted = load_snapshot(&store).expect("reload").expect("snapshot");
    assert_eq!(persisted.draft.items.len(), 2);
    assert_eq!(persisted.draft.pickup_contacts.len(), 1);
}

#[test]
fn logout_signs_out_and_clears_everything() {
    let store = MemoryStore::new();
    let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());
    let auth = Arc::new(GuestAuth::with_delay(Arc::clone(&shared), Duration::ZERO));
    auth.sign_in_as_guest().expect("guest login");

    let mut dashboard = Dashboard::mount(auth.clone(), Arc::clone(&shared)).expect("mount");
    fill_shipper(dashboard.controller_mut());
    dashboard.controller_mut().begin_custom_item(None);

    dashboard.logout().expect("logout");
    assert!(!dashboard.is_signed_in());
    assert!(auth.current_user().is_none());
    assert!(dashboard.controller().draft().is_empty());
    assert!(dashboard.controller().custom_item().is_none());
    assert!(store.keys().expect("keys").is_empty());
}

#[test]
fn remounting_restores_the_previous_draft() {
    let store = MemoryStore::new();
    let shared: Arc<dyn KeyValueStore> = Arc::new(store.clone());
    let auth = Arc::new(GuestAuth::with_delay(Arc::clone(&shared), Duration::ZERO));
    auth.sign_in_as_guest().expect("guest login");

    {
        let mut dashboard = Dashboard::mount(auth.clone(), Arc::clone(&shared)).expect("mount");
        dashboard
            .controller_mut()
            .select_catalog_item("Wardrobe")
            .expect("wardrobe");
    }
    assert_eq!(auth.listener_count(), 0);

    let dashboard = Dashboard::mount(auth, shared).expect("remount");
    assert_eq!(dashboard.controller().draft().total_items(), 1);
}
