//! Three-step order form controller.
//!
//! Holds the only copy of the draft. Every change goes through [`reduce`] and
//! is persisted right after. Step gating and submission report problems as
//! data; only the backing store can make a call fail.

use std::sync::Arc;

use intake_domain::{
    find_catalog_item, search_catalog, with_contact_added, with_contact_removed, Address,
    AddressSide, CatalogSearch, Contact, Item, OrderDraft, OrderRecord, Panel, ResetScope, Step,
};
use tracing::{debug, info, warn};

use crate::address_lookup::{resolve_address, AddressProvider, AddressSource};
use crate::error::CoreError;
use crate::items::with_quantity_set;
use crate::persistence::{clear_snapshot, load_snapshot, save_snapshot, DraftSnapshot};
use crate::reducer::{reduce, OrderAction};
use crate::storage::KeyValueStore;
use crate::summary::OrderSummary;
use crate::validation::{step_errors, validate_order, CustomItemForm};

/// Asks the user to approve a destructive action.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: Step,
    pub errors: Vec<String>,
}

impl StepReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Moved { from: Step, to: Step },
    /// The current step has errors; the step did not change.
    Blocked(StepReport),
    /// No step in that direction.
    Stayed(Step),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Blocked(Vec<StepReport>),
    Submitted(OrderRecord),
}

pub struct OrderFormController {
    draft: OrderDraft,
    step: Step,
    open_panel: Option<Panel>,
    custom_item: Option<CustomItemForm>,
    store: Arc<dyn KeyValueStore>,
}

impl OrderFormController {
    /// Starts with an empty draft and writes nothing until the first change.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            draft: OrderDraft::default(),
            step: Step::default(),
            open_panel: Some(Panel::PickupAddress),
            custom_item: None,
            store,
        }
    }

    /// Rehydrates from the store. Unreadable fields start at their defaults; a
    /// failing store is logged and the draft starts empty.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let mut controller = Self::new(store);
        match load_snapshot(controller.store.as_ref()) {
            Ok(Some(snapshot)) => {
                debug!(items = snapshot.draft.items.len(), step = %snapshot.step, "draft restored");
                controller.draft = snapshot.draft;
                controller.step = snapshot.step;
                controller.open_panel = Some(default_panel(snapshot.step));
            }
            Ok(None) => debug!("no saved draft"),
            Err(err) => warn!(%err, "draft store unavailable, starting empty"),
        }
        controller
    }

    pub fn draft(&self) -> &OrderDraft {
        &self.draft
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn open_panel(&self) -> Option<Panel> {
        self.open_panel
    }

    pub fn custom_item(&self) -> Option<&CustomItemForm> {
        self.custom_item.as_ref()
    }

    pub fn custom_item_mut(&mut self) -> Option<&mut CustomItemForm> {
        self.custom_item.as_mut()
    }

    /// Applies one action and persists the resulting draft.
    pub fn dispatch(&mut self, action: OrderAction) -> Result<(), CoreError> {
        self.draft = reduce(&self.draft, action);
        self.persist()
    }

    fn persist(&self) -> Result<(), CoreError> {
        save_snapshot(
            self.store.as_ref(),
            &DraftSnapshot {
                draft: self.draft.clone(),
                step: self.step,
            },
        )
    }

    pub fn set_address(&mut self, side: AddressSide, address: Address) -> Result<(), CoreError> {
        self.dispatch(OrderAction::SetAddress(side, address))
    }

    /// Edits one side's address through the builder helpers on [`Address`].
    pub fn update_address<F>(&mut self, side: AddressSide, edit: F) -> Result<(), CoreError>
    where
        F: FnOnce(Address) -> Address,
    {
        let edited = edit(self.draft.address(side).clone());
        self.set_address(side, edited)
    }

    /// Runs typed text through the address provider and stores the result.
    pub fn lookup_address(
        &mut self,
        side: AddressSide,
        provider: &dyn AddressProvider,
        text: &str,
    ) -> Result<AddressSource, CoreError> {
        let resolution = resolve_address(provider, self.draft.address(side), text);
        self.set_address(side, resolution.address)?;
        Ok(resolution.source)
    }

    pub fn set_contacts(&mut self, side: AddressSide, contacts: Vec<Contact>) -> Result<(), CoreError> {
        self.dispatch(OrderAction::SetContacts(side, contacts))
    }

    pub fn add_contact(&mut self, side: AddressSide, contact: Contact) -> Result<(), CoreError> {
        let contacts = with_contact_added(self.draft.contacts(side), contact);
        self.set_contacts(side, contacts)
    }

    pub fn remove_contact(&mut self, side: AddressSide, index: usize) -> Result<(), CoreError> {
        let contacts = with_contact_removed(self.draft.contacts(side), index);
        self.set_contacts(side, contacts)
    }

    /// Adds one unit of a catalog item. Returns `false` for unknown names.
    pub fn select_catalog_item(&mut self, name: &str) -> Result<bool, CoreError> {
        match find_catalog_item(name) {
            Some(entry) => {
                self.dispatch(OrderAction::AddItem(entry.to_item()))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn add_item(&mut self, item: Item) -> Result<(), CoreError> {
        self.dispatch(OrderAction::AddItem(item))
    }

    pub fn increment_item(&mut self, name: &str) -> Result<(), CoreError> {
        self.change_quantity(name, 1)
    }

    pub fn decrement_item(&mut self, name: &str) -> Result<(), CoreError> {
        self.change_quantity(name, -1)
    }

    pub fn change_quantity(&mut self, name: &str, delta: i64) -> Result<(), CoreError> {
        self.dispatch(OrderAction::ChangeQuantity {
            name: name.to_string(),
            delta,
        })
    }

    /// Sets an absolute quantity; zero removes the item.
    pub fn set_quantity(&mut self, name: &str, quantity: u32) -> Result<(), CoreError> {
        let items = with_quantity_set(&self.draft.items, name, quantity);
        self.dispatch(OrderAction::SetItems(items))
    }

    pub fn remove_item(&mut self, name: &str) -> Result<(), CoreError> {
        self.dispatch(OrderAction::RemoveItem(name.to_string()))
    }

    pub fn search(&self, query: &str) -> CatalogSearch<'static> {
        search_catalog(query)
    }

    /// Opens the custom item panel, optionally prefilled from a search that
    /// found nothing.
    pub fn begin_custom_item(&mut self, prefill: Option<String>) -> &mut CustomItemForm {
        self.open_panel = Some(Panel::CustomItem);
        self.custom_item
            .insert(prefill.map(CustomItemForm::prefilled).unwrap_or_else(CustomItemForm::new))
    }

    pub fn cancel_custom_item(&mut self) {
        if self.custom_item.take().is_some() {
            debug!("custom item entry cancelled");
        }
        if self.open_panel == Some(Panel::CustomItem) {
            self.open_panel = Some(Panel::Items);
        }
    }

    /// Validates the open custom item form and adds it. On failure the form
    /// stays open with its contents.
    pub fn commit_custom_item(&mut self) -> Result<Item, CoreError> {
        let form = self
            .custom_item
            .as_ref()
            .ok_or_else(|| CoreError::InvalidOperation("no custom item in progress".into()))?;
        let item = form.validate()?;
        self.custom_item = None;
        self.open_panel = Some(Panel::Items);
        self.dispatch(OrderAction::AddItem(item.clone()))?;
        Ok(item)
    }

    pub fn validate_step(&self, step: Step) -> StepReport {
        StepReport {
            step,
            errors: step_errors(&self.draft, step),
        }
    }

    pub fn step_reports(&self) -> Vec<StepReport> {
        Step::ALL.into_iter().map(|step| self.validate_step(step)).collect()
    }

    pub fn can_submit(&self) -> bool {
        self.step_reports().iter().all(StepReport::is_valid)
    }

    /// Advances when the current step validates.
    pub fn next(&mut self) -> Result<Transition, CoreError> {
        let report = self.validate_step(self.step);
        if !report.is_valid() {
            debug!(step = %self.step, errors = report.errors.len(), "step blocked");
            return Ok(Transition::Blocked(report));
        }
        match self.step.next() {
            Some(to) => self.move_to(to),
            None => Ok(Transition::Stayed(self.step)),
        }
    }

    pub fn back(&mut self) -> Result<Transition, CoreError> {
        match self.step.previous() {
            Some(to) => self.move_to(to),
            None => Ok(Transition::Stayed(self.step)),
        }
    }

    /// Jumps straight to `step` without checking any step.
    pub fn go_to(&mut self, step: Step) -> Result<Transition, CoreError> {
        if step == self.step {
            return Ok(Transition::Stayed(step));
        }
        self.move_to(step)
    }

    fn move_to(&mut self, to: Step) -> Result<Transition, CoreError> {
        let from = self.step;
        self.step = to;
        self.open_panel = Some(default_panel(to));
        debug!(%from, %to, "step changed");
        self.persist()?;
        Ok(Transition::Moved { from, to })
    }

    /// Clears one scope after confirmation and re-opens its step.
    /// Returns `false` when the user declined.
    pub fn reset(&mut self, scope: ResetScope, confirm: &mut dyn Confirm) -> Result<bool, CoreError> {
        let prompt = format!("Reset all {} details?", scope);
        if !confirm.confirm(&prompt) {
            return Ok(false);
        }
        if scope == ResetScope::Items {
            self.custom_item = None;
        }
        self.draft = reduce(&self.draft, OrderAction::Reset(scope));
        self.step = scope.step();
        self.open_panel = Some(default_panel(self.step));
        info!(%scope, "draft scope reset");
        self.persist()?;
        Ok(true)
    }

    /// Submits when every step validates. A submitted draft is cleared.
    pub fn submit(&mut self, user_id: Option<i64>) -> Result<SubmitOutcome, CoreError> {
        let reports: Vec<StepReport> = self
            .step_reports()
            .into_iter()
            .filter(|report| !report.is_valid())
            .collect();
        if !reports.is_empty() {
            return Ok(SubmitOutcome::Blocked(reports));
        }
        let normalized = validate_order(&self.draft)?;
        let record = OrderRecord::from_draft(&normalized, user_id);
        info!(reference = %record.reference, items = record.items.len(), "order submitted");
        self.clear()?;
        Ok(SubmitOutcome::Submitted(record))
    }

    /// Drops the draft, the custom item entry and every persisted key.
    pub fn clear(&mut self) -> Result<(), CoreError> {
        self.draft = OrderDraft::default();
        self.step = Step::default();
        self.open_panel = Some(Panel::PickupAddress);
        self.custom_item = None;
        clear_snapshot(self.store.as_ref())?;
        Ok(())
    }

    /// Opens `panel`, or closes it when it is already open.
    pub fn toggle_panel(&mut self, panel: Panel) {
        self.open_panel = if self.open_panel == Some(panel) {
            None
        } else {
            Some(panel)
        };
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_draft(&self.draft)
    }
}

fn default_panel(step: Step) -> Panel {
    match step {
        Step::Shipper => Panel::PickupAddress,
        Step::Consignee => Panel::DropAddress,
        Step::Items => Panel::Items,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn controller() -> (OrderFormController, MemoryStore) {
        let store = MemoryStore::new();
        (OrderFormController::new(Arc::new(store.clone())), store)
    }

    #[test]
    fn next_without_pickup_address_is_blocked() {
        let (mut controller, _) = controller();
        match controller.next().unwrap() {
            Transition::Blocked(report) => {
                assert_eq!(report.step, Step::Shipper);
                assert!(!report.errors.is_empty());
                assert!(report.errors.iter().all(|e| !e.is_empty()));
            }
            other => panic!("expected blocked, got {:?}", other),
        }
        assert_eq!(controller.step(), Step::Shipper);
    }

    #[test]
    fn go_to_ignores_validity_but_submit_does_not() {
        let (mut controller, _) = controller();
        controller.go_to(Step::Items).unwrap();
        assert_eq!(controller.step(), Step::Items);
        assert!(matches!(
            controller.submit(None).unwrap(),
            SubmitOutcome::Blocked(reports) if reports.len() == 3
        ));
    }

    #[test]
    fn declined_reset_keeps_items() {
        let (mut controller, _) = controller();
        controller.select_catalog_item("Desk").unwrap();
        let mut decline = |_: &str| false;
        assert!(!controller.reset(ResetScope::Items, &mut decline).unwrap());
        assert_eq!(controller.draft().total_items(), 1);

        let mut accept = |_: &str| true;
        assert!(controller.reset(ResetScope::Items, &mut accept).unwrap());
        assert!(controller.draft().items.is_empty());
        assert_eq!(controller.step(), Step::Items);
    }

    #[test]
    fn custom_item_failure_keeps_form_open() {
        let (mut controller, _) = controller();
        controller.begin_custom_item(Some("Piano".into()));
        let err = controller.commit_custom_item().unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert_eq!(controller.custom_item().map(|f| f.name.as_str()), Some("Piano"));

        if let Some(form) = controller.custom_item_mut() {
            form.weight = "200".into();
            form.length = "150".into();
            form.width = "60".into();
            form.height = "130".into();
        }
        let item = controller.commit_custom_item().unwrap();
        assert_eq!(item.name, "Piano");
        assert!(controller.custom_item().is_none());
        assert_eq!(controller.draft().total_items(), 1);
    }

    #[test]
    fn panel_toggle_closes_open_panel() {
        let (mut controller, _) = controller();
        controller.toggle_panel(Panel::PickupAddress);
        assert_eq!(controller.open_panel(), None);
        controller.toggle_panel(Panel::PickupContacts);
        assert_eq!(controller.open_panel(), Some(Panel::PickupContacts));
    }

    #[test]
    fn every_change_is_persisted() {
        let (mut controller, store) = controller();
        assert!(store.is_empty());
        controller.select_catalog_item("Desk").unwrap();
        let restored = OrderFormController::restore(Arc::new(store.clone()));
        assert_eq!(restored.draft(), controller.draft());
    }

    #[test]
    fn unknown_catalog_name_is_reported() {
        let (mut controller, store) = controller();
        assert!(!controller.select_catalog_item("Grand Piano").unwrap());
        assert!(store.is_empty());
    }
}
