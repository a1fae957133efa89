//! Validation schemas for addresses, contacts, items and whole orders.
//!
//! Every schema is a pure function returning either the normalized value or the
//! ordered list of field errors. Object-level refinements (the multi-unit
//! address rule) only run once the field checks have passed.

use std::fmt;

use intake_domain::{
    Address, AddressSide, Category, Contact, DimensionUnit, Dimensions, Item, OrderDraft,
    PropertyType, Step,
};
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

pub const MAX_ITEM_WEIGHT_KG: f64 = 10_000.0;
pub const PHONE_COUNTRY_PREFIX: &str = "+61";

static MOBILE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\+61|0)?4[0-9]{8}$").expect("mobile pattern compiles"));
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

/// A single failed check. An empty `path` marks an object-level message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub path: String,
    pub message: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_object_level(&self) -> bool {
        self.path.is_empty()
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

/// Ordered collection of field failures produced by a schema.
#[derive(Debug, Clone, PartialEq, Eq, Default, Error)]
#[error("{}", joined(.errors))]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

fn joined(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|error| error.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(path, message));
    }

    /// Appends `other`, nesting its paths under `prefix`.
    pub fn extend_nested(&mut self, prefix: &str, other: ValidationErrors) {
        for error in other.errors {
            let path = match (prefix.is_empty(), error.path.is_empty()) {
                (true, _) => error.path,
                (false, true) => prefix.to_string(),
                (false, false) if error.path.starts_with('[') => {
                    format!("{}{}", prefix, error.path)
                }
                (false, false) => format!("{}.{}", prefix, error.path),
            };
            self.errors.push(FieldError::new(path, error.message));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Human-readable messages in the order the checks ran.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn contains_message(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.message.contains(needle))
    }

    pub fn for_path(&self, path: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.path == path).collect()
    }

    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.errors.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

/// Validates an address for one side of the move.
///
/// The pickup side additionally needs a pickup date and time.
pub fn validate_address(address: &Address, side: AddressSide) -> Result<Address, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let normalized = Address {
        formatted_address: address.formatted_address.trim().to_string(),
        unit_number: trimmed(address.unit_number.as_deref()),
        notes: trimmed(address.notes.as_deref()),
        ..address.clone()
    };

    if normalized.formatted_address.is_empty() {
        errors.push("formatted_address", format!("Enter {} address", side));
    }
    if side == AddressSide::Pickup && normalized.pickup_date_time.is_none() {
        errors.push("pickupDateTime", "Select pickup date and time");
    }
    if let Some(lat) = normalized.lat {
        if !(-90.0..=90.0).contains(&lat) {
            errors.push("lat", "Latitude must be between -90 and 90");
        }
    }
    if let Some(lng) = normalized.lng {
        if !(-180.0..=180.0).contains(&lng) {
            errors.push("lng", "Longitude must be between -180 and 180");
        }
    }

    if errors.is_empty() && normalized.property_type == PropertyType::Multi {
        if normalized.unit_number.is_none() {
            errors.push("", "Enter unit number");
        }
        match normalized.level {
            None => errors.push("", "Enter level"),
            Some(0) => errors.push("", "Level must be 1 or higher (ground floor is 1)"),
            Some(_) => {}
        }
        if normalized.needs_lift_answer() && normalized.has_lift.is_none() {
            errors.push("", "Lift status is required for levels above ground floor");
        }
    }

    errors.into_result(normalized)
}

/// Normalizes an Australian mobile number to `+614XXXXXXXX`.
///
/// Spaces, dashes and brackets are ignored; `04…`, `4…` and `+614…` inputs all
/// produce the same result.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let compact: String = raw
        .chars()
        .filter(|ch| !ch.is_whitespace() && !matches!(ch, '-' | '(' | ')'))
        .collect();
    if !MOBILE_PATTERN.is_match(&compact) {
        return None;
    }
    let normalized = if let Some(rest) = compact.strip_prefix('0') {
        format!("{}{}", PHONE_COUNTRY_PREFIX, rest)
    } else if !compact.starts_with('+') {
        format!("{}{}", PHONE_COUNTRY_PREFIX, compact)
    } else {
        compact
    };
    Some(normalized)
}

pub fn validate_contact(contact: &Contact) -> Result<Contact, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = contact.name.trim().to_string();
    let email = contact.email.trim().to_string();

    if name.chars().count() < 2 {
        errors.push("name", "Name must be at least 2 characters");
    }

    let phone = match normalize_phone(&contact.phone) {
        Some(phone) => phone,
        None => {
            errors.push("phone", "Must be a valid Australian mobile number");
            contact.phone.clone()
        }
    };

    if !EMAIL_PATTERN.is_match(&email) {
        errors.push("email", "Invalid email address");
    }
    if email.len() < 5 {
        errors.push("email", "Email must be at least 5 characters");
    }
    if email.len() > 254 {
        errors.push("email", "Email must be less than 254 characters");
    }

    errors.into_result(Contact {
        name,
        phone,
        email,
        kind: contact.kind,
    })
}

pub fn validate_item(item: &Item) -> Result<Item, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let name = item.name.trim().to_string();

    if name.chars().count() < 2 {
        errors.push("name", "Name must be at least 2 characters");
    }
    if item.quantity < 1 {
        errors.push("quantity", "Quantity must be at least 1");
    }
    if let Some(weight) = item.weight {
        check_weight(weight, &mut errors);
    }
    if let Some(dimensions) = &item.dimensions {
        check_dimension("dimensions.length", "Length", dimensions.length, &mut errors);
        check_dimension("dimensions.width", "Width", dimensions.width, &mut errors);
        check_dimension("dimensions.height", "Height", dimensions.height, &mut errors);
    }

    errors.into_result(Item {
        name,
        description: trimmed(item.description.as_deref()),
        ..item.clone()
    })
}

fn check_weight(weight: f64, errors: &mut ValidationErrors) {
    if !(weight > 0.0) {
        errors.push("weight", "Weight must be positive");
    } else if weight > MAX_ITEM_WEIGHT_KG {
        errors.push("weight", "Weight cannot exceed 10,000 kg");
    }
}

fn check_dimension(path: &str, label: &str, value: f64, errors: &mut ValidationErrors) {
    if !(value > 0.0) {
        errors.push(path, format!("{} must be positive", label));
    }
}

/// Validates a complete draft for submission.
///
/// Field paths follow the persisted JSON shape, e.g. `items[0].name`.
pub fn validate_order(draft: &OrderDraft) -> Result<OrderDraft, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    let mut normalized = draft.clone();

    match validate_address(&draft.pickup_address, AddressSide::Pickup) {
        Ok(address) => normalized.pickup_address = address,
        Err(err) => errors.extend_nested("pickupAddress", err),
    }
    match validate_address(&draft.drop_address, AddressSide::Drop) {
        Ok(address) => normalized.drop_address = address,
        Err(err) => errors.extend_nested("dropAddress", err),
    }

    if draft.items.is_empty() {
        errors.push("items", "At least one item is required");
    }
    for (index, item) in draft.items.iter().enumerate() {
        match validate_item(item) {
            Ok(item) => normalized.items[index] = item,
            Err(err) => errors.extend_nested(&format!("items[{}]", index), err),
        }
    }

    for (side, key) in [
        (AddressSide::Pickup, "pickupContacts"),
        (AddressSide::Drop, "dropContacts"),
    ] {
        let contacts = draft.contacts(side);
        if contacts.is_empty() {
            errors.push(key, format!("At least one {} contact is required", side));
        }
        let mut cleaned = Vec::with_capacity(contacts.len());
        for (index, contact) in contacts.iter().enumerate() {
            match validate_contact(contact) {
                Ok(contact) => cleaned.push(contact),
                Err(err) => errors.extend_nested(&format!("{}[{}]", key, index), err),
            }
        }
        match side {
            AddressSide::Pickup => normalized.pickup_contacts = cleaned,
            AddressSide::Drop => normalized.drop_contacts = cleaned,
        }
    }

    errors.into_result(normalized)
}

/// Messages blocking a step, in display order. Empty means the step is complete.
pub fn step_errors(draft: &OrderDraft, step: Step) -> Vec<String> {
    match step {
        Step::Shipper => side_errors(draft, AddressSide::Pickup),
        Step::Consignee => side_errors(draft, AddressSide::Drop),
        Step::Items => item_errors(&draft.items),
    }
}

fn side_errors(draft: &OrderDraft, side: AddressSide) -> Vec<String> {
    let mut messages = match validate_address(draft.address(side), side) {
        Ok(_) => Vec::new(),
        Err(err) => err.messages(),
    };
    let contacts = draft.contacts(side);
    if contacts.is_empty() {
        messages.push(format!("At least one {} contact is required", side));
    }
    for (index, contact) in contacts.iter().enumerate() {
        if let Err(err) = validate_contact(contact) {
            messages.extend(
                err.messages()
                    .into_iter()
                    .map(|message| format!("{} contact {}: {}", capitalize(side), index + 1, message)),
            );
        }
    }
    messages
}

fn item_errors(items: &[Item]) -> Vec<String> {
    let mut messages = Vec::new();
    if items.is_empty() {
        messages.push("At least one item is required".to_string());
    }
    for item in items {
        if let Err(err) = validate_item(item) {
            let label = if item.name.trim().is_empty() {
                "Unnamed item"
            } else {
                item.name.as_str()
            };
            messages.extend(
                err.messages()
                    .into_iter()
                    .map(|message| format!("{}: {}", label, message)),
            );
        }
    }
    messages
}

fn capitalize(side: AddressSide) -> &'static str {
    match side {
        AddressSide::Pickup => "Pickup",
        AddressSide::Drop => "Drop",
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// In-progress entry for an item that is not in the catalog.
///
/// Fields hold raw text as typed so every problem can be reported at once.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomItemForm {
    pub name: String,
    pub category: Option<Category>,
    pub weight: String,
    pub length: String,
    pub width: String,
    pub height: String,
    pub unit: DimensionUnit,
    pub quantity: String,
    pub description: String,
}

impl CustomItemForm {
    pub fn new() -> Self {
        Self {
            quantity: "1".into(),
            ..Self::default()
        }
    }

    pub fn prefilled(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::new()
        }
    }

    /// Checks every field independently and builds the item when all pass.
    pub fn validate(&self) -> Result<Item, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim();

        if name.is_empty() {
            errors.push("name", "Item name is required");
        } else if name.chars().count() < 2 {
            errors.push("name", "Name must be at least 2 characters");
        }

        let weight = positive_field(&self.weight, "weight", "Weight", &mut errors);
        if let Some(value) = weight {
            if value > MAX_ITEM_WEIGHT_KG {
                errors.push("weight", "Weight cannot exceed 10,000 kg");
            }
        }

        let quantity = match self.quantity.trim().parse::<u32>() {
            Ok(value) if value >= 1 => Some(value),
            _ => {
                errors.push("quantity", "Quantity must be at least 1");
                None
            }
        };

        let length = positive_field(&self.length, "dimensions.length", "Length", &mut errors);
        let width = positive_field(&self.width, "dimensions.width", "Width", &mut errors);
        let height = positive_field(&self.height, "dimensions.height", "Height", &mut errors);

        match (weight, quantity, length, width, height) {
            (Some(weight), Some(quantity), Some(length), Some(width), Some(height))
                if errors.is_empty() =>
            {
                let mut item = Item::new(name, self.category.unwrap_or(Category::Other))
                    .with_weight(weight)
                    .with_quantity(quantity)
                    .with_dimensions(Dimensions::new(length, width, height, self.unit));
                if !self.description.trim().is_empty() {
                    item = item.with_description(self.description.trim());
                }
                Ok(item)
            }
            _ => Err(errors),
        }
    }
}

fn positive_field(raw: &str, path: &str, label: &str, errors: &mut ValidationErrors) -> Option<f64> {
    let text = raw.trim();
    if text.is_empty() {
        errors.push(path, format!("{} is required", label));
        return None;
    }
    match text.parse::<f64>() {
        Ok(value) if value > 0.0 && value.is_finite() => Some(value),
        _ => {
            errors.push(path, format!("{} must be a positive number", label));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use intake_domain::ContactType;

    fn pickup_time() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, 14)
            .and_then(|date| date.and_hms_opt(9, 30, 0))
            .expect("valid timestamp")
    }

    #[test]
    fn phone_inputs_share_one_canonical_form() {
        let expected = Some("+61412345678".to_string());
        assert_eq!(normalize_phone("0412345678"), expected);
        assert_eq!(normalize_phone("412345678"), expected);
        assert_eq!(normalize_phone("+61412345678"), expected);
        assert_eq!(normalize_phone("0412 345 678"), expected);
        assert_eq!(normalize_phone("0212345678"), None);
        assert_eq!(normalize_phone("04123"), None);
    }

    #[test]
    fn contact_reports_every_failing_field() {
        let contact = Contact::new("A", "123", "nope", ContactType::Primary);
        let errors = validate_contact(&contact).expect_err("contact is invalid");
        assert_eq!(errors.for_path("name").len(), 1);
        assert_eq!(errors.for_path("phone").len(), 1);
        assert!(errors.for_path("email").len() >= 2);
    }

    #[test]
    fn valid_contact_is_normalized() {
        let contact = Contact::new(" Ada ", "0412 345 678", "ada@example.com ", ContactType::Primary);
        let parsed = validate_contact(&contact).expect("contact is valid");
        assert_eq!(parsed.name, "Ada");
        assert_eq!(parsed.phone, "+61412345678");
        assert_eq!(parsed.email, "ada@example.com");
    }

    #[test]
    fn multi_unit_rule_waits_for_field_checks() {
        let address = Address::default().with_property_type(PropertyType::Multi);
        let errors = validate_address(&address, AddressSide::Drop).expect_err("blank address");
        assert_eq!(errors.messages(), vec!["Enter drop address".to_string()]);
        assert!(errors.iter().all(|e| !e.is_object_level()));
    }

    #[test]
    fn multi_unit_requires_unit_level_and_lift() {
        let address = Address::new("1 Test St")
            .with_property_type(PropertyType::Multi)
            .with_level(Some(3))
            .with_pickup_date_time(Some(pickup_time()));
        let errors = validate_address(&address, AddressSide::Pickup).expect_err("incomplete");
        assert_eq!(
            errors.messages(),
            vec![
                "Enter unit number".to_string(),
                "Lift status is required for levels above ground floor".to_string(),
            ]
        );
        assert!(errors.iter().all(FieldError::is_object_level));

        let fixed = address
            .with_unit_number(Some("12".into()))
            .with_lift(Some(false));
        assert!(validate_address(&fixed, AddressSide::Pickup).is_ok());
    }

    #[test]
    fn level_zero_is_explained() {
        let address = Address::new("1 Test St")
            .with_property_type(PropertyType::Multi)
            .with_unit_number(Some("3".into()))
            .with_level(Some(0));
        let errors = validate_address(&address, AddressSide::Drop).expect_err("level 0");
        assert_eq!(
            errors.messages(),
            vec!["Level must be 1 or higher (ground floor is 1)".to_string()]
        );
    }

    #[test]
    fn ground_floor_unit_needs_no_lift_answer() {
        let address = Address::new("1 Test St")
            .with_property_type(PropertyType::Multi)
            .with_unit_number(Some("1".into()))
            .with_level(Some(1));
        assert!(validate_address(&address, AddressSide::Drop).is_ok());
    }

    #[test]
    fn item_weight_bounds() {
        let heavy = Item::new("Safe", Category::Other).with_weight(20_000.0);
        let errors = validate_item(&heavy).expect_err("too heavy");
        assert_eq!(errors.messages(), vec!["Weight cannot exceed 10,000 kg".to_string()]);

        let zero = Item::new("Safe", Category::Other).with_weight(0.0).with_quantity(0);
        let errors = validate_item(&zero).expect_err("zero values");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn custom_item_reports_all_missing_fields_together() {
        let form = CustomItemForm {
            quantity: "0".into(),
            width: "-3".into(),
            ..CustomItemForm::new()
        };
        let errors = form.validate().expect_err("empty form");
        let messages = errors.messages();
        assert!(messages.contains(&"Item name is required".to_string()));
        assert!(messages.contains(&"Weight is required".to_string()));
        assert!(messages.contains(&"Quantity must be at least 1".to_string()));
        assert!(messages.contains(&"Length is required".to_string()));
        assert!(messages.contains(&"Width must be a positive number".to_string()));
        assert!(messages.contains(&"Height is required".to_string()));
        assert_eq!(messages.len(), 6);
    }

    #[test]
    fn custom_item_builds_item() {
        let form = CustomItemForm {
            weight: "80".into(),
            length: "150".into(),
            width: "60".into(),
            height: "130".into(),
            quantity: "2".into(),
            ..CustomItemForm::prefilled("Piano")
        };
        let item = form.validate().expect("valid form");
        assert_eq!(item.name, "Piano");
        assert_eq!(item.category, Category::Other);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.weight, Some(80.0));
        assert_eq!(item.dimensions.map(|d| d.height), Some(130.0));
    }

    #[test]
    fn order_errors_are_union_of_parts() {
        let errors = validate_order(&OrderDraft::default()).expect_err("empty draft");
        assert!(!errors.for_path("pickupAddress.formatted_address").is_empty());
        assert!(!errors.for_path("pickupAddress.pickupDateTime").is_empty());
        assert!(!errors.for_path("dropAddress.formatted_address").is_empty());
        assert!(!errors.for_path("items").is_empty());
        assert!(!errors.for_path("pickupContacts").is_empty());
        assert!(!errors.for_path("dropContacts").is_empty());
    }

    #[test]
    fn nested_paths_keep_indexes() {
        let mut draft = OrderDraft::default();
        draft.items.push(Item::new("X", Category::Other));
        let errors = validate_order(&draft).expect_err("invalid draft");
        assert_eq!(errors.for_path("items[0].name").len(), 1);
    }
}
