//! Pickup and drop address model.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::Displayable;

/// Dwelling kind of an address. Multi-unit properties carry unit and level details.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Single,
    Multi,
}

impl PropertyType {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" | "house" => Some(Self::Single),
            "multi" | "unit" | "apartment" => Some(Self::Multi),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PropertyType::Single => "single",
            PropertyType::Multi => "multi",
        };
        f.write_str(label)
    }
}

/// Identifies which end of the move an address or contact list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddressSide {
    Pickup,
    Drop,
}

impl AddressSide {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pickup" | "shipper" | "from" => Some(Self::Pickup),
            "drop" | "dropoff" | "consignee" | "to" => Some(Self::Drop),
            _ => None,
        }
    }
}

impl fmt::Display for AddressSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AddressSide::Pickup => "pickup",
            AddressSide::Drop => "drop",
        };
        f.write_str(label)
    }
}

/// A pickup or drop location as captured by the intake form.
///
/// Levels are numbered from 1 (ground floor). `has_lift` stays `None` until the
/// user answers, which is how "not answered yet" is told apart from "no lift".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "formatted_address", alias = "formattedAddress", default)]
    pub formatted_address: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub has_driveway: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_lift: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickup_date_time: Option<NaiveDateTime>,
}

impl Address {
    pub fn new(formatted_address: impl Into<String>) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            ..Self::default()
        }
    }

    /// Returns `true` once a non-blank formatted address is present.
    pub fn is_selected(&self) -> bool {
        !self.formatted_address.trim().is_empty()
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.lat?, self.lng?))
    }

    /// A lift answer is only asked for multi-unit properties above the ground floor.
    pub fn needs_lift_answer(&self) -> bool {
        self.property_type == PropertyType::Multi && self.level.map(|l| l > 1).unwrap_or(false)
    }

    /// Free-text entry. Coordinates from an earlier lookup no longer apply.
    pub fn with_manual_text(mut self, text: impl Into<String>) -> Self {
        self.formatted_address = text.into();
        self.lat = None;
        self.lng = None;
        self
    }

    /// Applies a resolved place from the address provider.
    pub fn with_place(mut self, formatted_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        self.formatted_address = formatted_address.into();
        self.lat = Some(lat);
        self.lng = Some(lng);
        self
    }

    /// Switching property type always clears the multi-unit details.
    pub fn with_property_type(mut self, property_type: PropertyType) -> Self {
        self.property_type = property_type;
        self.unit_number = None;
        self.level = None;
        self.has_lift = None;
        self
    }

    /// Dropping to level 1 or below discards a previous lift answer.
    pub fn with_level(mut self, level: Option<u32>) -> Self {
        self.level = level;
        if level.map(|l| l <= 1).unwrap_or(true) {
            self.has_lift = None;
        }
        self
    }

    pub fn with_unit_number(mut self, unit_number: Option<String>) -> Self {
        self.unit_number = unit_number.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_lift(mut self, has_lift: Option<bool>) -> Self {
        self.has_lift = has_lift;
        self
    }

    pub fn with_driveway(mut self, has_driveway: bool) -> Self {
        self.has_driveway = has_driveway;
        self
    }

    pub fn with_notes(mut self, notes: Option<String>) -> Self {
        self.notes = notes.filter(|value| !value.trim().is_empty());
        self
    }

    pub fn with_pickup_date_time(mut self, when: Option<NaiveDateTime>) -> Self {
        self.pickup_date_time = when;
        self
    }
}

impl Displayable for Address {
    fn display_label(&self) -> String {
        if !self.is_selected() {
            return "Not selected".into();
        }
        match (&self.property_type, &self.unit_number) {
            (PropertyType::Multi, Some(unit)) => format!("Unit {}, {}", unit, self.formatted_address),
            _ => self.formatted_address.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_type_change_clears_multi_details() {
        let address = Address::new("1 Test St")
            .with_property_type(PropertyType::Multi)
            .with_unit_number(Some("4".into()))
            .with_level(Some(3))
            .with_lift(Some(true))
            .with_property_type(PropertyType::Single);

        assert_eq!(address.unit_number, None);
        assert_eq!(address.level, None);
        assert_eq!(address.has_lift, None);
    }

    #[test]
    fn lowering_level_discards_lift_answer() {
        let address = Address::new("1 Test St")
            .with_property_type(PropertyType::Multi)
            .with_level(Some(5))
            .with_lift(Some(false));
        assert!(address.needs_lift_answer());

        let lowered = address.with_level(Some(1));
        assert_eq!(lowered.has_lift, None);
        assert!(!lowered.needs_lift_answer());
    }

    #[test]
    fn manual_text_drops_coordinates() {
        let address = Address::default()
            .with_place("10 George St, Sydney", -33.86, 151.2)
            .with_manual_text("10 George Street");
        assert_eq!(address.coordinates(), None);
        assert_eq!(address.formatted_address, "10 George Street");
    }

    #[test]
    fn serializes_with_original_field_names() {
        let address = Address::new("1 Test St").with_driveway(true);
        let json = serde_json::to_value(&address).expect("serialize address");
        assert_eq!(json["formatted_address"], "1 Test St");
        assert_eq!(json["propertyType"], "single");
        assert_eq!(json["hasDriveway"], true);
        assert!(json.get("hasLift").is_none());
    }
}
