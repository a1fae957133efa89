//! Household items being moved.

use std::fmt;

use serde::{de::Deserializer, Deserialize, Serialize};

use crate::catalog::Category;
use crate::common::{Displayable, NamedEntity};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum DimensionUnit {
    #[serde(rename = "mm")]
    Millimetre,
    #[default]
    #[serde(rename = "cm")]
    Centimetre,
    #[serde(rename = "m")]
    Metre,
    #[serde(rename = "in", alias = "inch")]
    Inch,
}

impl DimensionUnit {
    pub const ALL: [DimensionUnit; 4] = [
        DimensionUnit::Millimetre,
        DimensionUnit::Centimetre,
        DimensionUnit::Metre,
        DimensionUnit::Inch,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            DimensionUnit::Millimetre => "mm",
            DimensionUnit::Centimetre => "cm",
            DimensionUnit::Metre => "m",
            DimensionUnit::Inch => "in",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mm" => Some(Self::Millimetre),
            "cm" => Some(Self::Centimetre),
            "m" => Some(Self::Metre),
            "in" | "inch" | "inches" => Some(Self::Inch),
            _ => None,
        }
    }
}

impl fmt::Display for DimensionUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Dimensions {
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub unit: DimensionUnit,
}

impl Dimensions {
    pub fn new(length: f64, width: f64, height: f64, unit: DimensionUnit) -> Self {
        Self {
            length,
            width,
            height,
            unit,
        }
    }

    /// Parses the `L×W×Hunit` form produced by [`Dimensions`]'s `Display`.
    /// A plain `x` is accepted as the separator as well.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        let split_at = trimmed
            .char_indices()
            .rev()
            .take_while(|(_, ch)| ch.is_ascii_alphabetic())
            .last()
            .map(|(idx, _)| idx)?;
        let unit = DimensionUnit::parse(&trimmed[split_at..])?;
        let numbers: Vec<f64> = trimmed[..split_at]
            .split(['×', 'x', 'X'])
            .map(|part| part.trim().parse::<f64>())
            .collect::<Result<_, _>>()
            .ok()?;
        match numbers.as_slice() {
            [length, width, height] => Some(Self::new(*length, *width, *height, unit)),
            _ => None,
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}×{}×{}{}",
            self.length, self.width, self.height, self.unit
        )
    }
}

/// An entry in the order's item list. Items are keyed by `name`.
///
/// `weight` is always kilograms.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub name: String,
    pub category: Category,
    #[serde(
        default,
        deserialize_with = "deserialize_weight",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Dimensions>,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            weight: None,
            dimensions: None,
            quantity: 1,
            description: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_weight(mut self, weight_kg: f64) -> Self {
        self.weight = Some(weight_kg);
        self
    }

    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = Some(dimensions);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Combined weight of all units, when the unit weight is known.
    pub fn total_weight(&self) -> Option<f64> {
        self.weight.map(|w| w * f64::from(self.quantity))
    }
}

impl NamedEntity for Item {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Item {
    fn display_label(&self) -> String {
        let mut label = format!("{} × {}", self.quantity, self.name);
        if let Some(weight) = self.weight {
            label.push_str(&format!(" ({}kg", weight));
            if let Some(dimensions) = &self.dimensions {
                label.push_str(&format!(" - {}", dimensions));
            }
            label.push(')');
        }
        label
    }
}

/// Older snapshots stored weight as a decimal string; both forms load as kg.
fn deserialize_weight<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawWeight {
        Number(f64),
        Text(String),
    }

    match Option::<RawWeight>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawWeight::Number(value)) => Ok(Some(value)),
        Some(RawWeight::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(RawWeight::Text(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_display_and_parse_agree() {
        let dims = Dimensions::new(200.0, 90.0, 85.0, DimensionUnit::Centimetre);
        assert_eq!(dims.to_string(), "200×90×85cm");
        assert_eq!(Dimensions::parse("200×90×85cm"), Some(dims));
        assert_eq!(
            Dimensions::parse("1.2 x 0.6 x 0.75 m"),
            Some(Dimensions::new(1.2, 0.6, 0.75, DimensionUnit::Metre))
        );
        assert_eq!(Dimensions::parse("200×90cm"), None);
        assert_eq!(Dimensions::parse("200×90×85furlong"), None);
    }

    #[test]
    fn legacy_string_weight_loads_as_number() {
        let json = r#"{"name":"Box","category":"boxes","weight":"12.5","quantity":2}"#;
        let item: Item = serde_json::from_str(json).expect("parse item");
        assert_eq!(item.weight, Some(12.5));
        assert_eq!(item.total_weight(), Some(25.0));
    }

    #[test]
    fn inch_alias_is_accepted() {
        let unit: DimensionUnit = serde_json::from_str("\"inch\"").expect("parse unit");
        assert_eq!(unit, DimensionUnit::Inch);
    }
}
