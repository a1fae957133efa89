//! Static catalog of predefined household items, grouped by room category.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::item::{DimensionUnit, Dimensions, Item};

/// Room categories used to group catalog items.
///
/// `Other` holds custom items the user describes themselves; it has no
/// predefined entries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    LivingRoom,
    Bedroom,
    DiningRoom,
    Kitchen,
    Office,
    Laundry,
    Outdoor,
    Boxes,
    Other,
}

/// Display metadata attached to each category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryMeta {
    pub slug: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::LivingRoom,
        Category::Bedroom,
        Category::DiningRoom,
        Category::Kitchen,
        Category::Office,
        Category::Laundry,
        Category::Outdoor,
        Category::Boxes,
        Category::Other,
    ];

    pub fn meta(self) -> CategoryMeta {
        let (slug, label, icon) = match self {
            Category::LivingRoom => ("living-room", "Living Room", "couch"),
            Category::Bedroom => ("bedroom", "Bedroom", "bed"),
            Category::DiningRoom => ("dining-room", "Dining Room", "utensils"),
            Category::Kitchen => ("kitchen", "Kitchen", "blender"),
            Category::Office => ("office", "Office", "briefcase"),
            Category::Laundry => ("laundry", "Laundry", "shirt"),
            Category::Outdoor => ("outdoor", "Outdoor", "tree"),
            Category::Boxes => ("boxes", "Boxes", "box"),
            Category::Other => ("other", "Other", "circle-question"),
        };
        CategoryMeta { slug, label, icon }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        let needle = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|category| category.meta().slug == needle)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.meta().label)
    }
}

/// Template for a predefined item. Dimensions are centimetres, weight kilograms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogItem {
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

impl CatalogItem {
    const fn new(
        name: &'static str,
        category: Category,
        description: &'static str,
        (length, width, height): (f64, f64, f64),
        weight: f64,
    ) -> Self {
        Self {
            name,
            category,
            description,
            length,
            width,
            height,
            weight,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.length,
            self.width,
            self.height,
            DimensionUnit::Centimetre,
        )
    }

    /// Builds a single-quantity order item from the template.
    pub fn to_item(&self) -> Item {
        Item::new(self.name, self.category)
            .with_weight(self.weight)
            .with_dimensions(self.dimensions())
            .with_description(self.description)
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.description.to_lowercase().contains(needle)
    }
}

use Category::*;

pub static CATALOG: &[CatalogItem] = &[
    CatalogItem::new("3-Seater Sofa", LivingRoom, "Three seat fabric lounge", (210.0, 95.0, 85.0), 55.0),
    CatalogItem::new("2-Seater Sofa", LivingRoom, "Two seat lounge", (160.0, 90.0, 85.0), 40.0),
    CatalogItem::new("Armchair", LivingRoom, "Single upholstered chair", (90.0, 85.0, 95.0), 25.0),
    CatalogItem::new("Coffee Table", LivingRoom, "Low table", (120.0, 60.0, 45.0), 20.0),
    CatalogItem::new("TV Unit", LivingRoom, "Entertainment cabinet", (180.0, 45.0, 50.0), 35.0),
    CatalogItem::new("Television", LivingRoom, "Flat screen up to 65 inch", (150.0, 15.0, 90.0), 25.0),
    CatalogItem::new("Bookcase", LivingRoom, "Five shelf bookcase", (80.0, 30.0, 180.0), 30.0),
    CatalogItem::new("Queen Bed", Bedroom, "Queen frame with mattress", (210.0, 160.0, 110.0), 70.0),
    CatalogItem::new("Single Bed", Bedroom, "Single frame with mattress", (200.0, 95.0, 100.0), 40.0),
    CatalogItem::new("Wardrobe", Bedroom, "Double door wardrobe", (120.0, 60.0, 200.0), 80.0),
    CatalogItem::new("Chest of Drawers", Bedroom, "Five drawer chest", (80.0, 45.0, 120.0), 45.0),
    CatalogItem::new("Bedside Table", Bedroom, "Nightstand with drawer", (45.0, 40.0, 55.0), 10.0),
    CatalogItem::new("Dining Table", DiningRoom, "Six seat table", (180.0, 90.0, 75.0), 50.0),
    CatalogItem::new("Dining Chair", DiningRoom, "Upright chair", (45.0, 50.0, 95.0), 6.0),
    CatalogItem::new("Buffet", DiningRoom, "Sideboard cabinet", (160.0, 45.0, 85.0), 55.0),
    CatalogItem::new("Refrigerator", Kitchen, "Upright fridge freezer", (70.0, 70.0, 180.0), 85.0),
    CatalogItem::new("Microwave", Kitchen, "Countertop microwave oven", (50.0, 40.0, 30.0), 15.0),
    CatalogItem::new("Bar Stool", Kitchen, "Counter height stool", (40.0, 40.0, 75.0), 5.0),
    CatalogItem::new("Desk", Office, "Writing desk", (140.0, 70.0, 75.0), 35.0),
    CatalogItem::new("Office Chair", Office, "Swivel chair on castors", (65.0, 65.0, 110.0), 15.0),
    CatalogItem::new("Filing Cabinet", Office, "Four drawer metal cabinet", (47.0, 62.0, 132.0), 40.0),
    CatalogItem::new("Washing Machine", Laundry, "Front loading washer", (60.0, 60.0, 85.0), 70.0),
    CatalogItem::new("Dryer", Laundry, "Tumble dryer", (60.0, 60.0, 85.0), 35.0),
    CatalogItem::new("Outdoor Setting", Outdoor, "Table with four chairs", (150.0, 90.0, 75.0), 40.0),
    CatalogItem::new("Barbecue", Outdoor, "Hooded gas grill", (140.0, 60.0, 120.0), 60.0),
    CatalogItem::new("Lawn Mower", Outdoor, "Push mower", (140.0, 55.0, 100.0), 30.0),
    CatalogItem::new("Small Box", Boxes, "Books and heavy items", (40.0, 30.0, 30.0), 10.0),
    CatalogItem::new("Medium Box", Boxes, "Kitchenware and linen", (50.0, 40.0, 40.0), 15.0),
    CatalogItem::new("Large Box", Boxes, "Bulky light items", (60.0, 50.0, 50.0), 20.0),
];

/// Case-insensitive exact lookup by item name.
pub fn find_catalog_item(name: &str) -> Option<&'static CatalogItem> {
    let needle = name.trim().to_lowercase();
    CATALOG
        .iter()
        .find(|entry| entry.name.to_lowercase() == needle)
}

/// Catalog entries of a single category that matched a query.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    pub category: Category,
    pub items: Vec<&'a CatalogItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSearch<'a> {
    pub query: String,
    pub groups: Vec<CategoryGroup<'a>>,
    /// Offered as the custom item name when nothing in the catalog matched.
    pub custom_prefill: Option<String>,
}

impl CatalogSearch<'_> {
    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|group| group.items.len()).sum()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.groups.iter().map(|group| group.category).collect()
    }
}

/// Filters the built-in catalog.
pub fn search_catalog(query: &str) -> CatalogSearch<'static> {
    search_items(CATALOG, query)
}

/// Filters `items` by a case-insensitive substring of name or description.
/// Categories without a match are left out; an empty query matches everything.
pub fn search_items<'a>(items: &'a [CatalogItem], query: &str) -> CatalogSearch<'a> {
    let trimmed = query.trim();
    let needle = trimmed.to_lowercase();
    let groups: Vec<CategoryGroup<'a>> = Category::ALL
        .into_iter()
        .filter_map(|category| {
            let matches: Vec<&CatalogItem> = items
                .iter()
                .filter(|entry| entry.category == category)
                .filter(|entry| needle.is_empty() || entry.matches(&needle))
                .collect();
            if matches.is_empty() {
                None
            } else {
                Some(CategoryGroup {
                    category,
                    items: matches,
                })
            }
        })
        .collect();

    let custom_prefill = if groups.is_empty() && !trimmed.is_empty() {
        Some(trimmed.to_string())
    } else {
        None
    };

    CatalogSearch {
        query: trimmed.to_string(),
        groups,
        custom_prefill,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sofa_query_only_shows_living_room() {
        let result = search_catalog("sofa");
        assert_eq!(result.categories(), vec![Category::LivingRoom]);
        assert!(result
            .groups[0]
            .items
            .iter()
            .any(|entry| entry.name == "3-Seater Sofa"));
        assert_eq!(result.custom_prefill, None);
    }

    #[test]
    fn description_matches_count() {
        let result = search_catalog("FRIDGE");
        assert_eq!(result.categories(), vec![Category::Kitchen]);
        assert_eq!(result.match_count(), 1);
    }

    #[test]
    fn unmatched_query_becomes_custom_prefill() {
        let result = search_catalog("  Piano ");
        assert!(result.groups.is_empty());
        assert_eq!(result.custom_prefill.as_deref(), Some("Piano"));
    }

    #[test]
    fn empty_query_lists_every_populated_category() {
        let result = search_catalog("");
        assert_eq!(result.match_count(), CATALOG.len());
        assert!(!result.categories().contains(&Category::Other));
    }

    #[test]
    fn slugs_round_trip_through_serde() {
        for category in Category::ALL {
            let json = serde_json::to_string(&category).expect("serialize category");
            assert_eq!(json, format!("\"{}\"", category.meta().slug));
            assert_eq!(Category::from_slug(category.meta().slug), Some(category));
        }
    }

    #[test]
    fn catalog_item_converts_with_metric_details() {
        let item = find_catalog_item("refrigerator").expect("catalog entry").to_item();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.weight, Some(85.0));
        assert_eq!(
            item.dimensions.map(|d| d.unit),
            Some(DimensionUnit::Centimetre)
        );
    }
}
