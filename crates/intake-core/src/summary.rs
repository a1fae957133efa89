//! Read-only views derived from the draft: trip distance and the order summary.

use std::fmt;

use intake_domain::{Address, Displayable, Item, OrderDraft, PropertyType, Step};

use crate::validation::step_errors;

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in whole kilometres between two `(lat, lng)` points.
pub fn distance_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lng2) = (to.0.to_radians(), to.1.to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    (EARTH_RADIUS_KM * c).round()
}

/// Lines describing one address in the summary panel.
pub fn describe_address(address: &Address) -> Vec<String> {
    if !address.is_selected() {
        return vec!["Not selected".to_string()];
    }
    let mut lines = vec![address.formatted_address.clone()];
    if address.property_type == PropertyType::Multi {
        if let Some(unit) = &address.unit_number {
            lines.push(format!("Unit {}", unit));
        }
        if let Some(level) = address.level {
            lines.push(format!("Level {}", level));
        }
        match address.has_lift {
            Some(true) => lines.push("Has lift".to_string()),
            Some(false) => lines.push("No lift".to_string()),
            None => {}
        }
    }
    lines.push(if address.has_driveway {
        "Has driveway".to_string()
    } else {
        "No driveway".to_string()
    });
    if let Some(when) = address.pickup_date_time {
        lines.push(format!("Pickup {}", when.format("%Y-%m-%d %H:%M")));
    }
    if let Some(notes) = &address.notes {
        lines.push(format!("Notes: {}", notes));
    }
    lines
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepStatus {
    pub step: Step,
    pub complete: bool,
}

/// Snapshot of everything the summary panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub pickup: Vec<String>,
    pub drop: Vec<String>,
    pub distance_km: f64,
    pub total_items: u32,
    pub items: Vec<String>,
    pub steps: Vec<StepStatus>,
    pub can_submit: bool,
}

impl OrderSummary {
    pub fn from_draft(draft: &OrderDraft) -> Self {
        let steps: Vec<StepStatus> = Step::ALL
            .into_iter()
            .map(|step| StepStatus {
                step,
                complete: step_errors(draft, step).is_empty(),
            })
            .collect();
        let can_submit = steps.iter().all(|status| status.complete);
        Self {
            pickup: describe_address(&draft.pickup_address),
            drop: describe_address(&draft.drop_address),
            distance_km: draft.distance,
            total_items: draft.total_items(),
            items: draft.items.iter().map(Item::display_label).collect(),
            steps,
            can_submit,
        }
    }
}

impl fmt::Display for OrderSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pickup:")?;
        for line in &self.pickup {
            writeln!(f, "  {}", line)?;
        }
        writeln!(f, "Drop:")?;
        for line in &self.drop {
            writeln!(f, "  {}", line)?;
        }
        if self.distance_km > 0.0 {
            writeln!(f, "Distance: {} km", self.distance_km)?;
        }
        writeln!(f, "Items ({} total):", self.total_items)?;
        if self.items.is_empty() {
            writeln!(f, "  No items added")?;
        }
        for line in &self.items {
            writeln!(f, "  {}", line)?;
        }
        let progress: Vec<String> = self
            .steps
            .iter()
            .map(|status| {
                format!(
                    "{} [{}]",
                    status.step,
                    if status.complete { "x" } else { " " }
                )
            })
            .collect();
        writeln!(f, "Steps: {}", progress.join("  "))?;
        write!(
            f,
            "Submit: {}",
            if self.can_submit { "ready" } else { "blocked" }
        )
    }
}
