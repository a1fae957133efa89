//! Address autocomplete seam with manual fallback.

use intake_domain::Address;
use thiserror::Error;
use tracing::{debug, warn};

/// A place the provider resolved typed text to.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub formatted_address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl Place {
    pub fn new(formatted_address: impl Into<String>, lat: f64, lng: f64) -> Self {
        Self {
            formatted_address: formatted_address.into(),
            lat: Some(lat),
            lng: Some(lng),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ProviderError {
    #[error("Address lookup unavailable: {0}")]
    Unavailable(String),
    #[error("No place matches '{0}'")]
    NoMatch(String),
}

pub trait AddressProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn search(&self, text: &str) -> Result<Place, ProviderError>;
}

/// Fixed list of known places; matches on a case-insensitive substring.
#[derive(Debug, Clone, Default)]
pub struct StaticPlaces {
    places: Vec<Place>,
}

impl StaticPlaces {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// A handful of Sydney-area places, enough to exercise distance derivation.
    pub fn sydney() -> Self {
        Self::new(vec![
            Place::new("1 Martin Place, Sydney NSW 2000", -33.8675, 151.2101),
            Place::new("Bondi Beach, Bondi NSW 2026", -33.8908, 151.2743),
            Place::new("Church Street, Parramatta NSW 2150", -33.8150, 151.0011),
            Place::new("The Corso, Manly NSW 2095", -33.7991, 151.2864),
            Place::new("Crown Street, Wollongong NSW 2500", -34.4248, 150.8931),
            Place::new("Hunter Street, Newcastle NSW 2300", -32.9267, 151.7789),
        ])
    }
}

impl AddressProvider for StaticPlaces {
    fn name(&self) -> &'static str {
        "static"
    }

    fn search(&self, text: &str) -> Result<Place, ProviderError> {
        let needle = text.trim().to_lowercase();
        if needle.is_empty() {
            return Err(ProviderError::NoMatch(text.to_string()));
        }
        self.places
            .iter()
            .find(|place| place.formatted_address.to_lowercase().contains(&needle))
            .cloned()
            .ok_or_else(|| ProviderError::NoMatch(text.trim().to_string()))
    }
}

/// Provider that never resolves; the typed text is used as is.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualEntry;

impl AddressProvider for ManualEntry {
    fn name(&self) -> &'static str {
        "manual"
    }

    fn search(&self, _text: &str) -> Result<Place, ProviderError> {
        Err(ProviderError::Unavailable("manual entry only".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    Provider,
    Manual,
    ProviderUnavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub address: Address,
    pub source: AddressSource,
}

/// Resolves `text` through `provider`, falling back to free text.
///
/// A resolved place sets coordinates; any provider failure keeps the other
/// fields of `base` and drops its coordinates.
pub fn resolve_address(provider: &dyn AddressProvider, base: &Address, text: &str) -> Resolution {
    match provider.search(text) {
        Ok(place) => {
            debug!(provider = provider.name(), place = %place.formatted_address, "place changed");
            let address = match (place.lat, place.lng) {
                (Some(lat), Some(lng)) => base.clone().with_place(place.formatted_address, lat, lng),
                _ => base.clone().with_manual_text(place.formatted_address),
            };
            Resolution {
                address,
                source: AddressSource::Provider,
            }
        }
        Err(ProviderError::NoMatch(_)) => Resolution {
            address: base.clone().with_manual_text(text.trim()),
            source: AddressSource::Manual,
        },
        Err(err @ ProviderError::Unavailable(_)) => {
            if provider.name() != "manual" {
                warn!(provider = provider.name(), %err, "falling back to manual address entry");
            }
            Resolution {
                address: base.clone().with_manual_text(text.trim()),
                source: AddressSource::ProviderUnavailable,
            }
        }
    }
}
