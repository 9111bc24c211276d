use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Film titles aggregated per location string, in catalog order.
pub type LocationIndex = IndexMap<String, Vec<String>>;

/// Film titles aggregated per resolved coordinate, in resolution order.
pub type CoordinateIndex = IndexMap<Coordinate, Vec<String>>;

/// Canonical country name -> population and film count.
pub type CountryTable = IndexMap<String, CountryEntry>;

/// A resolved geographic position. Failed lookups all share the one
/// `Unknown` value; there is never a half-known pair.
#[derive(Debug, Clone, Copy)]
pub enum Coordinate {
    Point { lat: f64, lng: f64 },
    Unknown,
}

impl Coordinate {
    pub fn point(lat: f64, lng: f64) -> Self {
        Coordinate::Point { lat, lng }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Coordinate::Point { .. })
    }

    pub fn lat(&self) -> Option<f64> {
        match self {
            Coordinate::Point { lat, .. } => Some(*lat),
            Coordinate::Unknown => None,
        }
    }

    pub fn lng(&self) -> Option<f64> {
        match self {
            Coordinate::Point { lng, .. } => Some(*lng),
            Coordinate::Unknown => None,
        }
    }
}

// The merge key is the exact bit pattern of the pair. Two lookups that
// disagree in the last ulp stay separate entries.
impl PartialEq for Coordinate {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Coordinate::Point { lat: a, lng: b }, Coordinate::Point { lat: c, lng: d }) => {
                a.to_bits() == c.to_bits() && b.to_bits() == d.to_bits()
            }
            (Coordinate::Unknown, Coordinate::Unknown) => true,
            _ => false,
        }
    }
}

impl Eq for Coordinate {}

impl Hash for Coordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Coordinate::Point { lat, lng } => {
                state.write_u8(1);
                state.write_u64(lat.to_bits());
                state.write_u64(lng.to_bits());
            }
            Coordinate::Unknown => state.write_u8(0),
        }
    }
}

/// Last tab-separated field of a catalog line. A leading `(` marks a
/// categorical tag such as `(TV)`; the real location then sits one
/// field earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailingField {
    Tag(String),
    Location(String),
}

impl TrailingField {
    pub fn classify(raw: &str) -> Self {
        if raw.starts_with('(') {
            TrailingField::Tag(raw.to_string())
        } else {
            TrailingField::Location(raw.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CountryEntry {
    pub population: f64,
    pub film_count: u64,
}

impl CountryEntry {
    pub fn new(population: f64) -> Self {
        Self {
            population,
            film_count: 0,
        }
    }
}

/// Everything the extract phase hands to transform.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub films: LocationIndex,
    pub countries: CountryTable,
}

/// Everything the transform phase hands to load.
#[derive(Debug, Clone)]
pub struct AtlasResult {
    pub locations: LocationIndex,
    pub coordinates: CoordinateIndex,
    pub countries: Vec<CountryRow>,
}

/// One row of the produced countries.json dataset.
#[derive(Debug, Clone, Serialize)]
pub struct CountryRow {
    pub name: String,
    pub population: f64,
    pub films: u64,
    pub population_opacity: f64,
    pub films_opacity: f64,
}

/// One row of the produced coordinates.json dataset. The unknown
/// bucket serializes with null components so the renderer can skip it.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateRow {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub films: Vec<String>,
}

impl CoordinateRow {
    pub fn from_entry(coordinate: Coordinate, films: Vec<String>) -> Self {
        Self {
            lat: coordinate.lat(),
            lng: coordinate.lng(),
            films,
        }
    }
}
