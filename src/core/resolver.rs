use crate::domain::model::{Coordinate, CoordinateIndex, LocationIndex};
use crate::domain::ports::{CoordinateResolver, Storage};
use crate::utils::encoding::decode_lossy;
use crate::utils::error::{AtlasError, Result};
use async_trait::async_trait;
use csv::ReaderBuilder;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Collision rule for the coordinate aggregation: title lists are
/// concatenated, never deduplicated.
fn merge_titles(
    result: &mut CoordinateIndex,
    coordinate: Coordinate,
    titles: impl IntoIterator<Item = String>,
) {
    result.entry(coordinate).or_default().extend(titles);
}

/// Resolves coordinates from a precomputed cache file of tab-separated
/// `title, longitude, latitude` lines.
pub struct FileResolver<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> FileResolver<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }
}

#[async_trait]
impl<S: Storage> CoordinateResolver for FileResolver<S> {
    async fn resolve(&self, films: &LocationIndex) -> Result<CoordinateIndex> {
        let bytes = self.storage.read_file(&self.file_name).await?;
        let text = decode_lossy(&bytes);

        // Secondary index: title -> owning locations. The primary
        // aggregation is keyed the other way around.
        let mut owners: HashMap<&str, Vec<&str>> = HashMap::new();
        for (location, titles) in films {
            for title in titles {
                owners
                    .entry(title.as_str())
                    .or_default()
                    .push(location.as_str());
            }
        }

        let mut result = CoordinateIndex::new();
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(b'\t')
            .quoting(false)
            .flexible(true)
            .from_reader(text.as_bytes());

        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let Some(title) = record.get(0) else { continue };
            let Some(locations) = owners.get(title) else {
                continue;
            };

            // cache field order is lng then lat
            let lng = parse_axis(&record, 1, index)?;
            let lat = parse_axis(&record, 2, index)?;
            let coordinate = Coordinate::point(lat, lng);

            for location in locations {
                if let Some(titles) = films.get(*location) {
                    merge_titles(&mut result, coordinate, titles.iter().cloned());
                }
            }
        }

        tracing::info!(
            "📂 Cache file mapped {} locations onto {} coordinates",
            films.len(),
            result.len()
        );
        Ok(result)
    }
}

fn parse_axis(record: &csv::StringRecord, field: usize, index: usize) -> Result<f64> {
    let raw = record
        .get(field)
        .ok_or_else(|| AtlasError::CacheFormatError {
            line: index + 1,
            message: format!("missing field {}", field + 1),
        })?;

    raw.trim()
        .parse::<f64>()
        .map_err(|e| AtlasError::CacheFormatError {
            line: index + 1,
            message: format!("'{}' is not a coordinate: {}", raw, e),
        })
}

// Nominatim-style responses carry the pair as strings.
#[derive(Debug, Deserialize)]
struct GeocodeHit {
    lat: String,
    lon: String,
}

/// Resolves coordinates against a live geocoding service, one request
/// at a time with a short per-request timeout. Lookups are never
/// retried; every failure lands in the shared unknown bucket and the
/// run continues.
pub struct LiveResolver {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl LiveResolver {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            timeout,
        }
    }

    async fn lookup(&self, location: &str) -> Result<Coordinate> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("q", location), ("format", "json"), ("limit", "1")])
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AtlasError::ProcessingError {
                message: format!("geocoder returned {}", response.status()),
            });
        }

        let hits: Vec<GeocodeHit> = response.json().await?;
        let Some(hit) = hits.first() else {
            return Err(AtlasError::ProcessingError {
                message: format!("no match for '{}'", location),
            });
        };

        let lat = parse_wire_axis("latitude", &hit.lat)?;
        let lng = parse_wire_axis("longitude", &hit.lon)?;
        Ok(Coordinate::point(lat, lng))
    }
}

fn parse_wire_axis(axis: &str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| AtlasError::ProcessingError {
            message: format!("bad {} '{}': {}", axis, raw, e),
        })
}

#[async_trait]
impl CoordinateResolver for LiveResolver {
    async fn resolve(&self, films: &LocationIndex) -> Result<CoordinateIndex> {
        let mut result = CoordinateIndex::new();

        for (location, titles) in films {
            let coordinate = match self.lookup(location).await {
                Ok(point) => point,
                Err(e) => {
                    tracing::debug!("🌐 Lookup failed for '{}': {}", location, e);
                    Coordinate::Unknown
                }
            };
            tracing::debug!("🌐 {} -> {:?} ({} films)", location, coordinate, titles.len());
            merge_titles(&mut result, coordinate, titles.iter().cloned());
        }

        tracing::info!(
            "🌐 Geocoder mapped {} locations onto {} coordinates",
            films.len(),
            result.len()
        );
        Ok(result)
    }
}
