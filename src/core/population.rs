use crate::domain::model::{CountryEntry, CountryTable};
use crate::utils::encoding::{decode_lossy, strip_bom};
use crate::utils::error::Result;
use serde::Deserialize;

// Only the two properties the aggregation needs; geometry is never
// touched.
#[derive(Debug, Deserialize)]
struct WorldFile {
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    #[serde(default)]
    properties: Option<FeatureProperties>,
}

#[derive(Debug, Deserialize)]
struct FeatureProperties {
    #[serde(rename = "NAME")]
    name: String,
    #[serde(rename = "POP2005")]
    population: f64,
}

/// Builds the initial country table from the population dataset.
/// Features without properties are skipped; film counts start at zero.
pub fn load_country_table(bytes: &[u8]) -> Result<CountryTable> {
    let text = decode_lossy(strip_bom(bytes));
    let world: WorldFile = serde_json::from_str(&text)?;

    let mut table = CountryTable::new();
    for feature in world.features {
        if let Some(properties) = feature.properties {
            table.insert(properties.name, CountryEntry::new(properties.population));
        }
    }

    tracing::debug!("Loaded population data for {} countries", table.len());
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_country_table() {
        let data = br#"{
            "features": [
                {"properties": {"NAME": "Ukraine", "POP2005": 46481000, "ISO2": "UA"}},
                {"properties": null},
                {"properties": {"NAME": "France", "POP2005": 60991000}}
            ]
        }"#;

        let table = load_country_table(data).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table["Ukraine"].population, 46481000.0);
        assert_eq!(table["Ukraine"].film_count, 0);
        assert_eq!(table["France"].population, 60991000.0);
    }

    #[test]
    fn test_bom_is_stripped() {
        let mut data = vec![0xEF, 0xBB, 0xBF];
        data.extend_from_slice(br#"{"features": []}"#);

        assert!(load_country_table(&data).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_dataset_is_fatal() {
        assert!(load_country_table(b"not json").is_err());
    }
}
