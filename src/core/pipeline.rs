use crate::core::catalog::CatalogParser;
use crate::core::density::{DensityColumn, DensityScale};
use crate::core::population;
use crate::domain::model::{AtlasResult, CatalogSnapshot, CoordinateRow, CountryRow};
use crate::domain::ports::{ConfigProvider, CoordinateResolver, Pipeline, Storage};
use crate::utils::error::{AtlasError, Result};
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

/// The one pipeline of this tool: catalog + population in, a zip of
/// map-ready datasets out. The coordinate resolution strategy is
/// injected.
pub struct AtlasPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    resolver: Box<dyn CoordinateResolver>,
}

impl<S: Storage, C: ConfigProvider> AtlasPipeline<S, C> {
    pub fn new(storage: S, config: C, resolver: Box<dyn CoordinateResolver>) -> Self {
        Self {
            storage,
            config,
            resolver,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for AtlasPipeline<S, C> {
    async fn extract(&self) -> Result<CatalogSnapshot> {
        tracing::debug!(
            "Reading population dataset from {}",
            self.config.population_file()
        );
        let population_bytes = self.storage.read_file(self.config.population_file()).await?;
        let mut countries = population::load_country_table(&population_bytes)?;

        tracing::debug!("Reading catalog from {}", self.config.catalog_file());
        let catalog_bytes = self.storage.read_file(self.config.catalog_file()).await?;
        let parser = CatalogParser::new(self.config.year());
        let films = parser.parse_bytes(&catalog_bytes, Some(&mut countries))?;

        Ok(CatalogSnapshot { films, countries })
    }

    async fn transform(&self, snapshot: CatalogSnapshot) -> Result<AtlasResult> {
        let coordinates = self.resolver.resolve(&snapshot.films).await?;
        tracing::info!(
            "Unique locations: {}, coordinates: {}",
            snapshot.films.len(),
            coordinates.len()
        );

        let population_scale = DensityScale::new(&snapshot.countries, DensityColumn::Population);
        let films_scale = DensityScale::new(&snapshot.countries, DensityColumn::FilmCount);

        let countries = snapshot
            .countries
            .iter()
            .map(|(name, entry)| CountryRow {
                name: name.clone(),
                population: entry.population,
                films: entry.film_count,
                population_opacity: population_scale.opacity(entry),
                films_opacity: films_scale.opacity(entry),
            })
            .collect();

        Ok(AtlasResult {
            locations: snapshot.films,
            coordinates,
            countries,
        })
    }

    async fn load(&self, result: AtlasResult) -> Result<String> {
        let AtlasResult {
            locations,
            coordinates,
            countries,
        } = result;

        let coordinate_rows: Vec<CoordinateRow> = coordinates
            .into_iter()
            .map(|(coordinate, films)| CoordinateRow::from_entry(coordinate, films))
            .collect();

        let metadata = serde_json::json!({
            "year": self.config.year(),
            "generated_at": chrono::Utc::now().to_rfc3339(),
            "locations": locations.len(),
            "coordinates": coordinate_rows.len(),
        });

        // the intermediate location aggregation, one line per location
        let mut tsv = csv::WriterBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_writer(Vec::new());
        for (location, titles) in &locations {
            let mut row = vec![location.as_str()];
            row.extend(titles.iter().map(String::as_str));
            tsv.write_record(row)?;
        }
        let tsv_data = tsv
            .into_inner()
            .map_err(|e| AtlasError::ProcessingError {
                message: format!("TSV flush failed: {}", e),
            })?;

        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("coordinates.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&coordinate_rows)?.as_bytes())?;

            zip.start_file::<_, ()>("countries.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&countries)?.as_bytes())?;

            zip.start_file::<_, ()>("locations.tsv", FileOptions::default())?;
            zip.write_all(&tsv_data)?;

            zip.start_file::<_, ()>("metadata.json", FileOptions::default())?;
            zip.write_all(serde_json::to_string_pretty(&metadata)?.as_bytes())?;

            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let archive_path = format!("{}/films_map_{}.zip", self.config.output_path(), self.config.year());
        tracing::debug!("Writing archive ({} bytes) to {}", zip_data.len(), archive_path);
        self.storage.write_file(&archive_path, &zip_data).await?;

        Ok(archive_path)
    }
}
