pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEOCODER_ENDPOINT: &str = "https://nominatim.openstreetmap.org/search";
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 2;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "film-atlas")]
#[command(about = "Aggregates a film location catalog into map-ready datasets")]
pub struct CliConfig {
    /// Catalog year to map, e.g. 1999
    #[arg(required_unless_present = "config")]
    pub year: Option<String>,

    #[arg(long, default_value = "locations.list")]
    pub catalog: String,

    #[arg(long, default_value = "world.json")]
    pub population: String,

    /// Precomputed coordinate cache; omit to query the live geocoder
    #[arg(long)]
    pub geocode_file: Option<String>,

    #[arg(long, default_value = DEFAULT_GEOCODER_ENDPOINT)]
    pub geocoder_endpoint: String,

    #[arg(long, default_value_t = DEFAULT_GEOCODER_TIMEOUT_SECS)]
    pub geocoder_timeout_secs: u64,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    /// TOML job file; replaces the flags above
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn year(&self) -> &str {
        self.year.as_deref().unwrap_or_default()
    }

    fn catalog_file(&self) -> &str {
        &self.catalog
    }

    fn population_file(&self) -> &str {
        &self.population
    }

    fn geocode_file(&self) -> Option<&str> {
        // empty input means the live service, as with no flag at all
        self.geocode_file.as_deref().filter(|name| !name.is_empty())
    }

    fn geocoder_endpoint(&self) -> &str {
        &self.geocoder_endpoint
    }

    fn geocoder_timeout_secs(&self) -> u64 {
        self.geocoder_timeout_secs
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_year("year", self.year())?;
        validation::validate_path("catalog", &self.catalog)?;
        validation::validate_path("population", &self.population)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_url("geocoder_endpoint", &self.geocoder_endpoint)?;
        validation::validate_positive_number("geocoder_timeout_secs", self.geocoder_timeout_secs, 1)?;

        if let Some(file) = self.geocode_file() {
            validation::validate_path("geocode_file", file)?;
        }

        Ok(())
    }
}
