pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    catalog::CatalogParser,
    density::{DensityColumn, DensityScale},
    etl::AtlasEngine,
    pipeline::AtlasPipeline,
    resolver::{FileResolver, LiveResolver},
};
pub use crate::domain::model::{Coordinate, CountryEntry};
pub use crate::domain::ports::{ConfigProvider, CoordinateResolver, Pipeline, Storage};
pub use crate::utils::error::{AtlasError, Result};
