pub mod catalog;
pub mod density;
pub mod etl;
pub mod pipeline;
pub mod population;
pub mod resolver;

pub use crate::domain::model::{
    AtlasResult, CatalogSnapshot, Coordinate, CoordinateIndex, CountryEntry, CountryTable,
    LocationIndex,
};
pub use crate::domain::ports::{ConfigProvider, CoordinateResolver, Pipeline, Storage};
pub use crate::utils::error::Result;
