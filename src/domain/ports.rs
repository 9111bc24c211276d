use crate::domain::model::{AtlasResult, CatalogSnapshot, CoordinateIndex, LocationIndex};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn year(&self) -> &str;
    fn catalog_file(&self) -> &str;
    fn population_file(&self) -> &str;
    /// `None` selects the live geocoding service.
    fn geocode_file(&self) -> Option<&str>;
    fn geocoder_endpoint(&self) -> &str;
    fn geocoder_timeout_secs(&self) -> u64;
    fn output_path(&self) -> &str;
}

/// Strategy seam for turning the location aggregation into a
/// coordinate aggregation. Implementations are injected into the
/// pipeline so tests can substitute deterministic fakes.
#[async_trait]
pub trait CoordinateResolver: Send + Sync {
    async fn resolve(&self, films: &LocationIndex) -> Result<CoordinateIndex>;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<CatalogSnapshot>;
    async fn transform(&self, snapshot: CatalogSnapshot) -> Result<AtlasResult>;
    async fn load(&self, result: AtlasResult) -> Result<String>;
}
