use crate::domain::ports::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

pub struct AtlasEngine<P: Pipeline> {
    pipeline: P,
    monitor: RunMonitor,
}

impl<P: Pipeline> AtlasEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: RunMonitor::new(enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Extracting catalog and population data...");
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted {} locations across {} countries",
            snapshot.films.len(),
            snapshot.countries.len()
        );
        self.monitor.log_phase("Extract");

        tracing::info!("Resolving coordinates...");
        let result = self.pipeline.transform(snapshot).await?;
        tracing::info!("Resolved {} coordinate buckets", result.coordinates.len());
        self.monitor.log_phase("Transform");

        tracing::info!("Writing map datasets...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Output saved to: {}", output_path);
        self.monitor.log_phase("Load");

        self.monitor.log_summary();
        Ok(output_path)
    }
}
