use clap::Parser;
use film_atlas::utils::{logger, validation::Validate};
use film_atlas::{
    AtlasEngine, AtlasPipeline, CliConfig, ConfigProvider, CoordinateResolver, FileResolver,
    LiveResolver, LocalStorage, TomlConfig,
};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting film-atlas");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 可選的 TOML 工作檔取代 CLI 旗標
    match cli.config.clone() {
        Some(path) => {
            let config = TomlConfig::from_file(&path)?;
            run(config, monitor_enabled).await
        }
        None => run(cli, monitor_enabled).await,
    }
}

async fn run<C>(config: C, monitor_enabled: bool) -> anyhow::Result<()>
where
    C: ConfigProvider + Validate,
{
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    // 有快取檔就離線解析，否則逐筆查詢線上地理編碼服務
    let resolver: Box<dyn CoordinateResolver> = match config.geocode_file() {
        Some(file) => {
            tracing::info!("📂 Using coordinate cache: {}", file);
            Box::new(FileResolver::new(
                LocalStorage::new(".".to_string()),
                file.to_string(),
            ))
        }
        None => {
            tracing::info!("🌐 Using live geocoder: {}", config.geocoder_endpoint());
            Box::new(LiveResolver::new(
                config.geocoder_endpoint().to_string(),
                Duration::from_secs(config.geocoder_timeout_secs()),
            ))
        }
    };

    let storage = LocalStorage::new(".".to_string());
    let pipeline = AtlasPipeline::new(storage, config, resolver);
    let engine = AtlasEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Map datasets ready!");
            println!("✅ Map datasets ready!");
            println!("📁 Output saved to: {}", output_path);
            Ok(())
        }
        Err(e) => {
            tracing::error!("❌ Run failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    }
}
