use film_atlas::utils::validation::Validate;
use film_atlas::{
    AtlasEngine, AtlasPipeline, ConfigProvider, FileResolver, LocalStorage, TomlConfig,
};
use tempfile::TempDir;

#[tokio::test]
async fn test_toml_job_file_drives_a_cache_run() {
    let temp_dir = TempDir::new().unwrap();
    let base = temp_dir.path().to_str().unwrap().to_string();

    std::fs::write(
        temp_dir.path().join("locations.list"),
        "Alpha (1999)\tLondon, UK\n",
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("world.json"),
        r#"{"features": [{"properties": {"NAME": "United Kingdom", "POP2005": 60000000}}]}"#,
    )
    .unwrap();
    std::fs::write(
        temp_dir.path().join("geocodes.list"),
        "Alpha \t-0.1278\t51.5074\n",
    )
    .unwrap();

    let job = temp_dir.path().join("job.toml");
    std::fs::write(
        &job,
        r#"
[job]
name = "films-1999"
year = "1999"

[catalog]
path = "locations.list"

[geocoder]
cache_file = "geocodes.list"

[population]
path = "world.json"

[output]
path = "out"
"#,
    )
    .unwrap();

    let config = TomlConfig::from_file(&job).unwrap();
    config.validate().unwrap();
    assert_eq!(config.geocode_file(), Some("geocodes.list"));

    let storage = LocalStorage::new(base);
    let resolver = FileResolver::new(storage.clone(), "geocodes.list");
    let pipeline = AtlasPipeline::new(storage, config, Box::new(resolver));
    let engine = AtlasEngine::new(pipeline);

    let output_path = engine.run().await.unwrap();
    assert_eq!(output_path, "out/films_map_1999.zip");
    assert!(temp_dir.path().join("out/films_map_1999.zip").exists());
}
