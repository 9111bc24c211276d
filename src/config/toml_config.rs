use crate::config::{DEFAULT_GEOCODER_ENDPOINT, DEFAULT_GEOCODER_TIMEOUT_SECS};
use crate::core::ConfigProvider;
use crate::utils::error::{AtlasError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: JobConfig,
    pub catalog: CatalogConfig,
    pub geocoder: Option<GeocoderConfig>,
    pub population: PopulationConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub year: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    pub endpoint: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub cache_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PopulationConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AtlasError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AtlasError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEOCODER_ENDPOINT})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn year(&self) -> &str {
        &self.job.year
    }

    fn catalog_file(&self) -> &str {
        &self.catalog.path
    }

    fn population_file(&self) -> &str {
        &self.population.path
    }

    fn geocode_file(&self) -> Option<&str> {
        self.geocoder
            .as_ref()
            .and_then(|g| g.cache_file.as_deref())
            .filter(|name| !name.is_empty())
    }

    fn geocoder_endpoint(&self) -> &str {
        self.geocoder
            .as_ref()
            .and_then(|g| g.endpoint.as_deref())
            .unwrap_or(DEFAULT_GEOCODER_ENDPOINT)
    }

    fn geocoder_timeout_secs(&self) -> u64 {
        self.geocoder
            .as_ref()
            .and_then(|g| g.timeout_seconds)
            .unwrap_or(DEFAULT_GEOCODER_TIMEOUT_SECS)
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_year("job.year", &self.job.year)?;
        validation::validate_path("catalog.path", &self.catalog.path)?;
        validation::validate_path("population.path", &self.population.path)?;
        validation::validate_path("output.path", &self.output.path)?;
        validation::validate_url("geocoder.endpoint", self.geocoder_endpoint())?;
        validation::validate_positive_number(
            "geocoder.timeout_seconds",
            self.geocoder_timeout_secs(),
            1,
        )?;

        if let Some(file) = self.geocode_file() {
            validation::validate_path("geocoder.cache_file", file)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
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
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job.name, "films-1999");
        assert_eq!(config.year(), "1999");
        assert_eq!(config.geocode_file(), Some("geocodes.list"));
        assert_eq!(config.geocoder_endpoint(), DEFAULT_GEOCODER_ENDPOINT);
        assert_eq!(config.geocoder_timeout_secs(), DEFAULT_GEOCODER_TIMEOUT_SECS);
    }

    #[test]
    fn test_missing_geocoder_section_selects_live_service() {
        let toml_content = r#"
[job]
name = "films-2000"
year = "2000"

[catalog]
path = "locations.list"

[population]
path = "world.json"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geocode_file(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TEST_GEOCODER_ENDPOINT", "https://geo.test/search");

        let toml_content = r#"
[job]
name = "films"
year = "1999"

[catalog]
path = "locations.list"

[geocoder]
endpoint = "${TEST_GEOCODER_ENDPOINT}"

[population]
path = "world.json"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.geocoder_endpoint(), "https://geo.test/search");

        std::env::remove_var("TEST_GEOCODER_ENDPOINT");
    }

    #[test]
    fn test_config_validation_rejects_bad_year() {
        let toml_content = r#"
[job]
name = "films"
year = "99"

[catalog]
path = "locations.list"

[population]
path = "world.json"

[output]
path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"
year = "1999"

[catalog]
path = "locations.list"

[population]
path = "world.json"

[output]
path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job.name, "file-test");
    }
}
