use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IngestError, Result};

pub const CONFIG_PATH_ENV: &str = "DEAL_INGEST_CONFIG";
pub const LOG_DIR_ENV: &str = "DEAL_INGEST_LOG_DIR";
pub const LOG_FILTER_ENV: &str = "DEAL_INGEST_LOG_FILTER";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub ingest: IngestSettings,
    pub export: ExportSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
    /// `EnvFilter` directives used when RUST_LOG is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "deal_ingest.log".to_string(),
            filter: "deal_ingest=info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// JSON column mapping applied instead of the heuristic suggestion
    pub mapping_file: Option<PathBuf>,
    /// JSON founder override lists keyed by record id
    pub founder_overrides_file: Option<PathBuf>,
    pub extract_founders: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: PathBuf,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("exports"),
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, then `DEAL_INGEST_CONFIG`,
    /// then built-in defaults. Environment overrides are applied last.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_PATH_ENV).ok().map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            IngestError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(dir) = std::env::var(LOG_DIR_ENV) {
            self.logging.directory = PathBuf::from(dir);
        }
        if let Ok(filter) = std::env::var(LOG_FILTER_ENV) {
            self.logging.filter = filter;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config.logging.file_name, "deal_ingest.log");
        assert!(!config.ingest.extract_founders);
        assert!(config.ingest.mapping_file.is_none());
        assert_eq!(config.export.output_dir, PathBuf::from("exports"));
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = Config::from_toml(
            r#"
            [ingest]
            mapping_file = "mapping.json"
            extract_founders = true

            [logging]
            filter = "deal_ingest=debug"
            "#,
        )
        .unwrap();

        assert_eq!(config.ingest.mapping_file, Some(PathBuf::from("mapping.json")));
        assert!(config.ingest.extract_founders);
        assert_eq!(config.logging.filter, "deal_ingest=debug");
        assert_eq!(config.logging.directory, PathBuf::from("logs"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[export]\noutput_dir = \"/tmp/out\"").unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.export.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = Config::from_file(Path::new("/nonexistent/deal_ingest.toml")).unwrap_err();
        assert!(matches!(err, IngestError::Config(_)));
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let err = Config::from_toml("[ingest\nextract_founders = ").unwrap_err();
        assert!(matches!(err, IngestError::Toml(_)));
    }
}
