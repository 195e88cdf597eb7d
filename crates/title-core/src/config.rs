use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_PATH: &str = "titlesmith.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_API_KEY is not set; export it or put `api_key` in {}", CONFIG_FILE_PATH)]
    MissingApiKey,
}

/// Runtime configuration, validated at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    /// Override for the Gemini API base URL (proxies, mock servers).
    pub api_base: Option<String>,
    /// Candidate models in priority order; the gateway default applies when
    /// absent.
    pub model_priority: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    api_base: Option<String>,
    #[serde(default)]
    model_priority: Option<Vec<String>>,
}

impl FileConfig {
    fn read(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring malformed {}: {}", path.display(), err);
                Self::default()
            }
        }
    }
}

impl Config {
    /// Load `titlesmith.toml` from the working directory when present, then
    /// apply environment overrides (`GEMINI_API_KEY`, `GEMINI_API_BASE`,
    /// `GEMINI_MODEL_PRIORITY`). A usable API key is mandatory.
    pub fn load() -> Result<Self, ConfigError> {
        let mut file = FileConfig::read(Path::new(CONFIG_FILE_PATH));

        if let Ok(api_key) = std::env::var("GEMINI_API_KEY") {
            file.api_key = Some(api_key);
        }
        if let Ok(api_base) = std::env::var("GEMINI_API_BASE") {
            file.api_base = Some(api_base);
        }
        if let Ok(models) = std::env::var("GEMINI_MODEL_PRIORITY") {
            file.model_priority = parse_model_list(&models);
        }

        let api_key = file
            .api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Config {
            api_key,
            api_base: file.api_base,
            model_priority: file.model_priority,
        })
    }
}

fn parse_model_list(value: &str) -> Option<Vec<String>> {
    let models: Vec<String> = value
        .split(',')
        .map(str::trim)
        .filter(|model| !model.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        None
    } else {
        Some(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn parse_model_list_trims_and_drops_empties() {
        let models = parse_model_list(" gemini-2.5-flash , gemini-2.5-pro ,,").unwrap();
        assert_eq!(models, vec!["gemini-2.5-flash", "gemini-2.5-pro"]);
    }

    #[test]
    fn parse_model_list_rejects_blank_input() {
        assert!(parse_model_list("").is_none());
        assert!(parse_model_list(" , ,").is_none());
    }

    #[test]
    fn file_config_parses_all_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "api_key = \"k\"\napi_base = \"http://localhost:9\"\nmodel_priority = [\"a\", \"b\"]"
        )
        .unwrap();

        let config = FileConfig::read(file.path());
        assert_eq!(config.api_key.as_deref(), Some("k"));
        assert_eq!(config.api_base.as_deref(), Some("http://localhost:9"));
        assert_eq!(config.model_priority, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = FileConfig::read(Path::new("definitely-not-here.toml"));
        assert!(config.api_key.is_none());
        assert!(config.api_base.is_none());
        assert!(config.model_priority.is_none());
    }

    #[test]
    fn malformed_file_yields_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "api_key = [not toml").unwrap();

        let config = FileConfig::read(file.path());
        assert!(config.api_key.is_none());
    }
}
