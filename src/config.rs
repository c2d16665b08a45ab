//! Configuration management for the resume analyzer

use crate::error::{Result, ResumeAnalyzerError};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub llm: LlmConfig,
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub server: ServerConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Gemini API key; `GEMINI_API_KEY` overrides it
    #[serde(default)]
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub mode: PromptMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub top_keywords: usize,
    pub include_adjectives: bool,
    pub max_missing_skills: usize,
    /// How many keywords per document are quoted in the detailed prompt
    pub prompt_keyword_count: usize,
    /// Optional TOML skill catalog replacing the built-in one
    #[serde(default)]
    pub skill_catalog: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

/// Which prompt is sent to the LLM and how its reply is read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptMode {
    /// Free-text review with fixed headings
    General,
    /// NLP summary plus a JSON reply schema
    Detailed,
}

impl PromptMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptMode::General => "general",
            PromptMode::Detailed => "detailed",
        }
    }
}

impl std::str::FromStr for PromptMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "general" => Ok(PromptMode::General),
            "detailed" => Ok(PromptMode::Detailed),
            _ => Err(format!("Invalid analysis mode: {}. Supported: general, detailed", s)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let db_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("resume-analyzer")
            .join("resume_analyzer.db");

        Self {
            llm: LlmConfig {
                api_key: None,
                model: "gemini-1.5-flash".to_string(),
                base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                timeout_secs: 120,
                max_retries: 3,
                mode: PromptMode::Detailed,
            },
            database: DatabaseConfig {
                url: format!("sqlite://{}", db_path.display()),
            },
            analysis: AnalysisConfig {
                top_keywords: 20,
                include_adjectives: true,
                max_missing_skills: 3,
                prompt_keyword_count: 5,
                skill_catalog: None,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
            },
        }
    }
}

impl Config {
    /// Load from the default location, creating it with defaults when absent
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            toml::from_str::<Config>(&content)
                .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to parse config: {}", e)))?
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            config
        };

        dotenvy::dotenv().ok();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Environment variables win over the file: `GEMINI_API_KEY`, `DATABASE_URL`, `PORT`
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty()) {
            debug!("Using GEMINI_API_KEY from environment");
            self.llm.api_key = Some(key);
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse::<u16>()
                .map_err(|_| ResumeAnalyzerError::Configuration(format!("PORT must be a valid port number, got '{}'", port)))?;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ResumeAnalyzerError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("resume-analyzer")
            .join("config.toml")
    }

    /// The API key, if one is configured and non-blank
    pub fn api_key(&self) -> Option<&str> {
        self.llm
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config_round_trips_through_toml() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.llm.model, "gemini-1.5-flash");
        assert_eq!(parsed.analysis.top_keywords, 20);
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.llm.mode, PromptMode::Detailed);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("GEMINI_API_KEY", "secret"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("PORT", "9090"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config
            .apply_env_overrides(|k| vars.get(k).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.api_key(), Some("secret"));
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|k| (k == "PORT").then(|| "not-a-port".to_string()));
        assert!(matches!(result, Err(ResumeAnalyzerError::Configuration(_))));
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let mut config = Config::default();
        config.llm.api_key = Some("   ".to_string());
        assert!(config.api_key().is_none());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();

        assert!(path.exists());
        assert_eq!(config.analysis.max_missing_skills, 3);
    }

    #[test]
    fn test_prompt_mode_parsing() {
        assert_eq!("general".parse::<PromptMode>().unwrap(), PromptMode::General);
        assert_eq!("DETAILED".parse::<PromptMode>().unwrap(), PromptMode::Detailed);
        assert!("fancy".parse::<PromptMode>().is_err());
    }
}
