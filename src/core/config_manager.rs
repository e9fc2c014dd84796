// src/core/config_manager.rs
//! Configuration: optional config.yaml, then environment overrides

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::chat_client::DEFAULT_BASE_URL;
use crate::core::FsOps;

const CONFIG_FILE: &str = "config.yaml";
const APP_DIR: &str = "resume-tailor";
const LOG_FILE: &str = "resume-tailor.log";

#[derive(Debug, Clone, PartialEq)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub service: ServiceConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EnvironmentConfig {
    /// Directory backing the key-value store.
    pub data_path: PathBuf,
    pub output_path: PathBuf,
    #[serde(default)]
    pub log_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ServiceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize)]
struct ConfigFile {
    local: FileSection,
    #[serde(default)]
    production: Option<FileSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct FileSection {
    #[serde(flatten)]
    environment: EnvironmentConfig,
    #[serde(default)]
    base_url: Option<String>,
}

impl ConfigManager {
    pub fn load() -> Result<Self> {
        let current_dir = std::env::current_dir().context("Failed to get current directory")?;
        let environment = Self::environment_name();
        info!("Loading configuration for environment: {}", environment);

        let config_path = current_dir.join(CONFIG_FILE);
        let mut config = if config_path.exists() {
            Self::from_file(&config_path, &environment, &current_dir)?
        } else {
            Self::defaults(&current_dir)
        };

        config.apply_overrides(|key| std::env::var(key).ok(), &current_dir);
        Ok(config)
    }

    fn environment_name() -> String {
        std::env::var("RESUME_TAILOR_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    pub fn defaults(current_dir: &Path) -> Self {
        let data_path = dirs::data_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| current_dir.join("data"));

        Self {
            environment: EnvironmentConfig {
                data_path,
                output_path: current_dir.join("out"),
                log_path: None,
            },
            service: ServiceConfig {
                base_url: DEFAULT_BASE_URL.to_string(),
            },
        }
    }

    fn from_file(path: &Path, environment: &str, current_dir: &Path) -> Result<Self> {
        let content = FsOps::read_file(path)?;
        Self::parse(&content, environment, current_dir)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Picks the `production` section when asked for and present, else `local`.
    pub fn parse(content: &str, environment: &str, current_dir: &Path) -> Result<Self> {
        let file: ConfigFile = serde_yaml::from_str(content)?;
        let section = match (environment, file.production) {
            ("production", Some(production)) => production,
            _ => file.local,
        };

        let env = section.environment;
        Ok(Self {
            environment: EnvironmentConfig {
                data_path: resolve(current_dir, &env.data_path),
                output_path: resolve(current_dir, &env.output_path),
                log_path: env.log_path.map(|p| resolve(current_dir, &p)),
            },
            service: ServiceConfig {
                base_url: section
                    .base_url
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            },
        })
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>, current_dir: &Path) {
        if let Some(dir) = var("RESUME_TAILOR_DATA_DIR") {
            self.environment.data_path = resolve(current_dir, Path::new(&dir));
        }
        if let Some(dir) = var("RESUME_TAILOR_OUTPUT_DIR") {
            self.environment.output_path = resolve(current_dir, Path::new(&dir));
        }
        if let Some(file) = var("RESUME_TAILOR_LOG") {
            self.environment.log_path = Some(resolve(current_dir, Path::new(&file)));
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.service.base_url = url;
        }
    }

    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.environment.data_path = dir;
        self
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.environment.output_path = dir;
        self
    }

    pub fn log_file(&self) -> PathBuf {
        self.environment
            .log_path
            .clone()
            .unwrap_or_else(|| self.environment.data_path.join(LOG_FILE))
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
