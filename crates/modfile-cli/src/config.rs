use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub colored: bool,

    #[serde(default)]
    pub format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colored: true,
            format: OutputFormat::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Load config from .modfilerc (TOML format)
    pub fn load() -> Result<Self> {
        let config_paths = [
            PathBuf::from(".modfilerc"),
            PathBuf::from(".modfilerc.toml"),
            PathBuf::from(".config/modfilerc"),
        ];

        for path in config_paths {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Config::default())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(config)
    }

    /// Merge CLI arguments into config
    pub fn merge_cli_args(&mut self, format: Option<OutputFormat>, no_color: bool) {
        if let Some(format) = format {
            self.format = format;
        }

        if no_color {
            self.colored = false;
        }
    }
}
