use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::cli::ConfigAction;
use crate::config::{BoardConfig, DEFAULT_CONFIG_FILE};

pub struct ConfigCommand {
    pub action: ConfigAction,
    pub path: Option<PathBuf>,
}

impl ConfigCommand {
    pub fn new(action: ConfigAction, path: Option<PathBuf>) -> Self {
        Self { action, path }
    }

    pub fn execute(&self, config: &BoardConfig) -> Result<()> {
        match self.action {
            ConfigAction::Init { force } => {
                let path = self
                    .path
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
                write_default_config(&path, force)?;
                println!("⚙️  Wrote default configuration to {}", path.display());
                Ok(())
            }
            ConfigAction::Show => {
                print!("{}", toml::to_string_pretty(config)?);
                Ok(())
            }
        }
    }
}

pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    BoardConfig::default().save_to_file(path)
}
