use anyhow::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::board::{StageGraph, TransitionRule};

pub const DEFAULT_CONFIG_FILE: &str = "blockboard.toml";

/// Main configuration structure for Blockboard
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct BoardConfig {
    /// Snapshot storage settings
    pub storage: StorageConfig,
    /// Log output settings
    pub logging: LoggingConfig,
    /// Stages and allowed transitions for new boards
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Persist the board between runs
    pub enabled: bool,
    /// Where the JSON snapshot lives
    pub snapshot_path: PathBuf,
    /// How long to wait for another process holding the board lock
    pub lock_timeout_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Filter directive, e.g. "info" or "blockboard=debug"
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkflowConfig {
    /// Ordered stage names; new blocks start in the first one
    pub stages: Vec<String>,
    pub transitions: Vec<TransitionRule>,
}

impl WorkflowConfig {
    pub fn stage_graph(&self) -> Result<StageGraph> {
        Ok(StageGraph::new(self.stages.clone(), &self.transitions)?)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            snapshot_path: PathBuf::from(".blockboard/board.json"),
            lock_timeout_ms: 2000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        let graph = StageGraph::default();
        Self {
            stages: graph.stages().to_vec(),
            transitions: graph.rules(),
        }
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            workflow: WorkflowConfig::default(),
        }
    }
}

impl BoardConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Default values
    /// 2. blockboard.toml in the working directory
    /// 3. An explicit config file
    /// 4. Environment variables (prefixed with BLOCKBOARD_, nested with __)
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&BoardConfig::default())?);

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
        }

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BLOCKBOARD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: BoardConfig = builder.build()?.try_deserialize()?;

        // Fail at startup rather than on the first move
        config.workflow.stage_graph()?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    /// Load .env file if it exists
    pub fn load_env_file() -> Result<()> {
        if Path::new(".env").exists() {
            dotenvy::dotenv()?;
            tracing::debug!("Loaded environment variables from .env file");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_workflow_builds_default_graph() {
        let config = BoardConfig::default();
        assert_eq!(config.workflow.stage_graph().unwrap(), StageGraph::default());
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("board.toml");
        std::fs::write(
            &path,
            r#"
[storage]
snapshot_path = "elsewhere/board.json"

[logging]
format = "json"

[workflow]
stages = ["Backlog", "Doing", "Shipped"]
transitions = [
    { from = "Backlog", to = ["Doing"] },
    { from = "Doing", to = ["Shipped", "Backlog"] },
]
"#,
        )
        .unwrap();

        let config = BoardConfig::load(Some(&path)).unwrap();
        assert_eq!(config.storage.snapshot_path, PathBuf::from("elsewhere/board.json"));
        assert!(config.storage.enabled);
        assert_eq!(config.logging.format, LogFormat::Json);

        let graph = config.workflow.stage_graph().unwrap();
        assert_eq!(graph.initial_stage(), "Backlog");
        assert!(graph.can_transition("Doing", "Backlog"));
        assert!(!graph.can_transition("Shipped", "Doing"));
    }

    #[test]
    fn test_invalid_workflow_is_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(
            &path,
            r#"
[workflow]
stages = ["A"]
transitions = [{ from = "A", to = ["B"] }]
"#,
        )
        .unwrap();

        assert!(BoardConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_save_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("saved.toml");
        let config = BoardConfig::default();
        config.save_to_file(&path).unwrap();

        let loaded = BoardConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.workflow, config.workflow);
        assert_eq!(loaded.storage, config.storage);
    }
}
