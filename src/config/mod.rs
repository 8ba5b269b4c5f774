use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::fs;
use tracing::{debug, info};

/// Dev-session description handed to the bridge by the build tool.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DevConfig {
    pub project: ProjectConfig,

    #[serde(default)]
    pub assets: AssetsConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProjectConfig {
    /// Project root reported over the build link.
    pub root: PathBuf,

    /// Artifact the application itself compiles to.
    pub artifact: PathBuf,

    /// Artifacts that change across reloads, resolved after `artifact`.
    #[serde(default)]
    pub changing_artifacts: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct AssetsConfig {
    /// Archive of packaged static assets.
    #[serde(default)]
    pub archive: PathBuf,

    /// Source asset directories served without packaging.
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_http_port")]
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
        }
    }
}

fn default_http_port() -> u16 {
    9000
}

impl DevConfig {
    pub async fn load(path: &str) -> Result<Self> {
        let expanded_path = shellexpand::tilde(path);
        info!("📄 Reading dev config from: {}", expanded_path);

        let content = fs::read_to_string(expanded_path.as_ref())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read config file '{}': {}", expanded_path, e))?;

        let config: DevConfig =
            toml::from_str(&content).map_err(|e| anyhow::anyhow!("Failed to parse config: {}", e))?;

        debug!(
            "📋 Dev config loaded: {} serving artifacts",
            config.serving_artifacts().len()
        );

        Ok(config)
    }

    /// Ordered artifact list served after a successful reload: the
    /// application artifact first, then the changing set, deduplicated.
    pub fn serving_artifacts(&self) -> Vec<PathBuf> {
        let mut artifacts = vec![self.project.artifact.clone()];

        for artifact in &self.project.changing_artifacts {
            if !artifacts.contains(artifact) {
                artifacts.push(artifact.clone());
            }
        }

        artifacts
    }
}
