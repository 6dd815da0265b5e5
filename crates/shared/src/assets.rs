//! Static map assets: boundary topology, content table and config.

use std::path::Path;
use std::sync::Arc;

use crate::config::MapConfig;
use crate::content::ContentTable;
use crate::error::{Error, Result};
use crate::models::BoundaryDataset;
use crate::topology::decode_topology;

pub const TOPOLOGY_FILE: &str = "taiwan.topo.json";
pub const CONTENT_FILE: &str = "intros.json";
pub const CONFIG_FILE: &str = "map_config.json";

#[derive(Debug, Clone)]
pub struct MapAssets {
    pub config: MapConfig,
    pub dataset: Arc<BoundaryDataset>,
    pub content: Arc<ContentTable>,
}

impl MapAssets {
    /// Parse all three files. A broken config is not fatal: it falls back to
    /// the defaults with a warning. Topology and content errors are returned.
    pub fn from_json_strs(topology: &str, content: &str, config: Option<&str>) -> Result<Self> {
        let config = match config.map(MapConfig::from_json_str) {
            Some(Ok(config)) => config,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Invalid map config, using defaults");
                MapConfig::default()
            }
            None => MapConfig::default(),
        };

        let dataset = decode_topology(topology, &config.topology_options())?;
        let content = ContentTable::from_json_str(content)?;

        tracing::info!(
            regions = dataset.len(),
            content = content.len(),
            "Loaded map assets"
        );

        Ok(MapAssets {
            config,
            dataset: Arc::new(dataset),
            content: Arc::new(content),
        })
    }

    /// Load from a directory. The config file is optional.
    pub fn load(assets_dir: &Path) -> Result<Self> {
        let topology = read(&assets_dir.join(TOPOLOGY_FILE))?;
        let content = read(&assets_dir.join(CONTENT_FILE))?;
        let config_path = assets_dir.join(CONFIG_FILE);
        let config = if config_path.exists() {
            Some(read(&config_path)?)
        } else {
            None
        };
        Self::from_json_strs(&topology, &content, config.as_deref())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.display().to_string(),
        source,
    })
}
