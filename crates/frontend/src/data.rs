use std::sync::Arc;

use taiwan_map_shared::assets::MapAssets;
use taiwan_map_shared::content::ContentTable;
use taiwan_map_shared::error::Result;
use taiwan_map_shared::state::MapController;

const TOPOLOGY: &str = include_str!("../assets/taiwan.topo.json");
const CONTENT: &str = include_str!("../assets/intros.json");
const CONFIG: &str = include_str!("../assets/map_config.json");

/// The controller type the app runs with.
pub type Controller = MapController<Arc<ContentTable>>;

/// Parse the assets compiled into the binary.
pub fn bundled_assets() -> Result<MapAssets> {
    MapAssets::from_json_strs(TOPOLOGY, CONTENT, Some(CONFIG))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_assets_parse() {
        let assets = bundled_assets().unwrap();
        assert_eq!(assets.dataset.len(), 22);
        assert_eq!(assets.content.len(), 22);
        assert!((assets.config.camera.transition_ms - 750.0).abs() < 1e-9);
    }
}
