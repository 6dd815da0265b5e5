use std::path::PathBuf;

use taiwan_map_shared::assets::MapAssets;
use taiwan_map_shared::camera::{MAX_SCALE, MIN_SCALE};
use taiwan_map_shared::content::ContentResolver;
use taiwan_map_shared::models::RegionId;
use taiwan_map_shared::state::{MapController, SelectionState, Transition};

fn assets() -> MapAssets {
    let dir = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../frontend/assets");
    MapAssets::load(&dir).unwrap()
}

#[test]
fn test_bundled_assets_load() {
    let assets = assets();
    assert_eq!(assets.dataset.len(), 22);
    assert_eq!(assets.content.len(), 22);
    // Every region has its own content entry
    for region in assets.dataset.regions() {
        let rec = assets.content.resolve(Some(&region.id));
        assert_eq!(rec.name, region.name, "missing content for {}", region.id);
        assert!(region.code.is_some());
    }
}

#[test]
fn test_every_bundled_region_projects() {
    let assets = assets();
    let ctl = MapController::new(
        assets.dataset.clone(),
        assets.content.clone(),
        &assets.config,
        1280.0,
        720.0,
    );
    for region in ctl.map().regions() {
        assert!(!region.is_empty(), "{} is empty", region.id);
        assert!(region.area() > 0.0);
    }
}

#[test]
fn test_click_taipei_then_background() {
    let assets = assets();
    let mut ctl = MapController::new(
        assets.dataset.clone(),
        assets.content.clone(),
        &assets.config,
        1280.0,
        720.0,
    );
    let taipei = RegionId::from("臺北市");

    // Taipei sits in a hole of New Taipei, so a tap on it must hit Taipei
    let center = ctl.map().bounds_of(&taipei).unwrap().center();
    assert_eq!(ctl.hit_test(center), Some(taipei.clone()));

    assert_eq!(ctl.select_region(&taipei, 0.0), Transition::Focused(taipei.clone()));
    assert_eq!(ctl.content().id, "taipei");
    while ctl.tick(750.0) {}
    let scale = ctl.transform().scale;
    assert!(scale > MIN_SCALE && scale <= MAX_SCALE);

    assert_eq!(ctl.background_click(1000.0), Transition::Reset);
    while ctl.tick(1750.0) {}
    assert_eq!(ctl.selection(), &SelectionState::NoSelection);
    assert!(ctl.transform().is_identity());
    assert_eq!(ctl.content().id, "taiwan");
}
