//! Session-level integration tests: options, the load flow and recent files
//! persisted across viewer instances.

use std::path::{Path, PathBuf};
use std::time::Instant;

use volview::*;

/// Creates empty volume files so reloaded history entries still exist.
fn touch_volumes(dir: &Path, count: usize) -> Vec<PathBuf> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("vol_{i:02}.nii"));
            std::fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}

fn renderer_for(paths: &[PathBuf]) -> HeadlessRenderer {
    paths.iter().fold(HeadlessRenderer::new(160, 120), |r, p| {
        r.with_volume(p, VolumeDims::new(16, 16, 8), Vec3::ONE)
    })
}

fn options_in(dir: &Path) -> Options {
    Options {
        history_file: Some(dir.join("history.json")),
        ..Options::default()
    }
}

#[test]
fn test_options_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("volview.json");

    let missing = load_options(&path).unwrap();
    assert_eq!(missing, Options::default());

    std::fs::write(&path, r#"{ "sweep_rate_hz": 50, "show_overlay": false }"#).unwrap();
    let loaded = load_options(&path).unwrap();
    assert_eq!(loaded.sweep_rate_hz, 20.0);
    assert!(!loaded.show_overlay);
    assert!(loaded.show_bounding_box);

    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(load_options(&path), Err(VolviewError::JsonError(_))));
}

#[test]
fn test_history_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let volumes = touch_volumes(dir.path(), 2);
    let now = Instant::now();

    {
        let mut viewer = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);
        assert!(viewer.open(&volumes[0], now));
        assert!(viewer.open(&volumes[1], now));
        assert!(viewer.open(&volumes[0], now));
        assert_eq!(viewer.history().entries(), &[volumes[0].clone(), volumes[1].clone()]);
    }

    // A deleted file drops out on the next start.
    std::fs::remove_file(&volumes[1]).unwrap();
    let viewer = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);
    assert_eq!(viewer.history().entries(), &[volumes[0].clone()]);
}

#[test]
fn test_history_is_capped() {
    let dir = tempfile::tempdir().unwrap();
    let volumes = touch_volumes(dir.path(), 11);
    let now = Instant::now();
    let mut viewer = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);

    for path in &volumes {
        assert!(viewer.open(path, now));
    }
    let entries = viewer.history().entries();
    assert_eq!(entries.len(), 10);
    assert_eq!(entries[0], volumes[10]);
    assert!(!entries.contains(&volumes[0]));

    viewer.dispatch(Action::ClearRecent, now);
    assert!(viewer.history().is_empty());
    let reloaded = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);
    assert!(reloaded.history().is_empty());
}

#[test]
fn test_failed_open_keeps_previous_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let volumes = touch_volumes(dir.path(), 1);
    let now = Instant::now();
    let mut viewer = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);

    assert!(viewer.open(&volumes[0], now));
    let slice = viewer.slices().state();
    assert!(!viewer.open(&dir.path().join("unknown.nii"), now));

    assert_eq!(viewer.overlay().dataset(), Some("vol_00.nii"));
    assert_eq!(viewer.history().len(), 1);
    assert_eq!(viewer.slices().state(), slice);
    assert_eq!(viewer.notifier().live().len(), 1);
    assert_eq!(viewer.notifier().live()[0].level, NotificationLevel::Error);
}

#[test]
fn test_overlay_text_follows_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let volumes = touch_volumes(dir.path(), 1);
    let now = Instant::now();
    let mut viewer = Viewer::headless(renderer_for(&volumes), options_in(dir.path()), now);

    assert_eq!(viewer.overlay().text(), "No dataset\n0.0 FPS");
    viewer.open(&volumes[0], now);
    assert!(viewer.overlay().text().starts_with("vol_00.nii\n"));
    assert!(viewer.window_title().starts_with("volview - "));
}
