//! Headless export integration tests.
//!
//! These run the full viewer on the software renderer, so they need no GPU
//! and no display.

use std::path::Path;
use std::time::Instant;

use volview::*;

const VOLUME: &str = "/data/phantom.nii";
const BOX_PIXEL: [u8; 4] = [230, 230, 230, 255];

fn viewer(renderer: HeadlessRenderer) -> Viewer {
    let now = Instant::now();
    let mut viewer = Viewer::headless(renderer, Options::default(), now)
        .with_history(HistoryStore::in_memory());
    assert!(viewer.open(Path::new(VOLUME), now));
    viewer.tick(now);
    viewer
}

fn renderer() -> HeadlessRenderer {
    HeadlessRenderer::new(320, 240).with_volume(VOLUME, VolumeDims::new(64, 64, 32), Vec3::ONE)
}

fn count_pixels(image: &image::RgbaImage, rgba: [u8; 4]) -> usize {
    image.pixels().filter(|px| px.0 == rgba).count()
}

#[test]
fn test_clean_export_renders_offscreen() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer());

    let report = viewer
        .export_clean(&dir.path().join("clean.png"), 800, 600, Instant::now())
        .expect("clean export failed");
    assert_eq!(report.source, CaptureSource::Offscreen);
    assert_eq!((report.width, report.height), (800, 600));

    let image = image::open(&report.path).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (800, 600));
    assert!(count_pixels(&image, BOX_PIXEL) > 0, "bounding box should be drawn");

    // Window and overlay are back as they were.
    assert_eq!(viewer.viewport(), (320, 240));
    assert!(viewer.overlay().is_visible());
}

#[test]
fn test_clean_export_without_bounding_box() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer());
    viewer.dispatch(Action::SetShowBoundingBox(false), Instant::now());

    let report = viewer
        .export_clean(&dir.path().join("plain.png"), 200, 100, Instant::now())
        .unwrap();
    let image = image::open(&report.path).unwrap().to_rgba8();
    assert_eq!(count_pixels(&image, BOX_PIXEL), 0);
}

#[test]
fn test_clean_export_forces_png() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer());
    let report = viewer
        .export_clean(&dir.path().join("shot.jpg"), 64, 64, Instant::now())
        .unwrap();
    assert_eq!(report.path, dir.path().join("shot.png"));
    assert!(report.path.exists());
    assert!(!dir.path().join("shot.jpg").exists());
}

#[test]
fn test_oversized_export_falls_back_to_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer().with_max_offscreen(1024));

    let report = viewer
        .export_clean(&dir.path().join("big.png"), 3840, 2160, Instant::now())
        .unwrap();
    assert_eq!(report.source, CaptureSource::Window);
    assert_eq!((report.width, report.height), (320, 240));
    assert!(viewer.overlay().is_visible());
    assert_eq!(viewer.viewport(), (320, 240));
}

#[test]
fn test_interactive_export_by_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer());

    let jpeg = viewer
        .export_interactive(&dir.path().join("window.jpg"), Instant::now())
        .unwrap();
    assert_eq!(jpeg.source, CaptureSource::Window);
    let format = image::ImageFormat::from_path(&jpeg.path).unwrap();
    assert_eq!(format, image::ImageFormat::Jpeg);
    assert_eq!(image::open(&jpeg.path).unwrap().width(), 320);

    let png = viewer
        .export_interactive(&dir.path().join("window.png"), Instant::now())
        .unwrap();
    let image = image::open(&png.path).unwrap().to_rgba8();
    assert!(count_pixels(&image, BOX_PIXEL) > 0);
}

#[test]
fn test_unwritable_target_notifies() {
    let dir = tempfile::tempdir().unwrap();
    let mut viewer = viewer(renderer());
    let before = viewer.notifier().live().len();

    let missing_dir = dir.path().join("no/such/dir/shot.png");
    assert!(viewer
        .export_clean(&missing_dir, 64, 64, Instant::now())
        .is_none());
    let live = viewer.notifier().live();
    assert_eq!(live.len(), before + 1);
    assert_eq!(live[before].level, NotificationLevel::Error);
    assert!(viewer.overlay().is_visible());
}

#[test]
fn test_export_dialog_resolution() {
    let mut viewer = viewer(renderer());
    assert_eq!(
        viewer.choose_resolution(DialogOutcome::Accepted),
        Some((320, 240))
    );
    viewer.export_pipeline_mut().dialog.preset = ResolutionPreset::Hd1080;
    assert_eq!(
        viewer.choose_resolution(DialogOutcome::Accepted),
        Some((1920, 1080))
    );
    assert_eq!(viewer.choose_resolution(DialogOutcome::Cancelled), None);
}
