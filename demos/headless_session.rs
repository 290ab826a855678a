//! Headless session: loads a synthetic volume, drives the controllers the way
//! the UI would, sweeps a few slices and writes a clean capture.
//!
//! Run with `RUST_LOG=debug` to see every renderer push.

use std::path::Path;
use std::time::{Duration, Instant};

use volview::*;

fn main() -> Result<()> {
    init_logging();

    let options = load_options(Path::new("volview.json"))?;
    let volume = Path::new("synthetic/head.nii");
    let renderer = HeadlessRenderer::new(640, 480).with_volume(
        volume,
        VolumeDims::new(128, 128, 64),
        Vec3::new(1.0, 1.0, 2.0),
    );

    let mut now = Instant::now();
    let mut viewer = Viewer::headless(renderer, options, now)
        .with_history(HistoryStore::in_memory());

    if !viewer.open(volume, now) {
        eprintln!("could not open {}", volume.display());
        return Ok(());
    }

    viewer.dispatch(Action::SelectPreset(3), now);
    viewer.dispatch(Action::AlignToAxis(VolumeAxis::Y), now);
    viewer.dispatch(Action::Rotate { dx: 40.0, dy: -20.0 }, now);
    viewer.dispatch(Action::SetSliceEnabled(true), now);
    viewer.dispatch(Action::SetSweepRate(20.0), now);
    viewer.dispatch(Action::SetAutoSweep(true), now);

    for _ in 0..10 {
        now += viewer.refresh_interval().max(Duration::from_millis(50));
        viewer.tick(now);
    }
    println!("{}", viewer.window_title());
    println!("slice {:?}", viewer.slices().state());

    if let Some(report) = viewer.export_clean(Path::new("headless_session.png"), 1280, 720, now) {
        println!(
            "wrote {} ({}x{}, {:?})",
            report.path.display(),
            report.width,
            report.height,
            report.source
        );
    }
    Ok(())
}
