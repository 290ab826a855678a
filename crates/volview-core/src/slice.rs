//! Slice navigation: axis, index and the auto-sweep timer.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::axis::{VolumeAxis, VolumeDims};
use crate::backend::Backend;
use crate::sync::ViewSync;

/// Allowed auto-sweep rates, in slices per second.
pub const SWEEP_RATE_RANGE: std::ops::RangeInclusive<f32> = 1.0..=20.0;

/// Shortest sweep period regardless of rate.
pub const MIN_SWEEP_PERIOD: Duration = Duration::from_millis(10);

/// Clamps a sweep rate to [`SWEEP_RATE_RANGE`]; NaN maps to the slowest rate.
pub fn clamp_sweep_rate(rate_hz: f32) -> f32 {
    if rate_hz.is_nan() {
        return *SWEEP_RATE_RANGE.start();
    }
    rate_hz.clamp(*SWEEP_RATE_RANGE.start(), *SWEEP_RATE_RANGE.end())
}

/// Returns the sweep period for a rate, clamping the rate first.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn sweep_period(rate_hz: f32) -> Duration {
    // Within [50_000, 1_000_000] after clamping.
    let micros = (1_000_000.0 / clamp_sweep_rate(rate_hz)).round() as u64;
    Duration::from_micros(micros).max(MIN_SWEEP_PERIOD)
}

/// Returns the highest valid index along `axis`.
pub fn max_index(axis: VolumeAxis, dims: VolumeDims) -> u32 {
    axis.extent(dims).saturating_sub(1)
}

/// A cancellable, restartable periodic task polled from the refresh tick.
#[derive(Debug, Clone, Default)]
pub struct PeriodicTask {
    period: Duration,
    next_due: Option<Instant>,
}

impl PeriodicTask {
    /// (Re)starts the task; the first tick is due one period after `now`.
    pub fn start(&mut self, now: Instant, period: Duration) {
        self.period = period;
        self.next_due = Some(now + period);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Period of the last start.
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Returns whether a tick is due at `now`.
    ///
    /// At most one tick fires per poll. A late poll reschedules from `now`
    /// instead of replaying the missed ticks.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                let next = due + self.period;
                self.next_due = Some(if next > now { next } else { now + self.period });
                true
            }
            _ => false,
        }
    }
}

/// Which index widget an update came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexOrigin {
    Slider,
    Stepper,
    Controller,
}

/// A widget showing the slice index (slider or spin box).
pub trait IndexView {
    /// Shows a new value and range, returning any change signal it triggered.
    fn show_index(&mut self, index: u32, max_index: u32) -> Option<i64>;
}

/// Observable slice state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliceState {
    pub enabled: bool,
    pub axis: VolumeAxis,
    pub index: u32,
    pub max_index: u32,
    pub auto_sweep: bool,
    pub sweep_rate_hz: f32,
}

/// Owns the slice state and keeps the slider and stepper in step.
pub struct SliceNavigator {
    state: SliceState,
    slider_value: u32,
    stepper_value: u32,
    sweep: PeriodicTask,
    sync: ViewSync<IndexOrigin>,
    slider: Option<Box<dyn IndexView>>,
    stepper: Option<Box<dyn IndexView>>,
}

impl Default for SliceNavigator {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl SliceNavigator {
    /// Creates a disabled navigator on the Z axis.
    pub fn new(sweep_rate_hz: f32) -> Self {
        Self {
            state: SliceState {
                enabled: false,
                axis: VolumeAxis::Z,
                index: 0,
                max_index: 0,
                auto_sweep: false,
                sweep_rate_hz: clamp_sweep_rate(sweep_rate_hz),
            },
            slider_value: 0,
            stepper_value: 0,
            sweep: PeriodicTask::default(),
            sync: ViewSync::new(),
            slider: None,
            stepper: None,
        }
    }

    pub fn attach_slider(&mut self, view: impl IndexView + 'static) {
        self.slider = Some(Box::new(view));
        self.mirror(IndexOrigin::Controller);
    }

    pub fn attach_stepper(&mut self, view: impl IndexView + 'static) {
        self.stepper = Some(Box::new(view));
        self.mirror(IndexOrigin::Controller);
    }

    pub fn state(&self) -> SliceState {
        self.state
    }

    /// Value shown by the slider.
    pub fn slider_value(&self) -> u32 {
        self.slider_value
    }

    /// Value shown by the stepper.
    pub fn stepper_value(&self) -> u32 {
        self.stepper_value
    }

    pub fn sync(&self) -> &ViewSync<IndexOrigin> {
        &self.sync
    }

    /// Whether the sweep timer is currently scheduled.
    pub fn is_sweeping(&self) -> bool {
        self.sweep.is_running()
    }

    /// Period of the running (or last started) sweep.
    pub fn sweep_period(&self) -> Duration {
        self.sweep.period()
    }

    /// Turns slicing on or off. The sweep only runs while slicing is on.
    pub fn set_enabled(&mut self, backend: &mut Backend, enabled: bool, now: Instant) {
        self.state.enabled = enabled;
        backend.set_slice_mode(enabled);
        self.update_sweep(now);
    }

    /// Switches axis and recentres the index.
    pub fn set_axis(&mut self, backend: &mut Backend, axis: VolumeAxis, now: Instant) {
        self.state.axis = axis;
        backend.set_slice_axis(axis);
        let dims = backend.volume_dims();
        self.state.max_index = max_index(axis, dims);
        self.state.index = self.state.max_index / 2;
        log::debug!(
            "slice axis {} range 0..={}",
            axis.name(),
            self.state.max_index
        );
        backend.set_slice_index(self.state.index);
        if self.sync.begin(IndexOrigin::Controller) {
            self.show(IndexOrigin::Controller, backend);
            self.sync.end();
        }
        if self.sweep.is_running() {
            self.sweep.start(now, sweep_period(self.state.sweep_rate_hz));
        }
    }

    /// Recomputes the range for the current axis, e.g. after a new volume loads.
    pub fn refresh_range(&mut self, backend: &mut Backend, now: Instant) {
        self.set_axis(backend, self.state.axis, now);
    }

    /// Sets the index, clamping to `[0, max_index]`.
    pub fn set_index(&mut self, backend: &mut Backend, value: i64) {
        self.apply_index(backend, value, IndexOrigin::Controller);
    }

    /// Handles a slider move. Returns `false` if ignored as an echo.
    pub fn on_slider_changed(&mut self, backend: &mut Backend, value: i64) -> bool {
        self.apply_index(backend, value, IndexOrigin::Slider)
    }

    /// Handles a stepper change. Returns `false` if ignored as an echo.
    pub fn on_stepper_changed(&mut self, backend: &mut Backend, value: i64) -> bool {
        self.apply_index(backend, value, IndexOrigin::Stepper)
    }

    pub fn set_auto_sweep(&mut self, enabled: bool, now: Instant) {
        self.state.auto_sweep = enabled;
        self.update_sweep(now);
    }

    /// Stores a new rate, restarting the timer if it is running.
    pub fn set_sweep_rate(&mut self, rate_hz: f32, now: Instant) {
        self.state.sweep_rate_hz = clamp_sweep_rate(rate_hz);
        if self.sweep.is_running() {
            self.sweep.start(now, sweep_period(self.state.sweep_rate_hz));
        }
    }

    /// Advances the sweep if a tick is due. Returns whether the index moved.
    pub fn poll(&mut self, backend: &mut Backend, now: Instant) -> bool {
        if !self.sweep.poll(now) {
            return false;
        }
        let next = if self.state.index >= self.state.max_index {
            0
        } else {
            self.state.index + 1
        };
        self.apply_index(backend, i64::from(next), IndexOrigin::Controller)
    }

    fn update_sweep(&mut self, now: Instant) {
        let should_run = self.state.enabled && self.state.auto_sweep;
        match (should_run, self.sweep.is_running()) {
            (true, false) => self.sweep.start(now, sweep_period(self.state.sweep_rate_hz)),
            (false, true) => self.sweep.stop(),
            _ => {}
        }
    }

    fn apply_index(&mut self, backend: &mut Backend, value: i64, origin: IndexOrigin) -> bool {
        if !self.sync.begin(origin) {
            return false;
        }
        let clamped = value.clamp(0, i64::from(self.state.max_index));
        self.state.index = u32::try_from(clamped).unwrap_or(self.state.max_index);
        backend.set_slice_index(self.state.index);
        self.show(origin, backend);
        self.sync.end();
        true
    }

    fn mirror(&mut self, origin: IndexOrigin) {
        if !self.sync.begin(origin) {
            return;
        }
        let (index, max) = (self.state.index, self.state.max_index);
        self.slider_value = index;
        self.stepper_value = index;
        if let Some(view) = self.slider.as_mut() {
            // an echo can only repeat the value just shown
            let _ = view.show_index(index, max);
        }
        if let Some(view) = self.stepper.as_mut() {
            let _ = view.show_index(index, max);
        }
        self.sync.end();
    }

    /// Updates both mirrors and shows the value to every view but `origin`.
    fn show(&mut self, origin: IndexOrigin, backend: &mut Backend) {
        let (index, max) = (self.state.index, self.state.max_index);
        self.slider_value = index;
        self.stepper_value = index;
        if origin != IndexOrigin::Slider {
            let echo = self
                .slider
                .as_mut()
                .and_then(|view| view.show_index(index, max));
            if let Some(value) = echo {
                self.on_slider_changed(backend, value);
            }
        }
        if origin != IndexOrigin::Stepper {
            let echo = self
                .stepper
                .as_mut()
                .and_then(|view| view.show_index(index, max));
            if let Some(value) = echo {
                self.on_stepper_changed(backend, value);
            }
        }
    }
}

impl std::fmt::Debug for SliceNavigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SliceNavigator")
            .field("state", &self.state)
            .field("sweep", &self.sweep)
            .finish_non_exhaustive()
    }
}
