//! Colormap editor state: preset/custom mode and the mirrored point views.

use serde::{Deserialize, Serialize};

use super::{
    preset_points, CurveTick, RawTick, TableEdit, TableRow, TransferFunction,
    TransferFunctionPoint, PRESETS,
};
use crate::backend::Backend;
use crate::sync::ViewSync;

/// Which source of truth drives the renderer's colormap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColormapMode {
    /// The selected preset is authoritative; the point list mirrors it.
    #[default]
    Preset,
    /// The point list is authoritative and pushed on explicit apply.
    Custom,
}

/// Where an edit to the point list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOrigin {
    Curve,
    Table,
    /// A controller operation (add, remove, preset change, ...).
    Controller,
}

/// A gradient widget showing the points as ticks.
pub trait CurveView {
    /// Displays new ticks.
    ///
    /// Widgets that fire a change signal on programmatic updates return it
    /// here; the controller routes it back through
    /// [`TransferFunctionController::on_curve_edited`].
    fn show_curve(&mut self, ticks: &[CurveTick]) -> Option<Vec<RawTick>>;
}

/// A table widget showing one row per point.
pub trait TableView {
    /// Displays new rows, returning any change signal the update triggered.
    fn show_table(&mut self, rows: &[TableRow]) -> Option<TableEdit>;
}

/// Owns the transfer function and keeps its two editor views in sync.
pub struct TransferFunctionController {
    mode: ColormapMode,
    preset: usize,
    function: TransferFunction,
    applied: Option<TransferFunction>,
    curve: Vec<CurveTick>,
    table: Vec<TableRow>,
    sync: ViewSync<EditOrigin>,
    curve_view: Option<Box<dyn CurveView>>,
    table_view: Option<Box<dyn TableView>>,
}

impl Default for TransferFunctionController {
    fn default() -> Self {
        Self::new(0)
    }
}

impl TransferFunctionController {
    /// Creates a controller in preset mode showing the given preset.
    ///
    /// Nothing is pushed to the renderer until an operation or
    /// [`reapply`](Self::reapply) is invoked.
    pub fn new(default_preset: usize) -> Self {
        let preset = default_preset.min(PRESETS.len() - 1);
        let function = preset_points(preset);
        let mut controller = Self {
            mode: ColormapMode::Preset,
            preset,
            function,
            applied: None,
            curve: Vec::new(),
            table: Vec::new(),
            sync: ViewSync::new(),
            curve_view: None,
            table_view: None,
        };
        controller.rebuild_mirrors();
        controller
    }

    /// Attaches the gradient view and shows it the current points.
    pub fn attach_curve_view(&mut self, view: impl CurveView + 'static) {
        self.curve_view = Some(Box::new(view));
        self.refresh_from(EditOrigin::Controller);
    }

    /// Attaches the table view and shows it the current points.
    pub fn attach_table_view(&mut self, view: impl TableView + 'static) {
        self.table_view = Some(Box::new(view));
        self.refresh_from(EditOrigin::Controller);
    }

    pub fn mode(&self) -> ColormapMode {
        self.mode
    }

    /// Index of the selected preset.
    pub fn preset_index(&self) -> usize {
        self.preset
    }

    /// The current point list.
    pub fn points(&self) -> &[TransferFunctionPoint] {
        self.function.points()
    }

    pub fn transfer_function(&self) -> &TransferFunction {
        &self.function
    }

    /// Ticks currently shown by the curve view.
    pub fn curve(&self) -> &[CurveTick] {
        &self.curve
    }

    /// Rows currently shown by the table view.
    pub fn table(&self) -> &[TableRow] {
        &self.table
    }

    /// The propagation state machine, for inspection.
    pub fn sync(&self) -> &ViewSync<EditOrigin> {
        &self.sync
    }

    /// Inserts a point (default `(0.5, 1, 1, 1, 1)`).
    pub fn add_point(&mut self, point: Option<TransferFunctionPoint>) {
        self.function.insert(point.unwrap_or_default());
        self.refresh_from(EditOrigin::Controller);
    }

    /// Removes rows by index; out-of-range indices are ignored.
    pub fn remove_points(&mut self, indices: &[usize]) {
        if indices.is_empty() {
            return;
        }
        if self.function.remove_indices(indices) > 0 {
            self.refresh_from(EditOrigin::Controller);
        }
    }

    /// Switches between preset and custom mode.
    ///
    /// Entering preset mode re-applies the selected preset and regenerates the
    /// mirrors. Entering custom mode leaves the renderer untouched.
    pub fn set_mode(&mut self, backend: &mut Backend, mode: ColormapMode) {
        self.mode = mode;
        match mode {
            ColormapMode::Preset => {
                self.push_preset(backend);
                self.function = preset_points(self.preset);
                self.refresh_from(EditOrigin::Controller);
            }
            ColormapMode::Custom => {
                log::debug!("custom colormap mode, renderer keeps its last committed state");
            }
        }
    }

    /// Selects a preset; the renderer is updated only in preset mode.
    pub fn select_preset(&mut self, backend: &mut Backend, index: usize) {
        if index >= PRESETS.len() {
            log::debug!("preset index {index} out of range, clamping");
        }
        self.preset = index.min(PRESETS.len() - 1);
        self.function = preset_points(self.preset);
        self.refresh_from(EditOrigin::Controller);
        if self.mode == ColormapMode::Preset {
            backend.set_colormap_preset(self.preset);
        }
    }

    /// Commits the current points to the renderer.
    ///
    /// Returns `false` without doing anything outside custom mode.
    pub fn apply_custom(&mut self, backend: &mut Backend) -> bool {
        if self.mode != ColormapMode::Custom {
            log::debug!("apply ignored outside custom mode");
            return false;
        }
        backend.set_colormap_mode_custom(true);
        backend.set_transfer_function_points(self.function.points());
        self.applied = Some(self.function.clone());
        true
    }

    /// Forces preset mode with the given preset selected.
    pub fn reset_to_preset(&mut self, backend: &mut Backend, index: usize) {
        self.mode = ColormapMode::Preset;
        self.preset = index.min(PRESETS.len() - 1);
        self.push_preset(backend);
        self.function = preset_points(self.preset);
        self.refresh_from(EditOrigin::Controller);
    }

    /// Pushes whatever the renderer should currently show, e.g. after a load.
    pub fn reapply(&mut self, backend: &mut Backend) {
        match (&self.mode, &self.applied) {
            (ColormapMode::Custom, Some(applied)) => {
                backend.set_colormap_mode_custom(true);
                backend.set_transfer_function_points(applied.points());
            }
            _ => self.push_preset(backend),
        }
    }

    /// Handles an edit made in the gradient view.
    ///
    /// The ticks replace the whole point list. Returns `false` when the call
    /// arrived while another propagation was in flight and was ignored.
    pub fn on_curve_edited(&mut self, ticks: &[RawTick]) -> bool {
        if !self.sync.begin(EditOrigin::Curve) {
            return false;
        }
        self.function =
            TransferFunction::from_points(ticks.iter().copied().map(TransferFunctionPoint::from));
        self.propagate(EditOrigin::Curve);
        self.sync.end();
        true
    }

    /// Handles an edit of one row made in the table view.
    ///
    /// NaN cells keep the previous value; an out-of-range row is ignored.
    pub fn on_table_edited(&mut self, edit: TableEdit) -> bool {
        if !self.sync.begin(EditOrigin::Table) {
            return false;
        }
        if let Some(current) = self.function.points().get(edit.row).copied() {
            let previous = current.to_array();
            let mut values = edit.values;
            for (value, old) in values.iter_mut().zip(previous) {
                if value.is_nan() {
                    *value = old;
                }
            }
            self.function
                .replace(edit.row, TransferFunctionPoint::from_array(values));
            self.propagate(EditOrigin::Table);
        } else {
            log::debug!("table edit for missing row {}", edit.row);
        }
        self.sync.end();
        true
    }

    fn push_preset(&self, backend: &mut Backend) {
        backend.set_colormap_mode_custom(false);
        backend.set_colormap_preset(self.preset);
    }

    fn rebuild_mirrors(&mut self) {
        self.curve = self.function.points().iter().map(|&p| p.into()).collect();
        self.table = self.function.points().iter().map(|&p| p.into()).collect();
    }

    fn refresh_from(&mut self, origin: EditOrigin) {
        if !self.sync.begin(origin) {
            return;
        }
        self.propagate(origin);
        self.sync.end();
    }

    /// Rebuilds both mirrors and shows them to every view except `origin`.
    ///
    /// Must run inside a propagation; echoes are routed back through the
    /// public entry points, where the active propagation makes them inert.
    fn propagate(&mut self, origin: EditOrigin) {
        self.rebuild_mirrors();
        if origin != EditOrigin::Curve {
            let echo = self
                .curve_view
                .as_mut()
                .and_then(|view| view.show_curve(&self.curve));
            if let Some(ticks) = echo {
                self.on_curve_edited(&ticks);
            }
        }
        if origin != EditOrigin::Table {
            let echo = self
                .table_view
                .as_mut()
                .and_then(|view| view.show_table(&self.table));
            if let Some(edit) = echo {
                self.on_table_edited(edit);
            }
        }
    }
}

impl std::fmt::Debug for TransferFunctionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferFunctionController")
            .field("mode", &self.mode)
            .field("preset", &self.preset)
            .field("points", &self.function.len())
            .field("sync", &self.sync.state())
            .finish_non_exhaustive()
    }
}
