//! Column widths and interactive drag-resize.
//!
//! [`ColumnResize`] owns the pixel width of every leaf column. Widths are
//! seeded from each column's declared pixel width (or
//! [`DEFAULT_COLUMN_WIDTH`]) and overwritten by dragging a column edge. The
//! grid template string handed to a layout engine is derived from the current
//! widths in column order.
//!
//! # Drag lifecycle
//!
//! A drag runs from [`begin_resize`](ColumnResize::begin_resize) through any
//! number of [`pointer_moved`](ColumnResize::pointer_moved) calls to
//! [`end_resize`](ColumnResize::end_resize). While a drag is active the host
//! must route pointer events from anywhere on screen to this engine; the
//! `pointer_capture` signal tells it when to attach (`true`) and detach
//! (`false`) those global listeners.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::Column;
//! use horizon_grid::widget::resize::ColumnResize;
//!
//! let columns = vec![
//!     Column::new("name", "Name").with_width("200px"),
//!     Column::new("age", "Age"),
//! ];
//! let mut resize = ColumnResize::new(&columns);
//! assert_eq!(resize.grid_template(), "200px 150px");
//!
//! resize.begin_resize("name", 500.0);
//! resize.pointer_moved(440.0);
//! resize.end_resize();
//! assert_eq!(resize.column_width("name"), 140.0);
//! ```

use std::collections::HashMap;

use horizon_grid_core::Signal;
use horizon_grid_core::logging::targets;

use crate::model::{Column, DEFAULT_COLUMN_WIDTH};

/// Narrowest width a drag can produce.
pub const MIN_COLUMN_WIDTH: f32 = 80.0;

/// Width of the selection checkbox column in the grid template.
pub const CHECKBOX_COLUMN_WIDTH: f32 = 50.0;

/// Column key to pixel width.
pub type ColumnWidths = HashMap<String, f32>;

/// Width of a column: the live width if one is recorded, else the declared
/// pixel width, else [`DEFAULT_COLUMN_WIDTH`].
pub fn effective_width(column: &Column, widths: &ColumnWidths) -> f32 {
    widths
        .get(&column.key)
        .copied()
        .unwrap_or_else(|| column.declared_width())
}

/// State captured when a drag starts.
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeState {
    /// Key of the column being resized.
    pub column_key: String,
    /// Pointer X when the drag started.
    pub start_x: f32,
    /// Column width when the drag started.
    pub start_width: f32,
}

/// Per-column widths with drag-resize.
///
/// # Signals
///
/// - `column_resized((String, f32, f32))`: Emitted when a width changes (key, old, new)
/// - `pointer_capture(bool)`: Emitted when a drag starts (`true`) or ends (`false`)
#[derive(Debug, Default)]
pub struct ColumnResize {
    /// Leaf column keys in display order.
    order: Vec<String>,

    /// Current widths.
    widths: ColumnWidths,

    /// Widths restored by [`reset_widths`](Self::reset_widths).
    seeds: ColumnWidths,

    /// Active drag, if any.
    drag: Option<ResizeState>,

    /// Emitted when a width changes.
    pub column_resized: Signal<(String, f32, f32)>,

    /// Emitted when the host must attach or detach global pointer listeners.
    pub pointer_capture: Signal<bool>,
}

impl ColumnResize {
    /// Creates the engine for a list of leaf columns.
    pub fn new<'a>(columns: impl IntoIterator<Item = &'a Column>) -> Self {
        let mut resize = Self::default();
        resize.sync_columns(columns);
        resize
    }

    /// Current widths by key.
    pub fn widths(&self) -> &ColumnWidths {
        &self.widths
    }

    /// Current width of a column, or [`DEFAULT_COLUMN_WIDTH`] for an unknown key.
    pub fn column_width(&self, key: &str) -> f32 {
        self.widths.get(key).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// Sets a column width directly, clamped to [`MIN_COLUMN_WIDTH`].
    ///
    /// Unknown keys are ignored.
    pub fn set_column_width(&mut self, key: &str, width: f32) {
        let clamped = width.max(MIN_COLUMN_WIDTH);
        self.apply_width(key, clamped);
    }

    /// Adopts a new column list: seeds widths for new keys and keeps the
    /// widths of keys already known.
    pub fn sync_columns<'a>(&mut self, columns: impl IntoIterator<Item = &'a Column>) {
        let columns: Vec<&Column> = columns.into_iter().collect();
        self.order = columns.iter().map(|column| column.key.clone()).collect();
        for column in columns {
            let seed = column.declared_width();
            self.seeds.insert(column.key.clone(), seed);
            self.widths.entry(column.key.clone()).or_insert(seed);
        }

        let order = &self.order;
        self.widths.retain(|key, _| order.contains(key));
        self.seeds.retain(|key, _| order.contains(key));

        let orphaned = self
            .drag
            .as_ref()
            .is_some_and(|drag| !self.widths.contains_key(&drag.column_key));
        if orphaned {
            self.end_resize();
        }
    }

    // =========================================================================
    // Drag
    // =========================================================================

    /// Returns `true` while a drag is active.
    pub fn is_resizing(&self) -> bool {
        self.drag.is_some()
    }

    /// The active drag, if any.
    pub fn resize_state(&self) -> Option<&ResizeState> {
        self.drag.as_ref()
    }

    /// Starts dragging the edge of a column at pointer X.
    ///
    /// An active drag is ended first. Returns `false` for an unknown key.
    pub fn begin_resize(&mut self, key: &str, x: f32) -> bool {
        if !self.widths.contains_key(key) {
            return false;
        }
        if self.drag.is_some() {
            self.end_resize();
        }

        let start_width = self.column_width(key);
        tracing::debug!(target: targets::RESIZE, key, x, start_width, "resize started");
        self.drag = Some(ResizeState {
            column_key: key.to_string(),
            start_x: x,
            start_width,
        });
        self.pointer_capture.emit(true);
        true
    }

    /// Applies a pointer move to the active drag.
    ///
    /// The new width is `max(MIN_COLUMN_WIDTH, start_width + (x - start_x))`.
    /// Without an active drag this does nothing.
    pub fn pointer_moved(&mut self, x: f32) {
        let Some(drag) = &self.drag else {
            return;
        };
        let key = drag.column_key.clone();
        let width = (drag.start_width + (x - drag.start_x)).max(MIN_COLUMN_WIDTH);
        self.apply_width(&key, width);
    }

    /// Ends the active drag. Calling it without a drag does nothing.
    pub fn end_resize(&mut self) {
        if let Some(drag) = self.drag.take() {
            tracing::debug!(
                target: targets::RESIZE,
                key = %drag.column_key,
                width = self.column_width(&drag.column_key),
                "resize ended"
            );
            self.pointer_capture.emit(false);
        }
    }

    // =========================================================================
    // Reset
    // =========================================================================

    /// Restores a column to [`DEFAULT_COLUMN_WIDTH`].
    ///
    /// Content-based fitting is left to the host, which can measure cells and
    /// call [`set_column_width`](Self::set_column_width).
    pub fn auto_fit_column(&mut self, key: &str) {
        self.apply_width(key, DEFAULT_COLUMN_WIDTH);
    }

    /// Restores every column to its seeded width.
    pub fn reset_widths(&mut self) {
        tracing::debug!(target: targets::RESIZE, "widths reset");
        for key in self.order.clone() {
            if let Some(seed) = self.seeds.get(&key).copied() {
                self.apply_width(&key, seed);
            }
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Space-separated `"{width}px"` list in column order.
    pub fn grid_template(&self) -> String {
        self.order
            .iter()
            .map(|key| format!("{}px", self.column_width(key)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// [`grid_template`](Self::grid_template) prefixed by a checkbox column.
    pub fn grid_template_with_checkbox(&self, checkbox_width: f32) -> String {
        let template = self.grid_template();
        if template.is_empty() {
            format!("{checkbox_width}px")
        } else {
            format!("{checkbox_width}px {template}")
        }
    }

    /// Sum of all column widths.
    pub fn total_width(&self) -> f32 {
        self.order.iter().map(|key| self.column_width(key)).sum()
    }

    fn apply_width(&mut self, key: &str, width: f32) {
        let Some(current) = self.widths.get_mut(key) else {
            return;
        };
        let old = *current;
        if old == width {
            return;
        }
        *current = width;
        tracing::trace!(target: targets::RESIZE, key, old, new = width, "column resized");
        self.column_resized.emit((key.to_string(), old, width));
    }
}

static_assertions::assert_impl_all!(ColumnResize: Send, Sync);
