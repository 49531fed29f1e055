//! The table controller.
//!
//! [`DataTable`] owns one instance of every engine (expansion, selection,
//! column widths, virtualization) over a column tree and a row forest, and
//! exposes the table's output events as signals. It draws nothing: a
//! rendering layer reads [`rendered_rows`](DataTable::rendered_rows),
//! [`header_levels`](DataTable::header_levels),
//! [`fixed_columns`](DataTable::fixed_columns) and
//! [`grid_template`](DataTable::grid_template), and feeds pointer and scroll
//! input back in.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let columns = vec![Column::new("name", "Name").with_width("200px")];
//! let data = vec![Row::new(1)
//!     .with_field("name", "Engineering")
//!     .with_children(vec![Row::new(2).with_field("name", "Platform")])];
//!
//! let mut table = DataTable::new(TableProps::new(columns, data)).unwrap();
//! table.row_clicked.connect(|row| println!("clicked {}", row.id));
//!
//! assert_eq!(table.flattened_rows().len(), 1);
//! table.handle_expand_click(&RowId::Int(1), None);
//! assert_eq!(table.flattened_rows().len(), 2);
//! ```

use std::sync::Arc;

use horizon_grid_core::logging::targets;
use horizon_grid_core::{PerfSpan, Signal};
use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::fixed::{FixedColumns, log_config_warnings};
use super::header::{self, HeaderCell};
use super::resize::{CHECKBOX_COLUMN_WIDTH, ColumnResize};
use super::virtualizer::{Viewport, VirtualItem, VirtualWindow};
use crate::config::{ExpandMode, TableHeight, TableProps, validate_columns};
use crate::error::Result;
use crate::model::{
    CheckState, Column, ExpandedRows, FlattenedRow, MultiSelectConfig, Row, RowId, RowSelection,
    find_row, flatten,
};

/// Requests a toggle of one row's expanded state.
///
/// Handed out in controlled mode. Calling [`toggle`](Self::toggle) queues the
/// toggle; the table applies queued toggles right after `expand_clicked`
/// returns, at the start of its next mutating call, or on
/// [`DataTable::apply_pending_toggles`].
#[derive(Debug, Clone)]
pub struct ExpandToggle {
    id: RowId,
    queue: Arc<Mutex<Vec<RowId>>>,
}

impl ExpandToggle {
    /// The row this handle toggles.
    pub fn row_id(&self) -> &RowId {
        &self.id
    }

    /// Queues the toggle.
    pub fn toggle(&self) {
        self.queue.lock().push(self.id.clone());
    }
}

/// Payload of `expand_clicked`.
#[derive(Debug, Clone)]
pub struct ExpandRequest {
    /// The clicked row.
    pub row: Row,
    /// Key of the column whose cell was clicked, if known.
    pub column_key: Option<String>,
    /// Whether the row was expanded at the time of the click.
    pub is_expanded: bool,
    /// Handle that toggles the row.
    pub toggle: ExpandToggle,
}

/// A flattened row placed for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderedRow<'a> {
    /// Position and size.
    pub item: VirtualItem,
    /// The row.
    pub row: FlattenedRow<'a>,
}

/// A headless data table.
///
/// # Signals
///
/// - `page_changed(u32)`: Emitted when the page changes
/// - `row_clicked(Row)`: Emitted when a row is clicked outside interactive cells
/// - `selection_changed(Vec<Row>)`: Emitted after every accepted selection change
/// - `expand_clicked(ExpandRequest)`: Emitted in controlled mode when an expander is clicked
#[derive(Debug)]
pub struct DataTable {
    columns: Vec<Column>,
    data: Vec<Row>,

    loading: bool,
    virtualized: bool,
    height: Option<TableHeight>,
    total_row: Option<Map<String, Value>>,
    expand_mode: ExpandMode,
    page: u32,

    expanded: ExpandedRows,
    selection: RowSelection,
    resize: ColumnResize,
    window: VirtualWindow,

    /// Toggles queued by [`ExpandToggle`] handles.
    pending_toggles: Arc<Mutex<Vec<RowId>>>,

    /// Emitted when the page changes.
    pub page_changed: Signal<u32>,

    /// Emitted when a row is clicked.
    pub row_clicked: Signal<Row>,

    /// Emitted with the resolved selected rows after a selection change.
    pub selection_changed: Signal<Vec<Row>>,

    /// Emitted in controlled mode when an expander is clicked.
    pub expand_clicked: Signal<ExpandRequest>,
}

impl DataTable {
    /// Creates a table from props, validating the column tree.
    pub fn new(props: TableProps) -> Result<Self> {
        props.validate()?;
        let virtual_options = props.virtual_options();

        let resize = ColumnResize::new(header::flat_columns(&props.columns));
        log_config_warnings(header::flat_columns(&props.columns));

        let mut selection = RowSelection::new(props.multi_select);
        selection.sync_from_ids(props.selected_rows);

        let mut table = Self {
            columns: props.columns,
            data: props.data,
            loading: props.loading,
            virtualized: props.virtualized,
            height: props.height,
            total_row: props.total_row,
            expand_mode: props.expand_mode,
            page: 1,
            expanded: ExpandedRows::with_ids(props.expanded_rows),
            selection,
            resize,
            window: VirtualWindow::new(virtual_options),
            pending_toggles: Arc::new(Mutex::new(Vec::new())),
            page_changed: Signal::new(),
            row_clicked: Signal::new(),
            selection_changed: Signal::new(),
            expand_clicked: Signal::new(),
        };
        table.sync_window();

        tracing::debug!(
            target: targets::TABLE,
            columns = table.columns.len(),
            roots = table.data.len(),
            virtualized = table.virtualized,
            "table created"
        );
        Ok(table)
    }

    // =========================================================================
    // Props
    // =========================================================================

    /// The column tree.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Replaces the column tree. Widths of columns that remain are kept.
    pub fn set_columns(&mut self, columns: Vec<Column>) -> Result<()> {
        validate_columns(&columns)?;
        self.columns = columns;
        let leaves = header::flat_columns(&self.columns);
        self.resize.sync_columns(leaves.iter().copied());
        log_config_warnings(leaves);
        Ok(())
    }

    /// The in-order leaf columns.
    pub fn leaf_columns(&self) -> Vec<&Column> {
        header::flat_columns(&self.columns)
    }

    /// The row forest.
    pub fn data(&self) -> &[Row] {
        &self.data
    }

    /// Replaces the row forest. Expanded and selected IDs are kept.
    pub fn set_data(&mut self, data: Vec<Row>) {
        self.apply_pending_toggles();
        self.data = data;
        self.sync_window();
        tracing::debug!(target: targets::TABLE, roots = self.data.len(), "data replaced");
    }

    /// Whether data is loading.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Sets the loading flag.
    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    /// Whether only rows near the viewport are rendered.
    pub fn is_virtualized(&self) -> bool {
        self.virtualized
    }

    /// Turns virtualization on or off.
    pub fn set_virtualized(&mut self, virtualized: bool) {
        self.virtualized = virtualized;
    }

    /// Scroll container height.
    pub fn height(&self) -> Option<&TableHeight> {
        self.height.as_ref()
    }

    /// Summary row.
    pub fn total_row(&self) -> Option<&Map<String, Value>> {
        self.total_row.as_ref()
    }

    /// Expand mode.
    pub fn expand_mode(&self) -> ExpandMode {
        self.expand_mode
    }

    /// Sets the expand mode.
    pub fn set_expand_mode(&mut self, mode: ExpandMode) {
        self.expand_mode = mode;
    }

    /// Current page, starting at 1.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Changes the page and emits `page_changed`.
    pub fn set_page(&mut self, page: u32) {
        if page != self.page {
            self.page = page;
            self.page_changed.emit(page);
        }
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Header rows for the column tree.
    pub fn header_levels(&self) -> Vec<Vec<HeaderCell<'_>>> {
        let _span = PerfSpan::new("header_levels");
        header::header_levels(&self.columns)
    }

    /// Returns `true` if the header has more than one level.
    pub fn has_groups(&self) -> bool {
        header::has_groups(&self.columns)
    }

    /// Width of a column or group at the current widths.
    pub fn column_width(&self, column: &Column) -> f32 {
        header::group_width(column, self.resize.widths())
    }

    /// Pinned-column layout at the current widths.
    pub fn fixed_columns(&self) -> FixedColumns<'_> {
        FixedColumns::new(header::flat_columns(&self.columns), self.resize.widths())
    }

    /// The column width engine.
    pub fn resize(&self) -> &ColumnResize {
        &self.resize
    }

    /// The column width engine, for drag input.
    pub fn resize_mut(&mut self) -> &mut ColumnResize {
        &mut self.resize
    }

    /// Grid template for the leaf columns, with a checkbox column first when
    /// multi-select is on.
    pub fn grid_template(&self) -> String {
        if self.selection.is_enabled() {
            self.resize.grid_template_with_checkbox(CHECKBOX_COLUMN_WIDTH)
        } else {
            self.resize.grid_template()
        }
    }

    // =========================================================================
    // Expansion
    // =========================================================================

    /// The rows in display order.
    pub fn flattened_rows(&self) -> Vec<FlattenedRow<'_>> {
        let _span = PerfSpan::new("flatten");
        flatten(&self.data, &self.expanded)
    }

    /// The expanded set, for connecting to its signals.
    pub fn expanded(&self) -> &ExpandedRows {
        &self.expanded
    }

    /// Returns whether a row is expanded.
    pub fn is_expanded(&self, id: &RowId) -> bool {
        self.expanded.is_expanded(id)
    }

    /// Toggles a row. Returns the new expanded state.
    pub fn toggle_expand(&mut self, id: &RowId) -> bool {
        self.apply_pending_toggles();
        let expanded = self.expanded.toggle(id.clone());
        self.sync_window();
        expanded
    }

    /// Expands every expandable row.
    pub fn expand_all(&mut self) {
        self.apply_pending_toggles();
        self.expanded.expand_all(&self.data);
        self.sync_window();
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        self.apply_pending_toggles();
        self.expanded.collapse_all();
        self.sync_window();
    }

    /// Expands the ancestors of a row. Returns `false` for an unknown row.
    pub fn expand_to(&mut self, id: &RowId) -> bool {
        self.apply_pending_toggles();
        let found = self.expanded.expand_to(&self.data, id);
        self.sync_window();
        found
    }

    /// Handles a click on a row's expander.
    ///
    /// In auto mode the row is toggled. In controlled mode `expand_clicked`
    /// is emitted and the expanded set is left alone until the request's
    /// toggle is invoked. Returns `false` if the row does not exist or shows
    /// no expander.
    pub fn handle_expand_click(&mut self, id: &RowId, column_key: Option<&str>) -> bool {
        self.apply_pending_toggles();
        let Some(row) = find_row(&self.data, id).filter(|row| row.shows_expander()) else {
            return false;
        };

        match self.expand_mode {
            ExpandMode::Auto => {
                self.expanded.toggle(id.clone());
                self.sync_window();
            }
            ExpandMode::Controlled => {
                let request = ExpandRequest {
                    row: row.clone(),
                    column_key: column_key.map(str::to_string),
                    is_expanded: self.expanded.contains(id),
                    toggle: ExpandToggle {
                        id: id.clone(),
                        queue: Arc::clone(&self.pending_toggles),
                    },
                };
                tracing::debug!(target: targets::TABLE, %id, "expand requested");
                self.expand_clicked.emit(request);
                self.apply_pending_toggles();
            }
        }
        true
    }

    /// Applies toggles queued by [`ExpandToggle`] handles. Returns how many
    /// were applied.
    pub fn apply_pending_toggles(&mut self) -> usize {
        let pending = std::mem::take(&mut *self.pending_toggles.lock());
        if pending.is_empty() {
            return 0;
        }
        for id in &pending {
            self.expanded.toggle(id.clone());
        }
        self.sync_window();
        tracing::debug!(target: targets::TABLE, count = pending.len(), "pending toggles applied");
        pending.len()
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// The selection engine.
    pub fn selection(&self) -> &RowSelection {
        &self.selection
    }

    /// Replaces the multi-select settings. The current selection is kept.
    pub fn set_multi_select(&mut self, config: MultiSelectConfig) {
        self.selection.set_config(config);
    }

    /// Toggles a row's checkbox.
    pub fn toggle_row_selection(&mut self, id: &RowId) -> bool {
        self.apply_pending_toggles();
        let rows = flatten(&self.data, &self.expanded);
        let accepted = self.selection.toggle_row(&rows, id);
        if accepted {
            self.emit_selection();
        }
        accepted
    }

    /// Toggles the header checkbox.
    pub fn toggle_all_selection(&mut self) -> bool {
        self.apply_pending_toggles();
        let rows = flatten(&self.data, &self.expanded);
        let accepted = self.selection.toggle_all(&rows);
        if accepted {
            self.emit_selection();
        }
        accepted
    }

    /// Deselects everything.
    pub fn clear_selection(&mut self) -> bool {
        self.apply_pending_toggles();
        let accepted = self.selection.clear();
        if accepted {
            self.emit_selection();
        }
        accepted
    }

    /// Replaces the selection.
    pub fn select_rows(&mut self, ids: impl IntoIterator<Item = RowId>) -> bool {
        self.apply_pending_toggles();
        let accepted = self.selection.select_ids(ids);
        if accepted {
            self.emit_selection();
        }
        accepted
    }

    /// Mirrors an externally bound selection without emitting
    /// `selection_changed`.
    pub fn sync_selected_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) {
        self.selection.sync_from_rows(rows);
    }

    /// The selected rows, resolved against the forest.
    pub fn selected_rows(&self) -> Vec<&Row> {
        self.selection.resolve(&self.data)
    }

    /// Returns whether a row is selected.
    pub fn is_row_selected(&self, id: &RowId) -> bool {
        self.selection.is_selected(id)
    }

    /// Checkbox state of a visible row.
    pub fn row_check_state(&self, id: &RowId) -> Option<CheckState> {
        let rows = flatten(&self.data, &self.expanded);
        self.selection.row_state_by_id(&rows, id)
    }

    /// State of the header checkbox.
    pub fn header_check_state(&self) -> CheckState {
        let rows = flatten(&self.data, &self.expanded);
        self.selection.header_state(&rows)
    }

    /// Whether the header checkbox is shown.
    pub fn shows_header_checkbox(&self) -> bool {
        self.selection.is_enabled() && self.selection.config().show_header_checkbox
    }

    fn emit_selection(&self) {
        let rows: Vec<Row> = self
            .selection
            .resolve(&self.data)
            .into_iter()
            .cloned()
            .collect();
        tracing::debug!(target: targets::TABLE, selected = rows.len(), "selection changed");
        self.selection_changed.emit(rows);
    }

    // =========================================================================
    // Clicks
    // =========================================================================

    /// Handles a click on a row.
    ///
    /// Clicks on cells of interactive columns are not row clicks. Returns
    /// `true` if `row_clicked` was emitted.
    pub fn click_row(&self, id: &RowId, column_key: Option<&str>) -> bool {
        if let Some(key) = column_key
            && self.is_interactive_column(key)
        {
            return false;
        }
        let Some(row) = find_row(&self.data, id) else {
            return false;
        };
        self.row_clicked.emit(row.clone());
        true
    }

    fn is_interactive_column(&self, key: &str) -> bool {
        header::flat_columns(&self.columns)
            .iter()
            .any(|column| column.key == key && column.interactive)
    }

    // =========================================================================
    // Virtualization
    // =========================================================================

    /// The virtual window.
    pub fn virtual_window(&self) -> &VirtualWindow {
        &self.window
    }

    /// Mounts, resizes or unmounts the viewport.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        self.apply_pending_toggles();
        self.window.set_viewport(viewport);
    }

    /// Updates the scroll offset.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        self.apply_pending_toggles();
        self.window.set_scroll_offset(offset);
    }

    /// Records the measured height of a row.
    pub fn set_row_size(&mut self, index: usize, size: f32) {
        self.window.set_item_size(index, size);
    }

    /// Total height of all rows.
    pub fn total_size(&self) -> f32 {
        self.window.total_size()
    }

    /// The rows to render with their positions: the virtual window when
    /// virtualized, otherwise every row.
    pub fn rendered_rows(&self) -> Vec<RenderedRow<'_>> {
        let rows = self.flattened_rows();
        if self.virtualized {
            self.window
                .items()
                .iter()
                .filter_map(|item| {
                    rows.get(item.index).map(|row| RenderedRow {
                        item: *item,
                        row: *row,
                    })
                })
                .collect()
        } else {
            rows.iter()
                .enumerate()
                .filter_map(|(index, row)| {
                    self.window
                        .item(index)
                        .map(|item| RenderedRow { item, row: *row })
                })
                .collect()
        }
    }

    /// Expands a row's ancestors and returns the scroll offset that brings it
    /// into view.
    pub fn scroll_to_row(&mut self, id: &RowId) -> Option<f32> {
        if !self.expand_to(id) {
            return None;
        }
        let index = flatten(&self.data, &self.expanded)
            .iter()
            .position(|row| row.id() == id)?;
        self.window.scroll_to_index(index)
    }

    fn sync_window(&mut self) {
        let count = flatten(&self.data, &self.expanded).len();
        self.window.set_count(count);
    }
}

static_assertions::assert_impl_all!(DataTable: Send, Sync);
