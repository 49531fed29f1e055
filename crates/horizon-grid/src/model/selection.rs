//! Hierarchical row selection.
//!
//! This module provides [`RowSelection`], which tracks selected row IDs over
//! the flattened row sequence produced by [`flatten`](super::flatten).
//!
//! Two modes are supported:
//!
//! - [`SelectionMode::Independent`]: toggling a row affects only that row.
//! - [`SelectionMode::Dependent`]: toggling a row cascades to its descendants
//!   (when `select_children` is on) and re-checks its immediate parent (when
//!   `select_parent` is on).
//!
//! The parent re-check is deliberately single-level: after toggling a
//! grandchild, the parent is re-evaluated but the grandparent is not.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{
//!     flatten, CheckState, ExpandedRows, MultiSelectConfig, Row, RowId, RowSelection,
//!     SelectionMode,
//! };
//!
//! let data = vec![Row::new(1).with_children(vec![Row::new(2), Row::new(3)])];
//! let expanded = ExpandedRows::with_ids([RowId::Int(1)]);
//! let rows = flatten(&data, &expanded);
//!
//! let mut selection = RowSelection::new(
//!     MultiSelectConfig::enabled().with_mode(SelectionMode::Dependent),
//! );
//! selection.toggle_row(&rows, &RowId::Int(1));
//!
//! assert_eq!(selection.len(), 3);
//! assert_eq!(selection.header_state(&rows), CheckState::Checked);
//! ```

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

use super::row::{Row, RowId, find_row};
use super::tree::FlattenedRow;

/// How selecting a row relates to its parent and children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    /// Each row is selected on its own (default).
    #[default]
    Independent,
    /// Parent/child relationships drive selection.
    Dependent,
}

/// Tri-state checkbox value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckState {
    /// Selected (and, for parents, every descendant in scope is too).
    Checked,
    /// Not selected, and no descendant in scope is.
    Unchecked,
    /// Partially selected.
    Indeterminate,
}

/// Predicate deciding whether a row may be selected.
pub type RowPredicate = Arc<dyn Fn(&Row) -> bool + Send + Sync>;

/// Multi-select configuration.
///
/// The row-selectability predicate cannot be expressed in a configuration
/// file; it is skipped by serde and set with
/// [`with_row_selectable`](Self::with_row_selectable).
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSelectConfig {
    /// Enables multi-select. When off, every selection operation is a no-op.
    pub enabled: bool,

    /// Selection mode for hierarchical data.
    pub selection_mode: SelectionMode,

    /// Dependent mode: apply a row's toggle to its descendants.
    pub select_children: bool,

    /// Dependent mode: re-check the immediate parent after a toggle.
    pub select_parent: bool,

    /// Show the "select all" checkbox in the header.
    pub show_header_checkbox: bool,

    /// Limit descendant cascades and parent states to visible descendants.
    pub select_only_visible: bool,

    /// Custom selectability predicate.
    #[serde(skip)]
    pub is_row_selectable: Option<RowPredicate>,
}

impl Default for MultiSelectConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            selection_mode: SelectionMode::Independent,
            select_children: true,
            select_parent: true,
            show_header_checkbox: true,
            select_only_visible: true,
            is_row_selectable: None,
        }
    }
}

impl fmt::Debug for MultiSelectConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSelectConfig")
            .field("enabled", &self.enabled)
            .field("selection_mode", &self.selection_mode)
            .field("select_children", &self.select_children)
            .field("select_parent", &self.select_parent)
            .field("show_header_checkbox", &self.show_header_checkbox)
            .field("select_only_visible", &self.select_only_visible)
            .field("is_row_selectable", &self.is_row_selectable.is_some())
            .finish()
    }
}

impl MultiSelectConfig {
    /// Default configuration with multi-select turned on.
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    /// Sets the selection mode using builder pattern.
    pub fn with_mode(mut self, mode: SelectionMode) -> Self {
        self.selection_mode = mode;
        self
    }

    /// Sets the children cascade using builder pattern.
    pub fn with_select_children(mut self, select_children: bool) -> Self {
        self.select_children = select_children;
        self
    }

    /// Sets the parent re-check using builder pattern.
    pub fn with_select_parent(mut self, select_parent: bool) -> Self {
        self.select_parent = select_parent;
        self
    }

    /// Sets visible-only scoping using builder pattern.
    pub fn with_select_only_visible(mut self, only_visible: bool) -> Self {
        self.select_only_visible = only_visible;
        self
    }

    /// Sets the selectability predicate using builder pattern.
    pub fn with_row_selectable<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Row) -> bool + Send + Sync + 'static,
    {
        self.is_row_selectable = Some(Arc::new(predicate));
        self
    }
}

/// Selected row IDs plus the rules for changing them.
///
/// Selection is keyed by [`RowId`]. Operations naming an ID that is not in
/// the flattened sequence are no-ops. Mutating operations return `true` when
/// they were accepted (multi-select enabled and the row selectable), which is
/// when a host should report the selection outward.
#[derive(Debug, Clone, Default)]
pub struct RowSelection {
    config: MultiSelectConfig,

    /// Set of selected IDs for O(1) lookup.
    selected_ids: HashSet<RowId>,

    /// Selected IDs in insertion order.
    selected_order: Vec<RowId>,
}

impl RowSelection {
    /// Creates an empty selection.
    pub fn new(config: MultiSelectConfig) -> Self {
        Self {
            config,
            selected_ids: HashSet::new(),
            selected_order: Vec::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Gets the configuration.
    pub fn config(&self) -> &MultiSelectConfig {
        &self.config
    }

    /// Replaces the configuration. The current selection is kept.
    pub fn set_config(&mut self, config: MultiSelectConfig) {
        self.config = config;
    }

    /// Whether multi-select is enabled.
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Whether parent/child relationships drive selection.
    pub fn is_dependent_mode(&self) -> bool {
        self.config.selection_mode == SelectionMode::Dependent
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns whether a row ID is selected.
    pub fn is_selected(&self, id: &RowId) -> bool {
        self.selected_ids.contains(id)
    }

    /// Returns whether the configured predicate allows selecting a row.
    pub fn is_row_selectable(&self, row: &Row) -> bool {
        self.config
            .is_row_selectable
            .as_ref()
            .is_none_or(|predicate| predicate(row))
    }

    /// Selected IDs in insertion order.
    pub fn selected_ids(&self) -> &[RowId] {
        &self.selected_order
    }

    /// Number of selected IDs.
    pub fn len(&self) -> usize {
        self.selected_order.len()
    }

    /// Returns `true` if nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected_order.is_empty()
    }

    /// Resolves the selected IDs to the original rows of the input forest.
    ///
    /// IDs with no matching row are skipped.
    pub fn resolve<'a>(&self, data: &'a [Row]) -> Vec<&'a Row> {
        self.selected_order
            .iter()
            .filter_map(|id| find_row(data, id))
            .collect()
    }

    /// Checkbox state of a row.
    ///
    /// A row without children reflects its own membership. A parent compares
    /// the number of selected descendants in scope against the total.
    pub fn row_state(&self, rows: &[FlattenedRow<'_>], row: &FlattenedRow<'_>) -> CheckState {
        let own = self.own_state(row.id());
        if !row.row.has_children() {
            return own;
        }

        let scope = self.descendant_scope(rows, row.row);
        if scope.is_empty() {
            return own;
        }

        let selected_count = scope.iter().filter(|id| self.is_selected(id)).count();
        let is_selected = self.is_selected(row.id());

        if selected_count == 0 && !is_selected {
            CheckState::Unchecked
        } else if selected_count == scope.len() && is_selected {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    /// Checkbox state of the row with the given ID, if it is in the sequence.
    pub fn row_state_by_id(&self, rows: &[FlattenedRow<'_>], id: &RowId) -> Option<CheckState> {
        find_flattened(rows, id).map(|row| self.row_state(rows, row))
    }

    /// State of the "select all" checkbox over the selectable rows.
    pub fn header_state(&self, rows: &[FlattenedRow<'_>]) -> CheckState {
        let mut total = 0usize;
        let mut selected = 0usize;
        for row in rows.iter().filter(|row| self.is_row_selectable(row.row)) {
            total += 1;
            if self.is_selected(row.id()) {
                selected += 1;
            }
        }

        if selected == 0 {
            CheckState::Unchecked
        } else if selected == total {
            CheckState::Checked
        } else {
            CheckState::Indeterminate
        }
    }

    // =========================================================================
    // Mutation
    // =========================================================================

    /// Toggles a row, applying the dependent-mode cascade and parent re-check.
    pub fn toggle_row(&mut self, rows: &[FlattenedRow<'_>], id: &RowId) -> bool {
        if !self.is_enabled() {
            return false;
        }
        let Some(row) = find_flattened(rows, id) else {
            tracing::trace!(target: targets::SELECTION, %id, "toggle ignored: row not in sequence");
            return false;
        };
        if !self.is_row_selectable(row.row) {
            tracing::trace!(target: targets::SELECTION, %id, "toggle ignored: row not selectable");
            return false;
        }

        let dependent = self.is_dependent_mode();
        let cascade = if dependent && self.config.select_children {
            self.descendant_scope(rows, row.row)
        } else {
            Vec::new()
        };

        if self.is_selected(id) {
            self.remove_ids(std::iter::once(id).chain(cascade.iter()));
        } else {
            self.insert_id(id.clone());
            for child in cascade {
                self.insert_id(child);
            }
        }

        if dependent && self.config.select_parent {
            self.recheck_parent(rows, row);
        }

        tracing::debug!(
            target: targets::SELECTION,
            %id,
            selected = self.len(),
            "row toggled"
        );
        true
    }

    /// Selects every selectable row, or deselects them all when the header is
    /// already checked.
    pub fn toggle_all(&mut self, rows: &[FlattenedRow<'_>]) -> bool {
        if !self.is_enabled() {
            return false;
        }

        let deselect = self.header_state(rows) == CheckState::Checked;
        let selectable: Vec<&RowId> = rows
            .iter()
            .filter(|row| self.is_row_selectable(row.row))
            .map(|row| row.id())
            .collect();

        if deselect {
            self.remove_ids(selectable.into_iter());
        } else {
            for id in selectable {
                self.insert_id(id.clone());
            }
        }

        tracing::debug!(
            target: targets::SELECTION,
            deselect,
            selected = self.len(),
            "all rows toggled"
        );
        true
    }

    /// Clears the selection.
    pub fn clear(&mut self) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.selected_ids.clear();
        self.selected_order.clear();
        true
    }

    /// Replaces the selection with the given IDs.
    pub fn select_ids(&mut self, ids: impl IntoIterator<Item = RowId>) -> bool {
        if !self.is_enabled() {
            return false;
        }
        self.replace(ids);
        true
    }

    /// Mirrors an externally bound selection into this model.
    ///
    /// Unlike [`select_ids`](Self::select_ids) this always applies, so a
    /// pre-selected value survives toggling multi-select on later.
    pub fn sync_from_rows<'a>(&mut self, rows: impl IntoIterator<Item = &'a Row>) {
        self.sync_from_ids(rows.into_iter().map(|row| row.id.clone()));
    }

    /// Like [`sync_from_rows`](Self::sync_from_rows), for a bound list of IDs.
    pub fn sync_from_ids(&mut self, ids: impl IntoIterator<Item = RowId>) {
        self.replace(ids);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn own_state(&self, id: &RowId) -> CheckState {
        if self.is_selected(id) {
            CheckState::Checked
        } else {
            CheckState::Unchecked
        }
    }

    /// Descendant IDs a cascade or parent state covers.
    ///
    /// With `select_only_visible`, direct children are always in scope, and a
    /// child's own descendants only while that child is expanded in the
    /// current sequence.
    fn descendant_scope(&self, rows: &[FlattenedRow<'_>], row: &Row) -> Vec<RowId> {
        if !self.config.select_only_visible {
            return row.descendant_ids();
        }

        let expanded: HashSet<&RowId> = rows
            .iter()
            .filter(|r| r.is_expanded)
            .map(|r| r.id())
            .collect();

        let mut ids = Vec::new();
        collect_visible(&row.children, &expanded, &mut ids);
        ids
    }

    fn recheck_parent(&mut self, rows: &[FlattenedRow<'_>], row: &FlattenedRow<'_>) {
        let Some(parent_id) = row.parent_id else {
            return;
        };
        let Some(parent) = find_flattened(rows, parent_id) else {
            return;
        };

        let all_selected = parent
            .row
            .children
            .iter()
            .all(|child| self.is_selected(&child.id));

        if all_selected {
            self.insert_id(parent_id.clone());
        } else {
            self.remove_ids(std::iter::once(parent_id));
        }
    }

    fn insert_id(&mut self, id: RowId) {
        if self.selected_ids.insert(id.clone()) {
            self.selected_order.push(id);
        }
    }

    fn remove_ids<'a>(&mut self, ids: impl Iterator<Item = &'a RowId>) {
        let mut removed = false;
        for id in ids {
            removed |= self.selected_ids.remove(id);
        }
        if removed {
            let selected = &self.selected_ids;
            self.selected_order.retain(|id| selected.contains(id));
        }
    }

    fn replace(&mut self, ids: impl IntoIterator<Item = RowId>) {
        self.selected_ids.clear();
        self.selected_order.clear();
        for id in ids {
            self.insert_id(id);
        }
    }
}

fn find_flattened<'r, 'a>(rows: &'r [FlattenedRow<'a>], id: &RowId) -> Option<&'r FlattenedRow<'a>> {
    rows.iter().find(|row| row.id() == id)
}

fn collect_visible(children: &[Row], expanded: &HashSet<&RowId>, out: &mut Vec<RowId>) {
    for child in children {
        out.push(child.id.clone());
        if expanded.contains(&child.id) {
            collect_visible(&child.children, expanded, out);
        }
    }
}

static_assertions::assert_impl_all!(RowSelection: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpandedRows, flatten};

    fn id(n: i64) -> RowId {
        RowId::Int(n)
    }

    fn selected(selection: &RowSelection) -> Vec<RowId> {
        let mut ids = selection.selected_ids().to_vec();
        ids.sort();
        ids
    }

    fn dependent() -> RowSelection {
        RowSelection::new(MultiSelectConfig::enabled().with_mode(SelectionMode::Dependent))
    }

    /// P(1) -> [X(2), Y(3)]
    fn family() -> Vec<Row> {
        vec![Row::new(1).with_children(vec![Row::new(2), Row::new(3)])]
    }

    /// G(1) -> [P(2) -> [C1(4), C2(5)], S(3)]
    fn three_levels() -> Vec<Row> {
        vec![Row::new(1).with_children(vec![
            Row::new(2).with_children(vec![Row::new(4), Row::new(5)]),
            Row::new(3),
        ])]
    }

    #[test]
    fn test_disabled_is_noop() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::new());
        let mut selection = RowSelection::new(MultiSelectConfig::default());

        assert!(!selection.toggle_row(&rows, &id(1)));
        assert!(!selection.toggle_all(&rows));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_independent_toggle() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = RowSelection::new(MultiSelectConfig::enabled());

        assert!(selection.toggle_row(&rows, &id(1)));
        assert_eq!(selected(&selection), vec![id(1)]);
        assert_eq!(
            selection.row_state(&rows, &rows[0]),
            CheckState::Indeterminate
        );

        selection.toggle_row(&rows, &id(1));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_dependent_cascade_then_parent_recheck() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = dependent();

        selection.toggle_row(&rows, &id(1));
        assert_eq!(selected(&selection), vec![id(1), id(2), id(3)]);
        assert_eq!(selection.row_state(&rows, &rows[0]), CheckState::Checked);

        selection.toggle_row(&rows, &id(2));
        assert_eq!(selected(&selection), vec![id(3)]);
        assert_eq!(
            selection.row_state(&rows, &rows[0]),
            CheckState::Indeterminate
        );
    }

    #[test]
    fn test_selecting_last_child_selects_parent() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = dependent();

        selection.toggle_row(&rows, &id(2));
        assert!(!selection.is_selected(&id(1)));
        selection.toggle_row(&rows, &id(3));
        assert!(selection.is_selected(&id(1)));
        assert_eq!(selection.row_state(&rows, &rows[0]), CheckState::Checked);
    }

    #[test]
    fn test_parent_recheck_is_single_level() {
        let data = three_levels();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1), id(2)]));
        let mut selection = dependent();

        selection.toggle_row(&rows, &id(1));
        assert_eq!(selection.len(), 5);

        // Deselecting a grandchild clears its parent but leaves the grandparent.
        selection.toggle_row(&rows, &id(4));
        assert!(!selection.is_selected(&id(4)));
        assert!(!selection.is_selected(&id(2)));
        assert!(selection.is_selected(&id(1)));
    }

    #[test]
    fn test_visible_only_cascade_skips_collapsed_grandchildren() {
        let data = three_levels();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = dependent();

        selection.toggle_row(&rows, &id(1));
        assert_eq!(selected(&selection), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_full_cascade_includes_hidden_descendants() {
        let data = three_levels();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = RowSelection::new(
            MultiSelectConfig::enabled()
                .with_mode(SelectionMode::Dependent)
                .with_select_only_visible(false),
        );

        selection.toggle_row(&rows, &id(1));
        assert_eq!(selection.len(), 5);
    }

    #[test]
    fn test_cascade_disabled() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::with_ids([id(1)]));
        let mut selection = RowSelection::new(
            MultiSelectConfig::enabled()
                .with_mode(SelectionMode::Dependent)
                .with_select_children(false)
                .with_select_parent(false),
        );

        selection.toggle_row(&rows, &id(1));
        assert_eq!(selected(&selection), vec![id(1)]);
        selection.toggle_row(&rows, &id(2));
        selection.toggle_row(&rows, &id(3));
        assert_eq!(selected(&selection), vec![id(1), id(2), id(3)]);
    }

    #[test]
    fn test_header_tri_state() {
        let data = vec![Row::new(1), Row::new(2), Row::new(3)];
        let rows = flatten(&data, &ExpandedRows::new());
        let mut selection = RowSelection::new(MultiSelectConfig::enabled());

        assert_eq!(selection.header_state(&rows), CheckState::Unchecked);
        selection.toggle_row(&rows, &id(1));
        assert_eq!(selection.header_state(&rows), CheckState::Indeterminate);
        selection.toggle_row(&rows, &id(2));
        assert_eq!(selection.header_state(&rows), CheckState::Indeterminate);
        selection.toggle_row(&rows, &id(3));
        assert_eq!(selection.header_state(&rows), CheckState::Checked);
    }

    #[test]
    fn test_toggle_all() {
        let data = vec![Row::new(1), Row::new(2), Row::new(3)];
        let rows = flatten(&data, &ExpandedRows::new());
        let mut selection = RowSelection::new(MultiSelectConfig::enabled());

        selection.toggle_row(&rows, &id(2));
        selection.toggle_all(&rows);
        assert_eq!(selection.len(), 3);

        selection.toggle_all(&rows);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_unselectable_rows_are_excluded() {
        let data = vec![
            Row::new(1).with_field("locked", true),
            Row::new(2),
            Row::new(3),
        ];
        let rows = flatten(&data, &ExpandedRows::new());
        let mut selection = RowSelection::new(MultiSelectConfig::enabled().with_row_selectable(
            |row| row.field("locked").and_then(|v| v.as_bool()) != Some(true),
        ));

        assert!(!selection.toggle_row(&rows, &id(1)));
        selection.toggle_all(&rows);
        assert_eq!(selected(&selection), vec![id(2), id(3)]);
        assert_eq!(selection.header_state(&rows), CheckState::Checked);
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let data = family();
        let rows = flatten(&data, &ExpandedRows::new());
        let mut selection = RowSelection::new(MultiSelectConfig::enabled());

        assert!(!selection.toggle_row(&rows, &id(2)));
        assert!(!selection.toggle_row(&rows, &id(99)));
        assert!(selection.is_empty());
    }

    #[test]
    fn test_resolve_skips_unknown_ids() {
        let data = family();
        let mut selection = RowSelection::new(MultiSelectConfig::enabled());
        selection.select_ids([id(3), id(42), id(1)]);

        let resolved: Vec<_> = selection.resolve(&data).iter().map(|r| r.id.clone()).collect();
        assert_eq!(resolved, vec![id(3), id(1)]);
        assert_eq!(selection.selected_ids(), &[id(3), id(42), id(1)]);
    }

    #[test]
    fn test_sync_from_rows_applies_when_disabled() {
        let data = family();
        let mut selection = RowSelection::new(MultiSelectConfig::default());
        selection.sync_from_rows(data.iter());
        assert!(selection.is_selected(&id(1)));
    }

    #[test]
    fn test_config_defaults_from_empty_json() {
        let config: MultiSelectConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.enabled);
        assert_eq!(config.selection_mode, SelectionMode::Independent);
        assert!(config.select_children);
        assert!(config.select_parent);
        assert!(config.show_header_checkbox);
        assert!(config.select_only_visible);
        assert!(config.is_row_selectable.is_none());
    }
}
