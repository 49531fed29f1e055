//! Tree flattening and expansion state.
//!
//! [`flatten`] projects a forest of [`Row`]s onto the linear, depth-annotated
//! sequence a table renders. The projection is recomputed from scratch on
//! every call: the same forest and [`ExpandedRows`] always produce the same
//! sequence.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{flatten, ExpandedRows, Row, RowId};
//!
//! let data = vec![Row::new(1).with_children(vec![Row::new(2), Row::new(3)])];
//! let mut expanded = ExpandedRows::new();
//!
//! assert_eq!(flatten(&data, &expanded).len(), 1);
//!
//! expanded.toggle(RowId::Int(1));
//! let rows = flatten(&data, &expanded);
//! let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
//! assert_eq!(depths, [0, 1, 1]);
//! ```

use std::collections::HashSet;

use horizon_grid_core::Signal;
use horizon_grid_core::logging::targets;

use super::row::{Row, RowId, ancestor_ids};

/// A row projected into the flattened display sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlattenedRow<'a> {
    /// The original row, untouched.
    pub row: &'a Row,
    /// Hop count from the root (roots are 0).
    pub depth: usize,
    /// ID of the parent row; `None` for roots.
    pub parent_id: Option<&'a RowId>,
    /// Whether the row shows an expand affordance.
    pub has_children: bool,
    /// Whether the row's ID is in the expanded set.
    pub is_expanded: bool,
}

impl<'a> FlattenedRow<'a> {
    /// The row's ID.
    pub fn id(&self) -> &'a RowId {
        &self.row.id
    }
}

/// Flattens a forest in pre-order, descending into a row's children only when
/// the row is expanded.
pub fn flatten<'a>(rows: &'a [Row], expanded: &ExpandedRows) -> Vec<FlattenedRow<'a>> {
    let mut out = Vec::with_capacity(rows.len());
    flatten_into(rows, expanded, 0, None, &mut out);
    out
}

fn flatten_into<'a>(
    rows: &'a [Row],
    expanded: &ExpandedRows,
    depth: usize,
    parent_id: Option<&'a RowId>,
    out: &mut Vec<FlattenedRow<'a>>,
) {
    for row in rows {
        let is_expanded = expanded.contains(&row.id);
        out.push(FlattenedRow {
            row,
            depth,
            parent_id,
            has_children: row.shows_expander(),
            is_expanded,
        });

        if is_expanded && row.has_children() {
            flatten_into(&row.children, expanded, depth + 1, Some(&row.id), out);
        }
    }
}

/// The set of expanded row IDs.
///
/// # Signals
///
/// - `expanded(RowId)`: Emitted when a row is expanded
/// - `collapsed(RowId)`: Emitted when a row is collapsed
/// - `reset(())`: Emitted after expand-all or collapse-all
#[derive(Debug, Default)]
pub struct ExpandedRows {
    ids: HashSet<RowId>,

    /// Emitted when a row is expanded.
    pub expanded: Signal<RowId>,
    /// Emitted when a row is collapsed.
    pub collapsed: Signal<RowId>,
    /// Emitted after the whole set is replaced.
    pub reset: Signal<()>,
}

impl Clone for ExpandedRows {
    /// Clones the expanded IDs. Connections are not cloned.
    fn clone(&self) -> Self {
        Self::with_ids(self.ids.iter().cloned())
    }
}

impl ExpandedRows {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pre-seeded set.
    pub fn with_ids(ids: impl IntoIterator<Item = RowId>) -> Self {
        Self {
            ids: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Returns whether the row is expanded.
    pub fn contains(&self, id: &RowId) -> bool {
        self.ids.contains(id)
    }

    /// Alias for [`contains`](Self::contains).
    pub fn is_expanded(&self, id: &RowId) -> bool {
        self.contains(id)
    }

    /// Number of expanded rows.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns `true` if nothing is expanded.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterates over the expanded IDs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &RowId> {
        self.ids.iter()
    }

    /// Expands a row. Returns `true` if it was collapsed before.
    pub fn expand(&mut self, id: RowId) -> bool {
        if self.ids.insert(id.clone()) {
            tracing::trace!(target: targets::TREE, %id, "row expanded");
            self.expanded.emit(id);
            true
        } else {
            false
        }
    }

    /// Collapses a row. Returns `true` if it was expanded before.
    pub fn collapse(&mut self, id: &RowId) -> bool {
        if self.ids.remove(id) {
            tracing::trace!(target: targets::TREE, %id, "row collapsed");
            self.collapsed.emit(id.clone());
            true
        } else {
            false
        }
    }

    /// Flips a row's membership. Returns the new expanded state.
    pub fn toggle(&mut self, id: RowId) -> bool {
        if self.contains(&id) {
            self.collapse(&id);
            false
        } else {
            self.expand(id);
            true
        }
    }

    /// Expands every row that has children or is flagged expandable, at every
    /// depth.
    pub fn expand_all(&mut self, rows: &[Row]) {
        let mut ids = HashSet::new();
        collect_expandable(rows, &mut ids);
        tracing::debug!(target: targets::TREE, count = ids.len(), "expand all");
        self.ids = ids;
        self.reset.emit(());
    }

    /// Collapses every row.
    pub fn collapse_all(&mut self) {
        tracing::debug!(target: targets::TREE, count = self.ids.len(), "collapse all");
        self.ids.clear();
        self.reset.emit(());
    }

    /// Expands every ancestor of a row so that the row becomes visible.
    ///
    /// Returns `false` if the row is not in the forest.
    pub fn expand_to(&mut self, rows: &[Row], id: &RowId) -> bool {
        let Some(ancestors) = ancestor_ids(rows, id) else {
            return false;
        };
        for ancestor in ancestors {
            self.expand(ancestor);
        }
        true
    }
}

fn collect_expandable(rows: &[Row], out: &mut HashSet<RowId>) {
    for row in rows {
        if row.is_expandable() {
            out.insert(row.id.clone());
            collect_expandable(&row.children, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn id(n: i64) -> RowId {
        RowId::Int(n)
    }

    fn ids(rows: &[FlattenedRow<'_>]) -> Vec<RowId> {
        rows.iter().map(|r| r.id().clone()).collect()
    }

    /// A(1) -> [B(2) -> [D(4)], C(3)], E(5)
    fn forest() -> Vec<Row> {
        vec![
            Row::new(1).with_children(vec![
                Row::new(2).with_children(vec![Row::new(4)]),
                Row::new(3),
            ]),
            Row::new(5),
        ]
    }

    #[test]
    fn test_flatten_collapsed() {
        let data = forest();
        let rows = flatten(&data, &ExpandedRows::new());
        assert_eq!(ids(&rows), vec![id(1), id(5)]);
        assert!(rows[0].has_children);
        assert!(!rows[0].is_expanded);
        assert!(!rows[1].has_children);
    }

    #[test]
    fn test_flatten_order_and_depth() {
        let data = forest();
        let expanded = ExpandedRows::with_ids([id(1), id(2)]);
        let rows = flatten(&data, &expanded);

        assert_eq!(ids(&rows), vec![id(1), id(2), id(4), id(3), id(5)]);
        let depths: Vec<_> = rows.iter().map(|r| r.depth).collect();
        assert_eq!(depths, [0, 1, 2, 1, 0]);
        assert_eq!(rows[2].parent_id, Some(&id(2)));
        assert_eq!(rows[0].parent_id, None);
    }

    #[test]
    fn test_expanded_child_of_collapsed_parent_stays_hidden() {
        let data = forest();
        let expanded = ExpandedRows::with_ids([id(2)]);
        assert_eq!(ids(&flatten(&data, &expanded)), vec![id(1), id(5)]);
    }

    #[test]
    fn test_flatten_is_pure() {
        let data = forest();
        let expanded = ExpandedRows::with_ids([id(1)]);
        assert_eq!(flatten(&data, &expanded), flatten(&data, &expanded));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let data = forest();
        let mut expanded = ExpandedRows::with_ids([id(1)]);
        let before = ids(&flatten(&data, &expanded));

        assert!(expanded.toggle(id(2)));
        assert_eq!(ids(&flatten(&data, &expanded)), vec![id(1), id(2), id(4), id(3), id(5)]);
        assert!(!expanded.toggle(id(2)));

        assert_eq!(ids(&flatten(&data, &expanded)), before);
        assert_eq!(expanded.len(), 1);
    }

    #[test]
    fn test_expand_all_and_collapse_all() {
        let mut data = forest();
        data.push(Row::new(6).with_expanded_content("notes"));

        let mut expanded = ExpandedRows::new();
        expanded.expand_all(&data);
        assert!(expanded.contains(&id(1)));
        assert!(expanded.contains(&id(2)));
        assert!(expanded.contains(&id(6)));
        assert!(!expanded.contains(&id(4)));
        assert_eq!(flatten(&data, &expanded).len(), 6);

        expanded.collapse_all();
        assert!(expanded.is_empty());
    }

    #[test]
    fn test_expandable_row_without_children_is_a_leaf_in_flattening() {
        let data = vec![Row::new(1).with_expanded_content("notes")];
        let expanded = ExpandedRows::with_ids([id(1)]);
        let rows = flatten(&data, &expanded);
        assert_eq!(rows.len(), 1);
        assert!(rows[0].has_children);
        assert!(rows[0].is_expanded);
    }

    #[test]
    fn test_expand_to() {
        let data = forest();
        let mut expanded = ExpandedRows::new();
        assert!(expanded.expand_to(&data, &id(4)));
        assert!(ids(&flatten(&data, &expanded)).contains(&id(4)));
        assert!(!expanded.expand_to(&data, &id(99)));
    }

    #[test]
    fn test_expand_signals() {
        let mut expanded = ExpandedRows::new();
        let count = Arc::new(AtomicUsize::new(0));

        let count_clone = count.clone();
        expanded.expanded.connect(move |_| {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });

        expanded.expand(id(1));
        expanded.expand(id(1));
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
