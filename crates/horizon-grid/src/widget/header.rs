//! Grouped (multi-level) headers.
//!
//! A nested column tree renders as one header row per level. Group columns
//! span their leaf descendants horizontally; leaves declared at the top level
//! span every header row vertically. Data rows only ever use the flat list of
//! leaves from [`flat_columns`].
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::Column;
//! use horizon_grid::widget::header::{header_levels, max_depth};
//!
//! let columns = vec![
//!     Column::new("id", "ID"),
//!     Column::group("name", "Name", vec![
//!         Column::new("first", "First"),
//!         Column::new("last", "Last"),
//!     ]),
//! ];
//!
//! assert_eq!(max_depth(&columns), 2);
//! let levels = header_levels(&columns);
//! assert_eq!(levels[0][0].rowspan, 2);
//! assert_eq!(levels[0][1].colspan, 2);
//! assert_eq!(levels[1].len(), 2);
//! ```

use horizon_grid_core::logging::targets;

use super::resize::{ColumnWidths, effective_width};
use crate::model::column::collect_leaves;
use crate::model::{Column, FixedSide};

/// One cell of a header row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeaderCell<'a> {
    /// Key of the column this cell heads.
    pub key: &'a str,
    /// Header text.
    pub label: &'a str,
    /// The column definition.
    pub column: &'a Column,
    /// Number of leaf columns spanned horizontally.
    pub colspan: usize,
    /// Number of header rows spanned vertically.
    pub rowspan: usize,
    /// Whether the column is a group.
    pub is_group: bool,
    /// Header row index, 0 at the top.
    pub level: usize,
}

impl<'a> HeaderCell<'a> {
    fn new(column: &'a Column, colspan: usize, rowspan: usize, level: usize) -> Self {
        Self {
            key: &column.key,
            label: &column.label,
            column,
            colspan,
            rowspan,
            is_group: column.is_group(),
            level,
        }
    }
}

/// Returns `true` if any top-level column is a group.
pub fn has_groups(columns: &[Column]) -> bool {
    columns.iter().any(Column::is_group)
}

/// Number of header rows the column tree needs (1 for a flat list).
pub fn max_depth(columns: &[Column]) -> usize {
    columns
        .iter()
        .map(|column| {
            if column.is_group() {
                1 + max_depth(&column.children)
            } else {
                1
            }
        })
        .max()
        .unwrap_or(1)
}

/// The in-order leaf columns used for data cells and the grid template.
pub fn flat_columns(columns: &[Column]) -> Vec<&Column> {
    let mut out = Vec::new();
    collect_leaves(columns, &mut out);
    out
}

/// Number of leaf columns a column spans (1 for a leaf).
pub fn colspan(column: &Column) -> usize {
    if column.is_leaf() {
        1
    } else {
        column.children.iter().map(colspan).sum()
    }
}

/// Builds the header rows, one per level.
///
/// Without groups this is a single row of colspan-1, rowspan-1 cells. With
/// groups, a leaf declared at the top level has rowspan equal to the depth
/// and a leaf nested under a group has rowspan 1.
pub fn header_levels(columns: &[Column]) -> Vec<Vec<HeaderCell<'_>>> {
    if !has_groups(columns) {
        return vec![
            columns
                .iter()
                .map(|column| HeaderCell::new(column, 1, 1, 0))
                .collect(),
        ];
    }

    let depth = max_depth(columns);
    let levels: Vec<Vec<HeaderCell<'_>>> = (0..depth)
        .map(|target| {
            let mut cells = Vec::new();
            build_level(columns, target, 0, depth, &mut cells);
            cells
        })
        .collect();

    tracing::trace!(target: targets::HEADER, depth, "header levels built");
    levels
}

fn build_level<'a>(
    columns: &'a [Column],
    target: usize,
    level: usize,
    depth: usize,
    out: &mut Vec<HeaderCell<'a>>,
) {
    for column in columns {
        if column.is_leaf() {
            if level == target {
                let rowspan = if level == 0 { depth } else { 1 };
                out.push(HeaderCell::new(column, 1, rowspan, level));
            }
            continue;
        }

        if level == target {
            out.push(HeaderCell::new(column, colspan(column), 1, level));
        } else if level < target {
            build_level(&column.children, target, level + 1, depth, out);
        }
    }
}

/// Width of a column: a leaf's effective width, or the sum over a group's
/// leaves.
pub fn group_width(column: &Column, widths: &ColumnWidths) -> f32 {
    if column.is_leaf() {
        effective_width(column, widths)
    } else {
        column
            .children
            .iter()
            .map(|child| group_width(child, widths))
            .sum()
    }
}

/// The side a column sticks to. A group sticks only if every leaf descendant
/// is pinned to the same side.
pub fn group_fixed_side(column: &Column) -> Option<FixedSide> {
    if column.is_leaf() {
        return column.fixed;
    }

    let leaves = column.leaves();
    let first = leaves.first()?.fixed?;
    leaves
        .iter()
        .all(|leaf| leaf.fixed == Some(first))
        .then_some(first)
}
