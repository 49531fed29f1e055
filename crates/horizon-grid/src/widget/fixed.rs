//! Pinned (sticky) column layout.
//!
//! Pinned columns stay at a stable horizontal position while the rest of the
//! table scrolls. [`FixedColumns`] computes, for each pinned leaf column, the
//! distance from its edge (the sum of widths of the columns pinned between it
//! and that edge) and a stacking order so that columns nearer the edge paint
//! above the ones further in.

use std::fmt;

use horizon_grid_core::logging::targets;

use super::resize::{ColumnWidths, effective_width};
use crate::model::{Column, ColumnWidth, FixedSide};

/// Stacking base for pinned columns.
pub const FIXED_Z_INDEX_BASE: i32 = 50;

/// Stacking order of columns that scroll.
pub const NORMAL_Z_INDEX: i32 = 1;

/// Where a pinned column sticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StickyPosition {
    /// Edge the column sticks to.
    pub side: FixedSide,
    /// Distance from that edge in pixels.
    pub offset: f32,
}

/// A pinned column whose declared width is not a pixel literal.
///
/// Layout still works (the default width is used) but the offsets of the
/// columns pinned after it drift whenever its rendered width differs.
#[derive(Debug, Clone, PartialEq)]
pub struct FixedWidthWarning {
    /// Column key.
    pub key: String,
    /// The declared width, if any.
    pub width: Option<ColumnWidth>,
}

impl fmt::Display for FixedWidthWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self
            .width
            .as_ref()
            .map_or_else(|| "undefined".to_string(), ToString::to_string);
        write!(
            f,
            "fixed column \"{}\" must have a width in pixels (e.g. \"200px\"), got \"{}\"",
            self.key, width
        )
    }
}

/// Lists pinned columns without a pixel-literal width.
pub fn config_warnings<'a>(columns: impl IntoIterator<Item = &'a Column>) -> Vec<FixedWidthWarning> {
    columns
        .into_iter()
        .filter(|column| column.fixed.is_some() && column.declared_pixel_width().is_none())
        .map(|column| FixedWidthWarning {
            key: column.key.clone(),
            width: column.width.clone(),
        })
        .collect()
}

/// Logs [`config_warnings`] through `tracing`. Returns how many were logged.
pub fn log_config_warnings<'a>(columns: impl IntoIterator<Item = &'a Column>) -> usize {
    let warnings = config_warnings(columns);
    for warning in &warnings {
        tracing::warn!(target: targets::FIXED, key = %warning.key, "{warning}");
    }
    warnings.len()
}

/// Pinned-column layout over a list of leaf columns.
#[derive(Debug, Clone)]
pub struct FixedColumns<'a> {
    columns: Vec<&'a Column>,
    widths: &'a ColumnWidths,
}

impl<'a> FixedColumns<'a> {
    /// Creates the layout for leaf columns in display order, using live
    /// widths where recorded.
    pub fn new(columns: impl IntoIterator<Item = &'a Column>, widths: &'a ColumnWidths) -> Self {
        Self {
            columns: columns.into_iter().collect(),
            widths,
        }
    }

    // =========================================================================
    // Partition
    // =========================================================================

    /// Columns pinned to the left, in display order.
    pub fn left_fixed(&self) -> Vec<&'a Column> {
        self.on_side(Some(FixedSide::Left))
    }

    /// Columns pinned to the right, in display order.
    pub fn right_fixed(&self) -> Vec<&'a Column> {
        self.on_side(Some(FixedSide::Right))
    }

    /// Columns that scroll, in display order.
    pub fn normal(&self) -> Vec<&'a Column> {
        self.on_side(None)
    }

    fn on_side(&self, side: Option<FixedSide>) -> Vec<&'a Column> {
        self.columns
            .iter()
            .copied()
            .filter(|column| column.fixed == side)
            .collect()
    }

    /// Returns `true` if the column is pinned.
    pub fn is_fixed(&self, column: &Column) -> bool {
        column.fixed.is_some()
    }

    // =========================================================================
    // Offsets
    // =========================================================================

    /// Width used for layout.
    pub fn width(&self, column: &Column) -> f32 {
        effective_width(column, self.widths)
    }

    /// Sum of the widths of left-pinned columns before `key`.
    pub fn left_offset(&self, key: &str) -> f32 {
        self.columns
            .iter()
            .take_while(|column| column.key != key)
            .filter(|column| column.fixed == Some(FixedSide::Left))
            .map(|column| self.width(column))
            .sum()
    }

    /// Sum of the widths of right-pinned columns after `key`. Zero for an
    /// unknown key.
    pub fn right_offset(&self, key: &str) -> f32 {
        let Some(position) = self.position(key) else {
            return 0.0;
        };
        self.columns[position + 1..]
            .iter()
            .filter(|column| column.fixed == Some(FixedSide::Right))
            .map(|column| self.width(column))
            .sum()
    }

    /// Sticky side and offset of a column, or `None` if it scrolls.
    pub fn fixed_style(&self, column: &Column) -> Option<StickyPosition> {
        let side = column.fixed?;
        let offset = match side {
            FixedSide::Left => self.left_offset(&column.key),
            FixedSide::Right => self.right_offset(&column.key),
        };
        Some(StickyPosition { side, offset })
    }

    // =========================================================================
    // Stacking
    // =========================================================================

    /// Stacking order of a column.
    ///
    /// Pinned columns rank above [`FIXED_Z_INDEX_BASE`], the one nearest its
    /// edge highest. Scrolling columns get [`NORMAL_Z_INDEX`].
    pub fn z_index(&self, column: &Column) -> i32 {
        let Some(side) = column.fixed else {
            return NORMAL_Z_INDEX;
        };
        let Some(position) = self.position(&column.key) else {
            return FIXED_Z_INDEX_BASE;
        };

        // Pinned columns between this one and its edge.
        let between = match side {
            FixedSide::Left => &self.columns[..position],
            FixedSide::Right => &self.columns[position + 1..],
        };
        let total = count_on(side, &self.columns);
        FIXED_Z_INDEX_BASE + to_i32(total) - to_i32(count_on(side, between))
    }

    fn position(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.key == key)
    }

    // =========================================================================
    // Shadow edges
    // =========================================================================

    /// Returns `true` if `key` is the last left-pinned column.
    pub fn is_last_left_fixed(&self, key: &str) -> bool {
        self.columns
            .iter()
            .rev()
            .find(|column| column.fixed == Some(FixedSide::Left))
            .is_some_and(|column| column.key == key)
    }

    /// Returns `true` if `key` is the first right-pinned column.
    pub fn is_first_right_fixed(&self, key: &str) -> bool {
        self.columns
            .iter()
            .find(|column| column.fixed == Some(FixedSide::Right))
            .is_some_and(|column| column.key == key)
    }

    /// Pinned columns without a pixel-literal width.
    pub fn config_warnings(&self) -> Vec<FixedWidthWarning> {
        config_warnings(self.columns.iter().copied())
    }
}

fn count_on(side: FixedSide, columns: &[&Column]) -> usize {
    columns.iter().filter(|c| c.fixed == Some(side)).count()
}

fn to_i32(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX)
}
