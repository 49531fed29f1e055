//! Prelude module for Horizon Grid.
//!
//! This module re-exports the most commonly used types for convenient importing:
//!
//! ```
//! use horizon_grid::prelude::*;
//! ```

// ============================================================================
// Signal/Slot System
// ============================================================================

pub use horizon_grid_core::{ConnectionGuard, ConnectionId, Signal};

// ============================================================================
// Data Model
// ============================================================================

pub use crate::model::{
    Alignment, CheckState, Column, ColumnWidth, ExpandedRows, FixedSide, FlattenedRow,
    MultiSelectConfig, Row, RowId, RowSelection, SelectionMode, flatten,
};

// ============================================================================
// Table
// ============================================================================

pub use crate::config::{ExpandMode, TableHeight, TableProps};
pub use crate::widget::{
    ColumnResize, DataTable, ExpandRequest, FixedColumns, HeaderCell, StickyPosition, Viewport,
    VirtualItem, VirtualWindow,
};

// ============================================================================
// Errors
// ============================================================================

pub use crate::error::GridError;
