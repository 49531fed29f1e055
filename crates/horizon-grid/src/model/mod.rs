//! Data model for Horizon Grid.
//!
//! This module holds the plain data a table is built from and the pure
//! functions over it:
//!
//! - `Column`: Leaf or group column definitions with widths and pinning
//! - `Row` / `RowId`: The hierarchical row forest
//! - `flatten` / `ExpandedRows`: Tree-to-sequence projection and expansion state
//! - `RowSelection`: Hierarchical, tri-state row selection
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{flatten, ExpandedRows, Row, RowId};
//!
//! let data = vec![
//!     Row::new("eng").with_children(vec![Row::new("eng-platform"), Row::new("eng-web")]),
//!     Row::new("ops"),
//! ];
//!
//! let expanded = ExpandedRows::with_ids([RowId::from("eng")]);
//! for row in flatten(&data, &expanded) {
//!     println!("{}{}", "  ".repeat(row.depth), row.id());
//! }
//! ```

pub mod column;
pub mod row;
pub mod selection;
pub mod tree;

pub use column::{Alignment, Column, ColumnWidth, DEFAULT_COLUMN_WIDTH, FixedSide};
pub use row::{Row, RowId, ancestor_ids, find_row};
pub use selection::{CheckState, MultiSelectConfig, RowPredicate, RowSelection, SelectionMode};
pub use tree::{ExpandedRows, FlattenedRow, flatten};
