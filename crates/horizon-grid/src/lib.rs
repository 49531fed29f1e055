//! Horizon Grid - a headless data-table engine.
//!
//! Horizon Grid computes everything a data table needs short of drawing it:
//!
//! - Tree rows flattened into a display sequence with expand/collapse
//! - Hierarchical multi-select with tri-state checkboxes
//! - Pinned columns with sticky offsets and stacking order
//! - Grouped, multi-level column headers
//! - Drag-resizable column widths
//! - Row virtualization over long sequences
//!
//! Rendering layers (immediate-mode GUIs, retained widget trees, terminal
//! UIs) drive a [`DataTable`](widget::DataTable) with pointer and scroll input
//! and read layout back out.
//!
//! # Example
//!
//! ```
//! use horizon_grid::prelude::*;
//!
//! let props = TableProps::from_json_str(r#"{
//!     "columns": [
//!         { "key": "name", "label": "Name", "width": "220px", "fixed": "left" },
//!         { "key": "budget", "label": "Budget", "align": "right" }
//!     ],
//!     "data": [
//!         { "id": 1, "name": "Engineering", "budget": 1200,
//!           "children": [{ "id": 2, "name": "Platform", "budget": 700 }] }
//!     ],
//!     "multi_select": { "enabled": true, "selection_mode": "dependent" }
//! }"#)?;
//!
//! let mut table = DataTable::new(props)?;
//! table.selection_changed.connect(|rows| println!("{} rows selected", rows.len()));
//!
//! table.expand_all();
//! table.toggle_row_selection(&RowId::Int(1));
//! assert_eq!(table.header_check_state(), CheckState::Checked);
//! # Ok::<(), horizon_grid::GridError>(())
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod widget;

pub use error::{GridError, Result};
pub use horizon_grid_core::{ConnectionGuard, ConnectionId, PerfSpan, Signal, logging};
