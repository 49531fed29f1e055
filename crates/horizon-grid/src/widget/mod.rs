//! Table layout and interaction engines.
//!
//! Each engine works on its own over the data model; [`DataTable`] combines
//! them into one controller.
//!
//! - [`header`]: Grouped multi-level headers
//! - [`fixed`]: Pinned column offsets and stacking
//! - [`resize`]: Column widths and drag-resize
//! - [`virtualizer`]: The rendered slice of a long row sequence
//! - [`table`]: The table controller and its output signals

pub mod fixed;
pub mod header;
pub mod resize;
pub mod table;
pub mod virtualizer;

pub use fixed::{FixedColumns, FixedWidthWarning, StickyPosition};
pub use header::HeaderCell;
pub use resize::{ColumnResize, ColumnWidths, ResizeState};
pub use table::{DataTable, ExpandRequest, ExpandToggle, RenderedRow};
pub use virtualizer::{MeasureCache, Viewport, VirtualItem, VirtualOptions, VirtualWindow};
