//! Core systems for Horizon Grid.
//!
//! This crate provides the foundational pieces shared by the table engine:
//!
//! - **Signal/Slot System**: Type-safe notification of table events
//! - **Logging**: `tracing` targets and performance spans for every subsystem
//!
//! # Signal/Slot Example
//!
//! ```
//! use horizon_grid_core::Signal;
//!
//! // A signal that reports the new page number
//! let page_changed = Signal::<u32>::new();
//!
//! let conn_id = page_changed.connect(|page| {
//!     println!("Page changed to: {}", page);
//! });
//!
//! page_changed.emit(2);
//! page_changed.disconnect(conn_id);
//! ```

pub mod logging;
pub mod signal;

pub use logging::PerfSpan;
pub use signal::{ConnectionGuard, ConnectionId, Signal};
