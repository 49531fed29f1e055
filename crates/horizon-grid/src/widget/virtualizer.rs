//! Row virtualization.
//!
//! [`VirtualWindow`] decides which rows of a long flattened sequence are
//! actually rendered: the rows intersecting the viewport plus a few
//! `overscan` rows on either side. Every row is assumed to be
//! `estimate_size` tall until a real size is recorded for it, so rows that
//! grow when expanded can be measured and the window re-laid out.
//!
//! The window is recomputed synchronously whenever the row count, the scroll
//! offset or the viewport size changes. Without a viewport (the table is not
//! mounted) nothing is rendered.
//!
//! # Example
//!
//! ```
//! use horizon_grid::widget::virtualizer::{Viewport, VirtualOptions, VirtualWindow};
//!
//! let mut window = VirtualWindow::new(VirtualOptions::default());
//! window.set_count(1000);
//! assert!(window.items().is_empty());
//!
//! window.set_viewport(Some(Viewport::new(0.0, 200.0)));
//! let indices: Vec<_> = window.items().iter().map(|item| item.index).collect();
//! assert_eq!(indices, [0, 1, 2, 3, 4, 5]);
//! assert_eq!(window.total_size(), 50_000.0);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};

/// Default assumed row height.
pub const DEFAULT_ESTIMATE_SIZE: f32 = 50.0;

/// Default number of extra rows rendered above and below the viewport.
pub const DEFAULT_OVERSCAN: usize = 2;

/// Largest overscan accepted from configuration.
pub const MAX_OVERSCAN: usize = 1_000;

/// Virtualization settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VirtualOptions {
    /// Assumed size of a row that has not been measured.
    pub estimate_size: f32,
    /// Rows rendered beyond each edge of the viewport.
    pub overscan: usize,
    /// Whether rendered rows are measured.
    pub measure_elements: bool,
}

impl VirtualOptions {
    /// Returns `true` if `size` can stand in for an unmeasured row.
    pub fn is_valid_estimate(size: f32) -> bool {
        size.is_finite() && size > 0.0
    }

    /// Replaces an unusable estimate with [`DEFAULT_ESTIMATE_SIZE`].
    fn sanitized(mut self) -> Self {
        if !Self::is_valid_estimate(self.estimate_size) {
            tracing::warn!(
                target: targets::VIRTUAL,
                estimate_size = self.estimate_size,
                "invalid row size estimate, using default"
            );
            self.estimate_size = DEFAULT_ESTIMATE_SIZE;
        }
        self
    }
}

impl Default for VirtualOptions {
    fn default() -> Self {
        Self {
            estimate_size: DEFAULT_ESTIMATE_SIZE,
            overscan: DEFAULT_OVERSCAN,
            measure_elements: false,
        }
    }
}

/// The visible region of the scroll container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Distance scrolled from the top.
    pub scroll_offset: f32,
    /// Visible height.
    pub height: f32,
}

impl Viewport {
    /// Creates a viewport.
    pub fn new(scroll_offset: f32, height: f32) -> Self {
        Self {
            scroll_offset,
            height,
        }
    }
}

/// A row to render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VirtualItem {
    /// Index into the flattened sequence.
    pub index: usize,
    /// Offset of the row's top edge.
    pub start: f32,
    /// Row size.
    pub size: f32,
    /// Offset of the row's bottom edge.
    pub end: f32,
}

/// The rendered slice of a virtualized row sequence.
#[derive(Debug, Clone)]
pub struct VirtualWindow {
    count: usize,
    options: VirtualOptions,
    viewport: Option<Viewport>,

    /// Recorded sizes by index.
    measured: HashMap<usize, f32>,

    /// `starts[i]` is the top of row `i`; `starts[count]` is the total size.
    starts: Vec<f32>,

    items: Vec<VirtualItem>,
}

impl Default for VirtualWindow {
    fn default() -> Self {
        Self::new(VirtualOptions::default())
    }
}

impl VirtualWindow {
    /// Creates an empty, unmounted window.
    ///
    /// A zero, negative or non-finite `estimate_size` is replaced with
    /// [`DEFAULT_ESTIMATE_SIZE`].
    pub fn new(options: VirtualOptions) -> Self {
        Self {
            count: 0,
            options: options.sanitized(),
            viewport: None,
            measured: HashMap::new(),
            starts: vec![0.0],
            items: Vec::new(),
        }
    }

    // =========================================================================
    // Inputs
    // =========================================================================

    /// The settings.
    pub fn options(&self) -> &VirtualOptions {
        &self.options
    }

    /// Replaces the settings. The estimate is sanitized as in [`new`](Self::new).
    pub fn set_options(&mut self, options: VirtualOptions) {
        self.options = options.sanitized();
        self.relayout();
    }

    /// Number of rows.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Sets the number of rows. Sizes recorded past the new end are dropped.
    pub fn set_count(&mut self, count: usize) {
        if count == self.count {
            return;
        }
        self.count = count;
        self.measured.retain(|index, _| *index < count);
        self.relayout();
    }

    /// The viewport, or `None` while unmounted.
    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    /// Mounts, resizes or unmounts the viewport.
    pub fn set_viewport(&mut self, viewport: Option<Viewport>) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        self.recompute();
    }

    /// Updates the scroll offset. Ignored while unmounted.
    pub fn set_scroll_offset(&mut self, offset: f32) {
        if let Some(viewport) = self.viewport {
            self.set_viewport(Some(Viewport::new(offset, viewport.height)));
        }
    }

    /// Records the real size of a row.
    ///
    /// Negative or non-finite sizes are ignored.
    pub fn set_item_size(&mut self, index: usize, size: f32) {
        if index >= self.count || !size.is_finite() || size < 0.0 {
            return;
        }
        if self.measured.insert(index, size) != Some(size) {
            self.relayout();
        }
    }

    /// Forgets every recorded size.
    pub fn clear_measurements(&mut self) {
        if !self.measured.is_empty() {
            self.measured.clear();
            self.relayout();
        }
    }

    /// Measures a rendered row through a cache and records its size.
    ///
    /// When measurement is disabled the row keeps the estimated size and
    /// `measure` is never called.
    pub fn measure_element<E: ?Sized>(
        &mut self,
        cache: &mut MeasureCache<E>,
        index: usize,
        element: &Arc<E>,
        measure: impl FnOnce(&E) -> f32,
    ) -> f32 {
        if !self.options.measure_elements {
            return self.options.estimate_size;
        }
        let size = cache.measure(element, measure);
        self.set_item_size(index, size);
        size
    }

    // =========================================================================
    // Outputs
    // =========================================================================

    /// Rows to render, in index order.
    pub fn items(&self) -> &[VirtualItem] {
        &self.items
    }

    /// Extent of all rows.
    pub fn total_size(&self) -> f32 {
        self.starts.last().copied().unwrap_or(0.0)
    }

    /// Position of any row, rendered or not.
    pub fn item(&self, index: usize) -> Option<VirtualItem> {
        if index >= self.count {
            return None;
        }
        let start = self.starts[index];
        let end = self.starts[index + 1];
        Some(VirtualItem {
            index,
            start,
            size: end - start,
            end,
        })
    }

    /// Size of a row: recorded if measured, else the estimate.
    pub fn size_of(&self, index: usize) -> f32 {
        self.measured
            .get(&index)
            .copied()
            .unwrap_or(self.options.estimate_size)
    }

    /// Scroll offset that aligns a row's top edge with the viewport's top.
    ///
    /// The offset is clamped so the viewport does not run past the end.
    pub fn scroll_to_index(&self, index: usize) -> Option<f32> {
        let start = *self.starts.get(index).filter(|_| index < self.count)?;
        let height = self.viewport.map_or(0.0, |viewport| viewport.height);
        let max = (self.total_size() - height).max(0.0);
        Some(start.min(max))
    }

    /// Index of the row covering an offset.
    pub fn index_at_offset(&self, offset: f32) -> Option<usize> {
        if self.count == 0 || offset < 0.0 || offset >= self.total_size() {
            return None;
        }
        // First row whose end lies past the offset.
        let index = self.starts[1..].partition_point(|end| *end <= offset);
        Some(index.min(self.count - 1))
    }

    // =========================================================================
    // Layout
    // =========================================================================

    fn relayout(&mut self) {
        self.starts.clear();
        self.starts.reserve(self.count + 1);
        let mut offset = 0.0;
        self.starts.push(offset);
        for index in 0..self.count {
            offset += self.size_of(index);
            self.starts.push(offset);
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.items.clear();
        let Some(viewport) = self.viewport else {
            return;
        };
        if self.count == 0 {
            return;
        }

        let top = viewport.scroll_offset.max(0.0);
        let bottom = top + viewport.height.max(0.0);
        let last_index = self.count - 1;

        let first = self.index_at_offset(top).unwrap_or(last_index);
        let last = self.starts[..self.count]
            .partition_point(|start| *start < bottom)
            .saturating_sub(1)
            .max(first);

        let from = first.saturating_sub(self.options.overscan);
        let to = last.saturating_add(self.options.overscan).min(last_index);

        let items: Vec<VirtualItem> = (from..=to).filter_map(|index| self.item(index)).collect();
        self.items = items;

        tracing::trace!(
            target: targets::VIRTUAL,
            from,
            to,
            total = self.total_size(),
            "virtual window recomputed"
        );
    }
}

/// Caches element sizes keyed by element identity.
///
/// Entries hold only a weak reference, so a cached element is never kept
/// alive by the cache. Entries whose element has been dropped are purged on
/// the next miss or by [`prune`](Self::prune).
pub struct MeasureCache<E: ?Sized> {
    entries: HashMap<usize, (Weak<E>, f32)>,
}

impl<E: ?Sized> Default for MeasureCache<E> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<E: ?Sized> std::fmt::Debug for MeasureCache<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeasureCache")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<E: ?Sized> MeasureCache<E> {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached size of an element, measuring it on a miss.
    pub fn measure(&mut self, element: &Arc<E>, measure: impl FnOnce(&E) -> f32) -> f32 {
        let key = identity(element);
        if let Some((weak, size)) = self.entries.get(&key)
            && weak.strong_count() > 0
            && std::ptr::addr_eq(weak.as_ptr(), Arc::as_ptr(element))
        {
            return *size;
        }

        self.prune();
        let size = measure(element);
        self.entries.insert(key, (Arc::downgrade(element), size));
        size
    }

    /// The cached size of an element, if any.
    pub fn get(&self, element: &Arc<E>) -> Option<f32> {
        self.entries
            .get(&identity(element))
            .filter(|(weak, _)| weak.strong_count() > 0)
            .map(|(_, size)| *size)
    }

    /// Forgets an element.
    pub fn invalidate(&mut self, element: &Arc<E>) {
        self.entries.remove(&identity(element));
    }

    /// Drops entries whose element no longer exists. Returns how many were
    /// dropped.
    pub fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, (weak, _)| weak.strong_count() > 0);
        let pruned = before - self.entries.len();
        if pruned > 0 {
            tracing::trace!(target: targets::VIRTUAL, pruned, "measure cache pruned");
        }
        pruned
    }

    /// Number of entries, including ones not yet pruned.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn identity<E: ?Sized>(element: &Arc<E>) -> usize {
    Arc::as_ptr(element).cast::<()>() as usize
}

static_assertions::assert_impl_all!(VirtualWindow: Send, Sync);
