//! Table configuration.
//!
//! [`TableProps`] is everything a host hands a [`DataTable`](crate::widget::DataTable):
//! columns, data, display flags, multi-select settings and the expand mode.
//! Props are plain serde values, so a table can be described in JSON or TOML:
//!
//! ```toml
//! virtualized = true
//! row_height = 40.0
//! height = "60vh"
//!
//! [multi_select]
//! enabled = true
//! selection_mode = "dependent"
//!
//! [[columns]]
//! key = "name"
//! label = "Name"
//! width = "240px"
//! fixed = "left"
//!
//! [[data]]
//! id = 1
//! name = "Engineering"
//! ```

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use horizon_grid_core::logging::targets;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GridError, Result};
use crate::model::{Column, MultiSelectConfig, Row, RowId};
use crate::widget::virtualizer::{
    DEFAULT_ESTIMATE_SIZE, DEFAULT_OVERSCAN, MAX_OVERSCAN, VirtualOptions,
};

/// Who owns the expanded state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpandMode {
    /// The table toggles rows itself when the expander is clicked.
    #[default]
    Auto,
    /// The table reports clicks through `expand_clicked` and the host decides.
    Controlled,
}

/// Height of the scroll container.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TableHeight {
    /// Height in pixels.
    Pixels(f32),
    /// Any CSS length, kept verbatim.
    Css(String),
}

impl fmt::Display for TableHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Css(css) => write!(f, "{css}"),
        }
    }
}

/// Input properties of a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableProps {
    /// Column tree.
    pub columns: Vec<Column>,

    /// Row forest.
    pub data: Vec<Row>,

    /// Whether data is loading.
    pub loading: bool,

    /// Whether only the rows near the viewport are rendered.
    pub virtualized: bool,

    /// Estimated row height.
    pub row_height: f32,

    /// Rows rendered beyond each viewport edge when virtualized.
    pub overscan: usize,

    /// Whether rendered rows are measured for their real height.
    pub measure_rows: bool,

    /// Scroll container height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<TableHeight>,

    /// Summary row shown sticky at the bottom.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_row: Option<Map<String, Value>>,

    /// Rows expanded initially.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub expanded_rows: Vec<RowId>,

    /// Externally bound selection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub selected_rows: Vec<RowId>,

    /// Multi-select settings.
    pub multi_select: MultiSelectConfig,

    /// Expand mode.
    pub expand_mode: ExpandMode,
}

impl Default for TableProps {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            data: Vec::new(),
            loading: false,
            virtualized: false,
            row_height: DEFAULT_ESTIMATE_SIZE,
            overscan: DEFAULT_OVERSCAN,
            measure_rows: false,
            height: None,
            total_row: None,
            expanded_rows: Vec::new(),
            selected_rows: Vec::new(),
            multi_select: MultiSelectConfig::default(),
            expand_mode: ExpandMode::default(),
        }
    }
}

impl TableProps {
    /// Creates props for columns and data with default settings.
    pub fn new(columns: Vec<Column>, data: Vec<Row>) -> Self {
        Self {
            columns,
            data,
            ..Self::default()
        }
    }

    /// Enables virtualization using builder pattern.
    pub fn with_virtualized(mut self, virtualized: bool) -> Self {
        self.virtualized = virtualized;
        self
    }

    /// Sets the multi-select settings using builder pattern.
    pub fn with_multi_select(mut self, multi_select: MultiSelectConfig) -> Self {
        self.multi_select = multi_select;
        self
    }

    /// Sets the expand mode using builder pattern.
    pub fn with_expand_mode(mut self, mode: ExpandMode) -> Self {
        self.expand_mode = mode;
        self
    }

    /// Sets the initially expanded rows using builder pattern.
    pub fn with_expanded_rows(mut self, ids: impl IntoIterator<Item = RowId>) -> Self {
        self.expanded_rows = ids.into_iter().collect();
        self
    }

    /// Sets the summary row using builder pattern.
    pub fn with_total_row(mut self, total_row: Map<String, Value>) -> Self {
        self.total_row = Some(total_row);
        self
    }

    /// Virtualization settings derived from the props.
    pub fn virtual_options(&self) -> VirtualOptions {
        VirtualOptions {
            estimate_size: self.row_height,
            overscan: self.overscan,
            measure_elements: self.measure_rows,
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Parses and validates JSON props.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let props: Self = serde_json::from_str(json)?;
        props.validate()?;
        Ok(props)
    }

    /// Parses and validates TOML props.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let props: Self = toml::from_str(source)?;
        props.validate()?;
        Ok(props)
    }

    /// Loads props from a file, choosing the format by extension (`.toml`
    /// for TOML, anything else for JSON).
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| GridError::io(path, e))?;
        tracing::debug!(target: targets::CONFIG, path = %path.display(), "loading table props");

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::from_toml_str(&source)
        } else {
            Self::from_json_str(&source)
        }
    }

    /// Serializes the props to pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Serializes the props to TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string(self)?)
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Checks the column tree (every key is non-empty and leaf keys are
    /// unique) and the virtualization settings.
    pub fn validate(&self) -> Result<()> {
        if !VirtualOptions::is_valid_estimate(self.row_height) {
            return Err(GridError::InvalidRowHeight(self.row_height));
        }
        if self.overscan > MAX_OVERSCAN {
            return Err(GridError::InvalidOverscan(self.overscan));
        }
        validate_columns(&self.columns)
    }
}

/// Checks a column tree: every key is non-empty and leaf keys are unique.
pub fn validate_columns(columns: &[Column]) -> Result<()> {
    fn walk<'a>(columns: &'a [Column], seen: &mut HashSet<&'a str>) -> Result<()> {
        for column in columns {
            if column.key.trim().is_empty() {
                return Err(GridError::EmptyColumnKey {
                    label: column.label.clone(),
                });
            }
            if column.is_group() {
                walk(&column.children, seen)?;
            } else if !seen.insert(&column.key) {
                return Err(GridError::DuplicateColumnKey(column.key.clone()));
            }
        }
        Ok(())
    }

    walk(columns, &mut HashSet::new())
}
