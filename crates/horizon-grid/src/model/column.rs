//! Column definitions.
//!
//! A [`Column`] is either a *leaf*, which renders one data cell per row, or a
//! *group*, which has at least one child column and renders only as a header
//! cell spanning its descendants.
//!
//! # Example
//!
//! ```
//! use horizon_grid::model::{Column, FixedSide};
//!
//! let columns = vec![
//!     Column::new("id", "ID").with_width("80px").with_fixed(FixedSide::Left),
//!     Column::group("person", "Person", vec![
//!         Column::new("first", "First name"),
//!         Column::new("last", "Last name").with_width("1fr"),
//!     ]),
//! ];
//!
//! assert!(columns[1].is_group());
//! assert_eq!(columns[0].declared_pixel_width(), Some(80.0));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width used for a column whose declared width is absent or not a pixel literal.
pub const DEFAULT_COLUMN_WIDTH: f32 = 150.0;

/// Horizontal alignment of cell content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Align to the leading edge (default).
    #[default]
    Left,
    /// Center content.
    Center,
    /// Align to the trailing edge.
    Right,
}

/// The edge a pinned column sticks to while the rest of the table scrolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixedSide {
    /// Pinned to the left edge.
    Left,
    /// Pinned to the right edge.
    Right,
}

/// A declared column width.
///
/// Only [`ColumnWidth::Pixels`] carries a usable layout size; every other
/// form (flexible fractions, `auto`, percentages, garbage) resolves to
/// [`DEFAULT_COLUMN_WIDTH`] wherever a pixel size is needed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ColumnWidth {
    /// An explicit pixel literal such as `"120px"`.
    Pixels(f32),
    /// A flexible fraction such as `"1fr"`.
    Fraction(f32),
    /// `"auto"`.
    Auto,
    /// Any other CSS-like value, kept verbatim.
    Other(String),
}

impl ColumnWidth {
    /// Parses a width string. Never fails; unrecognized input becomes
    /// [`ColumnWidth::Other`].
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();

        if let Some(number) = trimmed.strip_suffix("px")
            && let Some(px) = parse_length(number)
        {
            return Self::Pixels(px);
        }

        if let Some(number) = trimmed.strip_suffix("fr")
            && let Some(fr) = parse_length(number)
        {
            return Self::Fraction(fr);
        }

        if trimmed.eq_ignore_ascii_case("auto") {
            return Self::Auto;
        }

        Self::Other(trimmed.to_string())
    }

    /// Returns the pixel size if this is a pixel literal.
    pub fn pixels(&self) -> Option<f32> {
        match self {
            Self::Pixels(px) => Some(*px),
            _ => None,
        }
    }

    /// Resolves to a layout size, falling back to [`DEFAULT_COLUMN_WIDTH`].
    pub fn resolve(&self) -> f32 {
        self.pixels().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }
}

fn parse_length(number: &str) -> Option<f32> {
    let value: f32 = number.trim().parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pixels(px) => write!(f, "{px}px"),
            Self::Fraction(fr) => write!(f, "{fr}fr"),
            Self::Auto => write!(f, "auto"),
            Self::Other(raw) => write!(f, "{raw}"),
        }
    }
}

impl From<String> for ColumnWidth {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<&str> for ColumnWidth {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<ColumnWidth> for String {
    fn from(value: ColumnWidth) -> Self {
        value.to_string()
    }
}

/// A table column definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// Unique key; for leaves it names the row field rendered in this column.
    pub key: String,

    /// Header text.
    #[serde(default)]
    pub label: String,

    /// Declared width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<ColumnWidth>,

    /// Cell content alignment.
    #[serde(default)]
    pub align: Alignment,

    /// Whether cells host interactive controls (clicks there are not row clicks).
    #[serde(default)]
    pub interactive: bool,

    /// Pinned edge, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<FixedSide>,

    /// Sub-columns. Non-empty makes this a group column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Column>,
}

impl Column {
    /// Creates a leaf column.
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            width: None,
            align: Alignment::default(),
            interactive: false,
            fixed: None,
            children: Vec::new(),
        }
    }

    /// Creates a group column.
    pub fn group(key: impl Into<String>, label: impl Into<String>, children: Vec<Column>) -> Self {
        Self {
            children,
            ..Self::new(key, label)
        }
    }

    /// Sets the declared width using builder pattern.
    pub fn with_width(mut self, width: impl Into<ColumnWidth>) -> Self {
        self.width = Some(width.into());
        self
    }

    /// Pins the column using builder pattern.
    pub fn with_fixed(mut self, side: FixedSide) -> Self {
        self.fixed = Some(side);
        self
    }

    /// Sets the alignment using builder pattern.
    pub fn with_align(mut self, align: Alignment) -> Self {
        self.align = align;
        self
    }

    /// Marks the column as hosting interactive controls.
    pub fn with_interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    /// Returns `true` if this column has sub-columns.
    pub fn is_group(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if this column renders data cells.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The declared width if it is a pixel literal.
    pub fn declared_pixel_width(&self) -> Option<f32> {
        self.width.as_ref().and_then(ColumnWidth::pixels)
    }

    /// The declared width resolved to pixels, or [`DEFAULT_COLUMN_WIDTH`].
    pub fn declared_width(&self) -> f32 {
        self.declared_pixel_width().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    /// All leaf descendants in order (the column itself if it is a leaf).
    pub fn leaves(&self) -> Vec<&Column> {
        let mut out = Vec::new();
        collect_leaves(std::slice::from_ref(self), &mut out);
        out
    }
}

/// Collects the in-order leaves of a column tree.
pub(crate) fn collect_leaves<'a>(columns: &'a [Column], out: &mut Vec<&'a Column>) {
    for column in columns {
        if column.is_group() {
            collect_leaves(&column.children, out);
        } else {
            out.push(column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pixel_width() {
        assert_eq!(ColumnWidth::parse("120px"), ColumnWidth::Pixels(120.0));
        assert_eq!(ColumnWidth::parse(" 80.5px "), ColumnWidth::Pixels(80.5));
        assert_eq!(ColumnWidth::parse("120px").resolve(), 120.0);
    }

    #[test]
    fn test_parse_flexible_widths() {
        assert_eq!(ColumnWidth::parse("1fr"), ColumnWidth::Fraction(1.0));
        assert_eq!(ColumnWidth::parse("auto"), ColumnWidth::Auto);
        assert_eq!(ColumnWidth::parse("25%"), ColumnWidth::Other("25%".into()));
        assert_eq!(ColumnWidth::parse("1fr").resolve(), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn test_malformed_width_falls_back() {
        for raw in ["px", "abcpx", "-10px", "NaNpx", ""] {
            let width = ColumnWidth::parse(raw);
            assert_eq!(width.pixels(), None, "{raw:?} should not be a pixel width");
            assert_eq!(width.resolve(), DEFAULT_COLUMN_WIDTH);
        }
    }

    #[test]
    fn test_width_display_round_trip() {
        for raw in ["120px", "2fr", "auto", "30%"] {
            assert_eq!(ColumnWidth::parse(raw).to_string(), raw);
        }
    }

    #[test]
    fn test_group_and_leaves() {
        let group = Column::group(
            "g",
            "Group",
            vec![
                Column::new("a", "A"),
                Column::group("inner", "Inner", vec![Column::new("b", "B"), Column::new("c", "C")]),
            ],
        );

        assert!(group.is_group());
        let keys: Vec<_> = group.leaves().iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, ["a", "b", "c"]);

        let leaf = Column::new("x", "X");
        assert!(leaf.is_leaf());
        assert_eq!(leaf.leaves().len(), 1);
    }

    #[test]
    fn test_declared_width() {
        assert_eq!(Column::new("a", "A").declared_width(), DEFAULT_COLUMN_WIDTH);
        assert_eq!(Column::new("a", "A").with_width("90px").declared_width(), 90.0);
        assert_eq!(Column::new("a", "A").with_width("2fr").declared_width(), DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn test_column_deserialize() {
        let json = r#"{
            "key": "name",
            "label": "Name",
            "width": "200px",
            "align": "center",
            "fixed": "left"
        }"#;
        let column: Column = serde_json::from_str(json).unwrap();
        assert_eq!(column.width, Some(ColumnWidth::Pixels(200.0)));
        assert_eq!(column.align, Alignment::Center);
        assert_eq!(column.fixed, Some(FixedSide::Left));
        assert!(column.is_leaf());
    }
}
