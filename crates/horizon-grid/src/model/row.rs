//! Row data.
//!
//! Rows form a forest: each [`Row`] carries an identifier, arbitrary named
//! fields and an ordered list of child rows. Identifiers only need to be
//! unique among the rows a selection refers to, since selection is keyed by ID.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A row identifier, either an integer or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    /// Integer identifier.
    Int(i64),
    /// String identifier.
    Str(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => write!(f, "{id}"),
        }
    }
}

impl From<i64> for RowId {
    fn from(id: i64) -> Self {
        Self::Int(id)
    }
}

impl From<i32> for RowId {
    fn from(id: i32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<u32> for RowId {
    fn from(id: u32) -> Self {
        Self::Int(i64::from(id))
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::Str(id.to_string())
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self::Str(id)
    }
}

/// A hierarchical data row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Row identifier.
    pub id: RowId,

    /// Child rows, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Row>,

    /// Whether the row can be expanded even without children.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expandable: bool,

    /// Detail content shown below the row when it is expanded.
    #[serde(
        default,
        rename = "expandedContent",
        alias = "expanded_content",
        skip_serializing_if = "Option::is_none"
    )]
    pub expanded_content: Option<Value>,

    /// Named cell values.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Row {
    /// Creates a row with no fields and no children.
    pub fn new(id: impl Into<RowId>) -> Self {
        Self {
            id: id.into(),
            children: Vec::new(),
            expandable: false,
            expanded_content: None,
            fields: Map::new(),
        }
    }

    /// Adds a field using builder pattern.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Sets the children using builder pattern.
    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self
    }

    /// Marks the row expandable with detail content.
    pub fn with_expanded_content(mut self, content: impl Into<Value>) -> Self {
        self.expandable = true;
        self.expanded_content = Some(content.into());
        self
    }

    /// Returns a field value.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Returns `true` if the row has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Returns `true` if the row shows an expand affordance: it has children,
    /// or it is flagged expandable and carries detail content.
    pub fn shows_expander(&self) -> bool {
        self.has_children() || (self.expandable && self.expanded_content.is_some())
    }

    /// Returns `true` if expand-all should expand this row.
    pub fn is_expandable(&self) -> bool {
        self.has_children() || self.expandable
    }

    /// IDs of every descendant, in pre-order.
    pub fn descendant_ids(&self) -> Vec<RowId> {
        let mut ids = Vec::new();
        collect_ids(&self.children, &mut ids);
        ids
    }

    /// IDs of the direct children, in order.
    pub fn child_ids(&self) -> Vec<RowId> {
        self.children.iter().map(|child| child.id.clone()).collect()
    }
}

fn collect_ids(rows: &[Row], out: &mut Vec<RowId>) {
    for row in rows {
        out.push(row.id.clone());
        collect_ids(&row.children, out);
    }
}

/// Finds a row by ID anywhere in a forest (depth-first, pre-order).
pub fn find_row<'a>(rows: &'a [Row], id: &RowId) -> Option<&'a Row> {
    for row in rows {
        if &row.id == id {
            return Some(row);
        }
        if let Some(found) = find_row(&row.children, id) {
            return Some(found);
        }
    }
    None
}

/// Returns the chain of ancestor IDs of a row, nearest first.
///
/// Returns `None` if the row is not in the forest.
pub fn ancestor_ids(rows: &[Row], id: &RowId) -> Option<Vec<RowId>> {
    fn walk(rows: &[Row], id: &RowId, path: &mut Vec<RowId>) -> bool {
        for row in rows {
            if &row.id == id {
                return true;
            }
            path.push(row.id.clone());
            if walk(&row.children, id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    walk(rows, id, &mut path).then(|| {
        path.reverse();
        path
    })
}
