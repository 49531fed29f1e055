//! Loading table props from configuration files.

use std::io::Write;

use horizon_grid::GridError;
use horizon_grid::config::{ExpandMode, TableProps};
use horizon_grid::model::{Column, FixedSide, MultiSelectConfig, Row, RowId, SelectionMode};
use horizon_grid::widget::DataTable;

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn sample_props() -> TableProps {
    TableProps::new(
        vec![
            Column::new("name", "Name").with_width("200px").with_fixed(FixedSide::Left),
            Column::group(
                "contact",
                "Contact",
                vec![Column::new("email", "Email"), Column::new("phone", "Phone")],
            ),
        ],
        vec![
            Row::new(1)
                .with_field("name", "Ada")
                .with_children(vec![Row::new("1-a").with_field("name", "Grace")]),
        ],
    )
    .with_expand_mode(ExpandMode::Controlled)
    .with_expanded_rows([RowId::Int(1)])
    .with_multi_select(MultiSelectConfig::enabled().with_mode(SelectionMode::Dependent))
}

#[test]
fn test_load_json_file() {
    let file = write_temp(
        ".json",
        r#"{
            "columns": [{ "key": "name", "label": "Name", "width": "180px" }],
            "data": [{ "id": "a", "name": "Alpha" }, { "id": "b", "name": "Beta" }],
            "virtualized": true
        }"#,
    );

    let props = TableProps::from_path(file.path()).unwrap();
    assert!(props.virtualized);
    assert_eq!(props.data.len(), 2);

    let table = DataTable::new(props).unwrap();
    assert_eq!(table.grid_template(), "180px");
}

#[test]
fn test_load_toml_file() {
    let file = write_temp(
        ".toml",
        r#"
        expand_mode = "controlled"

        [multi_select]
        enabled = true
        selection_mode = "dependent"
        select_only_visible = false

        [[columns]]
        key = "name"
        label = "Name"
        width = "200px"
        fixed = "left"

        [[data]]
        id = 1
        name = "Ada"

        [[data.children]]
        id = 2
        name = "Grace"
        "#,
    );

    let props = TableProps::from_path(file.path()).unwrap();
    assert_eq!(props.expand_mode, ExpandMode::Controlled);
    assert!(!props.multi_select.select_only_visible);
    assert_eq!(props.data[0].children[0].id, RowId::Int(2));
}

#[test]
fn test_missing_file() {
    let err = TableProps::from_path("/nonexistent/table.toml").unwrap_err();
    assert!(matches!(err, GridError::Io { .. }));
}

#[test]
fn test_json_round_trip() {
    let props = sample_props();
    let json = props.to_json_string().unwrap();
    let loaded = TableProps::from_json_str(&json).unwrap();

    assert_eq!(loaded.columns, props.columns);
    assert_eq!(loaded.data, props.data);
    assert_eq!(loaded.expand_mode, ExpandMode::Controlled);
    assert_eq!(loaded.expanded_rows, vec![RowId::Int(1)]);
    assert_eq!(loaded.multi_select.selection_mode, SelectionMode::Dependent);
}

#[test]
fn test_toml_round_trip() {
    let props = sample_props();
    let source = props.to_toml_string().unwrap();
    let loaded = TableProps::from_toml_str(&source).unwrap();

    assert_eq!(loaded.columns, props.columns);
    assert_eq!(loaded.data, props.data);
    assert!(loaded.multi_select.enabled);
}

#[test]
fn test_invalid_columns_in_file() {
    let file = write_temp(
        ".json",
        r#"{ "columns": [{ "key": "a", "label": "A" }, { "key": "a", "label": "B" }] }"#,
    );
    let err = TableProps::from_path(file.path()).unwrap_err();
    assert!(matches!(err, GridError::DuplicateColumnKey(_)));
}
