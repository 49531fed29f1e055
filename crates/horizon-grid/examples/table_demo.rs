//! Horizon Grid Table Demo
//!
//! Builds a generated department / team / employee forest and walks through
//! what a rendering layer would read from the table:
//! - Grouped header levels
//! - Pinned column offsets and stacking
//! - The virtual window while scrolling
//! - Dependent selection with tri-state checkboxes
//!
//! Run with: cargo run -p horizon-grid --example table_demo

use horizon_grid::prelude::*;
use serde_json::json;

const DEPARTMENTS: [&str; 6] = [
    "Engineering",
    "Marketing",
    "Sales",
    "Finance",
    "Design",
    "Support",
];
const TEAMS: [&str; 4] = ["Platform", "Growth", "Enterprise", "Operations"];
const EMPLOYEES_PER_TEAM: usize = 12;

/// Generates departments with teams with employees. IDs are `d{n}`,
/// `d{n}-t{m}` and `d{n}-t{m}-e{k}`.
fn generate_forest() -> Vec<Row> {
    DEPARTMENTS
        .iter()
        .enumerate()
        .map(|(d, department)| {
            let teams = TEAMS
                .iter()
                .enumerate()
                .map(|(t, team)| {
                    let employees = (0..EMPLOYEES_PER_TEAM)
                        .map(|e| {
                            Row::new(format!("d{d}-t{t}-e{e}"))
                                .with_field("name", format!("Employee {}", e + 1))
                                .with_field("role", if e == 0 { "Lead" } else { "Engineer" })
                                .with_field("salary", 60_000 + (e as i64) * 2_500)
                                .with_expanded_content(json!({ "notes": format!("{team} member") }))
                        })
                        .collect();
                    Row::new(format!("d{d}-t{t}"))
                        .with_field("name", *team)
                        .with_children(employees)
                })
                .collect();
            Row::new(format!("d{d}"))
                .with_field("name", *department)
                .with_children(teams)
        })
        .collect()
}

fn columns() -> Vec<Column> {
    vec![
        Column::new("name", "Name").with_width("240px").with_fixed(FixedSide::Left),
        Column::group(
            "job",
            "Job",
            vec![
                Column::new("role", "Role").with_width("160px"),
                Column::new("salary", "Salary")
                    .with_width("120px")
                    .with_align(Alignment::Right),
            ],
        ),
        Column::new("notes", "Notes").with_width("1fr"),
        Column::new("actions", "")
            .with_width("80px")
            .with_fixed(FixedSide::Right)
            .with_interactive(true),
    ]
}

fn print_headers(table: &DataTable) {
    println!("== Header levels ==");
    for (level, cells) in table.header_levels().iter().enumerate() {
        let row: Vec<String> = cells
            .iter()
            .map(|cell| format!("{}[{}x{}]", cell.key, cell.colspan, cell.rowspan))
            .collect();
        println!("  {level}: {}", row.join("  "));
    }
    println!("  grid: {}", table.grid_template());
}

fn print_pinned(table: &DataTable) {
    println!("== Pinned columns ==");
    let fixed = table.fixed_columns();
    for column in table.leaf_columns() {
        match fixed.fixed_style(column) {
            Some(position) => println!(
                "  {:<8} {:?} offset={} z={}",
                column.key,
                position.side,
                position.offset,
                fixed.z_index(column)
            ),
            None => println!("  {:<8} scrolls", column.key),
        }
    }
}

fn print_window(table: &DataTable) {
    let rendered = table.rendered_rows();
    let (Some(first), Some(last)) = (rendered.first(), rendered.last()) else {
        println!("  (nothing rendered)");
        return;
    };
    println!(
        "  rows {}..={} of {} (total height {})",
        first.item.index,
        last.item.index,
        table.virtual_window().count(),
        table.total_size()
    );
    for rendered_row in rendered.iter().take(3) {
        let name = rendered_row
            .row
            .row
            .field("name")
            .and_then(|value| value.as_str())
            .unwrap_or_default();
        println!(
            "    {:>6.0}px {}{}",
            rendered_row.item.start,
            "  ".repeat(rendered_row.row.depth),
            name
        );
    }
}

fn main() -> Result<(), GridError> {
    tracing_subscriber::fmt()
        .with_env_filter("horizon_grid=info")
        .init();

    let props = TableProps::new(columns(), generate_forest())
        .with_virtualized(true)
        .with_multi_select(MultiSelectConfig::enabled().with_mode(SelectionMode::Dependent));
    let mut table = DataTable::new(props)?;

    table.selection_changed.connect(|rows| {
        println!("  -> selection_changed: {} rows", rows.len());
    });

    print_headers(&table);
    print_pinned(&table);

    println!("== Virtual window ==");
    table.set_viewport(Some(Viewport::new(0.0, 600.0)));
    print_window(&table);

    table.expand_all();
    table.set_scroll_offset(4_000.0);
    print_window(&table);

    println!("== Selection ==");
    table.collapse_all();
    let engineering = RowId::from("d0");
    table.toggle_expand(&engineering);
    table.toggle_row_selection(&engineering);
    println!(
        "  d0 {:?}, header {:?}",
        table.row_check_state(&engineering),
        table.header_check_state()
    );

    table.toggle_row_selection(&RowId::from("d0-t1"));
    println!(
        "  d0 {:?} after deselecting a team",
        table.row_check_state(&engineering)
    );

    if let Some(offset) = table.scroll_to_row(&RowId::from("d3-t2-e7")) {
        println!("  scroll to d3-t2-e7 at {offset}px");
    }

    Ok(())
}
