use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use census_ingest::{SourceFormat, SourceStatus};
use census_model::LabelSource;
use census_cli::types::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("State: {}", result.options.target_state);
    println!("Output: {}", result.output_dir.display());
    if result.options.dry_run {
        println!("Dry run: no files were written");
    }
    print_artifact_table(result);
    print_join_table(result);
    print_lookup_table(result);
    print_hierarchy(result);
}

fn print_artifact_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Artifact"),
        header_cell("Rows"),
        header_cell("SHA-256"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for artifact in &result.artifacts {
        table.add_row(vec![
            Cell::new(&artifact.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(artifact.rows),
            match &artifact.sha256 {
                Some(digest) => Cell::new(digest),
                None => dim_cell("-"),
            },
        ]);
    }
    println!("{table}");
}

fn print_join_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Fact"),
        header_cell("Step"),
        header_cell("Key"),
        header_cell("Rows"),
        header_cell("Null keys"),
        header_cell("Unmatched"),
    ]);
    apply_table_style(&mut table);
    for index in 3..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for fact in &result.facts {
        for step in &fact.steps {
            table.add_row(vec![
                Cell::new(fact.kind.as_str()),
                Cell::new(&step.name),
                dim_cell(&step.key),
                Cell::new(step.rows),
                count_cell(step.null_keys, Color::DarkGrey),
                count_cell(step.unmatched, Color::Yellow),
            ]);
        }
    }
    println!("{table}");
}

fn print_lookup_table(result: &RunResult) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Lookup"),
        header_cell("Key"),
        header_cell("Label"),
        header_cell("Resolved by"),
        header_cell("Rows"),
        header_cell("Duplicates"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 4, CellAlignment::Right);
    align_column(&mut table, 5, CellAlignment::Right);
    for lookup in &result.lookups {
        let source = match lookup.label_source {
            LabelSource::Pattern => Cell::new("name pattern"),
            LabelSource::Positional => Cell::new("position").fg(Color::Yellow),
            LabelSource::KeyOnly => Cell::new("key only").fg(Color::Yellow),
        };
        table.add_row(vec![
            Cell::new(&lookup.name),
            Cell::new(&lookup.key),
            Cell::new(&lookup.label),
            source,
            Cell::new(lookup.rows),
            count_cell(lookup.duplicates, Color::Yellow),
        ]);
    }
    println!("{table}");
}

fn print_hierarchy(result: &RunResult) {
    let check = &result.hierarchy;
    if check.is_clean() && result.inconsistent_geog_ids == 0 {
        println!("Hierarchy: consistent");
        return;
    }
    println!("Hierarchy:");
    println!("- SA2 codes without name: {}", check.sa2_without_name);
    println!("- SA3 codes without name: {}", check.sa3_without_name);
    println!("- SA4 codes without name: {}", check.sa4_without_name);
    match check.correspondence_rows {
        Some(rows) => println!(
            "- correspondence rows breaking prefix rule: {} of {rows}",
            check.correspondence_mismatches
        ),
        None => println!("- correspondence check skipped"),
    }
    println!(
        "- fact rows with mismatched geog_id width: {}",
        result.inconsistent_geog_ids
    );
}

pub fn print_sources(statuses: &[SourceStatus]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("File"),
        header_cell("Format"),
        header_cell("Present"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for status in statuses {
        let format = match status.format {
            SourceFormat::Parquet => "parquet",
            SourceFormat::Csv => "csv",
        };
        let present = if status.exists {
            Cell::new("yes").fg(Color::Green)
        } else {
            Cell::new("missing")
                .fg(Color::Red)
                .add_attribute(Attribute::Bold)
        };
        table.add_row(vec![
            Cell::new(status.table.to_string()),
            Cell::new(status.path.display()),
            dim_cell(format),
            present,
        ]);
    }
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count == 0 {
        dim_cell(count)
    } else {
        Cell::new(count).fg(color)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
