use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use claims_ingest::{FileState, MappingSource, UploadResponse};
use claims_map::MappingSet;
use claims_model::{CarrierDetectionResult, DataQualityStats, Severity, ValidationIssue};

use crate::types::{IngestReport, ValidateReport};

pub fn print_detection(results: &[CarrierDetectionResult]) {
    if results.is_empty() {
        println!("No known carrier format matched.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Carrier"),
        header_cell("Confidence"),
        header_cell("Dates"),
        header_cell("Amounts"),
        header_cell("Indicators"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (rank, result) in results.iter().enumerate() {
        let carrier = if rank == 0 {
            Cell::new(&result.carrier)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(&result.carrier)
        };
        table.add_row(vec![
            carrier,
            Cell::new(format!("{}%", result.confidence)),
            optional_cell(result.date_format.as_deref()),
            optional_cell(result.amount_format.as_deref()),
            Cell::new(result.indicators.join("\n")),
        ]);
    }
    println!("{table}");
}

pub fn print_mapping_set(set: &MappingSet) {
    println!("Schema: {}", set.schema);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Confidence"),
        header_cell("Exact"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for mapping in &set.mappings {
        table.add_row(vec![
            Cell::new(&mapping.source_column),
            optional_cell(mapping.target_column.as_deref()),
            Cell::new(format!("{:.0}%", mapping.confidence * 100.0)),
            if mapping.is_perfect_match {
                Cell::new("✓")
                    .fg(Color::Green)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("-")
            },
        ]);
    }
    println!("{table}");
    let validation = set.validate();
    if !validation.is_valid {
        eprintln!(
            "Missing required fields: {}",
            validation.missing_required.join(", ")
        );
    }
}

pub fn print_preview(response: &UploadResponse) {
    println!("File id: {}", response.file_id);
    println!("Rows: {}", response.record_count);
    println!("State: {}", response.state);
    if let Some(carrier) = &response.carrier {
        println!(
            "Carrier: {carrier} ({}%)",
            response.confidence.unwrap_or_default()
        );
    }
    if let Some(source) = response.mapping_source {
        println!("Mapping: {}", source_label(source));
    }
    if let Some(mapping) = &response.mapping {
        let mut table = Table::new();
        table.set_header(vec![header_cell("Field"), header_cell("Column")]);
        apply_table_style(&mut table);
        for (field, column) in mapping.iter() {
            table.add_row(vec![Cell::new(field), Cell::new(column)]);
        }
        println!("{table}");
    }
    if !response.errors.is_empty() {
        eprintln!("Errors:");
        for error in &response.errors {
            eprintln!("- {error}");
        }
    }
}

pub fn print_validation(report: &ValidateReport) {
    println!("File: {}", report.file.display());
    print_carrier(report.carrier.as_deref(), report.confidence, report.mapping_source);
    print_stats(&report.result.stats);
    print_issue_table(&report.result.errors, report.result.errors.len());
}

pub fn print_ingest(report: &IngestReport) {
    println!("File: {}", report.file.display());
    println!("Output: {}", report.output.display());
    print_carrier(report.carrier.as_deref(), report.confidence, report.mapping_source);
    let state = match report.state {
        FileState::Stored => Cell::new(report.state).fg(Color::Green),
        FileState::Failed => Cell::new(report.state).fg(Color::Red),
        _ => Cell::new(report.state).fg(Color::Yellow),
    };
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("State"),
        header_cell("Claims"),
        header_cell("Stored"),
        header_cell("Chunks"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    table.add_row(vec![
        state.add_attribute(Attribute::Bold),
        Cell::new(report.claims),
        Cell::new(report.stored),
        report.chunks.map_or_else(|| dim_cell("-"), Cell::new),
    ]);
    println!("{table}");
    print_stats(&report.stats);
    print_issue_table(&report.errors, report.issue_count);
}

fn print_carrier(carrier: Option<&str>, confidence: Option<u8>, source: MappingSource) {
    match carrier {
        Some(carrier) => println!(
            "Carrier: {carrier} ({}%), mapping {}",
            confidence.unwrap_or_default(),
            source_label(source)
        ),
        None => println!("Carrier: unknown, mapping {}", source_label(source)),
    }
}

fn print_stats(stats: &DataQualityStats) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Rows"),
        header_cell("Valid"),
        header_cell("Invalid"),
        header_cell("Invalid dates"),
        header_cell("Duplicate ids"),
        header_cell("Completeness"),
    ]);
    apply_stats_table_style(&mut table);
    for index in 0..6 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    table.add_row(vec![
        Cell::new(stats.row_count).add_attribute(Attribute::Bold),
        count_cell(stats.valid_rows, Color::Green),
        count_cell(stats.invalid_rows, Color::Red),
        count_cell(stats.invalid_dates, Color::Red),
        count_cell(stats.duplicate_ids, Color::Yellow),
        completeness_cell(stats.data_completeness),
    ]);
    println!("{table}");

    if !stats.missing_required.is_empty() {
        let missing: Vec<String> = stats
            .missing_required
            .iter()
            .map(|(field, count)| format!("{field}: {count}"))
            .collect();
        println!("Missing required values: {}", missing.join(", "));
    }
}

fn print_issue_table(issues: &[ValidationIssue], total: usize) {
    if issues.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Row"),
        header_cell("Severity"),
        header_cell("Field"),
        header_cell("Value"),
        header_cell("Message"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.row + 1),
            severity_cell(issue.severity),
            Cell::new(issue.field),
            if issue.value.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(&issue.value)
            },
            Cell::new(&issue.message),
        ]);
    }
    println!();
    println!("Issues:");
    println!("{table}");
    if total > issues.len() {
        println!("... and {} more", total - issues.len());
    }
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_stats_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(160);
    if table.column_count() >= 5 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(5)),
            ColumnConstraint::UpperBoundary(Width::Fixed(9)),
            ColumnConstraint::UpperBoundary(Width::Fixed(22)),
            ColumnConstraint::UpperBoundary(Width::Percentage(25)),
            ColumnConstraint::UpperBoundary(Width::Percentage(50)),
        ]);
    }
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn completeness_cell(pct: f64) -> Cell {
    let color = if pct >= 95.0 {
        Color::Green
    } else if pct >= 80.0 {
        Color::Yellow
    } else {
        Color::Red
    };
    Cell::new(format!("{pct:.2}%")).fg(color)
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn source_label(source: MappingSource) -> &'static str {
    match source {
        MappingSource::Supplied => "supplied",
        MappingSource::Detected => "detected",
        MappingSource::Inferred => "inferred",
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
