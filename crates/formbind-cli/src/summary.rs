use formbind_model::NormalizedReport;
use formbind_resolve::FieldFailure;

use formbind_cli::render::{columns_table, dataset_table, failures_table};

pub fn print_report(report: &NormalizedReport) {
    let dataset = &report.dataset;
    if !report.metadata.description.is_empty() {
        println!("Report: {}", report.metadata.description);
    }
    if let Some(loaded_at) = report.metadata.loaded_at {
        println!("Loaded: {loaded_at}");
    }
    match dataset.primary_axis() {
        Some(column) => println!("Primary axis: {} ({})", column.display_label, column.key),
        None => println!("Primary axis: -"),
    }
    println!("Rows: {}", dataset.rows.len());
    println!("{}", columns_table(dataset));
    if !dataset.rows.is_empty() {
        println!("{}", dataset_table(dataset));
    }
}

pub fn print_failures(failures: &[FieldFailure]) {
    if failures.is_empty() {
        return;
    }
    eprintln!("Failed fields:");
    eprintln!("{}", failures_table(failures));
}
