use std::path::PathBuf;

use colored::Colorize;

use crate::cli::{print_warnings, process_file, FilterArgs, ModelArgs};
use crate::error::Result;
use crate::export::{export_csv, DEFAULT_EXPORT_NAME};
use crate::reports::filter;

pub fn run(file: &str, output: Option<String>, filters: &FilterArgs, model: &ModelArgs) -> Result<()> {
    let processed = process_file(file, model)?;
    print_warnings(&processed);

    let selection = filters.selection(&processed.table);
    let rows = filter(&processed.table, &selection);
    let path = output
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_NAME));
    export_csv(&rows, &path)?;

    println!(
        "{} {} ({} transactions)",
        "Wrote".green(),
        path.display(),
        rows.len()
    );
    Ok(())
}
