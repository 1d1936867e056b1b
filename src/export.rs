use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::Transaction;

pub const DEFAULT_EXPORT_NAME: &str = "categorized_transactions.csv";

/// Write records as `SMS,Amount,Type,Predicted_Category`, header included.
pub fn write_csv<W: Write>(records: &[&Transaction], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if records.is_empty() {
        wtr.write_record(["SMS", "Amount", "Type", "Predicted_Category"])?;
    }
    for txn in records {
        wtr.serialize(txn)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv(records: &[&Transaction], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::File::create(path)?;
    write_csv(records, std::io::BufWriter::new(file))
}
