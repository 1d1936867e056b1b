use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{print_warnings, process_file, FilterArgs, ModelArgs};
use crate::error::Result;
use crate::fmt::{money, percent};
use crate::models::{Transaction, TxnType};
use crate::reports::{self, category_advice, Snapshot, SpendBand};

pub fn run(file: &str, filters: &FilterArgs, list: bool, model: &ModelArgs) -> Result<()> {
    let processed = process_file(file, model)?;
    println!(
        "{} {} records loaded.",
        "File uploaded successfully!".green(),
        processed.input_rows
    );
    print_warnings(&processed);
    println!("{}", "Transactions analyzed successfully!".green());

    let selection = filters.selection(&processed.table);
    let rows = reports::filter(&processed.table, &selection);
    let snap = reports::snapshot(&rows);

    println!("\n{}", metrics_table(&snap));

    if snap.is_empty() {
        println!("\nNo transactions match the selected filters.");
        return Ok(());
    }

    println!("\nSpending by Category\n{}", category_table(&snap));
    print_advisor(&snap);

    if list {
        println!("\nTransactions\n{}", transactions_table(&rows));
    }
    Ok(())
}

fn metrics_table(snap: &Snapshot) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Total Spent", "Total Credited", "Top Category"]);
    table.add_row(vec![
        Cell::new(money(snap.total_spent)),
        Cell::new(money(snap.total_credited)),
        Cell::new(&snap.top_category),
    ]);
    table
}

fn category_table(snap: &Snapshot) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Category", "Amount", "%", "Count"]);
    for item in &snap.categories {
        table.add_row(vec![
            Cell::new(&item.name),
            Cell::new(money(item.total)),
            Cell::new(format!("{:.1}%", item.pct)),
            Cell::new(item.count),
        ]);
    }
    table
}

fn print_advisor(snap: &Snapshot) {
    println!("\n{}", "Smart Savings Advisor".bold());
    if let (Some(ratio), Some(band)) = (snap.spend_ratio, snap.band()) {
        println!("Spending to Income Ratio: {}", percent(ratio));
        let msg = match band {
            SpendBand::Over80 => band.message().red(),
            SpendBand::Between60And80 => band.message().yellow(),
            SpendBand::Healthy => band.message().green(),
        };
        println!("{msg}");
    }
    println!("{}", category_advice(&snap.top_category));
}

fn transactions_table(rows: &[&Transaction]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["SMS", "Amount", "Type", "Category"]);
    for t in rows {
        let kind = match t.txn_type {
            TxnType::Debit => t.txn_type.as_str().red(),
            TxnType::Credit => t.txn_type.as_str().green(),
            TxnType::Unknown => t.txn_type.as_str().normal(),
        };
        table.add_row(vec![
            Cell::new(&t.sms),
            Cell::new(money(t.amount)),
            Cell::new(kind),
            Cell::new(&t.category),
        ]);
    }
    table
}
