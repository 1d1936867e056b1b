use std::collections::BTreeMap;

use crate::models::{Transaction, TxnType};

pub const NO_CATEGORY: &str = "N/A";

// ---------------------------------------------------------------------------
// Filter selection
// ---------------------------------------------------------------------------

/// Selected transaction types and categories. A record passes when both its
/// type and its category are selected.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSelection {
    pub types: Vec<TxnType>,
    pub categories: Vec<String>,
}

impl FilterSelection {
    /// Every type and category present in the table, in order of first appearance.
    pub fn all(table: &[Transaction]) -> Self {
        Self {
            types: distinct_types(table),
            categories: distinct_categories(table),
        }
    }

    /// Narrow the default selection to the given values. An empty list keeps
    /// every value present in the table for that dimension.
    pub fn from_args(table: &[Transaction], types: &[TxnType], categories: &[String]) -> Self {
        let mut sel = Self::all(table);
        if !types.is_empty() {
            sel.types = types.to_vec();
        }
        if !categories.is_empty() {
            sel.categories = categories.to_vec();
        }
        sel
    }

    pub fn matches(&self, txn: &Transaction) -> bool {
        self.types.contains(&txn.txn_type) && self.categories.iter().any(|c| *c == txn.category)
    }
}

pub fn distinct_types(table: &[Transaction]) -> Vec<TxnType> {
    let mut out: Vec<TxnType> = Vec::new();
    for t in table {
        if !out.contains(&t.txn_type) {
            out.push(t.txn_type);
        }
    }
    out
}

pub fn distinct_categories(table: &[Transaction]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for t in table {
        if !out.contains(&t.category) {
            out.push(t.category.clone());
        }
    }
    out
}

pub fn filter<'a>(table: &'a [Transaction], selection: &FilterSelection) -> Vec<&'a Transaction> {
    table.iter().filter(|t| selection.matches(t)).collect()
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub name: String,
    pub total: f64,
    pub count: usize,
    pub pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub total_spent: f64,
    pub total_credited: f64,
    /// Sorted by total, largest first.
    pub categories: Vec<CategoryTotal>,
    pub top_category: String,
    pub spend_ratio: Option<f64>,
    pub count: usize,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn band(&self) -> Option<SpendBand> {
        SpendBand::classify(self.total_spent, self.total_credited)
    }
}

pub fn snapshot(records: &[&Transaction]) -> Snapshot {
    let total_spent: f64 = records
        .iter()
        .filter(|t| t.txn_type == TxnType::Debit)
        .map(|t| t.amount)
        .sum();
    let total_credited: f64 = records
        .iter()
        .filter(|t| t.txn_type == TxnType::Credit)
        .map(|t| t.amount)
        .sum();

    let mut by_name: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for t in records {
        let entry = by_name.entry(t.category.as_str()).or_insert((0.0, 0));
        entry.0 += t.amount;
        entry.1 += 1;
    }

    // Alphabetical order from the BTreeMap; strict > keeps the first name on ties.
    let mut top_category = NO_CATEGORY.to_string();
    let mut best = f64::NEG_INFINITY;
    for (name, (total, _)) in &by_name {
        if *total > best {
            best = *total;
            top_category = name.to_string();
        }
    }

    let grand_total: f64 = by_name.values().map(|(t, _)| t).sum();
    let mut categories: Vec<CategoryTotal> = by_name
        .into_iter()
        .map(|(name, (total, count))| CategoryTotal {
            name: name.to_string(),
            total,
            count,
            pct: if grand_total != 0.0 { total / grand_total * 100.0 } else { 0.0 },
        })
        .collect();
    categories.sort_by(|a, b| b.total.total_cmp(&a.total));

    let spend_ratio = if total_credited > 0.0 {
        Some(total_spent / total_credited)
    } else {
        None
    };

    Snapshot {
        total_spent,
        total_credited,
        categories,
        top_category,
        spend_ratio,
        count: records.len(),
    }
}

// ---------------------------------------------------------------------------
// Advisor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpendBand {
    Over80,
    Between60And80,
    Healthy,
}

impl SpendBand {
    /// Only defined when something was credited.
    pub fn classify(total_spent: f64, total_credited: f64) -> Option<Self> {
        if total_credited <= 0.0 {
            return None;
        }
        Some(if total_spent > total_credited * 0.8 {
            Self::Over80
        } else if total_spent > total_credited * 0.6 {
            Self::Between60And80
        } else {
            Self::Healthy
        })
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Over80 => "Spending more than 80% of your income! Time to tighten the budget.",
            Self::Between60And80 => {
                "You're spending 60-80% of your income. Consider increasing your savings rate."
            }
            Self::Healthy => "Great! You're maintaining a healthy spending-to-income ratio.",
        }
    }
}

pub fn category_advice(top_category: &str) -> &'static str {
    match top_category {
        "Food" => "Reduce food deliveries: meal prepping can save up to 30%.",
        "Shopping" => "Set a shopping cap for the month to control impulse buys.",
        "Bills" => "Audit your recurring subscriptions. Hidden savings often lie there.",
        "Travel" => "Consider planning trips in off-peak seasons to cut travel costs.",
        _ => "Keep tracking your spending. Consistency is the key to savings!",
    }
}
