use std::io::Read;
use std::path::Path;

use crate::classifier::CategoryClassifier;
use crate::error::{Result, SmsfinError};
use crate::extractor::extract_amount;
use crate::models::{Transaction, TransactionTable};
use crate::tagger::detect_type;

pub const SMS_COLUMN: &str = "SMS";

/// Degraded-data conditions. Processing continues; the caller shows these.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineWarning {
    /// No message contained an extractable amount; every amount was set to 0.
    NoAmountsDetected,
    /// Messages without an amount were left out of the table.
    RowsDropped { count: usize },
}

impl std::fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoAmountsDetected => write!(
                f,
                "No transaction amounts detected in the messages. Analysis will continue without amount data."
            ),
            Self::RowsDropped { count } => write!(
                f,
                "{count} message(s) without a recognizable amount were skipped."
            ),
        }
    }
}

#[derive(Debug)]
pub struct PipelineOutput {
    pub table: TransactionTable,
    pub warnings: Vec<PipelineWarning>,
    pub input_rows: usize,
}

/// Read the `SMS` column from a CSV with a header row. Other columns are ignored.
///
/// Rows shorter than the header are accepted and missing cells read as empty.
/// Rows longer than the header are rejected.
pub fn read_messages<R: Read>(reader: R) -> Result<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = rdr.headers()?.clone();
    let idx = headers
        .iter()
        .position(|h| h == SMS_COLUMN)
        .ok_or_else(|| SmsfinError::MissingColumn(SMS_COLUMN.to_string()))?;

    let mut messages = Vec::new();
    for result in rdr.records() {
        let record = result?;
        if record.len() > headers.len() {
            let line = record.position().map_or(0, |p| p.line());
            return Err(SmsfinError::RaggedRow {
                line,
                expected: headers.len(),
                got: record.len(),
            });
        }
        messages.push(record.get(idx).unwrap_or("").to_string());
    }
    Ok(messages)
}

pub fn load_messages(path: &Path) -> Result<Vec<String>> {
    let file = std::fs::File::open(path)?;
    read_messages(std::io::BufReader::new(file))
}

pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

pub struct Pipeline<'a> {
    classifier: &'a dyn CategoryClassifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(classifier: &'a dyn CategoryClassifier) -> Self {
        Self { classifier }
    }

    pub fn run(&self, messages: &[String]) -> Result<PipelineOutput> {
        let input_rows = messages.len();
        let normalized: Vec<String> = messages.iter().map(|m| normalize(m)).collect();
        let amounts: Vec<Option<f64>> = normalized.iter().map(|m| extract_amount(m)).collect();

        let mut warnings = Vec::new();
        let (kept, amounts): (Vec<String>, Vec<f64>) = if amounts.iter().all(Option::is_none) {
            warnings.push(PipelineWarning::NoAmountsDetected);
            let zeros = vec![0.0; normalized.len()];
            (normalized, zeros)
        } else {
            let kept: Vec<(String, f64)> = normalized
                .into_iter()
                .zip(amounts)
                .filter_map(|(m, a)| a.map(|a| (m, a)))
                .collect();
            let dropped = input_rows - kept.len();
            if dropped > 0 {
                warnings.push(PipelineWarning::RowsDropped { count: dropped });
            }
            kept.into_iter().unzip()
        };

        let categories = self.classifier.predict(&kept)?;
        if categories.len() != kept.len() {
            return Err(SmsfinError::ClassifierMismatch {
                expected: kept.len(),
                got: categories.len(),
            });
        }

        let table = kept
            .into_iter()
            .zip(amounts)
            .zip(categories)
            .map(|((sms, amount), category)| {
                let txn_type = detect_type(&sms);
                Transaction {
                    sms,
                    amount,
                    txn_type,
                    category,
                }
            })
            .collect();

        Ok(PipelineOutput {
            table,
            warnings,
            input_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::tests::sample_handle;
    use crate::models::TxnType;

    struct FixedLabel(&'static str);

    impl CategoryClassifier for FixedLabel {
        fn predict(&self, messages: &[String]) -> Result<Vec<String>> {
            Ok(messages.iter().map(|_| self.0.to_string()).collect())
        }
    }

    struct Broken;

    impl CategoryClassifier for Broken {
        fn predict(&self, _messages: &[String]) -> Result<Vec<String>> {
            Ok(vec!["Food".to_string()])
        }
    }

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_read_messages_ignores_other_columns() {
        let csv = "Date,SMS,Bank\n2025-01-01,INR 100 debited,HDFC\n2025-01-02,\"Salary, INR 5,000 credited\",SBI\n";
        let messages = read_messages(csv.as_bytes()).unwrap();
        assert_eq!(messages, vec!["INR 100 debited", "Salary, INR 5,000 credited"]);
    }

    #[test]
    fn test_read_messages_missing_column() {
        let csv = "Date,Message\n2025-01-01,INR 100 debited\n";
        let err = read_messages(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, SmsfinError::MissingColumn(ref c) if c == "SMS"));
    }

    #[test]
    fn test_read_messages_column_name_is_case_sensitive() {
        let csv = "sms\nINR 100 debited\n";
        assert!(matches!(
            read_messages(csv.as_bytes()),
            Err(SmsfinError::MissingColumn(_))
        ));
    }

    #[test]
    fn test_read_messages_long_rows_fail() {
        let csv = "SMS,Bank\nINR 100 debited,HDFC,extra\n";
        assert!(matches!(
            read_messages(csv.as_bytes()),
            Err(SmsfinError::RaggedRow { line: 2, expected: 2, got: 3 })
        ));
    }

    #[test]
    fn test_read_messages_short_rows_read_as_empty() {
        let csv = "SMS,Bank\nINR 100 debited,HDFC\nINR 50 paid\n";
        let messages = read_messages(csv.as_bytes()).unwrap();
        assert_eq!(messages, vec!["INR 100 debited", "INR 50 paid"]);

        let csv = "Bank,SMS\nHDFC,INR 100 debited\nSBI\n";
        let messages = read_messages(csv.as_bytes()).unwrap();
        assert_eq!(messages, vec!["INR 100 debited", ""]);
    }

    #[test]
    fn test_load_messages_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sms.csv");
        std::fs::write(&path, "SMS\nINR 10 paid\n").unwrap();
        assert_eq!(load_messages(&path).unwrap(), vec!["INR 10 paid"]);
    }

    #[test]
    fn test_normalizes_and_enriches() {
        let classifier = FixedLabel("Food");
        let out = Pipeline::new(&classifier)
            .run(&strings(&["  INR 250 Debited at Swiggy  "]))
            .unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(
            out.table,
            vec![Transaction {
                sms: "inr 250 debited at swiggy".to_string(),
                amount: 250.0,
                txn_type: TxnType::Debit,
                category: "Food".to_string(),
            }]
        );
    }

    #[test]
    fn test_drops_rows_without_amount() {
        let classifier = FixedLabel("Other");
        let out = Pipeline::new(&classifier)
            .run(&strings(&[
                "INR 100 debited",
                "your otp is 1234",
                "salary of inr 50,000 credited",
            ]))
            .unwrap();
        assert_eq!(out.input_rows, 3);
        assert_eq!(out.table.len(), 2);
        assert_eq!(out.table[0].amount, 100.0);
        assert_eq!(out.table[1].amount, 50000.0);
        assert_eq!(out.table[1].txn_type, TxnType::Credit);
        assert_eq!(out.warnings, vec![PipelineWarning::RowsDropped { count: 1 }]);
    }

    #[test]
    fn test_all_null_amounts_become_zero() {
        let classifier = FixedLabel("Other");
        let out = Pipeline::new(&classifier)
            .run(&strings(&["payment received", "spent at store", "hello"]))
            .unwrap();
        assert_eq!(out.table.len(), 3);
        assert!(out.table.iter().all(|t| t.amount == 0.0));
        assert_eq!(out.warnings, vec![PipelineWarning::NoAmountsDetected]);
        assert_eq!(out.table[0].txn_type, TxnType::Credit);
        assert_eq!(out.table[1].txn_type, TxnType::Debit);
        assert_eq!(out.table[2].txn_type, TxnType::Unknown);
    }

    #[test]
    fn test_empty_upload() {
        let classifier = FixedLabel("Other");
        let out = Pipeline::new(&classifier).run(&[]).unwrap();
        assert!(out.table.is_empty());
        assert_eq!(out.warnings, vec![PipelineWarning::NoAmountsDetected]);
    }

    #[test]
    fn test_classifies_only_kept_rows() {
        let handle = sample_handle();
        let out = Pipeline::new(&handle)
            .run(&strings(&[
                "INR 400 paid to Zomato",
                "Amazon delivery today",
                "INR 2,999 spent on Flipkart",
            ]))
            .unwrap();
        let cats: Vec<&str> = out.table.iter().map(|t| t.category.as_str()).collect();
        assert_eq!(cats, vec!["Food", "Shopping"]);
    }

    #[test]
    fn test_classifier_length_mismatch() {
        let err = Pipeline::new(&Broken)
            .run(&strings(&["inr 1 paid", "inr 2 paid"]))
            .unwrap_err();
        assert!(matches!(
            err,
            SmsfinError::ClassifierMismatch { expected: 2, got: 1 }
        ));
    }
}
