use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TxnType {
    Debit,
    Credit,
    Unknown,
}

impl TxnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Debit => "Debit",
            Self::Credit => "Credit",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TxnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TxnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(Self::Debit),
            "credit" => Ok(Self::Credit),
            "unknown" => Ok(Self::Unknown),
            other => Err(format!("unknown transaction type '{other}' (expected debit, credit or unknown)")),
        }
    }
}

/// One SMS message after enrichment. `sms` holds the normalized
/// (lower-cased, trimmed) text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "SMS")]
    pub sms: String,
    #[serde(rename = "Amount")]
    pub amount: f64,
    #[serde(rename = "Type")]
    pub txn_type: TxnType,
    #[serde(rename = "Predicted_Category")]
    pub category: String,
}

/// Ordered records from a single upload.
pub type TransactionTable = Vec<Transaction>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_txn_type_parse_is_case_insensitive() {
        assert_eq!("DEBIT".parse::<TxnType>().unwrap(), TxnType::Debit);
        assert_eq!(" credit ".parse::<TxnType>().unwrap(), TxnType::Credit);
        assert_eq!("Unknown".parse::<TxnType>().unwrap(), TxnType::Unknown);
        assert!("refund".parse::<TxnType>().is_err());
    }

    #[test]
    fn test_txn_type_display() {
        assert_eq!(TxnType::Debit.to_string(), "Debit");
        assert_eq!(TxnType::Credit.to_string(), "Credit");
        assert_eq!(TxnType::Unknown.to_string(), "Unknown");
    }
}
