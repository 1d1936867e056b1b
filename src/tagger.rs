use crate::models::TxnType;

const DEBIT_KEYWORDS: &[&str] = &["debited", "spent", "purchase", "paid", "withdrawal"];
const CREDIT_KEYWORDS: &[&str] = &["credited", "received", "refund", "deposit", "salary"];

/// Tag a message as Debit, Credit or Unknown by keyword substring.
/// Debit keywords are checked first, so a message matching both sets is Debit.
pub fn detect_type(text: &str) -> TxnType {
    let lower = text.to_lowercase();
    if DEBIT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TxnType::Debit
    } else if CREDIT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        TxnType::Credit
    } else {
        TxnType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debit_keywords() {
        assert_eq!(detect_type("INR 500 debited from a/c xx12"), TxnType::Debit);
        assert_eq!(detect_type("you spent aed 40"), TxnType::Debit);
        assert_eq!(detect_type("ATM withdrawal of inr 2000"), TxnType::Debit);
    }

    #[test]
    fn test_credit_keywords() {
        assert_eq!(detect_type("inr 50,000 salary for march"), TxnType::Credit);
        assert_eq!(detect_type("Refund of ₹299 processed"), TxnType::Credit);
        assert_eq!(detect_type("you have received inr 10"), TxnType::Credit);
    }

    #[test]
    fn test_debit_wins_over_credit() {
        assert_eq!(
            detect_type("salary credited but also spent on groceries"),
            TxnType::Debit
        );
    }

    #[test]
    fn test_substring_match() {
        // "prepaid" contains "paid"
        assert_eq!(detect_type("prepaid recharge successful"), TxnType::Debit);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(detect_type("your otp is 4821"), TxnType::Unknown);
        assert_eq!(detect_type(""), TxnType::Unknown);
    }
}
