//! Reviewer feedback state machine.
//!
//! NO_FEEDBACK --(correction != result)--> FEEDBACK_RECORDED (terminal)
//!
//! Preconditions are checked in a fixed order: the transaction exists,
//! the correction differs from the original result, no correction has
//! been recorded yet.

use crate::{
    error::{FraudError, FraudResult},
    transaction::TransactionRecord,
    types::TransactionId,
    verdict::Verdict,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackState {
    NoFeedback,
    Recorded(Verdict),
}

impl FeedbackState {
    pub fn of(record: &TransactionRecord) -> Self {
        match record.feedback {
            None => FeedbackState::NoFeedback,
            Some(v) => FeedbackState::Recorded(v),
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FeedbackState::Recorded(_))
    }
}

/// Validate a correction against the current record, without mutating it.
pub fn check_transition(
    id: TransactionId,
    record: Option<&TransactionRecord>,
    target: Verdict,
) -> FraudResult<&TransactionRecord> {
    let record = record.ok_or_else(|| FraudError::not_found(format!("Transaction {id}")))?;

    if target == record.result {
        return Err(FraudError::Unprocessable {
            transaction_id: id,
            result: record.result.to_string(),
        });
    }

    if FeedbackState::of(record).is_terminal() {
        return Err(FraudError::conflict(format!(
            "transaction {id} already has feedback"
        )));
    }

    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verdict::Region;
    use chrono::NaiveDate;

    fn record(result: Verdict, feedback: Option<Verdict>) -> TransactionRecord {
        TransactionRecord {
            transaction_id: 7,
            amount: 500,
            ip: "192.168.1.1".into(),
            number: "4000008449433403".into(),
            region: Region::Eca,
            date: NaiveDate::from_ymd_opt(2022, 1, 22)
                .unwrap()
                .and_hms_opt(16, 4, 0)
                .unwrap(),
            result,
            feedback,
        }
    }

    #[test]
    fn missing_record_is_not_found() {
        let err = check_transition(7, None, Verdict::Allowed).unwrap_err();
        assert_eq!(err.kind(), "not_found");
    }

    #[test]
    fn restating_result_is_unprocessable_even_after_feedback() {
        // Same-as-result is checked before the terminal-state check.
        let rec = record(Verdict::ManualProcessing, Some(Verdict::Allowed));
        let err = check_transition(7, Some(&rec), Verdict::ManualProcessing).unwrap_err();
        assert_eq!(err.kind(), "unprocessable");
    }

    #[test]
    fn second_correction_conflicts() {
        let rec = record(Verdict::ManualProcessing, Some(Verdict::Allowed));
        let err = check_transition(7, Some(&rec), Verdict::Prohibited).unwrap_err();
        assert_eq!(err.kind(), "conflict");
    }

    #[test]
    fn first_correction_is_accepted() {
        let rec = record(Verdict::ManualProcessing, None);
        assert_eq!(FeedbackState::of(&rec), FeedbackState::NoFeedback);
        assert!(check_transition(7, Some(&rec), Verdict::Allowed).is_ok());
    }
}
