//! Transaction request and record shapes.

use crate::{
    types::{Amount, Timestamp, TransactionId},
    verdict::{Region, Verdict},
};
use serde::{Deserialize, Serialize};

/// A transaction submitted for evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRequest {
    pub amount: Amount,
    pub ip:     String,
    pub number: String,
    pub region: Region,
    pub date:   Timestamp,
}

/// A row of the transaction log.
///
/// `result` never changes after insert. `feedback` is set at most once
/// and always differs from `result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_id: TransactionId,
    pub amount:         Amount,
    pub ip:             String,
    pub number:         String,
    pub region:         Region,
    pub date:           Timestamp,
    pub result:         Verdict,
    pub feedback:       Option<Verdict>,
}

/// What the caller gets back from an evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub result: Verdict,
    pub info:   String,
}
