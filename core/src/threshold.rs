//! Adaptive amount limits.
//!
//! The (allowed, manual) pair is never stored. It is rebuilt on every
//! evaluation by replaying the subject's history, oldest first, starting
//! from the configured baselines. Each step reads the previous step's
//! result, so the replay order is part of the answer: the only way to
//! obtain an `OrderedHistory` is from the log's id-ordered query or from
//! records whose ids are already strictly ascending.

use crate::{
    config::ThresholdConfig,
    error::{FraudError, FraudResult},
    transaction::TransactionRecord,
    types::Amount,
    verdict::Verdict,
};

/// A subject's transactions in submission (ascending id) order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderedHistory {
    records: Vec<TransactionRecord>,
}

impl OrderedHistory {
    /// Wrap rows already returned `ORDER BY id ASC` by the log.
    pub(crate) fn from_log(records: Vec<TransactionRecord>) -> Self {
        debug_assert!(records
            .windows(2)
            .all(|w| w[0].transaction_id < w[1].transaction_id));
        Self { records }
    }

    /// Accept records only if their ids are strictly ascending.
    pub fn try_from_records(records: Vec<TransactionRecord>) -> FraudResult<Self> {
        if let Some(pair) = records
            .windows(2)
            .find(|w| w[0].transaction_id >= w[1].transaction_id)
        {
            return Err(FraudError::Other(anyhow::anyhow!(
                "history out of submission order: id {} precedes id {}",
                pair[0].transaction_id,
                pair[1].transaction_id
            )));
        }
        Ok(Self { records })
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TransactionRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TransactionRecord> {
        self.records
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThresholdPair {
    pub allowed: Amount,
    pub manual:  Amount,
}

impl ThresholdPair {
    pub fn baseline(config: &ThresholdConfig) -> Self {
        Self {
            allowed: config.allowed,
            manual:  config.manual,
        }
    }

    /// Left fold over `history`, one independent accumulator per limit.
    pub fn replay(config: &ThresholdConfig, history: &OrderedHistory) -> Self {
        history
            .iter()
            .fold(Self::baseline(config), |pair, record| Self {
                allowed: step_allowed(pair.allowed, record),
                manual:  step_manual(pair.manual, record),
            })
    }

    pub fn classify(&self, amount: Amount) -> Verdict {
        if amount <= self.allowed {
            Verdict::Allowed
        } else if amount <= self.manual {
            Verdict::ManualProcessing
        } else {
            Verdict::Prohibited
        }
    }
}

fn step_allowed(limit: Amount, record: &TransactionRecord) -> Amount {
    match record.feedback {
        Some(Verdict::Allowed) => adjust_up(limit, record.amount),
        Some(_) if record.result == Verdict::Allowed => adjust_down(limit, record.amount),
        _ => limit,
    }
}

fn step_manual(limit: Amount, record: &TransactionRecord) -> Amount {
    match record.feedback {
        Some(Verdict::Prohibited) => adjust_down(limit, record.amount),
        Some(_) if record.result == Verdict::Prohibited => adjust_up(limit, record.amount),
        _ => limit,
    }
}

/// `ceil(0.8 * limit + 0.2 * amount)`
pub fn adjust_up(limit: Amount, amount: Amount) -> Amount {
    ceil_tenths(8 * i128::from(limit) + 2 * i128::from(amount))
}

/// `ceil(0.8 * limit - 0.2 * amount)`
pub fn adjust_down(limit: Amount, amount: Amount) -> Amount {
    ceil_tenths(8 * i128::from(limit) - 2 * i128::from(amount))
}

/// Ceiling of `tenths / 10`, saturated into the amount range.
fn ceil_tenths(tenths: i128) -> Amount {
    let ceil = -((-tenths).div_euclid(10));
    ceil.clamp(i128::from(Amount::MIN), i128::from(Amount::MAX)) as Amount
}
