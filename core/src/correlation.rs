//! Multi-location anomaly checks.
//!
//! For one subject, counts the distinct addresses (or regions) seen inside
//! a trailing window, not counting the value the current transaction uses.
//! Many distinct locations in a short span suggests a cloned card.

use crate::{
    config::CorrelationConfig,
    error::{FraudError, FraudResult},
    types::Timestamp,
    verdict::{ReasonTag, Verdict},
};

/// Which attribute of a transaction is being correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Ip,
    Region,
}

impl Dimension {
    pub fn reason(self) -> ReasonTag {
        match self {
            Dimension::Ip     => ReasonTag::IpCorrelation,
            Dimension::Region => ReasonTag::RegionCorrelation,
        }
    }
}

/// Inclusive `[date - window, date]`.
///
/// A date so early that the window start is not representable is
/// malformed input.
pub fn window_bounds(
    config: &CorrelationConfig,
    date: Timestamp,
) -> FraudResult<(Timestamp, Timestamp)> {
    let window = config.window().ok_or_else(|| {
        FraudError::Other(anyhow::anyhow!(
            "correlation window of {}s is out of range",
            config.window_seconds
        ))
    })?;
    let from = date
        .checked_sub_signed(window)
        .ok_or_else(|| FraudError::malformed("date", date.to_string()))?;
    Ok((from, date))
}

/// Map a count of distinct *other* values to a verdict.
pub fn classify_distinct(config: &CorrelationConfig, distinct_others: usize) -> Verdict {
    if distinct_others > config.prohibited_above {
        Verdict::Prohibited
    } else if distinct_others >= config.manual_at {
        Verdict::ManualProcessing
    } else {
        Verdict::Allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn default_thresholds() {
        let cfg = CorrelationConfig::default();
        assert_eq!(classify_distinct(&cfg, 0), Verdict::Allowed);
        assert_eq!(classify_distinct(&cfg, 1), Verdict::Allowed);
        assert_eq!(classify_distinct(&cfg, 2), Verdict::ManualProcessing);
        assert_eq!(classify_distinct(&cfg, 3), Verdict::Prohibited);
        assert_eq!(classify_distinct(&cfg, 7), Verdict::Prohibited);
    }

    #[test]
    fn window_ends_at_transaction_time() {
        let cfg = CorrelationConfig::default();
        let date = NaiveDate::from_ymd_opt(2022, 1, 22)
            .unwrap()
            .and_hms_opt(16, 4, 0)
            .unwrap();
        let (from, to) = window_bounds(&cfg, date).unwrap();
        assert_eq!(to, date);
        assert_eq!(from, date - chrono::Duration::hours(1));
    }

    #[test]
    fn window_start_before_min_date_is_malformed() {
        let cfg = CorrelationConfig::default();
        let date = chrono::NaiveDateTime::MIN + chrono::Duration::minutes(10);
        let err = window_bounds(&cfg, date).unwrap_err();
        assert_eq!(err.kind(), "malformed_input");
    }

    #[test]
    fn unrepresentable_window_is_internal() {
        let cfg = CorrelationConfig { window_seconds: i64::MAX, ..Default::default() };
        let err = window_bounds(&cfg, chrono::NaiveDateTime::MAX).unwrap_err();
        assert_eq!(err.kind(), "internal");
    }
}
