//! The risk engine: entry point for evaluations, feedback, and blocklist
//! administration.
//!
//! CHECK SET (fixed, every evaluation):
//!   1. amount              adaptive limits replayed from history
//!   2. ip                  suspicious-address blocklist
//!   3. card-number         stolen-card blocklist
//!   4. region-correlation  distinct other regions in the window
//!   5. ip-correlation      distinct other addresses in the window
//!
//! RULES:
//!   - Malformed input is rejected before any check runs.
//!   - Checks share no mutable state; each returns a CheckOutcome.
//!   - History read, classification and append run under the subject lock.
//!   - A rejected request never writes.

use crate::{
    config::EngineConfig,
    correlation::{self, Dimension},
    error::{FraudError, FraudResult},
    feedback,
    locks::SubjectLocks,
    store::{Blocklist, BlocklistEntry, FraudStore},
    threshold::{OrderedHistory, ThresholdPair},
    transaction::{Evaluation, TransactionRecord, TransactionRequest},
    types::TransactionId,
    validation::{is_valid_card_number, is_valid_ip},
    verdict::{self, CheckOutcome, ReasonTag, Verdict},
};

pub struct RiskEngine {
    pub config: EngineConfig,
    pub store:  FraudStore,
    locks:      SubjectLocks,
}

impl RiskEngine {
    pub fn new(config: EngineConfig, store: FraudStore) -> Self {
        Self {
            config,
            store,
            locks: SubjectLocks::new(),
        }
    }

    /// In-memory, migrated engine with default configuration.
    pub fn build_test() -> FraudResult<Self> {
        Self::build_test_with(EngineConfig::default())
    }

    pub fn build_test_with(config: EngineConfig) -> FraudResult<Self> {
        let store = FraudStore::in_memory()?;
        store.migrate()?;
        Ok(Self::new(config, store))
    }

    // ── Evaluation ─────────────────────────────────────────────

    /// Run every check, record the transaction with the combined verdict,
    /// and return that verdict with its reasons.
    pub fn evaluate(&self, request: &TransactionRequest) -> FraudResult<Evaluation> {
        validate_request(&self.config, request).inspect_err(|e| {
            log::warn!("Rejected transaction for evaluation: {e}");
        })?;

        let subject_lock = self.locks.lock_for(&request.number);
        let _guard = subject_lock.lock();

        let history = self.store.history_for_number(&request.number)?;
        let outcomes = self.run_checks(request, &history)?;
        let (result, info) = verdict::combine(&outcomes);

        let record = self.store.insert_transaction(request, result)?;
        log::info!(
            "Transaction {} for card {} classified {result} ({info})",
            record.transaction_id,
            mask(&request.number)
        );

        Ok(Evaluation { result, info })
    }

    /// The five outcomes for `request` against the given history.
    pub fn run_checks(
        &self,
        request: &TransactionRequest,
        history: &OrderedHistory,
    ) -> FraudResult<Vec<CheckOutcome>> {
        let outcomes = vec![
            self.check_amount(request, history),
            self.check_blocklist(Blocklist::SuspiciousIp, &request.ip)?,
            self.check_blocklist(Blocklist::StolenCard, &request.number)?,
            self.check_correlation(request, Dimension::Region)?,
            self.check_correlation(request, Dimension::Ip)?,
        ];
        for outcome in &outcomes {
            log::debug!("check {} -> {}", outcome.reason, outcome.verdict);
        }
        Ok(outcomes)
    }

    /// Current adaptive limits for a card, as the next evaluation would see them.
    pub fn thresholds_for(&self, number: &str) -> FraudResult<ThresholdPair> {
        let history = self.store.history_for_number(number)?;
        Ok(ThresholdPair::replay(&self.config.thresholds, &history))
    }

    fn check_amount(&self, request: &TransactionRequest, history: &OrderedHistory) -> CheckOutcome {
        let limits = ThresholdPair::replay(&self.config.thresholds, history);
        log::debug!(
            "limits for card {}: allowed={} manual={}",
            mask(&request.number),
            limits.allowed,
            limits.manual
        );
        CheckOutcome::new(limits.classify(request.amount), ReasonTag::Amount)
    }

    fn check_blocklist(&self, list: Blocklist, value: &str) -> FraudResult<CheckOutcome> {
        let reason = match list {
            Blocklist::SuspiciousIp => ReasonTag::Ip,
            Blocklist::StolenCard   => ReasonTag::CardNumber,
        };
        let verdict = if self.store.blocklist_contains(list, value)? {
            Verdict::Prohibited
        } else {
            Verdict::Allowed
        };
        Ok(CheckOutcome::new(verdict, reason))
    }

    fn check_correlation(
        &self,
        request: &TransactionRequest,
        dimension: Dimension,
    ) -> FraudResult<CheckOutcome> {
        let cfg = &self.config.correlation;
        let (from, to) = correlation::window_bounds(cfg, request.date)?;
        let distinct = match dimension {
            Dimension::Ip => self
                .store
                .distinct_ips_in_window(&request.number, &request.ip, &from, &to)?
                .len(),
            Dimension::Region => self
                .store
                .distinct_regions_in_window(&request.number, request.region, &from, &to)?
                .len(),
        };
        Ok(CheckOutcome::new(
            correlation::classify_distinct(cfg, distinct),
            dimension.reason(),
        ))
    }

    // ── Feedback ───────────────────────────────────────────────

    /// Record a reviewer's correction. At most once per transaction.
    pub fn record_feedback(
        &self,
        id: TransactionId,
        correction: Verdict,
    ) -> FraudResult<TransactionRecord> {
        let current = self.store.get_transaction(id)?;
        let record = feedback::check_transition(id, current.as_ref(), correction)
            .inspect_err(|e| log::warn!("Rejected feedback: {e}"))?;

        // The update is conditional on feedback still being unset, so a
        // concurrent writer that passed the check above loses here.
        if !self.store.set_feedback_once(id, correction)? {
            log::warn!("Rejected feedback: transaction {id} was corrected concurrently");
            return Err(FraudError::conflict(format!(
                "transaction {id} already has feedback"
            )));
        }

        log::info!(
            "Feedback {correction} recorded for transaction {id} (was {})",
            record.result
        );
        Ok(TransactionRecord {
            feedback: Some(correction),
            ..record.clone()
        })
    }

    // ── History ────────────────────────────────────────────────

    pub fn history(&self) -> FraudResult<Vec<TransactionRecord>> {
        self.store.all_transactions()
    }

    pub fn history_for(&self, number: &str) -> FraudResult<Vec<TransactionRecord>> {
        if !is_valid_card_number(number) {
            return Err(FraudError::malformed("card number", number));
        }
        let history = self.store.history_for_number(number)?;
        if history.is_empty() {
            return Err(FraudError::not_found(format!(
                "Transactions for card {}",
                mask(number)
            )));
        }
        Ok(history.into_records())
    }

    // ── Blocklists ─────────────────────────────────────────────

    pub fn add_stolen_card(&self, number: &str) -> FraudResult<BlocklistEntry> {
        self.add_to_blocklist(Blocklist::StolenCard, number)
    }

    pub fn remove_stolen_card(&self, number: &str) -> FraudResult<()> {
        self.remove_from_blocklist(Blocklist::StolenCard, number)
    }

    pub fn list_stolen_cards(&self) -> FraudResult<Vec<BlocklistEntry>> {
        self.store.blocklist_entries(Blocklist::StolenCard)
    }

    pub fn add_suspicious_ip(&self, ip: &str) -> FraudResult<BlocklistEntry> {
        self.add_to_blocklist(Blocklist::SuspiciousIp, ip)
    }

    pub fn remove_suspicious_ip(&self, ip: &str) -> FraudResult<()> {
        self.remove_from_blocklist(Blocklist::SuspiciousIp, ip)
    }

    pub fn list_suspicious_ips(&self) -> FraudResult<Vec<BlocklistEntry>> {
        self.store.blocklist_entries(Blocklist::SuspiciousIp)
    }

    fn add_to_blocklist(&self, list: Blocklist, value: &str) -> FraudResult<BlocklistEntry> {
        validate_blocklist_value(list, value)?;
        let entry = self
            .store
            .insert_blocklist_entry(list, value)?
            .ok_or_else(|| FraudError::conflict(format!("{} {value} already listed", list.label())))?;
        log::info!("Added {} entry {}", list.label(), entry.id);
        Ok(entry)
    }

    fn remove_from_blocklist(&self, list: Blocklist, value: &str) -> FraudResult<()> {
        validate_blocklist_value(list, value)?;
        if !self.store.remove_blocklist_entry(list, value)? {
            return Err(FraudError::not_found(format!("{} {value}", list.label())));
        }
        log::info!("Removed {} {value}", list.label());
        Ok(())
    }
}

fn validate_request(config: &EngineConfig, request: &TransactionRequest) -> FraudResult<()> {
    if request.amount < 1 {
        return Err(FraudError::malformed("amount", request.amount.to_string()));
    }
    if !is_valid_card_number(&request.number) {
        return Err(FraudError::malformed("card number", request.number.as_str()));
    }
    if !is_valid_ip(&request.ip) {
        return Err(FraudError::malformed("ip", request.ip.as_str()));
    }
    correlation::window_bounds(&config.correlation, request.date)?;
    Ok(())
}

fn validate_blocklist_value(list: Blocklist, value: &str) -> FraudResult<()> {
    let valid = match list {
        Blocklist::StolenCard   => is_valid_card_number(value),
        Blocklist::SuspiciousIp => is_valid_ip(value),
    };
    if valid {
        Ok(())
    } else {
        let field = match list {
            Blocklist::StolenCard   => "card number",
            Blocklist::SuspiciousIp => "ip",
        };
        Err(FraudError::malformed(field, value))
    }
}

/// Last four digits only, for log lines.
fn mask(number: &str) -> String {
    let tail = number.len().saturating_sub(4);
    format!("****{}", &number[tail..])
}
