//! Transaction log queries.

use super::{from_millis, to_millis, FraudStore};
use crate::{
    error::FraudResult,
    threshold::OrderedHistory,
    transaction::{TransactionRecord, TransactionRequest},
    types::{Timestamp, TransactionId},
    verdict::{Region, Verdict},
};
use rusqlite::{params, OptionalExtension, Row};

const RECORD_COLUMNS: &str = "id, amount, ip, number, region, date_ms, result, feedback";

fn record_row_mapper(r: &Row<'_>) -> rusqlite::Result<TransactionRecord> {
    Ok(TransactionRecord {
        transaction_id: r.get(0)?,
        amount:         r.get(1)?,
        ip:             r.get(2)?,
        number:         r.get(3)?,
        region:         r.get(4)?,
        date:           from_millis(5, r.get(5)?)?,
        result:         r.get(6)?,
        feedback:       r.get(7)?,
    })
}

impl FraudStore {
    /// Append a new record. The log assigns the id.
    pub fn insert_transaction(
        &self,
        request: &TransactionRequest,
        result: Verdict,
    ) -> FraudResult<TransactionRecord> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO transaction_log (amount, ip, number, region, date_ms, result)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                request.amount,
                request.ip,
                request.number,
                request.region,
                to_millis(&request.date),
                result,
            ],
        )?;
        Ok(TransactionRecord {
            transaction_id: conn.last_insert_rowid(),
            amount:         request.amount,
            ip:             request.ip.clone(),
            number:         request.number.clone(),
            region:         request.region,
            date:           request.date,
            result,
            feedback:       None,
        })
    }

    pub fn get_transaction(&self, id: TransactionId) -> FraudResult<Option<TransactionRecord>> {
        let conn = self.conn();
        let record = conn
            .query_row(
                &format!("SELECT {RECORD_COLUMNS} FROM transaction_log WHERE id = ?1"),
                params![id],
                record_row_mapper,
            )
            .optional()?;
        Ok(record)
    }

    /// Every record for one card number, in submission order.
    pub fn history_for_number(&self, number: &str) -> FraudResult<OrderedHistory> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM transaction_log
             WHERE number = ?1
             ORDER BY id ASC"
        ))?;
        let rows = stmt
            .query_map(params![number], record_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(OrderedHistory::from_log(rows))
    }

    /// Every record in the log, in submission order.
    pub fn all_transactions(&self) -> FraudResult<Vec<TransactionRecord>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM transaction_log ORDER BY id ASC"
        ))?;
        let rows = stmt
            .query_map([], record_row_mapper)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn transaction_count(&self) -> FraudResult<i64> {
        let conn = self.conn();
        Ok(conn.query_row("SELECT COUNT(*) FROM transaction_log", [], |r| r.get(0))?)
    }

    /// Distinct addresses used by `number` within `[from, to]`, other than `exclude`.
    pub fn distinct_ips_in_window(
        &self,
        number: &str,
        exclude: &str,
        from: &Timestamp,
        to: &Timestamp,
    ) -> FraudResult<Vec<String>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT ip FROM transaction_log
             WHERE number = ?1 AND ip <> ?2 AND date_ms BETWEEN ?3 AND ?4
             ORDER BY ip",
        )?;
        let rows = stmt
            .query_map(
                params![number, exclude, to_millis(from), to_millis(to)],
                |r| r.get(0),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Distinct regions used by `number` within `[from, to]`, other than `exclude`.
    pub fn distinct_regions_in_window(
        &self,
        number: &str,
        exclude: Region,
        from: &Timestamp,
        to: &Timestamp,
    ) -> FraudResult<Vec<Region>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT DISTINCT region FROM transaction_log
             WHERE number = ?1 AND region <> ?2 AND date_ms BETWEEN ?3 AND ?4
             ORDER BY region",
        )?;
        let rows = stmt
            .query_map(
                params![number, exclude, to_millis(from), to_millis(to)],
                |r| r.get(0),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Set feedback only if none is recorded yet.
    /// Returns false when the row already carried feedback (or is absent).
    pub fn set_feedback_once(&self, id: TransactionId, feedback: Verdict) -> FraudResult<bool> {
        let conn = self.conn();
        let changed = conn.execute(
            "UPDATE transaction_log SET feedback = ?1
             WHERE id = ?2 AND feedback IS NULL",
            params![feedback, id],
        )?;
        Ok(changed == 1)
    }
}
