//! Stolen-card and suspicious-address blocklist queries.

use super::FraudStore;
use crate::{error::FraudResult, types::EntryId};
use rusqlite::params;
use serde::Serialize;

/// The two exact-match membership sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blocklist {
    StolenCard,
    SuspiciousIp,
}

impl Blocklist {
    pub fn label(self) -> &'static str {
        match self {
            Blocklist::StolenCard   => "stolen card",
            Blocklist::SuspiciousIp => "suspicious ip",
        }
    }

    fn sql_insert(self) -> &'static str {
        match self {
            Blocklist::StolenCard   => "INSERT OR IGNORE INTO stolen_card (number) VALUES (?1)",
            Blocklist::SuspiciousIp => "INSERT OR IGNORE INTO suspicious_ip (ip) VALUES (?1)",
        }
    }

    fn sql_contains(self) -> &'static str {
        match self {
            Blocklist::StolenCard   => "SELECT EXISTS(SELECT 1 FROM stolen_card WHERE number = ?1)",
            Blocklist::SuspiciousIp => "SELECT EXISTS(SELECT 1 FROM suspicious_ip WHERE ip = ?1)",
        }
    }

    fn sql_delete(self) -> &'static str {
        match self {
            Blocklist::StolenCard   => "DELETE FROM stolen_card WHERE number = ?1",
            Blocklist::SuspiciousIp => "DELETE FROM suspicious_ip WHERE ip = ?1",
        }
    }

    fn sql_list(self) -> &'static str {
        match self {
            Blocklist::StolenCard   => "SELECT id, number FROM stolen_card ORDER BY id ASC",
            Blocklist::SuspiciousIp => "SELECT id, ip FROM suspicious_ip ORDER BY id ASC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlocklistEntry {
    pub id:    EntryId,
    pub value: String,
}

impl FraudStore {
    /// Insert `value`. Returns None when it is already listed.
    pub fn insert_blocklist_entry(
        &self,
        list: Blocklist,
        value: &str,
    ) -> FraudResult<Option<BlocklistEntry>> {
        let conn = self.conn();
        let inserted = conn.execute(list.sql_insert(), params![value])?;
        if inserted == 0 {
            return Ok(None);
        }
        Ok(Some(BlocklistEntry {
            id:    conn.last_insert_rowid(),
            value: value.to_string(),
        }))
    }

    pub fn blocklist_contains(&self, list: Blocklist, value: &str) -> FraudResult<bool> {
        let conn = self.conn();
        Ok(conn.query_row(list.sql_contains(), params![value], |r| r.get(0))?)
    }

    /// Remove `value`. Returns false when it was not listed.
    pub fn remove_blocklist_entry(&self, list: Blocklist, value: &str) -> FraudResult<bool> {
        let conn = self.conn();
        let removed = conn.execute(list.sql_delete(), params![value])?;
        Ok(removed > 0)
    }

    pub fn blocklist_entries(&self, list: Blocklist) -> FraudResult<Vec<BlocklistEntry>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(list.sql_list())?;
        let rows = stmt
            .query_map([], |r| {
                Ok(BlocklistEntry {
                    id:    r.get(0)?,
                    value: r.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
