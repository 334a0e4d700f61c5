//! Shared primitive types used across the engine.

/// Identifier assigned by the transaction log. Strictly increasing.
pub type TransactionId = i64;

/// Identifier assigned to a blocklist entry.
pub type EntryId = i64;

/// A monetary amount in currency minor units.
pub type Amount = i64;

/// Point in time a transaction was submitted for.
pub type Timestamp = chrono::NaiveDateTime;
