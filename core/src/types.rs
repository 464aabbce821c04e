//! Shared primitive types used across the crate.

/// A stable account identifier as it appears on the wire, e.g. `ACC_JOHN_SMITH`.
pub type AccountId = String;

/// A unique event identifier.
pub type EventId = String;

/// Milliseconds since the Unix epoch.
pub type TimestampMs = i64;
