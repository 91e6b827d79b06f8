//! Shared primitive types used across the entire simulation.

/// Position of a party in the configured party list.
pub type PartyIndex = usize;

/// One-based constituency number. Zero is reserved for run-level events.
pub type ConstituencyNo = u64;

/// The canonical run identifier.
pub type RunId = String;
