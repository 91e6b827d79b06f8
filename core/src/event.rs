//! The run event log.
//!
//! RULE: Every observable outcome of a run is recorded as a SimEvent.
//! Replaying the same seed must reproduce the log byte for byte.

use crate::types::{ConstituencyNo, PartyIndex, RunId};
use serde::{Deserialize, Serialize};

/// Every event emitted during a run.
/// Variants are appended only, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SimEvent {
    // ── Run lifecycle ──────────────────────────────
    RunInitialized {
        run_id: RunId,
        seed: u64,
    },
    RunCompleted {
        constituencies: u64,
        seats: Vec<u64>,
    },

    // ── Electorate ─────────────────────────────────
    ElectorateGenerated {
        party: PartyIndex,
        name: String,
        voters: u64,
    },

    // ── Declarations ───────────────────────────────
    ConstituencyDeclared {
        constituency: ConstituencyNo,
        tally: Vec<u64>,
        winner: PartyIndex,
    },
}

impl SimEvent {
    /// Stable string name for the event_type column.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::RunInitialized { .. }       => "run_initialized",
            Self::RunCompleted { .. }         => "run_completed",
            Self::ElectorateGenerated { .. }  => "electorate_generated",
            Self::ConstituencyDeclared { .. } => "constituency_declared",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id: Option<i64>,
    pub run_id: RunId,
    pub constituency: ConstituencyNo,
    pub source: String,
    pub event_type: String,
    pub payload: String, // JSON-serialized SimEvent
}
