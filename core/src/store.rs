//! SQLite persistence layer.
//!
//! RULE: Only store.rs talks to the database.
//! The engine calls store methods; it never executes SQL directly.

use rusqlite::{Connection, OptionalExtension, params};
use crate::{
    error::SimResult,
    event::EventLogEntry,
    result::ConstituencyResult,
    types::ConstituencyNo,
};

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) the results database at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn.execute_batch(include_str!("../../migrations/001_foundation.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id: &str,
        seed: u64,
        version: &str,
        started_at: i64,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, version, started_at) VALUES (?1, ?2, ?3, ?4)",
            params![run_id, seed as i64, version, started_at],
        )?;
        Ok(())
    }

    pub fn run_seed(&self, run_id: &str) -> SimResult<Option<u64>> {
        let mut stmt = self.conn.prepare("SELECT seed FROM run WHERE run_id = ?1")?;
        let seed = stmt
            .query_row(params![run_id], |row| row.get::<_, i64>(0))
            .optional()?
            .map(|s| s as u64);
        Ok(seed)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, constituency, source, event_type, payload)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                entry.run_id,
                entry.constituency as i64,
                entry.source,
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_constituency(
        &self,
        run_id: &str,
        constituency: ConstituencyNo,
    ) -> SimResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, constituency, source, event_type, payload
             FROM event_log WHERE run_id = ?1 AND constituency = ?2
             ORDER BY id ASC",
            params![run_id, constituency as i64],
        )
    }

    pub fn all_events(&self, run_id: &str) -> SimResult<Vec<EventLogEntry>> {
        self.query_events(
            "SELECT id, run_id, constituency, source, event_type, payload
             FROM event_log WHERE run_id = ?1
             ORDER BY id ASC",
            params![run_id],
        )
    }

    fn query_events(
        &self,
        sql: &str,
        args: impl rusqlite::Params,
    ) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(sql)?;
        let entries = stmt.query_map(args, |row| {
            Ok(EventLogEntry {
                id:           Some(row.get(0)?),
                run_id:       row.get(1)?,
                constituency: row.get::<_, i64>(2)? as u64,
                source:       row.get(3)?,
                event_type:   row.get(4)?,
                payload:      row.get(5)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    // ── Declarations ───────────────────────────────────────────

    pub fn record_declaration(&self, run_id: &str, result: &ConstituencyResult) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO declaration (run_id, constituency, winner, turnout, tally_json)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                run_id,
                result.constituency as i64,
                result.winner as i64,
                result.turnout() as i64,
                serde_json::to_string(&result.tally)?,
            ],
        )?;
        Ok(())
    }

    pub fn declared_count(&self, run_id: &str) -> SimResult<u64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM declaration WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    /// Seats per party rebuilt from the declaration table.
    pub fn seat_totals(&self, run_id: &str, party_count: usize) -> SimResult<Vec<u64>> {
        let mut seats = vec![0u64; party_count];
        let mut stmt = self.conn.prepare(
            "SELECT winner, COUNT(*) FROM declaration WHERE run_id = ?1 GROUP BY winner"
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok((row.get::<_, i64>(0)? as usize, row.get::<_, i64>(1)? as u64))
        })?;
        for row in rows {
            let (winner, count) = row?;
            if let Some(slot) = seats.get_mut(winner) {
                *slot = count;
            }
        }
        Ok(seats)
    }

    pub fn declaration(
        &self,
        run_id: &str,
        constituency: ConstituencyNo,
    ) -> SimResult<Option<ConstituencyResult>> {
        let mut stmt = self.conn.prepare(
            "SELECT winner, tally_json FROM declaration
             WHERE run_id = ?1 AND constituency = ?2"
        )?;
        let row = stmt.query_row(params![run_id, constituency as i64], |row| {
            Ok((row.get::<_, i64>(0)? as usize, row.get::<_, String>(1)?))
        }).optional()?;

        match row {
            None => Ok(None),
            Some((winner, tally_json)) => Ok(Some(ConstituencyResult {
                constituency,
                tally: serde_json::from_str(&tally_json)?,
                winner,
            })),
        }
    }
}
