//! The sampling electorate.
//!
//! One `Voter` per counted ballot, laid out party by party in a single
//! contiguous vector. The ordering is the only notion of "neighbourhood"
//! in the model: a constituency is built by seeding at a uniformly random
//! voter and then walking outward from the cursor, one unused voter at a
//! time, wrapping circularly at both ends.
//!
//! RULES:
//!   - Voters are never removed. Consumption flips `used`.
//!   - The unused count only ever decreases within a run.
//!   - The cursor is unset until the first `sample_at`.

use crate::{
    error::{SimError, SimResult},
    types::PartyIndex,
};

/// One ballot in the regional electorate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Voter {
    pub party: PartyIndex,
    pub used:  bool,
}

impl Voter {
    pub fn new(party: PartyIndex) -> Self {
        Self { party, used: false }
    }
}

#[derive(Debug, Default)]
pub struct VoterPool {
    voters:      Vec<Voter>,
    cursor:      Option<usize>,
    remaining:   usize,
    initialized: bool,
}

impl VoterPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and initialize in one step.
    pub fn from_counts(counts: &[(PartyIndex, u64)]) -> SimResult<Self> {
        let mut pool = Self::new();
        pool.initialize(counts)?;
        Ok(pool)
    }

    /// Append `count` unused voters for each `(party, count)` entry, in order.
    /// May only be called once per pool.
    pub fn initialize(&mut self, counts: &[(PartyIndex, u64)]) -> SimResult<()> {
        if self.initialized {
            return Err(SimError::AlreadyInitialized);
        }

        let total = counts
            .iter()
            .try_fold(0u64, |acc, &(_, c)| acc.checked_add(c))
            .and_then(|t| usize::try_from(t).ok())
            .ok_or_else(|| SimError::InvalidConfig {
                reason: "voter counts overflow the addressable pool size".into(),
            })?;

        self.initialized = true;
        self.voters.reserve_exact(total);
        for &(party, count) in counts {
            self.voters
                .extend(std::iter::repeat(Voter::new(party)).take(count as usize));
        }
        self.remaining = self.voters.len();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.voters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voters.is_empty()
    }

    /// Voters not yet consumed by any sample.
    pub fn remaining_count(&self) -> usize {
        self.remaining
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn voter(&self, index: usize) -> Option<&Voter> {
        self.voters.get(index)
    }

    /// Seed draw: move the cursor to `index` and consume that voter if it
    /// is still unused. `Ok(None)` means the voter was already used; the
    /// cursor still moves. Callers redraw until they get `Some`.
    pub fn sample_at(&mut self, index: usize) -> SimResult<Option<PartyIndex>> {
        if self.voters.is_empty() {
            return Err(SimError::EmptyPool);
        }
        if index >= self.voters.len() {
            return Err(SimError::IndexOutOfRange { index, size: self.voters.len() });
        }

        self.cursor = Some(index);
        Ok(self.consume(index))
    }

    /// Walk draw: step the cursor one place (forward if `direction > 0`,
    /// otherwise backward), wrapping at the ends, and keep stepping the same
    /// way until an unused voter is found. That voter is consumed and the
    /// cursor stays on it.
    ///
    /// Fails with `PoolExhausted` instead of spinning when nothing is left.
    pub fn sample_relative(&mut self, direction: i32) -> SimResult<PartyIndex> {
        let mut pos = self.cursor.ok_or(SimError::CursorNotSet)?;
        if self.remaining == 0 {
            return Err(SimError::PoolExhausted { requested: 1, remaining: 0 });
        }

        // remaining > 0 guarantees a hit within one full lap.
        loop {
            pos = if direction > 0 { self.next_pos(pos) } else { self.prev_pos(pos) };
            if let Some(party) = self.consume(pos) {
                self.cursor = Some(pos);
                return Ok(party);
            }
        }
    }

    fn next_pos(&self, pos: usize) -> usize {
        (pos + 1) % self.voters.len()
    }

    fn prev_pos(&self, pos: usize) -> usize {
        (pos + self.voters.len() - 1) % self.voters.len()
    }

    fn consume(&mut self, index: usize) -> Option<PartyIndex> {
        let voter = &mut self.voters[index];
        if voter.used {
            return None;
        }
        voter.used = true;
        self.remaining -= 1;
        Some(voter.party)
    }
}
