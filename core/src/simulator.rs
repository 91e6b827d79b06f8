//! Constituency sampling loop.
//!
//! Each constituency is one seed draw (uniform over the whole pool,
//! redrawn until an unused voter turns up) followed by `turnout - 1`
//! walk draws from the cursor, each in a freshly rolled direction.
//! Consecutive walk draws stay close to the seed, which is what gives
//! a constituency its local flavour.

use crate::{
    error::{SimError, SimResult},
    pool::VoterPool,
    result::{decide_winner, ConstituencyResult, SeatTally},
    rng::{RngBank, StreamRng, StreamSlot},
    types::{ConstituencyNo, PartyIndex},
};

pub struct ElectionSimulator {
    seed_rng:      StreamRng,
    direction_rng: StreamRng,
}

impl ElectionSimulator {
    pub fn new(rng_bank: &RngBank) -> Self {
        Self {
            seed_rng:      rng_bank.for_stream(StreamSlot::Seed),
            direction_rng: rng_bank.for_stream(StreamSlot::Direction),
        }
    }

    /// Draw one constituency's ballots from the pool.
    pub fn run_constituency(
        &mut self,
        pool: &mut VoterPool,
        constituency: ConstituencyNo,
        party_count: usize,
        turnout: u64,
    ) -> SimResult<ConstituencyResult> {
        if turnout == 0 {
            return Err(SimError::InvalidConfig {
                reason: "turnout target must be positive".into(),
            });
        }
        let remaining = pool.remaining_count() as u64;
        if turnout > remaining {
            return Err(SimError::PoolExhausted { requested: turnout, remaining });
        }

        let mut tally = vec![0u64; party_count];

        let seed_party = self.seed_draw(pool)?;
        count_vote(&mut tally, seed_party)?;

        for _ in 1..turnout {
            let direction = self.direction_rng.next_direction();
            let party = pool.sample_relative(direction)?;
            count_vote(&mut tally, party)?;
        }

        let winner = decide_winner(&tally).ok_or_else(|| SimError::InvalidConfig {
            reason: "no parties to declare a winner from".into(),
        })?;

        Ok(ConstituencyResult { constituency, tally, winner })
    }

    /// Run every constituency in order 1..=constituencies.
    pub fn run_all(
        &mut self,
        pool: &mut VoterPool,
        party_count: usize,
        constituencies: u64,
        turnout: u64,
    ) -> SimResult<SeatTally> {
        self.run_all_with(pool, party_count, constituencies, turnout, |_, _| Ok(()))
    }

    /// As `run_all`, calling `on_declared` after each constituency with its
    /// result and the running seat tally.
    pub fn run_all_with<F>(
        &mut self,
        pool: &mut VoterPool,
        party_count: usize,
        constituencies: u64,
        turnout: u64,
        mut on_declared: F,
    ) -> SimResult<SeatTally>
    where
        F: FnMut(&ConstituencyResult, &SeatTally) -> SimResult<()>,
    {
        let requested = turnout.saturating_mul(constituencies);
        let remaining = pool.remaining_count() as u64;
        if requested > remaining {
            return Err(SimError::PoolExhausted { requested, remaining });
        }

        let mut seats = SeatTally::new(party_count);
        for constituency in 1..=constituencies {
            let result = self.run_constituency(pool, constituency, party_count, turnout)?;
            seats.award(result.winner);

            log::debug!(
                "constituency={constituency} tally={:?} winner={} seats={:?}",
                result.tally,
                result.winner,
                seats.seats
            );
            on_declared(&result, &seats)?;
        }
        Ok(seats)
    }

    fn seed_draw(&mut self, pool: &mut VoterPool) -> SimResult<PartyIndex> {
        if pool.remaining_count() == 0 {
            return Err(SimError::PoolExhausted { requested: 1, remaining: 0 });
        }

        let mut attempts = 0u64;
        loop {
            attempts += 1;
            let index = self.seed_rng.next_index(pool.len());
            if let Some(party) = pool.sample_at(index)? {
                log::trace!("seed draw hit index {index} after {attempts} attempts");
                return Ok(party);
            }
        }
    }
}

fn count_vote(tally: &mut [u64], party: PartyIndex) -> SimResult<()> {
    let size = tally.len();
    let slot = tally.get_mut(party).ok_or_else(|| SimError::InvalidConfig {
        reason: format!("voter belongs to party {party} but only {size} parties are tallied"),
    })?;
    *slot += 1;
    Ok(())
}
