//! Per-constituency tallies and cross-constituency seat counts.

use crate::types::{ConstituencyNo, PartyIndex};
use serde::{Deserialize, Serialize};

/// Ballots counted in one constituency, indexed by party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstituencyResult {
    pub constituency: ConstituencyNo,
    pub tally:        Vec<u64>,
    pub winner:       PartyIndex,
}

impl ConstituencyResult {
    pub fn turnout(&self) -> u64 {
        self.tally.iter().sum()
    }
}

/// First-past-the-post: the lowest party index whose count is at least
/// every other count. `None` only for an empty tally.
pub fn decide_winner(tally: &[u64]) -> Option<PartyIndex> {
    let max = tally.iter().max()?;
    tally.iter().position(|votes| votes == max)
}

/// Constituencies won per party over a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTally {
    pub seats: Vec<u64>,
}

impl SeatTally {
    pub fn new(party_count: usize) -> Self {
        Self { seats: vec![0; party_count] }
    }

    pub fn award(&mut self, party: PartyIndex) {
        self.seats[party] += 1;
    }

    pub fn seats_for(&self, party: PartyIndex) -> u64 {
        self.seats.get(party).copied().unwrap_or(0)
    }

    /// Sum of all seats; equals the number of constituencies declared.
    pub fn total(&self) -> u64 {
        self.seats.iter().sum()
    }

    /// Party with the most seats, lowest index on ties.
    pub fn leader(&self) -> Option<PartyIndex> {
        decide_winner(&self.seats)
    }
}

/// Seat outcomes aggregated over many independent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeatDistribution {
    pub runs:      u64,
    pub min_seats: Vec<u64>,
    pub max_seats: Vec<u64>,
    sum_seats:     Vec<u64>,
    /// Runs in which the party held strictly more seats than any other.
    pub outright_wins: Vec<u64>,
}

impl SeatDistribution {
    pub fn new(party_count: usize) -> Self {
        Self {
            runs:          0,
            min_seats:     vec![u64::MAX; party_count],
            max_seats:     vec![0; party_count],
            sum_seats:     vec![0; party_count],
            outright_wins: vec![0; party_count],
        }
    }

    pub fn record(&mut self, tally: &SeatTally) {
        self.runs += 1;
        for (party, &seats) in tally.seats.iter().enumerate() {
            self.min_seats[party] = self.min_seats[party].min(seats);
            self.max_seats[party] = self.max_seats[party].max(seats);
            self.sum_seats[party] += seats;
        }
        if let Some(leader) = tally.leader() {
            let top = tally.seats[leader];
            if tally.seats.iter().filter(|&&s| s == top).count() == 1 {
                self.outright_wins[leader] += 1;
            }
        }
    }

    pub fn mean_seats(&self, party: PartyIndex) -> f64 {
        if self.runs == 0 {
            return 0.0;
        }
        self.sum_seats[party] as f64 / self.runs as f64
    }

    pub fn party_count(&self) -> usize {
        self.sum_seats.len()
    }
}
