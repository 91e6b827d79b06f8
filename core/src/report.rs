//! Plain-text rendering of tallies for the runner and debug logs.

use crate::{config::PartyConfig, result::SeatDistribution};

/// `Name:count` pairs, two spaces apart.
pub fn format_tally(parties: &[PartyConfig], counts: &[u64]) -> String {
    parties
        .iter()
        .zip(counts)
        .map(|(p, n)| format!("{}:{}", p.name, n))
        .collect::<Vec<_>>()
        .join("  ")
}

/// `Name: seats` pairs, three spaces apart.
pub fn format_seats(parties: &[PartyConfig], seats: &[u64]) -> String {
    parties
        .iter()
        .zip(seats)
        .map(|(p, n)| format!("{}: {}", p.name, n))
        .collect::<Vec<_>>()
        .join("   ")
}

/// One line per party: mean, range and outright wins across runs.
pub fn format_distribution(parties: &[PartyConfig], dist: &SeatDistribution) -> Vec<String> {
    parties
        .iter()
        .enumerate()
        .take(dist.party_count())
        .map(|(i, p)| {
            format!(
                "{:<20} mean {:>6.2} | min {:>3} | max {:>3} | outright {}/{}",
                p.name,
                dist.mean_seats(i),
                dist.min_seats[i],
                dist.max_seats[i],
                dist.outright_wins[i],
                dist.runs
            )
        })
        .collect()
}
