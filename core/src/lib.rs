//! First-past-the-post Monte Carlo simulator.
//!
//! A regional electorate is synthesised from party vote totals, then
//! carved into constituencies by seeded walks over that electorate.
//! Each constituency is won by its largest tally.

pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod pool;
pub mod report;
pub mod result;
pub mod rng;
pub mod simulator;
pub mod store;
pub mod types;
