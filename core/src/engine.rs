//! The simulation engine: wires config, RNG, voter pool, simulator and store.
//!
//! RUN ORDER (fixed):
//!   1. RunInitialized event (constituency 0)
//!   2. Electorate generation, party by party (constituency 0)
//!   3. Constituencies 1..=N, one declaration each
//!   4. RunCompleted event (constituency 0)
//!
//! RULES:
//!   - All randomness flows through the RngBank.
//!   - The voter pool is owned by a single run and dropped afterwards.
//!   - Every declaration is persisted before the next constituency is drawn.

use crate::{
    config::ElectionConfig,
    error::{SimError, SimResult},
    event::{EventLogEntry, SimEvent},
    pool::VoterPool,
    result::{ConstituencyResult, SeatDistribution, SeatTally},
    rng::RngBank,
    simulator::ElectionSimulator,
    store::SimStore,
    types::{ConstituencyNo, RunId},
};

/// Constituency number used for run-level events.
pub const RUN_LEVEL: ConstituencyNo = 0;

pub struct SimEngine {
    pub run_id:   RunId,
    pub config:   ElectionConfig,
    pub rng_bank: RngBank,
    pub store:    SimStore,
    seed:         u64,
    started:      bool,
}

impl SimEngine {
    /// The run record must already exist in `store`.
    pub fn new(run_id: RunId, seed: u64, config: ElectionConfig, store: SimStore) -> SimResult<Self> {
        config.validate()?;
        Ok(Self {
            rng_bank: RngBank::new(seed),
            run_id,
            config,
            store,
            seed,
            started: false,
        })
    }

    /// Engine over an in-memory store and the small test config.
    pub fn build_test(run_id: RunId, seed: u64) -> SimResult<Self> {
        Self::build_in_memory(run_id, seed, ElectionConfig::default_test())
    }

    pub fn build_in_memory(run_id: RunId, seed: u64, config: ElectionConfig) -> SimResult<Self> {
        let store = SimStore::in_memory()?;
        store.migrate()?;
        store.insert_run(&run_id, seed, "0.1.0-test", 0)?;
        Self::new(run_id, seed, config, store)
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Materialise one voter per counted ballot, in party order.
    pub fn generate_electorate(&self) -> SimResult<VoterPool> {
        let mut pool = VoterPool::new();
        pool.initialize(&self.config.party_counts())?;

        for (party, p) in self.config.parties.iter().enumerate() {
            log::info!("electorate: generated {} {} voters", p.votes, p.name);
            self.record(RUN_LEVEL, SimEvent::ElectorateGenerated {
                party,
                name:   p.name.clone(),
                voters: p.votes,
            })?;
        }
        log::info!(
            "electorate: {} voters across {} parties",
            pool.len(),
            self.config.party_count()
        );
        Ok(pool)
    }

    /// One complete run over every constituency.
    pub fn run(&mut self) -> SimResult<SeatTally> {
        self.run_with(|_, _| {})
    }

    /// As `run`, calling `on_declared` after each constituency is persisted.
    ///
    /// An engine runs at most once. A run that fails partway leaves its
    /// events in the store and the engine spent; build a new one to retry.
    pub fn run_with<F>(&mut self, mut on_declared: F) -> SimResult<SeatTally>
    where
        F: FnMut(&ConstituencyResult, &SeatTally),
    {
        if self.started {
            return Err(SimError::RunAlreadyStarted { run_id: self.run_id.clone() });
        }
        self.started = true;

        self.record(RUN_LEVEL, SimEvent::RunInitialized {
            run_id: self.run_id.clone(),
            seed:   self.seed,
        })?;

        let mut pool = self.generate_electorate()?;
        let mut simulator = ElectionSimulator::new(&self.rng_bank);
        let party_count = self.config.party_count();
        let constituencies = self.config.constituencies;
        let turnout = self.config.average_turnout();

        log::info!("run {}: {constituencies} constituencies, turnout {turnout}", self.run_id);

        let seats = simulator.run_all_with(
            &mut pool,
            party_count,
            constituencies,
            turnout,
            |result, seats| {
                self.store.record_declaration(&self.run_id, result)?;
                self.record(result.constituency, SimEvent::ConstituencyDeclared {
                    constituency: result.constituency,
                    tally:        result.tally.clone(),
                    winner:       result.winner,
                })?;
                on_declared(result, seats);
                Ok(())
            },
        )?;

        self.record(RUN_LEVEL, SimEvent::RunCompleted {
            constituencies,
            seats: seats.seats.clone(),
        })?;

        log::info!(
            "run {} complete: {} voters left unused, seats {:?}",
            self.run_id,
            pool.remaining_count(),
            seats.seats
        );
        Ok(seats)
    }

    /// Events recorded for one constituency, in insertion order.
    pub fn store_events_for_constituency(
        &self,
        constituency: ConstituencyNo,
    ) -> SimResult<Vec<EventLogEntry>> {
        self.store.events_for_constituency(&self.run_id, constituency)
    }

    fn record(&self, constituency: ConstituencyNo, event: SimEvent) -> SimResult<()> {
        let entry = EventLogEntry {
            id:         None,
            run_id:     self.run_id.clone(),
            constituency,
            source:     "engine".to_string(),
            event_type: event.type_name().to_string(),
            payload:    serde_json::to_string(&event)?,
        };
        self.store.append_event(&entry)
    }
}

/// Monte Carlo repetition: `runs` independent runs over fresh pools,
/// each seeded from its own bank derived from `seed`. Nothing is persisted.
pub fn run_batch(config: &ElectionConfig, seed: u64, runs: u64) -> SimResult<SeatDistribution> {
    config.validate()?;

    let master = RngBank::new(seed);
    let counts = config.party_counts();
    let mut dist = SeatDistribution::new(config.party_count());

    for run_index in 0..runs {
        let mut pool = VoterPool::from_counts(&counts)?;
        let mut simulator = ElectionSimulator::new(&master.for_run(run_index));
        let seats = simulator.run_all(
            &mut pool,
            config.party_count(),
            config.constituencies,
            config.average_turnout(),
        )?;
        log::info!("batch run {}/{runs}: seats {:?}", run_index + 1, seats.seats);
        dist.record(&seats);
    }
    Ok(dist)
}
