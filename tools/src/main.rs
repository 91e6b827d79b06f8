//! fptp-runner: headless simulation runner.
//!
//! Usage:
//!   fptp-runner --seed 12345
//!   fptp-runner --seed 12345 --config data/scotland_2019.json --db run.db
//!   fptp-runner --seed 12345 --runs 500
//!   fptp-runner --seed 12345 --quiet --json

use anyhow::Result;
use fptp_core::{
    config::ElectionConfig,
    engine::{run_batch, SimEngine},
    report,
    store::SimStore,
};
use std::env;

#[derive(serde::Serialize)]
struct RunSummary<'a> {
    run_id: &'a str,
    seed: u64,
    region: &'a str,
    constituencies: u64,
    turnout: u64,
    seats: Vec<PartySeats<'a>>,
}

#[derive(serde::Serialize)]
struct PartySeats<'a> {
    party: &'a str,
    votes: u64,
    seats: u64,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let runs = parse_arg(&args, "--runs", 1u64);
    let quiet = args.iter().any(|a| a == "--quiet");
    let json = args.iter().any(|a| a == "--json");
    let db = find_arg(&args, "--db").unwrap_or(":memory:");
    let config = match find_arg(&args, "--config") {
        Some(path) => ElectionConfig::load(path)?,
        None => ElectionConfig::scotland_2019(),
    };
    config.validate()?;

    if !json {
        println!("FPTP simulator - fptp-runner");
        println!("  region:          {}", config.region);
        println!("  seed:            {seed}");
        println!("  voters:          {}", config.total_voters);
        println!("  constituencies:  {}", config.constituencies);
        println!("  turnout:         {}", config.average_turnout());
        println!("  runs:            {runs}");
        println!();
    }

    if runs > 1 {
        let dist = run_batch(&config, seed, runs)?;
        println!("=== SEAT DISTRIBUTION ({runs} runs) ===");
        for line in report::format_distribution(&config.parties, &dist) {
            println!("  {line}");
        }
        return Ok(());
    }

    let store = SimStore::open(db)?;
    store.migrate()?;

    let started_at = chrono::Utc::now();
    let run_id = format!("run-{seed}-{}", started_at.timestamp());
    store.insert_run(&run_id, seed, env!("CARGO_PKG_VERSION"), started_at.timestamp())?;

    let mut engine = SimEngine::new(run_id.clone(), seed, config, store)?;
    let parties = engine.config.parties.clone();

    let seats = engine.run_with(|result, seats| {
        if quiet || json {
            return;
        }
        println!(
            "Constituency {}: {}",
            result.constituency,
            report::format_tally(&parties, &result.tally)
        );
        println!("  Running score: {}", report::format_seats(&parties, &seats.seats));
    })?;

    if json {
        let summary = RunSummary {
            run_id: &run_id,
            seed,
            region: &engine.config.region,
            constituencies: engine.config.constituencies,
            turnout: engine.config.average_turnout(),
            seats: parties
                .iter()
                .enumerate()
                .map(|(i, p)| PartySeats { party: &p.name, votes: p.votes, seats: seats.seats_for(i) })
                .collect(),
        };
        println!("{}", serde_json::to_string(&summary)?);
        return Ok(());
    }

    println!();
    println!("=== RUN SUMMARY ===");
    println!("  run_id:     {run_id}");
    println!("  declared:   {}", engine.store.declared_count(&run_id)?);
    println!("  elapsed:    {}ms", (chrono::Utc::now() - started_at).num_milliseconds());
    for (party, p) in parties.iter().enumerate() {
        println!("  {:<20} {:>3} seats", p.name, seats.seats_for(party));
    }
    if let Some(leader) = seats.leader() {
        log::info!("largest party: {}", parties[leader].name);
    }
    Ok(())
}

fn find_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    find_arg(args, flag)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
