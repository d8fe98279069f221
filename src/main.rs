//! Headless runner: simulates a number of generations and prints the run summary.

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use predprey::simulation::ecosystem::Ecosystem;
use predprey::simulation::error::Result;
use predprey::simulation::mover::ContactSensor;
use predprey::simulation::params::Params;
use predprey::simulation::recorder::HistoryRecorder;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DT: f32 = 0.02;
const DEFAULT_GENERATIONS: u32 = 20;

/// Usage: `predprey [params.json] [generations]`
fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(report) => {
            println!("{report}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("simulation failed: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<String> {
    let mut args = std::env::args().skip(1);

    let params = match args.next() {
        Some(path) => Params::from_json_file(&path)?,
        None => Params::default(),
    };
    let generations = args
        .next()
        .and_then(|g| g.parse().ok())
        .unwrap_or(DEFAULT_GENERATIONS);

    info!(?params, generations, "starting predator/prey simulation");

    let history = Arc::new(Mutex::new(HistoryRecorder::new()));
    let sensor = ContactSensor::from_params(&params);

    let mut ecosystem = Ecosystem::new(params)?;
    ecosystem.add_sink(Arc::clone(&history));

    while ecosystem.generation() <= generations {
        for (agent_id, food_id) in sensor.contacts(&ecosystem.agents, &ecosystem.food) {
            ecosystem.signal_food_contact(agent_id, food_id);
        }
        ecosystem.tick(DT)?;
    }

    let report = match history.lock() {
        Ok(history) => history.summary_report(),
        Err(_) => String::from("No data available."),
    };
    Ok(report)
}
