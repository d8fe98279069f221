//! Generation reports and run history.
//!
//! The ecosystem hands a [`GenerationReport`] to every registered
//! [`GenerationSink`] at each generation boundary. [`HistoryRecorder`] is the
//! bundled sink: it keeps the per-generation summaries and derives run-level
//! statistics from them.

use std::fmt;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::fitness::FitnessRecord;
use super::genome::Role;

/// Everything recorded about one finished generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Number of the finished generation, starting at 1.
    pub generation: u32,
    /// Simulation time at the boundary.
    pub simulation_time: f32,
    /// Wall-clock time the report was produced.
    pub recorded_at: DateTime<Utc>,
    /// Final fitness records of every agent of the generation, dead ones included.
    pub records: Vec<FitnessRecord>,
    /// Aggregates over `records`.
    pub summary: GenerationSummary,
}

impl GenerationReport {
    /// Builds a report and its summary from the finalized records.
    pub fn new(generation: u32, simulation_time: f32, records: Vec<FitnessRecord>) -> Self {
        let summary = GenerationSummary::from_records(generation, &records);
        Self {
            generation,
            simulation_time,
            recorded_at: Utc::now(),
            records,
            summary,
        }
    }

    /// Highest fitness among the records of `role`.
    pub fn best_fitness(&self, role: Role) -> Option<f32> {
        self.records
            .iter()
            .filter(|r| r.role() == role)
            .map(|r| r.fitness_score)
            .reduce(f32::max)
    }
}

/// Aggregated statistics of one generation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Number of the generation.
    pub generation: u32,
    /// Hunters that lived during the generation.
    pub hunter_count: usize,
    /// Prey that lived during the generation.
    pub prey_count: usize,
    /// Average fitness over all agents.
    pub average_fitness: f32,
    /// Highest fitness over all agents.
    pub max_fitness: f32,
    /// Lowest fitness over all agents.
    pub min_fitness: f32,
    /// Average hunter fitness.
    pub average_hunter_fitness: f32,
    /// Average prey fitness.
    pub average_prey_fitness: f32,
    /// Average hunter size.
    pub average_hunter_size: f32,
    /// Average hunter speed.
    pub average_hunter_speed: f32,
    /// Average hunter stealth.
    pub average_hunter_stealth: f32,
    /// Average prey size.
    pub average_prey_size: f32,
    /// Average prey speed.
    pub average_prey_speed: f32,
    /// Average prey camouflage.
    pub average_prey_camouflage: f32,
    /// Captures over all hunters.
    pub total_hunts: u32,
    /// Escapes over all prey.
    pub total_escapes: u32,
    /// Average final hunter energy.
    pub average_hunter_energy: f32,
    /// Average final prey energy.
    pub average_prey_energy: f32,
    /// Average hunter lifespan.
    pub average_hunter_lifespan: f32,
    /// Average prey lifespan.
    pub average_prey_lifespan: f32,
    /// Average path length moved by hunters.
    pub average_hunter_distance_traveled: f32,
    /// Average path length moved by prey.
    pub average_prey_distance_traveled: f32,
    /// Average nearest-prey distance of hunters that saw any prey.
    pub average_hunter_opponent_distance: f32,
    /// Average nearest-hunter distance of prey that saw any hunter.
    pub average_prey_opponent_distance: f32,
}

fn mean(values: impl Iterator<Item = f32>) -> f32 {
    let (sum, n) = values.fold((0.0_f32, 0_usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 { 0.0 } else { sum / n as f32 }
}

impl GenerationSummary {
    /// Aggregates a generation's records. Empty groups average to 0.
    pub fn from_records(generation: u32, records: &[FitnessRecord]) -> Self {
        let hunters = || records.iter().filter(|r| r.role() == Role::Hunter);
        let prey = || records.iter().filter(|r| r.role() == Role::Prey);

        let max_fitness = records.iter().map(|r| r.fitness_score).reduce(f32::max);
        let min_fitness = records.iter().map(|r| r.fitness_score).reduce(f32::min);

        Self {
            generation,
            hunter_count: hunters().count(),
            prey_count: prey().count(),
            average_fitness: mean(records.iter().map(|r| r.fitness_score)),
            max_fitness: max_fitness.unwrap_or(0.0),
            min_fitness: min_fitness.unwrap_or(0.0),
            average_hunter_fitness: mean(hunters().map(|r| r.fitness_score)),
            average_prey_fitness: mean(prey().map(|r| r.fitness_score)),
            average_hunter_size: mean(hunters().map(|r| r.genome.size)),
            average_hunter_speed: mean(hunters().map(|r| r.genome.speed)),
            average_hunter_stealth: mean(hunters().map(|r| r.genome.stealth)),
            average_prey_size: mean(prey().map(|r| r.genome.size)),
            average_prey_speed: mean(prey().map(|r| r.genome.speed)),
            average_prey_camouflage: mean(prey().map(|r| r.genome.camouflage)),
            total_hunts: hunters().map(|r| r.successful_hunts).sum(),
            total_escapes: prey().map(|r| r.successful_escapes).sum(),
            average_hunter_energy: mean(hunters().map(|r| r.energy_level)),
            average_prey_energy: mean(prey().map(|r| r.energy_level)),
            average_hunter_lifespan: mean(hunters().map(|r| r.lifespan)),
            average_prey_lifespan: mean(prey().map(|r| r.lifespan)),
            average_hunter_distance_traveled: mean(hunters().map(|r| r.distance_traveled)),
            average_prey_distance_traveled: mean(prey().map(|r| r.distance_traveled)),
            average_hunter_opponent_distance: mean(hunters().filter_map(|r| r.average_opponent_distance)),
            average_prey_opponent_distance: mean(prey().filter_map(|r| r.average_opponent_distance)),
        }
    }

    /// Captures per hunter (0 without hunters).
    pub fn hunt_rate(&self) -> f32 {
        if self.hunter_count == 0 {
            0.0
        } else {
            self.total_hunts as f32 / self.hunter_count as f32
        }
    }

    /// Escapes per prey (0 without prey).
    pub fn escape_rate(&self) -> f32 {
        if self.prey_count == 0 {
            0.0
        } else {
            self.total_escapes as f32 / self.prey_count as f32
        }
    }

    /// Average fitness per unit of average energy for `role`.
    pub fn energy_efficiency(&self, role: Role) -> f32 {
        let (fitness, energy) = match role {
            Role::Hunter => (self.average_hunter_fitness, self.average_hunter_energy),
            Role::Prey => (self.average_prey_fitness, self.average_prey_energy),
        };
        fitness / if energy > 0.0 { energy } else { 1.0 }
    }
}

/// Receives a report at every generation boundary.
pub trait GenerationSink {
    /// Called once per finished generation.
    fn record_generation(&mut self, report: &GenerationReport);
}

impl<S: GenerationSink> GenerationSink for Arc<Mutex<S>> {
    fn record_generation(&mut self, report: &GenerationReport) {
        match self.lock() {
            Ok(mut sink) => sink.record_generation(report),
            Err(_) => warn!(generation = report.generation, "generation sink lock poisoned"),
        }
    }
}

/// Linear trends of each role's average genes across generations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneTrends {
    /// Hunter size per generation.
    pub hunter_size: f32,
    /// Hunter speed per generation.
    pub hunter_speed: f32,
    /// Hunter stealth per generation.
    pub hunter_stealth: f32,
    /// Prey size per generation.
    pub prey_size: f32,
    /// Prey speed per generation.
    pub prey_speed: f32,
    /// Prey camouflage per generation.
    pub prey_camouflage: f32,
}

/// Run-level statistics derived from the generation history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Average-fitness change per generation (needs two generations).
    pub evolution_rate: Option<f32>,
    /// Mean absolute change of the hunter count (needs more than five generations).
    pub hunter_stability: Option<f32>,
    /// Mean absolute change of the prey count (needs more than five generations).
    pub prey_stability: Option<f32>,
    /// Hunt rate averaged over all generations.
    pub average_hunt_rate: f32,
    /// Escape rate averaged over all generations.
    pub average_escape_rate: f32,
    /// Hunt rate of the last generation.
    pub final_hunt_rate: f32,
    /// Escape rate of the last generation.
    pub final_escape_rate: f32,
    /// Regression slopes of the average genes.
    pub gene_trends: GeneTrends,
    /// Hunter fitness per energy in the last generation.
    pub final_hunter_energy_efficiency: f32,
    /// Prey fitness per energy in the last generation.
    pub final_prey_energy_efficiency: f32,
}

/// Mean absolute difference between consecutive values (lower is more stable).
pub fn stability(values: &[f32]) -> f32 {
    if values.len() <= 1 {
        return 0.0;
    }
    let sum: f32 = values.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
    sum / (values.len() - 1) as f32
}

/// Least-squares slope of `values` against their index.
pub fn trend(values: &[f32]) -> f32 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2) = (0.0_f32, 0.0_f32, 0.0_f32, 0.0_f32);
    for (i, &y) in values.iter().enumerate() {
        let x = i as f32;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
    }
    let n = n as f32;
    (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x)
}

/// Sink that keeps every generation summary of a run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryRecorder {
    summaries: Vec<GenerationSummary>,
}

impl HistoryRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Summaries in generation order.
    pub fn summaries(&self) -> &[GenerationSummary] {
        &self.summaries
    }

    fn series(&self, f: impl Fn(&GenerationSummary) -> f32) -> Vec<f32> {
        self.summaries.iter().map(f).collect()
    }

    /// Derives the run statistics. `None` before the first generation ends.
    pub fn statistics(&self) -> Option<RunStatistics> {
        let first = self.summaries.first()?;
        let last = self.summaries.last()?;
        let n = self.summaries.len();

        let evolution_rate =
            (n > 1).then(|| (last.average_fitness - first.average_fitness) / (n - 1) as f32);

        let (hunter_stability, prey_stability) = if n > 5 {
            (
                Some(stability(&self.series(|s| s.hunter_count as f32))),
                Some(stability(&self.series(|s| s.prey_count as f32))),
            )
        } else {
            (None, None)
        };

        let hunt_rates = self.series(GenerationSummary::hunt_rate);
        let escape_rates = self.series(GenerationSummary::escape_rate);

        Some(RunStatistics {
            evolution_rate,
            hunter_stability,
            prey_stability,
            average_hunt_rate: hunt_rates.iter().sum::<f32>() / n as f32,
            average_escape_rate: escape_rates.iter().sum::<f32>() / n as f32,
            final_hunt_rate: last.hunt_rate(),
            final_escape_rate: last.escape_rate(),
            gene_trends: GeneTrends {
                hunter_size: trend(&self.series(|s| s.average_hunter_size)),
                hunter_speed: trend(&self.series(|s| s.average_hunter_speed)),
                hunter_stealth: trend(&self.series(|s| s.average_hunter_stealth)),
                prey_size: trend(&self.series(|s| s.average_prey_size)),
                prey_speed: trend(&self.series(|s| s.average_prey_speed)),
                prey_camouflage: trend(&self.series(|s| s.average_prey_camouflage)),
            },
            final_hunter_energy_efficiency: last.energy_efficiency(Role::Hunter),
            final_prey_energy_efficiency: last.energy_efficiency(Role::Prey),
        })
    }

    /// Plain-text summary of the run, or "No data available." before the
    /// first generation ends.
    pub fn summary_report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HistoryRecorder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (Some(first), Some(last), Some(stats)) =
            (self.summaries.first(), self.summaries.last(), self.statistics())
        else {
            return f.write_str("No data available.");
        };

        writeln!(f, "=== Simulation Summary ===")?;
        writeln!(f, "Total Generations: {}", self.summaries.len())?;
        for (label, s) in [("Initial", first), ("Final", last)] {
            writeln!(
                f,
                "{label} Population: {} ({} hunters, {} prey)",
                s.hunter_count + s.prey_count,
                s.hunter_count,
                s.prey_count
            )?;
        }

        writeln!(f, "\n=== Fitness Evolution ===")?;
        writeln!(f, "Initial Average Fitness: {:.2}", first.average_fitness)?;
        writeln!(f, "Final Average Fitness: {:.2}", last.average_fitness)?;
        if let Some(rate) = stats.evolution_rate {
            writeln!(f, "Evolution Rate: {rate:.2} fitness/generation")?;
        }

        let trends = &stats.gene_trends;
        writeln!(f, "\n=== Hunter Evolution ===")?;
        write_gene(f, "Size", first.average_hunter_size, last.average_hunter_size, trends.hunter_size)?;
        write_gene(f, "Speed", first.average_hunter_speed, last.average_hunter_speed, trends.hunter_speed)?;
        write_gene(f, "Stealth", first.average_hunter_stealth, last.average_hunter_stealth, trends.hunter_stealth)?;
        writeln!(
            f,
            "Hunt Success Rate: {:.2} -> {:.2}",
            stats.average_hunt_rate, stats.final_hunt_rate
        )?;
        writeln!(f, "Distance Traveled: {:.2}", last.average_hunter_distance_traveled)?;
        writeln!(f, "Distance To Prey: {:.2}", last.average_hunter_opponent_distance)?;

        writeln!(f, "\n=== Prey Evolution ===")?;
        write_gene(f, "Size", first.average_prey_size, last.average_prey_size, trends.prey_size)?;
        write_gene(f, "Speed", first.average_prey_speed, last.average_prey_speed, trends.prey_speed)?;
        write_gene(f, "Camouflage", first.average_prey_camouflage, last.average_prey_camouflage, trends.prey_camouflage)?;
        writeln!(
            f,
            "Escape Success Rate: {:.2} -> {:.2}",
            stats.average_escape_rate, stats.final_escape_rate
        )?;
        writeln!(f, "Distance Traveled: {:.2}", last.average_prey_distance_traveled)?;
        writeln!(f, "Distance To Hunters: {:.2}", last.average_prey_opponent_distance)?;

        writeln!(f, "\n=== Energy Efficiency ===")?;
        writeln!(f, "Hunter Energy Efficiency: {:.2}", stats.final_hunter_energy_efficiency)?;
        writeln!(f, "Prey Energy Efficiency: {:.2}", stats.final_prey_energy_efficiency)?;

        if let (Some(hunters), Some(prey)) = (stats.hunter_stability, stats.prey_stability) {
            writeln!(f, "\n=== Population Stability ===")?;
            writeln!(f, "Hunter Population Stability: {hunters:.2}")?;
            writeln!(f, "Prey Population Stability: {prey:.2}")?;
        }

        Ok(())
    }
}

fn write_gene(f: &mut fmt::Formatter<'_>, name: &str, first: f32, last: f32, trend: f32) -> fmt::Result {
    writeln!(f, "{name}: {first:.2} -> {last:.2} (Trend: {trend:.3})")
}

impl GenerationSink for HistoryRecorder {
    fn record_generation(&mut self, report: &GenerationReport) {
        self.summaries.push(report.summary.clone());
    }
}
