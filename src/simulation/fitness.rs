//! Fitness records and the fitness formula.
//!
//! Records are folded in every tick from the agents' runtime state. The
//! score is recomputed from the record each tick, so the value at the
//! generation boundary is simply the last one computed.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentId, Lineage};
use super::genome::{Genome, Role};
use super::spatial::{SENTINEL_DISTANCE, WorldView};

/// Performance of one agent over one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitnessRecord {
    /// Agent the record belongs to.
    pub agent_id: AgentId,
    /// Genome of the agent.
    pub genome: Genome,
    /// Origin of the agent's genome.
    pub lineage: Lineage,
    /// Seconds since the generation started (frozen at death).
    pub lifespan: f32,
    /// Energy at the last update.
    pub energy_level: f32,
    /// Prey only: time integral of the distance to the nearest hunter.
    pub prey_distance_score: f32,
    /// Hunters only: time integral of `100 - distance to the nearest prey`.
    pub hunter_distance_score: f32,
    /// Prey captured so far.
    pub successful_hunts: u32,
    /// Escapes so far.
    pub successful_escapes: u32,
    /// Path length moved so far.
    pub distance_traveled: f32,
    /// Nearest-opponent distance samples taken so far (sentinel samples excluded).
    pub opponent_samples: u32,
    /// Mean of the nearest-opponent distance samples.
    pub average_opponent_distance: Option<f32>,
    /// Smallest nearest-opponent distance sample.
    pub min_opponent_distance: Option<f32>,
    /// Score from the last update.
    pub fitness_score: f32,
    /// `false` once the agent died or was captured.
    pub survived: bool,
}

impl FitnessRecord {
    /// Creates an empty record for a newly spawned agent.
    pub fn new(agent: &Agent) -> Self {
        Self {
            agent_id: agent.id,
            genome: agent.genome,
            lineage: agent.lineage,
            lifespan: 0.0,
            energy_level: agent.energy,
            prey_distance_score: 0.0,
            hunter_distance_score: 0.0,
            successful_hunts: 0,
            successful_escapes: 0,
            distance_traveled: 0.0,
            opponent_samples: 0,
            average_opponent_distance: None,
            min_opponent_distance: None,
            fitness_score: 0.0,
            survived: true,
        }
    }

    /// Role of the recorded agent.
    pub fn role(&self) -> Role {
        self.genome.role
    }

    /// Mean speed over the agent's life so far (0 before any time passed).
    pub fn average_speed(&self) -> f32 {
        if self.lifespan > 0.0 {
            self.distance_traveled / self.lifespan
        } else {
            0.0
        }
    }

    /// Folds one nearest-opponent distance into the running mean and minimum.
    ///
    /// Samples at or beyond [`SENTINEL_DISTANCE`] mean "no opponent" and are
    /// ignored.
    pub fn add_opponent_sample(&mut self, distance: f32) {
        if !distance.is_finite() || distance >= SENTINEL_DISTANCE {
            return;
        }
        self.opponent_samples += 1;
        let mean = self.average_opponent_distance.unwrap_or(0.0);
        self.average_opponent_distance =
            Some(mean + (distance - mean) / self.opponent_samples as f32);
        self.min_opponent_distance = Some(self.min_opponent_distance.map_or(distance, |m| m.min(distance)));
    }
}

/// Computes the fitness of a record.
///
/// Pure: calling it twice on the same record and `dt` gives the same value.
///
/// # Arguments
///
/// * `record` - The record to score
/// * `dt` - Elapsed time of the current tick (scales the trait upkeep cost)
///
/// # Returns
///
/// A non-negative fitness score.
pub fn fitness_score(record: &FitnessRecord, dt: f32) -> f32 {
    let genome = &record.genome;
    let size_cost = (genome.size - 0.5) * 0.1;
    let speed_cost = (genome.speed - 1.0) * 0.1;
    let energy_cost = (size_cost + speed_cost) * dt;

    let base = (record.energy_level - energy_cost) * 0.5 + record.lifespan * 10.0;

    let fitness = match record.role() {
        Role::Hunter => {
            base + record.successful_hunts as f32 * 50.0 + record.hunter_distance_score * 0.2
        }
        Role::Prey => {
            base + record.successful_escapes as f32 * 50.0 + record.prey_distance_score * 0.2
        }
    };

    fitness.max(0.0)
}

/// Accumulates fitness records over one generation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FitnessEvaluator {
    records: BTreeMap<AgentId, FitnessRecord>,
    generation_start: f32,
}

impl FitnessEvaluator {
    /// Creates an evaluator for a generation starting at `generation_start`.
    pub fn new(generation_start: f32) -> Self {
        Self {
            records: BTreeMap::new(),
            generation_start,
        }
    }

    /// Starts tracking a newly spawned agent.
    pub fn register(&mut self, agent: &Agent) {
        self.records.insert(agent.id, FitnessRecord::new(agent));
    }

    /// Folds the current state of every live agent into its record.
    ///
    /// # Arguments
    ///
    /// * `agents` - Live agents after this tick's updates
    /// * `world` - Snapshot of the live agents' positions
    /// * `now` - Current simulation time
    /// * `dt` - Elapsed time of the tick
    pub fn update(&mut self, agents: &[Agent], world: &WorldView, now: f32, dt: f32) {
        let nearest: Vec<f32> = agents
            .par_iter()
            .map(|agent| world.nearest_distance_or_sentinel(agent.id, &agent.pos, agent.role().opponent()))
            .collect();

        let lifespan = now - self.generation_start;

        for (agent, nearest) in agents.iter().zip(nearest) {
            let record = self
                .records
                .entry(agent.id)
                .or_insert_with(|| FitnessRecord::new(agent));

            record.energy_level = agent.energy;
            record.lifespan = lifespan;
            record.successful_hunts = agent.successful_hunts;
            record.successful_escapes = agent.successful_escapes;
            record.distance_traveled = agent.distance_traveled;
            match agent.role() {
                Role::Prey => record.prey_distance_score += nearest * dt,
                Role::Hunter => record.hunter_distance_score += (SENTINEL_DISTANCE - nearest) * dt,
            }
            record.add_opponent_sample(nearest);
            record.fitness_score = fitness_score(record, dt);
        }
    }

    /// Freezes the record of an agent that died or was captured.
    pub fn mark_dead(&mut self, agent_id: AgentId) {
        if let Some(record) = self.records.get_mut(&agent_id) {
            record.survived = false;
        }
    }

    /// Record of a single agent.
    pub fn record(&self, agent_id: AgentId) -> Option<&FitnessRecord> {
        self.records.get(&agent_id)
    }

    /// All records of the generation, ordered by agent id.
    pub fn records(&self) -> impl Iterator<Item = &FitnessRecord> {
        self.records.values()
    }

    /// Records of the survivors of `role`, ordered by agent id.
    pub fn survivors(&self, role: Role) -> Vec<FitnessRecord> {
        self.records
            .values()
            .filter(|r| r.survived && r.role() == role)
            .cloned()
            .collect()
    }

    /// Ends the generation: returns every record and starts a new one.
    pub fn finalize(&mut self, next_generation_start: f32) -> Vec<FitnessRecord> {
        self.generation_start = next_generation_start;
        std::mem::take(&mut self.records).into_values().collect()
    }
}
