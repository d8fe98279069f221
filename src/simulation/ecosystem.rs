//! Main ecosystem simulation with parallel agent updates.
//!
//! The ecosystem owns the population, the food and the generation loop.
//! Each tick runs in phases:
//!
//! 1. externally signaled events (food contacts) are applied,
//! 2. dead agents are removed,
//! 3. every agent decides in parallel against one [`WorldView`] snapshot,
//! 4. captures are applied as a single batch and the mover runs,
//! 5. fitness records are updated and the generation countdown advances.
//!
//! At a generation boundary the finished generation is reported to every
//! registered sink and replaced by the offspring of its survivors.

use std::fmt;
use std::path::Path;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::agent::{Agent, AgentId, Lineage};
use super::behavior::{self, BehaviorState, Intent};
use super::error::{Result, SimulationError};
use super::events::{self, EventQueue, SimulationEvent};
use super::fitness::{FitnessEvaluator, FitnessRecord};
use super::food::{Food, FoodId};
use super::genome::{Gene, Genome, Role};
use super::geometric_utils;
use super::mover::{DirectMover, Mover};
use super::params::Params;
use super::recorder::{GenerationReport, GenerationSink};
use super::reproduction::{Offspring, ReproductionEngine};
use super::scheduler::{GenerationScheduler, SchedulerState};
use super::spatial::WorldView;

/// Display data of one live agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent identifier.
    pub id: AgentId,
    /// Hunter or prey.
    pub role: Role,
    /// Traits of the agent.
    pub genome: Genome,
    /// Current energy.
    pub energy: f32,
    /// Current position.
    pub position: [f32; 2],
    /// Latest fitness score.
    pub fitness: f32,
    /// State chosen in the last tick.
    pub state: BehaviorState,
    /// Movement request of the last tick.
    pub intent: Intent,
    /// Origin of the genome.
    pub lineage: Lineage,
}

fn default_mover() -> Box<dyn Mover + Send> {
    Box::new(DirectMover)
}

/// The main ecosystem containing all simulation state.
#[derive(Serialize, Deserialize)]
pub struct Ecosystem {
    /// Live agents in spawn order.
    pub agents: Vec<Agent>,
    /// Food items of the current generation (eaten ones included).
    pub food: Vec<Food>,
    /// Total simulation time elapsed.
    pub time: f32,
    params: Params,
    next_agent_id: AgentId,
    next_food_id: FoodId,
    rng: Pcg64,
    scheduler: GenerationScheduler,
    evaluator: FitnessEvaluator,
    pending: EventQueue,
    last_report: Option<GenerationReport>,
    #[serde(skip, default = "default_mover")]
    mover: Box<dyn Mover + Send>,
    #[serde(skip)]
    sinks: Vec<Box<dyn GenerationSink + Send>>,
}

impl fmt::Debug for Ecosystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ecosystem")
            .field("generation", &self.scheduler.generation())
            .field("time", &self.time)
            .field("agents", &self.agents.len())
            .field("food", &self.food.len())
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Ecosystem {
    /// Creates a new ecosystem with a random first generation and food.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidParameter`] if `params` fail validation.
    pub fn new(params: Params) -> Result<Self> {
        params.validate()?;

        let mut ecosystem = Self {
            agents: Vec::with_capacity(params.initial_agents),
            food: Vec::with_capacity(params.initial_food),
            time: 0.0,
            next_agent_id: 0,
            next_food_id: 0,
            rng: Pcg64::seed_from_u64(params.seed),
            scheduler: GenerationScheduler::new(params.generation_time),
            evaluator: FitnessEvaluator::new(0.0),
            pending: EventQueue::new(),
            last_report: None,
            mover: default_mover(),
            sinks: Vec::new(),
            params,
        };

        for role in Role::ALL {
            let count = ecosystem.target(role);
            for _ in 0..count {
                let genome = Genome::random(role, &mut ecosystem.rng);
                ecosystem.spawn_agent(Offspring {
                    genome,
                    lineage: Lineage::Random,
                });
            }
        }
        ecosystem.spawn_food();

        info!(
            hunters = ecosystem.count(Role::Hunter),
            prey = ecosystem.count(Role::Prey),
            food = ecosystem.food.len(),
            seed = ecosystem.params.seed,
            "ecosystem created"
        );

        Ok(ecosystem)
    }

    /// Creates an ecosystem from the six run-level settings.
    ///
    /// Every other parameter keeps its default value.
    pub fn configure_simulation(
        initial_agents: usize,
        initial_food: usize,
        generation_time: f32,
        mutation_rate: f32,
        mutation_strength: f32,
        elite_percentage: f32,
    ) -> Result<Self> {
        Self::new(Params::configure(
            initial_agents,
            initial_food,
            generation_time,
            mutation_rate,
            mutation_strength,
            elite_percentage,
        )?)
    }

    /// Advances the simulation by one timestep.
    ///
    /// # Arguments
    ///
    /// * `dt` - Elapsed time in seconds (finite, not negative)
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::InvalidTimestep`] for a bad `dt` and
    /// [`SimulationError::Spatial`] if the spatial index cannot be built.
    pub fn tick(&mut self, dt: f32) -> Result<()> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(SimulationError::InvalidTimestep(dt));
        }

        if !self.pending.is_empty() {
            let signals = std::mem::take(&mut self.pending);
            events::apply_events(&mut self.agents, &mut self.food, &self.params, signals);
        }
        self.cull_dead();

        let world = WorldView::new(
            self.agents.iter().map(Agent::view).collect(),
            self.food.clone(),
        )?;

        // parallel phase, agents only write their own state
        let params = &self.params;
        let decisions: Vec<Vec<SimulationEvent>> = self
            .agents
            .par_iter_mut()
            .map(|agent| behavior::step(agent, &world, params, dt))
            .collect();

        let mut queue = EventQueue::new();
        queue.extend(decisions.into_iter().flatten());
        let applied = events::apply_events(&mut self.agents, &mut self.food, params, queue);
        if !applied.captured.is_empty() {
            debug!(captured = ?applied.captured, "captures applied");
        }

        let mover = &self.mover;
        for agent in self.agents.iter_mut().filter(|a| a.is_alive()) {
            let before = agent.pos.clone();
            mover.apply(agent, params, dt);
            agent.distance_traveled += geometric_utils::distance(&before, &agent.pos);
        }

        self.time += dt;
        self.cull_dead();

        let world = WorldView::new(self.agents.iter().map(Agent::view).collect(), Vec::new())?;
        self.evaluator.update(&self.agents, &world, self.time, dt);

        if self.scheduler.advance(dt) {
            self.transition();
        }

        Ok(())
    }

    /// Queues a food contact reported by the external mover.
    ///
    /// Signals are applied at the start of the next tick. The first signal
    /// for a food item eats it; later ones are ignored.
    pub fn signal_food_contact(&mut self, agent_id: AgentId, food_id: FoodId) {
        self.pending
            .push(SimulationEvent::FoodConsumed { agent_id, food_id });
    }

    /// Registers a sink that receives every generation report.
    pub fn add_sink<S: GenerationSink + Send + 'static>(&mut self, sink: S) {
        self.sinks.push(Box::new(sink));
    }

    /// Replaces the movement adapter.
    pub fn set_mover<M: Mover + Send + 'static>(&mut self, mover: M) {
        self.mover = Box::new(mover);
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.scheduler.generation()
    }

    /// Current scheduler state.
    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Seconds left in the current generation.
    pub fn remaining_time(&self) -> f32 {
        self.scheduler.remaining()
    }

    /// Simulation parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Report of the last finished generation.
    pub fn last_report(&self) -> Option<&GenerationReport> {
        self.last_report.as_ref()
    }

    /// Fitness records of the current generation, ordered by agent id.
    pub fn records(&self) -> impl Iterator<Item = &FitnessRecord> {
        self.evaluator.records()
    }

    /// Number of live agents of `role`.
    pub fn count(&self, role: Role) -> usize {
        self.agents.iter().filter(|a| a.role() == role).count()
    }

    /// Read-only view of the live population for display.
    pub fn snapshot(&self) -> Vec<AgentSnapshot> {
        self.agents
            .iter()
            .map(|agent| AgentSnapshot {
                id: agent.id,
                role: agent.role(),
                genome: agent.genome,
                energy: agent.energy,
                position: [agent.pos[0], agent.pos[1]],
                fitness: self
                    .evaluator
                    .record(agent.id)
                    .map_or(0.0, |r| r.fitness_score),
                state: agent.state,
                intent: agent.intent.clone(),
                lineage: agent.lineage,
            })
            .collect()
    }

    /// Mean value of `gene` over the live agents of `role` (0 if there are none).
    pub fn average_gene(&self, role: Role, gene: Gene) -> f32 {
        let values: Vec<f32> = self
            .agents
            .iter()
            .filter(|a| a.role() == role)
            .map(|a| a.genome.gene(gene))
            .collect();
        if values.is_empty() {
            0.0
        } else {
            values.iter().sum::<f32>() / values.len() as f32
        }
    }

    /// Saves the ecosystem state to a JSON file.
    ///
    /// Sinks and the mover are not saved.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads an ecosystem state from a JSON file.
    ///
    /// The loaded ecosystem uses [`DirectMover`] and has no sinks.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let ecosystem: Self = serde_json::from_str(&json)?;
        ecosystem.params.validate()?;
        Ok(ecosystem)
    }

    fn target(&self, role: Role) -> usize {
        match role {
            Role::Hunter => self.params.hunter_target(),
            Role::Prey => self.params.prey_target(),
        }
    }

    /// Replaces the population with the offspring of the survivors.
    fn transition(&mut self) {
        let generation = self.scheduler.generation();
        let hunter_pool = self.evaluator.survivors(Role::Hunter);
        let prey_pool = self.evaluator.survivors(Role::Prey);

        let report = GenerationReport::new(generation, self.time, self.evaluator.finalize(self.time));
        info!(
            generation,
            hunters = report.summary.hunter_count,
            prey = report.summary.prey_count,
            surviving_hunters = hunter_pool.len(),
            surviving_prey = prey_pool.len(),
            average_fitness = report.summary.average_fitness,
            best_hunter = report.best_fitness(Role::Hunter).unwrap_or(0.0),
            best_prey = report.best_fitness(Role::Prey).unwrap_or(0.0),
            hunts = report.summary.total_hunts,
            escapes = report.summary.total_escapes,
            "generation finished"
        );

        for sink in &mut self.sinks {
            sink.record_generation(&report);
        }

        let engine = ReproductionEngine::from_params(&self.params);
        let hunters = engine.offspring(
            &hunter_pool,
            self.params.hunter_target(),
            Role::Hunter,
            &mut self.rng,
        );
        let prey = engine.offspring(
            &prey_pool,
            self.params.prey_target(),
            Role::Prey,
            &mut self.rng,
        );

        self.agents.clear();
        // contacts signaled against the old population are stale
        self.pending = EventQueue::new();
        for offspring in hunters.into_iter().chain(prey) {
            self.spawn_agent(offspring);
        }
        self.spawn_food();

        self.scheduler.complete();
        self.last_report = Some(report);

        info!(
            generation = self.scheduler.generation(),
            hunters = self.count(Role::Hunter),
            prey = self.count(Role::Prey),
            "generation started"
        );
    }

    fn spawn_agent(&mut self, offspring: Offspring) {
        let id = self.next_agent_id;
        self.next_agent_id += 1;

        let pos = geometric_utils::random_position(
            self.params.arena_half_width,
            self.params.arena_half_depth,
            &mut self.rng,
        );
        let seed = self.rng.random::<u64>();
        let agent = Agent::new(id, offspring.genome, offspring.lineage, pos, &self.params, seed);

        self.evaluator.register(&agent);
        self.agents.push(agent);
    }

    fn spawn_food(&mut self) {
        self.food.clear();
        for _ in 0..self.params.initial_food {
            let id = self.next_food_id;
            self.next_food_id += 1;
            self.food.push(Food::new_random(
                id,
                self.params.arena_half_width,
                self.params.arena_half_depth,
                self.params.food_energy,
                &mut self.rng,
            ));
        }
    }

    fn cull_dead(&mut self) {
        let evaluator = &mut self.evaluator;
        self.agents.retain(|agent| {
            if agent.is_alive() {
                return true;
            }
            evaluator.mark_dead(agent.id);
            debug!(agent = agent.id, role = ?agent.role(), "agent removed");
            false
        });
    }
}
