//! Runtime state of a hunter or prey.
//!
//! An agent owns its genome exclusively. Its state is changed by its own
//! behavior decision each tick, and by capture or food events applied in the
//! batch phase.

use ndarray::Array1;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};

use super::behavior::{BehaviorState, Intent};
use super::genome::{Genome, Role};
use super::geometric_utils;
use super::locatable::Locatable;
use super::params::Params;

/// Identifier of an agent, unique within a run.
pub type AgentId = u64;

/// How an agent's genome came to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Lineage {
    /// Freshly randomized genome.
    Random,
    /// Unchanged copy of an elite from the previous generation.
    Elite {
        /// The agent the genome was copied from.
        source: AgentId,
    },
    /// Crossover of two parents followed by mutation.
    Crossover {
        /// First selected parent.
        parent1: AgentId,
        /// Second selected parent (may equal the first).
        parent2: AgentId,
    },
}

impl Lineage {
    /// Returns `true` for elite clones.
    pub fn is_elite(&self) -> bool {
        matches!(self, Lineage::Elite { .. })
    }
}

/// A simulated hunter or prey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Heritable traits, fixed for life.
    pub genome: Genome,
    /// Origin of the genome.
    pub lineage: Lineage,
    /// Current energy (dies when <= 0).
    pub energy: f32,
    /// Position in 2D space.
    pub pos: Array1<f32>,
    /// Seconds until the hunter may start another chase.
    pub hunt_cooldown: f32,
    /// Seconds left in the current chase.
    pub hunt_timer: f32,
    /// Prey captured this generation.
    pub successful_hunts: u32,
    /// Hunters escaped this generation.
    pub successful_escapes: u32,
    /// Total path length moved so far.
    pub distance_traveled: f32,
    /// Current wander heading (unit vector).
    pub wander_direction: Array1<f32>,
    /// Seconds since the wander heading last changed.
    pub time_since_direction_change: f32,
    /// State chosen in the last tick.
    pub state: BehaviorState,
    /// Movement request produced in the last tick.
    pub intent: Intent,
    /// Active navigation target, if any.
    pub destination: Option<Array1<f32>>,
    /// Set while the current or next flee episode may still count an escape.
    pub escape_armed: bool,
    pub(crate) rng: Pcg64,
}

impl Agent {
    /// Creates a new agent with full energy and a random wander heading.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier
    /// * `genome` - Traits of the new agent
    /// * `lineage` - Origin of the genome
    /// * `pos` - Spawn position
    /// * `params` - Simulation parameters
    /// * `seed` - Seed for the agent's private random source
    pub fn new(
        id: AgentId,
        genome: Genome,
        lineage: Lineage,
        pos: Array1<f32>,
        params: &Params,
        seed: u64,
    ) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let wander_direction = geometric_utils::random_direction(&mut rng);

        Self {
            id,
            genome,
            lineage,
            energy: params.initial_energy,
            pos,
            hunt_cooldown: 0.0,
            hunt_timer: 0.0,
            successful_hunts: 0,
            successful_escapes: 0,
            distance_traveled: 0.0,
            wander_direction,
            time_since_direction_change: 0.0,
            state: BehaviorState::Wander,
            intent: Intent::Continue,
            destination: None,
            escape_armed: true,
            rng,
        }
    }

    /// Role of this agent.
    pub fn role(&self) -> Role {
        self.genome.role
    }

    /// Checks if the agent is alive.
    ///
    /// # Returns
    ///
    /// `true` if energy > 0, `false` otherwise.
    pub fn is_alive(&self) -> bool {
        self.energy > 0.0
    }

    /// Reduces the agent's energy.
    pub fn consume_energy(&mut self, amount: f32) {
        self.energy -= amount;
    }

    /// Increases the agent's energy.
    pub fn gain_energy(&mut self, amount: f32) {
        self.energy += amount;
    }

    /// Kills the agent by setting energy to 0.
    pub fn kill(&mut self) {
        self.energy = 0.0;
    }

    /// Decrements the hunt cooldown timer while it is running.
    ///
    /// # Arguments
    ///
    /// * `dt` - Time delta in seconds
    pub fn update_cooldown(&mut self, dt: f32) {
        if self.hunt_cooldown > 0.0 {
            self.hunt_cooldown -= dt;
        }
    }

    /// Read-only copy of the fields other agents may observe.
    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id,
            genome: self.genome,
            energy: self.energy,
            pos: self.pos.clone(),
        }
    }
}

impl Locatable for Agent {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.pos
    }
}

/// What one agent can see of another during a tick.
///
/// Views are taken at the start of the tick and never change while
/// decisions are being made.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentView {
    /// Identifier of the observed agent.
    pub id: AgentId,
    /// Traits of the observed agent.
    pub genome: Genome,
    /// Energy at the start of the tick.
    pub energy: f32,
    /// Position at the start of the tick.
    pub pos: Array1<f32>,
}

impl Locatable for AgentView {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.pos
    }
}
