use std::path::Path;

use serde::{Deserialize, Serialize};

use super::energy::EnergyModel;
use super::error::{Result, SimulationError};

/// Simulation parameters that control population, behavior and evolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Number of agents spawned per generation.
    pub initial_agents: usize,
    /// Number of food items spawned per generation.
    pub initial_food: usize,
    /// Length of one generation in simulation seconds.
    pub generation_time: f32,
    /// Per-gene mutation probability in `[0, 1]`.
    pub mutation_rate: f32,
    /// Maximum absolute perturbation applied by a mutation, in `[0, 1]`.
    pub mutation_strength: f32,
    /// Fraction of each role pool cloned unchanged, in `[0, 1]`.
    pub elite_percentage: f32,
    /// Energy every agent is born with.
    pub initial_energy: f32,
    /// Prey seek food and hunters abandon a chase below this energy.
    pub low_energy_threshold: f32,
    /// Radius for detecting hunters and food.
    pub search_radius: f32,
    /// Seconds between wander direction changes.
    pub change_direction_time: f32,
    /// Maximum duration of a single chase in seconds.
    pub max_hunt_time: f32,
    /// Rest period after a capture or an abandoned chase.
    pub hunt_cooldown_time: f32,
    /// A hunter this close to its prey may capture it.
    pub capture_distance: f32,
    /// Prey flee hunters closer than this, and run this far away.
    pub escape_distance: f32,
    /// Distance to the hunter at which a flight counts as an escape.
    pub safe_escape_distance: f32,
    /// The flee destination is only re-issued while farther away than this.
    pub flee_reissue_distance: f32,
    /// Energy gained from eating one food item.
    pub food_energy: f32,
    /// Contact distance used by [`super::mover::ContactSensor`].
    pub contact_radius: f32,
    /// Half width of the arena (x axis), centered on the origin.
    pub arena_half_width: f32,
    /// Half depth of the arena (y axis), centered on the origin.
    pub arena_half_depth: f32,
    /// Energy costs and rewards.
    pub energy: EnergyModel,
    /// Seed for every random decision in the run.
    pub seed: u64,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            initial_agents: 5,
            initial_food: 30,
            generation_time: 10.0,
            mutation_rate: 0.1,
            mutation_strength: 0.2,
            elite_percentage: 0.2,
            initial_energy: 100.0,
            low_energy_threshold: 40.0,
            search_radius: 30.0,
            change_direction_time: 2.0,
            max_hunt_time: 6.0,
            hunt_cooldown_time: 3.0,
            capture_distance: 4.0,
            escape_distance: 5.0,
            safe_escape_distance: 1.0,
            flee_reissue_distance: 1.0,
            food_energy: 10.0,
            contact_radius: 1.0,
            arena_half_width: 35.0,
            arena_half_depth: 18.0,
            energy: EnergyModel::default(),
            seed: 0,
        }
    }
}

impl Params {
    /// Builds validated parameters from the six run-level settings.
    ///
    /// Every other field keeps its default value.
    ///
    /// # Arguments
    ///
    /// * `initial_agents` - Agents per generation (at least 1)
    /// * `initial_food` - Food items per generation
    /// * `generation_time` - Generation length in seconds (positive)
    /// * `mutation_rate` - Per-gene mutation probability
    /// * `mutation_strength` - Maximum mutation perturbation
    /// * `elite_percentage` - Fraction of each pool kept unchanged
    pub fn configure(
        initial_agents: usize,
        initial_food: usize,
        generation_time: f32,
        mutation_rate: f32,
        mutation_strength: f32,
        elite_percentage: f32,
    ) -> Result<Self> {
        let params = Self {
            initial_agents,
            initial_food,
            generation_time,
            mutation_rate,
            mutation_strength,
            elite_percentage,
            ..Self::default()
        };
        params.validate()?;
        Ok(params)
    }

    /// Number of hunters spawned each generation: `max(2, initial_agents / 2)`.
    pub fn hunter_target(&self) -> usize {
        (self.initial_agents / 2).max(2)
    }

    /// Number of prey spawned each generation.
    pub fn prey_target(&self) -> usize {
        self.initial_agents.saturating_sub(self.hunter_target())
    }

    /// Checks every parameter the simulation depends on.
    pub fn validate(&self) -> Result<()> {
        if self.initial_agents == 0 {
            return Err(SimulationError::invalid(
                "initial_agents",
                "at least one agent is required",
            ));
        }

        check_positive("generation_time", self.generation_time)?;
        check_unit("mutation_rate", self.mutation_rate)?;
        check_unit("mutation_strength", self.mutation_strength)?;
        check_unit("elite_percentage", self.elite_percentage)?;
        check_positive("initial_energy", self.initial_energy)?;
        check_positive("search_radius", self.search_radius)?;
        check_positive("change_direction_time", self.change_direction_time)?;
        check_positive("max_hunt_time", self.max_hunt_time)?;
        check_positive("capture_distance", self.capture_distance)?;
        check_positive("escape_distance", self.escape_distance)?;
        check_positive("safe_escape_distance", self.safe_escape_distance)?;
        check_positive("arena_half_width", self.arena_half_width)?;
        check_positive("arena_half_depth", self.arena_half_depth)?;
        check_non_negative("hunt_cooldown_time", self.hunt_cooldown_time)?;
        check_non_negative("low_energy_threshold", self.low_energy_threshold)?;
        check_non_negative("flee_reissue_distance", self.flee_reissue_distance)?;
        check_non_negative("food_energy", self.food_energy)?;
        check_non_negative("contact_radius", self.contact_radius)?;
        Ok(())
    }

    /// Loads parameters from a JSON file and validates them.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }

    /// Saves the parameters to a JSON file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

fn check_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must be a positive finite number, got {value}"),
        ))
    }
}

fn check_non_negative(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must be a non-negative finite number, got {value}"),
        ))
    }
}

fn check_unit(name: &'static str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimulationError::invalid(
            name,
            format!("must lie in [0, 1], got {value}"),
        ))
    }
}
