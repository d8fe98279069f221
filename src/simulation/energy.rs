//! Energy costs and rewards.
//!
//! Every function here is pure: it maps an action (and the time it took) to
//! an energy delta. Callers decide when the delta is applied.

use serde::{Deserialize, Serialize};

use super::genome::Genome;

/// Energy constants for every action an agent can take.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyModel {
    /// Flat cost paid each time a wandering agent picks a new direction.
    pub direction_change_cost: f32,
    /// Cost per second while walking toward food.
    pub seek_food_rate: f32,
    /// Cost per second while fleeing.
    pub flee_rate: f32,
    /// Cost per second while chasing prey.
    pub hunt_rate: f32,
    /// Fraction of current energy granted on a successful escape.
    pub escape_bonus_fraction: f32,
    /// Fraction of the prey's energy transferred to the hunter on capture.
    pub capture_transfer_fraction: f32,
}

impl Default for EnergyModel {
    fn default() -> Self {
        Self {
            direction_change_cost: 3.0,
            seek_food_rate: 1.0,
            flee_rate: 3.0,
            hunt_rate: 3.0,
            escape_bonus_fraction: 0.1,
            capture_transfer_fraction: 0.4,
        }
    }
}

impl EnergyModel {
    /// Cost of changing wander direction once.
    pub fn direction_change(&self) -> f32 {
        self.direction_change_cost
    }

    /// Cost of moving toward food for `dt` seconds.
    pub fn seek_food(&self, dt: f32) -> f32 {
        self.seek_food_rate * dt
    }

    /// Cost of fleeing for `dt` seconds.
    pub fn flee(&self, dt: f32) -> f32 {
        self.flee_rate * dt
    }

    /// Cost of chasing prey for `dt` seconds.
    pub fn hunt(&self, dt: f32) -> f32 {
        self.hunt_rate * dt
    }

    /// Bonus granted for escaping with `energy` left. Never negative.
    pub fn escape_bonus(&self, energy: f32) -> f32 {
        energy.max(0.0) * self.escape_bonus_fraction
    }

    /// Energy a hunter gains from capturing prey that holds `prey_energy`.
    pub fn capture_transfer(&self, prey_energy: f32) -> f32 {
        prey_energy * self.capture_transfer_fraction
    }
}

/// Attack strength of a hunter: `stealth + speed + size`.
pub fn hunter_power(genome: &Genome) -> f32 {
    genome.stealth + genome.speed + genome.size
}

/// Defensive strength of a prey: `camouflage + speed + size`.
pub fn prey_defense(genome: &Genome) -> f32 {
    genome.camouflage + genome.speed + genome.size
}

/// Capture condition between a hunter and a prey at `distance`.
///
/// The hunter must be within `capture_distance` and strictly stronger than
/// the prey's defense.
pub fn can_capture(hunter: &Genome, prey: &Genome, distance: f32, capture_distance: f32) -> bool {
    distance <= capture_distance && hunter_power(hunter) > prey_defense(prey)
}
