//! Movement and contact adapters.
//!
//! The core only decides *where* an agent wants to go. A [`Mover`] turns
//! that intent into a new position, and a [`ContactSensor`] reports agents
//! touching food so the ecosystem can queue food events.

use ndarray::Array1;

use super::agent::{Agent, AgentId};
use super::behavior::Intent;
use super::food::{Food, FoodId};
use super::geometric_utils;
use super::params::Params;

/// Applies an agent's movement intent.
pub trait Mover {
    /// Moves `agent` according to its intent and destination.
    ///
    /// # Arguments
    ///
    /// * `agent` - The agent to move (already decided this tick)
    /// * `params` - Simulation parameters (arena bounds)
    /// * `dt` - Time delta in seconds
    fn apply(&self, agent: &mut Agent, params: &Params, dt: f32);
}

/// Moves straight toward targets at the agent's speed.
///
/// Displacements are applied as-is. Destinations are approached at
/// `speed * dt` per tick without overshooting and cleared once reached.
/// Positions are clamped to the arena.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectMover;

impl Mover for DirectMover {
    fn apply(&self, agent: &mut Agent, params: &Params, dt: f32) {
        match &agent.intent {
            Intent::Displace(displacement) => {
                agent.pos = &agent.pos + displacement;
            }
            Intent::MoveTo(_) | Intent::Continue => {
                if let Some(target) = agent.destination.clone() {
                    let reached = step_toward(&mut agent.pos, &target, agent.genome.speed * dt);
                    if reached {
                        agent.destination = None;
                    }
                }
            }
        }
        geometric_utils::clamp_to_arena_mut(&mut agent.pos, params.arena_half_width, params.arena_half_depth);
    }
}

/// Moves `pos` at most `max_step` toward `target`. Returns `true` on arrival.
fn step_toward(pos: &mut Array1<f32>, target: &Array1<f32>, max_step: f32) -> bool {
    let offset = target - &*pos;
    let remaining = geometric_utils::distance(pos, target);
    if remaining <= max_step {
        pos.assign(target);
        return true;
    }
    match geometric_utils::normalize(&offset) {
        Some(direction) => {
            *pos += &(direction * max_step);
            false
        }
        None => true,
    }
}

/// Detects agents touching food items.
#[derive(Debug, Clone, Copy)]
pub struct ContactSensor {
    /// Maximum center distance that counts as contact.
    pub contact_radius: f32,
}

impl ContactSensor {
    /// Creates a sensor with the configured contact radius.
    pub fn from_params(params: &Params) -> Self {
        Self {
            contact_radius: params.contact_radius,
        }
    }

    /// Lists every (agent, food) pair in contact.
    ///
    /// Only live agents and uneaten food are considered. Pairs are ordered by
    /// agent, then food, as they appear in the slices.
    pub fn contacts(&self, agents: &[Agent], food: &[Food]) -> Vec<(AgentId, FoodId)> {
        agents
            .iter()
            .filter(|a| a.is_alive())
            .flat_map(|agent| {
                food.iter()
                    .filter(|f| !f.is_consumed())
                    .filter(move |f| geometric_utils::distance(&agent.pos, &f.pos) <= self.contact_radius)
                    .map(move |f| (agent.id, f.id))
            })
            .collect()
    }
}
