//! Per-tick behavior decisions.
//!
//! Each tick an agent picks exactly one state, highest priority first:
//!
//! - Prey: `Flee` if a hunter is inside both the search radius and the
//!   escape distance, else `SeekFood` when energy is low, else `Wander`.
//! - Hunter: `Hunt` once the cooldown has run out, else `Wander`.
//!
//! A state may fall back to `Wander` within the same tick (no food in range,
//! no smaller prey, an abandoned chase). The outcome is returned as a single
//! [`Decision`]; nothing is re-entered.
//!
//! Decisions only read the tick's [`WorldView`] and write the deciding
//! agent's own state. Effects on other agents (captures) are emitted as
//! [`SimulationEvent`]s and applied after every agent has decided.

use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::agent::Agent;
use super::energy::can_capture;
use super::events::SimulationEvent;
use super::genome::Role;
use super::geometric_utils;
use super::params::Params;
use super::spatial::WorldView;

/// High-level activity of an agent during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Walking in a random direction.
    Wander,
    /// Walking toward the nearest food.
    SeekFood,
    /// Running away from the nearest hunter.
    Flee,
    /// Chasing the nearest smaller prey.
    Hunt,
}

/// Movement request handed to the mover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Intent {
    /// Move by this displacement now and drop any destination.
    Displace(Array1<f32>),
    /// Navigate toward this point.
    MoveTo(Array1<f32>),
    /// Keep following the current destination, if any.
    Continue,
}

/// Outcome of one agent's decision for one tick.
#[derive(Debug, Clone)]
pub struct Decision {
    /// State the agent ended the tick in.
    pub state: BehaviorState,
    /// Net energy change of the tick (costs and bonuses, in evaluation order).
    pub energy_delta: f32,
    /// Movement request.
    pub intent: Intent,
    /// Effects on other agents.
    pub events: Vec<SimulationEvent>,
}

impl Decision {
    fn new(state: BehaviorState, energy_delta: f32, intent: Intent) -> Self {
        Self {
            state,
            energy_delta,
            intent,
            events: Vec::new(),
        }
    }
}

/// Runs one tick of behavior for `agent` and applies the decision to it.
///
/// # Arguments
///
/// * `agent` - The deciding agent (the only agent written to)
/// * `world` - Snapshot of the world taken at the start of the tick
/// * `params` - Simulation parameters
/// * `dt` - Elapsed time of the tick in seconds
///
/// # Returns
///
/// Events that affect other agents, to be applied in the batch phase.
pub fn step(agent: &mut Agent, world: &WorldView, params: &Params, dt: f32) -> Vec<SimulationEvent> {
    agent.update_cooldown(dt);
    if !agent.is_alive() {
        return Vec::new();
    }

    let decision = decide(agent, world, params, dt);

    agent.energy += decision.energy_delta;
    agent.state = decision.state;
    match &decision.intent {
        Intent::Displace(_) => agent.destination = None,
        Intent::MoveTo(target) => agent.destination = Some(target.clone()),
        Intent::Continue => {}
    }
    agent.intent = decision.intent;

    decision.events
}

/// Chooses the state for this tick and computes its effects.
///
/// Writes only the agent's scratch state (wander heading, hunt timers,
/// escape bookkeeping). Energy is left untouched; it is reported in
/// [`Decision::energy_delta`].
pub fn decide(agent: &mut Agent, world: &WorldView, params: &Params, dt: f32) -> Decision {
    match agent.role() {
        Role::Prey => decide_prey(agent, world, params, dt),
        Role::Hunter => {
            if agent.hunt_cooldown <= 0.0 {
                hunt(agent, world, params, dt)
            } else {
                wander(agent, params, dt)
            }
        }
    }
}

fn decide_prey(agent: &mut Agent, world: &WorldView, params: &Params, dt: f32) -> Decision {
    let threat = world
        .nearest_of_role(agent.id, &agent.pos, Role::Hunter)
        .filter(|h| h.distance < params.search_radius && h.distance < params.escape_distance)
        .map(|h| (h.item.pos.clone(), h.distance));

    if let Some((hunter_pos, hunter_distance)) = threat {
        return flee(agent, &hunter_pos, hunter_distance, params, dt);
    }

    // A new flee episode may count an escape again.
    agent.escape_armed = true;

    if agent.energy <= params.low_energy_threshold {
        seek_food(agent, world, params, dt)
    } else {
        wander(agent, params, dt)
    }
}

/// Picks a fresh random wander heading.
fn change_direction(agent: &mut Agent) {
    agent.wander_direction = geometric_utils::random_direction(&mut agent.rng);
    agent.time_since_direction_change = 0.0;
}

fn wander(agent: &mut Agent, params: &Params, dt: f32) -> Decision {
    let displacement = &agent.wander_direction * (agent.genome.speed * dt);
    agent.time_since_direction_change += dt;

    let mut energy_delta = 0.0;
    if agent.time_since_direction_change >= params.change_direction_time {
        change_direction(agent);
        energy_delta -= params.energy.direction_change();
    }

    Decision::new(
        BehaviorState::Wander,
        energy_delta,
        Intent::Displace(displacement),
    )
}

fn seek_food(agent: &mut Agent, world: &WorldView, params: &Params, dt: f32) -> Decision {
    match world.nearest_food(&agent.pos, params.search_radius) {
        Some(food) => Decision::new(
            BehaviorState::SeekFood,
            -params.energy.seek_food(dt),
            Intent::MoveTo(food.item.pos.clone()),
        ),
        None => wander(agent, params, dt),
    }
}

fn flee(
    agent: &mut Agent,
    hunter_pos: &Array1<f32>,
    hunter_distance: f32,
    params: &Params,
    dt: f32,
) -> Decision {
    let away = &agent.pos - hunter_pos;
    let direction =
        geometric_utils::normalize(&away).unwrap_or_else(|| agent.wander_direction.clone());
    let target = &agent.pos + &(&direction * params.escape_distance);

    let intent = if geometric_utils::distance(&agent.pos, &target) > params.flee_reissue_distance {
        Intent::MoveTo(target)
    } else {
        Intent::Continue
    };

    let mut energy_delta = -params.energy.flee(dt);

    if agent.escape_armed && hunter_distance >= params.safe_escape_distance {
        // Bonus is based on the energy left after this tick's flee cost.
        energy_delta += params.energy.escape_bonus(agent.energy + energy_delta);
        agent.successful_escapes += 1;
        agent.escape_armed = false;
        change_direction(agent);
        debug!(
            agent = agent.id,
            distance = hunter_distance,
            "prey escaped a hunter"
        );
    }

    Decision::new(BehaviorState::Flee, energy_delta, intent)
}

fn hunt(agent: &mut Agent, world: &WorldView, params: &Params, dt: f32) -> Decision {
    if agent.hunt_timer <= 0.0 {
        agent.hunt_timer = params.max_hunt_time;
    }

    let (self_id, self_size) = (agent.id, agent.genome.size);
    let Some(prey) = world.nearest_agent(&agent.pos, None, |other| {
        other.id != self_id && other.genome.role == Role::Prey && other.genome.size < self_size
    }) else {
        return wander(agent, params, dt);
    };

    let energy_delta = -params.energy.hunt(dt);
    agent.hunt_timer -= dt;

    if can_capture(&agent.genome, &prey.item.genome, prey.distance, params.capture_distance) {
        let mut decision = Decision::new(
            BehaviorState::Hunt,
            energy_delta,
            Intent::MoveTo(prey.item.pos.clone()),
        );
        decision.events.push(SimulationEvent::CaptureClaimed {
            hunter_id: agent.id,
            prey_id: prey.item.id,
            prey_energy: prey.item.energy,
        });
        return decision;
    }

    if agent.hunt_timer <= 0.0 || agent.energy + energy_delta < params.low_energy_threshold {
        debug!(agent = agent.id, "hunter abandons the chase");
        agent.hunt_cooldown = params.hunt_cooldown_time;
        agent.hunt_timer = 0.0;
        let mut fallback = wander(agent, params, dt);
        fallback.energy_delta += energy_delta;
        return fallback;
    }

    Decision::new(
        BehaviorState::Hunt,
        energy_delta,
        Intent::MoveTo(prey.item.pos.clone()),
    )
}
