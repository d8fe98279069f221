//! Event system for batched, cross-agent state updates.
//!
//! Agents decide in parallel against a frozen snapshot. Anything that
//! touches a different agent (a capture) or a shared resource (food) is
//! recorded as an event and applied serially afterwards, in population order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::agent::{Agent, AgentId};
use super::food::{Food, FoodId};
use super::params::Params;

/// Events that modify state outside the agent that produced them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimulationEvent {
    /// A hunter met the capture condition against a prey.
    CaptureClaimed {
        /// The capturing hunter.
        hunter_id: AgentId,
        /// The captured prey.
        prey_id: AgentId,
        /// Prey energy at the start of the tick.
        prey_energy: f32,
    },
    /// An agent touched a food item (signaled from outside the core).
    FoodConsumed {
        /// ID of the agent that ate.
        agent_id: AgentId,
        /// ID of the food item.
        food_id: FoodId,
    },
}

/// Queue for collecting simulation events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<SimulationEvent>,
}

impl EventQueue {
    /// Creates an empty event queue.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Adds an event to the queue.
    pub fn push(&mut self, event: SimulationEvent) {
        self.events.push(event);
    }

    /// Returns `true` if no events are queued.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of queued events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Drains all events from the queue.
    pub fn drain(&mut self) -> std::vec::Drain<'_, SimulationEvent> {
        self.events.drain(..)
    }
}

impl Extend<SimulationEvent> for EventQueue {
    fn extend<I: IntoIterator<Item = SimulationEvent>>(&mut self, iter: I) {
        self.events.extend(iter);
    }
}

/// What a batch of events changed.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct AppliedEvents {
    /// Prey removed by captures, in the order they were captured.
    pub captured: Vec<AgentId>,
    /// Number of food items eaten.
    pub food_eaten: usize,
}

/// Applies all queued events to the agents and food.
///
/// Conflicts are resolved first come, first served: a prey claimed by
/// several hunters goes to the first claim, and a food item touched by
/// several agents feeds only the first one. Agents whose own costs took
/// their energy to zero this tick neither capture nor get captured.
///
/// # Arguments
///
/// * `agents` - Live agents
/// * `food` - Food items
/// * `params` - Simulation parameters
/// * `queue` - Events in application order
pub fn apply_events(
    agents: &mut [Agent],
    food: &mut [Food],
    params: &Params,
    mut queue: EventQueue,
) -> AppliedEvents {
    let agent_index: HashMap<AgentId, usize> =
        agents.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
    let food_index: HashMap<FoodId, usize> =
        food.iter().enumerate().map(|(i, f)| (f.id, i)).collect();

    let mut captured: HashSet<AgentId> = HashSet::new();
    let mut applied = AppliedEvents::default();

    for event in queue.drain() {
        match event {
            SimulationEvent::CaptureClaimed {
                hunter_id,
                prey_id,
                prey_energy,
            } => {
                let (Some(&hunter_idx), Some(&prey_idx)) =
                    (agent_index.get(&hunter_id), agent_index.get(&prey_id))
                else {
                    warn!(hunter_id, prey_id, "capture refers to an unknown agent");
                    continue;
                };

                if captured.contains(&prey_id) {
                    debug!(hunter_id, prey_id, "prey already taken by another hunter");
                    continue;
                }

                // an agent that starved during its own decision is already gone
                if !agents[hunter_idx].is_alive() || !agents[prey_idx].is_alive() {
                    debug!(hunter_id, prey_id, "capture involves a starved agent");
                    continue;
                }
                captured.insert(prey_id);

                let gained = params.energy.capture_transfer(prey_energy);
                let hunter = &mut agents[hunter_idx];
                hunter.gain_energy(gained);
                hunter.successful_hunts += 1;
                hunter.hunt_cooldown = params.hunt_cooldown_time;
                hunter.hunt_timer = 0.0;

                agents[prey_idx].kill();
                applied.captured.push(prey_id);

                debug!(hunter_id, prey_id, gained, "hunter captured prey");
            }
            SimulationEvent::FoodConsumed { agent_id, food_id } => {
                let Some(&food_idx) = food_index.get(&food_id) else {
                    warn!(agent_id, food_id, "contact with unknown food item");
                    continue;
                };
                let Some(&agent_idx) = agent_index.get(&agent_id) else {
                    warn!(agent_id, food_id, "contact from unknown agent");
                    continue;
                };
                if !agents[agent_idx].is_alive() {
                    continue;
                }
                if food[food_idx].is_consumed() {
                    warn!(agent_id, food_id, "food already eaten");
                    continue;
                }

                let energy = food[food_idx].consume();
                agents[agent_idx].gain_energy(energy);
                applied.food_eaten += 1;
            }
        }
    }

    applied
}
