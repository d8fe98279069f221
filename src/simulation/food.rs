//! Food items that prey can seek and eat.
//!
//! Food is respawned in full at every generation boundary. Eating is
//! signaled from outside the simulation (contact detection is not part of
//! the core).

use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometric_utils;
use super::locatable::Locatable;

/// Identifier of a food item, unique within a run.
pub type FoodId = u64;

/// A food item that agents can consume for energy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Food {
    /// Unique identifier.
    pub id: FoodId,
    /// Position in 2D space.
    pub pos: Array1<f32>,
    /// Energy gained by the agent that eats this item.
    pub energy: f32,
}

impl Food {
    /// Creates a new food item at a random position in the arena.
    ///
    /// # Arguments
    ///
    /// * `id` - Unique identifier
    /// * `half_width` - Arena half extent along x
    /// * `half_depth` - Arena half extent along y
    /// * `energy` - Energy value of the item
    /// * `rng` - Random source
    pub fn new_random<R: Rng>(
        id: FoodId,
        half_width: f32,
        half_depth: f32,
        energy: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            id,
            pos: geometric_utils::random_position(half_width, half_depth, rng),
            energy,
        }
    }

    /// Checks if this food item has been eaten.
    pub fn is_consumed(&self) -> bool {
        self.energy <= 0.0
    }

    /// Marks this food as eaten and returns the energy it held.
    pub fn consume(&mut self) -> f32 {
        std::mem::replace(&mut self.energy, 0.0)
    }
}

impl Locatable for Food {
    fn pos(&self) -> &Array1<f32> {
        &self.pos
    }

    fn pos_mut(&mut self) -> &mut Array1<f32> {
        &mut self.pos
    }
}
