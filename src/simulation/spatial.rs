//! Spatial indexing for nearest-neighbor queries.
//!
//! A [`WorldView`] is an immutable snapshot of the population and the food
//! taken at the start of a tick, together with k-d trees over both. Every
//! agent's decision in a tick reads the same view, so deaths, captures and
//! energy transfers made during the tick are never visible to other agents
//! until the next one.

use kdtree::KdTree;
use kdtree::distance::squared_euclidean;
use ndarray::Array1;

use super::agent::{AgentId, AgentView};
use super::error::Result;
use super::food::Food;
use super::genome::Role;
use super::locatable::Locatable;

/// Distance reported when no matching target exists.
///
/// Distances larger than this are also reported as the sentinel, so fitness
/// terms built on them stay bounded.
pub const SENTINEL_DISTANCE: f32 = 100.0;

/// Type alias for 2D spatial KD-tree used for efficient neighbor queries.
pub type Tree2D = KdTree<f32, usize, Vec<f32>>;

/// A query result: the matched item and its distance to the query point.
#[derive(Debug, Clone, Copy)]
pub struct Neighbor<'a, T> {
    /// The matched item.
    pub item: &'a T,
    /// Euclidean distance to the query position.
    pub distance: f32,
}

/// Spatial index containing KD-trees for agents and food.
pub struct SpatialIndex {
    agents: Tree2D,
    food: Tree2D,
}

impl SpatialIndex {
    /// Builds KD-trees over the given agents and food.
    ///
    /// # Returns
    ///
    /// A spatial index, or an error if a position is not finite.
    pub fn build<A: Locatable, F: Locatable>(agents: &[A], food: &[F]) -> Result<Self> {
        Ok(Self {
            agents: build_tree(agents)?,
            food: build_tree(food)?,
        })
    }
}

/// Read-only snapshot of the world used for every query in a tick.
pub struct WorldView {
    /// Agents alive at the start of the tick.
    pub agents: Vec<AgentView>,
    /// Uneaten food at the start of the tick.
    pub food: Vec<Food>,
    index: SpatialIndex,
}

impl WorldView {
    /// Takes a snapshot and indexes it.
    pub fn new(agents: Vec<AgentView>, food: Vec<Food>) -> Result<Self> {
        let index = SpatialIndex::build(&agents, &food)?;
        Ok(Self {
            agents,
            food,
            index,
        })
    }

    /// Finds the nearest agent that satisfies `predicate`.
    ///
    /// # Arguments
    ///
    /// * `pos` - Query position
    /// * `radius` - Optional maximum distance (inclusive)
    /// * `predicate` - Filter applied to candidates in order of distance
    ///
    /// # Returns
    ///
    /// The closest matching agent, or `None` if none matches within `radius`.
    pub fn nearest_agent(
        &self,
        pos: &Array1<f32>,
        radius: Option<f32>,
        predicate: impl Fn(&AgentView) -> bool,
    ) -> Option<Neighbor<'_, AgentView>> {
        nearest_in(&self.index.agents, &self.agents, pos, radius, predicate)
    }

    /// Finds the nearest uneaten food item within `radius`.
    pub fn nearest_food(&self, pos: &Array1<f32>, radius: f32) -> Option<Neighbor<'_, Food>> {
        nearest_in(&self.index.food, &self.food, pos, Some(radius), |f| {
            !f.is_consumed()
        })
    }

    /// Nearest agent of `role` other than `self_id`, with no radius limit.
    pub fn nearest_of_role(
        &self,
        self_id: AgentId,
        pos: &Array1<f32>,
        role: Role,
    ) -> Option<Neighbor<'_, AgentView>> {
        self.nearest_agent(pos, None, |other| {
            other.id != self_id && other.genome.role == role
        })
    }

    /// Distance to the nearest agent of `role`, saturated at [`SENTINEL_DISTANCE`].
    pub fn nearest_distance_or_sentinel(&self, self_id: AgentId, pos: &Array1<f32>, role: Role) -> f32 {
        self.nearest_of_role(self_id, pos, role)
            .map_or(SENTINEL_DISTANCE, |n| n.distance.min(SENTINEL_DISTANCE))
    }
}

fn nearest_in<'a, T>(
    tree: &Tree2D,
    items: &'a [T],
    pos: &Array1<f32>,
    radius: Option<f32>,
    predicate: impl Fn(&T) -> bool,
) -> Option<Neighbor<'a, T>> {
    let point = pos.to_vec();
    let max_sq = radius.map(|r| r * r);

    tree.iter_nearest(&point, &squared_euclidean)
        .ok()?
        .take_while(|(dist_sq, _)| max_sq.is_none_or(|max| *dist_sq <= max))
        .map(|(dist_sq, &idx)| (dist_sq, &items[idx]))
        .find(|(_, item)| predicate(item))
        .map(|(dist_sq, item)| Neighbor {
            item,
            distance: dist_sq.sqrt(),
        })
}

/// Helper function to build a KD-tree from a collection of items.
fn build_tree<T: Locatable>(items: &[T]) -> Result<Tree2D> {
    let mut tree = KdTree::new(2);
    for (i, item) in items.iter().enumerate() {
        tree.add(item.pos().to_vec(), i)?;
    }
    Ok(tree)
}
