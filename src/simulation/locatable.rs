//! Position access shared by agents, agent views and food.

use ndarray::Array1;

/// Anything with a 2D position in the arena.
///
/// The spatial index is built from slices of `Locatable` items; an item's
/// index in the slice is what the k-d tree stores.
pub trait Locatable {
    /// Current position.
    fn pos(&self) -> &Array1<f32>;

    /// Mutable access to the position, for movers and test setup.
    fn pos_mut(&mut self) -> &mut Array1<f32>;
}
