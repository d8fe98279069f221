//! Generation countdown and transition state.

use serde::{Deserialize, Serialize};

/// Whether the scheduler is counting down or replacing the population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchedulerState {
    /// Ticks are simulated and the countdown runs.
    Running,
    /// A generation boundary was reached and the next population is built.
    Transitioning,
}

/// Counts down the generation time and tracks the generation number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationScheduler {
    state: SchedulerState,
    generation_time: f32,
    remaining: f32,
    generation: u32,
}

impl GenerationScheduler {
    /// Creates a scheduler for generation 1.
    pub fn new(generation_time: f32) -> Self {
        Self {
            state: SchedulerState::Running,
            generation_time,
            remaining: generation_time,
            generation: 1,
        }
    }

    /// Advances the countdown by `dt`.
    ///
    /// # Returns
    ///
    /// `true` if the generation ended during this tick. The scheduler then
    /// stays in [`SchedulerState::Transitioning`] until [`Self::complete`].
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state == SchedulerState::Transitioning {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.state = SchedulerState::Transitioning;
            return true;
        }
        false
    }

    /// Finishes the transition and starts the next generation's countdown.
    pub fn complete(&mut self) {
        self.generation += 1;
        self.remaining = self.generation_time;
        self.state = SchedulerState::Running;
    }

    /// Current generation number, starting at 1.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Current state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Seconds left in the current generation.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
