//! # Predprey - Predator/Prey Co-Evolution
//!
//! A simulation of hunters and prey that compete for survival while their
//! genetically controlled traits evolve across discrete generations.
//!
//! ## Features
//!
//! - Heritable trait genomes (size, speed, stealth, camouflage) with
//!   role-specific valid ranges
//! - Per-tick behavior state machine (wander, seek food, flee, hunt)
//! - k-d tree nearest-neighbor queries over a per-tick population snapshot
//! - Fitness scoring folded in continuously over each generation
//! - Roulette selection, uniform crossover, clamped mutation and elitism
//! - Parallel decision phase with batched, deterministic state updates
//! - Pluggable movement and generation recording collaborators
//!
//! ## Core Modules
//!
//! - [`simulation::genome`] - Trait vectors and their valid ranges
//! - [`simulation::behavior`] - Per-entity decision state machine
//! - [`simulation::fitness`] - Fitness records and scoring
//! - [`simulation::reproduction`] - Next-generation genome production
//! - [`simulation::ecosystem`] - Population, tick loop and entry points

/// Core simulation logic and data structures.
pub mod simulation {
    /// Runtime state of a single hunter or prey.
    pub mod agent;
    /// Per-tick behavior decisions.
    pub mod behavior;
    /// Population, tick loop and external entry points.
    pub mod ecosystem;
    /// Energy costs and rewards for every action.
    pub mod energy;
    /// Crate error type.
    pub mod error;
    /// Batched cross-entity state updates.
    pub mod events;
    /// Fitness records and the fitness formula.
    pub mod fitness;
    /// Food items that prey can seek and eat.
    pub mod food;
    /// Heritable trait vectors.
    pub mod genome;
    /// Geometric utility functions for distances and directions.
    pub mod geometric_utils;
    /// Trait for entities that have a position in the arena.
    ///
    /// The [`locatable::Locatable`] trait is implemented by every entity the
    /// spatial index can be built from (agents, agent views and food).
    pub mod locatable;
    /// Movement execution and contact detection adapters.
    pub mod mover;
    /// Simulation parameters.
    pub mod params;
    /// Generation reports, sinks and run history.
    pub mod recorder;
    /// Elitism, crossover and mutation.
    pub mod reproduction;
    /// Generation timer state machine.
    pub mod scheduler;
    /// Fitness-proportional parent selection.
    pub mod selection;
    /// Spatial indexing for nearest-neighbor queries.
    pub mod spatial;
}
