//! Next-generation genome production.
//!
//! Each role is bred from its own pool only; a hunter is never crossed with a
//! prey. For a pool sorted by fitness (highest first):
//!
//! 1. the top `max(1, floor(count * elite_percentage))` genomes are copied
//!    unchanged,
//! 2. every remaining slot gets a child of two roulette-selected parents
//!    (uniform per-gene crossover, then clamped mutation),
//! 3. an empty pool yields freshly randomized genomes instead.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::agent::Lineage;
use super::fitness::FitnessRecord;
use super::genome::{Genome, Role};
use super::params::Params;
use super::selection::select_by_roulette;

/// Genome and origin of one member of the next generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Offspring {
    /// Genome of the new agent.
    pub genome: Genome,
    /// How the genome was produced.
    pub lineage: Lineage,
}

/// Elitism, crossover and mutation settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReproductionEngine {
    /// Per-gene mutation probability.
    pub mutation_rate: f32,
    /// Maximum absolute mutation perturbation.
    pub mutation_strength: f32,
    /// Fraction of the target count filled with elites.
    pub elite_percentage: f32,
}

impl ReproductionEngine {
    /// Takes the evolution settings from the simulation parameters.
    pub fn from_params(params: &Params) -> Self {
        Self {
            mutation_rate: params.mutation_rate,
            mutation_strength: params.mutation_strength,
            elite_percentage: params.elite_percentage,
        }
    }

    /// Number of elites copied for `count` slots from a pool of `pool_len`.
    pub fn elite_count(&self, count: usize, pool_len: usize) -> usize {
        let wanted = ((count as f32 * self.elite_percentage).floor() as usize).max(1);
        wanted.min(count).min(pool_len)
    }

    /// Produces exactly `count` offspring of `role`.
    ///
    /// # Arguments
    ///
    /// * `pool` - Final fitness records of the role's survivors
    /// * `count` - Number of offspring to produce
    /// * `role` - Role forced onto every offspring
    /// * `rng` - Random source
    ///
    /// # Returns
    ///
    /// Elites first (best first), then crossover children.
    pub fn offspring<R: Rng>(
        &self,
        pool: &[FitnessRecord],
        count: usize,
        role: Role,
        rng: &mut R,
    ) -> Vec<Offspring> {
        if pool.is_empty() {
            debug!(?role, count, "no survivors, spawning random genomes");
            return (0..count)
                .map(|_| Offspring {
                    genome: Genome::random(role, rng),
                    lineage: Lineage::Random,
                })
                .collect();
        }

        let mut ranked: Vec<&FitnessRecord> = pool.iter().collect();
        ranked.sort_by(|a, b| b.fitness_score.total_cmp(&a.fitness_score));

        let elites = self.elite_count(count, ranked.len());
        let mut next = Vec::with_capacity(count);

        next.extend(ranked.iter().take(elites).map(|elite| Offspring {
            genome: elite.genome.with_role(role),
            lineage: Lineage::Elite {
                source: elite.agent_id,
            },
        }));

        while next.len() < count {
            let parent1 = select_by_roulette(&ranked, |r| r.fitness_score, rng);
            let parent2 = select_by_roulette(&ranked, |r| r.fitness_score, rng);
            // The pool is non-empty, so selection always succeeds.
            let (Some(parent1), Some(parent2)) = (parent1, parent2) else {
                break;
            };
            next.push(self.breed(parent1, parent2, role, rng));
        }

        next
    }

    /// Crosses two parents and mutates the child.
    pub fn breed<R: Rng>(
        &self,
        parent1: &FitnessRecord,
        parent2: &FitnessRecord,
        role: Role,
        rng: &mut R,
    ) -> Offspring {
        let genome = parent1
            .genome
            .crossover(&parent2.genome, rng)
            .with_role(role)
            .mutate(self.mutation_rate, self.mutation_strength, rng);

        Offspring {
            genome,
            lineage: Lineage::Crossover {
                parent1: parent1.agent_id,
                parent2: parent2.agent_id,
            },
        }
    }
}
