//! Heritable trait vectors.
//!
//! A genome is fixed for the lifetime of an agent. Crossover and mutation
//! never touch a living agent's genome; they always build a new one for an
//! offspring.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Whether an agent hunts or is hunted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    /// Predator. Chases smaller prey.
    Hunter,
    /// Prey. Flees hunters and forages for food.
    Prey,
}

impl Role {
    /// Both roles, hunters first.
    pub const ALL: [Role; 2] = [Role::Hunter, Role::Prey];

    /// Returns `true` for [`Role::Hunter`].
    pub fn is_hunter(self) -> bool {
        self == Role::Hunter
    }

    /// Role of the agents this role is interested in.
    pub fn opponent(self) -> Role {
        match self {
            Role::Hunter => Role::Prey,
            Role::Prey => Role::Hunter,
        }
    }
}

/// One numeric trait of a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gene {
    /// Body size.
    Size,
    /// Movement speed.
    Speed,
    /// Ability to approach unnoticed (matters for hunters).
    Stealth,
    /// Ability to stay unnoticed (matters for prey).
    Camouflage,
}

impl Gene {
    /// Every numeric gene, in crossover and mutation order.
    pub const ALL: [Gene; 4] = [Gene::Size, Gene::Speed, Gene::Stealth, Gene::Camouflage];
}

/// Valid range of `gene` for `role` after mutation.
///
/// Every mutated genome lies within these bounds.
pub fn range_for(gene: Gene, role: Role) -> (f32, f32) {
    match (gene, role) {
        (Gene::Size, _) => (0.5, 3.0),
        (Gene::Speed, _) => (1.0, 5.0),
        (Gene::Stealth, Role::Hunter) => (1.0, 5.0),
        (Gene::Stealth, Role::Prey) => (0.5, 2.0),
        (Gene::Camouflage, Role::Hunter) => (0.5, 2.0),
        (Gene::Camouflage, Role::Prey) => (1.0, 5.0),
    }
}

/// Range a freshly spawned (non-inherited) gene is drawn from.
///
/// Size and speed start wider than [`range_for`] allows; the first mutation
/// pulls them back in.
pub fn spawn_range(gene: Gene, role: Role) -> (f32, f32) {
    match (gene, role) {
        (Gene::Size, _) => (0.5, 4.0),
        (Gene::Speed, _) => (1.0, 8.0),
        (Gene::Stealth, Role::Hunter) | (Gene::Camouflage, Role::Prey) => (2.0, 5.0),
        (Gene::Stealth, Role::Prey) | (Gene::Camouflage, Role::Hunter) => (0.5, 2.0),
    }
}

/// Heritable trait vector of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Genome {
    /// Hunter or prey.
    pub role: Role,
    /// Body size. Hunters only chase strictly smaller prey.
    pub size: f32,
    /// Movement speed in units per second.
    pub speed: f32,
    /// Stealth, part of a hunter's power.
    pub stealth: f32,
    /// Camouflage, part of a prey's defense.
    pub camouflage: f32,
}

impl Genome {
    /// Creates a genome with random traits drawn from the spawn ranges of `role`.
    pub fn random<R: Rng>(role: Role, rng: &mut R) -> Self {
        let mut draw = |gene| {
            let (min, max) = spawn_range(gene, role);
            rng.random_range(min..max)
        };

        Self {
            role,
            size: draw(Gene::Size),
            speed: draw(Gene::Speed),
            stealth: draw(Gene::Stealth),
            camouflage: draw(Gene::Camouflage),
        }
    }

    /// Returns `true` if this genome belongs to a hunter.
    pub fn is_hunter(&self) -> bool {
        self.role.is_hunter()
    }

    /// Value of a single gene.
    pub fn gene(&self, gene: Gene) -> f32 {
        match gene {
            Gene::Size => self.size,
            Gene::Speed => self.speed,
            Gene::Stealth => self.stealth,
            Gene::Camouflage => self.camouflage,
        }
    }

    /// Copy of this genome with one gene replaced.
    #[must_use]
    pub fn with_gene(mut self, gene: Gene, value: f32) -> Self {
        match gene {
            Gene::Size => self.size = value,
            Gene::Speed => self.speed = value,
            Gene::Stealth => self.stealth = value,
            Gene::Camouflage => self.camouflage = value,
        }
        self
    }

    /// Copy of this genome assigned to `role`.
    #[must_use]
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    /// Uniform per-gene crossover.
    ///
    /// Each numeric gene is taken from `self` or `other` with equal
    /// probability. The child keeps `self`'s role; callers force the target
    /// role afterwards.
    ///
    /// # Arguments
    ///
    /// * `other` - Second parent
    /// * `rng` - Random source
    ///
    /// # Returns
    ///
    /// A new genome whose genes are each copied from one of the parents.
    #[must_use]
    pub fn crossover<R: Rng>(&self, other: &Genome, rng: &mut R) -> Genome {
        Gene::ALL.iter().fold(*self, |child, &gene| {
            let value = if rng.random::<f32>() < 0.5 {
                self.gene(gene)
            } else {
                other.gene(gene)
            };
            child.with_gene(gene, value)
        })
    }

    /// Mutates a child genome.
    ///
    /// Each gene is perturbed with probability `rate` by a value drawn
    /// uniformly from `[-strength, strength]`. Every gene is then clamped to
    /// [`range_for`] of the genome's role.
    ///
    /// # Arguments
    ///
    /// * `rate` - Per-gene mutation probability in `[0, 1]`
    /// * `strength` - Maximum absolute perturbation
    /// * `rng` - Random source
    #[must_use]
    pub fn mutate<R: Rng>(self, rate: f32, strength: f32, rng: &mut R) -> Genome {
        let role = self.role;
        Gene::ALL.iter().fold(self, |child, &gene| {
            let mut value = child.gene(gene);
            if rng.random::<f32>() < rate {
                value += rng.random_range(-strength..=strength);
            }
            let (min, max) = range_for(gene, role);
            child.with_gene(gene, value.clamp(min, max))
        })
    }

    /// Returns `true` if every gene lies within [`range_for`] of the role.
    pub fn is_within_ranges(&self) -> bool {
        Gene::ALL.iter().all(|&gene| {
            let (min, max) = range_for(gene, self.role);
            (min..=max).contains(&self.gene(gene))
        })
    }
}
