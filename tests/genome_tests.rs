#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use predprey::simulation::genome::{Gene, Genome, Role, range_for, spawn_range};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg64;

fn role_from(hunter: bool) -> Role {
    if hunter { Role::Hunter } else { Role::Prey }
}

#[test]
fn test_random_genome_within_spawn_ranges() {
    let mut rng = Pcg64::seed_from_u64(1);

    for role in Role::ALL {
        for _ in 0..1000 {
            let genome = Genome::random(role, &mut rng);
            assert_eq!(genome.role, role);
            for gene in Gene::ALL {
                let (min, max) = spawn_range(gene, role);
                let value = genome.gene(gene);
                assert!(value >= min && value < max, "{gene:?}={value} outside [{min}, {max})");
            }
        }
    }
}

#[test]
fn test_clamp_ranges_depend_on_role() {
    assert_eq!(range_for(Gene::Size, Role::Hunter), (0.5, 3.0));
    assert_eq!(range_for(Gene::Size, Role::Prey), (0.5, 3.0));
    assert_eq!(range_for(Gene::Speed, Role::Prey), (1.0, 5.0));
    assert_eq!(range_for(Gene::Stealth, Role::Hunter), (1.0, 5.0));
    assert_eq!(range_for(Gene::Stealth, Role::Prey), (0.5, 2.0));
    assert_eq!(range_for(Gene::Camouflage, Role::Hunter), (0.5, 2.0));
    assert_eq!(range_for(Gene::Camouflage, Role::Prey), (1.0, 5.0));
}

#[test]
fn test_mutation_without_perturbation_only_clamps() {
    let mut rng = Pcg64::seed_from_u64(2);
    let genome = Genome {
        role: Role::Prey,
        size: 3.8,
        speed: 7.5,
        stealth: 1.0,
        camouflage: 4.0,
    };

    let child = genome.mutate(0.0, 0.5, &mut rng);

    assert_eq!(child.size, 3.0);
    assert_eq!(child.speed, 5.0);
    assert_eq!(child.stealth, 1.0);
    assert_eq!(child.camouflage, 4.0);
    assert!(child.is_within_ranges());
}

#[test]
fn test_with_role_overrides_parent_role() {
    let mut rng = Pcg64::seed_from_u64(3);
    let hunter = Genome::random(Role::Hunter, &mut rng);
    let prey = Genome::random(Role::Prey, &mut rng);

    let child = hunter.crossover(&prey, &mut rng).with_role(Role::Prey);
    assert_eq!(child.role, Role::Prey);
    assert!(!child.is_hunter());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_mutated_genes_within_clamp_range(
        seed in any::<u64>(),
        hunter in any::<bool>(),
        rate in 0.0f32..=1.0,
        strength in 0.0f32..=1.0,
    ) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let role = role_from(hunter);
        let parent1 = Genome::random(role, &mut rng);
        let parent2 = Genome::random(role, &mut rng);

        let child = parent1
            .crossover(&parent2, &mut rng)
            .mutate(rate, strength, &mut rng);

        prop_assert!(child.is_within_ranges(), "{child:?}");
    }

    #[test]
    fn prop_crossover_genes_come_from_parents(seed in any::<u64>(), hunter in any::<bool>()) {
        let mut rng = Pcg64::seed_from_u64(seed);
        let role = role_from(hunter);
        let parent1 = Genome::random(role, &mut rng);
        let parent2 = Genome::random(role.opponent(), &mut rng);

        let child = parent1.crossover(&parent2, &mut rng);

        for gene in Gene::ALL {
            let value = child.gene(gene);
            prop_assert!(value == parent1.gene(gene) || value == parent2.gene(gene));
        }
        prop_assert_eq!(child.role, parent1.role);
    }
}
