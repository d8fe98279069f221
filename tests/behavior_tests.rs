#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use predprey::simulation::agent::{Agent, AgentId, Lineage};
use predprey::simulation::behavior::{self, BehaviorState, Intent};
use predprey::simulation::energy::can_capture;
use predprey::simulation::events::{EventQueue, SimulationEvent, apply_events};
use predprey::simulation::food::Food;
use predprey::simulation::genome::{Genome, Role};
use predprey::simulation::geometric_utils::{distance, vec2};
use predprey::simulation::mover::{DirectMover, Mover};
use predprey::simulation::params::Params;
use predprey::simulation::spatial::WorldView;

fn create_test_params() -> Params {
    Params {
        initial_food: 0,
        seed: 3,
        ..Params::default()
    }
}

fn hunter_genome() -> Genome {
    Genome {
        role: Role::Hunter,
        size: 4.0,
        speed: 3.0,
        stealth: 3.0,
        camouflage: 1.0,
    }
}

fn prey_genome(size: f32) -> Genome {
    Genome {
        role: Role::Prey,
        size,
        speed: 3.0,
        stealth: 1.0,
        camouflage: 1.0,
    }
}

fn spawn(id: AgentId, genome: Genome, x: f32, y: f32, params: &Params) -> Agent {
    Agent::new(id, genome, Lineage::Random, vec2(x, y), params, 100 + id)
}

fn world(agents: &[&Agent], food: Vec<Food>) -> WorldView {
    WorldView::new(agents.iter().map(|a| a.view()).collect(), food).expect("finite positions")
}

#[test]
fn test_capture_condition() {
    let hunter = hunter_genome();
    let prey = prey_genome(4.0);

    // power 10 vs defense 8
    assert!(can_capture(&hunter, &prey, 3.0, 4.0));
    assert!(!can_capture(&hunter, &prey, 4.5, 4.0));

    let equal = Genome {
        camouflage: 3.0,
        ..prey
    };
    assert!(!can_capture(&hunter, &equal, 3.0, 4.0));
}

#[test]
fn test_capture_transfers_tick_start_energy() {
    let params = create_test_params();
    let dt = 0.1;
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let mut prey = spawn(1, prey_genome(3.9), 3.0, 0.0, &params);
    prey.energy = 80.0;

    let view = world(&[&hunter, &prey], Vec::new());
    let mut queue = EventQueue::new();
    queue.extend(behavior::step(&mut hunter, &view, &params, dt));
    queue.extend(behavior::step(&mut prey, &view, &params, dt));

    assert_eq!(hunter.state, BehaviorState::Hunt);
    assert_eq!(queue.len(), 1);

    let mut agents = vec![hunter, prey];
    let applied = apply_events(&mut agents, &mut [], &params, queue);

    assert_eq!(applied.captured, vec![1]);
    assert!(!agents[1].is_alive());

    let hunter = &agents[0];
    let expected = params.initial_energy - 3.0 * dt + 0.4 * 80.0;
    assert!((hunter.energy - expected).abs() < 1e-4);
    assert_eq!(hunter.successful_hunts, 1);
    assert_eq!(hunter.hunt_cooldown, params.hunt_cooldown_time);
    assert_eq!(hunter.hunt_timer, 0.0);
}

#[test]
fn test_starved_prey_cannot_be_captured() {
    let params = create_test_params();
    let dt = 0.1;
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let mut prey = spawn(1, prey_genome(2.0), 3.0, 0.0, &params);
    prey.energy = 0.2;

    let view = world(&[&hunter, &prey], Vec::new());
    let mut queue = EventQueue::new();
    queue.extend(behavior::step(&mut hunter, &view, &params, dt));
    queue.extend(behavior::step(&mut prey, &view, &params, dt));

    // the flee cost alone takes the prey below zero
    assert_eq!(queue.len(), 1);
    assert!(!prey.is_alive());
    assert!((prey.energy - (0.2 - 3.0 * dt)).abs() < 1e-5);

    let mut agents = vec![hunter, prey];
    let applied = apply_events(&mut agents, &mut [], &params, queue);

    assert!(applied.captured.is_empty());
    let hunter = &agents[0];
    assert_eq!(hunter.successful_hunts, 0);
    assert_eq!(hunter.hunt_cooldown, 0.0);
    assert!((hunter.energy - (params.initial_energy - 3.0 * dt)).abs() < 1e-4);
}

#[test]
fn test_starved_hunter_cannot_capture() {
    let params = create_test_params();
    let dt = 0.1;
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    hunter.energy = 0.2;
    let mut prey = spawn(1, prey_genome(2.0), 3.0, 0.0, &params);

    let view = world(&[&hunter, &prey], Vec::new());
    let mut queue = EventQueue::new();
    queue.extend(behavior::step(&mut hunter, &view, &params, dt));
    queue.extend(behavior::step(&mut prey, &view, &params, dt));
    assert!(!hunter.is_alive());

    let mut agents = vec![hunter, prey];
    let applied = apply_events(&mut agents, &mut [], &params, queue);

    assert!(applied.captured.is_empty());
    assert!(agents[1].is_alive());
    assert_eq!(agents[0].successful_hunts, 0);
}

#[test]
fn test_hunter_ignores_prey_of_equal_size() {
    let params = create_test_params();
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let prey = spawn(1, prey_genome(4.0), 2.0, 0.0, &params);

    let view = world(&[&hunter, &prey], Vec::new());
    let events = behavior::step(&mut hunter, &view, &params, 0.1);

    assert!(events.is_empty());
    assert_eq!(hunter.state, BehaviorState::Wander);
    assert!(matches!(hunter.intent, Intent::Displace(_)));
}

#[test]
fn test_hunter_abandons_chase_when_timer_runs_out() {
    let params = create_test_params();
    let dt = 1.0;
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let prey = spawn(1, prey_genome(2.0), 30.0, 0.0, &params);
    let view = world(&[&hunter, &prey], Vec::new());

    for _ in 0..5 {
        behavior::step(&mut hunter, &view, &params, dt);
        assert_eq!(hunter.state, BehaviorState::Hunt);
    }

    behavior::step(&mut hunter, &view, &params, dt);
    assert_eq!(hunter.state, BehaviorState::Wander);
    assert_eq!(hunter.hunt_cooldown, params.hunt_cooldown_time);
    assert_eq!(hunter.hunt_timer, 0.0);
    assert_eq!(hunter.energy, params.initial_energy - 6.0 * 3.0);

    // cooling down: wandering only
    behavior::step(&mut hunter, &view, &params, dt);
    assert_eq!(hunter.state, BehaviorState::Wander);
    assert_eq!(hunter.hunt_cooldown, params.hunt_cooldown_time - dt);
}

#[test]
fn test_hunter_abandons_chase_on_low_energy() {
    let params = create_test_params();
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    hunter.energy = params.low_energy_threshold + 1.0;
    let prey = spawn(1, prey_genome(2.0), 30.0, 0.0, &params);

    let view = world(&[&hunter, &prey], Vec::new());
    behavior::step(&mut hunter, &view, &params, 1.0);

    assert_eq!(hunter.state, BehaviorState::Wander);
    assert_eq!(hunter.hunt_cooldown, params.hunt_cooldown_time);
    assert_eq!(hunter.energy, params.low_energy_threshold - 2.0);
}

#[test]
fn test_wander_charges_direction_change() {
    let params = create_test_params();
    let mut prey = spawn(0, prey_genome(1.0), 0.0, 0.0, &params);
    let view = world(&[&prey], Vec::new());

    behavior::step(&mut prey, &view, &params, 1.0);
    assert_eq!(prey.state, BehaviorState::Wander);
    assert_eq!(prey.energy, params.initial_energy);

    let heading = prey.wander_direction.clone();
    behavior::step(&mut prey, &view, &params, 1.0);
    assert_eq!(prey.energy, params.initial_energy - 3.0);
    assert_eq!(prey.time_since_direction_change, 0.0);
    assert_ne!(prey.wander_direction, heading);
}

#[test]
fn test_hungry_prey_seeks_food_in_range() {
    let params = create_test_params();
    let mut prey = spawn(0, prey_genome(1.0), 0.0, 0.0, &params);
    prey.energy = 30.0;

    let food = vec![
        Food {
            id: 0,
            pos: vec2(10.0, 0.0),
            energy: 10.0,
        },
        Food {
            id: 1,
            pos: vec2(5.0, 0.0),
            energy: 0.0,
        },
    ];
    let view = world(&[&prey], food);
    behavior::step(&mut prey, &view, &params, 0.5);

    assert_eq!(prey.state, BehaviorState::SeekFood);
    assert_eq!(prey.intent, Intent::MoveTo(vec2(10.0, 0.0)));
    assert_eq!(prey.destination, Some(vec2(10.0, 0.0)));
    assert_eq!(prey.energy, 30.0 - 0.5);
}

#[test]
fn test_hungry_prey_wanders_without_food_in_range() {
    let params = create_test_params();
    let mut prey = spawn(0, prey_genome(1.0), 0.0, 0.0, &params);
    prey.energy = 30.0;

    let food = vec![Food {
        id: 0,
        pos: vec2(params.search_radius + 5.0, 0.0),
        energy: 10.0,
    }];
    let view = world(&[&prey], food);
    behavior::step(&mut prey, &view, &params, 0.5);

    assert_eq!(prey.state, BehaviorState::Wander);
}

#[test]
fn test_prey_only_flees_inside_escape_distance() {
    let params = create_test_params();
    let mut prey = spawn(0, prey_genome(1.0), 0.0, 0.0, &params);
    let hunter = spawn(1, hunter_genome(), params.escape_distance + 1.0, 0.0, &params);

    let view = world(&[&prey, &hunter], Vec::new());
    behavior::step(&mut prey, &view, &params, 0.1);
    assert_eq!(prey.state, BehaviorState::Wander);

    let hunter = spawn(1, hunter_genome(), 2.0, 0.0, &params);
    let view = world(&[&prey, &hunter], Vec::new());
    behavior::step(&mut prey, &view, &params, 0.1);
    assert_eq!(prey.state, BehaviorState::Flee);

    // flee target points away from the hunter
    let Intent::MoveTo(target) = &prey.intent else {
        panic!("expected a flee destination, got {:?}", prey.intent);
    };
    assert!(target[0] < prey.pos[0]);
}

#[test]
fn test_escape_counted_once_per_flight() {
    let params = create_test_params();
    let dt = 0.1;
    let hunter = spawn(1, hunter_genome(), 0.0, 0.0, &params);
    let mut prey = spawn(0, prey_genome(1.0), 0.0, 0.0, &params);
    let speed = prey.genome.speed;

    let mut escape_tick = None;
    for tick in 1..=12 {
        let view = world(&[&hunter, &prey], Vec::new());
        let energy_before = prey.energy;
        behavior::step(&mut prey, &view, &params, dt);
        assert_eq!(prey.state, BehaviorState::Flee);

        if escape_tick.is_none() && prey.successful_escapes == 1 {
            escape_tick = Some(tick);
            let expected = (energy_before - 3.0 * dt) * 1.1;
            assert!((prey.energy - expected).abs() < 1e-3);
        }
        DirectMover.apply(&mut prey, &params, dt);
    }

    let escape_tick = escape_tick.expect("prey should have escaped");
    let ticks_to_safety = (params.safe_escape_distance / (speed * dt)).ceil() as u32;
    assert!(escape_tick >= ticks_to_safety && escape_tick <= ticks_to_safety + 2);
    assert_eq!(prey.successful_escapes, 1);
    assert!(distance(&prey.pos, &hunter.pos) < params.escape_distance);
}

#[test]
fn test_escape_rearms_after_leaving_flee() {
    let params = create_test_params();
    let dt = 0.1;
    let hunter = spawn(1, hunter_genome(), 0.0, 0.0, &params);
    let mut prey = spawn(0, prey_genome(1.0), 2.0, 0.0, &params);

    let view = world(&[&hunter, &prey], Vec::new());
    behavior::step(&mut prey, &view, &params, dt);
    behavior::step(&mut prey, &view, &params, dt);
    assert_eq!(prey.successful_escapes, 1);

    prey.pos = vec2(20.0, 0.0);
    let view = world(&[&hunter, &prey], Vec::new());
    behavior::step(&mut prey, &view, &params, dt);
    assert_eq!(prey.state, BehaviorState::Wander);

    prey.pos = vec2(2.0, 0.0);
    let view = world(&[&hunter, &prey], Vec::new());
    behavior::step(&mut prey, &view, &params, dt);
    assert_eq!(prey.successful_escapes, 2);
}

#[test]
fn test_contested_prey_goes_to_first_hunter() {
    let params = create_test_params();
    let dt = 0.1;
    let mut first = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let mut second = spawn(1, hunter_genome(), 4.0, 0.0, &params);
    let prey = spawn(2, prey_genome(2.0), 2.0, 0.0, &params);

    let view = world(&[&first, &second, &prey], Vec::new());
    let mut queue = EventQueue::new();
    queue.extend(behavior::step(&mut first, &view, &params, dt));
    queue.extend(behavior::step(&mut second, &view, &params, dt));
    assert_eq!(queue.len(), 2);

    let mut agents = vec![first, second, prey];
    let applied = apply_events(&mut agents, &mut [], &params, queue);

    assert_eq!(applied.captured, vec![2]);
    assert_eq!(agents[0].successful_hunts, 1);
    assert_eq!(agents[1].successful_hunts, 0);
    assert_eq!(agents[1].hunt_cooldown, 0.0);
    assert!(agents[1].hunt_timer > 0.0);
}

#[test]
fn test_dead_agent_does_not_act() {
    let params = create_test_params();
    let mut hunter = spawn(0, hunter_genome(), 0.0, 0.0, &params);
    let prey = spawn(1, prey_genome(2.0), 1.0, 0.0, &params);
    hunter.kill();

    let view = world(&[&hunter, &prey], Vec::new());
    let events: Vec<SimulationEvent> = behavior::step(&mut hunter, &view, &params, 0.1);

    assert!(events.is_empty());
    assert_eq!(hunter.energy, 0.0);
}
