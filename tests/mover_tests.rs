#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use predprey::simulation::agent::{Agent, Lineage};
use predprey::simulation::behavior::Intent;
use predprey::simulation::food::Food;
use predprey::simulation::genome::{Genome, Role};
use predprey::simulation::geometric_utils::vec2;
use predprey::simulation::mover::{ContactSensor, DirectMover, Mover};
use predprey::simulation::params::Params;

fn create_test_params() -> Params {
    Params::default()
}

fn create_agent(id: u64, x: f32, y: f32, params: &Params) -> Agent {
    let genome = Genome {
        role: Role::Prey,
        size: 1.0,
        speed: 2.0,
        stealth: 1.0,
        camouflage: 2.0,
    };
    Agent::new(id, genome, Lineage::Random, vec2(x, y), params, id)
}

#[test]
fn test_displacement_is_applied() {
    let params = create_test_params();
    let mut agent = create_agent(0, 1.0, 1.0, &params);
    agent.intent = Intent::Displace(vec2(0.5, -0.25));

    DirectMover.apply(&mut agent, &params, 0.1);

    assert_eq!(agent.pos, vec2(1.5, 0.75));
}

#[test]
fn test_move_to_does_not_overshoot() {
    let params = create_test_params();
    let mut agent = create_agent(0, 0.0, 0.0, &params);
    agent.intent = Intent::MoveTo(vec2(1.0, 0.0));
    agent.destination = Some(vec2(1.0, 0.0));

    DirectMover.apply(&mut agent, &params, 0.25);
    assert!((agent.pos[0] - 0.5).abs() < 1e-6);
    assert_eq!(agent.destination, Some(vec2(1.0, 0.0)));

    DirectMover.apply(&mut agent, &params, 1.0);
    assert_eq!(agent.pos, vec2(1.0, 0.0));
    assert_eq!(agent.destination, None);
}

#[test]
fn test_continue_follows_previous_destination() {
    let params = create_test_params();
    let mut agent = create_agent(0, 0.0, 0.0, &params);
    agent.intent = Intent::Continue;
    agent.destination = Some(vec2(0.0, 10.0));

    DirectMover.apply(&mut agent, &params, 1.0);

    assert!((agent.pos[1] - 2.0).abs() < 1e-6);
}

#[test]
fn test_positions_are_clamped_to_arena() {
    let params = create_test_params();
    let mut agent = create_agent(0, params.arena_half_width - 0.1, 0.0, &params);
    agent.intent = Intent::Displace(vec2(5.0, -100.0));

    DirectMover.apply(&mut agent, &params, 1.0);

    assert_eq!(agent.pos[0], params.arena_half_width);
    assert_eq!(agent.pos[1], -params.arena_half_depth);
}

#[test]
fn test_contact_sensor() {
    let params = create_test_params();
    let mut agents = vec![
        create_agent(0, 0.0, 0.0, &params),
        create_agent(1, 10.0, 10.0, &params),
        create_agent(2, 20.0, 0.0, &params),
    ];
    agents[2].kill();

    let food = vec![
        Food {
            id: 5,
            pos: vec2(0.5, 0.5),
            energy: 10.0,
        },
        Food {
            id: 6,
            pos: vec2(10.0, 10.0),
            energy: 0.0,
        },
        Food {
            id: 7,
            pos: vec2(20.0, 0.0),
            energy: 10.0,
        },
    ];

    let contacts = ContactSensor::from_params(&params).contacts(&agents, &food);

    assert_eq!(contacts, vec![(0, 5)]);
}
