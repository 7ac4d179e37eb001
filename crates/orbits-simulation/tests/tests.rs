use glam::DVec3;
use orbits_physics::{gravitational_force, Body, Link, LinkParams, G};
use orbits_simulation::{
    step, total_momentum, Diagnose, Dynamics, Gravitation, ParticleSimulation, ParticleSystem,
    Rk4Workspace, Simulation, Softbody, SoftbodySimulation, SpringNetwork, State, StateError,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f64::consts::PI;

/// Random bodies inside a ball, spread far enough apart to avoid blow-ups
fn random_cluster(rng: &mut StdRng, n: usize, charged: bool) -> ParticleSystem {
    let bodies = (0..n)
        .map(|i| {
            let theta = rng.random::<f64>() * std::f64::consts::TAU;
            let cos_phi = rng.random::<f64>() * 2.0 - 1.0;
            let sin_phi = (1.0 - cos_phi * cos_phi).sqrt();
            let r = 2.0 + 2.0 * i as f64;
            let position = DVec3::new(
                r * sin_phi * theta.cos(),
                r * sin_phi * theta.sin(),
                r * cos_phi,
            );
            let velocity = DVec3::new(
                rng.random_range(-1.0e-3..1.0e-3),
                rng.random_range(-1.0e-3..1.0e-3),
                rng.random_range(-1.0e-3..1.0e-3),
            );
            let mass = rng.random_range(1.0e6..1.0e7);
            let charge = if charged {
                rng.random_range(-1.0e-6..1.0e-6)
            } else {
                0.0
            };
            Body::new(position, velocity, mass).with_charge(charge)
        })
        .collect();
    ParticleSystem::new(bodies).unwrap()
}

/// Two equal masses on a circular mutual orbit of diameter `d`, with its period
fn circular_binary(mass: f64, d: f64) -> (ParticleSystem, f64) {
    let speed = (G * mass / (2.0 * d)).sqrt();
    let system = ParticleSystem::new(vec![
        Body::new(DVec3::new(-d / 2.0, 0.0, 0.0), DVec3::new(0.0, -speed, 0.0), mass),
        Body::new(DVec3::new(d / 2.0, 0.0, 0.0), DVec3::new(0.0, speed, 0.0), mass),
    ])
    .unwrap();
    let period = 2.0 * PI * (d.powi(3) / (G * 2.0 * mass)).sqrt();
    (system, period)
}

// ==================================================================================
// Conservation
// ==================================================================================

#[test]
fn two_body_momentum_is_conserved() {
    let system = ParticleSystem::new(vec![
        Body::new(DVec3::ZERO, DVec3::ZERO, 1.0),
        Body::new(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, 2.0),
    ])
    .unwrap();
    let initial = total_momentum(system.bodies());
    let mut sim: ParticleSimulation = Simulation::new(system);

    for _ in 0..10_000 {
        sim.step(1.0);
    }

    let drift = (total_momentum(sim.state().bodies()) - initial).length();
    assert!(drift < 1e-6, "momentum drifted by {}", drift);
    // The pair fell towards each other without meeting
    let gap = sim.state().bodies()[1].position.x - sim.state().bodies()[0].position.x;
    assert!(gap < 1.0 && gap > 0.0);
}

#[test]
fn n_body_momentum_is_conserved() {
    let mut rng = StdRng::seed_from_u64(42);
    let system = random_cluster(&mut rng, 8, true);
    let initial = total_momentum(system.bodies());
    let scale: f64 = system.bodies().iter().map(|b| b.momentum().length()).sum();
    let mut sim = Simulation::new(system);

    for _ in 0..2_000 {
        sim.step(0.05);
    }

    let drift = (total_momentum(sim.state().bodies()) - initial).length();
    assert!(drift <= 1e-9 * scale, "momentum drifted by {} of {}", drift, scale);
}

#[test]
fn circular_orbit_conserves_energy() {
    let (system, period) = circular_binary(1.0e11, 1.0);
    let initial = system.report().total_energy();
    let mut sim = Simulation::new(system);
    let n = 1_000;
    for _ in 0..n {
        sim.step(period / n as f64);
    }
    let last = sim.state().report().total_energy();
    assert!(((last - initial) / initial).abs() < 1e-8);
}

// ==================================================================================
// Force symmetry and zero derivatives
// ==================================================================================

#[test]
fn pairwise_force_is_exactly_antisymmetric() {
    let mut rng = StdRng::seed_from_u64(7);
    let system = random_cluster(&mut rng, 12, true);
    let bodies = system.bodies();
    for (i, p) in bodies.iter().enumerate() {
        for a in &bodies[i + 1..] {
            assert_eq!(gravitational_force(p, a), -gravitational_force(a, p));
        }
    }
}

#[test]
fn invariant_fields_have_zero_derivative() {
    let mut rng = StdRng::seed_from_u64(3);
    for n in [1, 2, 5, 17] {
        let state = random_cluster(&mut rng, n, true);
        let mut out = state.clone();
        Gravitation::default().derivative(&state, &mut out);
        for (d, b) in out.bodies().iter().zip(state.bodies()) {
            assert_eq!(d.mass, 0.0);
            assert_eq!(d.charge, 0.0);
            assert_eq!(d.position, b.velocity);
        }
    }
}

#[test]
fn softbody_link_parameters_have_zero_derivative() {
    let soft = ring(6, 1.2);
    let mut out = soft.clone();
    SpringNetwork.derivative(&soft, &mut out);
    for (d, l) in out.links().iter().zip(soft.links()) {
        assert_eq!(d.params, LinkParams::default());
        assert_eq!(d.endpoints(), l.endpoints());
    }
    for d in out.bodies() {
        assert_eq!(d.mass, 0.0);
        assert_eq!(d.charge, 0.0);
    }
}

#[test]
fn integration_never_changes_mass_or_charge() {
    let mut rng = StdRng::seed_from_u64(11);
    let system = random_cluster(&mut rng, 6, true);
    let before: Vec<(f64, f64)> = system.bodies().iter().map(|b| (b.mass, b.charge)).collect();
    let mut sim = Simulation::new(system);
    for _ in 0..100 {
        sim.step(0.1);
    }
    let after: Vec<(f64, f64)> = sim.state().bodies().iter().map(|b| (b.mass, b.charge)).collect();
    assert_eq!(before, after);
}

// ==================================================================================
// Integrator accuracy
// ==================================================================================

#[test]
fn straight_line_motion_is_exact() {
    let system = ParticleSystem::new(vec![Body::new(
        DVec3::ZERO,
        DVec3::new(1.0, 0.0, 0.0),
        42.0,
    )])
    .unwrap();
    let mut sim = Simulation::new(system);
    sim.step(1.0);
    let body = sim.state().bodies()[0];
    assert_eq!(body.position, DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(body.velocity, DVec3::new(1.0, 0.0, 0.0));
    assert_eq!(body.mass, 42.0);
}

#[test]
fn circular_orbit_returns_after_one_period() {
    let d = 1.0;
    let (system, period) = circular_binary(1.0e11, d);
    let start = system.bodies()[1].position - system.bodies()[0].position;
    let mut sim = Simulation::new(system);

    let n = 2_000;
    let dt = period / n as f64;
    for _ in 0..n {
        sim.step(dt);
    }

    let bodies = sim.state().bodies();
    let end = bodies[1].position - bodies[0].position;
    assert!((end - start).length() < 1e-6 * d, "ended at {:?}", end);

    // Half a period later the pair has swapped sides
    for _ in 0..n / 2 {
        sim.step(dt);
    }
    let bodies = sim.state().bodies();
    let half = bodies[1].position - bodies[0].position;
    assert!((half + start).length() < 1e-6 * d);
}

#[test]
fn zero_step_leaves_state_unchanged() {
    let mut rng = StdRng::seed_from_u64(5);
    let system = random_cluster(&mut rng, 9, true);
    let mut sim = Simulation::new(system.clone());
    for _ in 0..50 {
        sim.step(0.0);
    }
    assert_eq!(sim.state(), &system);
}

#[test]
fn free_step_function_reuses_workspace() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut a = random_cluster(&mut rng, 4, false);
    let model = Gravitation::default();
    let mut workspace = Rk4Workspace::new(&a);
    workspace.check(&a).unwrap();

    let mut sim = Simulation::new(a.clone());
    for _ in 0..10 {
        step(&mut a, &model, &mut workspace, 0.5);
        sim.step(0.5);
    }
    // Same dt and summation order: bit-for-bit identical
    assert_eq!(&a, sim.state());
    assert_eq!(workspace.shape(), &a.shape());
}

#[test]
fn mismatched_workspace_is_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let small = random_cluster(&mut rng, 2, false);
    let large = random_cluster(&mut rng, 3, false);
    let workspace = Rk4Workspace::new(&small);
    assert_eq!(
        workspace.check(&large),
        Err(StateError::ShapeMismatch {
            expected: "2".to_string(),
            found: "3".to_string()
        })
    );
}

#[test]
fn like_charges_fly_apart() {
    let system = ParticleSystem::new(vec![
        Body::new(DVec3::ZERO, DVec3::ZERO, 1.0).with_charge(1e-5),
        Body::new(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, 1.0).with_charge(1e-5),
    ])
    .unwrap();
    let mut sim = Simulation::new(system);
    for _ in 0..100 {
        sim.step(0.001);
    }
    let bodies = sim.state().bodies();
    assert!(bodies[0].position.x < 0.0);
    assert!(bodies[1].position.x > 1.0);
}

// ==================================================================================
// Softbody
// ==================================================================================

/// `n` unit masses on a circle of radius `r`, neighbours linked at their current distance
fn ring(n: usize, r: f64) -> Softbody {
    let bodies: Vec<Body> = (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * i as f64 / n as f64;
            Body::new(DVec3::new(angle.cos() * r, angle.sin() * r, 0.0), DVec3::ZERO, 1.0)
        })
        .collect();
    let links = (0..n)
        .map(|i| {
            let j = (i + 1) % n;
            let length = (bodies[j].position - bodies[i].position).length();
            Link::new(i, j, LinkParams::new(length * 0.9, 20.0, 0.1))
        })
        .collect();
    Softbody::new(bodies, links).unwrap()
}

#[test]
fn link_at_rest_length_stays_still() {
    let soft = Softbody::new(
        vec![
            Body::new(DVec3::ZERO, DVec3::ZERO, 1.0),
            Body::new(DVec3::new(2.0, 0.0, 0.0), DVec3::ZERO, 3.0),
        ],
        vec![Link::new(0, 1, LinkParams::new(2.0, 50.0, 1.0))],
    )
    .unwrap();
    let mut sim: SoftbodySimulation = Simulation::new(soft.clone());
    for _ in 0..1_000 {
        sim.step(0.01);
    }
    assert_eq!(sim.state(), &soft);
}

#[test]
fn undamped_spring_oscillates_and_conserves_momentum() {
    let soft = Softbody::new(
        vec![
            Body::new(DVec3::ZERO, DVec3::ZERO, 1.0),
            Body::new(DVec3::new(3.0, 0.0, 0.0), DVec3::ZERO, 1.0),
        ],
        vec![Link::new(0, 1, LinkParams::new(2.0, 4.0, 0.0))],
    )
    .unwrap();
    let initial = soft.report();
    let mut sim = Simulation::new(soft);

    // Reduced mass ½, ω = √(k/μ) = √8; quarter period brings the pair back to rest length
    let omega = 8.0f64.sqrt();
    let quarter = PI / (2.0 * omega);
    let n = 500;
    for _ in 0..n {
        sim.step(quarter / n as f64);
    }

    let bodies = sim.state().bodies();
    let gap = (bodies[1].position - bodies[0].position).length();
    assert!((gap - 2.0).abs() < 1e-6, "gap {}", gap);

    let report = sim.state().report();
    assert!(report.momentum.length() < 1e-12);
    let energy = report.total_energy();
    assert!((energy - initial.total_energy()).abs() < 1e-8);
}

#[test]
fn damper_drains_energy() {
    let soft = ring(8, 2.0);
    let initial = soft.report().total_energy();
    let mut sim = Simulation::new(soft);
    for _ in 0..5_000 {
        sim.step(0.01);
    }
    let report = sim.state().report();
    assert!(report.finite);
    assert!(report.total_energy() < initial);
}

#[test]
fn closures_drive_custom_states() {
    // Harmonic oscillator x'' = -x packed as (x, v, 0)
    let oscillator = |y: &DVec3, out: &mut DVec3| *out = DVec3::new(y.y, -y.x, 0.0);
    let mut sim = Simulation::with_model(DVec3::new(1.0, 0.0, 0.0), oscillator);
    let n = 1_000;
    for _ in 0..n {
        sim.step(2.0 * PI / n as f64);
    }
    assert!((*sim.state() - DVec3::new(1.0, 0.0, 0.0)).length() < 1e-9);
}
