//! Homogeneous particle systems under mutual gravitation

use crate::error::StateError;
use crate::state::{Dynamics, State, System};
use glam::{DVec3, Vec3};
use orbits_physics::{bodies_as_flat, gravitational_force, Body};

/// An ordered, fixed-size set of bodies
///
/// The body count never changes once built. Only the integrator writes to the
/// bodies; everything else reads through the accessors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParticleSystem {
    bodies: Vec<Body>,
}

impl ParticleSystem {
    /// Build a system, rejecting non-positive masses, non-finite values and
    /// bodies that share a position
    pub fn new(bodies: Vec<Body>) -> Result<Self, StateError> {
        validate_bodies(&bodies)?;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                if bodies[i].position == bodies[j].position {
                    return Err(StateError::CoincidentBodies {
                        first: i,
                        second: j,
                    });
                }
            }
        }
        Ok(Self { bodies })
    }

    /// Build a system without validation
    ///
    /// Invalid bodies propagate NaN/∞ through the integration.
    pub fn from_bodies_unchecked(bodies: Vec<Body>) -> Self {
        Self { bodies }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.bodies.iter().map(|b| b.position)
    }

    /// Flat `[x, y, z, vx, vy, vz, m, q, ...]` view of every body
    pub fn as_flat(&self) -> &[f64] {
        bodies_as_flat(&self.bodies)
    }

    /// Positions multiplied by `scale` and narrowed to `f32` for GPU upload
    pub fn render_positions(&self, scale: f64) -> impl Iterator<Item = Vec3> + '_ {
        self.bodies
            .iter()
            .map(move |b| (b.position * scale).as_vec3())
    }

    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }
}

/// Shared body checks for every container
pub(crate) fn validate_bodies(bodies: &[Body]) -> Result<(), StateError> {
    for (index, body) in bodies.iter().enumerate() {
        if !body.is_finite() {
            return Err(StateError::NonFiniteBody { index });
        }
        if body.mass <= 0.0 {
            return Err(StateError::NonPositiveMass {
                index,
                mass: body.mass,
            });
        }
    }
    Ok(())
}

impl State for ParticleSystem {
    /// Body count
    type Shape = usize;

    fn shape(&self) -> usize {
        self.bodies.len()
    }

    fn add(&mut self, rhs: &Self) -> &mut Self {
        for (b, r) in self.bodies.iter_mut().zip(&rhs.bodies) {
            b.add_assign(r);
        }
        self
    }

    fn scale(&mut self, c: f64) -> &mut Self {
        for b in self.bodies.iter_mut() {
            b.scale(c);
        }
        self
    }

    // Copy into the existing buffer; only a shape change reallocates
    fn assign(&mut self, src: &Self) -> &mut Self {
        if self.bodies.len() == src.bodies.len() {
            self.bodies.copy_from_slice(&src.bodies);
        } else {
            self.bodies.clone_from(&src.bodies);
        }
        self
    }
}

impl System for ParticleSystem {
    type Model = Gravitation;
}

/// How pairwise contributions are summed into each body's acceleration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Accumulation {
    /// Visit each unordered pair once and scatter ± into both bodies
    #[default]
    Pairwise,
    /// Gather every other body's pull per body across worker threads.
    /// Twice the force evaluations, but no two workers share an output slot.
    #[cfg(feature = "parallel")]
    Parallel,
}

/// All-pairs gravitational and electrostatic dynamics
///
/// Writes velocity into the position slot, acceleration into the velocity
/// slot, and exactly `0.0` into mass and charge.
#[derive(Clone, Copy, Debug, Default)]
pub struct Gravitation {
    pub accumulation: Accumulation,
}

impl Gravitation {
    pub fn pairwise() -> Self {
        Self {
            accumulation: Accumulation::Pairwise,
        }
    }

    #[cfg(feature = "parallel")]
    pub fn parallel() -> Self {
        Self {
            accumulation: Accumulation::Parallel,
        }
    }
}

impl Dynamics<ParticleSystem> for Gravitation {
    fn derivative(&self, state: &ParticleSystem, out: &mut ParticleSystem) {
        debug_assert_eq!(state.len(), out.len());
        match self.accumulation {
            Accumulation::Pairwise => accumulate_pairwise(&state.bodies, &mut out.bodies),
            #[cfg(feature = "parallel")]
            Accumulation::Parallel => accumulate_parallel(&state.bodies, &mut out.bodies),
        }
    }
}

fn accumulate_pairwise(bodies: &[Body], out: &mut [Body]) {
    for d in out.iter_mut() {
        d.velocity = DVec3::ZERO;
    }

    let n = bodies.len();
    for i in 0..n {
        let p = &bodies[i];
        for j in (i + 1)..n {
            let a = &bodies[j];
            let f = gravitational_force(p, a);
            out[i].velocity += f / p.mass;
            out[j].velocity -= f / a.mass;
        }

        out[i].position = p.velocity;
        out[i].mass = 0.0;
        out[i].charge = 0.0;
    }
}

#[cfg(feature = "parallel")]
fn accumulate_parallel(bodies: &[Body], out: &mut [Body]) {
    use rayon::prelude::*;

    out.par_iter_mut().enumerate().for_each(|(i, d)| {
        let p = &bodies[i];
        let mut acceleration = DVec3::ZERO;
        for (j, a) in bodies.iter().enumerate() {
            if j != i {
                acceleration += gravitational_force(p, a) / p.mass;
            }
        }

        d.position = p.velocity;
        d.velocity = acceleration;
        d.mass = 0.0;
        d.charge = 0.0;
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair() -> ParticleSystem {
        ParticleSystem::new(vec![
            Body::new(DVec3::ZERO, DVec3::new(0.0, 1.0, 0.0), 1.0e10),
            Body::new(DVec3::new(1.0, 0.0, 0.0), DVec3::ZERO, 2.0e10).with_charge(1e-3),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_bad_mass() {
        let err = ParticleSystem::new(vec![
            Body::new(DVec3::ZERO, DVec3::ZERO, 1.0),
            Body::new(DVec3::X, DVec3::ZERO, 0.0),
        ])
        .unwrap_err();
        assert_eq!(err, StateError::NonPositiveMass { index: 1, mass: 0.0 });
    }

    #[test]
    fn test_rejects_coincident_bodies() {
        let err = ParticleSystem::new(vec![
            Body::new(DVec3::X, DVec3::ZERO, 1.0),
            Body::new(DVec3::Y, DVec3::ZERO, 1.0),
            Body::new(DVec3::X, DVec3::Z, 1.0),
        ])
        .unwrap_err();
        assert_eq!(err, StateError::CoincidentBodies { first: 0, second: 2 });
    }

    #[test]
    fn test_rejects_non_finite() {
        let err = ParticleSystem::new(vec![Body::new(DVec3::splat(f64::NAN), DVec3::ZERO, 1.0)])
            .unwrap_err();
        assert_eq!(err, StateError::NonFiniteBody { index: 0 });
    }

    #[test]
    fn test_derivative_layout() {
        let state = pair();
        let mut out = state.clone();
        Gravitation::default().derivative(&state, &mut out);

        assert_eq!(out.bodies[0].position, state.bodies[0].velocity);
        assert_eq!(out.bodies[1].position, state.bodies[1].velocity);
        for d in out.bodies() {
            assert_eq!(d.mass, 0.0);
            assert_eq!(d.charge, 0.0);
        }

        // Heavier partner pulls harder: a₀ = G·m₁/r²
        let a0 = out.bodies[0].velocity.x;
        let a1 = out.bodies[1].velocity.x;
        assert!(a0 > 0.0 && a1 < 0.0);
        assert!((a0 + 2.0 * a1).abs() < 1e-12 * a0.abs());
    }

    #[test]
    fn test_derivative_overwrites_stale_output() {
        let state = pair();
        let mut out = state.clone();
        out.scale(1.0e6);
        let mut fresh = state.clone();
        Gravitation::default().derivative(&state, &mut out);
        Gravitation::default().derivative(&state, &mut fresh);
        assert_eq!(out, fresh);
    }

    #[test]
    fn test_vector_ops_cover_every_field() {
        let mut s = pair();
        let t = pair();
        s.add(&t).scale(0.5);
        assert_eq!(s, t);
    }

    #[test]
    fn test_render_positions() {
        let s = pair();
        let p: Vec<Vec3> = s.render_positions(0.5).collect();
        assert_eq!(p, vec![Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0)]);
        let exact: Vec<DVec3> = s.positions().collect();
        assert_eq!(exact, vec![DVec3::ZERO, DVec3::X]);
        assert_eq!(s.as_flat().len(), 16);
    }

    #[test]
    fn test_assign_reuses_buffer() {
        let src = pair();
        let mut dst = pair();
        dst.scale(3.0);
        let buffer = dst.bodies().as_ptr();
        dst.assign(&src);
        assert_eq!(dst, src);
        assert_eq!(dst.bodies().as_ptr(), buffer);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_pairwise() {
        let state = ParticleSystem::new(
            (0..16)
                .map(|i| {
                    let t = i as f64;
                    Body::new(
                        DVec3::new(t.sin() * 3.0, t.cos() * 2.0, t * 0.1),
                        DVec3::new(0.0, t * 0.01, 0.0),
                        1.0e9 + t * 1.0e8,
                    )
                })
                .collect(),
        )
        .unwrap();
        let mut serial = state.clone();
        let mut parallel = state.clone();
        Gravitation::pairwise().derivative(&state, &mut serial);
        Gravitation::parallel().derivative(&state, &mut parallel);
        for (s, p) in serial.bodies().iter().zip(parallel.bodies()) {
            assert_eq!(s.position, p.position);
            assert!((s.velocity - p.velocity).length() <= 1e-12 * s.velocity.length());
        }
    }
}
