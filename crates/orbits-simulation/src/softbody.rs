//! Point masses joined by damped springs
//!
//! Topology is a plain list of index pairs fixed at construction. Only the
//! forces along the links change from step to step.

use crate::error::StateError;
use crate::particle_system::validate_bodies;
use crate::state::{Dynamics, State, System};
use glam::DVec3;
use orbits_physics::{bodies_as_flat, damped_spring_force, Body, Link, LinkParams};

/// Body and link counts of a softbody
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SoftbodyShape {
    pub bodies: usize,
    pub links: usize,
}

/// Bodies plus the elastic links between them
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Softbody {
    bodies: Vec<Body>,
    links: Vec<Link>,
}

impl Softbody {
    /// Build a softbody, rejecting invalid bodies, self links, dangling
    /// indices, bad link parameters, and linked bodies that coincide
    pub fn new(bodies: Vec<Body>, links: Vec<Link>) -> Result<Self, StateError> {
        validate_bodies(&bodies)?;
        for (index, link) in links.iter().enumerate() {
            let (start, end) = link.endpoints();
            if start == end {
                return Err(StateError::SelfLink {
                    link: index,
                    body: start,
                });
            }
            if end >= bodies.len() {
                return Err(StateError::LinkOutOfRange {
                    link: index,
                    body: end,
                    len: bodies.len(),
                });
            }
            let LinkParams {
                length,
                spring,
                damper,
            } = link.params;
            if !link.params.is_finite() || length < 0.0 || spring < 0.0 || damper < 0.0 {
                return Err(StateError::InvalidLinkParams { link: index });
            }
            if bodies[start].position == bodies[end].position {
                return Err(StateError::CoincidentBodies {
                    first: start,
                    second: end,
                });
            }
        }
        Ok(Self { bodies, links })
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, index: usize) -> Option<&Body> {
        self.bodies.get(index)
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    pub fn positions(&self) -> impl Iterator<Item = DVec3> + '_ {
        self.bodies.iter().map(|b| b.position)
    }

    pub fn as_flat(&self) -> &[f64] {
        bodies_as_flat(&self.bodies)
    }
}

impl State for Softbody {
    type Shape = SoftbodyShape;

    fn shape(&self) -> SoftbodyShape {
        SoftbodyShape {
            bodies: self.bodies.len(),
            links: self.links.len(),
        }
    }

    // Link endpoints are topology, not state; only the parameters take part
    fn add(&mut self, rhs: &Self) -> &mut Self {
        for (b, r) in self.bodies.iter_mut().zip(&rhs.bodies) {
            b.add_assign(r);
        }
        for (l, r) in self.links.iter_mut().zip(&rhs.links) {
            l.params.add_assign(&r.params);
        }
        self
    }

    fn scale(&mut self, c: f64) -> &mut Self {
        for b in self.bodies.iter_mut() {
            b.scale(c);
        }
        for l in self.links.iter_mut() {
            l.params.scale(c);
        }
        self
    }

    // Same topology means only bodies and link parameters need copying
    fn assign(&mut self, src: &Self) -> &mut Self {
        if self.shape() == src.shape() {
            self.bodies.copy_from_slice(&src.bodies);
            for (l, r) in self.links.iter_mut().zip(&src.links) {
                l.params = r.params;
            }
        } else {
            self.bodies.clone_from(&src.bodies);
            self.links.clone_from(&src.links);
        }
        self
    }
}

impl System for Softbody {
    type Model = SpringNetwork;
}

/// Damped-spring dynamics along existing links only
///
/// O(links) per evaluation. Bodies feel no gravity; link parameters have a
/// zero derivative.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpringNetwork;

impl Dynamics<Softbody> for SpringNetwork {
    fn derivative(&self, state: &Softbody, out: &mut Softbody) {
        debug_assert_eq!(state.shape(), out.shape());
        let Softbody {
            bodies: d_bodies,
            links: d_links,
        } = out;

        for (d, b) in d_bodies.iter_mut().zip(&state.bodies) {
            d.position = b.velocity;
            d.velocity = DVec3::ZERO;
            d.mass = 0.0;
            d.charge = 0.0;
        }

        for (link, d) in state.links.iter().zip(d_links.iter_mut()) {
            let (i, j) = link.endpoints();
            let p = &state.bodies[i];
            let a = &state.bodies[j];
            let f = damped_spring_force(p, a, &link.params);
            d_bodies[i].velocity += f / p.mass;
            d_bodies[j].velocity -= f / a.mass;

            d.params = LinkParams::default();
        }
    }
}
