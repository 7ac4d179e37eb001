//! Bounded position history of one body, for trail plotting

use glam::{DVec3, Vec3};
use orbits_physics::Body;
use std::collections::VecDeque;

/// The last `capacity` positions of a body, scaled into render space
#[derive(Clone, Debug)]
pub struct Trail {
    body: usize,
    capacity: usize,
    scale: f64,
    points: VecDeque<Vec3>,
}

impl Trail {
    pub fn new(body: usize, capacity: usize, scale: f64) -> Self {
        Self {
            body,
            capacity,
            scale,
            points: VecDeque::with_capacity(capacity),
        }
    }

    /// Index of the followed body
    pub fn body(&self) -> usize {
        self.body
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Append a position, dropping the oldest once full
    pub fn record(&mut self, position: DVec3) {
        if self.capacity == 0 {
            return;
        }
        if self.points.len() == self.capacity {
            self.points.pop_front();
        }
        self.points.push_back((position * self.scale).as_vec3());
    }

    /// Record the followed body out of `bodies`; false if the index is out of range
    pub fn record_from(&mut self, bodies: &[Body]) -> bool {
        match bodies.get(self.body) {
            Some(b) => {
                self.record(b.position);
                true
            }
            None => false,
        }
    }

    /// Oldest first
    pub fn points(&self) -> impl Iterator<Item = &Vec3> {
        self.points.iter()
    }

    /// Opacity for the point at `index`, fading from 0 at the tail end
    pub fn fade(&self, index: usize) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        index as f32 / self.capacity as f32
    }

    pub fn latest(&self) -> Option<&Vec3> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}
