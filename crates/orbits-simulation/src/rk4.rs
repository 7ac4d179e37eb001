//! Classical fourth-order Runge-Kutta step
//!
//! ```text
//! K1 = f(Y)
//! K2 = f(Y + K1·dt/2)
//! K3 = f(Y + K2·dt/2)
//! K4 = f(Y + K3·dt)
//! Y  = Y + dt/6·(K1 + 2·K2 + 2·K3 + K4)
//! ```
//!
//! Fixed step, no error estimate. A step that is too coarse for the dynamics
//! simply produces an inaccurate state.

use crate::error::StateError;
use crate::state::{Dynamics, State};

/// Scratch buffers for one RK4 step: the four stage derivatives and one
/// accumulator `d` that holds each intermediate state in turn
///
/// Allocated once from a template state and reused for every step of any
/// state with the same shape.
#[derive(Clone, Debug)]
pub struct Rk4Workspace<S: State> {
    k1: S,
    k2: S,
    k3: S,
    k4: S,
    d: S,
    shape: S::Shape,
}

impl<S: State> Rk4Workspace<S> {
    /// Allocate buffers shaped like `template`
    pub fn new(template: &S) -> Self {
        let shape = template.shape();
        log::debug!("Allocating RK4 workspace for shape {:?}", shape);
        Self {
            k1: template.clone(),
            k2: template.clone(),
            k3: template.clone(),
            k4: template.clone(),
            d: template.clone(),
            shape,
        }
    }

    pub fn shape(&self) -> &S::Shape {
        &self.shape
    }

    pub fn matches(&self, state: &S) -> bool {
        self.shape == state.shape()
    }

    /// Confirm this workspace can step `state`
    pub fn check(&self, state: &S) -> Result<(), StateError> {
        if self.matches(state) {
            Ok(())
        } else {
            Err(StateError::ShapeMismatch {
                expected: format!("{:?}", self.shape),
                found: format!("{:?}", state.shape()),
            })
        }
    }

    /// The stage derivatives of the most recent step
    pub fn stages(&self) -> [&S; 4] {
        [&self.k1, &self.k2, &self.k3, &self.k4]
    }
}

/// Advance `y` by `dt` in place
///
/// The workspace must have been allocated for `y`'s shape; this is only
/// checked in debug builds, use [`Rk4Workspace::check`] beforehand.
pub fn step<S, D>(y: &mut S, model: &D, workspace: &mut Rk4Workspace<S>, dt: f64)
where
    S: State,
    D: Dynamics<S> + ?Sized,
{
    debug_assert!(workspace.matches(y), "RK4 workspace shape mismatch");

    let half_dt = 0.5 * dt;
    let Rk4Workspace {
        k1, k2, k3, k4, d, ..
    } = workspace;

    model.derivative(y, k1);

    d.assign(k1).scale(half_dt).add(y);
    model.derivative(d, k2);

    d.assign(k2).scale(half_dt).add(y);
    model.derivative(d, k3);

    d.assign(k3).scale(dt).add(y);
    model.derivative(d, k4);

    // dt/6·(K1 + 2·K2 + 2·K3 + K4)
    d.assign(k2).add(k3).scale(2.0).add(k1).add(k4).scale(dt / 6.0);
    y.add(d);
}
