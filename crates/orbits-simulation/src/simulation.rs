//! Owns a live state together with its derivative function and workspace

use crate::params::SimulationParams;
use crate::particle_system::{Gravitation, ParticleSystem};
use crate::rk4::{self, Rk4Workspace};
use crate::softbody::{Softbody, SpringNetwork};
use crate::state::{Dynamics, State, System};

pub type ParticleSimulation = Simulation<ParticleSystem, Gravitation>;
pub type SoftbodySimulation = Simulation<Softbody, SpringNetwork>;

/// A state advanced in place by fixed RK4 steps
///
/// The workspace is allocated from the state at construction and the state is
/// only reachable read-only afterwards, so the two can never disagree in shape.
pub struct Simulation<S: State, D> {
    state: S,
    model: D,
    workspace: Rk4Workspace<S>,
    elapsed: f64,
    steps: u64,
}

impl<S: System> Simulation<S, S::Model> {
    /// Simulate `state` under its canonical dynamics
    pub fn new(state: S) -> Self {
        Self::with_model(state, S::Model::default())
    }
}

impl<S: State, D: Dynamics<S>> Simulation<S, D> {
    pub fn with_model(state: S, model: D) -> Self {
        let workspace = Rk4Workspace::new(&state);
        log::debug!("Simulation created for shape {:?}", state.shape());
        Self {
            state,
            model,
            workspace,
            elapsed: 0.0,
            steps: 0,
        }
    }

    /// Advance by one RK4 step of `dt` simulated seconds
    pub fn step(&mut self, dt: f64) {
        rk4::step(&mut self.state, &self.model, &mut self.workspace, dt);
        self.elapsed += dt;
        self.steps += 1;
        log::trace!("step {} dt={} t={}", self.steps, dt, self.elapsed);
    }

    /// Advance by `elapsed` wall-clock seconds scaled by `params`
    ///
    /// Returns the number of RK4 steps taken.
    pub fn advance(&mut self, elapsed: f64, params: &SimulationParams) -> u32 {
        let (n, dt) = params.substeps(elapsed);
        for _ in 0..n {
            self.step(dt);
        }
        n
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn model(&self) -> &D {
        &self.model
    }

    /// Simulated time since construction
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn into_state(self) -> S {
        self.state
    }
}
