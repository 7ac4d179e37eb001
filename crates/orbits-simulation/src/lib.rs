//! # Orbits Simulation
//!
//! Fixed-step fourth-order Runge-Kutta integration of N-body systems.
//!
//! A container ([`ParticleSystem`], [`Softbody`]) implements [`State`], the
//! add/scale algebra RK4 needs, and is paired with a derivative function
//! ([`Dynamics`]). [`Simulation`] owns both together with a preallocated
//! [`Rk4Workspace`], so stepping never allocates.

pub mod diagnostics;
pub mod error;
pub mod params;
pub mod particle_system;
pub mod rk4;
pub mod simulation;
pub mod softbody;
pub mod state;
pub mod trail;

pub use diagnostics::*;
pub use error::*;
pub use params::*;
pub use particle_system::*;
pub use rk4::*;
pub use simulation::*;
pub use softbody::*;
pub use state::*;
pub use trail::*;
