//! # Orbits Physics
//!
//! Point masses, elastic links, and the pairwise force laws (gravitation with
//! an electrostatic term, damped springs) that drive the N-body integrator.

pub mod body;
pub mod constants;
pub mod forces;

pub use body::*;
pub use constants::*;
pub use forces::*;
