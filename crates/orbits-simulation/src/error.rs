//! Validation errors for integrable states
//!
//! The integrator itself never fails: bad input produces NaN/∞ rather than an
//! error. These errors are raised when a state is built or a workspace is
//! checked, before any step runs.

use std::fmt;

/// A state or workspace that violates the integrator's preconditions
#[derive(Debug, Clone, PartialEq)]
pub enum StateError {
    /// Body mass is zero, negative or NaN.
    NonPositiveMass { index: usize, mass: f64 },
    /// Body has a non-finite position, velocity, mass or charge.
    NonFiniteBody { index: usize },
    /// Two bodies that interact share the same position.
    CoincidentBodies { first: usize, second: usize },
    /// Link connects a body to itself.
    SelfLink { link: usize, body: usize },
    /// Link references a body index past the end of the body list.
    LinkOutOfRange { link: usize, body: usize, len: usize },
    /// Link has a negative or non-finite rest length, spring or damper constant.
    InvalidLinkParams { link: usize },
    /// Workspace buffers were allocated for a differently shaped state.
    ShapeMismatch { expected: String, found: String },
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NonPositiveMass { index, mass } => {
                write!(f, "body {} has non-positive mass {}", index, mass)
            }
            StateError::NonFiniteBody { index } => {
                write!(f, "body {} has a non-finite component", index)
            }
            StateError::CoincidentBodies { first, second } => {
                write!(f, "bodies {} and {} share the same position", first, second)
            }
            StateError::SelfLink { link, body } => {
                write!(f, "link {} connects body {} to itself", link, body)
            }
            StateError::LinkOutOfRange { link, body, len } => write!(
                f,
                "link {} references body {} but only {} bodies exist",
                link, body, len
            ),
            StateError::InvalidLinkParams { link } => write!(
                f,
                "link {} needs finite, non-negative length, spring and damper constants",
                link
            ),
            StateError::ShapeMismatch { expected, found } => write!(
                f,
                "workspace allocated for shape {} but state has shape {}",
                expected, found
            ),
        }
    }
}

impl std::error::Error for StateError {}
