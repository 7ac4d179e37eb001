//! The algebra a state must support to be integrated, and the derivative
//! functions that act on it

use glam::DVec3;
use std::fmt;

/// A fixed-shape aggregate that forms a vector space over `f64`
///
/// `add` and `scale` must touch every scalar field, including ones that are
/// physically constant (mass, charge, link parameters). Derivative functions
/// keep those fields fixed by writing exactly `0.0` into their slots.
///
/// Both operations write into `self` and return it, so intermediate states
/// chain without temporaries: `d.assign(k).scale(h).add(y)`.
pub trait State: Clone {
    /// Whatever must agree between two states for `add` to be meaningful
    type Shape: Clone + PartialEq + fmt::Debug;

    fn shape(&self) -> Self::Shape;

    /// Componentwise `self += rhs`
    fn add(&mut self, rhs: &Self) -> &mut Self;

    /// Componentwise `self *= c`
    fn scale(&mut self, c: f64) -> &mut Self;

    /// Overwrite `self` with `src`, reusing existing storage
    ///
    /// The default goes through `clone_from`, which a derived `Clone` turns
    /// into a fresh clone. States that own heap buffers override this.
    fn assign(&mut self, src: &Self) -> &mut Self {
        self.clone_from(src);
        self
    }
}

/// A derivative function `state → d(state)/dt`
///
/// `out` has the same shape as `state` and holds stale data on entry; every
/// slot must be written.
pub trait Dynamics<S: State> {
    fn derivative(&self, state: &S, out: &mut S);
}

impl<S: State, F: Fn(&S, &mut S)> Dynamics<S> for F {
    fn derivative(&self, state: &S, out: &mut S) {
        self(state, out)
    }
}

/// A state with a canonical derivative function
pub trait System: State {
    type Model: Dynamics<Self> + Default;
}

impl State for f64 {
    type Shape = ();

    fn shape(&self) -> Self::Shape {}

    fn add(&mut self, rhs: &Self) -> &mut Self {
        *self += rhs;
        self
    }

    fn scale(&mut self, c: f64) -> &mut Self {
        *self *= c;
        self
    }
}

impl State for DVec3 {
    type Shape = ();

    fn shape(&self) -> Self::Shape {}

    fn add(&mut self, rhs: &Self) -> &mut Self {
        *self += *rhs;
        self
    }

    fn scale(&mut self, c: f64) -> &mut Self {
        *self *= c;
        self
    }
}
