//! Physical constants in SI units

/// Gravitational constant (m³ kg⁻¹ s⁻²)
pub const G: f64 = 6.6743015e-11;

/// Vacuum permittivity ε₀ (F m⁻¹)
pub const EPS0: f64 = 8.8541878128e-12;

/// Coulomb constant k = 1/(4πε₀)
pub const K_ELECTRIC: f64 = 1.0 / (4.0 * std::f64::consts::PI * EPS0);

/// Number of `f64` slots one body occupies in the flat packing
/// (position, velocity, mass, charge)
pub const BODY_STRIDE: usize = 8;
