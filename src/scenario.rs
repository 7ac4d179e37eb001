//! Scenario files and generated initial conditions
//!
//! A scenario lists bodies (explicitly, or as celestial bodies on the +x axis
//! moving along +z), optional links that turn it into a softbody, and the
//! timing used to drive it.
//!
//! ```yaml
//! time_scale: 100000.0
//! max_step: 3600.0
//! bodies:
//!   - name: Sun
//!     distance: 0.0
//!     speed: 0.0
//!     mass: 1.989e30
//!     diameter: 1.3927e9
//!   - position: [1.0e11, 0.0, 0.0]
//!     velocity: [0.0, 0.0, 3.0e4]
//!     mass: 6.0e24
//! links:
//!   - { start: 0, end: 1, spring: 10.0, damper: 0.1 }
//! ```

use glam::DVec3;
use orbits_physics::{Body, Link, LinkParams, G};
use orbits_simulation::{ParticleSystem, SimulationParams, Softbody, StateError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use std::fmt;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

fn default_time_scale() -> f64 {
    1.0
}

fn default_frame_dt() -> f64 {
    1.0 / 60.0
}

/// Top-level scenario file
#[derive(Deserialize, Debug)]
pub struct ScenarioConfig {
    /// Simulated seconds per wall-clock second
    #[serde(default = "default_time_scale")]
    pub time_scale: f64,
    /// Longest single integration step in simulated seconds
    #[serde(default)]
    pub max_step: Option<f64>,
    /// Wall-clock seconds per frame of the driver loop
    #[serde(default = "default_frame_dt")]
    pub frame_dt: f64,
    pub bodies: Vec<BodyConfig>,
    #[serde(default)]
    pub links: Vec<LinkConfig>,
}

/// Initial conditions of one body
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum BodyConfig {
    Explicit {
        #[serde(default)]
        name: Option<String>,
        position: [f64; 3],
        #[serde(default)]
        velocity: [f64; 3],
        mass: f64,
        #[serde(default)]
        charge: f64,
    },
    /// Starts at (distance, 0, 0) moving with (0, 0, speed)
    Celestial {
        name: String,
        distance: f64,
        speed: f64,
        mass: f64,
        /// Only used for display
        #[serde(default)]
        diameter: f64,
    },
}

impl BodyConfig {
    pub fn to_body(&self) -> Body {
        match *self {
            BodyConfig::Explicit {
                position,
                velocity,
                mass,
                charge,
                ..
            } => Body::new(DVec3::from_array(position), DVec3::from_array(velocity), mass)
                .with_charge(charge),
            BodyConfig::Celestial {
                distance,
                speed,
                mass,
                ..
            } => Body::new(
                DVec3::new(distance, 0.0, 0.0),
                DVec3::new(0.0, 0.0, speed),
                mass,
            ),
        }
    }

    pub fn name(&self, index: usize) -> String {
        match self {
            BodyConfig::Explicit { name: Some(n), .. } | BodyConfig::Celestial { name: n, .. } => {
                n.clone()
            }
            BodyConfig::Explicit { name: None, .. } => format!("body-{}", index),
        }
    }

    /// Display size, celestial bodies only
    pub fn diameter(&self) -> Option<f64> {
        match *self {
            BodyConfig::Celestial { diameter, .. } if diameter > 0.0 => Some(diameter),
            _ => None,
        }
    }
}

/// A damped spring between two bodies
#[derive(Deserialize, Debug, Clone)]
pub struct LinkConfig {
    pub start: usize,
    pub end: usize,
    /// Rest length; the initial distance between the bodies when omitted
    #[serde(default)]
    pub length: Option<f64>,
    pub spring: f64,
    #[serde(default)]
    pub damper: f64,
}

/// Errors that can occur while loading a scenario.
#[derive(Debug)]
pub enum ScenarioError {
    /// Failed to read the scenario file.
    Io(std::io::Error),
    /// The file is not a valid scenario document.
    Parse(serde_yaml::Error),
    /// The initial conditions violate the integrator's preconditions.
    State(StateError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::Io(e) => write!(f, "Failed to read scenario: {}", e),
            ScenarioError::Parse(e) => write!(f, "Failed to parse scenario: {}", e),
            ScenarioError::State(e) => write!(f, "Invalid initial conditions: {}", e),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScenarioError::Io(e) => Some(e),
            ScenarioError::Parse(e) => Some(e),
            ScenarioError::State(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ScenarioError {
    fn from(e: std::io::Error) -> Self {
        ScenarioError::Io(e)
    }
}

impl From<serde_yaml::Error> for ScenarioError {
    fn from(e: serde_yaml::Error) -> Self {
        ScenarioError::Parse(e)
    }
}

impl From<StateError> for ScenarioError {
    fn from(e: StateError) -> Self {
        ScenarioError::State(e)
    }
}

/// The state to integrate, picked by whether the scenario has links
#[derive(Debug)]
pub enum Initial {
    Particles(ParticleSystem),
    Softbody(Softbody),
}

/// A validated scenario ready to run
#[derive(Debug)]
pub struct Scenario {
    pub names: Vec<String>,
    pub params: SimulationParams,
    pub frame_dt: f64,
    pub initial: Initial,
}

impl ScenarioConfig {
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        Ok(serde_yaml::from_reader(reader)?)
    }

    pub fn build(self) -> Result<Scenario, ScenarioError> {
        let names: Vec<String> = self
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| b.name(i))
            .collect();
        for (name, body) in names.iter().zip(&self.bodies) {
            log::debug!("body {} (diameter {:?})", name, body.diameter());
        }
        let bodies: Vec<Body> = self.bodies.iter().map(BodyConfig::to_body).collect();

        let initial = if self.links.is_empty() {
            Initial::Particles(ParticleSystem::new(bodies)?)
        } else {
            let links = self
                .links
                .iter()
                .enumerate()
                .map(|(index, l)| {
                    let length = match l.length {
                        Some(length) => length,
                        None => match (bodies.get(l.start), bodies.get(l.end)) {
                            (Some(p), Some(a)) => (a.position - p.position).length(),
                            _ => {
                                return Err(StateError::LinkOutOfRange {
                                    link: index,
                                    body: l.start.max(l.end),
                                    len: bodies.len(),
                                })
                            }
                        },
                    };
                    Ok(Link::new(
                        l.start,
                        l.end,
                        LinkParams::new(length, l.spring, l.damper),
                    ))
                })
                .collect::<Result<Vec<_>, StateError>>()?;
            Initial::Softbody(Softbody::new(bodies, links)?)
        };

        let mut params = SimulationParams::default().with_time_scale(self.time_scale);
        params.max_step = self.max_step;

        Ok(Scenario {
            names,
            params,
            frame_dt: self.frame_dt,
            initial,
        })
    }
}

/// Mass of the central body of a generated disk (kg)
const DISK_CENTER_MASS: f64 = 1.0e15;
const DISK_INNER_RADIUS: f64 = 10.0;
const DISK_OUTER_RADIUS: f64 = 100.0;

/// A heavy central body orbited by `count` light bodies on near-circular,
/// slightly inclined orbits
pub fn random_disk(count: usize, seed: Option<u64>) -> Result<Scenario, ScenarioError> {
    let seed = seed.unwrap_or_else(rand::random);
    log::info!("Generating disk of {} bodies (seed {})", count, seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let mut bodies = Vec::with_capacity(count + 1);
    let mut names = Vec::with_capacity(count + 1);
    bodies.push(Body::new(DVec3::ZERO, DVec3::ZERO, DISK_CENTER_MASS));
    names.push("center".to_string());

    for i in 0..count {
        let angle = rng.random::<f64>() * std::f64::consts::TAU;
        let distance = rng.random_range(DISK_INNER_RADIUS..DISK_OUTER_RADIUS);
        let height = (rng.random::<f64>() - 0.5) * 0.05 * distance;

        let position = DVec3::new(angle.cos() * distance, height, angle.sin() * distance);

        let orbital_speed = (G * DISK_CENTER_MASS / distance).sqrt();
        let speed_var = 0.95 + rng.random::<f64>() * 0.1;
        let velocity = DVec3::new(-angle.sin(), 0.0, angle.cos()) * orbital_speed * speed_var;

        let mass = rng.random_range(1.0e3..1.0e6);
        bodies.push(Body::new(position, velocity, mass));
        names.push(format!("body-{}", i));
    }

    Ok(Scenario {
        names,
        params: SimulationParams::default().with_max_step(1.0e-3),
        frame_dt: default_frame_dt(),
        initial: Initial::Particles(ParticleSystem::new(bodies)?),
    })
}
