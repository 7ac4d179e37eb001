//! Runtime parameters for driving a simulation from wall-clock time

/// Maps elapsed wall-clock time onto simulated time
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationParams {
    /// Simulated seconds per wall-clock second
    pub time_scale: f64,
    /// Longest single RK4 step; longer advances are split evenly
    pub max_step: Option<f64>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            max_step: None,
        }
    }
}

impl SimulationParams {
    pub fn with_time_scale(mut self, time_scale: f64) -> Self {
        self.time_scale = time_scale;
        self
    }

    pub fn with_max_step(mut self, max_step: f64) -> Self {
        self.max_step = Some(max_step);
        self
    }

    /// Number of equal sub-steps and their length for `elapsed` wall-clock
    /// seconds. Always at least one step.
    pub fn substeps(&self, elapsed: f64) -> (u32, f64) {
        let dt = elapsed * self.time_scale;
        match self.max_step {
            Some(max) if max > 0.0 && dt.is_finite() && dt.abs() > max => {
                let n = (dt.abs() / max).ceil().min(u32::MAX as f64) as u32;
                (n, dt / n as f64)
            }
            _ => (1, dt),
        }
    }
}
