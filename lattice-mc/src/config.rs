use validator::{Validate, ValidationError};

/// Order in which one sweep visits sites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SweepPolicy {
    /// `n_sites` independent uniform site picks from one seeded stream.
    #[default]
    Random,
    /// Parity colors in order, raster order within a color, one seeded
    /// stream per (sweep, site). Colors run on rayon when independent.
    Checkerboard,
}

impl TryFrom<&str> for SweepPolicy {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "random" => Ok(Self::Random),
            "checkerboard" => Ok(Self::Checkerboard),
            _ => Err(format!(
                "unknown sweep policy '{s}', expected 'random' or 'checkerboard'"
            )),
        }
    }
}

fn validate_update_config(cfg: &UpdateConfig) -> Result<(), ValidationError> {
    if !cfg.temperature.is_finite() || cfg.temperature < 0.0 {
        return Err(ValidationError::new("temperature must be finite and >= 0"));
    }
    if !cfg.coupling.is_finite() {
        return Err(ValidationError::new("coupling must be finite"));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_update_config"))]
pub struct UpdateConfig {
    /// kT in units of the interaction energy. Zero means greedy descent.
    pub temperature: f64,
    /// Heisenberg exchange constant J; ignored by the Potts model.
    pub coupling: f64,
    pub seed: u64,
    pub policy: SweepPolicy,
    /// Keep checkerboard colors on the current thread.
    pub sequential: bool,
}

impl UpdateConfig {
    pub fn new(temperature: f64) -> Self {
        Self {
            temperature,
            coupling: 1.0,
            seed: 42,
            policy: SweepPolicy::Random,
            sequential: false,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_policy(mut self, policy: SweepPolicy) -> Self {
        self.policy = policy;
        self
    }
}
