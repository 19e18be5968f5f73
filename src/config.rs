use core::fmt;
use core::str::FromStr;
use core::time::Duration;

use crate::error::ConfigError;
use crate::madgwick::MadgwickParams;
use crate::mahony::MahonyParams;

/// Correction law used by an [`Estimator`](crate::Estimator).
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    #[default]
    Madgwick,
    Mahony,
}

impl Algorithm {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Algorithm::Madgwick => "Madgwick",
            Algorithm::Mahony => "Mahony",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ConfigError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        if tag.eq_ignore_ascii_case("madgwick") {
            Ok(Algorithm::Madgwick)
        } else if tag.eq_ignore_ascii_case("mahony") {
            Ok(Algorithm::Mahony)
        } else {
            Err(ConfigError::UnknownAlgorithm)
        }
    }
}

/// Estimator configuration. Fixed once the estimator is built.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FilterConfig {
    /// Rate used to derive `dt` for samples that carry no elapsed time.
    pub sample_rate_hz: f32,
    pub algorithm: Algorithm,
    /// Madgwick gain; ignored by Mahony.
    pub beta: f32,
    /// Mahony proportional gain; ignored by Madgwick.
    pub kp: f32,
    /// Mahony integral gain; ignored by Madgwick.
    pub ki: f32,
    /// Align directly to the first usable accelerometer (and magnetometer)
    /// reading instead of converging from identity.
    pub initialize_from_first_sample: bool,
}

impl Default for FilterConfig {
    fn default() -> Self {
        let madgwick = MadgwickParams::default();
        let mahony = MahonyParams::default();
        Self {
            sample_rate_hz: 20.0,
            algorithm: Algorithm::default(),
            beta: madgwick.beta,
            kp: mahony.kp,
            ki: mahony.ki,
            initialize_from_first_sample: false,
        }
    }
}

impl FilterConfig {
    pub fn with_sample_rate_hz(mut self, sample_rate_hz: f32) -> Self {
        self.sample_rate_hz = sample_rate_hz;
        self
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_beta(mut self, beta: f32) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_kp(mut self, kp: f32) -> Self {
        self.kp = kp;
        self
    }

    pub fn with_ki(mut self, ki: f32) -> Self {
        self.ki = ki;
        self
    }

    pub fn with_initialize_from_first_sample(mut self, enabled: bool) -> Self {
        self.initialize_from_first_sample = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        // The period must also fit in a `Duration`.
        if Duration::try_from_secs_f32(self.sample_period()).is_err() {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate_hz));
        }
        for (name, value) in [("beta", self.beta), ("kp", self.kp), ("ki", self.ki)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::InvalidGain { name, value });
            }
        }
        Ok(())
    }

    /// `1 / sample_rate_hz`, in seconds.
    pub fn sample_period(&self) -> f32 {
        1.0 / self.sample_rate_hz
    }

    pub(crate) fn sample_duration(&self) -> Duration {
        Duration::from_secs_f32(self.sample_period())
    }

    pub fn madgwick_params(&self) -> MadgwickParams {
        MadgwickParams { beta: self.beta }
    }

    pub fn mahony_params(&self) -> MahonyParams {
        MahonyParams {
            kp: self.kp,
            ki: self.ki,
        }
    }
}
