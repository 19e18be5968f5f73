/// Rejected filter configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("sample rate must be positive and finite, got {0} Hz")]
    InvalidSampleRate(f32),

    #[error("gain `{name}` must be non-negative and finite, got {value}")]
    InvalidGain { name: &'static str, value: f32 },

    #[error("unknown algorithm, expected `Madgwick` or `Mahony`")]
    UnknownAlgorithm,
}
