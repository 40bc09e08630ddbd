/// Opaque error produced by external collaborators (camera, motor driver).
pub type DriverError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Configuration validation errors, detected once at startup.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("frame width must be positive")]
    ZeroFrameWidth,
    #[error("desired radius must be positive")]
    ZeroDesiredRadius,
    #[error("{name} must be non-negative (got {value})")]
    NegativeParameter { name: &'static str, value: f32 },
    #[error("{name} must be positive (got {value})")]
    NonPositiveParameter { name: &'static str, value: f32 },
    #[error("smoothing alpha must be in (0, 1] (got {0})")]
    AlphaOutOfRange(f32),
    #[error("arrived-area window is inverted (low={low}, high={high})")]
    InvertedAreaWindow { low: u32, high: u32 },
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors surfaced by the follow loop.
#[derive(thiserror::Error, Debug)]
pub enum FollowError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("camera source failed")]
    Camera(#[source] DriverError),
    #[error("motor driver failed")]
    Motor(#[source] DriverError),
}
