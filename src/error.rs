//! Error types for scene setup.
//!
//! Only the setup path can fail: wind, gust, force-source and placement
//! parameters are validated once when a scene is built. The per-frame
//! simulation never returns errors.

use std::fmt;

/// Errors raised while validating or loading scene configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// A parameter that must be `>= 0` was negative (or NaN).
    NegativeValue { field: &'static str, value: f32 },
    /// A parameter that must be `> 0` was zero, negative or NaN.
    NonPositiveValue { field: &'static str, value: f32 },
    /// A parameter was infinite.
    NonFinite { field: &'static str },
    /// A parameter exceeded the largest value a scene supports.
    TooLarge { field: &'static str, value: f64, max: f64 },
    /// The wind direction vector had zero length.
    ZeroDirection,
    /// A placement area has zero (or negative) area.
    EmptyArea { index: usize },
    /// Instances were requested but no placement areas were given.
    NoAreas,
    /// A deformable grid needs at least 2 rows and 2 columns.
    InvalidGrid { rows: usize, cols: usize },
    /// Fade-in plus fade-out exceed the gust duration.
    InvalidEnvelope { fade_in: f32, fade_out: f32, duration: f32 },
    /// Pivot components must lie within `[0, 1]`.
    InvalidPivot { x: f32, y: f32 },
    /// Deformable grids bend from their bottom row, so their pivot must sit there.
    GridPivotNotAtBase { y: f32 },
    /// Failed to read a configuration file.
    Io(std::io::Error),
    /// Failed to parse a configuration file.
    Parse(serde_json::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NegativeValue { field, value } => {
                write!(f, "{} must be non-negative, got {}", field, value)
            }
            ConfigError::NonPositiveValue { field, value } => {
                write!(f, "{} must be greater than zero, got {}", field, value)
            }
            ConfigError::NonFinite { field } => write!(f, "{} must be finite", field),
            ConfigError::TooLarge { field, value, max } => {
                write!(f, "{} is too large: {} (at most {})", field, value, max)
            }
            ConfigError::ZeroDirection => write!(f, "Wind direction must not be a zero vector"),
            ConfigError::EmptyArea { index } => {
                write!(f, "Placement area #{} has zero area (needs x1 < x2 and y1 < y2)", index)
            }
            ConfigError::NoAreas => {
                write!(f, "Vegetation was requested but no placement areas were configured")
            }
            ConfigError::InvalidGrid { rows, cols } => write!(
                f,
                "Deformable grid must be at least 2x2, got {}x{}",
                rows, cols
            ),
            ConfigError::InvalidEnvelope { fade_in, fade_out, duration } => write!(
                f,
                "Gust fade-in ({}) plus fade-out ({}) exceed its duration ({})",
                fade_in, fade_out, duration
            ),
            ConfigError::InvalidPivot { x, y } => {
                write!(f, "Pivot ({}, {}) must lie within [0, 1] on both axes", x, y)
            }
            ConfigError::GridPivotNotAtBase { y } => write!(
                f,
                "Deformable grid pivot must be on the bottom edge (y = 1.0), got y = {}",
                y
            ),
            ConfigError::Io(e) => write!(f, "Failed to read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "Failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(e) => Some(e),
            ConfigError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Rejects negative, NaN and infinite values.
pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_infinite() {
        Err(ConfigError::NonFinite { field })
    } else if value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NegativeValue { field, value })
    }
}

/// Rejects zero, negative, NaN and infinite values.
pub(crate) fn positive(field: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_infinite() {
        Err(ConfigError::NonFinite { field })
    } else if value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::NonPositiveValue { field, value })
    }
}

/// Rejects counts above `max`.
pub(crate) fn at_most(field: &'static str, value: usize, max: usize) -> Result<usize, ConfigError> {
    if value <= max {
        Ok(value)
    } else {
        Err(ConfigError::TooLarge { field, value: value as f64, max: max as f64 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_negative_accepts_zero() {
        assert_eq!(non_negative("force", 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_non_negative_rejects_nan() {
        assert!(non_negative("force", f32::NAN).is_err());
    }

    #[test]
    fn test_positive_rejects_zero() {
        let err = positive("radius", 0.0).unwrap_err();
        assert!(err.to_string().contains("radius"));
    }

    #[test]
    fn test_infinity_rejected() {
        assert!(matches!(
            non_negative("force", f32::INFINITY),
            Err(ConfigError::NonFinite { field: "force" })
        ));
        assert!(matches!(
            positive("radius", f32::INFINITY),
            Err(ConfigError::NonFinite { .. })
        ));
    }

    #[test]
    fn test_at_most() {
        assert_eq!(at_most("rows", 8, 8).unwrap(), 8);
        assert!(matches!(at_most("rows", 9, 8), Err(ConfigError::TooLarge { .. })));
    }
}
