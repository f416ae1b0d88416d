//! Simulation-specific error types.
//!
//! The per-tick hot path never fails: pool exhaustion, empty queries and
//! zero-length vectors are handled by policy.  Errors only surface while
//! building a [`crate::engine::Simulation`] or loading configuration,
//! where a bad value would otherwise silently produce an unplayable level.
//!
//! ## Usage
//!
//! ```rust
//! use scrubdown::error::{validate_cell_size, SimResult};
//!
//! fn build_grid(cell_size: f32) -> SimResult<()> {
//!     validate_cell_size("SPATIAL_CELL_SIZE", cell_size)?;
//!     Ok(())
//! }
//! assert!(build_grid(32.0).is_ok());
//! assert!(build_grid(0.0).is_err());
//! ```

use std::fmt;

/// Top-level error enum for the cleaning simulation.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// A configuration constant is outside its safe operating range.
    UnsafeConstant {
        /// Name of the constant (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },

    /// The particle pool was asked for zero slots.
    ZeroCapacity,

    /// The object rectangle has a non-positive or non-finite extent.
    InvalidBounds {
        width: f32,
        height: f32,
    },

    /// `assets/cleaning.toml` exists but could not be parsed.
    ConfigParse {
        /// Parser message, including line/column when available.
        message: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnsafeConstant {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "constant '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
            SimError::ZeroCapacity => write!(f, "particle pool capacity must be at least 1"),
            SimError::InvalidBounds { width, height } => write!(
                f,
                "object bounds {}×{} must be finite and strictly positive",
                width, height
            ),
            SimError::ConfigParse { message } => {
                write!(f, "failed to parse cleaning config: {}", message)
            }
        }
    }
}

impl std::error::Error for SimError {}

impl From<toml::de::Error> for SimError {
    fn from(err: toml::de::Error) -> Self {
        SimError::ConfigParse {
            message: err.to_string(),
        }
    }
}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if a grid cell size is not strictly positive and finite.
///
/// A zero cell size turns every `floor(pos / cell)` into ±∞.
pub fn validate_cell_size(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if the completion threshold is outside `(0, 1]`.
///
/// A threshold of 0 would complete the level on the first tick.
pub fn validate_threshold(value: f32) -> SimResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name: "COMPLETION_THRESHOLD",
            value,
            safe_range: "(0.0, 1.0]",
        })
    }
}

/// Returns an error if a probability is outside `[0, 1]`.
pub fn validate_probability(name: &'static str, value: f32) -> SimResult<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "[0.0, 1.0]",
        })
    }
}

/// Returns an error if a tool reach (radius, range, width) is not strictly
/// positive and finite.
///
/// Spatial queries sweep every cell inside the reach, so an infinite reach
/// would never finish.
pub fn validate_reach(name: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::UnsafeConstant {
            name,
            value,
            safe_range: "(0.0, ∞)",
        })
    }
}

/// Returns an error if the rectangle is degenerate.
pub fn validate_bounds(width: f32, height: f32) -> SimResult<()> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidBounds { width, height })
    }
}
