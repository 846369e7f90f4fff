//! Controller-specific error types.
//!
//! The whole error taxonomy here is "missing precondition": a command arrived
//! before the thing it needs exists, or a tunable left its safe range.  None
//! of these abort the app — callers log the diagnostic and degrade to a no-op
//! or a clamped value.

use std::fmt;

use crate::constants::{
    BALL_RADIUS_MAX, BALL_RADIUS_MIN, DROP_HEIGHT_MAX, DROP_HEIGHT_MIN, HIT_FORCE_MAX,
    HIT_FORCE_MIN,
};

/// Top-level error enum for the ball lifecycle controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BallError {
    /// A command needing the physics root arrived before scene setup ran.
    /// Expected during the race between UI readiness and scene readiness;
    /// the command is dropped, not queued.
    SceneNotReady {
        /// Human-readable description of which operation was attempted.
        context: &'static str,
    },

    /// A tunable parameter is outside its safe operating range.
    /// Returned by the validation helpers; callers clamp and continue.
    UnsafeParameter {
        /// Name of the parameter (for logging).
        name: &'static str,
        /// The value that was rejected.
        value: f32,
        /// Human-readable description of the safe range.
        safe_range: &'static str,
    },
}

impl fmt::Display for BallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BallError::SceneNotReady { context } => {
                write!(f, "physics scene not ready during '{}'", context)
            }
            BallError::UnsafeParameter {
                name,
                value,
                safe_range,
            } => write!(
                f,
                "parameter '{}' = {} is outside safe range {}",
                name, value, safe_range
            ),
        }
    }
}

impl std::error::Error for BallError {}

/// Convenience alias: a `Result` using `BallError` as the error type.
pub type BallResult<T> = Result<T, BallError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error if `radius` is outside the supported ball size range.
pub fn validate_radius(value: f32) -> BallResult<()> {
    if !(BALL_RADIUS_MIN..=BALL_RADIUS_MAX).contains(&value) {
        Err(BallError::UnsafeParameter {
            name: "ball_radius",
            value,
            safe_range: "[0.02, 0.2] m",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if a friction/damping parameter leaves the unit interval.
pub fn validate_fraction(name: &'static str, value: f32) -> BallResult<()> {
    if !(0.0..=1.0).contains(&value) {
        Err(BallError::UnsafeParameter {
            name,
            value,
            safe_range: "[0, 1]",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `drop_height` is outside the supported range.
pub fn validate_drop_height(value: f32) -> BallResult<()> {
    if !(DROP_HEIGHT_MIN..=DROP_HEIGHT_MAX).contains(&value) {
        Err(BallError::UnsafeParameter {
            name: "drop_height",
            value,
            safe_range: "[0.1, 2.0] m",
        })
    } else {
        Ok(())
    }
}

/// Returns an error if `hit_force` is outside the supported range.
pub fn validate_hit_force(value: f32) -> BallResult<()> {
    if !(HIT_FORCE_MIN..=HIT_FORCE_MAX).contains(&value) {
        Err(BallError::UnsafeParameter {
            name: "hit_force",
            value,
            safe_range: "[10, 100] N",
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn radius_bounds_are_inclusive() {
        assert!(validate_radius(BALL_RADIUS_MIN).is_ok());
        assert!(validate_radius(BALL_RADIUS_MAX).is_ok());
        assert!(validate_radius(0.05).is_ok());
        assert!(validate_radius(0.019).is_err());
        assert!(validate_radius(0.21).is_err());
    }

    #[test]
    fn fraction_rejects_values_outside_unit_interval() {
        assert!(validate_fraction("linear_damping", 0.0).is_ok());
        assert!(validate_fraction("linear_damping", 1.0).is_ok());
        assert!(validate_fraction("linear_damping", -0.01).is_err());
        assert!(validate_fraction("linear_damping", 1.5).is_err());
    }

    #[test]
    fn unsafe_parameter_display_names_the_offender() {
        let err = validate_hit_force(250.0).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("hit_force"), "got: {msg}");
        assert!(msg.contains("250"), "got: {msg}");
    }

    #[test]
    fn drop_height_range_matches_panel_limits() {
        assert!(validate_drop_height(DROP_HEIGHT_MIN).is_ok());
        assert!(validate_drop_height(DROP_HEIGHT_MAX).is_ok());
        assert!(validate_drop_height(2.5).is_err());
    }
}
