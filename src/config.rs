//! Runtime configuration loaded from `assets/bouncyball.toml`.
//!
//! [`PhysicsConfig`] is a Bevy [`Resource`] that mirrors the user-facing
//! constants in [`crate::constants`].  At startup, [`load_physics_config`]
//! reads `assets/bouncyball.toml` and overwrites the defaults with any values
//! present in the file.  Missing keys fall back to the compile-time defaults,
//! so a minimal TOML can override just the values you care about.
//!
//! ## Usage in systems
//!
//! Add `config: Res<PhysicsConfig>` to any system parameter list and read
//! values with `config.drop_height`, `config.ground_friction`, etc.
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `PhysicsConfig::default()`.

use bevy::prelude::*;
use serde::Deserialize;

use crate::constants::*;
use crate::error::{validate_drop_height, validate_fraction, validate_hit_force, validate_radius};

/// Runtime-tunable configuration: initial slider values and ground material.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.  Override any subset by setting the value in
/// `assets/bouncyball.toml`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    // ── Initial panel values ─────────────────────────────────────────────────
    pub drop_height: f32,
    pub ball_radius: f32,
    pub hit_force: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub static_friction: f32,
    pub dynamic_friction: f32,

    // ── Ground material ──────────────────────────────────────────────────────
    pub ground_half_extent: f32,
    pub ground_friction: f32,
    pub ground_restitution: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            // Initial panel values
            drop_height: DROP_HEIGHT_DEFAULT,
            ball_radius: BALL_RADIUS_DEFAULT,
            hit_force: HIT_FORCE_DEFAULT,
            linear_damping: LINEAR_DAMPING_DEFAULT,
            angular_damping: ANGULAR_DAMPING_DEFAULT,
            static_friction: STATIC_FRICTION_DEFAULT,
            dynamic_friction: DYNAMIC_FRICTION_DEFAULT,
            // Ground material
            ground_half_extent: GROUND_HALF_EXTENT,
            ground_friction: GROUND_FRICTION,
            ground_restitution: GROUND_RESTITUTION,
        }
    }
}

impl PhysicsConfig {
    /// Clamp every field back into its safe range, logging each offender.
    ///
    /// A hand-edited TOML can carry anything; out-of-range values would
    /// otherwise flow straight into collider construction.
    pub fn clamp_to_safe_ranges(&mut self) {
        if let Err(e) = validate_drop_height(self.drop_height) {
            warn!("{e}; clamping");
            self.drop_height = self.drop_height.clamp(DROP_HEIGHT_MIN, DROP_HEIGHT_MAX);
        }
        if let Err(e) = validate_radius(self.ball_radius) {
            warn!("{e}; clamping");
            self.ball_radius = self.ball_radius.clamp(BALL_RADIUS_MIN, BALL_RADIUS_MAX);
        }
        if let Err(e) = validate_hit_force(self.hit_force) {
            warn!("{e}; clamping");
            self.hit_force = self.hit_force.clamp(HIT_FORCE_MIN, HIT_FORCE_MAX);
        }
        for (name, value) in [
            ("linear_damping", &mut self.linear_damping),
            ("angular_damping", &mut self.angular_damping),
            ("static_friction", &mut self.static_friction),
            ("dynamic_friction", &mut self.dynamic_friction),
            ("ground_friction", &mut self.ground_friction),
            ("ground_restitution", &mut self.ground_restitution),
        ] {
            if let Err(e) = validate_fraction(name, *value) {
                warn!("{e}; clamping");
                *value = value.clamp(FRACTION_MIN, FRACTION_MAX);
            }
        }
        if self.ground_half_extent <= 0.0 {
            warn!(
                "ground_half_extent = {} must be positive; using default",
                self.ground_half_extent
            );
            self.ground_half_extent = GROUND_HALF_EXTENT;
        }
    }
}

/// Startup system: attempt to load `assets/bouncyball.toml` and overwrite the
/// `PhysicsConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are logged
/// but do not abort the app.  A missing file is silently ignored (defaults are
/// already in place from `insert_resource`).
pub fn load_physics_config(mut config: ResMut<PhysicsConfig>) {
    let path = "assets/bouncyball.toml";
    match std::fs::read_to_string(path) {
        Ok(contents) => match toml::from_str::<PhysicsConfig>(&contents) {
            Ok(loaded) => {
                *config = loaded;
                config.clamp_to_safe_ranges();
                println!("✓ Loaded config from {path}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {path}: {e}; using defaults");
            }
        },
        Err(_) => {
            // File not present — defaults are already in place; not an error.
            println!("ℹ No {path} found; using compiled defaults");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = PhysicsConfig::default();
        assert_eq!(config.drop_height, DROP_HEIGHT_DEFAULT);
        assert_eq!(config.ball_radius, BALL_RADIUS_DEFAULT);
        assert_eq!(config.hit_force, HIT_FORCE_DEFAULT);
        assert_eq!(config.static_friction, STATIC_FRICTION_DEFAULT);
        assert_eq!(config.ground_restitution, GROUND_RESTITUTION);
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let config: PhysicsConfig = toml::from_str("drop_height = 1.5\nhit_force = 20.0").unwrap();
        assert_eq!(config.drop_height, 1.5);
        assert_eq!(config.hit_force, 20.0);
        assert_eq!(config.ball_radius, BALL_RADIUS_DEFAULT);
        assert_eq!(config.linear_damping, LINEAR_DAMPING_DEFAULT);
    }

    #[test]
    fn clamp_pulls_out_of_range_values_back() {
        let mut config: PhysicsConfig =
            toml::from_str("ball_radius = 5.0\nstatic_friction = -2.0\nground_half_extent = 0.0")
                .unwrap();
        config.clamp_to_safe_ranges();
        assert_eq!(config.ball_radius, BALL_RADIUS_MAX);
        assert_eq!(config.static_friction, FRACTION_MIN);
        assert_eq!(config.ground_half_extent, GROUND_HALF_EXTENT);
    }

    #[test]
    fn in_range_values_survive_clamping_untouched() {
        let mut config = PhysicsConfig::default();
        let before = config.clone();
        config.clamp_to_safe_ranges();
        assert_eq!(config.drop_height, before.drop_height);
        assert_eq!(config.dynamic_friction, before.dynamic_friction);
    }
}
