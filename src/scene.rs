//! Physics scene setup: root anchor, gravity, ground plane.
//!
//! The physics root is the scene-graph anchor every simulated body hangs
//! under.  Children are expressed in internal (scaled) units; the root's
//! inverse-scale transform brings them back to real-world size for rendering,
//! so the rest of the app never sees internal units.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::config::PhysicsConfig;
use crate::constants::{GRAVITY_Y, GROUND_HALF_THICKNESS, WORLD_SCALE};

/// Marker for the physics root entity.  Exactly one exists after setup.
#[derive(Component, Debug, Clone, Copy)]
pub struct PhysicsRoot;

/// Marker for the static ground slab.
#[derive(Component, Debug, Clone, Copy)]
pub struct GroundPlane;

/// Startup system: configure gravity and spawn the physics root with its
/// static ground plane.
///
/// Idempotent: re-running against a world that already has a root (stale
/// scene handle, repeated readiness callback) logs a warning and changes
/// nothing — no duplicate roots or ground planes.
pub fn setup_physics_scene(
    mut commands: Commands,
    existing_root: Query<Entity, With<PhysicsRoot>>,
    mut rapier_config: Query<&mut RapierConfiguration>,
    config: Res<PhysicsConfig>,
) {
    if !existing_root.is_empty() {
        warn!("Physics root already present; skipping scene setup");
        return;
    }

    for mut cfg in rapier_config.iter_mut() {
        cfg.gravity = Vec3::Y * GRAVITY_Y * WORLD_SCALE;
    }

    let root = commands
        .spawn((
            PhysicsRoot,
            Transform::from_scale(Vec3::splat(1.0 / WORLD_SCALE)),
            Visibility::default(),
        ))
        .id();

    // Ground slab: top surface at y = 0, body centre half a thickness below.
    let ground = commands
        .spawn((
            GroundPlane,
            RigidBody::Fixed,
            Collider::cuboid(
                config.ground_half_extent * WORLD_SCALE,
                GROUND_HALF_THICKNESS * WORLD_SCALE,
                config.ground_half_extent * WORLD_SCALE,
            ),
            Friction::coefficient(config.ground_friction),
            Restitution::coefficient(config.ground_restitution),
            Transform::from_translation(Vec3::new(
                0.0,
                -GROUND_HALF_THICKNESS * WORLD_SCALE,
                0.0,
            )),
            Visibility::default(),
        ))
        .id();
    commands.entity(root).add_child(ground);

    info!(
        "✓ Physics scene ready (gravity {:.1} m/s², ground {:.0}×{:.0} m)",
        GRAVITY_Y,
        config.ground_half_extent * 2.0,
        config.ground_half_extent * 2.0,
    );
}
