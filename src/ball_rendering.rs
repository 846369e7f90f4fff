//! Visuals for simulated bodies.
//!
//! Physics spawning stays mesh-free (and therefore headless-testable); these
//! systems attach meshes and materials to bodies as they appear.

use bevy::prelude::*;

use crate::ball::Ball;
use crate::constants::{GROUND_HALF_THICKNESS, WORLD_SCALE};
use crate::scene::GroundPlane;

fn ball_color() -> Color {
    Color::srgb(0.16, 0.43, 0.91)
}

fn ground_color() -> Color {
    Color::srgb(0.42, 0.44, 0.48)
}

/// Attach a metallic blue sphere to each newly spawned ball.
pub fn attach_ball_visual_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    query: Query<(Entity, &Ball), Added<Ball>>,
) {
    for (entity, ball) in query.iter() {
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Sphere::new(ball.radius * WORLD_SCALE))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: ball_color(),
                metallic: 0.9,
                perceptual_roughness: 0.25,
                ..default()
            })),
        ));
    }
}

/// Attach a matte slab matching the ground collider.
pub fn attach_ground_visual_system(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    config: Res<crate::config::PhysicsConfig>,
    query: Query<Entity, Added<GroundPlane>>,
) {
    for entity in query.iter() {
        let extent = config.ground_half_extent * 2.0 * WORLD_SCALE;
        commands.entity(entity).insert((
            Mesh3d(meshes.add(Cuboid::new(
                extent,
                GROUND_HALF_THICKNESS * 2.0 * WORLD_SCALE,
                extent,
            ))),
            MeshMaterial3d(materials.add(StandardMaterial {
                base_color: ground_color(),
                perceptual_roughness: 0.95,
                ..default()
            })),
        ));
    }
}
