use bevy::prelude::*;

/// Setup camera for the 3D view: slightly above the ground plane, looking at
/// the space the ball drops through.
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(0.0, 1.2, 2.6).looking_at(Vec3::new(0.0, 0.4, 0.0), Vec3::Y),
    ));
    eprintln!("[SETUP] Camera spawned");
}

/// Key light with shadows so the bounce height reads clearly.
pub fn setup_lighting(mut commands: Commands) {
    commands.spawn((
        DirectionalLight {
            illuminance: 12_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(3.0, 5.0, 2.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
