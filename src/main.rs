use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier3d::prelude::*;

use bouncyball::ball::BallPlugin;
use bouncyball::config::PhysicsConfig;
use bouncyball::constants::WORLD_SCALE;
use bouncyball::{ball_rendering, config, graphics, scene, ui};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Bouncy Ball".into(),
                resolution: WindowResolution::new(1100, 760),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.04)))
        // Insert PhysicsConfig with compiled defaults; load_physics_config will
        // overwrite it from assets/bouncyball.toml (if present) in Startup.
        .insert_resource(PhysicsConfig::default())
        // Rapier's length unit tracks WORLD_SCALE so solver tolerances stay
        // proportional to the ball's size.  All boundary values are scaled in
        // scene.rs / ball.rs; this knob only conditions the solver.
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default().with_length_unit(WORLD_SCALE))
        .add_plugins(BallPlugin)
        .init_resource::<ui::RespawnDebounce>()
        .init_resource::<ui::TuningValues>()
        .add_systems(
            Startup,
            (
                // Load config first so every other startup system sees the final values.
                config::load_physics_config,
                graphics::setup_camera.after(config::load_physics_config),
                graphics::setup_lighting,
                scene::setup_physics_scene.after(config::load_physics_config),
                ui::setup_control_panel.after(config::load_physics_config),
            ),
        )
        .add_systems(
            Update,
            (
                ball_rendering::attach_ball_visual_system,
                ball_rendering::attach_ground_visual_system,
                ui::panel_adjust_button_system,
                ui::panel_command_button_system,
                ui::respawn_debounce_system,
                ui::tuning_label_refresh_system,
                ui::hit_button_sync_system,
                ui::bounce_counter_display_system,
            ),
        )
        .run();
}
