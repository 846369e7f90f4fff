//! Headless tests for the ball lifecycle controller.
//!
//! These use [`MinimalPlugins`] — no window, no rendering, no Rapier stepping —
//! so they run fast and deterministically in CI.  Collision events are
//! injected by hand and time advances in fixed manual steps, which makes the
//! debounce window testable to the frame.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use bevy_rapier3d::prelude::{CollisionEvent, Velocity};
use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

use bouncyball::ball::{
    ActiveBall, Ball, BallPlugin, BounceCount, DropBall, HitBall, MoveBall, PhysicsParams,
    RemoveBall,
};
use bouncyball::constants::{HIT_SPIN_MAX, IMPULSE_TO_VELOCITY, WORLD_SCALE};
use bouncyball::scene::PhysicsRoot;
use bouncyball::ui::{respawn_debounce_system, RespawnDebounce, TuningValues};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Build a minimal headless app with the controller installed.
///
/// `CollisionEvent` is registered manually because the Rapier plugin (its
/// usual owner) is deliberately absent.
fn build_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.add_plugins(BallPlugin);
    app.add_message::<CollisionEvent>();
    app
}

/// Spawn the physics root that `drop_ball_system` requires.
fn spawn_root(app: &mut App) -> Entity {
    app.world_mut()
        .spawn((PhysicsRoot, Transform::default(), Visibility::default()))
        .id()
}

fn drop_ball(app: &mut App, height: f32) {
    app.world_mut().write_message(DropBall {
        position: Vec3::new(0.0, height, 0.0),
        radius: 0.05,
        params: PhysicsParams::default(),
    });
    app.update();
}

fn ball_count(world: &mut World) -> usize {
    world
        .query_filtered::<Entity, With<Ball>>()
        .iter(world)
        .count()
}

fn active_ball(app: &App) -> Option<Entity> {
    app.world().resource::<ActiveBall>().0
}

fn bounce_count(app: &App) -> u32 {
    app.world().resource::<BounceCount>().0
}

fn send_ball_collision(app: &mut App) {
    let ball = active_ball(app).expect("a ball must be active");
    let other = app.world_mut().spawn_empty().id();
    app.world_mut().write_message(CollisionEvent::Started(
        ball,
        other,
        CollisionEventFlags::empty(),
    ));
}

// ── Drop / supersede ──────────────────────────────────────────────────────────

/// Dropping with a ready scene attaches exactly one ball and starts the
/// counter at zero.
#[test]
fn drop_spawns_exactly_one_ball() {
    let mut app = build_app();
    spawn_root(&mut app);

    drop_ball(&mut app, 0.5);

    assert_eq!(ball_count(app.world_mut()), 1);
    assert!(active_ball(&app).is_some());
    assert_eq!(bounce_count(&app), 0);
}

/// Without a physics root the command degrades to a logged no-op: nothing
/// spawns, nothing is mutated.
#[test]
fn drop_without_root_is_a_no_op() {
    let mut app = build_app();

    drop_ball(&mut app, 0.5);

    assert_eq!(ball_count(app.world_mut()), 0);
    assert!(active_ball(&app).is_none());
    assert_eq!(bounce_count(&app), 0);
}

/// A second drop strictly supersedes the first: the old entity is gone and
/// the slot holds the replacement.
#[test]
fn second_drop_supersedes_first() {
    let mut app = build_app();
    spawn_root(&mut app);

    drop_ball(&mut app, 0.5);
    let first = active_ball(&app).unwrap();

    drop_ball(&mut app, 1.0);
    let second = active_ball(&app).unwrap();

    assert_ne!(first, second);
    assert_eq!(ball_count(app.world_mut()), 1);
    assert!(
        app.world().get_entity(first).is_err(),
        "superseded ball must be despawned"
    );
}

/// Replacement resets the bounce counter to zero.
#[test]
fn drop_resets_bounce_count() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);

    send_ball_collision(&mut app);
    app.update();
    assert_eq!(bounce_count(&app), 1);

    drop_ball(&mut app, 0.5);
    assert_eq!(bounce_count(&app), 0);
}

/// Ball components carry the requested real-world radius and a clamped
/// parameter snapshot.
#[test]
fn drop_clamps_out_of_range_parameters() {
    let mut app = build_app();
    spawn_root(&mut app);

    app.world_mut().write_message(DropBall {
        position: Vec3::new(0.0, 0.5, 0.0),
        radius: 9.0,
        params: PhysicsParams {
            static_friction: 3.0,
            dynamic_friction: -1.0,
            linear_damping: 0.5,
            angular_damping: 0.5,
        },
    });
    app.update();

    let ball_entity = active_ball(&app).unwrap();
    let ball = app.world().get::<Ball>(ball_entity).unwrap();
    assert_eq!(ball.radius, 0.2, "radius clamps to the supported maximum");
    assert_eq!(ball.params.static_friction, 1.0);
    assert_eq!(ball.params.dynamic_friction, 0.0);
}

// ── Hit ───────────────────────────────────────────────────────────────────────

/// A hit adds the computed impulse to linear velocity: the vertical component
/// is deterministic (`0.5·F·scale/1000`) and the horizontal magnitude equals
/// `F·scale/1000` regardless of the random angle.
#[test]
fn hit_adds_expected_velocity_delta() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);
    let ball = active_ball(&app).unwrap();

    app.world_mut().write_message(HitBall { force: 50.0 });
    app.update();

    let velocity = app.world().get::<Velocity>(ball).unwrap();
    let expected_y = 0.5 * 50.0 * WORLD_SCALE / IMPULSE_TO_VELOCITY;
    let horizontal = Vec3::new(velocity.linvel.x, 0.0, velocity.linvel.z).length();
    let expected_h = 50.0 * WORLD_SCALE / IMPULSE_TO_VELOCITY;

    assert!((velocity.linvel.y - expected_y).abs() < 1e-6);
    assert!((horizontal - expected_h).abs() < 1e-5);
}

/// Linear velocity accumulates across hits; it is never reset by a hit.
#[test]
fn hits_accumulate_linear_velocity() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);
    let ball = active_ball(&app).unwrap();

    app.world_mut().write_message(HitBall { force: 40.0 });
    app.update();
    app.world_mut().write_message(HitBall { force: 40.0 });
    app.update();

    let velocity = app.world().get::<Velocity>(ball).unwrap();
    let expected_y = 2.0 * 0.5 * 40.0 * WORLD_SCALE / IMPULSE_TO_VELOCITY;
    assert!(
        (velocity.linvel.y - expected_y).abs() < 1e-6,
        "two hits must stack vertically, got {}",
        velocity.linvel.y
    );
}

/// Angular velocity is replaced per hit, not accumulated: even a wildly
/// spinning ball comes back inside the per-axis bound.
#[test]
fn hit_replaces_angular_velocity_within_bounds() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);
    let ball = active_ball(&app).unwrap();

    app.world_mut().get_mut::<Velocity>(ball).unwrap().angvel = Vec3::splat(40.0);

    app.world_mut().write_message(HitBall { force: 50.0 });
    app.update();

    let angvel = app.world().get::<Velocity>(ball).unwrap().angvel;
    for axis in [angvel.x, angvel.y, angvel.z] {
        assert!(
            axis.abs() <= HIT_SPIN_MAX + 1e-6,
            "spin axis {axis} must be replaced, not compounded"
        );
    }
}

/// Hitting an empty slot does nothing.
#[test]
fn hit_with_empty_slot_is_a_no_op() {
    let mut app = build_app();
    spawn_root(&mut app);

    app.world_mut().write_message(HitBall { force: 50.0 });
    app.update();

    assert_eq!(ball_count(app.world_mut()), 0);
}

// ── Move / remove ─────────────────────────────────────────────────────────────

/// Move is a teleport-and-stop: new position, zero velocities.
#[test]
fn move_zeroes_velocity_and_repositions() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);
    let ball = active_ball(&app).unwrap();

    {
        let mut velocity = app.world_mut().get_mut::<Velocity>(ball).unwrap();
        velocity.linvel = Vec3::new(1.0, -2.0, 3.0);
        velocity.angvel = Vec3::new(4.0, 5.0, -6.0);
    }

    let target = Vec3::new(0.3, 1.2, -0.3);
    app.world_mut().write_message(MoveBall { position: target });
    app.update();

    let transform = app.world().get::<Transform>(ball).unwrap();
    let velocity = app.world().get::<Velocity>(ball).unwrap();
    assert_eq!(transform.translation, target * WORLD_SCALE);
    assert_eq!(velocity.linvel, Vec3::ZERO);
    assert_eq!(velocity.angvel, Vec3::ZERO);
}

#[test]
fn move_with_empty_slot_is_a_no_op() {
    let mut app = build_app();
    spawn_root(&mut app);

    app.world_mut().write_message(MoveBall {
        position: Vec3::ONE,
    });
    app.update();

    assert_eq!(ball_count(app.world_mut()), 0);
}

/// Remove clears the slot; removing again is harmless.
#[test]
fn remove_is_idempotent() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);

    app.world_mut().write_message(RemoveBall);
    app.update();
    assert_eq!(ball_count(app.world_mut()), 0);
    assert!(active_ball(&app).is_none());

    app.world_mut().write_message(RemoveBall);
    app.update();
    assert_eq!(ball_count(app.world_mut()), 0);
}

// ── Collision counting ────────────────────────────────────────────────────────

/// Events inside the debounce window are discarded; a later one is counted.
/// Manual 60 ms steps: accept at t, reject at t+0.06, accept at t+0.12.
#[test]
fn collision_burst_counts_once() {
    let mut app = build_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        60,
    )));
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);

    send_ball_collision(&mut app);
    app.update();
    assert_eq!(bounce_count(&app), 1, "first event is always accepted");

    send_ball_collision(&mut app);
    app.update();
    assert_eq!(bounce_count(&app), 1, "0.06 s gap falls inside the window");

    send_ball_collision(&mut app);
    app.update();
    assert_eq!(bounce_count(&app), 2, "0.12 s gap clears the window");
}

/// Collisions between other bodies never touch the counter.
#[test]
fn unrelated_collisions_are_ignored() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);

    let a = app.world_mut().spawn_empty().id();
    let b = app.world_mut().spawn_empty().id();
    app.world_mut()
        .write_message(CollisionEvent::Started(a, b, CollisionEventFlags::empty()));
    app.update();

    assert_eq!(bounce_count(&app), 0);
}

/// After a superseding drop, events for the retired ball no longer count:
/// exactly one collision target is live (the new ball).
#[test]
fn stale_events_for_replaced_ball_are_ignored() {
    let mut app = build_app();
    spawn_root(&mut app);
    drop_ball(&mut app, 0.5);
    let first = active_ball(&app).unwrap();

    drop_ball(&mut app, 0.5);
    let other = app.world_mut().spawn_empty().id();
    app.world_mut().write_message(CollisionEvent::Started(
        first,
        other,
        CollisionEventFlags::empty(),
    ));
    app.update();

    assert_eq!(bounce_count(&app), 0);
}

// ── Parameter respawn debounce ────────────────────────────────────────────────

fn build_respawn_app() -> App {
    let mut app = build_app();
    app.init_resource::<RespawnDebounce>();
    app.insert_resource(TuningValues::default());
    app.add_systems(Update, respawn_debounce_system);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        150,
    )));
    app
}

/// An armed respawn fires once after the delay and rebuilds the ball.
#[test]
fn respawn_debounce_fires_after_delay() {
    let mut app = build_respawn_app();
    spawn_root(&mut app);
    app.update(); // first frame has zero delta

    app.world_mut().resource_mut::<RespawnDebounce>().arm();
    app.update(); // 0.15 s elapsed — still pending
    assert_eq!(ball_count(app.world_mut()), 0);

    app.update(); // 0.30 s — timer fires, DropBall written
    app.update(); // command consumed
    assert_eq!(ball_count(app.world_mut()), 1);
}

/// Re-arming replaces the pending respawn: only the last schedule survives.
#[test]
fn rearming_supersedes_pending_respawn() {
    let mut app = build_respawn_app();
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(
        80,
    )));
    spawn_root(&mut app);
    app.update(); // first frame has zero delta

    app.world_mut().resource_mut::<RespawnDebounce>().arm();
    app.update(); // first schedule at 0.08 s
    app.update(); // first schedule at 0.16 s
    app.world_mut().resource_mut::<RespawnDebounce>().arm(); // supersede

    // The first schedule would have fired by 0.24 s; the replacement is only
    // at 0.08 s / 0.16 s here, so nothing may spawn.
    app.update();
    app.update();
    assert_eq!(
        ball_count(app.world_mut()),
        0,
        "superseded schedule must not have fired"
    );

    app.update(); // replacement passes 0.2 s — fires
    app.update(); // command consumed
    assert_eq!(ball_count(app.world_mut()), 1);
}
