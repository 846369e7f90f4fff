//! Ball lifecycle controller: the single owner of the ball slot.
//!
//! At most one ball exists at a time.  UI systems issue command messages
//! ([`DropBall`], [`HitBall`], [`MoveBall`], [`RemoveBall`]); the systems here
//! consume them on the main schedule, translate real-world metre/Newton values
//! into Rapier components (pre-multiplied by [`WORLD_SCALE`]), and convert the
//! raw collision-began stream into a debounced bounce count.
//!
//! ## System Responsibilities
//!
//! | System                  | Purpose                                        |
//! |-------------------------|------------------------------------------------|
//! | `remove_ball_system`    | Despawn current ball, clear the slot           |
//! | `drop_ball_system`      | Retire old ball, spawn replacement, reset count|
//! | `move_ball_system`      | Teleport-and-stop the current ball             |
//! | `hit_ball_system`       | Random-direction impulse + fresh spin          |
//! | `ball_collision_system` | Debounce-gated bounce counting                 |
//!
//! The five systems are chained so command handling and collision handling
//! stay strictly ordered within a frame.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::Rng;

use crate::constants::{
    BALL_MASS, BALL_RADIUS_MAX, BALL_RADIUS_MIN, BALL_RESTITUTION, COLLISION_DEBOUNCE_SECS,
    HIT_SPIN_MAX, IMPULSE_TO_VELOCITY, WORLD_SCALE,
};
use crate::error::{validate_radius, BallError};
use crate::scene::PhysicsRoot;

// ── Parameters ────────────────────────────────────────────────────────────────

/// User-facing physical parameters, snapshotted at ball-creation time.
///
/// All four live in `[0, 1]`.  A snapshot is immutable once taken: changing a
/// slider never mutates a live ball, it schedules a replacement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsParams {
    pub static_friction: f32,
    pub dynamic_friction: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            static_friction: crate::constants::STATIC_FRICTION_DEFAULT,
            dynamic_friction: crate::constants::DYNAMIC_FRICTION_DEFAULT,
            linear_damping: crate::constants::LINEAR_DAMPING_DEFAULT,
            angular_damping: crate::constants::ANGULAR_DAMPING_DEFAULT,
        }
    }
}

impl PhysicsParams {
    /// Copy of `self` with every field clamped into the unit interval.
    pub fn clamped(self) -> Self {
        Self {
            static_friction: self.static_friction.clamp(0.0, 1.0),
            dynamic_friction: self.dynamic_friction.clamp(0.0, 1.0),
            linear_damping: self.linear_damping.clamp(0.0, 1.0),
            angular_damping: self.angular_damping.clamp(0.0, 1.0),
        }
    }

    /// Single Coulomb coefficient handed to the collider.
    ///
    /// Rapier's contact model does not distinguish static from dynamic
    /// friction; both user-facing parameters are kept and their mean governs
    /// the contact.
    pub fn contact_friction(&self) -> f32 {
        (self.static_friction + self.dynamic_friction) / 2.0
    }
}

// ── Components & resources ────────────────────────────────────────────────────

/// The live ball.  `radius` and the params snapshot are kept in real-world
/// units for inspection; the scaled values live in the Rapier components.
#[derive(Component, Debug, Clone, Copy)]
pub struct Ball {
    pub radius: f32,
    pub params: PhysicsParams,
}

/// The single ball slot.  `Some(entity)` is also the collision subscription:
/// only events involving this entity are counted, so replacing the slot
/// retires the old ball's subscription in the same move.
#[derive(Resource, Debug, Default)]
pub struct ActiveBall(pub Option<Entity>);

/// Bounces counted for the current ball.  Only ever incremented; reset to 0
/// exactly when a new ball is created.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BounceCount(pub u32);

/// Notification published whenever the bounce count changes (increment or
/// reset).  The panel is the sole consumer; nothing here knows about UI.
#[derive(Message, Debug, Clone, Copy)]
pub struct BounceCountChanged {
    pub count: u32,
}

/// Gate for bounce counting: the timestamp of the last accepted collision.
///
/// Starts at negative infinity so the first event after startup is always
/// accepted.  Deliberately **not** reset on ball replacement — the gate
/// belongs to the controller's lifetime, not the ball's.
#[derive(Resource, Debug, Clone, Copy)]
pub struct CollisionDebounce {
    pub last_accepted: f64,
}

impl Default for CollisionDebounce {
    fn default() -> Self {
        Self {
            last_accepted: f64::NEG_INFINITY,
        }
    }
}

impl CollisionDebounce {
    /// Accept an event at `now` seconds if it falls strictly outside the
    /// debounce window; advances the gate on acceptance.
    pub fn try_accept(&mut self, now: f64) -> bool {
        if now - self.last_accepted > COLLISION_DEBOUNCE_SECS {
            self.last_accepted = now;
            true
        } else {
            false
        }
    }
}

// ── Commands ──────────────────────────────────────────────────────────────────

/// Replace the ball slot with a fresh ball.  `position` in real-world metres.
#[derive(Message, Debug, Clone, Copy)]
pub struct DropBall {
    pub position: Vec3,
    pub radius: f32,
    pub params: PhysicsParams,
}

/// Knock the current ball in a random horizontal direction.  `force` in N.
#[derive(Message, Debug, Clone, Copy)]
pub struct HitBall {
    pub force: f32,
}

/// Teleport the current ball and stop all motion.  Not wired to the panel,
/// but part of the public contract.
#[derive(Message, Debug, Clone, Copy)]
pub struct MoveBall {
    pub position: Vec3,
}

/// Clear the ball slot.  No-op when already empty.
#[derive(Message, Debug, Clone, Copy)]
pub struct RemoveBall;

// ── Hit math ──────────────────────────────────────────────────────────────────

/// Linear velocity delta for a hit of `force` Newtons along horizontal
/// `angle` radians: `(cos·F, 0.5·F, sin·F) · scale / 1000`.
///
/// Split out so tests can inject a deterministic angle.
pub fn hit_velocity_delta(force: f32, angle: f32) -> Vec3 {
    Vec3::new(angle.cos() * force, 0.5 * force, angle.sin() * force) * WORLD_SCALE
        / IMPULSE_TO_VELOCITY
}

// ── Systems ───────────────────────────────────────────────────────────────────

/// Despawn the current ball and clear the slot.  Idempotent.
pub fn remove_ball_system(
    mut commands: Commands,
    mut removals: MessageReader<RemoveBall>,
    mut active: ResMut<ActiveBall>,
) {
    for _ in removals.read() {
        if let Some(ball) = active.0.take() {
            commands.entity(ball).despawn();
            info!("Ball removed");
        }
    }
}

/// Retire any existing ball, then spawn its replacement under the physics
/// root with the requested radius and parameter snapshot.
///
/// Degraded path: with no physics root yet (UI raced scene setup) the command
/// is dropped with a warning and nothing is mutated.
pub fn drop_ball_system(
    mut commands: Commands,
    mut drops: MessageReader<DropBall>,
    root_query: Query<Entity, With<PhysicsRoot>>,
    mut active: ResMut<ActiveBall>,
    mut bounces: ResMut<BounceCount>,
    mut changed: MessageWriter<BounceCountChanged>,
) {
    for drop in drops.read() {
        let Ok(root) = root_query.single() else {
            warn!(
                "{}",
                BallError::SceneNotReady {
                    context: "drop_ball"
                }
            );
            continue;
        };

        // Exactly one "current ball" slot: retire the old occupant before the
        // replacement attaches.
        if let Some(old) = active.0.take() {
            commands.entity(old).despawn();
        }
        bounces.0 = 0;
        changed.write(BounceCountChanged { count: 0 });

        let radius = match validate_radius(drop.radius) {
            Ok(()) => drop.radius,
            Err(e) => {
                warn!("{e}; clamping");
                drop.radius.clamp(BALL_RADIUS_MIN, BALL_RADIUS_MAX)
            }
        };
        let params = drop.params.clamped();

        let ball = commands
            .spawn((
                Ball { radius, params },
                RigidBody::Dynamic,
                Collider::ball(radius * WORLD_SCALE),
                Restitution::coefficient(BALL_RESTITUTION),
                Friction::coefficient(params.contact_friction()),
                Damping {
                    linear_damping: params.linear_damping,
                    angular_damping: params.angular_damping,
                },
                ColliderMassProperties::Mass(BALL_MASS),
                Velocity::zero(),
                ActiveEvents::COLLISION_EVENTS,
                Transform::from_translation(drop.position * WORLD_SCALE),
                Visibility::default(),
            ))
            .id();
        commands.entity(root).add_child(ball);
        active.0 = Some(ball);

        info!(
            "Ball dropped at {:?} (radius {:.2} m, friction {:.2}/{:.2}, damping {:.2}/{:.2})",
            drop.position,
            radius,
            params.static_friction,
            params.dynamic_friction,
            params.linear_damping,
            params.angular_damping,
        );
    }
}

/// Teleport-and-stop: reposition the ball (scaled) and zero both velocity
/// components.  Silent no-op with an empty slot.
pub fn move_ball_system(
    mut moves: MessageReader<MoveBall>,
    active: Res<ActiveBall>,
    mut query: Query<(&mut Transform, &mut Velocity), With<Ball>>,
) {
    for request in moves.read() {
        let Some(ball) = active.0 else {
            continue;
        };
        let Ok((mut transform, mut velocity)) = query.get_mut(ball) else {
            continue;
        };
        transform.translation = request.position * WORLD_SCALE;
        velocity.linvel = Vec3::ZERO;
        velocity.angvel = Vec3::ZERO;
    }
}

/// Apply a hit: a random horizontal direction carries the force.
///
/// Linear velocity **accumulates** across hits; angular velocity is
/// **replaced** with a fresh random spin each time.  The asymmetry keeps spin
/// visually fresh per hit.  Silent no-op with an empty slot.
pub fn hit_ball_system(
    mut hits: MessageReader<HitBall>,
    active: Res<ActiveBall>,
    mut query: Query<&mut Velocity, With<Ball>>,
) {
    let mut rng = rand::thread_rng();
    for hit in hits.read() {
        let Some(ball) = active.0 else {
            continue;
        };
        let Ok(mut velocity) = query.get_mut(ball) else {
            continue;
        };

        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        velocity.linvel += hit_velocity_delta(hit.force, angle);
        velocity.angvel = Vec3::new(
            rng.gen_range(-HIT_SPIN_MAX..=HIT_SPIN_MAX),
            rng.gen_range(-HIT_SPIN_MAX..=HIT_SPIN_MAX),
            rng.gen_range(-HIT_SPIN_MAX..=HIT_SPIN_MAX),
        );
    }
}

/// Convert the raw collision-began stream into bounce counts.
///
/// Matches `CollisionEvent::Started` pairs involving the tracked ball;
/// ignores `Stopped` and everything concerning other bodies.  The solver
/// emits bursts of began events per physical bounce, so increments pass
/// through [`CollisionDebounce`] first.
pub fn ball_collision_system(
    mut collision_events: MessageReader<CollisionEvent>,
    active: Res<ActiveBall>,
    time: Res<Time>,
    mut debounce: ResMut<CollisionDebounce>,
    mut bounces: ResMut<BounceCount>,
    mut changed: MessageWriter<BounceCountChanged>,
) {
    let now = time.elapsed_secs_f64();
    for event in collision_events.read() {
        let CollisionEvent::Started(e1, e2, _) = event else {
            continue;
        };
        let Some(ball) = active.0 else {
            continue;
        };
        if *e1 != ball && *e2 != ball {
            continue;
        }
        if debounce.try_accept(now) {
            bounces.0 += 1;
            changed.write(BounceCountChanged { count: bounces.0 });
        }
    }
}

// ── Plugin ────────────────────────────────────────────────────────────────────

pub struct BallPlugin;

impl Plugin for BallPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveBall>()
            .init_resource::<BounceCount>()
            .init_resource::<CollisionDebounce>()
            .add_message::<DropBall>()
            .add_message::<HitBall>()
            .add_message::<MoveBall>()
            .add_message::<RemoveBall>()
            .add_message::<BounceCountChanged>()
            .add_systems(
                Update,
                (
                    remove_ball_system,
                    drop_ball_system,
                    move_ball_system,
                    hit_ball_system,
                    ball_collision_system,
                )
                    .chain(),
            );
    }
}
