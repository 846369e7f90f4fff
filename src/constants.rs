//! Centralised physics and UI constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! Runtime overrides for the user-facing subset come from
//! `assets/bouncyball.toml` via [`crate::config::PhysicsConfig`].

// ── World Scale ───────────────────────────────────────────────────────────────

/// Internal physics units per real-world metre.
///
/// Every length and force-derived value handed to Rapier is pre-multiplied by
/// this constant, and the physics root carries the inverse scale so rendered
/// and reported quantities stay in real-world metres.  Rapier's solver is
/// well-conditioned at metre scale, so this ships at 1.0; raising it rescales
/// gravity, collider sizes and impulse conversion together.  Change with care:
/// collider mass scales cubically with length in physics-space.
pub const WORLD_SCALE: f32 = 1.0;

/// Vertical gravity in real-world m/s².  Multiplied by [`WORLD_SCALE`] before
/// being written into the Rapier configuration.
pub const GRAVITY_Y: f32 = -9.8;

// ── Ball Body ─────────────────────────────────────────────────────────────────

/// Fixed nominal ball mass in internal units.
///
/// Deliberately tiny: impulses from "hit" are expressed in Newtons and divided
/// by [`IMPULSE_TO_VELOCITY`], which assumes this mass.  Changing one without
/// the other makes the hit force slider feel wrong.
pub const BALL_MASS: f32 = 0.001;

/// Ball restitution, fixed and not user-tunable.  1.0 = perfectly elastic.
pub const BALL_RESTITUTION: f32 = 1.0;

/// Divisor converting a hit force (N) into a linear velocity delta, matching
/// the internal mass units.  `Δv = F · WORLD_SCALE / IMPULSE_TO_VELOCITY`.
pub const IMPULSE_TO_VELOCITY: f32 = 1000.0;

/// Each angular-velocity axis after a hit is drawn uniformly from
/// `[-HIT_SPIN_MAX, HIT_SPIN_MAX]` rad/s.
pub const HIT_SPIN_MAX: f32 = 5.0;

// ── Collision Debounce ────────────────────────────────────────────────────────

/// Minimum seconds between two collision-began events for both to count as
/// separate bounces.
///
/// Contact solvers emit multiple began events for a single physical bounce
/// (resting-contact jitter, multi-manifold contacts); anything inside this
/// window is discarded.  Two genuinely distinct bounces closer together than
/// this are under-counted — accepted trade-off.  Tested range: 0.05–0.2.
pub const COLLISION_DEBOUNCE_SECS: f64 = 0.1;

// ── Parameter Respawn Debounce ────────────────────────────────────────────────

/// Delay before a body-parameter change (friction/damping) rebuilds the ball.
///
/// Coalesces rapid stepper presses into one respawn; each new change replaces
/// the pending one, so only the most recent value set survives.
pub const PARAM_RESPAWN_DEBOUNCE_SECS: f32 = 0.2;

// ── Ground Plane ──────────────────────────────────────────────────────────────

/// Half-extent of the square ground slab, real-world metres.
pub const GROUND_HALF_EXTENT: f32 = 2.0;

/// Half-thickness of the ground slab, real-world metres.  The top surface sits
/// at y = 0.
pub const GROUND_HALF_THICKNESS: f32 = 0.05;

/// Ground friction coefficient, fixed (the tunable friction lives on the ball).
pub const GROUND_FRICTION: f32 = 0.7;

/// Ground restitution, fixed.  Combined with the ball's 1.0 under Rapier's
/// default average rule this keeps bounces lively without being lossless.
pub const GROUND_RESTITUTION: f32 = 0.9;

// ── Tunable Defaults & Ranges ─────────────────────────────────────────────────

/// Height the ball is dropped from, metres above the ground plane.
pub const DROP_HEIGHT_DEFAULT: f32 = 0.5;
pub const DROP_HEIGHT_MIN: f32 = 0.1;
pub const DROP_HEIGHT_MAX: f32 = 2.0;
pub const DROP_HEIGHT_STEP: f32 = 0.05;

/// Ball radius, metres.
pub const BALL_RADIUS_DEFAULT: f32 = 0.05;
pub const BALL_RADIUS_MIN: f32 = 0.02;
pub const BALL_RADIUS_MAX: f32 = 0.2;
pub const BALL_RADIUS_STEP: f32 = 0.01;

/// Impulse magnitude applied by the Hit Ball command, Newtons.
pub const HIT_FORCE_DEFAULT: f32 = 50.0;
pub const HIT_FORCE_MIN: f32 = 10.0;
pub const HIT_FORCE_MAX: f32 = 100.0;
pub const HIT_FORCE_STEP: f32 = 5.0;

/// Damping and friction parameters share the unit interval.
pub const LINEAR_DAMPING_DEFAULT: f32 = 0.1;
pub const ANGULAR_DAMPING_DEFAULT: f32 = 0.1;
pub const STATIC_FRICTION_DEFAULT: f32 = 0.5;
pub const DYNAMIC_FRICTION_DEFAULT: f32 = 0.5;
pub const FRACTION_MIN: f32 = 0.0;
pub const FRACTION_MAX: f32 = 1.0;
pub const FRACTION_STEP: f32 = 0.05;

// ── Panel Layout ──────────────────────────────────────────────────────────────

pub const PANEL_WIDTH_PX: f32 = 250.0;
pub const PANEL_TITLE_FONT_SIZE: f32 = 16.0;
pub const PANEL_ROW_FONT_SIZE: f32 = 12.0;
pub const BOUNCE_COUNT_FONT_SIZE: f32 = 34.0;
