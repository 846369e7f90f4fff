//! Bouncy Ball — an interactive rigid-body ball sandbox.
//!
//! Drop a ball into a physics scene, watch it bounce off the ground plane,
//! knock it around with impulses, and tune its physical parameters live from
//! a control panel.  Rapier supplies all simulation; the interesting part is
//! the ball lifecycle controller in [`ball`] and its debounced bounce
//! counting.

pub mod ball;
pub mod ball_rendering;
pub mod config;
pub mod constants;
pub mod error;
pub mod graphics;
pub mod scene;
pub mod ui;

pub use ball::{
    ActiveBall, Ball, BallPlugin, BounceCount, BounceCountChanged, CollisionDebounce, DropBall,
    HitBall, MoveBall, PhysicsParams, RemoveBall,
};
pub use config::PhysicsConfig;
pub use error::{BallError, BallResult};
pub use scene::{GroundPlane, PhysicsRoot};
