//! Shared data model and wire protocol for the cuboid world.
//!
//! Everything the client and server must agree on lives here: the 3D vector
//! math, the cuboid/player data model, the gameplay and projection constants,
//! and the versioned, length-prefixed packet schema. Nothing outside this
//! crate defines wire shapes, so the two sides cannot drift apart silently.

pub mod math;
pub mod protocol;
pub mod world;

pub use math::Vec3;
pub use protocol::{Packet, WorldSnapshot, DEFAULT_PORT, PROTOCOL_VERSION};
pub use world::{CubeDef, Cuboid, PlayerState, Rgb};

/// Gravity subtracted from vertical velocity every tick.
pub const GRAVITY: f32 = 0.035;
/// Vertical velocity set when a grounded player jumps.
pub const JUMP_STRENGTH: f32 = 0.8;
/// Multiplicative damping applied to horizontal velocity every tick.
pub const FRICTION: f32 = 0.9;
/// Acceleration per tick from a held movement key.
pub const MOVE_ACCEL: f32 = 0.05;
/// Horizontal velocities below this magnitude snap to exactly zero.
pub const VELOCITY_EPSILON: f32 = 0.001;
/// Edge length of every player's cuboid.
pub const PLAYER_SIZE: f32 = 2.0;
/// Where newly joined players appear.
pub const SPAWN_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: 5.0,
    z: 0.0,
};
/// Height above a player's position that the camera pivots around and that
/// nametags hover at.
pub const EYE_HEIGHT: f32 = 2.0;

/// Camera-space depth of the clipping plane. The camera looks down -z, so
/// "in front" means z below this value.
pub const NEAR_CLIP_PLANE: f32 = -0.1;
/// Focal constant of the perspective projection.
pub const FOCAL_LENGTH: f32 = 400.0;
/// Fixed directional light for flat shading.
pub const LIGHT_DIR: Vec3 = Vec3 {
    x: 0.577,
    y: -0.577,
    z: -0.577,
};

/// The ground platform every world is built on.
pub const GROUND_POSITION: Vec3 = Vec3 {
    x: 0.0,
    y: -2.0,
    z: 0.0,
};
pub const GROUND_SIZE: Vec3 = Vec3 {
    x: 150.0,
    y: 1.0,
    z: 150.0,
};
pub const GRASS_GREEN: Rgb = (124, 252, 0);
