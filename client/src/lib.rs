//! # Cuboid world client
//!
//! Renders the shared world with a software 3D pipeline and keeps it in sync
//! with the authoritative server over a blocking, per-tick request/response
//! exchange. One cooperative loop drives everything: input sampling, the
//! local physics step, the network round trip and the frame draw all happen
//! in sequence, so a stalled server stalls the frame — there is no
//! background networking thread by design.
//!
//! ## Module Organization
//!
//! - `camera`: third-person orbit controller with smoothed pivot tracking.
//! - `render`: the software pipeline — camera-space transform, depth sort,
//!   backface cull, near-plane clip, perspective projection, flat shading —
//!   plus the raster shell and the overlay point projector.
//! - `physics`: held-key movement, friction, gravity and axis-separated
//!   AABB collision resolution for the local player.
//! - `input`: per-frame keyboard/mouse sampling.
//! - `network`: the blocking TCP session (handshake + per-tick exchange).
//! - `game`: the title screen / in-game state machine tying it all together.

pub mod camera;
pub mod game;
pub mod input;
pub mod network;
pub mod physics;
pub mod render;
