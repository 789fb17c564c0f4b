//! Cuboid geometry and per-player state.

use crate::math::Vec3;
use serde::{Deserialize, Serialize};

/// RGB color triple, one byte per channel.
pub type Rgb = (u8, u8, u8);

/// Face index quads into a cuboid's eight base vertices. Winding is chosen so
/// outward faces survive the camera-space backface test.
pub const CUBOID_FACES: [[usize; 4]; 6] = [
    [3, 2, 1, 0], // -z
    [4, 5, 6, 7], // +z
    [7, 3, 0, 4], // -x
    [2, 6, 5, 1], // +x
    [7, 6, 2, 3], // top
    [0, 1, 5, 4], // bottom
];

/// Axis-aligned box with a fixed local vertex cloud.
///
/// `size` is immutable after construction. `position` is mutable and gets
/// re-added to the base vertices on every [`Cuboid::world_vertices`] call;
/// world-space vertices are never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    pub position: Vec3,
    size: Vec3,
    pub color: Rgb,
    base_vertices: [Vec3; 8],
}

impl Cuboid {
    pub fn new(position: Vec3, size: Vec3, color: Rgb) -> Self {
        let (sx, sy, sz) = (size.x / 2.0, size.y / 2.0, size.z / 2.0);
        let base_vertices = [
            Vec3::new(-sx, -sy, -sz),
            Vec3::new(sx, -sy, -sz),
            Vec3::new(sx, sy, -sz),
            Vec3::new(-sx, sy, -sz),
            Vec3::new(-sx, -sy, sz),
            Vec3::new(sx, -sy, sz),
            Vec3::new(sx, sy, sz),
            Vec3::new(-sx, sy, sz),
        ];
        Cuboid {
            position,
            size,
            color,
            base_vertices,
        }
    }

    /// Cuboid with the same edge length on every axis.
    pub fn cube(position: Vec3, size: f32, color: Rgb) -> Self {
        Self::new(position, Vec3::new(size, size, size), color)
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    /// Base vertices translated to the cuboid's current world position.
    pub fn world_vertices(&self) -> [Vec3; 8] {
        self.base_vertices.map(|v| v.add(&self.position))
    }

    /// AABB overlap test. All six inequalities are strict, so exactly
    /// touching faces do not count as overlap.
    pub fn intersects(&self, other: &Cuboid) -> bool {
        let ah = self.size.scale(0.5);
        let bh = other.size.scale(0.5);
        self.position.x - ah.x < other.position.x + bh.x
            && self.position.x + ah.x > other.position.x - bh.x
            && self.position.y - ah.y < other.position.y + bh.y
            && self.position.y + ah.y > other.position.y - bh.y
            && self.position.z - ah.z < other.position.z + bh.z
            && self.position.z + ah.z > other.position.z - bh.z
    }
}

/// A connected player's authoritative state. Created on connect, its position
/// is overwritten only by that player's own updates, and the whole entry is
/// removed on disconnect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub id: u32,
    pub position: Vec3,
    pub color: Rgb,
    pub name: String,
}

impl PlayerState {
    pub fn new(id: u32, color: Rgb, name: String) -> Self {
        PlayerState {
            id,
            position: crate::SPAWN_POSITION,
            color,
            name,
        }
    }

    /// The player's collision and render volume at its last known position.
    pub fn cuboid(&self) -> Cuboid {
        Cuboid::cube(self.position, crate::PLAYER_SIZE, self.color)
    }
}

/// Wire descriptor for a static world cuboid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CubeDef {
    pub position: Vec3,
    pub size: Vec3,
    pub color: Rgb,
}

impl CubeDef {
    pub fn to_cuboid(&self) -> Cuboid {
        Cuboid::new(self.position, self.size, self.color)
    }
}
