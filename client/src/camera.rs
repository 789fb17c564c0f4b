//! Third-person orbit camera with smoothed pivot tracking.

use shared::{Vec3, EYE_HEIGHT};

pub const MIN_DISTANCE: f32 = 5.0;
pub const MAX_DISTANCE: f32 = 40.0;
const MOUSE_SENSITIVITY: f32 = 0.2;

/// View parameters plus the orbit controller state.
///
/// The camera follows whatever target position is handed to [`Camera::update`]
/// each frame; it never owns the player. The pivot chases the target's eye
/// point asymptotically, one lerp step per tick, which is what gives the
/// follow its eased feel.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Heading in degrees. The view transform applies a 90 degree offset so
    /// yaw 0 lines up with the initial forward axis.
    pub yaw: f32,
    /// Elevation in degrees, clamped to [-89, 89].
    pub pitch: f32,
    pub distance: f32,
    pub zoom_speed: f32,
    pub pivot_point: Vec3,
    pub lerp_factor: f32,
}

impl Camera {
    pub fn new() -> Self {
        Camera {
            position: Vec3::new(0.0, 5.0, -15.0),
            yaw: -90.0,
            pitch: 0.0,
            distance: 15.0,
            zoom_speed: 1.0,
            pivot_point: Vec3::new(0.0, 5.0, 0.0),
            lerp_factor: 0.08,
        }
    }

    /// Adjusts orbit distance by wheel steps; clamped on the next update.
    pub fn zoom(&mut self, steps: f32) {
        self.distance -= steps * self.zoom_speed;
    }

    /// Applies mouse-look, advances the smoothed pivot and re-derives the
    /// camera position from the spherical orbit offset.
    pub fn update(&mut self, target: Vec3, mouse_dx: f32, mouse_dy: f32) {
        self.yaw += mouse_dx * MOUSE_SENSITIVITY;
        self.pitch -= mouse_dy * MOUSE_SENSITIVITY;
        self.pitch = self.pitch.clamp(-89.0, 89.0);
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);

        let target_pivot = Vec3::new(target.x, target.y + EYE_HEIGHT, target.z);
        self.pivot_point = self
            .pivot_point
            .add(&target_pivot.sub(&self.pivot_point).scale(self.lerp_factor));

        let rad_yaw = self.yaw.to_radians();
        let rad_pitch = self.pitch.to_radians();
        let offset = Vec3::new(
            self.distance * rad_pitch.cos() * rad_yaw.cos(),
            self.distance * rad_pitch.sin(),
            self.distance * rad_pitch.cos() * rad_yaw.sin(),
        );
        self.position = self.pivot_point.sub(&offset);
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}
