//! Local player integration: held-key acceleration, friction, gravity and
//! axis-separated AABB collision resolution.

use shared::{
    Cuboid, Rgb, Vec3, FRICTION, GRAVITY, JUMP_STRENGTH, MOVE_ACCEL, PLAYER_SIZE, SPAWN_POSITION,
    VELOCITY_EPSILON,
};

/// Held movement keys, sampled once per frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveInput {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

/// The locally simulated player.
#[derive(Debug, Clone)]
pub struct LocalPlayer {
    pub cuboid: Cuboid,
    pub velocity: Vec3,
    pub grounded: bool,
}

impl LocalPlayer {
    pub fn new(color: Rgb) -> Self {
        LocalPlayer {
            cuboid: Cuboid::cube(SPAWN_POSITION, PLAYER_SIZE, color),
            velocity: Vec3::ZERO,
            grounded: false,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.cuboid.position
    }

    /// Starts a jump if the player is standing on something. The vertical
    /// velocity becomes exactly the jump strength in the same tick.
    pub fn try_jump(&mut self) {
        if self.grounded {
            self.velocity.y = JUMP_STRENGTH;
            self.grounded = false;
        }
    }

    /// Advances the player one tick against the supplied obstacles.
    ///
    /// Axes resolve strictly in sequence (x, then z, then y): each axis
    /// moves, then reverts on the first overlap and zeroes that axis'
    /// velocity. The vertical pass lands on top of an obstacle when falling
    /// and bumps the head when rising. Sequential resolution avoids diagonal
    /// tunneling, but a fast mover can still pass a thin obstacle in one
    /// tick.
    pub fn step(&mut self, input: &MoveInput, camera_yaw: f32, obstacles: &[Cuboid]) {
        let rad_yaw = camera_yaw.to_radians();
        let (cos_y, sin_y) = (rad_yaw.cos(), rad_yaw.sin());
        if input.forward {
            self.velocity.x += cos_y * MOVE_ACCEL;
            self.velocity.z += sin_y * MOVE_ACCEL;
        }
        if input.back {
            self.velocity.x -= cos_y * MOVE_ACCEL;
            self.velocity.z -= sin_y * MOVE_ACCEL;
        }
        if input.left {
            self.velocity.x += sin_y * MOVE_ACCEL;
            self.velocity.z -= cos_y * MOVE_ACCEL;
        }
        if input.right {
            self.velocity.x -= sin_y * MOVE_ACCEL;
            self.velocity.z += cos_y * MOVE_ACCEL;
        }

        self.velocity.x *= FRICTION;
        self.velocity.z *= FRICTION;
        if self.velocity.x.abs() < VELOCITY_EPSILON {
            self.velocity.x = 0.0;
        }
        if self.velocity.z.abs() < VELOCITY_EPSILON {
            self.velocity.z = 0.0;
        }

        let old_x = self.cuboid.position.x;
        self.cuboid.position.x += self.velocity.x;
        if self.overlaps_any(obstacles) {
            self.cuboid.position.x = old_x;
            self.velocity.x = 0.0;
        }

        let old_z = self.cuboid.position.z;
        self.cuboid.position.z += self.velocity.z;
        if self.overlaps_any(obstacles) {
            self.cuboid.position.z = old_z;
            self.velocity.z = 0.0;
        }

        self.velocity.y -= GRAVITY;
        self.cuboid.position.y += self.velocity.y;
        self.grounded = false;
        if let Some(obstacle) = obstacles.iter().find(|o| self.cuboid.intersects(o)) {
            let half_gap = obstacle.size().y / 2.0 + self.cuboid.size().y / 2.0;
            if self.velocity.y <= 0.0 {
                // Falling: land on the obstacle's top face.
                self.cuboid.position.y = obstacle.position.y + half_gap;
                self.grounded = true;
            } else {
                // Rising: stop just below the obstacle.
                self.cuboid.position.y = obstacle.position.y - half_gap;
            }
            self.velocity.y = 0.0;
        }
    }

    fn overlaps_any(&self, obstacles: &[Cuboid]) -> bool {
        obstacles.iter().any(|o| self.cuboid.intersects(o))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use shared::{GRASS_GREEN, GROUND_POSITION, GROUND_SIZE};

    const NO_INPUT: MoveInput = MoveInput {
        forward: false,
        back: false,
        left: false,
        right: false,
    };

    fn ground() -> Cuboid {
        Cuboid::new(GROUND_POSITION, GROUND_SIZE, GRASS_GREEN)
    }

    /// Steps with no input until the player comes to rest on something.
    fn settle(player: &mut LocalPlayer, obstacles: &[Cuboid]) {
        for _ in 0..400 {
            player.step(&NO_INPUT, 0.0, obstacles);
            if player.grounded {
                return;
            }
        }
        panic!("player never landed");
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut player = LocalPlayer::new((0, 0, 255));
        assert!(!player.grounded);

        player.try_jump();
        assert_eq!(player.velocity.y, 0.0);

        player.grounded = true;
        player.try_jump();
        assert_eq!(player.velocity.y, JUMP_STRENGTH);
        assert!(!player.grounded);
    }

    #[test]
    fn test_gravity_accumulates_in_freefall() {
        let mut player = LocalPlayer::new((0, 0, 255));
        player.step(&NO_INPUT, 0.0, &[]);
        assert_approx_eq!(player.velocity.y, -GRAVITY);
        player.step(&NO_INPUT, 0.0, &[]);
        assert_approx_eq!(player.velocity.y, -2.0 * GRAVITY);
    }

    #[test]
    fn test_lands_on_ground_top_surface() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let obstacles = [ground()];
        settle(&mut player, &obstacles);

        // Ground top at -1.5 plus the player's half height.
        assert_approx_eq!(player.position().y, -0.5);
        assert_eq!(player.velocity.y, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_resolution_is_idempotent_once_settled() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let obstacles = [ground()];
        settle(&mut player, &obstacles);
        let resting = player.position();

        for _ in 0..10 {
            player.step(&NO_INPUT, 0.0, &obstacles);
            assert_eq!(player.position(), resting);
            assert!(player.grounded);
        }
    }

    #[test]
    fn test_forward_follows_camera_yaw() {
        let forward = MoveInput {
            forward: true,
            ..Default::default()
        };

        let mut player = LocalPlayer::new((0, 0, 255));
        player.step(&forward, 0.0, &[]);
        assert!(player.velocity.x > 0.0);
        assert_approx_eq!(player.velocity.z, 0.0, 1e-5);

        let mut player = LocalPlayer::new((0, 0, 255));
        player.step(&forward, 90.0, &[]);
        assert_approx_eq!(player.velocity.x, 0.0, 1e-5);
        assert!(player.velocity.z > 0.0);
    }

    #[test]
    fn test_friction_snaps_small_velocities_to_zero() {
        let mut player = LocalPlayer::new((0, 0, 255));
        player.velocity.x = VELOCITY_EPSILON;
        player.step(&NO_INPUT, 0.0, &[]);
        assert_eq!(player.velocity.x, 0.0);
    }

    #[test]
    fn test_friction_decays_horizontal_velocity() {
        let mut player = LocalPlayer::new((0, 0, 255));
        player.velocity.x = 1.0;
        player.step(&NO_INPUT, 0.0, &[]);
        assert_approx_eq!(player.velocity.x, FRICTION);
        // Vertical velocity is never damped.
        assert_approx_eq!(player.velocity.y, -GRAVITY);
    }

    #[test]
    fn test_horizontal_collision_reverts_axis_and_zeroes_velocity() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let obstacles = [ground(), Cuboid::cube(Vec3::new(2.0, -0.5, 0.0), 2.0, (0, 0, 0))];
        settle(&mut player, &obstacles);

        // The wall spans x in [1, 3]; any step into it must be undone.
        player.velocity.x = 1.0;
        player.step(&NO_INPUT, 0.0, &obstacles);
        assert_eq!(player.position().x, 0.0);
        assert_eq!(player.velocity.x, 0.0);
        assert!(player.grounded);
    }

    #[test]
    fn test_blocked_x_still_moves_z() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let obstacles = [ground(), Cuboid::cube(Vec3::new(2.0, -0.5, 0.0), 2.0, (0, 0, 0))];
        settle(&mut player, &obstacles);

        player.velocity.x = 1.0;
        player.velocity.z = 1.0;
        player.step(&NO_INPUT, 0.0, &obstacles);
        assert_eq!(player.position().x, 0.0);
        assert!(player.position().z > 0.0);
    }

    #[test]
    fn test_rising_into_obstacle_stops_below_it() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let overhead = Cuboid::cube(Vec3::new(0.0, 3.5, 0.0), 2.0, (0, 0, 0));
        player.cuboid.position = Vec3::new(0.0, -0.5, 0.0);
        player.velocity.y = 3.0;

        player.step(&NO_INPUT, 0.0, &[overhead.clone()]);

        // Head bump: snapped to just below the obstacle, still airborne.
        assert_approx_eq!(player.position().y, overhead.position.y - 2.0);
        assert_eq!(player.velocity.y, 0.0);
        assert!(!player.grounded);
    }

    #[test]
    fn test_jump_leaves_the_ground() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let obstacles = [ground()];
        settle(&mut player, &obstacles);
        let resting_y = player.position().y;

        player.try_jump();
        player.step(&NO_INPUT, 0.0, &obstacles);
        assert!(player.position().y > resting_y);
        assert!(!player.grounded);
    }

    #[test]
    fn test_lands_on_other_player_cuboid() {
        let mut player = LocalPlayer::new((0, 0, 255));
        let other = Cuboid::cube(Vec3::new(0.0, -0.5, 0.0), PLAYER_SIZE, (255, 0, 0));
        let obstacles = [other.clone()];
        settle(&mut player, &obstacles);

        // Standing on the other player's head.
        assert_approx_eq!(player.position().y, other.position.y + PLAYER_SIZE);
        assert!(player.grounded);
    }
}
