//! Authoritative world state: one-time world generation and the shared
//! player registry.

use log::info;
use rand::Rng;
use shared::{CubeDef, PlayerState, Rgb, Vec3, GRASS_GREEN, GROUND_POSITION, GROUND_SIZE};
use std::collections::HashMap;

/// Generates the static world: the ground platform plus `count` randomly
/// placed cuboids resting on its top surface. Runs once at startup; the
/// result is immutable for the lifetime of the process.
pub fn generate_world<R: Rng>(count: usize, rng: &mut R) -> Vec<CubeDef> {
    let mut cubes = Vec::with_capacity(count + 1);
    cubes.push(CubeDef {
        position: GROUND_POSITION,
        size: GROUND_SIZE,
        color: GRASS_GREEN,
    });

    for _ in 0..count {
        let size = rng.gen_range(3.0..10.0);
        // The ground's top surface sits at y = -1.5; rest each cube on it.
        let position = Vec3::new(
            rng.gen_range(-70.0..70.0),
            -1.5 + size / 2.0,
            rng.gen_range(-70.0..70.0),
        );
        let color = (
            rng.gen_range(200..=255),
            rng.gen_range(200..=255),
            rng.gen_range(200..=255),
        );
        cubes.push(CubeDef {
            position,
            size: Vec3::new(size, size, size),
            color,
        });
    }

    cubes
}

/// Picks the color a player keeps for their whole session.
pub fn random_player_color<R: Rng>(rng: &mut R) -> Rgb {
    (rng.gen(), rng.gen(), rng.gen())
}

/// Roster of connected players.
///
/// Ids are handed out strictly increasing and are never reused, even when
/// the connection that consumed one fails its handshake. All access goes
/// through the single lock wrapping this struct; each connection handler
/// only ever writes its own player's entry.
#[derive(Debug)]
pub struct PlayerRegistry {
    players: HashMap<u32, PlayerState>,
    next_player_id: u32,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        PlayerRegistry {
            players: HashMap::new(),
            next_player_id: 1,
        }
    }

    /// Reserves the next player id. The id is consumed even if the
    /// connection never completes its handshake.
    pub fn allocate_id(&mut self) -> u32 {
        let id = self.next_player_id;
        self.next_player_id += 1;
        id
    }

    /// Registers a player at the spawn position after a completed handshake.
    pub fn register(&mut self, id: u32, name: String, color: Rgb) {
        info!("Player '{}' (id {}) joined", name, id);
        self.players.insert(id, PlayerState::new(id, color, name));
    }

    /// Overwrites a player's position from their own update.
    pub fn update_position(&mut self, id: u32, position: Vec3) {
        if let Some(player) = self.players.get_mut(&id) {
            player.position = position;
        }
    }

    /// Removes a player on disconnect. Returns true when they were present.
    pub fn remove(&mut self, id: u32) -> bool {
        match self.players.remove(&id) {
            Some(player) => {
                info!("Player '{}' (id {}) left", player.name, id);
                true
            }
            None => false,
        }
    }

    /// Clone of the current roster, for snapshot assembly.
    pub fn players(&self) -> HashMap<u32, PlayerState> {
        self.players.clone()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}

impl Default for PlayerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use shared::SPAWN_POSITION;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let mut registry = PlayerRegistry::new();
        assert_eq!(registry.allocate_id(), 1);
        assert_eq!(registry.allocate_id(), 2);
        assert_eq!(registry.allocate_id(), 3);
    }

    #[test]
    fn test_ids_never_reused_after_disconnect() {
        let mut registry = PlayerRegistry::new();
        let a = registry.allocate_id();
        registry.register(a, "a".to_string(), (0, 0, 0));
        let b = registry.allocate_id();
        registry.register(b, "b".to_string(), (0, 0, 0));

        assert!(registry.remove(a));
        assert!(registry.remove(b));
        assert!(registry.is_empty());

        // Ids keep climbing regardless of departures.
        assert_eq!(registry.allocate_id(), 3);
    }

    #[test]
    fn test_failed_handshake_consumes_id_without_registering() {
        let mut registry = PlayerRegistry::new();
        let ghost = registry.allocate_id();
        assert_eq!(ghost, 1);
        // No register() call: the connection died before sending a name.
        assert!(registry.is_empty());
        assert!(!registry.remove(ghost));
        assert_eq!(registry.allocate_id(), 2);
    }

    #[test]
    fn test_register_spawns_at_default_position() {
        let mut registry = PlayerRegistry::new();
        let id = registry.allocate_id();
        registry.register(id, "alice".to_string(), (9, 8, 7));

        let players = registry.players();
        assert_eq!(players.len(), 1);
        assert_eq!(players[&id].position, SPAWN_POSITION);
        assert_eq!(players[&id].color, (9, 8, 7));
        assert_eq!(players[&id].name, "alice");
    }

    #[test]
    fn test_update_position_touches_only_that_player() {
        let mut registry = PlayerRegistry::new();
        let a = registry.allocate_id();
        registry.register(a, "a".to_string(), (0, 0, 0));
        let b = registry.allocate_id();
        registry.register(b, "b".to_string(), (0, 0, 0));

        registry.update_position(a, Vec3::new(1.0, 5.0, 1.0));

        let players = registry.players();
        assert_eq!(players[&a].position, Vec3::new(1.0, 5.0, 1.0));
        assert_eq!(players[&b].position, SPAWN_POSITION);
    }

    #[test]
    fn test_update_position_for_unknown_id_is_a_no_op() {
        let mut registry = PlayerRegistry::new();
        registry.update_position(99, Vec3::new(1.0, 1.0, 1.0));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_world_generation_shape() {
        let mut rng = rand::thread_rng();
        let world = generate_world(30, &mut rng);

        assert_eq!(world.len(), 31);

        // The ground always comes first.
        assert_eq!(world[0].position, GROUND_POSITION);
        assert_eq!(world[0].size, GROUND_SIZE);
        assert_eq!(world[0].color, GRASS_GREEN);

        for cube in &world[1..] {
            let size = cube.size.x;
            assert!((3.0..10.0).contains(&size));
            assert_eq!(cube.size, Vec3::new(size, size, size));

            // Every cube rests on the ground's top surface.
            assert_approx_eq!(cube.position.y, -1.5 + size / 2.0);
            assert!((-70.0..70.0).contains(&cube.position.x));
            assert!((-70.0..70.0).contains(&cube.position.z));

            assert!(cube.color.0 >= 200);
            assert!(cube.color.1 >= 200);
            assert!(cube.color.2 >= 200);
        }
    }

    #[test]
    fn test_world_generation_with_no_extra_cubes() {
        let mut rng = rand::thread_rng();
        let world = generate_world(0, &mut rng);
        assert_eq!(world.len(), 1);
        assert_eq!(world[0].color, GRASS_GREEN);
    }
}
