//! Per-frame orchestration: the title screen, the in-game session loop,
//! scene assembly and overlay drawing.

use crate::camera::Camera;
use crate::input::InputSampler;
use crate::network::ServerConnection;
use crate::physics::LocalPlayer;
use crate::render::{build_scene, draw_scene, project_world_point};
use log::{error, info, warn};
use macroquad::prelude::*;
use shared::{
    Cuboid, PlayerState, Rgb, Vec3, WorldSnapshot, EYE_HEIGHT, GRASS_GREEN, GROUND_POSITION,
    GROUND_SIZE,
};
use std::collections::HashMap;

/// Color the local cuboid wears until the server assigns one.
const DEFAULT_PLAYER_COLOR: Rgb = (0, 0, 255);

enum Phase {
    /// Title screen; `status` carries the last connection error, if any.
    Title { status: Option<String> },
    InGame,
}

pub struct Game {
    server_addr: String,
    player_name: String,
    phase: Phase,
    input: InputSampler,
    camera: Camera,
    player: LocalPlayer,
    connection: Option<ServerConnection>,
    player_id: u32,
    /// Latest authoritative roster, replaced wholesale every tick.
    roster: HashMap<u32, PlayerState>,
    /// Ground platform present before the first snapshot arrives, so the
    /// player has something to stand on while the world loads.
    static_platforms: Vec<Cuboid>,
    world_cubes: Vec<Cuboid>,
    world_initialized: bool,
}

impl Game {
    pub fn new(server_addr: String, player_name: String) -> Self {
        Game {
            server_addr,
            player_name,
            phase: Phase::Title { status: None },
            input: InputSampler::new(),
            camera: Camera::new(),
            player: LocalPlayer::new(DEFAULT_PLAYER_COLOR),
            connection: None,
            player_id: 0,
            roster: HashMap::new(),
            static_platforms: vec![Cuboid::new(GROUND_POSITION, GROUND_SIZE, GRASS_GREEN)],
            world_cubes: Vec::new(),
            world_initialized: false,
        }
    }

    pub async fn run(mut self) {
        loop {
            let in_game = matches!(self.phase, Phase::InGame);
            if in_game {
                self.game_frame();
            } else if self.title_frame() {
                break;
            }
            next_frame().await;
        }
    }

    /// Returns true when the player asked to quit.
    fn title_frame(&mut self) -> bool {
        clear_background(Color::from_rgba(10, 20, 30, 255));
        let h = screen_height();

        draw_centered_text("CUBOID WORLD", h / 2.0 - 120.0, 48.0);
        draw_centered_text(
            &format!("{} @ {}", self.player_name, self.server_addr),
            h / 2.0 - 60.0,
            24.0,
        );
        draw_centered_text("Enter: connect    Esc: quit", h / 2.0, 24.0);

        if let Phase::Title {
            status: Some(status),
        } = &self.phase
        {
            let dims = measure_text(status, None, 20, 1.0);
            draw_text(
                status,
                (screen_width() - dims.width) / 2.0,
                h / 2.0 + 60.0,
                20.0,
                RED,
            );
        }

        if is_key_pressed(KeyCode::Enter) {
            self.try_connect();
        }
        is_key_pressed(KeyCode::Escape)
    }

    fn try_connect(&mut self) {
        info!("Connecting to {} as {}", self.server_addr, self.player_name);
        match ServerConnection::connect(&self.server_addr, &self.player_name) {
            Ok(connection) => {
                self.player_id = connection.player_id();
                self.connection = Some(connection);
                self.player = LocalPlayer::new(DEFAULT_PLAYER_COLOR);
                self.camera = Camera::new();
                self.camera.pivot_point = self.player.position();
                self.roster.clear();
                self.phase = Phase::InGame;
                set_cursor_grab(true);
                show_mouse(false);
                self.input.reset();
            }
            Err(e) => {
                error!("Connection failed: {}", e);
                self.phase = Phase::Title {
                    status: Some(format!("Connection failed: {}", e)),
                };
            }
        }
    }

    /// Tears the session down and returns to the title screen, resetting
    /// everything the next session must not inherit.
    fn leave_session(&mut self, status: Option<String>) {
        if let Some(connection) = self.connection.take() {
            connection.shutdown();
        }
        self.world_initialized = false;
        self.world_cubes.clear();
        self.roster.clear();
        self.phase = Phase::Title { status };
        set_cursor_grab(false);
        show_mouse(true);
    }

    fn game_frame(&mut self) {
        let frame = self.input.sample();
        if frame.leave_requested {
            info!("Leaving session");
            self.leave_session(None);
            return;
        }

        self.camera.zoom(frame.zoom_steps);
        self.camera
            .update(self.player.position(), frame.mouse_dx, frame.mouse_dy);

        if frame.jump_pressed {
            self.player.try_jump();
        }
        let obstacles = self.obstacle_cuboids();
        self.player
            .step(&frame.movement, self.camera.yaw, &obstacles);

        let lost = match self.connection.as_mut() {
            Some(connection) => match connection.exchange(self.player.position()) {
                Ok(snapshot) => {
                    self.apply_snapshot(snapshot);
                    false
                }
                Err(e) => {
                    warn!("Connection to server lost: {}", e);
                    true
                }
            },
            None => true,
        };
        if lost {
            self.leave_session(Some("Connection to server lost".to_string()));
            return;
        }

        self.draw_world();
    }

    /// Static platforms, then the server world, then the other players'
    /// cuboids rebuilt from the latest snapshot. Remote positions are one
    /// round trip stale, so collisions against them jitter under latency;
    /// that is inherent to snapshot-driven obstacles.
    fn obstacle_cuboids(&self) -> Vec<Cuboid> {
        let mut obstacles: Vec<Cuboid> = self
            .static_platforms
            .iter()
            .chain(self.world_cubes.iter())
            .cloned()
            .collect();
        for (id, player) in &self.roster {
            if *id != self.player_id {
                obstacles.push(player.cuboid());
            }
        }
        obstacles
    }

    fn apply_snapshot(&mut self, snapshot: WorldSnapshot) {
        self.roster = snapshot.players;

        // The cube list rides along on every reply; build it only once.
        if !self.world_initialized {
            self.world_cubes = snapshot.cubes.iter().map(|c| c.to_cuboid()).collect();
            self.world_initialized = true;
            info!("World initialized with {} cubes", self.world_cubes.len());
        }

        // Wear the color the server assigned us.
        if let Some(me) = self.roster.get(&self.player_id) {
            self.player.cuboid.color = me.color;
        }
    }

    fn draw_world(&mut self) {
        clear_background(BLACK);
        let (width, height) = (screen_width(), screen_height());

        let remote_players: Vec<Cuboid> = self
            .roster
            .iter()
            .filter(|(id, _)| **id != self.player_id)
            .map(|(_, p)| p.cuboid())
            .collect();

        let scene = build_scene(
            &self.camera,
            self.static_platforms
                .iter()
                .chain(self.world_cubes.iter())
                .chain(remote_players.iter())
                .chain(std::iter::once(&self.player.cuboid)),
            width,
            height,
        );
        draw_scene(&scene);

        self.draw_nametags(width, height);
        self.draw_hud();
    }

    fn draw_nametags(&self, width: f32, height: f32) {
        for player in self.roster.values() {
            let anchor = Vec3::new(
                player.position.x,
                player.position.y + EYE_HEIGHT,
                player.position.z,
            );
            if let Some((x, y)) = project_world_point(&self.camera, anchor, width, height) {
                let dims = measure_text(&player.name, None, 16, 1.0);
                draw_rectangle(
                    x - dims.width / 2.0 - 4.0,
                    y - dims.offset_y - 2.0,
                    dims.width + 8.0,
                    dims.height + 4.0,
                    Color::from_rgba(20, 20, 40, 150),
                );
                draw_text(&player.name, x - dims.width / 2.0, y, 16.0, WHITE);
            }
        }
    }

    fn draw_hud(&self) {
        let my_name = self
            .roster
            .get(&self.player_id)
            .map(|p| p.name.as_str())
            .unwrap_or("");
        draw_text(
            &format!("Connected as {} | Exit: ESC", my_name),
            10.0,
            24.0,
            18.0,
            WHITE,
        );
    }
}

fn draw_centered_text(text: &str, y: f32, font_size: f32) {
    let dims = measure_text(text, None, font_size as u16, 1.0);
    draw_text(text, (screen_width() - dims.width) / 2.0, y, font_size, WHITE);
}
