//! Per-frame input sampling over the windowing layer.

use crate::physics::MoveInput;
use macroquad::prelude::*;

/// Everything the game loop needs from one frame of raw input.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    pub movement: MoveInput,
    pub jump_pressed: bool,
    pub mouse_dx: f32,
    pub mouse_dy: f32,
    /// Wheel clicks this frame: +1 zooms in, -1 zooms out.
    pub zoom_steps: f32,
    pub leave_requested: bool,
}

/// Samples keyboard and mouse once per frame, deriving mouse deltas from the
/// previous frame's cursor position.
pub struct InputSampler {
    last_mouse: (f32, f32),
}

impl InputSampler {
    pub fn new() -> Self {
        InputSampler {
            last_mouse: mouse_position(),
        }
    }

    /// Re-baselines the mouse delta, swallowing the cursor jump that happens
    /// when the mouse is first grabbed.
    pub fn reset(&mut self) {
        self.last_mouse = mouse_position();
    }

    pub fn sample(&mut self) -> FrameInput {
        let (mx, my) = mouse_position();
        let (mouse_dx, mouse_dy) = (mx - self.last_mouse.0, my - self.last_mouse.1);
        self.last_mouse = (mx, my);

        let wheel = mouse_wheel().1;
        let zoom_steps = if wheel > 0.0 {
            1.0
        } else if wheel < 0.0 {
            -1.0
        } else {
            0.0
        };

        FrameInput {
            movement: MoveInput {
                forward: is_key_down(KeyCode::W),
                back: is_key_down(KeyCode::S),
                left: is_key_down(KeyCode::A),
                right: is_key_down(KeyCode::D),
            },
            jump_pressed: is_key_pressed(KeyCode::Space),
            mouse_dx,
            mouse_dy,
            zoom_steps,
            leave_requested: is_key_pressed(KeyCode::Escape),
        }
    }
}

impl Default for InputSampler {
    fn default() -> Self {
        Self::new()
    }
}
