use raylib::prelude::{Camera2D, KeyboardKey, MouseButton, RaylibHandle, Vector2};

use crate::math::vec2;

#[derive(Clone, Copy, Debug, Default)]
pub struct DriveInput {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

/// Everything the simulation consumes for one frame, built outside `Game` so
/// tests can drive the update loop without a window.
#[derive(Clone, Copy, Debug)]
pub struct FrameInput {
    pub now_ms: f64,
    pub drive: DriveInput,
    /// Aim point in world space.
    pub aim: Vector2,
    pub fire_cannon: bool,
    pub fire_mg: bool,
    pub throw_firebomb: bool,
    pub fire_shotgun: bool,
    pub drop_mine: bool,
    pub ultimate: bool,
    pub switch_tank: bool,
    pub pause: bool,
    pub confirm: bool,
}

impl FrameInput {
    pub fn idle(now_ms: f64) -> Self {
        Self {
            now_ms,
            drive: DriveInput::default(),
            aim: vec2(0.0, 0.0),
            fire_cannon: false,
            fire_mg: false,
            throw_firebomb: false,
            fire_shotgun: false,
            drop_mine: false,
            ultimate: false,
            switch_tank: false,
            pause: false,
            confirm: false,
        }
    }
}

// One-shot actions use pressed-edge queries; held weapons and driving use down.
pub fn sample(rl: &RaylibHandle, camera: &Camera2D, now_ms: f64) -> FrameInput {
    let aim = rl.get_screen_to_world2D(rl.get_mouse_position(), *camera);

    let drive = DriveInput {
        forward: rl.is_key_down(KeyboardKey::KEY_W) || rl.is_key_down(KeyboardKey::KEY_UP),
        reverse: rl.is_key_down(KeyboardKey::KEY_S) || rl.is_key_down(KeyboardKey::KEY_DOWN),
        left: rl.is_key_down(KeyboardKey::KEY_A) || rl.is_key_down(KeyboardKey::KEY_LEFT),
        right: rl.is_key_down(KeyboardKey::KEY_D) || rl.is_key_down(KeyboardKey::KEY_RIGHT),
    };

    FrameInput {
        now_ms,
        drive,
        aim,
        fire_cannon: rl.is_key_pressed(KeyboardKey::KEY_SPACE)
            || rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT),
        fire_mg: rl.is_key_down(KeyboardKey::KEY_V)
            || rl.is_mouse_button_down(MouseButton::MOUSE_BUTTON_RIGHT),
        throw_firebomb: rl.is_key_pressed(KeyboardKey::KEY_F),
        fire_shotgun: rl.is_key_pressed(KeyboardKey::KEY_Q),
        drop_mine: rl.is_key_pressed(KeyboardKey::KEY_E),
        ultimate: rl.is_key_pressed(KeyboardKey::KEY_R),
        switch_tank: rl.is_key_pressed(KeyboardKey::KEY_TAB),
        pause: rl.is_key_pressed(KeyboardKey::KEY_ESCAPE),
        confirm: rl.is_key_pressed(KeyboardKey::KEY_ENTER),
    }
}
