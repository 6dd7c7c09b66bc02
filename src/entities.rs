use raylib::prelude::{Color, Vector2};

use crate::config::OBSTACLE_SIZE;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Faction {
    Squad,
    Enemy,
}

impl Faction {
    pub fn color(self) -> Color {
        match self {
            Faction::Squad => Color::new(86, 158, 74, 255),
            Faction::Enemy => Color::new(150, 150, 158, 255),
        }
    }
}

/// Static blocker; never moves, never takes damage.
#[derive(Clone, Copy, Debug)]
pub struct Obstacle {
    pub pos: Vector2,
}

impl Obstacle {
    pub fn new(pos: Vector2) -> Self {
        Self { pos }
    }

    pub fn half_extent(&self) -> f32 {
        OBSTACLE_SIZE * 0.5
    }
}

/// Display-only remnant of a destroyed tank.
#[derive(Clone, Copy, Debug)]
pub struct Wreckage {
    pub pos: Vector2,
    pub body_angle: f32,
    pub turret_angle: f32,
    pub faction: Faction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    MuzzleFlash,
    Impact,
    Debris,
    Explosion,
    Ignite,
}

/// Point event handed to the presentation layer, which turns it into particles.
#[derive(Clone, Copy, Debug)]
pub struct CombatEffect {
    pub pos: Vector2,
    pub kind: EffectKind,
}

impl CombatEffect {
    pub fn new(pos: Vector2, kind: EffectKind) -> Self {
        Self { pos, kind }
    }
}
