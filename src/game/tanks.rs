use rand::{rngs::SmallRng, Rng};
use raylib::prelude::Vector2;

use crate::config::{
    CANNON_BARREL_LEN, CANNON_COOLDOWN_MS, ENEMY_BASE_COOLDOWN_MS, ENEMY_BASE_HEALTH,
    ENEMY_BASE_SPEED, ENEMY_COOLDOWN_STEP_MS, ENEMY_HEALTH_PER_LEVEL, ENEMY_MIN_COOLDOWN_MS,
    ENEMY_SPEED_PER_LEVEL, FIREBOMB_COOLDOWN_MS, FIREBOMB_MAX_RANGE, MAP_HEIGHT, MAP_MARGIN,
    MAP_WIDTH, MG_COOLDOWN_MS, MG_MUZZLE_OFFSET, MG_SPREAD, MINE_COOLDOWN_MS, MINE_DROP_BACK,
    ROTATION_SPEED, SHOTGUN_COOLDOWN_MS, SHOTGUN_SPREAD, SIDE_BARREL_LEN, SQUAD_MAX_HEALTH,
    TANK_ACCEL, TANK_FRICTION, TANK_MAX_SPEED, TANK_WIDTH,
};
use crate::entities::Faction;
use crate::math::{aim_angle, heading_vec, polar_vec, vec2_add, vec2_length, vec2_scale, vec2_sub};

use super::input::DriveInput;
use super::projectiles::ShotKind;

/// Weapon-fire request the caller turns into a `Projectile`.
#[derive(Clone, Copy, Debug)]
pub struct ShotSpec {
    pub pos: Vector2,
    pub angle: f32,
    pub kind: ShotKind,
    pub target: Option<Vector2>,
}

#[derive(Clone, Debug)]
pub struct Tank {
    pub faction: Faction,
    pub pos: Vector2,
    pub body_angle: f32,
    pub turret_angle: f32,
    pub speed: f32,
    pub max_speed: f32,
    pub rotation_speed: f32,
    pub health: f32,
    pub max_health: f32,
    cannon_cooldown_ms: f64,
    last_cannon_ms: f64,
    last_mg_ms: f64,
    last_firebomb_ms: f64,
    last_shotgun_ms: f64,
    last_mine_ms: f64,
}

impl Tank {
    fn new(faction: Faction, pos: Vector2, max_speed: f32, health: f32, cannon_ms: f64) -> Self {
        Self {
            faction,
            pos,
            body_angle: 0.0,
            turret_angle: 0.0,
            speed: 0.0,
            max_speed,
            rotation_speed: ROTATION_SPEED,
            health,
            max_health: health,
            cannon_cooldown_ms: cannon_ms,
            // Never fired; every weapon is ready immediately.
            last_cannon_ms: f64::NEG_INFINITY,
            last_mg_ms: f64::NEG_INFINITY,
            last_firebomb_ms: f64::NEG_INFINITY,
            last_shotgun_ms: f64::NEG_INFINITY,
            last_mine_ms: f64::NEG_INFINITY,
        }
    }

    pub fn squad(pos: Vector2) -> Self {
        Self::new(
            Faction::Squad,
            pos,
            TANK_MAX_SPEED,
            SQUAD_MAX_HEALTH,
            CANNON_COOLDOWN_MS,
        )
    }

    pub fn enemy(pos: Vector2, level: u32) -> Self {
        let level = level as f32;
        Self::new(
            Faction::Enemy,
            pos,
            ENEMY_BASE_SPEED + level * ENEMY_SPEED_PER_LEVEL,
            ENEMY_BASE_HEALTH + level * ENEMY_HEALTH_PER_LEVEL,
            (ENEMY_BASE_COOLDOWN_MS - level as f64 * ENEMY_COOLDOWN_STEP_MS)
                .max(ENEMY_MIN_COOLDOWN_MS),
        )
    }

    pub fn half_width(&self) -> f32 {
        TANK_WIDTH * 0.5
    }

    pub fn is_destroyed(&self) -> bool {
        self.health <= 0.0
    }

    pub fn update(&mut self, drive: &DriveInput, aim: Vector2) {
        if drive.left {
            self.body_angle -= self.rotation_speed;
        }
        if drive.right {
            self.body_angle += self.rotation_speed;
        }

        if drive.forward {
            self.speed = (self.speed + TANK_ACCEL).min(self.max_speed);
        } else if drive.reverse {
            self.speed = (self.speed - TANK_ACCEL).max(-self.max_speed * 0.5);
        } else if self.speed > 0.0 {
            self.speed = (self.speed - TANK_FRICTION).max(0.0);
        } else if self.speed < 0.0 {
            self.speed = (self.speed + TANK_FRICTION).min(0.0);
        }

        self.integrate();

        if let Some(angle) = aim_angle(self.pos, aim) {
            self.turret_angle = angle;
        }
    }

    // AI paths command speed and headings directly, then integrate.
    pub fn integrate(&mut self) {
        self.pos = vec2_add(self.pos, vec2_scale(heading_vec(self.body_angle), self.speed));
    }

    pub fn clamp_to_map(&mut self) {
        self.pos.x = self.pos.x.clamp(MAP_MARGIN, MAP_WIDTH - MAP_MARGIN);
        self.pos.y = self.pos.y.clamp(MAP_MARGIN, MAP_HEIGHT - MAP_MARGIN);
    }

    fn cooled_down(last: &mut f64, cooldown: f64, now_ms: f64) -> bool {
        if now_ms - *last < cooldown {
            return false;
        }
        *last = now_ms;
        true
    }

    pub fn fire_cannon(&mut self, now_ms: f64) -> Option<ShotSpec> {
        if !Self::cooled_down(&mut self.last_cannon_ms, self.cannon_cooldown_ms, now_ms) {
            return None;
        }
        Some(ShotSpec {
            pos: vec2_add(
                self.pos,
                vec2_scale(heading_vec(self.turret_angle), CANNON_BARREL_LEN),
            ),
            angle: self.turret_angle,
            kind: ShotKind::Cannon,
            target: None,
        })
    }

    pub fn fire_mg(&mut self, now_ms: f64, rng: &mut SmallRng) -> Option<ShotSpec> {
        if !Self::cooled_down(&mut self.last_mg_ms, MG_COOLDOWN_MS, now_ms) {
            return None;
        }
        let muzzle = vec2_add(
            self.pos,
            vec2_scale(heading_vec(self.turret_angle), SIDE_BARREL_LEN),
        );
        // Side-mounted barrel: offset perpendicular to the bore.
        let pos = vec2_add(muzzle, vec2_scale(polar_vec(self.turret_angle), MG_MUZZLE_OFFSET));
        Some(ShotSpec {
            pos,
            angle: self.turret_angle + (rng.random::<f32>() - 0.5) * MG_SPREAD,
            kind: ShotKind::MachineGun,
            target: None,
        })
    }

    /// The target point is clamped to the weapon's range along the aim
    /// vector; a zero-length aim keeps the target on the tank itself.
    pub fn throw_firebomb(&mut self, now_ms: f64, target: Vector2) -> Option<ShotSpec> {
        if !Self::cooled_down(&mut self.last_firebomb_ms, FIREBOMB_COOLDOWN_MS, now_ms) {
            return None;
        }
        let delta = vec2_sub(target, self.pos);
        let dist = vec2_length(delta);
        let clamped = if dist > 0.0 {
            vec2_add(self.pos, vec2_scale(delta, dist.min(FIREBOMB_MAX_RANGE) / dist))
        } else {
            self.pos
        };
        Some(ShotSpec {
            pos: self.pos,
            angle: self.turret_angle,
            kind: ShotKind::Firebomb,
            target: Some(clamped),
        })
    }

    pub fn fire_shotgun(&mut self, now_ms: f64) -> Option<[ShotSpec; 3]> {
        if !Self::cooled_down(&mut self.last_shotgun_ms, SHOTGUN_COOLDOWN_MS, now_ms) {
            return None;
        }
        let base = vec2_add(
            self.pos,
            vec2_scale(heading_vec(self.turret_angle), SIDE_BARREL_LEN),
        );
        let pellet = |angle: f32| ShotSpec {
            pos: base,
            angle,
            kind: ShotKind::Pellet,
            target: None,
        };
        Some([
            pellet(self.turret_angle),
            pellet(self.turret_angle - SHOTGUN_SPREAD),
            pellet(self.turret_angle + SHOTGUN_SPREAD),
        ])
    }

    pub fn drop_mine(&mut self, now_ms: f64) -> Option<ShotSpec> {
        if !Self::cooled_down(&mut self.last_mine_ms, MINE_COOLDOWN_MS, now_ms) {
            return None;
        }
        Some(ShotSpec {
            pos: vec2_sub(
                self.pos,
                vec2_scale(heading_vec(self.body_angle), MINE_DROP_BACK),
            ),
            angle: 0.0,
            kind: ShotKind::Mine,
            target: None,
        })
    }

    /// Returns true exactly once, on the hit that crosses into zero health.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        let was_alive = self.health > 0.0;
        self.health = (self.health - amount).max(0.0);
        was_alive && self.health <= 0.0
    }
}
