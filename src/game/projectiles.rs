use rand::{rngs::SmallRng, Rng};
use raylib::prelude::Vector2;

use crate::config::{
    FIREBOMB_IGNITE_RANGE, FIREBOMB_STEP, IMPACT_IMPULSE, MISSILE_ACCEL, MISSILE_TOP_SPEED,
    PROJECTILE_GRACE_MS,
};
use crate::entities::{CombatEffect, EffectKind, Faction};
use crate::math::{
    heading_vec, point_in_bounds, vec2_add, vec2_distance, vec2_length, vec2_normalize, vec2_scale,
    vec2_sub,
};

use super::tanks::{ShotSpec, Tank};
use super::Game;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotKind {
    Cannon,
    MachineGun,
    Firebomb,
    Pellet,
    Mine,
    Railgun,
    Missile,
}

impl ShotKind {
    pub fn base_speed(self) -> f32 {
        match self {
            ShotKind::Cannon => 20.0,
            ShotKind::MachineGun => 15.0,
            ShotKind::Firebomb => 0.0, // arc-driven
            ShotKind::Pellet => 12.0,
            ShotKind::Mine => 0.0,
            ShotKind::Railgun => 40.0,
            ShotKind::Missile => 8.0,
        }
    }

    pub fn radius(self) -> f32 {
        match self {
            ShotKind::Cannon => 5.0,
            ShotKind::MachineGun => 2.0,
            ShotKind::Firebomb => 5.0,
            ShotKind::Pellet => 4.0,
            ShotKind::Mine => 10.0,
            ShotKind::Railgun => 3.0,
            ShotKind::Missile => 8.0,
        }
    }

    pub fn damage(self) -> f32 {
        match self {
            ShotKind::Cannon => 25.0,
            ShotKind::MachineGun => 5.0,
            ShotKind::Firebomb => 0.0, // area effect only
            ShotKind::Pellet => 15.0,
            ShotKind::Mine => 100.0,
            ShotKind::Railgun => 100.0,
            ShotKind::Missile => 80.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Projectile {
    pub pos: Vector2,
    pub vel: Vector2,
    pub angle: f32,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub faction: Faction,
    pub kind: ShotKind,
    pub created_ms: f64,
    pub target: Option<Vector2>,
}

impl Projectile {
    pub fn spawn(spec: ShotSpec, faction: Faction, now_ms: f64, rng: &mut SmallRng) -> Self {
        let mut speed = spec.kind.base_speed();
        if spec.kind == ShotKind::Pellet {
            speed += rng.random_range(0.0..2.0);
        }
        Self {
            pos: spec.pos,
            vel: vec2_scale(heading_vec(spec.angle), speed),
            angle: spec.angle,
            speed,
            radius: spec.kind.radius(),
            damage: spec.kind.damage(),
            faction,
            kind: spec.kind,
            created_ms: now_ms,
            target: spec.target,
        }
    }

    pub fn advance(&mut self) {
        match self.kind {
            ShotKind::Missile => {
                self.speed = (self.speed + MISSILE_ACCEL).min(MISSILE_TOP_SPEED);
                self.vel = vec2_scale(heading_vec(self.angle), self.speed);
                self.pos = vec2_add(self.pos, self.vel);
            }
            ShotKind::Firebomb => {
                if let Some(target) = self.target {
                    let to_target = vec2_sub(target, self.pos);
                    let dist = vec2_length(to_target);
                    if dist > 0.0 {
                        let step = dist.min(FIREBOMB_STEP);
                        self.pos = vec2_add(self.pos, vec2_scale(vec2_normalize(to_target), step));
                    }
                }
            }
            _ => {
                self.pos = vec2_add(self.pos, self.vel);
            }
        }
    }

    // The window is [created, created + grace); the boundary instant is live.
    pub fn in_grace(&self, now_ms: f64) -> bool {
        now_ms - self.created_ms < PROJECTILE_GRACE_MS
    }

    pub fn reached_target(&self) -> bool {
        match self.target {
            Some(target) => vec2_distance(self.pos, target) < FIREBOMB_IGNITE_RANGE,
            None => false,
        }
    }
}

impl Game {
    /// Collision order per projectile is obstacles, then opposing tanks, then
    /// the map bounds; the first match wins. Destroyed enemies are only
    /// marked here; `resolve_enemy_kills` sweeps them afterwards.
    pub(super) fn update_projectiles(&mut self, now_ms: f64) {
        let bounds = Game::map_bounds();
        let mut live = std::mem::take(&mut self.projectiles);
        let mut survivors = Vec::with_capacity(live.len());
        let mut ignitions: Vec<(Vector2, Faction)> = Vec::new();

        let Game {
            squad,
            enemies,
            obstacles,
            effects,
            wreckage,
            ..
        } = self;

        'each: for mut shot in live.drain(..) {
            shot.advance();

            if shot.in_grace(now_ms) {
                survivors.push(shot);
                continue;
            }

            for obstacle in obstacles.iter() {
                if vec2_distance(shot.pos, obstacle.pos) < obstacle.half_extent() + shot.radius {
                    if shot.kind == ShotKind::Firebomb {
                        ignitions.push((shot.pos, shot.faction));
                        effects.push(CombatEffect::new(shot.pos, EffectKind::Ignite));
                    }
                    effects.push(CombatEffect::new(shot.pos, EffectKind::Debris));
                    continue 'each;
                }
            }

            let opposing: &mut Vec<Tank> = match shot.faction {
                Faction::Squad => enemies,
                Faction::Enemy => squad,
            };
            for tank in opposing.iter_mut() {
                if tank.is_destroyed() {
                    continue;
                }
                if vec2_distance(shot.pos, tank.pos) < tank.half_width() + shot.radius {
                    if shot.kind == ShotKind::Firebomb {
                        ignitions.push((shot.pos, shot.faction));
                        effects.push(CombatEffect::new(shot.pos, EffectKind::Ignite));
                        continue 'each;
                    }
                    let destroyed = tank.take_damage(shot.damage);
                    tank.pos = vec2_add(tank.pos, vec2_scale(shot.vel, IMPACT_IMPULSE));
                    effects.push(CombatEffect::new(shot.pos, EffectKind::Impact));
                    if destroyed {
                        effects.push(CombatEffect::new(tank.pos, EffectKind::Explosion));
                        if tank.faction == Faction::Squad {
                            // Enemy wrecks are recorded when the roster is
                            // swept; squad tanks never leave theirs.
                            Game::push_wreck(wreckage, tank);
                        }
                    }
                    continue 'each;
                }
            }

            if shot.kind == ShotKind::Firebomb {
                if shot.reached_target() {
                    ignitions.push((shot.pos, shot.faction));
                    effects.push(CombatEffect::new(shot.pos, EffectKind::Ignite));
                    continue;
                }
            } else if !point_in_bounds(shot.pos, &bounds) {
                continue;
            }

            survivors.push(shot);
        }

        self.projectiles = survivors;
        for (pos, faction) in ignitions {
            self.ignite_fire_zone(pos, faction);
        }
    }
}
