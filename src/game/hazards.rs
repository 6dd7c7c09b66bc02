use raylib::prelude::Vector2;

use crate::config::{FIRE_ZONE_DOT, FIRE_ZONE_LIFE, FIRE_ZONE_RADIUS};
use crate::entities::{CombatEffect, EffectKind, Faction};
use crate::math::vec2_distance;

use super::tanks::Tank;
use super::Game;

/// Lingering burn patch left by an incendiary. Lifetime counts in frames.
#[derive(Clone, Debug)]
pub struct FireZone {
    pub pos: Vector2,
    pub faction: Faction,
    pub radius: f32,
    pub life: u32,
    pub max_life: u32,
}

impl FireZone {
    pub fn new(pos: Vector2, faction: Faction) -> Self {
        Self {
            pos,
            faction,
            radius: FIRE_ZONE_RADIUS,
            life: FIRE_ZONE_LIFE,
            max_life: FIRE_ZONE_LIFE,
        }
    }
}

impl Game {
    pub(super) fn ignite_fire_zone(&mut self, pos: Vector2, faction: Faction) {
        self.fire_zones.push(FireZone::new(pos, faction));
    }

    /// Ticks every zone, burning opposing tanks still inside the patch.
    /// Enemies burned to death are swept by `resolve_enemy_kills` after.
    pub(super) fn update_fire_zones(&mut self) {
        let Game {
            fire_zones,
            squad,
            enemies,
            effects,
            wreckage,
            ..
        } = self;

        fire_zones.retain_mut(|zone| {
            zone.life -= 1;
            if zone.life == 0 {
                return false;
            }
            let targets: &mut Vec<Tank> = match zone.faction {
                Faction::Squad => enemies,
                Faction::Enemy => squad,
            };
            for tank in targets.iter_mut() {
                if tank.is_destroyed() {
                    continue;
                }
                if vec2_distance(zone.pos, tank.pos) < zone.radius + tank.half_width()
                    && tank.take_damage(FIRE_ZONE_DOT)
                {
                    effects.push(CombatEffect::new(tank.pos, EffectKind::Explosion));
                    if tank.faction == Faction::Squad {
                        // Enemy wrecks are recorded by the roster sweep.
                        Game::push_wreck(wreckage, tank);
                    }
                }
            }
            true
        });
    }
}
