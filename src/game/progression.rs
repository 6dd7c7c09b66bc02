use log::info;

use crate::config::{
    SQUAD_HEAL, ULTIMATE_COOLDOWN_MS, WAVE_RESPAWN_DELAY_MS,
};
use crate::entities::{CombatEffect, EffectKind};

use super::Game;

impl Game {
    /// Sweeps destroyed enemies out of the roster and settles each kill.
    /// Damage sources only mark tanks dead; the roster mutates here.
    pub(super) fn resolve_enemy_kills(&mut self) {
        let mut fallen = Vec::new();
        self.enemies.retain(|enemy| {
            if enemy.is_destroyed() {
                fallen.push(enemy.clone());
                false
            } else {
                true
            }
        });

        for enemy in fallen {
            self.score += 1;
            info!(
                "enemy destroyed at ({:.0}, {:.0}), score {}/{}",
                enemy.pos.x, enemy.pos.y, self.score, self.kills_for_next_level
            );
            self.effects
                .push(CombatEffect::new(enemy.pos, EffectKind::Explosion));
            Game::push_wreck(&mut self.wreckage, &enemy);
            if self.score >= self.kills_for_next_level {
                self.level_up();
            }
        }

        // Never leave the field empty between waves.
        if self.enemies.is_empty() && self.pending_wave_ms.is_none() {
            self.spawn_enemy();
        }
    }

    fn level_up(&mut self) {
        self.level += 1;
        self.kills_for_next_level += 5 + self.level * 2;
        for tank in &mut self.squad {
            if !tank.is_destroyed() {
                tank.health = (tank.health + SQUAD_HEAL).min(tank.max_health);
            }
        }
        self.regenerate_obstacles();
        self.spawn_wave();
        info!(
            "level {} reached, next threshold {} kills, wave of {}",
            self.level,
            self.kills_for_next_level,
            self.enemies.len()
        );
    }

    /// Wipes every enemy on the field, then either levels up or schedules a
    /// delayed replacement wave.
    pub(super) fn trigger_ultimate(&mut self, now_ms: f64) {
        if now_ms - self.last_ultimate_ms < ULTIMATE_COOLDOWN_MS {
            return;
        }
        self.last_ultimate_ms = now_ms;

        let wiped: Vec<_> = self.enemies.drain(..).collect();
        info!("ultimate fired, {} enemies destroyed", wiped.len());
        for enemy in wiped {
            self.score += 1;
            self.effects
                .push(CombatEffect::new(enemy.pos, EffectKind::Explosion));
            Game::push_wreck(&mut self.wreckage, &enemy);
        }

        if self.score >= self.kills_for_next_level {
            self.level_up();
        } else {
            self.pending_wave_ms = Some(now_ms + WAVE_RESPAWN_DELAY_MS);
        }
    }

    pub(super) fn check_pending_wave(&mut self, now_ms: f64) {
        if let Some(due) = self.pending_wave_ms {
            if now_ms >= due {
                self.pending_wave_ms = None;
                self.spawn_wave();
            }
        }
    }
}
