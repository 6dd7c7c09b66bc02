use rand::{rngs::SmallRng, Rng, SeedableRng};
use raylib::prelude::*;

use crate::config::{
    CANNON_BARREL_LEN, MAP_HEIGHT, MAP_WIDTH, TANK_HEIGHT, TANK_WIDTH, ULTIMATE_COOLDOWN_MS,
    WINDOW_HEIGHT, WINDOW_WIDTH,
};
use crate::entities::{CombatEffect, EffectKind, Faction};
use crate::math::{heading_vec, rad_to_deg, vec2, vec2_add, vec2_scale, with_alpha};

use super::projectiles::ShotKind;
use super::tanks::Tank;
use super::{Game, ScreenState};

const RADAR_SIZE: f32 = 200.0;

#[derive(Clone, Copy, Debug)]
struct Particle {
    pos: Vector2,
    vel: Vector2,
    life: f32,
    max_life: f32,
    size: f32,
    color: Color,
}

/// Cosmetic debris spawned from combat events; changes nothing in play.
pub struct ParticleSystem {
    particles: Vec<Particle>,
    rng: SmallRng,
}

impl ParticleSystem {
    pub fn new(seed: u64) -> Self {
        Self {
            particles: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    pub fn absorb(&mut self, effects: Vec<CombatEffect>) {
        for effect in effects {
            let (count, top_speed, life, size) = match effect.kind {
                EffectKind::MuzzleFlash => (6, 3.0, 12.0, 3.0),
                EffectKind::Impact => (8, 3.5, 18.0, 2.5),
                EffectKind::Debris => (6, 2.5, 20.0, 3.0),
                EffectKind::Explosion => (24, 5.0, 35.0, 4.0),
                EffectKind::Ignite => (12, 2.0, 25.0, 3.5),
            };
            let colors = burst_palette(effect.kind);
            for _ in 0..count {
                let angle = self.rng.random_range(0.0..std::f32::consts::TAU);
                let speed = self.rng.random_range(0.5..top_speed);
                let jitter = self.rng.random_range(0.6..1.0);
                self.particles.push(Particle {
                    pos: effect.pos,
                    vel: vec2(angle.cos() * speed, angle.sin() * speed),
                    life: life * jitter,
                    max_life: life * jitter,
                    size,
                    color: colors[self.rng.random_range(0..colors.len())],
                });
            }
        }
    }

    pub fn update(&mut self) {
        self.particles.retain_mut(|p| {
            p.pos = vec2_add(p.pos, p.vel);
            p.vel = vec2_scale(p.vel, 0.92);
            p.life -= 1.0;
            p.life > 0.0
        });
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        for p in &self.particles {
            let fade = (p.life / p.max_life).clamp(0.0, 1.0);
            d.draw_circle_v(p.pos, p.size * fade.max(0.3), with_alpha(p.color, fade));
        }
    }
}

impl Game {
    pub fn draw(&self, d: &mut RaylibDrawHandle, particles: &ParticleSystem, now_ms: f64) {
        d.clear_background(Color::new(28, 32, 30, 255));
        match self.state {
            ScreenState::Title => self.draw_title(d),
            ScreenState::Playing | ScreenState::Paused | ScreenState::SquadDown => {
                self.draw_world(d, particles);
                self.draw_hud(d, now_ms);
                if self.state == ScreenState::Paused {
                    draw_center_overlay(d, "PAUSED", "ESC to resume");
                }
                if self.state == ScreenState::SquadDown {
                    draw_center_overlay(d, "SQUAD DOWN", "Press ENTER to redeploy");
                }
            }
        }
    }

    fn draw_title(&self, d: &mut RaylibDrawHandle) {
        let title = "IRON COLUMN";
        let title_size = 56;
        let title_width = d.measure_text(title, title_size);
        d.draw_text(
            title,
            (WINDOW_WIDTH - title_width) / 2,
            180,
            title_size,
            Color::new(245, 245, 245, 255),
        );

        let subtitle = "Lead a three-tank column. Hold out as the waves grow.";
        let sub_size = 20;
        let sub_width = d.measure_text(subtitle, sub_size);
        d.draw_text(
            subtitle,
            (WINDOW_WIDTH - sub_width) / 2,
            260,
            sub_size,
            Color::new(220, 220, 220, 255),
        );

        let info = "Press ENTER to deploy";
        let info_size = 28;
        let info_width = d.measure_text(info, info_size);
        d.draw_text(
            info,
            (WINDOW_WIDTH - info_width) / 2,
            320,
            info_size,
            Color::new(240, 200, 110, 255),
        );

        let keys = "WASD drive / mouse aim / SPACE cannon / V mg / Q shotgun / F firebomb / E mine / R ultimate / TAB switch";
        let keys_size = 16;
        let keys_width = d.measure_text(keys, keys_size);
        d.draw_text(
            keys,
            (WINDOW_WIDTH - keys_width) / 2,
            400,
            keys_size,
            Color::new(180, 180, 180, 255),
        );
    }

    fn draw_world(&self, d: &mut RaylibDrawHandle, particles: &ParticleSystem) {
        let camera = self.camera();
        d.draw_mode2D(camera, |mut d2, _| {
            d2.draw_rectangle_rec(Game::map_bounds(), Color::new(52, 58, 50, 255));
            d2.draw_rectangle_lines_ex(Game::map_bounds(), 4.0, Color::new(120, 60, 50, 255));

            for wreck in &self.wreckage {
                let hull = darker(darker(wreck.faction.color()));
                draw_hull(&mut d2, wreck.pos, wreck.body_angle, hull);
                draw_barrel(&mut d2, wreck.pos, wreck.turret_angle, darker(hull));
            }

            for zone in &self.fire_zones {
                let strength = zone.life as f32 / zone.max_life as f32;
                d2.draw_circle_v(
                    zone.pos,
                    zone.radius,
                    with_alpha(Color::new(255, 120, 30, 255), 0.25 + 0.35 * strength),
                );
                d2.draw_circle_lines(
                    zone.pos.x as i32,
                    zone.pos.y as i32,
                    zone.radius,
                    with_alpha(Color::new(255, 180, 60, 255), strength),
                );
            }

            for obstacle in &self.obstacles {
                let half = obstacle.half_extent();
                d2.draw_rectangle_v(
                    vec2(obstacle.pos.x - half, obstacle.pos.y - half),
                    vec2(half * 2.0, half * 2.0),
                    Color::new(110, 95, 70, 255),
                );
                d2.draw_rectangle_lines(
                    (obstacle.pos.x - half) as i32,
                    (obstacle.pos.y - half) as i32,
                    (half * 2.0) as i32,
                    (half * 2.0) as i32,
                    Color::new(70, 60, 45, 255),
                );
            }

            for (i, tank) in self.squad.iter().enumerate() {
                if tank.is_destroyed() {
                    continue;
                }
                draw_tank(&mut d2, tank);
                if i == self.player_index {
                    d2.draw_circle_lines(
                        tank.pos.x as i32,
                        tank.pos.y as i32,
                        tank.half_width() + 14.0,
                        Color::new(255, 230, 120, 180),
                    );
                }
            }
            for tank in &self.enemies {
                if !tank.is_destroyed() {
                    draw_tank(&mut d2, tank);
                }
            }

            for shot in &self.projectiles {
                draw_projectile(&mut d2, shot);
            }

            particles.draw(&mut d2);
        });
    }

    fn draw_hud(&self, d: &mut RaylibDrawHandle, now_ms: f64) {
        d.draw_rectangle(0, 0, WINDOW_WIDTH, 44, Color::new(18, 22, 20, 220));

        let alive = self.squad.iter().filter(|t| !t.is_destroyed()).count();
        let squad_label = format!("Squad {alive}/{}", self.squad.len());
        d.draw_text(&squad_label, 20, 12, 20, Faction::Squad.color());

        let level_label = format!(
            "Level {}   Kills {}/{}",
            self.level, self.score, self.kills_for_next_level
        );
        let level_width = d.measure_text(&level_label, 20);
        d.draw_text(
            &level_label,
            (WINDOW_WIDTH - level_width) / 2,
            12,
            20,
            Color::new(240, 240, 240, 255),
        );

        let remaining = ULTIMATE_COOLDOWN_MS - (now_ms - self.last_ultimate_ms);
        let ult_label = if remaining <= 0.0 {
            "Ultimate READY".to_string()
        } else {
            format!("Ultimate {:.0}s", (remaining / 1000.0).ceil())
        };
        let ult_color = if remaining <= 0.0 {
            Color::new(120, 230, 160, 255)
        } else {
            Color::new(160, 160, 160, 255)
        };
        let ult_width = d.measure_text(&ult_label, 20);
        d.draw_text(&ult_label, WINDOW_WIDTH - ult_width - 20, 12, 20, ult_color);

        let player = self.player();
        let pct = (player.health / player.max_health).clamp(0.0, 1.0);
        d.draw_rectangle(20, 54, 260, 14, Color::new(10, 10, 10, 200));
        d.draw_rectangle(
            22,
            56,
            (256.0 * pct) as i32,
            10,
            Faction::Squad.color(),
        );
        d.draw_text("Hull", 20, 72, 16, Color::new(230, 230, 230, 220));

        self.draw_radar(d);
    }

    fn draw_radar(&self, d: &mut RaylibDrawHandle) {
        let x = WINDOW_WIDTH as f32 - RADAR_SIZE - 16.0;
        let y = WINDOW_HEIGHT as f32 - RADAR_SIZE - 16.0;
        let scale_x = RADAR_SIZE / MAP_WIDTH;
        let scale_y = RADAR_SIZE / MAP_HEIGHT;

        d.draw_rectangle(
            x as i32,
            y as i32,
            RADAR_SIZE as i32,
            RADAR_SIZE as i32,
            Color::new(14, 18, 16, 200),
        );
        d.draw_rectangle_lines(
            x as i32,
            y as i32,
            RADAR_SIZE as i32,
            RADAR_SIZE as i32,
            Color::new(90, 100, 90, 255),
        );

        for obstacle in &self.obstacles {
            d.draw_pixel(
                (x + obstacle.pos.x * scale_x) as i32,
                (y + obstacle.pos.y * scale_y) as i32,
                Color::new(140, 125, 95, 255),
            );
        }
        for tank in &self.squad {
            if !tank.is_destroyed() {
                d.draw_circle(
                    (x + tank.pos.x * scale_x) as i32,
                    (y + tank.pos.y * scale_y) as i32,
                    2.0,
                    Faction::Squad.color(),
                );
            }
        }
        for tank in &self.enemies {
            if !tank.is_destroyed() {
                d.draw_circle(
                    (x + tank.pos.x * scale_x) as i32,
                    (y + tank.pos.y * scale_y) as i32,
                    2.0,
                    Color::new(220, 80, 70, 255),
                );
            }
        }
    }
}

fn draw_tank(d: &mut RaylibDrawHandle, tank: &Tank) {
    draw_hull(d, tank.pos, tank.body_angle, tank.faction.color());
    d.draw_circle_v(tank.pos, tank.half_width() * 0.5, darker(tank.faction.color()));
    draw_barrel(d, tank.pos, tank.turret_angle, darker(tank.faction.color()));

    if tank.health < tank.max_health {
        let pct = (tank.health / tank.max_health).clamp(0.0, 1.0);
        let bar_w = 60.0;
        let bx = tank.pos.x - bar_w * 0.5;
        let by = tank.pos.y - TANK_HEIGHT * 0.5 - 18.0;
        d.draw_rectangle(bx as i32, by as i32, bar_w as i32, 6, Color::new(10, 10, 10, 190));
        d.draw_rectangle(
            (bx + 1.0) as i32,
            (by + 1.0) as i32,
            ((bar_w - 2.0) * pct) as i32,
            4,
            tank.faction.color(),
        );
    }
}

fn draw_hull(d: &mut RaylibDrawHandle, pos: Vector2, angle: f32, color: Color) {
    let dest = Rectangle {
        x: pos.x,
        y: pos.y,
        width: TANK_WIDTH,
        height: TANK_HEIGHT,
    };
    let origin = Vector2 {
        x: TANK_WIDTH * 0.5,
        y: TANK_HEIGHT * 0.5,
    };
    d.draw_rectangle_pro(dest, origin, rad_to_deg(angle), color);
}

fn draw_barrel(d: &mut RaylibDrawHandle, pos: Vector2, angle: f32, color: Color) {
    let tip = vec2_add(pos, vec2_scale(heading_vec(angle), CANNON_BARREL_LEN));
    d.draw_line_ex(pos, tip, 10.0, color);
}

fn draw_projectile(d: &mut RaylibDrawHandle, shot: &super::projectiles::Projectile) {
    match shot.kind {
        ShotKind::Mine => {
            d.draw_circle_v(shot.pos, shot.radius, Color::new(45, 45, 45, 255));
            d.draw_circle_v(shot.pos, shot.radius * 0.35, Color::new(200, 60, 50, 255));
        }
        ShotKind::Railgun => {
            let tail = vec2_add(shot.pos, vec2_scale(heading_vec(shot.angle), -60.0));
            d.draw_line_ex(tail, shot.pos, shot.radius * 2.0, Color::new(140, 200, 255, 255));
        }
        ShotKind::Missile => {
            let dest = Rectangle {
                x: shot.pos.x,
                y: shot.pos.y,
                width: shot.radius,
                height: shot.radius * 3.0,
            };
            let origin = Vector2 {
                x: shot.radius * 0.5,
                y: shot.radius * 1.5,
            };
            d.draw_rectangle_pro(dest, origin, rad_to_deg(shot.angle), Color::new(210, 210, 220, 255));
        }
        ShotKind::Firebomb => {
            d.draw_circle_v(shot.pos, shot.radius, Color::new(255, 140, 30, 255));
        }
        _ => {
            d.draw_circle_v(shot.pos, shot.radius, Color::new(250, 240, 200, 255));
        }
    }
}

fn draw_center_overlay(d: &mut RaylibDrawHandle, message: &str, prompt: &str) {
    d.draw_rectangle(0, 0, WINDOW_WIDTH, WINDOW_HEIGHT, Color::new(10, 10, 10, 160));
    let size = 46;
    let width = d.measure_text(message, size);
    d.draw_text(
        message,
        (WINDOW_WIDTH - width) / 2,
        WINDOW_HEIGHT / 2 - 40,
        size,
        Color::new(240, 240, 240, 255),
    );
    let prompt_size = 24;
    let prompt_width = d.measure_text(prompt, prompt_size);
    d.draw_text(
        prompt,
        (WINDOW_WIDTH - prompt_width) / 2,
        WINDOW_HEIGHT / 2 + 20,
        prompt_size,
        Color::new(220, 200, 120, 255),
    );
}

fn burst_palette(kind: EffectKind) -> Vec<Color> {
    match kind {
        EffectKind::MuzzleFlash => {
            vec![Color::new(255, 230, 120, 255), Color::new(255, 180, 60, 255)]
        }
        EffectKind::Impact => {
            vec![Color::new(255, 200, 120, 255), Color::new(240, 240, 240, 255)]
        }
        EffectKind::Debris => {
            vec![Color::new(140, 130, 110, 255), Color::new(100, 95, 85, 255)]
        }
        EffectKind::Explosion => vec![
            Color::new(255, 160, 40, 255),
            Color::new(230, 80, 30, 255),
            Color::new(90, 90, 90, 255),
        ],
        EffectKind::Ignite => {
            vec![Color::new(255, 140, 30, 255), Color::new(255, 200, 60, 255)]
        }
    }
}

fn darker(color: Color) -> Color {
    Color::new(
        (color.r as f32 * 0.6) as u8,
        (color.g as f32 * 0.6) as u8,
        (color.b as f32 * 0.6) as u8,
        color.a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::vec2;

    #[test]
    fn explosion_spawns_the_biggest_burst() {
        let mut system = ParticleSystem::new(3);
        system.absorb(vec![CombatEffect::new(vec2(10.0, 10.0), EffectKind::Explosion)]);
        let explosion_count = system.particles.len();

        let mut flash = ParticleSystem::new(3);
        flash.absorb(vec![CombatEffect::new(vec2(10.0, 10.0), EffectKind::MuzzleFlash)]);
        assert!(explosion_count > flash.particles.len());
    }

    #[test]
    fn particles_burn_out_over_time() {
        let mut system = ParticleSystem::new(5);
        system.absorb(vec![CombatEffect::new(vec2(0.0, 0.0), EffectKind::Impact)]);
        assert!(!system.particles.is_empty());
        for _ in 0..40 {
            system.update();
        }
        assert!(system.particles.is_empty());
    }

    #[test]
    fn particles_drift_away_from_the_event() {
        let mut system = ParticleSystem::new(8);
        system.absorb(vec![CombatEffect::new(vec2(0.0, 0.0), EffectKind::Debris)]);
        system.update();
        assert!(system
            .particles
            .iter()
            .any(|p| p.pos.x != 0.0 || p.pos.y != 0.0));
    }
}
