use raylib::prelude::Vector2;

use crate::config::{
    CROSS_FACTION_PUSH, ENEMY_CANNON_DAMAGE, OBSTACLE_SNAP_PAD, SAME_FACTION_PUSH, TANK_WIDTH,
};
use crate::entities::{CombatEffect, EffectKind, Faction};
use crate::math::{vec2, vec2_add, vec2_distance, vec2_length, vec2_normalize, vec2_scale, vec2_sub};

use super::ai;
use super::projectiles::{Projectile, ShotKind};
use super::tanks::ShotSpec;
use super::{Game, ScreenState};

// Discharge waiting to become a projectile, with an optional damage override.
type PendingShot = (ShotSpec, Faction, Option<f32>);

impl Game {
    pub fn update(&mut self, input: &super::FrameInput) {
        match self.state {
            ScreenState::Title => {
                if input.confirm {
                    self.start(input.now_ms);
                }
            }
            ScreenState::Playing => {
                if input.pause {
                    self.state = ScreenState::Paused;
                } else {
                    self.step(input);
                }
            }
            ScreenState::Paused => {
                if input.pause {
                    self.state = ScreenState::Playing;
                }
            }
            ScreenState::SquadDown => {
                if input.confirm {
                    self.spawn_squad();
                    self.state = ScreenState::Playing;
                }
            }
        }
    }

    /// One simulation frame. Kill resolution runs twice so tanks destroyed
    /// by either projectiles or fire zones are swept within the same frame.
    fn step(&mut self, input: &super::FrameInput) {
        let now_ms = input.now_ms;

        if self.squad.iter().all(|t| t.is_destroyed()) {
            self.state = ScreenState::SquadDown;
            return;
        }
        if self.player().is_destroyed() || input.switch_tank {
            self.switch_tank();
        }

        let mut pending: Vec<PendingShot> = Vec::new();
        let enemy_positions: Vec<Vector2> = self
            .enemies
            .iter()
            .filter(|t| !t.is_destroyed())
            .map(|t| t.pos)
            .collect();

        // Player tank under direct control.
        {
            let Game {
                squad,
                player_index,
                rng,
                ..
            } = self;
            let tank = &mut squad[*player_index];
            tank.update(&input.drive, input.aim);
            tank.clamp_to_map();

            if input.fire_cannon {
                if let Some(spec) = tank.fire_cannon(now_ms) {
                    pending.push((spec, Faction::Squad, None));
                }
            }
            if input.fire_mg {
                if let Some(spec) = tank.fire_mg(now_ms, rng) {
                    pending.push((spec, Faction::Squad, None));
                }
            }
            if input.throw_firebomb {
                if let Some(spec) = tank.throw_firebomb(now_ms, input.aim) {
                    pending.push((spec, Faction::Squad, None));
                }
            }
            if input.fire_shotgun {
                if let Some(specs) = tank.fire_shotgun(now_ms) {
                    for spec in specs {
                        pending.push((spec, Faction::Squad, None));
                    }
                }
            }
            if input.drop_mine {
                if let Some(spec) = tank.drop_mine(now_ms) {
                    pending.push((spec, Faction::Squad, None));
                }
            }
        }

        if input.ultimate {
            self.trigger_ultimate(now_ms);
        }

        // Escorts follow the player's tank and engage on their own.
        let leader_pos = self.player().pos;
        for (i, tank) in self.squad.iter_mut().enumerate() {
            if i == self.player_index || tank.is_destroyed() {
                continue;
            }
            if let Some(spec) = ai::drive_teammate(tank, leader_pos, &enemy_positions, now_ms) {
                pending.push((spec, Faction::Squad, None));
            }
        }

        let squad_positions: Vec<Vector2> = self
            .squad
            .iter()
            .filter(|t| !t.is_destroyed())
            .map(|t| t.pos)
            .collect();
        for tank in self.enemies.iter_mut() {
            if tank.is_destroyed() {
                continue;
            }
            if let Some(spec) = ai::drive_enemy(tank, &squad_positions, now_ms) {
                pending.push((spec, Faction::Enemy, Some(ENEMY_CANNON_DAMAGE)));
            }
        }

        self.resolve_tank_overlaps();
        self.snap_out_of_obstacles();

        for (spec, faction, damage_override) in pending {
            if spec.kind == ShotKind::Cannon {
                self.effects
                    .push(CombatEffect::new(spec.pos, EffectKind::MuzzleFlash));
            }
            let mut projectile = Projectile::spawn(spec, faction, now_ms, &mut self.rng);
            if let Some(damage) = damage_override {
                projectile.damage = damage;
            }
            self.projectiles.push(projectile);
        }

        self.update_projectiles(now_ms);
        self.resolve_enemy_kills();
        self.update_fire_zones();
        self.resolve_enemy_kills();
        self.check_pending_wave(now_ms);

        if self.squad.iter().all(|t| t.is_destroyed()) {
            self.state = ScreenState::SquadDown;
        }
    }

    // Opposing factions shove harder than squadmates.
    fn resolve_tank_overlaps(&mut self) {
        for i in 0..self.squad.len() {
            for j in (i + 1)..self.squad.len() {
                if let Some(push) =
                    overlap_push(self.squad[i].pos, self.squad[j].pos, SAME_FACTION_PUSH)
                {
                    self.squad[i].pos = vec2_sub(self.squad[i].pos, push);
                    self.squad[j].pos = vec2_add(self.squad[j].pos, push);
                }
            }
        }
        for i in 0..self.enemies.len() {
            for j in (i + 1)..self.enemies.len() {
                if let Some(push) =
                    overlap_push(self.enemies[i].pos, self.enemies[j].pos, SAME_FACTION_PUSH)
                {
                    self.enemies[i].pos = vec2_sub(self.enemies[i].pos, push);
                    self.enemies[j].pos = vec2_add(self.enemies[j].pos, push);
                }
            }
        }
        for i in 0..self.squad.len() {
            for j in 0..self.enemies.len() {
                if let Some(push) =
                    overlap_push(self.squad[i].pos, self.enemies[j].pos, CROSS_FACTION_PUSH)
                {
                    self.squad[i].pos = vec2_sub(self.squad[i].pos, push);
                    self.enemies[j].pos = vec2_add(self.enemies[j].pos, push);
                }
            }
        }
        for tank in self.squad.iter_mut().chain(self.enemies.iter_mut()) {
            tank.clamp_to_map();
        }
    }

    // Obstacles never yield; an overlapping hull is snapped outside.
    fn snap_out_of_obstacles(&mut self) {
        let Game {
            squad,
            enemies,
            obstacles,
            ..
        } = self;
        for tank in squad.iter_mut().chain(enemies.iter_mut()) {
            if tank.is_destroyed() {
                continue;
            }
            for obstacle in obstacles.iter() {
                let clearance = obstacle.half_extent() + tank.half_width();
                let delta = vec2_sub(tank.pos, obstacle.pos);
                let dist = vec2_length(delta);
                if dist < clearance {
                    let dir = if dist > 0.0 {
                        vec2_normalize(delta)
                    } else {
                        vec2(1.0, 0.0)
                    };
                    tank.pos =
                        vec2_add(obstacle.pos, vec2_scale(dir, clearance + OBSTACLE_SNAP_PAD));
                }
            }
            tank.clamp_to_map();
        }
    }
}

fn overlap_push(a: Vector2, b: Vector2, strength: f32) -> Option<Vector2> {
    let dist = vec2_distance(a, b);
    if dist >= TANK_WIDTH {
        return None;
    }
    let dir = if dist > 0.0 {
        vec2_normalize(vec2_sub(b, a))
    } else {
        vec2(1.0, 0.0)
    };
    Some(vec2_scale(dir, strength))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OBSTACLE_SIZE;
    use crate::entities::Obstacle;
    use crate::game::input::FrameInput;
    use crate::game::tanks::Tank;
    use crate::game::test_game;

    #[test]
    fn title_screen_waits_for_confirm() {
        let mut game = Game::new(1);
        game.update(&FrameInput::idle(0.0));
        assert_eq!(game.state, ScreenState::Title);

        let mut confirm = FrameInput::idle(0.0);
        confirm.confirm = true;
        game.update(&confirm);
        assert_eq!(game.state, ScreenState::Playing);
        assert_eq!(game.squad.len(), 3);
    }

    #[test]
    fn pause_freezes_the_simulation() {
        let mut game = test_game();
        let mut pause = FrameInput::idle(0.0);
        pause.pause = true;
        game.update(&pause);
        assert_eq!(game.state, ScreenState::Paused);

        let before: Vec<_> = game.enemies.iter().map(|t| t.pos).collect();
        game.update(&FrameInput::idle(16.0));
        let after: Vec<_> = game.enemies.iter().map(|t| t.pos).collect();
        for (b, a) in before.iter().zip(&after) {
            assert_eq!(b.x, a.x);
            assert_eq!(b.y, a.y);
        }

        let mut unpause = FrameInput::idle(32.0);
        unpause.pause = true;
        game.update(&unpause);
        assert_eq!(game.state, ScreenState::Playing);
    }

    #[test]
    fn squad_wipe_ends_the_run_and_confirm_redeploys() {
        let mut game = test_game();
        for tank in &mut game.squad {
            tank.take_damage(f32::INFINITY);
        }
        game.update(&FrameInput::idle(0.0));
        assert_eq!(game.state, ScreenState::SquadDown);

        let mut confirm = FrameInput::idle(100.0);
        confirm.confirm = true;
        game.update(&confirm);
        assert_eq!(game.state, ScreenState::Playing);
        assert_eq!(game.squad.len(), 3);
        assert!(game.squad.iter().all(|t| !t.is_destroyed()));
    }

    #[test]
    fn losing_the_controlled_tank_hands_over_to_a_survivor() {
        let mut game = test_game();
        game.enemies.clear();
        game.squad[1].take_damage(f32::INFINITY);
        game.update(&FrameInput::idle(0.0));
        assert_eq!(game.state, ScreenState::Playing);
        assert_ne!(game.player_index, 1);
        assert!(!game.player().is_destroyed());
    }

    #[test]
    fn cannon_input_spawns_a_round_and_a_muzzle_flash() {
        let mut game = test_game();
        game.enemies.clear();
        game.obstacles.clear();
        let mut input = FrameInput::idle(0.0);
        input.fire_cannon = true;
        input.aim = vec2(2000.0, 1000.0);
        game.update(&input);

        let rounds: Vec<_> = game
            .projectiles
            .iter()
            .filter(|p| p.kind == ShotKind::Cannon)
            .collect();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].faction, Faction::Squad);
        assert!(game
            .effects
            .iter()
            .any(|e| e.kind == EffectKind::MuzzleFlash));
    }

    #[test]
    fn enemy_rounds_carry_the_reduced_damage() {
        let mut game = test_game();
        game.obstacles.clear();
        game.enemies = vec![Tank::enemy(vec2(1000.0, 1300.0), 1)];
        game.update(&FrameInput::idle(0.0));

        let enemy_rounds: Vec<_> = game
            .projectiles
            .iter()
            .filter(|p| p.faction == Faction::Enemy)
            .collect();
        assert_eq!(enemy_rounds.len(), 1);
        assert_eq!(enemy_rounds[0].damage, ENEMY_CANNON_DAMAGE);
    }

    #[test]
    fn overlapping_hulls_are_pushed_apart() {
        let mut game = test_game();
        game.obstacles.clear();
        game.enemies.clear();
        game.squad[0].pos = vec2(1000.0, 1000.0);
        game.squad[1].pos = vec2(1030.0, 1000.0);
        game.squad[2].pos = vec2(1800.0, 1800.0);
        let gap_before = vec2_distance(game.squad[0].pos, game.squad[1].pos);

        game.resolve_tank_overlaps();
        let gap_after = vec2_distance(game.squad[0].pos, game.squad[1].pos);
        assert!(gap_after > gap_before);
        assert!((gap_after - (gap_before + 2.0 * SAME_FACTION_PUSH)).abs() < 1e-3);
    }

    #[test]
    fn cross_faction_ram_shoves_harder_than_squadmates() {
        let mut game = test_game();
        game.obstacles.clear();
        game.squad[0].pos = vec2(600.0, 600.0);
        game.squad[1].pos = vec2(1400.0, 1400.0);
        game.squad[2].pos = vec2(1800.0, 1800.0);
        game.enemies = vec![Tank::enemy(vec2(630.0, 600.0), 1)];

        game.resolve_tank_overlaps();
        let gap = vec2_distance(game.squad[0].pos, game.enemies[0].pos);
        assert!((gap - (30.0 + 2.0 * CROSS_FACTION_PUSH)).abs() < 1e-3);
    }

    #[test]
    fn coincident_hulls_still_separate() {
        let mut game = test_game();
        game.obstacles.clear();
        game.enemies.clear();
        let pos = vec2(700.0, 700.0);
        game.squad[0].pos = pos;
        game.squad[1].pos = pos;
        game.squad[2].pos = vec2(1800.0, 1800.0);

        game.resolve_tank_overlaps();
        assert!(vec2_distance(game.squad[0].pos, game.squad[1].pos) > 0.0);
    }

    #[test]
    fn hull_inside_an_obstacle_is_snapped_out() {
        let mut game = test_game();
        game.enemies.clear();
        let block = vec2(1000.0, 980.0);
        game.obstacles = vec![Obstacle::new(block)];

        game.snap_out_of_obstacles();
        let clearance = OBSTACLE_SIZE * 0.5 + game.squad[1].half_width();
        for tank in &game.squad {
            assert!(vec2_distance(tank.pos, block) >= clearance);
        }
    }

    #[test]
    fn idle_frames_keep_the_wave_pressure_on() {
        let mut game = test_game();
        for frame in 0..120 {
            game.update(&FrameInput::idle(frame as f64 * 16.0));
        }
        assert_eq!(game.state, ScreenState::Playing);
        assert!(!game.enemies.is_empty());
        for enemy in &game.enemies {
            assert!(enemy.pos.x.is_finite() && enemy.pos.y.is_finite());
        }
    }
}
