use std::collections::VecDeque;

use rand::{rngs::SmallRng, Rng, SeedableRng};
use raylib::prelude::{Camera2D, Rectangle, Vector2};

use crate::config::{
    BASE_KILL_TARGET, ENEMY_SAFE_SPAWN_DIST, MAP_HEIGHT, MAP_MARGIN, MAP_WIDTH,
    OBSTACLE_BASE_COUNT, OBSTACLE_PER_LEVEL, SPAWN_CLEAR_HALF, SQUAD_SIZE, SQUAD_SPACING,
    WINDOW_HEIGHT, WINDOW_WIDTH, WRECKAGE_CAP,
};
use crate::entities::{CombatEffect, Obstacle, Wreckage};
use crate::math::{vec2, vec2_distance};

mod ai;
mod hazards;
pub mod input;
mod progression;
mod projectiles;
pub mod render;
mod tanks;
mod update;

pub use input::FrameInput;
pub use render::ParticleSystem;

use hazards::FireZone;
use projectiles::Projectile;
use tanks::Tank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenState {
    Title,
    Playing,
    Paused,
    SquadDown,
}

/// Owns every entity list; per-frame systems live in the sibling modules.
pub struct Game {
    pub state: ScreenState,
    pub(crate) squad: Vec<Tank>,
    pub(crate) player_index: usize,
    pub(crate) enemies: Vec<Tank>,
    pub(crate) projectiles: Vec<Projectile>,
    pub(crate) fire_zones: Vec<FireZone>,
    pub(crate) obstacles: Vec<Obstacle>,
    pub(crate) wreckage: VecDeque<Wreckage>,
    pub(crate) effects: Vec<CombatEffect>,
    pub(crate) rng: SmallRng,
    pub(crate) score: u32,
    pub(crate) level: u32,
    pub(crate) kills_for_next_level: u32,
    pub(crate) last_ultimate_ms: f64,
    pub(crate) pending_wave_ms: Option<f64>,
}

impl Game {
    pub fn new(seed: u64) -> Self {
        Self {
            state: ScreenState::Title,
            squad: Vec::new(),
            player_index: 0,
            enemies: Vec::new(),
            projectiles: Vec::new(),
            fire_zones: Vec::new(),
            obstacles: Vec::new(),
            wreckage: VecDeque::new(),
            effects: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            score: 0,
            level: 1,
            kills_for_next_level: BASE_KILL_TARGET,
            last_ultimate_ms: f64::NEG_INFINITY,
            pending_wave_ms: None,
        }
    }

    pub fn start(&mut self, _now_ms: f64) {
        self.squad.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.fire_zones.clear();
        self.wreckage.clear();
        self.effects.clear();
        self.player_index = 0;
        self.score = 0;
        self.level = 1;
        self.kills_for_next_level = BASE_KILL_TARGET;
        self.last_ultimate_ms = f64::NEG_INFINITY;
        self.pending_wave_ms = None;

        self.spawn_squad();
        self.regenerate_obstacles();
        self.spawn_wave();
        self.state = ScreenState::Playing;
    }

    // Line abreast at map center, player in the middle slot.
    pub(crate) fn spawn_squad(&mut self) {
        let center = vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5);
        self.squad = (0..SQUAD_SIZE)
            .map(|i| {
                let offset = (i as f32 - (SQUAD_SIZE - 1) as f32 * 0.5) * SQUAD_SPACING;
                Tank::squad(vec2(center.x + offset, center.y))
            })
            .collect();
        self.player_index = SQUAD_SIZE / 2;
    }

    pub(crate) fn spawn_wave(&mut self) {
        let count = 1 + self.level.div_ceil(2);
        for _ in 0..count {
            self.spawn_enemy();
        }
    }

    // Keeps a safe distance from the squad's rally point.
    pub(crate) fn spawn_enemy(&mut self) {
        let center = vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5);
        let pos = loop {
            let candidate = self.random_map_pos();
            if vec2_distance(candidate, center) >= ENEMY_SAFE_SPAWN_DIST {
                break candidate;
            }
        };
        self.enemies.push(Tank::enemy(pos, self.level));
    }

    // Placements inside the spawn-clear box are discarded, so the count is
    // an upper bound.
    pub(crate) fn regenerate_obstacles(&mut self) {
        let center = vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5);
        let attempts = OBSTACLE_BASE_COUNT + OBSTACLE_PER_LEVEL * self.level;
        self.obstacles.clear();
        for _ in 0..attempts {
            let pos = self.random_map_pos();
            if (pos.x - center.x).abs() > SPAWN_CLEAR_HALF
                || (pos.y - center.y).abs() > SPAWN_CLEAR_HALF
            {
                self.obstacles.push(Obstacle::new(pos));
            }
        }
    }

    fn random_map_pos(&mut self) -> Vector2 {
        vec2(
            self.rng.random_range(MAP_MARGIN..MAP_WIDTH - MAP_MARGIN),
            self.rng.random_range(MAP_MARGIN..MAP_HEIGHT - MAP_MARGIN),
        )
    }

    // No-op when nobody else is alive.
    pub(crate) fn switch_tank(&mut self) {
        for step in 1..=self.squad.len() {
            let candidate = (self.player_index + step) % self.squad.len();
            if !self.squad[candidate].is_destroyed() {
                self.player_index = candidate;
                return;
            }
        }
    }

    pub(crate) fn player(&self) -> &Tank {
        &self.squad[self.player_index]
    }

    pub fn camera(&self) -> Camera2D {
        // No squad exists on the title screen; hold on the map center.
        let target = self
            .squad
            .get(self.player_index)
            .map_or(vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5), |tank| tank.pos);
        Camera2D {
            target,
            offset: vec2(WINDOW_WIDTH as f32 * 0.5, WINDOW_HEIGHT as f32 * 0.5),
            rotation: 0.0,
            zoom: 1.0,
        }
    }

    pub fn drain_effects(&mut self) -> Vec<CombatEffect> {
        std::mem::take(&mut self.effects)
    }

    pub(crate) fn map_bounds() -> Rectangle {
        Rectangle::new(0.0, 0.0, MAP_WIDTH, MAP_HEIGHT)
    }

    // Oldest wreck is evicted first.
    pub(crate) fn push_wreck(wreckage: &mut VecDeque<Wreckage>, tank: &Tank) {
        if wreckage.len() == WRECKAGE_CAP {
            wreckage.pop_front();
        }
        wreckage.push_back(Wreckage {
            pos: tank.pos,
            body_angle: tank.body_angle,
            turret_angle: tank.turret_angle,
            faction: tank.faction,
        });
    }
}

#[cfg(test)]
pub(crate) fn test_game() -> Game {
    let mut game = Game::new(7);
    game.start(0.0);
    game
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SQUAD_MAX_HEALTH;

    #[test]
    fn start_lines_up_the_squad_at_center() {
        let game = test_game();
        assert_eq!(game.state, ScreenState::Playing);
        assert_eq!(game.squad.len(), SQUAD_SIZE);
        let xs: Vec<f32> = game.squad.iter().map(|t| t.pos.x).collect();
        assert_eq!(xs, vec![900.0, 1000.0, 1100.0]);
        assert!(game.squad.iter().all(|t| t.pos.y == MAP_HEIGHT * 0.5));
        assert!(game.squad.iter().all(|t| t.health == SQUAD_MAX_HEALTH));
        assert_eq!(game.player_index, 1);
    }

    #[test]
    fn first_wave_is_two_enemies_at_level_one() {
        let game = test_game();
        assert_eq!(game.level, 1);
        assert_eq!(game.enemies.len(), 2);
        assert_eq!(game.score, 0);
        assert_eq!(game.kills_for_next_level, BASE_KILL_TARGET);
    }

    #[test]
    fn enemies_never_spawn_near_the_rally_point() {
        let mut game = test_game();
        let center = vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5);
        for _ in 0..64 {
            game.spawn_enemy();
        }
        for enemy in &game.enemies {
            assert!(vec2_distance(enemy.pos, center) >= ENEMY_SAFE_SPAWN_DIST);
        }
    }

    #[test]
    fn obstacles_respect_the_spawn_clear_box() {
        let mut game = test_game();
        game.level = 6;
        game.regenerate_obstacles();
        let center = vec2(MAP_WIDTH * 0.5, MAP_HEIGHT * 0.5);
        assert!(!game.obstacles.is_empty());
        assert!(game.obstacles.len() as u32 <= OBSTACLE_BASE_COUNT + OBSTACLE_PER_LEVEL * 6);
        for obstacle in &game.obstacles {
            assert!(
                (obstacle.pos.x - center.x).abs() > SPAWN_CLEAR_HALF
                    || (obstacle.pos.y - center.y).abs() > SPAWN_CLEAR_HALF
            );
        }
    }

    #[test]
    fn switch_tank_skips_destroyed_hulls() {
        let mut game = test_game();
        game.squad[2].take_damage(f32::INFINITY);
        assert_eq!(game.player_index, 1);
        game.switch_tank();
        assert_eq!(game.player_index, 0);
        game.switch_tank();
        assert_eq!(game.player_index, 1);
    }

    #[test]
    fn switch_tank_with_lone_survivor_is_a_no_op() {
        let mut game = test_game();
        game.squad[0].take_damage(f32::INFINITY);
        game.squad[2].take_damage(f32::INFINITY);
        game.switch_tank();
        assert_eq!(game.player_index, 1);
    }

    #[test]
    fn restart_clears_battlefield_litter() {
        let mut game = test_game();
        game.score = 9;
        game.level = 3;
        let hulk = Tank::enemy(vec2(200.0, 200.0), 1);
        Game::push_wreck(&mut game.wreckage, &hulk);
        game.fire_zones
            .push(FireZone::new(vec2(500.0, 500.0), crate::entities::Faction::Squad));

        game.start(5000.0);
        assert_eq!(game.score, 0);
        assert_eq!(game.level, 1);
        assert!(game.wreckage.is_empty());
        assert!(game.fire_zones.is_empty());
        assert!(game.projectiles.is_empty());
        assert_eq!(game.enemies.len(), 2);
    }

    #[test]
    fn camera_holds_map_center_before_deployment() {
        let game = Game::new(1);
        assert_eq!(game.state, ScreenState::Title);
        assert!(game.squad.is_empty());
        let cam = game.camera();
        assert_eq!(cam.target.x, MAP_WIDTH * 0.5);
        assert_eq!(cam.target.y, MAP_HEIGHT * 0.5);
    }

    #[test]
    fn camera_tracks_the_player_tank() {
        let mut game = test_game();
        game.squad[1].pos = vec2(321.0, 654.0);
        let cam = game.camera();
        assert_eq!(cam.target.x, 321.0);
        assert_eq!(cam.target.y, 654.0);
        assert_eq!(cam.zoom, 1.0);
    }
}
