pub const WINDOW_WIDTH: i32 = 1280;
pub const WINDOW_HEIGHT: i32 = 720;

pub const MAP_WIDTH: f32 = 2000.0;
pub const MAP_HEIGHT: f32 = 2000.0;
pub const MAP_MARGIN: f32 = 50.0;

pub const SQUAD_SIZE: usize = 3;
pub const SQUAD_SPACING: f32 = 100.0;
pub const SQUAD_MAX_HEALTH: f32 = 500.0;
pub const SQUAD_HEAL: f32 = 200.0;

// Footprint; width doubles as the collision diameter.
pub const TANK_WIDTH: f32 = 90.0;
pub const TANK_HEIGHT: f32 = 120.0;
pub const TANK_MAX_SPEED: f32 = 3.0;
pub const TANK_ACCEL: f32 = 0.1;
pub const TANK_FRICTION: f32 = 0.05;
pub const ROTATION_SPEED: f32 = 0.15;

pub const CANNON_COOLDOWN_MS: f64 = 1000.0;
pub const MG_COOLDOWN_MS: f64 = 100.0;
pub const FIREBOMB_COOLDOWN_MS: f64 = 5000.0;
pub const SHOTGUN_COOLDOWN_MS: f64 = 3000.0;
pub const MINE_COOLDOWN_MS: f64 = 5000.0;
pub const ULTIMATE_COOLDOWN_MS: f64 = 30_000.0;

pub const CANNON_BARREL_LEN: f32 = 85.0;
pub const SIDE_BARREL_LEN: f32 = 80.0;
pub const MG_MUZZLE_OFFSET: f32 = 10.0;
pub const MG_SPREAD: f32 = 0.1;
pub const SHOTGUN_SPREAD: f32 = 0.2;
pub const FIREBOMB_MAX_RANGE: f32 = 800.0;
pub const MINE_DROP_BACK: f32 = 50.0;

pub const PROJECTILE_GRACE_MS: f64 = 100.0;
pub const IMPACT_IMPULSE: f32 = 0.05;
pub const MISSILE_ACCEL: f32 = 0.5;
pub const MISSILE_TOP_SPEED: f32 = 25.0;
pub const FIREBOMB_STEP: f32 = 10.0;
pub const FIREBOMB_IGNITE_RANGE: f32 = 10.0;

pub const FIRE_ZONE_RADIUS: f32 = 40.0;
pub const FIRE_ZONE_LIFE: u32 = 300;
pub const FIRE_ZONE_DOT: f32 = 0.5;

pub const TEAMMATE_ENGAGE_RANGE: f32 = 600.0;
pub const FOLLOW_RANGE: f32 = 150.0;
pub const ENEMY_FIRE_RANGE: f32 = 600.0;
pub const ENEMY_STOP_RANGE: f32 = 100.0;
pub const ENEMY_ALIGN_RAD: f32 = 0.5;
pub const ENEMY_CANNON_DAMAGE: f32 = 10.0;

pub const ENEMY_BASE_SPEED: f32 = 1.5;
pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.2;
pub const ENEMY_BASE_HEALTH: f32 = 100.0;
pub const ENEMY_HEALTH_PER_LEVEL: f32 = 20.0;
pub const ENEMY_BASE_COOLDOWN_MS: f64 = 1500.0;
pub const ENEMY_COOLDOWN_STEP_MS: f64 = 100.0;
pub const ENEMY_MIN_COOLDOWN_MS: f64 = 500.0;
pub const ENEMY_SAFE_SPAWN_DIST: f32 = 500.0;

pub const BASE_KILL_TARGET: u32 = 5;
pub const WRECKAGE_CAP: usize = 5;
pub const WAVE_RESPAWN_DELAY_MS: f64 = 1000.0;

pub const OBSTACLE_SIZE: f32 = 50.0;
pub const OBSTACLE_BASE_COUNT: u32 = 10;
pub const OBSTACLE_PER_LEVEL: u32 = 5;
pub const SPAWN_CLEAR_HALF: f32 = 200.0;

pub const CROSS_FACTION_PUSH: f32 = 2.0;
pub const SAME_FACTION_PUSH: f32 = 1.0;
pub const OBSTACLE_SNAP_PAD: f32 = 1.0;
