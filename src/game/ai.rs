use raylib::prelude::Vector2;

use crate::config::{
    ENEMY_ALIGN_RAD, ENEMY_FIRE_RANGE, ENEMY_STOP_RANGE, FOLLOW_RANGE, TEAMMATE_ENGAGE_RANGE,
};
use crate::math::{aim_angle, angle_difference, rotate_towards, vec2_distance};

use super::tanks::{ShotSpec, Tank};

fn nearest(points: &[Vector2], from: Vector2) -> Option<(Vector2, f32)> {
    let mut best: Option<(Vector2, f32)> = None;
    for &p in points {
        let dist = vec2_distance(p, from);
        if best.map_or(true, |(_, d)| dist < d) {
            best = Some((p, dist));
        }
    }
    best
}

/// Escort heuristic: engage a hostile inside weapons range, otherwise close
/// up on the leader, otherwise hold.
pub(super) fn drive_teammate(
    tank: &mut Tank,
    leader_pos: Vector2,
    hostiles: &[Vector2],
    now_ms: f64,
) -> Option<ShotSpec> {
    let mut shot = None;
    match nearest(hostiles, tank.pos) {
        Some((target, dist)) if dist < TEAMMATE_ENGAGE_RANGE => {
            tank.speed = 0.0;
            if let Some(angle) = aim_angle(tank.pos, target) {
                tank.turret_angle = angle;
            }
            shot = tank.fire_cannon(now_ms);
        }
        _ => {
            if vec2_distance(tank.pos, leader_pos) > FOLLOW_RANGE {
                if let Some(target_angle) = aim_angle(tank.pos, leader_pos) {
                    tank.body_angle =
                        rotate_towards(tank.body_angle, target_angle, tank.rotation_speed);
                }
                tank.speed = tank.max_speed;
                tank.turret_angle = tank.body_angle;
            } else {
                tank.speed = 0.0;
            }
        }
    }
    tank.integrate();
    tank.clamp_to_map();
    shot
}

/// Hunter heuristic: bear down on the nearest live squad tank. The hull
/// turns at its rated rate; the turret tracks instantly.
pub(super) fn drive_enemy(tank: &mut Tank, squad: &[Vector2], now_ms: f64) -> Option<ShotSpec> {
    let Some((target, dist)) = nearest(squad, tank.pos) else {
        tank.speed = 0.0;
        tank.integrate();
        tank.clamp_to_map();
        return None;
    };

    if let Some(target_angle) = aim_angle(tank.pos, target) {
        tank.body_angle = rotate_towards(tank.body_angle, target_angle, tank.rotation_speed);
        let off_axis = angle_difference(tank.body_angle, target_angle);
        tank.speed = if dist > ENEMY_STOP_RANGE && off_axis < ENEMY_ALIGN_RAD {
            tank.max_speed
        } else {
            0.0
        };
        tank.turret_angle = target_angle;
    }

    tank.integrate();
    tank.clamp_to_map();

    if dist < ENEMY_FIRE_RANGE {
        tank.fire_cannon(now_ms)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::{heading_vec, vec2, vec2_add, vec2_scale};

    #[test]
    fn teammate_engages_hostile_in_range() {
        let mut tank = Tank::squad(vec2(1000.0, 1000.0));
        tank.speed = tank.max_speed;
        let hostile = vec2(1400.0, 1000.0);
        let shot = drive_teammate(&mut tank, vec2(900.0, 1000.0), &[hostile], 0.0);
        assert!(shot.is_some());
        assert_eq!(tank.speed, 0.0);
        // Turret points at the hostile.
        let aim = aim_angle(tank.pos, hostile).unwrap();
        assert_eq!(tank.turret_angle, aim);
    }

    #[test]
    fn teammate_fire_is_still_cooldown_gated() {
        let mut tank = Tank::squad(vec2(1000.0, 1000.0));
        let hostile = vec2(1300.0, 1000.0);
        let pos = tank.pos;
        assert!(drive_teammate(&mut tank, pos, &[hostile], 0.0).is_some());
        assert!(drive_teammate(&mut tank, pos, &[hostile], 400.0).is_none());
    }

    #[test]
    fn teammate_closes_on_distant_leader_at_rated_turn_speed() {
        let mut tank = Tank::squad(vec2(1000.0, 1000.0));
        tank.body_angle = 0.0;
        let leader = vec2(1500.0, 1000.0); // due right: heading pi/2
        let before = tank.pos;
        let shot = drive_teammate(&mut tank, leader, &[], 0.0);
        assert!(shot.is_none());
        assert_eq!(tank.speed, tank.max_speed);
        // One rotation step, not a snap.
        assert!((tank.body_angle - tank.rotation_speed).abs() < 1e-6);
        assert!(vec2_distance(tank.pos, before) > 0.0);
        assert_eq!(tank.turret_angle, tank.body_angle);
    }

    #[test]
    fn teammate_holds_near_leader_with_no_hostiles() {
        let mut tank = Tank::squad(vec2(1000.0, 1000.0));
        let before = tank.pos;
        drive_teammate(&mut tank, vec2(1050.0, 1000.0), &[], 0.0);
        assert_eq!(tank.speed, 0.0);
        assert_eq!(tank.pos.x, before.x);
        assert_eq!(tank.pos.y, before.y);
    }

    #[test]
    fn enemy_turret_snaps_while_hull_turns_gradually() {
        let mut tank = Tank::enemy(vec2(1000.0, 1000.0), 1);
        tank.body_angle = 0.0;
        let target = vec2(1000.0, 1600.0); // due down: heading pi
        drive_enemy(&mut tank, &[target], -10_000.0);
        let want = aim_angle(vec2(1000.0, 1000.0), target).unwrap();
        assert_eq!(tank.turret_angle, want);
        assert!((tank.body_angle - tank.rotation_speed).abs() < 1e-6);
    }

    #[test]
    fn enemy_halts_to_fire_when_misaligned_or_close() {
        // Misaligned and far: no advance.
        let mut tank = Tank::enemy(vec2(1000.0, 1000.0), 1);
        tank.body_angle = 0.0;
        drive_enemy(&mut tank, &[vec2(1000.0, 1600.0)], -10_000.0);
        assert_eq!(tank.speed, 0.0);

        // Aligned but inside stop range: parked.
        let mut close = Tank::enemy(vec2(1000.0, 1000.0), 1);
        close.body_angle = std::f32::consts::PI;
        drive_enemy(&mut close, &[vec2(1000.0, 1080.0)], -10_000.0);
        assert_eq!(close.speed, 0.0);
    }

    #[test]
    fn enemy_advances_when_aligned_and_far() {
        let mut tank = Tank::enemy(vec2(1000.0, 1000.0), 1);
        tank.body_angle = std::f32::consts::PI; // already facing the target
        let before = tank.pos;
        drive_enemy(&mut tank, &[vec2(1000.0, 1600.0)], -10_000.0);
        assert_eq!(tank.speed, tank.max_speed);
        let moved = vec2_add(before, vec2_scale(heading_vec(std::f32::consts::PI), tank.max_speed));
        assert!((tank.pos.y - moved.y).abs() < 1e-4);
    }

    #[test]
    fn enemy_without_targets_holds_and_stays_quiet() {
        let mut tank = Tank::enemy(vec2(1000.0, 1000.0), 1);
        let before = tank.pos;
        let shot = drive_enemy(&mut tank, &[], -10_000.0);
        assert!(shot.is_none());
        assert_eq!(tank.pos.x, before.x);
        assert_eq!(tank.pos.y, before.y);
    }

    #[test]
    fn enemy_fires_only_inside_range() {
        let mut far = Tank::enemy(vec2(100.0, 100.0), 1);
        assert!(drive_enemy(&mut far, &[vec2(1800.0, 1800.0)], 0.0).is_none());

        let mut near = Tank::enemy(vec2(1000.0, 1000.0), 1);
        assert!(drive_enemy(&mut near, &[vec2(1300.0, 1000.0)], 0.0).is_some());
    }
}
