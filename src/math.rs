use raylib::prelude::{Color, Rectangle, Vector2};
use std::f32::consts::{FRAC_PI_2, PI};

pub fn vec2(x: f32, y: f32) -> Vector2 {
    Vector2 { x, y }
}

pub fn vec2_add(a: Vector2, b: Vector2) -> Vector2 {
    vec2(a.x + b.x, a.y + b.y)
}

pub fn vec2_sub(a: Vector2, b: Vector2) -> Vector2 {
    vec2(a.x - b.x, a.y - b.y)
}

pub fn vec2_scale(v: Vector2, s: f32) -> Vector2 {
    vec2(v.x * s, v.y * s)
}

pub fn vec2_length(v: Vector2) -> f32 {
    (v.x * v.x + v.y * v.y).sqrt()
}

pub fn vec2_distance(a: Vector2, b: Vector2) -> f32 {
    vec2_length(vec2_sub(a, b))
}

pub fn vec2_normalize(v: Vector2) -> Vector2 {
    let len = vec2_length(v);
    if len > 0.0 {
        vec2_scale(v, 1.0 / len)
    } else {
        vec2(0.0, 0.0)
    }
}

// Heading convention: 0 points up the screen, angles grow clockwise.
pub fn heading_vec(angle: f32) -> Vector2 {
    vec2(angle.sin(), -angle.cos())
}

pub fn polar_vec(angle: f32) -> Vector2 {
    vec2(angle.cos(), angle.sin())
}

/// Heading from `from` at `to`; `None` when the points coincide.
pub fn aim_angle(from: Vector2, to: Vector2) -> Option<f32> {
    let delta = vec2_sub(to, from);
    if vec2_length(delta) > 0.0 {
        Some(delta.y.atan2(delta.x) + FRAC_PI_2)
    } else {
        None
    }
}

// Shortest angular distance, in [0, pi].
pub fn angle_difference(a: f32, b: f32) -> f32 {
    let mut diff = b - a;
    while diff > PI {
        diff -= PI * 2.0;
    }
    while diff < -PI {
        diff += PI * 2.0;
    }
    diff.abs()
}

pub fn rotate_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    let mut diff = target - current;
    while diff > PI {
        diff -= PI * 2.0;
    }
    while diff < -PI {
        diff += PI * 2.0;
    }
    if diff.abs() <= max_delta {
        target
    } else {
        current + diff.signum() * max_delta
    }
}

pub fn rad_to_deg(rad: f32) -> f32 {
    rad * 180.0 / PI
}

pub fn with_alpha(color: Color, alpha: f32) -> Color {
    let clamped = alpha.clamp(0.0, 1.0);
    Color::new(color.r, color.g, color.b, (clamped * color.a as f32) as u8)
}

pub fn point_in_bounds(pos: Vector2, bounds: &Rectangle) -> bool {
    pos.x >= bounds.x
        && pos.x <= bounds.x + bounds.width
        && pos.y >= bounds.y
        && pos.y <= bounds.y + bounds.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn heading_zero_points_up() {
        let v = heading_vec(0.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn aim_angle_guards_zero_distance() {
        let p = vec2(120.0, -40.0);
        assert!(aim_angle(p, p).is_none());
    }

    #[test]
    fn aim_angle_feeds_heading_vec() {
        let from = vec2(100.0, 100.0);
        let to = vec2(100.0, 400.0);
        let angle = aim_angle(from, to).unwrap();
        let dir = heading_vec(angle);
        // Straight down the screen.
        assert!(dir.x.abs() < 1e-5);
        assert!((dir.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn rotate_towards_snaps_inside_step() {
        assert_eq!(rotate_towards(1.0, 1.1, 0.15), 1.1);
    }

    #[test]
    fn rotate_towards_takes_short_way_across_wrap() {
        let stepped = rotate_towards(0.1, PI * 2.0 - 0.1, 0.05);
        assert!(stepped < 0.1);
    }

    proptest! {
        #[test]
        fn angle_difference_is_bounded(a in -10.0f32..10.0, b in -10.0f32..10.0) {
            let d = angle_difference(a, b);
            prop_assert!((0.0..=PI + 1e-4).contains(&d));
        }

        #[test]
        fn rotate_towards_never_widens_the_gap(
            current in -10.0f32..10.0,
            target in -10.0f32..10.0,
            step in 0.0f32..1.0,
        ) {
            let next = rotate_towards(current, target, step);
            prop_assert!(angle_difference(next, target) <= angle_difference(current, target) + 1e-4);
        }
    }
}
