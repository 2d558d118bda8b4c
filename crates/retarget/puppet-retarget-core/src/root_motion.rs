//! Root motion: normalized screen position to damped character translation.

use glam::Vec3;

use crate::config::RootMotionConfig;
use crate::frame::RootPosition;

/// Horizontal and (optional) vertical targets for a normalized position.
///
/// `x = 0.5` is screen center. Mirroring negates the horizontal target.
pub fn root_target(cfg: &RootMotionConfig, pos: RootPosition) -> (f32, Option<f32>) {
    let x = (pos.x - 0.5) * cfg.sensitivity * cfg.mirror_sign();
    let y = cfg
        .vertical
        .then(|| (pos.y - 0.5) * cfg.vertical_sensitivity);
    (x, y)
}

/// One damping step from `current` toward the target for `pos`.
///
/// An exponential-decay filter: each step covers `damping` of the remaining
/// distance. Z is never touched; Y only when vertical motion is enabled.
pub fn step_root(cfg: &RootMotionConfig, current: Vec3, pos: RootPosition) -> Vec3 {
    let (tx, ty) = root_target(cfg, pos);
    let mut next = current;
    next.x += (tx - current.x) * cfg.damping;
    if let Some(ty) = ty {
        next.y += (ty - current.y) * cfg.damping;
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) {
        assert!((a - b).abs() <= 1e-5, "left={a} right={b}");
    }

    #[test]
    fn mirrored_target_from_right_edge() {
        let cfg = RootMotionConfig::default();
        let (x, y) = root_target(&cfg, RootPosition { x: 1.0, y: 0.5 });
        approx(x, -2.5);
        assert!(y.is_none());
    }

    #[test]
    fn one_step_moves_ten_percent() {
        let cfg = RootMotionConfig::default();
        let start = Vec3::new(1.0, 0.3, -2.0);
        let next = step_root(&cfg, start, RootPosition { x: 1.0, y: 0.5 });
        approx(next.x, 1.0 + (-2.5 - 1.0) * 0.1);
        approx(next.y, 0.3);
        approx(next.z, -2.0);
    }

    #[test]
    fn distance_shrinks_strictly_but_not_instantly() {
        let cfg = RootMotionConfig::default();
        let pos = RootPosition { x: 0.8, y: 0.5 };
        let (target, _) = root_target(&cfg, pos);
        let mut current = Vec3::ZERO;
        let mut dist = (target - current.x).abs();
        for _ in 0..50 {
            current = step_root(&cfg, current, pos);
            let d = (target - current.x).abs();
            assert!(d < dist);
            assert!(d > 0.0);
            dist = d;
        }
    }

    #[test]
    fn vertical_is_opt_in() {
        let cfg = RootMotionConfig {
            vertical: true,
            ..RootMotionConfig::default()
        };
        let next = step_root(&cfg, Vec3::ZERO, RootPosition { x: 0.5, y: 0.0 });
        approx(next.x, 0.0);
        // top of the screen moves up: (0 - 0.5) * -5 = 2.5, 10% of it
        approx(next.y, 0.25);
    }

    #[test]
    fn unmirrored_follows_screen_direction() {
        let cfg = RootMotionConfig {
            mirror: false,
            ..RootMotionConfig::default()
        };
        let (x, _) = root_target(&cfg, RootPosition { x: 1.0, y: 0.5 });
        approx(x, 2.5);
    }
}
