// Math utilities and helper functions

use glam::Vec2;

/// Collapse a raw horizontal axis into a unit intent of -1, 0 or 1.
///
/// Matches normalizing `(axis, 0)`: any nonzero deflection becomes full
/// speed in that direction.
pub fn unit_intent(axis: f32) -> f32 {
    if !axis.is_finite() || axis == 0.0 {
        0.0
    } else {
        axis.signum()
    }
}

/// Move `point` toward `target` along x by `step`, never overshooting.
pub fn retract_x(point: Vec2, target_x: f32, step: f32) -> Vec2 {
    let dx = target_x - point.x;
    if dx.abs() <= step {
        Vec2::new(target_x, point.y)
    } else {
        Vec2::new(point.x + step * dx.signum(), point.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_intent() {
        assert_eq!(unit_intent(0.3), 1.0);
        assert_eq!(unit_intent(-0.01), -1.0);
        assert_eq!(unit_intent(0.0), 0.0);
        assert_eq!(unit_intent(f32::NAN), 0.0);
    }

    #[test]
    fn test_retract_x_steps_toward_target() {
        let p = retract_x(Vec2::new(3.0, 3.0), 0.0, 0.5);
        assert_eq!(p, Vec2::new(2.5, 3.0));

        let p = retract_x(Vec2::new(-3.0, 1.0), 0.0, 0.5);
        assert_eq!(p, Vec2::new(-2.5, 1.0));
    }

    #[test]
    fn test_retract_x_clamps_at_target() {
        let p = retract_x(Vec2::new(0.05, 3.0), 0.0, 0.1);
        assert_eq!(p, Vec2::new(0.0, 3.0));
    }
}
