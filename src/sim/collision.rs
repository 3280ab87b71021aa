//! Swept circle-vs-circle collision
//!
//! The tricky part of the simulation: at typical shot speeds a target can be
//! smaller than the per-tick displacement, so endpoint-only overlap checks
//! tunnel straight through. The test here sweeps the ball back along the
//! motion of the last tick and asks whether the trajectory segment ever came
//! within the combined radius of the target center.

use glam::Vec2;

/// Check whether a ball passed through a target during the last tick.
///
/// `motion` is the displacement to sweep over - callers pass the negated
/// velocity so the segment from `ball_center` to `ball_center + motion`
/// retraces the path travelled since the previous tick. The minimum distance
/// between that segment and the target center (quadratic in the segment
/// parameter, clamped to [0, 1]) is compared against the combined radius.
pub fn is_hit(
    ball_center: Vec2,
    ball_radius: f32,
    motion: Vec2,
    target_center: Vec2,
    target_radius: f32,
) -> bool {
    let combined = ball_radius + target_radius;
    let combined_sq = combined * combined;
    let to_target = target_center - ball_center;

    let len_sq = motion.length_squared();
    if len_sq <= f32::EPSILON {
        // Degenerate sweep: plain overlap test
        return to_target.length_squared() <= combined_sq;
    }

    let t = (to_target.dot(motion) / len_sq).clamp(0.0, 1.0);
    let closest = ball_center + motion * t;
    target_center.distance_squared(closest) <= combined_sq
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_endpoint_overlap() {
        // Resting contact at the segment start
        assert!(is_hit(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(-50.0, 0.0),
            Vec2::new(5.0, 0.0),
            10.0
        ));
        // And at the segment end
        assert!(is_hit(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(-50.0, 0.0),
            Vec2::new(-48.0, 0.0),
            10.0
        ));
    }

    #[test]
    fn test_tunneling_caught_mid_segment() {
        // Small target sitting halfway along a 100-unit sweep. Both endpoints
        // are far outside the combined radius; only the swept test hits.
        let ball = Vec2::new(100.0, 0.0);
        let motion = Vec2::new(-100.0, 0.0);
        let target = Vec2::new(50.0, 12.0);
        let (br, tr) = (10.0, 5.0);

        assert!(ball.distance(target) > br + tr);
        assert!((ball + motion).distance(target) > br + tr);
        assert!(is_hit(ball, br, motion, target, tr));
    }

    #[test]
    fn test_clear_miss() {
        assert!(!is_hit(
            Vec2::new(0.0, 0.0),
            10.0,
            Vec2::new(-100.0, 0.0),
            Vec2::new(-50.0, 40.0),
            10.0
        ));
    }

    #[test]
    fn test_zero_motion_falls_back_to_overlap() {
        let ball = Vec2::new(0.0, 0.0);
        assert!(is_hit(ball, 10.0, Vec2::ZERO, Vec2::new(12.0, 0.0), 5.0));
        assert!(!is_hit(ball, 10.0, Vec2::ZERO, Vec2::new(30.0, 0.0), 5.0));
    }

    #[test]
    fn test_grazing_contact() {
        // Target exactly at the combined radius from the path
        let ball = Vec2::new(0.0, 0.0);
        let motion = Vec2::new(100.0, 0.0);
        assert!(is_hit(ball, 10.0, motion, Vec2::new(50.0, 15.0), 5.0));
        assert!(!is_hit(ball, 10.0, motion, Vec2::new(50.0, 15.01), 5.0));
    }

    proptest! {
        #[test]
        fn prop_translation_invariance(
            bx in -500.0f32..500.0,
            by in -500.0f32..500.0,
            mx in -80.0f32..80.0,
            my in -80.0f32..80.0,
            tx in -500.0f32..500.0,
            ty in -500.0f32..500.0,
            dx in -300.0f32..300.0,
            dy in -300.0f32..300.0,
            br in 1.0f32..20.0,
            tr in 1.0f32..20.0,
        ) {
            let ball = Vec2::new(bx, by);
            let motion = Vec2::new(mx, my);
            let target = Vec2::new(tx, ty);
            let shift = Vec2::new(dx, dy);

            prop_assert_eq!(
                is_hit(ball, br, motion, target, tr),
                is_hit(ball + shift, br, motion, target + shift, tr)
            );
        }

        #[test]
        fn prop_swept_implies_superset_of_overlap(
            bx in -200.0f32..200.0,
            by in -200.0f32..200.0,
            mx in -80.0f32..80.0,
            my in -80.0f32..80.0,
            tx in -200.0f32..200.0,
            ty in -200.0f32..200.0,
            br in 1.0f32..20.0,
            tr in 1.0f32..20.0,
        ) {
            let ball = Vec2::new(bx, by);
            let target = Vec2::new(tx, ty);
            // Anything overlapping at the segment start must also be a swept hit
            if ball.distance_squared(target) <= (br + tr) * (br + tr) {
                prop_assert!(is_hit(ball, br, Vec2::new(mx, my), target, tr));
            }
        }
    }
}
