//! Overlap tests and random sampling
//!
//! Everything here works on `Vec2` values and returns new values; nothing
//! mutates its arguments.

use glam::Vec2;
use rand::Rng;

/// Two circles overlap when their centers are strictly closer than the sum of
/// their radii (touching does not count)
#[inline]
pub fn circle_circle(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}

/// Circle vs axis-aligned rectangle given by its center and full size
///
/// Finds the point of the rectangle nearest to the circle center and checks
/// it against the radius.
pub fn circle_rect(center: Vec2, radius: f32, rect_center: Vec2, width: f32, height: f32) -> bool {
    let half = Vec2::new(width / 2.0, height / 2.0);
    let closest = center.clamp(rect_center - half, rect_center + half);
    center.distance_squared(closest) < radius * radius
}

/// Point inside or on the boundary of a circle
#[inline]
pub fn point_in_circle(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) <= radius
}

/// Uniform sample in `[min, max)`; a degenerate range returns `min`
#[inline]
pub fn random_range<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    min + rng.random::<f32>() * (max - min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_circle_circle_overlap() {
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0));
        assert!(!circle_circle(Vec2::ZERO, 10.0, Vec2::new(25.0, 0.0), 10.0));
        assert!(circle_circle(Vec2::new(5.0, 5.0), 10.0, Vec2::new(5.0, 5.0), 10.0));
    }

    #[test]
    fn test_circle_circle_touching_is_not_overlap() {
        assert!(!circle_circle(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0));
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::new(19.9, 0.0), 10.0));
    }

    #[test]
    fn test_circle_circle_diagonal() {
        // ~19.8 apart vs 20 combined radius
        assert!(circle_circle(Vec2::ZERO, 10.0, Vec2::new(14.0, 14.0), 10.0));
        // ~21.2 apart
        assert!(!circle_circle(Vec2::ZERO, 10.0, Vec2::new(15.0, 15.0), 10.0));
    }

    #[test]
    fn test_circle_rect() {
        let rect = Vec2::new(50.0, 50.0);
        assert!(!circle_rect(Vec2::ZERO, 5.0, rect, 20.0, 20.0));
        assert!(circle_rect(Vec2::new(50.0, 50.0), 5.0, rect, 20.0, 20.0));
        // Overlapping the left edge of a 40x30 box
        assert!(circle_rect(Vec2::new(25.0, 50.0), 10.0, rect, 40.0, 30.0));
        // Near the (60, 60) corner
        assert!(circle_rect(Vec2::new(65.0, 60.0), 6.0, rect, 20.0, 20.0));
    }

    #[test]
    fn test_point_in_circle_includes_edge() {
        assert!(point_in_circle(Vec2::new(5.0, 5.0), Vec2::ZERO, 10.0));
        assert!(point_in_circle(Vec2::new(10.0, 0.0), Vec2::ZERO, 10.0));
        assert!(!point_in_circle(Vec2::new(15.0, 0.0), Vec2::ZERO, 10.0));
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            let v = random_range(&mut rng, -3.0, 4.0);
            assert!((-3.0..4.0).contains(&v));
        }
        assert_eq!(random_range(&mut rng, 2.0, 2.0), 2.0);
    }

    proptest! {
        #[test]
        fn prop_circle_circle_symmetric(
            ax in -500.0f32..500.0, ay in -500.0f32..500.0,
            bx in -500.0f32..500.0, by in -500.0f32..500.0,
            ra in 0.1f32..100.0, rb in 0.1f32..100.0,
        ) {
            let a = Vec2::new(ax, ay);
            let b = Vec2::new(bx, by);
            prop_assert_eq!(circle_circle(a, ra, b, rb), circle_circle(b, rb, a, ra));
        }

        #[test]
        fn prop_identical_centers_always_overlap(
            x in -500.0f32..500.0, y in -500.0f32..500.0,
            ra in 0.1f32..100.0, rb in 0.1f32..100.0,
        ) {
            let p = Vec2::new(x, y);
            prop_assert!(circle_circle(p, ra, p, rb));
        }

        #[test]
        fn prop_center_inside_rect_overlaps(
            fx in -0.5f32..0.5, fy in -0.5f32..0.5,
            w in 1.0f32..200.0, h in 1.0f32..200.0,
            r in 0.1f32..50.0,
        ) {
            let rect = Vec2::new(100.0, -40.0);
            let center = rect + Vec2::new(fx * w, fy * h);
            prop_assert!(circle_rect(center, r, rect, w, h));
        }

        #[test]
        fn prop_far_circle_misses_rect(
            w in 1.0f32..200.0, h in 1.0f32..200.0,
            r in 0.1f32..50.0, gap in 0.5f32..100.0,
        ) {
            let rect = Vec2::ZERO;
            let center = Vec2::new(w / 2.0 + r + gap, 0.0);
            prop_assert!(!circle_rect(center, r, rect, w, h));
        }
    }
}
