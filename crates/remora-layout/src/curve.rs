//! Bezier evaluation, De Casteljau subdivision, and the curve/circle
//! intersection search used for edge trimming.

use crate::geom::Point;

/// A quadratic or cubic bezier in evaluation order (endpoints outermost).
#[derive(Debug, Clone, Copy)]
pub enum Bezier {
    Quadratic { p0: Point, cp: Point, p1: Point },
    Cubic { p0: Point, cp1: Point, cp2: Point, p1: Point },
}

impl Bezier {
    pub fn at(&self, t: f64) -> Point {
        match *self {
            Bezier::Quadratic { p0, cp, p1 } => Point::new(
                quadratic_at(p0.x, cp.x, p1.x, t),
                quadratic_at(p0.y, cp.y, p1.y, t),
            ),
            Bezier::Cubic { p0, cp1, cp2, p1 } => Point::new(
                cubic_at(p0.x, cp1.x, cp2.x, p1.x, t),
                cubic_at(p0.y, cp1.y, cp2.y, p1.y, t),
            ),
        }
    }
}

pub fn quadratic_at(p0: f64, p1: f64, p2: f64, t: f64) -> f64 {
    let one_t = 1.0 - t;
    one_t * one_t * p0 + 2.0 * one_t * t * p1 + t * t * p2
}

pub fn cubic_at(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let one_t = 1.0 - t;
    one_t * one_t * one_t * p0
        + 3.0 * one_t * one_t * t * p1
        + 3.0 * one_t * t * t * p2
        + t * t * t * p3
}

fn lerp(a: Point, b: Point, t: f64) -> Point {
    Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
}

/// Splits a quadratic curve at `t`, returning the left and right halves in
/// evaluation order. The split point is shared by both halves.
pub fn quadratic_subdivide(p0: Point, cp: Point, p1: Point, t: f64) -> ([Point; 3], [Point; 3]) {
    let q0 = lerp(p0, cp, t);
    let q1 = lerp(cp, p1, t);
    let split = lerp(q0, q1, t);
    ([p0, q0, split], [split, q1, p1])
}

/// Splits a cubic curve at `t`, returning the left and right halves.
pub fn cubic_subdivide(
    p0: Point,
    cp1: Point,
    cp2: Point,
    p1: Point,
    t: f64,
) -> ([Point; 4], [Point; 4]) {
    let q0 = lerp(p0, cp1, t);
    let q1 = lerp(cp1, cp2, t);
    let q2 = lerp(cp2, p1, t);
    let r0 = lerp(q0, q1, t);
    let r1 = lerp(q1, q2, t);
    let split = lerp(r0, r1, t);
    ([p0, q0, r0, split], [split, r1, q2, p1])
}

/// Finds the curve parameter where the bezier crosses a circle around
/// `center`, assuming the squared-distance profile is monotone near the
/// crossing. A coarse scan over t = 0.1..=0.9 seeds up to 32 bisection
/// refinements; the search accepts the best-effort `t` when the tolerance
/// is never reached.
pub fn intersect_curve_circle(curve: Bezier, center: Point, radius: f64) -> f64 {
    let radius_square = radius * radius;

    let mut best_diff = f64::INFINITY;
    let mut t = 0.1;
    for i in 1..=9 {
        let sample = i as f64 / 10.0;
        let diff = (curve.at(sample).dist_square(center) - radius_square).abs();
        if diff < best_diff {
            best_diff = diff;
            t = sample;
        }
    }

    let mut interval = 0.1;
    for _ in 0..32 {
        let diff = curve.at(t).dist_square(center) - radius_square;
        if diff.abs() < 1e-2 {
            break;
        }
        let next_diff = curve.at(t + interval).dist_square(center) - radius_square;
        interval /= 2.0;
        if diff < 0.0 {
            t += if next_diff >= 0.0 { interval } else { -interval };
        } else {
            t += if next_diff >= 0.0 { -interval } else { interval };
        }
    }
    t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdivision_halves_meet_at_the_split_point() {
        let p0 = Point::new(0.0, 0.0);
        let cp = Point::new(5.0, 10.0);
        let p1 = Point::new(10.0, 0.0);
        let curve = Bezier::Quadratic { p0, cp, p1 };
        let (left, right) = quadratic_subdivide(p0, cp, p1, 0.3);
        let split = curve.at(0.3);
        assert!((left[2].x - split.x).abs() < 1e-12);
        assert!((left[2].y - split.y).abs() < 1e-12);
        assert_eq!(left[2], right[0]);
        assert_eq!(left[0], p0);
        assert_eq!(right[2], p1);
    }

    #[test]
    fn cubic_subdivision_preserves_endpoints() {
        let p0 = Point::new(0.0, 0.0);
        let cp1 = Point::new(2.0, 8.0);
        let cp2 = Point::new(8.0, 8.0);
        let p1 = Point::new(10.0, 0.0);
        let (left, right) = cubic_subdivide(p0, cp1, cp2, p1, 0.5);
        assert_eq!(left[0], p0);
        assert_eq!(right[3], p1);
        assert_eq!(left[3], right[0]);
    }

    #[test]
    fn intersection_lands_on_the_circle() {
        // A flat quadratic along the x axis: the crossing with a circle of
        // radius 2 around the start is analytic.
        let curve = Bezier::Quadratic {
            p0: Point::new(0.0, 0.0),
            cp: Point::new(5.0, 0.0),
            p1: Point::new(10.0, 0.0),
        };
        let center = Point::new(0.0, 0.0);
        let t = intersect_curve_circle(curve, center, 2.0);
        let hit = curve.at(t);
        assert!((hit.dist(center) - 2.0).abs() < 0.1);
    }
}
