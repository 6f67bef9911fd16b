//! Geometric predicates on bare points.
//!
//! The triangulation lives in the `z = 0` plane, but every predicate takes
//! [`Point3`] so callers can pass vertex positions straight from the arena. Cross
//! products stay three-dimensional; only their `z` component is inspected.
//!
//! All predicates use plain `f64` arithmetic. None of them fail: degenerate
//! (collinear or coincident) input yields a deterministic but meaningless answer,
//! typically `false` or a non-finite point. Callers that care must guard with
//! [`is_finite`].

use nalgebra::{Point3, Vector3};

/// Whether `(v1, v2, v3)` turns counter-clockwise.
///
/// Computes the `z` component of `(v1 - v2) x (v1 - v3)` and tests it for
/// strict positivity, so collinear points are not oriented.
#[inline]
pub fn orientation(v1: &Point3<f64>, v2: &Point3<f64>, v3: &Point3<f64>) -> bool {
    (v1 - v2).cross(&(v1 - v3)).z > 0.0
}

/// Boundary-inclusive barycentric membership test.
///
/// Returns `true` iff every barycentric weight of `p` with respect to
/// `triangle` lies in `[0, 1]`. A degenerate triangle contains nothing.
pub fn point_in_triangle(p: &Point3<f64>, triangle: &[Point3<f64>; 3]) -> bool {
    let [a, b, c] = triangle;
    let v0 = c - a;
    let v1 = b - a;
    let v2 = p - a;

    let dot00 = v0.dot(&v0);
    let dot01 = v0.dot(&v1);
    let dot02 = v0.dot(&v2);
    let dot11 = v1.dot(&v1);
    let dot12 = v1.dot(&v2);

    let denom = dot00 * dot11 - dot01 * dot01;
    if denom == 0.0 {
        return false;
    }
    let inv = 1.0 / denom;
    let u = (dot11 * dot02 - dot01 * dot12) * inv;
    let v = (dot00 * dot12 - dot01 * dot02) * inv;

    u >= 0.0 && v >= 0.0 && u + v <= 1.0
}

/// Whether `s` lies strictly inside the circle through `p`, `q`, `r`.
///
/// `p`, `q`, `r` must be counter-clockwise. Points on the circle are not inside.
pub fn in_circumcircle(
    p: &Point3<f64>,
    q: &Point3<f64>,
    r: &Point3<f64>,
    s: &Point3<f64>,
) -> bool {
    let row = |x: &Point3<f64>| {
        let dx = x.x - p.x;
        let dy = x.y - p.y;
        Vector3::new(dx, dy, dx * dx + dy * dy)
    };
    let (a, b, c) = (row(q), row(r), row(s));
    // Negative for a counter-clockwise circle containing s.
    a.dot(&b.cross(&c)) < 0.0
}

/// Circumcenter of the triangle `(a, b, c)`.
///
/// Near-collinear input divides by a near-zero squared normal length and
/// returns non-finite coordinates.
pub fn circumcenter(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let ac = c - a;
    let n = ab.cross(&ac);
    let k = (ac * ab.norm_squared() - ab * ac.norm_squared()).cross(&n) * (0.5 / n.norm_squared());
    a + k
}

/// Interior angles at `a`, `b` and `c`, in degrees.
///
/// A corner touching a zero-length edge yields `NaN`.
pub fn interior_angles(a: &Point3<f64>, b: &Point3<f64>, c: &Point3<f64>) -> [f64; 3] {
    [angle_at(a, b, c), angle_at(b, c, a), angle_at(c, a, b)]
}

fn angle_at(corner: &Point3<f64>, p: &Point3<f64>, q: &Point3<f64>) -> f64 {
    let u = p - corner;
    let v = q - corner;
    let cos = u.dot(&v) / (u.norm() * v.norm());
    cos.clamp(-1.0, 1.0).acos().to_degrees()
}

/// Whether any interior angle of `(a, b, c)` is below `threshold` degrees.
pub fn is_poor_quality(
    a: &Point3<f64>,
    b: &Point3<f64>,
    c: &Point3<f64>,
    threshold: f64,
) -> bool {
    interior_angles(a, b, c)
        .iter()
        .any(|&angle| angle < threshold)
}

/// Midpoint of the segment `a`-`b`.
#[inline]
pub fn midpoint(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    a + (b - a) * 0.5
}

/// Whether `t` lies in the closed disc whose diameter is `a`-`b`.
pub fn in_diametral_circle(a: &Point3<f64>, b: &Point3<f64>, t: &Point3<f64>) -> bool {
    let center = midpoint(a, b);
    let radius_sq = (b - a).norm_squared() * 0.25;
    (t - center).norm_squared() <= radius_sq
}

/// Half-difference center `(b - a) / 2`, taken as a position.
#[inline]
pub fn half_difference(a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    Point3::from((b - a) * 0.5)
}

/// Encroachment test around the half-difference center.
///
/// The circle is centered on [`half_difference`] and the squared distance is
/// compared with the square of the center's squared norm. Only meaningful for
/// segments near the origin; kept so older refinements can be reproduced.
pub fn in_diametral_circle_legacy(a: &Point3<f64>, b: &Point3<f64>, t: &Point3<f64>) -> bool {
    let center = half_difference(a, b);
    let radius = center.coords.norm_squared();
    (t - center).norm_squared() <= radius * radius
}

/// Whether every coordinate of `p` is finite.
#[inline]
pub fn is_finite(p: &Point3<f64>) -> bool {
    p.iter().all(|c| c.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point3<f64> {
        Point3::new(x, y, 0.0)
    }

    #[test]
    fn test_orientation() {
        assert!(orientation(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0)));
        assert!(!orientation(&p(0.0, 0.0), &p(0.0, 1.0), &p(1.0, 0.0)));
        // Collinear is not oriented.
        assert!(!orientation(&p(0.0, 0.0), &p(1.0, 1.0), &p(2.0, 2.0)));
    }

    #[test]
    fn test_point_in_triangle_is_boundary_inclusive() {
        let t = [p(0.0, 0.0), p(1.0, 0.0), p(0.0, 1.0)];
        assert!(point_in_triangle(&p(0.25, 0.25), &t));
        assert!(point_in_triangle(&p(0.5, 0.0), &t));
        assert!(point_in_triangle(&p(0.5, 0.5), &t));
        assert!(point_in_triangle(&p(0.0, 0.0), &t));
        assert!(!point_in_triangle(&p(0.6, 0.6), &t));
        assert!(!point_in_triangle(&p(-0.1, 0.2), &t));
    }

    #[test]
    fn test_point_in_degenerate_triangle() {
        let t = [p(0.0, 0.0), p(1.0, 1.0), p(2.0, 2.0)];
        assert!(!point_in_triangle(&p(1.0, 1.0), &t));
    }

    #[test]
    fn test_in_circumcircle() {
        let (a, b, c) = (p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0));
        assert!(in_circumcircle(&a, &b, &c, &p(0.0, 0.0)));
        assert!(in_circumcircle(&a, &b, &c, &p(0.0, -0.9)));
        assert!(!in_circumcircle(&a, &b, &c, &p(2.0, 2.0)));
    }

    #[test]
    fn test_cocircular_points_are_not_inside() {
        let pts = [p(1.0, 0.0), p(0.0, 1.0), p(-1.0, 0.0), p(0.0, -1.0)];
        for skip in 0..4 {
            let rest: Vec<_> = (0..4).filter(|&i| i != skip).map(|i| pts[i]).collect();
            assert!(!in_circumcircle(&rest[0], &rest[1], &rest[2], &pts[skip]));
        }
    }

    #[test]
    fn test_circumcenter() {
        let c = circumcenter(&p(0.0, 0.0), &p(2.0, 0.0), &p(0.0, 2.0));
        assert_relative_eq!(c, p(1.0, 1.0), epsilon = 1e-12);

        let c = circumcenter(&p(1.0, 0.0), &p(0.0, 1.0), &p(-1.0, 0.0));
        assert_relative_eq!(c, p(0.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn test_circumcenter_of_collinear_points_is_not_finite() {
        let c = circumcenter(&p(0.0, 0.0), &p(1.0, 0.0), &p(2.0, 0.0));
        assert!(!is_finite(&c));
    }

    #[test]
    fn test_interior_angles() {
        let angles = interior_angles(&p(0.0, 0.0), &p(1.0, 0.0), &p(0.0, 1.0));
        assert_relative_eq!(angles[0], 90.0, epsilon = 1e-9);
        assert_relative_eq!(angles[1], 45.0, epsilon = 1e-9);
        assert_relative_eq!(angles[2], 45.0, epsilon = 1e-9);
        assert_relative_eq!(angles.iter().sum::<f64>(), 180.0, epsilon = 1e-9);
    }

    #[test]
    fn test_poor_quality() {
        let sliver = (p(0.0, 0.0), p(10.0, 0.0), p(5.0, 0.5));
        assert!(is_poor_quality(&sliver.0, &sliver.1, &sliver.2, 22.0));

        let h = 3f64.sqrt() / 2.0;
        let equilateral = (p(0.0, 0.0), p(1.0, 0.0), p(0.5, h));
        assert!(!is_poor_quality(
            &equilateral.0,
            &equilateral.1,
            &equilateral.2,
            22.0
        ));
    }

    #[test]
    fn test_diametral_circle() {
        let (a, b) = (p(2.0, 2.0), p(4.0, 2.0));
        assert!(in_diametral_circle(&a, &b, &p(3.0, 2.5)));
        assert!(in_diametral_circle(&a, &b, &p(3.0, 3.0)));
        assert!(!in_diametral_circle(&a, &b, &p(3.0, 3.5)));
        assert_relative_eq!(midpoint(&a, &b), p(3.0, 2.0));
    }

    #[test]
    fn test_legacy_diametral_circle_is_centered_on_half_difference() {
        let (a, b) = (p(2.0, 2.0), p(4.0, 2.0));
        assert_relative_eq!(half_difference(&a, &b), p(1.0, 0.0));
        // Radius is |(1, 0)|^2 = 1 around (1, 0).
        assert!(in_diametral_circle_legacy(&a, &b, &p(1.5, 0.5)));
        assert!(!in_diametral_circle_legacy(&a, &b, &p(3.0, 2.0)));
    }
}
