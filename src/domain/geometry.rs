//! Planar geometry helpers for segment traversal

use crate::domain::types::Vertex;
use std::f64::consts::FRAC_PI_2;

/// Heading of a direction vector, rotated so that +y (north) is zero
#[inline]
pub fn azimuth(dx: f64, dy: f64) -> f64 {
    dy.atan2(dx) - FRAC_PI_2
}

/// Euclidean length of the segment `a -> b`
#[inline]
pub fn segment_length(a: Vertex, b: Vertex) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Linear interpolation along `a -> b`.
///
/// `ratio` is not clamped: values above 1 extrapolate past `b`.
#[inline]
pub fn interpolate(a: Vertex, b: Vertex, ratio: f64) -> Vertex {
    Vertex { x: a.x + (b.x - a.x) * ratio, y: a.y + (b.y - a.y) * ratio }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_azimuth_cardinal_directions() {
        // East
        assert!((azimuth(1.0, 0.0) + FRAC_PI_2).abs() < EPS);
        // North
        assert!(azimuth(0.0, 1.0).abs() < EPS);
        // West
        assert!((azimuth(-1.0, 0.0) - FRAC_PI_2).abs() < EPS);
        // South
        assert!((azimuth(0.0, -1.0) + PI).abs() < EPS);
    }

    #[test]
    fn test_segment_length() {
        let a = Vertex { x: 0.0, y: 0.0 };
        let b = Vertex { x: 3.0, y: 4.0 };
        assert!((segment_length(a, b) - 5.0).abs() < EPS);
        assert_eq!(segment_length(a, a), 0.0);
    }

    #[test]
    fn test_interpolate_overshoots() {
        let a = Vertex { x: 0.0, y: 0.0 };
        let b = Vertex { x: 10.0, y: 0.0 };
        assert_eq!(interpolate(a, b, 0.5), Vertex { x: 5.0, y: 0.0 });
        assert_eq!(interpolate(a, b, 2.0), Vertex { x: 20.0, y: 0.0 });
    }
}
