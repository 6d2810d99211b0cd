//! Small vector helpers on top of `glam::Vec2`.

use glam::Vec2;

/// Clamp the magnitude of `v` to `max`. Zero stays zero.
pub fn limit(v: Vec2, max: f32) -> Vec2 {
    let len_sq = v.length_squared();
    if len_sq > max * max {
        v.normalize_or_zero() * max
    } else {
        v
    }
}

/// Heading angle of `v` in radians (atan2). Zero vector reads as 0.
pub fn heading(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}

/// Vector of length `magnitude` pointing along `angle`.
pub fn from_heading(angle: f32, magnitude: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin()) * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_clamps_long_vectors_only() {
        let long = limit(Vec2::new(30.0, 40.0), 5.0);
        assert!((long.length() - 5.0).abs() < 1e-5);
        assert!((long.x - 3.0).abs() < 1e-5);

        let short = Vec2::new(1.0, 1.0);
        assert_eq!(limit(short, 5.0), short);
        assert_eq!(limit(Vec2::ZERO, 5.0), Vec2::ZERO);
    }

    #[test]
    fn heading_round_trips() {
        let v = from_heading(heading(Vec2::new(0.0, 2.0)), 2.0);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 2.0).abs() < 1e-5);
    }
}
