use crate::models::Keypoint;

/// Interior angle at `vertex`, in whole degrees (0..=180).
///
/// Missing keypoints and coincident points both yield 0 so a partially
/// visible body never aborts a cycle.
pub fn joint_angle(a: Option<&Keypoint>, vertex: Option<&Keypoint>, c: Option<&Keypoint>) -> u32 {
    let (a, b, c) = match (a, vertex, c) {
        (Some(a), Some(b), Some(c)) => (a, b, c),
        _ => return 0,
    };

    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let dot = bax * bcx + bay * bcy;
    let magnitude = bax.hypot(bay) * bcx.hypot(bcy);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return 0;
    }

    let cosine = (dot / magnitude).clamp(-1.0, 1.0);
    let degrees = cosine.acos().to_degrees().round();
    if degrees.is_nan() {
        return 0;
    }
    degrees as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kp(x: f64, y: f64) -> Keypoint {
        Keypoint::new("p", x, y, 1.0)
    }

    #[test]
    fn right_angle() {
        assert_eq!(joint_angle(Some(&kp(1.0, 0.0)), Some(&kp(0.0, 0.0)), Some(&kp(0.0, 1.0))), 90);
    }

    #[test]
    fn straight_and_folded() {
        let vertex = kp(0.0, 0.0);
        assert_eq!(joint_angle(Some(&kp(-2.0, 0.0)), Some(&vertex), Some(&kp(3.0, 0.0))), 180);
        assert_eq!(joint_angle(Some(&kp(2.0, 0.0)), Some(&vertex), Some(&kp(5.0, 0.0))), 0);
    }

    #[test]
    fn rounds_to_nearest_degree() {
        // atan(1/2) ≈ 26.565°
        assert_eq!(joint_angle(Some(&kp(2.0, 1.0)), Some(&kp(0.0, 0.0)), Some(&kp(1.0, 0.0))), 27);
    }

    #[test]
    fn missing_joint_is_zero() {
        assert_eq!(joint_angle(None, Some(&kp(0.0, 0.0)), Some(&kp(1.0, 1.0))), 0);
        assert_eq!(joint_angle(Some(&kp(1.0, 0.0)), None, Some(&kp(1.0, 1.0))), 0);
        assert_eq!(joint_angle(Some(&kp(1.0, 0.0)), Some(&kp(0.0, 0.0)), None), 0);
    }

    #[test]
    fn degenerate_vector_is_zero() {
        let p = kp(4.0, 4.0);
        assert_eq!(joint_angle(Some(&p), Some(&p), Some(&kp(9.0, 1.0))), 0);
    }

    #[test]
    fn stays_within_range_for_arbitrary_points() {
        let coords = [-1000.0, -3.5, -0.001, 0.0, 0.25, 7.0, 1e6];
        for &ax in &coords {
            for &cy in &coords {
                for &bx in &coords {
                    let angle =
                        joint_angle(Some(&kp(ax, cy)), Some(&kp(bx, 0.5)), Some(&kp(cy, ax)));
                    assert!(angle <= 180, "angle {angle} out of range");
                }
            }
        }
    }
}
