/// b を頂点とする角 a-b-c (度, 0〜180)
pub fn joint_angle(a: (i32, i32), b: (i32, i32), c: (i32, i32)) -> f32 {
    let ang_c = ((c.1 - b.1) as f32).atan2((c.0 - b.0) as f32);
    let ang_a = ((a.1 - b.1) as f32).atan2((a.0 - b.0) as f32);
    let mut angle = (ang_c - ang_a).to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    angle
}

/// 肩の中点と腰の中点の水平ずれ（ピクセル）。0 なら背中が垂直
pub fn back_offset(
    left_shoulder: (i32, i32),
    right_shoulder: (i32, i32),
    left_hip: (i32, i32),
    right_hip: (i32, i32),
) -> f32 {
    let shoulder_x = (left_shoulder.0 + right_shoulder.0) as f32 / 2.0;
    let hip_x = (left_hip.0 + right_hip.0) as f32 / 2.0;
    (shoulder_x - hip_x).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_leg() {
        let angle = joint_angle((100, 100), (100, 200), (100, 300));
        assert!((angle - 180.0).abs() < 0.01);
    }

    #[test]
    fn test_right_angle() {
        let angle = joint_angle((200, 200), (100, 200), (100, 300));
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_reflex_angle_folded() {
        // atan2差が180度を超える場合は補角に折り返す
        let angle = joint_angle((0, -10), (0, 0), (-10, 1));
        assert!(angle <= 180.0);
        assert!(angle > 0.0);
    }

    #[test]
    fn test_back_offset() {
        assert_eq!(back_offset((100, 0), (200, 0), (100, 300), (200, 300)), 0.0);
        assert_eq!(back_offset((160, 0), (260, 0), (100, 300), (200, 300)), 60.0);
        assert_eq!(back_offset((40, 0), (140, 0), (100, 300), (200, 300)), 60.0);
    }
}
