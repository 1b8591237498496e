use std::fmt;

use crate::pose::{KeypointIndex, Pose};

/// 必要キーポイントの可視性閾値
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// スクワット判定に必要な8キーポイント
pub const REQUIRED_LANDMARKS: [KeypointIndex; 8] = [
    KeypointIndex::LeftShoulder,
    KeypointIndex::RightShoulder,
    KeypointIndex::LeftHip,
    KeypointIndex::RightHip,
    KeypointIndex::LeftKnee,
    KeypointIndex::RightKnee,
    KeypointIndex::LeftAnkle,
    KeypointIndex::RightAnkle,
];

/// フレームを無効とした理由
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    LowVisibility {
        landmark: KeypointIndex,
        visibility: f32,
    },
    OutOfFrame {
        landmark: KeypointIndex,
        x: i32,
        y: i32,
    },
    Misaligned {
        shoulder_y: f32,
        hip_y: f32,
        knee_y: f32,
    },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LowVisibility { landmark, visibility } => {
                write!(f, "low visibility for {}: {:.2}", landmark.name(), visibility)
            }
            Self::OutOfFrame { landmark, x, y } => {
                write!(f, "{} out of frame: x={}, y={}", landmark.name(), x, y)
            }
            Self::Misaligned { shoulder_y, hip_y, knee_y } => write!(
                f,
                "invalid spatial alignment: shoulder_y={:.1}, hip_y={:.1}, knee_y={:.1}",
                shoulder_y, hip_y, knee_y
            ),
        }
    }
}

/// 左右キーポイントのピクセルY座標の平均
pub fn average_y(pose: &Pose, left: KeypointIndex, right: KeypointIndex, width: u32, height: u32) -> f32 {
    let (_, ly) = pose.pixel(left, width, height);
    let (_, ry) = pose.pixel(right, width, height);
    (ly + ry) as f32 / 2.0
}

/// スクワット判定に使える姿勢か検証する
///
/// 1. 8キーポイントすべての可視性が閾値以上
/// 2. ピクセル座標がフレーム内 ([0,width]×[0,height])
/// 3. 肩 → 腰 → 膝 の順に上から並んでいる (Yが小さいほど上)
pub fn validate(pose: &Pose, width: u32, height: u32) -> Result<(), Rejection> {
    for &landmark in REQUIRED_LANDMARKS.iter() {
        let kp = pose.get(landmark);
        if !kp.is_visible(VISIBILITY_THRESHOLD) {
            return Err(Rejection::LowVisibility {
                landmark,
                visibility: kp.visibility,
            });
        }
    }

    for &landmark in REQUIRED_LANDMARKS.iter() {
        let (x, y) = pose.pixel(landmark, width, height);
        if x < 0 || x > width as i32 || y < 0 || y > height as i32 {
            return Err(Rejection::OutOfFrame { landmark, x, y });
        }
    }

    let shoulder_y = average_y(pose, KeypointIndex::LeftShoulder, KeypointIndex::RightShoulder, width, height);
    let hip_y = average_y(pose, KeypointIndex::LeftHip, KeypointIndex::RightHip, width, height);
    let knee_y = average_y(pose, KeypointIndex::LeftKnee, KeypointIndex::RightKnee, width, height);

    if hip_y <= shoulder_y || knee_y <= hip_y {
        return Err(Rejection::Misaligned {
            shoulder_y,
            hip_y,
            knee_y,
        });
    }

    Ok(())
}
