/// 17 キーポイントのインデックス (COCO 順)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum KeypointIndex {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl KeypointIndex {
    pub const COUNT: usize = 17;

    /// ログ表示用の名前
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }
}

/// 単一キーポイント
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keypoint {
    /// 正規化されたX座標 (0.0〜1.0)
    pub x: f32,
    /// 正規化されたY座標 (0.0〜1.0)
    pub y: f32,
    /// 可視性スコア (0.0〜1.0)
    pub visibility: f32,
}

impl Keypoint {
    pub fn new(x: f32, y: f32, visibility: f32) -> Self {
        Self { x, y, visibility }
    }

    /// 可視性が閾値以上か
    pub fn is_visible(&self, threshold: f32) -> bool {
        self.visibility >= threshold
    }

    /// ピクセル座標に変換 (0方向へ切り捨て)
    pub fn to_pixel(&self, width: u32, height: u32) -> (i32, i32) {
        let px = (self.x * width as f32) as i32;
        let py = (self.y * height as f32) as i32;
        (px, py)
    }
}

impl Default for Keypoint {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            visibility: 0.0,
        }
    }
}

/// 17キーポイントからなる姿勢
#[derive(Debug, Clone)]
pub struct Pose {
    pub keypoints: [Keypoint; KeypointIndex::COUNT],
}

impl Pose {
    pub fn new(keypoints: [Keypoint; KeypointIndex::COUNT]) -> Self {
        Self { keypoints }
    }

    /// インデックスでキーポイントを取得
    pub fn get(&self, index: KeypointIndex) -> &Keypoint {
        &self.keypoints[index as usize]
    }

    /// インデックスでキーポイントのピクセル座標を取得
    pub fn pixel(&self, index: KeypointIndex, width: u32, height: u32) -> (i32, i32) {
        self.get(index).to_pixel(width, height)
    }

    /// 全キーポイントの平均可視性
    pub fn average_visibility(&self) -> f32 {
        let sum: f32 = self.keypoints.iter().map(|k| k.visibility).sum();
        sum / KeypointIndex::COUNT as f32
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            keypoints: [Keypoint::default(); KeypointIndex::COUNT],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypoint_is_visible() {
        let kp = Keypoint::new(0.5, 0.5, 0.5);
        assert!(kp.is_visible(0.5));
        assert!(!kp.is_visible(0.51));
    }

    #[test]
    fn test_keypoint_to_pixel_truncates() {
        let kp = Keypoint::new(0.5, 0.2551, 1.0);
        assert_eq!(kp.to_pixel(640, 480), (320, 122));
    }

    #[test]
    fn test_keypoint_to_pixel_outside_frame() {
        let kp = Keypoint::new(1.2, -0.1, 1.0);
        let (px, py) = kp.to_pixel(100, 100);
        assert!(px > 100);
        assert!(py < 0);
    }

    #[test]
    fn test_pose_pixel() {
        let mut keypoints = [Keypoint::default(); KeypointIndex::COUNT];
        keypoints[KeypointIndex::RightKnee as usize] = Keypoint::new(0.25, 0.75, 0.9);
        let pose = Pose::new(keypoints);
        assert_eq!(pose.pixel(KeypointIndex::RightKnee, 400, 200), (100, 150));
        assert_eq!(pose.get(KeypointIndex::RightKnee).visibility, 0.9);
    }

    #[test]
    fn test_pose_average_visibility() {
        let pose = Pose::new([Keypoint::new(0.0, 0.0, 0.5); KeypointIndex::COUNT]);
        assert!((pose.average_visibility() - 0.5).abs() < 0.001);
    }
}
