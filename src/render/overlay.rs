use crate::analysis::{FrameEvaluation, FrameOutcome};

/// 良好表示の色 (RGB)
pub const GOOD_COLOR: u32 = 0x00FF00; // 緑
/// 問題表示の色 (RGB)
pub const ISSUE_COLOR: u32 = 0xFF0000; // 赤
/// 警告フレームの背景色 (RGB)
pub const WARNING_BACKGROUND: u32 = 0x323232; // 暗い灰色

pub const NO_POSE_MESSAGE: &str = "No pose detected. Adjust camera or stand up.";
pub const INVALID_POSE_MESSAGE: &str = "Full body not detected. Adjust camera or stand up.";

/// テキスト1行
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLine {
    pub text: String,
    pub color: u32,
    /// フォント倍率
    pub scale: f64,
}

impl OverlayLine {
    fn new(text: String, color: u32, scale: f64) -> Self {
        Self { text, color, scale }
    }
}

/// 膝位置のマーカー
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KneeMarker {
    pub position: (i32, i32),
    /// 膝-足首距離が許容内
    pub ok: bool,
}

impl KneeMarker {
    pub fn color(&self) -> u32 {
        if self.ok { GOOD_COLOR } else { ISSUE_COLOR }
    }
}

/// 1フレームに重ねる表示内容
#[derive(Debug, Clone, PartialEq)]
pub enum Overlay {
    /// 映像を灰色で塗りつぶして警告を出す
    Warning(String),
    Analysis {
        lines: Vec<OverlayLine>,
        knees: [KneeMarker; 2],
    },
}

impl Overlay {
    pub fn from_outcome(outcome: &FrameOutcome, knee_toe_threshold: f32) -> Self {
        match outcome {
            FrameOutcome::NoPose => Self::Warning(NO_POSE_MESSAGE.to_string()),
            FrameOutcome::Invalid(_) => Self::Warning(INVALID_POSE_MESSAGE.to_string()),
            FrameOutcome::Evaluated(eval) => Self::from_evaluation(eval, knee_toe_threshold),
        }
    }

    fn from_evaluation(eval: &FrameEvaluation, knee_toe_threshold: f32) -> Self {
        let feedback_color = if eval.good_frame { GOOD_COLOR } else { ISSUE_COLOR };
        let lines = vec![
            OverlayLine::new(format!("Score: {:.0}%", eval.smoothed_score), GOOD_COLOR, 1.0),
            OverlayLine::new(format!("Feedback: {}", eval.feedback_text()), feedback_color, 0.7),
            OverlayLine::new(format!("Frame: {}", eval.frame_index), GOOD_COLOR, 0.7),
            OverlayLine::new(format!("Phase: {}", eval.phase), GOOD_COLOR, 0.7),
            OverlayLine::new(format!("Reps: {}", eval.reps), GOOD_COLOR, 0.7),
            OverlayLine::new(
                format!("Knee angle: L {:.0} / R {:.0}", eval.left_knee_angle, eval.right_knee_angle),
                GOOD_COLOR,
                0.7,
            ),
            OverlayLine::new(
                format!("Hip angle: {:.0} / Back offset: {:.0}px", eval.hip_angle, eval.back_offset),
                GOOD_COLOR,
                0.7,
            ),
        ];
        let knees = [
            KneeMarker {
                position: eval.left_knee,
                ok: eval.left_knee_distance <= knee_toe_threshold,
            },
            KneeMarker {
                position: eval.right_knee,
                ok: eval.right_knee_distance <= knee_toe_threshold,
            },
        ];
        Self::Analysis { lines, knees }
    }
}
