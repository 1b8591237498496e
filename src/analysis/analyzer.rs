use tracing::debug;

use super::angles::{back_offset, joint_angle};
use super::feedback::{Feedback, FeedbackPolicy};
use super::phase::{is_squat_depth, SquatPhase};
use super::scorer::{knee_toe_distance, FormIssue, FormScorer, GOOD_SCORE};
use super::session::SessionState;
use super::validator::{average_y, validate, Rejection};
use crate::config::Config;
use crate::pose::{KeypointIndex, Pose};

/// 有効フレームの評価結果
#[derive(Debug, Clone, PartialEq)]
pub struct FrameEvaluation {
    /// 有効フレームの通し番号 (1始まり)
    pub frame_index: u64,
    pub left_knee: (i32, i32),
    pub right_knee: (i32, i32),
    pub left_knee_distance: f32,
    pub right_knee_distance: f32,
    /// 股-膝-足首の角度（度）
    pub left_knee_angle: f32,
    pub right_knee_angle: f32,
    /// 肩-腰-膝の角度の左右平均（度）
    pub hip_angle: f32,
    /// 肩と腰の中点の水平ずれ（ピクセル）
    pub back_offset: f32,
    pub depth_valid: bool,
    pub phase: SquatPhase,
    pub score: f32,
    pub smoothed_score: f32,
    pub good_frame: bool,
    /// 平滑化スコアが低いときの問題
    pub issue: Option<FormIssue>,
    pub reps: u32,
    /// このフレームで発話したフィードバック
    pub feedback: Option<Feedback>,
}

impl FrameEvaluation {
    /// オーバーレイ用の短いフィードバック文
    pub fn feedback_text(&self) -> String {
        match self.issue {
            Some(issue) => format!("Issue: {}", issue.label()),
            None => "Good form".to_string(),
        }
    }
}

/// 1フレームの処理結果
#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// 姿勢が検出されなかった
    NoPose,
    /// 検証で弾かれた
    Invalid(Rejection),
    Evaluated(FrameEvaluation),
}

/// スクワットフォーム評価器
pub struct SquatAnalyzer {
    scorer: FormScorer,
    feedback: FeedbackPolicy,
}

impl SquatAnalyzer {
    pub fn new(scorer: FormScorer, feedback: FeedbackPolicy) -> Self {
        Self { scorer, feedback }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            FormScorer::from_config(config),
            FeedbackPolicy::new(config.feedback_cooldown),
        )
    }

    pub fn scorer(&self) -> &FormScorer {
        &self.scorer
    }

    /// 1フレームを評価してセッション状態を更新する
    ///
    /// 姿勢なしのフレームは状態を変えない。無効フレームはフェーズのみ invalid にする。
    pub fn evaluate(
        &self,
        state: &mut SessionState,
        pose: Option<&Pose>,
        width: u32,
        height: u32,
    ) -> FrameOutcome {
        let pose = match pose {
            Some(p) => p,
            None => return FrameOutcome::NoPose,
        };

        if let Err(rejection) = validate(pose, width, height) {
            debug!("Invalid pose: {}", rejection);
            state.mark_invalid();
            return FrameOutcome::Invalid(rejection);
        }

        let px = |index: KeypointIndex| pose.pixel(index, width, height);
        let left_shoulder = px(KeypointIndex::LeftShoulder);
        let right_shoulder = px(KeypointIndex::RightShoulder);
        let left_hip = px(KeypointIndex::LeftHip);
        let right_hip = px(KeypointIndex::RightHip);
        let left_knee = px(KeypointIndex::LeftKnee);
        let right_knee = px(KeypointIndex::RightKnee);
        let left_ankle = px(KeypointIndex::LeftAnkle);
        let right_ankle = px(KeypointIndex::RightAnkle);

        let left_dist = knee_toe_distance(left_knee, left_ankle);
        let right_dist = knee_toe_distance(right_knee, right_ankle);

        let hip_y = average_y(pose, KeypointIndex::LeftHip, KeypointIndex::RightHip, width, height);
        let knee_y = average_y(pose, KeypointIndex::LeftKnee, KeypointIndex::RightKnee, width, height);
        let is_deep = is_squat_depth(hip_y, knee_y);

        // 検証で膝が腰より下であることを要求しているため、ここに来る is_deep は常に false
        let phase = state.update_phase(is_deep);

        let left_knee_angle = joint_angle(left_hip, left_knee, left_ankle);
        let right_knee_angle = joint_angle(right_hip, right_knee, right_ankle);
        let hip_angle = (joint_angle(left_shoulder, left_hip, left_knee)
            + joint_angle(right_shoulder, right_hip, right_knee))
            / 2.0;
        // 反復回数は深さではなく膝の曲がりで数える
        let reps = state.update_reps((left_knee_angle + right_knee_angle) / 2.0);

        let score = self.scorer.score(left_dist, right_dist, is_deep);
        let knees_forward = self.scorer.knees_forward(left_dist, right_dist);
        let smoothed = state.record_score(score, knees_forward, is_deep);

        let good_frame = smoothed >= GOOD_SCORE;
        state.record_good_frame(good_frame);
        let issue = (!good_frame).then(|| FormIssue::classify(knees_forward, is_deep));

        let frame_index = state.frame_count();
        let feedback = if self.feedback.is_due(frame_index, state.last_feedback_frame(), phase) {
            state.mark_feedback();
            Some(Feedback::select(smoothed, knees_forward, is_deep))
        } else {
            None
        };

        debug!(
            "frame={} phase={} score={:.1} smoothed={:.1} knee=({:.1}, {:.1})",
            frame_index, phase, score, smoothed, left_dist, right_dist
        );

        FrameOutcome::Evaluated(FrameEvaluation {
            frame_index,
            left_knee,
            right_knee,
            left_knee_distance: left_dist,
            right_knee_distance: right_dist,
            left_knee_angle,
            right_knee_angle,
            hip_angle,
            back_offset: back_offset(left_shoulder, right_shoulder, left_hip, right_hip),
            depth_valid: is_deep,
            phase,
            score,
            smoothed_score: smoothed,
            good_frame,
            issue,
            reps,
            feedback,
        })
    }
}
