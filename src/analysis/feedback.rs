use super::phase::SquatPhase;
use super::scorer::GOOD_SCORE;

/// 音声フィードバックの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    KneesForward,
    GoDeeper,
    /// top フェーズでは深さ不足が必ず成立するため、音声としては到達しない
    ImproveForm,
    Praise,
}

impl Feedback {
    pub fn message(&self) -> &'static str {
        match self {
            Self::KneesForward => "Pull your knees back in line!",
            Self::GoDeeper => "Go deeper next time!",
            Self::ImproveForm => "Improve your form!",
            Self::Praise => "Good squat! Keep it up!",
        }
    }

    /// 平滑化スコアと現フレームの問題から発話内容を選ぶ
    pub fn select(smoothed_score: f32, knees_forward: bool, depth_valid: bool) -> Self {
        if smoothed_score >= GOOD_SCORE {
            Self::Praise
        } else if knees_forward {
            Self::KneesForward
        } else if !depth_valid {
            Self::GoDeeper
        } else {
            Self::ImproveForm
        }
    }
}

/// クールダウン付きの発話タイミング判定
#[derive(Debug, Clone)]
pub struct FeedbackPolicy {
    cooldown: u64,
}

impl FeedbackPolicy {
    pub fn new(cooldown: u64) -> Self {
        Self { cooldown }
    }

    /// top フェーズかつ前回から cooldown フレーム以上経過しているか
    pub fn is_due(&self, frame_index: u64, last_feedback_frame: u64, phase: SquatPhase) -> bool {
        phase == SquatPhase::Top && frame_index.saturating_sub(last_feedback_frame) >= self.cooldown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_praise() {
        assert_eq!(Feedback::select(60.0, true, false), Feedback::Praise);
        assert_eq!(Feedback::select(95.0, false, true), Feedback::Praise);
    }

    #[test]
    fn test_select_priority() {
        assert_eq!(Feedback::select(55.0, true, false), Feedback::KneesForward);
        assert_eq!(Feedback::select(55.0, false, false), Feedback::GoDeeper);
        assert_eq!(Feedback::select(55.0, false, true), Feedback::ImproveForm);
    }

    #[test]
    fn test_messages() {
        assert_eq!(Feedback::KneesForward.message(), "Pull your knees back in line!");
        assert_eq!(Feedback::GoDeeper.message(), "Go deeper next time!");
        assert_eq!(Feedback::ImproveForm.message(), "Improve your form!");
        assert_eq!(Feedback::Praise.message(), "Good squat! Keep it up!");
    }

    #[test]
    fn test_due_only_at_top() {
        let policy = FeedbackPolicy::new(120);
        assert!(policy.is_due(120, 0, SquatPhase::Top));
        for phase in [SquatPhase::Invalid, SquatPhase::Descent, SquatPhase::Bottom, SquatPhase::Ascent] {
            assert!(!policy.is_due(500, 0, phase));
        }
    }

    #[test]
    fn test_cooldown_boundary() {
        let policy = FeedbackPolicy::new(120);
        assert!(!policy.is_due(119, 0, SquatPhase::Top));
        assert!(policy.is_due(120, 0, SquatPhase::Top));
        assert!(!policy.is_due(239, 120, SquatPhase::Top));
        assert!(policy.is_due(240, 120, SquatPhase::Top));
    }
}
