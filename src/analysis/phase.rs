use std::fmt;

/// スクワットのフェーズ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SquatPhase {
    /// 姿勢が検証を通らなかった
    #[default]
    Invalid,
    Top,
    Descent,
    Bottom,
    Ascent,
}

impl SquatPhase {
    /// (現在の深さ, 前フレームの深さ) から次のフェーズを決める
    pub fn transition(is_deep: bool, last_deep: bool) -> Self {
        match (is_deep, last_deep) {
            (true, false) => Self::Descent,
            (true, true) => Self::Bottom,
            (false, true) => Self::Ascent,
            (false, false) => Self::Top,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invalid => "invalid",
            Self::Top => "top",
            Self::Descent => "descent",
            Self::Bottom => "bottom",
            Self::Ascent => "ascent",
        }
    }
}

impl fmt::Display for SquatPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 腰が膝の高さ以下まで下がっているか (Yが大きいほど下)
pub fn is_squat_depth(hip_y: f32, knee_y: f32) -> bool {
    hip_y >= knee_y
}

/// 深さフラグの変化だけで駆動するフェーズ遷移
///
/// ヒステリシスは持たない。1フレームのちらつきでもフェーズが切り替わる。
#[derive(Debug, Clone, Default)]
pub struct PhaseTracker {
    last_deep: bool,
    phase: SquatPhase,
}

impl PhaseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, is_deep: bool) -> SquatPhase {
        self.phase = SquatPhase::transition(is_deep, self.last_deep);
        self.last_deep = is_deep;
        self.phase
    }

    /// 無効フレーム。深さフラグは保持する
    pub fn mark_invalid(&mut self) {
        self.phase = SquatPhase::Invalid;
    }

    pub fn phase(&self) -> SquatPhase {
        self.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(SquatPhase::transition(true, false), SquatPhase::Descent);
        assert_eq!(SquatPhase::transition(true, true), SquatPhase::Bottom);
        assert_eq!(SquatPhase::transition(false, true), SquatPhase::Ascent);
        assert_eq!(SquatPhase::transition(false, false), SquatPhase::Top);
    }

    #[test]
    fn test_initial_state() {
        let tracker = PhaseTracker::new();
        assert_eq!(tracker.phase(), SquatPhase::Invalid);
    }

    #[test]
    fn test_full_squat_sequence() {
        let mut tracker = PhaseTracker::new();
        let phases: Vec<SquatPhase> = [false, false, true, true, false]
            .iter()
            .map(|&deep| tracker.update(deep))
            .collect();
        assert_eq!(
            phases,
            vec![
                SquatPhase::Top,
                SquatPhase::Top,
                SquatPhase::Descent,
                SquatPhase::Bottom,
                SquatPhase::Ascent,
            ]
        );
    }

    #[test]
    fn test_single_frame_flicker_toggles_phase() {
        // デバウンスなし: 深さが毎フレーム反転するとフェーズも毎フレーム変わる
        let mut tracker = PhaseTracker::new();
        let phases: Vec<SquatPhase> = [true, false, true, false]
            .iter()
            .map(|&deep| tracker.update(deep))
            .collect();
        assert_eq!(
            phases,
            vec![
                SquatPhase::Descent,
                SquatPhase::Ascent,
                SquatPhase::Descent,
                SquatPhase::Ascent,
            ]
        );
    }

    #[test]
    fn test_mark_invalid_keeps_depth() {
        let mut tracker = PhaseTracker::new();
        tracker.update(true);
        tracker.mark_invalid();
        assert_eq!(tracker.phase(), SquatPhase::Invalid);
        // 復帰後は前回の深さから遷移する
        assert_eq!(tracker.update(true), SquatPhase::Bottom);
    }

    #[test]
    fn test_is_squat_depth() {
        assert!(is_squat_depth(300.0, 300.0));
        assert!(is_squat_depth(310.0, 300.0));
        assert!(!is_squat_depth(290.0, 300.0));
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(SquatPhase::Invalid.to_string(), "invalid");
        assert_eq!(SquatPhase::Ascent.to_string(), "ascent");
    }
}
