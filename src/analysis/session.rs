use super::phase::{PhaseTracker, SquatPhase};
use super::reps::RepCounter;
use super::scorer::{mean, smoothed_score};

/// 1回の実行を通したセッション状態
///
/// フレーム処理のたびに `SquatAnalyzer::evaluate` へ明示的に渡して更新する。
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    frame_count: u64,
    good_frames: u64,
    knee_toe_issues: u64,
    depth_issues: u64,
    score_history: Vec<f32>,
    last_feedback_frame: u64,
    phase: PhaseTracker,
    reps: RepCounter,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// スコアを記録して平滑化スコアを返す
    ///
    /// 問題カウンタは平滑化前の生の判定で加算する。
    pub fn record_score(&mut self, score: f32, knees_forward: bool, depth_valid: bool) -> f32 {
        self.score_history.push(score);
        self.frame_count += 1;
        if knees_forward {
            self.knee_toe_issues += 1;
        }
        if !depth_valid {
            self.depth_issues += 1;
        }
        smoothed_score(&self.score_history)
    }

    pub fn record_good_frame(&mut self, good: bool) {
        if good {
            self.good_frames += 1;
        }
    }

    pub fn update_phase(&mut self, is_deep: bool) -> SquatPhase {
        self.phase.update(is_deep)
    }

    /// 左右平均の膝角度で反復回数を進め、現在の回数を返す
    pub fn update_reps(&mut self, knee_angle: f32) -> u32 {
        self.reps.update(knee_angle);
        self.reps.count()
    }

    pub fn mark_invalid(&mut self) {
        self.phase.mark_invalid();
    }

    /// 現在のフレーム番号で発話済みとする
    pub fn mark_feedback(&mut self) {
        self.last_feedback_frame = self.frame_count;
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn good_frames(&self) -> u64 {
        self.good_frames
    }

    pub fn knee_toe_issues(&self) -> u64 {
        self.knee_toe_issues
    }

    pub fn depth_issues(&self) -> u64 {
        self.depth_issues
    }

    pub fn score_history(&self) -> &[f32] {
        &self.score_history
    }

    pub fn last_feedback_frame(&self) -> u64 {
        self.last_feedback_frame
    }

    pub fn phase(&self) -> SquatPhase {
        self.phase.phase()
    }

    pub fn reps(&self) -> u32 {
        self.reps.count()
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            mean_score: mean(&self.score_history),
            good_frame_ratio: good_frame_ratio(self.good_frames, self.frame_count),
            knee_toe_issues: self.knee_toe_issues,
            depth_issues: self.depth_issues,
            frame_count: self.frame_count,
            good_frames: self.good_frames,
            reps: self.reps.count(),
        }
    }
}

/// 良いフレームの割合（%）。フレームが無ければ 0
pub fn good_frame_ratio(good_frames: u64, frame_count: u64) -> f32 {
    if frame_count == 0 {
        return 0.0;
    }
    good_frames as f32 / frame_count as f32 * 100.0
}

/// 実行終了時の集計
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub mean_score: f32,
    pub good_frame_ratio: f32,
    pub knee_toe_issues: u64,
    pub depth_issues: u64,
    pub frame_count: u64,
    pub good_frames: u64,
    pub reps: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_summary() {
        let summary = SessionState::new().summary();
        assert_eq!(summary.mean_score, 0.0);
        assert_eq!(summary.good_frame_ratio, 0.0);
        assert_eq!(summary.frame_count, 0);
        assert_eq!(summary.reps, 0);
    }

    #[test]
    fn test_record_score_counts_raw_issues() {
        let mut state = SessionState::new();
        state.record_score(95.0, true, true);
        state.record_score(80.0, false, false);
        state.record_score(75.0, true, false);

        assert_eq!(state.frame_count(), 3);
        assert_eq!(state.knee_toe_issues(), 2);
        assert_eq!(state.depth_issues(), 2);
        assert_eq!(state.score_history(), &[95.0, 80.0, 75.0]);
    }

    #[test]
    fn test_record_score_returns_smoothed() {
        let mut state = SessionState::new();
        assert_eq!(state.record_score(100.0, false, true), 100.0);
        assert_eq!(state.record_score(50.0, true, false), 75.0);
    }

    #[test]
    fn test_good_frame_ratio() {
        assert_eq!(good_frame_ratio(0, 0), 0.0);
        assert_eq!(good_frame_ratio(3, 4), 75.0);
        assert_eq!(good_frame_ratio(10, 10), 100.0);
    }

    #[test]
    fn test_summary_matches_counters() {
        let mut state = SessionState::new();
        for (i, score) in [100.0, 90.0, 55.0, 50.0].iter().enumerate() {
            let smoothed = state.record_score(*score, false, true);
            state.record_good_frame(smoothed >= 60.0);
            assert_eq!(state.frame_count(), i as u64 + 1);
        }
        let summary = state.summary();
        assert_eq!(summary.mean_score, 73.75);
        // 平滑化スコア: 100, 95, 81.67, 73.75 → すべて良い
        assert_eq!(summary.good_frames, 4);
        assert_eq!(summary.good_frame_ratio, 100.0);
    }

    #[test]
    fn test_mark_feedback_uses_frame_count() {
        let mut state = SessionState::new();
        state.record_score(100.0, false, true);
        state.record_score(100.0, false, true);
        state.mark_feedback();
        assert_eq!(state.last_feedback_frame(), 2);
    }

    #[test]
    fn test_phase_does_not_drive_reps() {
        let mut state = SessionState::new();
        for deep in [false, true, true, false, false] {
            state.update_phase(deep);
        }
        assert_eq!(state.phase(), SquatPhase::Top);
        assert_eq!(state.reps(), 0);
    }

    #[test]
    fn test_update_reps_from_knee_angle() {
        let mut state = SessionState::new();
        let counts: Vec<u32> = [178.0, 120.0, 90.0, 140.0, 175.0, 95.0, 170.0]
            .iter()
            .map(|&angle| state.update_reps(angle))
            .collect();
        assert_eq!(counts, vec![0, 0, 0, 0, 1, 1, 2]);
        assert_eq!(state.summary().reps, 2);
    }
}
