use anyhow::Result;
use chrono::Local;
use std::fmt;
use tracing::{error, info, warn};

use crate::analysis::{FrameOutcome, SessionState, SessionSummary, SquatAnalyzer};
use crate::pose::LandmarkSource;
use crate::progress::{timestamp_key, ProgressRecord, ProgressStore};
use crate::render::{FrameDisplay, Overlay};
use crate::speech::SpeechSink;

/// ループ終了の理由
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEnd {
    SourceExhausted,
    Cancelled,
}

/// 実行結果
#[derive(Debug, Clone)]
pub struct RunReport {
    pub summary: SessionSummary,
    /// 進捗ファイルのキー
    pub progress_key: String,
    /// 進捗を保存できたか
    pub saved: bool,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(f, "Final Score: {:.0}%", s.mean_score)?;
        writeln!(
            f,
            "Good Frames: {}/{} ({:.1}%)",
            s.good_frames, s.frame_count, s.good_frame_ratio
        )?;
        writeln!(f, "Knee-Toe Issues: {}", s.knee_toe_issues)?;
        writeln!(f, "Depth Issues: {}", s.depth_issues)?;
        writeln!(f, "Reps: {}", s.reps)?;
        write!(f, "Analysis completed on {}", self.progress_key)
    }
}

/// 解析ループを回し、どの終了経路でも進捗を保存して集計を返す
///
/// ループ中のエラーは集計と一緒に返すので、呼び出し側は結果表示の後に伝播させる。
pub fn run<S, D, T>(
    analyzer: &SquatAnalyzer,
    source: &mut S,
    display: &mut D,
    speech: &mut T,
    store: &ProgressStore,
) -> (RunReport, Result<RunEnd>)
where
    S: LandmarkSource,
    D: FrameDisplay<S::Image>,
    T: SpeechSink,
{
    let mut state = SessionState::new();
    let result = process_frames(analyzer, &mut state, source, display, speech);
    let report = finalize(&state, store, &timestamp_key(Local::now()));

    match &result {
        Ok(end) => info!("Analysis finished ({:?}) after {} valid frames", end, state.frame_count()),
        Err(e) => error!("Analysis aborted: {:#}", e),
    }
    (report, result)
}

/// 入力が尽きるか終了が要求されるまでフレームを処理する
pub fn process_frames<S, D, T>(
    analyzer: &SquatAnalyzer,
    state: &mut SessionState,
    source: &mut S,
    display: &mut D,
    speech: &mut T,
) -> Result<RunEnd>
where
    S: LandmarkSource,
    D: FrameDisplay<S::Image>,
    T: SpeechSink,
{
    let knee_toe_threshold = analyzer.scorer().knee_toe_threshold();

    loop {
        let frame = match source.next_frame()? {
            Some(f) => f,
            None => {
                info!("Video processing completed or video ended");
                return Ok(RunEnd::SourceExhausted);
            }
        };

        let outcome = analyzer.evaluate(state, frame.pose.as_ref(), frame.width, frame.height);

        if let FrameOutcome::Evaluated(eval) = &outcome {
            if let Some(feedback) = eval.feedback {
                // 再生完了までブロックする
                if let Err(e) = speech.speak(feedback.message()) {
                    warn!("Speech failed: {:#}", e);
                }
            }
        }

        let overlay = Overlay::from_outcome(&outcome, knee_toe_threshold);
        display.present(&frame.image, frame.pose.as_ref(), &overlay)?;

        if display.quit_requested() {
            info!("Cancelled by user");
            return Ok(RunEnd::Cancelled);
        }
    }
}

/// セッションを集計して進捗ファイルへ書き込む
pub fn finalize(state: &SessionState, store: &ProgressStore, key: &str) -> RunReport {
    let summary = state.summary();
    let saved = match store.save_record(key, ProgressRecord::from(&summary)) {
        Ok(()) => true,
        Err(e) => {
            error!("Failed to save progress: {}", e);
            false
        }
    };

    RunReport {
        summary,
        progress_key: key.to_string(),
        saved,
    }
}
