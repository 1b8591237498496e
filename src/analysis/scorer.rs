use crate::config::Config;

/// スコアの下限
pub const MIN_SCORE: f32 = 50.0;
/// スコアの上限
pub const MAX_SCORE: f32 = 100.0;
/// 平滑化スコアがこれ以上なら良いフレーム
pub const GOOD_SCORE: f32 = 60.0;
/// 移動平均の窓幅（フレーム）
pub const SMOOTHING_WINDOW: usize = 90;

/// 膝と足首のユークリッド距離（ピクセル）
pub fn knee_toe_distance(knee: (i32, i32), ankle: (i32, i32)) -> f32 {
    let dx = (knee.0 - ankle.0) as f32;
    let dy = (knee.1 - ankle.1) as f32;
    (dx * dx + dy * dy).sqrt()
}

/// 平均値。空なら 0
pub fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

/// 直近 SMOOTHING_WINDOW 件の平均
pub fn smoothed_score(history: &[f32]) -> f32 {
    let start = history.len().saturating_sub(SMOOTHING_WINDOW);
    mean(&history[start..])
}

/// フォームの問題種別
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormIssue {
    KneesForward,
    Depth,
    Unknown,
}

impl FormIssue {
    /// 膝 > 深さ > 不明 の優先順で分類
    pub fn classify(knees_forward: bool, depth_valid: bool) -> Self {
        if knees_forward {
            Self::KneesForward
        } else if !depth_valid {
            Self::Depth
        } else {
            Self::Unknown
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::KneesForward => "Knees too far forward",
            Self::Depth => "Depth issue",
            Self::Unknown => "Unknown issue",
        }
    }
}

/// 膝位置と深さによる減点方式のスコア計算
#[derive(Debug, Clone)]
pub struct FormScorer {
    knee_toe_threshold: f32,
    penalty_factor: f32,
    depth_penalty: f32,
}

impl FormScorer {
    pub fn new(knee_toe_threshold: f32, penalty_factor: f32, depth_penalty: f32) -> Self {
        Self {
            knee_toe_threshold,
            penalty_factor,
            depth_penalty,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.knee_toe_threshold, config.penalty_factor, config.depth_penalty)
    }

    pub fn knee_toe_threshold(&self) -> f32 {
        self.knee_toe_threshold
    }

    /// 片膝でも許容値を超えているか
    pub fn knees_forward(&self, left_dist: f32, right_dist: f32) -> bool {
        left_dist > self.knee_toe_threshold || right_dist > self.knee_toe_threshold
    }

    /// 1フレームのスコア (50〜100)
    pub fn score(&self, left_dist: f32, right_dist: f32, depth_valid: bool) -> f32 {
        let knee_penalty =
            ((left_dist.max(right_dist) - self.knee_toe_threshold) * self.penalty_factor).max(0.0);
        let depth_penalty = if depth_valid { 0.0 } else { self.depth_penalty };
        (MAX_SCORE - knee_penalty - depth_penalty).clamp(MIN_SCORE, MAX_SCORE)
    }
}

impl Default for FormScorer {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
