use crate::progress::ProgressHistory;

/// グラフ描画領域の余白（ピクセル）
pub const CHART_MARGIN: i32 = 60;

/// 1記録分の点
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub score: f64,
    pub x: i32,
    pub y: i32,
}

/// 平均スコアの推移グラフ
///
/// X軸はキーの辞書順、Y軸は 0〜100 のスコア。
#[derive(Debug, Clone)]
pub struct ProgressChart {
    pub width: i32,
    pub height: i32,
    pub points: Vec<ChartPoint>,
}

impl ProgressChart {
    pub fn from_history(history: &ProgressHistory, width: i32, height: i32) -> Self {
        let plot_w = (width - 2 * CHART_MARGIN).max(1);
        let plot_h = (height - 2 * CHART_MARGIN).max(1);
        let n = history.len();

        let points = history
            .iter()
            .enumerate()
            .map(|(i, (label, record))| {
                let x = if n <= 1 {
                    CHART_MARGIN + plot_w / 2
                } else {
                    CHART_MARGIN + (i as i64 * plot_w as i64 / (n as i64 - 1)) as i32
                };
                let score = record.score.clamp(0.0, 100.0);
                let y = CHART_MARGIN + plot_h - (score / 100.0 * plot_h as f64).round() as i32;
                ChartPoint {
                    label: label.clone(),
                    score: record.score,
                    x,
                    y,
                }
            })
            .collect();

        Self {
            width,
            height,
            points,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// プロット領域の左上と右下
    pub fn plot_area(&self) -> ((i32, i32), (i32, i32)) {
        (
            (CHART_MARGIN, CHART_MARGIN),
            (self.width - CHART_MARGIN, self.height - CHART_MARGIN),
        )
    }

    /// 端末表示用の表
    pub fn to_table(&self) -> String {
        let mut out = String::from("Squat Form Progress Over Time\n");
        for p in &self.points {
            let bar = "#".repeat((p.score.clamp(0.0, 100.0) / 2.0).round() as usize);
            out.push_str(&format!("{}  {:>5.1}%  {}\n", p.label, p.score, bar));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressRecord;

    fn history(scores: &[(&str, f64)]) -> ProgressHistory {
        scores
            .iter()
            .map(|(k, s)| {
                (
                    k.to_string(),
                    ProgressRecord {
                        score: *s,
                        good_frame_ratio: 0.0,
                        knee_toe_issues: 0,
                        depth_issues: 0,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let chart = ProgressChart::from_history(&ProgressHistory::new(), 800, 400);
        assert!(chart.is_empty());
        assert_eq!(chart.to_table(), "Squat Form Progress Over Time\n");
    }

    #[test]
    fn test_points_follow_key_order() {
        let h = history(&[("2026-10-17 09:00:00", 80.0), ("2026-01-01 09:00:00", 60.0)]);
        let chart = ProgressChart::from_history(&h, 800, 400);
        assert_eq!(chart.points[0].label, "2026-01-01 09:00:00");
        assert_eq!(chart.points[1].label, "2026-10-17 09:00:00");
        assert_eq!(chart.points[0].x, CHART_MARGIN);
        assert_eq!(chart.points[1].x, 800 - CHART_MARGIN);
    }

    #[test]
    fn test_score_maps_to_y() {
        let h = history(&[("a", 0.0), ("b", 50.0), ("c", 100.0)]);
        let chart = ProgressChart::from_history(&h, 800, 400);
        // プロット高さ 280
        assert_eq!(chart.points[0].y, 340);
        assert_eq!(chart.points[1].y, 200);
        assert_eq!(chart.points[2].y, 60);
    }

    #[test]
    fn test_single_point_centered() {
        let chart = ProgressChart::from_history(&history(&[("a", 75.0)]), 800, 400);
        assert_eq!(chart.points[0].x, 400);
    }

    #[test]
    fn test_table() {
        let chart = ProgressChart::from_history(&history(&[("2026-10-17 09:00:00", 80.0)]), 800, 400);
        let table = chart.to_table();
        assert!(table.contains("2026-10-17 09:00:00   80.0%  "));
        assert!(table.ends_with(&format!("{}\n", "#".repeat(40))));
    }
}
