use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::SessionSummary;
use crate::error::{TrackerError, TrackerResult};

/// 既定の進捗ファイルパス
pub const PROGRESS_PATH: &str = "progress.json";

/// 記録キーの時刻フォーマット（辞書順 = 時系列順）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 1回分の記録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// 平均スコア
    pub score: f64,
    /// 良いフレームの割合（%）
    pub good_frame_ratio: f64,
    pub knee_toe_issues: u64,
    pub depth_issues: u64,
}

impl From<&SessionSummary> for ProgressRecord {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            score: summary.mean_score as f64,
            good_frame_ratio: summary.good_frame_ratio as f64,
            knee_toe_issues: summary.knee_toe_issues,
            depth_issues: summary.depth_issues,
        }
    }
}

/// キー → 記録 (キー順に並ぶ)
pub type ProgressHistory = BTreeMap<String, ProgressRecord>;

/// 記録キーを作る
pub fn timestamp_key(now: DateTime<Local>) -> String {
    now.format(TIMESTAMP_FORMAT).to_string()
}

/// JSONファイルに保存される進捗履歴
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 履歴を読み込む。ファイルが無ければ空
    pub fn load(&self) -> TrackerResult<ProgressHistory> {
        let content = match fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ProgressHistory::new()),
            Err(source) => {
                return Err(TrackerError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        serde_json::from_str(&content).map_err(|source| TrackerError::MalformedStore {
            path: self.path.clone(),
            source,
        })
    }

    /// キーの記録を書き込む。他のキーは保持し、同じキーは上書きする
    ///
    /// 既存ファイルが壊れている場合は上書きせずエラーを返す。
    pub fn save_record(&self, key: &str, record: ProgressRecord) -> TrackerResult<()> {
        let mut history = self.load()?;
        history.insert(key.to_string(), record);

        let content = serde_json::to_string_pretty(&history)?;
        fs::write(&self.path, content).map_err(|source| TrackerError::Io {
            path: self.path.clone(),
            source,
        })?;

        info!("Progress saved to {} ({} entries)", self.path.display(), history.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(score: f64) -> ProgressRecord {
        ProgressRecord {
            score,
            good_frame_ratio: 62.5,
            knee_toe_issues: 12,
            depth_issues: 340,
        }
    }

    #[test]
    fn test_load_missing_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        let written = record(81.37);

        store.save_record("2026-10-17 09:30:00", written.clone()).unwrap();
        let history = store.load().unwrap();
        assert_eq!(history.get("2026-10-17 09:30:00"), Some(&written));
    }

    #[test]
    fn test_save_preserves_other_keys_and_overwrites_same_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));

        store.save_record("2026-10-16 08:00:00", record(70.0)).unwrap();
        store.save_record("2026-10-17 08:00:00", record(75.0)).unwrap();
        store.save_record("2026-10-17 08:00:00", record(90.0)).unwrap();

        let history = store.load().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history["2026-10-16 08:00:00"].score, 70.0);
        assert_eq!(history["2026-10-17 08:00:00"].score, 90.0);
    }

    #[test]
    fn test_reads_existing_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(
            &path,
            r#"{
    "2025-01-02 10:00:00": {
        "score": 0,
        "good_frame_ratio": 0,
        "knee_toe_issues": 0,
        "depth_issues": 0
    }
}"#,
        )
        .unwrap();

        let history = ProgressStore::new(&path).load().unwrap();
        assert_eq!(history["2025-01-02 10:00:00"].score, 0.0);
    }

    #[test]
    fn test_malformed_store_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, "[1, 2").unwrap();

        let store = ProgressStore::new(&path);
        let err = store.save_record("2026-10-17 08:00:00", record(75.0)).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedStore { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[1, 2");
    }

    #[test]
    fn test_keys_are_lexically_ordered() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        store.save_record("2026-10-17 08:00:00", record(3.0)).unwrap();
        store.save_record("2025-12-31 23:59:59", record(1.0)).unwrap();
        store.save_record("2026-01-01 00:00:00", record(2.0)).unwrap();

        let scores: Vec<f64> = store.load().unwrap().values().map(|r| r.score).collect();
        assert_eq!(scores, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_record_from_summary() {
        let summary = SessionSummary {
            mean_score: 72.5,
            good_frame_ratio: 50.0,
            knee_toe_issues: 4,
            depth_issues: 9,
            frame_count: 10,
            good_frames: 5,
            reps: 2,
        };
        let rec = ProgressRecord::from(&summary);
        assert_eq!(rec.score, 72.5);
        assert_eq!(rec.good_frame_ratio, 50.0);
        assert_eq!(rec.knee_toe_issues, 4);
        assert_eq!(rec.depth_issues, 9);
    }

    #[test]
    fn test_timestamp_key_format() {
        let now = Local.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(timestamp_key(now), "2026-03-04 05:06:07");
    }
}
