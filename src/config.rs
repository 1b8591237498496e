use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// 既定の設定ファイルパス
pub const CONFIG_PATH: &str = "config.json";

/// スクワット判定の設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// 膝-足首距離の許容値（ピクセル）
    #[serde(default = "default_knee_toe_threshold")]
    pub knee_toe_threshold: f32,
    /// 許容値を1ピクセル超えるごとの減点
    #[serde(default = "default_penalty_factor")]
    pub penalty_factor: f32,
    /// 深さ不足の固定減点
    #[serde(default = "default_depth_penalty")]
    pub depth_penalty: f32,
    /// 音声フィードバックの最小間隔（フレーム）
    #[serde(default = "default_feedback_cooldown", deserialize_with = "frame_count")]
    pub feedback_cooldown: u64,
}

/// フレーム数。`120.0` のような小数表記も受け付けて四捨五入する
fn frame_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if !value.is_finite() || value < 0.0 {
        return Err(serde::de::Error::custom(format!(
            "feedback_cooldown must be a non-negative frame count, got {}",
            value
        )));
    }
    Ok(value.round() as u64)
}

fn default_knee_toe_threshold() -> f32 { 100.0 }
fn default_penalty_factor() -> f32 { 0.1 }
fn default_depth_penalty() -> f32 { 20.0 }
fn default_feedback_cooldown() -> u64 { 120 }

impl Default for Config {
    fn default() -> Self {
        Self {
            knee_toe_threshold: default_knee_toe_threshold(),
            penalty_factor: default_penalty_factor(),
            depth_penalty: default_depth_penalty(),
            feedback_cooldown: default_feedback_cooldown(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// 設定を読み込む。ファイルが無い・壊れている場合は既定値を書き出して返す
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::load(path) {
                Ok(config) => return config,
                Err(e) => warn!("Invalid {}, using default config: {}", path.display(), e),
            }
        } else {
            info!("{} not found, writing default config", path.display());
        }

        let config = Self::default();
        if let Err(e) = config.save(path) {
            warn!("Failed to write default config to {}: {}", path.display(), e);
        }
        config
    }
}
