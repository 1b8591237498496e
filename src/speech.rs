use anyhow::{bail, Context, Result};
use std::process::Command;
use tracing::info;

/// 音声出力先
///
/// `speak` は再生完了まで戻らない。
pub trait SpeechSink {
    fn speak(&mut self, text: &str) -> Result<()>;
}

/// OS の読み上げコマンドを同期実行する
pub struct CommandSpeaker {
    program: String,
    args: Vec<String>,
}

impl CommandSpeaker {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// macOS は `say`、それ以外は `espeak`
    pub fn platform_default() -> Self {
        if cfg!(target_os = "macos") {
            Self::new("say", &[])
        } else {
            Self::new("espeak", &[])
        }
    }
}

impl SpeechSink for CommandSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        let status = Command::new(&self.program)
            .args(&self.args)
            .arg(text)
            .status()
            .with_context(|| format!("Failed to run {}", self.program))?;

        if !status.success() {
            bail!("{} exited with {}", self.program, status);
        }
        Ok(())
    }
}

/// 発話せずログに残すだけ
#[derive(Default)]
pub struct LogSpeaker {
    spoken: Vec<String>,
}

impl LogSpeaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> &[String] {
        &self.spoken
    }
}

impl SpeechSink for LogSpeaker {
    fn speak(&mut self, text: &str) -> Result<()> {
        info!("Feedback: {}", text);
        self.spoken.push(text.to_string());
        Ok(())
    }
}
