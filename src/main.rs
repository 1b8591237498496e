use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use squat_form_tracker::config::{Config, CONFIG_PATH};
use squat_form_tracker::logging;

/// 入力ソース
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum InputMode {
    /// 動画ファイル
    Video,
    /// 既定のカメラ (index 0)
    Webcam,
}

#[derive(Parser, Debug)]
#[command(name = "squat-form-tracker")]
#[command(about = "Squat form analysis from a webcam or video file")]
#[command(version = env!("GIT_VERSION"))]
struct Args {
    /// Input source: 'video' for a file or 'webcam' for a live feed
    #[arg(long, value_enum, default_value = "webcam")]
    input: InputMode,

    /// Path to the video file when using video input
    #[arg(long = "video_path", alias = "video-path", default_value = "squats_video2.mp4")]
    video_path: PathBuf,
}

fn main() -> Result<()> {
    logging::init();
    let args = Args::parse();
    let config = Config::load_or_default(CONFIG_PATH);

    println!("Squat Form Tracker {}", env!("GIT_VERSION"));
    println!("Input: {:?}", args.input);
    println!(
        "Knee-toe threshold: {}px, penalty factor: {}, depth penalty: {}, feedback cooldown: {} frames",
        config.knee_toe_threshold, config.penalty_factor, config.depth_penalty, config.feedback_cooldown
    );
    println!("操作: [Q]/[Esc] 終了");
    println!();

    run(&args, &config)
}

#[cfg(feature = "desktop")]
fn run(args: &Args, config: &Config) -> Result<()> {
    use squat_form_tracker::analysis::SquatAnalyzer;
    use squat_form_tracker::app;
    use squat_form_tracker::camera::OpenCvCamera;
    use squat_form_tracker::pose::{CameraPoseSource, PoseDetector, MODEL_PATH};
    use squat_form_tracker::progress::{ProgressStore, PROGRESS_PATH};
    use squat_form_tracker::render::MinifbRenderer;
    use squat_form_tracker::speech::CommandSpeaker;

    const CHART_WIDTH: usize = 1000;
    const CHART_HEIGHT: usize = 500;

    let camera = match args.input {
        InputMode::Video => OpenCvCamera::open_file(&args.video_path)?,
        InputMode::Webcam => OpenCvCamera::open(0)?,
    };
    let (width, height) = camera.resolution();

    let detector = PoseDetector::new(MODEL_PATH)?;
    println!("Model loaded");

    let mut source = CameraPoseSource::new(camera, detector);
    let mut renderer = MinifbRenderer::new("Squat Form Analysis", width as usize, height as usize)?;
    let mut speech = CommandSpeaker::platform_default();
    let analyzer = SquatAnalyzer::from_config(config);
    let store = ProgressStore::new(PROGRESS_PATH);

    let (report, result) = app::run(&analyzer, &mut source, &mut renderer, &mut speech, &store);
    drop(renderer);

    println!();
    println!("{}", report);
    if !report.saved {
        println!("Warning: progress was not saved to {}", store.path().display());
    }

    // ループが失敗していても集計とグラフは出してからエラーを返す
    let shown = show_progress_chart(&store, CHART_WIDTH, CHART_HEIGHT);
    println!("Shutting down...");
    result?;
    shown
}

#[cfg(feature = "desktop")]
fn show_progress_chart(
    store: &squat_form_tracker::progress::ProgressStore,
    width: usize,
    height: usize,
) -> Result<()> {
    use squat_form_tracker::render::{MinifbRenderer, ProgressChart};

    let history = store.load()?;
    let chart = ProgressChart::from_history(&history, width as i32, height as i32);
    let mut chart_window = MinifbRenderer::new("Squat Form Progress", width, height)?;
    chart_window.show_chart(&chart)
}

#[cfg(not(feature = "desktop"))]
fn run(args: &Args, _config: &Config) -> Result<()> {
    match args.input {
        InputMode::Video => anyhow::bail!(
            "Cannot open {}: video input requires `--features desktop`",
            args.video_path.display()
        ),
        InputMode::Webcam => anyhow::bail!("Webcam input requires `--features desktop`"),
    }
}
