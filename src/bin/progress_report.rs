use anyhow::Result;

use squat_form_tracker::logging;
use squat_form_tracker::progress::{ProgressStore, PROGRESS_PATH};
use squat_form_tracker::render::ProgressChart;

const CHART_WIDTH: usize = 1000;
const CHART_HEIGHT: usize = 500;

fn main() -> Result<()> {
    logging::init();

    let store = ProgressStore::new(PROGRESS_PATH);
    if !store.path().exists() {
        println!("No progress data to plot.");
        return Ok(());
    }

    let history = store.load()?;
    let chart = ProgressChart::from_history(&history, CHART_WIDTH as i32, CHART_HEIGHT as i32);
    print!("{}", chart.to_table());

    show(&chart)
}

#[cfg(feature = "desktop")]
fn show(chart: &ProgressChart) -> Result<()> {
    use squat_form_tracker::render::MinifbRenderer;

    let mut window = MinifbRenderer::new("Squat Form Progress", CHART_WIDTH, CHART_HEIGHT)?;
    window.show_chart(chart)
}

#[cfg(not(feature = "desktop"))]
fn show(_chart: &ProgressChart) -> Result<()> {
    Ok(())
}
