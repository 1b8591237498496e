pub mod chart;
pub mod overlay;
pub mod skeleton;
#[cfg(feature = "desktop")]
pub mod window;

use anyhow::Result;

use crate::pose::Pose;

pub use chart::ProgressChart;
pub use overlay::{KneeMarker, Overlay, OverlayLine};
pub use skeleton::SKELETON_CONNECTIONS;
#[cfg(feature = "desktop")]
pub use window::MinifbRenderer;

/// フレームとオーバーレイの表示先
pub trait FrameDisplay<I> {
    fn present(&mut self, image: &I, pose: Option<&Pose>, overlay: &Overlay) -> Result<()>;

    /// 利用者が終了を要求したか
    fn quit_requested(&self) -> bool;
}
