use anyhow::Result;

use super::keypoint::Pose;

/// 1フレーム分の入力
pub struct SourceFrame<I> {
    /// 表示用の画像
    pub image: I,
    pub width: u32,
    pub height: u32,
    /// 検出された姿勢。人物がいなければ None
    pub pose: Option<Pose>,
}

/// フレームごとにキーポイントを供給する
pub trait LandmarkSource {
    type Image;

    /// 次のフレーム。入力が尽きたら None
    fn next_frame(&mut self) -> Result<Option<SourceFrame<Self::Image>>>;
}

#[cfg(feature = "desktop")]
pub use desktop::CameraPoseSource;

#[cfg(feature = "desktop")]
mod desktop {
    use anyhow::Result;
    use opencv::core::Mat;
    use opencv::prelude::*;

    use super::{LandmarkSource, SourceFrame};
    use crate::camera::OpenCvCamera;
    use crate::pose::{preprocess_for_movenet, PoseDetector};

    /// カメラ/動画 + MoveNet
    pub struct CameraPoseSource {
        camera: OpenCvCamera,
        detector: PoseDetector,
    }

    impl CameraPoseSource {
        pub fn new(camera: OpenCvCamera, detector: PoseDetector) -> Self {
            Self { camera, detector }
        }
    }

    impl LandmarkSource for CameraPoseSource {
        type Image = Mat;

        fn next_frame(&mut self) -> Result<Option<SourceFrame<Mat>>> {
            let frame = match self.camera.read_frame()? {
                Some(f) => f,
                None => return Ok(None),
            };
            let width = frame.cols() as u32;
            let height = frame.rows() as u32;
            let input = preprocess_for_movenet(&frame)?;
            let pose = self.detector.detect(input)?;

            Ok(Some(SourceFrame {
                image: frame,
                width,
                height,
                pose,
            }))
        }
    }
}
