#[cfg(feature = "desktop")]
pub mod detector;
pub mod keypoint;
#[cfg(feature = "desktop")]
pub mod preprocess;
pub mod source;

#[cfg(feature = "desktop")]
pub use detector::{PoseDetector, MODEL_PATH};
pub use keypoint::{Keypoint, KeypointIndex, Pose};
#[cfg(feature = "desktop")]
pub use preprocess::preprocess_for_movenet;
#[cfg(feature = "desktop")]
pub use source::CameraPoseSource;
pub use source::{LandmarkSource, SourceFrame};
