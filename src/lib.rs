pub mod analysis;
pub mod app;
#[cfg(feature = "desktop")]
pub mod camera;
pub mod config;
pub mod error;
pub mod logging;
pub mod pose;
pub mod progress;
pub mod render;
pub mod speech;
