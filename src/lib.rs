//! Library exports for the dataset splitter, the sliced DCT and their binaries.
/// Sliced DCT transform, framing and analysis windows.
pub mod analysis;
/// Application directory resolution.
pub mod app_dirs;
/// Dataset preparation for source separation training.
pub mod dataset;
/// Logging setup shared by the binaries.
pub mod logging;
