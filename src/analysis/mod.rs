//! Short-time DCT analysis and resynthesis (framing, windowing, overlap-add).

pub mod dct;
pub mod framing;
pub mod sdct;
pub mod window;

pub use dct::DctPlan;
pub use framing::{frame_count, frame_signal, overlap_add, overlap_add_len};
pub use sdct::{SdctError, isdct, sdct};
pub use window::{Window, hamming_window, hann_window};
