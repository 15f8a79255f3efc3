//! Short-time discrete cosine transform (SDCT) and its inverse.

use ndarray::{ArrayD, ArrayViewD, IxDyn};
use thiserror::Error;

use super::dct::DctPlan;
use super::framing::{
    check_frame_params, checked_frame_count, overlap_add_into, overlap_add_len,
    split_frame_axes, split_sample_axis, unfold_rows,
};
use super::window::Window;

/// Errors returned by the framing transforms.
#[derive(Debug, Error)]
pub enum SdctError {
    /// Frame length must be at least one sample.
    #[error("frame_length must be greater than zero")]
    ZeroFrameLength,
    /// Frame step must be at least one sample.
    #[error("frame_step must be greater than zero")]
    ZeroFrameStep,
    /// Signals need a trailing sample axis.
    #[error("signal tensor has no sample axis")]
    MissingSampleAxis,
    /// Coefficient tensors need `[..., frame_length, n_frames]` axes.
    #[error("expected at least 2 axes (frame_length, n_frames), got {ndim}")]
    MissingFrameAxes { ndim: usize },
    /// The signal is shorter than a single frame.
    #[error("signal has {n_samples} samples, fewer than one frame of {frame_length}")]
    SignalTooShort {
        n_samples: usize,
        frame_length: usize,
    },
    /// Coefficient tensor has an empty frame axis.
    #[error("coefficient tensor contains no frames")]
    NoFrames,
    /// Window coefficients do not cover exactly one frame.
    #[error("window has {actual} coefficients, expected {expected}")]
    WindowLength { expected: usize, actual: usize },
    /// Output tensor could not be assembled.
    #[error("shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Compute the SDCT of `signals`.
///
/// `signals` is a `[..., n_samples]` tensor. Each signal is cut into frames of
/// `frame_length` samples spaced `frame_step` apart (no padding, an incomplete
/// tail is dropped), multiplied by `window` and passed through an orthonormal
/// DCT-II. The result is a `[..., frame_length, n_frames]` tensor with
/// `n_frames = (n_samples - frame_length) / frame_step + 1`.
pub fn sdct(
    signals: ArrayViewD<'_, f32>,
    frame_length: usize,
    frame_step: usize,
    window: &Window,
) -> Result<ArrayD<f32>, SdctError> {
    let (lead, n_samples) = split_sample_axis(signals.shape())?;
    let n_frames = checked_frame_count(n_samples, frame_length, frame_step)?;
    let window = window.resolve(frame_length)?;
    let mut plan = DctPlan::new(frame_length)?;

    let samples: Vec<f32> = signals.iter().copied().collect();
    let framed = unfold_rows(&samples, n_samples, frame_length, frame_step, n_frames);

    let block_len = frame_length * n_frames;
    let mut dcts = vec![0.0_f32; framed.len()];
    let mut windowed = vec![0.0_f32; frame_length];
    let mut coeffs = vec![0.0_f32; frame_length];
    for (frames, block) in framed
        .chunks_exact(block_len)
        .zip(dcts.chunks_exact_mut(block_len))
    {
        for (frame_idx, frame) in frames.chunks_exact(frame_length).enumerate() {
            match window.as_deref() {
                Some(w) => {
                    for ((dst, &x), &wv) in windowed.iter_mut().zip(frame).zip(w) {
                        *dst = x * wv;
                    }
                }
                None => windowed.copy_from_slice(frame),
            }
            plan.forward(&windowed, &mut coeffs);
            // coefficient axis before frame axis
            for (k, &c) in coeffs.iter().enumerate() {
                block[k * n_frames + frame_idx] = c;
            }
        }
    }

    let mut shape = lead.to_vec();
    shape.extend([frame_length, n_frames]);
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), dcts)?)
}

/// Invert [`sdct`].
///
/// `dcts` is a `[..., frame_length, n_frames]` tensor. `frame_step` must be the
/// value used for the forward transform; `frame_length` may be omitted. Each
/// column is passed through the orthonormal inverse DCT, the frames are
/// overlap-added and, unless the window is [`Window::Disabled`], divided by the
/// overlap-added window envelope. The result has
/// `(n_frames - 1) * frame_step + frame_length` samples, which can be shorter
/// than the forward input because no padding is applied.
///
/// Samples that no window covers (`frame_step > frame_length`, or a window with
/// zeros at its edges) divide by zero and come out non-finite.
///
/// # Panics
/// When `frame_length` is given and differs from the tensor's frame axis.
pub fn isdct(
    dcts: ArrayViewD<'_, f32>,
    frame_step: usize,
    frame_length: Option<usize>,
    window: &Window,
) -> Result<ArrayD<f32>, SdctError> {
    let (lead, frame_len, n_frames) = split_frame_axes(dcts.shape())?;
    if let Some(expected) = frame_length {
        assert_eq!(
            expected, frame_len,
            "frame_length does not match the coefficient tensor"
        );
    }
    check_frame_params(frame_len, frame_step, n_frames)?;
    let window = window.resolve(frame_len)?;
    let mut plan = DctPlan::new(frame_len)?;

    let coeffs: Vec<f32> = dcts.iter().copied().collect();
    let block_len = frame_len * n_frames;
    let mut frames = vec![0.0_f32; coeffs.len()];
    let mut column = vec![0.0_f32; frame_len];
    let mut restored = vec![0.0_f32; frame_len];
    for (src, dst) in coeffs
        .chunks_exact(block_len)
        .zip(frames.chunks_exact_mut(block_len))
    {
        for frame_idx in 0..n_frames {
            for (k, value) in column.iter_mut().enumerate() {
                *value = src[k * n_frames + frame_idx];
            }
            plan.inverse(&column, &mut restored);
            for (k, &value) in restored.iter().enumerate() {
                dst[k * n_frames + frame_idx] = value;
            }
        }
    }

    let out_len = overlap_add_len(n_frames, frame_len, frame_step);
    let batch: usize = lead.iter().product();
    let mut signals = vec![0.0_f32; batch * out_len];
    for (block, signal) in frames
        .chunks_exact(block_len)
        .zip(signals.chunks_exact_mut(out_len))
    {
        overlap_add_into(block, frame_len, n_frames, frame_step, signal);
    }

    if let Some(w) = window.as_deref() {
        let envelope = window_envelope(w, n_frames, frame_step);
        for signal in signals.chunks_exact_mut(out_len) {
            for (sample, &norm) in signal.iter_mut().zip(&envelope) {
                *sample /= norm;
            }
        }
    }

    let mut shape = lead.to_vec();
    shape.push(out_len);
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), signals)?)
}

/// Overlap-added copies of `window`, one per frame.
fn window_envelope(window: &[f32], n_frames: usize, frame_step: usize) -> Vec<f32> {
    let tiled: Vec<f32> = window
        .iter()
        .flat_map(|&w| std::iter::repeat_n(w, n_frames))
        .collect();
    let mut envelope = vec![0.0_f32; overlap_add_len(n_frames, window.len(), frame_step)];
    overlap_add_into(&tiled, window.len(), n_frames, frame_step, &mut envelope);
    envelope
}
