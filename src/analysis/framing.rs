//! Frame extraction (unfold) and overlap-add (fold) over the trailing axes of
//! an `ndarray` tensor. Leading axes are treated as independent batch entries.

use ndarray::{ArrayD, ArrayViewD, IxDyn};

use super::sdct::SdctError;

/// Number of full frames that fit in `n_samples`; trailing samples that do not
/// form a full frame are dropped.
pub fn frame_count(n_samples: usize, frame_length: usize, frame_step: usize) -> Option<usize> {
    if frame_length == 0 || frame_step == 0 || n_samples < frame_length {
        return None;
    }
    Some((n_samples - frame_length) / frame_step + 1)
}

/// Length of the signal rebuilt from `n_frames` frames placed `frame_step` apart.
pub fn overlap_add_len(n_frames: usize, frame_length: usize, frame_step: usize) -> usize {
    n_frames.saturating_sub(1) * frame_step + frame_length
}

/// Slide a `frame_length` window with stride `frame_step` over the last axis.
///
/// `[..., n_samples]` becomes `[..., n_frames, frame_length]`. No padding is applied.
/// The frame axes come out in the opposite order from what [`overlap_add`] and
/// [`isdct`](super::isdct) take; swap the last two axes before passing frames on.
pub fn frame_signal(
    signals: ArrayViewD<'_, f32>,
    frame_length: usize,
    frame_step: usize,
) -> Result<ArrayD<f32>, SdctError> {
    let (lead, n_samples) = split_sample_axis(signals.shape())?;
    let n_frames = checked_frame_count(n_samples, frame_length, frame_step)?;
    let samples: Vec<f32> = signals.iter().copied().collect();
    let framed = unfold_rows(&samples, n_samples, frame_length, frame_step, n_frames);

    let mut shape = lead.to_vec();
    shape.extend([n_frames, frame_length]);
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), framed)?)
}

/// Overlap-add ("deframe") a `[..., frame_length, n_frames]` tensor.
///
/// This is the coefficient layout of [`sdct`](super::sdct), the transpose of
/// what [`frame_signal`] returns.
///
/// Each frame is placed at `frame_index * frame_step` and overlapping samples are
/// summed, not averaged. The result has shape
/// `[..., (n_frames - 1) * frame_step + frame_length]`.
///
/// # Panics
/// When `frame_length` is given and differs from the tensor's frame axis.
pub fn overlap_add(
    framed: ArrayViewD<'_, f32>,
    frame_step: usize,
    frame_length: Option<usize>,
) -> Result<ArrayD<f32>, SdctError> {
    let (lead, frame_len, n_frames) = split_frame_axes(framed.shape())?;
    if let Some(expected) = frame_length {
        assert_eq!(
            expected, frame_len,
            "frame_length does not match the framed tensor"
        );
    }
    check_frame_params(frame_len, frame_step, n_frames)?;

    let frames: Vec<f32> = framed.iter().copied().collect();
    let out_len = overlap_add_len(n_frames, frame_len, frame_step);
    let batch: usize = lead.iter().product();
    let mut signals = vec![0.0_f32; batch * out_len];
    for (block, signal) in frames
        .chunks_exact(frame_len * n_frames)
        .zip(signals.chunks_exact_mut(out_len))
    {
        overlap_add_into(block, frame_len, n_frames, frame_step, signal);
    }

    let mut shape = lead.to_vec();
    shape.push(out_len);
    Ok(ArrayD::from_shape_vec(IxDyn(&shape), signals)?)
}

/// Split `[..., n_samples]` into the batch axes and the sample count.
pub(crate) fn split_sample_axis(shape: &[usize]) -> Result<(&[usize], usize), SdctError> {
    match shape.split_last() {
        Some((&n_samples, lead)) => Ok((lead, n_samples)),
        None => Err(SdctError::MissingSampleAxis),
    }
}

/// Split `[..., frame_length, n_frames]` into the batch axes and the two frame axes.
pub(crate) fn split_frame_axes(shape: &[usize]) -> Result<(&[usize], usize, usize), SdctError> {
    if shape.len() < 2 {
        return Err(SdctError::MissingFrameAxes { ndim: shape.len() });
    }
    let (lead, tail) = shape.split_at(shape.len() - 2);
    Ok((lead, tail[0], tail[1]))
}

pub(crate) fn checked_frame_count(
    n_samples: usize,
    frame_length: usize,
    frame_step: usize,
) -> Result<usize, SdctError> {
    if frame_length == 0 {
        return Err(SdctError::ZeroFrameLength);
    }
    if frame_step == 0 {
        return Err(SdctError::ZeroFrameStep);
    }
    frame_count(n_samples, frame_length, frame_step).ok_or(SdctError::SignalTooShort {
        n_samples,
        frame_length,
    })
}

pub(crate) fn check_frame_params(
    frame_length: usize,
    frame_step: usize,
    n_frames: usize,
) -> Result<(), SdctError> {
    if frame_length == 0 {
        return Err(SdctError::ZeroFrameLength);
    }
    if frame_step == 0 {
        return Err(SdctError::ZeroFrameStep);
    }
    if n_frames == 0 {
        return Err(SdctError::NoFrames);
    }
    Ok(())
}

/// Unfold every `n_samples`-long row into `n_frames` consecutive frames,
/// laid out `[row][frame][sample]`.
pub(crate) fn unfold_rows(
    samples: &[f32],
    n_samples: usize,
    frame_length: usize,
    frame_step: usize,
    n_frames: usize,
) -> Vec<f32> {
    let rows = samples.len() / n_samples.max(1);
    let mut framed = Vec::with_capacity(rows * n_frames * frame_length);
    for row in samples.chunks_exact(n_samples) {
        for frame in 0..n_frames {
            let start = frame * frame_step;
            framed.extend_from_slice(&row[start..start + frame_length]);
        }
    }
    framed
}

/// Sum a `[frame_length][n_frames]` block into `out` at hop spacing.
pub(crate) fn overlap_add_into(
    frames: &[f32],
    frame_length: usize,
    n_frames: usize,
    frame_step: usize,
    out: &mut [f32],
) {
    debug_assert_eq!(frames.len(), frame_length * n_frames);
    debug_assert_eq!(out.len(), overlap_add_len(n_frames, frame_length, frame_step));
    for (offset, row) in frames.chunks_exact(n_frames).enumerate() {
        for (frame, &value) in row.iter().enumerate() {
            out[frame * frame_step + offset] += value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, Array3, array};

    #[test]
    fn frame_count_drops_partial_tail() {
        assert_eq!(frame_count(10, 4, 2), Some(4));
        assert_eq!(frame_count(11, 4, 2), Some(4));
        assert_eq!(frame_count(4, 4, 3), Some(1));
        assert_eq!(frame_count(3, 4, 1), None);
        assert_eq!(frame_count(10, 0, 1), None);
        assert_eq!(frame_count(10, 4, 0), None);
    }

    #[test]
    fn frame_signal_extracts_strided_windows() {
        let signal = Array1::from_iter((0..7).map(|v| v as f32)).into_dyn();
        let framed = frame_signal(signal.view(), 3, 2).unwrap();
        assert_eq!(framed.shape(), &[3, 3]);
        let expected = array![[0.0, 1.0, 2.0], [2.0, 3.0, 4.0], [4.0, 5.0, 6.0]];
        let expected = expected.into_dyn();
        assert_eq!(framed, expected);
    }

    #[test]
    fn frame_signal_keeps_batch_axes() {
        let signals =
            Array3::from_shape_fn((2, 3, 8), |(a, b, c)| (a * 100 + b * 10 + c) as f32);
        let framed = frame_signal(signals.view().into_dyn(), 4, 4).unwrap();
        assert_eq!(framed.shape(), &[2, 3, 2, 4]);
        assert_eq!(framed[IxDyn(&[1, 2, 1, 0])], 124.0);
    }

    #[test]
    fn frame_signal_rejects_short_signal() {
        let signal = Array1::<f32>::zeros(3).into_dyn();
        let err = frame_signal(signal.view(), 4, 1).unwrap_err();
        assert!(matches!(
            err,
            SdctError::SignalTooShort {
                n_samples: 3,
                frame_length: 4
            }
        ));
    }

    #[test]
    fn overlap_add_sums_overlaps() {
        // two frames of length 4 with hop 2: [L=4, F=2]
        let framed = Array2::<f32>::ones((4, 2)).into_dyn();
        let out = overlap_add(framed.view(), 2, None).unwrap();
        assert_eq!(out.shape(), &[6]);
        assert_eq!(out.as_slice().unwrap(), &[1.0_f32, 1.0, 2.0, 2.0, 1.0, 1.0]);
    }

    #[test]
    fn overlap_add_leaves_gaps_when_step_exceeds_length() {
        let framed = Array2::<f32>::ones((2, 2)).into_dyn();
        let out = overlap_add(framed.view(), 3, Some(2)).unwrap();
        assert_eq!(out.as_slice().unwrap(), &[1.0_f32, 1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn overlap_add_places_frames_in_order() {
        // [L=2, F=3]: column f holds frame f
        let framed = array![[1.0_f32, 3.0, 5.0], [2.0, 4.0, 6.0]].into_dyn();
        let out = overlap_add(framed.view(), 2, None).unwrap();
        assert_eq!(out.as_slice().unwrap(), &[1.0_f32, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn overlap_add_handles_batches() {
        let framed = Array3::<f32>::from_elem((3, 4, 2), 0.5).into_dyn();
        let out = overlap_add(framed.view(), 4, None).unwrap();
        assert_eq!(out.shape(), &[3, 8]);
        assert!(out.iter().all(|&v| v == 0.5));
    }

    #[test]
    fn frames_need_transposing_before_overlap_add() {
        let signal = Array1::from_iter((0..8).map(|v| v as f32)).into_dyn();
        let framed = frame_signal(signal.view(), 4, 4).unwrap();
        assert_eq!(framed.shape(), &[2, 4]);
        let rebuilt = overlap_add(framed.view().reversed_axes(), 4, Some(4)).unwrap();
        assert_eq!(rebuilt, signal);
    }

    #[test]
    #[should_panic(expected = "frame_length does not match")]
    fn overlap_add_asserts_frame_length() {
        let framed = Array2::<f32>::ones((4, 2)).into_dyn();
        let _ = overlap_add(framed.view(), 2, Some(5));
    }

    #[test]
    fn overlap_add_requires_two_axes() {
        let framed = Array1::<f32>::ones(4).into_dyn();
        assert!(matches!(
            overlap_add(framed.view(), 2, None),
            Err(SdctError::MissingFrameAxes { ndim: 1 })
        ));
    }
}
