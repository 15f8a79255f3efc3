//! Orthonormal DCT-II / DCT-III on top of a same-length complex FFT.
//!
//! The input is reordered as `[x0, x2, x4, ..., x5, x3, x1]`, transformed with
//! one N-point FFT and rotated by `exp(-i*pi*k / 2N)`. The inverse runs the same
//! steps backwards.

use std::f64::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex32;
use rustfft::{Fft, FftPlanner};

use super::sdct::SdctError;

/// Reusable orthonormal DCT plan for one transform length.
pub struct DctPlan {
    len: usize,
    forward: Arc<dyn Fft<f32>>,
    inverse: Arc<dyn Fft<f32>>,
    /// `exp(-i*pi*k / 2N)` for `k in 0..N`.
    twiddles: Vec<Complex32>,
    /// Orthonormal scale per coefficient.
    scale: Vec<f32>,
    buffer: Vec<Complex32>,
    scratch: Vec<Complex32>,
}

impl DctPlan {
    pub fn new(len: usize) -> Result<Self, SdctError> {
        if len == 0 {
            return Err(SdctError::ZeroFrameLength);
        }
        let mut planner = FftPlanner::<f32>::new();
        let forward = planner.plan_fft_forward(len);
        let inverse = planner.plan_fft_inverse(len);
        let scratch_len = forward
            .get_inplace_scratch_len()
            .max(inverse.get_inplace_scratch_len());
        let n = len as f64;
        let twiddles = (0..len)
            .map(|k| {
                let theta = -PI * k as f64 / (2.0 * n);
                Complex32::new(theta.cos() as f32, theta.sin() as f32)
            })
            .collect();
        let scale = (0..len)
            .map(|k| {
                if k == 0 {
                    (1.0 / n).sqrt() as f32
                } else {
                    (2.0 / n).sqrt() as f32
                }
            })
            .collect();
        Ok(Self {
            len,
            forward,
            inverse,
            twiddles,
            scale,
            buffer: vec![Complex32::default(); len],
            scratch: vec![Complex32::default(); scratch_len],
        })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`; plans reject zero-length transforms.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Orthonormal DCT-II of `input` into `output`.
    ///
    /// # Panics
    /// When either slice length differs from the plan length.
    pub fn forward(&mut self, input: &[f32], output: &mut [f32]) {
        assert_eq!(input.len(), self.len, "DCT input length mismatch");
        assert_eq!(output.len(), self.len, "DCT output length mismatch");
        let n = self.len;
        for (idx, &sample) in input.iter().enumerate() {
            self.buffer[reordered_index(idx, n)] = Complex32::new(sample, 0.0);
        }
        self.forward
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        for k in 0..n {
            let rotated = self.buffer[k] * self.twiddles[k];
            output[k] = rotated.re * self.scale[k];
        }
    }

    /// Orthonormal DCT-III (the inverse of [`DctPlan::forward`]).
    ///
    /// # Panics
    /// When either slice length differs from the plan length.
    pub fn inverse(&mut self, input: &[f32], output: &mut [f32]) {
        assert_eq!(input.len(), self.len, "IDCT input length mismatch");
        assert_eq!(output.len(), self.len, "IDCT output length mismatch");
        let n = self.len;
        for k in 0..n {
            let re = input[k] / self.scale[k];
            let im = if k == 0 {
                0.0
            } else {
                -input[n - k] / self.scale[n - k]
            };
            self.buffer[k] = Complex32::new(re, im) * self.twiddles[k].conj();
        }
        self.inverse
            .process_with_scratch(&mut self.buffer, &mut self.scratch);
        let norm = 1.0 / n as f32;
        for (idx, sample) in output.iter_mut().enumerate() {
            *sample = self.buffer[reordered_index(idx, n)].re * norm;
        }
    }
}

/// Position of sample `idx` in the even-ascending / odd-descending layout.
fn reordered_index(idx: usize, len: usize) -> usize {
    if idx % 2 == 0 {
        idx / 2
    } else {
        len - 1 - idx / 2
    }
}
