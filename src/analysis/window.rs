use std::borrow::Cow;
use std::f64::consts::PI;

use super::sdct::SdctError;

/// Window applied to each frame before the forward DCT and used for the
/// envelope correction of the inverse.
#[derive(Clone, Debug)]
pub enum Window {
    /// Precomputed coefficients, one per frame sample.
    Fixed(Vec<f32>),
    /// Constructor called with the frame length.
    Generator(fn(usize) -> Vec<f32>),
    /// Frames are transformed as-is and the inverse skips envelope correction.
    Disabled,
}

impl Default for Window {
    fn default() -> Self {
        Window::Generator(hamming_window)
    }
}

impl Window {
    /// Resolve the window coefficients for `frame_length`.
    ///
    /// Returns `None` for [`Window::Disabled`].
    pub fn resolve(&self, frame_length: usize) -> Result<Option<Cow<'_, [f32]>>, SdctError> {
        let coefficients = match self {
            Window::Fixed(values) => Cow::Borrowed(values.as_slice()),
            Window::Generator(build) => Cow::Owned(build(frame_length)),
            Window::Disabled => return Ok(None),
        };
        if coefficients.len() != frame_length {
            return Err(SdctError::WindowLength {
                expected: frame_length,
                actual: coefficients.len(),
            });
        }
        Ok(Some(coefficients))
    }
}

/// Periodic Hamming window: `0.54 - 0.46 * cos(2*pi*n / length)`.
pub fn hamming_window(length: usize) -> Vec<f32> {
    cosine_window(length, 0.54, 0.46)
}

/// Periodic Hann window: `0.5 - 0.5 * cos(2*pi*n / length)`.
pub fn hann_window(length: usize) -> Vec<f32> {
    cosine_window(length, 0.5, 0.5)
}

fn cosine_window(length: usize, alpha: f64, beta: f64) -> Vec<f32> {
    if length == 1 {
        return vec![1.0];
    }
    let denom = length as f64;
    (0..length)
        .map(|n| (alpha - beta * (2.0 * PI * n as f64 / denom).cos()) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hamming_is_periodic() {
        let w = hamming_window(8);
        assert_eq!(w.len(), 8);
        assert!((w[0] - 0.08).abs() < 1e-6);
        assert!((w[4] - 1.0).abs() < 1e-6);
        // periodic: w[n] == w[len - n]
        for n in 1..8 {
            assert!((w[n] - w[8 - n]).abs() < 1e-6);
        }
    }

    #[test]
    fn hann_starts_at_zero() {
        let w = hann_window(4);
        assert_eq!(w.len(), 4);
        assert!(w[0].abs() < 1e-7);
        assert!((w[2] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_lengths() {
        assert_eq!(hamming_window(1), vec![1.0]);
        assert!(hann_window(0).is_empty());
    }

    #[test]
    fn fixed_window_length_is_checked() {
        let window = Window::Fixed(vec![1.0; 3]);
        let err = window.resolve(4).unwrap_err();
        assert!(matches!(
            err,
            SdctError::WindowLength {
                expected: 4,
                actual: 3
            }
        ));
        assert_eq!(window.resolve(3).unwrap().unwrap().len(), 3);
    }

    #[test]
    fn disabled_window_resolves_to_none() {
        assert!(Window::Disabled.resolve(16).unwrap().is_none());
    }

    #[test]
    fn default_window_is_hamming() {
        let window = Window::default();
        let resolved = window.resolve(16).unwrap().unwrap();
        assert_eq!(resolved.as_ref(), hamming_window(16).as_slice());
    }
}
