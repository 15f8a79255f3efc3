mod support;

use std::process::Command;

use ndarray::{ArrayD, IxDyn};
use stemprep::analysis::{DctPlan, Window, frame_signal, hann_window, isdct, overlap_add, sdct};
use stemprep::app_dirs::CONFIG_HOME_ENV;
use support::wav::{read_float_wav, write_pcm16_wav};
use tempfile::tempdir;

fn chirp(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let t = i as f32 / len as f32;
            (t * t * 200.0).sin() * 0.8
        })
        .collect()
}

#[test]
fn stereo_batch_round_trips_under_hann_with_quarter_hop() {
    let len = 1024;
    let frame_length = 128;
    let frame_step = 32;
    let mut samples = chirp(len);
    samples.extend(chirp(len).iter().map(|v| -v * 0.5));
    let signal = ArrayD::from_shape_vec(IxDyn(&[2, len]), samples.clone()).unwrap();
    let window = Window::Generator(hann_window);

    let coefficients = sdct(signal.view(), frame_length, frame_step, &window).unwrap();
    let n_frames = (len - frame_length) / frame_step + 1;
    assert_eq!(coefficients.shape(), &[2, frame_length, n_frames]);

    let restored = isdct(coefficients.view(), frame_step, None, &window).unwrap();
    assert_eq!(restored.shape(), &[2, len]);
    let restored: Vec<f32> = restored.iter().copied().collect();
    for channel in 0..2 {
        // first and last hop touch the zero end of the window
        for i in frame_step..len - frame_step {
            let idx = channel * len + i;
            assert!(
                (restored[idx] - samples[idx]).abs() < 1e-3,
                "channel {channel} sample {i}: {} vs {}",
                restored[idx],
                samples[idx]
            );
        }
    }
}

#[test]
fn framing_then_overlap_add_sums_overlaps() {
    let signal = ArrayD::from_shape_vec(IxDyn(&[8]), vec![1.0f32; 8]).unwrap();
    let framed = frame_signal(signal.view(), 4, 2).unwrap();
    assert_eq!(framed.shape(), &[3, 4]);
    // frame_signal yields [n_frames, frame_length]; overlap_add takes the transpose
    let summed = overlap_add(framed.view().reversed_axes(), 2, Some(4)).unwrap();
    let values: Vec<f32> = summed.iter().copied().collect();
    assert_eq!(values, vec![1.0, 1.0, 2.0, 2.0, 2.0, 2.0, 1.0, 1.0]);
}

#[test]
fn dct_plan_is_reusable_across_calls() {
    let mut plan = DctPlan::new(16).unwrap();
    let input: Vec<f32> = (0..16).map(|i| i as f32).collect();
    let mut first = vec![0.0; 16];
    let mut second = vec![0.0; 16];
    plan.forward(&input, &mut first);
    plan.forward(&input, &mut second);
    assert_eq!(first, second);
}

#[test]
fn cli_reports_shape_and_writes_reconstruction() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("mix.wav");
    let output = dir.path().join("restored.wav");
    let frames = 4096usize;
    let interleaved: Vec<i16> = chirp(frames)
        .iter()
        .flat_map(|&v| {
            let sample = (v * 16_000.0) as i16;
            [sample, sample]
        })
        .collect();
    write_pcm16_wav(&input, 2, 8_000, &interleaved);

    let result = Command::new(env!("CARGO_BIN_EXE_stemprep-sdct"))
        .env(CONFIG_HOME_ENV, dir.path().join("home"))
        .arg("--input")
        .arg(&input)
        .args(["--frame-length", "512", "--frame-step", "256"])
        .arg("--output")
        .arg(&output)
        .output()
        .unwrap();
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(
        result.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&result.stderr)
    );
    assert!(stdout.contains("Coefficients shape: [512, 15]"), "stdout: {stdout}");

    let restored = read_float_wav(&output);
    assert_eq!(restored.len(), frames);
    let expected = chirp(frames);
    for i in 0..frames {
        let original = f32::from((expected[i] * 16_000.0) as i16) / 32_768.0;
        assert!((restored[i] - original).abs() < 1e-3, "sample {i}");
    }
}
