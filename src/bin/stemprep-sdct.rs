//! Run a WAV file through the sliced DCT and back, reporting reconstruction error.

use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn};
use stemprep::analysis::{Window, hamming_window, hann_window, isdct, sdct};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

#[derive(Debug)]
struct Options {
    input: PathBuf,
    output: Option<PathBuf>,
    frame_length: usize,
    frame_step: usize,
    window: WindowKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowKind {
    Hamming,
    Hann,
    None,
}

impl WindowKind {
    fn parse(value: &str) -> Option<Self> {
        match value {
            "hamming" => Some(Self::Hamming),
            "hann" => Some(Self::Hann),
            "none" => Some(Self::None),
            _ => None,
        }
    }

    fn window(self) -> Window {
        match self {
            WindowKind::Hamming => Window::Generator(hamming_window),
            WindowKind::Hann => Window::Generator(hann_window),
            WindowKind::None => Window::Disabled,
        }
    }
}

fn run() -> Result<(), String> {
    let Some(options) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = stemprep::logging::init(env!("CARGO_BIN_NAME")) {
        eprintln!("Logging disabled: {err}");
    }

    let (samples, sample_rate) = read_mono(&options.input)?;
    tracing::info!(
        "Loaded {} samples at {} Hz from {}",
        samples.len(),
        sample_rate,
        options.input.display()
    );
    let window = options.window.window();
    let signal = ArrayD::from_shape_vec(IxDyn(&[samples.len()]), samples.clone())
        .map_err(|err| err.to_string())?;

    let coefficients = sdct(
        signal.view(),
        options.frame_length,
        options.frame_step,
        &window,
    )
    .map_err(|err| err.to_string())?;
    println!("Coefficients shape: {:?}", coefficients.shape());

    let restored = isdct(
        coefficients.view(),
        options.frame_step,
        Some(options.frame_length),
        &window,
    )
    .map_err(|err| err.to_string())?;
    let restored: Vec<f32> = restored.iter().copied().collect();

    let error = ReconstructionError::measure(&samples, &restored);
    println!(
        "Reconstructed {} of {} samples: rms error {:.3e}, max error {:.3e}",
        error.compared,
        samples.len(),
        error.rms,
        error.max
    );
    if error.skipped > 0 {
        println!(
            "Skipped {} samples where the window envelope is zero",
            error.skipped
        );
    }

    if let Some(path) = &options.output {
        write_float_wav(path, &restored, sample_rate)?;
        println!("Wrote reconstruction to {}", path.display());
    }
    Ok(())
}

#[derive(Debug, Default)]
struct ReconstructionError {
    compared: usize,
    skipped: usize,
    rms: f64,
    max: f64,
}

impl ReconstructionError {
    /// Compare the overlap-added region; non-finite reconstructed samples are skipped.
    fn measure(original: &[f32], restored: &[f32]) -> Self {
        let mut stats = Self::default();
        let mut sum_sq = 0.0f64;
        for (&expected, &actual) in original.iter().zip(restored) {
            if !actual.is_finite() {
                stats.skipped += 1;
                continue;
            }
            let diff = f64::from((expected - actual).abs());
            sum_sq += diff * diff;
            stats.max = stats.max.max(diff);
            stats.compared += 1;
        }
        if stats.compared > 0 {
            stats.rms = (sum_sq / stats.compared as f64).sqrt();
        }
        stats
    }
}

/// Decode a WAV file and average its channels into one signal in `[-1, 1]`.
fn read_mono(path: &Path) -> Result<(Vec<f32>, u32), String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|err| format!("Failed to open {}: {err}", path.display()))?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|err| format!("Failed to decode {}: {err}", path.display()))?,
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1u64 << (spec.bits_per_sample.saturating_sub(1))) as f32;
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()
                .map_err(|err| format!("Failed to decode {}: {err}", path.display()))?
        }
    };
    let channels = usize::from(spec.channels.max(1));
    let mono = interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect();
    Ok((mono, spec.sample_rate))
}

fn write_float_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<(), String> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };
    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|err| format!("Failed to create {}: {err}", path.display()))?;
    for &sample in samples {
        let value = if sample.is_finite() { sample } else { 0.0 };
        writer
            .write_sample(value)
            .map_err(|err| format!("Failed to write {}: {err}", path.display()))?;
    }
    writer
        .finalize()
        .map_err(|err| format!("Failed to finalize {}: {err}", path.display()))
}

fn parse_args(args: Vec<String>) -> Result<Option<Options>, String> {
    let mut input = None;
    let mut options = Options {
        input: PathBuf::new(),
        output: None,
        frame_length: 2048,
        frame_step: 1024,
        window: WindowKind::Hamming,
    };

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--input" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--input requires a value".to_string())?;
                input = Some(PathBuf::from(value));
            }
            "--output" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--output requires a value".to_string())?;
                options.output = Some(PathBuf::from(value));
            }
            "--frame-length" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--frame-length requires a value".to_string())?;
                options.frame_length = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --frame-length value: {value}"))?;
            }
            "--frame-step" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--frame-step requires a value".to_string())?;
                options.frame_step = value
                    .parse::<usize>()
                    .map_err(|_| format!("Invalid --frame-step value: {value}"))?;
            }
            "--window" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--window requires a value".to_string())?;
                options.window = WindowKind::parse(value).ok_or_else(|| {
                    format!("Invalid --window value: {value} (expected hamming, hann or none)")
                })?;
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    options.input = input.ok_or_else(|| format!("--input is required\n\n{}", help_text()))?;
    Ok(Some(options))
}

fn help_text() -> String {
    [
        "stemprep-sdct",
        "",
        "Computes the sliced DCT of a WAV file and reports how well it inverts.",
        "",
        "Usage:",
        "  stemprep-sdct --input <wav> [options]",
        "",
        "Options:",
        "  --input <wav>          Source audio; channels are averaged (required).",
        "  --frame-length <n>     Samples per frame (default: 2048).",
        "  --frame-step <n>       Hop between frames (default: 1024).",
        "  --window <kind>        hamming, hann or none (default: hamming).",
        "  --output <wav>         Write the reconstruction as 32-bit float WAV.",
        "  -h, --help             Show this help.",
    ]
    .join("\n")
}
