//! Split a folder of class directories into seeded train/valid/test sets.

use std::path::PathBuf;

use stemprep::dataset::split::{
    SplitConfigToml, SplitOptions, SplitProgress, TransferMode, load_split_config,
    load_split_config_from_app_dir, prepare_dataset,
};

const DEFAULT_SEED: u64 = 1321;

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let Some(args) = parse_args(std::env::args().skip(1).collect())? else {
        return Ok(());
    };
    if let Err(err) = stemprep::logging::init(env!("CARGO_BIN_NAME")) {
        eprintln!("Logging disabled: {err}");
    }
    let config = match &args.config {
        Some(path) => Some(load_split_config(path).map_err(|err| err.to_string())?),
        None => load_split_config_from_app_dir().map_err(|err| err.to_string())?,
    };
    let options = args.into_options(config.unwrap_or_default());

    let mut on_progress = |update: SplitProgress<'_>| {
        println!(
            "[{}/{}] {} -> {}",
            update.processed,
            update.total,
            update.folder,
            update.split.as_str()
        );
    };
    let summary = prepare_dataset(&options, Some(&mut on_progress))
        .map_err(|err| err.to_string())?;

    println!(
        "{} {} class folders into {}",
        match options.mode {
            TransferMode::Copy => "Copied",
            TransferMode::Move => "Moved",
        },
        summary.total(),
        summary.output.display()
    );
    for (split, count) in summary.counts() {
        println!("  {}: {count}", split.as_str());
    }
    Ok(())
}

/// Flags as given on the command line; unset values fall back to the config file.
#[derive(Debug, Default)]
struct CliArgs {
    root: PathBuf,
    output: Option<PathBuf>,
    seed: Option<u64>,
    ratio: Option<Vec<f64>>,
    move_folders: bool,
    config: Option<PathBuf>,
}

impl CliArgs {
    fn into_options(self, config: SplitConfigToml) -> SplitOptions {
        let defaults = SplitOptions::default();
        let move_folders = self.move_folders || config.move_folders.unwrap_or(false);
        SplitOptions {
            input: self.root,
            output: self.output.or(config.output).unwrap_or(defaults.output),
            seed: self.seed.or(config.seed).unwrap_or(DEFAULT_SEED),
            ratio: self.ratio.or(config.ratio).unwrap_or(defaults.ratio),
            mode: if move_folders {
                TransferMode::Move
            } else {
                TransferMode::Copy
            },
        }
    }
}

fn parse_args(args: Vec<String>) -> Result<Option<CliArgs>, String> {
    let mut parsed = CliArgs::default();
    let mut root = None;

    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "-h" | "--help" => {
                println!("{}", help_text());
                return Ok(None);
            }
            "--root" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--root requires a value".to_string())?;
                root = Some(PathBuf::from(value));
            }
            "--output" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--output requires a value".to_string())?;
                parsed.output = Some(PathBuf::from(value));
            }
            "--seed" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--seed requires a value".to_string())?;
                parsed.seed = Some(
                    value
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid --seed value: {value}"))?,
                );
            }
            "--ratio" => {
                let mut values = Vec::new();
                while let Some(value) = args
                    .get(idx + 1)
                    .filter(|next| !next.starts_with("--"))
                {
                    values.push(
                        value
                            .parse::<f64>()
                            .map_err(|_| format!("Invalid --ratio value: {value}"))?,
                    );
                    idx += 1;
                }
                if values.is_empty() {
                    return Err("--ratio requires at least one value".to_string());
                }
                parsed.ratio = Some(values);
            }
            "--move" => parsed.move_folders = true,
            "--config" => {
                idx += 1;
                let value = args
                    .get(idx)
                    .ok_or_else(|| "--config requires a value".to_string())?;
                parsed.config = Some(PathBuf::from(value));
            }
            unknown => {
                return Err(format!("Unknown argument: {unknown}\n\n{}", help_text()));
            }
        }
        idx += 1;
    }

    parsed.root = root.ok_or_else(|| format!("--root is required\n\n{}", help_text()))?;
    Ok(Some(parsed))
}

fn help_text() -> String {
    [
        "stemprep-split",
        "",
        "Splits class folders into train/valid(/test) sets with a seeded shuffle.",
        "",
        "Usage:",
        "  stemprep-split --root <dir> [options]",
        "",
        "Options:",
        "  --root <dir>         Folder holding one subdirectory per class (required).",
        "  --output <dir>       Output root (default: output).",
        "  --seed <n>           Shuffle seed (default: 1321).",
        "  --ratio <f>...       Train/valid(/test) fractions summing to 1 (default: 0.8 0.1 0.1).",
        "  --move               Move class folders instead of copying them.",
        "  --config <path>      TOML file with defaults (default: <app dir>/split.toml).",
        "  -h, --help           Show this help.",
    ]
    .join("\n")
}
