//! Split a folder of class directories into `train/`, `valid/` and `test/`.
//!
//! Class folders are sorted, shuffled with a seeded generator and partitioned
//! by ratio, so the same seed and folder set always produce the same split.

mod assign;
mod config;
mod progress;
mod ratio;
mod transfer;

use std::path::{Path, PathBuf};

use thiserror::Error;

pub use assign::{
    SplitGroup, SplitPlan, check_input, list_class_folders, partition, plan_split,
    shuffle_folders,
};
pub use config::{
    SPLIT_CONFIG_FILE_NAME, SplitConfigError, SplitConfigToml, load_split_config,
    load_split_config_from_app_dir, split_config_path,
};
pub use progress::SplitProgress;
pub use ratio::SplitRatio;
pub use transfer::{TransferMode, transfer_folder};

/// Errors returned while splitting a dataset.
#[derive(Debug, Error)]
pub enum SplitError {
    /// The input path is missing, not a directory, or has no class folders.
    #[error("{0}")]
    InvalidInput(String),
    /// The ratio has the wrong arity or does not sum to one.
    #[error("invalid ratio: {0}")]
    InvalidRatio(String),
    /// Listing a directory failed.
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Copying or moving a class folder failed.
    #[error("Failed to {mode} {from} to {to}: {source}")]
    Transfer {
        mode: TransferMode,
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
}

/// Output split a class folder is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetSplit {
    Train,
    Valid,
    Test,
}

impl DatasetSplit {
    /// Name of the split directory inside the output root.
    pub fn as_str(self) -> &'static str {
        match self {
            DatasetSplit::Train => "train",
            DatasetSplit::Valid => "valid",
            DatasetSplit::Test => "test",
        }
    }
}

/// Options for [`prepare_dataset`].
#[derive(Debug, Clone)]
pub struct SplitOptions {
    /// Directory holding one subdirectory per class.
    pub input: PathBuf,
    /// Root of the `train/valid/test` tree.
    pub output: PathBuf,
    /// Seed for the folder shuffle.
    pub seed: u64,
    /// `(train, valid)` or `(train, valid, test)` fractions summing to one.
    pub ratio: Vec<f64>,
    pub mode: TransferMode,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: PathBuf::from("output"),
            seed: 1337,
            ratio: vec![0.8, 0.1, 0.1],
            mode: TransferMode::Copy,
        }
    }
}

/// Folder names written to each split by [`prepare_dataset`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSummary {
    pub output: PathBuf,
    pub groups: Vec<(DatasetSplit, Vec<String>)>,
}

impl SplitSummary {
    /// Number of class folders per split.
    pub fn counts(&self) -> Vec<(DatasetSplit, usize)> {
        self.groups
            .iter()
            .map(|(split, names)| (*split, names.len()))
            .collect()
    }

    pub fn total(&self) -> usize {
        self.groups.iter().map(|(_, names)| names.len()).sum()
    }
}

/// Split `options.input` into `options.output/<split>/<class>`.
///
/// The ratio and the input tree are validated before anything is written.
/// A failure part-way through leaves the folders transferred so far in place.
pub fn prepare_dataset(
    options: &SplitOptions,
    mut progress: Option<&mut dyn FnMut(SplitProgress<'_>)>,
) -> Result<SplitSummary, SplitError> {
    let ratio = SplitRatio::new(&options.ratio)?;
    let plan = plan_split(&options.input, &ratio, options.seed)?;
    tracing::info!(
        "Splitting {} class folders from {} into {} ({}, seed {})",
        plan.total(),
        options.input.display(),
        options.output.display(),
        options.mode,
        options.seed
    );

    let total = plan.total();
    let mut processed = 0usize;
    let mut groups = Vec::with_capacity(plan.groups.len());
    for group in &plan.groups {
        let split_dir = options.output.join(group.split.as_str());
        let mut names = Vec::with_capacity(group.folders.len());
        for folder in &group.folders {
            let name = folder_name(folder);
            let dest = split_dir.join(folder.file_name().unwrap_or_default());
            transfer_folder(folder, &dest, options.mode)?;
            tracing::debug!("{} {} -> {}", options.mode, folder.display(), dest.display());
            processed += 1;
            progress::progress_tick(
                &mut progress,
                SplitProgress {
                    split: group.split,
                    folder: &name,
                    processed,
                    total,
                },
            );
            names.push(name);
        }
        groups.push((group.split, names));
    }

    tracing::info!("Split complete: {total} class folders written");
    Ok(SplitSummary {
        output: options.output.clone(),
        groups,
    })
}

fn folder_name(folder: &Path) -> String {
    folder
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
