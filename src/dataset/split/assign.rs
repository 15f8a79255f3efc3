use std::fs;
use std::path::{Path, PathBuf};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use super::{DatasetSplit, SplitError, SplitRatio};

/// Class folders assigned to one split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitGroup {
    pub split: DatasetSplit,
    pub folders: Vec<PathBuf>,
}

/// Ordered partition of the shuffled class folders.
///
/// Groups are always `train`, `valid` and, for three-way ratios, `test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitPlan {
    pub groups: Vec<SplitGroup>,
}

impl SplitPlan {
    pub fn group(&self, split: DatasetSplit) -> Option<&SplitGroup> {
        self.groups.iter().find(|group| group.split == split)
    }

    /// Total number of folders across all groups.
    pub fn total(&self) -> usize {
        self.groups.iter().map(|group| group.folders.len()).sum()
    }
}

/// Check that `root` exists, is a directory and holds at least one subdirectory.
///
/// Returns the class folders from [`list_class_folders`], so callers plan from
/// the same listing that passed validation.
pub fn check_input(root: &Path) -> Result<Vec<PathBuf>, SplitError> {
    if !root.exists() {
        let mut message = format!("The input folder \"{}\" does not exist", root.display());
        if !root.is_absolute() {
            let cwd = std::env::current_dir()
                .map(|dir| dir.display().to_string())
                .unwrap_or_else(|_| "<unknown>".to_string());
            message.push_str(&format!(
                ". The relative path cannot be found from the current working directory \"{cwd}\""
            ));
        }
        return Err(SplitError::InvalidInput(message));
    }
    if !root.is_dir() {
        return Err(SplitError::InvalidInput(format!(
            "The input folder \"{}\" is not a directory",
            root.display()
        )));
    }
    let folders = list_class_folders(root)?;
    if folders.is_empty() {
        return Err(SplitError::InvalidInput(format!(
            "The input folder \"{}\" contains no class directories",
            root.display()
        )));
    }
    Ok(folders)
}

/// Immediate subdirectories of `root`, sorted by name.
///
/// Symlinks that resolve to directories count as class folders.
pub fn list_class_folders(root: &Path) -> Result<Vec<PathBuf>, SplitError> {
    let read_err = |source| SplitError::ReadDir {
        path: root.to_path_buf(),
        source,
    };
    let mut folders = Vec::new();
    for entry in fs::read_dir(root).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if path.is_dir() {
            folders.push(path);
        }
    }
    folders.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(folders)
}

/// Shuffle `folders` with a generator seeded from `seed`.
///
/// The caller is expected to pass the folders in sorted order so the result
/// only depends on the seed and the folder names.
pub fn shuffle_folders(folders: &mut [PathBuf], seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    folders.shuffle(&mut rng);
}

/// Partition `folders` (already shuffled) by `ratio`.
pub fn partition(mut folders: Vec<PathBuf>, ratio: &SplitRatio) -> SplitPlan {
    let (train_end, valid_end) = ratio.boundaries(folders.len());
    let test = folders.split_off(valid_end);
    let valid = folders.split_off(train_end);
    let mut groups = vec![
        SplitGroup {
            split: DatasetSplit::Train,
            folders,
        },
        SplitGroup {
            split: DatasetSplit::Valid,
            folders: valid,
        },
    ];
    if ratio.has_test() {
        groups.push(SplitGroup {
            split: DatasetSplit::Test,
            folders: test,
        });
    }
    SplitPlan { groups }
}

/// Validate `root`, list its class folders and assign them to splits.
///
/// Touches nothing on disk.
pub fn plan_split(root: &Path, ratio: &SplitRatio, seed: u64) -> Result<SplitPlan, SplitError> {
    let mut folders = check_input(root)?;
    shuffle_folders(&mut folders, seed);
    let plan = partition(folders, ratio);
    tracing::debug!(
        "Split plan for {}: {}",
        root.display(),
        plan.groups
            .iter()
            .map(|group| format!("{}={}", group.split.as_str(), group.folders.len()))
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(plan)
}
