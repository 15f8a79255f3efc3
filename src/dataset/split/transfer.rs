use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use super::SplitError;

/// How class folders reach the output tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferMode {
    #[default]
    Copy,
    Move,
}

impl TransferMode {
    pub fn as_str(self) -> &'static str {
        match self {
            TransferMode::Copy => "copy",
            TransferMode::Move => "move",
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Copy or move the folder `src` to `dest`, keeping its contents.
///
/// Missing parents of `dest` are created. An existing `dest` is an error;
/// nothing is merged into it.
pub fn transfer_folder(src: &Path, dest: &Path, mode: TransferMode) -> Result<(), SplitError> {
    let wrap = |source| SplitError::Transfer {
        mode,
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };
    if dest.exists() {
        return Err(wrap(io::Error::new(
            io::ErrorKind::AlreadyExists,
            "destination already exists",
        )));
    }
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }
    match mode {
        TransferMode::Copy => copy_dir_all(src, dest).map_err(wrap),
        TransferMode::Move => move_dir(src, dest).map_err(wrap),
    }
}

fn move_dir(src: &Path, dest: &Path) -> io::Result<()> {
    if let Err(err) = fs::rename(src, dest) {
        tracing::warn!(
            "Rename {} -> {} failed ({err}); falling back to copy and delete",
            src.display(),
            dest.display()
        );
        copy_dir_all(src, dest)?;
        fs::remove_dir_all(src)?;
    }
    Ok(())
}

/// Recursive copy; symlinks are followed and their targets copied.
fn copy_dir_all(src: &Path, dest: &Path) -> io::Result<()> {
    fs::create_dir(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dest_path = dest.join(entry.file_name());
        if fs::metadata(&src_path)?.is_dir() {
            copy_dir_all(&src_path, &dest_path)?;
        } else {
            fs::copy(&src_path, &dest_path)?;
        }
    }
    Ok(())
}
