use super::DatasetSplit;

/// Progress update emitted after each class folder lands in the output tree.
#[derive(Clone, Copy, Debug)]
pub struct SplitProgress<'a> {
    /// Split the folder was assigned to.
    pub split: DatasetSplit,
    /// Name of the class folder.
    pub folder: &'a str,
    /// Folders transferred so far, including this one.
    pub processed: usize,
    /// Total folders in the plan.
    pub total: usize,
}

pub(super) fn progress_tick(
    progress: &mut Option<&mut dyn FnMut(SplitProgress<'_>)>,
    update: SplitProgress<'_>,
) {
    if let Some(callback) = progress.as_deref_mut() {
        callback(update);
    }
}
