use tracing::{info, warn};

use super::git::{VcsError, VersionControl};

pub const DEFAULT_REMOTE: &str = "origin";

/// Only files with this suffix are linted. Matching is case-sensitive.
pub const DOC_EXTENSION: &str = ".md";

/// Finds the documentation files a pull request touched.
pub struct ChangeSetResolver<V> {
    vcs: V,
}

impl<V: VersionControl> ChangeSetResolver<V> {
    pub fn new(vcs: V) -> Self {
        Self { vcs }
    }

    /// Changed documentation files relative to `base_ref`.
    ///
    /// Never fails: any version-control error is logged as a warning and
    /// yields an empty list.
    pub fn resolve(&self, base_ref: &str) -> Vec<String> {
        match self.changed_paths(base_ref) {
            Ok(paths) => paths,
            Err(e) => {
                warn!("Failed to get changed files: {e}");
                Vec::new()
            }
        }
    }

    /// Like [`resolve`](Self::resolve) but surfaces the error.
    ///
    /// A fetch that runs and exits non-zero is not an error: the diff is
    /// attempted anyway and fails on its own if the ref is unusable.
    pub fn changed_paths(&self, base_ref: &str) -> Result<Vec<String>, VcsError> {
        info!("Fetching {DEFAULT_REMOTE}/{base_ref}...");
        match self.vcs.fetch(DEFAULT_REMOTE, base_ref, 1) {
            Ok(()) => {}
            Err(e @ VcsError::Exit { .. }) => info!("Fetch failed, diffing anyway: {e}"),
            Err(e) => return Err(e),
        }

        let base = format!("{DEFAULT_REMOTE}/{base_ref}");
        info!("Diffing against {base}...");
        let paths = self.vcs.diff_names(&base, "HEAD")?;
        Ok(filter_documents(paths))
    }
}

/// Keep paths ending in [`DOC_EXTENSION`], preserving order.
pub fn filter_documents<I>(paths: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    paths
        .into_iter()
        .filter(|p| p.ends_with(DOC_EXTENSION))
        .collect()
}
