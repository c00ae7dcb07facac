// Change detection: which documentation files a pull request touched.

mod git;
mod resolver;

pub use git::{Git, VcsError, VersionControl};
pub use resolver::{ChangeSetResolver, DEFAULT_REMOTE, DOC_EXTENSION, filter_documents};

use tracing::info;

use crate::pipeline::FileSet;

/// Pick the linter's targets.
///
/// With a base ref (pull request builds) only changed documents are
/// returned, possibly none. Without one the whole tree is scanned.
pub fn select_targets<V: VersionControl>(
    base_ref: Option<&str>,
    resolver: &ChangeSetResolver<V>,
) -> FileSet {
    match base_ref {
        Some(base_ref) => {
            info!("Detected PR base ref: {base_ref}");
            FileSet::Paths(resolver.resolve(base_ref))
        }
        None => {
            info!("No PR base ref found. Scanning all files.");
            FileSet::EntireTree
        }
    }
}
