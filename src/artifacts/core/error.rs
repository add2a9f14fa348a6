//! Error types for repository operations.
//!
//! These are raised through `anyhow` and can be recovered by callers with
//! `downcast_ref::<RepositoryError>()`.

/// Precondition failures a command reports to the user.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// No `.twig` directory in the given path or any of its parents.
    #[error("not a twig repository (or any of the parent directories): {0}")]
    NotARepository(String),

    /// `init` was run on an existing repository.
    #[error("repository already initialized at {0}")]
    AlreadyInitialized(String),

    /// The path already has an index entry.
    #[error("path is already tracked: {0}")]
    DuplicateTracking(String),

    /// The path has no index entry.
    #[error("path is not tracked: {0}")]
    NotTracked(String),

    /// The working directory was already scanned during this run.
    #[error("index was already updated from the working directory")]
    IndexAlreadyUpdated,

    /// No entry has a staged change.
    #[error("nothing to commit")]
    NothingToCommit,

    /// Local changes would be overwritten by a checkout.
    #[error(
        "your local changes to the following files would be overwritten by checkout:\n\t{}\nplease commit your changes before you switch branches",
        .0.join("\n\t")
    )]
    CheckoutBlocked(Vec<String>),

    #[error("branch '{0}' not found")]
    UnknownBranch(String),

    #[error("a branch named '{0}' already exists")]
    BranchExists(String),

    #[error("'{0}' is not a valid branch name")]
    InvalidBranchName(String),

    /// The branch has no commit to start a new branch from.
    #[error("not a valid object name: '{0}'")]
    NoCommitYet(String),

    /// A user path matched nothing on disk or in the index.
    #[error("pathspec '{0}' did not match any files")]
    PathspecMismatch(String),

    #[error("'{0}' is outside repository")]
    OutsideRepository(String),
}
