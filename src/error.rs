use thiserror::Error;

/// Unified error type for tagtastic operations
#[derive(Error, Debug)]
pub enum TagtasticError {
    #[error("invalid SemVer: {0}")]
    InvalidFormat(String),

    #[error("invalid bump value: {0} (expected major, minor, or patch)")]
    InvalidBumpKind(String),

    #[error("invalid prerelease label: {0} (expected alpha, beta, or rc)")]
    InvalidPrereleaseLabel(String),

    #[error("version {0} already includes prerelease; omit --pre")]
    AlreadyPrerelease(String),

    #[error("pre-release number must be at least 1 (got {0})")]
    NonPositiveNumber(i64),

    #[error("missing [Unreleased] section in changelog")]
    MissingUnreleasedSection,

    #[error("multiple [Unreleased] sections in changelog")]
    DuplicateUnreleasedSection,

    #[error("version {candidate} must be greater than {latest}")]
    VersionNotForward { candidate: String, latest: String },

    #[error("{0}")]
    Usage(String),

    #[error("unknown format: {0} (expected text, json, or shell)")]
    UnknownFormat(String),

    #[error("theme not found: {0}")]
    ThemeNotFound(String),

    #[error("{0}")]
    NameNotFound(String),

    #[error("Codename error: {0}")]
    Codename(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in tagtastic
pub type Result<T> = std::result::Result<T, TagtasticError>;

impl TagtasticError {
    /// Create a usage error with context
    pub fn usage(msg: impl Into<String>) -> Self {
        TagtasticError::Usage(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TagtasticError::Config(msg.into())
    }

    /// Create a codename error with context
    pub fn codename(msg: impl Into<String>) -> Self {
        TagtasticError::Codename(msg.into())
    }

    /// Create a repository error with context
    pub fn repository(msg: impl Into<String>) -> Self {
        TagtasticError::Repository(msg.into())
    }

    /// Process exit code for this error: 2 for usage and validation
    /// failures, 1 for runtime and I/O failures.
    pub fn exit_code(&self) -> i32 {
        match self {
            TagtasticError::InvalidFormat(_)
            | TagtasticError::InvalidBumpKind(_)
            | TagtasticError::InvalidPrereleaseLabel(_)
            | TagtasticError::AlreadyPrerelease(_)
            | TagtasticError::NonPositiveNumber(_)
            | TagtasticError::VersionNotForward { .. }
            | TagtasticError::Usage(_)
            | TagtasticError::UnknownFormat(_) => 2,
            _ => 1,
        }
    }
}
