//! Domain logic - pure versioning rules independent of git and the filesystem

pub mod prerelease;
pub mod tag;
pub mod version;

pub use prerelease::{next_prerelease_number, resolve_prerelease, PreReleaseLabel};
pub use tag::{codename_from_annotation, Tag, RELEASE_TAG_GLOB};
pub use version::{bump_version, ensure_forward, Prerelease, SemanticVersion, VersionBump};
