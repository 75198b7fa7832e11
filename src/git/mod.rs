//! Git operations abstraction layer
//!
//! The release workflow only needs a handful of git operations: reading
//! release tags and their annotations, committing the release files and
//! creating the annotated release tag. They sit behind the [Repository]
//! trait so the workflow can run against a real repository or an in-memory
//! one.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: An in-memory implementation for testing
//!
//! ```rust
//! # use tagtastic::git::Repository;
//! # fn example<R: Repository>(repo: &R) -> tagtastic::error::Result<()> {
//! let tags = repo.list_tags("v*")?;
//! for tag in tags {
//!     println!("{}", tag);
//! }
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::error::Result;
use std::path::PathBuf;

/// Git operations used by tagtastic
///
/// ## Error Handling
///
/// All methods return [crate::error::Result<T>]. `git2` failures surface as
/// [crate::error::TagtasticError::Git]; nothing is retried.
pub trait Repository {
    /// List tag names matching a glob pattern
    ///
    /// # Arguments
    /// * `pattern` - Glob such as `v*`
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Matching tag names, in no particular order
    /// * `Err` - If there's a Git error
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>>;

    /// Subject line of an annotated tag's message
    ///
    /// # Returns
    /// * `Ok(Some(String))` - First line of the annotation
    /// * `Ok(None)` - The tag is lightweight or doesn't exist
    /// * `Err` - If there's a Git error
    fn tag_message(&self, name: &str) -> Result<Option<String>>;

    /// Create an annotated tag on HEAD
    ///
    /// # Arguments
    /// * `name` - Name for the new tag (e.g., "v1.0.0")
    /// * `message` - Annotation message
    ///
    /// # Returns
    /// * `Ok(())` - Success
    /// * `Err` - If the tag already exists, HEAD is unborn, or a Git error occurs
    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()>;

    /// Stage `paths` and commit them on HEAD
    ///
    /// # Arguments
    /// * `paths` - Files to stage, absolute or relative to the working directory
    /// * `message` - Commit message
    ///
    /// # Returns
    /// * `Ok(String)` - Id of the new commit
    /// * `Err` - If a path can't be staged or the commit fails
    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String>;
}
