use crate::error::{Result, TagtasticError};
use git2::{ErrorCode, Repository as Git2Repo, Signature};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    repo: Git2Repo,
}

impl Git2Repository {
    /// Discover the repository containing `path`.
    ///
    /// Returns `Ok(None)` when `path` is not inside a git repository.
    pub fn discover<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match Git2Repo::discover(path) {
            Ok(repo) => Ok(Some(Git2Repository { repo })),
            Err(e) if e.code() == ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository { repo }
    }

    fn signature(&self) -> Result<Signature<'static>> {
        match self.repo.signature() {
            Ok(sig) => Ok(sig),
            Err(e) if e.code() == ErrorCode::NotFound => {
                Ok(Signature::now("tagtastic", "tagtastic@localhost")?)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn workdir_relative(&self, path: &Path) -> Result<PathBuf> {
        if path.is_relative() {
            return Ok(path.to_path_buf());
        }

        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| TagtasticError::repository("bare repository has no working directory"))?;
        let workdir = workdir.canonicalize()?;
        let path = path.canonicalize()?;

        path.strip_prefix(&workdir)
            .map(Path::to_path_buf)
            .map_err(|_| {
                TagtasticError::repository(format!(
                    "{} is outside the working directory",
                    path.display()
                ))
            })
    }
}

impl super::Repository for Git2Repository {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(Some(pattern))?;

        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn tag_message(&self, name: &str) -> Result<Option<String>> {
        let reference_name = format!("refs/tags/{}", name);

        let reference = match self.repo.find_reference(&reference_name) {
            Ok(reference) => reference,
            Err(e) if e.code() == ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let Some(oid) = reference.target() else {
            return Ok(None);
        };
        let object = self.repo.find_object(oid, None)?;

        Ok(object
            .as_tag()
            .and_then(|tag| tag.message())
            .and_then(|message| message.lines().next())
            .map(|subject| subject.trim().to_string()))
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        let head = self.repo.head()?.peel_to_commit()?;
        let signature = self.signature()?;

        self.repo
            .tag(name, head.as_object(), &signature, message, false)?;

        debug!(tag = name, commit = %head.id(), "created annotated tag");
        Ok(())
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String> {
        let mut index = self.repo.index()?;
        for path in paths {
            index.add_path(&self.workdir_relative(path)?)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = self.signature()?;

        let parent = match self.repo.head() {
            Ok(head) => Some(head.peel_to_commit()?),
            Err(e) if e.code() == ErrorCode::UnbornBranch || e.code() == ErrorCode::NotFound => {
                None
            }
            Err(e) => return Err(e.into()),
        };
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        let oid = self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &parents,
        )?;

        debug!(commit = %oid, "committed release files");
        Ok(oid.to_string())
    }
}
