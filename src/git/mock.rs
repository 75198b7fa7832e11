use crate::error::{Result, TagtasticError};
use crate::git::Repository;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// A commit recorded by [MockRepository]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommit {
    pub paths: Vec<PathBuf>,
    pub message: String,
}

/// Mock repository for testing without actual git operations
///
/// Tags map to their annotation message (`None` for lightweight tags).
/// Tags and commits created through the trait are recorded for inspection.
pub struct MockRepository {
    tags: RefCell<BTreeMap<String, Option<String>>>,
    commits: RefCell<Vec<RecordedCommit>>,
    fail_tagging: bool,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            tags: RefCell::new(BTreeMap::new()),
            commits: RefCell::new(Vec::new()),
            fail_tagging: false,
        }
    }

    /// Add a lightweight tag
    pub fn add_tag(&mut self, name: impl Into<String>) {
        self.tags.get_mut().insert(name.into(), None);
    }

    /// Add an annotated tag
    pub fn add_annotated_tag(&mut self, name: impl Into<String>, message: impl Into<String>) {
        self.tags.get_mut().insert(name.into(), Some(message.into()));
    }

    /// Make `create_annotated_tag` fail, as it does outside a repository
    pub fn fail_tagging(mut self) -> Self {
        self.fail_tagging = true;
        self
    }

    /// All tags with their annotation
    pub fn tags(&self) -> BTreeMap<String, Option<String>> {
        self.tags.borrow().clone()
    }

    /// Commits made through [Repository::commit_paths]
    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.commits.borrow().clone()
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

/// `*` matches any run of characters; everything else is literal
fn glob_match(pattern: &str, name: &str) -> bool {
    match pattern.split_once('*') {
        None => pattern == name,
        Some((prefix, rest)) => {
            let Some(tail) = name.strip_prefix(prefix) else {
                return false;
            };
            if rest.is_empty() {
                return true;
            }
            (0..=tail.len())
                .filter(|i| tail.is_char_boundary(*i))
                .any(|i| glob_match(rest, &tail[i..]))
        }
    }
}

impl Repository for MockRepository {
    fn list_tags(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .tags
            .borrow()
            .keys()
            .filter(|name| glob_match(pattern, name))
            .cloned()
            .collect())
    }

    fn tag_message(&self, name: &str) -> Result<Option<String>> {
        Ok(self.tags.borrow().get(name).cloned().flatten())
    }

    fn create_annotated_tag(&self, name: &str, message: &str) -> Result<()> {
        if self.fail_tagging {
            return Err(TagtasticError::repository("git repository not found"));
        }

        let mut tags = self.tags.borrow_mut();
        if tags.contains_key(name) {
            return Err(TagtasticError::repository(format!(
                "tag '{}' already exists",
                name
            )));
        }
        tags.insert(name.to_string(), Some(message.to_string()));
        Ok(())
    }

    fn commit_paths(&self, paths: &[PathBuf], message: &str) -> Result<String> {
        let mut commits = self.commits.borrow_mut();
        commits.push(RecordedCommit {
            paths: paths.to_vec(),
            message: message.to_string(),
        });
        Ok(format!("{:040x}", commits.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_list_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        repo.add_tag("v2.0.0");
        repo.add_tag("release-1");

        let tags = repo.list_tags("v*").unwrap();
        assert_eq!(tags, vec!["v1.0.0".to_string(), "v2.0.0".to_string()]);
        assert_eq!(repo.list_tags("*").unwrap().len(), 3);
    }

    #[test]
    fn test_mock_repository_tag_message() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0");
        repo.add_annotated_tag("v1.1.0", "v1.1.0 – Almond");

        assert_eq!(repo.tag_message("v1.0.0").unwrap(), None);
        assert_eq!(
            repo.tag_message("v1.1.0").unwrap(),
            Some("v1.1.0 – Almond".to_string())
        );
        assert_eq!(repo.tag_message("v9.9.9").unwrap(), None);
    }

    #[test]
    fn test_mock_repository_create_tag_records() {
        let repo = MockRepository::new();
        repo.create_annotated_tag("v0.2.0", "v0.2.0 – Apricot").unwrap();

        assert_eq!(
            repo.tags().get("v0.2.0"),
            Some(&Some("v0.2.0 – Apricot".to_string()))
        );
        assert!(repo.create_annotated_tag("v0.2.0", "again").is_err());
    }

    #[test]
    fn test_mock_repository_fail_tagging() {
        let repo = MockRepository::new().fail_tagging();
        let err = repo.create_annotated_tag("v0.2.0", "x").unwrap_err();
        assert!(err.to_string().contains("git repository not found"));
    }

    #[test]
    fn test_mock_repository_commits() {
        let repo = MockRepository::new();
        repo.commit_paths(&[PathBuf::from("VERSION")], "chore: release")
            .unwrap();

        let commits = repo.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(commits[0].message, "chore: release");
    }

    #[test]
    fn test_glob_match() {
        assert!(glob_match("v*", "v1.0.0"));
        assert!(!glob_match("v*", "1.0.0"));
        assert!(glob_match("v*.0", "v1.0"));
        assert!(glob_match("exact", "exact"));
        assert!(!glob_match("exact", "exactly"));
    }
}
