//! Release workflow
//!
//! Planning validates everything (versions, prerelease numbering, ordering,
//! date, codename) without touching the filesystem; execution then writes
//! the changelog and version file, records the codename and talks to git.

use crate::changelog::{self, ReleaseEntry};
use crate::codename::next_codename;
use crate::config::{self, Config};
use crate::domain::{
    ensure_forward, resolve_prerelease, SemanticVersion, Tag, VersionBump, RELEASE_TAG_GLOB,
};
use crate::error::{Result, TagtasticError};
use crate::git::Repository;
use crate::themes::{ThemeRepository, DEFAULT_THEME};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Changelog file, relative to the release root
pub const CHANGELOG_FILE: &str = "CHANGELOG.md";

/// Version file, relative to the release root
pub const VERSION_FILE: &str = "VERSION";

/// Base URL for the changelog reference links
pub const DEFAULT_REPO_URL: &str = "https://github.com/infravillage/tagtastic";

/// Arguments for the release workflow
///
/// Mirrors the CLI flags but without depending on clap, so the workflow can
/// be driven programmatically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReleaseArgs {
    /// Explicit target version
    pub version: Option<String>,

    /// Bump kind applied to the latest version (major, minor, patch)
    pub bump: Option<String>,

    /// Prerelease label (alpha, beta, rc)
    pub pre: Option<String>,

    /// Prerelease number; 0 picks the next available one
    pub pre_num: i64,

    /// Codename override
    pub codename: Option<String>,

    /// Release date (YYYY-MM-DD); today when absent
    pub date: Option<String>,

    /// Commit CHANGELOG.md and VERSION
    pub commit: bool,

    /// Print the intended actions without writing anything
    pub dry_run: bool,

    /// Leave the config record alone
    pub no_config_update: bool,

    /// Skip creating the annotated tag
    pub no_tag: bool,
}

/// Where and when a release happens
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseContext {
    /// Directory holding CHANGELOG.md and VERSION
    pub root: PathBuf,

    /// Config record updated with the codename
    pub config_path: PathBuf,

    /// Base URL for reference links
    pub repo_url: String,

    /// Date used when no `--date` is given
    pub today: String,
}

impl ReleaseContext {
    pub fn new(root: impl Into<PathBuf>, config_path: impl Into<PathBuf>) -> Self {
        ReleaseContext {
            root: root.into(),
            config_path: config_path.into(),
            repo_url: DEFAULT_REPO_URL.to_string(),
            today: chrono::Local::now().format("%Y-%m-%d").to_string(),
        }
    }

    pub fn with_repo_url(mut self, repo_url: impl Into<String>) -> Self {
        self.repo_url = repo_url.into();
        self
    }

    pub fn with_today(mut self, today: impl Into<String>) -> Self {
        self.today = today.into();
        self
    }

    pub fn changelog_path(&self) -> PathBuf {
        self.root.join(CHANGELOG_FILE)
    }

    pub fn version_path(&self) -> PathBuf {
        self.root.join(VERSION_FILE)
    }
}

/// A validated release, ready to execute
#[derive(Debug, Clone, PartialEq)]
pub struct ReleasePlan {
    /// Version being released, without a `v` prefix
    pub version: String,

    /// Latest version known before this release
    pub latest: Option<String>,

    pub codename: String,

    pub date: String,

    pub tag: Tag,
}

impl ReleasePlan {
    /// Lines describing what a non-dry run would do
    pub fn dry_run_lines(&self, args: &ReleaseArgs, context: &ReleaseContext) -> Vec<String> {
        let mut lines = vec![
            format!(
                "Dry run: would prepare {} – {}",
                self.tag.name, self.codename
            ),
            format!(
                "Dry run: would update {} and {} (date {})",
                CHANGELOG_FILE, VERSION_FILE, self.date
            ),
        ];
        if args.commit {
            lines.push(format!(
                "Dry run: would commit \"{}\"",
                commit_message(&self.version, &self.codename)
            ));
        }
        if !args.no_config_update {
            lines.push(format!(
                "Dry run: would update config at {}",
                context.config_path.display()
            ));
        }
        if !args.no_tag {
            lines.push(format!("Dry run: would create tag {}", self.tag.name));
        }
        lines
    }
}

/// What a release actually did
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseOutcome {
    pub plan: ReleasePlan,

    /// Id of the release commit, when `--commit` was given
    pub commit: Option<String>,

    pub config_updated: bool,

    pub tagged: bool,
}

impl ReleaseOutcome {
    /// `Prepared release v1.2.0 – Almond`
    pub fn summary(&self) -> String {
        format!(
            "Prepared release {} – {}",
            self.plan.tag.name, self.plan.codename
        )
    }
}

/// `chore: prepare release v1.2.0 (Almond)`
pub fn commit_message(version: &str, codename: &str) -> String {
    format!("chore: prepare release v{} ({})", version, codename)
}

/// Release tags known to `repo`; none without a repository
pub fn release_tags<R: Repository>(repo: Option<&R>) -> Result<Vec<String>> {
    match repo {
        Some(repo) => repo.list_tags(RELEASE_TAG_GLOB),
        None => Ok(Vec::new()),
    }
}

/// Latest released version.
///
/// The highest `v*` tag that parses as SemVer wins; without one the trimmed
/// content of the VERSION file is used, and it must parse. Returns `None`
/// when neither exists.
pub fn latest_version<R: Repository>(repo: Option<&R>, root: &Path) -> Result<Option<String>> {
    let latest_tag = release_tags(repo)?
        .iter()
        .filter_map(|tag| SemanticVersion::parse(tag).ok())
        .max();
    if let Some(latest) = latest_tag {
        return Ok(Some(latest.to_string()));
    }

    let content = match fs::read_to_string(root.join(VERSION_FILE)) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let version = content.trim();
    if version.is_empty() {
        return Ok(None);
    }
    SemanticVersion::parse(version)
        .map_err(|_| TagtasticError::InvalidFormat(format!("{} (in {} file)", version, VERSION_FILE)))?;
    Ok(Some(version.to_string()))
}

/// Validate `args` and work out the version, date and codename.
///
/// Nothing is written. Order: target version (explicit or bumped), then
/// prerelease resolution against existing tags, then the strictly-forward
/// check, then date, then codename.
pub fn plan_release<R: Repository, T: ThemeRepository>(
    args: &ReleaseArgs,
    context: &ReleaseContext,
    repo: Option<&R>,
    themes: &T,
) -> Result<ReleasePlan> {
    let explicit = non_empty(args.version.as_deref());
    let bump = non_empty(args.bump.as_deref());
    let pre = non_empty(args.pre.as_deref());

    let target = match (explicit, bump) {
        (Some(version), None) => Target::Explicit(version),
        (None, Some(kind)) => Target::Bump(kind),
        (None, None) => return Err(TagtasticError::usage("version is required (or use --bump)")),
        (Some(_), Some(_)) => {
            return Err(TagtasticError::usage(
                "use either a version argument or --bump, not both",
            ))
        }
    };
    if pre.is_none() && args.pre_num > 0 {
        return Err(TagtasticError::usage("use --pre when providing --pre-num"));
    }

    let latest = latest_version(repo, &context.root)?;
    debug!(latest = ?latest, "resolved latest version");

    let mut version = match target {
        Target::Explicit(version) => SemanticVersion::parse(version)?.to_string(),
        Target::Bump(kind) => {
            let kind: VersionBump = kind.parse()?;
            let base = latest.as_deref().ok_or_else(|| {
                TagtasticError::usage(
                    "unable to auto-bump version: no existing version tags or VERSION file found",
                )
            })?;
            SemanticVersion::parse(base)?.bump(kind)?.to_string()
        }
    };

    if let Some(label) = pre {
        let tags = release_tags(repo)?;
        version = resolve_prerelease(&version, label, args.pre_num, &tags)?;
    }

    ensure_forward(&version, latest.as_deref())?;

    let date = match non_empty(args.date.as_deref()) {
        Some(date) => {
            chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
                TagtasticError::usage(format!("invalid date: {} (expected YYYY-MM-DD)", date))
            })?;
            date.to_string()
        }
        None => context.today.clone(),
    };

    let codename = match non_empty(args.codename.as_deref()) {
        Some(codename) => codename.to_string(),
        None => select_codename(context, themes)?,
    };

    let tag = Tag::for_version(&version);
    info!(version = %version, codename = %codename, "planned release");

    Ok(ReleasePlan {
        version,
        latest,
        codename,
        date,
        tag,
    })
}

enum Target<'a> {
    Explicit(&'a str),
    Bump(&'a str),
}

/// Next unused crayola color, skipping codenames in the changelog and in
/// the config record
pub fn select_codename<T: ThemeRepository>(context: &ReleaseContext, themes: &T) -> Result<String> {
    let mut used = match fs::read_to_string(context.changelog_path()) {
        Ok(document) => changelog::used_codenames(&document),
        Err(e) if e.kind() == ErrorKind::NotFound => Default::default(),
        Err(e) => return Err(e.into()),
    };
    used.extend(
        Config::load(&context.config_path)?
            .used_codenames
            .into_values(),
    );

    let theme = themes.theme_by_name(DEFAULT_THEME)?;
    Ok(next_codename(theme, &used)?.name)
}

/// Carry out a planned release.
///
/// The changelog is spliced in memory first, so a missing Unreleased
/// section fails before any file is written. Then: CHANGELOG.md, VERSION,
/// optional commit, config record, annotated tag.
pub fn execute_release<R: Repository>(
    plan: ReleasePlan,
    args: &ReleaseArgs,
    context: &ReleaseContext,
    repo: Option<&R>,
) -> Result<ReleaseOutcome> {
    if args.dry_run {
        return Ok(ReleaseOutcome {
            plan,
            commit: None,
            config_updated: false,
            tagged: false,
        });
    }

    let changelog_path = context.changelog_path();
    let document = fs::read_to_string(&changelog_path)?;
    let entry = ReleaseEntry::new(&plan.version, &plan.codename, &plan.date);
    let updated = changelog::splice_release(&document, &entry, &context.repo_url)?;

    if (args.commit || !args.no_tag) && repo.is_none() {
        return Err(TagtasticError::repository("git repository not found"));
    }

    fs::write(&changelog_path, updated)?;
    fs::write(context.version_path(), format!("{}\n", plan.version))?;
    debug!(path = %changelog_path.display(), "wrote changelog and version file");

    let mut commit = None;
    if args.commit {
        let repo = require_repo(repo)?;
        let paths = [changelog_path.clone(), context.version_path()];
        commit = Some(repo.commit_paths(&paths, &commit_message(&plan.version, &plan.codename))?);
    }

    if !args.no_config_update {
        config::record_release(&context.config_path, &plan.version, &plan.codename)?;
    }

    if !args.no_tag {
        let repo = require_repo(repo)?;
        repo.create_annotated_tag(&plan.tag.name, &plan.tag.annotation(&plan.codename))?;
    }

    info!(tag = %plan.tag.name, "release prepared");
    Ok(ReleaseOutcome {
        plan,
        commit,
        config_updated: !args.no_config_update,
        tagged: !args.no_tag,
    })
}

fn require_repo<R: Repository>(repo: Option<&R>) -> Result<&R> {
    repo.ok_or_else(|| TagtasticError::repository("git repository not found"))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::MockRepository;
    use crate::themes::EmbeddedThemeRepository;
    use tempfile::TempDir;

    fn context(dir: &TempDir) -> ReleaseContext {
        ReleaseContext::new(dir.path(), dir.path().join(".tagtastic.toml")).with_today("2026-01-31")
    }

    fn plan(args: &ReleaseArgs, dir: &TempDir, repo: &MockRepository) -> Result<ReleasePlan> {
        let themes = EmbeddedThemeRepository::new().unwrap();
        plan_release(args, &context(dir), Some(repo), &themes)
    }

    #[test]
    fn test_requires_version_or_bump() {
        let dir = TempDir::new().unwrap();
        let err = plan(&ReleaseArgs::default(), &dir, &MockRepository::new()).unwrap_err();
        assert!(matches!(err, TagtasticError::Usage(_)));
    }

    #[test]
    fn test_rejects_version_and_bump() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            version: Some("1.0.0".to_string()),
            bump: Some("minor".to_string()),
            ..Default::default()
        };
        let err = plan(&args, &dir, &MockRepository::new()).unwrap_err();
        assert!(err.to_string().contains("not both"));
    }

    #[test]
    fn test_pre_num_requires_pre() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            version: Some("1.0.0".to_string()),
            pre_num: 2,
            ..Default::default()
        };
        let err = plan(&args, &dir, &MockRepository::new()).unwrap_err();
        assert!(err.to_string().contains("--pre"));
    }

    #[test]
    fn test_bump_without_history() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            bump: Some("patch".to_string()),
            ..Default::default()
        };
        let err = plan(&args, &dir, &MockRepository::new()).unwrap_err();
        assert!(err.to_string().contains("unable to auto-bump"));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_bump_from_tags() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new();
        repo.add_tag("v0.1.0");
        repo.add_tag("v0.1.1");
        repo.add_tag("v0.1.2-rc.1");
        repo.add_tag("nightly");

        let args = ReleaseArgs {
            bump: Some("minor".to_string()),
            ..Default::default()
        };
        let plan = plan(&args, &dir, &repo).unwrap();
        assert_eq!(plan.latest.as_deref(), Some("0.1.2-rc.1"));
        assert_eq!(plan.version, "0.2.0");
        assert_eq!(plan.tag.name, "v0.2.0");
        assert_eq!(plan.date, "2026-01-31");
    }

    #[test]
    fn test_latest_version_falls_back_to_version_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), " 0.3.0\n").unwrap();
        let latest = latest_version(Some(&MockRepository::new()), dir.path()).unwrap();
        assert_eq!(latest.as_deref(), Some("0.3.0"));
    }

    #[test]
    fn test_latest_version_rejects_bad_version_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "banana\n").unwrap();
        let err = latest_version(None::<&MockRepository>, dir.path()).unwrap_err();
        assert!(matches!(err, TagtasticError::InvalidFormat(_)));
    }

    #[test]
    fn test_latest_version_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(latest_version(None::<&MockRepository>, dir.path()).unwrap(), None);
    }

    #[test]
    fn test_prerelease_uses_tags() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new();
        repo.add_tag("v0.1.0");
        repo.add_tag("v0.1.1-beta.1");
        repo.add_tag("v0.1.1-beta.2");

        let args = ReleaseArgs {
            version: Some("0.1.1".to_string()),
            pre: Some("beta".to_string()),
            ..Default::default()
        };
        assert_eq!(plan(&args, &dir, &repo).unwrap().version, "0.1.1-beta.3");
    }

    #[test]
    fn test_version_must_move_forward() {
        let dir = TempDir::new().unwrap();
        let mut repo = MockRepository::new();
        repo.add_tag("v0.1.1");

        let args = ReleaseArgs {
            version: Some("0.1.0".to_string()),
            ..Default::default()
        };
        let err = plan(&args, &dir, &repo).unwrap_err();
        assert!(matches!(err, TagtasticError::VersionNotForward { .. }));
    }

    #[test]
    fn test_invalid_date() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            version: Some("1.0.0".to_string()),
            date: Some("31/01/2026".to_string()),
            ..Default::default()
        };
        let err = plan(&args, &dir, &MockRepository::new()).unwrap_err();
        assert!(err.to_string().contains("invalid date"));
    }

    #[test]
    fn test_codename_skips_changelog_and_config() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CHANGELOG_FILE),
            "## [Unreleased]\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n",
        )
        .unwrap();
        config::record_release(&dir.path().join(".tagtastic.toml"), "0.1.1", "Antique Brass")
            .unwrap();

        let args = ReleaseArgs {
            version: Some("0.2.0".to_string()),
            ..Default::default()
        };
        assert_eq!(plan(&args, &dir, &MockRepository::new()).unwrap().codename, "Apricot");
    }

    #[test]
    fn test_dry_run_lines() {
        let dir = TempDir::new().unwrap();
        let args = ReleaseArgs {
            version: Some("1.0.0".to_string()),
            codename: Some("Almond".to_string()),
            dry_run: true,
            ..Default::default()
        };
        let plan = plan(&args, &dir, &MockRepository::new()).unwrap();
        let lines = plan.dry_run_lines(&args, &context(&dir));
        assert_eq!(lines[0], "Dry run: would prepare v1.0.0 – Almond");
        assert!(lines.iter().any(|l| l.contains("would create tag v1.0.0")));
        assert!(lines.iter().any(|l| l.contains("would update config")));
        assert!(!lines.iter().any(|l| l.contains("would commit")));
    }

    #[test]
    fn test_commit_message() {
        assert_eq!(
            commit_message("1.2.0", "Almond"),
            "chore: prepare release v1.2.0 (Almond)"
        );
    }
}
