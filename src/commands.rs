//! Command handlers
//!
//! Each handler writes its result to `out` and returns errors untouched;
//! reporting and exit codes are left to the binary.

use crate::changelog;
use crate::cli::{
    Command, ConfigCommand, GenerateArgs, ListArgs, ReleaseCommand, ThemesArgs, ValidateArgs,
};
use crate::codename::{pick_codename, rng_for_seed};
use crate::config::{self, Config};
use crate::domain::{codename_from_annotation, SemanticVersion};
use crate::error::{Result, TagtasticError};
use crate::git::Repository;
use crate::output::OutputFormat;
use crate::release::{
    self, execute_release, plan_release, release_tags, ReleaseArgs, ReleaseContext,
    ReleaseOutcome, CHANGELOG_FILE,
};
use crate::themes::{contains_name, ThemeRepository};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tracing::debug;

/// Build metadata shown by `tagtastic version`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    pub commit: String,
    pub date: String,
}

impl VersionInfo {
    /// Version of this build; commit and date come from `TAGTASTIC_COMMIT`
    /// and `TAGTASTIC_BUILD_DATE` at compile time when set
    pub fn current() -> Self {
        VersionInfo {
            version: env!("CARGO_PKG_VERSION").to_string(),
            commit: option_env!("TAGTASTIC_COMMIT").unwrap_or_default().to_string(),
            date: option_env!("TAGTASTIC_BUILD_DATE")
                .unwrap_or_default()
                .to_string(),
        }
    }

    /// `tagtastic 0.1.0 (commit abc123, built 2026-01-31)`
    pub fn line(&self) -> String {
        format!(
            "tagtastic {} (commit {}, built {})",
            or_default(&self.version, "dev"),
            or_default(&self.commit, "none"),
            or_default(&self.date, "unknown")
        )
    }
}

fn or_default<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

/// Settings shared by every command, resolved once from the command line
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Working directory holding CHANGELOG.md, VERSION and `.tagtastic.toml`
    pub root: PathBuf,

    /// `--config-path` or `TAGTASTIC_CONFIG`
    pub config_path: Option<String>,

    pub version: VersionInfo,
}

impl Settings {
    /// Config file for a command, preferring the command's own path flag
    pub fn config_file(&self, command_path: Option<&str>) -> Result<PathBuf> {
        let explicit = command_path
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .or(self.config_path.as_deref());
        config::config_path_for(explicit, &self.root)
    }
}

/// Run a parsed command
pub fn run<R, T, W>(
    command: &Command,
    settings: &Settings,
    repo: Option<&R>,
    themes: &T,
    out: &mut W,
) -> Result<()>
where
    R: Repository,
    T: ThemeRepository,
    W: Write,
{
    match command {
        Command::Generate(args) => generate(args, settings, themes, out),
        Command::List(args) => list(args, themes, out),
        Command::Themes(args) => list_themes(args, themes, out),
        Command::Validate(args) => validate(args, themes, out),
        Command::Config(cmd) => config_command(cmd, settings, out),
        Command::Version => {
            writeln!(out, "{}", settings.version.line())?;
            Ok(())
        }
        Command::NextCodename => next_codename(settings, themes, out),
        Command::Release(cmd) => release(cmd, settings, repo, themes, out).map(|_| ()),
    }
}

/// Pick a random codename, optionally recording it under `unreleased`
pub fn generate<T: ThemeRepository, W: Write>(
    args: &GenerateArgs,
    settings: &Settings,
    themes: &T,
    out: &mut W,
) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;
    let theme = themes.theme_by_name(&args.theme)?;

    let mut rng = rng_for_seed(args.seed());
    let selected = pick_codename(&theme.items, &args.exclude, &mut rng)?;
    writeln!(out, "{}", format.render_one(&selected)?)?;

    if args.record {
        let path = settings.config_file(None)?;
        config::record_unreleased(&path, &selected.name, &args.theme, &args.format)?;
        debug!(path = %path.display(), codename = %selected.name, "recorded codename");
    }
    Ok(())
}

pub fn list<T: ThemeRepository, W: Write>(args: &ListArgs, themes: &T, out: &mut W) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;
    let theme = themes.theme_by_name(&args.theme)?;
    writeln!(out, "{}", format.render_many(&theme.items)?)?;
    Ok(())
}

pub fn list_themes<T: ThemeRepository, W: Write>(
    args: &ThemesArgs,
    themes: &T,
    out: &mut W,
) -> Result<()> {
    let format: OutputFormat = args.format.parse()?;
    writeln!(out, "{}", format.render_names(&themes.theme_names())?)?;
    Ok(())
}

/// Report which theme a name belongs to.
///
/// Without `--theme` every theme is searched in sorted order and the first
/// match wins.
pub fn validate<T: ThemeRepository, W: Write>(
    args: &ValidateArgs,
    themes: &T,
    out: &mut W,
) -> Result<()> {
    if args.name.trim().is_empty() {
        return Err(TagtasticError::usage("name is required"));
    }

    match args.theme.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        Some(theme_name) => {
            let theme = themes.theme_by_name(theme_name)?;
            if contains_name(&theme.items, &args.name) {
                writeln!(out, "Found in theme '{}'", theme.id)?;
                Ok(())
            } else {
                Err(TagtasticError::NameNotFound(format!(
                    "name '{}' not found in theme '{}'",
                    args.name, theme_name
                )))
            }
        }
        None => {
            for theme_name in themes.theme_names() {
                let Ok(theme) = themes.theme_by_name(&theme_name) else {
                    continue;
                };
                if contains_name(&theme.items, &args.name) {
                    writeln!(out, "Found in theme '{}'", theme.id)?;
                    return Ok(());
                }
            }
            Err(TagtasticError::NameNotFound(format!(
                "name '{}' not found",
                args.name
            )))
        }
    }
}

pub fn config_command<W: Write>(cmd: &ConfigCommand, settings: &Settings, out: &mut W) -> Result<()> {
    match cmd {
        ConfigCommand::Init {
            path,
            force,
            dry_run,
        } => {
            let path = settings.config_file(path.as_deref())?;
            if !force && path.exists() {
                return Err(TagtasticError::config(format!(
                    "config already exists at {}",
                    path.display()
                )));
            }
            if *dry_run {
                writeln!(out, "Dry run: would initialize config at {}", path.display())?;
                return Ok(());
            }
            Config::default().save(&path)?;
            writeln!(out, "Initialized config at {}", path.display())?;
        }
        ConfigCommand::Show { path } => {
            let path = settings.config_file(path.as_deref())?;
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(TagtasticError::config(format!(
                        "config not found at {} (run: tagtastic config init)",
                        path.display()
                    )))
                }
                Err(e) => return Err(e.into()),
            };
            write!(out, "{}", content)?;
        }
        ConfigCommand::Reset { path, dry_run } => {
            let path = settings.config_file(path.as_deref())?;
            if *dry_run {
                writeln!(out, "Dry run: would remove config at {}", path.display())?;
                return Ok(());
            }
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            writeln!(out, "Removed config at {}", path.display())?;
        }
    }
    Ok(())
}

/// Print the codename the next release would get
pub fn next_codename<T: ThemeRepository, W: Write>(
    settings: &Settings,
    themes: &T,
    out: &mut W,
) -> Result<()> {
    let context = ReleaseContext::new(&settings.root, settings.config_file(None)?);
    writeln!(out, "{}", release::select_codename(&context, themes)?)?;
    Ok(())
}

/// Plan and (unless `--dry-run`) carry out a release
pub fn release<R, T, W>(
    cmd: &ReleaseCommand,
    settings: &Settings,
    repo: Option<&R>,
    themes: &T,
    out: &mut W,
) -> Result<ReleaseOutcome>
where
    R: Repository,
    T: ThemeRepository,
    W: Write,
{
    let args = ReleaseArgs::from(cmd);
    let mut context = ReleaseContext::new(&settings.root, settings.config_file(cmd.config.as_deref())?);
    if let Some(url) = cmd.repo_url.as_deref().filter(|u| !u.trim().is_empty()) {
        context = context.with_repo_url(url.trim());
    }

    let plan = plan_release(&args, &context, repo, themes)?;
    if args.dry_run {
        for line in plan.dry_run_lines(&args, &context) {
            writeln!(out, "{}", line)?;
        }
    }

    let outcome = execute_release(plan, &args, &context, repo)?;
    if !args.dry_run {
        writeln!(out, "{}", outcome.summary())?;
    }
    Ok(outcome)
}

/// Codename of the most recent release, for the banner.
///
/// Tried in order: the annotation of the newest `v*` tag, the newest
/// version recorded in the config, the first dated changelog heading.
/// Lookup failures count as "unknown".
pub fn last_release_codename<R: Repository>(repo: Option<&R>, settings: &Settings) -> Option<String> {
    let newest_tag = release_tags(repo)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|tag| SemanticVersion::parse(&tag).ok().map(|v| (v, tag)))
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, tag)| tag);

    if let (Some(repo), Some(tag)) = (repo, newest_tag) {
        if let Some(codename) = repo
            .tag_message(&tag)
            .ok()
            .flatten()
            .and_then(|message| codename_from_annotation(&message))
        {
            return Some(codename);
        }
    }

    if let Some(codename) = settings
        .config_file(None)
        .ok()
        .and_then(|path| Config::load(&path).ok())
        .and_then(|config| {
            config
                .latest_recorded()
                .map(|(_, codename)| codename.trim().to_string())
        })
        .filter(|codename| !codename.is_empty())
    {
        return Some(codename);
    }

    fs::read_to_string(settings.root.join(CHANGELOG_FILE))
        .ok()
        .and_then(|document| changelog::latest_codename(&document))
}
