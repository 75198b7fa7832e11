use crate::error::{Result, TagtasticError};
use regex::Regex;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

const SEMVER_PATTERN: &str = r"^v?(\d+)\.(\d+)\.(\d+)(?:-([0-9A-Za-z.-]+))?$";

/// Prerelease part of a version, e.g. `beta.2`.
///
/// `tag` is the verbatim text after the `-`; `label` and `number` are derived
/// from it and only used for ordering and prerelease resolution.
#[derive(Debug, Clone)]
pub struct Prerelease {
    pub tag: String,
    pub label: String,
    pub number: u64,
}

impl Prerelease {
    /// Split a prerelease tag into label and trailing number.
    ///
    /// - "beta.2" -> ("beta", 2)
    /// - "alpha" -> ("alpha", 0)
    /// - "rc.x" -> ("rc.x", 0)
    /// - ".5" -> (".5", 5)
    pub fn parse(tag: &str) -> Self {
        let parts: Vec<&str> = tag.split('.').collect();
        if parts.len() == 1 {
            return Prerelease::whole(tag);
        }

        let last = parts[parts.len() - 1];
        let number = match last.parse::<u64>() {
            Ok(n) => n,
            Err(_) => return Prerelease::whole(tag),
        };

        let label = parts[..parts.len() - 1].join(".");
        let label = if label.is_empty() {
            tag.to_string()
        } else {
            label
        };

        Prerelease {
            tag: tag.to_string(),
            label,
            number,
        }
    }

    fn whole(tag: &str) -> Self {
        Prerelease {
            tag: tag.to_string(),
            label: tag.to_string(),
            number: 0,
        }
    }

    /// Precedence tier of the label: alpha < beta < rc < anything else.
    pub fn rank(&self) -> u8 {
        match self.label.to_lowercase().as_str() {
            "alpha" => 0,
            "beta" => 1,
            "rc" => 2,
            _ => 3,
        }
    }
}

/// Semantic version representation
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<Prerelease>,
}

impl SemanticVersion {
    /// Create a new release version (no prerelease)
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse a version string (e.g., "v1.2.3" or "1.2.3-beta.1")
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let captures = Regex::new(SEMVER_PATTERN)
            .ok()
            .and_then(|re| re.captures(trimmed))
            .ok_or_else(|| TagtasticError::InvalidFormat(input.to_string()))?;

        let number = |idx: usize| -> Result<u64> {
            captures
                .get(idx)
                .and_then(|m| m.as_str().parse::<u64>().ok())
                .ok_or_else(|| TagtasticError::InvalidFormat(input.to_string()))
        };

        let major = number(1)?;
        let minor = number(2)?;
        let patch = number(3)?;
        let prerelease = captures.get(4).map(|m| Prerelease::parse(m.as_str()));

        Ok(SemanticVersion {
            major,
            minor,
            patch,
            prerelease,
        })
    }

    pub fn has_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }

    /// Prerelease label, or "" for a release version
    pub fn prerelease_label(&self) -> &str {
        self.prerelease
            .as_ref()
            .map(|p| p.label.as_str())
            .unwrap_or("")
    }

    /// Prerelease number, or 0 for a release version
    pub fn prerelease_number(&self) -> u64 {
        self.prerelease.as_ref().map(|p| p.number).unwrap_or(0)
    }

    /// True when major, minor and patch match, ignoring any prerelease
    pub fn same_release(&self, other: &SemanticVersion) -> bool {
        self.major == other.major && self.minor == other.minor && self.patch == other.patch
    }

    /// The release this version belongs to, with the prerelease removed
    pub fn release(&self) -> Self {
        SemanticVersion::new(self.major, self.minor, self.patch)
    }

    /// Bump version according to bump type. The result never carries a
    /// prerelease.
    ///
    /// # Errors
    /// `InvalidFormat` when the bumped component would overflow `u64`.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let overflow =
            || TagtasticError::InvalidFormat(format!("{} (cannot bump {})", self, bump_type));
        let bumped = match bump_type {
            VersionBump::Major => {
                SemanticVersion::new(self.major.checked_add(1).ok_or_else(overflow)?, 0, 0)
            }
            VersionBump::Minor => SemanticVersion::new(
                self.major,
                self.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            VersionBump::Patch => SemanticVersion::new(
                self.major,
                self.minor,
                self.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(bumped)
    }

    /// Compare two versions with prerelease precedence
    pub fn compare(&self, other: &SemanticVersion) -> Ordering {
        let core = self
            .major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch));
        if core != Ordering::Equal {
            return core;
        }

        match (&self.prerelease, &other.prerelease) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let rank = a.rank().cmp(&b.rank());
                if rank != Ordering::Equal {
                    return rank;
                }
                if a.label != b.label {
                    return a.label.cmp(&b.label);
                }
                a.number.cmp(&b.number)
            }
        }
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl FromStr for SemanticVersion {
    type Err = TagtasticError;

    fn from_str(s: &str) -> Result<Self> {
        SemanticVersion::parse(s)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre) = &self.prerelease {
            if !pre.tag.is_empty() {
                write!(f, "-{}", pre.tag)?;
            }
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl FromStr for VersionBump {
    type Err = TagtasticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            _ => Err(TagtasticError::InvalidBumpKind(s.to_string())),
        }
    }
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Major => write!(f, "major"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Patch => write!(f, "patch"),
        }
    }
}

/// Bumps a version string by the named bump kind.
///
/// # Example
/// ```ignore
/// assert_eq!(bump_version("1.2.3-beta.2", "patch")?, "1.2.4");
/// assert_eq!(bump_version("1.2.3", "major")?, "2.0.0");
/// ```
pub fn bump_version(base: &str, kind: &str) -> Result<String> {
    let parsed = SemanticVersion::parse(base)?;
    let bump: VersionBump = kind.parse()?;
    Ok(parsed.bump(bump)?.to_string())
}

/// Fails with `VersionNotForward` unless `candidate` is strictly greater
/// than `latest`. No latest version means anything goes.
pub fn ensure_forward(candidate: &str, latest: Option<&str>) -> Result<()> {
    if candidate.trim().is_empty() {
        return Err(TagtasticError::usage("version is required"));
    }
    let parsed = SemanticVersion::parse(candidate)?;

    let latest = match latest.map(str::trim).filter(|l| !l.is_empty()) {
        Some(latest) => SemanticVersion::parse(latest)?,
        None => return Ok(()),
    };

    if parsed <= latest {
        return Err(TagtasticError::VersionNotForward {
            candidate: parsed.to_string(),
            latest: latest.to_string(),
        });
    }
    Ok(())
}
