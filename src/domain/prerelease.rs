//! Prerelease version resolution
//!
//! Turns a release version plus a label (alpha, beta, rc) into the next
//! unused prerelease, e.g. "0.1.1" + "beta" -> "0.1.1-beta.3" when
//! `v0.1.1-beta.1` and `v0.1.1-beta.2` are already tagged.

use crate::domain::version::SemanticVersion;
use crate::error::{Result, TagtasticError};
use std::fmt;
use std::str::FromStr;

/// Prerelease labels accepted by the release helper
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PreReleaseLabel {
    /// Alpha pre-release
    Alpha,
    /// Beta pre-release
    Beta,
    /// Release candidate
    ReleaseCandidate,
}

impl FromStr for PreReleaseLabel {
    type Err = TagtasticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "alpha" => Ok(PreReleaseLabel::Alpha),
            "beta" => Ok(PreReleaseLabel::Beta),
            "rc" => Ok(PreReleaseLabel::ReleaseCandidate),
            _ => Err(TagtasticError::InvalidPrereleaseLabel(s.to_string())),
        }
    }
}

impl fmt::Display for PreReleaseLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreReleaseLabel::Alpha => write!(f, "alpha"),
            PreReleaseLabel::Beta => write!(f, "beta"),
            PreReleaseLabel::ReleaseCandidate => write!(f, "rc"),
        }
    }
}

/// Next free prerelease number for `base` and `label` given the existing
/// tags. Tags that do not parse are skipped; the highest number wins no
/// matter the order the tags are listed in.
pub fn next_prerelease_number<S: AsRef<str>>(
    base: &SemanticVersion,
    label: PreReleaseLabel,
    tags: &[S],
) -> Result<u64> {
    if base.has_prerelease() {
        return Err(TagtasticError::AlreadyPrerelease(base.to_string()));
    }

    let label = label.to_string();
    let highest = tags
        .iter()
        .filter_map(|tag| SemanticVersion::parse(tag.as_ref()).ok())
        .filter(|tagged| tagged.has_prerelease() && tagged.same_release(base))
        .filter(|tagged| tagged.prerelease_label().to_lowercase() == label)
        .map(|tagged| tagged.prerelease_number())
        .max()
        .unwrap_or(0);

    highest.checked_add(1).ok_or_else(|| {
        TagtasticError::InvalidFormat(format!(
            "{}-{}.{} (no next prerelease number)",
            base, label, highest
        ))
    })
}

/// Resolves `base` + `label` (+ optional explicit number) into a prerelease
/// version string.
///
/// `number == 0` means "next available" computed from `tags`; a negative
/// number is rejected.
///
/// # Example
/// ```ignore
/// let tags = ["v0.1.1-beta.1", "v0.1.1-beta.2", "v0.1.1-rc.1"];
/// assert_eq!(resolve_prerelease("0.1.1", "beta", 0, &tags)?, "0.1.1-beta.3");
/// ```
pub fn resolve_prerelease<S: AsRef<str>>(
    base: &str,
    label: &str,
    number: i64,
    tags: &[S],
) -> Result<String> {
    let label: PreReleaseLabel = label.parse()?;

    let base = SemanticVersion::parse(base)?;
    if base.has_prerelease() {
        return Err(TagtasticError::AlreadyPrerelease(base.to_string()));
    }

    if number < 0 {
        return Err(TagtasticError::NonPositiveNumber(number));
    }
    let number = if number == 0 {
        next_prerelease_number(&base, label, tags)?
    } else {
        number as u64
    };
    if number < 1 {
        return Err(TagtasticError::NonPositiveNumber(number as i64));
    }

    Ok(format!(
        "{}.{}.{}-{}.{}",
        base.major, base.minor, base.patch, label, number
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_TAGS: [&str; 0] = [];

    #[test]
    fn test_label_parse() {
        assert_eq!("alpha".parse::<PreReleaseLabel>().unwrap(), PreReleaseLabel::Alpha);
        assert_eq!("Beta".parse::<PreReleaseLabel>().unwrap(), PreReleaseLabel::Beta);
        assert_eq!(
            "RC".parse::<PreReleaseLabel>().unwrap(),
            PreReleaseLabel::ReleaseCandidate
        );
    }

    #[test]
    fn test_label_parse_invalid() {
        for input in ["preview", "a", "b", "", "beta.1"] {
            assert!(matches!(
                input.parse::<PreReleaseLabel>().unwrap_err(),
                TagtasticError::InvalidPrereleaseLabel(_)
            ));
        }
    }

    #[test]
    fn test_label_display() {
        assert_eq!(PreReleaseLabel::Alpha.to_string(), "alpha");
        assert_eq!(PreReleaseLabel::Beta.to_string(), "beta");
        assert_eq!(PreReleaseLabel::ReleaseCandidate.to_string(), "rc");
    }

    #[test]
    fn test_resolve_next_available() {
        let tags = ["v0.1.1-beta.1", "v0.1.1-beta.2", "v0.1.1-rc.1"];
        assert_eq!(
            resolve_prerelease("0.1.1", "beta", 0, &tags).unwrap(),
            "0.1.1-beta.3"
        );
    }

    #[test]
    fn test_resolve_ignores_tag_order() {
        let tags = ["v0.1.1-beta.7", "v0.1.1-beta.2", "v0.1.1-beta.4"];
        assert_eq!(
            resolve_prerelease("0.1.1", "beta", 0, &tags).unwrap(),
            "0.1.1-beta.8"
        );
    }

    #[test]
    fn test_resolve_starts_at_one() {
        assert_eq!(
            resolve_prerelease("0.1.1", "rc", 0, &NO_TAGS).unwrap(),
            "0.1.1-rc.1"
        );
    }

    #[test]
    fn test_resolve_skips_other_versions_and_garbage() {
        let tags = [
            "v0.1.0-beta.9",
            "v0.2.1-beta.9",
            "not-a-version",
            "v0.1.1",
            "v0.1.1-alpha.4",
        ];
        assert_eq!(
            resolve_prerelease("0.1.1", "beta", 0, &tags).unwrap(),
            "0.1.1-beta.1"
        );
    }

    #[test]
    fn test_resolve_label_match_is_case_insensitive() {
        let tags = ["v1.0.0-BETA.2"];
        assert_eq!(
            resolve_prerelease("1.0.0", "Beta", 0, &tags).unwrap(),
            "1.0.0-beta.3"
        );
    }

    #[test]
    fn test_resolve_explicit_number() {
        let tags = ["v1.0.0-rc.4"];
        assert_eq!(
            resolve_prerelease("v1.0.0", "rc", 2, &tags).unwrap(),
            "1.0.0-rc.2"
        );
    }

    #[test]
    fn test_resolve_invalid_label() {
        let err = resolve_prerelease("0.1.1", "preview", 0, &NO_TAGS).unwrap_err();
        assert!(matches!(err, TagtasticError::InvalidPrereleaseLabel(ref l) if l == "preview"));
    }

    #[test]
    fn test_resolve_rejects_prerelease_base() {
        let err = resolve_prerelease("0.1.1-beta.1", "beta", 0, &NO_TAGS).unwrap_err();
        assert!(matches!(err, TagtasticError::AlreadyPrerelease(_)));
    }

    #[test]
    fn test_resolve_rejects_negative_number() {
        let err = resolve_prerelease("0.1.1", "alpha", -3, &NO_TAGS).unwrap_err();
        assert!(matches!(err, TagtasticError::NonPositiveNumber(-3)));
    }

    #[test]
    fn test_resolve_invalid_base() {
        let err = resolve_prerelease("0.1", "alpha", 0, &NO_TAGS).unwrap_err();
        assert!(matches!(err, TagtasticError::InvalidFormat(_)));
    }

    #[test]
    fn test_resolve_exhausted_number_is_invalid() {
        let tags = ["v1.0.0-beta.18446744073709551615"];
        let err = resolve_prerelease("1.0.0", "beta", 0, &tags).unwrap_err();
        assert!(matches!(err, TagtasticError::InvalidFormat(_)));
        assert_eq!(resolve_prerelease("1.0.0", "rc", 0, &tags).unwrap(), "1.0.0-rc.1");
    }

    #[test]
    fn test_next_number_requires_release_base() {
        let base = SemanticVersion::parse("1.0.0-rc.1").unwrap();
        assert!(next_prerelease_number(&base, PreReleaseLabel::Beta, &NO_TAGS).is_err());
    }
}
