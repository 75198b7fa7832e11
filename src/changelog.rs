//! Changelog splicing.
//!
//! Promotes the `## [Unreleased]` section of a Keep-a-Changelog style
//! document into a dated release heading, resets the Unreleased section and
//! regenerates the trailing reference links.

use crate::error::{Result, TagtasticError};
use regex::Regex;
use std::collections::BTreeSet;

const UNRELEASED_HEADING: &str = "## [Unreleased]";

/// Empty Unreleased section written back after every release
pub const UNRELEASED_TEMPLATE: &str = "## [Unreleased]

### Added
- N/A

### Changed
- N/A

### Fixed
- N/A
";

const EMPTY_TEMPLATE_BODY: &str = "### Added\n- N/A\n\n### Changed\n- N/A\n\n### Fixed\n- N/A";

const PLACEHOLDER_BODY: &str = "### Added\n- Placeholder version entry for this release.";

/// Heading data for a new release section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseEntry {
    pub version: String,
    pub codename: String,
    pub date: String,
}

impl ReleaseEntry {
    pub fn new(
        version: impl Into<String>,
        codename: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        ReleaseEntry {
            version: version.into(),
            codename: codename.into(),
            date: date.into(),
        }
    }

    /// `## [0.2.0] – "Almond" – 2026-01-31`
    pub fn heading(&self) -> String {
        format!(
            "## [{}] – \"{}\" – {}",
            self.version, self.codename, self.date
        )
    }
}

struct Sections {
    preamble: String,
    unreleased: String,
    remainder: String,
}

/// A reference definition line such as `[0.1.0]: https://...`
fn is_reference(line: &str) -> bool {
    line.starts_with('[') && line.contains("]: ")
}

fn split_sections(document: &str) -> Result<Sections> {
    let mut preamble = Vec::new();
    let mut unreleased = Vec::new();
    let mut remainder = Vec::new();
    let mut found = false;
    let mut in_remainder = false;

    for line in document.split('\n') {
        if line.starts_with(UNRELEASED_HEADING) {
            if found {
                return Err(TagtasticError::DuplicateUnreleasedSection);
            }
            found = true;
            continue;
        }
        if found && !in_remainder && line.starts_with("## [") {
            in_remainder = true;
        }

        if !found {
            preamble.push(line);
        } else if in_remainder {
            remainder.push(line);
        } else {
            unreleased.push(line);
        }
    }

    if !found {
        return Err(TagtasticError::MissingUnreleasedSection);
    }

    Ok(Sections {
        preamble: preamble.iter().map(|line| format!("{line}\n")).collect(),
        unreleased: unreleased.join("\n"),
        remainder: remainder.join("\n"),
    })
}

fn release_body(unreleased: &str) -> String {
    let body = unreleased
        .split('\n')
        .filter(|line| !is_reference(line))
        .collect::<Vec<_>>()
        .join("\n");
    let body = body.trim();

    if body.is_empty() || body == EMPTY_TEMPLATE_BODY {
        PLACEHOLDER_BODY.to_string()
    } else {
        body.to_string()
    }
}

/// Identifier between the first `[` and `]` of a reference line
fn reference_id(line: &str) -> Option<&str> {
    let start = line.find('[')?;
    let end = line.find(']')?;
    if end <= start + 1 {
        return None;
    }
    Some(&line[start + 1..end])
}

/// Rebuild the reference link block for a new release.
///
/// Prior links are ordered by a descending comparison of the raw line text,
/// only the first definition of each identifier is kept, and the first one
/// left becomes the compare base. This is a string order, not
/// a SemVer order: "[9.0.0]" sorts above "[10.0.0]".
fn rebuild_references(existing: Vec<&str>, version: &str, repo_url: &str) -> Vec<String> {
    let mut releases: Vec<&str> = existing
        .into_iter()
        .filter(|line| match reference_id(line) {
            Some(id) => !id.eq_ignore_ascii_case("unreleased") && id != version,
            None => true,
        })
        .collect();
    releases.sort_by(|a, b| b.cmp(a));

    let mut seen = BTreeSet::new();
    releases.retain(|line| match reference_id(line) {
        Some(id) => seen.insert(id.to_string()),
        None => true,
    });

    let previous = releases.first().and_then(|line| reference_id(line));
    let release_link = match previous {
        Some(prev) => format!("[{version}]: {repo_url}/compare/v{prev}...v{version}"),
        None => format!("[{version}]: {repo_url}/releases/tag/v{version}"),
    };

    let mut refs = Vec::with_capacity(releases.len() + 2);
    refs.push(format!(
        "[Unreleased]: {repo_url}/compare/v{version}...HEAD"
    ));
    refs.push(release_link);
    refs.extend(releases.into_iter().map(str::to_string));
    refs
}

fn rewrite_links(content: &str, version: &str, repo_url: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut references: Vec<&str> = Vec::new();
    let mut in_refs = false;

    for line in content.split('\n') {
        if is_reference(line) {
            in_refs = true;
            references.push(line);
            continue;
        }
        if in_refs {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with('#') {
                in_refs = false;
            }
        }
        output.push(line);
    }

    while output.last().is_some_and(|line| line.trim().is_empty()) {
        output.pop();
    }

    let mut result = output.join("\n");
    result.push('\n');
    result.push('\n');
    for reference in rebuild_references(references, version, repo_url) {
        result.push_str(&reference);
        result.push('\n');
    }
    result
}

/// Splice a new release into `document`.
///
/// Fails with `MissingUnreleasedSection` when the document has no
/// `## [Unreleased]` heading and with `DuplicateUnreleasedSection` when it
/// has more than one. The input is never modified; callers write the
/// returned text only on success.
pub fn splice_release(document: &str, entry: &ReleaseEntry, repo_url: &str) -> Result<String> {
    let sections = split_sections(document)?;
    let repo_url = repo_url.trim_end_matches('/');

    let body = release_body(&sections.unreleased);
    let mut updated = format!(
        "{}{}\n{}\n\n{}\n\n{}",
        sections.preamble,
        UNRELEASED_TEMPLATE,
        entry.heading(),
        body,
        sections.remainder
    );

    // Links defined under Unreleased (before any release exists) still count.
    for line in sections.unreleased.split('\n').filter(|l| is_reference(l)) {
        updated.push('\n');
        updated.push_str(line);
    }

    Ok(rewrite_links(&updated, &entry.version, repo_url))
}

/// Codenames already used by release headings (`– "NAME"`)
pub fn used_codenames(document: &str) -> BTreeSet<String> {
    let Ok(re) = Regex::new(r#"–\s+"([^"]+)""#) else {
        return BTreeSet::new();
    };

    re.captures_iter(document)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Codename of the newest (first) dated release heading
pub fn latest_codename(document: &str) -> Option<String> {
    document
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with("## [") && !line.contains("[Unreleased]"))
        .find_map(|line| {
            let idx = line.find("– \"")?;
            let fragment = &line[idx + "– \"".len()..];
            let end = fragment.find('"')?;
            Some(fragment[..end].to_string())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPO: &str = "https://github.com/infravillage/tagtastic";

    fn release_headings(document: &str) -> Vec<&str> {
        document
            .lines()
            .filter(|line| line.starts_with("## [") && !line.starts_with(UNRELEASED_HEADING))
            .collect()
    }

    fn fresh_changelog() -> String {
        format!("# Changelog\n\nAll notable changes to this project.\n\n{UNRELEASED_TEMPLATE}")
    }

    #[test]
    fn test_missing_unreleased_section() {
        let doc = "# Changelog\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n";
        let err = splice_release(doc, &ReleaseEntry::new("0.2.0", "Apricot", "2026-02-01"), REPO)
            .unwrap_err();
        assert!(matches!(err, TagtasticError::MissingUnreleasedSection));
    }

    #[test]
    fn test_empty_template_becomes_placeholder() {
        let doc = fresh_changelog();
        let out = splice_release(&doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();

        let expected = format!(
            "# Changelog\n\nAll notable changes to this project.\n\n{UNRELEASED_TEMPLATE}\n\
             ## [0.1.0] – \"Almond\" – 2026-01-01\n\n\
             ### Added\n- Placeholder version entry for this release.\n\n\
             [Unreleased]: {REPO}/compare/v0.1.0...HEAD\n\
             [0.1.0]: {REPO}/releases/tag/v0.1.0\n"
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_blank_unreleased_body_becomes_placeholder() {
        let doc = "## [Unreleased]\n\n\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();
        assert!(out.contains("- Placeholder version entry for this release."));
        assert!(out.starts_with(UNRELEASED_HEADING));
    }

    #[test]
    fn test_unreleased_content_is_moved_verbatim() {
        let doc = "# Changelog\n\n## [Unreleased]\n\n### Added\n- Shell output format\n\n### Fixed\n- Crash on empty theme\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n\n### Added\n- Initial release\n\n[Unreleased]: https://example.com/compare/v0.1.0...HEAD\n[0.1.0]: https://example.com/releases/tag/v0.1.0\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.2.0", "Apricot", "2026-02-01"), REPO)
            .unwrap();

        let release = out.find("## [0.2.0] – \"Apricot\" – 2026-02-01").unwrap();
        let previous = out.find("## [0.1.0]").unwrap();
        let moved = out.find("- Shell output format").unwrap();
        assert!(release < moved && moved < previous);
        assert!(out.contains("### Fixed\n- Crash on empty theme\n\n## [0.1.0]"));

        let unreleased = out.find(UNRELEASED_HEADING).unwrap();
        assert!(unreleased < release);
        assert_eq!(out.matches(UNRELEASED_HEADING).count(), 1);
        assert!(out.contains("- Initial release"));
    }

    #[test]
    fn test_reference_links_compare_against_previous() {
        let doc = "## [Unreleased]\n\n### Added\n- x\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n\n- y\n\n[Unreleased]: https://old/compare/v0.1.0...HEAD\n[0.1.0]: https://old/releases/tag/v0.1.0\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.2.0", "Apricot", "2026-02-01"), REPO)
            .unwrap();

        let refs: Vec<&str> = out.lines().filter(|l| is_reference(l)).collect();
        assert_eq!(
            refs,
            vec![
                format!("[Unreleased]: {REPO}/compare/v0.2.0...HEAD").as_str(),
                format!("[0.2.0]: {REPO}/compare/v0.1.0...v0.2.0").as_str(),
                "[0.1.0]: https://old/releases/tag/v0.1.0",
            ]
        );
        assert!(out.ends_with("[0.1.0]: https://old/releases/tag/v0.1.0\n"));
    }

    #[test]
    fn test_reference_links_inside_unreleased_are_collected() {
        let doc = "## [Unreleased]\n- first feature\n\n[Unreleased]: https://old/compare/v0.0.0...HEAD\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();

        assert!(out.contains("## [0.1.0] – \"Almond\" – 2026-01-01\n\n- first feature\n"));
        assert_eq!(out.matches("[Unreleased]: ").count(), 1);
        assert!(out.contains(&format!("[Unreleased]: {REPO}/compare/v0.1.0...HEAD")));
    }

    #[test]
    fn test_splice_twice() {
        let first = splice_release(
            &fresh_changelog(),
            &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"),
            REPO,
        )
        .unwrap();
        let second = splice_release(
            &first,
            &ReleaseEntry::new("0.2.0", "Antique Brass", "2026-02-01"),
            REPO,
        )
        .unwrap();

        assert_eq!(
            release_headings(&second),
            vec![
                "## [0.2.0] – \"Antique Brass\" – 2026-02-01",
                "## [0.1.0] – \"Almond\" – 2026-01-01",
            ]
        );
        assert!(second.contains(&format!("[Unreleased]: {REPO}/compare/v0.2.0...HEAD")));
        assert!(second.contains(&format!("[0.2.0]: {REPO}/compare/v0.1.0...v0.2.0")));
        assert!(second.contains(&format!("[0.1.0]: {REPO}/releases/tag/v0.1.0")));
        assert_eq!(second.matches("[Unreleased]: ").count(), 1);
        assert_eq!(second.matches(UNRELEASED_HEADING).count(), 1);
    }

    #[test]
    fn test_resplicing_same_version_does_not_duplicate_link() {
        let doc = "## [Unreleased]\n\n[0.1.0]: https://old/releases/tag/v0.1.0\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();
        assert_eq!(out.matches("[0.1.0]: ").count(), 1);
    }

    #[test]
    fn test_duplicate_reference_links_are_collapsed() {
        let doc = "## [Unreleased]\n- x\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n\n- y\n\n[0.1.0]: https://old/releases/tag/v0.1.0\n[0.1.0]: https://old/releases/tag/v0.1.0\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.2.0", "Apricot", "2026-02-01"), REPO)
            .unwrap();

        assert_eq!(out.matches("[0.1.0]: ").count(), 1);
        assert!(out.contains(&format!("[0.2.0]: {REPO}/compare/v0.1.0...v0.2.0")));
    }

    #[test]
    fn test_second_unreleased_section_is_rejected() {
        let doc = "## [Unreleased]\n- a\n\n## [Unreleased]\n- b\n";
        let err = splice_release(doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap_err();
        assert!(matches!(err, TagtasticError::DuplicateUnreleasedSection));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_string_order_across_digit_widths() {
        // Known limitation: raw string order puts 9.0.0 above 10.0.0.
        let doc = "## [Unreleased]\n\n[10.0.0]: https://old/a\n[9.0.0]: https://old/b\n";
        let out = splice_release(doc, &ReleaseEntry::new("10.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();
        assert!(out.contains(&format!("[10.1.0]: {REPO}/compare/v9.0.0...v10.1.0")));
    }

    #[test]
    fn test_preamble_without_trailing_blank_line() {
        let doc = "# Changelog\n## [Unreleased]\n- thing\n";
        let out = splice_release(doc, &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"), REPO)
            .unwrap();
        assert!(out.starts_with("# Changelog\n## [Unreleased]\n"));
    }

    #[test]
    fn test_trailing_slash_in_repo_url() {
        let out = splice_release(
            "## [Unreleased]\n",
            &ReleaseEntry::new("0.1.0", "Almond", "2026-01-01"),
            "https://example.com/repo/",
        )
        .unwrap();
        assert!(out.contains("[0.1.0]: https://example.com/repo/releases/tag/v0.1.0"));
    }

    #[test]
    fn test_used_codenames() {
        let doc = "## [Unreleased]\n\n## [0.2.0] – \"Antique Brass\" – 2026-02-01\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n";
        let used = used_codenames(doc);
        assert_eq!(used.len(), 2);
        assert!(used.contains("Almond"));
        assert!(used.contains("Antique Brass"));
    }

    #[test]
    fn test_used_codenames_empty_document() {
        assert!(used_codenames("").is_empty());
    }

    #[test]
    fn test_latest_codename() {
        let doc = "## [Unreleased]\n\n## [0.2.0] – \"Antique Brass\" – 2026-02-01\n\n## [0.1.0] – \"Almond\" – 2026-01-01\n";
        assert_eq!(latest_codename(doc), Some("Antique Brass".to_string()));
        assert_eq!(latest_codename("## [Unreleased]\n"), None);
    }
}
