/// Glob used to list release tags
pub const RELEASE_TAG_GLOB: &str = "v*";

/// Represents a release tag such as `v1.2.3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    /// Create a new tag from a string
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }

    /// Tag for a version string (e.g., "1.2.3" -> "v1.2.3")
    pub fn for_version(version: &str) -> Self {
        Tag::new(format!("v{}", version.trim_start_matches('v')))
    }

    /// Extract version number from tag (e.g., "v1.2.3" -> "1.2.3")
    pub fn version_part(&self) -> &str {
        self.name.trim_start_matches('v').trim_start_matches('V')
    }

    /// Annotation message recorded on the tag, e.g. "v1.2.3 – Almond"
    pub fn annotation(&self, codename: &str) -> String {
        format!("{} – {}", self.name, codename)
    }
}

/// Extract the codename from a tag annotation subject.
///
/// Accepts both "v1.2.3 – Almond" and "v1.2.3 - Almond".
pub fn codename_from_annotation(message: &str) -> Option<String> {
    let message = message.trim();
    let rest = message
        .find("– ")
        .map(|idx| &message[idx + "– ".len()..])
        .or_else(|| message.find("- ").map(|idx| &message[idx + "- ".len()..]))?;

    let codename = rest.trim();
    if codename.is_empty() {
        None
    } else {
        Some(codename.to_string())
    }
}
