//! Embedded codename themes
//!
//! Theme data ships inside the binary (`themes.toml`) and is looked up by a
//! normalized name, so "Crayola Colors", "crayola_colors" and
//! "crayola-colors" all resolve to the same theme.

use crate::error::{Result, TagtasticError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

const EMBEDDED_THEMES: &str = include_str!("themes.toml");

/// Theme used for release codenames
pub const DEFAULT_THEME: &str = "crayola_colors";

/// A single codename entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeName {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl CodeName {
    pub fn new(name: impl Into<String>) -> Self {
        CodeName {
            name: name.into(),
            aliases: Vec::new(),
            description: String::new(),
        }
    }

    /// True when `needle` (already normalized) matches the name or an alias
    fn matches(&self, needle: &str) -> bool {
        std::iter::once(&self.name)
            .chain(self.aliases.iter())
            .any(|candidate| normalize_name(candidate) == needle)
    }
}

/// A named collection of codenames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub items: Vec<CodeName>,
}

#[derive(Debug, Deserialize)]
struct ThemeFile {
    #[serde(default)]
    #[allow(dead_code)]
    version: String,
    #[serde(default)]
    themes: BTreeMap<String, Theme>,
}

/// Read access to codename themes
pub trait ThemeRepository {
    /// Look up a theme by (normalized) name
    fn theme_by_name(&self, name: &str) -> Result<&Theme>;

    /// All theme ids, sorted
    fn theme_names(&self) -> Vec<String>;
}

/// Themes parsed from the data embedded in the binary
#[derive(Debug, Clone)]
pub struct EmbeddedThemeRepository {
    themes: HashMap<String, Theme>,
    names: Vec<String>,
}

impl EmbeddedThemeRepository {
    /// Load the embedded theme data
    pub fn new() -> Result<Self> {
        Self::from_toml(EMBEDDED_THEMES)
    }

    /// Load themes from a TOML document with a `[themes.<id>]` table per theme
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: ThemeFile = toml::from_str(source)
            .map_err(|e| TagtasticError::config(format!("parse themes: {}", e)))?;

        let mut themes = HashMap::new();
        let mut names = Vec::new();
        for (key, mut theme) in file.themes {
            if theme.id.is_empty() {
                theme.id = key.clone();
            }
            names.push(theme.id.clone());
            themes.insert(normalize_name(&key), theme);
        }
        names.sort();

        Ok(EmbeddedThemeRepository { themes, names })
    }
}

impl ThemeRepository for EmbeddedThemeRepository {
    fn theme_by_name(&self, name: &str) -> Result<&Theme> {
        if name.trim().is_empty() {
            return Err(TagtasticError::usage("theme name is required"));
        }
        self.themes
            .get(&normalize_name(name))
            .ok_or_else(|| TagtasticError::ThemeNotFound(name.to_string()))
    }

    fn theme_names(&self) -> Vec<String> {
        self.names.clone()
    }
}

/// Lowercase, trim, and collapse runs of anything other than `[a-z0-9]`
/// into a single `-`.
///
/// "Blue Heron" -> "blue-heron", "crayola_colors" -> "crayola-colors"
pub fn normalize_name(input: &str) -> String {
    let lowered = input.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    match Regex::new(r"[^a-z0-9]+") {
        Ok(re) => re.replace_all(&lowered, "-").trim_matches('-').to_string(),
        Err(_) => lowered,
    }
}

/// Items whose name and aliases are not in `exclude` (compared normalized)
pub fn filter_items(items: &[CodeName], exclude: &[String]) -> Vec<CodeName> {
    let deny: HashSet<String> = exclude
        .iter()
        .map(|raw| normalize_name(raw))
        .filter(|key| !key.is_empty())
        .collect();

    if deny.is_empty() {
        return items.to_vec();
    }

    items
        .iter()
        .filter(|item| {
            !std::iter::once(&item.name)
                .chain(item.aliases.iter())
                .any(|candidate| deny.contains(&normalize_name(candidate)))
        })
        .cloned()
        .collect()
}

/// True when `name` matches an item name or alias
pub fn contains_name(items: &[CodeName], name: &str) -> bool {
    let needle = normalize_name(name);
    if needle.is_empty() {
        return false;
    }
    items.iter().any(|item| item.matches(&needle))
}
