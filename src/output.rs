//! Output formatting for codenames and theme listings

use crate::error::{Result, TagtasticError};
use crate::themes::{normalize_name, CodeName};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain names, one per line
    #[default]
    Text,
    /// Pretty-printed JSON
    Json,
    /// `KEY=value` lines for `eval` in shell scripts
    Shell,
}

impl FromStr for OutputFormat {
    type Err = TagtasticError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "shell" => Ok(OutputFormat::Shell),
            _ => Err(TagtasticError::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Shell => write!(f, "shell"),
        }
    }
}

#[derive(Serialize)]
struct NamePayload<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    aliases: &'a [String],
    #[serde(skip_serializing_if = "str::is_empty")]
    description: &'a str,
}

impl OutputFormat {
    /// Render a single codename
    pub fn render_one(&self, item: &CodeName) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(item.name.clone()),
            OutputFormat::Json => {
                let payload = NamePayload {
                    name: &item.name,
                    aliases: &item.aliases,
                    description: &item.description,
                };
                Ok(serde_json::to_string_pretty(&payload)?)
            }
            OutputFormat::Shell => Ok(format!("RELEASE_CODENAME={}", alias_or_slug(item))),
        }
    }

    /// Render a list of codenames
    pub fn render_many(&self, items: &[CodeName]) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
            OutputFormat::Text | OutputFormat::Shell => Ok(items
                .iter()
                .map(|item| item.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Render a list of theme ids
    pub fn render_names(&self, names: &[String]) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(names)?),
            OutputFormat::Text | OutputFormat::Shell => Ok(names.join("\n")),
        }
    }
}

fn alias_or_slug(item: &CodeName) -> String {
    if let Some(alias) = item.aliases.first().map(|a| a.trim()) {
        if !alias.is_empty() {
            return alias.to_string();
        }
    }

    let slug = normalize_name(&item.name);
    if slug.is_empty() {
        "unknown".to_string()
    } else {
        slug
    }
}
