//! Toolset selection from user input.
//!
//! A selection comes from command-line flags, environment variables or the
//! configuration file. Malformed input never fails: blank and repeated
//! names are dropped, and an empty result falls back to the default group.

use std::str::FromStr;

use crate::registry::DEFAULT_GROUP;

/// Which toolsets to enable at activation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ToolsetSelection {
    /// No selection given; enables [`DEFAULT_GROUP`].
    #[default]
    Default,
    /// Comma-separated list, e.g. `"rds, custom"`.
    Delimited(String),
    /// Explicit ordered list of group names.
    List(Vec<String>),
}

impl ToolsetSelection {
    /// Resolve the selection into an ordered list of group names.
    ///
    /// The result is never empty.
    pub fn groups(&self) -> Vec<String> {
        let groups = match self {
            Self::Default => Vec::new(),
            Self::Delimited(raw) => parse_toolsets(raw),
            Self::List(names) => dedup_names(names.iter().map(|name| name.trim())),
        };
        if groups.is_empty() {
            vec![DEFAULT_GROUP.to_string()]
        } else {
            groups
        }
    }
}

impl From<&str> for ToolsetSelection {
    fn from(raw: &str) -> Self {
        Self::Delimited(raw.to_string())
    }
}

impl From<String> for ToolsetSelection {
    fn from(raw: String) -> Self {
        Self::Delimited(raw)
    }
}

impl From<Vec<String>> for ToolsetSelection {
    fn from(names: Vec<String>) -> Self {
        Self::List(names)
    }
}

impl<S: Into<ToolsetSelection>> From<Option<S>> for ToolsetSelection {
    fn from(value: Option<S>) -> Self {
        value.map_or(Self::Default, Into::into)
    }
}

impl FromStr for ToolsetSelection {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(raw))
    }
}

/// Split a comma-separated toolset list.
///
/// Tokens are trimmed; blank and repeated tokens are dropped. The result
/// may be empty; [`ToolsetSelection::groups`] applies the default.
pub fn parse_toolsets(raw: &str) -> Vec<String> {
    dedup_names(raw.split(',').map(str::trim))
}

fn dedup_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut groups: Vec<String> = Vec::new();
    for name in names {
        if !name.is_empty() && !groups.iter().any(|g| g == name) {
            groups.push(name.to_string());
        }
    }
    groups
}
