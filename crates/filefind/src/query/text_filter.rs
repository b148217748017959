//! Substring and extension filters over path projections.
//!
//! Expression syntax:
//! - `a|b` matches when the projection contains any token
//! - `a&b` matches when the projection contains every token
//!
//! The operators do not mix: once `&` appears every `|` is read as `&`.
//! Extension filters compare for equality and always use any-match.

use super::ext_class::expand_extension_classes;
use super::record::{sanitize_extension, FileRecord};

/// Which projection of a record a string filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringPart {
    /// Base name without extension.
    Name,
    /// Directory.
    Path,
    /// Full lowercased path.
    Any,
    /// Extension.
    Ext,
}

impl StringPart {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Any => "any",
            Self::Ext => "ext",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenMode {
    /// Logical OR over tokens.
    Any,
    /// Logical AND over tokens.
    All,
}

#[derive(Debug, Clone)]
pub struct StringFilter {
    part: StringPart,
    mode: TokenMode,
    tokens: Vec<String>,
    case_sensitive: bool,
}

impl StringFilter {
    /// Parses a raw user expression; `None` when it holds no tokens.
    ///
    /// `case_sensitive` only applies to name and path filters.
    pub fn parse(part: StringPart, raw: &str, case_sensitive: bool) -> Option<Self> {
        let case_sensitive = case_sensitive && matches!(part, StringPart::Name | StringPart::Path);

        let (mode, tokens) = if part == StringPart::Ext {
            let tokens = split_tokens(raw, &['|', '&'])
                .map(sanitize_extension)
                .filter(|token| !token.is_empty())
                .collect::<Vec<_>>();
            (TokenMode::Any, expand_extension_classes(tokens))
        } else if raw.contains('&') {
            let rewritten = raw.replace('|', "&");
            (TokenMode::All, collect_tokens(&rewritten, '&', case_sensitive))
        } else {
            (TokenMode::Any, collect_tokens(raw, '|', case_sensitive))
        };

        if tokens.is_empty() {
            return None;
        }
        Some(Self {
            part,
            mode,
            tokens,
            case_sensitive,
        })
    }

    pub fn part(&self) -> StringPart {
        self.part
    }

    pub fn mode(&self) -> TokenMode {
        self.mode
    }

    pub fn tokens(&self) -> &[String] {
        self.tokens.as_slice()
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        match self.part {
            StringPart::Ext => self
                .tokens
                .iter()
                .any(|token| *token == record.extension),
            StringPart::Name => self.contains(record.base_name.as_str()),
            StringPart::Path => self.contains(record.directory.as_str()),
            StringPart::Any => self.contains(record.path.to_lowercase().as_str()),
        }
    }

    fn contains(&self, projection: &str) -> bool {
        let lowered;
        let projection = if self.case_sensitive || self.part == StringPart::Any {
            projection
        } else {
            lowered = projection.to_lowercase();
            lowered.as_str()
        };
        match self.mode {
            TokenMode::Any => self
                .tokens
                .iter()
                .any(|token| projection.contains(token.as_str())),
            TokenMode::All => self
                .tokens
                .iter()
                .all(|token| projection.contains(token.as_str())),
        }
    }
}

fn split_tokens<'a>(raw: &'a str, separators: &'a [char]) -> impl Iterator<Item = &'a str> {
    raw.split(separators)
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn collect_tokens(raw: &str, separator: char, case_sensitive: bool) -> Vec<String> {
    split_tokens(raw, &[separator])
        .map(|token| {
            if case_sensitive {
                token.to_string()
            } else {
                token.to_lowercase()
            }
        })
        .collect()
}
