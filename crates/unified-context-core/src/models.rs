//! Core data models for the unified context store.
//!
//! A [`ContextItem`] is one unit of information a user selected to ground an
//! AI request. The variant-specific payload lives in [`ContextKind`]; the
//! storage bucket it belongs to is its [`ContextCategory`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One entry of a search-result bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub path: String,
    pub title: String,
    pub content: String,
}

/// Variant-specific payload of a context item.
///
/// Serialized as an internally tagged object (`"kind": "file"`, …) so it can
/// be flattened into [`ContextItem`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContextKind {
    File {
        path: String,
        title: String,
        content: String,
    },
    Folder {
        path: String,
        name: String,
    },
    #[serde(rename = "youtube")]
    YouTubeVideo {
        video_id: String,
        title: String,
        transcript: String,
    },
    Tag {
        name: String,
    },
    CapturedData {
        payload: serde_json::Value,
    },
    #[serde(rename = "search")]
    SearchResult {
        query: String,
        results: Vec<SearchHit>,
    },
}

impl ContextKind {
    /// The registry collection this payload is stored in.
    pub fn category(&self) -> ContextCategory {
        match self {
            ContextKind::File { .. } => ContextCategory::File,
            ContextKind::Folder { .. } => ContextCategory::Folder,
            ContextKind::YouTubeVideo { .. } => ContextCategory::YouTube,
            ContextKind::Tag { .. } => ContextCategory::Tag,
            ContextKind::CapturedData { .. } => ContextCategory::CapturedData,
            ContextKind::SearchResult { .. } => ContextCategory::Search,
        }
    }
}

/// A single context item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextItem {
    /// Identity key, unique within the item's category.
    pub id: String,
    /// Short human-readable description of the item's kind (e.g. `"File"`).
    pub reference: String,
    /// Milliseconds since the Unix epoch at construction. Never mutated.
    pub created_at: i64,
    #[serde(flatten)]
    pub kind: ContextKind,
}

impl ContextItem {
    pub fn category(&self) -> ContextCategory {
        self.kind.category()
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, ContextKind::File { .. })
    }

    /// Display label used in rendered prompts and CLI listings.
    pub fn label(&self) -> &str {
        match &self.kind {
            ContextKind::File { title, .. } => title,
            ContextKind::Folder { name, .. } => name,
            ContextKind::YouTubeVideo { title, .. } => title,
            ContextKind::Tag { name } => name,
            ContextKind::CapturedData { .. } => &self.id,
            ContextKind::SearchResult { query, .. } => query,
        }
    }
}

/// Storage bucket of the item registry.
///
/// The string form (`"file"`, `"tag"`, …) is used by session scripts and the
/// `--type` CLI flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextCategory {
    File,
    Folder,
    #[serde(rename = "youtube")]
    YouTube,
    Tag,
    CapturedData,
    Search,
}

impl ContextCategory {
    pub const ALL: [ContextCategory; 6] = [
        ContextCategory::File,
        ContextCategory::Folder,
        ContextCategory::YouTube,
        ContextCategory::Tag,
        ContextCategory::CapturedData,
        ContextCategory::Search,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContextCategory::File => "file",
            ContextCategory::Folder => "folder",
            ContextCategory::YouTube => "youtube",
            ContextCategory::Tag => "tag",
            ContextCategory::CapturedData => "captured_data",
            ContextCategory::Search => "search",
        }
    }
}

impl fmt::Display for ContextCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a [`ContextCategory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseCategoryError(pub String);

impl fmt::Display for ParseCategoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown context category '{}'. Must be one of: file, folder, youtube, tag, captured_data, search",
            self.0
        )
    }
}

impl std::error::Error for ParseCategoryError {}

impl FromStr for ContextCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContextCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| ParseCategoryError(s.to_string()))
    }
}
