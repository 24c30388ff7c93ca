//! Factory helpers that turn raw UI inputs into well-formed context items.
//!
//! Ids are derived deterministically where the input allows it:
//!
//! | Variant | id |
//! |---------|----|
//! | File | the file path |
//! | Folder | the folder path |
//! | YouTube video | `youtube-{video_id}` |
//! | Tag | `tag-{name}` |
//! | Captured data | `captured-{uuid}` |
//! | Search results | `search-{created_at}` |
//!
//! Captured data and searches get fresh ids, so repeating them produces new
//! entries instead of overwriting. Two searches stamped in the same
//! millisecond become `search-{created_at}` and `search-{created_at}-1`.
//! Degenerate input (an empty path or tag name) yields a degenerate id and
//! is stored like any other.

use serde_json::Value;

use crate::models::{ContextItem, ContextKind, SearchHit};
use crate::store::ContextStore;

pub const FILE_REFERENCE: &str = "File";
pub const FOLDER_REFERENCE: &str = "Folder";
pub const YOUTUBE_REFERENCE: &str = "YouTube Video";
pub const TAG_REFERENCE: &str = "Tag";
pub const CAPTURED_DATA_REFERENCE: &str = "Captured Data";
pub const SEARCH_REFERENCE: &str = "Search Results";

pub const YOUTUBE_ID_PREFIX: &str = "youtube-";
pub const TAG_ID_PREFIX: &str = "tag-";
pub const CAPTURED_ID_PREFIX: &str = "captured-";
pub const SEARCH_ID_PREFIX: &str = "search-";

/// Last non-empty `/`-separated segment of `path`, or `path` itself.
pub fn folder_name(path: &str) -> &str {
    path.rsplit('/').find(|s| !s.is_empty()).unwrap_or(path)
}

impl ContextItem {
    pub fn file(
        path: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created_at: i64,
    ) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            reference: FILE_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::File {
                path,
                title: title.into(),
                content: content.into(),
            },
        }
    }

    /// Folder item named after the last segment of `path`.
    pub fn folder(path: impl Into<String>, created_at: i64) -> Self {
        let path = path.into();
        let name = folder_name(&path).to_string();
        Self {
            id: path.clone(),
            reference: FOLDER_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::Folder { path, name },
        }
    }

    pub fn youtube_video(
        video_id: impl Into<String>,
        title: impl Into<String>,
        transcript: impl Into<String>,
        created_at: i64,
    ) -> Self {
        let video_id = video_id.into();
        Self {
            id: format!("{}{}", YOUTUBE_ID_PREFIX, video_id),
            reference: YOUTUBE_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::YouTubeVideo {
                video_id,
                title: title.into(),
                transcript: transcript.into(),
            },
        }
    }

    pub fn tag(name: impl Into<String>, created_at: i64) -> Self {
        let name = name.into();
        Self {
            id: format!("{}{}", TAG_ID_PREFIX, name),
            reference: TAG_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::Tag { name },
        }
    }

    pub fn captured_data(payload: Value, created_at: i64) -> Self {
        Self {
            id: format!("{}{}", CAPTURED_ID_PREFIX, uuid::Uuid::new_v4()),
            reference: CAPTURED_DATA_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::CapturedData { payload },
        }
    }

    /// Search bundle keyed by its creation time.
    pub fn search_results(query: impl Into<String>, results: Vec<SearchHit>, created_at: i64) -> Self {
        Self {
            id: format!("{}{}", SEARCH_ID_PREFIX, created_at),
            reference: SEARCH_REFERENCE.to_string(),
            created_at,
            kind: ContextKind::SearchResult {
                query: query.into(),
                results,
            },
        }
    }
}

/// Store-side helpers: build, stamp with the store clock, and add.
///
/// Each returns the item as stored.
impl ContextStore {
    fn now(&self) -> i64 {
        self.clock().now_millis()
    }

    fn store(&self, item: ContextItem) -> ContextItem {
        self.add_item(item.clone());
        item
    }

    pub fn add_file(&self, path: &str, title: &str, content: &str) -> ContextItem {
        let item = ContextItem::file(path, title, content, self.now());
        self.store(item)
    }

    pub fn add_folder(&self, path: &str) -> ContextItem {
        let item = ContextItem::folder(path, self.now());
        self.store(item)
    }

    pub fn add_youtube_video(&self, video_id: &str, title: &str, transcript: &str) -> ContextItem {
        let item = ContextItem::youtube_video(video_id, title, transcript, self.now());
        self.store(item)
    }

    pub fn add_tag(&self, name: &str) -> ContextItem {
        let item = ContextItem::tag(name, self.now());
        self.store(item)
    }

    pub fn add_captured_data(&self, payload: Value) -> ContextItem {
        let item = ContextItem::captured_data(payload, self.now());
        self.store(item)
    }

    /// Never overwrites an earlier search, even one from the same millisecond.
    pub fn add_search_results(&self, query: &str, results: Vec<SearchHit>) -> ContextItem {
        let item = ContextItem::search_results(query, results, self.now());
        self.add_item_with_fresh_id(item)
    }

    /// Build a File item and place it in the current-file slot.
    pub fn set_current_file_from(&self, path: &str, title: &str, content: &str) -> ContextItem {
        let item = ContextItem::file(path, title, content, self.now());
        self.set_current_file(Some(item.clone()));
        item
    }
}
