//! Session scripts: JSON Lines files of store operations.
//!
//! Each non-blank line that does not start with `#` is one operation,
//! tagged by `op`:
//!
//! ```text
//! # open a note and tag it
//! {"op": "clock_set", "at": 100}
//! {"op": "add_file", "path": "a.md", "title": "A", "content": "alpha"}
//! {"op": "clock_advance", "ms": 100}
//! {"op": "add_tag", "name": "x"}
//! {"op": "set_current_file", "path": "c.md", "title": "C"}
//! {"op": "remove", "category": "tag", "id": "tag-x"}
//! ```
//!
//! `clock_set` and `clock_advance` drive the session's [`ManualClock`], so a
//! script fully determines the resulting order. After every op that creates
//! an item the clock steps forward 1 ms, so back-to-back adds without clock
//! ops still come out newest first.

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

use unified_context_core::clock::{Clock, ManualClock, SystemClock};
use unified_context_core::models::{ContextCategory, SearchHit};
use unified_context_core::store::ContextStore;

/// One inbound operation against the store.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum SessionOp {
    AddFile {
        path: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    AddFolder {
        path: String,
    },
    AddYoutubeVideo {
        video_id: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        transcript: String,
    },
    AddTag {
        name: String,
    },
    AddCapturedData {
        payload: Value,
    },
    AddSearchResults {
        query: String,
        #[serde(default)]
        results: Vec<SearchHit>,
    },
    SetCurrentFile {
        path: String,
        #[serde(default)]
        title: String,
        #[serde(default)]
        content: String,
    },
    ClearCurrentFile,
    ToggleCurrentFile,
    Remove {
        category: ContextCategory,
        id: String,
    },
    ClearAll,
    ClockSet {
        at: i64,
    },
    ClockAdvance {
        ms: i64,
    },
}

impl SessionOp {
    /// Whether applying this op stamps a new item with the clock.
    pub fn creates_item(&self) -> bool {
        matches!(
            self,
            SessionOp::AddFile { .. }
                | SessionOp::AddFolder { .. }
                | SessionOp::AddYoutubeVideo { .. }
                | SessionOp::AddTag { .. }
                | SessionOp::AddCapturedData { .. }
                | SessionOp::AddSearchResults { .. }
                | SessionOp::SetCurrentFile { .. }
        )
    }
}

/// Parse a JSON Lines script. Errors name the 1-based line number.
pub fn parse_script(text: &str) -> Result<Vec<SessionOp>> {
    let mut ops = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let op: SessionOp = serde_json::from_str(line)
            .with_context(|| format!("line {}: invalid session operation", idx + 1))?;
        ops.push(op);
    }
    Ok(ops)
}

/// A store paired with the manual clock that stamps it.
pub struct Session {
    store: ContextStore,
    clock: Arc<ManualClock>,
}

impl Session {
    /// Fresh session whose clock starts at the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.now_millis())
    }

    pub fn starting_at(millis: i64) -> Self {
        let clock = Arc::new(ManualClock::new(millis));
        Self {
            store: ContextStore::with_clock(clock.clone()),
            clock,
        }
    }

    pub fn store(&self) -> &ContextStore {
        &self.store
    }

    pub fn apply(&self, op: &SessionOp) {
        trace!(?op, "applying session operation");
        let store = &self.store;
        match op {
            SessionOp::AddFile {
                path,
                title,
                content,
            } => {
                store.add_file(path, title, content);
            }
            SessionOp::AddFolder { path } => {
                store.add_folder(path);
            }
            SessionOp::AddYoutubeVideo {
                video_id,
                title,
                transcript,
            } => {
                store.add_youtube_video(video_id, title, transcript);
            }
            SessionOp::AddTag { name } => {
                store.add_tag(name);
            }
            SessionOp::AddCapturedData { payload } => {
                store.add_captured_data(payload.clone());
            }
            SessionOp::AddSearchResults { query, results } => {
                store.add_search_results(query, results.clone());
            }
            SessionOp::SetCurrentFile {
                path,
                title,
                content,
            } => {
                store.set_current_file_from(path, title, content);
            }
            SessionOp::ClearCurrentFile => {
                store.set_current_file(None);
            }
            SessionOp::ToggleCurrentFile => {
                store.toggle_current_file();
            }
            SessionOp::Remove { category, id } => {
                store.remove_item(*category, id);
            }
            SessionOp::ClearAll => store.clear_all(),
            SessionOp::ClockSet { at } => self.clock.set(*at),
            SessionOp::ClockAdvance { ms } => self.clock.advance(*ms),
        }
        if op.creates_item() {
            self.clock.advance(1);
        }
    }

    pub fn replay(&self, ops: &[SessionOp]) {
        for op in ops {
            self.apply(op);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
