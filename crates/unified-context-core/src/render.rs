//! Render a unified context into the text handed to an AI request.
//!
//! Two shapes are supported: a Markdown block with one section per item,
//! and the raw items as a JSON array.

use std::borrow::Cow;

use crate::models::{ContextItem, ContextKind};

pub const DEFAULT_MAX_CONTENT_CHARS: usize = 4000;

/// Rendering knobs, decoupled from application config.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Long bodies (file content, transcripts, search hits) are cut to this
    /// many characters.
    pub max_content_chars: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => Cow::Owned(format!("{}…", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}

fn push_body(out: &mut String, body: &str, opts: &RenderOptions) {
    if body.is_empty() {
        return;
    }
    out.push('\n');
    out.push_str(&truncate(body, opts.max_content_chars));
    out.push('\n');
}

fn render_item(item: &ContextItem, opts: &RenderOptions) -> String {
    let mut out = String::new();
    match &item.kind {
        ContextKind::File {
            path,
            title,
            content,
        } => {
            out.push_str(&format!("## {}: {}\nPath: {}\n", item.reference, title, path));
            push_body(&mut out, content, opts);
        }
        ContextKind::Folder { path, name } => {
            out.push_str(&format!("## {}: {}\nPath: {}\n", item.reference, name, path));
        }
        ContextKind::YouTubeVideo {
            video_id,
            title,
            transcript,
        } => {
            out.push_str(&format!(
                "## {}: {}\nVideo: {}\n",
                item.reference, title, video_id
            ));
            push_body(&mut out, transcript, opts);
        }
        ContextKind::Tag { name } => {
            out.push_str(&format!("## {}: #{}\n", item.reference, name));
        }
        ContextKind::CapturedData { payload } => {
            out.push_str(&format!("## {}\n\n```json\n{:#}\n```\n", item.reference, payload));
        }
        ContextKind::SearchResult { query, results } => {
            out.push_str(&format!("## {}: {}\n", item.reference, query));
            for hit in results {
                out.push_str(&format!("\n### {}\nPath: {}\n", hit.title, hit.path));
                push_body(&mut out, &hit.content, opts);
            }
        }
    }
    out
}

/// Markdown block with one `##` section per item, in the given order.
pub fn render_markdown(items: &[ContextItem], opts: &RenderOptions) -> String {
    items
        .iter()
        .map(|item| render_item(item, opts))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The items as a pretty-printed JSON array.
pub fn render_json(items: &[ContextItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(items)
}
