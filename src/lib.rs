//! # Unified Context
//!
//! Assembles the files, folders, tags, YouTube transcripts, captured data,
//! and search results a user selected into one ordered list for an AI
//! prompt.
//!
//! The store itself lives in [`unified_context_core`]; this crate adds the
//! configuration layer, session scripts, and the `uctx` CLI that replays a
//! script and prints the rendered context.
//!
//! ```text
//! ┌──────────────┐   ┌───────────────┐   ┌────────────┐
//! │ Session ops  │──▶│ ContextStore  │──▶│  Renderer  │
//! │ (UI / JSONL) │   │ registry+slot │   │ md / json  │
//! └──────────────┘   └───────────────┘   └────────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`script`] | Session script format and replay driver |
//! | [`replay`] | `uctx replay` / `uctx check` commands |

pub mod config;
pub mod replay;
pub mod script;
