// SPDX-FileCopyrightText: 2026 Solace Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversational memory for the Solace SMS agent.
//!
//! A memory window is recomputed on every call: the most recent messages
//! involving a user, plus a random sample of older ones, returned oldest
//! first so it can be replayed to the completion provider as history.

pub mod retriever;
pub mod window;

pub use retriever::{MemoryRetriever, render_transcript};
pub use window::MemoryWindow;
