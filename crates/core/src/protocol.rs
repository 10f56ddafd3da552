// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Wire frames exchanged over the persistent connection.
//!
//! The protocol is simple:
//! - The server pushes a snapshot (`INITIAL`), pages of the remainder
//!   (`PAGE`), and live item events (`ADDED`/`MODIFIED`/`DELETED`)
//! - The client requests further pages with `SCROLL`
//!
//! Unknown inbound frame types decode to [`InboundFrame::Unknown`] and are
//! ignored rather than rejected; unparsable payloads produce a JSON error
//! the receive path drops silently.

use serde::{Deserialize, Serialize};

use crate::item::Item;

/// Frames sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum InboundFrame {
    /// Consistent snapshot of the first page of the collection.
    ///
    /// Resets the store. The server may send this at any time (for example
    /// instead of replaying events after a reconnect).
    #[serde(rename = "INITIAL", rename_all = "camelCase")]
    Initial {
        #[serde(default)]
        items: Vec<Item>,
        /// Cursor for the next page; present when more pages exist.
        #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
        continue_token: Option<String>,
        /// Collection-level version of the snapshot.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        resource_version: Option<String>,
    },

    /// One page of the remainder of the snapshot, in response to `SCROLL`.
    #[serde(rename = "PAGE")]
    Page {
        #[serde(default)]
        items: Vec<Item>,
        /// Replaces the previous continuation token; absent when exhausted.
        #[serde(rename = "continue", default, skip_serializing_if = "Option::is_none")]
        continue_token: Option<String>,
    },

    /// A page request failed. Data-level only; the connection stays open.
    #[serde(rename = "PAGE_ERROR")]
    PageError { error: String },

    /// The initial snapshot failed. Data-level only.
    #[serde(rename = "INITIAL_ERROR")]
    InitialError { message: String },

    /// A live item appeared.
    #[serde(rename = "ADDED")]
    Added { item: Item },

    /// A live item changed.
    #[serde(rename = "MODIFIED")]
    Modified { item: Item },

    /// A live item was removed.
    #[serde(rename = "DELETED")]
    Deleted { item: Item },

    /// Informational server-side log line. Never touches the store.
    #[serde(rename = "SERVER_LOG")]
    ServerLog {
        #[serde(default)]
        message: Option<String>,
    },

    /// Any frame type this client does not know about.
    #[serde(other)]
    Unknown,
}

/// Frames sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum OutboundFrame {
    /// Request the next page of the current snapshot.
    #[serde(rename = "SCROLL")]
    Scroll {
        /// The server-issued continuation token from the previous page.
        #[serde(rename = "continue")]
        continue_token: String,
        /// Page size hint.
        limit: u32,
    },
}

impl InboundFrame {
    /// Creates an Initial frame.
    pub fn initial(
        items: Vec<Item>,
        continue_token: Option<String>,
        resource_version: Option<String>,
    ) -> Self {
        InboundFrame::Initial {
            items,
            continue_token,
            resource_version,
        }
    }

    /// Creates a Page frame.
    pub fn page(items: Vec<Item>, continue_token: Option<String>) -> Self {
        InboundFrame::Page {
            items,
            continue_token,
        }
    }

    /// Creates a PageError frame.
    pub fn page_error(error: impl Into<String>) -> Self {
        InboundFrame::PageError {
            error: error.into(),
        }
    }

    /// Creates an InitialError frame.
    pub fn initial_error(message: impl Into<String>) -> Self {
        InboundFrame::InitialError {
            message: message.into(),
        }
    }

    /// Creates an Added frame.
    pub fn added(item: Item) -> Self {
        InboundFrame::Added { item }
    }

    /// Creates a Modified frame.
    pub fn modified(item: Item) -> Self {
        InboundFrame::Modified { item }
    }

    /// Creates a Deleted frame.
    pub fn deleted(item: Item) -> Self {
        InboundFrame::Deleted { item }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a frame from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

impl OutboundFrame {
    /// Creates a Scroll frame.
    pub fn scroll(continue_token: impl Into<String>, limit: u32) -> Self {
        OutboundFrame::Scroll {
            continue_token: continue_token.into(),
            limit,
        }
    }

    /// Serializes the frame to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a frame from JSON.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
