// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! reflector-core: data model and wire protocol for the reflector sync engine
//!
//! This crate provides the pure pieces of the list-then-watch engine: item
//! identity, version-token ordering, the store reducer, the frame protocol,
//! and watch-URL construction. It performs no I/O and spawns no tasks.

pub mod error;
pub mod item;
pub mod protocol;
pub mod query;
pub mod store;
pub mod version;

pub use error::{Error, Result};
pub use item::{Item, Metadata};
pub use protocol::{InboundFrame, OutboundFrame};
pub use query::ResourceQuery;
pub use store::{reduce, Action, Store};
