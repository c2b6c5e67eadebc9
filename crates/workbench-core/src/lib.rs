#![warn(missing_docs)]
//! Workbench Core - Query Editor Text-Manipulation Kernel
//!
//! # Overview
//!
//! `workbench-core` is the headless core of a SQL query editor: a line-indexed markup document,
//! a normalized selection model over it, and a reversible edit log that records every kind of
//! edit the editor performs and replays them for undo and redo. It also carries the small data
//! structures the autocomplete layer ranks suggestions with.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  QueryEditor (host mutations + replay)      │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  RecordManager (back/forward history)       │  ← Undo / Redo
//! ├─────────────────────────────────────────────┤
//! │  SelectionManager (line/column ranges)      │  ← Selection
//! ├─────────────────────────────────────────────┤
//! │  MarkupDocument + line styling              │  ← Document
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use workbench_core::{Position, QueryEditor};
//!
//! let mut editor = QueryEditor::new("SELECT");
//! editor.set_caret(Position::new(0, 6));
//! editor.insert_text(" *");
//! assert_eq!(editor.text(), "SELECT *");
//!
//! assert!(editor.undo());
//! assert_eq!(editor.text(), "SELECT");
//! assert!(editor.redo());
//! assert_eq!(editor.text(), "SELECT *");
//! ```
//!
//! # Module Description
//!
//! - [`linked_list`] - Arena-backed doubly linked list
//! - [`lru`] - Fixed-capacity recency ranking
//! - [`id_pool`] - Smallest-free integer allocator
//! - [`selection`] - Selection model over a line-indexed document
//! - [`document`] - In-memory markup document
//! - [`styling`] - Regex-based line styling
//! - [`records`] - Edit record log
//! - [`editor`] - Query editor host

pub mod document;
pub mod editor;
pub mod id_pool;
pub mod linked_list;
pub mod lru;
pub mod records;
pub mod selection;
pub mod styling;

pub use document::{Inline, Line, MarkupDocument, NodeRef, split_lines};
pub use editor::{LineDirection, QueryEditor};
pub use id_pool::{IdPool, IdPoolError};
pub use linked_list::{DoublyLinkedList, NodeHandle};
pub use lru::{FallbackComparator, LruList};
pub use records::{DeletionDirection, Record, RecordAction, RecordKind, RecordManager};
pub use selection::{
    CharDirection, LineIndexedDocument, Position, RawSelection, SelectionInfo, SelectionManager,
};
pub use styling::{
    KeywordStyles, StyleClass, StyleType, classify, render_line, style_tokenize,
};
