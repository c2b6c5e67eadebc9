#![warn(missing_docs)]
//! Workbench Complete - Hierarchical Autocomplete for the Query Editor
//!
//! # Overview
//!
//! `workbench-complete` answers "what can be typed here?" for the query editor. Static keywords
//! live in a [`PrefixTrie`] that also styles them in the editor. Database, schema and table
//! names live in nested tries filled on demand from a remote namespace service and cached for
//! a TTL; when the service is unreachable, the last known entries are still offered.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Completer (prefix → ranked suggestions)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  SuggestionRanker (recent first)            │  ← Ranking
//! ├─────────────────────────────────────────────┤
//! │  NamespaceFetcher + TTL cache               │  ← Remote
//! ├─────────────────────────────────────────────┤
//! │  PrefixTrie + path tokens                   │  ← Storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use std::rc::Rc;
//! use workbench_complete::{
//!     AutocompleteConfig, Completer, FetchError, NamespaceFetcher, NavInfo, PrefixTrie,
//!     load_keywords_json,
//! };
//!
//! struct Offline;
//!
//! impl NamespaceFetcher for Offline {
//!     fn fetch(&self, _url: &str) -> Result<NavInfo, FetchError> {
//!         Err(FetchError::Status(503))
//!     }
//! }
//!
//! let mut keywords = PrefixTrie::new();
//! load_keywords_json(&mut keywords, r#"[{"value": "SELECT", "type": "R"}, {"value": "SET"}]"#)
//!     .unwrap();
//!
//! let mut completer = Completer::new(Rc::new(keywords), &AutocompleteConfig::default());
//! let suggestions = completer.suggest("se", false, &Offline).unwrap();
//! assert_eq!(suggestions.options, vec!["SELECT", "SET"]);
//! assert_eq!(suggestions.previously_used, 1);
//! ```
//!
//! # Module Description
//!
//! - [`trie`] - Character trie with styles and nested tries
//! - [`path`] - Dotted, bracket-escapable paths
//! - [`remote`] - Network-backed population with TTL caching
//! - [`keywords`] - Keyword and catalog loading
//! - [`ranking`] - Recency-first ordering
//! - [`completion`] - Suggestion assembly
//! - [`config`] - Autocomplete configuration

pub mod completion;
pub mod config;
pub mod keywords;
pub mod path;
pub mod ranking;
pub mod remote;
pub mod trie;

pub use completion::{Completer, Suggestions, completion_prefix};
pub use config::{AutocompleteConfig, ConfigError};
pub use keywords::{add_collection_recursive, load_keywords_json};
pub use path::{escape, split_levels, tokenize, unescape, url_path_for};
pub use ranking::SuggestionRanker;
pub use remote::{
    FetchError, HttpNamespaceFetcher, NamespaceFetcher, NamespaceRequest, NavChild, NavInfo,
    prepare_request,
};
pub use trie::{DEFAULT_TTL, PrefixMatches, PrefixTrie};
