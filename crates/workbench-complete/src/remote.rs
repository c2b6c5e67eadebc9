//! Network-backed population of nested tries.
//!
//! A lookup for `db.schema.ta` descends through the `db` and `schema` levels and completes
//! `ta` in the trie found there. That trie is filled from the remote namespace service at
//! `{base_url}db/schema`. A successful fetch replaces its entries and stamps it with the time
//! of population; until the TTL runs out, later lookups are answered from the trie without a
//! request. A failed fetch leaves the entries in place, so stale data is still offered.
//!
//! The lookup is available in two shapes:
//!
//! - [`PrefixTrie::strings_from_request`] fetches synchronously through a
//!   [`NamespaceFetcher`].
//! - Hosts with their own event loop call [`prepare_request`], check
//!   [`PrefixTrie::is_fresh`], perform the fetch themselves and hand the result to
//!   [`PrefixTrie::apply_response`]. When several responses race, the last one applied wins.

use crate::path::{split_levels, tokenize, url_path_for};
use crate::trie::{PrefixMatches, PrefixTrie};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use thiserror::Error;
use workbench_core::StyleType;

const LOG_TARGET: &str = "workbench_complete::remote";

/// One level of the remote namespace, as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavInfo {
    /// Name of the level.
    pub name: String,
    /// Whether the level itself can be read.
    #[serde(default)]
    pub is_readable_child: bool,
    /// Entries directly below the level.
    #[serde(default)]
    pub children: Vec<NavChild>,
}

/// An entry below a [`NavInfo`] level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavChild {
    /// Entry name, added to the trie verbatim.
    pub name: String,
    /// Whether the entry has its own children.
    #[serde(default)]
    pub has_children: bool,
    /// Whether the entry can be read.
    #[serde(default)]
    pub is_readable_child: bool,
    /// Service-defined entry type.
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Why a namespace fetch failed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with something other than `200 OK`.
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    /// The body was not a valid namespace listing.
    #[error("invalid namespace listing: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Source of namespace listings.
pub trait NamespaceFetcher {
    /// Fetch the listing at `url`.
    fn fetch(&self, url: &str) -> Result<NavInfo, FetchError>;
}

/// [`NamespaceFetcher`] backed by a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpNamespaceFetcher {
    client: Client,
}

impl HttpNamespaceFetcher {
    /// Create a fetcher with short connect and request timeouts.
    pub fn new() -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(2))
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }

    /// Use an already configured client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

impl NamespaceFetcher for HttpNamespaceFetcher {
    fn fetch(&self, url: &str) -> Result<NavInfo, FetchError> {
        let response = self.client.get(url).send()?;
        if response.status() != StatusCode::OK {
            return Err(FetchError::Status(response.status().as_u16()));
        }
        let body = response.text()?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// A resolved namespace lookup: where to fetch, which levels to descend, what to complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRequest {
    url: String,
    levels: Vec<String>,
    prefix: String,
}

impl NamespaceRequest {
    /// URL of the listing for the deepest level.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Unescaped level names, outermost first.
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    /// Unescaped prefix completed within the deepest level.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

/// Resolve `path` against `base_url`.
///
/// An empty path, or one starting with a dot, addresses the top level with an empty prefix.
pub fn prepare_request(base_url: &str, path: &str) -> NamespaceRequest {
    let tokens = tokenize(path, true).unwrap_or_default();
    let (levels, prefix) = split_levels(&tokens);
    NamespaceRequest {
        url: format!("{base_url}{}", url_path_for(&levels)),
        levels,
        prefix,
    }
}

impl PrefixTrie {
    /// The nested trie reached by following `levels`, if every level exists.
    pub fn descend(&self, levels: &[String]) -> Option<&PrefixTrie> {
        levels
            .iter()
            .try_fold(self, |trie, level| trie.sub_trie(level))
    }

    fn descend_or_create(&mut self, levels: &[String]) -> &mut PrefixTrie {
        levels
            .iter()
            .fold(self, |trie, level| trie.attach_sub_trie(level))
    }

    /// Returns `true` if the trie addressed by `request` is still within its TTL.
    pub fn is_fresh(&self, request: &NamespaceRequest) -> bool {
        self.is_fresh_at(request, Instant::now())
    }

    /// [`is_fresh`](Self::is_fresh) evaluated at `now`.
    pub fn is_fresh_at(&self, request: &NamespaceRequest, now: Instant) -> bool {
        self.descend(&request.levels)
            .is_some_and(|trie| trie.fresh_at(now))
    }

    /// Whatever is cached for `request`, fresh or not.
    pub fn cached_matches(&self, request: &NamespaceRequest) -> PrefixMatches<'_> {
        match self.descend(&request.levels) {
            Some(trie) => trie.strings_from_prefix(&request.prefix),
            None => PrefixMatches::empty(),
        }
    }

    /// Store the outcome of fetching `request`.
    ///
    /// A listing replaces the addressed trie's contents, creating the levels on the way, and
    /// marks it populated. A failure is logged and changes nothing.
    pub fn apply_response(
        &mut self,
        request: &NamespaceRequest,
        response: Result<NavInfo, FetchError>,
    ) {
        self.apply_response_at(request, response, Instant::now());
    }

    /// [`apply_response`](Self::apply_response) with an explicit population time.
    pub fn apply_response_at(
        &mut self,
        request: &NamespaceRequest,
        response: Result<NavInfo, FetchError>,
        now: Instant,
    ) {
        match response {
            Ok(info) => {
                let target = self.descend_or_create(&request.levels);
                target.clear();
                for child in &info.children {
                    target.add_entry(&child.name, StyleType::None);
                }
                target.mark_populated(now);
                log::debug!(
                    target: LOG_TARGET,
                    "populated {} with {} entries",
                    request.url,
                    info.children.len()
                );
            }
            Err(err) => {
                log::warn!(
                    target: LOG_TARGET,
                    "fetching {} failed, keeping cached entries: {err}",
                    request.url
                );
            }
        }
    }

    /// Entries matching `path`, fetching the addressed level from `base_url` when the cache
    /// is not fresh.
    pub fn strings_from_request<F>(
        &mut self,
        fetcher: &F,
        base_url: &str,
        path: &str,
    ) -> PrefixMatches<'_>
    where
        F: NamespaceFetcher + ?Sized,
    {
        self.strings_from_request_at(fetcher, base_url, path, Instant::now())
    }

    /// [`strings_from_request`](Self::strings_from_request) evaluated at `now`.
    pub fn strings_from_request_at<F>(
        &mut self,
        fetcher: &F,
        base_url: &str,
        path: &str,
        now: Instant,
    ) -> PrefixMatches<'_>
    where
        F: NamespaceFetcher + ?Sized,
    {
        let request = prepare_request(base_url, path);
        if self.is_fresh_at(&request, now) {
            log::trace!(target: LOG_TARGET, "cache hit for {}", request.url);
        } else {
            log::trace!(target: LOG_TARGET, "cache miss for {}", request.url);
            let response = fetcher.fetch(&request.url);
            self.apply_response_at(&request, response, now);
        }
        self.cached_matches(&request)
    }
}
