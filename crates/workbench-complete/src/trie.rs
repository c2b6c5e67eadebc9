//! Hierarchical prefix trie.
//!
//! # Overview
//!
//! [`PrefixTrie`] stores strings character by character. Every terminal entry carries a
//! [`StyleType`] and may own a nested trie, which is how one level of a namespace (a schema)
//! holds the next one (its tables). Lookups for styling are case-insensitive; prefix
//! enumeration is lazy and case-insensitive too, visiting exact-case branches first.
//!
//! A trie also remembers when it was last populated from a remote source. That timestamp,
//! checked against the trie's TTL, decides whether the cached entries are still trusted (see
//! [`crate::remote`]).

use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use workbench_core::{KeywordStyles, StyleType};

/// How long a remotely populated trie is trusted without re-fetching.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default)]
struct TrieNode {
    children: BTreeMap<char, TrieNode>,
    terminal: bool,
    style: StyleType,
    sub_trie: Option<Box<PrefixTrie>>,
}

/// A character trie with styled entries and nested sub-tries.
#[derive(Debug, Clone)]
pub struct PrefixTrie {
    root: TrieNode,
    populated_at: Option<Instant>,
    ttl: Duration,
}

impl PrefixTrie {
    /// Create an empty trie with the default TTL.
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_TTL)
    }

    /// Create an empty trie whose remote population stays fresh for `ttl`.
    ///
    /// Nested tries created through this trie inherit the TTL.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            root: TrieNode::default(),
            populated_at: None,
            ttl,
        }
    }

    /// Freshness window of this trie.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns `true` if the trie holds no entries.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty() && !self.root.terminal
    }

    /// Remove every entry and nested trie, and forget the population time.
    pub fn clear(&mut self) {
        self.root = TrieNode::default();
        self.populated_at = None;
    }

    /// Add `entry` with `style`. Adding an existing entry only updates its style.
    ///
    /// Empty entries are ignored.
    pub fn add_entry(&mut self, entry: &str, style: StyleType) {
        if entry.is_empty() {
            return;
        }
        let node = self.node_mut(entry);
        node.terminal = true;
        node.style = style;
    }

    /// Add `entry` and return the nested trie attached to it, creating it if needed.
    ///
    /// Returns `None` for an empty entry.
    pub fn add_trie_terminated_entry(&mut self, entry: &str) -> Option<&mut PrefixTrie> {
        if entry.is_empty() {
            return None;
        }
        Some(self.attach_sub_trie(entry))
    }

    pub(crate) fn attach_sub_trie(&mut self, entry: &str) -> &mut PrefixTrie {
        let ttl = self.ttl;
        let node = self.node_mut(entry);
        if !entry.is_empty() {
            node.terminal = true;
        }
        node.sub_trie
            .get_or_insert_with(|| Box::new(PrefixTrie::with_ttl(ttl)))
    }

    /// The nested trie attached to `entry` (exact case).
    pub fn sub_trie(&self, entry: &str) -> Option<&PrefixTrie> {
        self.node(entry)?.sub_trie.as_deref()
    }

    /// Remove `entry`, pruning branches that no longer lead to any entry.
    ///
    /// The entry's nested trie goes with it. Returns `false` if `entry` was not stored.
    pub fn remove_entry(&mut self, entry: &str) -> bool {
        let chars: Vec<char> = entry.chars().collect();
        remove_from(&mut self.root, &chars).is_some()
    }

    /// Returns `true` if `entry` is stored (exact case; nested tries are not searched).
    pub fn has_entry(&self, entry: &str) -> bool {
        self.node(entry).is_some_and(|node| node.terminal)
    }

    /// Style of `entry`, looked up case-insensitively.
    ///
    /// At each character the exact-case branch wins, then lower case, then upper case.
    /// Returns [`StyleType::None`] for entries that are not stored.
    pub fn style(&self, entry: &str) -> StyleType {
        let mut node = &self.root;
        for c in entry.chars() {
            let child = node
                .children
                .get(&c)
                .or_else(|| node.children.get(&to_lower(c)))
                .or_else(|| node.children.get(&to_upper(c)));
            match child {
                Some(child) => node = child,
                None => return StyleType::None,
            }
        }
        if node.terminal {
            node.style
        } else {
            StyleType::None
        }
    }

    /// Every stored string that starts with `prefix`, compared case-insensitively.
    ///
    /// The sequence is lazy and finite, yields each string once, and can be restarted by
    /// cloning it or calling this again. Where a character exists in both cases the branch
    /// matching the prefix's case is visited first.
    pub fn strings_from_prefix(&self, prefix: &str) -> PrefixMatches<'_> {
        PrefixMatches {
            prefix: prefix.chars().collect(),
            stack: vec![Frame {
                node: &self.root,
                text: String::new(),
                matched: 0,
            }],
        }
    }

    /// Returns `true` if the trie was populated less than one TTL before `now`.
    pub fn fresh_at(&self, now: Instant) -> bool {
        self.populated_at
            .is_some_and(|at| now.saturating_duration_since(at) < self.ttl)
    }

    /// When the trie was last populated from a remote source.
    pub fn populated_at(&self) -> Option<Instant> {
        self.populated_at
    }

    pub(crate) fn mark_populated(&mut self, now: Instant) {
        self.populated_at = Some(now);
    }

    fn node(&self, entry: &str) -> Option<&TrieNode> {
        entry
            .chars()
            .try_fold(&self.root, |node, c| node.children.get(&c))
    }

    fn node_mut(&mut self, entry: &str) -> &mut TrieNode {
        let mut node = &mut self.root;
        for c in entry.chars() {
            node = node.children.entry(c).or_default();
        }
        node
    }
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordStyles for PrefixTrie {
    fn style_of(&self, token: &str) -> StyleType {
        self.style(token)
    }
}

/// Removes the entry spelled by `chars` below `node`.
///
/// Returns `None` if there was no such entry, otherwise whether `node` itself is now
/// prunable.
fn remove_from(node: &mut TrieNode, chars: &[char]) -> Option<bool> {
    let Some((first, rest)) = chars.split_first() else {
        if !node.terminal {
            return None;
        }
        node.terminal = false;
        node.style = StyleType::None;
        node.sub_trie = None;
        return Some(node.children.is_empty());
    };

    let child = node.children.get_mut(first)?;
    if remove_from(child, rest)? {
        node.children.remove(first);
    }
    Some(!node.terminal && node.children.is_empty())
}

fn to_lower(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

fn to_upper(c: char) -> char {
    let mut upper = c.to_uppercase();
    match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    }
}

fn same_letter(a: char, b: char) -> bool {
    a == b || to_upper(a) == to_upper(b)
}

#[derive(Debug, Clone)]
struct Frame<'a> {
    node: &'a TrieNode,
    text: String,
    matched: usize,
}

/// Lazy depth-first enumeration returned by [`PrefixTrie::strings_from_prefix`].
#[derive(Debug, Clone)]
pub struct PrefixMatches<'a> {
    prefix: Vec<char>,
    stack: Vec<Frame<'a>>,
}

impl PrefixMatches<'_> {
    /// A sequence that yields nothing.
    pub fn empty() -> Self {
        Self {
            prefix: Vec::new(),
            stack: Vec::new(),
        }
    }
}

impl<'a> Iterator for PrefixMatches<'a> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while let Some(Frame { node, text, matched }) = self.stack.pop() {
            let complete = matched == self.prefix.len();

            let mut children: Vec<(char, &'a TrieNode)> = match self.prefix.get(matched) {
                None => node.children.iter().map(|(c, n)| (*c, n)).collect(),
                Some(&wanted) => {
                    let mut matching: Vec<_> = node
                        .children
                        .iter()
                        .filter(|(c, _)| same_letter(**c, wanted))
                        .map(|(c, n)| (*c, n))
                        .collect();
                    matching.sort_by_key(|(c, _)| *c != wanted);
                    matching
                }
            };
            let next_matched = if complete { matched } else { matched + 1 };

            children.reverse();
            for (c, child) in children {
                let mut child_text = text.clone();
                child_text.push(c);
                self.stack.push(Frame {
                    node: child,
                    text: child_text,
                    matched: next_matched,
                });
            }

            if node.terminal && complete {
                return Some(text);
            }
        }
        None
    }
}
