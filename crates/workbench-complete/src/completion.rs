//! Assembling autocomplete suggestions.
//!
//! The text before the caret ends in a prefix (the last run of non-whitespace, where
//! bracketed names may contain spaces). [`Completer::suggest`] collects every keyword and every
//! remote namespace entry matching that prefix, ranks them with recently accepted options
//! first, and reports how much of the prefix is already typed so the host can fill the rest.

use crate::config::AutocompleteConfig;
use crate::path::{escape, tokenize};
use crate::ranking::SuggestionRanker;
use crate::remote::NamespaceFetcher;
use crate::trie::PrefixTrie;
use regex::Regex;
use std::rc::Rc;
use std::sync::LazyLock;
use std::time::Instant;

const LOG_TARGET: &str = "workbench_complete::completion";

static TRAILING_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\[.*?\]|[^\x{A0}\s])+$").expect("valid completion prefix pattern")
});

/// The prefix being completed at the end of `input`, or `""` if `input` ends in whitespace.
///
/// ```
/// use workbench_complete::completion_prefix;
///
/// assert_eq!(completion_prefix("SELECT * FROM db.[my sch"), "sch");
/// assert_eq!(completion_prefix("SELECT * FROM db.[my schema].t"), "db.[my schema].t");
/// assert_eq!(completion_prefix("SELECT "), "");
/// ```
pub fn completion_prefix(input: &str) -> &str {
    TRAILING_PREFIX
        .find(input)
        .map_or("", |m| m.as_str())
}

/// Ranked options for one prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestions {
    /// Raw prefix at the end of the input.
    pub prefix: String,
    /// Part of the prefix shared by every option (the last path token, still escaped).
    pub visible_prefix: String,
    /// Characters before the caret that accepting an option replaces.
    pub replace_len: usize,
    /// Matching options, recently accepted first, the rest alphabetical, without duplicates.
    pub options: Vec<String>,
    /// How many leading options were accepted before.
    pub previously_used: usize,
}

/// Suggestion source combining static keywords with remote namespaces.
#[derive(Debug)]
pub struct Completer {
    keywords: Rc<PrefixTrie>,
    namespaces: PrefixTrie,
    ranker: SuggestionRanker,
    base_url: String,
}

impl Completer {
    /// Create a completer over `keywords`, configured by `config`.
    pub fn new(keywords: Rc<PrefixTrie>, config: &AutocompleteConfig) -> Self {
        Self {
            keywords,
            namespaces: PrefixTrie::with_ttl(config.cache_ttl()),
            ranker: SuggestionRanker::new(config.recent_capacity, config.seed_recent.iter().cloned()),
            base_url: config.base_url.clone(),
        }
    }

    /// Static keyword trie, shared with editors for styling.
    pub fn keywords(&self) -> &Rc<PrefixTrie> {
        &self.keywords
    }

    /// Cache of remote namespace levels.
    pub fn namespaces(&self) -> &PrefixTrie {
        &self.namespaces
    }

    /// Mutable cache of remote namespace levels, for hosts applying responses themselves.
    pub fn namespaces_mut(&mut self) -> &mut PrefixTrie {
        &mut self.namespaces
    }

    /// The recency ranking.
    pub fn ranker(&self) -> &SuggestionRanker {
        &self.ranker
    }

    /// Suggestions for the text before the caret.
    ///
    /// Returns `None` when `input` ends without a prefix, unless `force` is set.
    pub fn suggest<F>(&mut self, input: &str, force: bool, fetcher: &F) -> Option<Suggestions>
    where
        F: NamespaceFetcher + ?Sized,
    {
        self.suggest_at(input, force, fetcher, Instant::now())
    }

    /// [`suggest`](Self::suggest) evaluated at `now`.
    pub fn suggest_at<F>(
        &mut self,
        input: &str,
        force: bool,
        fetcher: &F,
        now: Instant,
    ) -> Option<Suggestions>
    where
        F: NamespaceFetcher + ?Sized,
    {
        let prefix = completion_prefix(input);
        if prefix.is_empty() && !force {
            return None;
        }

        let visible_prefix = tokenize(prefix, false)
            .and_then(|tokens| tokens.last().cloned())
            .filter(|token| !token.ends_with('.'))
            .unwrap_or_default();

        let mut options: Vec<String> = self.keywords.strings_from_prefix(prefix).collect();
        options.extend(
            self.namespaces
                .strings_from_request_at(fetcher, &self.base_url, prefix, now),
        );
        self.ranker.rank(&mut options);
        options.dedup();

        let previously_used = self.ranker.previously_used_len(&options);
        log::trace!(
            target: LOG_TARGET,
            "{} options for {prefix:?}, {previously_used} recent",
            options.len()
        );

        Some(Suggestions {
            prefix: prefix.to_string(),
            replace_len: visible_prefix.chars().count(),
            visible_prefix,
            options,
            previously_used,
        })
    }

    /// Record `option` as chosen and return the text to insert for it.
    ///
    /// Names containing a space, tab or dot come back bracketed.
    pub fn accept(&mut self, option: &str) -> String {
        self.ranker.accept(option);
        escape(option)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_prefix() {
        assert_eq!(completion_prefix(""), "");
        assert_eq!(completion_prefix("SEL"), "SEL");
        assert_eq!(completion_prefix("a\u{A0}b"), "b");
        assert_eq!(completion_prefix("x [a b]c"), "[a b]c");
        assert_eq!(completion_prefix("x\t"), "");
    }
}
