//! Recency-first ordering of suggestions.

use workbench_core::LruList;

/// Orders options with recently accepted ones first and the rest alphabetically.
#[derive(Debug)]
pub struct SuggestionRanker {
    recent: LruList<String>,
}

impl SuggestionRanker {
    /// Remember up to `capacity` accepted options. `seed` is put in order, so its last value
    /// ends up most recent.
    pub fn new<I>(capacity: usize, seed: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut recent = LruList::new(capacity).with_fallback(|a: &String, b: &String| a.cmp(b));
        for value in seed {
            recent.put(value.into());
        }
        Self { recent }
    }

    /// Record `option` as the most recently used.
    pub fn accept(&mut self, option: &str) {
        self.recent.put(option.to_string());
    }

    /// Sort `options` in place: recent first, then alphabetical.
    pub fn rank(&self, options: &mut [String]) {
        self.recent.sort(options);
    }

    /// Number of leading entries of ranked `options` that were previously used.
    pub fn previously_used_len(&self, options: &[String]) -> usize {
        options
            .iter()
            .take_while(|option| self.recent.contains(option))
            .count()
    }

    /// The recency list itself.
    pub fn recent(&self) -> &LruList<String> {
        &self.recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_rank_and_count_recent() {
        let mut ranker = SuggestionRanker::new(4, ["SELECT"]);
        ranker.accept("SET");

        let mut options = strings(&["SESSION", "SELECT", "SET", "SCHEMA"]);
        ranker.rank(&mut options);
        assert_eq!(options, strings(&["SET", "SELECT", "SCHEMA", "SESSION"]));
        assert_eq!(ranker.previously_used_len(&options), 2);
    }
}
