use pretty_assertions::assert_eq;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{Duration, Instant};
use workbench_complete::{
    AutocompleteConfig, Completer, FetchError, NamespaceFetcher, NavChild, NavInfo, PrefixTrie,
    load_keywords_json,
};
use workbench_core::{Position, QueryEditor};

const KEYWORDS: &str = r#"[
    {"value": "SELECT", "type": "R"},
    {"value": "SET", "type": "R"},
    {"value": "sales", "type": "K"},
    {"value": "FROM", "type": "K"}
]"#;

/// Serves a fixed namespace tree and counts requests.
struct Catalog {
    levels: HashMap<String, Vec<&'static str>>,
    requests: RefCell<usize>,
}

impl Catalog {
    fn new() -> Self {
        let levels = HashMap::from([
            ("http://db/nav/".to_string(), vec!["sales", "staging"]),
            ("http://db/nav/sales".to_string(), vec!["tally", "table one", "orders"]),
        ]);
        Self {
            levels,
            requests: RefCell::new(0),
        }
    }
}

impl NamespaceFetcher for Catalog {
    fn fetch(&self, url: &str) -> Result<NavInfo, FetchError> {
        *self.requests.borrow_mut() += 1;
        let names = self.levels.get(url).ok_or(FetchError::Status(404))?;
        Ok(NavInfo {
            name: url.to_string(),
            is_readable_child: true,
            children: names
                .iter()
                .map(|name| NavChild {
                    name: name.to_string(),
                    ..NavChild::default()
                })
                .collect(),
        })
    }
}

fn keywords() -> Rc<PrefixTrie> {
    let mut trie = PrefixTrie::new();
    assert_eq!(load_keywords_json(&mut trie, KEYWORDS).unwrap(), 4);
    Rc::new(trie)
}

fn completer() -> Completer {
    let config = AutocompleteConfig {
        base_url: "http://db/nav/".to_string(),
        ..AutocompleteConfig::default()
    };
    Completer::new(keywords(), &config)
}

#[test]
fn test_no_prefix_without_force() {
    let mut completer = completer();
    let catalog = Catalog::new();

    assert_eq!(completer.suggest("SELECT ", false, &catalog), None);
    assert_eq!(*catalog.requests.borrow(), 0);
}

#[test]
fn test_forced_empty_prefix_lists_everything() {
    let mut completer = completer();
    let catalog = Catalog::new();

    let suggestions = completer.suggest("SELECT ", true, &catalog).unwrap();
    assert_eq!(suggestions.prefix, "");
    assert_eq!(suggestions.visible_prefix, "");
    assert_eq!(suggestions.replace_len, 0);
    assert_eq!(
        suggestions.options,
        vec!["SELECT", "FROM", "SET", "sales", "staging"]
    );
    assert_eq!(suggestions.previously_used, 1);
}

#[test]
fn test_keyword_and_namespace_matches_merge_without_duplicates() {
    let mut completer = completer();
    let catalog = Catalog::new();

    let suggestions = completer.suggest("SELECT * FROM s", false, &catalog).unwrap();
    assert_eq!(suggestions.prefix, "s");
    assert_eq!(suggestions.visible_prefix, "s");
    assert_eq!(suggestions.replace_len, 1);
    assert_eq!(
        suggestions.options,
        vec!["SELECT", "SET", "sales", "staging"]
    );
    assert_eq!(suggestions.previously_used, 1);
}

#[test]
fn test_nested_prefix() {
    let mut completer = completer();
    let catalog = Catalog::new();

    let suggestions = completer.suggest("FROM sales.ta", false, &catalog).unwrap();
    assert_eq!(suggestions.prefix, "sales.ta");
    assert_eq!(suggestions.visible_prefix, "ta");
    assert_eq!(suggestions.options, vec!["table one", "tally"]);
    assert_eq!(suggestions.previously_used, 0);

    let suggestions = completer.suggest("FROM sales.", false, &catalog).unwrap();
    assert_eq!(suggestions.visible_prefix, "");
    assert_eq!(suggestions.options, vec!["orders", "table one", "tally"]);
    assert_eq!(*catalog.requests.borrow(), 1);
}

#[test]
fn test_accepted_options_rank_first() {
    let mut completer = completer();
    let catalog = Catalog::new();

    assert_eq!(completer.accept("tally"), "tally");
    assert_eq!(completer.accept("table one"), "[table one]");

    let suggestions = completer.suggest("sales.t", false, &catalog).unwrap();
    assert_eq!(suggestions.options, vec!["table one", "tally"]);
    assert_eq!(suggestions.previously_used, 2);

    completer.accept("tally");
    let suggestions = completer.suggest("sales.t", false, &catalog).unwrap();
    assert_eq!(suggestions.options, vec!["tally", "table one"]);
}

#[test]
fn test_configured_ttl_controls_refetch() {
    let config = AutocompleteConfig::from_json_str(
        r#"{"base_url": "http://db/nav/", "cache_ttl_secs": 5, "seed_recent": []}"#,
    )
    .unwrap();
    let mut completer = Completer::new(keywords(), &config);
    let catalog = Catalog::new();
    let t0 = Instant::now();

    let first = completer.suggest_at("st", false, &catalog, t0).unwrap();
    assert_eq!(first.options, vec!["staging"]);
    assert_eq!(first.previously_used, 0);

    completer.suggest_at("st", false, &catalog, t0 + Duration::from_secs(4));
    assert_eq!(*catalog.requests.borrow(), 1);
    completer.suggest_at("st", false, &catalog, t0 + Duration::from_secs(5));
    assert_eq!(*catalog.requests.borrow(), 2);
}

#[test]
fn test_accepting_fills_the_editor_and_undoes() {
    let mut completer = completer();
    let catalog = Catalog::new();
    let input = "SELECT * FROM sales.ta";

    let mut editor = QueryEditor::with_keywords(input, completer.keywords().clone());
    editor.set_caret(Position::new(0, input.chars().count()));

    let suggestions = completer.suggest(input, false, &catalog).unwrap();
    let option = &suggestions.options[0];
    let text = completer.accept(option);
    editor.fill(suggestions.replace_len, &text);
    assert_eq!(editor.text(), "SELECT * FROM sales.[table one]");

    assert!(editor.undo());
    assert_eq!(editor.text(), input);
    assert!(editor.redo());
    assert_eq!(editor.text(), "SELECT * FROM sales.[table one]");
}
