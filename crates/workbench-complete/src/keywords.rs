//! Loading static keyword lists and catalog collections into tries.

use crate::trie::PrefixTrie;
use serde::Deserialize;
use serde_json::Value;
use workbench_core::StyleType;

const LOG_TARGET: &str = "workbench_complete::keywords";

/// Properties naming an element of a catalog collection, in lookup order.
pub const COLLECTION_TITLE_PROPERTIES: [&str; 4] = ["dbschemanm", "dbname", "db", "table_name"];

/// Properties holding an element's nested collection, in lookup order.
pub const COLLECTION_CHILD_PROPERTIES: [&str; 5] =
    ["dbinfo", "dbschemas", "table", "tables", "columns"];

#[derive(Debug, Deserialize)]
struct KeywordEntry {
    value: String,
    #[serde(rename = "type", default)]
    kind: String,
}

/// Add every keyword of a `[{"value": "...", "type": "..."}]` list to `trie`.
///
/// Type `R` marks a reserved word; anything else is a plain keyword. Returns the number of
/// entries read.
pub fn load_keywords_json(trie: &mut PrefixTrie, json: &str) -> Result<usize, serde_json::Error> {
    let entries: Vec<KeywordEntry> = serde_json::from_str(json)?;
    for entry in &entries {
        let style = if entry.kind == "R" {
            StyleType::Reserved
        } else {
            StyleType::Keyword
        };
        trie.add_entry(&entry.value, style);
    }
    log::debug!(target: LOG_TARGET, "loaded {} keywords", entries.len());
    Ok(entries.len())
}

/// Add a nested catalog collection to `trie`.
///
/// The first element of an array decides its shape. If it is an object with both a title
/// property and a child collection property, every element becomes an entry with a nested
/// trie filled from its child collection. Otherwise the elements are leaf strings such as
/// `"name (type)"`, stored up to the first `(`. Values of any other shape are skipped.
pub fn add_collection_recursive(trie: &mut PrefixTrie, collection: &Value) {
    let Some(elements) = collection.as_array() else {
        return;
    };
    let Some(first) = elements.first() else {
        return;
    };

    let shape = first.as_object().and_then(|object| {
        let title = COLLECTION_TITLE_PROPERTIES
            .into_iter()
            .find(|prop| object.contains_key(*prop))?;
        let children = COLLECTION_CHILD_PROPERTIES
            .into_iter()
            .find(|prop| object.contains_key(*prop))?;
        Some((title, children))
    });

    match shape {
        Some((title, children)) => {
            for element in elements {
                let Some(name) = element.get(title).and_then(Value::as_str) else {
                    continue;
                };
                if let Some(nested) = trie.add_trie_terminated_entry(name)
                    && let Some(child_collection) = element.get(children)
                {
                    add_collection_recursive(nested, child_collection);
                }
            }
        }
        None => {
            for leaf in elements.iter().filter_map(Value::as_str) {
                let name = leaf.split('(').next().unwrap_or(leaf).trim_end();
                trie.add_entry(name, StyleType::None);
            }
        }
    }
}
