use pretty_assertions::assert_eq;
use workbench_complete::{escape, split_levels, tokenize, unescape, url_path_for};

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

#[test]
fn test_tokenize_rejects_empty_and_leading_dot() {
    assert_eq!(tokenize("", true), None);
    assert_eq!(tokenize(".tables", true), None);
    assert_eq!(tokenize(".", false), None);
}

#[test]
fn test_tokenize_keeps_level_dots() {
    assert_eq!(tokenize("db", true), Some(owned(&["db"])));
    assert_eq!(tokenize("db.", true), Some(owned(&["db."])));
    assert_eq!(tokenize("db.sch.ta", true), Some(owned(&["db.", "sch.", "ta"])));
    assert_eq!(tokenize("db..ta", true), Some(owned(&["db.", "ta"])));
}

#[test]
fn test_tokenize_brackets() {
    assert_eq!(
        tokenize("[a.b].[c d]", true),
        Some(owned(&["a.b.", "c d"]))
    );
    assert_eq!(
        tokenize("[a.b].[c d]", false),
        Some(owned(&["[a.b].", "[c d]"]))
    );
    assert_eq!(tokenize("db.[unclosed", true), Some(owned(&["db.", "[unclosed"])));
    assert_eq!(tokenize("[x]y", true), Some(owned(&["x", "y"])));
}

#[test]
fn test_escape_round_trips_through_tokenize() {
    for name in ["plain", "two words", "a.b", "tab\tname"] {
        let path = format!("db.{}", escape(name));
        assert_eq!(
            tokenize(&path, true),
            Some(owned(&["db.", name])),
            "{name:?}"
        );
    }
}

#[test]
fn test_unescape_leaves_plain_tokens() {
    assert_eq!(unescape("db"), "db");
    assert_eq!(unescape("db."), "db.");
    assert_eq!(unescape("[db]"), "db");
}

#[test]
fn test_split_levels_ignores_undotted_middle_tokens() {
    let tokens = tokenize("[x]y", true).unwrap();
    assert_eq!(split_levels(&tokens), (Vec::new(), "y".to_string()));
    assert_eq!(split_levels(&[]), (Vec::new(), String::new()));
}

#[test]
fn test_url_path_encodes_segments() {
    assert_eq!(url_path_for(&[]), "");
    assert_eq!(url_path_for(&owned(&["db"])), "db");
    assert_eq!(
        url_path_for(&owned(&["my schema", "a/b", "100%"])),
        "my%20schema/a%2Fb/100%25"
    );
}
