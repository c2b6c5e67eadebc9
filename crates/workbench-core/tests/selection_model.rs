use pretty_assertions::assert_eq;
use workbench_core::{
    CharDirection, KeywordStyles, LineIndexedDocument, MarkupDocument, NodeRef, Position,
    SelectionInfo, SelectionManager, StyleType, render_line,
};

struct Keywords;

impl KeywordStyles for Keywords {
    fn style_of(&self, token: &str) -> StyleType {
        match token.to_ascii_uppercase().as_str() {
            "SELECT" | "FROM" | "WHERE" => StyleType::Keyword,
            _ => StyleType::None,
        }
    }
}

const LINES: [&str; 3] = ["SELECT a, 'x y'", "", "FROM t -- note"];

fn styled_manager() -> SelectionManager<MarkupDocument> {
    let lines = LINES
        .iter()
        .map(|line| render_line(line, Some(&Keywords)))
        .collect();
    SelectionManager::new(MarkupDocument::from_lines(lines))
}

fn all_positions() -> Vec<Position> {
    LINES
        .iter()
        .enumerate()
        .flat_map(|(line, text)| {
            (0..=text.chars().count()).map(move |column| Position::new(line, column))
        })
        .collect()
}

fn absolute(position: Position) -> usize {
    LINES[..position.line]
        .iter()
        .map(|line| line.chars().count() + 1)
        .sum::<usize>()
        + position.column
}

#[test]
fn test_no_selection_reports_none() {
    let manager = SelectionManager::new(MarkupDocument::from_text("SELECT"));
    assert!(!manager.source().has_selection());
    assert_eq!(manager.selection_info(), None);
    assert_eq!(manager.char_at_selection(CharDirection::Before), None);
}

#[test]
fn test_reversed_raw_selection_is_normalized() {
    let mut manager = SelectionManager::new(MarkupDocument::from_text("SELECT a\nFROM t"));
    manager.set_raw_caret_range(NodeRef::line(1).child(0), 2, NodeRef::line(0).child(0), 3);

    let info = manager.selection_info().unwrap();
    assert_eq!(info.start, Position::new(0, 3));
    assert_eq!(info.end, Position::new(1, 2));
    assert_eq!(
        info.selected_text,
        vec!["ECT a".to_string(), "FR".to_string()]
    );
    assert_eq!(info.to_single_line_string(), "ECT a FR");
}

#[test]
fn test_every_pair_of_positions_normalizes() {
    let full = LINES.join("\n");
    let mut manager = styled_manager();
    let positions = all_positions();

    for &anchor in &positions {
        for &focus in &positions {
            let (anchor_node, anchor_offset) = manager.caret_placement(anchor).unwrap();
            let (focus_node, focus_offset) = manager.caret_placement(focus).unwrap();
            manager.set_raw_caret_range(anchor_node, anchor_offset, focus_node, focus_offset);

            let info = manager.selection_info().unwrap();
            assert!(info.start <= info.end);
            assert_eq!(info.start, anchor.min(focus));
            assert_eq!(info.end, anchor.max(focus));

            let from = absolute(info.start);
            let to = absolute(info.end);
            let expected: String = full.chars().skip(from).take(to - from).collect();
            assert_eq!(info.text(), expected);
        }
    }
}

#[test]
fn test_text_in_region_clamps_and_handles_empty_range() {
    let manager = SelectionManager::new(MarkupDocument::from_text("ab\ncd"));
    assert_eq!(
        manager.text_in_region(Position::new(1, 1), Position::new(1, 1)),
        vec![String::new()]
    );
    assert_eq!(
        manager.text_in_region(Position::new(0, 1), Position::new(1, 99)),
        vec!["b".to_string(), "cd".to_string()]
    );
    assert_eq!(
        manager.text_in_region(Position::new(1, 0), Position::new(4, 0)),
        vec!["cd".to_string()]
    );
    assert_eq!(
        manager.text_in_region(Position::new(0, 0), Position::new(usize::MAX, 0)),
        vec!["ab".to_string(), "cd".to_string()]
    );
    assert_eq!(
        manager.text_in_region(Position::new(5, 0), Position::new(6, 2)),
        vec![String::new()]
    );
}

#[test]
fn test_difference_orders_by_start() {
    let manager = SelectionManager::new(MarkupDocument::from_text("SELECT a\nFROM t"));
    let a = SelectionInfo::caret(Position::new(0, 3));
    let b = manager.region(Position::new(1, 1), Position::new(1, 2));

    let forward = manager.difference(&a, &b);
    assert_eq!(forward.start, Position::new(0, 3));
    assert_eq!(forward.end, Position::new(1, 2));
    assert_eq!(
        forward.selected_text,
        vec!["ECT a".to_string(), "FR".to_string()]
    );

    let backward = manager.difference(&b, &a);
    assert_eq!(backward.start, Position::new(0, 3));
    assert_eq!(backward.end, Position::new(1, 1));
}

#[test]
fn test_char_at_selection_edges() {
    let mut manager = SelectionManager::new(MarkupDocument::from_text("SELECT a\nFROM t"));

    manager.set_caret_position(Position::new(1, 0));
    assert_eq!(manager.char_at_selection(CharDirection::Before), Some('\n'));
    assert_eq!(manager.char_at_selection(CharDirection::After), Some('F'));

    manager.set_caret_position(Position::new(0, 8));
    assert_eq!(manager.char_at_selection(CharDirection::Before), Some('a'));
    assert_eq!(manager.char_at_selection(CharDirection::After), Some('\n'));

    manager.set_caret_position(Position::new(0, 0));
    assert_eq!(manager.char_at_selection(CharDirection::Before), None);

    manager.set_caret_position(Position::new(1, 6));
    assert_eq!(manager.char_at_selection(CharDirection::After), None);

    manager.select(Position::new(0, 2), Position::new(0, 4));
    assert_eq!(manager.char_at_selection(CharDirection::Before), Some('E'));
    assert_eq!(manager.char_at_selection(CharDirection::After), Some('C'));
}

#[test]
fn test_clear_selection_collapses_to_focus() {
    let mut manager = styled_manager();
    manager.select(Position::new(2, 4), Position::new(0, 1));
    manager.clear_selection();

    let info = manager.selection_info().unwrap();
    assert!(info.is_empty());
    assert_eq!(info.start, Position::new(0, 1));
}

#[test]
fn test_set_caret_range_none_goes_to_start() {
    let mut manager = styled_manager();
    manager.select(Position::new(2, 4), Position::new(2, 6));
    manager.set_caret_range(None);
    assert_eq!(
        manager.selection_info().unwrap(),
        SelectionInfo::caret(Position::new(0, 0))
    );
}

#[test]
fn test_columns_past_line_end_clamp() {
    let mut manager = styled_manager();
    manager.set_caret_position(Position::new(0, 500));
    assert_eq!(
        manager.selection_info().unwrap().start,
        Position::new(0, LINES[0].chars().count())
    );

    manager.set_caret_position(Position::new(9, 0));
    assert_eq!(
        manager.selection_info().unwrap().start,
        Position::new(0, LINES[0].chars().count())
    );
}
