//! In-memory line document with inline markup.
//!
//! [`MarkupDocument`] is the concrete [`LineIndexedDocument`] the query editor runs on. Each
//! [`Line`] is a list of [`Inline`] nodes (text, styled spans, line-break markers); nodes are
//! addressed by [`NodeRef`], a line index plus a child-index path.

use crate::selection::{LineIndexedDocument, RawSelection};
use crate::styling::StyleClass;
use std::ops::Range;

/// An inline node of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text leaf.
    Text(String),
    /// Styled container.
    Span {
        /// Visual class.
        class: StyleClass,
        /// Child nodes.
        children: Vec<Inline>,
    },
    /// Line-break marker; carries no text.
    Break,
}

impl Inline {
    /// A span holding a single text leaf.
    pub fn span(class: StyleClass, text: impl Into<String>) -> Self {
        Self::Span {
            class,
            children: vec![Self::Text(text.into())],
        }
    }

    /// All text under this node.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Span { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Self::Break => {}
        }
    }
}

/// One line of a [`MarkupDocument`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    nodes: Vec<Inline>,
}

impl Line {
    /// A line made of `nodes`. No nodes at all is normalized to a single break marker.
    pub fn new(nodes: Vec<Inline>) -> Self {
        if nodes.is_empty() {
            return Self::empty();
        }
        Self { nodes }
    }

    /// An empty line (a lone break marker).
    pub fn empty() -> Self {
        Self {
            nodes: vec![Inline::Break],
        }
    }

    /// An unstyled line.
    pub fn plain(text: &str) -> Self {
        if text.is_empty() {
            Self::empty()
        } else {
            Self {
                nodes: vec![Inline::Text(text.to_string())],
            }
        }
    }

    /// The line's top-level nodes.
    pub fn nodes(&self) -> &[Inline] {
        &self.nodes
    }

    /// The line's text.
    pub fn text(&self) -> String {
        self.nodes.iter().map(Inline::text).collect()
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::empty()
    }
}

/// Address of a line (empty `path`) or of an inline node inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeRef {
    /// Line index.
    pub line: usize,
    /// Child indices from the line container down to the node.
    pub path: Vec<usize>,
}

impl NodeRef {
    /// The line container at `line`.
    pub fn line(line: usize) -> Self {
        Self {
            line,
            path: Vec::new(),
        }
    }

    /// The `index`-th child of this node.
    pub fn child(&self, index: usize) -> Self {
        let mut path = self.path.clone();
        path.push(index);
        Self {
            line: self.line,
            path,
        }
    }
}

enum Resolved<'a> {
    Line(&'a Line),
    Inline(&'a Inline),
}

/// A document that always holds at least one line, plus the host's raw selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupDocument {
    lines: Vec<Line>,
    selection: Option<RawSelection<NodeRef>>,
}

impl MarkupDocument {
    /// An empty document: one empty line, no selection.
    pub fn new() -> Self {
        Self {
            lines: vec![Line::empty()],
            selection: None,
        }
    }

    /// An unstyled document holding `text`, split on `\n`.
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_lines(text).iter().map(|l| Line::plain(l)).collect())
    }

    /// A document made of `lines`.
    pub fn from_lines(lines: Vec<Line>) -> Self {
        let lines = if lines.is_empty() {
            vec![Line::empty()]
        } else {
            lines
        };
        Self {
            lines,
            selection: None,
        }
    }

    /// Document text, lines joined by `\n`.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(Line::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// All lines.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Line at `index`.
    pub fn line(&self, index: usize) -> Option<&Line> {
        self.lines.get(index)
    }

    /// Replace the line at `index`. Out-of-range indices are ignored.
    pub fn replace_line(&mut self, index: usize, line: Line) {
        if let Some(slot) = self.lines.get_mut(index) {
            *slot = line;
        }
    }

    /// Replace the lines in `range` with `lines`.
    ///
    /// The range is clamped to the document. If the result would be empty a single empty line
    /// is kept.
    pub fn splice_lines(&mut self, range: Range<usize>, lines: Vec<Line>) {
        let end = range.end.min(self.lines.len());
        let start = range.start.min(end);
        self.lines.splice(start..end, lines);
        if self.lines.is_empty() {
            self.lines.push(Line::empty());
        }
    }

    fn resolve(&self, node: &NodeRef) -> Option<Resolved<'_>> {
        let line = self.lines.get(node.line)?;
        let Some((first, rest)) = node.path.split_first() else {
            return Some(Resolved::Line(line));
        };

        let mut current = line.nodes.get(*first)?;
        for index in rest {
            current = match current {
                Inline::Span { children, .. } => children.get(*index)?,
                _ => return None,
            };
        }
        Some(Resolved::Inline(current))
    }
}

impl Default for MarkupDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndexedDocument for MarkupDocument {
    type Node = NodeRef;

    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn nth_line(&self, index: usize) -> Option<NodeRef> {
        (index < self.lines.len()).then(|| NodeRef::line(index))
    }

    fn line_index_from_node(&self, node: &NodeRef) -> Option<usize> {
        self.resolve(node).map(|_| node.line)
    }

    fn raw_selection(&self) -> Option<RawSelection<NodeRef>> {
        self.selection.clone()
    }

    fn set_raw_selection(&mut self, selection: Option<RawSelection<NodeRef>>) {
        self.selection = selection;
    }

    fn parent(&self, node: &NodeRef) -> Option<NodeRef> {
        let (_, parent_path) = node.path.split_last()?;
        Some(NodeRef {
            line: node.line,
            path: parent_path.to_vec(),
        })
    }

    fn children(&self, node: &NodeRef) -> Vec<NodeRef> {
        let count = match self.resolve(node) {
            Some(Resolved::Line(line)) => line.nodes.len(),
            Some(Resolved::Inline(Inline::Span { children, .. })) => children.len(),
            _ => 0,
        };
        (0..count).map(|i| node.child(i)).collect()
    }

    fn is_line(&self, node: &NodeRef) -> bool {
        matches!(self.resolve(node), Some(Resolved::Line(_)))
    }

    fn is_line_break(&self, node: &NodeRef) -> bool {
        matches!(self.resolve(node), Some(Resolved::Inline(Inline::Break)))
    }

    fn text_content(&self, node: &NodeRef) -> String {
        match self.resolve(node) {
            Some(Resolved::Line(line)) => line.text(),
            Some(Resolved::Inline(inline)) => inline.text(),
            None => String::new(),
        }
    }
}

/// Split `text` into lines on `\n`, dropping a trailing `\r` from each.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::{Position, SelectionManager};

    fn styled() -> MarkupDocument {
        MarkupDocument::from_lines(vec![
            Line::new(vec![
                Inline::span(StyleClass::Keyword, "SELECT"),
                Inline::Text(" a".into()),
            ]),
            Line::empty(),
            Line::new(vec![
                Inline::span(StyleClass::Keyword, "FROM"),
                Inline::Text(" t ".into()),
                Inline::span(StyleClass::Comment, "-- x"),
            ]),
        ])
    }

    #[test]
    fn test_text_round_trip() {
        let doc = MarkupDocument::from_text("a\r\n\nb");
        assert_eq!(doc.line_count(), 3);
        assert_eq!(doc.text(), "a\n\nb");
        assert_eq!(doc.line(1).unwrap().nodes(), &[Inline::Break]);
    }

    #[test]
    fn test_node_navigation() {
        let doc = styled();
        let leaf = NodeRef::line(0).child(0).child(0);
        assert_eq!(doc.text_content(&leaf), "SELECT");
        assert_eq!(doc.parent(&leaf), Some(NodeRef::line(0).child(0)));
        assert_eq!(doc.line_index_from_node(&leaf), Some(0));
        assert_eq!(doc.line_from_node(&leaf), Some(NodeRef::line(0)));
        assert!(doc.is_line(&NodeRef::line(2)));
        assert!(doc.is_line_break(&NodeRef::line(1).child(0)));
        assert_eq!(doc.line_index_from_node(&NodeRef::line(0).child(7)), None);
    }

    #[test]
    fn test_visual_offset_through_nested_markup() {
        let manager = SelectionManager::new(styled());
        // "t" inside the plain run after FROM.
        let run = NodeRef::line(2).child(1);
        assert_eq!(manager.visual_caret_offset(&run, 2), 6);
        // Inside the comment span's text.
        let comment = NodeRef::line(2).child(2).child(0);
        assert_eq!(manager.visual_caret_offset(&comment, 1), 8);
        // Container offsets count children.
        assert_eq!(manager.visual_caret_offset(&NodeRef::line(2), 2), 7);
    }

    #[test]
    fn test_caret_placement_inverts_visual_offset() {
        let mut manager = SelectionManager::new(styled());
        for column in 0..=11 {
            let position = Position::new(2, column);
            manager.set_caret_position(position);
            let info = manager.selection_info().unwrap();
            assert_eq!(info.start, position);
            assert!(info.is_empty());
        }

        manager.set_caret_position(Position::new(1, 0));
        assert_eq!(manager.selection_info().unwrap().start, Position::new(1, 0));
    }

    #[test]
    fn test_splice_keeps_one_line() {
        let mut doc = MarkupDocument::from_text("a\nb");
        doc.splice_lines(0..5, Vec::new());
        assert_eq!(doc.line_count(), 1);
        assert_eq!(doc.text(), "");
    }
}
