//! Selection model over a line-indexed document.
//!
//! # Overview
//!
//! A host editor reports its selection the way a rich-text surface does: an anchor and a focus,
//! each a (node, raw offset) pair somewhere inside nested inline markup. [`SelectionManager`]
//! converts that into a [`SelectionInfo`]: a normalized `start <= end` range addressed by
//! (line, column) plus the selected text split per line. It also performs the inverse mapping
//! from (line, column) back to a host node and raw offset.
//!
//! The document itself is abstracted behind [`LineIndexedDocument`], so the same walk works for
//! any tree of lines and inline nodes.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

/// Position coordinates (line and column numbers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Position {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based character offset from the start of the line.
    pub column: usize,
}

impl Position {
    /// Create a new position.
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for Position {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A normalized selection: `start <= end`, with the text between them split per line.
///
/// A collapsed selection (a caret) carries a single empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionInfo {
    /// Start of the range.
    pub start: Position,
    /// End of the range.
    pub end: Position,
    /// Selected text, one entry per covered line.
    pub selected_text: Vec<String>,
}

impl SelectionInfo {
    /// A collapsed selection at `position`.
    pub fn caret(position: Position) -> Self {
        Self {
            start: position,
            end: position,
            selected_text: vec![String::new()],
        }
    }

    /// Returns `true` if the selection is collapsed to a caret.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Lines touched by the selection.
    pub fn line_span(&self) -> RangeInclusive<usize> {
        self.start.line..=self.end.line
    }

    /// The selected text with lines joined by `\n`.
    pub fn text(&self) -> String {
        self.selected_text.join("\n")
    }

    /// The selected text flattened onto one line.
    ///
    /// Lines are joined with a single space unless whitespace already separates them.
    pub fn to_single_line_string(&self) -> String {
        let mut out = String::new();
        for (i, line) in self.selected_text.iter().enumerate() {
            if i > 0
                && !out.ends_with(char::is_whitespace)
                && !line.starts_with(char::is_whitespace)
            {
                out.push(' ');
            }
            out.push_str(line);
        }
        out
    }
}

/// A selection exactly as the host reports it: unordered anchor and focus, raw offsets.
///
/// A raw offset inside a leaf (text) node counts characters; inside a container node it
/// counts child nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSelection<N> {
    /// Node where the selection started.
    pub anchor: N,
    /// Raw offset within `anchor`.
    pub anchor_offset: usize,
    /// Node where the selection currently ends.
    pub focus: N,
    /// Raw offset within `focus`.
    pub focus_offset: usize,
}

impl<N: Clone> RawSelection<N> {
    /// A collapsed raw selection.
    pub fn caret(node: N, offset: usize) -> Self {
        Self {
            anchor: node.clone(),
            anchor_offset: offset,
            focus: node,
            focus_offset: offset,
        }
    }
}

/// Capability a host document provides to the selection model.
///
/// The document is an ordered sequence of line containers; each line holds a tree of inline
/// nodes. Only leaves carry text; line-break markers carry none.
pub trait LineIndexedDocument {
    /// Handle to a line container or an inline node.
    type Node: Clone + PartialEq;

    /// Number of lines.
    fn line_count(&self) -> usize;

    /// The line container at `index`.
    fn nth_line(&self, index: usize) -> Option<Self::Node>;

    /// Index of the line containing `node`, or `None` if the node is not in the document.
    fn line_index_from_node(&self, node: &Self::Node) -> Option<usize>;

    /// The line container holding `node`.
    fn line_from_node(&self, node: &Self::Node) -> Option<Self::Node> {
        self.line_index_from_node(node)
            .and_then(|index| self.nth_line(index))
    }

    /// The host's current selection.
    fn raw_selection(&self) -> Option<RawSelection<Self::Node>>;

    /// Replace the host's current selection.
    fn set_raw_selection(&mut self, selection: Option<RawSelection<Self::Node>>);

    /// Returns `true` if the host has an active selection inside this document.
    fn has_selection(&self) -> bool {
        self.raw_selection()
            .is_some_and(|raw| self.line_index_from_node(&raw.focus).is_some())
    }

    /// Parent of `node`; `None` for line containers.
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Children of `node`, in document order.
    fn children(&self, node: &Self::Node) -> Vec<Self::Node>;

    /// Returns `true` if `node` is a line container.
    fn is_line(&self, node: &Self::Node) -> bool;

    /// Returns `true` if `node` is a line-break marker.
    fn is_line_break(&self, node: &Self::Node) -> bool;

    /// All text under `node`.
    fn text_content(&self, node: &Self::Node) -> String;

    /// Length of [`LineIndexedDocument::text_content`] in characters.
    fn text_len(&self, node: &Self::Node) -> usize {
        self.text_content(node).chars().count()
    }

    /// Text of the line at `index` (empty if out of range).
    fn line_text(&self, index: usize) -> String {
        self.nth_line(index)
            .map(|line| self.text_content(&line))
            .unwrap_or_default()
    }
}

/// Which neighbour of the selection [`SelectionManager::char_at_selection`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharDirection {
    /// The character just before the selection start.
    Before,
    /// The character just after the selection end.
    After,
}

/// Selection utilities for a [`LineIndexedDocument`].
#[derive(Debug, Clone)]
pub struct SelectionManager<D> {
    source: D,
}

impl<D: LineIndexedDocument> SelectionManager<D> {
    /// Wrap `source`.
    pub fn new(source: D) -> Self {
        Self { source }
    }

    /// The wrapped document.
    pub fn source(&self) -> &D {
        &self.source
    }

    /// The wrapped document, mutably.
    pub fn source_mut(&mut self) -> &mut D {
        &mut self.source
    }

    /// Unwrap the document.
    pub fn into_source(self) -> D {
        self.source
    }

    /// The current selection, normalized so that `start <= end`.
    ///
    /// Returns `None` when the document has no active selection.
    pub fn selection_info(&self) -> Option<SelectionInfo> {
        let (mut start, mut end) = self.anchor_and_focus()?;
        if end < start {
            std::mem::swap(&mut start, &mut end);
        }
        Some(self.region(start, end))
    }

    /// Anchor and focus of the current selection as line/column positions, unordered.
    pub fn anchor_and_focus(&self) -> Option<(Position, Position)> {
        if !self.source.has_selection() {
            return None;
        }
        let raw = self.source.raw_selection()?;

        let anchor = Position::new(
            self.source.line_index_from_node(&raw.anchor)?,
            self.visual_caret_offset(&raw.anchor, raw.anchor_offset),
        );
        let focus = Position::new(
            self.source.line_index_from_node(&raw.focus)?,
            self.visual_caret_offset(&raw.focus, raw.focus_offset),
        );
        Some((anchor, focus))
    }

    /// A selection spanning `start..end` with its text read from the document.
    pub fn region(&self, start: Position, end: Position) -> SelectionInfo {
        SelectionInfo {
            start,
            end,
            selected_text: self.text_in_region(start, end),
        }
    }

    /// Character offset of (`node`, `raw_offset`) from the start of its line.
    ///
    /// Walks up to the line container, adding the text length of every preceding sibling at
    /// each level, so nested inline markup is transparent.
    pub fn visual_caret_offset(&self, node: &D::Node, raw_offset: usize) -> usize {
        let children = self.source.children(node);
        let mut offset = if children.is_empty() {
            raw_offset
        } else {
            children
                .iter()
                .take(raw_offset)
                .map(|child| self.source.text_len(child))
                .sum()
        };

        if self.source.is_line(node) {
            return offset;
        }

        let mut current = node.clone();
        while let Some(parent) = self.source.parent(&current) {
            for sibling in self.source.children(&parent) {
                if sibling == current {
                    break;
                }
                offset += self.source.text_len(&sibling);
            }
            if self.source.is_line(&parent) {
                break;
            }
            current = parent;
        }

        offset
    }

    /// Host node and raw offset for the caret at (`line`, `column`).
    ///
    /// Descends through the line's children, skipping line-break markers, until the node
    /// containing `column` is found. Columns past the end of the line clamp to its end.
    pub fn caret_placement(&self, position: Position) -> Option<(D::Node, usize)> {
        let line = self.source.nth_line(position.line)?;
        Some(self.place_within(line, position.column))
    }

    fn place_within(&self, node: D::Node, column: usize) -> (D::Node, usize) {
        let children = self.source.children(&node);
        if children.is_empty() {
            let len = self.source.text_len(&node);
            return (node, column.min(len));
        }

        let mut running = 0;
        for child in &children {
            if self.source.is_line_break(child) {
                continue;
            }
            let len = self.source.text_len(child);
            if running + len >= column {
                return self.place_within(child.clone(), column - running);
            }
            running += len;
        }

        // Only line breaks, or past the end: address the container by child index.
        let child_index = if running == 0 { 0 } else { children.len() };
        (node, child_index)
    }

    /// Select from `anchor` to `focus` (either order).
    pub fn select(&mut self, anchor: Position, focus: Position) {
        let (Some((anchor_node, anchor_offset)), Some((focus_node, focus_offset))) =
            (self.caret_placement(anchor), self.caret_placement(focus))
        else {
            log::debug!(
                target: "workbench_core::selection",
                "ignoring selection outside the document: {:?}..{:?}",
                anchor,
                focus
            );
            return;
        };

        self.set_raw_caret_range(anchor_node, anchor_offset, focus_node, focus_offset);
    }

    /// Select the region described by `info`, or place the caret at the document start.
    pub fn set_caret_range(&mut self, info: Option<&SelectionInfo>) {
        match info {
            Some(info) => self.select(info.start, info.end),
            None => self.set_caret_position(Position::default()),
        }
    }

    /// Collapse the selection to a caret at `position`.
    pub fn set_caret_position(&mut self, position: Position) {
        self.select(position, position);
    }

    /// Select between two raw host locations.
    pub fn set_raw_caret_range(
        &mut self,
        anchor: D::Node,
        anchor_offset: usize,
        focus: D::Node,
        focus_offset: usize,
    ) {
        self.source.set_raw_selection(Some(RawSelection {
            anchor,
            anchor_offset,
            focus,
            focus_offset,
        }));
    }

    /// Collapse a range selection onto its focus.
    pub fn clear_selection(&mut self) {
        let Some(raw) = self.source.raw_selection() else {
            return;
        };
        let Some(line) = self.source.line_index_from_node(&raw.focus) else {
            return;
        };
        let column = self.visual_caret_offset(&raw.focus, raw.focus_offset);
        self.set_caret_position(Position::new(line, column));
    }

    /// The range covering `a` and `b`.
    ///
    /// If `b` starts before `a`, the result spans `b.start..a.start`; otherwise it spans
    /// `a.start..b.end`. The text is re-read from the document.
    pub fn difference(&self, a: &SelectionInfo, b: &SelectionInfo) -> SelectionInfo {
        if b.start < a.start {
            self.region(b.start, a.start)
        } else {
            self.region(a.start, b.end)
        }
    }

    /// Text between `start` and `end`, one entry per line.
    ///
    /// A line past the end of the document stands for the end of the last line, and columns
    /// past the end of a line stand for its end. A collapsed range yields `[""]`.
    pub fn text_in_region(&self, start: Position, end: Position) -> Vec<String> {
        let last = self.source.line_count().saturating_sub(1);
        let clamp = |p: Position| {
            if p.line > last {
                Position::new(last, usize::MAX)
            } else {
                p
            }
        };
        let (start, end) = (clamp(start), clamp(end));
        if start >= end {
            return vec![String::new()];
        }

        let mut text: Vec<String> = (start.line..=end.line)
            .map(|line| self.source.line_text(line))
            .collect();

        if let Some(last) = text.last_mut() {
            *last = char_prefix(last, end.column);
        }
        if let Some(first) = text.first_mut() {
            *first = char_suffix(first, start.column);
        }
        text
    }

    /// The character adjacent to the current selection.
    ///
    /// Crossing a line boundary yields `'\n'`; stepping past either end of the document
    /// yields `None`.
    pub fn char_at_selection(&self, direction: CharDirection) -> Option<char> {
        let info = self.selection_info()?;

        match direction {
            CharDirection::Before => {
                let Position { line, column } = info.start;
                if column == 0 {
                    return (line > 0).then_some('\n');
                }
                self.source.line_text(line).chars().nth(column - 1)
            }
            CharDirection::After => {
                let Position { line, column } = info.end;
                let text = self.source.line_text(line);
                if column >= text.chars().count() {
                    return (line + 1 < self.source.line_count()).then_some('\n');
                }
                text.chars().nth(column)
            }
        }
    }
}

/// The first `count` characters of `s`.
pub(crate) fn char_prefix(s: &str, count: usize) -> String {
    s.chars().take(count).collect()
}

/// `s` without its first `count` characters.
pub(crate) fn char_suffix(s: &str, count: usize) -> String {
    s.chars().skip(count).collect()
}
