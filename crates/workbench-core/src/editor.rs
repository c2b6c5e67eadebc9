//! Query editor host.
//!
//! [`QueryEditor`] ties a [`MarkupDocument`], its [`SelectionManager`] and a [`RecordManager`]
//! together. It performs the document mutations that user input triggers, wraps each in the
//! right kind of record, and replays records for undo and redo. Lines are restyled with
//! [`render_line`] whenever they change.

use crate::document::{MarkupDocument, split_lines};
use crate::records::{DeletionDirection, RecordAction, RecordKind, RecordManager};
use crate::selection::{
    CharDirection, LineIndexedDocument, Position, SelectionInfo, SelectionManager, char_prefix,
    char_suffix,
};
use crate::styling::{KeywordStyles, render_line, style_tokenize};
use std::fmt;
use std::rc::Rc;

const LOG_TARGET: &str = "workbench_core::editor";

type Selection = SelectionManager<MarkupDocument>;
type Styles<'a> = Option<&'a dyn KeywordStyles>;

/// An editable, undoable query document.
pub struct QueryEditor {
    selection: Selection,
    records: RecordManager,
    keywords: Option<Rc<dyn KeywordStyles>>,
}

impl QueryEditor {
    /// Create an editor holding `text`, with the caret at the start.
    pub fn new(text: &str) -> Self {
        Self::build(text, None)
    }

    /// Create an editor that styles keywords using `keywords`.
    pub fn with_keywords(text: &str, keywords: Rc<dyn KeywordStyles>) -> Self {
        Self::build(text, Some(keywords))
    }

    fn build(text: &str, keywords: Option<Rc<dyn KeywordStyles>>) -> Self {
        let lines = split_lines(text)
            .into_iter()
            .map(|line| render_line(line, keywords.as_deref()))
            .collect();
        let mut selection = SelectionManager::new(MarkupDocument::from_lines(lines));
        selection.set_caret_position(Position::default());
        Self {
            selection,
            records: RecordManager::new(),
            keywords,
        }
    }

    /// Document text.
    pub fn text(&self) -> String {
        self.selection.source().text()
    }

    /// The underlying document.
    pub fn document(&self) -> &MarkupDocument {
        self.selection.source()
    }

    /// The selection model.
    pub fn selection_manager(&self) -> &SelectionManager<MarkupDocument> {
        &self.selection
    }

    /// The edit record log.
    pub fn records(&self) -> &RecordManager {
        &self.records
    }

    /// Current selection.
    pub fn selection(&self) -> Option<SelectionInfo> {
        self.selection.selection_info()
    }

    /// Move the selection. Closes any open record, like a mouse click does.
    pub fn select(&mut self, anchor: Position, focus: Position) {
        self.records.end_record(&self.selection);
        self.selection.select(anchor, focus);
    }

    /// Collapse the selection to a caret at `position`.
    pub fn set_caret(&mut self, position: Position) {
        self.select(position, position);
    }

    /// Close any open record.
    pub fn end_record(&mut self) {
        self.records.end_record(&self.selection);
    }

    /// Drop focus: close any open record and forget the selection.
    pub fn blur(&mut self) {
        self.records.end_record(&self.selection);
        self.selection.source_mut().set_raw_selection(None);
    }

    /// Type `text` at the selection.
    ///
    /// Consecutive typing accumulates into one Input record; text containing a line break is
    /// always a record of its own. Does nothing while the editor has no selection.
    pub fn insert_text(&mut self, text: &str) {
        if text.is_empty() || !self.has_focus("insert") {
            return;
        }
        let lines = owned_lines(text);
        let styles = self.keywords.as_deref();

        if lines.len() > 1 {
            self.records.start_input_record(&self.selection);
            replace_selected_region(&mut self.selection, styles, &lines);
            self.records.end_record(&self.selection);
            return;
        }

        if !self.records.is_recording(RecordKind::Input) {
            self.records.start_input_record(&self.selection);
        }
        replace_selected_region(&mut self.selection, styles, &lines);
    }

    /// Backspace.
    pub fn delete_backward(&mut self) {
        self.delete(DeletionDirection::Backward);
    }

    /// Delete key.
    pub fn delete_forward(&mut self) {
        self.delete(DeletionDirection::Forward);
    }

    fn delete(&mut self, direction: DeletionDirection) {
        self.records
            .start_deletion_record(direction, &self.selection);
        delete_char(&mut self.selection, self.keywords.as_deref(), direction);
    }

    /// Paste `text` over the selection. Does nothing while the editor has no selection.
    pub fn paste(&mut self, text: &str) {
        if text.is_empty() || !self.has_focus("paste") {
            return;
        }
        let lines = owned_lines(text);
        let styles = self.keywords.as_deref();
        self.records
            .record_from_fn(RecordKind::Paste, &mut self.selection, |selection| {
                replace_selected_region(selection, styles, &lines)
            });
    }

    /// Tab key: a tab character within a line, or an indent of every selected line.
    pub fn tab(&mut self) {
        let Some(info) = self.selection.selection_info() else {
            return;
        };
        let styles = self.keywords.as_deref();

        if info.start.line == info.end.line {
            let tab = [String::from("\t")];
            self.records
                .record_from_fn(RecordKind::Input, &mut self.selection, |selection| {
                    replace_selected_region(selection, styles, &tab)
                });
        } else {
            self.records
                .record_from_fn(RecordKind::TabForward, &mut self.selection, |selection| {
                    shift_right(selection, styles)
                });
        }
    }

    /// Shift-tab: remove one leading tab from every selected line.
    pub fn shift_tab(&mut self) {
        let styles = self.keywords.as_deref();
        self.records
            .record_from_fn(RecordKind::TabBackward, &mut self.selection, |selection| {
                shift_left(selection, styles)
            });
    }

    /// Accept an autocomplete `option`, replacing the `prefix_len` characters before the caret.
    pub fn fill(&mut self, prefix_len: usize, option: &str) {
        let Some(info) = self.selection.selection_info() else {
            return;
        };
        let caret = info.end;
        let from = caret.column.saturating_sub(prefix_len);
        let line = self.selection.source().line_text(caret.line);
        let prefix: String = line.chars().skip(from).take(caret.column - from).collect();

        let styles = self.keywords.as_deref();
        self.records.create_fill_record(
            &mut self.selection,
            |selection| fill_at_caret(selection, styles, prefix_len, option),
            &prefix,
            option,
        );
    }

    /// Replace the selection with text coming from outside the editor.
    ///
    /// Single-line text is padded with spaces where it would otherwise touch a non-whitespace
    /// neighbour. Without a selection the text is appended on a new last line.
    pub fn replace_from_external(&mut self, text: &str) {
        self.records.end_record(&self.selection);
        let styles = self.keywords.as_deref();
        let mut lines = owned_lines(text);

        let start = match self.selection.selection_info() {
            Some(info) => {
                if lines.len() == 1 {
                    let touches = |c: Option<char>| c.is_some_and(|c| !c.is_whitespace());
                    if touches(self.selection.char_at_selection(CharDirection::Before)) {
                        lines[0].insert(0, ' ');
                    }
                    if touches(self.selection.char_at_selection(CharDirection::After)) {
                        lines[0].push(' ');
                    }
                }
                info
            }
            None => {
                let last = self.selection.source().line_count() - 1;
                let column = self.selection.source().line_text(last).chars().count();
                let at = Position::new(last, column);
                if column > 0 {
                    lines.insert(0, String::new());
                }
                self.selection.set_caret_position(at);
                self.selection.region(at, at)
            }
        };

        replace_selected_region(&mut self.selection, styles, &lines);
        let Some(end) = self.selection.selection_info() else {
            return;
        };
        self.records
            .set_record(RecordKind::External, start, end, &self.selection);
    }

    /// Move the caret to the next token boundary on the left (Ctrl+Left).
    ///
    /// With `extend` the anchor stays put and the selection grows or shrinks (Ctrl+Shift+Left).
    pub fn move_token_left(&mut self, extend: bool) {
        self.move_focus(extend, |document, focus| {
            Position::new(focus.line, token_left(&document.line_text(focus.line), focus.column))
        });
    }

    /// Move the caret to the next token boundary on the right (Ctrl+Right).
    pub fn move_token_right(&mut self, extend: bool) {
        self.move_focus(extend, |document, focus| {
            Position::new(focus.line, token_right(&document.line_text(focus.line), focus.column))
        });
    }

    /// Home: move to the end of the line's leading tabs, or to column 0 if already there.
    pub fn move_to_line_start(&mut self, extend: bool) {
        self.move_focus(extend, |document, focus| {
            let indent = document
                .line_text(focus.line)
                .chars()
                .take_while(|c| *c == '\t')
                .count();
            let column = if focus.column == indent { 0 } else { indent };
            Position::new(focus.line, column)
        });
    }

    /// End: move to the end of the line.
    pub fn move_to_line_end(&mut self, extend: bool) {
        self.move_focus(extend, |document, focus| {
            Position::new(focus.line, document.line_text(focus.line).chars().count())
        });
    }

    /// Ctrl+Home: move to the start of the document.
    pub fn move_to_document_start(&mut self, extend: bool) {
        self.move_focus(extend, |_, _| Position::default());
    }

    /// Ctrl+End: move to the end of the document.
    pub fn move_to_document_end(&mut self, extend: bool) {
        self.move_focus(extend, |document, _| {
            let last = document.line_count().saturating_sub(1);
            Position::new(last, document.line_text(last).chars().count())
        });
    }

    /// Move the caret one line up or down, keeping its column where the line allows.
    ///
    /// On the first line moving up goes to column 0; on the last line moving down goes to the
    /// end of the line.
    pub fn move_line(&mut self, direction: LineDirection, extend: bool) {
        self.move_focus(extend, |document, focus| {
            let last = document.line_count().saturating_sub(1);
            let target = match direction {
                LineDirection::Up => focus.line.saturating_sub(1),
                LineDirection::Down => (focus.line + 1).min(last),
            };
            let len = document.line_text(target).chars().count();
            let column = if target != focus.line {
                focus.column.min(len)
            } else {
                match direction {
                    LineDirection::Up => 0,
                    LineDirection::Down => len,
                }
            };
            Position::new(target, column)
        });
    }

    /// The whole document on one line: lines joined by a space unless whitespace already
    /// separates them.
    pub fn contents_to_string(&self) -> String {
        let document = self.selection.source();
        let last = document.line_count().saturating_sub(1);
        let end = Position::new(last, document.line_text(last).chars().count());
        self.selection
            .region(Position::default(), end)
            .to_single_line_string()
    }

    fn move_focus(
        &mut self,
        extend: bool,
        target: impl FnOnce(&MarkupDocument, Position) -> Position,
    ) {
        self.records.end_record(&self.selection);
        let Some((anchor, focus)) = self.selection.anchor_and_focus() else {
            return;
        };
        let to = target(self.selection.source(), focus);
        if extend {
            self.selection.select(anchor, to);
        } else {
            self.selection.set_caret_position(to);
        }
    }

    fn has_focus(&self, operation: &str) -> bool {
        let focused = self.selection.selection_info().is_some();
        if !focused {
            log::debug!(target: LOG_TARGET, "no selection, ignoring {operation}");
        }
        focused
    }

    /// Begin dragging the current selection.
    pub fn start_drag(&mut self) {
        self.records.start_drag_record(&self.selection);
    }

    /// Move the selected text to `target` and select it there.
    ///
    /// Returns `false` (and changes nothing) when the selection is empty or `target` lies
    /// inside it.
    pub fn drop_at(&mut self, target: Position) -> bool {
        let Some(info) = self.selection.selection_info() else {
            return false;
        };
        if info.is_empty() || (info.start..=info.end).contains(&target) {
            return false;
        }

        let styles = self.keywords.as_deref();
        replace_selected_region(&mut self.selection, styles, &[String::new()]);
        let target = shift_for_removal(target, &info);
        self.selection.set_caret_position(target);
        replace_selected_region(&mut self.selection, styles, &info.selected_text);

        let Some(after) = self.selection.selection_info() else {
            return false;
        };
        self.selection.select(target, after.end);
        true
    }

    /// Finish a drag, recording it.
    pub fn finish_drag(&mut self) {
        self.records.end_record(&self.selection);
    }

    /// Abort a drag without recording it.
    pub fn cancel_drag(&mut self) {
        self.records.cancel_record();
    }

    /// Undo the most recent record. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.records.end_record(&self.selection);
        let Some(record) = self.records.undo().cloned() else {
            return false;
        };
        log::debug!(target: LOG_TARGET, "undo {:?}", record.kind());

        let styles = self.keywords.as_deref();
        let selection = &mut self.selection;
        match &record.action {
            RecordAction::Input | RecordAction::Paste | RecordAction::External => {
                selection.set_caret_range(Some(&record.difference));
                replace_selected_region(selection, styles, &record.start.selected_text);
            }
            RecordAction::BackwardDeletion => {
                selection.set_caret_range(Some(&record.end));
                replace_selected_region(selection, styles, &record.start.selected_text);
            }
            RecordAction::ForwardDeletion => {
                selection.set_caret_position(record.start.start);
                replace_selected_region(selection, styles, &record.start.selected_text);
            }
            RecordAction::Fill { prefix, .. } => {
                selection.set_caret_range(Some(&record.difference));
                replace_selected_region(selection, styles, std::slice::from_ref(prefix));
            }
            RecordAction::TabForward => {
                selection.set_caret_range(Some(&record.end));
                shift_left(selection, styles);
            }
            RecordAction::TabBackward { detabbed } => {
                for (offset, _) in detabbed.iter().enumerate().filter(|(_, flag)| **flag) {
                    let line = record.start.start.line + offset;
                    let text = selection.source().line_text(line);
                    set_line(selection, styles, line, &format!("\t{text}"));
                }
            }
            RecordAction::Drag => {
                selection.set_caret_range(Some(&record.end));
                replace_selected_region(selection, styles, &[String::new()]);
                selection.set_caret_position(record.start.start);
                replace_selected_region(selection, styles, &record.start.selected_text);
            }
        }
        selection.set_caret_range(Some(&record.start));
        true
    }

    /// Redo the most recently undone record. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        self.records.end_record(&self.selection);
        let Some(record) = self.records.redo().cloned() else {
            return false;
        };
        log::debug!(target: LOG_TARGET, "redo {:?}", record.kind());

        let styles = self.keywords.as_deref();
        let selection = &mut self.selection;
        match &record.action {
            RecordAction::Input | RecordAction::Paste | RecordAction::External => {
                selection.set_caret_range(Some(&record.start));
                replace_selected_region(selection, styles, &record.difference.selected_text);
                selection.set_caret_range(Some(&record.end));
            }
            RecordAction::BackwardDeletion | RecordAction::ForwardDeletion => {
                selection.set_caret_range(Some(&record.difference));
                replace_selected_region(selection, styles, &[String::new()]);
            }
            RecordAction::Fill { prefix, completion } => {
                selection.set_caret_range(Some(&record.start));
                fill_at_caret(selection, styles, prefix.chars().count(), completion);
            }
            RecordAction::TabForward => {
                selection.set_caret_range(Some(&record.start));
                shift_right(selection, styles);
            }
            RecordAction::TabBackward { .. } => {
                selection.set_caret_range(Some(&record.start));
                shift_left(selection, styles);
            }
            RecordAction::Drag => {
                selection.set_caret_range(Some(&record.start));
                replace_selected_region(selection, styles, &[String::new()]);
                selection.set_caret_position(record.end.start);
                replace_selected_region(selection, styles, &record.end.selected_text);
                selection.set_caret_range(Some(&record.end));
            }
        }
        true
    }
}

/// Direction for [`QueryEditor::move_line`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    /// Towards the first line.
    Up,
    /// Towards the last line.
    Down,
}

impl fmt::Debug for QueryEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryEditor")
            .field("text", &self.text())
            .field("selection", &self.selection())
            .field("records", &self.records)
            .field("styled", &self.keywords.is_some())
            .finish()
    }
}

fn owned_lines(text: &str) -> Vec<String> {
    split_lines(text).into_iter().map(str::to_string).collect()
}

fn set_line(selection: &mut Selection, styles: Styles<'_>, index: usize, text: &str) {
    selection
        .source_mut()
        .replace_line(index, render_line(text, styles));
}

/// Replace the selected region with `lines` and leave the caret after the inserted text.
///
/// Without a selection the caret is taken to be at the end of the document.
fn replace_selected_region(selection: &mut Selection, styles: Styles<'_>, lines: &[String]) {
    let (start, end) = match selection.selection_info() {
        Some(info) => (info.start, info.end),
        None => {
            let last = selection.source().line_count() - 1;
            let end = Position::new(last, selection.source().line_text(last).chars().count());
            (end, end)
        }
    };

    let head = char_prefix(&selection.source().line_text(start.line), start.column);
    let tail = char_suffix(&selection.source().line_text(end.line), end.column);

    let mut new_lines: Vec<String> = if lines.is_empty() {
        vec![String::new()]
    } else {
        lines.to_vec()
    };
    let last_index = new_lines.len() - 1;
    new_lines[0].insert_str(0, &head);
    let caret = Position::new(
        start.line + last_index,
        new_lines[last_index].chars().count(),
    );
    new_lines[last_index].push_str(&tail);

    let rendered = new_lines
        .iter()
        .map(|line| render_line(line, styles))
        .collect();
    selection
        .source_mut()
        .splice_lines(start.line..end.line + 1, rendered);
    selection.set_caret_position(caret);
}

fn delete_char(selection: &mut Selection, styles: Styles<'_>, direction: DeletionDirection) {
    let Some(info) = selection.selection_info() else {
        return;
    };
    if !info.is_empty() {
        replace_selected_region(selection, styles, &[String::new()]);
        return;
    }

    let Position { line, column } = info.start;
    let source = selection.source();
    let region = match direction {
        DeletionDirection::Backward if column > 0 => {
            Some((Position::new(line, column - 1), info.start))
        }
        DeletionDirection::Backward if line > 0 => {
            let above = source.line_text(line - 1).chars().count();
            Some((Position::new(line - 1, above), info.start))
        }
        DeletionDirection::Forward if column < source.line_text(line).chars().count() => {
            Some((info.start, Position::new(line, column + 1)))
        }
        DeletionDirection::Forward if line + 1 < source.line_count() => {
            Some((info.start, Position::new(line + 1, 0)))
        }
        _ => None,
    };

    if let Some((from, to)) = region {
        selection.select(from, to);
        replace_selected_region(selection, styles, &[String::new()]);
    }
}

fn fill_at_caret(selection: &mut Selection, styles: Styles<'_>, prefix_len: usize, option: &str) {
    let Some(info) = selection.selection_info() else {
        return;
    };
    let caret = info.end;
    selection.select(
        Position::new(caret.line, caret.column.saturating_sub(prefix_len)),
        caret,
    );
    replace_selected_region(selection, styles, &owned_lines(option));
}

fn shift_right(selection: &mut Selection, styles: Styles<'_>) {
    let Some(info) = selection.selection_info() else {
        return;
    };
    for line in info.line_span() {
        let text = selection.source().line_text(line);
        set_line(selection, styles, line, &format!("\t{text}"));
    }
    selection.select(
        Position::new(info.start.line, info.start.column + 1),
        Position::new(info.end.line, info.end.column + 1),
    );
}

fn shift_left(selection: &mut Selection, styles: Styles<'_>) {
    let Some(info) = selection.selection_info() else {
        return;
    };
    let mut start = info.start;
    let mut end = info.end;
    for line in info.line_span() {
        let text = selection.source().line_text(line);
        let Some(rest) = text.strip_prefix('\t') else {
            continue;
        };
        set_line(selection, styles, line, rest);
        if line == start.line {
            start.column = start.column.saturating_sub(1);
        }
        if line == end.line {
            end.column = end.column.saturating_sub(1);
        }
    }
    selection.select(start, end);
}

/// A token holding exactly one whitespace, bracket or dot character.
fn is_separator(token: &str) -> bool {
    token
        .chars()
        .filter(|c| c.is_whitespace() || matches!(c, '[' | ']' | '.'))
        .count()
        == 1
}

/// Index of the token containing `column` (a boundary belongs to the token on its left) and
/// that token's end column.
fn token_at(lengths: &[usize], column: usize) -> (usize, usize) {
    let mut index = 0;
    let mut end = lengths[0];
    while end < column && index + 1 < lengths.len() {
        index += 1;
        end += lengths[index];
    }
    (index, end)
}

fn token_left(line: &str, column: usize) -> usize {
    let tokens = style_tokenize(line);
    if tokens.is_empty() {
        return column;
    }
    let lengths: Vec<usize> = tokens.iter().map(|t| t.chars().count()).collect();
    let (j, end) = token_at(&lengths, column);

    let mut i = end - lengths[j];
    if is_separator(tokens[j]) {
        if j > 0 && !is_separator(tokens[j - 1]) {
            i -= lengths[j - 1];
        }
    } else if i == column {
        for k in 1..=j.min(2) {
            i -= lengths[j - k];
        }
    }
    i
}

fn token_right(line: &str, column: usize) -> usize {
    let tokens = style_tokenize(line);
    if tokens.is_empty() {
        return column;
    }
    let lengths: Vec<usize> = tokens.iter().map(|t| t.chars().count()).collect();
    let (j, mut i) = token_at(&lengths, column);

    if is_separator(tokens[j]) {
        if j + 1 < tokens.len() {
            i += lengths[j + 1];
        }
    } else if i == column && j + 1 < tokens.len() {
        i += lengths[j + 1];
        // Step over a lone separator onto the end of the following word.
        if j + 2 < tokens.len() && is_separator(tokens[j + 1]) && !is_separator(tokens[j + 2]) {
            i += lengths[j + 2];
        }
    }
    i
}

/// Where `target` ends up once the text selected by `removed` is deleted.
fn shift_for_removal(target: Position, removed: &SelectionInfo) -> Position {
    if target <= removed.start {
        return target;
    }
    if target.line == removed.end.line {
        Position::new(
            removed.start.line,
            removed.start.column + target.column - removed.end.column,
        )
    } else {
        Position::new(
            target.line - (removed.end.line - removed.start.line),
            target.column,
        )
    }
}
