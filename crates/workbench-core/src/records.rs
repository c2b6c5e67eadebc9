//! Edit record log.
//!
//! # Overview
//!
//! [`RecordManager`] captures reversible edits as [`Record`]s: a before selection, an after
//! selection, and the difference between them, tagged with a [`RecordAction`] saying what
//! kind of edit produced it. Records live on two stacks (back and forward history); at most one
//! record is open at a time while the user keeps typing or deleting.
//!
//! The manager never mutates the document itself. The host performs the edit (usually inside a
//! closure handed to [`RecordManager::record_from_fn`]) and later replays the records returned
//! by [`RecordManager::undo`] and [`RecordManager::redo`].

use crate::selection::{
    CharDirection, LineIndexedDocument, Position, SelectionInfo, SelectionManager,
};

const LOG_TARGET: &str = "workbench_core::records";

/// Kind of an edit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    /// Typed text.
    Input,
    /// Delete-key run.
    ForwardDeletion,
    /// Backspace run.
    BackwardDeletion,
    /// Clipboard paste.
    Paste,
    /// Accepted autocomplete option.
    Fill,
    /// Multi-line indent.
    TabForward,
    /// Multi-line outdent.
    TabBackward,
    /// Text replaced from outside the editor.
    External,
    /// Drag-and-drop move.
    Drag,
}

/// What a record did, with the data needed to replay it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordAction {
    /// Typed text.
    Input,
    /// Delete-key run.
    ForwardDeletion,
    /// Backspace run.
    BackwardDeletion,
    /// Clipboard paste.
    Paste,
    /// Accepted autocomplete option.
    Fill {
        /// Text before the caret that the option replaced.
        prefix: String,
        /// The inserted option.
        completion: String,
    },
    /// Multi-line indent.
    TabForward,
    /// Multi-line outdent.
    TabBackward {
        /// One flag per selected line: `true` if a leading tab was removed from it.
        detabbed: Vec<bool>,
    },
    /// Text replaced from outside the editor.
    External,
    /// Drag-and-drop move.
    Drag,
}

impl RecordAction {
    /// Kind of this action.
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Input => RecordKind::Input,
            Self::ForwardDeletion => RecordKind::ForwardDeletion,
            Self::BackwardDeletion => RecordKind::BackwardDeletion,
            Self::Paste => RecordKind::Paste,
            Self::Fill { .. } => RecordKind::Fill,
            Self::TabForward => RecordKind::TabForward,
            Self::TabBackward { .. } => RecordKind::TabBackward,
            Self::External => RecordKind::External,
            Self::Drag => RecordKind::Drag,
        }
    }

    /// Action for a kind that carries no payload; payload kinds get an empty payload.
    fn bare(kind: RecordKind) -> Self {
        match kind {
            RecordKind::Input => Self::Input,
            RecordKind::ForwardDeletion => Self::ForwardDeletion,
            RecordKind::BackwardDeletion => Self::BackwardDeletion,
            RecordKind::Paste => Self::Paste,
            RecordKind::Fill => Self::Fill {
                prefix: String::new(),
                completion: String::new(),
            },
            RecordKind::TabForward => Self::TabForward,
            RecordKind::TabBackward => Self::TabBackward {
                detabbed: Vec::new(),
            },
            RecordKind::External => Self::External,
            RecordKind::Drag => Self::Drag,
        }
    }
}

/// Which way a deletion run eats characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionDirection {
    /// Backspace: the start edge moves left.
    Backward,
    /// Delete: characters after the end edge are consumed.
    Forward,
}

impl DeletionDirection {
    fn action(self) -> RecordAction {
        match self {
            Self::Backward => RecordAction::BackwardDeletion,
            Self::Forward => RecordAction::ForwardDeletion,
        }
    }

    fn kind(self) -> RecordKind {
        self.action().kind()
    }
}

/// One undoable edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// What the edit did.
    pub action: RecordAction,
    /// Selection before the edit. For deletions its text is the deleted text.
    pub start: SelectionInfo,
    /// Selection after the edit.
    pub end: SelectionInfo,
    /// Region the edit changed, in forward document order.
    pub difference: SelectionInfo,
}

impl Record {
    /// Kind of this record.
    pub fn kind(&self) -> RecordKind {
        self.action.kind()
    }
}

#[derive(Debug, Clone)]
struct OpenRecord {
    action: RecordAction,
    start: SelectionInfo,
}

/// Back/forward history of [`Record`]s plus the record currently being built.
#[derive(Debug, Clone, Default)]
pub struct RecordManager {
    back_history: Vec<Record>,
    forward_history: Vec<Record>,
    current: Option<OpenRecord>,
}

impl RecordManager {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the open record, if any.
    pub fn recording(&self) -> Option<RecordKind> {
        self.current.as_ref().map(|open| open.action.kind())
    }

    /// Returns `true` if a record of `kind` is open.
    pub fn is_recording(&self, kind: RecordKind) -> bool {
        self.recording() == Some(kind)
    }

    /// Records available to undo, oldest first.
    pub fn back_history(&self) -> &[Record] {
        &self.back_history
    }

    /// Records available to redo, most recently undone last.
    pub fn forward_history(&self) -> &[Record] {
        &self.forward_history
    }

    /// Returns `true` if there is something to undo.
    pub fn can_undo(&self) -> bool {
        !self.back_history.is_empty()
    }

    /// Returns `true` if there is something to redo.
    pub fn can_redo(&self) -> bool {
        !self.forward_history.is_empty()
    }

    /// Number of undoable records.
    pub fn undo_depth(&self) -> usize {
        self.back_history.len()
    }

    /// Number of redoable records.
    pub fn redo_depth(&self) -> usize {
        self.forward_history.len()
    }

    /// Drop all history and any open record.
    pub fn clear(&mut self) {
        self.back_history.clear();
        self.forward_history.clear();
        self.current = None;
    }

    /// Close any open record and start an Input record at the current selection.
    pub fn start_input_record<D: LineIndexedDocument>(&mut self, selection: &SelectionManager<D>) {
        self.end_record(selection);
        self.open(RecordAction::Input, selection);
    }

    /// Start a Drag record, closing any open record of another kind.
    pub fn start_drag_record<D: LineIndexedDocument>(&mut self, selection: &SelectionManager<D>) {
        if self.recording().is_some_and(|kind| kind != RecordKind::Drag) {
            self.end_record(selection);
        }
        self.open(RecordAction::Drag, selection);
    }

    /// Start, or continue, a deletion run.
    ///
    /// Called before the host deletes anything. While a run in the same direction is open
    /// this only extends it by one character. A new run over a collapsed selection captures
    /// the character about to be deleted straight away.
    pub fn start_deletion_record<D: LineIndexedDocument>(
        &mut self,
        direction: DeletionDirection,
        selection: &SelectionManager<D>,
    ) {
        if self.is_recording(direction.kind()) {
            self.continue_deletion_record(selection);
            return;
        }

        self.end_record(selection);
        let collapsed = selection
            .selection_info()
            .is_some_and(|info| info.is_empty());
        self.open(direction.action(), selection);
        if collapsed {
            self.continue_deletion_record(selection);
        }
    }

    /// Add the character the next deletion will consume to the open deletion record.
    ///
    /// A newline adds a new empty line entry. Does nothing unless a deletion record is open.
    pub fn continue_deletion_record<D: LineIndexedDocument>(
        &mut self,
        selection: &SelectionManager<D>,
    ) {
        let Some(open) = self.current.as_mut() else {
            return;
        };
        let text = &mut open.start.selected_text;

        match open.action {
            RecordAction::BackwardDeletion => {
                match selection.char_at_selection(CharDirection::Before) {
                    Some('\n') => text.insert(0, String::new()),
                    Some(c) => {
                        if let Some(first) = text.first_mut() {
                            first.insert(0, c);
                        }
                    }
                    None => {}
                }
            }
            RecordAction::ForwardDeletion => {
                match selection.char_at_selection(CharDirection::After) {
                    Some('\n') => text.push(String::new()),
                    Some(c) => {
                        if let Some(last) = text.last_mut() {
                            last.push(c);
                        }
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    /// Perform `body` as one atomic record of `kind`.
    ///
    /// Closes any open record and clears redo history first. A TabBackward record over lines
    /// that have no leading tab is skipped entirely (`body` does not run). A Fill record made
    /// this way uses an empty prefix; prefer [`RecordManager::create_fill_record`].
    pub fn record_from_fn<D, F>(
        &mut self,
        kind: RecordKind,
        selection: &mut SelectionManager<D>,
        body: F,
    ) -> Option<&Record>
    where
        D: LineIndexedDocument,
        F: FnOnce(&mut SelectionManager<D>),
    {
        self.end_record(selection);
        self.clear_forward_history();

        let Some(start) = selection.selection_info() else {
            log::debug!(target: LOG_TARGET, "no selection, running {kind:?} unrecorded");
            body(selection);
            return None;
        };

        let mut action = RecordAction::bare(kind);
        if let RecordAction::TabBackward { detabbed } = &mut action {
            *detabbed = start
                .line_span()
                .map(|line| selection.source().line_text(line).starts_with('\t'))
                .collect();
            if !detabbed.iter().any(|&flag| flag) {
                log::trace!(target: LOG_TARGET, "nothing to outdent");
                return None;
            }
        }

        body(selection);

        let end = selection.selection_info()?;
        let difference = selection.difference(&start, &end);
        if let RecordAction::Fill { completion, .. } = &mut action {
            *completion = difference.text();
        }
        self.push(Record {
            action,
            start,
            end,
            difference,
        })
    }

    /// Perform `body` (which replaces `prefix` before the caret with `completion`) as a Fill
    /// record.
    ///
    /// The difference covers exactly the inserted completion.
    pub fn create_fill_record<D, F>(
        &mut self,
        selection: &mut SelectionManager<D>,
        body: F,
        prefix: &str,
        completion: &str,
    ) -> Option<&Record>
    where
        D: LineIndexedDocument,
        F: FnOnce(&mut SelectionManager<D>),
    {
        self.end_record(selection);
        self.clear_forward_history();

        let Some(mut start) = selection.selection_info() else {
            body(selection);
            return None;
        };
        body(selection);
        let end = selection.selection_info()?;

        let saved = (start.start, start.end);
        let fill_start = Position::new(
            end.end.line,
            end.end.column.saturating_sub(completion.chars().count()),
        );
        start.start = fill_start;
        start.end = fill_start;
        let difference = selection.difference(&start, &end);
        (start.start, start.end) = saved;

        self.push(Record {
            action: RecordAction::Fill {
                prefix: prefix.to_string(),
                completion: completion.to_string(),
            },
            start,
            end,
            difference,
        })
    }

    /// Close the open record and push it onto the back history.
    pub fn end_record<D: LineIndexedDocument>(&mut self, selection: &SelectionManager<D>) {
        let Some(OpenRecord { action, start }) = self.current.take() else {
            return;
        };
        self.clear_forward_history();

        let Some(mut end) = selection.selection_info() else {
            log::warn!(
                target: LOG_TARGET,
                "selection lost, dropping {:?} record",
                action.kind()
            );
            return;
        };

        let mut difference = match action {
            RecordAction::ForwardDeletion => {
                let deleted = &start.selected_text;
                let anchor = end.start;
                let last_len = deleted.last().map_or(0, |line| line.chars().count());
                end.end.line = anchor.line + deleted.len().saturating_sub(1);
                end.end.column = if deleted.len() <= 1 {
                    anchor.column + last_len
                } else {
                    last_len
                };
                selection.difference(&start, &end)
            }
            RecordAction::BackwardDeletion => selection.difference(&end, &start),
            _ => selection.difference(&start, &end),
        };
        if matches!(
            action,
            RecordAction::ForwardDeletion | RecordAction::BackwardDeletion
        ) {
            difference.selected_text = start.selected_text.clone();
        }

        log::debug!(target: LOG_TARGET, "closed {:?} record", action.kind());
        self.push(Record {
            action,
            start,
            end,
            difference,
        });
    }

    /// Drop the open record without recording it.
    pub fn cancel_record(&mut self) {
        if let Some(open) = self.current.take() {
            log::debug!(target: LOG_TARGET, "cancelled {:?} record", open.action.kind());
        }
    }

    /// Push a record built from two known selections.
    pub fn set_record<D: LineIndexedDocument>(
        &mut self,
        kind: RecordKind,
        start: SelectionInfo,
        end: SelectionInfo,
        selection: &SelectionManager<D>,
    ) -> Option<&Record> {
        self.clear_forward_history();
        self.end_record(selection);

        let difference = selection.difference(&start, &end);
        self.push(Record {
            action: RecordAction::bare(kind),
            start,
            end,
            difference,
        })
    }

    /// Move the most recent record to the forward history and return it.
    pub fn undo(&mut self) -> Option<&Record> {
        let record = self.back_history.pop()?;
        self.forward_history.push(record);
        self.forward_history.last()
    }

    /// Move the most recently undone record back to the history and return it.
    pub fn redo(&mut self) -> Option<&Record> {
        let record = self.forward_history.pop()?;
        self.back_history.push(record);
        self.back_history.last()
    }

    fn open<D: LineIndexedDocument>(
        &mut self,
        action: RecordAction,
        selection: &SelectionManager<D>,
    ) {
        let Some(start) = selection.selection_info() else {
            log::debug!(
                target: LOG_TARGET,
                "no selection, not opening {:?} record",
                action.kind()
            );
            return;
        };
        log::debug!(target: LOG_TARGET, "opened {:?} record", action.kind());
        self.current = Some(OpenRecord { action, start });
    }

    fn push(&mut self, record: Record) -> Option<&Record> {
        self.back_history.push(record);
        self.back_history.last()
    }

    fn clear_forward_history(&mut self) {
        if !self.forward_history.is_empty() {
            log::trace!(
                target: LOG_TARGET,
                "dropping {} redo records",
                self.forward_history.len()
            );
            self.forward_history.clear();
        }
    }
}
