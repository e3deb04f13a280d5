//! Context for report parsing with note collection.

/// A non-fatal observation made while parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Note {
    /// An `<error>` block had a stack after its first one (typically after
    /// `<auxwhat>`). Only the first stack becomes part of the record.
    AuxiliaryStackIgnored {
        /// Byte offset of the ignored `<stack>` tag.
        position: u64,
    },
}

/// Context for report parsing that collects notes and counters.
///
/// Counters are plain integers and always maintained. Notes are kept only
/// by a context created with [`ParseContext::new`]; the context used by
/// [`ReportParser::parse`](crate::ReportParser::parse) counts without
/// keeping notes, so its memory does not grow with the report. When a
/// parse fails the context keeps whatever was collected up to the failure.
///
/// # Example
///
/// ```rust
/// use valgrind_report::{ParseContext, parse_with_context};
///
/// let report = "<valgrindoutput></valgrindoutput>";
/// let mut ctx = ParseContext::new();
/// let records = parse_with_context(report.as_bytes(), &mut ctx).unwrap();
/// assert!(records.is_empty());
/// assert_eq!(ctx.blocks(), 0);
/// assert!(!ctx.has_notes());
/// ```
#[derive(Debug)]
pub struct ParseContext {
    notes: Vec<Note>,
    keep_notes: bool,
    blocks: usize,
    duplicates: usize,
    auxiliary_stacks: usize,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseContext {
    /// Create a new parse context that keeps notes.
    pub fn new() -> Self {
        Self {
            notes: Vec::new(),
            keep_notes: true,
            blocks: 0,
            duplicates: 0,
            auxiliary_stacks: 0,
        }
    }

    /// A context that only maintains counters.
    pub(crate) fn counting_only() -> Self {
        Self {
            keep_notes: false,
            ..Self::new()
        }
    }

    /// Add a note to the context.
    pub fn add_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Check if any notes have been collected.
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Get all collected notes.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// Take all collected notes, leaving the context empty.
    pub fn take_notes(&mut self) -> Vec<Note> {
        std::mem::take(&mut self.notes)
    }

    /// Number of complete `<error>` blocks seen, duplicates included.
    pub fn blocks(&self) -> usize {
        self.blocks
    }

    /// Number of blocks that collapsed into an earlier identical record.
    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    /// Number of auxiliary stacks that were not made part of a record.
    pub fn auxiliary_stacks(&self) -> usize {
        self.auxiliary_stacks
    }

    pub(crate) fn count_block(&mut self) {
        self.blocks += 1;
    }

    pub(crate) fn count_duplicate(&mut self) {
        self.duplicates += 1;
    }

    pub(crate) fn count_auxiliary_stack(&mut self, position: u64) {
        self.auxiliary_stacks += 1;
        if self.keep_notes {
            self.notes.push(Note::AuxiliaryStackIgnored { position });
        }
    }
}
