//! Accumulators for the `<error>` block currently being parsed.

use crate::error::{Error, MissingPart, Result};
use crate::types::{ErrorRecord, Frame, Stack};

/// Collects the parts of one `<error>` block and checks that it is complete.
///
/// The parser creates one of these at `<error>` and calls [`finalize`]
/// at `</error>`. All completeness checks happen in `finalize`.
///
/// [`finalize`]: RecordBuilder::finalize
#[derive(Debug, Default)]
pub struct RecordBuilder {
    kind: Option<String>,
    message: Option<String>,

    /// `Some` once the first `<stack>` was opened, even if it stays empty.
    frames: Option<Vec<Frame>>,

    /// Whether frames are currently being added to the primary stack.
    collecting: bool,
}

impl RecordBuilder {
    /// Create a builder for a freshly opened `<error>` block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the `<kind>` text. A later `<kind>` overwrites an earlier one.
    pub fn observe_kind(&mut self, text: impl Into<String>) {
        self.kind = Some(text.into());
    }

    /// Record the message from either `<what>` or `<xwhat><text>`.
    ///
    /// Whichever form is observed last wins.
    pub fn observe_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
    }

    /// Open a `<stack>`.
    ///
    /// Returns `false` for auxiliary stacks (any stack after the first);
    /// frames added until the matching [`end_stack`] are then dropped.
    ///
    /// [`end_stack`]: RecordBuilder::end_stack
    pub fn begin_stack(&mut self) -> bool {
        if self.frames.is_some() {
            self.collecting = false;
            return false;
        }
        self.frames = Some(Vec::new());
        self.collecting = true;
        true
    }

    /// Append a frame to the open primary stack. Ignored otherwise.
    pub fn add_frame(&mut self, frame: Frame) {
        if !self.collecting {
            return;
        }
        if let Some(frames) = self.frames.as_mut() {
            frames.push(frame);
        }
    }

    /// Stop collecting frames at the end of a `<stack>`.
    pub fn end_stack(&mut self) {
        self.collecting = false;
    }

    /// Validate the block and produce its record.
    ///
    /// `position` is the byte offset of the closing tag, used in the error.
    pub fn finalize(self, position: u64) -> Result<ErrorRecord> {
        let missing = |missing| Error::StructuralIncompleteness { missing, position };

        let kind = non_empty(self.kind).ok_or_else(|| missing(MissingPart::Kind))?;
        let message = non_empty(self.message).ok_or_else(|| missing(MissingPart::Message))?;
        let frames = self.frames.ok_or_else(|| missing(MissingPart::Stack))?;

        Ok(ErrorRecord::new(kind, message, Stack::new(frames)))
    }
}

fn non_empty(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

/// A child of `<frame>` that is captured into [`Frame`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameField {
    Ip,
    Obj,
    Fn,
    Dir,
    File,
    Line,
}

impl FrameField {
    /// Map a `<frame>` child tag name to its field, if it is one.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"ip" => Some(FrameField::Ip),
            b"obj" => Some(FrameField::Obj),
            b"fn" => Some(FrameField::Fn),
            b"dir" => Some(FrameField::Dir),
            b"file" => Some(FrameField::File),
            b"line" => Some(FrameField::Line),
            _ => None,
        }
    }
}

/// Collects the fields of one `<frame>`.
///
/// Frames are permissive: any field may be missing and an unparsable
/// `<line>` is left empty.
#[derive(Debug, Default)]
pub struct FrameBuilder {
    frame: Frame,
}

impl FrameBuilder {
    /// Create a builder for a freshly opened `<frame>`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the text of one frame child. A later value overwrites an
    /// earlier one.
    pub fn set_field(&mut self, field: FrameField, text: String) {
        let slot = match field {
            FrameField::Ip => &mut self.frame.ip,
            FrameField::Obj => &mut self.frame.obj,
            FrameField::Fn => &mut self.frame.function,
            FrameField::Dir => &mut self.frame.dir,
            FrameField::File => &mut self.frame.file,
            FrameField::Line => {
                self.frame.line = text.trim().parse().ok();
                return;
            }
        };
        *slot = Some(text);
    }

    /// Finish the frame.
    pub fn build(self) -> Frame {
        self.frame
    }
}
