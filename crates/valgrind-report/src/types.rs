//! Value types produced by the report parser.

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single location in a Valgrind stack trace.
///
/// Every field is optional: Valgrind omits `dir`/`file`/`line` when no
/// debug info is available and `fn` for stripped code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Frame {
    /// Instruction pointer, e.g. `0x4C2AB80`.
    pub ip: Option<String>,

    /// Object (binary or shared library) containing the instruction.
    pub obj: Option<String>,

    /// Function name.
    #[serde(rename = "fn")]
    pub function: Option<String>,

    /// Directory of the source file.
    pub dir: Option<String>,

    /// Source file name, relative to `dir`.
    pub file: Option<String>,

    /// Line number in `file`.
    pub line: Option<u32>,
}

impl Frame {
    /// Whether Valgrind could attribute this frame to a file or object.
    pub fn is_location_known(&self) -> bool {
        self.file.is_some() || self.obj.is_some()
    }

    /// The source path of this frame, joining `dir` and `file` when both
    /// are present.
    pub fn source_path(&self) -> Option<PathBuf> {
        let file = self.file.as_deref()?;
        Some(match &self.dir {
            Some(dir) => Path::new(dir).join(file),
            None => PathBuf::from(file),
        })
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}",
            self.ip.as_deref().unwrap_or("???"),
            self.function.as_deref().unwrap_or("???")
        )?;

        match (self.source_path(), &self.obj) {
            (Some(path), _) => {
                write!(f, " ({}", path.display())?;
                if let Some(line) = self.line {
                    write!(f, ":{}", line)?;
                }
                write!(f, ")")
            }
            (None, Some(obj)) => write!(f, " (in {})", obj),
            (None, None) => Ok(()),
        }
    }
}

/// An ordered stack trace, innermost frame first as Valgrind writes it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Stack {
    pub frames: Vec<Frame>,
}

impl Stack {
    /// Create a stack from frames in Valgrind order.
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Check if the stack has no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Get the number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Iterate over frames, innermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// The innermost frame whose source file lies under `base_dir`.
    ///
    /// This is the frame a finding should be attributed to when reporting it
    /// against project sources rather than system libraries. The check is a
    /// pure path-prefix comparison; nothing is read from disk.
    pub fn last_own_frame(&self, base_dir: impl AsRef<Path>) -> Option<&Frame> {
        let base_dir = base_dir.as_ref();
        self.frames.iter().find(|frame| {
            frame
                .source_path()
                .is_some_and(|path| path.starts_with(base_dir))
        })
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, frame) in self.frames.iter().enumerate() {
            let lead = if i == 0 { "at" } else { "by" };
            writeln!(f, "  {} {}", lead, frame)?;
        }
        Ok(())
    }
}

/// One diagnostic from a Valgrind report.
///
/// Equality and hashing cover every field, so identical `<error>` blocks
/// collapse to a single entry in the parse result.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorRecord {
    /// Memcheck error kind, e.g. `InvalidRead` or `Leak_DefinitelyLost`.
    pub kind: String,

    /// Human-readable description from `<what>` or `<xwhat><text>`.
    pub message: String,

    /// The primary stack of the error.
    pub stack: Stack,
}

impl ErrorRecord {
    /// Create a new error record.
    pub fn new(kind: impl Into<String>, message: impl Into<String>, stack: Stack) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            stack,
        }
    }

    /// Whether this is one of memcheck's leak kinds (`Leak_DefinitelyLost`,
    /// `Leak_PossiblyLost`, ...).
    pub fn is_leak(&self) -> bool {
        self.kind.starts_with("Leak_")
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}: {}", self.kind, self.message)?;
        write!(f, "{}", self.stack)
    }
}
