//! Parser configuration.

/// Settings for [`ReportParser`](crate::ReportParser).
///
/// ```rust
/// use valgrind_report::{ParserConfig, ReportParser};
///
/// let parser = ReportParser::with_config(
///     ParserConfig::default().with_buffer_capacity(64 * 1024),
/// );
/// assert_eq!(parser.config().buffer_capacity, 64 * 1024);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Initial capacity of the event buffer, in bytes. The buffer only
    /// ever holds one tag or text run at a time.
    pub buffer_capacity: usize,

    /// Trim leading and trailing whitespace from captured text
    /// (`<kind>`, `<what>`, frame fields, ...).
    pub trim_text: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: 4096,
            trim_text: true,
        }
    }
}

impl ParserConfig {
    /// Set the initial event buffer capacity.
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Enable or disable trimming of captured text.
    pub fn with_trim_text(mut self, trim: bool) -> Self {
        self.trim_text = trim;
        self
    }
}
