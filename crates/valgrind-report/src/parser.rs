//! Streaming parser that turns a Valgrind XML report into [`ErrorRecord`]s.

use crate::builder::{FrameBuilder, FrameField, RecordBuilder};
use crate::config::ParserConfig;
use crate::context::ParseContext;
use crate::error::{Error, Result};
use crate::types::ErrorRecord;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Parse a Valgrind XML report from any buffered reader.
///
/// # Example
///
/// ```rust
/// use valgrind_report::parse;
///
/// let report = r#"<valgrindoutput>
///   <error>
///     <kind>InvalidFree</kind>
///     <what>Invalid free() / delete / delete[] / realloc()</what>
///     <stack>
///       <frame><ip>0x4C2B06D</ip><fn>free</fn></frame>
///     </stack>
///   </error>
/// </valgrindoutput>"#;
///
/// let records = parse(report.as_bytes()).unwrap();
/// assert_eq!(records.len(), 1);
/// ```
///
/// # Errors
///
/// Fails if the markup is malformed or an `<error>` block is missing its
/// kind, message or stack. No records are returned on failure.
pub fn parse<R: BufRead>(input: R) -> Result<HashSet<ErrorRecord>> {
    ReportParser::new().parse(input)
}

/// Parse a Valgrind XML report held in memory.
pub fn parse_str(content: &str) -> Result<HashSet<ErrorRecord>> {
    parse(content.as_bytes())
}

/// Open and parse the report at `path`.
///
/// Every error is wrapped in [`Error::Report`] so it names the file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<HashSet<ErrorRecord>> {
    ReportParser::new().parse_file(path)
}

/// Parse a report, collecting notes and counters into `ctx`.
///
/// ```rust
/// use valgrind_report::{ParseContext, parse_with_context};
///
/// let block = "<error><kind>Leak_DefinitelyLost</kind>\
///              <xwhat><text>8 bytes in 1 blocks are definitely lost</text></xwhat>\
///              <stack/></error>";
/// let report = format!("<valgrindoutput>{block}{block}</valgrindoutput>");
///
/// let mut ctx = ParseContext::new();
/// let records = parse_with_context(report.as_bytes(), &mut ctx).unwrap();
/// assert_eq!(records.len(), 1);
/// assert_eq!(ctx.blocks(), 2);
/// assert_eq!(ctx.duplicates(), 1);
/// ```
pub fn parse_with_context<R: BufRead>(
    input: R,
    ctx: &mut ParseContext,
) -> Result<HashSet<ErrorRecord>> {
    ReportParser::new().parse_with_context(input, ctx)
}

/// A configured report parser.
///
/// The parser itself holds no per-parse state, so one instance can be
/// shared between threads and reused for any number of reports.
#[derive(Debug, Clone, Default)]
pub struct ReportParser {
    config: ParserConfig,
}

impl ReportParser {
    /// Create a parser with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with the given configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Get the parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a report from any buffered reader.
    ///
    /// Only counters are maintained while parsing, so memory beyond the
    /// result set stays bounded by one `<error>` block.
    pub fn parse<R: BufRead>(&self, input: R) -> Result<HashSet<ErrorRecord>> {
        let mut ctx = ParseContext::counting_only();
        self.parse_with_context(input, &mut ctx)
    }

    /// Parse a report, collecting notes and counters into `ctx`.
    pub fn parse_with_context<R: BufRead>(
        &self,
        input: R,
        ctx: &mut ParseContext,
    ) -> Result<HashSet<ErrorRecord>> {
        tracing::debug!("Parsing valgrind report");
        let records = ReportReader::new(input, &self.config, ctx).run()?;
        tracing::debug!(
            records = records.len(),
            blocks = ctx.blocks(),
            duplicates = ctx.duplicates(),
            auxiliary_stacks = ctx.auxiliary_stacks(),
            "Parsed valgrind report"
        );
        Ok(records)
    }

    /// Open and parse the report at `path`, naming it in any error.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<HashSet<ErrorRecord>> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| Error::from(err).in_report(path))?;
        self.parse(BufReader::new(file)).map_err(|err| err.in_report(path))
    }
}

/// Where the parser is in the report.
///
/// The state owns the builders for the block being read, so leaving
/// `<error>` drops everything but the finished record.
#[derive(Debug)]
enum State {
    /// Outside any `<error>`.
    Idle,
    InError(RecordBuilder),
    /// Inside `<xwhat>`.
    InMessage(RecordBuilder),
    InStack(RecordBuilder),
    InFrame(RecordBuilder, FrameBuilder),
}

/// The element names the state machine reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tag {
    Error,
    Kind,
    What,
    Xwhat,
    Text,
    Stack,
    Frame,
    Field(FrameField),
    Other,
}

impl Tag {
    fn classify(name: &[u8]) -> Self {
        match name {
            b"error" => Tag::Error,
            b"kind" => Tag::Kind,
            b"what" => Tag::What,
            b"xwhat" => Tag::Xwhat,
            b"text" => Tag::Text,
            b"stack" => Tag::Stack,
            b"frame" => Tag::Frame,
            other => FrameField::from_name(other).map_or(Tag::Other, Tag::Field),
        }
    }
}

/// One pass over one report.
struct ReportReader<'a, R> {
    reader: Reader<R>,
    config: &'a ParserConfig,
    ctx: &'a mut ParseContext,
    records: HashSet<ErrorRecord>,

    /// Number of elements opened by the main loop and not yet closed.
    depth: usize,

    /// Buffer for nested reads (text capture, skipping).
    scratch: Vec<u8>,
}

impl<'a, R: BufRead> ReportReader<'a, R> {
    fn new(input: R, config: &'a ParserConfig, ctx: &'a mut ParseContext) -> Self {
        let mut reader = Reader::from_reader(input);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            config,
            ctx,
            records: HashSet::new(),
            depth: 0,
            scratch: Vec::with_capacity(config.buffer_capacity),
        }
    }

    fn run(mut self) -> Result<HashSet<ErrorRecord>> {
        let mut buf = Vec::with_capacity(self.config.buffer_capacity);
        let mut state = State::Idle;

        loop {
            let position = self.reader.buffer_position();

            match next_event(&mut self.reader, &mut buf)? {
                Event::Start(e) => {
                    let tag = Tag::classify(e.local_name().as_ref());
                    self.depth += 1;
                    state = self.open(state, tag, position)?;
                }
                Event::Empty(e) => {
                    let tag = Tag::classify(e.local_name().as_ref());
                    state = self.open_empty(state, tag, position)?;
                }
                Event::End(e) => {
                    let tag = Tag::classify(e.local_name().as_ref());
                    self.depth = self.depth.saturating_sub(1);
                    state = self.close(state, tag, position)?;
                }
                Event::Eof => break,
                // Whitespace between elements, comments, declarations
                _ => {}
            }

            buf.clear();
        }

        if self.depth > 0 || !matches!(state, State::Idle) {
            return Err(Error::MalformedInput {
                message: format!(
                    "unexpected end of stream with {} element(s) still open",
                    self.depth
                ),
                position: self.reader.buffer_position(),
            });
        }

        Ok(self.records)
    }

    /// Handle a start tag. Elements whose content is captured or skipped
    /// here are consumed up to and including their end tag.
    fn open(&mut self, state: State, tag: Tag, position: u64) -> Result<State> {
        let next = match (state, tag) {
            (State::Idle, Tag::Error) => State::InError(RecordBuilder::new()),
            // Descend into the report root and anything else outside a block
            (State::Idle, _) => State::Idle,

            (State::InError(mut builder), Tag::Kind) => {
                builder.observe_kind(self.read_text()?);
                State::InError(builder)
            }
            (State::InError(mut builder), Tag::What) => {
                builder.observe_message(self.read_text()?);
                State::InError(builder)
            }
            (State::InError(builder), Tag::Xwhat) => State::InMessage(builder),
            (State::InError(mut builder), Tag::Stack) => {
                self.begin_stack(&mut builder, position);
                State::InStack(builder)
            }

            (State::InMessage(mut builder), Tag::Text) => {
                builder.observe_message(self.read_text()?);
                State::InMessage(builder)
            }

            (State::InStack(builder), Tag::Frame) => State::InFrame(builder, FrameBuilder::new()),

            (State::InFrame(builder, mut frame), Tag::Field(field)) => {
                frame.set_field(field, self.read_text()?);
                State::InFrame(builder, frame)
            }

            (state, _) => {
                self.skip_element()?;
                state
            }
        };
        Ok(next)
    }

    /// Handle a self-closing tag as an immediately closed element.
    fn open_empty(&mut self, state: State, tag: Tag, position: u64) -> Result<State> {
        let next = match (state, tag) {
            (State::Idle, Tag::Error) => {
                self.finish(RecordBuilder::new(), position)?;
                State::Idle
            }
            (State::InError(mut builder), Tag::Kind) => {
                builder.observe_kind(String::new());
                State::InError(builder)
            }
            (State::InError(mut builder), Tag::What) => {
                builder.observe_message(String::new());
                State::InError(builder)
            }
            (State::InMessage(mut builder), Tag::Text) => {
                builder.observe_message(String::new());
                State::InMessage(builder)
            }
            (State::InError(mut builder), Tag::Stack) => {
                self.begin_stack(&mut builder, position);
                builder.end_stack();
                State::InError(builder)
            }
            (State::InStack(mut builder), Tag::Frame) => {
                builder.add_frame(FrameBuilder::new().build());
                State::InStack(builder)
            }
            (state, _) => state,
        };
        Ok(next)
    }

    fn close(&mut self, state: State, tag: Tag, position: u64) -> Result<State> {
        let next = match (state, tag) {
            (State::InError(builder), Tag::Error) => {
                self.finish(builder, position)?;
                State::Idle
            }
            (State::InMessage(builder), Tag::Xwhat) => State::InError(builder),
            (State::InStack(mut builder), Tag::Stack) => {
                builder.end_stack();
                State::InError(builder)
            }
            (State::InFrame(mut builder, frame), Tag::Frame) => {
                builder.add_frame(frame.build());
                State::InStack(builder)
            }
            // Closing an element descended into while idle
            (state, _) => state,
        };
        Ok(next)
    }

    fn begin_stack(&mut self, builder: &mut RecordBuilder, position: u64) {
        if !builder.begin_stack() {
            tracing::trace!(position, "Ignoring auxiliary stack");
            self.ctx.count_auxiliary_stack(position);
        }
    }

    fn finish(&mut self, builder: RecordBuilder, position: u64) -> Result<()> {
        let record = builder.finalize(position)?;
        self.ctx.count_block();

        if self.records.contains(&record) {
            tracing::trace!(kind = %record.kind, "Collapsing duplicate error record");
            self.ctx.count_duplicate();
        } else {
            tracing::trace!(
                kind = %record.kind,
                frames = record.stack.len(),
                "Collected error record"
            );
            self.records.insert(record);
        }
        Ok(())
    }

    /// Collect the text content of the element just opened, consuming its
    /// end tag. Text inside nested elements is ignored.
    fn read_text(&mut self) -> Result<String> {
        let mut text = String::new();
        let mut nested = 0usize;

        loop {
            let position = self.reader.buffer_position();
            match next_event(&mut self.reader, &mut self.scratch)? {
                Event::Text(e) if nested == 0 => {
                    let unescaped = e
                        .unescape()
                        .map_err(|err| Error::from_xml(err, position))?;
                    text.push_str(&unescaped);
                }
                Event::CData(e) if nested == 0 => {
                    let content =
                        std::str::from_utf8(e.as_ref()).map_err(|err| Error::MalformedInput {
                            message: format!("invalid UTF-8 in CDATA section: {}", err),
                            position,
                        })?;
                    text.push_str(content);
                }
                Event::Start(_) => nested += 1,
                Event::End(_) if nested == 0 => break,
                Event::End(_) => nested -= 1,
                Event::Eof => return Err(unexpected_eof(self.reader.buffer_position())),
                _ => {}
            }
            self.scratch.clear();
        }

        self.scratch.clear();
        self.depth -= 1;

        if self.config.trim_text {
            Ok(text.trim().to_string())
        } else {
            Ok(text)
        }
    }

    /// Consume the element just opened, including its end tag.
    fn skip_element(&mut self) -> Result<()> {
        let mut nested = 0usize;

        loop {
            match next_event(&mut self.reader, &mut self.scratch)? {
                Event::Start(_) => nested += 1,
                Event::End(_) if nested == 0 => break,
                Event::End(_) => nested -= 1,
                Event::Eof => return Err(unexpected_eof(self.reader.buffer_position())),
                _ => {}
            }
            self.scratch.clear();
        }

        tracing::trace!(depth = self.depth, "Skipped element");
        self.scratch.clear();
        self.depth -= 1;
        Ok(())
    }
}

fn unexpected_eof(position: u64) -> Error {
    Error::MalformedInput {
        message: "unexpected end of stream inside an element".to_string(),
        position,
    }
}

fn next_event<'b, R: BufRead>(reader: &mut Reader<R>, buf: &'b mut Vec<u8>) -> Result<Event<'b>> {
    reader
        .read_event_into(buf)
        .map_err(|err| Error::from_xml(err, reader.error_position()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Note;
    use crate::error::{FailureClass, MissingPart};
    use std::io::{self, Read};

    /// Serves `data`, then fails every read after it.
    struct FailingReader {
        data: Vec<u8>,
        pos: usize,
    }

    impl Read for FailingReader {
        fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
            let available = self.fill_buf()?;
            let n = available.len().min(out.len());
            out[..n].copy_from_slice(&available[..n]);
            self.consume(n);
            Ok(n)
        }
    }

    impl BufRead for FailingReader {
        fn fill_buf(&mut self) -> io::Result<&[u8]> {
            if self.pos < self.data.len() {
                Ok(&self.data[self.pos..])
            } else {
                Err(io::Error::new(io::ErrorKind::ConnectionReset, "report stream reset"))
            }
        }

        fn consume(&mut self, amt: usize) {
            self.pos += amt;
        }
    }

    fn report(blocks: &str) -> String {
        format!(
            r#"<?xml version="1.0"?>
<valgrindoutput>
  <protocolversion>4</protocolversion>
  <tool>memcheck</tool>
  {}
  <errorcounts/>
</valgrindoutput>"#,
            blocks
        )
    }

    const INVALID_READ: &str = r#"<error>
    <unique>0x0</unique>
    <tid>1</tid>
    <kind>InvalidRead</kind>
    <what>Invalid read of size 4</what>
    <stack>
      <frame>
        <ip>0x400544</ip>
        <obj>/home/dev/a.out</obj>
        <fn>main</fn>
        <dir>/home/dev</dir>
        <file>main.c</file>
        <line>9</line>
      </frame>
    </stack>
  </error>"#;

    #[test]
    fn test_parse_single_error() {
        let records = parse_str(&report(INVALID_READ)).unwrap();
        assert_eq!(records.len(), 1);

        let record = records.iter().next().unwrap();
        assert_eq!(record.kind, "InvalidRead");
        assert_eq!(record.message, "Invalid read of size 4");
        assert_eq!(record.stack.len(), 1);

        let frame = &record.stack.frames[0];
        assert_eq!(frame.ip.as_deref(), Some("0x400544"));
        assert_eq!(frame.obj.as_deref(), Some("/home/dev/a.out"));
        assert_eq!(frame.function.as_deref(), Some("main"));
        assert_eq!(frame.dir.as_deref(), Some("/home/dev"));
        assert_eq!(frame.file.as_deref(), Some("main.c"));
        assert_eq!(frame.line, Some(9));
    }

    #[test]
    fn test_xwhat_text_is_message() {
        let block = r#"<error>
    <kind>Leak_DefinitelyLost</kind>
    <xwhat>
      <text>16 bytes in 1 blocks are definitely lost in loss record 1 of 1</text>
      <leakedbytes>16</leakedbytes>
      <leakedblocks>1</leakedblocks>
    </xwhat>
    <stack>
      <frame><ip>0x4C2AB80</ip><fn>malloc</fn></frame>
    </stack>
  </error>"#;

        let records = parse_str(&report(block)).unwrap();
        let record = records.iter().next().unwrap();
        assert_eq!(
            record.message,
            "16 bytes in 1 blocks are definitely lost in loss record 1 of 1"
        );
        assert!(record.is_leak());
    }

    #[test]
    fn test_frames_keep_input_order() {
        let block = r#"<error><kind>InvalidWrite</kind><what>Invalid write of size 1</what>
    <stack>
      <frame><fn>first</fn></frame>
      <frame><fn>second</fn></frame>
      <frame><fn>third</fn></frame>
    </stack></error>"#;

        let records = parse_str(&report(block)).unwrap();
        let names: Vec<_> = records
            .iter()
            .next()
            .unwrap()
            .stack
            .iter()
            .map(|f| f.function.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_empty_stack_is_valid() {
        let block = "<error><kind>InvalidRead</kind><what>x</what><stack></stack></error>";
        let records = parse_str(&report(block)).unwrap();
        assert!(records.iter().next().unwrap().stack.is_empty());

        let block = "<error><kind>InvalidRead</kind><what>x</what><stack/></error>";
        let records = parse_str(&report(block)).unwrap();
        assert!(records.iter().next().unwrap().stack.is_empty());
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut ctx = ParseContext::new();
        let content = report(&[INVALID_READ, INVALID_READ, INVALID_READ].join("\n"));
        let records = parse_with_context(content.as_bytes(), &mut ctx).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(ctx.blocks(), 3);
        assert_eq!(ctx.duplicates(), 2);
        assert!(!ctx.has_notes());
    }

    #[test]
    fn test_many_duplicates_keep_context_bounded() {
        let content = report(&vec![INVALID_READ; 500].join("\n"));

        let mut ctx = ParseContext::new();
        let records = parse_with_context(content.as_bytes(), &mut ctx).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(ctx.blocks(), 500);
        assert_eq!(ctx.duplicates(), 499);
        assert!(ctx.notes().is_empty());

        assert_eq!(parse_str(&content).unwrap(), records);
    }

    #[test]
    fn test_auxiliary_stack_noted() {
        let block = r#"<error>
    <kind>InvalidRead</kind>
    <what>Invalid read of size 8</what>
    <stack><frame><fn>use_after_free</fn></frame></stack>
    <auxwhat>Address 0x51f7040 is 0 bytes inside a block of size 8 free'd</auxwhat>
    <stack><frame><fn>free</fn></frame></stack>
  </error>"#;

        let mut ctx = ParseContext::new();
        let records = parse_with_context(report(block).as_bytes(), &mut ctx).unwrap();
        let record = records.iter().next().unwrap();
        assert_eq!(record.stack.len(), 1);
        assert_eq!(
            record.stack.frames[0].function.as_deref(),
            Some("use_after_free")
        );
        assert!(matches!(ctx.notes(), [Note::AuxiliaryStackIgnored { .. }]));
        assert_eq!(ctx.auxiliary_stacks(), 1);
    }

    #[test]
    fn test_escaped_and_cdata_text() {
        let block = r#"<error><kind>SyscallParam</kind>
    <what>Syscall param write(buf) points to &lt;uninitialised&gt; byte(s)</what>
    <stack><frame><fn><![CDATA[std::vector<int>::push_back]]></fn></frame></stack>
  </error>"#;

        let records = parse_str(&report(block)).unwrap();
        let record = records.iter().next().unwrap();
        assert_eq!(
            record.message,
            "Syscall param write(buf) points to <uninitialised> byte(s)"
        );
        assert_eq!(
            record.stack.frames[0].function.as_deref(),
            Some("std::vector<int>::push_back")
        );
    }

    #[test]
    fn test_untrimmed_text() {
        let block = "<error><kind>InvalidRead</kind><what>  padded  </what><stack/></error>";
        let parser = ReportParser::with_config(ParserConfig::default().with_trim_text(false));
        let records = parser.parse(report(block).as_bytes()).unwrap();
        assert_eq!(records.iter().next().unwrap().message, "  padded  ");
    }

    #[test]
    fn test_missing_kind_fails() {
        let block = "<error><what>x</what><stack/></error>";
        let err = parse_str(&report(block)).unwrap_err();
        assert_eq!(err.missing_part(), Some(MissingPart::Kind));
    }

    #[test]
    fn test_missing_message_fails() {
        let block = "<error><kind>InvalidRead</kind><stack/></error>";
        let err = parse_str(&report(block)).unwrap_err();
        assert_eq!(err.missing_part(), Some(MissingPart::Message));
    }

    #[test]
    fn test_xwhat_without_text_fails() {
        let block = "<error><kind>Leak_PossiblyLost</kind><xwhat><leakedbytes>4</leakedbytes></xwhat><stack/></error>";
        let err = parse_str(&report(block)).unwrap_err();
        assert_eq!(err.missing_part(), Some(MissingPart::Message));
    }

    #[test]
    fn test_missing_stack_fails() {
        let block = "<error><kind>InvalidRead</kind><what>x</what></error>";
        let err = parse_str(&report(block)).unwrap_err();
        assert_eq!(err.missing_part(), Some(MissingPart::Stack));
    }

    #[test]
    fn test_self_closing_error_fails() {
        let err = parse_str(&report("<error/>")).unwrap_err();
        assert_eq!(err.class(), FailureClass::StructuralIncompleteness);
    }

    #[test]
    fn test_failure_after_valid_blocks_returns_nothing() {
        let blocks = format!("{}\n<error><kind>InvalidRead</kind></error>", INVALID_READ);
        let result = parse_str(&report(&blocks));
        assert!(result.is_err());
    }

    #[test]
    fn test_frame_outside_error_is_ignored() {
        let blocks = format!("<frame><fn>stray</fn></frame>\n{}", INVALID_READ);
        let records = parse_str(&report(&blocks)).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_truncated_document_is_malformed() {
        let content = report(INVALID_READ);
        let truncated = &content[..content.find("</stack>").unwrap()];
        let err = parse_str(truncated).unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
    }

    #[test]
    fn test_unclosed_root_is_malformed() {
        let err = parse_str("<valgrindoutput>").unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err = parse_str("<valgrindoutput><error></kind></valgrindoutput>").unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
    }

    #[test]
    fn test_invalid_utf8_text_is_malformed() {
        let mut content = report(INVALID_READ).into_bytes();
        let at = content
            .windows(b"Invalid read".len())
            .position(|w| w == b"Invalid read")
            .unwrap();
        content[at] = 0xff;
        content[at + 1] = 0xfe;

        let err = parse(content.as_slice()).unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
    }

    #[test]
    fn test_unknown_entity_is_malformed() {
        let block = "<error><kind>InvalidRead</kind><what>read &bogus; here</what><stack/></error>";
        let err = parse_str(&report(block)).unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
    }

    #[test]
    fn test_invalid_utf8_cdata_is_malformed() {
        let mut content = report(
            "<error><kind>InvalidRead</kind><what>x</what>\
             <stack><frame><fn><![CDATA[op??]]></fn></frame></stack></error>",
        )
        .into_bytes();
        let at = content.windows(2).position(|w| w == b"??").unwrap();
        content[at] = 0xff;
        content[at + 1] = 0xc0;

        let err = parse(content.as_slice()).unwrap_err();
        assert_eq!(err.class(), FailureClass::MalformedInput);
        assert!(err.to_string().contains("CDATA"), "Got: {}", err);
    }

    #[test]
    fn test_read_failure_mid_stream_is_io() {
        let content = report(INVALID_READ);
        let cut = content.find("<stack>").unwrap();
        let reader = FailingReader {
            data: content.as_bytes()[..cut].to_vec(),
            pos: 0,
        };

        let err = parse(reader).unwrap_err();
        assert_eq!(err.class(), FailureClass::Io);
        match err {
            Error::Io(io) => {
                assert_eq!(io.kind(), io::ErrorKind::ConnectionReset);
                assert_eq!(io.to_string(), "report stream reset");
            }
            other => panic!("expected Io, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_input_yields_no_records() {
        assert!(parse_str("").unwrap().is_empty());
    }
}
