//! Streaming, validating parser for Valgrind memcheck XML reports.
//!
//! This crate reads the XML written by `valgrind --xml=yes` and turns it
//! into a de-duplicated set of [`ErrorRecord`]s, each with a kind, a
//! message and a [`Stack`] of [`Frame`]s. It wraps [`quick-xml`] as a pull
//! tokenizer and only ever holds one `<error>` block in memory, so reports
//! of any size can be read.
//!
//! # Overview
//!
//! The main types are:
//! - [`ErrorRecord`]: One diagnostic; equal blocks collapse to one record
//! - [`Stack`] / [`Frame`]: The call stack of a diagnostic, innermost first
//! - [`ReportParser`]: A configurable parser; [`parse`], [`parse_str`] and
//!   [`parse_file`] use the default configuration
//! - [`Error`]: Why a report was rejected
//!
//! # Example
//!
//! ```rust
//! use valgrind_report::parse_str;
//!
//! let records = parse_str(r#"<?xml version="1.0"?>
//! <valgrindoutput>
//!   <error>
//!     <kind>InvalidRead</kind>
//!     <what>Invalid read of size 4</what>
//!     <stack>
//!       <frame><ip>0x400544</ip><fn>main</fn><file>main.c</file><line>9</line></frame>
//!     </stack>
//!   </error>
//! </valgrindoutput>"#).unwrap();
//!
//! let record = records.iter().next().unwrap();
//! assert_eq!(record.kind, "InvalidRead");
//! assert_eq!(record.stack.frames[0].line, Some(9));
//! ```
//!
//! # Strictness
//!
//! Any problem aborts the whole parse and no records are returned. A block
//! without `<kind>`, without `<what>`/`<xwhat>` or without `<stack>` is a
//! [`FailureClass::StructuralIncompleteness`]; broken markup is a
//! [`FailureClass::MalformedInput`]:
//!
//! ```rust
//! use valgrind_report::{FailureClass, MissingPart, parse_str};
//!
//! let err = parse_str("<valgrindoutput><error><kind>InvalidRead</kind>\
//!                      <what>Invalid read of size 4</what></error></valgrindoutput>")
//!     .unwrap_err();
//! assert_eq!(err.class(), FailureClass::StructuralIncompleteness);
//! assert_eq!(err.missing_part(), Some(MissingPart::Stack));
//! ```

pub mod builder;
pub mod config;
pub mod context;
pub mod error;
pub mod parser;
pub mod types;

// Re-export main types
pub use builder::{FrameBuilder, FrameField, RecordBuilder};
pub use config::ParserConfig;
pub use context::{Note, ParseContext};
pub use error::{Error, FailureClass, MissingPart, Result};
pub use parser::{ReportParser, parse, parse_file, parse_str, parse_with_context};
pub use types::{ErrorRecord, Frame, Stack};
