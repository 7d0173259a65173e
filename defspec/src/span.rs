//! Source spans shared with the parser.
//!
//! Synthesized fragments (guards, validation statements, schema functions)
//! carry [`Span::synthetic`] spans.

pub use defspec_parser::span::{SourceMap, Span};
