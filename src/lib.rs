//! Front end of the `who` compiler: tokenizer, diagnostics, and the
//! initial parser pass.
//!
//! The initial pass turns one source file into a declaration-level tree
//! (package, imports, exports). Names and types are left unresolved for
//! a later pass.
//!
//! # Quick start
//!
//! ```
//! use who_frontend::{DiagnosticSink, parse_with, tokenize_with};
//!
//! let sink = DiagnosticSink::new();
//! let source = "package demo;\nimport other;\nexport var x: int = 5;\n";
//! let tokens = tokenize_with("demo.who", source, &sink).unwrap();
//! let root = parse_with(&tokens, &sink).unwrap();
//! let unit = root.as_translation_unit().unwrap();
//! assert_eq!(unit.package_name(), "demo");
//! assert_eq!(unit.children.len(), 2);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

use std::path::Path;

pub mod ast;
pub mod diagnostic;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Node, NodeKind, NodeRef, TranslationUnit, dump_ast};
pub use diagnostic::{Diagnostic, DiagnosticSink, Level};
pub use lexer::{LexError, LexErrorKind, dump_tokens, tokenize, tokenize_with};
pub use parser::{ParseError, ParseErrorKind, parse, parse_with};
pub use token::{Span, Token, TokenKind, TokenStream};

/// Unified error type covering loading, lexing, and parsing.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The source file could not be read.
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Parse(#[from] ParseError),
}

/// Tokenize and parse a source string in one step.
pub fn parse_str(path: &str, source: &str, sink: &DiagnosticSink) -> Result<NodeRef, Error> {
    let tokens = tokenize_with(path, source, sink)?;
    Ok(parse_with(&tokens, sink)?)
}

/// Read, tokenize, and parse one file.
pub fn parse_file(path: impl AsRef<Path>, sink: &DiagnosticSink) -> Result<NodeRef, Error> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: display.clone(),
        source,
    })?;
    parse_str(&display, &source, sink)
}
