use std::fmt;

use crate::diagnostic::{self, DiagnosticSink};
use crate::token::{self, Span, Token, TokenKind, TokenStream};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    /// Character that cannot start any token.
    UndefinedToken(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UndefinedToken(ch) => write!(f, "Undefined token '{ch}'"),
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

/// Tokenize one source file, reporting errors to the process-wide sink.
///
/// # Errors
///
/// Returns `LexError` when a character matches no token rule. The error
/// has already been printed through the sink.
pub fn tokenize(path: &str, source: &str) -> Result<TokenStream, LexError> {
    tokenize_with(path, source, diagnostic::global())
}

/// Tokenize one source file, reporting errors to `sink`.
pub fn tokenize_with(
    path: &str,
    source: &str,
    sink: &DiagnosticSink,
) -> Result<TokenStream, LexError> {
    Lexer::new(path, source, sink).tokenize()
}

/// Render a stream one token per line: `NAME`, or `NAME ('lexeme')` for
/// identifiers and literals.
#[must_use]
pub fn dump_tokens(stream: &TokenStream) -> String {
    let mut out = String::new();
    for token in stream {
        out.push_str(token.kind.name());
        if let (Some(lexeme), true) = (&token.lexeme, token.kind.has_lexeme()) {
            out.push_str(" ('");
            out.push_str(lexeme);
            out.push_str("')");
        }
        out.push('\n');
    }
    out
}

struct Lexer<'a> {
    path: &'a str,
    source: &'a str,
    input: &'a [u8],
    pos: usize,
    line: usize,
    col: usize,
    sink: &'a DiagnosticSink,
}

impl<'a> Lexer<'a> {
    fn new(path: &'a str, source: &'a str, sink: &'a DiagnosticSink) -> Self {
        let bytes = source.as_bytes();
        let start = if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
            3
        } else {
            0
        };
        Self {
            path,
            source,
            input: bytes,
            pos: start,
            line: 1,
            col: 1,
            sink,
        }
    }

    fn tokenize(mut self) -> Result<TokenStream, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            tracing::trace!(
                kind = token.kind.name(),
                line = token.span.line,
                column = token.span.column,
                "token"
            );
            let at_end = token.kind == TokenKind::EndOfFile;
            tokens.push(token);
            if at_end {
                break;
            }
        }

        tracing::debug!(path = self.path, tokens = tokens.len(), "tokenized");
        Ok(TokenStream::new(
            self.path.to_string(),
            self.source.to_string(),
            tokens,
        ))
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments();

        let span = self.span();
        let Some(ch) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::EndOfFile,
                lexeme: None,
                span,
            });
        };

        if is_identifier_start(ch) {
            return Ok(self.read_identifier(span));
        }

        if let Some(kind) = self.peek_next().and_then(|next| TokenKind::compound(ch, next)) {
            self.advance();
            self.advance();
            return Ok(Token {
                kind,
                lexeme: None,
                span,
            });
        }

        if ch.is_ascii_digit() {
            return Ok(self.read_number(span));
        }

        if let Some(kind) = TokenKind::symbol(ch) {
            self.advance();
            return Ok(Token {
                kind,
                lexeme: None,
                span,
            });
        }

        match ch {
            b'"' => Ok(self.read_quoted(b'"', TokenKind::StringLiteral, span)),
            b'\'' => Ok(self.read_quoted(b'\'', TokenKind::CharLiteral, span)),
            _ => Err(self.error(LexErrorKind::UndefinedToken(self.current_char(ch)), span)),
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.input.get(self.pos + 1).copied()
    }

    fn advance(&mut self) {
        if let Some(&ch) = self.input.get(self.pos) {
            if ch == b'\n' {
                self.line += 1;
                self.col = 1;
            } else if !is_utf8_continuation(ch) {
                self.col += 1;
            }
            self.pos += 1;
        }
    }

    fn advance_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn text_from(&self, start: usize) -> String {
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    fn current_char(&self, fallback: u8) -> char {
        self.source
            .get(self.pos..)
            .and_then(|rest| rest.chars().next())
            .unwrap_or_else(|| char::from(fallback))
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            self.advance_while(is_whitespace);
            match (self.peek(), self.peek_next()) {
                (Some(b'/'), Some(b'/')) => {
                    self.advance_while(|c| c != b'\n');
                }
                (Some(b'/'), Some(b'*')) => {
                    self.advance(); // skip /
                    self.advance(); // skip *
                    self.skip_block_comment();
                }
                _ => break,
            }
        }
    }

    // An unterminated block comment runs to end of input.
    fn skip_block_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == b'*' && self.peek_next() == Some(b'/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }
    }

    fn read_identifier(&mut self, span: Span) -> Token {
        let start = self.pos;
        self.advance_while(is_identifier_char);

        let text = self.text_from(start);
        let kind = TokenKind::keyword(&text).unwrap_or(TokenKind::Identifier);
        Token {
            kind,
            lexeme: Some(text),
            span,
        }
    }

    fn read_number(&mut self, span: Span) -> Token {
        let start = self.pos;
        let mut is_float = false;

        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some(b'.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }

        if matches!(self.peek(), Some(b'e' | b'E')) && self.exponent_follows() {
            is_float = true;
            self.advance();
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.advance();
            }
            self.advance_while(|c| c.is_ascii_digit());
        }

        // float suffix, only when it does not start an identifier
        if self.peek() == Some(b'f') && !self.peek_next().is_some_and(is_identifier_char) {
            is_float = true;
            self.advance();
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntegralLiteral
        };
        Token {
            kind,
            lexeme: Some(self.text_from(start)),
            span,
        }
    }

    // cursor is on `e`/`E`: digits, or a sign and digits, must follow
    fn exponent_follows(&self) -> bool {
        match self.peek_next() {
            Some(c) if c.is_ascii_digit() => true,
            Some(b'+' | b'-') => self
                .input
                .get(self.pos + 2)
                .is_some_and(u8::is_ascii_digit),
            _ => false,
        }
    }

    // Reads through the closing quote; a missing one just ends the
    // literal at end of input.
    fn read_quoted(&mut self, quote: u8, kind: TokenKind, span: Span) -> Token {
        let start = self.pos;
        self.advance(); // skip opening quote

        while let Some(ch) = self.peek() {
            self.advance();
            if ch == b'\\' {
                self.advance();
            } else if ch == quote {
                break;
            }
        }

        Token {
            kind,
            lexeme: Some(self.text_from(start)),
            span,
        }
    }

    fn error(&self, kind: LexErrorKind, span: Span) -> LexError {
        self.sink.error(
            self.path,
            span,
            token::line_of(self.source, span.line),
            kind.to_string(),
        );
        LexError { kind, span }
    }
}

const fn is_whitespace(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C)
}

const fn is_identifier_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

const fn is_identifier_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

const fn is_utf8_continuation(c: u8) -> bool {
    c & 0xC0 == 0x80
}
