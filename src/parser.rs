//! Initial parser pass.
//!
//! Builds the declaration-level tree of one translation unit without
//! resolving any names or types; a later pass consumes the result.
//! The first syntax error aborts the whole unit.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::ast::{
    Assignment, DataDefinition, ExportDefinition, FuncDefinition, ImportDefinition, Literal, Node,
    NodeRef, Package, Parameter, TranslationUnit, TypeAnnotation, TypeDefinition,
    UnresolvedSymbol,
};
use crate::diagnostic::{self, DiagnosticSink};
use crate::token::{Span, Token, TokenKind, TokenStream};

/// Classifies a parser error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token other than the required one was found.
    UnexpectedToken { found: String, expected: TokenKind },
    /// The cursor ran past the last token.
    Unknown,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "Unexpected token '{found}', expected '{expected}'")
            }
            Self::Unknown => write!(f, "Unknown parser error"),
        }
    }
}

/// Error produced during parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Parse a token stream into a translation unit, reporting errors to the
/// process-wide sink. The returned node is always a
/// [`Node::TranslationUnit`].
///
/// # Errors
///
/// Returns `ParseError` on the first syntax error. The error has already
/// been printed through the sink.
pub fn parse(stream: &TokenStream) -> Result<NodeRef, ParseError> {
    parse_with(stream, diagnostic::global())
}

/// Parse a token stream, reporting errors to `sink`.
pub fn parse_with(stream: &TokenStream, sink: &DiagnosticSink) -> Result<NodeRef, ParseError> {
    Parser::new(stream, sink).parse()
}

struct Parser<'a> {
    stream: &'a TokenStream,
    tokens: &'a [Token],
    pos: usize,
    sink: &'a DiagnosticSink,
    // Scope captured by data definitions as they are built.
    scope: Weak<Node>,
}

impl<'a> Parser<'a> {
    fn new(stream: &'a TokenStream, sink: &'a DiagnosticSink) -> Self {
        Self {
            stream,
            tokens: &stream.tokens,
            pos: 0,
            sink,
            scope: Weak::new(),
        }
    }

    fn parse(mut self) -> Result<NodeRef, ParseError> {
        let package = self.parse_package()?;

        let mut failure = None;
        let root = Rc::new_cyclic(|scope| {
            self.scope = scope.clone();
            let children = self.parse_declarations().unwrap_or_else(|err| {
                failure = Some(err);
                Vec::new()
            });
            Node::TranslationUnit(TranslationUnit::new(package, children))
        });
        if let Some(err) = failure {
            return Err(err);
        }

        self.consume(TokenKind::EndOfFile)?;

        tracing::debug!(
            path = %self.stream.path,
            declarations = root.children().len() - 1,
            "parsed translation unit"
        );
        Ok(root)
    }

    fn parse_declarations(&mut self) -> Result<Vec<NodeRef>, ParseError> {
        let mut children = Vec::new();

        while let Some(token) = self.peek() {
            match token.kind {
                TokenKind::EndOfFile => break,
                TokenKind::KwdImport => children.push(self.parse_import()?),
                TokenKind::KwdExport => children.push(self.parse_export()?),
                // The initial pass only looks at imports and exports.
                _ => self.advance(),
            }
        }

        Ok(children)
    }

    fn parse_package(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::KwdPackage)?;
        let name = self.parse_dotted_identifier()?;
        self.consume(TokenKind::Semicolon)?;

        tracing::trace!(package = %name, "package");
        Ok(Rc::new(Node::Package(Package { name })))
    }

    fn parse_import(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::KwdImport)?;
        let package_name = self.parse_dotted_identifier()?;
        self.consume(TokenKind::Semicolon)?;

        tracing::trace!(import = %package_name, "import");
        Ok(Rc::new(Node::ImportDefinition(ImportDefinition {
            package_name,
        })))
    }

    fn parse_export(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::KwdExport)?;

        let definition = match self.peek().map(|t| t.kind) {
            Some(TokenKind::KwdType) => self.parse_type_definition()?,
            Some(TokenKind::KwdFunc) => self.parse_func_definition()?,
            Some(TokenKind::KwdVar | TokenKind::KwdConst) => self.parse_data_definition()?,
            _ => return Err(self.unexpected(TokenKind::KwdVar)),
        };

        tracing::trace!(kind = %definition.kind(), "export");
        Ok(Rc::new(Node::ExportDefinition(ExportDefinition {
            definition,
        })))
    }

    fn parse_data_definition(&mut self) -> Result<NodeRef, ParseError> {
        let is_const = self.check(TokenKind::KwdConst);
        self.advance(); // var / const

        let base_name = self.consume_identifier()?;

        let type_annotation = if self.check(TokenKind::Colon) {
            Some(self.parse_type_annotation()?)
        } else {
            None
        };

        let value = if self.match_kind(TokenKind::Equals) {
            let value = self.parse_expr()?;
            Some(Rc::new(Node::Assignment(Assignment { value })))
        } else {
            None
        };

        self.match_kind(TokenKind::Semicolon);

        let def = DataDefinition::new(base_name, type_annotation, value, self.scope.clone());
        Ok(Rc::new(if is_const {
            Node::ConstantDefinition(def)
        } else {
            Node::VarDefinition(def)
        }))
    }

    fn parse_type_definition(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::KwdType)?;
        let name = self.consume_identifier()?;

        let aliased = if self.match_kind(TokenKind::Equals) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        self.match_kind(TokenKind::Semicolon);
        Ok(Rc::new(Node::TypeDefinition(TypeDefinition { name, aliased })))
    }

    fn parse_func_definition(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::KwdFunc)?;
        let name = self.consume_identifier()?;

        self.consume(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                let name = self.consume_identifier()?;
                let type_annotation = self.parse_type_annotation()?;
                params.push(Parameter {
                    name,
                    type_annotation,
                });
                if !self.match_kind(TokenKind::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenKind::RParen)?;

        let return_type = if self.match_kind(TokenKind::Arrow) {
            Some(self.parse_type_name()?)
        } else {
            None
        };

        let has_body = self.check(TokenKind::LBrace);
        if has_body {
            self.skip_block()?;
        } else {
            self.match_kind(TokenKind::Semicolon);
        }

        Ok(Rc::new(Node::FuncDefinition(FuncDefinition {
            name,
            params,
            return_type,
            has_body,
        })))
    }

    // Bodies belong to a later pass; only their braces are matched here.
    fn skip_block(&mut self) -> Result<(), ParseError> {
        self.consume(TokenKind::LBrace)?;
        let mut depth = 1usize;

        loop {
            match self.peek().map(|t| t.kind) {
                Some(TokenKind::LBrace) => depth += 1,
                Some(TokenKind::RBrace) => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        return Ok(());
                    }
                }
                Some(TokenKind::EndOfFile) | None => {
                    return Err(self.unexpected(TokenKind::RBrace));
                }
                Some(_) => {}
            }
            self.advance();
        }
    }

    fn parse_type_annotation(&mut self) -> Result<NodeRef, ParseError> {
        self.consume(TokenKind::Colon)?;
        self.parse_type_name()
    }

    fn parse_type_name(&mut self) -> Result<NodeRef, ParseError> {
        let type_name = self.parse_dotted_identifier()?;
        Ok(Rc::new(Node::TypeAnnotation(TypeAnnotation { type_name })))
    }

    // Only single operands for now. Anything else leaves the value empty
    // with a warning, and the remaining tokens are skipped at top level.
    fn parse_expr(&mut self) -> Result<Option<NodeRef>, ParseError> {
        let Some(token) = self.peek() else {
            return Ok(None);
        };

        if let Some(literal) = Literal::from_token(token) {
            self.advance();
            return Ok(Some(Rc::new(Node::Literal(literal))));
        }

        if token.kind == TokenKind::Identifier {
            let name = self.parse_dotted_identifier()?;
            return Ok(Some(Rc::new(Node::UnresolvedSymbol(UnresolvedSymbol {
                name,
            }))));
        }

        if !matches!(token.kind, TokenKind::Semicolon | TokenKind::EndOfFile) {
            self.warning(
                token.span,
                format!("Unsupported initializer '{}', value left empty", token.text()),
            );
        }
        Ok(None)
    }

    fn parse_dotted_identifier(&mut self) -> Result<String, ParseError> {
        let mut name = self.consume_identifier()?;
        while self.match_kind(TokenKind::Dot) {
            name.push('.');
            name.push_str(&self.consume_identifier()?);
        }
        Ok(name)
    }

    fn consume_identifier(&mut self) -> Result<String, ParseError> {
        let token = self.consume(TokenKind::Identifier)?;
        Ok(token.lexeme.clone().unwrap_or_default())
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) {
        self.pos += 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().is_some_and(|t| t.kind == kind)
    }

    fn match_kind(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, expected: TokenKind) -> Result<&'a Token, ParseError> {
        match self.peek() {
            Some(token) if token.kind == expected => {
                self.advance();
                Ok(token)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: TokenKind) -> ParseError {
        match self.peek() {
            Some(token) => self.error(
                ParseErrorKind::UnexpectedToken {
                    found: token.text().to_string(),
                    expected,
                },
                token.span,
            ),
            None => self.error(ParseErrorKind::Unknown, Span::default()),
        }
    }

    fn warning(&self, span: Span, message: String) {
        self.sink.warning(
            self.stream.path.as_str(),
            span,
            self.stream.line_text(span.line),
            message,
        );
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        self.sink.error(
            self.stream.path.as_str(),
            span,
            self.stream.line_text(span.line),
            kind.to_string(),
        );
        ParseError { kind, span }
    }
}
