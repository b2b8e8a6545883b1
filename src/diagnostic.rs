//! Ordered diagnostic log shared by the lexer and parser.
//!
//! Notes and warnings queue up until [`DiagnosticSink::drain`]. Recording
//! an error drains the whole log at once, since the pass that raised it
//! is about to return its error value.

use std::fmt;
use std::io::{self, Write};
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

use crate::token::Span;

/// Severity of a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Error,
    Warning,
    Note,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One leveled, positioned message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub level: Level,
    pub file: String,
    pub span: Span,
    pub line_text: String,
    pub message: String,
}

impl Diagnostic {
    #[must_use]
    pub fn new(
        level: Level,
        file: impl Into<String>,
        span: Span,
        line_text: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            level,
            file: file.into(),
            span,
            line_text: line_text.into(),
            message: message.into(),
        }
    }
}

/// `<file>: <line>:<column>: <level>: <message>`, then the source line
/// on its own line when there is one.
impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}:{}: {}: {}",
            self.file, self.span.line, self.span.column, self.level, self.message
        )?;
        if !self.line_text.is_empty() {
            write!(f, "\n{}", self.line_text)?;
        }
        Ok(())
    }
}

/// Append-only diagnostic log with an output target.
///
/// The log and the writer share one mutex, so recording an error and
/// printing the log it completes happen as a single step even when the
/// sink is shared by workers processing translation units in parallel.
pub struct DiagnosticSink {
    inner: Mutex<Inner>,
}

struct Inner {
    entries: Vec<Diagnostic>,
    out: Box<dyn Write + Send>,
}

impl Inner {
    fn drain(&mut self) -> Vec<Diagnostic> {
        let drained = std::mem::take(&mut self.entries);
        if drained.is_empty() {
            return drained;
        }

        let out = &mut self.out;
        let written = drained
            .iter()
            .try_for_each(|d| writeln!(out, "{d}"))
            .and_then(|()| out.flush());
        if let Err(e) = written {
            tracing::warn!(error = %e, "failed to write diagnostics");
        }
        drained
    }
}

impl DiagnosticSink {
    /// Sink that prints to stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::with_writer(io::stderr())
    }

    /// Sink that prints to `out`.
    #[must_use]
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: Vec::new(),
                out: Box::new(out),
            }),
        }
    }

    /// Append a diagnostic. Errors flush the whole log before returning.
    pub fn record(&self, diagnostic: Diagnostic) {
        let fatal = diagnostic.level == Level::Error;
        let mut inner = self.lock();
        inner.entries.push(diagnostic);
        if fatal {
            inner.drain();
        }
    }

    pub fn note(
        &self,
        file: impl Into<String>,
        span: Span,
        line_text: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(Diagnostic::new(Level::Note, file, span, line_text, message));
    }

    pub fn warning(
        &self,
        file: impl Into<String>,
        span: Span,
        line_text: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(Diagnostic::new(
            Level::Warning,
            file,
            span,
            line_text,
            message,
        ));
    }

    pub fn error(
        &self,
        file: impl Into<String>,
        span: Span,
        line_text: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.record(Diagnostic::new(Level::Error, file, span, line_text, message));
    }

    /// Print every queued diagnostic in insertion order and clear the log.
    pub fn drain(&self) -> Vec<Diagnostic> {
        self.lock().drain()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for DiagnosticSink {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticSink")
            .field("entries", &self.lock().entries)
            .finish_non_exhaustive()
    }
}

static GLOBAL: LazyLock<DiagnosticSink> = LazyLock::new(DiagnosticSink::new);

/// Process-wide sink printing to stderr.
#[must_use]
pub fn global() -> &'static DiagnosticSink {
    &GLOBAL
}
