#![allow(dead_code)]

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use who_frontend::{DiagnosticSink, NodeRef, TokenStream, TranslationUnit, parse_with, tokenize_with};

/// Writer that keeps everything written to it, shareable with a sink.
#[derive(Clone, Default)]
pub struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).expect("utf-8 output")
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Sink whose output can be inspected afterwards.
pub fn capturing_sink() -> (DiagnosticSink, Captured) {
    let out = Captured::default();
    (DiagnosticSink::with_writer(out.clone()), out)
}

pub fn quiet_sink() -> DiagnosticSink {
    DiagnosticSink::with_writer(io::sink())
}

pub fn lex(input: &str) -> TokenStream {
    tokenize_with("test.who", input, &quiet_sink()).expect("tokenize failed")
}

pub fn parse_ok(input: &str) -> NodeRef {
    let sink = quiet_sink();
    let tokens = tokenize_with("test.who", input, &sink).expect("tokenize failed");
    parse_with(&tokens, &sink).expect("parse failed")
}

pub fn unit(root: &NodeRef) -> &TranslationUnit {
    root.as_translation_unit()
        .expect("root should be a translation unit")
}
