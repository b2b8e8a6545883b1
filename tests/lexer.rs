//! Tokenizer behaviour and error tests.

mod common;

use common::{capturing_sink, lex, quiet_sink};
use who_frontend::{LexErrorKind, Span, TokenKind, dump_tokens, tokenize_with};

// -----------------------------------------------------------
// Classification.
// -----------------------------------------------------------

#[test]
fn lex_longest_match() {
    assert_eq!(lex("<=").kinds(), vec![TokenKind::LEqual, TokenKind::EndOfFile]);
    assert_eq!(
        lex("a<<=b").kinds(),
        vec![
            TokenKind::Identifier,
            TokenKind::BitShiftLeft,
            TokenKind::Equals,
            TokenKind::Identifier,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn lex_every_compound_operator() {
    let stream = lex("-> == <= >= != << >> += -= *= /= |= &= ^= ~= ?:");
    assert_eq!(
        stream.kinds(),
        vec![
            TokenKind::Arrow,
            TokenKind::BoolEqual,
            TokenKind::LEqual,
            TokenKind::GEqual,
            TokenKind::NEquals,
            TokenKind::BitShiftLeft,
            TokenKind::BitShiftRight,
            TokenKind::PlusEquals,
            TokenKind::MinusEquals,
            TokenKind::MulEquals,
            TokenKind::DivideEquals,
            TokenKind::BitOrEquals,
            TokenKind::BitAndEquals,
            TokenKind::BitXorEquals,
            TokenKind::BitNegEquals,
            TokenKind::Elvis,
            TokenKind::EndOfFile,
        ]
    );
    assert!(stream.iter().all(|t| t.lexeme.is_none()));
}

#[test]
fn lex_keyword_precedence() {
    let stream = lex("func");
    assert_eq!(stream.tokens[0].kind, TokenKind::KwdFunc);

    let stream = lex("funct");
    assert_eq!(stream.tokens[0].kind, TokenKind::Identifier);
    assert_eq!(stream.tokens[0].lexeme.as_deref(), Some("funct"));
}

#[test]
fn lex_all_keywords() {
    let stream = lex(
        "package import export inline forceinline compiletime func var const \
         type self defer async await return",
    );
    let kinds = stream.kinds();
    assert_eq!(kinds.len(), 16);
    assert!(kinds[..15].iter().all(|k| k.is_keyword()));
}

#[test]
fn lex_identifier_with_underscore_and_digits() {
    let stream = lex("_tmp9 x_1");
    assert_eq!(stream.tokens[0].lexeme.as_deref(), Some("_tmp9"));
    assert_eq!(stream.tokens[1].lexeme.as_deref(), Some("x_1"));
}

#[test]
fn lex_numeric_classification() {
    let cases = [
        ("123", TokenKind::IntegralLiteral),
        ("1.5", TokenKind::FloatLiteral),
        ("2e10", TokenKind::FloatLiteral),
        ("2E+3", TokenKind::FloatLiteral),
        ("6.02e23f", TokenKind::FloatLiteral),
        ("0", TokenKind::IntegralLiteral),
    ];
    for (input, kind) in cases {
        let stream = lex(input);
        assert_eq!(stream.tokens[0].kind, kind, "input {input}");
        assert_eq!(stream.tokens[0].lexeme.as_deref(), Some(input));
        assert_eq!(stream.len(), 2, "input {input}");
    }
}

#[test]
fn lex_member_access_on_integer() {
    assert_eq!(
        lex("1.x").kinds(),
        vec![
            TokenKind::IntegralLiteral,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn lex_literals_keep_quotes() {
    let stream = lex(r#"var s = "a b"; var c = '\'';"#);
    let literals: Vec<_> = stream
        .iter()
        .filter(|t| t.kind.is_literal())
        .map(|t| (t.kind, t.lexeme.clone().unwrap_or_default()))
        .collect();
    assert_eq!(
        literals,
        vec![
            (TokenKind::StringLiteral, "\"a b\"".to_string()),
            (TokenKind::CharLiteral, r"'\''".to_string()),
        ]
    );
}

#[test]
fn lex_string_spanning_lines_advances_line() {
    let stream = lex("\"a\nb\" x");
    assert_eq!(stream.tokens[0].span, Span::new(1, 1));
    assert_eq!(stream.tokens[1].span, Span::new(2, 4));
}

// -----------------------------------------------------------
// Whitespace, comments, and positions.
// -----------------------------------------------------------

#[test]
fn lex_comment_then_keyword() {
    let stream = lex("// x\nfunc");
    assert_eq!(stream.kinds(), vec![TokenKind::KwdFunc, TokenKind::EndOfFile]);
}

#[test]
fn lex_trailing_comments_and_space() {
    let stream = lex("var /* a */ // b\n /* c */  \n");
    assert_eq!(stream.kinds(), vec![TokenKind::KwdVar, TokenKind::EndOfFile]);
}

#[test]
fn lex_divide_is_not_a_comment() {
    assert_eq!(
        lex("a / b").kinds(),
        vec![
            TokenKind::Identifier,
            TokenKind::Divide,
            TokenKind::Identifier,
            TokenKind::EndOfFile,
        ]
    );
}

#[test]
fn lex_line_and_column() {
    let stream = lex("a\nb");
    assert_eq!(stream.tokens[0].span.line, 1);
    assert_eq!(stream.tokens[1].span.line, 2);
    assert_eq!(stream.tokens[1].span.column, 1);
}

#[test]
fn lex_columns_after_tabs_and_comments() {
    let stream = lex("/* c */\tx");
    assert_eq!(stream.tokens[0].span, Span::new(1, 9));
}

#[test]
fn lex_single_eof_terminator() {
    for input in ["", "   ", "var", "// only a comment", "a b c;\n"] {
        let stream = lex(input);
        let eofs = stream
            .iter()
            .filter(|t| t.kind == TokenKind::EndOfFile)
            .count();
        assert_eq!(eofs, 1, "input {input:?}");
        assert_eq!(
            stream.tokens.last().map(|t| t.kind),
            Some(TokenKind::EndOfFile)
        );
    }
}

#[test]
fn lex_stream_carries_path_and_source() {
    let stream = tokenize_with("pkg/main.who", "var x;\nvar y;", &quiet_sink())
        .expect("tokenize");
    assert_eq!(stream.path, "pkg/main.who");
    assert_eq!(stream.line_text(2), "var y;");
}

#[test]
fn lex_is_deterministic() {
    let source = "package demo;\nexport var x: int = 5; // done\n";
    assert_eq!(lex(source), lex(source));
}

// -----------------------------------------------------------
// Errors.
// -----------------------------------------------------------

#[test]
fn lex_error_undefined_token() {
    let (sink, out) = capturing_sink();
    let err = tokenize_with("bad.who", "package p;\nvar @x;", &sink).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UndefinedToken('@'));
    assert_eq!(err.span, Span::new(2, 5));
    assert_eq!(
        out.contents(),
        "bad.who: 2:5: error: Undefined token '@'\nvar @x;\n"
    );
}

#[test]
fn lex_error_question_mark_alone() {
    let err = tokenize_with("q.who", "a ? b", &quiet_sink()).unwrap_err();
    assert_eq!(err.kind, LexErrorKind::UndefinedToken('?'));
}

#[test]
fn lex_error_prints_queued_notes_first() {
    let (sink, out) = capturing_sink();
    sink.note("bad.who", Span::new(1, 1), "", "checking");
    let _ = tokenize_with("bad.who", "#", &sink).unwrap_err();
    assert_eq!(
        out.contents(),
        "bad.who: 1:1: note: checking\nbad.who: 1:1: error: Undefined token '#'\n#\n"
    );
    assert!(sink.is_empty());
}

// -----------------------------------------------------------
// Token dump.
// -----------------------------------------------------------

#[test]
fn dump_shows_lexemes_for_identifiers_and_literals() {
    let stream = lex("package demo; var s = \"hi\";");
    assert_eq!(
        dump_tokens(&stream),
        "KWD_PACKAGE\n\
         IDENTIFIER ('demo')\n\
         SEMICOLON\n\
         KWD_VAR\n\
         IDENTIFIER ('s')\n\
         EQUALS\n\
         STRING_LITERAL ('\"hi\"')\n\
         SEMICOLON\n\
         END_OF_FILE\n"
    );
}
