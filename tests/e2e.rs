//! End-to-end: source text through tokens to the syntax tree.

mod common;

use common::{lex, parse_ok, quiet_sink, unit};
use who_frontend::ast::LiteralKind;
use who_frontend::{NodeKind, TokenKind, dump_ast, parse_file};

const DEMO: &str = "package demo;\nimport other;\nexport var x: int = 5;\n";

#[test]
fn e2e_demo_tokens() {
    let stream = lex(DEMO);
    let got: Vec<_> = stream
        .iter()
        .map(|t| match &t.lexeme {
            Some(lexeme) if t.kind.has_lexeme() => format!("{}({lexeme})", t.kind.name()),
            _ => t.kind.name().to_string(),
        })
        .collect();
    assert_eq!(
        got,
        vec![
            "KWD_PACKAGE",
            "IDENTIFIER(demo)",
            "SEMICOLON",
            "KWD_IMPORT",
            "IDENTIFIER(other)",
            "SEMICOLON",
            "KWD_EXPORT",
            "KWD_VAR",
            "IDENTIFIER(x)",
            "COLON",
            "IDENTIFIER(int)",
            "EQUALS",
            "INTEGRAL_LITERAL(5)",
            "SEMICOLON",
            "END_OF_FILE",
        ]
    );
    assert_eq!(stream.tokens[14].kind, TokenKind::EndOfFile);
}

#[test]
fn e2e_demo_tree() {
    let root = parse_ok(DEMO);
    let unit = unit(&root);
    assert_eq!(unit.package_name(), "demo");
    assert_eq!(unit.children.len(), 2);

    let import = unit.children[0].as_import().expect("import");
    assert_eq!(import.package_name, "other");

    let export = unit.children[1].as_export().expect("export");
    assert_eq!(export.definition.kind(), NodeKind::VarDefinition);
    let def = export.definition.as_data_definition().expect("data def");
    assert_eq!(def.base_name, "x");
    assert_eq!(def.type_name(), Some("int"));
    let literal = def
        .initializer()
        .and_then(|v| v.as_literal())
        .expect("literal");
    assert_eq!(literal.kind, LiteralKind::Int);
    assert_eq!(literal.text, "5");
    assert!(def.is_global());
}

#[test]
fn e2e_demo_dump() {
    let root = parse_ok(DEMO);
    assert_eq!(
        dump_ast(&root),
        "TranslationUnit\n\
         \x20 Package demo\n\
         \x20 ImportDefinition other\n\
         \x20 ExportDefinition\n\
         \x20   VarDefinition x\n\
         \x20     TypeAnnotation int\n\
         \x20     Assignment\n\
         \x20       Literal Int 5\n"
    );
}

#[test]
fn e2e_larger_unit() {
    let root = parse_ok(
        "// service entry point\n\
         package app.server;\n\
         \n\
         import std.io;\n\
         import std.net;\n\
         \n\
         /* configuration */\n\
         export const port: u16 = 8080;\n\
         export var name = \"who\";\n\
         export type Port = u16;\n\
         export func serve(addr: std.net.Addr) -> int {\n\
             return 0;\n\
         }\n",
    );
    let kinds: Vec<_> = unit(&root)
        .children
        .iter()
        .map(|c| match c.as_export() {
            Some(export) => export.definition.kind(),
            None => c.kind(),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::ImportDefinition,
            NodeKind::ImportDefinition,
            NodeKind::ConstantDefinition,
            NodeKind::VarDefinition,
            NodeKind::TypeDefinition,
            NodeKind::FuncDefinition,
        ]
    );
}

#[test]
fn e2e_parse_file_from_disk() {
    let path = std::env::temp_dir().join(format!("who-e2e-{}.who", std::process::id()));
    std::fs::write(&path, DEMO).expect("write temp file");
    let root = parse_file(&path, &quiet_sink());
    std::fs::remove_file(&path).expect("remove temp file");
    let root = root.expect("parse file");
    assert_eq!(unit(&root).package_name(), "demo");
}

#[test]
fn e2e_parse_file_missing() {
    let err = parse_file("/nonexistent/who/none.who", &quiet_sink()).unwrap_err();
    assert!(matches!(err, who_frontend::Error::Io { .. }));
    assert!(err.to_string().contains("none.who"));
}
