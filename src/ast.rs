//! Syntax tree produced by the initial parser pass.
//!
//! Nodes are shared through `Rc` and never change once built. A data
//! definition keeps a `Weak` handle to its enclosing scope, so dropping
//! the root releases the whole tree and leaves those handles expired.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::token::{Token, TokenKind};

/// Shared handle to a node.
pub type NodeRef = Rc<Node>;

/// Variant tag of a [`Node`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    TranslationUnit,
    Package,
    ImportDefinition,
    ExportDefinition,
    VarDefinition,
    ConstantDefinition,
    TypeDefinition,
    FuncDefinition,
    TypeAnnotation,
    Assignment,
    Literal,
    UnresolvedSymbol,
    Term,
    Factor,
    Expr,
}

impl NodeKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TranslationUnit => "TranslationUnit",
            Self::Package => "Package",
            Self::ImportDefinition => "ImportDefinition",
            Self::ExportDefinition => "ExportDefinition",
            Self::VarDefinition => "VarDefinition",
            Self::ConstantDefinition => "ConstantDefinition",
            Self::TypeDefinition => "TypeDefinition",
            Self::FuncDefinition => "FuncDefinition",
            Self::TypeAnnotation => "TypeAnnotation",
            Self::Assignment => "Assignment",
            Self::Literal => "Literal",
            Self::UnresolvedSymbol => "UnresolvedSymbol",
            Self::Term => "Term",
            Self::Factor => "Factor",
            Self::Expr => "Expr",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A syntax tree node.
#[derive(Debug)]
pub enum Node {
    TranslationUnit(TranslationUnit),
    Package(Package),
    ImportDefinition(ImportDefinition),
    ExportDefinition(ExportDefinition),
    VarDefinition(DataDefinition),
    ConstantDefinition(DataDefinition),
    TypeDefinition(TypeDefinition),
    FuncDefinition(FuncDefinition),
    TypeAnnotation(TypeAnnotation),
    Assignment(Assignment),
    Literal(Literal),
    UnresolvedSymbol(UnresolvedSymbol),
    /// Reserved for the expression grammar.
    Term,
    /// Reserved for the expression grammar.
    Factor,
    /// Reserved for the expression grammar.
    Expr,
}

impl Node {
    #[must_use]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::TranslationUnit(_) => NodeKind::TranslationUnit,
            Self::Package(_) => NodeKind::Package,
            Self::ImportDefinition(_) => NodeKind::ImportDefinition,
            Self::ExportDefinition(_) => NodeKind::ExportDefinition,
            Self::VarDefinition(_) => NodeKind::VarDefinition,
            Self::ConstantDefinition(_) => NodeKind::ConstantDefinition,
            Self::TypeDefinition(_) => NodeKind::TypeDefinition,
            Self::FuncDefinition(_) => NodeKind::FuncDefinition,
            Self::TypeAnnotation(_) => NodeKind::TypeAnnotation,
            Self::Assignment(_) => NodeKind::Assignment,
            Self::Literal(_) => NodeKind::Literal,
            Self::UnresolvedSymbol(_) => NodeKind::UnresolvedSymbol,
            Self::Term => NodeKind::Term,
            Self::Factor => NodeKind::Factor,
            Self::Expr => NodeKind::Expr,
        }
    }

    #[must_use]
    pub const fn as_translation_unit(&self) -> Option<&TranslationUnit> {
        match self {
            Self::TranslationUnit(unit) => Some(unit),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_package(&self) -> Option<&Package> {
        match self {
            Self::Package(package) => Some(package),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_import(&self) -> Option<&ImportDefinition> {
        match self {
            Self::ImportDefinition(import) => Some(import),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_export(&self) -> Option<&ExportDefinition> {
        match self {
            Self::ExportDefinition(export) => Some(export),
            _ => None,
        }
    }

    /// The data definition behind a `var` or `const` node.
    #[must_use]
    pub const fn as_data_definition(&self) -> Option<&DataDefinition> {
        match self {
            Self::VarDefinition(def) | Self::ConstantDefinition(def) => Some(def),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_type_definition(&self) -> Option<&TypeDefinition> {
        match self {
            Self::TypeDefinition(def) => Some(def),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_func_definition(&self) -> Option<&FuncDefinition> {
        match self {
            Self::FuncDefinition(def) => Some(def),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_type_annotation(&self) -> Option<&TypeAnnotation> {
        match self {
            Self::TypeAnnotation(annotation) => Some(annotation),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_assignment(&self) -> Option<&Assignment> {
        match self {
            Self::Assignment(assignment) => Some(assignment),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_unresolved_symbol(&self) -> Option<&UnresolvedSymbol> {
        match self {
            Self::UnresolvedSymbol(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Owned child edges, in source order.
    #[must_use]
    pub fn children(&self) -> Vec<NodeRef> {
        match self {
            Self::TranslationUnit(unit) => std::iter::once(Rc::clone(&unit.package))
                .chain(unit.children.iter().cloned())
                .collect(),
            Self::ExportDefinition(export) => vec![Rc::clone(&export.definition)],
            Self::VarDefinition(def) | Self::ConstantDefinition(def) => {
                def.type_annotation.iter().chain(&def.value).cloned().collect()
            }
            Self::TypeDefinition(def) => def.aliased.iter().cloned().collect(),
            Self::FuncDefinition(def) => def
                .params
                .iter()
                .map(|p| Rc::clone(&p.type_annotation))
                .chain(def.return_type.iter().cloned())
                .collect(),
            Self::Assignment(assignment) => assignment.value.iter().cloned().collect(),
            Self::Package(_)
            | Self::ImportDefinition(_)
            | Self::TypeAnnotation(_)
            | Self::Literal(_)
            | Self::UnresolvedSymbol(_)
            | Self::Term
            | Self::Factor
            | Self::Expr => Vec::new(),
        }
    }

    fn label(&self) -> String {
        match self {
            Self::Package(p) => format!("Package {}", p.name),
            Self::ImportDefinition(i) => format!("ImportDefinition {}", i.package_name),
            Self::VarDefinition(d) => format!("VarDefinition {}", d.base_name),
            Self::ConstantDefinition(d) => format!("ConstantDefinition {}", d.base_name),
            Self::TypeDefinition(d) => format!("TypeDefinition {}", d.name),
            Self::FuncDefinition(d) => format!("FuncDefinition {}", d.name),
            Self::TypeAnnotation(t) => format!("TypeAnnotation {}", t.type_name),
            Self::Literal(l) => format!("Literal {:?} {}", l.kind, l.text),
            Self::UnresolvedSymbol(s) => format!("UnresolvedSymbol {}", s.name),
            _ => self.kind().to_string(),
        }
    }
}

/// Render a node and its descendants, one per line, indented by depth.
#[must_use]
pub fn dump_ast(node: &Node) -> String {
    fn walk(node: &Node, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&node.label());
        out.push('\n');
        for child in node.children() {
            walk(&child, depth + 1, out);
        }
    }

    let mut out = String::new();
    walk(node, 0, &mut out);
    out
}

/// Root of one file. There is no way to build one without its package.
#[derive(Debug)]
pub struct TranslationUnit {
    pub package: NodeRef,
    pub children: Vec<NodeRef>,
}

impl TranslationUnit {
    #[must_use]
    pub const fn new(package: NodeRef, children: Vec<NodeRef>) -> Self {
        Self { package, children }
    }

    /// Name of the declared package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.package.as_package().map_or("", |p| p.name.as_str())
    }
}

/// `package a.b.c;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    pub name: String,
}

/// `import a.b.c;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDefinition {
    pub package_name: String,
}

/// `export <definition>`
#[derive(Debug)]
pub struct ExportDefinition {
    pub definition: NodeRef,
}

/// Shared shape of `var` and `const` definitions.
#[derive(Debug)]
pub struct DataDefinition {
    pub base_name: String,
    /// [`TypeAnnotation`] node, if written.
    pub type_annotation: Option<NodeRef>,
    /// [`Assignment`] node, if an initializer was written.
    pub value: Option<NodeRef>,
    scope: Weak<Node>,
}

impl DataDefinition {
    #[must_use]
    pub const fn new(
        base_name: String,
        type_annotation: Option<NodeRef>,
        value: Option<NodeRef>,
        scope: Weak<Node>,
    ) -> Self {
        Self {
            base_name,
            type_annotation,
            value,
            scope,
        }
    }

    /// Enclosing scope, unless it has been dropped.
    #[must_use]
    pub fn scope(&self) -> Option<NodeRef> {
        self.scope.upgrade()
    }

    /// Declared directly in a live translation unit.
    #[must_use]
    pub fn is_global(&self) -> bool {
        self.scope()
            .is_some_and(|scope| scope.kind() == NodeKind::TranslationUnit)
    }

    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.type_annotation
            .as_deref()
            .and_then(Node::as_type_annotation)
            .map(|t| t.type_name.as_str())
    }

    /// Expression of the initializer, if present.
    #[must_use]
    pub fn initializer(&self) -> Option<&NodeRef> {
        self.value
            .as_deref()
            .and_then(Node::as_assignment)
            .and_then(|a| a.value.as_ref())
    }
}

/// `type Name` or `type Name = a.b;`
#[derive(Debug)]
pub struct TypeDefinition {
    pub name: String,
    pub aliased: Option<NodeRef>,
}

/// `func name(params) -> ret` with the body left for a later pass.
#[derive(Debug)]
pub struct FuncDefinition {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Option<NodeRef>,
    pub has_body: bool,
}

#[derive(Debug)]
pub struct Parameter {
    pub name: String,
    pub type_annotation: NodeRef,
}

/// Dotted type name written after `:`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAnnotation {
    pub type_name: String,
}

/// Right-hand side of `=`. An empty value means no expression followed.
#[derive(Debug)]
pub struct Assignment {
    pub value: Option<NodeRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    Int,
    Float,
    String,
    Char,
}

impl LiteralKind {
    #[must_use]
    pub const fn from_token_kind(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::IntegralLiteral => Some(Self::Int),
            TokenKind::FloatLiteral => Some(Self::Float),
            TokenKind::StringLiteral => Some(Self::String),
            TokenKind::CharLiteral => Some(Self::Char),
            _ => None,
        }
    }
}

/// Literal value, kept as its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Literal {
    pub kind: LiteralKind,
    pub text: String,
}

impl Literal {
    /// Build a literal from a literal token kind.
    ///
    /// # Panics
    ///
    /// Panics if `kind` is not one of the four literal token kinds.
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        let Some(literal_kind) = LiteralKind::from_token_kind(kind) else {
            panic!("{} is not a literal token", kind.name());
        };
        Self {
            kind: literal_kind,
            text: text.into(),
        }
    }

    /// Literal for `token`, or `None` if it is not a literal token.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        let kind = LiteralKind::from_token_kind(token.kind)?;
        Some(Self {
            kind,
            text: token.lexeme.clone().unwrap_or_default(),
        })
    }
}

/// Name used in an expression, resolved by a later pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedSymbol {
    pub name: String,
}
