//! The parse result and read-side helpers over the green tree.
//!
//! `Parse` owns the immutable green tree plus every diagnostic produced
//! while building it; `syntax()` projects a red-tree cursor. The tree is
//! lossless: `syntax().text()` reproduces the input byte for byte,
//! malformed regions included.

use crate::error::Diag;
use crate::kinds::{SyntaxElement, SyntaxKind, SyntaxNode};
use rowan::{GreenNode, TextSize};

#[derive(Debug, Clone)]
pub struct Parse {
    pub(crate) green: GreenNode,
    pub errors: Vec<Diag>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// Indented debug rendering of the tree, for tests and tooling.
    pub fn debug_tree(&self) -> String {
        format!("{:#?}", self.syntax())
    }
}

/// The deepest node whose range contains `offset`. At a boundary between
/// two tokens the right-hand one wins; trivia resolves to its parent like
/// any other token.
pub fn node_at_offset(root: &SyntaxNode, offset: u32) -> Option<SyntaxNode> {
    if u64::from(offset) > u64::from(u32::from(root.text_range().end())) {
        return None;
    }
    let at = TextSize::from(offset.min(u32::from(root.text_range().end())));
    root.token_at_offset(at).right_biased()?.parent()
}

fn child_node(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxElement> {
    node.children()
        .find(|n| n.kind() == kind)
        .map(SyntaxElement::Node)
}

fn child_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxElement> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
        .map(SyntaxElement::Token)
}

fn is_type_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind as K;
    matches!(
        kind,
        K::PointerType
            | K::ArrayType
            | K::ImplicitLengthArrayType
            | K::SliceType
            | K::MapType
            | K::ChanType
            | K::FuncType
            | K::StructType
            | K::InterfaceType
            | K::QualifiedType
            | K::GenericType
            | K::TypeElem
            | K::ParenType
    )
}

fn is_expr_kind(kind: SyntaxKind) -> bool {
    use SyntaxKind as K;
    matches!(
        kind,
        K::ParenExpr
            | K::UnaryExpr
            | K::BinaryExpr
            | K::TernaryExpr
            | K::CallExpr
            | K::SelectorExpr
            | K::IndexExpr
            | K::SliceExpr
            | K::TypeAssertExpr
            | K::ConversionExpr
            | K::CompositeLit
            | K::NewExpr
            | K::MakeExpr
            | K::QuantifierExpr
            | K::UnfoldingExpr
            | K::LetExpr
            | K::MatchExpr
            | K::ExprList
    )
}

/// A leaf that stands for a whole expression on its own.
fn is_expr_token(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Ident || kind.is_literal()
}

fn nth_expr_child(node: &SyntaxNode, n: usize) -> Option<SyntaxElement> {
    node.children_with_tokens()
        .filter(|e| match e {
            SyntaxElement::Node(n) => is_expr_kind(n.kind()) || is_type_kind(n.kind()),
            SyntaxElement::Token(t) => is_expr_token(t.kind()),
        })
        .nth(n)
}

/// A type child that follows the parameter list (the unparenthesized
/// result-type form of a signature).
fn result_type_after_params(node: &SyntaxNode) -> Option<SyntaxElement> {
    let mut past_params = false;
    for e in node.children_with_tokens() {
        match &e {
            SyntaxElement::Node(n) if n.kind() == SyntaxKind::ParamList => {
                if past_params {
                    return Some(e);
                }
                past_params = true;
            }
            SyntaxElement::Node(n) if past_params && is_type_kind(n.kind()) => return Some(e),
            // A bare named result type is a single token.
            SyntaxElement::Token(t) if past_params && t.kind() == SyntaxKind::Ident => {
                return Some(e)
            }
            _ => {}
        }
    }
    None
}

/// Named-field access on the principal node kinds. Field names are part of
/// the public surface alongside the kind names themselves; tooling keys
/// queries on them.
pub fn field(node: &SyntaxNode, name: &str) -> Option<SyntaxElement> {
    use SyntaxKind as K;
    match (node.kind(), name) {
        (K::SourceFile, "package") => child_node(node, K::PackageClause),
        (K::PackageClause, "name") => child_token(node, K::Ident),
        (K::ImportSpec, "alias") => child_token(node, K::Ident),
        (K::ImportSpec, "path") => {
            child_token(node, K::StringLit).or_else(|| child_token(node, K::RawStringLit))
        }

        (K::FuncDecl | K::MethodDecl, "spec") => child_node(node, K::SpecBlock),
        (K::MethodDecl, "receiver") => child_node(node, K::Receiver),
        (K::FuncDecl | K::MethodDecl, "name") => child_token(node, K::Ident),
        (K::FuncDecl | K::MethodDecl, "type_parameters") => child_node(node, K::TypeParamList),
        (K::FuncDecl | K::MethodDecl, "parameters") => child_node(node, K::ParamList),
        (K::FuncDecl | K::MethodDecl, "result") => result_type_after_params(node),
        (K::FuncDecl | K::MethodDecl, "body") => child_node(node, K::Block),

        (K::PredDecl, "receiver") => child_node(node, K::Receiver),
        (K::PredDecl, "name") => child_token(node, K::Ident),
        (K::PredDecl, "parameters") => child_node(node, K::ParamList),
        (K::PredDecl, "body") => node
            .children()
            .find(|n| is_expr_kind(n.kind()))
            .map(SyntaxElement::Node),

        (K::ImplProof, "subject") => nth_expr_child(node, 0),
        (K::ImplProof, "interface") => nth_expr_child(node, 1),
        (K::PredAlias, "name") => child_token(node, K::Ident),

        (K::SpecForStmt, "loop") => child_node(node, K::ForStmt),
        (K::ForStmt, "clause") => {
            child_node(node, K::ForClause).or_else(|| child_node(node, K::RangeClause))
        }
        (K::ForStmt, "body") => child_node(node, K::Block),
        (K::IfStmt, "body") => child_node(node, K::Block),
        (K::IfStmt, "else") => {
            let after_else = node
                .children_with_tokens()
                .skip_while(|e| e.kind() != K::KwElse)
                .filter_map(|e| e.into_node())
                .next()?;
            Some(SyntaxElement::Node(after_else))
        }

        (
            K::RequiresClause | K::EnsuresClause | K::PreservesClause | K::InvariantClause,
            "assertion",
        ) => nth_expr_child(node, 0),

        (K::BinaryExpr, "lhs") => nth_expr_child(node, 0),
        (K::BinaryExpr, "rhs") => nth_expr_child(node, 1),
        (K::TernaryExpr, "condition") => nth_expr_child(node, 0),
        (K::TernaryExpr, "then") => nth_expr_child(node, 1),
        (K::TernaryExpr, "else") => nth_expr_child(node, 2),
        (K::UnaryExpr, "operand") => nth_expr_child(node, 0),
        (K::CallExpr | K::ConversionExpr, "callee") => nth_expr_child(node, 0),
        (K::CallExpr | K::ConversionExpr, "arguments") => child_node(node, K::ArgList),
        (K::SelectorExpr, "operand") => nth_expr_child(node, 0),
        (K::SelectorExpr, "name") => {
            let mut idents = node
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| t.kind() == K::Ident);
            let first = idents.next();
            idents.next().or(first).map(SyntaxElement::Token)
        }
        (K::IndexExpr | K::SliceExpr, "operand") => nth_expr_child(node, 0),
        (K::IndexExpr, "index") => nth_expr_child(node, 1),

        (K::QuantifierExpr, "body") => node
            .children()
            .filter(|n| is_expr_kind(n.kind()))
            .last()
            .map(SyntaxElement::Node)
            .or_else(|| {
                node.children_with_tokens()
                    .filter(|e| match e {
                        SyntaxElement::Node(n) => is_expr_kind(n.kind()),
                        SyntaxElement::Token(t) => is_expr_token(t.kind()),
                    })
                    .last()
            }),
        (K::UnfoldingExpr | K::LetExpr, "body") => {
            let mut past_in = false;
            node.children_with_tokens().find_map(|e| {
                if e.kind() == K::KwIn {
                    past_in = true;
                    None
                } else if past_in {
                    match &e {
                        SyntaxElement::Node(n) if is_expr_kind(n.kind()) => Some(e),
                        SyntaxElement::Token(t) if is_expr_token(t.kind()) => Some(e),
                        _ => None,
                    }
                } else {
                    None
                }
            })
        }
        (K::LetExpr, "name") => child_token(node, K::Ident),

        (K::MatchStmt | K::MatchExpr, "scrutinee") => nth_expr_child(node, 0),
        (K::MatchBinder, "name") => child_token(node, K::Ident),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinds::SyntaxKind as K;

    fn parse(src: &str) -> Parse {
        crate::parse(src)
    }

    #[test]
    fn lossless_text() {
        let src = "package p\n\nfunc f() int { return 1 } // done\n";
        let p = parse(src);
        assert_eq!(p.syntax().text().to_string(), src);
    }

    #[test]
    fn node_at_offset_finds_deepest() {
        let src = "package p\nfunc f() { x := 1 }\n";
        let p = parse(src);
        let root = p.syntax();
        let off = src.find("x :=").unwrap() as u32;
        let node = node_at_offset(&root, off).unwrap();
        assert_eq!(node.kind(), K::ShortVarDecl);
        assert!(node_at_offset(&root, src.len() as u32 + 10).is_none());
    }

    #[test]
    fn function_fields_resolve() {
        let src = "package p\nfunc add(a, b int) int { return a + b }\n";
        let p = parse(src);
        let func = p
            .syntax()
            .descendants()
            .find(|n| n.kind() == K::FuncDecl)
            .unwrap();
        assert_eq!(
            field(&func, "name").unwrap().to_string(),
            "add".to_string()
        );
        assert_eq!(field(&func, "parameters").unwrap().kind(), K::ParamList);
        assert_eq!(field(&func, "body").unwrap().kind(), K::Block);
        assert!(field(&func, "no_such_field").is_none());
    }
}
