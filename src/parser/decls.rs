//! Top-level structure: package clause, imports, const/var/type groups,
//! functions and methods with their specification blocks, predicates, and
//! implementation proofs.
//!
//! The root rule is deliberately lenient: bare statements, bare expressions,
//! a loose trailing `range` clause, and a leading comma-expression all parse
//! at the top level so that snippets and in-progress edits still produce a
//! usable tree.

use super::{Checkpoint, Parser};
use crate::kinds::SyntaxKind as K;
use smallvec::SmallVec;

impl Parser<'_> {
    pub(super) fn parse_source_file(&mut self) {
        self.start_node(K::SourceFile);
        self.skip_trivia();
        while !self.at_eof() {
            self.parse_top_level();
        }
        self.finish_node();
    }

    fn parse_top_level(&mut self) {
        match self.current() {
            Some(K::KwPackage) => self.parse_package_clause(),
            Some(K::KwImport) => self.parse_import_decl(),
            Some(K::KwConst) => self.parse_const_decl(),
            Some(K::KwVar) => self.parse_var_decl(),
            Some(K::KwType) => self.parse_type_decl(),
            Some(K::KwFunc) => {
                let cp = self.checkpoint();
                self.parse_func_like(cp);
            }
            Some(K::KwPred) => self.parse_pred_decl(),
            Some(k) if is_spec_clause_start(k) => self.parse_spec_prefixed(),
            Some(K::KwGhost) => self.parse_ghost_stmt(),
            // Root leniency: a trailing `range x` fragment from a deleted
            // for-header stays parseable.
            Some(K::KwRange) => {
                self.start_node(K::RangeClause);
                self.eat();
                self.parse_expr();
                self.eat_terminator("range clause");
                self.finish_node();
            }
            // Root leniency: a leading comma-expression (`, x` left behind
            // by an edit).
            Some(K::Comma) => {
                self.start_node(K::ExprStmt);
                self.eat();
                self.parse_expr_list();
                self.eat_terminator("expression");
                self.finish_node();
            }
            Some(_) => self.parse_stmt(),
            None => {}
        }
    }

    fn parse_package_clause(&mut self) {
        self.start_node(K::PackageClause);
        self.eat(); // package
        self.expect(K::Ident, "package name");
        self.eat_terminator("package clause");
        self.finish_node();
    }

    // === Imports ===

    fn parse_import_decl(&mut self) {
        self.start_node(K::ImportDecl);
        self.eat(); // import
        if self.eat_if(K::LParen) {
            while !self.at_eof() && !self.at(K::RParen) {
                self.parse_import_spec();
            }
            self.expect(K::RParen, "')'");
        } else {
            self.parse_import_spec();
        }
        self.eat_terminator("import declaration");
        self.finish_node();
    }

    fn parse_import_spec(&mut self) {
        self.start_node(K::ImportSpec);
        // Blank and named aliases are both plain identifiers; `.` imports
        // into the file scope.
        if self.at(K::Dot) || self.at(K::Ident) {
            self.eat();
        }
        if self.at(K::StringLit) || self.at(K::RawStringLit) {
            self.eat();
        } else {
            self.error_here("expected import path string");
        }
        self.eat_terminator("import spec");
        self.finish_node();
    }

    // === Const / var ===

    pub(super) fn parse_const_decl(&mut self) {
        self.parse_value_decl(K::ConstDecl, K::ConstSpec);
    }

    pub(super) fn parse_var_decl(&mut self) {
        self.parse_value_decl(K::VarDecl, K::VarSpec);
    }

    fn parse_value_decl(&mut self, decl: K, spec: K) {
        self.start_node(decl);
        self.eat(); // const | var
        if self.eat_if(K::LParen) {
            while !self.at_eof() && !self.at(K::RParen) {
                self.parse_value_spec(spec);
            }
            self.expect(K::RParen, "')'");
            self.eat_terminator("declaration group");
        } else {
            self.parse_value_spec(spec);
        }
        self.finish_node();
    }

    /// `names [type] [= exprs]` — arity agreement between the two lists is a
    /// semantic concern and not checked here.
    fn parse_value_spec(&mut self, spec: K) {
        self.start_node(spec);
        self.parse_ident_list();
        if !self.at(K::Assign) && !self.at_terminator() {
            self.parse_type();
        }
        if self.eat_if(K::Assign) {
            self.parse_expr_list();
        }
        self.eat_terminator("declaration");
        self.finish_node();
    }

    pub(super) fn parse_ident_list(&mut self) {
        self.expect(K::Ident, "identifier");
        while self.at(K::Comma) && self.nth(1) == Some(K::Ident) {
            self.eat(); // ,
            self.eat(); // ident
        }
    }

    // === Type declarations ===

    pub(super) fn parse_type_decl(&mut self) {
        self.start_node(K::TypeDecl);
        self.eat(); // type
        if self.eat_if(K::LParen) {
            while !self.at_eof() && !self.at(K::RParen) {
                self.parse_type_spec();
            }
            self.expect(K::RParen, "')'");
            self.eat_terminator("type declaration group");
        } else {
            self.parse_type_spec();
        }
        self.finish_node();
    }

    fn parse_type_spec(&mut self) {
        let cp = self.checkpoint();
        self.expect(K::Ident, "type name");
        if self.at(K::LBrack) {
            self.parse_type_param_list();
        }
        let alias = self.eat_if(K::Assign);
        self.parse_type();
        self.eat_terminator("type spec");
        self.start_node_at(cp, if alias { K::TypeAlias } else { K::TypeSpec });
    }

    pub(super) fn parse_type_param_list(&mut self) {
        self.start_node(K::TypeParamList);
        self.eat(); // [
        self.comma_list(K::RBrack, |p| {
            if !p.at(K::Ident) {
                return false;
            }
            p.start_node(K::TypeParamDecl);
            p.parse_ident_list();
            p.parse_type_elem();
            p.finish_node();
            true
        });
        self.expect(K::RBrack, "']'");
        self.finish_node();
    }

    // === Functions and methods ===

    /// `func` declarations, wrapped at `cp` so that an already-parsed
    /// specification block ends up inside the declaration node.
    pub(super) fn parse_func_like(&mut self, cp: Checkpoint) {
        debug_assert!(self.at(K::KwFunc));
        let is_method = self.nth(1) == Some(K::LParen);
        self.eat(); // func
        if is_method {
            self.start_node(K::Receiver);
            self.parse_param_list();
            self.finish_node();
        }
        self.expect(K::Ident, "function name");
        if self.at(K::LBrack) {
            self.parse_type_param_list();
        }
        if self.at(K::LParen) {
            self.parse_param_list();
        } else {
            self.error_here("expected parameter list");
        }
        self.parse_result_opt();
        if self.at(K::LBrace) {
            self.parse_block();
        }
        self.eat_terminator("function declaration");
        self.start_node_at(cp, if is_method { K::MethodDecl } else { K::FuncDecl });
    }

    /// Optional result: a parenthesized parameter-like list or a single type.
    pub(super) fn parse_result_opt(&mut self) {
        if self.at(K::LParen) {
            self.parse_param_list();
        } else if !self.at(K::LBrace) && !self.at_terminator() && self.can_start_type() {
            self.parse_type();
        }
    }

    pub(super) fn parse_param_list(&mut self) {
        self.start_node(K::ParamList);
        self.eat(); // (
        self.comma_list(K::RParen, |p| p.parse_param_decl());
        self.expect(K::RParen, "')'");
        self.finish_node();
    }

    /// One comma-separated parameter item. Whether a lone identifier is a
    /// name or a type is not locally decidable (`f(x, y int)`): each item
    /// keeps its own node and name/type grouping stays a semantic concern.
    fn parse_param_decl(&mut self) -> bool {
        if !self.can_start_type() && !self.at(K::Ellipsis) && !self.at(K::KwGhost) {
            return false;
        }
        self.start_node(K::ParamDecl);
        self.eat_if(K::KwGhost);
        if self.at(K::Ident) && self.param_item_has_type() {
            self.eat(); // the name
        }
        if self.eat_if(K::Ellipsis) {
            self.parse_type();
        } else if self.can_start_type() {
            self.parse_type();
        }
        self.finish_node();
        true
    }

    /// After an identifier, does this item continue with a type?
    fn param_item_has_type(&self) -> bool {
        match self.nth(1) {
            Some(K::Comma) | Some(K::RParen) | None => false,
            Some(k) => {
                k == K::Ellipsis
                    || matches!(
                        k,
                        K::Ident
                            | K::Star
                            | K::LBrack
                            | K::LParen
                            | K::Arrow
                            | K::KwChan
                            | K::KwMap
                            | K::KwFunc
                            | K::KwInterface
                            | K::KwStruct
                    )
            }
        }
    }

    // === Specification blocks ===

    /// One or more spec clauses, then the construct they attach to. The
    /// clause list is parsed first and wrapped retroactively: into a
    /// `SpecBlock` child of the following `FuncDecl`/`MethodDecl`/
    /// `OutlineStmt`, or directly into a `SpecForStmt` for loop contracts.
    pub(super) fn parse_spec_prefixed(&mut self) {
        let cp = self.checkpoint();
        let mut clauses: SmallVec<[K; 4]> = SmallVec::new();
        while let Some(k) = self.current() {
            if !is_spec_clause_start(k) {
                break;
            }
            clauses.push(k);
            self.parse_spec_clause(k);
        }

        match self.current() {
            Some(K::KwFor) => {
                self.parse_for_stmt();
                self.eat_terminator("for statement");
                self.start_node_at(cp, K::SpecForStmt);
            }
            Some(K::KwFunc) => {
                self.start_node_at(cp, K::SpecBlock);
                self.parse_func_like(cp);
            }
            Some(K::KwOutline) => {
                self.start_node_at(cp, K::SpecBlock);
                self.parse_outline_stmt(cp);
            }
            _ => {
                if clauses.iter().any(|&k| k == K::KwInvariant) {
                    self.error_here("expected 'for' after loop specification");
                } else {
                    self.error_here("expected function, method, or outline after specification");
                }
                self.start_node_at(cp, K::SpecBlock);
            }
        }
    }

    pub(super) fn parse_spec_clause(&mut self, kw: K) {
        match kw {
            K::KwRequires => self.parse_assertion_clause(K::RequiresClause),
            K::KwEnsures => self.parse_assertion_clause(K::EnsuresClause),
            K::KwPreserves => self.parse_assertion_clause(K::PreservesClause),
            K::KwInvariant => self.parse_assertion_clause(K::InvariantClause),
            K::KwDecreases => self.parse_decreases_clause(),
            K::KwPure | K::KwOpaque | K::KwTrusted => {
                self.start_node(K::MarkerClause);
                self.eat();
                // Markers may share a line with the declaration header
                // (`pure func get() int`).
                if !matches!(self.current(), Some(K::KwFunc) | Some(K::KwOutline)) {
                    self.eat_terminator("specification marker");
                }
                self.finish_node();
            }
            _ => unreachable!("not a spec clause keyword"),
        }
    }

    fn parse_assertion_clause(&mut self, node: K) {
        self.start_node(node);
        self.eat(); // keyword
        self.parse_expr();
        self.eat_terminator("specification clause");
        self.finish_node();
    }

    /// `decreases [expr {, expr}] [if expr]` — the bare form is a wildcard
    /// termination measure and is legal.
    fn parse_decreases_clause(&mut self) {
        self.start_node(K::DecreasesClause);
        self.eat(); // decreases
        if !self.at_terminator() && !self.at(K::KwIf) && !self.at(K::KwFunc) {
            self.parse_expr_list();
        }
        if self.eat_if(K::KwIf) {
            self.parse_expr();
        }
        if !matches!(self.current(), Some(K::KwFunc) | Some(K::KwOutline)) {
            self.eat_terminator("decreases clause");
        }
        self.finish_node();
    }

    // === Predicates ===

    /// `pred name(params) { body }` or `pred (recv) name(params)`; the body
    /// is a single assertion expression and is optional (abstract
    /// predicates).
    fn parse_pred_decl(&mut self) {
        self.start_node(K::PredDecl);
        self.eat(); // pred
        if self.at(K::LParen) {
            self.start_node(K::Receiver);
            self.parse_param_list();
            self.finish_node();
        }
        self.expect(K::Ident, "predicate name");
        if self.at(K::LParen) {
            self.parse_param_list();
        } else {
            self.error_here("expected predicate parameter list");
        }
        if self.eat_if(K::LBrace) {
            self.parse_expr();
            self.expect(K::RBrace, "'}'");
        }
        self.eat_terminator("predicate declaration");
        self.finish_node();
    }

    // === Implementation proofs ===

    /// Does the current line read `<Type> implements <Type>`? Bounded token
    /// scan; consulted from statement position before the expression
    /// grammar claims `implements` as a binary operator.
    pub(super) fn at_impl_proof(&self) -> bool {
        let mut n = 0usize;
        let mut depth = 0i32;
        while n < 32 {
            match self.nth(n) {
                Some(K::KwImplements) if depth == 0 => return n > 0,
                Some(K::LBrack) | Some(K::LParen) => depth += 1,
                Some(K::RBrack) | Some(K::RParen) => depth -= 1,
                Some(K::LBrace) | Some(K::Semi) | Some(K::Define) | Some(K::Assign) | None => {
                    return false
                }
                Some(_) => {}
            }
            n += 1;
        }
        false
    }

    pub(super) fn parse_impl_proof(&mut self) {
        self.start_node(K::ImplProof);
        self.parse_type();
        self.expect(K::KwImplements, "'implements'");
        self.parse_type();
        if self.eat_if(K::LBrace) {
            while !self.at_eof() && !self.at(K::RBrace) {
                if self.at(K::KwPred) {
                    self.parse_pred_alias();
                } else {
                    self.error_and_recover("expected 'pred' alias binding");
                }
            }
            self.expect(K::RBrace, "'}'");
        }
        self.eat_terminator("implementation proof");
        self.finish_node();
    }

    /// `pred name := expr` — the right-hand side may be a plain expression
    /// or a `Type.member` reference; both are expressions here.
    fn parse_pred_alias(&mut self) {
        self.start_node(K::PredAlias);
        self.eat(); // pred
        self.expect(K::Ident, "predicate name");
        self.expect(K::Define, "':='");
        self.parse_expr();
        self.eat_terminator("predicate alias");
        self.finish_node();
    }
}

pub(super) fn is_spec_clause_start(kind: K) -> bool {
    matches!(
        kind,
        K::KwRequires
            | K::KwEnsures
            | K::KwPreserves
            | K::KwDecreases
            | K::KwInvariant
            | K::KwPure
            | K::KwOpaque
            | K::KwTrusted
    )
}
