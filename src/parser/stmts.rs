//! Statement grammar: blocks, simple statements, control flow, and the
//! ghost-code statement forms (fold/unfold, proof statements, ghost
//! wrappers, match statements, outline blocks).

use super::{Checkpoint, Parser};
use crate::kinds::SyntaxKind as K;

impl Parser<'_> {
    pub(super) fn parse_block(&mut self) {
        self.start_node(K::Block);
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            self.parse_stmt();
        }
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }

    pub(super) fn parse_stmt(&mut self) {
        match self.current() {
            // Local declarations share the top-level grammar.
            Some(K::KwConst) => self.parse_const_decl(),
            Some(K::KwVar) => self.parse_var_decl(),
            Some(K::KwType) => self.parse_type_decl(),
            Some(K::KwReturn) => {
                self.start_node(K::ReturnStmt);
                self.eat();
                if !self.at_terminator() {
                    self.parse_expr_list();
                }
                self.eat_terminator("return statement");
                self.finish_node();
            }
            Some(K::KwBreak) | Some(K::KwContinue) => {
                let node = if self.at(K::KwBreak) {
                    K::BreakStmt
                } else {
                    K::ContinueStmt
                };
                self.start_node(node);
                self.eat();
                if self.at(K::Ident) && !self.newline_terminates_here() {
                    self.eat(); // label
                }
                self.eat_terminator("branch statement");
                self.finish_node();
            }
            Some(K::KwGoto) => {
                self.start_node(K::GotoStmt);
                self.eat();
                self.expect(K::Ident, "label");
                self.eat_terminator("goto statement");
                self.finish_node();
            }
            Some(K::KwFallthrough) => {
                self.start_node(K::FallthroughStmt);
                self.eat();
                self.eat_terminator("fallthrough statement");
                self.finish_node();
            }
            Some(K::KwGo) | Some(K::KwDefer) => {
                let node = if self.at(K::KwGo) {
                    K::GoStmt
                } else {
                    K::DeferStmt
                };
                self.start_node(node);
                self.eat();
                // `defer fold p()` / `defer unfold p()` schedule ghost
                // operations.
                match self.current() {
                    Some(K::KwFold) | Some(K::KwUnfold) => self.parse_fold_stmt(),
                    _ => {
                        self.parse_expr();
                        self.eat_terminator("deferred call");
                    }
                }
                self.finish_node();
            }
            Some(K::KwIf) => {
                self.parse_if_stmt();
                self.eat_terminator("if statement");
            }
            Some(K::KwFor) => {
                self.parse_for_stmt();
                self.eat_terminator("for statement");
            }
            Some(K::KwSwitch) => self.parse_switch_stmt(),
            Some(K::KwSelect) => self.parse_select_stmt(),
            Some(K::LBrace) => {
                self.parse_block();
                self.eat_terminator("block");
            }
            Some(K::Semi) => {
                self.start_node(K::EmptyStmt);
                self.eat();
                self.finish_node();
            }
            Some(K::KwGhost) => self.parse_ghost_stmt(),
            Some(K::KwFold) | Some(K::KwUnfold) => self.parse_fold_stmt(),
            Some(K::KwAssert) | Some(K::KwAssume) | Some(K::KwInhale) | Some(K::KwExhale) => {
                self.start_node(K::ProofStmt);
                self.eat();
                self.parse_expr();
                self.eat_terminator("proof statement");
                self.finish_node();
            }
            Some(K::KwMatch) => {
                self.parse_match(K::MatchStmt);
                self.eat_terminator("match statement");
            }
            Some(K::KwOutline) => {
                let cp = self.checkpoint();
                self.parse_outline_stmt(cp);
            }
            Some(k) if super::decls::is_spec_clause_start(k) => self.parse_spec_prefixed(),
            Some(K::Ident)
                if self.nth(1) == Some(K::Colon) =>
            {
                self.start_node(K::LabeledStmt);
                self.eat(); // label
                self.eat(); // :
                if !self.at(K::RBrace) && !self.at_eof() {
                    self.parse_stmt();
                }
                self.finish_node();
            }
            Some(_) if self.at_impl_proof() => self.parse_impl_proof(),
            Some(_) => {
                self.parse_simple_stmt();
                self.eat_terminator("statement");
            }
            None => {}
        }
    }

    // === Simple statements ===

    /// Assignment, short declaration, send, inc/dec, or a bare expression.
    fn parse_simple_stmt(&mut self) {
        let cp = self.checkpoint();
        self.parse_expr_list();
        if !self.simple_stmt_suffix(cp) {
            self.start_node_at(cp, K::ExprStmt);
        }
    }

    /// The tail that turns an expression list into a non-expression simple
    /// statement. Returns false when the list stands alone.
    fn simple_stmt_suffix(&mut self, cp: Checkpoint) -> bool {
        match self.current() {
            Some(K::Define) => {
                self.eat();
                self.parse_expr_list();
                self.start_node_at(cp, K::ShortVarDecl);
            }
            Some(k) if k.is_assign_op() => {
                self.eat();
                self.parse_expr_list();
                self.start_node_at(cp, K::AssignStmt);
            }
            Some(K::Inc) | Some(K::Dec) => {
                self.eat();
                self.start_node_at(cp, K::IncDecStmt);
            }
            Some(K::Arrow) if !self.newline_terminates_here() => {
                self.eat();
                self.parse_expr();
                self.start_node_at(cp, K::SendStmt);
            }
            _ => return false,
        }
        true
    }

    // === Control flow ===

    pub(super) fn parse_if_stmt(&mut self) {
        self.start_node(K::IfStmt);
        self.eat(); // if
        let saved = std::mem::replace(&mut self.allow_struct_lit, false);
        self.parse_header();
        self.allow_struct_lit = saved;
        self.parse_block();
        if self.eat_if(K::KwElse) {
            if self.at(K::KwIf) {
                self.parse_if_stmt();
            } else {
                self.parse_block();
            }
        }
        self.finish_node();
    }

    /// `[init ;] cond` — the init is a simple statement and a bare
    /// condition stays an unwrapped expression. A type-switch guard
    /// (`x := v.(type)`) is a short declaration with no condition after it.
    fn parse_header(&mut self) {
        let cp = self.checkpoint();
        self.parse_expr_list();
        if self.simple_stmt_suffix(cp) {
            if self.eat_if(K::Semi) && !self.at(K::LBrace) {
                let cond = self.checkpoint();
                self.parse_expr_list();
                self.simple_stmt_suffix(cond);
            }
        } else if self.at(K::Semi) {
            self.start_node_at(cp, K::ExprStmt);
            self.eat();
            if !self.at(K::LBrace) {
                self.parse_expr();
            }
        }
    }

    pub(super) fn parse_for_stmt(&mut self) {
        self.start_node(K::ForStmt);
        self.eat(); // for
        let saved = std::mem::replace(&mut self.allow_struct_lit, false);
        match self.current() {
            Some(K::LBrace) => {} // infinite loop
            Some(K::KwRange) => {
                self.start_node(K::RangeClause);
                self.eat();
                self.parse_expr();
                self.finish_node();
            }
            Some(K::Semi) => self.parse_for_clause(),
            _ => {
                if self.header_has_semi() {
                    self.parse_for_clause();
                } else {
                    let cp = self.checkpoint();
                    self.parse_expr_list();
                    if matches!(self.current(), Some(K::Define) | Some(K::Assign))
                        && self.nth(1) == Some(K::KwRange)
                    {
                        self.eat(); // := or =
                        self.eat(); // range
                        self.parse_expr();
                        self.start_node_at(cp, K::RangeClause);
                    } else {
                        // Bare condition loop; a stray suffix still parses
                        // as a (malformed) simple statement.
                        self.simple_stmt_suffix(cp);
                    }
                }
            }
            None => {}
        }
        self.allow_struct_lit = saved;
        self.parse_block();
        self.finish_node();
    }

    /// Is there a `;` at depth 0 before the body brace? Distinguishes the
    /// three-part clause from a bare condition.
    fn header_has_semi(&self) -> bool {
        let mut n = 0usize;
        let mut depth = 0i32;
        while n < 256 {
            match self.nth(n) {
                Some(K::Semi) if depth == 0 => return true,
                Some(K::LBrace) if depth == 0 => return false,
                Some(K::LParen) | Some(K::LBrack) | Some(K::LBrace) => depth += 1,
                Some(K::RParen) | Some(K::RBrack) | Some(K::RBrace) => depth -= 1,
                None => return false,
                Some(_) => {}
            }
            n += 1;
        }
        false
    }

    /// `[init] ; [cond] ; [post]`.
    fn parse_for_clause(&mut self) {
        self.start_node(K::ForClause);
        if !self.at(K::Semi) {
            self.parse_simple_stmt();
        }
        self.expect(K::Semi, "';'");
        if !self.at(K::Semi) && !self.at(K::LBrace) {
            self.parse_expr();
        }
        self.expect(K::Semi, "';'");
        if !self.at(K::LBrace) && !self.at_eof() {
            self.parse_simple_stmt();
        }
        self.finish_node();
    }

    fn parse_switch_stmt(&mut self) {
        let cp = self.checkpoint();
        let is_type = self.switch_is_type_switch();
        self.eat(); // switch
        let saved = std::mem::replace(&mut self.allow_struct_lit, false);
        if !self.at(K::LBrace) {
            self.parse_header();
        }
        self.allow_struct_lit = saved;
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            match self.current() {
                Some(K::KwCase) => {
                    self.start_node(K::CaseClause);
                    self.eat();
                    self.parse_case_list(is_type);
                    self.expect(K::Colon, "':'");
                    self.parse_clause_body();
                    self.finish_node();
                }
                Some(K::KwDefault) => {
                    self.start_node(K::DefaultClause);
                    self.eat();
                    self.expect(K::Colon, "':'");
                    self.parse_clause_body();
                    self.finish_node();
                }
                _ => self.error_and_recover("expected 'case' or 'default'"),
            }
        }
        self.expect(K::RBrace, "'}'");
        self.eat_terminator("switch statement");
        self.start_node_at(
            cp,
            if is_type {
                K::TypeSwitchStmt
            } else {
                K::ExprSwitchStmt
            },
        );
    }

    /// Looks for the `.(type)` guard before the body brace.
    fn switch_is_type_switch(&self) -> bool {
        let mut n = 0usize;
        let mut depth = 0i32;
        while n < 64 {
            match self.nth(n) {
                Some(K::LBrace) if depth == 0 => return false,
                Some(K::KwType) if n >= 2 => {
                    if self.nth(n - 1) == Some(K::LParen) && self.nth(n - 2) == Some(K::Dot) {
                        return true;
                    }
                }
                Some(K::LParen) | Some(K::LBrack) | Some(K::LBrace) => depth += 1,
                Some(K::RParen) | Some(K::RBrack) | Some(K::RBrace) => depth -= 1,
                None => return false,
                Some(_) => {}
            }
            n += 1;
        }
        false
    }

    fn parse_case_list(&mut self, is_type: bool) {
        loop {
            if is_type {
                self.parse_type();
            } else {
                self.parse_expr();
            }
            if !self.eat_if(K::Comma) {
                break;
            }
        }
    }

    fn parse_clause_body(&mut self) {
        while !self.at_eof()
            && !matches!(
                self.current(),
                Some(K::KwCase) | Some(K::KwDefault) | Some(K::RBrace)
            )
        {
            self.parse_stmt();
        }
    }

    fn parse_select_stmt(&mut self) {
        self.start_node(K::SelectStmt);
        self.eat(); // select
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            match self.current() {
                Some(K::KwCase) => {
                    self.start_node(K::CommClause);
                    self.eat();
                    self.parse_simple_stmt(); // send or receive
                    self.expect(K::Colon, "':'");
                    self.parse_clause_body();
                    self.finish_node();
                }
                Some(K::KwDefault) => {
                    self.start_node(K::DefaultClause);
                    self.eat();
                    self.expect(K::Colon, "':'");
                    self.parse_clause_body();
                    self.finish_node();
                }
                _ => self.error_and_recover("expected 'case' or 'default'"),
            }
        }
        self.expect(K::RBrace, "'}'");
        self.eat_terminator("select statement");
        self.finish_node();
    }

    // === Ghost-code statements ===

    /// `ghost <statement>`: the wrapped form may be any statement or local
    /// declaration, including a ghost function declaration.
    pub(super) fn parse_ghost_stmt(&mut self) {
        self.start_node(K::GhostStmt);
        self.eat(); // ghost
        match self.current() {
            Some(K::KwFunc) => {
                let cp = self.checkpoint();
                self.parse_func_like(cp);
            }
            Some(k) if super::decls::is_spec_clause_start(k) => self.parse_spec_prefixed(),
            Some(_) => self.parse_stmt(),
            None => self.error_here("expected statement after 'ghost'"),
        }
        self.finish_node();
    }

    fn parse_fold_stmt(&mut self) {
        let node = if self.at(K::KwFold) {
            K::FoldStmt
        } else {
            K::UnfoldStmt
        };
        self.start_node(node);
        self.eat(); // fold | unfold
        self.parse_expr(); // the predicate access
        self.eat_terminator("fold statement");
        self.finish_node();
    }

    /// `outline( stmts )` groups statements into a verification unit; a
    /// preceding contract wraps in via `cp`.
    pub(super) fn parse_outline_stmt(&mut self, cp: Checkpoint) {
        self.eat(); // outline
        self.expect(K::LParen, "'('");
        while !self.at_eof() && !self.at(K::RParen) {
            self.parse_stmt();
        }
        self.expect(K::RParen, "')'");
        self.eat_terminator("outline block");
        self.start_node_at(cp, K::OutlineStmt);
    }
}
