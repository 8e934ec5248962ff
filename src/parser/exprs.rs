//! Pratt expression parsing, primaries, postfix suffixes, and the
//! assertion-language expression forms (quantifiers, `unfolding`, `let`,
//! `match`, ternary).
//!
//! All binding powers and ambiguity tie-breaks come from
//! [`crate::precedence`]; this module only walks the shapes.

use super::{Checkpoint, Parser};
use crate::kinds::SyntaxKind as K;
use crate::precedence::{
    infix_binding_power, is_unary_op, paren_conversion_ahead, resolve_bracket_suffix,
    starts_type_only, BracketSuffix, TERNARY_BP, UNARY_BP, UNFOLDING_RBP,
};

impl Parser<'_> {
    pub(super) fn parse_expr(&mut self) {
        self.parse_expr_bp(0);
    }

    /// `expr {, expr}`, wrapped in an `ExprList` node only when a comma
    /// actually appears.
    pub(super) fn parse_expr_list(&mut self) {
        let cp = self.checkpoint();
        self.parse_expr();
        if !self.at(K::Comma) {
            return;
        }
        while self.eat_if(K::Comma) {
            if self.at_terminator() {
                break; // trailing comma
            }
            self.parse_expr();
        }
        self.start_node_at(cp, K::ExprList);
    }

    pub(super) fn parse_expr_bp(&mut self, min_bp: u8) {
        let cp = self.checkpoint();
        self.parse_prefix(cp);

        loop {
            let Some(op) = self.current() else { break };
            // A newline after a statement-ending token closes the
            // expression; `a` and `-b` on separate lines are two statements.
            if self.newline_terminates_here() {
                break;
            }
            if op == K::Question {
                if TERNARY_BP.0 < min_bp {
                    break;
                }
                self.eat(); // ?
                self.parse_expr_bp(0);
                self.expect(K::Colon, "':' in conditional expression");
                self.parse_expr_bp(TERNARY_BP.1);
                self.start_node_at(cp, K::TernaryExpr);
                continue;
            }
            if op == K::KwIn && self.no_in_operator {
                break;
            }
            let Some((lbp, rbp)) = infix_binding_power(op) else {
                break;
            };
            if lbp < min_bp {
                break;
            }
            self.eat(); // operator
            if op == K::KwImplements {
                self.parse_type();
            } else {
                self.parse_expr_bp(rbp);
            }
            self.start_node_at(cp, K::BinaryExpr);
        }
    }

    // === Prefix position ===

    fn parse_prefix(&mut self, cp: Checkpoint) {
        match self.current() {
            // `<-chan T` in expression position is a type head, not a
            // receive.
            Some(K::Arrow) if self.nth(1) == Some(K::KwChan) => self.parse_type_primary(cp),
            Some(k) if is_unary_op(k) => {
                self.start_node(K::UnaryExpr);
                self.eat();
                self.parse_expr_bp(UNARY_BP);
                self.finish_node();
            }
            Some(K::KwForall) | Some(K::KwExists) => self.parse_quantifier(),
            Some(K::KwUnfolding) => self.parse_unfolding(),
            Some(K::KwLet) => self.parse_let(),
            Some(K::KwMatch) => self.parse_match(K::MatchExpr),
            _ => self.parse_primary(cp),
        }
    }

    fn parse_primary(&mut self, cp: Checkpoint) {
        // Whether the parsed head could still name a type, which is what a
        // following `{` needs to open a composite literal.
        let mut maybe_type = false;
        match self.current() {
            Some(k) if k.is_literal() => self.eat(),
            Some(K::Ident) => {
                self.eat();
                maybe_type = true;
            }
            Some(K::KwNew) => {
                self.start_node(K::NewExpr);
                self.eat();
                self.expect(K::LParen, "'('");
                self.parse_type();
                self.expect(K::RParen, "')'");
                self.finish_node();
            }
            Some(K::KwMake) => {
                self.start_node(K::MakeExpr);
                self.eat();
                self.expect(K::LParen, "'('");
                self.with_clear_flags(|p| {
                    p.parse_type();
                    while p.eat_if(K::Comma) {
                        if p.at(K::RParen) {
                            break;
                        }
                        p.parse_expr();
                    }
                });
                self.expect(K::RParen, "')'");
                self.finish_node();
            }
            Some(K::LParen) => {
                let open = self.nth_index(0).unwrap_or(self.pos);
                if paren_conversion_ahead(&self.tokens, open) {
                    self.start_node(K::ConversionExpr);
                    self.eat(); // (
                    self.parse_type();
                    self.expect(K::RParen, "')'");
                    self.parse_arg_list();
                    self.finish_node();
                } else {
                    self.start_node(K::ParenExpr);
                    self.eat(); // (
                    self.with_clear_flags(|p| p.parse_expr());
                    self.expect(K::RParen, "')'");
                    self.finish_node();
                }
            }
            Some(k) if starts_type_only(k) => self.parse_type_primary(cp),
            Some(K::KwFunc) => {
                self.parse_type(); // the signature, as a FuncType
                if self.at(K::LBrace) {
                    self.parse_block();
                    self.start_node_at(cp, K::FuncLit);
                }
            }
            Some(K::Question) if self.match_pattern => {
                self.start_node(K::MatchBinder);
                self.eat(); // ?
                self.expect(K::Ident, "binder name");
                self.finish_node();
            }
            _ => {
                self.error_and_recover("expected expression");
                return;
            }
        }
        self.parse_postfix(cp, maybe_type);
    }

    /// A type-only head in expression position: `[]T{..}`, `map[K]V(x)`,
    /// `struct{..}{..}`, `chan T(c)`.
    fn parse_type_primary(&mut self, cp: Checkpoint) {
        self.parse_type();
        if self.at(K::LBrace) && self.allow_struct_lit {
            self.parse_literal_value();
            self.start_node_at(cp, K::CompositeLit);
            self.parse_postfix(cp, false);
        } else if self.at(K::LParen) {
            self.parse_arg_list();
            self.start_node_at(cp, K::ConversionExpr);
            self.parse_postfix(cp, false);
        }
        // Otherwise the type stands alone (a type argument, an operand of
        // `implements`, ...).
    }

    // === Postfix position ===

    fn parse_postfix(&mut self, cp: Checkpoint, mut maybe_type: bool) {
        loop {
            if self.newline_terminates_here() {
                break;
            }
            match self.current() {
                Some(K::Dot) => {
                    if self.nth(1) == Some(K::LParen) {
                        self.eat(); // .
                        self.eat(); // (
                        if !self.eat_if(K::KwType) {
                            self.parse_type();
                        }
                        self.expect(K::RParen, "')'");
                        self.start_node_at(cp, K::TypeAssertExpr);
                        maybe_type = false;
                    } else {
                        self.eat(); // .
                        self.expect(K::Ident, "selector name");
                        self.start_node_at(cp, K::SelectorExpr);
                        // A qualified name still names a type.
                    }
                }
                Some(K::LParen) => {
                    self.parse_arg_list();
                    self.start_node_at(cp, K::CallExpr);
                    maybe_type = false;
                }
                Some(K::LBrack) => {
                    let open = self.nth_index(0).unwrap_or(self.pos);
                    match resolve_bracket_suffix(&self.tokens, open, false, self.allow_struct_lit) {
                        BracketSuffix::TypeArgs => {
                            self.parse_type_arg_list();
                            self.start_node_at(cp, K::GenericType);
                        }
                        BracketSuffix::Index => {
                            self.eat(); // [
                            self.with_clear_flags(|p| p.parse_expr());
                            self.expect(K::RBrack, "']'");
                            self.start_node_at(cp, K::IndexExpr);
                            maybe_type = false;
                        }
                        BracketSuffix::Slice => {
                            self.parse_slice_suffix(cp);
                            maybe_type = false;
                        }
                    }
                }
                Some(K::LBrace) if maybe_type && self.allow_struct_lit => {
                    self.parse_literal_value();
                    self.start_node_at(cp, K::CompositeLit);
                    maybe_type = false;
                }
                _ => break,
            }
        }
    }

    /// `[lo : hi]` or the full-slice form `[lo : hi : max]`; each bound is
    /// optional except `hi` in the three-index form.
    fn parse_slice_suffix(&mut self, cp: Checkpoint) {
        self.eat(); // [
        self.with_clear_flags(|p| {
            if !p.at(K::Colon) {
                p.parse_expr();
            }
            p.expect(K::Colon, "':'");
            if !p.at(K::RBrack) && !p.at(K::Colon) {
                p.parse_expr();
            }
            if p.eat_if(K::Colon) {
                p.parse_expr();
            }
        });
        self.expect(K::RBrack, "']'");
        self.start_node_at(cp, K::SliceExpr);
    }

    pub(super) fn parse_arg_list(&mut self) {
        self.start_node(K::ArgList);
        self.eat(); // (
        self.with_clear_flags(|p| {
            p.comma_list(K::RParen, |p| {
                if !p.can_start_expr() {
                    return false;
                }
                p.parse_expr();
                p.eat_if(K::Ellipsis); // spread of the final argument
                true
            });
        });
        self.expect(K::RParen, "')'");
        self.finish_node();
    }

    fn can_start_expr(&self) -> bool {
        match self.current() {
            Some(k) => {
                k.is_literal()
                    || is_unary_op(k)
                    || starts_type_only(k)
                    || matches!(
                        k,
                        K::Ident
                            | K::LParen
                            | K::KwFunc
                            | K::KwNew
                            | K::KwMake
                            | K::KwForall
                            | K::KwExists
                            | K::KwUnfolding
                            | K::KwLet
                            | K::KwMatch
                            | K::Question
                    )
            }
            None => false,
        }
    }

    // === Composite literal bodies ===

    /// `{ [key :] value , ... }` with nested literal values allowed on both
    /// sides. Whether a key is a struct field or a map/array index is not
    /// decided here (ConflictGroup::CompositeKey).
    pub(super) fn parse_literal_value(&mut self) {
        self.start_node(K::LiteralValue);
        self.eat(); // {
        let saved = std::mem::replace(&mut self.allow_struct_lit, true);
        self.comma_list(K::RBrace, |p| {
            if p.at(K::RBrace) || p.at_eof() {
                return false;
            }
            p.parse_literal_element();
            true
        });
        self.allow_struct_lit = saved;
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }

    fn parse_literal_element(&mut self) {
        let cp = self.checkpoint();
        if self.at(K::LBrace) {
            self.parse_literal_value();
        } else {
            self.parse_expr();
        }
        if self.eat_if(K::Colon) {
            if self.at(K::LBrace) {
                self.parse_literal_value();
            } else {
                self.parse_expr();
            }
            self.start_node_at(cp, K::KeyedElement);
        }
    }

    // === Assertion-language forms ===

    /// `forall x, y T [, z U ...] :: { trigger } ... body` (and `exists`).
    fn parse_quantifier(&mut self) {
        self.start_node(K::QuantifierExpr);
        self.eat(); // forall | exists
        loop {
            self.start_node(K::BoundVarDecl);
            self.parse_ident_list();
            // Bound variables take constraint elements, same as type params.
            self.parse_type_elem();
            self.finish_node();
            if !self.eat_if(K::Comma) {
                break;
            }
        }
        self.expect(K::ColonColon, "'::'");
        while self.at(K::LBrace) {
            self.parse_trigger_set();
        }
        self.parse_expr_bp(UNFOLDING_RBP);
        self.finish_node();
    }

    fn parse_trigger_set(&mut self) {
        self.start_node(K::TriggerSet);
        self.eat(); // {
        self.comma_list(K::RBrace, |p| {
            if p.at(K::RBrace) || p.at_eof() {
                return false;
            }
            p.parse_expr();
            true
        });
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }

    /// `unfolding acc in body`: the body extends as far right as possible,
    /// and `in` inside the access position is the separator, not the
    /// membership operator.
    fn parse_unfolding(&mut self) {
        self.start_node(K::UnfoldingExpr);
        self.eat(); // unfolding
        let saved = std::mem::replace(&mut self.no_in_operator, true);
        self.parse_expr();
        self.no_in_operator = saved;
        self.expect(K::KwIn, "'in'");
        self.parse_expr_bp(UNFOLDING_RBP);
        self.finish_node();
    }

    /// `let x := value in body`.
    fn parse_let(&mut self) {
        self.start_node(K::LetExpr);
        self.eat(); // let
        self.expect(K::Ident, "binding name");
        self.expect(K::Define, "':='");
        let saved = std::mem::replace(&mut self.no_in_operator, true);
        self.parse_expr();
        self.no_in_operator = saved;
        self.expect(K::KwIn, "'in'");
        self.parse_expr_bp(UNFOLDING_RBP);
        self.finish_node();
    }

    /// `match scrutinee { case pattern: ... default: ... }`, shared between
    /// the statement and expression forms; only the case bodies differ.
    pub(super) fn parse_match(&mut self, node: K) {
        self.start_node(node);
        self.eat(); // match
        let saved = std::mem::replace(&mut self.allow_struct_lit, false);
        self.parse_expr();
        self.allow_struct_lit = saved;
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            match self.current() {
                Some(K::KwCase) => {
                    self.start_node(K::MatchCase);
                    self.eat();
                    let saved = std::mem::replace(&mut self.match_pattern, true);
                    self.parse_expr();
                    self.match_pattern = saved;
                    self.expect(K::Colon, "':'");
                    self.parse_match_body(node);
                    self.finish_node();
                }
                Some(K::KwDefault) => {
                    self.start_node(K::MatchDefault);
                    self.eat();
                    self.expect(K::Colon, "':'");
                    self.parse_match_body(node);
                    self.finish_node();
                }
                _ => self.error_and_recover("expected 'case' or 'default'"),
            }
        }
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }

    fn parse_match_body(&mut self, node: K) {
        if node == K::MatchExpr {
            self.parse_expr();
            self.eat_terminator("match arm");
        } else {
            while !self.at_eof()
                && !matches!(
                    self.current(),
                    Some(K::KwCase) | Some(K::KwDefault) | Some(K::RBrace)
                )
            {
                self.parse_stmt();
            }
        }
    }

    /// Run `f` with both context restrictions lifted; brackets and argument
    /// lists reopen struct literals and the `in` operator.
    fn with_clear_flags(&mut self, f: impl FnOnce(&mut Self)) {
        let lit = std::mem::replace(&mut self.allow_struct_lit, true);
        let no_in = std::mem::replace(&mut self.no_in_operator, false);
        f(self);
        self.allow_struct_lit = lit;
        self.no_in_operator = no_in;
    }
}
