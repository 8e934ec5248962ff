//! Type grammar: named and qualified types, generic instantiation,
//! composite type literals, and the type-element (union/approximation) form
//! used by constraints.

use super::Parser;
use crate::kinds::SyntaxKind as K;

impl Parser<'_> {
    pub(super) fn can_start_type(&self) -> bool {
        matches!(
            self.current(),
            Some(
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
        )
    }

    pub(super) fn parse_type(&mut self) {
        match self.current() {
            Some(K::Star) => {
                self.start_node(K::PointerType);
                self.eat();
                self.parse_type();
                self.finish_node();
            }
            Some(K::LBrack) => self.parse_bracketed_type(),
            Some(K::KwMap) => {
                self.start_node(K::MapType);
                self.eat();
                self.expect(K::LBrack, "'['");
                self.parse_type();
                self.expect(K::RBrack, "']'");
                self.parse_type();
                self.finish_node();
            }
            Some(K::KwChan) => {
                self.start_node(K::ChanType);
                self.eat();
                self.eat_if(K::Arrow); // send-only
                self.parse_type();
                self.finish_node();
            }
            Some(K::Arrow) => {
                self.start_node(K::ChanType);
                self.eat(); // <-
                self.expect(K::KwChan, "'chan'");
                self.parse_type();
                self.finish_node();
            }
            Some(K::KwFunc) => {
                self.start_node(K::FuncType);
                self.eat();
                if self.at(K::LParen) {
                    self.parse_param_list();
                } else {
                    self.error_here("expected parameter list");
                }
                self.parse_result_opt();
                self.finish_node();
            }
            Some(K::KwStruct) => self.parse_struct_type(),
            Some(K::KwInterface) => self.parse_interface_type(),
            Some(K::LParen) => {
                self.start_node(K::ParenType);
                self.eat();
                self.parse_type();
                self.expect(K::RParen, "')'");
                self.finish_node();
            }
            Some(K::Ident) => self.parse_named_type(),
            _ => self.error_and_recover("expected type"),
        }
    }

    /// `[]T`, `[n]T`, or `[...]T` (length inferred from the literal).
    fn parse_bracketed_type(&mut self) {
        match self.nth(1) {
            Some(K::RBrack) => {
                self.start_node(K::SliceType);
                self.eat(); // [
                self.eat(); // ]
                self.parse_type();
                self.finish_node();
            }
            Some(K::Ellipsis) => {
                self.start_node(K::ImplicitLengthArrayType);
                self.eat(); // [
                self.eat(); // ...
                self.expect(K::RBrack, "']'");
                self.parse_type();
                self.finish_node();
            }
            _ => {
                self.start_node(K::ArrayType);
                self.eat(); // [
                self.parse_expr();
                self.expect(K::RBrack, "']'");
                self.parse_type();
                self.finish_node();
            }
        }
    }

    /// `name`, `pkg.Name`, and either instantiated: `Name[A, B]`. In type
    /// position brackets always mean type arguments.
    fn parse_named_type(&mut self) {
        let cp = self.checkpoint();
        self.eat(); // ident
        if self.at(K::Dot) && self.nth(1) == Some(K::Ident) {
            self.eat(); // .
            self.eat(); // ident
            self.start_node_at(cp, K::QualifiedType);
        }
        if self.at(K::LBrack) && !self.newline_terminates_here() {
            self.parse_type_arg_list();
            self.start_node_at(cp, K::GenericType);
        }
    }

    pub(super) fn parse_type_arg_list(&mut self) {
        self.start_node(K::TypeArgList);
        self.eat(); // [
        self.comma_list(K::RBrack, |p| {
            if !p.can_start_type() && !p.at(K::Tilde) {
                return false;
            }
            p.parse_type_elem();
            true
        });
        self.expect(K::RBrack, "']'");
        self.finish_node();
    }

    /// `[~]T {| [~]T}` — wrapped in a `TypeElem` node only when `~` or `|`
    /// actually occurs; a plain type stays a plain type node.
    pub(super) fn parse_type_elem(&mut self) {
        let cp = self.checkpoint();
        let mut structured = self.at(K::Tilde);
        self.eat_if(K::Tilde);
        self.parse_type();
        while self.at(K::Pipe) {
            structured = true;
            self.eat(); // |
            self.eat_if(K::Tilde);
            self.parse_type();
        }
        if structured {
            self.start_node_at(cp, K::TypeElem);
        }
    }

    fn parse_struct_type(&mut self) {
        self.start_node(K::StructType);
        self.eat(); // struct
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            self.parse_field_decl();
        }
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }

    /// `names type [tag]` or an embedded `[*]T [tag]`.
    fn parse_field_decl(&mut self) {
        if !self.can_start_type() {
            self.error_and_recover("expected field declaration");
            return;
        }
        self.start_node(K::FieldDecl);
        if self.at(K::Ident) && self.field_has_names() {
            self.parse_ident_list();
            self.parse_type();
        } else {
            self.parse_type(); // embedded field
        }
        if self.at(K::StringLit) || self.at(K::RawStringLit) {
            self.eat(); // tag
        }
        self.eat_terminator("field declaration");
        self.finish_node();
    }

    fn field_has_names(&self) -> bool {
        matches!(
            self.nth(1),
            Some(
                K::Ident
                    | K::Comma
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
        )
    }

    /// Finish a `name(params) result` method element, wrapping back to `cp`
    /// so a preceding contract lands inside the element.
    fn parse_method_elem_tail(&mut self, cp: super::Checkpoint) {
        self.eat(); // name
        self.parse_param_list();
        self.parse_result_opt();
        self.eat_terminator("method element");
        self.start_node_at(cp, K::MethodElem);
    }

    fn parse_interface_type(&mut self) {
        self.start_node(K::InterfaceType);
        self.eat(); // interface
        self.expect(K::LBrace, "'{'");
        while !self.at_eof() && !self.at(K::RBrace) {
            match self.current() {
                Some(K::Ident) if self.nth(1) == Some(K::LParen) => {
                    let cp = self.checkpoint();
                    self.parse_method_elem_tail(cp);
                }
                // Interface methods carry contracts too; the clauses wrap
                // into a SpecBlock child of the MethodElem.
                Some(k) if super::decls::is_spec_clause_start(k) => {
                    let cp = self.checkpoint();
                    while let Some(k) = self.current() {
                        if !super::decls::is_spec_clause_start(k) {
                            break;
                        }
                        self.parse_spec_clause(k);
                    }
                    self.start_node_at(cp, K::SpecBlock);
                    if self.at(K::Ident) && self.nth(1) == Some(K::LParen) {
                        self.parse_method_elem_tail(cp);
                    } else {
                        self.error_here("expected method element after specification");
                    }
                }
                Some(K::Tilde) => {
                    self.parse_type_elem();
                    self.eat_terminator("interface element");
                }
                Some(_) if self.can_start_type() => {
                    self.parse_type_elem();
                    self.eat_terminator("interface element");
                }
                _ => self.error_and_recover("expected interface element"),
            }
        }
        self.expect(K::RBrace, "'}'");
        self.finish_node();
    }
}
