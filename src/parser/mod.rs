//! Event-based recursive-descent parser.
//!
//! The parser walks the lexed token stream (trivia included) and records a
//! flat list of events: node starts, node finishes, and token emissions.
//! Checkpoints allow wrapping already-emitted events into a node after the
//! fact, which is how Pratt expression parsing and the "spec block attaches
//! to the following declaration" rules are expressed. At the end the events
//! replay into a `rowan` green tree.
//!
//! Malformed input never aborts the parse: unexpected tokens are swept into
//! explicit `Error` nodes and parsing resumes at the next statement
//! terminator or synchronizing keyword, so the tree always covers every
//! input byte.

mod decls;
mod exprs;
mod stmts;
mod types;

use crate::error::{Diag, Span};
use crate::kinds::SyntaxKind;
use crate::lexer::{self, terminates_statement, Token};
use crate::tree::Parse;
use rowan::GreenNodeBuilder;

#[derive(Debug, Clone, Copy)]
enum Event {
    Start(SyntaxKind),
    Finish,
    Token(Token),
}

pub(crate) struct Parser<'src> {
    text: &'src str,
    tokens: Vec<Token>,
    /// Index into `tokens`; sits on a non-trivia token (or EOF) between
    /// grammar steps.
    pos: usize,
    events: Vec<Event>,
    errors: Vec<Diag>,
    /// Cleared inside if/for/switch headers, where `T{` would swallow the
    /// statement body as a composite literal.
    allow_struct_lit: bool,
    /// Set while parsing the bound value of `let .. in` and the predicate
    /// access of `unfolding .. in`, where a top-level `in` is the binder
    /// separator, not the set-membership operator.
    no_in_operator: bool,
    /// Set inside `match` case patterns, where `?name` binds a variable.
    match_pattern: bool,
    /// Position right after the last error sweep. A statement ending there
    /// counts as terminated even when the swept line ended in a token the
    /// termination table rejects.
    recovered_end: usize,
}

/// A checkpoint into the event stream; see [`Parser::start_node_at`].
#[derive(Debug, Clone, Copy)]
pub(crate) struct Checkpoint(usize);

impl<'src> Parser<'src> {
    pub(crate) fn new(text: &'src str) -> Self {
        let (tokens, lex_diags) = lexer::lex(text);
        Self {
            text,
            tokens,
            pos: 0,
            events: Vec::with_capacity(text.len() / 4),
            errors: lex_diags,
            allow_struct_lit: true,
            no_in_operator: false,
            match_pattern: false,
            recovered_end: usize::MAX,
        }
    }

    pub(crate) fn parse(mut self) -> Parse {
        self.parse_source_file();
        let mut builder = GreenNodeBuilder::new();
        for event in &self.events {
            match *event {
                Event::Start(kind) => builder.start_node(kind.into()),
                Event::Finish => builder.finish_node(),
                Event::Token(tok) => {
                    builder.token(tok.kind.into(), &self.text[tok.span.to_range()])
                }
            }
        }
        Parse {
            green: builder.finish(),
            errors: self.errors,
        }
    }

    // === Token access ===

    fn current(&self) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .find(|k| !k.is_trivia())
    }

    /// Nth non-trivia token ahead (0 = current).
    fn nth(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens[self.pos..]
            .iter()
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .nth(n)
    }

    /// Index in `tokens` of the nth non-trivia token ahead, for the conflict
    /// resolver, which scans raw token slices.
    fn nth_index(&self, n: usize) -> Option<usize> {
        self.tokens
            .iter()
            .enumerate()
            .skip(self.pos)
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(i, _)| i)
            .nth(n)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == Some(kind)
    }

    fn at_eof(&self) -> bool {
        self.current().is_none()
    }

    fn current_span(&self) -> Span {
        match self.nth_index(0) {
            Some(i) => self.tokens[i].span,
            None => Span::empty_at(self.text.len()),
        }
    }

    // === Event building ===

    fn start_node(&mut self, kind: SyntaxKind) {
        self.events.push(Event::Start(kind));
    }

    fn finish_node(&mut self) {
        self.events.push(Event::Finish);
    }

    /// Checkpoints are taken after leading trivia has been emitted, so a
    /// node started here owns no preceding comments or whitespace.
    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        Checkpoint(self.events.len())
    }

    /// Retroactively wrap everything since `cp` in a node of `kind`.
    /// Wrapping twice at the same checkpoint nests: the later wrap becomes
    /// the outer node.
    fn start_node_at(&mut self, cp: Checkpoint, kind: SyntaxKind) {
        self.events.insert(cp.0, Event::Start(kind));
        self.events.push(Event::Finish);
    }

    /// Emit whatever token `pos` sits on and advance.
    fn bump_raw(&mut self) {
        if let Some(&tok) = self.tokens.get(self.pos) {
            self.events.push(Event::Token(tok));
            self.pos += 1;
        }
    }

    /// Emit pending trivia tokens.
    fn skip_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .is_some_and(|t| t.kind.is_trivia())
        {
            self.bump_raw();
        }
    }

    /// Emit the current non-trivia token plus any trivia after it.
    fn eat(&mut self) {
        self.skip_trivia();
        self.bump_raw();
        self.skip_trivia();
    }

    /// Eat the current token if it matches.
    fn eat_if(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.eat();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_if(kind) {
            true
        } else {
            self.error_here(format!("expected {what}"));
            false
        }
    }

    /// Record a diagnostic at the current position without consuming input
    /// or producing an error node.
    fn error_here(&mut self, message: impl Into<String>) {
        self.errors.push(Diag::parse(self.current_span(), message));
    }

    // === Statement terminators ===

    /// Whether a newline between the previous real token and the current one
    /// terminates a statement (Go's semicolon-insertion rule, applied on the
    /// consumer side so no token is ever synthesized).
    fn newline_terminates_here(&self) -> bool {
        let mut saw_newline = false;
        for tok in self.tokens[..self.pos].iter().rev() {
            match tok.kind {
                SyntaxKind::Newline => saw_newline = true,
                // A block comment containing a newline separates lines too.
                SyntaxKind::BlockComment => {
                    if self.text[tok.span.to_range()].contains('\n') {
                        saw_newline = true;
                    }
                }
                SyntaxKind::Whitespace | SyntaxKind::LineComment => {}
                kind => return saw_newline && terminates_statement(kind),
            }
        }
        false
    }

    fn at_terminator(&self) -> bool {
        if self.pos == self.recovered_end {
            return true;
        }
        match self.current() {
            None => true,
            Some(SyntaxKind::Semi) | Some(SyntaxKind::RBrace) | Some(SyntaxKind::RParen) => true,
            Some(_) => self.newline_terminates_here(),
        }
    }

    /// Consume a statement terminator: an explicit `;`, or nothing when a
    /// newline (or a closing delimiter / EOF) already ends the statement.
    fn eat_terminator(&mut self, what: &str) {
        if self.at(SyntaxKind::Semi) {
            self.eat();
        } else if !self.at_terminator() {
            self.error_here(format!("expected newline or ';' after {what}"));
            self.recover_to_terminator();
        }
    }

    // === Recovery ===

    /// Tokens that begin a recognizable construct; recovery stops in front
    /// of them.
    fn at_recovery_point(&self) -> bool {
        use SyntaxKind as K;
        matches!(
            self.current(),
            None | Some(
                K::Semi
                    | K::RBrace
                    | K::KwPackage
                    | K::KwImport
                    | K::KwFunc
                    | K::KwVar
                    | K::KwConst
                    | K::KwType
                    | K::KwReturn
                    | K::KwIf
                    | K::KwFor
                    | K::KwSwitch
                    | K::KwSelect
                    | K::KwGo
                    | K::KwDefer
                    | K::KwBreak
                    | K::KwContinue
                    | K::KwRequires
                    | K::KwEnsures
                    | K::KwPreserves
                    | K::KwInvariant
                    | K::KwGhost
                    | K::KwPred
                    | K::KwAssert
                    | K::KwAssume
                    | K::KwInhale
                    | K::KwExhale
                    | K::KwFold
                    | K::KwUnfold
                    | K::KwOutline
                    | K::KwMatch
            )
        )
    }

    /// Sweep unrecognized tokens into an `Error` node and resume where the
    /// next construct plausibly begins. Always makes progress.
    fn error_and_recover(&mut self, message: impl Into<String>) {
        self.error_here(message);
        self.skip_trivia();
        self.start_node(SyntaxKind::Error);
        let mut consumed = false;
        loop {
            if self.at_eof() {
                break;
            }
            // Recovery is line-bounded: any line break ends the sweep, even
            // after a token the termination table would not end a statement
            // on (malformed lines rarely end well-formed).
            if consumed && (self.at_recovery_point() || self.at_line_break()) {
                break;
            }
            if self.at(SyntaxKind::Semi) {
                self.bump_raw(); // the terminator belongs to the error span
                break;
            }
            if !consumed && self.at_recovery_point() && !self.at(SyntaxKind::Semi) {
                // Recovery was requested while sitting on a sync token;
                // consume it anyway so the parse advances.
                self.bump_raw();
                consumed = true;
                continue;
            }
            self.bump_raw();
            // Balance nothing: plain linear sweep keeps recovery bounded.
            consumed = true;
            self.skip_trivia_no_newline();
        }
        self.finish_node();
        self.skip_trivia();
        self.recovered_end = self.pos;
    }

    /// Skip to the next terminator after a malformed tail (no error node;
    /// the diagnostic was already recorded).
    fn recover_to_terminator(&mut self) {
        self.skip_trivia();
        self.start_node(SyntaxKind::Error);
        while !self.at_eof() && !self.at_terminator() && !self.at_line_break() {
            self.bump_raw();
            self.skip_trivia_no_newline();
        }
        if self.at(SyntaxKind::Semi) {
            self.bump_raw();
        }
        self.finish_node();
        self.skip_trivia();
        self.recovered_end = self.pos;
    }

    /// After `skip_trivia_no_newline`, is the cursor sitting on a line
    /// break?
    fn at_line_break(&self) -> bool {
        self.tokens
            .get(self.pos)
            .is_some_and(|t| t.kind == SyntaxKind::Newline)
    }

    /// Emit trivia up to, but not across, a newline. Recovery uses this so
    /// that a terminating newline is still visible to the loop condition.
    fn skip_trivia_no_newline(&mut self) {
        while let Some(tok) = self.tokens.get(self.pos) {
            match tok.kind {
                SyntaxKind::Whitespace | SyntaxKind::LineComment | SyntaxKind::BlockComment => {
                    self.bump_raw()
                }
                _ => break,
            }
        }
    }

    // === Shared list helper ===

    /// Parse a comma-separated list until `close`, tolerating a trailing
    /// comma. `item` returns false if it could not make progress.
    fn comma_list(&mut self, close: SyntaxKind, mut item: impl FnMut(&mut Self) -> bool) {
        let mut last_pos = usize::MAX;
        while !self.at_eof() && !self.at(close) {
            if !item(self) {
                self.error_and_recover("unexpected token in list");
            }
            if !self.eat_if(SyntaxKind::Comma) && !self.at(close) {
                // Missing comma: tolerated (newline-separated lists occur in
                // partial edits) as long as the position keeps moving.
                if last_pos == self.pos {
                    self.error_and_recover("expected ',' in list");
                }
            }
            last_pos = self.pos;
        }
    }
}
