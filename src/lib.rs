//! Lossless syntax front-end for Gobra, the Go verification language.
//!
//! The pipeline is a maximal-munch lexer over the full Go token set plus
//! the verification extensions (contract clauses, ghost statements,
//! quantifiers, set operators, `match`, outline blocks), feeding a
//! resilient recursive-descent parser that builds a `rowan` concrete
//! syntax tree. Every input byte, trivia and malformed regions included,
//! appears in the tree, so `parse(src).syntax().text() == src` always
//! holds. Errors never abort a parse; they accumulate as diagnostics
//! beside explicit `Error` nodes.
//!
//! ```
//! let parse = gobra_syntax::parse("package main\n\nfunc id(x int) int { return x }\n");
//! assert!(parse.ok());
//! assert_eq!(
//!     parse.syntax().text().to_string(),
//!     "package main\n\nfunc id(x int) int { return x }\n",
//! );
//! ```

pub mod error;
pub mod kinds;
pub mod lexer;
mod parser;
pub mod precedence;
pub mod tree;

pub use error::{Diag, DiagKind, Span};
pub use kinds::{GobraLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};
pub use tree::{field, node_at_offset, Parse};

/// Parse a source text into a lossless syntax tree plus diagnostics.
pub fn parse(text: &str) -> Parse {
    parser::Parser::new(text).parse()
}
