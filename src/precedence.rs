//! Operator precedence and the declared conflict set.
//!
//! Everything that resolves syntactic ambiguity lives here: the Pratt
//! binding-power table for operators, and the enumerated groups of rules
//! known to accept overlapping token sequences together with their
//! deterministic tie-breaks. The parser consults this module at its decision
//! points and contains no ambiguity policy of its own.

use crate::kinds::SyntaxKind;
use crate::lexer::Token;

/// Precedence levels, loosest to tightest. Operators on one level share it;
/// all binary tiers are left-associative except implication and ternary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Unfolding = 1,
    Ternary,
    Implication,
    Or,
    And,
    Implements,
    Comparison,
    SetComparison,
    SetOp,
    Additive,
    Multiplicative,
    Unary,
}

const fn left(level: Level) -> (u8, u8) {
    let l = level as u8;
    (2 * l, 2 * l + 1)
}

const fn right(level: Level) -> (u8, u8) {
    let l = level as u8;
    (2 * l, 2 * l - 1)
}

/// Binding power of all prefix operators (tighter than any binary tier).
pub const UNARY_BP: u8 = 2 * Level::Unary as u8;

/// Left binding power of `?`; the arms bind looser (right-associative).
pub const TERNARY_BP: (u8, u8) = right(Level::Ternary);

/// Right binding power of the body of `unfolding .. in ..` (loosest of all).
pub const UNFOLDING_RBP: u8 = 2 * Level::Unfolding as u8 - 1;

/// Binding powers for infix operators. `None` means the token is not a
/// binary operator (the ternary `?` and `unfolding` are handled separately).
pub fn infix_binding_power(kind: SyntaxKind) -> Option<(u8, u8)> {
    use SyntaxKind as K;
    let bp = match kind {
        K::Star | K::Slash | K::Percent | K::Shl | K::Shr | K::Amp | K::AndNot => {
            left(Level::Multiplicative)
        }
        K::Plus | K::Minus | K::Pipe | K::Caret => left(Level::Additive),
        K::KwUnion | K::KwSetminus | K::KwIntersection => left(Level::SetOp),
        K::KwIn | K::Hash | K::KwSubset => left(Level::SetComparison),
        K::EqEq | K::NotEq | K::Lt | K::Le | K::Gt | K::Ge | K::StrictEq | K::StrictNotEq => {
            left(Level::Comparison)
        }
        K::KwImplements => left(Level::Implements),
        K::LAnd => left(Level::And),
        K::LOr => left(Level::Or),
        K::Implication => right(Level::Implication),
        _ => return None,
    };
    Some(bp)
}

#[inline]
pub fn is_unary_op(kind: SyntaxKind) -> bool {
    use SyntaxKind as K;
    matches!(
        kind,
        K::Plus | K::Minus | K::Bang | K::Caret | K::Star | K::Amp | K::Arrow
    )
}

// =============================================================================
// Declared conflict set
// =============================================================================

/// The finite set of rule groups known to accept overlapping token
/// sequences, with their tie-break policy. Every overlapping pair the
/// grammar can produce has exactly one entry here; the resolver functions
/// below implement the policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictGroup {
    /// `X[...]` after a name: generic-type instantiation, index expression,
    /// or slice expression.
    BracketSuffix,
    /// `(T)(x)` vs a call of a parenthesized expression.
    ParenConversion,
    /// `key: value` inside a composite literal: struct field key vs
    /// map/array index key. Deliberately unresolved (needs type info).
    CompositeKey,
}

pub struct Conflict {
    pub group: ConflictGroup,
    pub rules: &'static [SyntaxKind],
    /// The documented winner, for auditing.
    pub policy: &'static str,
}

pub const CONFLICTS: &[Conflict] = &[
    Conflict {
        group: ConflictGroup::BracketSuffix,
        rules: &[
            SyntaxKind::GenericType,
            SyntaxKind::IndexExpr,
            SyntaxKind::SliceExpr,
        ],
        policy: "type position always instantiates; in expression position a \
                 colon not owned by a `?:` conditional selects slice, content \
                 that only a type-element list accepts (| ~ chan map struct \
                 interface func, [], a top-level comma) or a following `{` \
                 (where composite literals are legal) selects generic-type, \
                 otherwise index wins",
    },
    Conflict {
        group: ConflictGroup::ParenConversion,
        rules: &[SyntaxKind::ConversionExpr, SyntaxKind::CallExpr],
        policy: "call is the default; conversion only when the parenthesized \
                 prefix can only be a type (`(*T)`, `([]T)`, `(chan T)`, ...) \
                 and is immediately applied",
    },
    Conflict {
        group: ConflictGroup::CompositeKey,
        rules: &[SyntaxKind::KeyedElement],
        policy: "never resolved at the syntax level: a single KeyedElement \
                 kind covers struct-field and map/array keys",
    },
];

/// Outcome of [`resolve_bracket_suffix`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BracketSuffix {
    TypeArgs,
    Index,
    Slice,
}

#[inline]
fn non_trivia_after(tokens: &[Token], mut i: usize) -> Option<(usize, SyntaxKind)> {
    while i < tokens.len() {
        if !tokens[i].kind.is_trivia() {
            return Some((i, tokens[i].kind));
        }
        i += 1;
    }
    None
}

/// Find the index just past the bracket/paren/brace group opening at `open`.
/// Bounded scan; `None` if the group never closes.
fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    use SyntaxKind as K;
    let mut depth = 0i32;
    for (i, tok) in tokens.iter().enumerate().skip(open) {
        match tok.kind {
            K::LBrack | K::LParen | K::LBrace => depth += 1,
            K::RBrack | K::RParen | K::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// ConflictGroup::BracketSuffix. `open` is the index of `[` in `tokens`
/// (trivia included). `expects_type` is true when the surrounding rule makes
/// a type the only legal reading, which settles the tie by context alone.
/// `allow_composite` is false inside if/for/switch headers, where a `{`
/// after the bracket opens the statement body and must not count as
/// composite-literal evidence.
pub fn resolve_bracket_suffix(
    tokens: &[Token],
    open: usize,
    expects_type: bool,
    allow_composite: bool,
) -> BracketSuffix {
    use SyntaxKind as K;

    if expects_type {
        return BracketSuffix::TypeArgs;
    }
    let Some(end) = matching_close(tokens, open) else {
        return BracketSuffix::Index;
    };

    let mut depth = 0i32;
    let mut type_score = false;
    let mut open_ternary = 0u32;
    for tok in &tokens[open..end] {
        let k = tok.kind;
        match k {
            K::LBrack | K::LParen | K::LBrace => depth += 1,
            K::RBrack | K::RParen | K::RBrace => depth -= 1,
            K::Question if depth == 1 => open_ternary += 1,
            // A colon in the bracket can only be a slice expression, unless
            // it closes a pending `?` conditional (`a[c ? 0 : 1]`).
            K::Colon if depth == 1 => {
                if open_ternary > 0 {
                    open_ternary -= 1;
                } else {
                    return BracketSuffix::Slice;
                }
            }
            // Tokens an ordinary index/slice expression can never contain,
            // and a top-level comma (multiple type arguments): these give
            // the generic-type reading its higher dynamic score.
            K::Comma if depth == 1 => type_score = true,
            K::Pipe if depth == 1 => type_score = true,
            K::Tilde | K::KwChan | K::KwMap | K::KwStruct | K::KwInterface | K::KwFunc => {
                type_score = true
            }
            _ => {}
        }
    }
    // `T[K]{...}` is a composite literal of an instantiated type.
    if allow_composite {
        if let Some((_, k)) = non_trivia_after(tokens, end) {
            if k == K::LBrace {
                type_score = true;
            }
        }
    }

    if type_score {
        BracketSuffix::TypeArgs
    } else {
        BracketSuffix::Index
    }
}

/// ConflictGroup::ParenConversion. `open` is the index of `(`. True only
/// when the parenthesized prefix cannot be an expression and is immediately
/// applied to an argument list, i.e. no other interpretation is available.
pub fn paren_conversion_ahead(tokens: &[Token], open: usize) -> bool {
    use SyntaxKind as K;

    let Some((first, k1)) = non_trivia_after(tokens, open + 1) else {
        return false;
    };
    let type_only_head = match k1 {
        K::LBrack | K::KwChan | K::KwMap | K::KwInterface | K::KwStruct | K::KwFunc => true,
        // `(*T)` where the body is exactly a (possibly qualified) name.
        K::Star => {
            let mut i = first + 1;
            let mut saw_name = false;
            loop {
                match non_trivia_after(tokens, i) {
                    Some((j, K::Ident)) => {
                        saw_name = true;
                        i = j + 1;
                    }
                    Some((j, K::Dot)) if saw_name => i = j + 1,
                    Some((_, K::RParen)) => break saw_name,
                    _ => break false,
                }
            }
        }
        // `(<-chan T)`
        K::Arrow => matches!(non_trivia_after(tokens, first + 1), Some((_, K::KwChan))),
        _ => false,
    };
    if !type_only_head {
        return false;
    }
    match matching_close(tokens, open) {
        Some(end) => matches!(non_trivia_after(tokens, end), Some((_, K::LParen))),
        None => false,
    }
}

/// Whether a token can only begin a type (used where a primary expression
/// would otherwise be expected: `[]T{..}`, `map[K]V(x)`, `chan T(nil)`).
#[inline]
pub fn starts_type_only(kind: SyntaxKind) -> bool {
    use SyntaxKind as K;
    matches!(
        kind,
        K::LBrack | K::KwChan | K::KwMap | K::KwInterface | K::KwStruct
    )
}
