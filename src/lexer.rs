//! Lexer: raw text to a full-fidelity token stream.
//!
//! Two layers, as in the number/escape handling this is modeled on:
//! a `logos`-generated DFA produces raw tokens with maximal-munch callbacks
//! for numbers and block comments, and a thin wrapper validates literal
//! bodies, classifies numbers (int/float/imaginary), and maps everything to
//! [`SyntaxKind`]. Whitespace, newlines, and comments are emitted as trivia
//! tokens rather than skipped: every input byte belongs to exactly one
//! token, which is what makes the tree lossless.

use crate::error::{Diag, LexError, LexErrorKind, Span};
use crate::kinds::SyntaxKind;
use logos::{Lexer as LogosLexer, Logos};
use std::ops::Range;

/// A lexed token. Text is always recovered by slicing the source with the
/// span; the lexer owns nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: Span,
}

// =============================================================================
// Shared character helpers
// =============================================================================

#[inline(always)]
const fn is_dec_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

#[inline(always)]
const fn is_hex_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'a'..=b'f' | b'A'..=b'F')
}

#[inline(always)]
const fn is_oct_digit(b: u8) -> bool {
    matches!(b, b'0'..=b'7')
}

#[inline(always)]
const fn is_bin_digit(b: u8) -> bool {
    matches!(b, b'0' | b'1')
}

#[inline(always)]
const fn hex_value(b: u8) -> u32 {
    match b {
        b'0'..=b'9' => (b - b'0') as u32,
        b'a'..=b'f' => (b - b'a') as u32 + 10,
        _ => (b - b'A') as u32 + 10,
    }
}

#[inline(always)]
const fn is_valid_unicode_scalar(x: u32) -> bool {
    x <= 0x10_FFFF && !(x >= 0xD800 && x <= 0xDFFF)
}

// =============================================================================
// Block comment scanner (manual; unterminated is a diagnostic, not a panic)
// =============================================================================

fn lex_block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    use memchr::memchr;

    let rem = lex.remainder().as_bytes();
    let mut search_start = 0;

    while let Some(star_pos) = memchr(b'*', &rem[search_start..]) {
        let abs_pos = search_start + star_pos;
        if rem.get(abs_pos + 1) == Some(&b'/') {
            lex.bump(abs_pos + 2);
            return Ok(());
        }
        search_start = abs_pos + 1;
    }

    // No closing `*/` before EOF: claim the rest so the span covers it.
    lex.bump(rem.len());
    Err(LexErrorKind::UnterminatedComment)
}

/// `"` that the full string regex did not match: an unterminated string.
/// Consume to end of line (or EOF) so recovery restarts on the next line.
fn lex_unterminated_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().as_bytes();
    let stop = rem
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .unwrap_or(rem.len());
    lex.bump(stop);
    Err(LexErrorKind::UnterminatedString)
}

/// Lone backtick: an unterminated raw string. Everything to EOF belongs to
/// it (a raw string may span lines).
fn lex_unterminated_raw_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let rem = lex.remainder().len();
    lex.bump(rem);
    Err(LexErrorKind::UnterminatedString)
}

// =============================================================================
// Escape validation (shared by interpreted strings and runes)
// =============================================================================

/// Validate one escape sequence. `body[i]` is the byte after the backslash;
/// `quote` is the delimiter whose escaped form is legal in this context.
/// Returns bytes consumed including `body[i]`.
fn scan_escape(body: &[u8], i: usize, quote: u8) -> Result<usize, LexErrorKind> {
    let c = *body.get(i).ok_or(LexErrorKind::InvalidEscape)?;
    match c {
        b'a' | b'b' | b'f' | b'n' | b'r' | b't' | b'v' | b'\\' => Ok(1),
        _ if c == quote => Ok(1),
        b'x' => {
            let h = body.get(i + 1..i + 3).ok_or(LexErrorKind::InvalidEscape)?;
            if is_hex_digit(h[0]) && is_hex_digit(h[1]) {
                Ok(3)
            } else {
                Err(LexErrorKind::InvalidEscape)
            }
        }
        b'u' | b'U' => {
            let n = if c == b'u' { 4 } else { 8 };
            let h = body.get(i + 1..i + 1 + n).ok_or(LexErrorKind::InvalidEscape)?;
            let mut v = 0u32;
            for &b in h {
                if !is_hex_digit(b) {
                    return Err(LexErrorKind::InvalidEscape);
                }
                v = (v << 4) | hex_value(b);
            }
            if is_valid_unicode_scalar(v) {
                Ok(1 + n)
            } else {
                Err(LexErrorKind::InvalidEscape)
            }
        }
        b'0'..=b'7' => {
            let o = body.get(i..i + 3).ok_or(LexErrorKind::InvalidEscape)?;
            if !is_oct_digit(o[1]) || !is_oct_digit(o[2]) {
                return Err(LexErrorKind::InvalidEscape);
            }
            let v = ((o[0] - b'0') as u32) * 64 + ((o[1] - b'0') as u32) * 8 + (o[2] - b'0') as u32;
            if v > 255 {
                return Err(LexErrorKind::InvalidEscape);
            }
            Ok(3)
        }
        _ => Err(LexErrorKind::InvalidEscape),
    }
}

fn validate_interpreted_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice().as_bytes();
    debug_assert!(s.len() >= 2 && s[0] == b'"' && s[s.len() - 1] == b'"');
    let body = &s[1..s.len() - 1];

    let mut i = 0;
    while i < body.len() {
        if body[i] == b'\\' {
            i += 1 + scan_escape(body, i + 1, b'"')?;
        } else {
            // Non-escape bytes (including UTF-8 continuation bytes) are
            // literal text; the regex already excluded quote/newline.
            i += 1;
        }
    }
    Ok(())
}

fn validate_rune(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    debug_assert!(s.len() >= 3);
    let body = &s[1..s.len() - 1];

    let consumed = if body.as_bytes()[0] == b'\\' {
        1 + scan_escape(body.as_bytes(), 1, b'\'')?
    } else {
        // `&str` guarantees well-formed UTF-8; the regex excluded newlines.
        body.chars().next().ok_or(LexErrorKind::InvalidToken)?.len_utf8()
    };

    // Exactly one quoted unit.
    if consumed == body.len() {
        Ok(())
    } else {
        Err(LexErrorKind::InvalidToken)
    }
}

// =============================================================================
// Number scanning and classification
// =============================================================================

mod num {
    use super::*;

    /// Consume a digit run with `_` separators. Underscores must sit between
    /// digits, except that `allow_leading` permits one directly after a base
    /// prefix (`0x_1F` is legal).
    fn scan_digits(
        s: &[u8],
        i: &mut usize,
        is_digit: fn(u8) -> bool,
        allow_leading: bool,
    ) -> Result<usize, LexErrorKind> {
        let mut count = 0usize;
        let mut prev_underscore = false;
        let mut first = true;

        while *i < s.len() {
            let b = s[*i];
            if is_digit(b) {
                count += 1;
                prev_underscore = false;
                first = false;
            } else if b == b'_' {
                let leading_ok = first && allow_leading;
                if prev_underscore || (first && !leading_ok) {
                    return Err(LexErrorKind::InvalidNumber);
                }
                prev_underscore = true;
                first = false;
            } else {
                break;
            }
            *i += 1;
        }

        if prev_underscore {
            return Err(LexErrorKind::InvalidNumber);
        }
        Ok(count)
    }

    /// Exponent part after `e`/`E`/`p`/`P`: optional sign, then decimal digits.
    fn scan_exponent(s: &[u8], i: &mut usize) -> Result<(), LexErrorKind> {
        *i += 1;
        if *i < s.len() && (s[*i] == b'+' || s[*i] == b'-') {
            *i += 1;
        }
        if scan_digits(s, i, is_dec_digit, false)? == 0 {
            return Err(LexErrorKind::InvalidNumber);
        }
        Ok(())
    }

    /// Authoritative validation of a maximal-munch number lexeme.
    /// `Ok(true)` means float, `Ok(false)` means integer.
    pub fn classify_number(lit: &[u8]) -> Result<bool, LexErrorKind> {
        if lit.is_empty() {
            return Err(LexErrorKind::InvalidNumber);
        }
        let n = lit.len();
        let mut i = 0usize;

        // Leading-dot decimal float: `.5`, `.5e-2`
        if lit[0] == b'.' {
            i = 1;
            if scan_digits(lit, &mut i, is_dec_digit, false)? == 0 {
                return Err(LexErrorKind::InvalidNumber);
            }
            if i < n && (lit[i] | 0x20) == b'e' {
                scan_exponent(lit, &mut i)?;
            }
            return if i == n {
                Ok(true)
            } else {
                Err(LexErrorKind::InvalidNumber)
            };
        }

        // Prefixed bases
        if lit[0] == b'0' && n > 1 {
            match lit[1] | 0x20 {
                b'x' => {
                    i = 2;
                    let whole = scan_digits(lit, &mut i, is_hex_digit, true)?;
                    let mut frac = 0usize;
                    let mut has_dot = false;
                    if i < n && lit[i] == b'.' {
                        has_dot = true;
                        i += 1;
                        frac = scan_digits(lit, &mut i, is_hex_digit, false)?;
                    }
                    if whole + frac == 0 {
                        return Err(LexErrorKind::InvalidNumber);
                    }
                    if i < n && (lit[i] | 0x20) == b'p' {
                        scan_exponent(lit, &mut i)?;
                        return if i == n {
                            Ok(true)
                        } else {
                            Err(LexErrorKind::InvalidNumber)
                        };
                    }
                    // Hex float requires a `p` exponent.
                    return if !has_dot && i == n {
                        Ok(false)
                    } else {
                        Err(LexErrorKind::InvalidNumber)
                    };
                }
                b'o' => {
                    i = 2;
                    if scan_digits(lit, &mut i, is_oct_digit, true)? == 0 || i != n {
                        return Err(LexErrorKind::InvalidNumber);
                    }
                    return Ok(false);
                }
                b'b' => {
                    i = 2;
                    if scan_digits(lit, &mut i, is_bin_digit, true)? == 0 || i != n {
                        return Err(LexErrorKind::InvalidNumber);
                    }
                    return Ok(false);
                }
                _ => {}
            }
        }

        // Decimal or legacy octal
        scan_digits(lit, &mut i, is_dec_digit, false)?;
        let mut is_float = false;
        if i < n && lit[i] == b'.' {
            is_float = true;
            i += 1;
            scan_digits(lit, &mut i, is_dec_digit, false)?;
        }
        if i < n && (lit[i] | 0x20) == b'e' {
            is_float = true;
            scan_exponent(lit, &mut i)?;
        }
        if i != n {
            return Err(LexErrorKind::InvalidNumber);
        }

        // Legacy octal (leading 0) must not contain 8/9 unless it turned out
        // to be a float (`09.5` is a valid decimal float).
        if !is_float && lit[0] == b'0' && lit.len() > 1 {
            if lit.iter().any(|&b| b == b'8' || b == b'9') {
                return Err(LexErrorKind::InvalidNumber);
            }
        }
        Ok(is_float)
    }

    /// Whether the lexeme is plain decimal digits (with separators): used for
    /// `0123i`, where a legacy-octal-looking body is reinterpreted as decimal
    /// because of the imaginary suffix.
    pub fn is_decimal_digits(lit: &[u8]) -> bool {
        let mut i = 0;
        matches!(scan_digits(lit, &mut i, is_dec_digit, false), Ok(c) if c > 0 && i == lit.len())
    }

    /// Logos callback: extend the number token to its maximal munch. Boundary
    /// decisions only; validity is `classify_number`'s job, so `0b2` and `09`
    /// stay single (invalid) tokens instead of splitting.
    pub fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
        let src = lex.source().as_bytes();
        let start = lex.span().start;
        let n = src.len();
        let mut i = start;

        let consume = |i: &mut usize, hex: bool| {
            while *i < n {
                let b = src[*i];
                let ok = if hex { is_hex_digit(b) } else { is_dec_digit(b) } || b == b'_';
                if !ok {
                    break;
                }
                *i += 1;
            }
        };

        let mut hex = false;
        if src[i] == b'.' {
            i += 1; // regex guarantees a digit follows
            consume(&mut i, false);
        } else {
            i += 1;
            if src[i - 1] == b'0' && i < n {
                let c = src[i] | 0x20;
                if c == b'x' || c == b'o' || c == b'b' {
                    hex = c == b'x';
                    i += 1;
                }
            }
            consume(&mut i, hex);

            if i < n && src[i] == b'.' {
                // Don't steal the start of `..` / `...`.
                if !(i + 1 < n && src[i + 1] == b'.') {
                    i += 1;
                    consume(&mut i, hex);
                }
            }
        }

        if i < n {
            let e = src[i] | 0x20;
            if e == b'e' || e == b'p' {
                i += 1;
                if i < n && (src[i] == b'+' || src[i] == b'-') {
                    i += 1;
                }
                consume(&mut i, false);
            }
        }

        let already = lex.span().end;
        if i > already {
            lex.bump(i - already);
        }
        Ok(())
    }
}

// =============================================================================
// Raw token definition
// =============================================================================

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[rustfmt::skip]
enum RawTok {
    // Trivia (emitted, never skipped)
    #[regex(r"[ \t\u{FEFF}]+")] Whitespace,
    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*")] LineComment,
    #[token("/*", lex_block_comment)] BlockComment,

    // Go keywords
    #[token("break")] KwBreak,
    #[token("case")] KwCase,
    #[token("chan")] KwChan,
    #[token("const")] KwConst,
    #[token("continue")] KwContinue,
    #[token("default")] KwDefault,
    #[token("defer")] KwDefer,
    #[token("else")] KwElse,
    #[token("fallthrough")] KwFallthrough,
    #[token("for")] KwFor,
    #[token("func")] KwFunc,
    #[token("go")] KwGo,
    #[token("goto")] KwGoto,
    #[token("if")] KwIf,
    #[token("import")] KwImport,
    #[token("interface")] KwInterface,
    #[token("map")] KwMap,
    #[token("package")] KwPackage,
    #[token("range")] KwRange,
    #[token("return")] KwReturn,
    #[token("select")] KwSelect,
    #[token("struct")] KwStruct,
    #[token("switch")] KwSwitch,
    #[token("type")] KwType,
    #[token("var")] KwVar,
    #[token("new")] KwNew,
    #[token("make")] KwMake,

    // Gobra keywords
    #[token("requires")] KwRequires,
    #[token("ensures")] KwEnsures,
    #[token("preserves")] KwPreserves,
    #[token("decreases")] KwDecreases,
    #[token("invariant")] KwInvariant,
    #[token("pure")] KwPure,
    #[token("opaque")] KwOpaque,
    #[token("trusted")] KwTrusted,
    #[token("ghost")] KwGhost,
    #[token("fold")] KwFold,
    #[token("unfold")] KwUnfold,
    #[token("unfolding")] KwUnfolding,
    #[token("assume")] KwAssume,
    #[token("assert")] KwAssert,
    #[token("inhale")] KwInhale,
    #[token("exhale")] KwExhale,
    #[token("pred")] KwPred,
    #[token("implements")] KwImplements,
    #[token("forall")] KwForall,
    #[token("exists")] KwExists,
    #[token("let")] KwLet,
    #[token("in")] KwIn,
    #[token("union")] KwUnion,
    #[token("setminus")] KwSetminus,
    #[token("intersection")] KwIntersection,
    #[token("subset")] KwSubset,
    #[token("match")] KwMatch,
    #[token("outline")] KwOutline,

    // Identifiers
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    // Numbers (maximal munch in callback)
    #[regex(r"[0-9]|\.[0-9]", num::lex_number)] Number,

    // Strings / runes
    #[regex(r"`[^`]*`")] RawString,
    #[token("`", lex_unterminated_raw_string)] RawStringOpen,
    #[regex(r#""([^"\\\n\r]|\\.)*""#, validate_interpreted_string)] String,
    #[token("\"", lex_unterminated_string)] StringOpen,
    #[regex(r"'([^'\\\n\r]|\\.)+'", validate_rune)] Rune,

    // Operators
    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("==>")] Implication,
    #[token("===")] StrictEq,
    #[token("!==")] StrictNotEq,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("::")] ColonColon,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,
    #[token("?")] Question,
    #[token("#")] Hash,

    // Delimiters
    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,

    // Catch-all (lowest priority)
    #[regex(r".", priority = 0)] Error,
}

impl RawTok {
    /// Raw-to-public kind mapping. `Number` is handled in the wrapper (it
    /// needs classification plus the imaginary-suffix lookahead).
    #[rustfmt::skip]
    fn to_kind(self) -> SyntaxKind {
        use SyntaxKind as K;
        match self {
            Self::Whitespace => K::Whitespace, Self::Newline => K::Newline,
            Self::LineComment => K::LineComment, Self::BlockComment => K::BlockComment,

            Self::KwBreak => K::KwBreak, Self::KwCase => K::KwCase, Self::KwChan => K::KwChan,
            Self::KwConst => K::KwConst, Self::KwContinue => K::KwContinue,
            Self::KwDefault => K::KwDefault, Self::KwDefer => K::KwDefer, Self::KwElse => K::KwElse,
            Self::KwFallthrough => K::KwFallthrough, Self::KwFor => K::KwFor,
            Self::KwFunc => K::KwFunc, Self::KwGo => K::KwGo, Self::KwGoto => K::KwGoto,
            Self::KwIf => K::KwIf, Self::KwImport => K::KwImport,
            Self::KwInterface => K::KwInterface, Self::KwMap => K::KwMap,
            Self::KwPackage => K::KwPackage, Self::KwRange => K::KwRange,
            Self::KwReturn => K::KwReturn, Self::KwSelect => K::KwSelect,
            Self::KwStruct => K::KwStruct, Self::KwSwitch => K::KwSwitch,
            Self::KwType => K::KwType, Self::KwVar => K::KwVar,
            Self::KwNew => K::KwNew, Self::KwMake => K::KwMake,

            Self::KwRequires => K::KwRequires, Self::KwEnsures => K::KwEnsures,
            Self::KwPreserves => K::KwPreserves, Self::KwDecreases => K::KwDecreases,
            Self::KwInvariant => K::KwInvariant, Self::KwPure => K::KwPure,
            Self::KwOpaque => K::KwOpaque, Self::KwTrusted => K::KwTrusted,
            Self::KwGhost => K::KwGhost, Self::KwFold => K::KwFold,
            Self::KwUnfold => K::KwUnfold, Self::KwUnfolding => K::KwUnfolding,
            Self::KwAssume => K::KwAssume, Self::KwAssert => K::KwAssert,
            Self::KwInhale => K::KwInhale, Self::KwExhale => K::KwExhale,
            Self::KwPred => K::KwPred, Self::KwImplements => K::KwImplements,
            Self::KwForall => K::KwForall, Self::KwExists => K::KwExists,
            Self::KwLet => K::KwLet, Self::KwIn => K::KwIn,
            Self::KwUnion => K::KwUnion, Self::KwSetminus => K::KwSetminus,
            Self::KwIntersection => K::KwIntersection, Self::KwSubset => K::KwSubset,
            Self::KwMatch => K::KwMatch, Self::KwOutline => K::KwOutline,

            Self::Ident => K::Ident,
            Self::RawString => K::RawStringLit,
            Self::String => K::StringLit,
            Self::Rune => K::RuneLit,
            Self::Number | Self::StringOpen | Self::RawStringOpen | Self::Error => K::ErrorToken,

            Self::Ellipsis => K::Ellipsis, Self::ShlAssign => K::ShlAssign,
            Self::ShrAssign => K::ShrAssign, Self::AndNotAssign => K::AndNotAssign,
            Self::Implication => K::Implication, Self::StrictEq => K::StrictEq,
            Self::StrictNotEq => K::StrictNotEq, Self::AddAssign => K::AddAssign,
            Self::SubAssign => K::SubAssign, Self::MulAssign => K::MulAssign,
            Self::DivAssign => K::DivAssign, Self::ModAssign => K::ModAssign,
            Self::AndAssign => K::AndAssign, Self::OrAssign => K::OrAssign,
            Self::XorAssign => K::XorAssign, Self::Shl => K::Shl, Self::Shr => K::Shr,
            Self::AndNot => K::AndNot, Self::LAnd => K::LAnd, Self::LOr => K::LOr,
            Self::EqEq => K::EqEq, Self::NotEq => K::NotEq, Self::Le => K::Le, Self::Ge => K::Ge,
            Self::Inc => K::Inc, Self::Dec => K::Dec, Self::Define => K::Define,
            Self::Arrow => K::Arrow, Self::ColonColon => K::ColonColon,
            Self::Assign => K::Assign, Self::Plus => K::Plus, Self::Minus => K::Minus,
            Self::Star => K::Star, Self::Slash => K::Slash, Self::Percent => K::Percent,
            Self::Amp => K::Amp, Self::Pipe => K::Pipe, Self::Caret => K::Caret,
            Self::Tilde => K::Tilde, Self::Bang => K::Bang, Self::Lt => K::Lt, Self::Gt => K::Gt,
            Self::Question => K::Question, Self::Hash => K::Hash,
            Self::LParen => K::LParen, Self::RParen => K::RParen,
            Self::LBrack => K::LBrack, Self::RBrack => K::RBrack,
            Self::LBrace => K::LBrace, Self::RBrace => K::RBrace,
            Self::Comma => K::Comma, Self::Semi => K::Semi, Self::Colon => K::Colon,
            Self::Dot => K::Dot,
        }
    }
}

/// Tokens after which a newline acts as a statement terminator.
///
/// This is Go's semicolon-insertion rule moved to the consumer side: the
/// lexer never injects tokens (the stream must reproduce the input exactly),
/// so the parser asks this table whether an intervening newline terminates.
/// The specification markers `pure`/`opaque`/`trusted` and a bare `decreases` also
/// end their clause at a newline.
pub const fn terminates_statement(kind: SyntaxKind) -> bool {
    use SyntaxKind as K;
    matches!(
        kind,
        K::Ident
            | K::IntLit
            | K::FloatLit
            | K::ImagLit
            | K::RuneLit
            | K::StringLit
            | K::RawStringLit
            | K::KwBreak
            | K::KwContinue
            | K::KwFallthrough
            | K::KwReturn
            | K::KwPure
            | K::KwOpaque
            | K::KwTrusted
            | K::KwDecreases
            | K::KwType // `x.(type)` guard ends a switch header line
            | K::Inc
            | K::Dec
            | K::RParen
            | K::RBrack
            | K::RBrace
            // A malformed token ends its line; recovery resumes after it.
            | K::ErrorToken
    )
}

// =============================================================================
// Lexer wrapper: classification, imaginary lookahead, diagnostics
// =============================================================================

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    diags: Vec<Diag>,
    src_len: usize,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            diags: Vec::with_capacity(8),
            src_len: input.len(),
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    #[inline]
    fn push_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let span = Span::from_range(span);
        self.diags.push(LexError { kind, span }.diag());
    }

    /// Numbers need validation plus lookahead for the `i` imaginary suffix.
    fn classify_number_token(&mut self, span: Range<usize>) -> (SyntaxKind, Range<usize>) {
        let src = self.logos.source();
        let bytes = src[span.clone()].as_bytes();
        let has_i_suffix = span.end < self.src_len && src.as_bytes()[span.end] == b'i';

        if has_i_suffix {
            // `0123i` is a valid imaginary literal: the suffix forces a
            // decimal reading of a legacy-octal-looking body.
            let valid = num::classify_number(bytes).is_ok() || num::is_decimal_digits(bytes);
            self.logos.bump(1);
            let full = span.start..span.end + 1;
            if valid {
                return (SyntaxKind::ImagLit, full);
            }
            self.push_diag(LexErrorKind::InvalidNumber, full.clone());
            return (SyntaxKind::ErrorToken, full);
        }

        match num::classify_number(bytes) {
            Ok(true) => (SyntaxKind::FloatLit, span),
            Ok(false) => (SyntaxKind::IntLit, span),
            Err(kind) => {
                self.push_diag(kind, span.clone());
                (SyntaxKind::ErrorToken, span)
            }
        }
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        let raw = self.logos.next()?;
        let span = self.logos.span();

        let (kind, span) = match raw {
            Ok(RawTok::Number) => self.classify_number_token(span),
            // Catch-all for bytes no token starts with (`@`, a lone `'`).
            Ok(RawTok::Error) => {
                self.push_diag(LexErrorKind::InvalidToken, span.clone());
                (SyntaxKind::ErrorToken, span)
            }
            Ok(tok) => (tok.to_kind(), span),
            Err(kind) => {
                self.push_diag(kind, span.clone());
                // An unterminated block comment is still one comment token;
                // everything else malformed becomes an error token.
                let k = if kind == LexErrorKind::UnterminatedComment {
                    SyntaxKind::BlockComment
                } else {
                    SyntaxKind::ErrorToken
                };
                (k, span)
            }
        };

        Some(Token {
            kind,
            span: Span::from_range(span),
        })
    }
}

/// Lex a whole buffer. The concatenated token spans always tile the input
/// exactly; malformed bytes surface as error tokens plus diagnostics.
pub fn lex(input: &str) -> (Vec<Token>, Vec<Diag>) {
    let mut lexer = Lexer::new(input);
    let tokens: Vec<_> = lexer.by_ref().collect();
    let diags = lexer.take_diags();
    debug_assert_eq!(
        tokens.iter().map(|t| t.span.len() as usize).sum::<usize>(),
        input.len()
    );
    (tokens, diags)
}
