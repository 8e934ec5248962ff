//! String, raw string, and rune lexing: escapes, Unicode, and the
//! unterminated forms.

use gobra_syntax::error::DiagKind;
use gobra_syntax::kinds::SyntaxKind as K;
use gobra_syntax::lexer::lex;

fn single(src: &str) -> K {
    let (tokens, _) = lex(src);
    let non_trivia: Vec<_> = tokens.iter().filter(|t| !t.kind.is_trivia()).collect();
    assert_eq!(non_trivia.len(), 1, "expected one token in {src:?}");
    non_trivia[0].kind
}

#[test]
fn interpreted_strings() {
    assert_eq!(single(r#""""#), K::StringLit);
    assert_eq!(single(r#""hello""#), K::StringLit);
    assert_eq!(single(r#""tab\there""#), K::StringLit);
    assert_eq!(single(r#""\x41\x42""#), K::StringLit);
    assert_eq!(single(r#""\101""#), K::StringLit);
    assert_eq!(single(r#""é""#), K::StringLit);
    assert_eq!(single(r#""\U0001F600""#), K::StringLit);
    assert_eq!(single(r#""quote: \" done""#), K::StringLit);
}

#[test]
fn invalid_escapes_are_diagnosed() {
    for src in [r#""\q""#, r#""\x4""#, r#""\u12""#, r#""\400""#, r#""\ud800""#] {
        let (tokens, diags) = lex(src);
        assert!(
            tokens.iter().any(|t| t.kind == K::ErrorToken),
            "no error token for {src}"
        );
        assert!(diags.iter().any(|d| d.kind == DiagKind::Lex));
    }
}

#[test]
fn unterminated_string_stops_at_newline() {
    let (tokens, diags) = lex("\"abc\nx");
    assert_eq!(tokens[0].kind, K::ErrorToken);
    assert_eq!(tokens[0].span.to_range(), 0..4);
    assert!(!diags.is_empty());
    // Lexing continues on the next line.
    assert!(tokens.iter().any(|t| t.kind == K::Ident));
}

#[test]
fn raw_strings() {
    assert_eq!(single("`plain`"), K::RawStringLit);
    assert_eq!(single("`no \\n escapes \\`"), K::RawStringLit);
    assert_eq!(single("`spans\nlines`"), K::RawStringLit);
    assert_eq!(single("`embedded \"quote\"`"), K::RawStringLit);
}

#[test]
fn unterminated_raw_string_runs_to_eof() {
    let (tokens, diags) = lex("`never closed");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, K::ErrorToken);
    assert_eq!(tokens[0].span.to_range(), 0..13);
    assert!(!diags.is_empty());
}

#[test]
fn runes() {
    assert_eq!(single("'a'"), K::RuneLit);
    assert_eq!(single("'\\n'"), K::RuneLit);
    assert_eq!(single("'\\''"), K::RuneLit);
    assert_eq!(single("'\\x41'"), K::RuneLit);
    assert_eq!(single("'\\u00e9'"), K::RuneLit);
    assert_eq!(single("'é'"), K::RuneLit);
}

#[test]
fn rune_must_hold_one_unit() {
    let (tokens, diags) = lex("'ab'");
    assert!(tokens.iter().any(|t| t.kind == K::ErrorToken));
    assert!(!diags.is_empty());
}
