//! Property tests: the lexer is total and lossless on arbitrary input.

use gobra_syntax::lexer::lex;
use proptest::prelude::*;

proptest! {
    #[test]
    fn never_panics(src in ".*") {
        let _ = lex(&src);
    }

    #[test]
    fn spans_tile_the_input(src in ".*") {
        let (tokens, _) = lex(&src);
        let mut pos = 0usize;
        for tok in &tokens {
            prop_assert_eq!(tok.span.start as usize, pos);
            prop_assert!(tok.span.end >= tok.span.start);
            pos = tok.span.end as usize;
        }
        prop_assert_eq!(pos, src.len());
    }

    #[test]
    fn concatenated_lexemes_reproduce_input(src in ".*") {
        let (tokens, _) = lex(&src);
        let rebuilt: String = tokens
            .iter()
            .map(|t| &src[t.span.to_range()])
            .collect();
        prop_assert_eq!(rebuilt, src);
    }

    #[test]
    fn go_like_input_lexes_clean(
        ident in "[a-z][a-z0-9_]{0,8}",
        n in 0u64..1_000_000,
    ) {
        let src = format!("var {ident} = {n}\n");
        let (_, diags) = lex(&src);
        prop_assert!(diags.is_empty());
    }

    #[test]
    fn parse_never_panics(src in ".*") {
        let _ = gobra_syntax::parse(&src);
    }

    #[test]
    fn parse_is_lossless(src in ".*") {
        let parse = gobra_syntax::parse(&src);
        prop_assert_eq!(parse.syntax().text().to_string(), src);
    }
}
