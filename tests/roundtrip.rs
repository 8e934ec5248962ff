//! Lossless round-trip: the tree's text is the input, byte for byte, for
//! well-formed and malformed sources alike, and literal lexemes keep their
//! exact spelling.

use gobra_syntax::kinds::SyntaxKind as K;
use gobra_syntax::parse;

fn roundtrip(src: &str) {
    let p = parse(src);
    assert_eq!(p.syntax().text().to_string(), src, "lost bytes in {src:?}");
}

#[test]
fn whole_file() {
    roundtrip(
        "package stack\t// heading comment\n\nimport \"sync\"\n\n/* state */\ntype Stack struct {\n\tmu sync.Mutex\n\tn  int\n}\n\npred valid(s *Stack) {\n\tacc(s) && s.n >= 0\n}\n\nrequires valid(s)\nensures  valid(s)\nfunc (s *Stack) Push(v int) {\n\tunfold valid(s)\n\ts.n++\n\tfold valid(s)\n}\n",
    );
}

#[test]
fn literal_spellings_survive() {
    // Each spelling must come back exactly, not normalized.
    let lits = [
        "0b101",
        "0o17",
        "0",
        "0x1F",
        "1_000",
        "3.14e-2",
        ".5",
        "0x1p4",
        "2i",
        "'\\n'",
        "'\\u00e9'",
        "`raw \"quoted\" text`",
        "\"\\x41\"",
    ];
    for lit in lits {
        let src = format!("package p\n\nvar v = {lit}\n");
        let p = parse(&src);
        assert!(p.errors.is_empty(), "errors for {lit}: {:#?}", p.errors);
        assert_eq!(p.syntax().text().to_string(), src);
        let found = p
            .syntax()
            .descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .any(|t| t.text() == lit && t.kind().is_literal());
        assert!(found, "literal {lit} not preserved as one token");
    }
}

#[test]
fn comments_and_weird_whitespace() {
    roundtrip("package p\n\nfunc f() {\n\tx := 1 /* inline */ + 2\n\t_ = x // eol\n}\n");
    roundtrip("package p\r\n\r\nfunc f() {\r\n}\r\n");
    roundtrip("\u{FEFF}package p\n");
    roundtrip("package p\n\n/* unterminated");
}

#[test]
fn malformed_input_is_still_lossless() {
    for src in [
        "package p\n\nfunc f( {\n",
        "package p\n\nvar = = 3\n",
        "func (((\n",
        "}}}}\n",
        "package p\n\nfunc f() { s := \"open\n}\n",
        "0x 089 1__2\n",
        "requires\n",
    ] {
        roundtrip(src);
    }
}

#[test]
fn verification_surface_roundtrips() {
    roundtrip(
        "package p\n\nghost\nrequires forall i int :: { xs[i] } 0 <= i ==> xs[i] in s\ndecreases\npure func all(xs []int, s set[int]) bool {\n\treturn unfolding inv(xs) in let n := len(xs) in n > 0 ? true : false\n}\n",
    );
}

#[test]
fn every_byte_is_inside_exactly_one_token() {
    let src = "package p\n\nfunc f() int { return 0x1F + 2i }\n";
    let p = parse(src);
    let mut pos = 0;
    for t in p.syntax().descendants_with_tokens() {
        if let Some(tok) = t.into_token() {
            assert_eq!(u32::from(tok.text_range().start()), pos);
            pos = u32::from(tok.text_range().end());
        }
    }
    assert_eq!(pos as usize, src.len());
}

#[test]
fn error_nodes_keep_their_tokens() {
    let src = "package p\n\nfunc f() {\n\t@ # $\n\tx := 1\n}\n";
    let p = parse(src);
    assert_eq!(p.syntax().text().to_string(), src);
    let err = p
        .syntax()
        .descendants()
        .find(|n| n.kind() == K::Error)
        .expect("error node");
    assert!(err.text_range().len() > 0.into());
}
