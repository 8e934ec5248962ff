//! The verification surface: contract attachment, loop specifications,
//! ghost code, predicates, implementation proofs, and outline blocks.

use gobra_syntax::kinds::{SyntaxKind as K, SyntaxNode};
use gobra_syntax::{field, parse, Parse};

fn parse_clean(src: &str) -> Parse {
    let p = parse(src);
    assert!(p.errors.is_empty(), "unexpected errors: {:#?}", p.errors);
    assert_eq!(p.syntax().text().to_string(), src);
    p
}

fn count(root: &SyntaxNode, kind: K) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

fn find(root: &SyntaxNode, kind: K) -> SyntaxNode {
    root.descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in tree"))
}

#[test]
fn contract_attaches_to_function() {
    let p = parse_clean(
        "package p\n\nrequires x > 0\nensures res > x\ndecreases x\nfunc inc(x int) (res int) {\n\treturn x + 1\n}\n",
    );
    let root = p.syntax();
    let func = find(&root, K::FuncDecl);
    let spec = field(&func, "spec").expect("contract not attached");
    assert_eq!(spec.kind(), K::SpecBlock);
    let spec = find(&func, K::SpecBlock);
    assert_eq!(count(&spec, K::RequiresClause), 1);
    assert_eq!(count(&spec, K::EnsuresClause), 1);
    assert_eq!(count(&spec, K::DecreasesClause), 1);
}

#[test]
fn contract_attaches_to_method() {
    let p = parse_clean(
        "package p\n\npreserves acc(s)\nensures s.n >= old(s.n)\nfunc (s *Stack) Push(v int) {\n\ts.n++\n}\n",
    );
    let root = p.syntax();
    let method = find(&root, K::MethodDecl);
    assert_eq!(count(&method, K::SpecBlock), 1);
    assert_eq!(count(&method, K::PreservesClause), 1);
}

#[test]
fn markers_inline_and_standalone() {
    let p = parse_clean(
        "package p\n\npure func get() int { return 1 }\n\nghost\ntrusted\nfunc admit() {}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::MarkerClause), 2);
    assert_eq!(count(&root, K::GhostStmt), 1);
    assert_eq!(count(&root, K::FuncDecl), 2);
}

#[test]
fn bare_decreases_is_legal() {
    let p = parse_clean("package p\n\ndecreases\nfunc loops() { loops() }\n");
    let root = p.syntax();
    let clause = find(&root, K::DecreasesClause);
    // Wildcard measure: keyword only.
    assert_eq!(count(&clause, K::ExprList), 0);
}

#[test]
fn conditional_decreases() {
    let p = parse_clean("package p\n\ndecreases n if n > 0\nfunc f(n int) {}\n");
    let root = p.syntax();
    assert_eq!(count(&root, K::DecreasesClause), 1);
}

#[test]
fn loop_specification() {
    let p = parse_clean(
        "package p\n\nfunc sum(n int) int {\n\ts := 0\n\ti := 0\n\tinvariant i <= n\n\tinvariant s >= 0\n\tdecreases n - i\n\tfor i < n {\n\t\ts += i\n\t\ti++\n\t}\n\treturn s\n}\n",
    );
    let root = p.syntax();
    let spec_for = find(&root, K::SpecForStmt);
    assert_eq!(count(&spec_for, K::InvariantClause), 2);
    assert_eq!(count(&spec_for, K::DecreasesClause), 1);
    assert_eq!(field(&spec_for, "loop").unwrap().kind(), K::ForStmt);
}

#[test]
fn ghost_statements() {
    let p = parse_clean(
        "package p\n\nfunc f(x int) {\n\tghost var g int = x\n\tghost g = g + 1\n\tassert g > x\n\tassume x >= 0\n\tinhale acc(&x)\n\texhale acc(&x)\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::GhostStmt), 2);
    assert_eq!(count(&root, K::ProofStmt), 4);
}

#[test]
fn fold_unfold_and_defer() {
    let p = parse_clean(
        "package p\n\nfunc f(s *Stack) {\n\tunfold valid(s)\n\ts.n++\n\tfold valid(s)\n\tdefer unfold valid(s)\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::UnfoldStmt), 2);
    assert_eq!(count(&root, K::FoldStmt), 1);
    assert_eq!(count(&root, K::DeferStmt), 1);
}

#[test]
fn predicates() {
    let p = parse_clean(
        "package p\n\npred validStack(s *Stack) {\n\tacc(s) && s.n >= 0\n}\n\npred (s *Stack) inv() {\n\tacc(s)\n}\n\npred abstractInv(x int)\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::PredDecl), 3);
    assert_eq!(count(&root, K::Receiver), 1);
    let first = find(&root, K::PredDecl);
    assert!(field(&first, "body").is_some());
}

#[test]
fn implementation_proof() {
    let p = parse_clean(
        "package p\n\nList implements Iterator {\n\tpred ready := validList\n\tpred done := drained\n}\n\nCounter implements Resettable\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::ImplProof), 2);
    assert_eq!(count(&root, K::PredAlias), 2);
}

#[test]
fn quantifiers_and_triggers() {
    let p = parse_clean(
        "package p\n\nrequires forall i int :: 0 <= i && i < len(xs) ==> xs[i] > 0\nensures exists j int :: { xs[j] } xs[j] == res\nfunc pick(xs []int) (res int) {\n\treturn xs[0]\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::QuantifierExpr), 2);
    assert_eq!(count(&root, K::BoundVarDecl), 2);
    assert_eq!(count(&root, K::TriggerSet), 1);
    let q = find(&root, K::QuantifierExpr);
    assert!(field(&q, "body").is_some());
}

#[test]
fn unfolding_and_let() {
    let p = parse_clean(
        "package p\n\nrequires valid(s)\npure func size(s *Stack) int {\n\treturn unfolding valid(s) in s.n\n}\n\npure func twice(x int) int {\n\treturn let y := x + x in y\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::UnfoldingExpr), 1);
    assert_eq!(count(&root, K::LetExpr), 1);
    let u = find(&root, K::UnfoldingExpr);
    assert!(field(&u, "body").is_some());
}

#[test]
fn match_statement_with_binders() {
    let p = parse_clean(
        "package p\n\nghost\nfunc depth(t Tree) int {\n\tmatch t {\n\tcase leaf{}:\n\t\treturn 0\n\tcase node{?l, ?r}:\n\t\treturn 1 + depth(l) + depth(r)\n\tdefault:\n\t\treturn 0\n\t}\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::MatchStmt), 1);
    assert_eq!(count(&root, K::MatchCase), 2);
    assert_eq!(count(&root, K::MatchDefault), 1);
    assert_eq!(count(&root, K::MatchBinder), 2);
}

#[test]
fn match_expression() {
    let p = parse_clean(
        "package p\n\npure func sign(x int) int {\n\treturn match x {\n\tcase 0: 0\n\tdefault: 1\n\t}\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::MatchExpr), 1);
    assert_eq!(count(&root, K::MatchCase), 1);
}

#[test]
fn outline_blocks() {
    let p = parse_clean(
        "package p\n\nfunc f(x int) {\n\toutline(\n\t\ty := x + 1\n\t\t_ = y\n\t)\n\trequires x > 0\n\toutline(\n\t\tx--\n\t)\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::OutlineStmt), 2);
    // The second outline carries its contract.
    let with_spec = root
        .descendants()
        .filter(|n| n.kind() == K::OutlineStmt)
        .find(|n| n.children().any(|c| c.kind() == K::SpecBlock));
    assert!(with_spec.is_some());
}

#[test]
fn interface_method_contracts() {
    let p = parse_clean(
        "package p\n\ntype Counter interface {\n\trequires n >= 0\n\tensures ret >= n\n\tAdd(n int) (ret int)\n\tReset()\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::MethodElem), 2);
    let with_spec = root
        .descendants()
        .filter(|n| n.kind() == K::MethodElem)
        .filter(|n| n.children().any(|c| c.kind() == K::SpecBlock))
        .count();
    assert_eq!(with_spec, 1);
}

#[test]
fn spec_for_at_top_level_is_lenient() {
    // Root leniency: a loop contract fragment outside any function still
    // produces a tree (used by tooling on partial buffers).
    let p = parse(
        "invariant x > 0\nfor x > 0 {\n\tx--\n}\n",
    );
    assert_eq!(
        p.syntax().text().to_string(),
        "invariant x > 0\nfor x > 0 {\n\tx--\n}\n"
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::SpecForStmt), 1);
}
