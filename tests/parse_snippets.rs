//! The Go surface grammar, end to end: declarations, statements, control
//! flow, composite literals, generics.

use gobra_syntax::kinds::{SyntaxKind as K, SyntaxNode};
use gobra_syntax::{parse, Parse};

fn parse_clean(src: &str) -> Parse {
    let p = parse(src);
    assert!(p.errors.is_empty(), "unexpected errors: {:#?}", p.errors);
    assert_eq!(p.syntax().text().to_string(), src);
    p
}

fn count(root: &SyntaxNode, kind: K) -> usize {
    root.descendants().filter(|n| n.kind() == kind).count()
}

fn has(root: &SyntaxNode, kind: K) -> bool {
    count(root, kind) > 0
}

#[test]
fn package_and_imports() {
    let p = parse_clean(
        "package server\n\nimport (\n\t\"fmt\"\n\tlog \"my/log\"\n\t. \"dot\"\n\t_ \"blank\"\n)\n\nimport \"single\"\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::PackageClause), 1);
    assert_eq!(count(&root, K::ImportDecl), 2);
    assert_eq!(count(&root, K::ImportSpec), 5);
}

#[test]
fn value_declarations() {
    let p = parse_clean(
        "package p\n\nconst (\n\ta = 1\n\tb, c = 2, 3\n)\n\nconst single int = 4\n\nvar (\n\tx int\n\ty = 5\n\tz, w float64 = 1.0, 2.0\n)\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::ConstDecl), 2);
    assert_eq!(count(&root, K::ConstSpec), 3);
    assert_eq!(count(&root, K::VarSpec), 3);
}

#[test]
fn type_declarations() {
    let p = parse_clean(
        "package p\n\ntype (\n\tID int\n\tAlias = map[string]int\n)\n\ntype Pair[A any, B any] struct {\n\tfirst  A\n\tsecond B `tag:\"s\"`\n}\n\ntype Reader interface {\n\tRead(p []byte) (n int, err error)\n\tio.Closer\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::TypeSpec), 2);
    assert_eq!(count(&root, K::TypeAlias), 1);
    assert!(has(&root, K::TypeParamList));
    assert_eq!(count(&root, K::FieldDecl), 2);
    assert!(has(&root, K::MethodElem));
    assert!(has(&root, K::QualifiedType));
}

#[test]
fn functions_and_methods() {
    let p = parse_clean(
        "package p\n\nfunc add(a, b int) int { return a + b }\n\nfunc (s *Server) Run(addr string) (err error) {\n\treturn nil\n}\n\nfunc variadic(xs ...int) {}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::FuncDecl), 2);
    assert_eq!(count(&root, K::MethodDecl), 1);
    assert_eq!(count(&root, K::Receiver), 1);
}

#[test]
fn generic_function() {
    let p = parse_clean(
        "package p\n\nfunc Map[T any, U any](xs []T, f func(T) U) []U {\n\tout := make([]U, 0, len(xs))\n\tfor _, x := range xs {\n\t\tout = append(out, f(x))\n\t}\n\treturn out\n}\n",
    );
    let root = p.syntax();
    assert!(has(&root, K::TypeParamList));
    assert!(has(&root, K::RangeClause));
    assert!(has(&root, K::MakeExpr));
}

#[test]
fn control_flow() {
    let p = parse_clean(
        "package p\n\nfunc f(m map[string]int) int {\n\tif v, ok := m[\"k\"]; ok {\n\t\treturn v\n\t} else if len(m) == 0 {\n\t\treturn -1\n\t} else {\n\t\treturn 0\n\t}\n}\n\nfunc g(n int) {\n\tfor i := 0; i < n; i++ {\n\t\tcontinue\n\t}\n\tfor n > 0 {\n\t\tn--\n\t}\n\tfor {\n\t\tbreak\n\t}\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::IfStmt), 3);
    assert_eq!(count(&root, K::ForStmt), 3);
    assert_eq!(count(&root, K::ForClause), 1);
}

#[test]
fn switches() {
    let p = parse_clean(
        "package p\n\nfunc f(v interface{}) string {\n\tswitch x := v.(type) {\n\tcase int, int64:\n\t\treturn \"int\"\n\tcase *bytes.Buffer:\n\t\treturn x.String()\n\tdefault:\n\t\treturn \"other\"\n\t}\n}\n\nfunc g(n int) int {\n\tswitch {\n\tcase n < 0:\n\t\treturn -1\n\tcase n == 0:\n\t\tfallthrough\n\tdefault:\n\t\treturn 1\n\t}\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::TypeSwitchStmt), 1);
    assert_eq!(count(&root, K::ExprSwitchStmt), 1);
    assert!(has(&root, K::FallthroughStmt));
    assert!(has(&root, K::TypeAssertExpr));
}

#[test]
fn channels_and_select() {
    let p = parse_clean(
        "package p\n\nfunc pump(ch chan<- int, done <-chan struct{}) {\n\tselect {\n\tcase ch <- 1:\n\t\tgo drain(ch)\n\tcase v := <-done:\n\t\t_ = v\n\tdefault:\n\t}\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::SelectStmt), 1);
    assert_eq!(count(&root, K::CommClause), 2);
    assert!(has(&root, K::SendStmt));
    assert!(has(&root, K::GoStmt));
    assert_eq!(count(&root, K::ChanType), 2);
}

#[test]
fn composite_literals() {
    let p = parse_clean(
        "package p\n\nfunc f() {\n\tp := Point{X: 1, Y: 2}\n\txs := []int{1, 2, 3}\n\tgrid := [2][2]int{{1, 0}, {0, 1}}\n\tm := map[string][]int{\"a\": {1}, \"b\": {2, 3}}\n\tn := [...]int{1, 2}\n\t_, _, _, _, _ = p, xs, grid, m, n\n}\n",
    );
    let root = p.syntax();
    assert!(count(&root, K::CompositeLit) >= 4);
    assert!(has(&root, K::KeyedElement));
    assert!(has(&root, K::ImplicitLengthArrayType));
}

#[test]
fn labels_and_jumps() {
    let p = parse_clean(
        "package p\n\nfunc f() {\nouter:\n\tfor {\n\t\tfor {\n\t\t\tbreak outer\n\t\t}\n\t}\n\tgoto outer\n}\n",
    );
    let root = p.syntax();
    assert!(has(&root, K::LabeledStmt));
    assert!(has(&root, K::GotoStmt));
}

#[test]
fn conversions_and_func_literals() {
    let p = parse_clean(
        "package p\n\nfunc f(s string, p unsafe.Pointer) {\n\tb := []byte(s)\n\tt := (*T)(p)\n\tcb := func(x int) int { return x * 2 }\n\tdefer func() { recover() }()\n\t_, _, _ = b, t, cb\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::ConversionExpr), 2);
    assert_eq!(count(&root, K::FuncLit), 2);
    assert!(has(&root, K::DeferStmt));
}

#[test]
fn slices_and_indexing() {
    let p = parse_clean(
        "package p\n\nfunc f(xs []int) {\n\ta := xs[1]\n\tb := xs[1:3]\n\tc := xs[:2]\n\td := xs[1:]\n\te := xs[1:3:4]\n\t_, _, _, _, _ = a, b, c, d, e\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::IndexExpr), 1);
    assert_eq!(count(&root, K::SliceExpr), 4);
}

#[test]
fn semicolons_are_optional_but_accepted() {
    let p = parse_clean("package p;\n\nfunc f() { x := 1; y := 2; _, _ = x, y };\n");
    let root = p.syntax();
    assert_eq!(count(&root, K::ShortVarDecl), 2);
}

#[test]
fn new_and_builtin_calls() {
    let p = parse_clean(
        "package p\n\nfunc f() {\n\tb := new(bytes.Buffer)\n\tch := make(chan int, 8)\n\t_ = append([]int{}, 1)\n\t_, _ = b, ch\n}\n",
    );
    let root = p.syntax();
    assert_eq!(count(&root, K::NewExpr), 1);
    assert_eq!(count(&root, K::MakeExpr), 1);
}
