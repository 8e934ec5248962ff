//! Syntax kinds: the public vocabulary of the tree.
//!
//! One flat `#[repr(u16)]` enum covers trivia, tokens, and node kinds, as
//! `rowan` expects. Kind names and field names (see [`crate::tree::field`])
//! are a versioned public surface consumed by highlighting queries and other
//! tooling; renaming a variant is a breaking change.

use rowan::Language;

#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(clippy::upper_case_acronyms)]
pub enum SyntaxKind {
    // === Trivia ===
    Whitespace,
    Newline,
    LineComment,
    BlockComment,

    // === Literal / identifier tokens ===
    Ident,
    IntLit,
    FloatLit,
    ImagLit,
    RuneLit,
    StringLit,
    RawStringLit,

    // === Go keywords ===
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,
    KwNew,
    KwMake,

    // === Gobra keywords ===
    KwRequires,
    KwEnsures,
    KwPreserves,
    KwDecreases,
    KwInvariant,
    KwPure,
    KwOpaque,
    KwTrusted,
    KwGhost,
    KwFold,
    KwUnfold,
    KwUnfolding,
    KwAssume,
    KwAssert,
    KwInhale,
    KwExhale,
    KwPred,
    KwImplements,
    KwForall,
    KwExists,
    KwLet,
    KwIn,
    KwUnion,
    KwSetminus,
    KwIntersection,
    KwSubset,
    KwMatch,
    KwOutline,

    // === Operators / punctuation ===
    Ellipsis,     // ...
    ShlAssign,    // <<=
    ShrAssign,    // >>=
    AndNotAssign, // &^=
    Implication,  // ==>
    StrictEq,     // ===
    StrictNotEq,  // !==
    AddAssign,    // +=
    SubAssign,    // -=
    MulAssign,    // *=
    DivAssign,    // /=
    ModAssign,    // %=
    AndAssign,    // &=
    OrAssign,     // |=
    XorAssign,    // ^=
    Shl,          // <<
    Shr,          // >>
    AndNot,       // &^
    LAnd,         // &&
    LOr,          // ||
    EqEq,         // ==
    NotEq,        // !=
    Le,           // <=
    Ge,           // >=
    Inc,          // ++
    Dec,          // --
    Define,       // :=
    Arrow,        // <-
    ColonColon,   // ::
    Assign,       // =
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /
    Percent,      // %
    Amp,          // &
    Pipe,         // |
    Caret,        // ^
    Tilde,        // ~
    Bang,         // !
    Lt,           // <
    Gt,           // >
    Question,     // ?
    Hash,         // #
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    /// A byte sequence no token rule accepts.
    ErrorToken,

    // === Nodes: structure ===
    SourceFile,
    PackageClause,
    ImportDecl,
    ImportSpec,
    ConstDecl,
    ConstSpec,
    VarDecl,
    VarSpec,
    TypeDecl,
    TypeSpec,
    TypeAlias,
    FuncDecl,
    MethodDecl,
    Receiver,
    TypeParamList,
    TypeParamDecl,
    ParamList,
    ParamDecl,
    FuncLit,

    // === Nodes: types ===
    PointerType,
    ArrayType,
    ImplicitLengthArrayType,
    SliceType,
    MapType,
    ChanType,
    FuncType,
    StructType,
    FieldDecl,
    InterfaceType,
    MethodElem,
    QualifiedType,
    GenericType,
    TypeArgList,
    TypeElem,
    ParenType,

    // === Nodes: statements ===
    Block,
    EmptyStmt,
    ExprStmt,
    SendStmt,
    IncDecStmt,
    AssignStmt,
    ShortVarDecl,
    LabeledStmt,
    ReturnStmt,
    GotoStmt,
    BreakStmt,
    ContinueStmt,
    FallthroughStmt,
    DeferStmt,
    GoStmt,
    IfStmt,
    ForStmt,
    ForClause,
    RangeClause,
    ExprSwitchStmt,
    TypeSwitchStmt,
    SelectStmt,
    CaseClause,
    DefaultClause,
    CommClause,

    // === Nodes: verification extensions ===
    SpecBlock,
    RequiresClause,
    EnsuresClause,
    PreservesClause,
    DecreasesClause,
    MarkerClause,
    InvariantClause,
    SpecForStmt,
    GhostStmt,
    FoldStmt,
    UnfoldStmt,
    ProofStmt,
    MatchStmt,
    MatchExpr,
    MatchCase,
    MatchDefault,
    MatchBinder,
    PredDecl,
    ImplProof,
    PredAlias,
    QuantifierExpr,
    BoundVarDecl,
    TriggerSet,
    UnfoldingExpr,
    LetExpr,
    OutlineStmt,

    // === Nodes: expressions ===
    ParenExpr,
    UnaryExpr,
    BinaryExpr,
    TernaryExpr,
    CallExpr,
    ArgList,
    SelectorExpr,
    IndexExpr,
    SliceExpr,
    TypeAssertExpr,
    ConversionExpr,
    CompositeLit,
    LiteralValue,
    KeyedElement,
    NewExpr,
    MakeExpr,
    ExprList,

    /// A span of tokens no rule accepted; children are whatever partially
    /// matched before recovery.
    Error,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub const fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment | BlockComment)
    }

    #[inline]
    pub const fn is_comment(self) -> bool {
        matches!(self, LineComment | BlockComment)
    }

    #[inline]
    pub const fn is_keyword(self) -> bool {
        (self as u16) >= (KwBreak as u16) && (self as u16) <= (KwOutline as u16)
    }

    #[inline]
    pub const fn is_literal(self) -> bool {
        matches!(
            self,
            IntLit | FloatLit | ImagLit | RuneLit | StringLit | RawStringLit
        )
    }

    /// Compound-assignment operators (each binary operator plus `=`).
    #[inline]
    pub const fn is_assign_op(self) -> bool {
        matches!(
            self,
            Assign
                | AddAssign
                | SubAssign
                | MulAssign
                | DivAssign
                | ModAssign
                | AndAssign
                | OrAssign
                | XorAssign
                | ShlAssign
                | ShrAssign
                | AndNotAssign
        )
    }

    #[inline]
    pub(crate) fn from_raw(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 <= Error as u16);
        // Safety by construction: the enum is a dense u16 range ending at Error.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

/// The Gobra language marker for `rowan`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GobraLanguage {}

impl Language for GobraLanguage {
    type Kind = SyntaxKind;

    #[inline]
    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw)
    }

    #[inline]
    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<GobraLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<GobraLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<GobraLanguage>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_roundtrip() {
        for k in [Whitespace, Ident, KwOutline, ErrorToken, SourceFile, Error] {
            assert_eq!(SyntaxKind::from_raw(rowan::SyntaxKind::from(k)), k);
        }
    }

    #[test]
    fn keyword_range_covers_both_languages() {
        assert!(KwBreak.is_keyword());
        assert!(KwVar.is_keyword());
        assert!(KwRequires.is_keyword());
        assert!(KwOutline.is_keyword());
        assert!(!Ident.is_keyword());
        assert!(!Ellipsis.is_keyword());
    }
}
