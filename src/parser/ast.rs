// AST (Abstract Syntax Tree) definitions for the Rust-like source language

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A single path segment or binding name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Name {
    Ident(String),
    Underscore,
    /// `self`
    SelfValue,
    /// `Self`
    SelfType,
    Super,
    Crate,
}

impl Name {
    /// Ident, or `None` for the keyword-like names
    pub fn ident_str(&self) -> Option<&str> {
        match self {
            Name::Ident(name) => Some(name),
            _ => None,
        }
    }

    pub fn ident(name: impl Into<String>) -> Self {
        Name::Ident(name.into())
    }

    /// Source spelling of the name
    pub fn as_str(&self) -> &str {
        match self {
            Name::Ident(name) => name,
            Name::Underscore => "_",
            Name::SelfValue => "self",
            Name::SelfType => "Self",
            Name::Super => "super",
            Name::Crate => "crate",
        }
    }
}

/// Lifetime (`'a`) or loop label (`'outer`), stored without the quote
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Lifetime(pub String);

/// Generic parameter on a declaration: `T: Bound + Other`
#[derive(Debug, Clone, PartialEq)]
pub struct Generic {
    pub name: Name,
    pub bounds: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(String),
    Float(String),
    Char(char),
    Str(String),
    Byte(u8),
    ByteStr(Vec<u8>),
    Bool(bool),
    Unit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
    Deref,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    // Bitwise
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    // Logical
    And,
    Or,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Assignment
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
    ShlAssign,
    ShrAssign,
    // Range
    Range,
    RangeInclusive,
    /// `expr as Type`; the right operand is a type expression
    As,
}

impl BinaryOp {
    pub fn is_assignment(self) -> bool {
        matches!(
            self,
            BinaryOp::Assign
                | BinaryOp::AddAssign
                | BinaryOp::SubAssign
                | BinaryOp::MulAssign
                | BinaryOp::DivAssign
                | BinaryOp::RemAssign
                | BinaryOp::BitAndAssign
                | BinaryOp::BitOrAssign
                | BinaryOp::BitXorAssign
                | BinaryOp::ShlAssign
                | BinaryOp::ShrAssign
        )
    }

    /// Operator spelling shared by both languages
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitOrAssign => "|=",
            BinaryOp::BitXorAssign => "^=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::Range => "..",
            BinaryOp::RangeInclusive => "..=",
            BinaryOp::As => "as",
        }
    }
}

/// Expression node. The grammar is expression-oriented, so control flow
/// lives here as well.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Name(Name),
    /// `prefix::name`
    Path {
        prefix: Box<Expr>,
        name: Name,
    },
    Literal(Literal),
    Array(Vec<Expr>),
    /// `[value; count]`
    ArrayRepeat {
        value: Box<Expr>,
        count: Box<Expr>,
    },
    Tuple(Vec<Expr>),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Ref {
        lifetime: Option<Lifetime>,
        mutable: bool,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    /// `name!(args)`
    MacroCall {
        name: Name,
        args: Vec<Expr>,
    },
    Index {
        target: Box<Expr>,
        index: Box<Expr>,
    },
    /// `target.field`; tuple fields are named `0`, `1`, ...
    Field {
        target: Box<Expr>,
        field: Name,
    },
    /// `expr?`
    Try(Box<Expr>),
    /// Named-field struct literal `Type { field: value, ..base }`
    Constructor {
        ty: Box<Expr>,
        fields: Vec<FieldInit>,
        base: Option<Box<Expr>>,
    },
    /// Generic application `target<'a, T, U>`
    WithGenerics {
        target: Box<Expr>,
        lifetimes: Vec<Lifetime>,
        args: Vec<Expr>,
    },
    Closure(Closure),
    Block(Block),
    If(If),
    /// `let pattern = value` inside an `if`/`while` condition
    Let {
        pattern: Box<Expr>,
        value: Box<Expr>,
    },
    Match(Match),
    Loop {
        label: Option<Lifetime>,
        body: Block,
    },
    While {
        label: Option<Lifetime>,
        condition: Box<Expr>,
        body: Block,
    },
    For {
        label: Option<Lifetime>,
        pattern: Box<Expr>,
        iterable: Box<Expr>,
        body: Block,
    },
    Break {
        label: Option<Lifetime>,
        value: Option<Box<Expr>>,
    },
    Continue {
        label: Option<Lifetime>,
    },
    Return(Option<Box<Expr>>),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(Name::ident(name))
    }

    pub fn int(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Int(value.into()))
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `Literal::Unit`, also used for the missing ends of `a..` and `..b`
    pub fn unit() -> Self {
        Expr::Literal(Literal::Unit)
    }

    pub fn is_unit(&self) -> bool {
        matches!(self, Expr::Literal(Literal::Unit))
    }

    /// Expressions that end a statement without a trailing `;`
    pub fn is_block_like(&self) -> bool {
        matches!(
            self,
            Expr::Block(_)
                | Expr::If(_)
                | Expr::Match(_)
                | Expr::Loop { .. }
                | Expr::While { .. }
                | Expr::For { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldInit {
    pub name: Name,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub params: Vec<Parameter>,
    pub return_type: Option<Box<Expr>>,
    pub body: Box<Expr>,
}

/// Statements plus an optional tail expression that is the block's value
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub statements: Vec<Stmt>,
    pub tail: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub condition: Box<Expr>,
    pub then_branch: Block,
    /// Either `Expr::Block` or a chained `Expr::If`
    pub else_branch: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub scrutinee: Box<Expr>,
    pub arms: Vec<MatchArm>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchArm {
    pub pattern: Expr,
    pub guard: Option<Expr>,
    pub body: Expr,
}

impl MatchArm {
    pub fn is_block_shaped(&self) -> bool {
        matches!(self.body, Expr::Block(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Let(Let),
    Expr(Expr),
    /// Item declared inside a block (local `fn`, `use`, ...)
    Item(Box<Item>),
    Empty,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Let {
    /// A name, `_`, or a tuple of patterns
    pub pattern: Expr,
    pub mutable: bool,
    pub ty: Option<Expr>,
    pub value: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Parameter {
    /// `self`, `&self`, `&mut self`, `mut self`
    Receiver { by_ref: bool, mutable: bool },
    /// The type is only omitted for closure parameters
    Named { name: Name, ty: Option<Expr> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: Name,
    pub lifetimes: Vec<Lifetime>,
    pub generics: Vec<Generic>,
    pub params: Vec<Parameter>,
    /// `Literal::Unit` when no `->` is written
    pub return_type: Expr,
    pub body: Option<Block>,
}

impl Function {
    pub fn has_receiver(&self) -> bool {
        matches!(self.params.first(), Some(Parameter::Receiver { .. }))
    }

    pub fn returns_unit(&self) -> bool {
        matches!(self.return_type, Expr::Literal(Literal::Unit))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructField {
    pub name: Name,
    pub ty: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Struct {
    pub name: Name,
    pub lifetimes: Vec<Lifetime>,
    pub generics: Vec<Generic>,
    pub fields: Vec<StructField>,
    /// Positional fields (`struct P(i32, i32);`)
    pub tuple: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: Name,
    pub lifetimes: Vec<Lifetime>,
    pub generics: Vec<Generic>,
    pub variants: Vec<Struct>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trait {
    pub name: Name,
    pub lifetimes: Vec<Lifetime>,
    pub generics: Vec<Generic>,
    pub supertraits: Vec<Expr>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Impl {
    pub lifetimes: Vec<Lifetime>,
    pub generics: Vec<Generic>,
    pub ty: Expr,
    pub trait_ref: Option<Expr>,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: Name,
    /// `None` for `mod name;` declarations that live in another file
    pub items: Option<Vec<Item>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub name: Name,
    pub generics: Vec<Generic>,
    pub ty: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Static {
    pub name: Name,
    pub mutable: bool,
    pub ty: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Const {
    pub name: Name,
    pub ty: Expr,
    pub value: Option<Expr>,
}

/// One leaf of a `use` tree, flattened
#[derive(Debug, Clone, PartialEq)]
pub struct UsePath {
    pub segments: Vec<Name>,
    pub alias: Option<Name>,
    pub glob: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Use {
    pub paths: Vec<UsePath>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocStyle {
    Line,
    Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocComment {
    pub style: DocStyle,
    pub text: String,
}

/// `#[...]` or `#![...]`, kept as reconstructed source text
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub inner: bool,
    pub text: String,
}

/// Module-level declarations
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Function(Function),
    Struct(Struct),
    Enum(Enum),
    Trait(Trait),
    Impl(Impl),
    Module(Module),
    TypeDecl(TypeDecl),
    Static(Static),
    Const(Const),
    Use(Use),
    ExternCrate(Name),
    MacroRules(Name),
    Documented {
        doc: DocComment,
        item: Box<Item>,
    },
    Attributed {
        attribute: Attribute,
        item: Box<Item>,
    },
}

impl Item {
    /// The item under any doc-comment or attribute wrappers
    pub fn unwrapped(&self) -> &Item {
        match self {
            Item::Documented { item, .. } | Item::Attributed { item, .. } => item.unwrapped(),
            other => other,
        }
    }
}

/// One parsed compilation unit
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SourceFile {
    pub items: Vec<Item>,
}
