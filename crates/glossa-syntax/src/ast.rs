//! Syntax tree for documentation snippets.
//!
//! The tree mirrors the shape of Python's own `ast` module closely enough
//! that renderers can reason about it the same way: `elif` is a single
//! nested [`StmtKind::If`] inside the `orelse` list, parameters and their
//! defaults are stored separately, and every statement remembers the source
//! line it started on so comments can be re-attached by line.

use serde::{Deserialize, Serialize};

/// A parsed snippet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Module {
    pub body: Vec<Stmt>,
}

impl Module {
    pub fn new(body: Vec<Stmt>) -> Self {
        Self { body }
    }
}

/// A statement and the 1-based source line its first token is on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stmt {
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StmtKind {
    ClassDef {
        name: String,
        bases: Vec<Expr>,
        body: Vec<Stmt>,
    },
    FunctionDef(FunctionDef),
    Assign {
        targets: Vec<Expr>,
        value: Expr,
    },
    AnnAssign {
        target: Expr,
        annotation: Expr,
        value: Option<Expr>,
    },
    AugAssign {
        target: Expr,
        op: Operator,
        value: Expr,
    },
    If {
        test: Expr,
        body: Vec<Stmt>,
        orelse: Vec<Stmt>,
    },
    For {
        target: Expr,
        iter: Expr,
        body: Vec<Stmt>,
        is_async: bool,
    },
    While {
        test: Expr,
        body: Vec<Stmt>,
    },
    Pass,
    Break,
    Continue,
    Return(Option<Expr>),
    Match {
        subject: Expr,
        cases: Vec<MatchCase>,
    },
    Import(Vec<Alias>),
    ImportFrom {
        module: Option<String>,
        names: Vec<Alias>,
    },
    Delete(Vec<Expr>),
    TypeAlias {
        name: Expr,
        value: Expr,
    },
    Expr(Expr),
}

/// `def name(params) -> returns: body`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDef {
    pub name: String,
    pub params: Vec<Param>,
    /// Defaults for the trailing parameters, in order.
    pub defaults: Vec<Expr>,
    pub returns: Option<Expr>,
    pub body: Vec<Stmt>,
    pub decorators: Vec<Expr>,
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    pub name: String,
    pub annotation: Option<Expr>,
}

/// One `case pattern: body` arm of a `match` statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchCase {
    pub line: usize,
    pub pattern: Expr,
    pub body: Vec<Stmt>,
}

/// `name as asname` in an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
    pub asname: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Constant(Constant),
    Name(String),
    Attribute {
        value: Box<Expr>,
        attr: String,
    },
    UnaryOp {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    BinOp {
        left: Box<Expr>,
        op: Operator,
        right: Box<Expr>,
    },
    BoolOp {
        op: BoolOp,
        values: Vec<Expr>,
    },
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },
    Tuple(Vec<Expr>),
    List(Vec<Expr>),
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    /// `left op0 c0 op1 c1 ...`
    Compare {
        left: Box<Expr>,
        ops: Vec<CmpOp>,
        comparators: Vec<Expr>,
    },
    /// `body if test else orelse`
    IfExp {
        test: Box<Expr>,
        body: Box<Expr>,
        orelse: Box<Expr>,
    },
    Subscript {
        value: Box<Expr>,
        slice: Box<Expr>,
    },
    Slice {
        lower: Option<Box<Expr>>,
        upper: Option<Box<Expr>>,
        step: Option<Box<Expr>>,
    },
    Starred(Box<Expr>),
    /// A literal or dotted-name pattern in a `case`.
    MatchValue(Box<Expr>),
    /// A capture pattern; `None` is the wildcard `_`.
    MatchAs {
        name: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Constant {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    Add,
    Sub,
    Mult,
    MatMult,
    Div,
    Mod,
    Pow,
    LShift,
    RShift,
    BitOr,
    BitXor,
    BitAnd,
    FloorDiv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Invert,
    Not,
    UAdd,
    USub,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoolOp {
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    Eq,
    NotEq,
    Lt,
    LtE,
    Gt,
    GtE,
    Is,
    IsNot,
    In,
    NotIn,
}

impl Operator {
    /// Parse the Python spelling of a binary operator (`+`, `//`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "+" => Self::Add,
            "-" => Self::Sub,
            "*" => Self::Mult,
            "@" => Self::MatMult,
            "/" => Self::Div,
            "%" => Self::Mod,
            "**" => Self::Pow,
            "<<" => Self::LShift,
            ">>" => Self::RShift,
            "|" => Self::BitOr,
            "^" => Self::BitXor,
            "&" => Self::BitAnd,
            "//" => Self::FloorDiv,
            _ => return None,
        })
    }
}

impl CmpOp {
    /// Parse the Python spelling of a comparison (`<=`, `is not`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "==" => Self::Eq,
            "!=" | "<>" => Self::NotEq,
            "<" => Self::Lt,
            "<=" => Self::LtE,
            ">" => Self::Gt,
            ">=" => Self::GtE,
            "is" => Self::Is,
            "is not" => Self::IsNot,
            "in" => Self::In,
            "not in" => Self::NotIn,
            _ => return None,
        })
    }
}

impl Stmt {
    pub fn new(line: usize, kind: StmtKind) -> Self {
        Self { line, kind }
    }

    pub fn expr(line: usize, expr: Expr) -> Self {
        Self::new(line, StmtKind::Expr(expr))
    }

    pub fn assign(line: usize, target: Expr, value: Expr) -> Self {
        Self::new(
            line,
            StmtKind::Assign {
                targets: vec![target],
                value,
            },
        )
    }

    pub fn ann_assign(line: usize, target: Expr, annotation: Expr, value: Option<Expr>) -> Self {
        Self::new(
            line,
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
            },
        )
    }

    pub fn if_stmt(line: usize, test: Expr, body: Vec<Stmt>, orelse: Vec<Stmt>) -> Self {
        Self::new(line, StmtKind::If { test, body, orelse })
    }

    pub fn for_loop(line: usize, target: Expr, iter: Expr, body: Vec<Stmt>) -> Self {
        Self::new(
            line,
            StmtKind::For {
                target,
                iter,
                body,
                is_async: false,
            },
        )
    }

    pub fn return_stmt(line: usize, value: Option<Expr>) -> Self {
        Self::new(line, StmtKind::Return(value))
    }

    pub fn function(line: usize, def: FunctionDef) -> Self {
        Self::new(line, StmtKind::FunctionDef(def))
    }

    /// Stable name of the statement kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            StmtKind::ClassDef { .. } => "ClassDef",
            StmtKind::FunctionDef(def) if def.is_async => "AsyncFunctionDef",
            StmtKind::FunctionDef(_) => "FunctionDef",
            StmtKind::Assign { .. } => "Assign",
            StmtKind::AnnAssign { .. } => "AnnAssign",
            StmtKind::AugAssign { .. } => "AugAssign",
            StmtKind::If { .. } => "If",
            StmtKind::For { is_async: true, .. } => "AsyncFor",
            StmtKind::For { .. } => "For",
            StmtKind::While { .. } => "While",
            StmtKind::Pass => "Pass",
            StmtKind::Break => "Break",
            StmtKind::Continue => "Continue",
            StmtKind::Return(_) => "Return",
            StmtKind::Match { .. } => "Match",
            StmtKind::Import(_) => "Import",
            StmtKind::ImportFrom { .. } => "ImportFrom",
            StmtKind::Delete(_) => "Delete",
            StmtKind::TypeAlias { .. } => "TypeAlias",
            StmtKind::Expr(_) => "Expr",
        }
    }
}

impl FunctionDef {
    pub fn new(name: impl Into<String>, params: Vec<Param>, body: Vec<Stmt>) -> Self {
        Self {
            name: name.into(),
            params,
            defaults: Vec::new(),
            returns: None,
            body,
            decorators: Vec::new(),
            is_async: false,
        }
    }

    pub fn with_defaults(mut self, defaults: Vec<Expr>) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_returns(mut self, returns: Expr) -> Self {
        self.returns = Some(returns);
        self
    }

    /// Whether a decorator is the bare name `name` (e.g. `@property`).
    pub fn has_decorator(&self, name: &str) -> bool {
        self.decorators
            .iter()
            .any(|d| matches!(d, Expr::Name(n) if n == name))
    }
}

impl Param {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
        }
    }

    pub fn typed(name: impl Into<String>, annotation: Expr) -> Self {
        Self {
            name: name.into(),
            annotation: Some(annotation),
        }
    }
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Constant(Constant::Int(value))
    }

    pub fn float(value: f64) -> Self {
        Expr::Constant(Constant::Float(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Constant(Constant::Str(value.into()))
    }

    pub fn bool(value: bool) -> Self {
        Expr::Constant(Constant::Bool(value))
    }

    pub fn none() -> Self {
        Expr::Constant(Constant::None)
    }

    pub fn attribute(value: Expr, attr: impl Into<String>) -> Self {
        Expr::Attribute {
            value: Box::new(value),
            attr: attr.into(),
        }
    }

    pub fn call(func: Expr, args: Vec<Expr>) -> Self {
        Expr::Call {
            func: Box::new(func),
            args,
        }
    }

    pub fn binary(left: Expr, op: Operator, right: Expr) -> Self {
        Expr::BinOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    pub fn unary(op: UnaryOp, operand: Expr) -> Self {
        Expr::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    pub fn compare(left: Expr, op: CmpOp, right: Expr) -> Self {
        Expr::Compare {
            left: Box::new(left),
            ops: vec![op],
            comparators: vec![right],
        }
    }

    /// The string value, if this is a string constant.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Constant(Constant::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Stable name of the expression kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Constant(_) => "Constant",
            Expr::Name(_) => "Name",
            Expr::Attribute { .. } => "Attribute",
            Expr::UnaryOp { .. } => "UnaryOp",
            Expr::BinOp { .. } => "BinOp",
            Expr::BoolOp { .. } => "BoolOp",
            Expr::Call { .. } => "Call",
            Expr::Tuple(_) => "Tuple",
            Expr::List(_) => "List",
            Expr::Set(_) => "Set",
            Expr::Dict(_) => "Dict",
            Expr::Compare { .. } => "Compare",
            Expr::IfExp { .. } => "IfExp",
            Expr::Subscript { .. } => "Subscript",
            Expr::Slice { .. } => "Slice",
            Expr::Starred(_) => "Starred",
            Expr::MatchValue(_) => "MatchValue",
            Expr::MatchAs { .. } => "MatchAs",
        }
    }
}
