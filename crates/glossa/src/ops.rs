//! Operator kinds, the C-like spelling table, and Python precedence.

use glossa_syntax::{BoolOp, CmpOp, Expr, Operator, UnaryOp};

/// Any operator that can appear in an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Binary(Operator),
    Unary(UnaryOp),
    Bool(BoolOp),
    Compare(CmpOp),
}

impl From<Operator> for OpKind {
    fn from(op: Operator) -> Self {
        OpKind::Binary(op)
    }
}

impl From<UnaryOp> for OpKind {
    fn from(op: UnaryOp) -> Self {
        OpKind::Unary(op)
    }
}

impl From<BoolOp> for OpKind {
    fn from(op: BoolOp) -> Self {
        OpKind::Bool(op)
    }
}

impl From<CmpOp> for OpKind {
    fn from(op: CmpOp) -> Self {
        OpKind::Compare(op)
    }
}

/// Operator spellings shared by the curly-brace targets.
pub fn c_like(op: OpKind) -> &'static str {
    match op {
        OpKind::Compare(op) => match op {
            CmpOp::Eq | CmpOp::Is => "==",
            CmpOp::NotEq | CmpOp::IsNot => "!=",
            CmpOp::Lt => "<",
            CmpOp::LtE => "<=",
            CmpOp::Gt => ">",
            CmpOp::GtE => ">=",
            CmpOp::In => "<in>",
            CmpOp::NotIn => "<not in>",
        },
        OpKind::Binary(op) => match op {
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mult | Operator::MatMult => "*",
            Operator::Div => "/",
            Operator::Mod => "%",
            Operator::LShift => "<<",
            Operator::RShift => ">>",
            Operator::BitOr => "|",
            Operator::BitXor => "^",
            Operator::BitAnd => "&",
            Operator::FloorDiv => "//",
            Operator::Pow => "**",
        },
        OpKind::Unary(op) => match op {
            UnaryOp::Invert => "~",
            UnaryOp::Not => "!",
            UnaryOp::UAdd => "+",
            UnaryOp::USub => "-",
        },
        OpKind::Bool(op) => match op {
            BoolOp::And => "&&",
            BoolOp::Or => "||",
        },
    }
}

// Python binding strength, loosest first.
pub const PREC_CONDITIONAL: u8 = 0;
pub const PREC_OR: u8 = 1;
pub const PREC_AND: u8 = 2;
pub const PREC_NOT: u8 = 3;
pub const PREC_COMPARE: u8 = 4;
pub const PREC_UNARY: u8 = 11;
pub const PREC_POWER: u8 = 12;
pub const PREC_ATOM: u8 = 13;

impl OpKind {
    pub fn precedence(self) -> u8 {
        match self {
            OpKind::Bool(BoolOp::Or) => PREC_OR,
            OpKind::Bool(BoolOp::And) => PREC_AND,
            OpKind::Unary(UnaryOp::Not) => PREC_NOT,
            OpKind::Unary(_) => PREC_UNARY,
            OpKind::Compare(_) => PREC_COMPARE,
            OpKind::Binary(op) => match op {
                Operator::BitOr => 5,
                Operator::BitXor => 6,
                Operator::BitAnd => 7,
                Operator::LShift | Operator::RShift => 8,
                Operator::Add | Operator::Sub => 9,
                Operator::Mult
                | Operator::MatMult
                | Operator::Div
                | Operator::FloorDiv
                | Operator::Mod => 10,
                Operator::Pow => PREC_POWER,
            },
        }
    }
}

/// How tightly an expression binds when used as an operand.
pub fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::IfExp { .. } => PREC_CONDITIONAL,
        Expr::BoolOp { op, .. } => OpKind::from(*op).precedence(),
        Expr::UnaryOp { op, .. } => OpKind::from(*op).precedence(),
        Expr::Compare { .. } => PREC_COMPARE,
        Expr::BinOp { op, .. } => OpKind::from(*op).precedence(),
        Expr::Starred(_) => PREC_CONDITIONAL,
        _ => PREC_ATOM,
    }
}
