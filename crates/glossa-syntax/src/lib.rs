//! Syntax tree for documentation snippets.
//!
//! `glossa-syntax` holds the tree that `glossa` renders into its output
//! targets, plus the reader that produces it. The tree is deliberately close
//! to Python's `ast` module: snippets are written once in Python and the
//! renderers re-sugar the same shapes Python's parser produces (an `elif` is
//! a lone `If` inside the `orelse` of its parent, for example).
//!
//! # Example
//!
//! ```ignore
//! use glossa_syntax::{input, StmtKind};
//!
//! let module = input::read_python("x: float = 1.5")?;
//! assert!(matches!(module.body[0].kind, StmtKind::AnnAssign { .. }));
//! ```
//!
//! Every statement carries the source line it starts on. Comments are not
//! part of the tree; `glossa` recovers them from the raw text and matches
//! them back up by line.

pub mod ast;
pub mod input;
pub mod traits;

pub use ast::{
    Alias, BoolOp, CmpOp, Constant, Expr, FunctionDef, MatchCase, Module, Operator, Param, Stmt,
    StmtKind, UnaryOp,
};

pub use traits::{ReadError, Reader};

#[cfg(feature = "read-python")]
pub use input::python::{PYTHON_READER, PythonReader, read_python};
