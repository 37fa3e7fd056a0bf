//! The hook contract every output target implements.

use crate::context::RenderContext;
use crate::ops::OpKind;
use crate::range::{LoopIter, RangeDescriptor};
use glossa_syntax::{Alias, Constant, UnaryOp};

/// A hook's answer when the target has no spelling for a construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unsupported;

pub type HookResult<T = ()> = Result<T, Unsupported>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceKind {
    Tuple,
    List,
    Set,
}

/// One parameter of a function signature, after `self`/`cls` elision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureParam {
    /// Source spelling of the name.
    pub name: String,
    /// Rendered annotation.
    pub annotation: Option<String>,
    /// Rendered default value.
    pub default: Option<String>,
}

/// A function or method header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Source spelling of the name.
    pub name: String,
    pub params: Vec<SignatureParam>,
    /// Rendered return annotation.
    pub returns: Option<String>,
    pub is_async: bool,
    pub is_method: bool,
    /// A method decorated with `@property`.
    pub is_getter: bool,
}

/// An annotated assignment, `target: annotation = value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Declaration<'a> {
    pub target: &'a str,
    pub annotation: &'a str,
    pub value: Option<&'a str>,
    /// The value is a call expression.
    pub value_is_call: bool,
}

/// An output target.
///
/// The translator walks the tree and calls these hooks in a fixed order;
/// backends only decide surface text. Expression hooks return text,
/// statement hooks write into the [`RenderContext`].
pub trait Backend: Send + Sync {
    /// Short target name (e.g., "cpp").
    fn target(&self) -> &'static str;

    /// Human-readable language name (e.g., "C++").
    fn language(&self) -> &'static str;

    // Expressions

    fn operator(&self, op: OpKind) -> &'static str;

    /// Whether operands of `op` are parenthesized when they bind looser.
    fn groups_operands(&self, _op: OpKind) -> bool {
        true
    }

    fn group(&self, text: &str) -> String {
        format!("({})", text)
    }

    fn constant(&self, value: &Constant, annotation: bool) -> HookResult<String>;

    fn name(&self, cx: &RenderContext<'_>, name: &str, annotation: bool) -> String;

    fn attribute(&self, object: &str, member: &str) -> String {
        format!("{}.{}", object, member)
    }

    fn unary(&self, op: UnaryOp, operand: &str) -> String {
        format!("{}{}", self.operator(op.into()), operand)
    }

    fn binary(&self, op: OpKind, operands: &[String]) -> String {
        operands.join(&format!(" {} ", self.operator(op)))
    }

    fn compare(&self, left: &str, rest: &[(OpKind, String)]) -> String;

    fn call(&self, func: &str, args: &[String]) -> HookResult<String>;

    fn sequence(&self, _kind: SequenceKind, _elements: &[String]) -> HookResult<String> {
        Err(Unsupported)
    }

    fn dict(&self, _pairs: &[(String, String)]) -> HookResult<String> {
        Err(Unsupported)
    }

    fn conditional(&self, _test: &str, _body: &str, _orelse: &str) -> HookResult<String> {
        Err(Unsupported)
    }

    fn subscript(&self, value: &str, index: &str) -> HookResult<String> {
        Ok(format!("{}[{}]", value, index))
    }

    fn slice(&self, _value: &str, _range: &RangeDescriptor) -> HookResult<String> {
        Err(Unsupported)
    }

    fn starred(&self, _value: &str) -> HookResult<String> {
        Err(Unsupported)
    }

    /// A `case name:` pattern that binds the subject.
    fn capture_pattern(&self, _name: &str) -> HookResult<String> {
        Err(Unsupported)
    }

    // Comments

    /// Spelling of a single-line comment.
    fn line_comment(&self, text: &str) -> String;

    /// A standalone string or constant statement, already split into lines.
    fn comment(&self, cx: &mut RenderContext<'_>, lines: &[String]);

    /// A docstring, already split into lines.
    fn doc_comment(&self, cx: &mut RenderContext<'_>, lines: &[String]) {
        self.comment(cx, lines);
    }

    // Statements

    fn expression_statement(&self, cx: &mut RenderContext<'_>, code: &str) -> HookResult;

    fn begin_class(&self, _cx: &mut RenderContext<'_>, _name: &str, _bases: &[String]) -> HookResult {
        Err(Unsupported)
    }

    fn end_class(&self, _cx: &mut RenderContext<'_>) -> HookResult {
        Err(Unsupported)
    }

    fn begin_function(&self, cx: &mut RenderContext<'_>, signature: &Signature) -> HookResult;

    fn end_function(&self, cx: &mut RenderContext<'_>) -> HookResult;

    fn declare(&self, cx: &mut RenderContext<'_>, declaration: &Declaration<'_>) -> HookResult;

    fn assign(&self, cx: &mut RenderContext<'_>, targets: &[String], value: &str) -> HookResult;

    fn assign_op(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        op: OpKind,
        value: &str,
    ) -> HookResult;

    fn begin_if(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult;

    fn begin_elif(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult;

    fn begin_else(&self, cx: &mut RenderContext<'_>) -> HookResult;

    /// Close an `if` chain, loop or `match`.
    fn end_block(&self, cx: &mut RenderContext<'_>) -> HookResult;

    fn begin_for(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        iter: LoopIter,
        is_async: bool,
    ) -> HookResult;

    fn begin_while(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult;

    /// `break` or `continue`.
    fn basic_statement(&self, cx: &mut RenderContext<'_>, keyword: &str) -> HookResult;

    fn return_statement(&self, cx: &mut RenderContext<'_>, value: Option<&str>) -> HookResult;

    fn begin_switch(&self, _cx: &mut RenderContext<'_>, _subject: &str) -> HookResult {
        Err(Unsupported)
    }

    /// `pattern` is `None` for the wildcard case.
    fn begin_switch_case(&self, _cx: &mut RenderContext<'_>, _pattern: Option<&str>) -> HookResult {
        Err(Unsupported)
    }

    fn end_switch_case(&self, _cx: &mut RenderContext<'_>) -> HookResult {
        Err(Unsupported)
    }

    fn import(&self, _cx: &mut RenderContext<'_>, _names: &[Alias]) -> HookResult {
        Err(Unsupported)
    }

    fn import_from(
        &self,
        _cx: &mut RenderContext<'_>,
        _module: Option<&str>,
        _names: &[Alias],
    ) -> HookResult {
        Err(Unsupported)
    }

    fn delete(&self, _cx: &mut RenderContext<'_>, _targets: &[String]) -> HookResult {
        Err(Unsupported)
    }

    fn type_alias(&self, _cx: &mut RenderContext<'_>, _name: &str, _value: &str) -> HookResult {
        Err(Unsupported)
    }
}
