//! Shared implementation of the curly-brace targets.
//!
//! [`CurlyBrace`] implements [`Backend`] once for every C-like language: block
//! headers, comment styles, statement terminators, comparison chains. The
//! per-language differences (literals, renames, signatures, declarations)
//! come from its [`CurlyDialect`], and brace placement from its
//! [`IndentationStyle`].

use crate::context::RenderContext;
use crate::indent::IndentationStyle;
use crate::ops::{self, OpKind};
use crate::range::{LoopIter, RangeDescriptor};
use crate::traits::{
    Backend, Declaration, HookResult, SequenceKind, Signature, Unsupported,
};
use glossa_syntax::{Alias, Constant, UnaryOp};

/// The parts of a C-like target that differ between languages.
pub trait CurlyDialect: Send + Sync {
    fn target(&self) -> &'static str;

    fn language(&self) -> &'static str;

    /// Identifiers that get a trailing `_`.
    fn keywords(&self) -> &'static [&'static str];

    fn operator(&self, op: OpKind) -> &'static str {
        ops::c_like(op)
    }

    /// Strip leading/trailing underscores and escape keyword collisions.
    fn styled_name(&self, name: &str) -> String {
        let name = name.trim_matches('_');
        if self.keywords().contains(&name) {
            format!("{}_", name)
        } else {
            name.to_string()
        }
    }

    fn constant(&self, value: &Constant, annotation: bool) -> String {
        json_literal(value, annotation)
    }

    /// Well-known global renames; `None` falls back to [`styled_name`](Self::styled_name).
    fn rename(&self, _name: &str, _annotation: bool) -> Option<String> {
        None
    }

    /// Well-known attribute renames; `None` falls back to `object.member`.
    fn rename_attribute(&self, _object: &str, _member: &str) -> Option<String> {
        None
    }

    fn call(&self, func: &str, args: &[String]) -> String {
        format!("{}({})", func, args.join(", "))
    }

    fn sequence(&self, kind: SequenceKind, elements: &[String]) -> String;

    fn dict(&self, pairs: &[(String, String)]) -> String;

    fn slice(&self, _value: &str, _range: &RangeDescriptor) -> HookResult<String> {
        Err(Unsupported)
    }

    fn capture_pattern(&self, _name: &str) -> HookResult<String> {
        Err(Unsupported)
    }

    fn class_header(&self, name: &str, bases: &[String]) -> String;

    /// Token that closes a class body.
    fn class_closer(&self) -> &'static str {
        "}"
    }

    fn function_header(&self, cx: &RenderContext<'_>, signature: &Signature) -> HookResult<String>;

    /// The full declaration statement, terminator included.
    fn declaration(&self, cx: &RenderContext<'_>, declaration: &Declaration<'_>) -> String;

    /// Declaration keyword or type of a counting loop variable.
    fn counter_type(&self) -> &'static str;

    /// Header of a loop over the elements of `items`.
    fn each_loop(&self, target: &str, items: &str, is_async: bool) -> HookResult<String>;

    fn import(&self, _names: &[Alias]) -> HookResult<Vec<String>> {
        Err(Unsupported)
    }

    fn import_from(&self, _module: Option<&str>, _names: &[Alias]) -> HookResult<Vec<String>> {
        Err(Unsupported)
    }

    fn delete(&self, targets: &[String]) -> Vec<String> {
        vec![format!("delete {};", targets.join(", "))]
    }

    fn type_alias(&self, name: &str, value: &str) -> String;
}

/// Literal spelling shared by the C-like targets: JSON strings, lowercase
/// booleans, `null`.
pub fn json_literal(value: &Constant, _annotation: bool) -> String {
    match value {
        Constant::None => "null".into(),
        Constant::Bool(value) => value.to_string(),
        Constant::Int(value) => value.to_string(),
        Constant::Float(value) => crate::naming::py_float_repr(*value),
        Constant::Str(value) => {
            serde_json::to_string(value).unwrap_or_else(|_| format!("\"{}\"", value))
        }
    }
}

/// A curly-brace target: a dialect plus a brace style.
pub struct CurlyBrace<D> {
    pub dialect: D,
    pub style: &'static dyn IndentationStyle,
}

impl<D: CurlyDialect> CurlyBrace<D> {
    pub const fn new(dialect: D, style: &'static dyn IndentationStyle) -> Self {
        Self { dialect, style }
    }

    fn push_all(&self, cx: &mut RenderContext<'_>, lines: &[String]) {
        for line in lines {
            cx.push_code(line);
        }
    }
}

impl<D: CurlyDialect> Backend for CurlyBrace<D> {
    fn target(&self) -> &'static str {
        self.dialect.target()
    }

    fn language(&self) -> &'static str {
        self.dialect.language()
    }

    fn operator(&self, op: OpKind) -> &'static str {
        self.dialect.operator(op)
    }

    fn constant(&self, value: &Constant, annotation: bool) -> HookResult<String> {
        Ok(self.dialect.constant(value, annotation))
    }

    fn name(&self, cx: &RenderContext<'_>, name: &str, annotation: bool) -> String {
        if let Some(renamed) = self.dialect.rename(name, annotation) {
            return renamed;
        }
        if cx.in_method() && name == "self" {
            return "this".into();
        }
        self.dialect.styled_name(name)
    }

    fn attribute(&self, object: &str, member: &str) -> String {
        self.dialect
            .rename_attribute(object, member)
            .unwrap_or_else(|| format!("{}.{}", object, self.dialect.styled_name(member)))
    }

    fn unary(&self, op: UnaryOp, operand: &str) -> String {
        format!("{}{}", self.operator(op.into()), operand)
    }

    fn compare(&self, left: &str, rest: &[(OpKind, String)]) -> String {
        let mut left = left;
        let mut parts = Vec::with_capacity(rest.len());
        for (op, right) in rest {
            parts.push(format!("{} {} {}", left, self.operator(*op), right));
            left = right.as_str();
        }
        if parts.len() == 1 {
            parts.remove(0)
        } else {
            format!("({})", parts.join(" && "))
        }
    }

    fn call(&self, func: &str, args: &[String]) -> HookResult<String> {
        Ok(self.dialect.call(func, args))
    }

    fn sequence(&self, kind: SequenceKind, elements: &[String]) -> HookResult<String> {
        Ok(self.dialect.sequence(kind, elements))
    }

    fn dict(&self, pairs: &[(String, String)]) -> HookResult<String> {
        Ok(self.dialect.dict(pairs))
    }

    fn conditional(&self, test: &str, body: &str, orelse: &str) -> HookResult<String> {
        Ok(format!("{} ? {} : {}", test, body, orelse))
    }

    fn slice(&self, value: &str, range: &RangeDescriptor) -> HookResult<String> {
        self.dialect.slice(value, range)
    }

    fn starred(&self, value: &str) -> HookResult<String> {
        Ok(format!("...{}", value))
    }

    fn capture_pattern(&self, name: &str) -> HookResult<String> {
        self.dialect.capture_pattern(name)
    }

    fn line_comment(&self, text: &str) -> String {
        format!("// {}", text)
    }

    fn comment(&self, cx: &mut RenderContext<'_>, lines: &[String]) {
        match lines {
            [] => cx.push_code(""),
            [line] => cx.push_code(&self.line_comment(line)),
            lines => {
                cx.push_code("/*");
                self.push_all(cx, lines);
                cx.push_code("*/");
            }
        }
    }

    fn doc_comment(&self, cx: &mut RenderContext<'_>, lines: &[String]) {
        cx.push_code("/**");
        for line in lines {
            if line.is_empty() {
                cx.push_code(" *");
            } else {
                cx.push_code(&format!(" * {}", line));
            }
        }
        cx.push_code(" */");
    }

    fn expression_statement(&self, cx: &mut RenderContext<'_>, code: &str) -> HookResult {
        cx.push_code(&format!("{};", code));
        Ok(())
    }

    fn begin_class(&self, cx: &mut RenderContext<'_>, name: &str, bases: &[String]) -> HookResult {
        let header = self.dialect.class_header(name, bases);
        self.style.begin_block(cx, &header);
        Ok(())
    }

    fn end_class(&self, cx: &mut RenderContext<'_>) -> HookResult {
        self.style.close_block(cx, self.dialect.class_closer());
        Ok(())
    }

    fn begin_function(&self, cx: &mut RenderContext<'_>, signature: &Signature) -> HookResult {
        let header = self.dialect.function_header(cx, signature)?;
        self.style.begin_block(cx, &header);
        Ok(())
    }

    fn end_function(&self, cx: &mut RenderContext<'_>) -> HookResult {
        self.style.end_block(cx);
        Ok(())
    }

    fn declare(&self, cx: &mut RenderContext<'_>, declaration: &Declaration<'_>) -> HookResult {
        let code = self.dialect.declaration(cx, declaration);
        cx.push_code(&code);
        Ok(())
    }

    fn assign(&self, cx: &mut RenderContext<'_>, targets: &[String], value: &str) -> HookResult {
        cx.push_code(&format!("{} = {};", targets.join(" = "), value));
        Ok(())
    }

    fn assign_op(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        op: OpKind,
        value: &str,
    ) -> HookResult {
        cx.push_code(&format!("{} {}= {};", target, self.operator(op), value));
        Ok(())
    }

    fn begin_if(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        self.style.begin_block(cx, &format!("if ( {} )", test));
        Ok(())
    }

    fn begin_elif(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        self.style.mid_block(cx, &format!("else if ( {} )", test));
        Ok(())
    }

    fn begin_else(&self, cx: &mut RenderContext<'_>) -> HookResult {
        self.style.mid_block(cx, "else");
        Ok(())
    }

    fn end_block(&self, cx: &mut RenderContext<'_>) -> HookResult {
        self.style.end_block(cx);
        Ok(())
    }

    fn begin_for(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        iter: LoopIter,
        is_async: bool,
    ) -> HookResult {
        let header = match iter {
            LoopIter::Range { mut range, .. } => {
                if is_async {
                    return Err(Unsupported);
                }
                range.fill_defaults(|n| self.dialect.constant(&Constant::Int(n), false), false);
                let start = range.start.unwrap_or_default();
                let stop = range.stop.ok_or(Unsupported)?;
                let step = match range.step {
                    Some(step) => format!("{} += {}", target, step),
                    None => format!("{}++", target),
                };
                format!(
                    "for ( {} {} = {}; {} < {}; {} )",
                    self.dialect.counter_type(),
                    target,
                    start,
                    target,
                    stop,
                    step
                )
            }
            LoopIter::Items(items) => self.dialect.each_loop(target, &items, is_async)?,
        };
        self.style.begin_block(cx, &header);
        Ok(())
    }

    fn begin_while(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        self.style.begin_block(cx, &format!("while ( {} )", test));
        Ok(())
    }

    fn basic_statement(&self, cx: &mut RenderContext<'_>, keyword: &str) -> HookResult {
        cx.push_code(&format!("{};", keyword));
        Ok(())
    }

    fn return_statement(&self, cx: &mut RenderContext<'_>, value: Option<&str>) -> HookResult {
        match value {
            Some(value) => cx.push_code(&format!("return {};", value)),
            None => cx.push_code("return;"),
        }
        Ok(())
    }

    fn begin_switch(&self, cx: &mut RenderContext<'_>, subject: &str) -> HookResult {
        self.style.begin_block(cx, &format!("switch ( {} )", subject));
        Ok(())
    }

    fn begin_switch_case(&self, cx: &mut RenderContext<'_>, pattern: Option<&str>) -> HookResult {
        match pattern {
            Some(pattern) => cx.push_code(&format!("case {}:", pattern)),
            None => cx.push_code("default:"),
        }
        Ok(())
    }

    fn end_switch_case(&self, cx: &mut RenderContext<'_>) -> HookResult {
        cx.push_code("break;");
        Ok(())
    }

    fn import(&self, cx: &mut RenderContext<'_>, names: &[Alias]) -> HookResult {
        let lines = self.dialect.import(names)?;
        self.push_all(cx, &lines);
        Ok(())
    }

    fn import_from(
        &self,
        cx: &mut RenderContext<'_>,
        module: Option<&str>,
        names: &[Alias],
    ) -> HookResult {
        let lines = self.dialect.import_from(module, names)?;
        self.push_all(cx, &lines);
        Ok(())
    }

    fn delete(&self, cx: &mut RenderContext<'_>, targets: &[String]) -> HookResult {
        let lines = self.dialect.delete(targets);
        self.push_all(cx, &lines);
        Ok(())
    }

    fn type_alias(&self, cx: &mut RenderContext<'_>, name: &str, value: &str) -> HookResult {
        cx.push_code(&self.dialect.type_alias(name, value));
        Ok(())
    }
}

/// `name(a, b = d)` parameter lists; `param` spells one parameter.
pub fn parameter_list<F>(signature: &Signature, mut param: F) -> String
where
    F: FnMut(&crate::traits::SignatureParam) -> String,
{
    let params: Vec<String> = signature
        .params
        .iter()
        .map(|p| match &p.default {
            Some(default) => format!("{} = {}", param(p), default),
            None => param(p),
        })
        .collect();
    params.join(", ")
}
