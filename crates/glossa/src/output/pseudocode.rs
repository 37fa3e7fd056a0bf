//! LaTeX pseudocode output.
//!
//! Statements become indented sentences with inline `$…$` math. Members and
//! methods of a narrated subject (by default `shape`) read as prose:
//! `shape.add_vertex(p)` renders as `Add vertex $p$` and `shape.closed =
//! True` as `Set shape closed`.

use crate::context::RenderContext;
use crate::naming::{py_float_repr, py_str_repr, snake_sentence, snake_to_lower_camel};
use crate::ops::OpKind;
use crate::range::LoopIter;
use crate::traits::{Backend, Declaration, HookResult, Signature, Unsupported};
use glossa_syntax::{Alias, BoolOp, CmpOp, Constant, Operator, UnaryOp};
use std::borrow::Cow;

/// Static instance for registry.
pub static PSEUDOCODE_BACKEND: PseudoCode = PseudoCode::new(Some(Cow::Borrowed("shape")));

/// Pseudocode backend.
#[derive(Debug, Clone)]
pub struct PseudoCode {
    /// Name of the narrated object; `None` renders every member as math.
    pub subject: Option<Cow<'static, str>>,
}

impl Default for PseudoCode {
    fn default() -> Self {
        Self::new(Some(Cow::Borrowed("shape")))
    }
}

impl PseudoCode {
    pub const fn new(subject: Option<Cow<'static, str>>) -> Self {
        Self { subject }
    }

    fn is_subject(&self, name: &str) -> bool {
        self.subject.as_deref() == Some(name)
    }

    /// Name spelling before vector decoration.
    fn convert(&self, name: &str, annotation: bool) -> String {
        if annotation {
            match name {
                "float" => return r"\mathbb{R}".into(),
                "int" => return r"\mathbb{Z}".into(),
                "Vector2D" => return r"\mathbb{R}^2".into(),
                _ => {}
            }
        }
        match name {
            "min" | "max" | "alpha" | "beta" | "theta" => return format!("\\{}", name),
            _ => {}
        }

        let name = name.trim_matches('_');
        match name.rsplit_once('_') {
            Some((head, tail)) => format!("{}_{{{}}}", snake_to_lower_camel(head), tail),
            None => name.to_string(),
        }
    }

    /// Wrap `text` in `\vec{}` when `name` was declared with a vector type.
    fn decorate(&self, cx: &RenderContext<'_>, name: &str, text: String) -> String {
        if cx.var_type(name).starts_with(r"\mathbb{R}^") {
            format!("\\vec{{{}}}", text)
        } else {
            text
        }
    }

    fn math(text: &str) -> String {
        format!("${}$", text)
    }
}

impl Backend for PseudoCode {
    fn target(&self) -> &'static str {
        "pseudo"
    }

    fn language(&self) -> &'static str {
        "Pseudo-Code"
    }

    fn operator(&self, op: OpKind) -> &'static str {
        match op {
            OpKind::Compare(op) => match op {
                CmpOp::Eq | CmpOp::Is => "=",
                CmpOp::NotEq | CmpOp::IsNot => r"\neq",
                CmpOp::Lt => "<",
                CmpOp::LtE => r"\leq",
                CmpOp::Gt => ">",
                CmpOp::GtE => r"\geq",
                CmpOp::In => r"\in",
                CmpOp::NotIn => r"\notin",
            },
            OpKind::Binary(op) => match op {
                Operator::Add => "+",
                Operator::Sub => "-",
                Operator::Mult => r"\cdot",
                Operator::MatMult => r"\times",
                Operator::Div => r"\frac",
                Operator::Mod => "%",
                Operator::LShift => "<<",
                Operator::RShift => ">>",
                Operator::BitOr => "|",
                Operator::BitXor | Operator::Pow => "^",
                Operator::BitAnd => "&",
                Operator::FloorDiv => "//",
            },
            OpKind::Unary(op) => match op {
                UnaryOp::Invert => "~",
                UnaryOp::Not => r"\neg",
                UnaryOp::UAdd => "+",
                UnaryOp::USub => "-",
            },
            OpKind::Bool(BoolOp::And) => r"\land",
            OpKind::Bool(BoolOp::Or) => r"\lor",
        }
    }

    fn groups_operands(&self, op: OpKind) -> bool {
        op != OpKind::Binary(Operator::Div)
    }

    fn group(&self, text: &str) -> String {
        format!(r"\left({}\right)", text)
    }

    fn constant(&self, value: &Constant, _annotation: bool) -> HookResult<String> {
        Ok(match value {
            Constant::None => "nil".into(),
            Constant::Bool(value) => value.to_string(),
            Constant::Int(value) => value.to_string(),
            Constant::Float(value) => py_float_repr(*value),
            Constant::Str(value) => py_str_repr(value),
        })
    }

    fn name(&self, cx: &RenderContext<'_>, name: &str, annotation: bool) -> String {
        let converted = self.convert(name, annotation);
        self.decorate(cx, name, converted)
    }

    fn attribute(&self, object: &str, member: &str) -> String {
        if self.is_subject(object) {
            if member == "closed" {
                return format!("{} closed", object);
            }
            return snake_sentence(member, true);
        }
        if object == "math" {
            return format!("\\{}", member);
        }
        format!("{}.{}", object, member)
    }

    fn unary(&self, op: UnaryOp, operand: &str) -> String {
        match op {
            UnaryOp::Not => format!(r"\neg {}", operand),
            op => format!("{}{}", self.operator(op.into()), operand),
        }
    }

    fn binary(&self, op: OpKind, operands: &[String]) -> String {
        match (op, operands) {
            (OpKind::Binary(Operator::Div), [numerator, denominator]) => {
                format!(r"\frac{{{}}}{{{}}}", numerator, denominator)
            }
            _ => operands.join(&format!(" {} ", self.operator(op))),
        }
    }

    fn compare(&self, left: &str, rest: &[(OpKind, String)]) -> String {
        let mut code = left.to_string();
        for (op, right) in rest {
            code.push_str(&format!(" {} {}", self.operator(*op), right));
        }
        code
    }

    fn call(&self, func: &str, args: &[String]) -> HookResult<String> {
        let joined = args.join(", ");
        Ok(match (func, args) {
            ("int", [value]) => value.clone(),
            ("round", _) => format!(r"\lfloor {} \rceil", joined),
            ("floor", _) => format!(r"\lfloor {} \rfloor", joined),
            ("ceil", _) => format!(r"\lceil {} \rceil", joined),
            ("range", [stop]) => format!("[0, {})", stop),
            ("range", [start, stop]) => format!("[{}, {})", start, stop),
            ("range", [start, stop, step]) => {
                format!(r"[{}, {}) \text{{ by }} {}", start, stop, step)
            }
            ("range", _) => return Err(Unsupported),
            ("Vector2D", _) => format!(r"\left({}\right)", joined),
            (sentence, []) if sentence.contains(' ') => sentence.to_string(),
            (sentence, _) if sentence.contains(' ') => format!("{} ${}$", sentence, joined),
            (func, _) => format!(r"{}\left({}\right)", func, joined),
        })
    }

    fn line_comment(&self, text: &str) -> String {
        text.to_string()
    }

    fn comment(&self, cx: &mut RenderContext<'_>, lines: &[String]) {
        if lines.is_empty() {
            cx.push_code("");
        }
        for line in lines {
            cx.push_code(line);
        }
    }

    fn expression_statement(&self, cx: &mut RenderContext<'_>, code: &str) -> HookResult {
        if code.contains(' ') || code.contains('$') {
            cx.push_code(code);
        } else {
            cx.push_code(&Self::math(code));
        }
        Ok(())
    }

    fn begin_function(&self, cx: &mut RenderContext<'_>, signature: &Signature) -> HookResult {
        cx.push_code(&snake_sentence(signature.name.trim_matches('_'), true));

        let skip = usize::from(
            signature
                .params
                .first()
                .is_some_and(|param| self.is_subject(&param.name)),
        );
        let inputs = &signature.params[skip..];
        if inputs.is_empty() {
            return Ok(());
        }

        cx.indent_up();
        cx.push_code("Inputs:");
        cx.indent_up();
        for param in inputs {
            cx.declare_var(param.name.as_str(), param.annotation.as_deref().unwrap_or(""));
            let mut input = self.name(cx, &param.name, false);
            if let Some(annotation) = &param.annotation {
                input.push_str(&format!(r" \in {}", annotation));
            }
            if let Some(default) = &param.default {
                input.push_str(&format!(" = {}", default));
            }
            cx.push_code(&Self::math(&input));
        }
        cx.indent_down();
        cx.push_code("");
        cx.indent_down();
        Ok(())
    }

    fn end_function(&self, _cx: &mut RenderContext<'_>) -> HookResult {
        Ok(())
    }

    fn declare(&self, cx: &mut RenderContext<'_>, declaration: &Declaration<'_>) -> HookResult {
        let code = match declaration.value {
            Some(value) => format!(r"{} \coloneq {}", declaration.target, value),
            None => format!(r"{} \in {}", declaration.target, declaration.annotation),
        };
        cx.push_code(&Self::math(&code));
        Ok(())
    }

    fn assign(&self, cx: &mut RenderContext<'_>, targets: &[String], value: &str) -> HookResult {
        for target in targets {
            let code = if target.contains(' ') {
                match value {
                    "true" => format!("Set {}", target),
                    "false" => format!("Unset {}", target),
                    value => format!("Set {} to {}", target, value),
                }
            } else {
                Self::math(&format!(r"{} \coloneq {}", target, value))
            };
            cx.push_code(&code);
        }
        Ok(())
    }

    fn assign_op(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        op: OpKind,
        value: &str,
    ) -> HookResult {
        let value = if value.contains(' ') && self.groups_operands(op) {
            self.group(value)
        } else {
            value.to_string()
        };
        let combined = self.binary(op, &[target.to_string(), value]);
        cx.push_code(&Self::math(&format!(r"{} \coloneq {}", target, combined)));
        Ok(())
    }

    fn begin_if(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        cx.push_code(&format!("If {}", Self::math(test)));
        Ok(())
    }

    fn begin_elif(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        cx.push_code(&format!("Otherwise, if {}", Self::math(test)));
        Ok(())
    }

    fn begin_else(&self, cx: &mut RenderContext<'_>) -> HookResult {
        cx.push_code("Otherwise");
        Ok(())
    }

    fn end_block(&self, _cx: &mut RenderContext<'_>) -> HookResult {
        Ok(())
    }

    fn begin_for(
        &self,
        cx: &mut RenderContext<'_>,
        target: &str,
        iter: LoopIter,
        _is_async: bool,
    ) -> HookResult {
        let items = match iter {
            LoopIter::Range { call, .. } => call,
            LoopIter::Items(items) => items,
        };
        cx.push_code(&format!(
            "For each {} in {}",
            Self::math(target),
            Self::math(&items)
        ));
        Ok(())
    }

    fn begin_while(&self, cx: &mut RenderContext<'_>, test: &str) -> HookResult {
        cx.push_code(&format!("While {}", Self::math(test)));
        Ok(())
    }

    fn basic_statement(&self, cx: &mut RenderContext<'_>, keyword: &str) -> HookResult {
        cx.push_code(&snake_sentence(keyword, true));
        Ok(())
    }

    fn return_statement(&self, cx: &mut RenderContext<'_>, value: Option<&str>) -> HookResult {
        match value {
            Some(value) => cx.push_code(&format!("Return {}", Self::math(value))),
            None => cx.push_code("Return"),
        }
        Ok(())
    }

    fn import(&self, _cx: &mut RenderContext<'_>, _names: &[Alias]) -> HookResult {
        Ok(())
    }
}

#[cfg(all(test, feature = "read-python"))]
mod tests {
    use super::*;
    use crate::comments::CommentIndex;
    use crate::translator::AstTranslator;
    use glossa_syntax::read_python;

    fn render_with(backend: &PseudoCode, source: &str) -> String {
        let module = read_python(source).unwrap();
        let comments = CommentIndex::scan(source);
        AstTranslator::new(backend, &comments)
            .translate(&module)
            .unwrap()
    }

    fn render(source: &str) -> String {
        render_with(&PSEUDOCODE_BACKEND, source)
    }

    #[test]
    fn test_function_inputs() {
        let source = "\
def ellipse(shape, center: Vector2D, radius_x: float, steps: int = 4):
    # Walk the outline
    for i in range(steps):
        angle: float = i / steps * math.pi
        shape.add_vertex(center + radius_x * math.cos(angle))
    shape.closed = True
";
        insta::assert_snapshot!(render(source), @r"
        Ellipse
            Inputs:
                $\vec{center} \in \mathbb{R}^2$
                $radius_{x} \in \mathbb{R}$
                $steps \in \mathbb{Z} = 4$

            Walk the outline
            For each $i$ in $[0, steps)$
                $angle \coloneq \frac{i}{steps} \cdot \pi$
                Add vertex $\vec{center} + radius_{x} \cdot \cos\left(angle\right)$
            Set shape closed
        ");
    }

    #[test]
    fn test_names_and_calls() {
        assert_eq!(render("x = round(y)\n"), "$x \\coloneq \\lfloor y \\rceil$\n");
        assert_eq!(render("x = int(y)\n"), "$x \\coloneq y$\n");
        assert_eq!(render("x = max(alpha, theta)\n"), "$x \\coloneq \\max\\left(\\alpha, \\theta\\right)$\n");
        assert_eq!(render("x = Vector2D(a, b)\n"), "$x \\coloneq \\left(a, b\\right)$\n");
        assert_eq!(render("first_point_x = None\n"), "$firstPoint_{x} \\coloneq nil$\n");
    }

    #[test]
    fn test_control_flow() {
        let source = "\
while not done:
    if a <= b:
        break
    elif a != b:
        continue
    else:
        return a
";
        insta::assert_snapshot!(render(source), @r"
        While $\neg done$
            If $a \leq b$
                Break
            Otherwise, if $a \neq b$
                Continue
            Otherwise
                Return $a$
        ");
    }

    #[test]
    fn test_assignments() {
        assert_eq!(render("x: float\n"), "$x \\in \\mathbb{R}$\n");
        assert_eq!(render("x -= a + b\n"), "$x \\coloneq x - \\left(a + b\\right)$\n");
        assert_eq!(render("x /= 2\n"), "$x \\coloneq \\frac{x}{2}$\n");
        assert_eq!(render("shape.closed = False\n"), "Unset shape closed\n");
        assert_eq!(render("shape.line_width = 3\n"), "Set Line width to 3\n");
        assert_eq!(render("shape.close_path()\n"), "Close path\n");
        assert_eq!(render("f(x)\n"), "$f\\left(x\\right)$\n");
    }

    #[test]
    fn test_without_subject() {
        let plain = PseudoCode::new(None);
        assert_eq!(render_with(&plain, "shape.closed = True\n"), "$shape.closed \\coloneq true$\n");
    }

    #[test]
    fn test_vector_shadowing() {
        let source = "\
p: Vector2D = Vector2D(0, 0)
def f(p: float):
    return p
x = p
";
        let out = render(source);
        assert!(out.starts_with("$\\vec{p} \\coloneq \\left(0, 0\\right)$\n"));
        assert!(out.contains("    Return $p$\n"));
        assert!(out.ends_with("$x \\coloneq \\vec{p}$\n"));
    }

    #[test]
    fn test_unsupported_constructs() {
        for source in ["class A:\n    pass\n", "x = [1, 2]\n", "del x\n"] {
            let module = read_python(source).unwrap();
            let comments = CommentIndex::default();
            let result = AstTranslator::new(&PSEUDOCODE_BACKEND, &comments).translate(&module);
            assert!(result.is_err(), "{source:?} should be unsupported");
        }
        assert_eq!(render("import math\n"), "");
    }
}
