//! The tree walk shared by every target.
//!
//! [`AstTranslator`] visits each node once, renders child expressions to
//! text, and hands that text to the [`Backend`] hooks in a fixed order.
//! Backends never recurse into the tree themselves, so traversal order,
//! scoping and comment replay are identical for every target.

use crate::comments::CommentIndex;
use crate::context::{IndentUnit, RenderContext};
use crate::error::RenderError;
use crate::naming::{clean_doc, py_float_repr};
use crate::ops::{OpKind, PREC_ATOM, PREC_COMPARE, PREC_CONDITIONAL, PREC_UNARY, precedence};
use crate::range::{LoopIter, RangeDescriptor};
use crate::traits::{Backend, Declaration, SequenceKind, Signature, SignatureParam, Unsupported};
use glossa_syntax::{Constant, Expr, FunctionDef, MatchCase, Module, Operator, Stmt, StmtKind};
use std::fmt::Debug;
use tracing::trace;

/// Index into `defaults` of the default for parameter `index`, out of
/// `params` parameters with `defaults` trailing defaults.
pub fn default_index(params: usize, defaults: usize, index: usize) -> Option<usize> {
    let reverse = params.checked_sub(index)?;
    defaults.checked_sub(reverse)
}

fn unsupported(target: &'static str, kind: &'static str, node: &impl Debug) -> RenderError {
    RenderError::Unsupported {
        target,
        kind,
        fields: format!("{:?}", node),
    }
}

/// Renders one tree through one backend. Build a fresh one per render.
pub struct AstTranslator<'a> {
    backend: &'a dyn Backend,
    comments: &'a CommentIndex,
    cx: RenderContext<'a>,
}

impl<'a> AstTranslator<'a> {
    pub fn new(backend: &'a dyn Backend, comments: &'a CommentIndex) -> Self {
        Self {
            backend,
            comments,
            cx: RenderContext::new(backend, comments, IndentUnit::default()),
        }
    }

    /// Use a different indentation unit.
    pub fn with_indent(mut self, indent: IndentUnit) -> Self {
        self.cx = RenderContext::new(self.backend, self.comments, indent);
        self
    }

    /// Render `module`, replaying every recovered comment.
    pub fn translate(mut self, module: &Module) -> Result<String, RenderError> {
        self.render(module)?;
        Ok(self.finish())
    }

    /// Walk `module`, leaving comments past its last statement unreplayed.
    pub fn render(&mut self, module: &Module) -> Result<(), RenderError> {
        self.block(&module.body)
    }

    /// Whether every recovered comment has been replayed so far.
    pub fn comments_replayed(&self) -> bool {
        self.cx.is_exhausted()
    }

    /// Emit the comments left after the last statement and return the text.
    pub fn finish(mut self) -> String {
        self.cx.finish();
        self.cx.into_output()
    }

    fn block(&mut self, body: &[Stmt]) -> Result<(), RenderError> {
        self.cx.push_scope();
        let result = body.iter().try_for_each(|stmt| self.stmt(stmt));
        self.cx.pop_scope();
        result
    }

    /// Render `body` one level deeper.
    fn nested(&mut self, body: &[Stmt], class_name: Option<&str>) -> Result<(), RenderError> {
        let frame = self.cx.enter(class_name);
        let result = self.block(body);
        self.cx.leave(frame);
        result
    }

    /// Emit a leading docstring and return the rest of the body.
    fn docstring<'b>(&mut self, body: &'b [Stmt]) -> &'b [Stmt] {
        match body.split_first() {
            Some((
                Stmt {
                    kind: StmtKind::Expr(Expr::Constant(Constant::Str(doc))),
                    ..
                },
                rest,
            )) => {
                let doc = doc.strip_prefix('!').unwrap_or(doc);
                self.backend.doc_comment(&mut self.cx, &clean_doc(doc));
                rest
            }
            _ => body,
        }
    }

    fn stmt(&mut self, stmt: &Stmt) -> Result<(), RenderError> {
        trace!(line = stmt.line, kind = stmt.kind_name(), "render statement");
        self.cx.prepare(stmt.line);

        let target = self.backend.target();
        let fail = |Unsupported| unsupported(target, stmt.kind_name(), &stmt.kind);

        match &stmt.kind {
            StmtKind::ClassDef { name, bases, body } => {
                let body = self.docstring(body);
                let bases = self.exprs(bases, true)?;
                self.backend
                    .begin_class(&mut self.cx, name, &bases)
                    .map_err(fail)?;
                self.nested(body, Some(name))?;
                self.backend.end_class(&mut self.cx).map_err(fail)?;
            }

            StmtKind::FunctionDef(def) => {
                let body = self.docstring(&def.body);
                let is_method = self.cx.class_name().is_some();
                let is_getter = is_method && def.has_decorator("property");
                let returns = def
                    .returns
                    .as_ref()
                    .map(|returns| self.expr(returns, true))
                    .transpose()?;

                self.cx.push_scope();
                let result = self.function(stmt, def, body, returns, is_method, is_getter);
                self.cx.pop_scope();
                result?;
            }

            StmtKind::Assign { targets, value } => {
                let targets = self.exprs(targets, false)?;
                let value = self.expr(value, false)?;
                self.backend
                    .assign(&mut self.cx, &targets, &value)
                    .map_err(fail)?;
            }

            StmtKind::AnnAssign {
                target: declared,
                annotation,
                value,
            } => {
                let annotation = self.expr(annotation, true)?;
                if let Expr::Name(name) = declared {
                    self.cx.declare_var(name.as_str(), annotation.as_str());
                }
                let declared = self.expr(declared, false)?;
                let rendered = value
                    .as_ref()
                    .map(|value| self.expr(value, false))
                    .transpose()?;
                let declaration = Declaration {
                    target: &declared,
                    annotation: &annotation,
                    value: rendered.as_deref(),
                    value_is_call: matches!(value, Some(Expr::Call { .. })),
                };
                self.backend
                    .declare(&mut self.cx, &declaration)
                    .map_err(fail)?;
            }

            StmtKind::AugAssign {
                target: assigned,
                op,
                value,
            } => {
                let assigned = self.expr(assigned, false)?;
                let value = self.expr(value, false)?;
                self.backend
                    .assign_op(&mut self.cx, &assigned, OpKind::from(*op), &value)
                    .map_err(fail)?;
            }

            StmtKind::If { test, body, orelse } => {
                let test = self.expr(test, false)?;
                self.backend.begin_if(&mut self.cx, &test).map_err(fail)?;
                self.nested(body, None)?;

                let mut orelse = orelse.as_slice();
                while let Some(first) = orelse.first() {
                    self.cx.prepare(first.line);
                    match orelse {
                        [
                            Stmt {
                                kind:
                                    StmtKind::If {
                                        test,
                                        body,
                                        orelse: rest,
                                    },
                                ..
                            },
                        ] => {
                            let test = self.expr(test, false)?;
                            self.backend
                                .begin_elif(&mut self.cx, &test)
                                .map_err(fail)?;
                            self.nested(body, None)?;
                            orelse = rest;
                        }
                        _ => {
                            self.backend.begin_else(&mut self.cx).map_err(fail)?;
                            self.nested(orelse, None)?;
                            break;
                        }
                    }
                }

                self.backend.end_block(&mut self.cx).map_err(fail)?;
            }

            StmtKind::For {
                target: item,
                iter,
                body,
                is_async,
            } => {
                let item = self.expr(item, false)?;
                let iter = self.loop_iter(iter)?;
                self.backend
                    .begin_for(&mut self.cx, &item, iter, *is_async)
                    .map_err(fail)?;
                self.nested(body, None)?;
                self.backend.end_block(&mut self.cx).map_err(fail)?;
            }

            StmtKind::While { test, body } => {
                let test = self.expr(test, false)?;
                self.backend
                    .begin_while(&mut self.cx, &test)
                    .map_err(fail)?;
                self.nested(body, None)?;
                self.backend.end_block(&mut self.cx).map_err(fail)?;
            }

            StmtKind::Pass => {}

            StmtKind::Break => {
                self.backend
                    .basic_statement(&mut self.cx, "break")
                    .map_err(fail)?;
            }

            StmtKind::Continue => {
                self.backend
                    .basic_statement(&mut self.cx, "continue")
                    .map_err(fail)?;
            }

            StmtKind::Return(value) => {
                let value = value
                    .as_ref()
                    .map(|value| self.expr(value, false))
                    .transpose()?;
                self.backend
                    .return_statement(&mut self.cx, value.as_deref())
                    .map_err(fail)?;
            }

            StmtKind::Match { subject, cases } => {
                let subject = self.expr(subject, false)?;
                self.backend
                    .begin_switch(&mut self.cx, &subject)
                    .map_err(fail)?;

                let frame = self.cx.enter(None);
                self.cx.push_scope();
                let result = cases.iter().try_for_each(|case| self.case(stmt, case));
                self.cx.pop_scope();
                self.cx.leave(frame);
                result?;

                self.backend.end_block(&mut self.cx).map_err(fail)?;
            }

            StmtKind::Import(names) => {
                self.backend.import(&mut self.cx, names).map_err(fail)?;
            }

            StmtKind::ImportFrom { module, names } => {
                self.backend
                    .import_from(&mut self.cx, module.as_deref(), names)
                    .map_err(fail)?;
            }

            StmtKind::Delete(targets) => {
                let targets = self.exprs(targets, false)?;
                self.backend.delete(&mut self.cx, &targets).map_err(fail)?;
            }

            StmtKind::TypeAlias { name, value } => {
                let name = self.expr(name, true)?;
                let value = self.expr(value, true)?;
                self.backend
                    .type_alias(&mut self.cx, &name, &value)
                    .map_err(fail)?;
            }

            StmtKind::Expr(Expr::Constant(Constant::Str(text))) => {
                self.backend.comment(&mut self.cx, &clean_doc(text));
            }

            StmtKind::Expr(Expr::Constant(value)) => {
                self.backend.comment(&mut self.cx, &clean_doc(&py_str(value)));
            }

            StmtKind::Expr(value) => {
                let code = self.expr(value, false)?;
                self.backend
                    .expression_statement(&mut self.cx, &code)
                    .map_err(fail)?;
            }
        }

        Ok(())
    }

    fn function(
        &mut self,
        stmt: &Stmt,
        def: &FunctionDef,
        body: &[Stmt],
        returns: Option<String>,
        is_method: bool,
        is_getter: bool,
    ) -> Result<(), RenderError> {
        let target = self.backend.target();
        let fail = |Unsupported| unsupported(target, stmt.kind_name(), &stmt.kind);

        let skip = usize::from(
            is_method
                && def
                    .params
                    .first()
                    .is_some_and(|param| param.name == "self" || param.name == "cls"),
        );

        let mut params = Vec::with_capacity(def.params.len());
        for (index, param) in def.params.iter().enumerate().skip(skip) {
            let annotation = param
                .annotation
                .as_ref()
                .map(|annotation| self.expr(annotation, true))
                .transpose()?;
            let default = default_index(def.params.len(), def.defaults.len(), index)
                .and_then(|d| def.defaults.get(d))
                .map(|default| self.expr(default, false))
                .transpose()?;
            params.push(SignatureParam {
                name: param.name.clone(),
                annotation,
                default,
            });
        }

        let signature = Signature {
            name: def.name.clone(),
            params,
            returns,
            is_async: def.is_async,
            is_method,
            is_getter,
        };

        self.backend
            .begin_function(&mut self.cx, &signature)
            .map_err(fail)?;
        self.nested(body, None)?;
        self.backend.end_function(&mut self.cx).map_err(fail)
    }

    fn case(&mut self, stmt: &Stmt, case: &MatchCase) -> Result<(), RenderError> {
        let target = self.backend.target();
        let fail = |Unsupported| unsupported(target, "match_case", case);

        self.cx.prepare(case.line);
        let pattern = match &case.pattern {
            Expr::MatchAs { name: None } => None,
            pattern => Some(self.expr(pattern, false)?),
        };
        self.backend
            .begin_switch_case(&mut self.cx, pattern.as_deref())
            .map_err(fail)?;

        let frame = self.cx.enter(None);
        let result = self.block(&case.body).and_then(|()| {
            self.backend
                .end_switch_case(&mut self.cx)
                .map_err(|Unsupported| unsupported(target, stmt.kind_name(), &stmt.kind))
        });
        self.cx.leave(frame);
        result
    }

    fn loop_iter(&self, iter: &Expr) -> Result<LoopIter, RenderError> {
        if let Expr::Call { func, args } = iter {
            let is_range = matches!(func.as_ref(), Expr::Name(name) if name == "range")
                && !args.iter().any(|arg| matches!(arg, Expr::Starred(_)));
            if is_range {
                let rendered = self.exprs(args, false)?;
                if let Some(range) = RangeDescriptor::from_args(&rendered) {
                    let call = self.expr(iter, false)?;
                    return Ok(LoopIter::Range { range, call });
                }
            }
        }
        Ok(LoopIter::Items(self.expr(iter, false)?))
    }

    fn exprs(&self, exprs: &[Expr], annotation: bool) -> Result<Vec<String>, RenderError> {
        exprs
            .iter()
            .map(|expr| self.expr(expr, annotation))
            .collect()
    }

    /// Render `expr` as an operand, grouped when it binds looser than `min`.
    fn operand(
        &self,
        expr: &Expr,
        min: u8,
        op: OpKind,
        annotation: bool,
    ) -> Result<String, RenderError> {
        let text = self.expr(expr, annotation)?;
        if precedence(expr) < min && self.backend.groups_operands(op) {
            Ok(self.backend.group(&text))
        } else {
            Ok(text)
        }
    }

    /// Render an expression to text.
    fn expr(&self, expr: &Expr, annotation: bool) -> Result<String, RenderError> {
        let backend = self.backend;
        let fail = |Unsupported| unsupported(backend.target(), expr.kind_name(), expr);

        let text = match expr {
            Expr::Constant(value) => backend.constant(value, annotation).map_err(fail)?,

            Expr::Name(name) => backend.name(&self.cx, name, annotation),

            Expr::Attribute { value, attr } => {
                let object = self.atom(value, annotation)?;
                backend.attribute(&object, attr)
            }

            Expr::UnaryOp { op, operand } => {
                let kind = OpKind::from(*op);
                let operand = self.operand(operand, PREC_UNARY, kind, annotation)?;
                backend.unary(*op, &operand)
            }

            Expr::BinOp { left, op, right } => {
                let kind = OpKind::from(*op);
                let prec = kind.precedence();
                // `**` is right-associative
                let (left_min, right_min) = if *op == Operator::Pow {
                    (prec + 1, prec)
                } else {
                    (prec, prec + 1)
                };
                let operands = [
                    self.operand(left, left_min, kind, annotation)?,
                    self.operand(right, right_min, kind, annotation)?,
                ];
                backend.binary(kind, &operands)
            }

            Expr::BoolOp { op, values } => {
                let kind = OpKind::from(*op);
                let min = kind.precedence() + 1;
                let operands = values
                    .iter()
                    .map(|value| self.operand(value, min, kind, annotation))
                    .collect::<Result<Vec<_>, _>>()?;
                backend.binary(kind, &operands)
            }

            Expr::Compare {
                left,
                ops,
                comparators,
            } => {
                let min = PREC_COMPARE + 1;
                let first = ops.first().copied().map(OpKind::from).ok_or_else(|| {
                    unsupported(backend.target(), expr.kind_name(), expr)
                })?;
                let left = self.operand(left, min, first, annotation)?;
                let rest = ops
                    .iter()
                    .zip(comparators)
                    .map(|(op, right)| {
                        let kind = OpKind::from(*op);
                        Ok((kind, self.operand(right, min, kind, annotation)?))
                    })
                    .collect::<Result<Vec<_>, RenderError>>()?;
                backend.compare(&left, &rest)
            }

            Expr::Call { func, args } => {
                let func = self.atom(func, annotation)?;
                let args = self.exprs(args, annotation)?;
                backend.call(&func, &args).map_err(fail)?
            }

            Expr::Tuple(elements) => {
                let elements = self.exprs(elements, annotation)?;
                backend
                    .sequence(SequenceKind::Tuple, &elements)
                    .map_err(fail)?
            }

            Expr::List(elements) => {
                let elements = self.exprs(elements, annotation)?;
                backend
                    .sequence(SequenceKind::List, &elements)
                    .map_err(fail)?
            }

            Expr::Set(elements) => {
                let elements = self.exprs(elements, annotation)?;
                backend
                    .sequence(SequenceKind::Set, &elements)
                    .map_err(fail)?
            }

            Expr::Dict(pairs) => {
                let pairs = pairs
                    .iter()
                    .map(|(key, value)| {
                        Ok((self.expr(key, annotation)?, self.expr(value, annotation)?))
                    })
                    .collect::<Result<Vec<_>, RenderError>>()?;
                backend.dict(&pairs).map_err(fail)?
            }

            Expr::IfExp { test, body, orelse } => {
                let grouped = |part: &Expr| -> Result<String, RenderError> {
                    let text = self.expr(part, annotation)?;
                    if precedence(part) <= PREC_CONDITIONAL {
                        Ok(backend.group(&text))
                    } else {
                        Ok(text)
                    }
                };
                let (test, body, orelse) = (grouped(test)?, grouped(body)?, grouped(orelse)?);
                backend.conditional(&test, &body, &orelse).map_err(fail)?
            }

            Expr::Subscript { value, slice } => {
                let value = self.atom(value, annotation)?;
                match slice.as_ref() {
                    Expr::Slice { lower, upper, step } => {
                        let part = |part: &Option<Box<Expr>>| {
                            part.as_ref()
                                .map(|part| self.expr(part, annotation))
                                .transpose()
                        };
                        let range = RangeDescriptor {
                            start: part(lower)?,
                            stop: part(upper)?,
                            step: part(step)?,
                        };
                        backend.slice(&value, &range).map_err(fail)?
                    }
                    index => {
                        let index = self.expr(index, annotation)?;
                        backend.subscript(&value, &index).map_err(fail)?
                    }
                }
            }

            Expr::Starred(value) => {
                let value = self.atom(value, annotation)?;
                backend.starred(&value).map_err(fail)?
            }

            Expr::MatchValue(value) => self.expr(value, annotation)?,

            Expr::MatchAs { name: Some(name) } => backend.capture_pattern(name).map_err(fail)?,

            Expr::MatchAs { name: None } | Expr::Slice { .. } => {
                return Err(unsupported(backend.target(), expr.kind_name(), expr));
            }
        };

        Ok(text)
    }

    /// Render the object of an attribute access, call or subscript.
    fn atom(&self, expr: &Expr, annotation: bool) -> Result<String, RenderError> {
        let text = self.expr(expr, annotation)?;
        if precedence(expr) < PREC_ATOM {
            Ok(self.backend.group(&text))
        } else {
            Ok(text)
        }
    }
}

/// Python's `str()` of a non-string constant.
fn py_str(value: &Constant) -> String {
    match value {
        Constant::None => "None".into(),
        Constant::Bool(true) => "True".into(),
        Constant::Bool(false) => "False".into(),
        Constant::Int(value) => value.to_string(),
        Constant::Float(value) => py_float_repr(*value),
        Constant::Str(value) => value.clone(),
    }
}

/// Render `module` through `backend`.
pub fn translate(
    module: &Module,
    comments: &CommentIndex,
    backend: &dyn Backend,
) -> Result<String, RenderError> {
    AstTranslator::new(backend, comments).translate(module)
}
