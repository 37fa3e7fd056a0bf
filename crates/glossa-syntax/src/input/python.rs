//! Tree-sitter based Python reader.
//!
//! Produces the same shapes Python's own parser does: `elif` clauses become
//! a single nested `If` in the parent's `orelse`, chained assignments keep
//! all their targets, and parameter defaults are collected separately from
//! the parameters they belong to.

use crate::ast::*;
use crate::traits::{ReadError, Reader};
use tree_sitter::{Node, Parser, Tree};

/// Static instance of the Python reader for registry.
pub static PYTHON_READER: PythonReader = PythonReader;

/// Python reader using tree-sitter.
pub struct PythonReader;

impl Reader for PythonReader {
    fn language(&self) -> &'static str {
        "python"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["py"]
    }

    fn read(&self, source: &str) -> Result<Module, ReadError> {
        read_python(source)
    }
}

/// Parse Python source into a syntax tree.
pub fn read_python(source: &str) -> Result<Module, ReadError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_python::language().into())
        .map_err(|err| ReadError::Parse(err.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ReadError::Parse("failed to parse".into()))?;

    let ctx = ReadContext::new(source);
    ctx.read_module(&tree)
}

struct ReadContext<'a> {
    source: &'a str,
}

/// Named children, skipping comments (tree-sitter extras).
fn named_children<'t>(node: Node<'t>) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

fn line_of(node: Node) -> usize {
    node.start_position().row + 1
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, ReadError> {
    node.child_by_field_name(name)
        .ok_or_else(|| ReadError::Parse(format!("{} missing {}", node.kind(), name)))
}

fn unsupported(node: Node, what: &str) -> ReadError {
    ReadError::Unsupported(format!(
        "{} at line {} ({})",
        what,
        line_of(node),
        node.kind()
    ))
}

impl<'a> ReadContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn read_module(&self, tree: &Tree) -> Result<Module, ReadError> {
        let root = tree.root_node();

        if root.has_error() {
            return Err(ReadError::Parse("syntax error in source".into()));
        }

        Ok(Module::new(self.read_statements(root)?))
    }

    fn read_statements(&self, node: Node) -> Result<Vec<Stmt>, ReadError> {
        let mut stmts = Vec::new();
        for child in named_children(node) {
            stmts.push(self.read_stmt(child)?);
        }
        Ok(stmts)
    }

    fn read_stmt(&self, node: Node) -> Result<Stmt, ReadError> {
        let line = line_of(node);
        let kind = match node.kind() {
            "expression_statement" => return self.read_expression_statement(node),
            // The grammar also emits these without an `expression_statement` wrapper
            "assignment" => self.read_assignment(node)?,
            "augmented_assignment" => self.read_augmented_assignment(node)?,

            "if_statement" => self.read_if(node)?,
            "for_statement" => self.read_for(node)?,
            "while_statement" => {
                if node.child_by_field_name("alternative").is_some() {
                    return Err(unsupported(node, "while/else"));
                }
                StmtKind::While {
                    test: self.read_expr(field(node, "condition")?)?,
                    body: self.read_statements(field(node, "body")?)?,
                }
            }

            "return_statement" => {
                let value = named_children(node)
                    .first()
                    .map(|value| self.read_expr(*value))
                    .transpose()?;
                StmtKind::Return(value)
            }
            "pass_statement" => StmtKind::Pass,
            "break_statement" => StmtKind::Break,
            "continue_statement" => StmtKind::Continue,

            "function_definition" => StmtKind::FunctionDef(self.read_function(node, Vec::new())?),
            "class_definition" => self.read_class(node)?,
            "decorated_definition" => return self.read_decorated(node),

            "match_statement" => self.read_match(node)?,

            "import_statement" => StmtKind::Import(self.read_import_names(node)?),
            "import_from_statement" => self.read_import_from(node)?,

            "delete_statement" => {
                let target = named_children(node)
                    .first()
                    .copied()
                    .ok_or_else(|| ReadError::Parse("del without target".into()))?;
                let targets = match self.read_expr(target)? {
                    Expr::Tuple(items) => items,
                    other => vec![other],
                };
                StmtKind::Delete(targets)
            }

            "type_alias_statement" => {
                let (name, value) = match (
                    node.child_by_field_name("left"),
                    node.child_by_field_name("right"),
                ) {
                    (Some(name), Some(value)) => (name, value),
                    _ => {
                        let children = named_children(node);
                        if children.len() != 2 {
                            return Err(ReadError::Parse("malformed type alias".into()));
                        }
                        (children[0], children[1])
                    }
                };
                StmtKind::TypeAlias {
                    name: self.read_expr(name)?,
                    value: self.read_expr(value)?,
                }
            }

            "with_statement" | "try_statement" | "global_statement" | "nonlocal_statement"
            | "raise_statement" | "assert_statement" | "print_statement" | "exec_statement"
            | "future_import_statement" => {
                return Err(unsupported(node, &format!("statement `{}`", node.kind())));
            }

            // Bare expressions (calls, names, strings) at statement level
            _ => StmtKind::Expr(self.read_expr(node)?),
        };
        Ok(Stmt::new(line, kind))
    }

    fn read_expression_statement(&self, node: Node) -> Result<Stmt, ReadError> {
        let line = line_of(node);
        let children = named_children(node);
        let first = children
            .first()
            .copied()
            .ok_or_else(|| ReadError::Parse("expression_statement has no child".into()))?;

        if children.len() > 1 {
            let items = children
                .iter()
                .map(|child| self.read_expr(*child))
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Stmt::expr(line, Expr::Tuple(items)));
        }

        let kind = match first.kind() {
            "assignment" => self.read_assignment(first)?,
            "augmented_assignment" => self.read_augmented_assignment(first)?,
            _ => StmtKind::Expr(self.read_expr(first)?),
        };
        Ok(Stmt::new(line, kind))
    }

    fn read_assignment(&self, node: Node) -> Result<StmtKind, ReadError> {
        let target = self.read_target(field(node, "left")?)?;

        if let Some(annotation) = node.child_by_field_name("type") {
            let value = node
                .child_by_field_name("right")
                .map(|value| self.read_expr(value))
                .transpose()?;
            return Ok(StmtKind::AnnAssign {
                target,
                annotation: self.read_expr(annotation)?,
                value,
            });
        }

        // `a = b = value` nests assignments on the right-hand side
        let mut targets = vec![target];
        let mut right = field(node, "right")?;
        while right.kind() == "assignment" {
            if right.child_by_field_name("type").is_some() {
                return Err(unsupported(right, "annotated chained assignment"));
            }
            targets.push(self.read_target(field(right, "left")?)?);
            right = field(right, "right")?;
        }
        if right.kind() == "augmented_assignment" {
            return Err(unsupported(right, "chained augmented assignment"));
        }

        Ok(StmtKind::Assign {
            targets,
            value: self.read_expr(right)?,
        })
    }

    fn read_augmented_assignment(&self, node: Node) -> Result<StmtKind, ReadError> {
        let op_text = self.node_text(field(node, "operator")?);
        let op = op_text
            .strip_suffix('=')
            .and_then(Operator::from_symbol)
            .ok_or_else(|| ReadError::Parse(format!("unknown augmented op: {}", op_text)))?;

        Ok(StmtKind::AugAssign {
            target: self.read_target(field(node, "left")?)?,
            op,
            value: self.read_expr(field(node, "right")?)?,
        })
    }

    fn read_if(&self, node: Node) -> Result<StmtKind, ReadError> {
        let test = self.read_expr(field(node, "condition")?)?;
        let body = self.read_statements(field(node, "consequence")?)?;

        let mut cursor = node.walk();
        let alternatives: Vec<Node> = node
            .children_by_field_name("alternative", &mut cursor)
            .collect();

        let orelse = self.read_alternatives(&alternatives)?;
        Ok(StmtKind::If { test, body, orelse })
    }

    /// Fold `elif`/`else` clauses back into nested `orelse` lists.
    fn read_alternatives(&self, clauses: &[Node]) -> Result<Vec<Stmt>, ReadError> {
        let Some((clause, rest)) = clauses.split_first() else {
            return Ok(Vec::new());
        };

        match clause.kind() {
            "elif_clause" => {
                let test = self.read_expr(field(*clause, "condition")?)?;
                let body = self.read_statements(field(*clause, "consequence")?)?;
                let orelse = self.read_alternatives(rest)?;
                Ok(vec![Stmt::if_stmt(line_of(*clause), test, body, orelse)])
            }
            "else_clause" => self.read_statements(field(*clause, "body")?),
            other => Err(ReadError::UnexpectedNode {
                expected: "elif_clause or else_clause".into(),
                got: other.into(),
            }),
        }
    }

    fn read_for(&self, node: Node) -> Result<StmtKind, ReadError> {
        if node.child_by_field_name("alternative").is_some() {
            return Err(unsupported(node, "for/else"));
        }

        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");

        Ok(StmtKind::For {
            target: self.read_target(field(node, "left")?)?,
            iter: self.read_expr(field(node, "right")?)?,
            body: self.read_statements(field(node, "body")?)?,
            is_async,
        })
    }

    fn read_decorated(&self, node: Node) -> Result<Stmt, ReadError> {
        let definition = field(node, "definition")?;

        let mut decorators = Vec::new();
        for child in named_children(node) {
            if child.kind() == "decorator" {
                let expr = named_children(child)
                    .first()
                    .copied()
                    .ok_or_else(|| ReadError::Parse("empty decorator".into()))?;
                decorators.push(self.read_expr(expr)?);
            }
        }

        match definition.kind() {
            "function_definition" => Ok(Stmt::function(
                line_of(definition),
                self.read_function(definition, decorators)?,
            )),
            // Class decorators don't change how a class renders
            "class_definition" => Ok(Stmt::new(line_of(definition), self.read_class(definition)?)),
            other => Err(ReadError::UnexpectedNode {
                expected: "function or class definition".into(),
                got: other.into(),
            }),
        }
    }

    fn read_function(&self, node: Node, decorators: Vec<Expr>) -> Result<FunctionDef, ReadError> {
        let name = self.node_text(field(node, "name")?).to_string();

        let mut cursor = node.walk();
        let is_async = node.children(&mut cursor).any(|c| c.kind() == "async");

        let (params, defaults) = match node.child_by_field_name("parameters") {
            Some(params) => self.read_parameters(params)?,
            None => (Vec::new(), Vec::new()),
        };

        let returns = node
            .child_by_field_name("return_type")
            .map(|ty| self.read_expr(ty))
            .transpose()?;

        Ok(FunctionDef {
            name,
            params,
            defaults,
            returns,
            body: self.read_statements(field(node, "body")?)?,
            decorators,
            is_async,
        })
    }

    fn read_parameters(&self, node: Node) -> Result<(Vec<Param>, Vec<Expr>), ReadError> {
        let mut params = Vec::new();
        let mut defaults = Vec::new();

        for child in named_children(node) {
            match child.kind() {
                "identifier" => params.push(Param::new(self.node_text(child))),
                "typed_parameter" => {
                    let name = named_children(child)
                        .first()
                        .copied()
                        .filter(|n| n.kind() == "identifier")
                        .ok_or_else(|| unsupported(child, "splat parameter"))?;
                    let annotation = self.read_expr(field(child, "type")?)?;
                    params.push(Param::typed(self.node_text(name), annotation));
                }
                "default_parameter" => {
                    let name = field(child, "name")?;
                    if name.kind() != "identifier" {
                        return Err(unsupported(child, "destructuring parameter"));
                    }
                    params.push(Param::new(self.node_text(name)));
                    defaults.push(self.read_expr(field(child, "value")?)?);
                }
                "typed_default_parameter" => {
                    let name = self.node_text(field(child, "name")?);
                    let annotation = self.read_expr(field(child, "type")?)?;
                    params.push(Param::typed(name, annotation));
                    defaults.push(self.read_expr(field(child, "value")?)?);
                }
                _ => return Err(unsupported(child, "parameter kind")),
            }
        }

        Ok((params, defaults))
    }

    fn read_class(&self, node: Node) -> Result<StmtKind, ReadError> {
        let name = self.node_text(field(node, "name")?).to_string();

        let mut bases = Vec::new();
        if let Some(superclasses) = node.child_by_field_name("superclasses") {
            for base in named_children(superclasses) {
                if base.kind() == "keyword_argument" {
                    return Err(unsupported(base, "class keyword argument"));
                }
                bases.push(self.read_expr(base)?);
            }
        }

        Ok(StmtKind::ClassDef {
            name,
            bases,
            body: self.read_statements(field(node, "body")?)?,
        })
    }

    fn read_match(&self, node: Node) -> Result<StmtKind, ReadError> {
        let mut cursor = node.walk();
        let subjects: Vec<Node> = node.children_by_field_name("subject", &mut cursor).collect();
        let subject = match subjects.as_slice() {
            [single] => self.read_expr(*single)?,
            [] => return Err(ReadError::Parse("match without subject".into())),
            many => Expr::Tuple(
                many.iter()
                    .map(|s| self.read_expr(*s))
                    .collect::<Result<_, _>>()?,
            ),
        };

        let body = field(node, "body")?;
        let mut cases = Vec::new();
        for clause in named_children(body) {
            if clause.kind() != "case_clause" {
                return Err(ReadError::UnexpectedNode {
                    expected: "case_clause".into(),
                    got: clause.kind().into(),
                });
            }
            if clause.child_by_field_name("guard").is_some() {
                return Err(unsupported(clause, "case guard"));
            }

            let patterns: Vec<Node> = named_children(clause)
                .into_iter()
                .filter(|n| n.kind() == "case_pattern")
                .collect();
            let [pattern] = patterns.as_slice() else {
                return Err(unsupported(clause, "sequence pattern"));
            };

            cases.push(MatchCase {
                line: line_of(clause),
                pattern: self.read_case_pattern(*pattern)?,
                body: self.read_statements(field(clause, "consequence")?)?,
            });
        }

        Ok(StmtKind::Match { subject, cases })
    }

    fn read_case_pattern(&self, node: Node) -> Result<Expr, ReadError> {
        let children = named_children(node);
        let Some(inner) = children.first().copied() else {
            // Only the anonymous `_` token
            return Ok(Expr::MatchAs { name: None });
        };

        match inner.kind() {
            "dotted_name" => {
                let parts: Vec<&str> = named_children(inner)
                    .into_iter()
                    .map(|part| self.node_text(part))
                    .collect();
                match parts.as_slice() {
                    ["_"] => Ok(Expr::MatchAs { name: None }),
                    [name] => Ok(Expr::MatchAs {
                        name: Some(name.to_string()),
                    }),
                    [first, rest @ ..] => {
                        let value = rest.iter().fold(Expr::name(*first), |value, attr| {
                            Expr::attribute(value, *attr)
                        });
                        Ok(Expr::MatchValue(Box::new(value)))
                    }
                    [] => Err(ReadError::Parse("empty dotted name".into())),
                }
            }
            "integer" | "float" => {
                let value = self.read_expr(inner)?;
                let negative = self.node_text(node).trim_start().starts_with('-');
                let value = if negative {
                    Expr::unary(UnaryOp::USub, value)
                } else {
                    value
                };
                Ok(Expr::MatchValue(Box::new(value)))
            }
            "string" | "concatenated_string" | "true" | "false" | "none" => {
                Ok(Expr::MatchValue(Box::new(self.read_expr(inner)?)))
            }
            _ => Err(unsupported(inner, "case pattern")),
        }
    }

    fn read_import_names(&self, node: Node) -> Result<Vec<Alias>, ReadError> {
        let mut cursor = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut cursor).collect();
        names.into_iter().map(|name| self.read_alias(name)).collect()
    }

    fn read_alias(&self, node: Node) -> Result<Alias, ReadError> {
        match node.kind() {
            "aliased_import" => Ok(Alias {
                name: self.node_text(field(node, "name")?).to_string(),
                asname: Some(self.node_text(field(node, "alias")?).to_string()),
            }),
            _ => Ok(Alias {
                name: self.node_text(node).to_string(),
                asname: None,
            }),
        }
    }

    fn read_import_from(&self, node: Node) -> Result<StmtKind, ReadError> {
        let module = field(node, "module_name")?;
        let module = match module.kind() {
            "relative_import" => return Err(unsupported(module, "relative import")),
            _ => Some(self.node_text(module).to_string()),
        };

        if named_children(node)
            .iter()
            .any(|c| c.kind() == "wildcard_import")
        {
            return Ok(StmtKind::ImportFrom {
                module,
                names: vec![Alias {
                    name: "*".into(),
                    asname: None,
                }],
            });
        }

        Ok(StmtKind::ImportFrom {
            module,
            names: self.read_import_names(node)?,
        })
    }

    /// Assignment and loop targets use pattern nodes in the grammar.
    fn read_target(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            "pattern_list" | "tuple_pattern" => Ok(Expr::Tuple(self.read_items(node)?)),
            "list_pattern" => Ok(Expr::List(self.read_items(node)?)),
            "list_splat_pattern" => {
                let inner = named_children(node)
                    .first()
                    .copied()
                    .ok_or_else(|| ReadError::Parse("empty splat".into()))?;
                Ok(Expr::Starred(Box::new(self.read_target(inner)?)))
            }
            _ => self.read_expr(node),
        }
    }

    fn read_items(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        named_children(node)
            .into_iter()
            .map(|child| self.read_target(child))
            .collect()
    }

    fn read_expr(&self, node: Node) -> Result<Expr, ReadError> {
        match node.kind() {
            "integer" => self.read_integer(node),
            "float" => {
                let text = self.node_text(node).replace('_', "");
                if text.ends_with(['j', 'J']) {
                    return Err(unsupported(node, "complex literal"));
                }
                text.parse::<f64>()
                    .map(Expr::float)
                    .map_err(|err| ReadError::Parse(format!("bad float {}: {}", text, err)))
            }
            "string" => self.read_string(node).map(Expr::string),
            "concatenated_string" => {
                let mut value = String::new();
                for part in named_children(node) {
                    value.push_str(&self.read_string(part)?);
                }
                Ok(Expr::string(value))
            }
            "true" => Ok(Expr::bool(true)),
            "false" => Ok(Expr::bool(false)),
            "none" => Ok(Expr::none()),

            "identifier" | "keyword_identifier" => Ok(Expr::name(self.node_text(node))),

            // Annotations are wrapped in `type`
            "type" => {
                let inner = named_children(node)
                    .first()
                    .copied()
                    .ok_or_else(|| ReadError::Parse("empty type".into()))?;
                self.read_expr(inner)
            }
            "generic_type" => {
                let children = named_children(node);
                let [base, params] = children.as_slice() else {
                    return Err(ReadError::Parse("malformed generic type".into()));
                };
                let mut args = named_children(*params)
                    .into_iter()
                    .map(|arg| self.read_expr(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                let slice = if args.len() == 1 {
                    args.remove(0)
                } else {
                    Expr::Tuple(args)
                };
                Ok(Expr::Subscript {
                    value: Box::new(self.read_expr(*base)?),
                    slice: Box::new(slice),
                })
            }
            "union_type" => {
                let children = named_children(node);
                let [left, right] = children.as_slice() else {
                    return Err(ReadError::Parse("malformed union type".into()));
                };
                Ok(Expr::binary(
                    self.read_expr(*left)?,
                    Operator::BitOr,
                    self.read_expr(*right)?,
                ))
            }
            "member_type" => {
                let children = named_children(node);
                let [object, attr] = children.as_slice() else {
                    return Err(ReadError::Parse("malformed member type".into()));
                };
                Ok(Expr::attribute(
                    self.read_expr(*object)?,
                    self.node_text(*attr),
                ))
            }

            "binary_operator" => {
                let op_text = self.node_text(field(node, "operator")?);
                let op = Operator::from_symbol(op_text)
                    .ok_or_else(|| ReadError::Parse(format!("unknown binary op: {}", op_text)))?;
                Ok(Expr::binary(
                    self.read_expr(field(node, "left")?)?,
                    op,
                    self.read_expr(field(node, "right")?)?,
                ))
            }
            "comparison_operator" => self.read_comparison(node),
            "boolean_operator" => self.read_boolean_operator(node),
            "unary_operator" => {
                let op = match self.node_text(field(node, "operator")?) {
                    "-" => UnaryOp::USub,
                    "+" => UnaryOp::UAdd,
                    "~" => UnaryOp::Invert,
                    other => {
                        return Err(ReadError::Parse(format!("unknown unary op: {}", other)));
                    }
                };
                Ok(Expr::unary(op, self.read_expr(field(node, "argument")?)?))
            }
            "not_operator" => Ok(Expr::unary(
                UnaryOp::Not,
                self.read_expr(field(node, "argument")?)?,
            )),

            "call" => self.read_call(node),
            "attribute" => Ok(Expr::attribute(
                self.read_expr(field(node, "object")?)?,
                self.node_text(field(node, "attribute")?),
            )),
            "subscript" => self.read_subscript(node),
            "slice" => self.read_slice(node),

            "list" => Ok(Expr::List(self.read_elements(node)?)),
            "tuple" | "expression_list" | "pattern_list" => {
                Ok(Expr::Tuple(self.read_elements(node)?))
            }
            "set" => Ok(Expr::Set(self.read_elements(node)?)),
            "dictionary" => self.read_dictionary(node),
            "list_splat" | "list_splat_pattern" => {
                let inner = named_children(node)
                    .first()
                    .copied()
                    .ok_or_else(|| ReadError::Parse("empty splat".into()))?;
                Ok(Expr::Starred(Box::new(self.read_expr(inner)?)))
            }

            "parenthesized_expression" => {
                let inner = named_children(node).first().copied().ok_or_else(|| {
                    ReadError::Parse("parenthesized_expression missing inner".into())
                })?;
                self.read_expr(inner)
            }

            "conditional_expression" => {
                // body if test else orelse
                let children = named_children(node);
                let [body, test, orelse] = children.as_slice() else {
                    return Err(ReadError::Parse(
                        "conditional_expression needs 3 parts".into(),
                    ));
                };
                Ok(Expr::IfExp {
                    test: Box::new(self.read_expr(*test)?),
                    body: Box::new(self.read_expr(*body)?),
                    orelse: Box::new(self.read_expr(*orelse)?),
                })
            }

            other => Err(unsupported(node, &format!("expression `{}`", other))),
        }
    }

    fn read_integer(&self, node: Node) -> Result<Expr, ReadError> {
        let text = self.node_text(node).replace('_', "");
        if text.ends_with(['j', 'J']) {
            return Err(unsupported(node, "complex literal"));
        }
        let lower = text.to_ascii_lowercase();
        let parsed = if let Some(hex) = lower.strip_prefix("0x") {
            i64::from_str_radix(hex, 16)
        } else if let Some(oct) = lower.strip_prefix("0o") {
            i64::from_str_radix(oct, 8)
        } else if let Some(bin) = lower.strip_prefix("0b") {
            i64::from_str_radix(bin, 2)
        } else {
            lower.parse::<i64>()
        };
        parsed
            .map(Expr::int)
            .map_err(|err| ReadError::Parse(format!("bad integer {}: {}", text, err)))
    }

    fn read_string(&self, node: Node) -> Result<String, ReadError> {
        if named_children(node)
            .iter()
            .any(|c| c.kind() == "interpolation")
        {
            return Err(unsupported(node, "f-string interpolation"));
        }

        let text = self.node_text(node);
        let body_start = text
            .find(['"', '\''])
            .ok_or_else(|| ReadError::Parse(format!("malformed string: {}", text)))?;
        let (prefix, quoted) = text.split_at(body_start);
        let prefix = prefix.to_ascii_lowercase();
        if prefix.contains('b') {
            return Err(unsupported(node, "bytes literal"));
        }

        let quote = if quoted.starts_with("\"\"\"") || quoted.starts_with("'''") {
            &quoted[..3]
        } else {
            &quoted[..1]
        };
        let inner = quoted
            .strip_prefix(quote)
            .and_then(|s| s.strip_suffix(quote))
            .ok_or_else(|| ReadError::Parse(format!("unterminated string: {}", text)))?;

        if prefix.contains('r') {
            Ok(inner.to_string())
        } else {
            Ok(unescape(inner))
        }
    }

    fn read_comparison(&self, node: Node) -> Result<Expr, ReadError> {
        let mut operands = Vec::new();
        let mut ops = Vec::new();
        let mut pending = String::new();

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "comment" {
                continue;
            }
            if child.is_named() {
                if !pending.is_empty() {
                    let op = CmpOp::from_symbol(&pending).ok_or_else(|| {
                        ReadError::Parse(format!("unknown comparison op: {}", pending))
                    })?;
                    ops.push(op);
                    pending.clear();
                }
                operands.push(self.read_expr(child)?);
            } else {
                // `not in` / `is not` may arrive as one token or two
                for word in self.node_text(child).split_whitespace() {
                    if !pending.is_empty() {
                        pending.push(' ');
                    }
                    pending.push_str(word);
                }
            }
        }

        if operands.len() < 2 || ops.len() != operands.len() - 1 {
            return Err(ReadError::Parse("malformed comparison".into()));
        }

        let mut operands = operands.into_iter();
        let left = operands.next().map(Box::new).ok_or_else(|| {
            ReadError::Parse("comparison missing left operand".into())
        })?;
        Ok(Expr::Compare {
            left,
            ops,
            comparators: operands.collect(),
        })
    }

    fn read_boolean_operator(&self, node: Node) -> Result<Expr, ReadError> {
        let op = match self.node_text(field(node, "operator")?) {
            "and" => BoolOp::And,
            "or" => BoolOp::Or,
            other => return Err(ReadError::Parse(format!("unknown boolean op: {}", other))),
        };

        // Flatten `a and b and c` into one BoolOp like Python's parser does
        let mut values = Vec::new();
        for side in [field(node, "left")?, field(node, "right")?] {
            match self.read_expr(side)? {
                Expr::BoolOp {
                    op: inner,
                    values: nested,
                } if inner == op && side.kind() == "boolean_operator" => values.extend(nested),
                value => values.push(value),
            }
        }

        Ok(Expr::BoolOp { op, values })
    }

    fn read_call(&self, node: Node) -> Result<Expr, ReadError> {
        let func = self.read_expr(field(node, "function")?)?;
        let arguments = field(node, "arguments")?;
        if arguments.kind() != "argument_list" {
            return Err(unsupported(arguments, "generator argument"));
        }

        let mut args = Vec::new();
        for arg in named_children(arguments) {
            match arg.kind() {
                "keyword_argument" => return Err(unsupported(arg, "keyword argument")),
                "dictionary_splat" => return Err(unsupported(arg, "keyword splat")),
                _ => args.push(self.read_expr(arg)?),
            }
        }

        Ok(Expr::call(func, args))
    }

    fn read_subscript(&self, node: Node) -> Result<Expr, ReadError> {
        let value = self.read_expr(field(node, "value")?)?;

        let mut cursor = node.walk();
        let subscripts: Vec<Node> = node
            .children_by_field_name("subscript", &mut cursor)
            .collect();
        let slice = match subscripts.as_slice() {
            [single] => self.read_expr(*single)?,
            [] => return Err(ReadError::Parse("subscript missing index".into())),
            many => Expr::Tuple(
                many.iter()
                    .map(|s| self.read_expr(*s))
                    .collect::<Result<_, _>>()?,
            ),
        };

        Ok(Expr::Subscript {
            value: Box::new(value),
            slice: Box::new(slice),
        })
    }

    fn read_slice(&self, node: Node) -> Result<Expr, ReadError> {
        // lower : upper : step, each part optional
        let mut parts: [Option<Box<Expr>>; 3] = [None, None, None];
        let mut position = 0;

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == ":" {
                position += 1;
            } else if child.is_named() && child.kind() != "comment" && position < 3 {
                parts[position] = Some(Box::new(self.read_expr(child)?));
            }
        }

        let [lower, upper, step] = parts;
        Ok(Expr::Slice { lower, upper, step })
    }

    fn read_elements(&self, node: Node) -> Result<Vec<Expr>, ReadError> {
        named_children(node)
            .into_iter()
            .map(|child| self.read_expr(child))
            .collect()
    }

    fn read_dictionary(&self, node: Node) -> Result<Expr, ReadError> {
        let mut pairs = Vec::new();
        for child in named_children(node) {
            if child.kind() != "pair" {
                return Err(unsupported(child, "dictionary splat"));
            }
            pairs.push((
                self.read_expr(field(child, "key")?)?,
                self.read_expr(field(child, "value")?)?,
            ));
        }
        Ok(Expr::Dict(pairs))
    }
}

/// Resolve the backslash escapes Python recognizes in non-raw strings.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('\'') => out.push('\''),
            Some('"') => out.push('"'),
            // Line continuation
            Some('\n') => {}
            // Python keeps unknown escapes verbatim
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> Stmt {
        let module = read_python(source).unwrap();
        assert_eq!(module.body.len(), 1, "expected one statement");
        module.body.into_iter().next().unwrap()
    }

    #[test]
    fn test_simple_assignment() {
        let stmt = single("x = 42");
        assert_eq!(
            stmt.kind,
            StmtKind::Assign {
                targets: vec![Expr::name("x")],
                value: Expr::int(42),
            }
        );
    }

    #[test]
    fn test_statements_at_block_level() {
        let source = "x = 1\nx -= 1\nf(1)\nfor i in xs:\n    y = i\n    y += 2\n    g(y)\n";
        let module = read_python(source).unwrap();
        assert_eq!(module.body.len(), 4);
        assert!(matches!(module.body[0].kind, StmtKind::Assign { .. }));
        assert!(matches!(
            module.body[1].kind,
            StmtKind::AugAssign { op: Operator::Sub, .. }
        ));
        assert_eq!(
            module.body[2].kind,
            StmtKind::Expr(Expr::call(Expr::name("f"), vec![Expr::int(1)]))
        );

        let StmtKind::For { body, .. } = &module.body[3].kind else {
            panic!("expected For");
        };
        let lines: Vec<usize> = body.iter().map(|stmt| stmt.line).collect();
        assert_eq!(lines, vec![5, 6, 7]);
        assert!(matches!(body[0].kind, StmtKind::Assign { .. }));
        assert!(matches!(body[1].kind, StmtKind::AugAssign { op: Operator::Add, .. }));
        assert!(matches!(body[2].kind, StmtKind::Expr(Expr::Call { .. })));
    }

    #[test]
    fn test_unsupported_statement() {
        let err = read_python("with open(p) as f:\n    pass\n").unwrap_err();
        assert!(matches!(err, ReadError::Unsupported(_)));
    }

    #[test]
    fn test_chained_assignment() {
        match single("a = b = 1").kind {
            StmtKind::Assign { targets, value } => {
                assert_eq!(targets, vec![Expr::name("a"), Expr::name("b")]);
                assert_eq!(value, Expr::int(1));
            }
            other => panic!("expected Assign, got {:?}", other),
        }
    }

    #[test]
    fn test_annotated_assignment() {
        match single("left: float = p.x - 1").kind {
            StmtKind::AnnAssign {
                target,
                annotation,
                value,
            } => {
                assert_eq!(target, Expr::name("left"));
                assert_eq!(annotation, Expr::name("float"));
                assert!(matches!(value, Some(Expr::BinOp { op: Operator::Sub, .. })));
            }
            other => panic!("expected AnnAssign, got {:?}", other),
        }
    }

    #[test]
    fn test_augmented_assignment() {
        match single("total += 2").kind {
            StmtKind::AugAssign { op, .. } => assert_eq!(op, Operator::Add),
            other => panic!("expected AugAssign, got {:?}", other),
        }
    }

    #[test]
    fn test_elif_chain_nests_in_orelse() {
        let source = "if a:\n    x()\nelif b:\n    y()\nelse:\n    z()\n";
        let stmt = single(source);
        assert_eq!(stmt.line, 1);
        let StmtKind::If { orelse, .. } = stmt.kind else {
            panic!("expected If");
        };
        assert_eq!(orelse.len(), 1);
        assert_eq!(orelse[0].line, 3);
        let StmtKind::If { test, orelse, .. } = &orelse[0].kind else {
            panic!("expected nested If for elif");
        };
        assert_eq!(test, &Expr::name("b"));
        assert_eq!(orelse.len(), 1);
        assert_eq!(orelse[0].line, 6);
    }

    #[test]
    fn test_function_with_defaults() {
        let source = "def f(a, b: int = 1, c=2) -> float:\n    return a\n";
        let StmtKind::FunctionDef(def) = single(source).kind else {
            panic!("expected FunctionDef");
        };
        assert_eq!(def.name, "f");
        let names: Vec<&str> = def.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(def.params[1].annotation, Some(Expr::name("int")));
        assert_eq!(def.defaults, vec![Expr::int(1), Expr::int(2)]);
        assert_eq!(def.returns, Some(Expr::name("float")));
    }

    #[test]
    fn test_decorated_method_line() {
        let source = "class A:\n    @property\n    def size(self):\n        return 1\n";
        let StmtKind::ClassDef { body, .. } = single(source).kind else {
            panic!("expected ClassDef");
        };
        assert_eq!(body[0].line, 3);
        let StmtKind::FunctionDef(def) = &body[0].kind else {
            panic!("expected FunctionDef");
        };
        assert!(def.has_decorator("property"));
    }

    #[test]
    fn test_comparison_chain() {
        let StmtKind::Expr(expr) = single("a < b <= c").kind else {
            panic!("expected Expr");
        };
        match expr {
            Expr::Compare { ops, comparators, .. } => {
                assert_eq!(ops, vec![CmpOp::Lt, CmpOp::LtE]);
                assert_eq!(comparators.len(), 2);
            }
            other => panic!("expected Compare, got {:?}", other),
        }
    }

    #[test]
    fn test_negated_membership() {
        let StmtKind::Expr(expr) = single("a not in b").kind else {
            panic!("expected Expr");
        };
        assert!(matches!(expr, Expr::Compare { ref ops, .. } if ops == &vec![CmpOp::NotIn]));
    }

    #[test]
    fn test_boolean_operator_flattens() {
        let StmtKind::Expr(expr) = single("a and b and c").kind else {
            panic!("expected Expr");
        };
        match expr {
            Expr::BoolOp { op, values } => {
                assert_eq!(op, BoolOp::And);
                assert_eq!(values.len(), 3);
            }
            other => panic!("expected BoolOp, got {:?}", other),
        }
    }

    #[test]
    fn test_string_escapes() {
        let StmtKind::Expr(expr) = single(r#""a\tb""#).kind else {
            panic!("expected Expr");
        };
        assert_eq!(expr.as_str(), Some("a\tb"));
    }

    #[test]
    fn test_keyword_arguments_unsupported() {
        let err = read_python("f(x=1)").unwrap_err();
        assert!(matches!(err, ReadError::Unsupported(_)));
    }

    #[test]
    fn test_syntax_error() {
        assert!(matches!(read_python("def (:"), Err(ReadError::Parse(_))));
    }
}
