//! Snapshot tests for the Python reader.
//!
//! These tests verify that parsing produces the expected tree.
//! Run `cargo insta review` to update snapshots after intentional changes.

use glossa_syntax::{CmpOp, Expr, FunctionDef, Module, Param, Stmt, StmtKind, read_python};

fn parse(code: &str) -> Module {
    read_python(code).expect("parse failed")
}

// ============================================================================
// Tree snapshots
// ============================================================================

#[test]
fn assignment_tree() {
    insta::assert_json_snapshot!(parse("x = 42"), @r###"
    {
      "body": [
        {
          "line": 1,
          "kind": {
            "assign": {
              "targets": [
                {
                  "name": "x"
                }
              ],
              "value": {
                "constant": {
                  "int": 42
                }
              }
            }
          }
        }
      ]
    }
    "###);
}

#[test]
fn pass_and_break_tree() {
    insta::assert_json_snapshot!(parse("while True:\n    break\n"), @r###"
    {
      "body": [
        {
          "line": 1,
          "kind": {
            "while": {
              "test": {
                "constant": {
                  "bool": true
                }
              },
              "body": [
                {
                  "line": 2,
                  "kind": "break"
                }
              ]
            }
          }
        }
      ]
    }
    "###);
}

// ============================================================================
// Structural checks
// ============================================================================

#[test]
fn elif_chain_desugars_to_nested_ifs() {
    let source = "\
if a:
    x = 1
elif b:
    x = 2
elif c:
    x = 3
else:
    x = 4
";
    let module = parse(source);
    let mut depth = 0;
    let mut stmt = &module.body[0];
    let mut lines = vec![stmt.line];
    loop {
        let StmtKind::If { orelse, .. } = &stmt.kind else {
            break;
        };
        depth += 1;
        match orelse.as_slice() {
            [next @ Stmt { kind: StmtKind::If { .. }, .. }] => {
                lines.push(next.line);
                stmt = next;
            }
            [last] => {
                lines.push(last.line);
                break;
            }
            _ => panic!("unexpected orelse shape"),
        }
    }
    assert_eq!(depth, 3);
    assert_eq!(lines, vec![1, 3, 5, 8]);
}

#[test]
fn function_signature() {
    let source = "def scale(v: Vector2D, k: float = 1.0):\n    return v * k\n";
    let module = parse(source);
    let expected = FunctionDef::new(
        "scale",
        vec![
            Param::typed("v", Expr::name("Vector2D")),
            Param::typed("k", Expr::name("float")),
        ],
        vec![Stmt::return_stmt(
            2,
            Some(Expr::binary(
                Expr::name("v"),
                glossa_syntax::Operator::Mult,
                Expr::name("k"),
            )),
        )],
    )
    .with_defaults(vec![Expr::float(1.0)]);
    assert_eq!(module.body, vec![Stmt::function(1, expected)]);
}

#[test]
fn docstring_is_first_statement() {
    let source = "def f():\n    '''\n    Doc line\n    '''\n    pass\n";
    let module = parse(source);
    let StmtKind::FunctionDef(def) = &module.body[0].kind else {
        panic!("expected FunctionDef");
    };
    assert_eq!(def.body.len(), 2);
    let StmtKind::Expr(doc) = &def.body[0].kind else {
        panic!("expected docstring expression");
    };
    assert_eq!(doc.as_str(), Some("\n    Doc line\n    "));
    assert_eq!(def.body[1].kind, StmtKind::Pass);
}

#[test]
fn comments_are_not_statements() {
    let source = "# leading\nx = 1  # tail\n\n# between\ny = 2\n";
    let module = parse(source);
    let lines: Vec<usize> = module.body.iter().map(|s| s.line).collect();
    assert_eq!(lines, vec![2, 5]);
}

#[test]
fn match_patterns() {
    let source = "\
match kind:
    case 1:
        pass
    case Color.RED:
        pass
    case _:
        pass
";
    let module = parse(source);
    let StmtKind::Match { subject, cases } = &module.body[0].kind else {
        panic!("expected Match");
    };
    assert_eq!(subject, &Expr::name("kind"));
    assert_eq!(
        cases.iter().map(|c| c.line).collect::<Vec<_>>(),
        vec![2, 4, 6]
    );
    assert_eq!(cases[0].pattern, Expr::MatchValue(Box::new(Expr::int(1))));
    assert_eq!(
        cases[1].pattern,
        Expr::MatchValue(Box::new(Expr::attribute(Expr::name("Color"), "RED")))
    );
    assert_eq!(cases[2].pattern, Expr::MatchAs { name: None });
}

#[test]
fn imports() {
    let module = parse("import math\nfrom a.b import c, d as e\n");
    let StmtKind::Import(names) = &module.body[0].kind else {
        panic!("expected Import");
    };
    assert_eq!(names[0].name, "math");
    let StmtKind::ImportFrom { module: from, names } = &module.body[1].kind else {
        panic!("expected ImportFrom");
    };
    assert_eq!(from.as_deref(), Some("a.b"));
    assert_eq!(names[1].name, "d");
    assert_eq!(names[1].asname.as_deref(), Some("e"));
}

#[test]
fn slices_and_subscripts() {
    let module = parse("a[1:]\nb[::2]\nc[i]\n");
    let exprs: Vec<&Expr> = module
        .body
        .iter()
        .map(|s| match &s.kind {
            StmtKind::Expr(e) => e,
            other => panic!("expected Expr, got {:?}", other),
        })
        .collect();

    let Expr::Subscript { slice, .. } = exprs[0] else {
        panic!("expected Subscript");
    };
    assert_eq!(
        **slice,
        Expr::Slice {
            lower: Some(Box::new(Expr::int(1))),
            upper: None,
            step: None,
        }
    );

    let Expr::Subscript { slice, .. } = exprs[1] else {
        panic!("expected Subscript");
    };
    assert_eq!(
        **slice,
        Expr::Slice {
            lower: None,
            upper: None,
            step: Some(Box::new(Expr::int(2))),
        }
    );

    let Expr::Subscript { slice, .. } = exprs[2] else {
        panic!("expected Subscript");
    };
    assert_eq!(**slice, Expr::name("i"));
}

#[test]
fn identity_comparison() {
    let module = parse("x is not None\n");
    let StmtKind::Expr(Expr::Compare { ops, comparators, .. }) = &module.body[0].kind else {
        panic!("expected Compare");
    };
    assert_eq!(ops, &vec![CmpOp::IsNot]);
    assert_eq!(comparators, &vec![Expr::none()]);
}

#[test]
fn lambda_is_rejected() {
    let err = read_python("f = lambda x: x").unwrap_err();
    assert!(err.to_string().contains("lambda"));
}

#[test]
fn reader_trait_metadata() {
    use glossa_syntax::{PYTHON_READER, Reader};

    assert_eq!(PYTHON_READER.language(), "python");
    assert_eq!(PYTHON_READER.extensions(), &["py"]);
    assert_eq!(PYTHON_READER.read("x = 42").unwrap(), parse("x = 42"));
}

#[test]
fn tree_loads_from_json() {
    let json = r#"{
      "body": [
        {
          "line": 1,
          "kind": {
            "aug_assign": {
              "target": { "name": "x" },
              "op": "Sub",
              "value": { "constant": { "int": 1 } }
            }
          }
        }
      ]
    }"#;
    let module: Module = serde_json::from_str(json).unwrap();
    assert_eq!(module, parse("x -= 1"));
}
