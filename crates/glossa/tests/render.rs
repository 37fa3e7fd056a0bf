//! End-to-end rendering tests.
//!
//! Each test feeds Python source through the facade and checks the text of
//! one or more targets. Run `cargo insta review` to update snapshots after
//! intentional changes.

use glossa::syntax::{CmpOp, Expr, FunctionDef, Module, Operator, Param, Stmt, read_python};
use glossa::{
    AstTranslator, Backend, CPP_BACKEND, CommentIndex, IndentUnit, PSEUDOCODE_BACKEND, RenderConfig, RenderError,
    SampleError, TYPESCRIPT_BACKEND, render_module, render_samples, render_samples_configured,
};

const RECTANGLE: &str = r#"# Rectangle outline
def rectangle(shape, pos: Vector2D, size: Vector2D):
    """!
    Adds a rectangle to the shape
    """
    left: float = pos.x - size.x / 2
    right: float = pos.x + size.x / 2

    shape.add_vertex(Vector2D(left, pos.y))  # start
    shape.closed = True
"#;

const COMMENTED: &str = "\
# header
x = 1  # tail one

# before if
if x > 0:
    # inside if
    y = 2
else:
    # inside else
    y = 3
# trailing
";

// ============================================================================
// Per-target renderings
// ============================================================================

#[test]
fn rectangle_cpp() {
    let samples = render_samples(RECTANGLE).unwrap();
    insta::assert_snapshot!(samples.get("cpp").unwrap(), @r"
    // Rectangle outline
    /**
     * Adds a rectangle to the shape
     */
    void rectangle(auto shape, Vector2D pos, Vector2D size)
    {
        float left = pos.x - size.x / 2;
        float right = pos.x + size.x / 2;

        shape.add_vertex(Vector2D(left, pos.y)); // start
        shape.closed = true;
    }
    ");
}

#[test]
fn rectangle_typescript() {
    let samples = render_samples(RECTANGLE).unwrap();
    insta::assert_snapshot!(samples.get("ts").unwrap(), @r"
    // Rectangle outline
    /**
     * Adds a rectangle to the shape
     */
    function rectangle(shape, pos: Vector2D, size: Vector2D) {
        let left: float = pos.x - size.x / 2;
        let right: float = pos.x + size.x / 2;

        shape.addVertex(new Vector2D(left, pos.y)); // start
        shape.closed = true;
    }
    ");
}

#[test]
fn rectangle_pseudocode() {
    let samples = render_samples(RECTANGLE).unwrap();
    insta::assert_snapshot!(samples.get("pseudo").unwrap(), @r"
    Rectangle outline
    Adds a rectangle to the shape
    Rectangle
        Inputs:
            $\vec{pos} \in \mathbb{R}^2$
            $\vec{size} \in \mathbb{R}^2$

        $left \coloneq \vec{pos}.x - \frac{\vec{size}.x}{2}$
        $right \coloneq \vec{pos}.x + \frac{\vec{size}.x}{2}$

        Add vertex $\left(left, \vec{pos}.y\right)$ start
        Set shape closed
    ");
}

// ============================================================================
// Comment replay
// ============================================================================

#[test]
fn comments_keep_source_order() {
    let samples = render_samples(COMMENTED).unwrap();
    let texts = [
        "header",
        "tail one",
        "before if",
        "inside if",
        "inside else",
        "trailing",
    ];
    for target in ["cpp", "ts", "pseudo"] {
        let out = samples.get(target).unwrap();
        let positions: Vec<usize> = texts
            .iter()
            .map(|text| {
                assert_eq!(out.matches(text).count(), 1, "{target}: {text:?} in\n{out}");
                out.find(text).unwrap()
            })
            .collect();
        assert!(
            positions.windows(2).all(|pair| pair[0] < pair[1]),
            "{target}: comments out of order in\n{out}"
        );
    }
}

#[test]
fn comments_around_else_branch() {
    let samples = render_samples(COMMENTED).unwrap();
    insta::assert_snapshot!(samples.get("cpp").unwrap(), @r"
    // header
    x = 1; // tail one

    // before if
    if ( x > 0 )
    {
        // inside if
        y = 2;
    }
    else
    {
        // inside else
        y = 3;
    }
    // trailing
    ");
    insta::assert_snapshot!(samples.get("pseudo").unwrap(), @r"
    header
    $x \coloneq 1$ tail one

    before if
    If $x > 0$
        inside if
        $y \coloneq 2$
    Otherwise
        inside else
        $y \coloneq 3$
    trailing
    ");
}

#[test]
fn comments_replayed_during_the_walk() {
    let inline = COMMENTED.strip_suffix("# trailing\n").unwrap();
    for source in [RECTANGLE, inline] {
        let module = read_python(source).unwrap();
        let comments = CommentIndex::scan(source);
        let backends: [&dyn Backend; 3] = [&CPP_BACKEND, &TYPESCRIPT_BACKEND, &PSEUDOCODE_BACKEND];
        for backend in backends {
            let mut translator = AstTranslator::new(backend, &comments);
            translator.render(&module).unwrap();
            assert!(
                translator.comments_replayed(),
                "{}: comments left after walking\n{source}",
                backend.target()
            );
        }
    }

    let source = "x = 1\n# trailing\n";
    let module = read_python(source).unwrap();
    let comments = CommentIndex::scan(source);
    let mut translator = AstTranslator::new(&CPP_BACKEND, &comments);
    translator.render(&module).unwrap();
    assert!(!translator.comments_replayed());
    assert_eq!(translator.finish(), "x = 1;\n// trailing\n");
}

#[test]
fn hash_in_string_is_not_a_comment() {
    let samples = render_samples("color = \"#ff0000\"  # red\n").unwrap();
    assert_eq!(samples.get("cpp"), Some("color = \"#ff0000\"; // red\n"));
    assert_eq!(samples.get("ts"), Some("color = \"#ff0000\"; // red\n"));
    assert_eq!(
        samples.get("pseudo"),
        Some("$color \\coloneq '#ff0000'$ red\n")
    );
}

#[test]
fn blank_lines_reproduced() {
    let samples = render_samples("a = 1\n\n\nb = 2\n").unwrap();
    assert_eq!(samples.get("ts"), Some("a = 1;\n\n\nb = 2;\n"));
}

// ============================================================================
// Structure
// ============================================================================

#[test]
fn elif_chain_is_flattened() {
    let source = "\
if a:
    f(1)
elif b:
    f(2)
elif c:
    f(3)
else:
    f(4)
";
    let samples = render_samples(source).unwrap();
    insta::assert_snapshot!(samples.get("ts").unwrap(), @r"
    if ( a ) {
        f(1);
    } else if ( b ) {
        f(2);
    } else if ( c ) {
        f(3);
    } else {
        f(4);
    }
    ");

    let cpp = samples.get("cpp").unwrap();
    assert_eq!(cpp.lines().filter(|l| l.starts_with("else if")).count(), 2);
    assert_eq!(cpp.lines().filter(|l| *l == "else").count(), 1);

    let pseudo = samples.get("pseudo").unwrap();
    assert_eq!(pseudo.matches("Otherwise, if").count(), 2);
    assert_eq!(pseudo.lines().filter(|l| *l == "Otherwise").count(), 1);
}

#[test]
fn nested_if_in_else_is_not_an_elif() {
    let source = "\
if a:
    f(1)
else:
    g()
    if b:
        f(2)
";
    let samples = render_samples(source).unwrap();
    let ts = samples.get("ts").unwrap();
    assert!(!ts.contains("else if"));
    assert!(ts.contains("} else {\n    g();\n    if ( b ) {\n"));
}

#[test]
fn range_bounds_agree_across_targets() {
    let samples = render_samples("for i in range(2, 10, 3):\n    f(i)\n").unwrap();
    assert!(
        samples
            .get("cpp")
            .unwrap()
            .starts_with("for ( int i = 2; i < 10; i += 3 )\n")
    );
    assert!(
        samples
            .get("ts")
            .unwrap()
            .starts_with("for ( let i = 2; i < 10; i += 3 ) {\n")
    );
    assert!(
        samples
            .get("pseudo")
            .unwrap()
            .starts_with("For each $i$ in $[2, 10) \\text{ by } 3$\n")
    );

    let samples = render_samples("for i in range(n):\n    f(i)\n").unwrap();
    assert!(samples.get("cpp").unwrap().starts_with("for ( int i = 0; i < n; i++ )\n"));
    assert!(samples.get("pseudo").unwrap().starts_with("For each $i$ in $[0, n)$\n"));
}

#[test]
fn method_defaults_skip_self() {
    let source = "\
class Shape:
    def scale(self, x: float, y: float = 1.0):
        pass
";
    let samples = render_samples_configured(
        source,
        &RenderConfig::from_toml_str("targets = [\"cpp\", \"ts\"]").unwrap(),
    )
    .unwrap();
    assert!(
        samples
            .get("cpp")
            .unwrap()
            .contains("    void scale(float x, float y = 1.0)\n")
    );
    assert!(
        samples
            .get("ts")
            .unwrap()
            .contains("    scale(x: float, y: float = 1.0) {\n")
    );
}

#[test]
fn unannotated_parameter_shadows_outer_vector() {
    let source = "\
p: Vector2D = Vector2D(0, 0)
def f(p):
    return p
";
    let samples = render_samples(source).unwrap();
    insta::assert_snapshot!(samples.get("pseudo").unwrap(), @r"
    $\vec{p} \coloneq \left(0, 0\right)$
    F
        Inputs:
            $p$

        Return $p$
    ");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unsupported_construct_names_target_and_kind() {
    let err = render_samples("x = [1, 2]\n").unwrap_err();
    match err {
        SampleError::Render(RenderError::Unsupported { target, kind, .. }) => {
            assert_eq!(target, "pseudo");
            assert_eq!(kind, "List");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn reader_errors_surface() {
    let err = render_samples("f = lambda x: x\n").unwrap_err();
    assert!(matches!(err, SampleError::Read(_)));
}

#[test]
fn unknown_configured_target() {
    let config = RenderConfig::from_toml_str("targets = [\"fortran\"]").unwrap();
    let err = render_samples_configured("x = 1\n", &config).unwrap_err();
    assert!(matches!(err, SampleError::Config(_)));
}

// ============================================================================
// Facade
// ============================================================================

#[test]
fn configured_render() {
    let config = RenderConfig::from_toml_str(
        "targets = [\"cpp\"]\n[indent]\nwidth = 2\n[cpp]\nbrace_style = \"whitesmiths\"\n",
    )
    .unwrap();
    let samples = render_samples_configured("while x:\n    x -= 1\n", &config).unwrap();
    assert_eq!(samples.rendered.len(), 1);
    assert_eq!(samples.get("cpp"), Some("while ( x )\n  {\n  x -= 1;\n  }\n"));
}

#[test]
fn samples_serialize() {
    let samples = render_samples("x = 1\n").unwrap();
    assert_eq!(samples.get("py"), Some("x = 1\n"));
    insta::assert_json_snapshot!(samples, @r###"
    {
      "source": "x = 1\n",
      "rendered": {
        "cpp": "x = 1;\n",
        "pseudo": "$x \\coloneq 1$\n",
        "ts": "x = 1;\n"
      }
    }
    "###);
}

#[test]
fn render_prebuilt_module() {
    let def = FunctionDef::new(
        "double",
        vec![Param::typed("x", Expr::name("int"))],
        vec![Stmt::return_stmt(
            2,
            Some(Expr::binary(Expr::name("x"), Operator::Mult, Expr::int(2))),
        )],
    )
    .with_returns(Expr::name("int"));
    let module = Module::new(vec![Stmt::function(1, def)]);

    let backends: [&dyn Backend; 3] = [&CPP_BACKEND, &TYPESCRIPT_BACKEND, &PSEUDOCODE_BACKEND];
    let rendered = render_module(
        &module,
        &CommentIndex::default(),
        &backends,
        IndentUnit::new(1, '\t'),
    )
    .unwrap();

    assert_eq!(rendered["cpp"], "int double(int x)\n{\n\treturn x * 2;\n}\n");
    assert_eq!(rendered["ts"], "function double(x: int) : int {\n\treturn x * 2;\n}\n");
    assert_eq!(
        rendered["pseudo"],
        "Double\n\tInputs:\n\t\t$x \\in \\mathbb{Z}$\n\n\tReturn $x \\cdot 2$\n"
    );
}

#[test]
fn render_prebuilt_loop() {
    let body = vec![Stmt::if_stmt(
        3,
        Expr::compare(Expr::name("i"), CmpOp::Gt, Expr::int(2)),
        vec![Stmt::assign(
            4,
            Expr::name("total"),
            Expr::binary(Expr::name("total"), Operator::Add, Expr::name("i")),
        )],
        Vec::new(),
    )];
    let module = Module::new(vec![
        Stmt::ann_assign(1, Expr::name("total"), Expr::name("int"), Some(Expr::int(0))),
        Stmt::for_loop(
            2,
            Expr::name("i"),
            Expr::call(Expr::name("range"), vec![Expr::name("n")]),
            body,
        ),
    ]);

    let backends: [&dyn Backend; 2] = [&CPP_BACKEND, &PSEUDOCODE_BACKEND];
    let rendered = render_module(
        &module,
        &CommentIndex::default(),
        &backends,
        IndentUnit::default(),
    )
    .unwrap();

    insta::assert_snapshot!(rendered["cpp"], @r"
    int total = 0;
    for ( int i = 0; i < n; i++ )
    {
        if ( i > 2 )
        {
            total = total + i;
        }
    }
    ");
    insta::assert_snapshot!(rendered["pseudo"], @r"
    $total \coloneq 0$
    For each $i$ in $[0, n)$
        If $i > 2$
            $total \coloneq total + i$
    ");
}
