//! Per-render mutable state threaded through every backend hook.

use crate::comments::{CommentCursor, CommentIndex, CommentKind};
use crate::scope::ScopeStack;
use crate::traits::Backend;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One indentation level: `width` copies of `character`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndentUnit {
    pub width: usize,
    pub character: char,
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self {
            width: 4,
            character: ' ',
        }
    }
}

impl IndentUnit {
    pub fn new(width: usize, character: char) -> Self {
        Self { width, character }
    }

    /// Indentation for a possibly fractional `level`, rounded down.
    pub fn indent_string(&self, level: f32) -> String {
        let count = (level * self.width as f32).max(0.0) as usize;
        std::iter::repeat_n(self.character, count).collect()
    }
}

/// Class/method context saved by [`RenderContext::enter`].
#[derive(Debug, Clone)]
pub struct Frame {
    class_name: Option<String>,
    in_method: bool,
}

/// Output buffer, indentation, comment cursor, scopes and class context of
/// one (source, backend) render.
pub struct RenderContext<'a> {
    backend: &'a dyn Backend,
    output: String,
    indent_level: usize,
    indent: IndentUnit,
    comments: CommentCursor<'a>,
    scopes: ScopeStack,
    class_name: Option<String>,
    in_method: bool,
}

impl<'a> RenderContext<'a> {
    pub fn new(backend: &'a dyn Backend, comments: &'a CommentIndex, indent: IndentUnit) -> Self {
        Self {
            backend,
            output: String::new(),
            indent_level: 0,
            indent,
            comments: comments.cursor(),
            scopes: ScopeStack::new(),
            class_name: None,
            in_method: false,
        }
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn indent_level(&self) -> usize {
        self.indent_level
    }

    pub fn indent_up(&mut self) {
        self.indent_level += 1;
    }

    pub fn indent_down(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    /// Set the comment cursor's current line.
    pub fn prepare(&mut self, line: usize) {
        self.comments.prepare(line);
    }

    /// Skip a blank line directly after the current one.
    pub fn skip_blank(&mut self) {
        self.comments.skip_blank();
    }

    /// Whether every comment record has been replayed.
    pub fn is_exhausted(&self) -> bool {
        self.comments.is_exhausted()
    }

    /// Emit one line of code at the current indentation, replaying pending
    /// comments around it.
    pub fn push_code(&mut self, code: &str) {
        self.push_code_with(code, true, 0.0);
    }

    /// [`push_code`](Self::push_code) with control over whether pending line
    /// comments are flushed first, and an extra (fractional) indent offset.
    pub fn push_code_with(&mut self, code: &str, line_comments: bool, offset: f32) {
        if line_comments {
            self.flush_line_comments();
        }
        self.comments.take_else();

        self.push_indented(code, offset);

        if let Some(tail) = self.comments.take_tail() {
            self.output.push(' ');
            self.output.push_str(&self.backend.line_comment(tail));
        }

        self.output.push('\n');
    }

    fn push_indented(&mut self, code: &str, offset: f32) {
        if !code.is_empty() {
            let indent = self.indent.indent_string(self.indent_level as f32 + offset);
            self.output.push_str(&indent);
            self.output.push_str(code);
        }
    }

    fn flush_line_comments(&mut self) {
        while let Some(text) = self.comments.next_line_comment() {
            trace!(line = self.comments.current_line(), "flush line comment");
            if let Some(text) = text {
                let comment = self.backend.line_comment(text);
                self.push_indented(&comment, 0.0);
            }
            self.output.push('\n');
        }
    }

    /// Replay every record the statements never reached.
    ///
    /// Comments become standalone lines, else markers are dropped, and blank
    /// lines are kept only when a comment follows them.
    pub fn finish(&mut self) {
        let rest = self.comments.drain();
        let mut blanks = 0;
        for record in rest {
            match (record.kind(), record.text.as_deref()) {
                (CommentKind::Else, _) => {}
                (CommentKind::Line, None) => blanks += 1,
                (_, text) => {
                    for _ in 0..blanks {
                        self.output.push('\n');
                    }
                    blanks = 0;
                    let comment = self.backend.line_comment(text.unwrap_or(""));
                    self.push_indented(&comment, 0.0);
                    self.output.push('\n');
                }
            }
        }
    }

    pub fn push_scope(&mut self) {
        self.scopes.push();
    }

    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Record a variable's type text in the innermost scope.
    pub fn declare_var(&mut self, name: impl Into<String>, ty: impl Into<String>) {
        self.scopes.declare(name, ty);
    }

    /// Declared type text of `name`, or `""`.
    pub fn var_type(&self, name: &str) -> &str {
        self.scopes.lookup(name)
    }

    /// Name of the class whose body is being rendered, if directly inside one.
    pub fn class_name(&self) -> Option<&str> {
        self.class_name.as_deref()
    }

    /// Whether rendering is anywhere inside a class.
    pub fn in_method(&self) -> bool {
        self.in_method
    }

    /// Go one level deeper. Entering a class body sets the class name and
    /// marks everything below as method code; any other block clears the
    /// class name.
    pub fn enter(&mut self, class_name: Option<&str>) -> Frame {
        let frame = Frame {
            class_name: self.class_name.take(),
            in_method: self.in_method,
        };
        if class_name.is_some() {
            self.in_method = true;
        }
        self.class_name = class_name.map(str::to_string);
        self.indent_up();
        frame
    }

    /// Undo the matching [`enter`](Self::enter).
    pub fn leave(&mut self, frame: Frame) {
        self.class_name = frame.class_name;
        self.in_method = frame.in_method;
        self.indent_down();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::cpp::CPP_BACKEND;

    #[test]
    fn test_indent_string_fractional() {
        let unit = IndentUnit::default();
        assert_eq!(unit.indent_string(1.0), "    ");
        assert_eq!(unit.indent_string(1.5), "      ");
        assert_eq!(IndentUnit::new(1, '\t').indent_string(2.0), "\t\t");
    }

    #[test]
    fn test_push_code_replays_comments() {
        let comments = CommentIndex::scan("# first\n\nx = 1  # tail\n");
        let mut cx = RenderContext::new(&CPP_BACKEND, &comments, IndentUnit::default());
        cx.prepare(3);
        cx.push_code("x = 1;");
        assert_eq!(cx.output(), "// first\n\nx = 1; // tail\n");
        assert!(cx.is_exhausted());
    }

    #[test]
    fn test_finish_drains_leftovers() {
        let comments = CommentIndex::scan("x = 1\n\n\n# trailing\n\n");
        let mut cx = RenderContext::new(&CPP_BACKEND, &comments, IndentUnit::default());
        cx.prepare(1);
        cx.push_code("x = 1;");
        cx.finish();
        assert_eq!(cx.output(), "x = 1;\n\n\n// trailing\n");
        assert!(cx.is_exhausted());
    }

    #[test]
    fn test_enter_and_leave_class_context() {
        let comments = CommentIndex::default();
        let mut cx = RenderContext::new(&CPP_BACKEND, &comments, IndentUnit::default());
        let class = cx.enter(Some("Shape"));
        assert_eq!(cx.class_name(), Some("Shape"));
        assert!(cx.in_method());

        let body = cx.enter(None);
        assert_eq!(cx.class_name(), None);
        assert!(cx.in_method());
        assert_eq!(cx.indent_level(), 2);

        cx.leave(body);
        assert_eq!(cx.class_name(), Some("Shape"));
        cx.leave(class);
        assert!(!cx.in_method());
        assert_eq!(cx.indent_level(), 0);
    }
}
