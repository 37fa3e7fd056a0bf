//! Brace placement strategies for the curly-brace targets.

use crate::context::RenderContext;
use serde::{Deserialize, Serialize};

/// Where block braces go.
pub trait IndentationStyle: Send + Sync + std::fmt::Debug {
    /// Open a block after `header`.
    fn begin_block(&self, cx: &mut RenderContext<'_>, header: &str);

    /// Close the current block and open the next one of a chain
    /// (`else`, `else if ( x )`).
    fn mid_block(&self, cx: &mut RenderContext<'_>, header: &str);

    /// Close the current block with `closer` (usually `}`).
    fn close_block(&self, cx: &mut RenderContext<'_>, closer: &str);

    fn end_block(&self, cx: &mut RenderContext<'_>) {
        self.close_block(cx, "}");
    }
}

/// Opening brace at the end of the header line.
#[derive(Debug, Clone, Copy, Default)]
pub struct KAndRStyle;

impl IndentationStyle for KAndRStyle {
    fn begin_block(&self, cx: &mut RenderContext<'_>, header: &str) {
        cx.push_code(&format!("{} {{", header));
    }

    fn mid_block(&self, cx: &mut RenderContext<'_>, header: &str) {
        cx.push_code(&format!("}} {} {{", header));
    }

    fn close_block(&self, cx: &mut RenderContext<'_>, closer: &str) {
        cx.push_code(closer);
    }
}

/// Braces on their own lines, `offset` levels in from the header.
///
/// An offset of 0 is Allman, 1 is Whitesmiths and 0.5 is GNU.
#[derive(Debug, Clone, Copy)]
pub struct AllmanStyle {
    pub offset: f32,
}

impl AllmanStyle {
    pub const fn new(offset: f32) -> Self {
        Self { offset }
    }
}

impl IndentationStyle for AllmanStyle {
    fn begin_block(&self, cx: &mut RenderContext<'_>, header: &str) {
        cx.push_code(header);
        cx.push_code_with("{", false, self.offset);
        cx.skip_blank();
    }

    fn mid_block(&self, cx: &mut RenderContext<'_>, header: &str) {
        cx.skip_blank();
        cx.push_code_with("}", true, self.offset);
        cx.push_code_with(header, false, 0.0);
        cx.push_code_with("{", false, self.offset);
        cx.skip_blank();
    }

    fn close_block(&self, cx: &mut RenderContext<'_>, closer: &str) {
        cx.push_code_with(closer, true, self.offset);
    }
}

pub static K_AND_R: KAndRStyle = KAndRStyle;
pub static ALLMAN: AllmanStyle = AllmanStyle::new(0.0);
pub static WHITESMITHS: AllmanStyle = AllmanStyle::new(1.0);
pub static GNU: AllmanStyle = AllmanStyle::new(0.5);

/// Brace style as spelled in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BraceStyle {
    #[serde(rename = "k&r", alias = "kr", alias = "knr")]
    KAndR,
    #[serde(rename = "allman")]
    Allman,
    #[serde(rename = "whitesmiths")]
    Whitesmiths,
    #[serde(rename = "gnu")]
    Gnu,
}

impl BraceStyle {
    pub fn strategy(self) -> &'static dyn IndentationStyle {
        match self {
            BraceStyle::KAndR => &K_AND_R,
            BraceStyle::Allman => &ALLMAN,
            BraceStyle::Whitesmiths => &WHITESMITHS,
            BraceStyle::Gnu => &GNU,
        }
    }
}
