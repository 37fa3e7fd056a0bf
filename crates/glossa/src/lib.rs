//! Render Python documentation snippets as C++, TypeScript and pseudocode.
//!
//! A snippet is parsed once into a `glossa-syntax` tree and its comments are
//! recovered from the raw text. One [`AstTranslator`] per target then walks
//! the tree and hands rendered text to that target's [`Backend`] hooks.
//!
//! # Architecture
//!
//! ```text
//! source ──> CommentIndex ─────────────┐
//!    │                                 ├─> AstTranslator ─> Backend ─> text
//!    └─────> Module (glossa-syntax) ───┘        (per target)
//! ```
//!
//! # Example
//!
//! ```ignore
//! let samples = glossa::render_samples("x: float = 1.5  # width")?;
//! assert_eq!(samples.get("ts"), Some("let x: float = 1.5; // width\n"));
//! assert_eq!(samples.get("pseudo"), Some("$x \\coloneq 1.5$ width\n"));
//! ```
//!
//! # Targets
//!
//! - `cpp` and `ts` share one curly-brace implementation
//!   ([`output::curly::CurlyBrace`]); brace placement is an
//!   [`IndentationStyle`] (K&R, Allman, Whitesmiths, GNU).
//! - `pseudo` writes LaTeX pseudocode sentences.
//!
//! Constructs a target cannot express abort the render with
//! [`RenderError::Unsupported`]; no partial output is returned.

pub mod comments;
pub mod config;
pub mod context;
pub mod error;
pub mod indent;
pub mod naming;
pub mod ops;
pub mod output;
pub mod range;
pub mod registry;
pub mod samples;
pub mod scope;
pub mod traits;
pub mod translator;

// Re-exports: engine
pub use comments::{CommentCursor, CommentIndex, CommentKind, CommentRecord};
pub use context::{IndentUnit, RenderContext};
pub use indent::{ALLMAN, AllmanStyle, BraceStyle, GNU, IndentationStyle, K_AND_R, KAndRStyle, WHITESMITHS};
pub use range::{LoopIter, RangeDescriptor};
pub use scope::ScopeStack;
pub use translator::{AstTranslator, default_index, translate};

// Re-exports: traits and errors
pub use error::{RenderError, SampleError};
pub use traits::{Backend, Declaration, HookResult, SequenceKind, Signature, SignatureParam, Unsupported};

// Re-exports: backends and registry
pub use output::cpp::{CPP_BACKEND, Cpp};
pub use output::curly::{CurlyBrace, CurlyDialect};
pub use output::pseudocode::{PSEUDOCODE_BACKEND, PseudoCode};
pub use output::typescript::{TYPESCRIPT_BACKEND, TypeScript};
pub use registry::{backend_names, backends, get_backend, language_name, register_backend};

// Re-exports: configuration and facade
pub use config::{ConfigError, RenderConfig};
pub use samples::{Samples, render_module};
#[cfg(feature = "read-python")]
pub use samples::{render_samples, render_samples_configured, render_samples_with};

pub use glossa_syntax as syntax;
