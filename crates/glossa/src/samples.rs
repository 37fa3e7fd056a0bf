//! Render one snippet into every configured target.

use crate::comments::CommentIndex;
#[cfg(feature = "read-python")]
use crate::config::RenderConfig;
use crate::context::IndentUnit;
use crate::error::RenderError;
#[cfg(feature = "read-python")]
use crate::error::SampleError;
#[cfg(feature = "read-python")]
use glossa_syntax::{PYTHON_READER, Reader};
use crate::registry;
use crate::traits::Backend;
use crate::translator::AstTranslator;
use glossa_syntax::Module;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// A snippet and its renderings, keyed by target name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Samples {
    pub source: String,
    pub rendered: BTreeMap<String, String>,
}

impl Samples {
    /// Rendered text for `target`; `py` is the source itself.
    pub fn get(&self, target: &str) -> Option<&str> {
        if target == "py" {
            return Some(&self.source);
        }
        self.rendered.get(target).map(String::as_str)
    }

    /// Human-readable language name of `target`.
    pub fn language_name(target: &str) -> Option<&'static str> {
        registry::language_name(target)
    }
}

/// Render an already-parsed module through each backend.
pub fn render_module(
    module: &Module,
    comments: &CommentIndex,
    backends: &[&dyn Backend],
    indent: IndentUnit,
) -> Result<BTreeMap<String, String>, RenderError> {
    let mut rendered = BTreeMap::new();
    for backend in backends {
        let text = AstTranslator::new(*backend, comments)
            .with_indent(indent)
            .translate(module)?;
        debug!(backend = backend.target(), lines = text.lines().count(), "rendered sample");
        rendered.insert(backend.target().to_string(), text);
    }
    Ok(rendered)
}

/// Render Python `source` through the given backends.
#[cfg(feature = "read-python")]
pub fn render_samples_with(
    source: &str,
    backends: &[&dyn Backend],
    indent: IndentUnit,
) -> Result<Samples, SampleError> {
    let module = PYTHON_READER.read(source)?;
    let comments = CommentIndex::scan(source);
    debug!(
        statements = module.body.len(),
        comments = comments.len(),
        "parsed sample"
    );
    let rendered = render_module(&module, &comments, backends, indent)?;
    Ok(Samples {
        source: source.to_string(),
        rendered,
    })
}

/// Render Python `source` through every registered backend.
#[cfg(feature = "read-python")]
pub fn render_samples(source: &str) -> Result<Samples, SampleError> {
    render_samples_with(source, &registry::backends(), IndentUnit::default())
}

/// Render Python `source` through the backends `config` enables.
#[cfg(feature = "read-python")]
pub fn render_samples_configured(
    source: &str,
    config: &RenderConfig,
) -> Result<Samples, SampleError> {
    let backends = config.backends()?;
    let backends: Vec<&dyn Backend> = backends.iter().map(|b| b.as_ref()).collect();
    render_samples_with(source, &backends, config.indent_unit())
}
