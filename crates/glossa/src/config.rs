//! Render configuration.
//!
//! Example config.toml:
//! ```toml
//! targets = ["cpp", "pseudo"]
//!
//! [indent]
//! width = 2
//!
//! [cpp]
//! brace_style = "k&r"
//!
//! [typescript]
//! type_annotations = false
//!
//! [pseudocode]
//! subject = "path"
//! ```

use crate::context::IndentUnit;
use crate::indent::BraceStyle;
use crate::output::cpp::Cpp;
use crate::output::curly::CurlyBrace;
use crate::output::pseudocode::PseudoCode;
use crate::output::typescript::TypeScript;
use crate::traits::Backend;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Error loading or applying a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unknown target: {0}")]
    UnknownTarget(String),
}

/// Indentation unit.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndentConfig {
    pub width: usize,
    pub character: char,
}

impl Default for IndentConfig {
    fn default() -> Self {
        let unit = IndentUnit::default();
        Self {
            width: unit.width,
            character: unit.character,
        }
    }
}

/// C++ output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CppConfig {
    pub brace_style: BraceStyle,
}

impl Default for CppConfig {
    fn default() -> Self {
        Self {
            brace_style: BraceStyle::Allman,
        }
    }
}

/// TypeScript output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TypeScriptConfig {
    pub brace_style: BraceStyle,
    /// Emit `: T` annotations.
    pub type_annotations: bool,
}

impl Default for TypeScriptConfig {
    fn default() -> Self {
        Self {
            brace_style: BraceStyle::KAndR,
            type_annotations: true,
        }
    }
}

/// Pseudocode output.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PseudocodeConfig {
    /// Narrated object; an empty string disables narration.
    pub subject: String,
}

impl Default for PseudocodeConfig {
    fn default() -> Self {
        Self {
            subject: "shape".to_string(),
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Enabled targets, in output order.
    pub targets: Vec<String>,
    pub indent: IndentConfig,
    pub cpp: CppConfig,
    pub typescript: TypeScriptConfig,
    pub pseudocode: PseudocodeConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            targets: vec!["cpp".into(), "ts".into(), "pseudo".into()],
            indent: IndentConfig::default(),
            cpp: CppConfig::default(),
            typescript: TypeScriptConfig::default(),
            pseudocode: PseudocodeConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        debug!(path = %path.display(), targets = ?config.targets, "loaded render config");
        Ok(config)
    }

    pub fn indent_unit(&self) -> IndentUnit {
        IndentUnit::new(self.indent.width, self.indent.character)
    }

    /// One configured backend per entry of `targets`.
    pub fn backends(&self) -> Result<Vec<Box<dyn Backend>>, ConfigError> {
        self.targets
            .iter()
            .map(|target| -> Result<Box<dyn Backend>, ConfigError> {
                match target.as_str() {
                    "cpp" => Ok(Box::new(CurlyBrace::new(
                        Cpp,
                        self.cpp.brace_style.strategy(),
                    ))),
                    "ts" => Ok(Box::new(CurlyBrace::new(
                        TypeScript::new(self.typescript.type_annotations),
                        self.typescript.brace_style.strategy(),
                    ))),
                    "pseudo" => {
                        let subject = Some(self.pseudocode.subject.clone())
                            .filter(|subject| !subject.is_empty())
                            .map(Cow::Owned);
                        Ok(Box::new(PseudoCode::new(subject)))
                    }
                    other => Err(ConfigError::UnknownTarget(other.to_string())),
                }
            })
            .collect()
    }
}
